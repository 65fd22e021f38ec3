use ratatui::text::{Line, Span};

use crate::context::TreeRowContext;

/// Symbols for tree guides, expanders, and tag chip edges.
#[derive(Clone, Copy)]
pub struct TreeGlyphs<'a> {
    pub indent: &'a str,
    pub branch_last: &'a str,
    pub branch: &'a str,
    pub vert: &'a str,
    pub empty: &'a str,
    pub leaf: &'a str,
    pub expanded: &'a str,
    pub collapsed: &'a str,
    pub chip_left: &'a str,
    pub chip_right: &'a str,
}

impl TreeGlyphs<'static> {
    pub const fn unicode() -> Self {
        Self {
            indent: "   ",
            branch_last: "└──",
            branch: "├──",
            vert: "│  ",
            empty: "   ",
            leaf: "•",
            expanded: "▼",
            collapsed: "▶",
            chip_left: "▐",
            chip_right: "▌",
        }
    }

    pub const fn ascii() -> Self {
        Self {
            indent: "   ",
            branch_last: "`--",
            branch: "|--",
            vert: "|  ",
            empty: "   ",
            leaf: "*",
            expanded: "v",
            collapsed: ">",
            chip_left: "[",
            chip_right: "]",
        }
    }
}

impl Default for TreeGlyphs<'static> {
    fn default() -> Self {
        Self::unicode()
    }
}

const fn expander<'a>(ctx: &TreeRowContext<'_>, glyphs: &TreeGlyphs<'a>) -> &'a str {
    if !ctx.has_children {
        return if ctx.level == 0 { "" } else { glyphs.leaf };
    }
    if ctx.is_expanded {
        glyphs.expanded
    } else {
        glyphs.collapsed
    }
}

/// Builds the guide/expander prefix drawn before a row's cell content.
pub fn tree_prefix_line<'a>(ctx: &TreeRowContext<'_>, glyphs: &TreeGlyphs<'a>) -> Line<'a> {
    let expander = expander(ctx, glyphs);

    if ctx.level == 0 || !ctx.draw_lines {
        let mut spans = Vec::with_capacity(ctx.level as usize + 2);
        for _ in 0..ctx.level {
            spans.push(Span::raw(glyphs.empty));
        }
        if !expander.is_empty() {
            spans.push(Span::raw(expander));
            spans.push(Span::raw(" "));
        }
        return Line::from(spans);
    }

    let mut spans = Vec::with_capacity(ctx.is_tail_stack.len() + 2);
    let last_level = (ctx.level as usize) - 1;
    for (l, is_last) in ctx.is_tail_stack.iter().copied().enumerate() {
        let part = if l == last_level {
            if is_last {
                glyphs.branch_last
            } else {
                glyphs.branch
            }
        } else if is_last {
            glyphs.indent
        } else {
            glyphs.vert
        };
        spans.push(Span::styled(part, ctx.line_style));
    }
    spans.push(Span::raw(expander));
    spans.push(Span::raw(" "));
    Line::from(spans)
}
