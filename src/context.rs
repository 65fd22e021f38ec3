use ratatui::style::Style;

/// Per-row layout facts used to draw the tree prefix.
#[derive(Clone, Copy)]
pub struct TreeRowContext<'a> {
    pub level: u16,
    pub is_tail_stack: &'a [bool],
    pub is_expanded: bool,
    pub has_children: bool,
    pub draw_lines: bool,
    pub line_style: Style,
}
