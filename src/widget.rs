use ratatui::layout::Rect;
use ratatui::prelude::Buffer;
use ratatui::widgets::{
    Block, Borders, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget, Widget,
};

use crate::context::TreeRowContext;
use crate::delegate::TagDelegate;
use crate::filter::{NoFilter, TreeFilter, TreeFilterConfig};
use crate::glyphs::{TreeGlyphs, tree_prefix_line};
use crate::model::TreeModel;
use crate::painter::BufferPainter;
use crate::state::TreeListViewState;
use crate::style::{CellOption, Font, TreeListViewStyle};

/// Основной виджет дерева: строки рисуются через [`TagDelegate`].
pub struct TreeListView<'a, T, F: ?Sized = NoFilter>
where
    T: TreeModel,
    F: TreeFilter<T>,
{
    model: &'a T,
    delegate: &'a TagDelegate,
    style: TreeListViewStyle<'a>,
    glyphs: TreeGlyphs<'a>,
    font: Font,
    column: usize,
    filter: &'a F,
    filter_config: TreeFilterConfig,
}

impl<'a, T> TreeListView<'a, T, NoFilter>
where
    T: TreeModel,
{
    pub const fn new(model: &'a T, delegate: &'a TagDelegate, style: TreeListViewStyle<'a>) -> Self {
        Self {
            model,
            delegate,
            style,
            glyphs: TreeGlyphs::unicode(),
            font: Font::new(10.0),
            column: 0,
            filter: &NoFilter,
            filter_config: TreeFilterConfig::disabled(),
        }
    }

    pub fn with_filter<F>(
        self,
        filter: &'a F,
        filter_config: TreeFilterConfig,
    ) -> TreeListView<'a, T, F>
    where
        F: TreeFilter<T> + ?Sized,
    {
        TreeListView {
            model: self.model,
            delegate: self.delegate,
            style: self.style,
            glyphs: self.glyphs,
            font: self.font,
            column: self.column,
            filter,
            filter_config,
        }
    }
}

impl<'a, T, F> TreeListView<'a, T, F>
where
    T: TreeModel,
    F: TreeFilter<T> + ?Sized,
{
    #[must_use]
    pub const fn glyphs(mut self, glyphs: TreeGlyphs<'a>) -> Self {
        self.glyphs = glyphs;
        self
    }

    #[must_use]
    pub const fn font(mut self, font: Font) -> Self {
        self.font = font;
        self
    }

    /// Column index reported to the delegate (only its tag column shows chips).
    #[must_use]
    pub const fn column(mut self, column: usize) -> Self {
        self.column = column;
        self
    }

    fn render_rows(&self, area: Rect, buf: &mut Buffer, state: &TreeListViewState<T::Id>) {
        let nodes = state.visible_nodes();
        let start = state.offset().min(nodes.len());
        let end = (start + usize::from(area.height)).min(nodes.len());

        let selected_idx = state.selected();

        for (idx, (row, node)) in (area.y..area.bottom())
            .zip(&nodes[start..end])
            .enumerate()
        {
            let row_area = Rect {
                y: row,
                height: 1,
                ..area
            };
            let ctx = TreeRowContext {
                level: node.level,
                is_tail_stack: node.is_tail_stack.as_slice(),
                is_expanded: node.is_expanded,
                has_children: node.has_children,
                draw_lines: state.draw_lines(),
                line_style: self.style.line_style,
            };
            let selected = selected_idx == Some(start + idx);
            if selected {
                buf.set_style(row_area, self.style.highlight_style);
            }

            let prefix = tree_prefix_line(&ctx, &self.glyphs);
            let (x, _) = buf.set_line(row_area.x, row, &prefix, row_area.width);
            let cell = Rect {
                x,
                width: row_area.right().saturating_sub(x),
                ..row_area
            };
            let option = CellOption {
                font: self.font,
                selected,
                active: self.style.active,
            };
            let mut painter = BufferPainter::new(buf).glyphs(self.glyphs);
            self.delegate
                .paint(&mut painter, self.model, node.id, self.column, &option, cell);
        }
    }

    #[inline]
    fn render_scrollbar(
        area: Rect,
        buf: &mut Buffer,
        state: &TreeListViewState<T::Id>,
        inner_height: usize,
        scroll_rows: usize,
    ) {
        let scroll_len = scroll_rows.saturating_add(1);
        let position = state.offset().min(scroll_len.saturating_sub(1));
        let mut scrollbar_state = ScrollbarState::new(scroll_len)
            .position(position)
            .viewport_content_length(inner_height);
        Scrollbar::default()
            .orientation(ScrollbarOrientation::VerticalRight)
            .render(area, buf, &mut scrollbar_state);
    }
}

impl<T, F> StatefulWidget for TreeListView<'_, T, F>
where
    T: TreeModel,
    F: TreeFilter<T> + ?Sized,
{
    type State = TreeListViewState<T::Id>;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        state.ensure_visible_nodes_filtered(self.model, self.filter, self.filter_config);

        let mut block = Block::default().borders(self.style.borders);
        if let Some(title) = self.style.title.clone() {
            block = block.title(title);
        }
        block = block
            .style(self.style.block_style)
            .border_style(self.style.border_style);

        let inner = block.inner(area);
        let inner_height = usize::from(inner.height);
        state.ensure_selection_visible(inner_height, self.style.scroll_policy);
        let scroll_rows = state.visible_len().saturating_sub(inner_height);

        if scroll_rows > 0 {
            let mut borders = self.style.borders;
            borders.remove(Borders::RIGHT);
            let table_area = Rect {
                width: area.width.saturating_sub(1),
                ..area
            };
            let block = block.borders(borders);
            let rows_area = block.inner(table_area);
            block.render(table_area, buf);
            self.render_rows(rows_area, buf, state);

            let scrollbar_area = Rect {
                x: area.right().saturating_sub(1),
                width: 1,
                ..area
            };
            Self::render_scrollbar(scrollbar_area, buf, state, inner_height, scroll_rows);
        } else {
            block.render(area, buf);
            self.render_rows(inner, buf, state);
        }
    }
}
