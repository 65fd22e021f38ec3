use ratatui::layout::Rect;
use ratatui::style::Style;

use crate::model::{TreeModel, TreeRole};
use crate::painter::TagPainter;
use crate::style::{CellOption, TagDelegateStyle};
use crate::tags::{TagLabel, TagList, collect_tags};

/// Tag font size relative to the cell font.
pub const TAG_FONT_SCALE: (u16, u16) = (9, 10);

/// Paints a row cell as a run of tag chips followed by the row text.
///
/// Only the designated tag column produces chips; every other column is painted
/// as plain text.
#[derive(Clone, Copy, Debug, Default)]
pub struct TagDelegate {
    style: TagDelegateStyle,
    tag_column: usize,
}

impl TagDelegate {
    pub const fn new(style: TagDelegateStyle) -> Self {
        Self {
            style,
            tag_column: 0,
        }
    }

    /// Sets the column that carries tags.
    #[must_use]
    pub const fn tag_column(mut self, column: usize) -> Self {
        self.tag_column = column;
        self
    }

    pub const fn style(&self) -> &TagDelegateStyle {
        &self.style
    }

    /// Collects the row's tags if `column` is the tag column.
    pub fn tags_for<'m, T: TreeModel>(&self, model: &'m T, id: T::Id, column: usize) -> TagList<'m> {
        if column == self.tag_column {
            collect_tags(model, id)
        } else {
            TagList::new()
        }
    }

    /// Text style for the cell: highlighted only when selected in an active view.
    pub const fn text_style(&self, option: &CellOption) -> Style {
        if option.selected && option.active {
            self.style.highlighted_text
        } else {
            self.style.text
        }
    }

    /// Draws `tags` left to right from the cell's left edge, then `text` after them.
    ///
    /// With no tags this is a single plain text draw over the whole `rect`.
    pub fn draw<P: TagPainter + ?Sized>(
        &self,
        painter: &mut P,
        option: &CellOption,
        rect: Rect,
        text: &str,
        tags: &[TagLabel<'_>],
    ) {
        let metrics = self.style.metrics;
        let tag_font = option.font.scaled(TAG_FONT_SCALE.0, TAG_FONT_SCALE.1);
        let lead = metrics.padding / 2;
        let mut cursor = rect.x;

        for tag in tags {
            let width = painter
                .text_width(&tag.text, tag_font)
                .saturating_add(metrics.padding);
            let chip = Rect {
                x: cursor.saturating_add(metrics.inset),
                y: rect.y.saturating_add(metrics.inset),
                width,
                height: rect.height.saturating_sub(metrics.inset.saturating_mul(2)),
            }
            .intersection(rect);
            if chip.is_empty() {
                break;
            }

            let colors = self.style.palette.colors(tag.kind);
            painter.fill_rounded_rect(chip, colors.fill, colors.border);
            let label = Rect {
                x: chip.x.saturating_add(lead),
                width: chip.width.saturating_sub(lead),
                ..chip
            };
            painter.draw_text(label, &tag.text, tag_font, Style::new().fg(colors.text));

            cursor = cursor.saturating_add(width).saturating_add(metrics.gap);
        }

        if text.is_empty() {
            return;
        }
        let x = cursor.min(rect.right());
        let text_rect = Rect {
            x,
            width: rect.right() - x,
            ..rect
        };
        painter.draw_text(text_rect, text, option.font, self.text_style(option));
    }

    /// Reads the row's display text and tags for `column` and draws them into `rect`.
    pub fn paint<P, T>(
        &self,
        painter: &mut P,
        model: &T,
        id: T::Id,
        column: usize,
        option: &CellOption,
        rect: Rect,
    ) where
        P: TagPainter + ?Sized,
        T: TreeModel,
    {
        let text = model.data(id, TreeRole::Display).unwrap_or_default();
        let tags = self.tags_for(model, id, column);
        self.draw(painter, option, rect, &text, &tags);
    }
}
