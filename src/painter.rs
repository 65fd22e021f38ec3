use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use unicode_width::UnicodeWidthStr;

use crate::glyphs::TreeGlyphs;
use crate::style::Font;

const ELLIPSIS: &str = "…";

/// Drawing surface for tag chips and row text.
///
/// Coordinates are surface units: cells for terminals, pixels for raster backends.
pub trait TagPainter {
    /// Width of `text` rendered with `font`.
    fn text_width(&self, text: &str, font: Font) -> u16;
    /// Fills `area` and outlines it with rounded corners.
    fn fill_rounded_rect(&mut self, area: Rect, fill: Color, border: Color);
    /// Draws single-line, left-aligned text vertically centered in `area`,
    /// eliding the tail when it does not fit.
    fn draw_text(&mut self, area: Rect, text: &str, font: Font, style: Style);
}

/// [`TagPainter`] over a ratatui [`Buffer`]. Font sizes have no effect on a cell grid.
pub struct BufferPainter<'a> {
    buf: &'a mut Buffer,
    glyphs: TreeGlyphs<'a>,
}

impl<'a> BufferPainter<'a> {
    pub fn new(buf: &'a mut Buffer) -> Self {
        Self {
            buf,
            glyphs: TreeGlyphs::unicode(),
        }
    }

    #[must_use]
    pub const fn glyphs(mut self, glyphs: TreeGlyphs<'a>) -> Self {
        self.glyphs = glyphs;
        self
    }

    fn set_edge(&mut self, x: u16, area: Rect, symbol: &str, style: Style) {
        for y in area.top()..area.bottom() {
            if let Some(cell) = self.buf.cell_mut((x, y)) {
                cell.set_symbol(symbol).set_style(style);
            }
        }
    }
}

impl TagPainter for BufferPainter<'_> {
    fn text_width(&self, text: &str, _font: Font) -> u16 {
        u16::try_from(text.width()).unwrap_or(u16::MAX)
    }

    fn fill_rounded_rect(&mut self, area: Rect, fill: Color, border: Color) {
        let area = area.intersection(self.buf.area);
        if area.is_empty() {
            return;
        }
        self.buf.set_style(area, Style::new().bg(fill));
        if area.width < 2 {
            return;
        }
        let edge = Style::new().fg(border).bg(fill);
        let (left, right) = (self.glyphs.chip_left, self.glyphs.chip_right);
        self.set_edge(area.left(), area, left, edge);
        self.set_edge(area.right() - 1, area, right, edge);
    }

    fn draw_text(&mut self, area: Rect, text: &str, font: Font, style: Style) {
        let area = area.intersection(self.buf.area);
        if area.is_empty() || text.is_empty() {
            return;
        }
        let y = area.y + (area.height - 1) / 2;
        let max_width = usize::from(area.width);
        if usize::from(self.text_width(text, font)) <= max_width {
            self.buf.set_stringn(area.x, y, text, max_width, style);
            return;
        }
        let (x, _) = self
            .buf
            .set_stringn(area.x, y, text, max_width.saturating_sub(1), style);
        self.buf.set_stringn(x, y, ELLIPSIS, 1, style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_text(buf: &Buffer, y: u16) -> String {
        (buf.area.left()..buf.area.right())
            .map(|x| buf[(x, y)].symbol())
            .collect()
    }

    #[test]
    fn text_is_centered_vertically() {
        let area = Rect::new(0, 0, 6, 3);
        let mut buf = Buffer::empty(area);
        BufferPainter::new(&mut buf).draw_text(area, "abc", Font::default(), Style::new());

        assert_eq!(row_text(&buf, 0), "      ");
        assert_eq!(row_text(&buf, 1), "abc   ");
    }

    #[test]
    fn overflowing_text_is_elided() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 4, 1));
        BufferPainter::new(&mut buf).draw_text(
            Rect::new(0, 0, 4, 1),
            "abcdef",
            Font::default(),
            Style::new(),
        );

        assert_eq!(row_text(&buf, 0), "abc…");
    }

    #[test]
    fn chip_gets_fill_and_edges() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 5, 1));
        BufferPainter::new(&mut buf)
            .glyphs(TreeGlyphs::ascii())
            .fill_rounded_rect(Rect::new(1, 0, 3, 1), Color::Green, Color::LightGreen);

        assert_eq!(row_text(&buf, 0), " [ ] ");
        assert_eq!(buf[(2, 0)].bg, Color::Green);
        assert_eq!(buf[(1, 0)].fg, Color::LightGreen);
        assert_eq!(buf[(0, 0)].bg, Color::Reset);
    }

    #[test]
    fn drawing_outside_buffer_is_ignored() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 3, 1));
        let mut painter = BufferPainter::new(&mut buf);
        painter.fill_rounded_rect(Rect::new(10, 0, 3, 1), Color::Red, Color::Red);
        painter.draw_text(Rect::new(0, 5, 3, 1), "x", Font::default(), Style::new());

        assert_eq!(buf, Buffer::empty(Rect::new(0, 0, 3, 1)));
    }
}
