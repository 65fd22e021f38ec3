use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::Borders;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::model::TagKind;

/// Политика скролла при изменении выбранной строки.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TreeScrollPolicy {
    KeepInView,
    CenterOnSelect,
}

/// Визуальные настройки виджета дерева.
#[derive(Clone)]
pub struct TreeListViewStyle<'a> {
    pub title: Option<Line<'a>>,
    pub block_style: Style,
    pub border_style: Style,
    pub highlight_style: Style,
    pub line_style: Style,
    pub borders: Borders,
    pub scroll_policy: TreeScrollPolicy,
    /// Whether the view has focus; selected rows use highlighted text only when active.
    pub active: bool,
}

impl Default for TreeListViewStyle<'_> {
    fn default() -> Self {
        Self {
            title: None,
            block_style: Style::default(),
            border_style: Style::default(),
            highlight_style: Style::new().add_modifier(Modifier::REVERSED),
            line_style: Style::default(),
            borders: Borders::ALL,
            scroll_policy: TreeScrollPolicy::KeepInView,
            active: true,
        }
    }
}

/// Font of a cell; terminal surfaces ignore the size.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Font {
    pub point_size: f32,
}

impl Font {
    pub const fn new(point_size: f32) -> Self {
        Self { point_size }
    }

    /// Returns the font scaled by `num / den`.
    #[must_use]
    pub fn scaled(self, num: u16, den: u16) -> Self {
        Self {
            point_size: self.point_size * f32::from(num) / f32::from(den.max(1)),
        }
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::new(10.0)
    }
}

/// Per-cell paint options supplied by the view.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CellOption {
    pub font: Font,
    pub selected: bool,
    /// The view owning the cell has focus.
    pub active: bool,
}

/// Colors of one tag kind.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TagColors {
    pub fill: Color,
    pub border: Color,
    pub text: Color,
}

/// Color scheme for every [`TagKind`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TagPalette {
    pub info: TagColors,
    pub alert: TagColors,
}

impl TagPalette {
    /// Green informational tags and red alerts on white text.
    pub const fn standard() -> Self {
        Self {
            info: TagColors {
                fill: Color::Rgb(80, 128, 32),
                border: Color::Rgb(56, 90, 22),
                text: Color::White,
            },
            alert: TagColors {
                fill: Color::Rgb(164, 0, 0),
                border: Color::Rgb(115, 0, 0),
                text: Color::White,
            },
        }
    }

    /// Named ANSI colors for terminals without true color.
    pub const fn ansi() -> Self {
        Self {
            info: TagColors {
                fill: Color::Green,
                border: Color::LightGreen,
                text: Color::Black,
            },
            alert: TagColors {
                fill: Color::Red,
                border: Color::LightRed,
                text: Color::White,
            },
        }
    }

    pub const fn colors(&self, kind: TagKind) -> TagColors {
        match kind {
            TagKind::Info => self.info,
            TagKind::Alert => self.alert,
        }
    }
}

impl Default for TagPalette {
    fn default() -> Self {
        Self::standard()
    }
}

/// Chip geometry in surface units.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TagMetrics {
    /// Added to the label text width; half goes before the text.
    pub padding: u16,
    /// Space between a chip and whatever follows it.
    pub gap: u16,
    /// Chip inset from the cell edges.
    pub inset: u16,
}

impl TagMetrics {
    /// One cell of padding on each side, no inset.
    pub const fn cells() -> Self {
        Self {
            padding: 2,
            gap: 1,
            inset: 0,
        }
    }

    /// Pixel geometry for raster surfaces.
    pub const fn pixels() -> Self {
        Self {
            padding: 6,
            gap: 2,
            inset: 1,
        }
    }
}

impl Default for TagMetrics {
    fn default() -> Self {
        Self::cells()
    }
}

/// Visual settings of [`TagDelegate`](crate::TagDelegate).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TagDelegateStyle {
    pub palette: TagPalette,
    pub metrics: TagMetrics,
    pub text: Style,
    pub highlighted_text: Style,
}

impl Default for TagDelegateStyle {
    fn default() -> Self {
        Self {
            palette: TagPalette::standard(),
            metrics: TagMetrics::cells(),
            text: Style::default(),
            highlighted_text: Style::new().add_modifier(Modifier::BOLD),
        }
    }
}
