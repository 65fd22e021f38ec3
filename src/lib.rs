//! Tree list view helpers for ratatui: a memoizing hierarchical row filter and a
//! row painter that draws colored tag chips before the row text.
//!
//! - [`TreeRowFilter`] keeps a row visible when it or any descendant matches a
//!   [`FilterPattern`], caching one verdict per row key until the pattern or the
//!   compared [`TreeRole`] changes.
//! - [`TagDelegate`] collects up to [`TAG_SLOTS`] labels of each [`TagKind`] and
//!   draws them through any [`TagPainter`] ([`BufferPainter`] for terminals).
//! - [`TreeListView`] composes both into a stateful widget.
//!
//! Feature flags:
//! - `serde`: serde support for styles, roles, and `TreeListViewSnapshot`.

mod context;
mod delegate;
mod error;
mod filter;
mod glyphs;
mod model;
mod painter;
pub mod prelude;
mod state;
mod style;
mod tags;
mod widget;

pub use context::TreeRowContext;
pub use delegate::{TAG_FONT_SCALE, TagDelegate};
pub use error::FilterError;
pub use filter::{
    FilterPattern, FilterVerdict, NoFilter, TreeFilter, TreeFilterConfig, TreeRowFilter,
    check_unique_keys,
};
pub use glyphs::{TreeGlyphs, tree_prefix_line};
pub use model::{TAG_SLOTS, TagKind, TreeModel, TreeRole};
pub use painter::{BufferPainter, TagPainter};
pub use state::{TreeListViewSnapshot, TreeListViewState};
pub use style::{
    CellOption, Font, TagColors, TagDelegateStyle, TagMetrics, TagPalette, TreeListViewStyle,
    TreeScrollPolicy,
};
pub use tags::{TagLabel, TagList, collect_tags};
pub use widget::TreeListView;
