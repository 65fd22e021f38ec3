pub use crate::{
    BufferPainter, CellOption, FilterError, FilterPattern, FilterVerdict, Font, NoFilter,
    TAG_SLOTS, TagColors, TagDelegate, TagDelegateStyle, TagKind, TagLabel, TagList, TagMetrics,
    TagPainter, TagPalette, TreeFilter, TreeFilterConfig, TreeGlyphs, TreeListView,
    TreeListViewSnapshot, TreeListViewState, TreeListViewStyle, TreeModel, TreeRole,
    TreeRowContext, TreeRowFilter, TreeScrollPolicy, check_unique_keys, collect_tags,
    tree_prefix_line,
};
