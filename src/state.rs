use std::hash::Hash;

use ratatui::widgets::TableState;
use rustc_hash::{FxBuildHasher, FxHashMap, FxHashSet};
use smallvec::SmallVec;
use tracing::trace;

use crate::filter::{TreeFilter, TreeFilterConfig};
use crate::model::TreeModel;
use crate::style::TreeScrollPolicy;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A visible node row with metadata used for rendering and navigation.
#[derive(Clone)]
pub struct VisibleNode<Id> {
    pub(crate) id: Id,
    pub(crate) level: u16,
    pub(crate) parent: Option<Id>,
    pub(crate) has_children: bool,
    // Children are listed right below this row.
    pub(crate) is_expanded: bool,
    pub(crate) is_tail_stack: SmallVec<[bool; 8]>,
}

/// View state: expanded nodes, selection, and the cached list of visible rows.
pub struct TreeListViewState<Id> {
    list_state: TableState,
    // Track expansion by (parent, id) to keep it tied to a specific path.
    expanded: FxHashSet<(Option<Id>, Id)>,
    // Cached visible rows to avoid recomputing DFS every render.
    visible_nodes: Vec<VisibleNode<Id>>,
    visible_index: FxHashMap<Id, usize>,
    dirty: bool,
    draw_lines: bool,
}

/// Snapshot of state (selection, expansion).
///
/// With the `serde` feature enabled, this type derives `Serialize`/`Deserialize`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug)]
pub struct TreeListViewSnapshot<Id> {
    /// Expanded nodes as `(parent, id)` pairs.
    pub expanded: Vec<(Option<Id>, Id)>,
    /// Selected row index in the visible list.
    pub selected: Option<usize>,
    /// Scroll offset within the visible list.
    pub offset: usize,
    /// Whether guide lines were enabled.
    pub draw_lines: bool,
}

impl<Id: Copy + Eq + Hash> Default for TreeListViewState<Id> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Id: Copy + Eq + Hash> TreeListViewState<Id> {
    /// Creates a new empty state with default capacity.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a state with preallocated capacity for the given number of nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            list_state: TableState::default(),
            expanded: FxHashSet::with_capacity_and_hasher(capacity, FxBuildHasher),
            visible_nodes: Vec::with_capacity(capacity),
            visible_index: FxHashMap::with_capacity_and_hasher(capacity, FxBuildHasher),
            dirty: true,
            draw_lines: true,
        }
    }

    pub(crate) fn visible_nodes(&self) -> &[VisibleNode<Id>] {
        &self.visible_nodes
    }

    pub(crate) const fn offset(&self) -> usize {
        self.list_state.offset()
    }

    /// Captures a snapshot of the current state for persistence or restore.
    pub fn snapshot(&self) -> TreeListViewSnapshot<Id> {
        TreeListViewSnapshot {
            expanded: self.expanded.iter().copied().collect(),
            selected: self.list_state.selected(),
            offset: self.list_state.offset(),
            draw_lines: self.draw_lines,
        }
    }

    /// Restores state from a previously captured snapshot.
    pub fn restore(&mut self, snapshot: TreeListViewSnapshot<Id>) {
        self.expanded = snapshot.expanded.into_iter().collect();
        self.draw_lines = snapshot.draw_lines;
        *self.list_state.offset_mut() = snapshot.offset;
        self.list_state.select(snapshot.selected);
        self.dirty = true;
    }

    /// Returns whether guide lines are drawn.
    #[inline]
    pub const fn draw_lines(&self) -> bool {
        self.draw_lines
    }

    /// Enables or disables drawing of guide lines.
    pub const fn set_draw_lines(&mut self, draw: bool) {
        self.draw_lines = draw;
    }

    /// Marks the visible-node cache as dirty (call after the model or filter changed).
    pub const fn invalidate(&mut self) {
        self.dirty = true;
    }

    /// Selects the first visible row.
    pub const fn select_first(&mut self) {
        self.list_state.select_first();
    }

    /// Selects the last visible row.
    pub const fn select_last(&mut self) {
        self.list_state.select_last();
    }

    /// Moves selection to the previous visible row.
    pub fn select_prev(&mut self) {
        if self.visible_nodes.is_empty() {
            self.list_state.select(None);
            return;
        }
        let selected = self.list_state.selected().unwrap_or(0);
        self.list_state.select(Some(selected.saturating_sub(1)));
    }

    /// Moves selection to the next visible row.
    pub fn select_next(&mut self) {
        if self.visible_nodes.is_empty() {
            self.list_state.select(None);
            return;
        }
        let next = self
            .list_state
            .selected()
            .map_or(0, |selected| selected + 1)
            .min(self.visible_nodes.len() - 1);
        self.list_state.select(Some(next));
    }

    /// Moves selection to the parent of the selected row, if it is visible.
    pub fn select_parent(&mut self) {
        let Some(parent_id) = self
            .list_state
            .selected()
            .and_then(|idx| self.visible_nodes.get(idx))
            .and_then(|node| node.parent)
        else {
            return;
        };
        if let Some(&parent_idx) = self.visible_index.get(&parent_id) {
            self.list_state.select(Some(parent_idx));
        }
    }

    /// Adjusts the scroll offset according to the scroll policy.
    pub fn ensure_selection_visible(&mut self, viewport_height: usize, policy: TreeScrollPolicy) {
        self.clamp_selection();
        let Some(selected) = self.list_state.selected() else {
            return;
        };
        let viewport_height = viewport_height.max(1);
        let offset = self.list_state.offset();
        let new_offset = match policy {
            TreeScrollPolicy::KeepInView if selected < offset => selected,
            TreeScrollPolicy::KeepInView if selected >= offset + viewport_height => {
                selected + 1 - viewport_height
            }
            TreeScrollPolicy::KeepInView => offset,
            TreeScrollPolicy::CenterOnSelect => {
                let max_offset = self.visible_nodes.len().saturating_sub(viewport_height);
                selected.saturating_sub(viewport_height / 2).min(max_offset)
            }
        };
        *self.list_state.offset_mut() = new_offset;
    }

    /// Returns the selected row index in the visible list.
    pub const fn selected(&self) -> Option<usize> {
        self.list_state.selected()
    }

    /// Returns the id of the currently selected node, if any.
    pub fn selected_id(&self) -> Option<Id> {
        self.list_state
            .selected()
            .and_then(|idx| self.visible_nodes.get(idx).map(|node| node.id))
    }

    /// Returns the number of visible nodes in the current view.
    pub const fn visible_len(&self) -> usize {
        self.visible_nodes.len()
    }

    /// Returns the ids of the visible rows in display order.
    pub fn visible_ids(&self) -> impl Iterator<Item = Id> + '_ {
        self.visible_nodes.iter().map(|node| node.id)
    }

    /// Toggles expansion of a node.
    pub fn toggle(&mut self, node_id: Id, parent: Option<Id>) {
        let key = (parent, node_id);
        if !self.expanded.remove(&key) {
            self.expanded.insert(key);
        }
        self.dirty = true;
    }

    /// Sets the expansion state of a node.
    pub fn set_expanded(&mut self, node_id: Id, parent: Option<Id>, expand: bool) {
        let key = (parent, node_id);
        if expand {
            self.expanded.insert(key);
        } else {
            self.expanded.remove(&key);
        }
        self.dirty = true;
    }

    /// Expands all nodes in the model.
    pub fn expand_all<T: TreeModel<Id = Id>>(&mut self, model: &T) {
        self.expanded.clear();
        self.expanded.reserve(model.size_hint());
        if let Some(root) = model.root() {
            let mut stack = Vec::with_capacity(model.size_hint().max(1));
            stack.push((None, root));
            while let Some((parent, node)) = stack.pop() {
                let children = model.children(node);
                if !children.is_empty() {
                    self.expanded.insert((parent, node));
                    stack.extend(children.iter().map(|&child| (Some(node), child)));
                }
            }
        }
        self.dirty = true;
    }

    /// Collapses all nodes.
    pub fn collapse_all(&mut self) {
        self.expanded.clear();
        self.dirty = true;
    }

    /// Ensures the visible node list is up to date (if marked dirty).
    pub fn ensure_visible_nodes<T: TreeModel<Id = Id>>(&mut self, model: &T) {
        if !self.dirty {
            return;
        }
        self.rebuild(model, None::<&crate::NoFilter>, TreeFilterConfig::disabled());
    }

    /// Ensures the visible node list is up to date with an active filter.
    ///
    /// Rows rejected by `filter` are skipped together with their subtrees.
    pub fn ensure_visible_nodes_filtered<T, F>(
        &mut self,
        model: &T,
        filter: &F,
        config: TreeFilterConfig,
    ) where
        T: TreeModel<Id = Id>,
        F: TreeFilter<T> + ?Sized,
    {
        if !self.dirty {
            return;
        }
        let filter = config.enabled.then_some(filter);
        self.rebuild(model, filter, config);
    }

    fn rebuild<T, F>(&mut self, model: &T, filter: Option<&F>, config: TreeFilterConfig)
    where
        T: TreeModel<Id = Id>,
        F: TreeFilter<T> + ?Sized,
    {
        self.visible_nodes.clear();
        self.visible_index.clear();
        self.visible_nodes.reserve(model.size_hint());
        if let Some(root) = model.root()
            && filter.is_none_or(|filter| filter.accepts(model, root))
        {
            let mut is_tail_stack: SmallVec<[bool; 8]> = SmallVec::new();
            self.build_visible_nodes(model, root, 0, None, &mut is_tail_stack, filter, config);
        }
        trace!(rows = self.visible_nodes.len(), filtered = filter.is_some(), "visible rows rebuilt");
        self.dirty = false;
        self.clamp_selection();
    }

    #[allow(clippy::too_many_arguments)]
    fn build_visible_nodes<T, F>(
        &mut self,
        model: &T,
        node_id: Id,
        level: u16,
        parent: Option<Id>,
        is_tail_stack: &mut SmallVec<[bool; 8]>,
        filter: Option<&F>,
        config: TreeFilterConfig,
    ) where
        T: TreeModel<Id = Id>,
        F: TreeFilter<T> + ?Sized,
    {
        let children = model.children(node_id);
        let has_children = !children.is_empty();
        let is_expanded = has_children
            && ((filter.is_some() && config.auto_expand)
                || self.expanded.contains(&(parent, node_id)));
        let idx = self.visible_nodes.len();
        self.visible_nodes.push(VisibleNode {
            id: node_id,
            level,
            parent,
            has_children,
            is_expanded,
            is_tail_stack: is_tail_stack.clone(),
        });
        self.visible_index.insert(node_id, idx);

        if !is_expanded {
            return;
        }

        let visible_children: SmallVec<[Id; 8]> = children
            .iter()
            .copied()
            .filter(|&child| filter.is_none_or(|filter| filter.accepts(model, child)))
            .collect();
        let last_idx = visible_children.len().saturating_sub(1);
        for (i, child) in visible_children.into_iter().enumerate() {
            is_tail_stack.push(i == last_idx);
            self.build_visible_nodes(
                model,
                child,
                level + 1,
                Some(node_id),
                is_tail_stack,
                filter,
                config,
            );
            is_tail_stack.pop();
        }
    }

    const fn clamp_selection(&mut self) {
        if self.visible_nodes.is_empty() {
            self.list_state.select(None);
            return;
        }

        if let Some(selected) = self.list_state.selected()
            && selected >= self.visible_nodes.len()
        {
            self.list_state
                .select(Some(self.visible_nodes.len().saturating_sub(1)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;

    use crate::filter::{FilterPattern, TreeRowFilter};
    use crate::model::TreeRole;

    struct TestTree {
        children: Vec<Vec<usize>>,
        names: Vec<&'static str>,
    }

    impl TestTree {
        fn new() -> Self {
            Self {
                children: vec![
                    vec![1, 2], // 0
                    vec![3, 4], // 1
                    vec![],     // 2
                    vec![],     // 3
                    vec![],     // 4
                ],
                names: vec!["root", "src", "readme", "lib.rs", "main.rs"],
            }
        }
    }

    impl TreeModel for TestTree {
        type Id = usize;
        type Key = usize;

        fn root(&self) -> Option<Self::Id> {
            Some(0)
        }

        fn children(&self, id: Self::Id) -> &[Self::Id] {
            &self.children[id]
        }

        fn contains(&self, id: Self::Id) -> bool {
            id < self.children.len()
        }

        fn row_key(&self, id: Self::Id) -> Self::Key {
            id
        }

        fn data(&self, id: Self::Id, role: TreeRole) -> Option<Cow<'_, str>> {
            (role == TreeRole::Display).then(|| Cow::Borrowed(self.names[id]))
        }
    }

    fn ids(state: &TreeListViewState<usize>) -> Vec<usize> {
        state.visible_ids().collect()
    }

    fn row_filter(pattern: &str) -> TreeRowFilter<usize> {
        let mut filter = TreeRowFilter::new();
        filter.set_pattern(FilterPattern::substring(pattern));
        filter
    }

    #[test]
    fn builds_visible_nodes_with_expansion() {
        let tree = TestTree::new();
        let mut state = TreeListViewState::<usize>::new();

        state.set_expanded(0, None, true);
        state.set_expanded(1, Some(0), true);
        state.ensure_visible_nodes(&tree);

        let levels: Vec<_> = state.visible_nodes.iter().map(|n| n.level).collect();
        assert_eq!(ids(&state), vec![0, 1, 3, 4, 2]);
        assert_eq!(levels, vec![0, 1, 2, 2, 1]);
    }

    #[test]
    fn filtered_view_keeps_matching_path() {
        let tree = TestTree::new();
        let mut state = TreeListViewState::<usize>::new();

        state.ensure_visible_nodes_filtered(&tree, &row_filter("main"), TreeFilterConfig::enabled());

        assert_eq!(ids(&state), vec![0, 1, 4]);
        assert_eq!(state.visible_nodes[2].is_tail_stack.as_slice(), &[true, true]);
    }

    #[test]
    fn filtered_view_respects_manual_expansion_without_auto_expand() {
        let tree = TestTree::new();
        let mut state = TreeListViewState::<usize>::new();
        let config = TreeFilterConfig {
            enabled: true,
            auto_expand: false,
        };
        state.set_expanded(0, None, true);

        state.ensure_visible_nodes_filtered(&tree, &row_filter("rs"), config);

        assert_eq!(ids(&state), vec![0, 1]);
    }

    #[test]
    fn disabled_config_ignores_filter() {
        let tree = TestTree::new();
        let mut state = TreeListViewState::<usize>::new();
        state.set_expanded(0, None, true);

        state.ensure_visible_nodes_filtered(
            &tree,
            &row_filter("absent"),
            TreeFilterConfig::disabled(),
        );

        assert_eq!(ids(&state), vec![0, 1, 2]);
    }

    #[test]
    fn filtered_view_without_matches_clears_selection() {
        let tree = TestTree::new();
        let mut state = TreeListViewState::<usize>::new();

        state.list_state.select(Some(0));
        state.ensure_visible_nodes_filtered(&tree, &row_filter("absent"), TreeFilterConfig::enabled());

        assert!(state.visible_nodes.is_empty());
        assert_eq!(state.selected(), None);
    }

    #[test]
    fn rebuild_only_when_dirty() {
        let tree = TestTree::new();
        let mut state = TreeListViewState::<usize>::new();
        state.ensure_visible_nodes(&tree);

        state.expanded.insert((None, 0));
        state.ensure_visible_nodes(&tree);
        assert_eq!(ids(&state), vec![0]);

        state.invalidate();
        state.ensure_visible_nodes(&tree);
        assert_eq!(ids(&state), vec![0, 1, 2]);
    }

    #[test]
    fn select_prev_clears_selection_when_empty() {
        let mut state = TreeListViewState::<usize>::new();
        state.list_state.select(Some(0));

        state.select_prev();

        assert_eq!(state.selected(), None);
    }

    #[test]
    fn navigation_moves_within_visible_rows() {
        let tree = TestTree::new();
        let mut state = TreeListViewState::<usize>::new();
        state.expand_all(&tree);
        state.ensure_visible_nodes(&tree);

        state.select_next();
        assert_eq!(state.selected_id(), Some(0));
        state.select_next();
        state.select_next();
        assert_eq!(state.selected_id(), Some(3));

        state.select_parent();
        assert_eq!(state.selected_id(), Some(1));

        for _ in 0..10 {
            state.select_next();
        }
        assert_eq!(state.selected_id(), Some(2));
    }

    #[test]
    fn keep_in_view_and_center_policies() {
        let tree = TestTree::new();
        let mut state = TreeListViewState::<usize>::new();
        state.expand_all(&tree);
        state.ensure_visible_nodes(&tree);
        state.list_state.select(Some(4));

        state.ensure_selection_visible(2, TreeScrollPolicy::KeepInView);
        assert_eq!(state.offset(), 3);

        state.list_state.select(Some(2));
        state.ensure_selection_visible(2, TreeScrollPolicy::CenterOnSelect);
        assert_eq!(state.offset(), 1);
    }

    #[test]
    fn snapshot_round_trip_restores_view() {
        let tree = TestTree::new();
        let mut state = TreeListViewState::<usize>::new();
        state.set_expanded(0, None, true);
        state.ensure_visible_nodes(&tree);
        state.list_state.select(Some(2));
        let snapshot = state.snapshot();

        let mut restored = TreeListViewState::<usize>::new();
        restored.restore(snapshot);
        restored.ensure_visible_nodes(&tree);

        assert_eq!(ids(&restored), vec![0, 1, 2]);
        assert_eq!(restored.selected_id(), Some(2));
    }

    #[test]
    fn toggle_and_collapse_all() {
        let tree = TestTree::new();
        let mut state = TreeListViewState::<usize>::new();

        state.toggle(0, None);
        state.ensure_visible_nodes(&tree);
        assert_eq!(ids(&state), vec![0, 1, 2]);

        state.collapse_all();
        state.ensure_visible_nodes(&tree);
        assert_eq!(ids(&state), vec![0]);
    }
}
