use std::cell::RefCell;
use std::fmt::Debug;
use std::hash::Hash;

use regex::{Regex, RegexBuilder};
use rustc_hash::{FxBuildHasher, FxHashMap, FxHashSet};
use tracing::{debug, trace};

use crate::error::FilterError;
use crate::model::{TreeModel, TreeRole};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Row visibility seam used by [`TreeListViewState`](crate::TreeListViewState).
///
/// A row is visible when it matches or when any of its descendants does.
pub trait TreeFilter<T: TreeModel> {
    /// Returns `true` if the row should stay visible.
    fn accepts(&self, model: &T, id: T::Id) -> bool;
}

impl<T, F> TreeFilter<T> for F
where
    T: TreeModel,
    F: Fn(&T, T::Id) -> bool,
{
    #[inline]
    fn accepts(&self, model: &T, id: T::Id) -> bool {
        self(model, id)
    }
}

/// Filter that accepts every row.
#[derive(Clone, Copy, Debug)]
pub struct NoFilter;

impl<T: TreeModel> TreeFilter<T> for NoFilter {
    #[inline]
    fn accepts(&self, _model: &T, _id: T::Id) -> bool {
        true
    }
}

/// Configuration for filtered rendering.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug)]
pub struct TreeFilterConfig {
    /// Enables or disables filtering.
    pub enabled: bool,
    /// Auto-expands accepted rows when filtering.
    pub auto_expand: bool,
}

impl TreeFilterConfig {
    /// Creates a configuration with filtering disabled.
    pub const fn disabled() -> Self {
        Self {
            enabled: false,
            auto_expand: false,
        }
    }

    /// Creates a configuration with filtering enabled and auto-expansion.
    pub const fn enabled() -> Self {
        Self {
            enabled: true,
            auto_expand: true,
        }
    }
}

impl Default for TreeFilterConfig {
    fn default() -> Self {
        Self::disabled()
    }
}

/// Text matcher applied to the compare field of a row.
#[derive(Clone, Debug, Default)]
pub struct FilterPattern {
    matcher: Matcher,
}

#[derive(Clone, Debug, Default)]
enum Matcher {
    #[default]
    Empty,
    Substring {
        needle: String,
        // Lowercased needle when matching case-insensitively.
        folded: Option<String>,
    },
    Regex(Regex),
}

impl FilterPattern {
    /// Pattern that disables filtering.
    pub const fn empty() -> Self {
        Self {
            matcher: Matcher::Empty,
        }
    }

    /// Case-sensitive substring match.
    pub fn substring(needle: impl Into<String>) -> Self {
        let needle = needle.into();
        if needle.is_empty() {
            return Self::empty();
        }
        Self {
            matcher: Matcher::Substring {
                needle,
                folded: None,
            },
        }
    }

    /// Case-insensitive substring match.
    pub fn substring_ignore_case(needle: impl Into<String>) -> Self {
        let needle = needle.into();
        if needle.is_empty() {
            return Self::empty();
        }
        let folded = Some(needle.to_lowercase());
        Self {
            matcher: Matcher::Substring { needle, folded },
        }
    }

    /// Regular expression searched anywhere in the field.
    pub fn regex(source: &str) -> Result<Self, FilterError> {
        Self::build_regex(source, false)
    }

    /// Case-insensitive regular expression.
    pub fn regex_ignore_case(source: &str) -> Result<Self, FilterError> {
        Self::build_regex(source, true)
    }

    fn build_regex(source: &str, ignore_case: bool) -> Result<Self, FilterError> {
        if source.is_empty() {
            return Ok(Self::empty());
        }
        let regex = RegexBuilder::new(source)
            .case_insensitive(ignore_case)
            .build()
            .map_err(|source_err| FilterError::InvalidPattern {
                pattern: source.to_owned(),
                source: source_err,
            })?;
        debug!(pattern = source, ignore_case, "compiled filter regex");
        Ok(Self {
            matcher: Matcher::Regex(regex),
        })
    }

    /// Returns `true` if this pattern disables filtering.
    pub const fn is_empty(&self) -> bool {
        matches!(self.matcher, Matcher::Empty)
    }

    /// Returns the pattern source text.
    pub fn as_str(&self) -> &str {
        match &self.matcher {
            Matcher::Empty => "",
            Matcher::Substring { needle, .. } => needle,
            Matcher::Regex(regex) => regex.as_str(),
        }
    }

    /// Returns `true` if `haystack` contains the pattern.
    pub fn is_match(&self, haystack: &str) -> bool {
        match &self.matcher {
            Matcher::Empty => true,
            Matcher::Substring {
                needle,
                folded: None,
            } => haystack.contains(needle.as_str()),
            Matcher::Substring {
                folded: Some(folded),
                ..
            } => haystack.to_lowercase().contains(folded.as_str()),
            Matcher::Regex(regex) => regex.is_match(haystack),
        }
    }
}

/// Cached state of a single row under the current pattern and compare role.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterVerdict {
    /// Not evaluated since the last configuration change.
    Unknown,
    Accepted,
    Rejected,
}

/// Recursive, memoizing row filter for hierarchical models.
///
/// A row is accepted when its compare field contains the pattern or when any
/// descendant is accepted. Results are cached per [`TreeModel::Key`] until the
/// pattern or the compare role changes, so each row is evaluated at most once
/// per filter setting.
///
/// [`accepts`](Self::accepts) is a read with a memoizing side effect: it takes
/// `&self` and fills the cache through a `RefCell`. The filter is therefore not
/// `Sync` and is meant to be driven from the thread that renders the view.
pub struct TreeRowFilter<K> {
    pattern: FilterPattern,
    role: TreeRole,
    cache: RefCell<FxHashMap<K, bool>>,
}

impl<K: Clone + Eq + Hash> Default for TreeRowFilter<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone + Eq + Hash> TreeRowFilter<K> {
    /// Creates a filter with an empty pattern comparing against [`TreeRole::Display`].
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a filter with a preallocated cache.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pattern: FilterPattern::empty(),
            role: TreeRole::Display,
            cache: RefCell::new(FxHashMap::with_capacity_and_hasher(
                capacity,
                FxBuildHasher,
            )),
        }
    }

    /// Sets the compare role at construction time.
    #[must_use]
    pub const fn compare_role(mut self, role: TreeRole) -> Self {
        self.role = role;
        self
    }

    /// Returns the active pattern.
    pub const fn pattern(&self) -> &FilterPattern {
        &self.pattern
    }

    /// Returns the field compared against the pattern.
    pub const fn role(&self) -> TreeRole {
        self.role
    }

    /// Replaces the active pattern and clears the cache.
    pub fn set_pattern(&mut self, pattern: FilterPattern) {
        self.pattern = pattern;
        self.invalidate();
    }

    /// Replaces the compared field and clears the cache.
    pub fn set_compare_role(&mut self, role: TreeRole) {
        self.role = role;
        self.invalidate();
    }

    /// Drops every cached verdict (e.g. after the model changed).
    pub fn invalidate(&mut self) {
        let cache = self.cache.get_mut();
        trace!(entries = cache.len(), "filter cache cleared");
        cache.clear();
    }

    /// Returns the cached verdict for a row key.
    pub fn verdict(&self, key: &K) -> FilterVerdict {
        match self.cache.borrow().get(key) {
            None => FilterVerdict::Unknown,
            Some(true) => FilterVerdict::Accepted,
            Some(false) => FilterVerdict::Rejected,
        }
    }

    /// Returns the number of cached verdicts.
    pub fn cached_len(&self) -> usize {
        self.cache.borrow().len()
    }

    /// Returns `true` if the row or one of its descendants matches.
    ///
    /// Fails open: an empty pattern or a row the model does not contain is
    /// always accepted and never cached.
    pub fn accepts<T: TreeModel<Key = K>>(&self, model: &T, id: T::Id) -> bool {
        if self.pattern.is_empty() || !model.contains(id) {
            return true;
        }
        self.accepts_row(model, id)
    }

    fn accepts_row<T: TreeModel<Key = K>>(&self, model: &T, id: T::Id) -> bool {
        let key = model.row_key(id);
        if let Some(&cached) = self.cache.borrow().get(&key) {
            return cached;
        }

        // A missing field compares as empty text.
        let value = model.data(id, self.role);
        let accepted = self.pattern.is_match(value.as_deref().unwrap_or_default())
            || model
                .children(id)
                .iter()
                .copied()
                .take_while(|&child| model.contains(child))
                .any(|child| self.accepts_row(model, child));

        // Keyed on the row under evaluation, not on the matching descendant.
        self.cache.borrow_mut().insert(key, accepted);
        accepted
    }
}

impl<T: TreeModel> TreeFilter<T> for TreeRowFilter<T::Key> {
    #[inline]
    fn accepts(&self, model: &T, id: T::Id) -> bool {
        Self::accepts(self, model, id)
    }
}

/// Verifies that every row reachable from the root has a distinct key.
///
/// [`TreeRowFilter`] assumes unique keys and does not check them itself.
pub fn check_unique_keys<T>(model: &T) -> Result<(), FilterError>
where
    T: TreeModel,
    T::Key: Debug,
{
    let Some(root) = model.root() else {
        return Ok(());
    };
    let hint = model.size_hint().max(1);
    let mut seen = FxHashSet::with_capacity_and_hasher(hint, FxBuildHasher);
    let mut stack = Vec::with_capacity(hint);
    stack.push(root);
    while let Some(node) = stack.pop() {
        let key = model.row_key(node);
        if !seen.insert(key.clone()) {
            return Err(FilterError::DuplicateRowKey {
                key: format!("{key:?}"),
            });
        }
        stack.extend(model.children(node).iter().copied());
    }
    Ok(())
}
