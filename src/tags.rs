use std::borrow::Cow;

use smallvec::SmallVec;

use crate::model::{TAG_SLOTS, TagKind, TreeModel, TreeRole};

/// A single colored label drawn before the row text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagLabel<'a> {
    pub kind: TagKind,
    pub text: Cow<'a, str>,
}

impl<'a> TagLabel<'a> {
    pub fn new(kind: TagKind, text: impl Into<Cow<'a, str>>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// Converts to an owned label detached from the model.
    pub fn into_owned(self) -> TagLabel<'static> {
        TagLabel {
            kind: self.kind,
            text: Cow::Owned(self.text.into_owned()),
        }
    }
}

/// Tag sequence of a single row.
pub type TagList<'a> = SmallVec<[TagLabel<'a>; 4]>;

/// Collects the row's labels: all informational slots first, then alerts.
///
/// Slots of each kind are read from index 0 up to [`TAG_SLOTS`]; the first unset
/// slot ends that kind even if later slots are populated.
pub fn collect_tags<T: TreeModel>(model: &T, id: T::Id) -> TagList<'_> {
    let mut tags = TagList::new();
    for kind in TagKind::ALL {
        for slot in 0..TAG_SLOTS {
            let Some(text) = model.data(id, TreeRole::Label { kind, slot }) else {
                break;
            };
            tags.push(TagLabel { kind, text });
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Row {
        info: [Option<&'static str>; TAG_SLOTS as usize],
        alert: [Option<&'static str>; TAG_SLOTS as usize],
        reads: Cell<usize>,
    }

    impl Row {
        fn new() -> Self {
            Self {
                info: [None; TAG_SLOTS as usize],
                alert: [None; TAG_SLOTS as usize],
                reads: Cell::new(0),
            }
        }
    }

    impl TreeModel for Row {
        type Id = ();
        type Key = ();

        fn root(&self) -> Option<Self::Id> {
            Some(())
        }

        fn children(&self, _id: Self::Id) -> &[Self::Id] {
            &[]
        }

        fn contains(&self, _id: Self::Id) -> bool {
            true
        }

        fn row_key(&self, _id: Self::Id) -> Self::Key {}

        fn data(&self, _id: Self::Id, role: TreeRole) -> Option<Cow<'_, str>> {
            self.reads.set(self.reads.get() + 1);
            match role {
                TreeRole::Label {
                    kind: TagKind::Info,
                    slot,
                } => self.info[usize::from(slot)].map(Cow::Borrowed),
                TreeRole::Label {
                    kind: TagKind::Alert,
                    slot,
                } => self.alert[usize::from(slot)].map(Cow::Borrowed),
                _ => None,
            }
        }
    }

    #[test]
    fn no_labels_yields_empty_list() {
        let row = Row::new();

        assert!(collect_tags(&row, ()).is_empty());
        assert_eq!(row.reads.get(), 2);
    }

    #[test]
    fn gap_terminates_collection_for_that_kind() {
        let mut row = Row::new();
        row.info[0] = Some("x");
        row.info[2] = Some("y");

        let tags = collect_tags(&row, ());

        assert_eq!(tags.as_slice(), &[TagLabel::new(TagKind::Info, "x")]);
    }

    #[test]
    fn info_labels_precede_alerts_in_slot_order() {
        let mut row = Row::new();
        row.alert[0] = Some("bug-12");
        row.info[0] = Some("v1.0");
        row.info[1] = Some("trunk");

        let tags = collect_tags(&row, ());

        assert_eq!(
            tags.as_slice(),
            &[
                TagLabel::new(TagKind::Info, "v1.0"),
                TagLabel::new(TagKind::Info, "trunk"),
                TagLabel::new(TagKind::Alert, "bug-12"),
            ]
        );
    }

    #[test]
    fn collection_is_bounded_by_slot_count() {
        let mut row = Row::new();
        row.info = [Some("t"); TAG_SLOTS as usize];

        let tags = collect_tags(&row, ());

        assert_eq!(tags.len(), usize::from(TAG_SLOTS));
        // Ten info reads plus the first (empty) alert slot.
        assert_eq!(row.reads.get(), usize::from(TAG_SLOTS) + 1);
    }
}
