// Filter a small revision tree and paint tags before each message.
use std::borrow::Cow;

use ratatui::layout::Rect;
use ratatui::prelude::Buffer;
use ratatui::widgets::StatefulWidget;

use tui_treefilter::{
    FilterPattern, TagDelegate, TagKind, TreeFilterConfig, TreeListView, TreeListViewState,
    TreeListViewStyle, TreeModel, TreeRole, TreeRowFilter, check_unique_keys,
};

// Compare field holding the commit author.
const AUTHOR: TreeRole = TreeRole::Filter(0);

struct Revision {
    id: &'static str,
    message: &'static str,
    author: &'static str,
    tags: &'static [&'static str],
    bugs: &'static [&'static str],
    children: Vec<usize>,
}

// Merged revisions hang under the merge that brought them in.
struct Log {
    revisions: Vec<Revision>,
}

fn rev(
    id: &'static str,
    message: &'static str,
    author: &'static str,
    tags: &'static [&'static str],
    bugs: &'static [&'static str],
    children: Vec<usize>,
) -> Revision {
    Revision {
        id,
        message,
        author,
        tags,
        bugs,
        children,
    }
}

impl Log {
    fn new() -> Self {
        Self {
            revisions: vec![
                rev("r10", "Merge release branch", "ann", &["1.2"], &[], vec![1, 2]),
                rev("r9", "Fix crash on empty log", "bob", &[], &["lp:4211"], vec![3]),
                rev("r8", "Update translations", "ann", &[], &[], vec![]),
                rev("r7", "Guard against missing parent", "cyd", &["rc1"], &[], vec![]),
            ],
        }
    }
}

impl TreeModel for Log {
    type Id = usize;
    type Key = &'static str;

    fn root(&self) -> Option<Self::Id> {
        Some(0)
    }

    fn children(&self, id: Self::Id) -> &[Self::Id] {
        &self.revisions[id].children
    }

    fn contains(&self, id: Self::Id) -> bool {
        id < self.revisions.len()
    }

    fn row_key(&self, id: Self::Id) -> Self::Key {
        self.revisions[id].id
    }

    fn data(&self, id: Self::Id, role: TreeRole) -> Option<Cow<'_, str>> {
        let rev = &self.revisions[id];
        let text = match role {
            TreeRole::Display => Some(rev.message),
            AUTHOR => Some(rev.author),
            TreeRole::Label { kind: TagKind::Info, slot } => rev.tags.get(usize::from(slot)).copied(),
            TreeRole::Label { kind: TagKind::Alert, slot } => rev.bugs.get(usize::from(slot)).copied(),
            TreeRole::Filter(_) => None,
        };
        text.map(Cow::Borrowed)
    }
}

fn print(buffer: &Buffer) {
    for y in buffer.area.top()..buffer.area.bottom() {
        let line: String = (buffer.area.left()..buffer.area.right())
            .map(|x| buffer[(x, y)].symbol())
            .collect();
        println!("{line}");
    }
}

fn main() -> Result<(), tui_treefilter::FilterError> {
    let log = Log::new();
    check_unique_keys(&log)?;

    // Show only revisions by "cyd", keeping their ancestors visible.
    let mut filter = TreeRowFilter::<&str>::new().compare_role(AUTHOR);
    filter.set_pattern(FilterPattern::regex("^cy")?);

    let delegate = TagDelegate::default();
    let widget = TreeListView::new(&log, &delegate, TreeListViewStyle::default())
        .with_filter(&filter, TreeFilterConfig::enabled());

    let mut state = TreeListViewState::new();
    let area = Rect::new(0, 0, 48, 6);
    let mut buffer = Buffer::empty(area);
    widget.render(area, &mut buffer, &mut state);
    print(&buffer);

    Ok(())
}
