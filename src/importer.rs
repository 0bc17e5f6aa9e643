/// Import of native browser bookmark folders as groups
use log::{debug, info, warn};
use std::collections::HashMap;

use crate::error::HostError;
use crate::host::{BookmarkHostApi, BookmarkTreeNode};
use crate::ids::{generate_id, now_iso};
use crate::model::{Bookmark, BookmarkGroup, DEFAULT_GROUP_COLOR, Space};

pub const IMPORTED_FOLDER_NAME: &str = "Imported Folder";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub groups_added: usize,
    pub bookmarks_added: usize,
    pub folders_skipped: usize,
}

/// Accumulates groups while walking one or more folder trees
///
/// Every host folder becomes exactly one group, however many selected roots
/// reach it.
#[derive(Debug, Default)]
pub struct FolderImport {
    groups: Vec<BookmarkGroup>,
    // host folder id -> index into `groups`
    visited: HashMap<String, usize>,
    summary: ImportSummary,
}

impl FolderImport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk a selected root depth-first
    pub fn visit_root(&mut self, root: &BookmarkTreeNode) {
        self.visit(root, None);
    }

    /// Record a root whose subtree could not be fetched
    pub fn skip_root(&mut self) {
        self.summary.folders_skipped += 1;
    }

    fn visit(&mut self, node: &BookmarkTreeNode, target: Option<usize>) {
        match &node.url {
            Some(url) => {
                let Some(index) = target else {
                    debug!("Ignoring bookmark {} outside any folder", node.id);
                    return;
                };
                self.groups[index].bookmarks.push(Bookmark {
                    id: generate_id("bookmark"),
                    title: node.title.clone(),
                    url: url.clone(),
                    created_at: now_iso(),
                });
                self.summary.bookmarks_added += 1;
            }
            None => {
                if self.visited.contains_key(&node.id) {
                    debug!("Folder {} already imported", node.id);
                    return;
                }

                let name = if node.title.trim().is_empty() {
                    IMPORTED_FOLDER_NAME.to_string()
                } else {
                    node.title.clone()
                };
                let index = self.groups.len();
                self.groups.push(BookmarkGroup::new(
                    generate_id("group"),
                    name,
                    DEFAULT_GROUP_COLOR.to_string(),
                ));
                self.visited.insert(node.id.clone(), index);
                self.summary.groups_added += 1;

                for child in node.children() {
                    self.visit(child, Some(index));
                }
            }
        }
    }

    /// Groups in traversal order
    pub fn finish(self) -> (Vec<BookmarkGroup>, ImportSummary) {
        (self.groups, self.summary)
    }
}

/// Fetch each selected folder from the host and convert it
///
/// A folder that fails to load is skipped; the rest still import.
pub async fn collect_groups<H: BookmarkHostApi>(
    host: &H,
    folder_ids: &[String],
) -> (Vec<BookmarkGroup>, ImportSummary) {
    let mut import = FolderImport::new();

    for folder_id in folder_ids {
        match host.get_sub_tree(folder_id).await {
            Ok(root) => import.visit_root(&root),
            Err(e) => {
                warn!("Skipping bookmark folder {}: {}", folder_id, e);
                import.skip_root();
            }
        }
    }

    let (groups, summary) = import.finish();
    info!(
        "Imported {} folders with {} bookmarks ({} skipped)",
        summary.groups_added, summary.bookmarks_added, summary.folders_skipped
    );
    (groups, summary)
}

/// The host's folder tree without leaves, for the folder picker
pub async fn list_folders<H: BookmarkHostApi>(host: &H) -> Result<Vec<BookmarkTreeNode>, HostError> {
    let roots = host.get_tree().await?;

    // chrome.bookmarks.getTree() returns a single untitled root
    Ok(roots
        .iter()
        .flat_map(|root| {
            if root.title.is_empty() {
                root.children().to_vec()
            } else {
                vec![root.clone()]
            }
        })
        .filter(|node| node.is_folder())
        .map(|node| node.folders_only())
        .collect())
}

/// Copy of `spaces` with `groups` appended to the given space
pub fn append_groups(spaces: &[Space], space_id: &str, groups: Vec<BookmarkGroup>) -> Option<Vec<Space>> {
    let mut updated = spaces.to_vec();
    let space = updated.iter_mut().find(|s| s.id == space_id)?;
    space.groups.extend(groups);
    Some(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryBookmarks;
    use crate::model::default_spaces;
    use pollster::block_on;

    fn tree() -> BookmarkTreeNode {
        BookmarkTreeNode::folder(
            "0",
            "",
            vec![
                BookmarkTreeNode::folder(
                    "1",
                    "Bookmarks Bar",
                    vec![
                        BookmarkTreeNode::leaf("10", "Rust", "https://www.rust-lang.org"),
                        BookmarkTreeNode::folder(
                            "2",
                            "Docs",
                            vec![
                                BookmarkTreeNode::leaf("20", "MDN", "https://developer.mozilla.org"),
                                BookmarkTreeNode::leaf("21", "docs.rs", "https://docs.rs"),
                            ],
                        ),
                        BookmarkTreeNode::folder("3", "  ", vec![]),
                    ],
                ),
                BookmarkTreeNode::folder(
                    "4",
                    "Other Bookmarks",
                    vec![BookmarkTreeNode::leaf("40", "GitHub", "https://github.com")],
                ),
            ],
        )
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_each_folder_becomes_a_group() {
        let host = MemoryBookmarks::new(vec![tree()]);

        let (groups, summary) = block_on(collect_groups(&host, &ids(&["1"])));

        let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Bookmarks Bar", "Docs", IMPORTED_FOLDER_NAME]);
        assert_eq!(groups[0].bookmarks.len(), 1);
        assert_eq!(groups[1].bookmarks.len(), 2);
        assert!(groups.iter().all(|g| g.color == DEFAULT_GROUP_COLOR && g.is_expanded));
        assert_eq!(
            summary,
            ImportSummary {
                groups_added: 3,
                bookmarks_added: 3,
                folders_skipped: 0,
            }
        );
    }

    #[test]
    fn test_overlapping_roots_import_each_folder_once() {
        let host = MemoryBookmarks::new(vec![tree()]);

        // parent first, then its own child
        let (groups, _) = block_on(collect_groups(&host, &ids(&["1", "2"])));
        assert_eq!(groups.len(), 3);
        assert_eq!(groups.iter().filter(|g| g.name == "Docs").count(), 1);
        assert_eq!(groups[1].bookmarks.len(), 2);

        // child first, then its parent
        let (groups, _) = block_on(collect_groups(&host, &ids(&["2", "1"])));
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].name, "Docs");
        assert_eq!(groups[0].bookmarks.len(), 2);
    }

    #[test]
    fn test_failed_folder_is_skipped() {
        let host = MemoryBookmarks::new(vec![tree()]);

        let (groups, summary) = block_on(collect_groups(&host, &ids(&["missing", "4"])));

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "Other Bookmarks");
        assert_eq!(summary.folders_skipped, 1);
    }

    #[test]
    fn test_leaf_root_is_ignored() {
        let host = MemoryBookmarks::new(vec![tree()]);

        let (groups, summary) = block_on(collect_groups(&host, &ids(&["40"])));

        assert!(groups.is_empty());
        assert_eq!(summary.bookmarks_added, 0);
    }

    #[test]
    fn test_list_folders_unwraps_untitled_root() {
        let host = MemoryBookmarks::new(vec![tree()]);

        let folders = block_on(list_folders(&host)).unwrap();

        assert_eq!(folders.len(), 2);
        assert_eq!(folders[0].title, "Bookmarks Bar");
        assert_eq!(folders[0].children().len(), 2);
        assert!(folders[0].children().iter().all(|c| c.is_folder()));
    }

    #[test]
    fn test_append_groups() {
        let spaces = default_spaces();
        let groups = vec![BookmarkGroup::new("g".to_string(), "New".to_string(), DEFAULT_GROUP_COLOR.to_string())];

        let updated = append_groups(&spaces, "default", groups.clone()).unwrap();
        assert_eq!(updated[0].groups.len(), 2);
        assert_eq!(updated[0].groups[1].name, "New");

        assert!(append_groups(&spaces, "nope", groups).is_none());
    }
}
