/// Capabilities the browser provides: storage, native bookmarks and tabs.
///
/// The Chrome implementations live in `chrome.rs`. The in-memory versions
/// here stand in when the extension APIs are missing (a plain page, or
/// tests).
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cell::{Cell, RefCell};

use crate::error::HostError;
use crate::tabs::OpenTab;

/// A set of top-level storage keys and their values
pub type Record = Map<String, Value>;

/// Asynchronous key/value store (chrome.storage.local)
#[allow(async_fn_in_trait)]
pub trait StorageGateway {
    /// Read the given keys; absent keys are simply missing from the record
    async fn get(&self, keys: &[&str]) -> Result<Record, HostError>;

    /// Write every key in the record
    async fn set(&self, record: Record) -> Result<(), HostError>;
}

/// A node of the browser's native bookmark tree
///
/// Folders have `children` and no `url`; leaves have a `url`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookmarkTreeNode {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<BookmarkTreeNode>>,
}

impl BookmarkTreeNode {
    pub fn folder(id: &str, title: &str, children: Vec<BookmarkTreeNode>) -> Self {
        BookmarkTreeNode {
            id: id.to_string(),
            title: title.to_string(),
            url: None,
            children: Some(children),
        }
    }

    pub fn leaf(id: &str, title: &str, url: &str) -> Self {
        BookmarkTreeNode {
            id: id.to_string(),
            title: title.to_string(),
            url: Some(url.to_string()),
            children: None,
        }
    }

    pub fn is_folder(&self) -> bool {
        self.url.is_none()
    }

    pub fn children(&self) -> &[BookmarkTreeNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Find a node by id in this subtree
    pub fn find(&self, id: &str) -> Option<&BookmarkTreeNode> {
        if self.id == id {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find(id))
    }

    /// Copy of this subtree with every leaf removed
    pub fn folders_only(&self) -> BookmarkTreeNode {
        BookmarkTreeNode {
            id: self.id.clone(),
            title: self.title.clone(),
            url: None,
            children: Some(
                self.children()
                    .iter()
                    .filter(|c| c.is_folder())
                    .map(|c| c.folders_only())
                    .collect(),
            ),
        }
    }
}

/// The browser's native bookmark store (chrome.bookmarks)
#[allow(async_fn_in_trait)]
pub trait BookmarkHostApi {
    /// The subtree rooted at a folder
    async fn get_sub_tree(&self, folder_id: &str) -> Result<BookmarkTreeNode, HostError>;

    /// The whole tree, starting from the browser's root nodes
    async fn get_tree(&self) -> Result<Vec<BookmarkTreeNode>, HostError>;
}

/// Tab enumeration (chrome.tabs)
#[allow(async_fn_in_trait)]
pub trait TabHostApi {
    async fn current_window_tabs(&self) -> Result<Vec<OpenTab>, HostError>;
}

/// In-memory storage; starts empty
#[derive(Debug, Default)]
pub struct MemoryStorage {
    data: RefCell<Record>,
    fail_reads: Cell<bool>,
    fail_writes: Cell<bool>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: Record) -> Self {
        MemoryStorage {
            data: RefCell::new(record),
            fail_reads: Cell::new(false),
            fail_writes: Cell::new(false),
        }
    }

    /// Make every following `get` fail
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.set(fail);
    }

    /// Make every following `set` fail, to exercise error paths
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Snapshot of a stored value
    pub fn value(&self, key: &str) -> Option<Value> {
        self.data.borrow().get(key).cloned()
    }
}

impl StorageGateway for MemoryStorage {
    async fn get(&self, keys: &[&str]) -> Result<Record, HostError> {
        if self.fail_reads.get() {
            return Err(HostError::Storage("read rejected".to_string()));
        }
        let data = self.data.borrow();
        Ok(keys
            .iter()
            .filter_map(|key| data.get(*key).map(|v| (key.to_string(), v.clone())))
            .collect())
    }

    async fn set(&self, record: Record) -> Result<(), HostError> {
        if self.fail_writes.get() {
            return Err(HostError::Storage("write rejected".to_string()));
        }
        self.data.borrow_mut().extend(record);
        Ok(())
    }
}

/// In-memory bookmark tree
#[derive(Debug, Clone, Default)]
pub struct MemoryBookmarks {
    roots: Vec<BookmarkTreeNode>,
}

impl MemoryBookmarks {
    pub fn new(roots: Vec<BookmarkTreeNode>) -> Self {
        MemoryBookmarks { roots }
    }
}

impl BookmarkHostApi for MemoryBookmarks {
    async fn get_sub_tree(&self, folder_id: &str) -> Result<BookmarkTreeNode, HostError> {
        self.roots
            .iter()
            .find_map(|root| root.find(folder_id))
            .cloned()
            .ok_or_else(|| HostError::Bookmarks(format!("Can't find bookmark for id: {}", folder_id)))
    }

    async fn get_tree(&self) -> Result<Vec<BookmarkTreeNode>, HostError> {
        Ok(self.roots.clone())
    }
}

/// Fixed list of tabs, used when chrome.tabs is missing
#[derive(Debug, Clone, Default)]
pub struct MemoryTabs {
    tabs: Vec<OpenTab>,
}

impl MemoryTabs {
    /// A handful of tabs so the page has something to drag outside the extension
    pub fn sample() -> Self {
        let tabs = [
            (1, "Rust Documentation", "https://doc.rust-lang.org"),
            (2, "Yew", "https://yew.rs/docs"),
            (3, "MDN Web Docs", "https://developer.mozilla.org"),
            (4, "GitHub", "https://github.com"),
            (5, "crates.io", "https://crates.io"),
        ];
        MemoryTabs {
            tabs: tabs
                .iter()
                .map(|(id, title, url)| OpenTab::new(*id, title.to_string(), url.to_string()))
                .collect(),
        }
    }
}

impl TabHostApi for MemoryTabs {
    async fn current_window_tabs(&self) -> Result<Vec<OpenTab>, HostError> {
        Ok(self.tabs.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pollster::block_on;
    use serde_json::json;

    fn sample_tree() -> BookmarkTreeNode {
        BookmarkTreeNode::folder(
            "1",
            "Bookmarks Bar",
            vec![
                BookmarkTreeNode::leaf("2", "Rust", "https://www.rust-lang.org"),
                BookmarkTreeNode::folder(
                    "3",
                    "Docs",
                    vec![BookmarkTreeNode::leaf("4", "MDN", "https://developer.mozilla.org")],
                ),
            ],
        )
    }

    #[test]
    fn test_memory_storage_get_set() {
        let storage = MemoryStorage::new();
        let mut record = Record::new();
        record.insert("lastActiveSpace".to_string(), json!("space-1"));

        block_on(storage.set(record)).unwrap();
        let got = block_on(storage.get(&["lastActiveSpace", "spaces"])).unwrap();

        assert_eq!(got.len(), 1);
        assert_eq!(got["lastActiveSpace"], "space-1");
    }

    #[test]
    fn test_memory_storage_failing_writes() {
        let storage = MemoryStorage::new();
        storage.fail_writes(true);

        let result = block_on(storage.set(Record::new()));
        assert!(matches!(result, Err(HostError::Storage(_))));
    }

    #[test]
    fn test_tree_node_deserializes_chrome_shape() {
        let node: BookmarkTreeNode = serde_json::from_value(json!({
            "id": "1",
            "title": "Bookmarks Bar",
            "parentId": "0",
            "dateAdded": 1698508200000u64,
            "children": [{"id": "2", "title": "Rust", "url": "https://www.rust-lang.org"}]
        }))
        .unwrap();

        assert!(node.is_folder());
        assert_eq!(node.children().len(), 1);
        assert!(!node.children()[0].is_folder());
    }

    #[test]
    fn test_find_and_folders_only() {
        let tree = sample_tree();
        assert_eq!(tree.find("4").map(|n| n.title.as_str()), Some("MDN"));
        assert!(tree.find("99").is_none());

        let folders = tree.folders_only();
        assert_eq!(folders.children().len(), 1);
        assert_eq!(folders.children()[0].id, "3");
        assert!(folders.children()[0].children().is_empty());
    }

    #[test]
    fn test_memory_bookmarks_sub_tree() {
        let host = MemoryBookmarks::new(vec![sample_tree()]);

        let docs = block_on(host.get_sub_tree("3")).unwrap();
        assert_eq!(docs.title, "Docs");
        assert!(block_on(host.get_sub_tree("missing")).is_err());
    }
}
