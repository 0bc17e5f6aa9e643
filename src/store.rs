/// The bookmark collection and its mutation surface
///
/// Every mutation computes a new collection, swaps it in synchronously,
/// notifies listeners, and only then writes the whole `spaces` array to
/// storage. A failed write is logged and the in-memory change stays.
use log::{error, info, warn};
use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{BookmarkError, HostError};
use crate::host::{BookmarkHostApi, Record, StorageGateway};
use crate::ids::{generate_id, now_iso};
use crate::importer::{self, ImportSummary};
use crate::model::{
    Bookmark, BookmarkExport, BookmarkGroup, DEFAULT_GROUP_COLOR, DEFAULT_GROUP_NAME, NewBookmark, Space,
    default_spaces, validate_bookmark, validate_color, validate_name,
};
use crate::reconcile::{self, MergeSummary};
use crate::settings::AppSettings;
use crate::tabs::OpenTab;

pub const SPACES_KEY: &str = "spaces";
pub const LAST_ACTIVE_SPACE_KEY: &str = "lastActiveSpace";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    NotLoaded,
    Loaded,
}

/// Which way to move a group (up/down) or bookmark (left/right)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    fn target(self, index: usize, len: usize) -> Option<usize> {
        match self {
            Direction::Up | Direction::Left => index.checked_sub(1),
            Direction::Down | Direction::Right => Some(index + 1).filter(|i| *i < len),
        }
    }
}

type Listener = Rc<dyn Fn(&[Space], &str)>;

struct State {
    spaces: Vec<Space>,
    active_space_id: String,
    load: LoadState,
}

/// Shared handle to the collection; clones share the same state
pub struct BookmarkStore<S> {
    gateway: Rc<S>,
    state: Rc<RefCell<State>>,
    listeners: Rc<RefCell<Vec<Listener>>>,
}

impl<S> Clone for BookmarkStore<S> {
    fn clone(&self) -> Self {
        BookmarkStore {
            gateway: Rc::clone(&self.gateway),
            state: Rc::clone(&self.state),
            listeners: Rc::clone(&self.listeners),
        }
    }
}

impl<S> PartialEq for BookmarkStore<S> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

impl<S: StorageGateway> BookmarkStore<S> {
    pub fn new(gateway: Rc<S>) -> Self {
        let spaces = default_spaces();
        let active_space_id = spaces[0].id.clone();
        BookmarkStore {
            gateway,
            state: Rc::new(RefCell::new(State {
                spaces,
                active_space_id,
                load: LoadState::NotLoaded,
            })),
            listeners: Rc::new(RefCell::new(Vec::new())),
        }
    }

    // Reads

    pub fn spaces(&self) -> Vec<Space> {
        self.state.borrow().spaces.clone()
    }

    pub fn space(&self, space_id: &str) -> Option<Space> {
        self.state.borrow().spaces.iter().find(|s| s.id == space_id).cloned()
    }

    pub fn active_space_id(&self) -> String {
        self.state.borrow().active_space_id.clone()
    }

    /// The active space, falling back to the first one
    pub fn active_space(&self) -> Option<Space> {
        let state = self.state.borrow();
        state
            .spaces
            .iter()
            .find(|s| s.id == state.active_space_id)
            .or_else(|| state.spaces.first())
            .cloned()
    }

    /// Whether `hydrate` has succeeded; until then every mutation fails
    /// with `NotLoaded` so the defaults never overwrite stored spaces
    pub fn is_loaded(&self) -> bool {
        self.state.borrow().load == LoadState::Loaded
    }

    /// Call `listener` with the collection and active space id after every change
    pub fn subscribe(&self, listener: impl Fn(&[Space], &str) + 'static) {
        self.listeners.borrow_mut().push(Rc::new(listener));
    }

    // Loading

    /// Load spaces and the last active space from storage
    ///
    /// Without stored spaces the default collection stays. On a read
    /// failure the store stays unloaded.
    pub async fn hydrate(&self) -> Result<(), HostError> {
        let record = self.gateway.get(&[SPACES_KEY, LAST_ACTIVE_SPACE_KEY]).await?;

        {
            let mut state = self.state.borrow_mut();
            if let Some(spaces) = read_spaces(&record) {
                state.spaces = spaces;
            }

            let last_active = record.get(LAST_ACTIVE_SPACE_KEY).and_then(Value::as_str);
            state.active_space_id = match last_active {
                Some(id) if state.spaces.iter().any(|s| s.id == id) => id.to_string(),
                _ => state.spaces.first().map(|s| s.id.clone()).unwrap_or_default(),
            };
            state.load = LoadState::Loaded;
        }

        self.notify();
        Ok(())
    }

    /// Re-read spaces after another extension page changed them
    pub async fn refresh(&self) -> Result<(), HostError> {
        let record = self.gateway.get(&[SPACES_KEY]).await?;
        if let Some(spaces) = read_spaces(&record) {
            self.state.borrow_mut().spaces = spaces;
            self.notify();
        }
        Ok(())
    }

    // Spaces

    pub async fn set_active_space(&self, space_id: &str) -> Result<(), BookmarkError> {
        self.ensure_loaded()?;
        {
            let mut state = self.state.borrow_mut();
            if !state.spaces.iter().any(|s| s.id == space_id) {
                return Err(BookmarkError::SpaceNotFound(space_id.to_string()));
            }
            state.active_space_id = space_id.to_string();
        }
        self.notify();

        let mut record = Record::new();
        record.insert(LAST_ACTIVE_SPACE_KEY.to_string(), Value::String(space_id.to_string()));
        self.write(record).await;
        Ok(())
    }

    /// New space with one default group; it becomes the active space
    pub async fn create_space(&self, name: &str, color: &str) -> Result<Space, BookmarkError> {
        let space = Space {
            id: generate_id("space"),
            name: validate_name(name)?,
            color: validate_color(color)?,
            groups: vec![BookmarkGroup::new(
                generate_id("group"),
                DEFAULT_GROUP_NAME.to_string(),
                DEFAULT_GROUP_COLOR.to_string(),
            )],
        };

        self.modify(|spaces| {
            spaces.push(space.clone());
            Ok(())
        })?;
        self.state.borrow_mut().active_space_id = space.id.clone();
        self.notify();

        let mut record = self.spaces_record();
        record.insert(LAST_ACTIVE_SPACE_KEY.to_string(), Value::String(space.id.clone()));
        self.write(record).await;
        Ok(space)
    }

    pub async fn update_space(&self, updated: Space) -> Result<(), BookmarkError> {
        let updated = Space {
            name: validate_name(&updated.name)?,
            color: validate_color(&updated.color)?,
            ..updated
        };

        self.modify(|spaces| {
            let space = find_space(spaces, &updated.id)?;
            *space = updated;
            Ok(())
        })?;
        self.persist().await;
        Ok(())
    }

    /// Remove a space; the last remaining space can't go
    pub async fn delete_space(&self, space_id: &str) -> Result<(), BookmarkError> {
        self.modify(|spaces| {
            find_space(spaces, space_id)?;
            if spaces.len() == 1 {
                return Err(BookmarkError::LastSpace);
            }
            spaces.retain(|s| s.id != space_id);
            Ok(())
        })?;

        let active_moved = {
            let mut state = self.state.borrow_mut();
            if state.active_space_id == space_id {
                state.active_space_id = state.spaces[0].id.clone();
                true
            } else {
                false
            }
        };

        let mut record = self.spaces_record();
        if active_moved {
            self.notify();
            record.insert(LAST_ACTIVE_SPACE_KEY.to_string(), Value::String(self.active_space_id()));
        }
        self.write(record).await;
        Ok(())
    }

    // Groups

    pub async fn create_group(&self, space_id: &str, name: &str, color: &str) -> Result<BookmarkGroup, BookmarkError> {
        let group = BookmarkGroup::new(generate_id("group"), validate_name(name)?, validate_color(color)?);

        self.modify(|spaces| {
            find_space(spaces, space_id)?.groups.push(group.clone());
            Ok(())
        })?;
        self.persist().await;
        Ok(group)
    }

    pub async fn update_group(&self, space_id: &str, updated: BookmarkGroup) -> Result<(), BookmarkError> {
        let updated = BookmarkGroup {
            name: validate_name(&updated.name)?,
            color: validate_color(&updated.color)?,
            ..updated
        };

        self.modify(|spaces| {
            let group = find_group(find_space(spaces, space_id)?, &updated.id)?;
            *group = updated;
            Ok(())
        })?;
        self.persist().await;
        Ok(())
    }

    /// Delete a group and its bookmarks; confirmation is the caller's job
    pub async fn delete_group(&self, space_id: &str, group_id: &str) -> Result<(), BookmarkError> {
        self.modify(|spaces| {
            let space = find_space(spaces, space_id)?;
            find_group(space, group_id)?;
            space.groups.retain(|g| g.id != group_id);
            Ok(())
        })?;
        self.persist().await;
        Ok(())
    }

    /// Flip `isExpanded`; returns the new value
    pub async fn toggle_group(&self, space_id: &str, group_id: &str) -> Result<bool, BookmarkError> {
        let expanded = self.modify(|spaces| {
            let group = find_group(find_space(spaces, space_id)?, group_id)?;
            group.is_expanded = !group.is_expanded;
            Ok(group.is_expanded)
        })?;
        self.persist().await;
        Ok(expanded)
    }

    /// Swap a group with its neighbour; `false` when already at the edge
    pub async fn move_group(&self, space_id: &str, group_id: &str, direction: Direction) -> Result<bool, BookmarkError> {
        let moved = self.modify(|spaces| {
            let space = find_space(spaces, space_id)?;
            let index = space
                .groups
                .iter()
                .position(|g| g.id == group_id)
                .ok_or_else(|| BookmarkError::GroupNotFound(group_id.to_string()))?;
            Ok(swap(&mut space.groups, index, direction))
        })?;
        if moved {
            self.persist().await;
        }
        Ok(moved)
    }

    // Bookmarks

    pub async fn add_bookmark(
        &self,
        space_id: &str,
        group_id: &str,
        new: NewBookmark,
    ) -> Result<Bookmark, BookmarkError> {
        validate_bookmark(&new.title, &new.url)?;
        let bookmark = Bookmark {
            id: generate_id("bookmark"),
            title: new.title.trim().to_string(),
            url: new.url.trim().to_string(),
            created_at: new.created_at,
        };

        self.modify(|spaces| {
            find_group(find_space(spaces, space_id)?, group_id)?
                .bookmarks
                .push(bookmark.clone());
            Ok(())
        })?;
        self.persist().await;
        Ok(bookmark)
    }

    /// Bookmark an open tab dropped onto a group
    pub async fn bookmark_tab(&self, space_id: &str, group_id: &str, tab: &OpenTab) -> Result<Bookmark, BookmarkError> {
        let title = if tab.title.trim().is_empty() {
            tab.url.clone()
        } else {
            tab.title.clone()
        };
        self.add_bookmark(
            space_id,
            group_id,
            NewBookmark {
                title,
                url: tab.url.clone(),
                created_at: now_iso(),
            },
        )
        .await
    }

    pub async fn update_bookmark(&self, space_id: &str, group_id: &str, updated: Bookmark) -> Result<(), BookmarkError> {
        validate_bookmark(&updated.title, &updated.url)?;
        let updated = Bookmark {
            title: updated.title.trim().to_string(),
            url: updated.url.trim().to_string(),
            ..updated
        };

        self.modify(|spaces| {
            let group = find_group(find_space(spaces, space_id)?, group_id)?;
            let bookmark = group
                .bookmarks
                .iter_mut()
                .find(|b| b.id == updated.id)
                .ok_or_else(|| BookmarkError::BookmarkNotFound(updated.id.clone()))?;
            *bookmark = updated;
            Ok(())
        })?;
        self.persist().await;
        Ok(())
    }

    /// Delete a bookmark; confirmation is the caller's job
    pub async fn delete_bookmark(&self, space_id: &str, group_id: &str, bookmark_id: &str) -> Result<(), BookmarkError> {
        self.modify(|spaces| {
            let group = find_group(find_space(spaces, space_id)?, group_id)?;
            if !group.bookmarks.iter().any(|b| b.id == bookmark_id) {
                return Err(BookmarkError::BookmarkNotFound(bookmark_id.to_string()));
            }
            group.bookmarks.retain(|b| b.id != bookmark_id);
            Ok(())
        })?;
        self.persist().await;
        Ok(())
    }

    /// Swap a bookmark with its neighbour; `false` when already at the edge
    pub async fn move_bookmark(
        &self,
        space_id: &str,
        group_id: &str,
        bookmark_id: &str,
        direction: Direction,
    ) -> Result<bool, BookmarkError> {
        let moved = self.modify(|spaces| {
            let group = find_group(find_space(spaces, space_id)?, group_id)?;
            let index = group
                .bookmarks
                .iter()
                .position(|b| b.id == bookmark_id)
                .ok_or_else(|| BookmarkError::BookmarkNotFound(bookmark_id.to_string()))?;
            Ok(swap(&mut group.bookmarks, index, direction))
        })?;
        if moved {
            self.persist().await;
        }
        Ok(moved)
    }

    // Import / export

    /// Merge an import document into the collection and persist it
    ///
    /// An invalid document leaves the collection untouched.
    pub async fn import_document(&self, incoming: &Value) -> Result<MergeSummary, BookmarkError> {
        self.ensure_loaded()?;
        let spaces = reconcile::validate(incoming)?;
        let (merged, summary) = reconcile::merge(&self.spaces(), spaces);

        self.replace(merged);
        self.persist().await;
        info!(
            "Import added {} spaces, {} groups, {} bookmarks ({} duplicates skipped)",
            summary.spaces_added, summary.groups_added, summary.bookmarks_added, summary.duplicates_skipped
        );
        Ok(summary)
    }

    /// Import native bookmark folders into a space as new groups
    ///
    /// A missing host API, an unloaded store or an unknown space is a no-op.
    pub async fn import_folders<H: BookmarkHostApi>(
        &self,
        host: Option<&H>,
        folder_ids: &[String],
        space_id: &str,
    ) -> ImportSummary {
        let Some(host) = host else {
            warn!("Bookmarks API not available");
            return ImportSummary::default();
        };
        if !self.is_loaded() {
            warn!("Not importing folders before bookmarks are loaded");
            return ImportSummary::default();
        }
        if self.space(space_id).is_none() {
            warn!("Not importing folders into unknown space {}", space_id);
            return ImportSummary::default();
        }

        let (groups, summary) = importer::collect_groups(host, folder_ids).await;

        // the space may have been deleted while the folders were fetched
        match importer::append_groups(&self.spaces(), space_id, groups) {
            Some(updated) => {
                self.replace(updated);
                self.persist().await;
                summary
            }
            None => {
                warn!("Space {} disappeared during folder import", space_id);
                ImportSummary::default()
            }
        }
    }

    pub fn export(&self, settings: &AppSettings) -> BookmarkExport {
        reconcile::export(&self.state.borrow().spaces, settings)
    }

    // Internals

    /// Apply `change` to a copy of the collection and swap it in on success
    fn modify<T>(&self, change: impl FnOnce(&mut Vec<Space>) -> Result<T, BookmarkError>) -> Result<T, BookmarkError> {
        self.ensure_loaded()?;
        let mut spaces = self.spaces();
        let result = change(&mut spaces)?;
        self.replace(spaces);
        Ok(result)
    }

    fn ensure_loaded(&self) -> Result<(), BookmarkError> {
        if self.is_loaded() {
            Ok(())
        } else {
            Err(BookmarkError::NotLoaded)
        }
    }

    fn replace(&self, spaces: Vec<Space>) {
        self.state.borrow_mut().spaces = spaces;
        self.notify();
    }

    fn notify(&self) {
        let (spaces, active_space_id) = (self.spaces(), self.active_space_id());
        let listeners: Vec<Listener> = self.listeners.borrow().iter().cloned().collect();
        for listener in listeners {
            listener(&spaces, &active_space_id);
        }
    }

    fn spaces_record(&self) -> Record {
        let mut record = Record::new();
        match serde_json::to_value(&self.state.borrow().spaces) {
            Ok(value) => {
                record.insert(SPACES_KEY.to_string(), value);
            }
            Err(e) => error!("Failed to serialize spaces: {}", e),
        }
        record
    }

    async fn persist(&self) {
        let record = self.spaces_record();
        self.write(record).await;
    }

    async fn write(&self, record: Record) {
        if record.is_empty() {
            return;
        }
        if let Err(e) = self.gateway.set(record).await {
            error!("Failed to save bookmarks: {}", e);
        }
    }
}

fn read_spaces(record: &Record) -> Option<Vec<Space>> {
    let value = record.get(SPACES_KEY)?;
    match serde_json::from_value(value.clone()) {
        Ok(spaces) => Some(spaces),
        Err(e) => {
            error!("Ignoring unreadable stored spaces: {}", e);
            None
        }
    }
}

fn find_space<'a>(spaces: &'a mut [Space], space_id: &str) -> Result<&'a mut Space, BookmarkError> {
    spaces
        .iter_mut()
        .find(|s| s.id == space_id)
        .ok_or_else(|| BookmarkError::SpaceNotFound(space_id.to_string()))
}

fn find_group<'a>(space: &'a mut Space, group_id: &str) -> Result<&'a mut BookmarkGroup, BookmarkError> {
    space
        .group_mut(group_id)
        .ok_or_else(|| BookmarkError::GroupNotFound(group_id.to_string()))
}

fn swap<T>(items: &mut [T], index: usize, direction: Direction) -> bool {
    match direction.target(index, items.len()) {
        Some(other) => {
            items.swap(index, other);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{BookmarkTreeNode, MemoryBookmarks, MemoryStorage};
    use crate::model::DEFAULT_SPACE_COLOR;
    use pollster::block_on;
    use serde_json::json;
    use std::cell::Cell;

    fn setup() -> (Rc<MemoryStorage>, BookmarkStore<MemoryStorage>) {
        let storage = Rc::new(MemoryStorage::new());
        let store = BookmarkStore::new(Rc::clone(&storage));
        block_on(store.hydrate()).unwrap();
        (storage, store)
    }

    fn stored_spaces(storage: &MemoryStorage) -> Vec<Space> {
        serde_json::from_value(storage.value(SPACES_KEY).unwrap()).unwrap()
    }

    fn new_bookmark(title: &str, url: &str) -> NewBookmark {
        NewBookmark {
            title: title.to_string(),
            url: url.to_string(),
            created_at: "2024-10-28T10:30:00.000Z".to_string(),
        }
    }

    #[test]
    fn test_hydrate_empty_storage_uses_defaults() {
        let (_, store) = setup();

        assert!(store.is_loaded());
        assert_eq!(store.spaces(), default_spaces());
        assert_eq!(store.active_space_id(), "default");
    }

    #[test]
    fn test_not_loaded_before_hydrate() {
        let storage = Rc::new(MemoryStorage::new());
        let store = BookmarkStore::new(Rc::clone(&storage));

        assert!(!store.is_loaded());
        assert_eq!(
            block_on(store.create_group("default", "Docs", "#3B82F6")),
            Err(BookmarkError::NotLoaded)
        );
        assert_eq!(block_on(store.set_active_space("default")), Err(BookmarkError::NotLoaded));
        assert_eq!(store.spaces(), default_spaces());
        assert!(storage.value(SPACES_KEY).is_none());
        assert!(storage.value(LAST_ACTIVE_SPACE_KEY).is_none());
    }

    fn stored_work_space() -> Record {
        let mut record = Record::new();
        record.insert(
            SPACES_KEY.to_string(),
            json!([{"id": "s1", "name": "Work", "color": "#EF4444", "groups": [
                {"id": "g1", "name": "Docs", "color": "#3B82F6", "bookmarks": []}
            ]}]),
        );
        record
    }

    #[test]
    fn test_failed_hydrate_keeps_stored_spaces() {
        let storage = Rc::new(MemoryStorage::with_record(stored_work_space()));
        storage.fail_reads(true);
        let store = BookmarkStore::new(Rc::clone(&storage));

        assert!(block_on(store.hydrate()).is_err());
        assert!(!store.is_loaded());

        assert_eq!(
            block_on(store.create_group("default", "Docs", "#3B82F6")),
            Err(BookmarkError::NotLoaded)
        );
        assert_eq!(
            block_on(store.add_bookmark("default", "default", new_bookmark("Rust", "https://www.rust-lang.org"))),
            Err(BookmarkError::NotLoaded)
        );
        assert_eq!(block_on(store.create_space("Home", "#10B981")).map(|_| ()), Err(BookmarkError::NotLoaded));
        assert_eq!(block_on(store.delete_space("default")), Err(BookmarkError::NotLoaded));
        let document = json!({"version": "1.0", "spaces": []});
        assert_eq!(block_on(store.import_document(&document)).map(|_| ()), Err(BookmarkError::NotLoaded));

        let ids: Vec<String> = stored_spaces(&storage).into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["s1".to_string()]);
    }

    #[test]
    fn test_hydrate_retry_after_failure() {
        let storage = Rc::new(MemoryStorage::with_record(stored_work_space()));
        storage.fail_reads(true);
        let store = BookmarkStore::new(Rc::clone(&storage));
        assert!(block_on(store.hydrate()).is_err());

        storage.fail_reads(false);
        block_on(store.hydrate()).unwrap();
        assert!(store.is_loaded());
        assert_eq!(store.active_space_id(), "s1");

        block_on(store.create_group("s1", "Reading", "#10B981")).unwrap();
        let stored = stored_spaces(&storage);
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].groups.len(), 2);
    }

    #[test]
    fn test_import_folders_before_hydrate_is_noop() {
        let storage = Rc::new(MemoryStorage::new());
        let store = BookmarkStore::new(Rc::clone(&storage));
        let host = MemoryBookmarks::new(vec![BookmarkTreeNode::folder(
            "1",
            "Bar",
            vec![BookmarkTreeNode::leaf("2", "Rust", "https://www.rust-lang.org")],
        )]);

        let summary = block_on(store.import_folders(Some(&host), &["1".to_string()], "default"));

        assert_eq!(summary, ImportSummary::default());
        assert!(storage.value(SPACES_KEY).is_none());
    }

    #[test]
    fn test_hydrate_reads_stored_state() {
        let mut record = Record::new();
        record.insert(
            SPACES_KEY.to_string(),
            json!([
                {"id": "s1", "name": "Work", "color": "#EF4444", "groups": []},
                {"id": "s2", "name": "Home", "color": "#10B981", "groups": []}
            ]),
        );
        record.insert(LAST_ACTIVE_SPACE_KEY.to_string(), json!("s2"));
        let store = BookmarkStore::new(Rc::new(MemoryStorage::with_record(record)));

        block_on(store.hydrate()).unwrap();

        assert_eq!(store.spaces().len(), 2);
        assert_eq!(store.active_space().unwrap().name, "Home");
    }

    #[test]
    fn test_hydrate_unknown_last_active_falls_back_to_first() {
        let mut record = Record::new();
        record.insert(
            SPACES_KEY.to_string(),
            json!([{"id": "s1", "name": "Work", "color": "#EF4444", "groups": []}]),
        );
        record.insert(LAST_ACTIVE_SPACE_KEY.to_string(), json!("gone"));
        let store = BookmarkStore::new(Rc::new(MemoryStorage::with_record(record)));

        block_on(store.hydrate()).unwrap();

        assert_eq!(store.active_space_id(), "s1");
    }

    #[test]
    fn test_create_space() {
        let (storage, store) = setup();

        let space = block_on(store.create_space("  Work ", "#EF4444")).unwrap();

        assert_eq!(space.name, "Work");
        assert_eq!(space.groups.len(), 1);
        assert_eq!(space.groups[0].name, DEFAULT_GROUP_NAME);
        assert_eq!(store.active_space_id(), space.id);
        assert_eq!(stored_spaces(&storage).len(), 2);
        assert_eq!(storage.value(LAST_ACTIVE_SPACE_KEY), Some(json!(space.id)));
    }

    #[test]
    fn test_create_space_rejects_bad_input() {
        let (storage, store) = setup();

        assert!(matches!(
            block_on(store.create_space("   ", "#EF4444")),
            Err(BookmarkError::InvalidName(_))
        ));
        assert!(matches!(
            block_on(store.create_space(&"x".repeat(31), "#EF4444")),
            Err(BookmarkError::InvalidName(_))
        ));
        assert!(matches!(
            block_on(store.create_space("Work", "red")),
            Err(BookmarkError::InvalidColor(_))
        ));
        assert_eq!(store.spaces().len(), 1);
        assert!(storage.value(SPACES_KEY).is_none());
    }

    #[test]
    fn test_update_space() {
        let (storage, store) = setup();
        let mut space = store.space("default").unwrap();
        space.name = "Renamed".to_string();

        block_on(store.update_space(space)).unwrap();

        assert_eq!(store.space("default").unwrap().name, "Renamed");
        assert_eq!(stored_spaces(&storage)[0].name, "Renamed");
        assert_eq!(stored_spaces(&storage)[0].color, DEFAULT_SPACE_COLOR);
    }

    #[test]
    fn test_delete_space() {
        let (_, store) = setup();
        assert_eq!(block_on(store.delete_space("default")), Err(BookmarkError::LastSpace));

        let work = block_on(store.create_space("Work", "#EF4444")).unwrap();
        block_on(store.delete_space(&work.id)).unwrap();

        assert_eq!(store.spaces().len(), 1);
        assert_eq!(store.active_space_id(), "default");
        assert_eq!(
            block_on(store.delete_space("nope")),
            Err(BookmarkError::SpaceNotFound("nope".to_string()))
        );
    }

    #[test]
    fn test_set_active_space() {
        let (storage, store) = setup();
        let work = block_on(store.create_space("Work", "#EF4444")).unwrap();

        block_on(store.set_active_space("default")).unwrap();

        assert_eq!(store.active_space_id(), "default");
        assert_eq!(storage.value(LAST_ACTIVE_SPACE_KEY), Some(json!("default")));
        assert!(block_on(store.set_active_space("missing")).is_err());
        assert_ne!(work.id, "default");
    }

    #[test]
    fn test_group_lifecycle() {
        let (storage, store) = setup();

        let group = block_on(store.create_group("default", "Reading", "#10B981")).unwrap();
        assert!(group.is_expanded);
        assert_eq!(store.space("default").unwrap().groups.len(), 2);

        let mut renamed = group.clone();
        renamed.name = "Later".to_string();
        block_on(store.update_group("default", renamed)).unwrap();
        assert_eq!(store.space("default").unwrap().groups[1].name, "Later");

        assert!(!block_on(store.toggle_group("default", &group.id)).unwrap());

        block_on(store.delete_group("default", &group.id)).unwrap();
        assert_eq!(store.space("default").unwrap().groups.len(), 1);
        assert_eq!(stored_spaces(&storage)[0].groups.len(), 1);
    }

    #[test]
    fn test_group_errors() {
        let (_, store) = setup();

        assert_eq!(
            block_on(store.create_group("missing", "Reading", "#10B981")),
            Err(BookmarkError::SpaceNotFound("missing".to_string()))
        );
        assert_eq!(
            block_on(store.delete_group("default", "missing")),
            Err(BookmarkError::GroupNotFound("missing".to_string()))
        );
    }

    #[test]
    fn test_move_group() {
        let (_, store) = setup();
        let second = block_on(store.create_group("default", "Second", "#10B981")).unwrap();

        assert!(!block_on(store.move_group("default", &second.id, Direction::Down)).unwrap());
        assert!(block_on(store.move_group("default", &second.id, Direction::Up)).unwrap());

        let order: Vec<String> = store.space("default").unwrap().groups.iter().map(|g| g.id.clone()).collect();
        assert_eq!(order, vec![second.id.clone(), "default".to_string()]);
    }

    #[test]
    fn test_bookmark_lifecycle() {
        let (storage, store) = setup();

        let added = block_on(store.add_bookmark("default", "default", new_bookmark("Rust", "https://www.rust-lang.org"))).unwrap();
        assert!(added.id.starts_with("bookmark-"));
        assert_eq!(stored_spaces(&storage)[0].groups[0].bookmarks.len(), 1);

        let mut edited = added.clone();
        edited.title = "  The Rust Language ".to_string();
        edited.url = " https://doc.rust-lang.org  ".to_string();
        block_on(store.update_bookmark("default", "default", edited)).unwrap();
        let stored = &stored_spaces(&storage)[0].groups[0].bookmarks[0];
        assert_eq!(stored.title, "The Rust Language");
        assert_eq!(stored.url, "https://doc.rust-lang.org");
        assert_eq!(stored.id, added.id);

        block_on(store.delete_bookmark("default", "default", &added.id)).unwrap();
        assert!(store.space("default").unwrap().groups[0].bookmarks.is_empty());
        assert_eq!(
            block_on(store.delete_bookmark("default", "default", &added.id)),
            Err(BookmarkError::BookmarkNotFound(added.id.clone()))
        );
    }

    #[test]
    fn test_add_bookmark_validates() {
        let (_, store) = setup();

        assert_eq!(
            block_on(store.add_bookmark("default", "default", new_bookmark("", "https://a.com"))),
            Err(BookmarkError::InvalidTitle)
        );
        assert!(matches!(
            block_on(store.add_bookmark("default", "default", new_bookmark("A", "a.com"))),
            Err(BookmarkError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_move_bookmark() {
        let (_, store) = setup();
        let a = block_on(store.add_bookmark("default", "default", new_bookmark("A", "https://a.com"))).unwrap();
        let b = block_on(store.add_bookmark("default", "default", new_bookmark("B", "https://b.com"))).unwrap();

        assert!(!block_on(store.move_bookmark("default", "default", &a.id, Direction::Left)).unwrap());
        assert!(block_on(store.move_bookmark("default", "default", &a.id, Direction::Right)).unwrap());

        let order: Vec<String> = store.space("default").unwrap().groups[0]
            .bookmarks
            .iter()
            .map(|b| b.id.clone())
            .collect();
        assert_eq!(order, vec![b.id, a.id]);
    }

    #[test]
    fn test_bookmark_tab() {
        let (_, store) = setup();
        let tab = OpenTab::new(3, String::new(), "https://crates.io".to_string());

        let bookmark = block_on(store.bookmark_tab("default", "default", &tab)).unwrap();

        assert_eq!(bookmark.title, "https://crates.io");
        assert_eq!(bookmark.url, "https://crates.io");
    }

    #[test]
    fn test_write_failure_keeps_optimistic_update() {
        let (storage, store) = setup();
        storage.fail_writes(true);

        block_on(store.create_group("default", "Reading", "#10B981")).unwrap();

        assert_eq!(store.space("default").unwrap().groups.len(), 2);
        assert!(storage.value(SPACES_KEY).is_none());
    }

    #[test]
    fn test_listeners_see_changes() {
        let (_, store) = setup();
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        store.subscribe(move |spaces, active_space_id| {
            assert!(!spaces.is_empty());
            assert_eq!(active_space_id, "default");
            seen.set(seen.get() + 1);
        });

        block_on(store.create_group("default", "Reading", "#10B981")).unwrap();
        assert_eq!(calls.get(), 1);

        // failed mutations don't notify
        let _ = block_on(store.create_group("missing", "Reading", "#10B981"));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_import_document() {
        let (storage, store) = setup();
        block_on(store.add_bookmark("default", "default", new_bookmark("A", "https://a.com"))).unwrap();

        let incoming = json!({
            "version": "1.0",
            "spaces": [{
                "id": "default", "name": "Ignored", "color": "#EF4444",
                "groups": [{"id": "default", "name": "G", "color": "#3B82F6", "bookmarks": [
                    {"id": "x", "title": "A", "url": "https://a.com", "createdAt": "2024-01-01T00:00:00.000Z"},
                    {"id": "y", "title": "B", "url": "https://b.com", "createdAt": "2024-01-01T00:00:00.000Z"}
                ]}]
            }]
        });

        let summary = block_on(store.import_document(&incoming)).unwrap();

        assert_eq!(summary.bookmarks_added, 1);
        assert_eq!(summary.duplicates_skipped, 1);
        let space = store.space("default").unwrap();
        assert_eq!(space.name, "Default");
        assert_eq!(space.groups[0].bookmarks.len(), 2);
        assert_eq!(stored_spaces(&storage), store.spaces());
    }

    #[test]
    fn test_invalid_import_changes_nothing() {
        let (storage, store) = setup();
        let before = store.spaces();

        let incoming = json!({
            "version": "1.0",
            "spaces": [
                {"id": "s1", "name": "Ok", "color": "#EF4444", "groups": []},
                {"id": "s2", "name": "No color", "groups": []}
            ]
        });

        assert_eq!(
            block_on(store.import_document(&incoming)),
            Err(BookmarkError::Import(crate::error::ImportError::InvalidSpaceFormat))
        );
        assert_eq!(store.spaces(), before);
        assert!(storage.value(SPACES_KEY).is_none());
    }

    #[test]
    fn test_export_then_import_round_trip() {
        let (_, store) = setup();
        block_on(store.add_bookmark("default", "default", new_bookmark("A", "https://a.com"))).unwrap();
        let before = store.spaces();

        let exported = store.export(&AppSettings::default());
        let value = serde_json::to_value(&exported).unwrap();
        block_on(store.import_document(&value)).unwrap();

        assert_eq!(store.spaces(), before);
    }

    fn folder_host() -> MemoryBookmarks {
        MemoryBookmarks::new(vec![BookmarkTreeNode::folder(
            "1",
            "Bookmarks Bar",
            vec![
                BookmarkTreeNode::leaf("10", "Rust", "https://www.rust-lang.org"),
                BookmarkTreeNode::folder("2", "Docs", vec![BookmarkTreeNode::leaf("20", "MDN", "https://developer.mozilla.org")]),
            ],
        )])
    }

    #[test]
    fn test_import_folders() {
        let (storage, store) = setup();
        let host = folder_host();
        let ids = vec!["1".to_string(), "2".to_string()];

        let summary = block_on(store.import_folders(Some(&host), &ids, "default"));

        assert_eq!(summary.groups_added, 2);
        let groups = store.space("default").unwrap().groups;
        let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec![DEFAULT_GROUP_NAME, "Bookmarks Bar", "Docs"]);
        assert_eq!(stored_spaces(&storage)[0].groups.len(), 3);
    }

    #[test]
    fn test_import_folders_without_host_is_noop() {
        let (storage, store) = setup();

        let summary = block_on(store.import_folders::<MemoryBookmarks>(None, &["1".to_string()], "default"));

        assert_eq!(summary, ImportSummary::default());
        assert_eq!(store.spaces(), default_spaces());
        assert!(storage.value(SPACES_KEY).is_none());
    }

    #[test]
    fn test_import_folders_into_unknown_space_is_noop() {
        let (_, store) = setup();
        let host = folder_host();

        let summary = block_on(store.import_folders(Some(&host), &["1".to_string()], "missing"));

        assert_eq!(summary, ImportSummary::default());
        assert_eq!(store.spaces(), default_spaces());
    }

    #[test]
    fn test_refresh_picks_up_external_writes() {
        let (storage, store) = setup();
        let mut record = Record::new();
        record.insert(
            SPACES_KEY.to_string(),
            json!([{"id": "s9", "name": "From popup", "color": "#EF4444", "groups": []}]),
        );
        block_on(storage.set(record)).unwrap();

        block_on(store.refresh()).unwrap();

        assert_eq!(store.spaces()[0].id, "s9");
    }
}
