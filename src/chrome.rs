/// chrome.* implementations of the host capabilities, and the choice
/// between them and the in-memory fallbacks made once at startup.
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

use crate::error::HostError;
use crate::host::{
    BookmarkHostApi, BookmarkTreeNode, MemoryStorage, MemoryTabs, Record, StorageGateway, TabHostApi,
};
use crate::tabs::OpenTab;

// Import JS bridge functions
#[wasm_bindgen(module = "/bridge.js")]
extern "C" {
    fn chromeAvailable(api: &str) -> bool;

    #[wasm_bindgen(catch)]
    async fn getStorage(keys: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setStorage(record: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn getBookmarkSubTree(folder_id: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn getBookmarkTree() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn getCurrentWindowTabs() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn getActiveTab() -> Result<JsValue, JsValue>;

    fn onTabsChanged(callback: &js_sys::Function);

    fn onSpacesRefresh(callback: &js_sys::Function);

    #[wasm_bindgen(js_name = notifySpacesChanged)]
    pub fn notify_spaces_changed();

    #[wasm_bindgen(js_name = openManager)]
    pub fn open_manager();

    #[wasm_bindgen(js_name = openUrl)]
    pub fn open_url(url: &str, target: &str);

    #[wasm_bindgen(js_name = exportToFile)]
    pub fn export_to_file(data: &str, filename: &str);

    #[wasm_bindgen(catch)]
    async fn readFileText(input: &web_sys::HtmlInputElement) -> Result<JsValue, JsValue>;
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, HostError> {
    // plain objects rather than JS Maps, as chrome.storage expects
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| HostError::Serialization(format!("{:?}", e)))
}

fn from_js<T: DeserializeOwned>(value: JsValue) -> Result<T, HostError> {
    serde_wasm_bindgen::from_value(value).map_err(|e| HostError::Serialization(format!("{:?}", e)))
}

/// chrome.storage.local
#[derive(Debug, Clone, Copy, Default)]
pub struct ChromeStorage;

impl StorageGateway for ChromeStorage {
    async fn get(&self, keys: &[&str]) -> Result<Record, HostError> {
        let result = getStorage(to_js(keys)?)
            .await
            .map_err(|e| HostError::Storage(format!("{:?}", e)))?;
        if result.is_null() || result.is_undefined() {
            return Ok(Record::new());
        }
        from_js(result)
    }

    async fn set(&self, record: Record) -> Result<(), HostError> {
        setStorage(to_js(&record)?)
            .await
            .map_err(|e| HostError::Storage(format!("{:?}", e)))
    }
}

/// chrome.bookmarks
#[derive(Debug, Clone, Copy, Default)]
pub struct ChromeBookmarks;

impl BookmarkHostApi for ChromeBookmarks {
    async fn get_sub_tree(&self, folder_id: &str) -> Result<BookmarkTreeNode, HostError> {
        let node = getBookmarkSubTree(folder_id)
            .await
            .map_err(|e| HostError::Bookmarks(format!("{:?}", e)))?;
        from_js(node)
    }

    async fn get_tree(&self) -> Result<Vec<BookmarkTreeNode>, HostError> {
        let roots = getBookmarkTree()
            .await
            .map_err(|e| HostError::Bookmarks(format!("{:?}", e)))?;
        from_js(roots)
    }
}

/// chrome.tabs
#[derive(Debug, Clone, Copy, Default)]
pub struct ChromeTabs;

impl TabHostApi for ChromeTabs {
    async fn current_window_tabs(&self) -> Result<Vec<OpenTab>, HostError> {
        let tabs = getCurrentWindowTabs()
            .await
            .map_err(|e| HostError::Tabs(format!("{:?}", e)))?;
        from_js(tabs)
    }
}

/// Storage picked at startup
pub enum HostStorage {
    Chrome(ChromeStorage),
    Memory(MemoryStorage),
}

impl StorageGateway for HostStorage {
    async fn get(&self, keys: &[&str]) -> Result<Record, HostError> {
        match self {
            HostStorage::Chrome(storage) => storage.get(keys).await,
            HostStorage::Memory(storage) => storage.get(keys).await,
        }
    }

    async fn set(&self, record: Record) -> Result<(), HostError> {
        match self {
            HostStorage::Chrome(storage) => storage.set(record).await,
            HostStorage::Memory(storage) => storage.set(record).await,
        }
    }
}

/// Tab source picked at startup
pub enum HostTabs {
    Chrome(ChromeTabs),
    Memory(MemoryTabs),
}

impl TabHostApi for HostTabs {
    async fn current_window_tabs(&self) -> Result<Vec<OpenTab>, HostError> {
        match self {
            HostTabs::Chrome(tabs) => tabs.current_window_tabs().await,
            HostTabs::Memory(tabs) => tabs.current_window_tabs().await,
        }
    }
}

/// The host capabilities available to this page
///
/// Both stores share `storage`.
pub struct Host {
    pub storage: Rc<HostStorage>,
    pub bookmarks: Option<ChromeBookmarks>,
    pub tabs: HostTabs,
}

/// Probe the chrome.* APIs once
pub fn detect() -> Host {
    let storage = if chromeAvailable("storage") {
        HostStorage::Chrome(ChromeStorage)
    } else {
        log::warn!("chrome.storage not available, changes will not be saved");
        HostStorage::Memory(MemoryStorage::new())
    };
    let bookmarks = chromeAvailable("bookmarks").then_some(ChromeBookmarks);
    let tabs = if chromeAvailable("tabs") {
        HostTabs::Chrome(ChromeTabs)
    } else {
        HostTabs::Memory(MemoryTabs::sample())
    };

    Host {
        storage: Rc::new(storage),
        bookmarks,
        tabs,
    }
}

/// The tab the popup was opened on
pub async fn active_tab() -> Result<Option<OpenTab>, HostError> {
    if !chromeAvailable("tabs") {
        return Ok(None);
    }
    let tab = getActiveTab()
        .await
        .map_err(|e| HostError::Tabs(format!("{:?}", e)))?;
    if tab.is_null() || tab.is_undefined() {
        return Ok(None);
    }
    from_js(tab).map(Some)
}

/// Text of the file chosen in a file input
pub async fn read_file(input: &web_sys::HtmlInputElement) -> Result<String, HostError> {
    let text = readFileText(input)
        .await
        .map_err(|e| HostError::Storage(format!("Failed to read file: {:?}", e)))?;
    text.as_string()
        .ok_or_else(|| HostError::Serialization("file contents are not text".to_string()))
}

/// Run `callback` whenever the window's tabs change
pub fn on_tabs_changed(callback: impl Fn() + 'static) {
    let closure = Closure::wrap(Box::new(callback) as Box<dyn Fn()>);
    onTabsChanged(closure.as_ref().unchecked_ref());
    // listener lives as long as the page
    closure.forget();
}

/// Run `callback` when another page asks for spaces to be re-read
pub fn on_spaces_refresh(callback: impl Fn() + 'static) {
    let closure = Closure::wrap(Box::new(callback) as Box<dyn Fn()>);
    onSpacesRefresh(closure.as_ref().unchecked_ref());
    closure.forget();
}
