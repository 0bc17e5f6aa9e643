/// Spaces Bookmarks - Chrome extension for organizing bookmarks into spaces and groups
/// Built with Rust + WASM + Yew

pub mod chrome;
pub mod drag;
pub mod error;
pub mod host;
pub mod ids;
pub mod importer;
pub mod model;
pub mod reconcile;
pub mod settings;
pub mod store;
pub mod tabs;
pub mod ui;

use std::rc::Rc;
use wasm_bindgen::prelude::*;

use crate::settings::SettingsStore;
use crate::store::BookmarkStore;
use crate::ui::manager::{Manager, ManagerProps};
use crate::ui::popup::{App, PopupProps};

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Start the Yew app for the full-page manager
#[wasm_bindgen]
pub fn start_manager() {
    let host = Rc::new(chrome::detect());
    let props = ManagerProps {
        store: BookmarkStore::new(Rc::clone(&host.storage)),
        settings: SettingsStore::new(Rc::clone(&host.storage)),
        host,
    };
    yew::Renderer::<Manager>::with_props(props).render();
}

// Start the Yew app for the toolbar popup
#[wasm_bindgen]
pub fn start_popup() {
    let host = chrome::detect();
    let props = PopupProps {
        store: BookmarkStore::new(host.storage),
    };
    yew::Renderer::<App>::with_props(props).render();
}
