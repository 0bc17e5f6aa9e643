/// Open tabs: which ones can still be bookmarked
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::model::Space;

/// URL schemes of browser-internal pages that are never offered
const INTERNAL_SCHEMES: [&str; 4] = ["chrome://", "chrome-extension://", "edge://", "about:"];

/// Information about a browser tab
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OpenTab {
    pub id: i32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
}

impl OpenTab {
    pub fn new(id: i32, title: String, url: String) -> OpenTab {
        OpenTab { id, title, url }
    }

    fn is_internal(&self) -> bool {
        INTERNAL_SCHEMES.iter().any(|scheme| self.url.starts_with(scheme))
    }
}

/// Tabs of the current window that are worth offering for bookmarking
///
/// Drops internal pages, tabs already saved this session and tabs whose
/// URL is already bookmarked somewhere in `space`, then keeps the first
/// tab for each remaining URL.
pub fn bookmarkable_tabs(tabs: &[OpenTab], space: Option<&Space>, saved_tab_ids: &HashSet<i32>) -> Vec<OpenTab> {
    let bookmarked: HashSet<&str> = space.map(|s| s.urls().collect()).unwrap_or_default();

    let candidates: Vec<OpenTab> = tabs
        .iter()
        .filter(|tab| {
            !tab.url.is_empty()
                && !tab.is_internal()
                && !saved_tab_ids.contains(&tab.id)
                && !bookmarked.contains(tab.url.as_str())
        })
        .cloned()
        .collect();

    make_tabs_unique(&candidates)
}

/// Make tabs unique by URL (keep first occurrence)
pub fn make_tabs_unique(tabs: &[OpenTab]) -> Vec<OpenTab> {
    let mut seen_urls = HashSet::new();
    tabs.iter()
        .filter(|tab| seen_urls.insert(tab.url.as_str()))
        .cloned()
        .collect()
}

/// Host name shown under a bookmark or tab title
pub fn display_host(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.trim_start_matches("www.").to_string()))
        .unwrap_or_else(|| url.to_string())
}
