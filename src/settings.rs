/// User settings and their persistence under the `settings` key
use log::error;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

use crate::host::{Record, StorageGateway};

pub const SETTINGS_KEY: &str = "settings";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    System,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Light, Theme::Dark, Theme::System];

    /// Stored name, as serialized
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        }
    }

    pub fn from_name(name: &str) -> Option<Theme> {
        Theme::ALL.into_iter().find(|t| t.as_str() == name)
    }

    pub fn label(self) -> &'static str {
        match self {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
            Theme::System => "System",
        }
    }

    /// Effective theme once the OS preference is known
    pub fn resolve(self, prefers_dark: bool) -> Theme {
        match self {
            Theme::System if prefers_dark => Theme::Dark,
            Theme::System => Theme::Light,
            other => other,
        }
    }

    pub fn is_dark(self, prefers_dark: bool) -> bool {
        self.resolve(prefers_dark) == Theme::Dark
    }
}

/// Where bookmarks open when clicked
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum LinkTarget {
    #[default]
    #[serde(rename = "_blank")]
    NewTab,
    #[serde(rename = "_self")]
    CurrentTab,
}

impl LinkTarget {
    pub fn as_str(self) -> &'static str {
        match self {
            LinkTarget::NewTab => "_blank",
            LinkTarget::CurrentTab => "_self",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub theme: Theme,
    pub has_completed_setup: bool,
    pub right_panel_collapsed: bool,
    pub link_target: LinkTarget,
}

/// Settings held in memory and mirrored to storage
pub struct SettingsStore<S> {
    gateway: Rc<S>,
    settings: Rc<RefCell<AppSettings>>,
}

impl<S> Clone for SettingsStore<S> {
    fn clone(&self) -> Self {
        SettingsStore {
            gateway: Rc::clone(&self.gateway),
            settings: Rc::clone(&self.settings),
        }
    }
}

impl<S: StorageGateway> SettingsStore<S> {
    pub fn new(gateway: Rc<S>) -> Self {
        SettingsStore {
            gateway,
            settings: Rc::new(RefCell::new(AppSettings::default())),
        }
    }

    pub fn settings(&self) -> AppSettings {
        self.settings.borrow().clone()
    }

    /// Load stored settings; unreadable values keep the defaults
    pub async fn hydrate(&self) {
        match self.gateway.get(&[SETTINGS_KEY]).await {
            Ok(record) => {
                if let Some(value) = record.get(SETTINGS_KEY) {
                    match serde_json::from_value::<AppSettings>(value.clone()) {
                        Ok(settings) => *self.settings.borrow_mut() = settings,
                        Err(e) => error!("Ignoring unreadable settings: {}", e),
                    }
                }
            }
            Err(e) => error!("Failed to load settings: {}", e),
        }
    }

    pub async fn update(&self, settings: AppSettings) {
        *self.settings.borrow_mut() = settings;
        self.persist().await;
    }

    pub async fn complete_setup(&self) {
        self.settings.borrow_mut().has_completed_setup = true;
        self.persist().await;
    }

    pub async fn set_theme(&self, theme: Theme) {
        self.settings.borrow_mut().theme = theme;
        self.persist().await;
    }

    /// Light and dark swap; system switches to dark
    pub async fn toggle_theme(&self) -> Theme {
        let theme = {
            let mut settings = self.settings.borrow_mut();
            settings.theme = match settings.theme {
                Theme::Dark => Theme::Light,
                Theme::Light | Theme::System => Theme::Dark,
            };
            settings.theme
        };
        self.persist().await;
        theme
    }

    pub async fn toggle_right_panel(&self) -> bool {
        let collapsed = {
            let mut settings = self.settings.borrow_mut();
            settings.right_panel_collapsed = !settings.right_panel_collapsed;
            settings.right_panel_collapsed
        };
        self.persist().await;
        collapsed
    }

    async fn persist(&self) {
        let value = match serde_json::to_value(self.settings()) {
            Ok(value) => value,
            Err(e) => {
                error!("Failed to serialize settings: {}", e);
                return;
            }
        };

        let mut record = Record::new();
        record.insert(SETTINGS_KEY.to_string(), value);
        if let Err(e) = self.gateway.set(record).await {
            error!("Failed to save settings: {}", e);
        }
    }
}
