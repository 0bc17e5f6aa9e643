/// Data structures for Spaces, Groups and Bookmarks
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::error::BookmarkError;
use crate::settings::AppSettings;

pub const MAX_NAME_LEN: usize = 30;
pub const DEFAULT_GROUP_NAME: &str = "Default Group";
pub const DEFAULT_GROUP_COLOR: &str = "#3B82F6";
pub const DEFAULT_SPACE_COLOR: &str = "#6B7280";
pub const EXPORT_VERSION: &str = "1.0";

/// Colors offered by the color picker
pub const PALETTE: [&str; 10] = [
    "#EF4444", // Red
    "#F97316", // Orange
    "#F59E0B", // Amber
    "#10B981", // Emerald
    "#06B6D4", // Cyan
    "#3B82F6", // Blue
    "#6366F1", // Indigo
    "#8B5CF6", // Violet
    "#EC4899", // Pink
    "#6B7280", // Gray
];

/// A saved page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: String,
    pub title: String,
    pub url: String,
    pub created_at: String,
}

/// A bookmark before it has been given an id
#[derive(Debug, Clone, PartialEq)]
pub struct NewBookmark {
    pub title: String,
    pub url: String,
    pub created_at: String,
}

/// A color-tagged list of bookmarks inside a space
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkGroup {
    pub id: String,
    pub name: String,
    pub color: String,
    pub bookmarks: Vec<Bookmark>,
    #[serde(default = "expanded")]
    pub is_expanded: bool,
}

fn expanded() -> bool {
    true
}

impl BookmarkGroup {
    pub fn new(id: String, name: String, color: String) -> BookmarkGroup {
        BookmarkGroup {
            id,
            name,
            color,
            bookmarks: Vec::new(),
            is_expanded: true,
        }
    }

    pub fn has_url(&self, url: &str) -> bool {
        self.bookmarks.iter().any(|b| b.url == url)
    }
}

/// A named workspace of groups
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Space {
    pub id: String,
    pub name: String,
    pub color: String,
    pub groups: Vec<BookmarkGroup>,
}

impl Space {
    pub fn group(&self, group_id: &str) -> Option<&BookmarkGroup> {
        self.groups.iter().find(|g| g.id == group_id)
    }

    pub fn group_mut(&mut self, group_id: &str) -> Option<&mut BookmarkGroup> {
        self.groups.iter_mut().find(|g| g.id == group_id)
    }

    /// Every bookmarked URL in this space, across all groups
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.groups
            .iter()
            .flat_map(|g| g.bookmarks.iter().map(|b| b.url.as_str()))
    }

    pub fn bookmark_count(&self) -> usize {
        self.groups.iter().map(|g| g.bookmarks.len()).sum()
    }
}

/// The collection used before anything has been stored
pub fn default_spaces() -> Vec<Space> {
    vec![Space {
        id: "default".to_string(),
        name: "Default".to_string(),
        color: DEFAULT_SPACE_COLOR.to_string(),
        groups: vec![BookmarkGroup::new(
            "default".to_string(),
            DEFAULT_GROUP_NAME.to_string(),
            DEFAULT_GROUP_COLOR.to_string(),
        )],
    }]
}

/// Import/export file document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkExport {
    pub version: String,
    pub spaces: Vec<Space>,
    pub settings: AppSettings,
    pub export_date: String,
}

/// Trim a space or group name and check it fits
pub fn validate_name(name: &str) -> Result<String, BookmarkError> {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed.chars().count() > MAX_NAME_LEN {
        return Err(BookmarkError::InvalidName(name.to_string()));
    }
    Ok(trimmed.to_string())
}

/// Check a color is `#RRGGBB`
pub fn validate_color(color: &str) -> Result<String, BookmarkError> {
    static HEX: OnceLock<Regex> = OnceLock::new();
    let hex = HEX.get_or_init(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("hex color pattern"));

    if hex.is_match(color) {
        Ok(color.to_string())
    } else {
        Err(BookmarkError::InvalidColor(color.to_string()))
    }
}

/// Check a bookmark's title and URL before it is stored
pub fn validate_bookmark(title: &str, url: &str) -> Result<(), BookmarkError> {
    if title.trim().is_empty() {
        return Err(BookmarkError::InvalidTitle);
    }
    url::Url::parse(url.trim()).map_err(|_| BookmarkError::InvalidUrl(url.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("  Work  ").unwrap(), "Work");
        assert!(validate_name("   ").is_err());
        assert!(validate_name("").is_err());
        assert!(validate_name(&"a".repeat(30)).is_ok());
        assert!(validate_name(&"a".repeat(31)).is_err());
    }

    #[test]
    fn test_validate_name_counts_chars() {
        // 30 multi-byte characters still fit
        assert!(validate_name(&"é".repeat(30)).is_ok());
    }

    #[test]
    fn test_validate_color() {
        assert!(validate_color("#3B82F6").is_ok());
        assert!(validate_color("#abcdef").is_ok());
        assert!(validate_color("3B82F6").is_err());
        assert!(validate_color("#3B82F").is_err());
        assert!(validate_color("blue").is_err());
    }

    #[test]
    fn test_validate_bookmark() {
        assert!(validate_bookmark("Rust", "https://www.rust-lang.org").is_ok());
        assert!(matches!(
            validate_bookmark(" ", "https://www.rust-lang.org"),
            Err(BookmarkError::InvalidTitle)
        ));
        assert!(matches!(
            validate_bookmark("Rust", "not a url"),
            Err(BookmarkError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_default_spaces() {
        let spaces = default_spaces();
        assert_eq!(spaces.len(), 1);
        assert_eq!(spaces[0].id, "default");
        assert_eq!(spaces[0].groups.len(), 1);
        assert_eq!(spaces[0].groups[0].name, DEFAULT_GROUP_NAME);
        assert!(spaces[0].groups[0].is_expanded);
    }

    #[test]
    fn test_serialization_uses_camel_case() {
        let group = BookmarkGroup {
            id: "g1".to_string(),
            name: "Docs".to_string(),
            color: "#3B82F6".to_string(),
            bookmarks: vec![Bookmark {
                id: "b1".to_string(),
                title: "Rust".to_string(),
                url: "https://www.rust-lang.org".to_string(),
                created_at: "2024-10-28T10:30:00.000Z".to_string(),
            }],
            is_expanded: false,
        };

        let json = serde_json::to_value(&group).unwrap();
        assert_eq!(json["isExpanded"], false);
        assert_eq!(json["bookmarks"][0]["createdAt"], "2024-10-28T10:30:00.000Z");

        let back: BookmarkGroup = serde_json::from_value(json).unwrap();
        assert_eq!(back, group);
    }

    #[test]
    fn test_is_expanded_defaults_to_true() {
        let json = r##"{"id":"g1","name":"Docs","color":"#3B82F6","bookmarks":[]}"##;
        let group: BookmarkGroup = serde_json::from_str(json).unwrap();
        assert!(group.is_expanded);
    }

    #[test]
    fn test_space_urls() {
        let mut space = default_spaces().remove(0);
        space.groups[0].bookmarks.push(Bookmark {
            id: "b1".to_string(),
            title: "A".to_string(),
            url: "https://a.com".to_string(),
            created_at: "2024-10-28T10:30:00.000Z".to_string(),
        });

        let urls: Vec<&str> = space.urls().collect();
        assert_eq!(urls, vec!["https://a.com"]);
        assert_eq!(space.bookmark_count(), 1);
        assert!(space.groups[0].has_url("https://a.com"));
    }
}
