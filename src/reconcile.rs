/// Import/export of bookmark collections
///
/// Export wraps the collection in a `BookmarkExport`. Import validates an
/// arbitrary JSON document against the export shape and merges it into the
/// current collection:
///
/// - spaces and groups are matched by id; a matched space keeps its own
///   name and color
/// - unmatched spaces and groups are appended with freshly minted ids for
///   them and everything they contain
/// - bookmarks entering a matched group are matched by URL; a URL already in
///   the group is dropped, anything else gets a fresh id
///
/// Validation is all-or-nothing and the current collection is never
/// modified; callers persist the returned collection themselves.
use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde_json::{Map, Value};

use crate::error::ImportError;
use crate::ids::{generate_id, now_iso};
use crate::model::{Bookmark, BookmarkExport, BookmarkGroup, EXPORT_VERSION, Space};
use crate::settings::AppSettings;

/// Counts of what a merge changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    pub spaces_added: usize,
    pub groups_added: usize,
    pub bookmarks_added: usize,
    pub duplicates_skipped: usize,
}

/// Wrap the collection and settings into an export document
pub fn export(spaces: &[Space], settings: &AppSettings) -> BookmarkExport {
    BookmarkExport {
        version: EXPORT_VERSION.to_string(),
        spaces: spaces.to_vec(),
        settings: settings.clone(),
        export_date: now_iso(),
    }
}

pub fn export_json(document: &BookmarkExport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(document)
}

/// `bookmarks-export-YYYY-MM-DD.json`
pub fn export_file_name(date: DateTime<Utc>) -> String {
    format!("bookmarks-export-{}.json", date.format("%Y-%m-%d"))
}

/// Parse the text of an import file
pub fn parse_import(text: &str) -> Result<Value, ImportError> {
    serde_json::from_str(text).map_err(|e| {
        debug!("Import file is not JSON: {}", e);
        ImportError::InvalidFormat
    })
}

/// Validate `incoming` and merge it into a copy of `current`
pub fn import_and_merge(current: &[Space], incoming: &Value) -> Result<Vec<Space>, ImportError> {
    let spaces = validate(incoming)?;
    let (merged, _) = merge(current, spaces);
    Ok(merged)
}

/// Check an import document and extract its spaces
///
/// Stops at the first problem, walking spaces, groups and bookmarks in
/// document order.
pub fn validate(incoming: &Value) -> Result<Vec<Space>, ImportError> {
    let document = incoming.as_object().ok_or(ImportError::InvalidFormat)?;

    let version = document.get("version").ok_or(ImportError::InvalidFormat)?;
    let raw_spaces = document
        .get("spaces")
        .and_then(Value::as_array)
        .ok_or(ImportError::InvalidFormat)?;

    if version.as_str() != Some(EXPORT_VERSION) {
        warn!("Importing document with unexpected version {}", version);
    }

    raw_spaces.iter().map(parse_space).collect()
}

fn parse_space(value: &Value) -> Result<Space, ImportError> {
    let fields = value.as_object().ok_or(ImportError::InvalidSpaceFormat)?;
    let (id, name, color) = match (text(fields, "id"), text(fields, "name"), text(fields, "color")) {
        (Some(id), Some(name), Some(color)) => (id, name, color),
        _ => return Err(ImportError::InvalidSpaceFormat),
    };
    let groups = fields
        .get("groups")
        .and_then(Value::as_array)
        .ok_or(ImportError::InvalidSpaceFormat)?;

    Ok(Space {
        id,
        name,
        color,
        groups: groups.iter().map(parse_group).collect::<Result<_, _>>()?,
    })
}

fn parse_group(value: &Value) -> Result<BookmarkGroup, ImportError> {
    let fields = value.as_object().ok_or(ImportError::InvalidGroupFormat)?;
    let (id, name, color) = match (text(fields, "id"), text(fields, "name"), text(fields, "color")) {
        (Some(id), Some(name), Some(color)) => (id, name, color),
        _ => return Err(ImportError::InvalidGroupFormat),
    };
    let bookmarks = fields
        .get("bookmarks")
        .and_then(Value::as_array)
        .ok_or(ImportError::InvalidGroupFormat)?;

    Ok(BookmarkGroup {
        id,
        name,
        color,
        bookmarks: bookmarks.iter().map(parse_bookmark).collect::<Result<_, _>>()?,
        is_expanded: fields.get("isExpanded").and_then(Value::as_bool).unwrap_or(true),
    })
}

fn parse_bookmark(value: &Value) -> Result<Bookmark, ImportError> {
    let fields = value.as_object().ok_or(ImportError::InvalidBookmarkFormat)?;
    match (
        text(fields, "id"),
        text(fields, "title"),
        text(fields, "url"),
        text(fields, "createdAt"),
    ) {
        (Some(id), Some(title), Some(url), Some(created_at)) => Ok(Bookmark {
            id,
            title,
            url,
            created_at,
        }),
        _ => Err(ImportError::InvalidBookmarkFormat),
    }
}

/// A non-empty string field
fn text(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Merge already-validated spaces into a copy of `current`
pub fn merge(current: &[Space], incoming: Vec<Space>) -> (Vec<Space>, MergeSummary) {
    let mut merged = current.to_vec();
    let mut summary = MergeSummary::default();

    for space in incoming {
        match merged.iter_mut().find(|s| s.id == space.id) {
            Some(existing) => merge_groups(existing, space.groups, &mut summary),
            None => {
                summary.spaces_added += 1;
                summary.groups_added += space.groups.len();
                summary.bookmarks_added += space.bookmark_count();
                merged.push(remint_space(space));
            }
        }
    }

    (merged, summary)
}

fn merge_groups(space: &mut Space, incoming: Vec<BookmarkGroup>, summary: &mut MergeSummary) {
    for group in incoming {
        match space.group_mut(&group.id) {
            Some(existing) => merge_bookmarks(existing, group.bookmarks, summary),
            None => {
                summary.groups_added += 1;
                summary.bookmarks_added += group.bookmarks.len();
                space.groups.push(remint_group(group));
            }
        }
    }
}

fn merge_bookmarks(group: &mut BookmarkGroup, incoming: Vec<Bookmark>, summary: &mut MergeSummary) {
    for bookmark in incoming {
        if group.has_url(&bookmark.url) {
            summary.duplicates_skipped += 1;
            continue;
        }
        summary.bookmarks_added += 1;
        group.bookmarks.push(remint_bookmark(bookmark));
    }
}

fn remint_space(space: Space) -> Space {
    Space {
        id: generate_id("space"),
        groups: space.groups.into_iter().map(remint_group).collect(),
        ..space
    }
}

fn remint_group(group: BookmarkGroup) -> BookmarkGroup {
    BookmarkGroup {
        id: generate_id("group"),
        bookmarks: group.bookmarks.into_iter().map(remint_bookmark).collect(),
        ..group
    }
}

fn remint_bookmark(bookmark: Bookmark) -> Bookmark {
    Bookmark {
        id: generate_id("bookmark"),
        ..bookmark
    }
}
