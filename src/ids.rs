/// Identifier and timestamp helpers
use chrono::{SecondsFormat, Utc};
use uuid::Uuid;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 9;

/// Generate an id of the form `<prefix>-<unix millis>-<9 base36 chars>`
///
/// Only meant to avoid collisions within a session; imported documents
/// always get fresh ids from here rather than trusting their own.
pub fn generate_id(prefix: &str) -> String {
    format!("{}-{}-{}", prefix, Utc::now().timestamp_millis(), random_suffix())
}

/// Current UTC time, formatted like `2024-10-28T10:30:00.000Z`
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn random_suffix() -> String {
    base36(&Uuid::new_v4().as_bytes()[..SUFFIX_LEN])
}

fn base36(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| BASE36[(*b as usize) % BASE36.len()] as char)
        .collect()
}
