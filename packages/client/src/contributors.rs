//! Contributor input handling.
//!
//! The attribution step accepts ids typed or pasted in bulk. The raw text is
//! split into candidate ids here; resolution against the user directory
//! happens server-side, where unknown ids are reported individually.

/// Split raw contributor input into candidate ids.
///
/// Splits on commas and any whitespace, drops empty fragments, and dedups
/// while preserving first-seen order. The submitter's own id never comes
/// through here; the server attaches it from the authenticated session.
pub fn split_contributor_ids(raw: &str) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for fragment in raw.split(|c: char| c == ',' || c.is_whitespace()) {
        let id = fragment.trim();
        if id.is_empty() {
            continue;
        }
        if ids.iter().any(|seen| seen == id) {
            continue;
        }
        ids.push(id.to_string());
    }
    ids
}
