//! Lookup of the tags currently attached to a note.

use std::collections::HashSet;

use crate::api::{ApiError, NotesApi};
use crate::fetcher::{CollectionQuery, fetch_all};
use crate::models::{NoteId, Tag, TagId};

/// Returns the ids of all tags attached to the note.
///
/// Always hits the backend; results are never cached between notes.
///
/// # Errors
///
/// Propagates any fetch failure. Callers treat it as a per-note problem.
pub fn note_tag_ids(api: &dyn NotesApi, note_id: &NoteId) -> Result<HashSet<TagId>, ApiError> {
    let query = CollectionQuery::new(format!("/notes/{}/tags", note_id));
    let tags: Vec<Tag> = fetch_all(api, &query)?;
    Ok(tags.into_iter().map(Tag::into_id).collect())
}
