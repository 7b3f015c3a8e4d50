//! Find-or-create of the target tag by exact title.

use serde_json::json;
use tracing::info;

use super::TagError;
use crate::api::{ApiError, NotesApi};
use crate::fetcher::{CollectionQuery, fetch_all};
use crate::models::{Tag, TagId};

/// Outcome of resolving a tag title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagResolution {
    /// Identifier of the found or newly created tag.
    pub id: TagId,
    /// True when the tag did not exist and was created in this run.
    pub created: bool,
}

/// Returns the id of the first tag titled exactly `title`, creating the tag if none exists.
///
/// Titles are compared byte for byte: no trimming or case folding. With
/// duplicate titles on the backend the first one in listing order wins.
///
/// # Errors
///
/// Returns `TagError::ListTags` if the tag listing fails and
/// `TagError::CreateTag` if the tag had to be created and creation failed.
pub fn resolve_tag(api: &dyn NotesApi, title: &str) -> Result<TagResolution, TagError> {
    let tags: Vec<Tag> =
        fetch_all(api, &CollectionQuery::new("/tags")).map_err(TagError::ListTags)?;
    info!(count = tags.len(), "loaded tags");

    if let Some(tag) = tags.into_iter().find(|tag| tag.title() == title) {
        return Ok(TagResolution {
            id: tag.into_id(),
            created: false,
        });
    }

    let id = create_tag(api, title).map_err(|source| TagError::CreateTag {
        title: title.to_string(),
        source,
    })?;
    info!(%id, title, "created tag");

    Ok(TagResolution { id, created: true })
}

fn create_tag(api: &dyn NotesApi, title: &str) -> Result<TagId, ApiError> {
    let body = api.post("/tags", &json!({ "title": title }))?;
    let tag: Tag = serde_json::from_str(&body).map_err(|source| ApiError::Decode {
        context: "created tag".to_string(),
        source,
    })?;
    Ok(tag.into_id())
}
