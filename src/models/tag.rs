use serde::{Deserialize, Serialize};

use super::TagId;

/// A label record as returned by the backend's `/tags` collection.
///
/// Titles are expected to be unique but the backend does not enforce it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    id: TagId,
    #[serde(default)]
    title: String,
}

impl Tag {
    /// Creates a new tag.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagsweep::{Tag, TagId};
    ///
    /// let tag = Tag::new(TagId::new("t1"), "links");
    /// assert_eq!(tag.id(), &TagId::new("t1"));
    /// assert_eq!(tag.title(), "links");
    /// ```
    pub fn new(id: TagId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }

    /// Returns the tag's unique identifier.
    pub fn id(&self) -> &TagId {
        &self.id
    }

    /// Returns the tag's display title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Consumes the tag, returning its identifier.
    pub fn into_id(self) -> TagId {
        self.id
    }
}
