use serde::{Deserialize, Serialize};

use super::NoteId;

/// A note as returned by `/notes?fields=id,title,body`.
///
/// Only `body` takes part in matching; `title` is kept for console output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Backend identifier.
    pub id: NoteId,
    /// Display title, possibly empty.
    #[serde(default)]
    pub title: String,
    /// Markdown body.
    #[serde(default)]
    pub body: String,
}

/// Builder for constructing `Note` instances with optional fields.
///
/// # Examples
///
/// ```
/// use tagsweep::{NoteBuilder, NoteId};
///
/// let note = NoteBuilder::new()
///     .id("n1")
///     .body("Deadline: Project X ships Friday")
///     .build();
///
/// assert_eq!(note.id, NoteId::new("n1"));
/// assert!(note.title.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct NoteBuilder {
    id: Option<NoteId>,
    title: Option<String>,
    body: Option<String>,
}

impl NoteBuilder {
    /// Creates a new `NoteBuilder`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the note ID.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(NoteId::new(id));
        self
    }

    /// Sets the note title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the note body.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Builds the `Note`.
    ///
    /// Unset fields default to empty strings.
    pub fn build(self) -> Note {
        Note {
            id: self.id.unwrap_or_else(|| NoteId::new("")),
            title: self.title.unwrap_or_default(),
            body: self.body.unwrap_or_default(),
        }
    }
}

impl Note {
    /// Returns the note's ID.
    pub fn id(&self) -> &NoteId {
        &self.id
    }

    /// Returns a label suitable for console output: the title, or the id when untitled.
    pub fn display_name(&self) -> &str {
        if self.title.trim().is_empty() {
            self.id.as_str()
        } else {
            &self.title
        }
    }
}
