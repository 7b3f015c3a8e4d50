//! Attaching a tag to a note.

use serde_json::json;

use crate::api::{ApiError, NotesApi};
use crate::models::{NoteId, TagId};

/// Successful outcome of an association request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Association {
    /// The backend accepted the new association.
    Attached,
    /// The backend answered 409: the note already carries the tag.
    AlreadyAttached,
}

/// Attaches `tag_id` to `note_id` via `POST /tags/{tag_id}/notes`.
///
/// A 409 Conflict is not an error.
///
/// # Errors
///
/// Any other non-success status or transport failure is returned to the
/// caller, which decides whether to continue.
pub fn associate(
    api: &dyn NotesApi,
    note_id: &NoteId,
    tag_id: &TagId,
) -> Result<Association, ApiError> {
    let endpoint = format!("/tags/{}/notes", tag_id);
    match api.post(&endpoint, &json!({ "id": note_id })) {
        Ok(_) => Ok(Association::Attached),
        Err(e) if e.is_conflict() => Ok(Association::AlreadyAttached),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedApi;

    #[test]
    fn success_posts_note_id_to_tag_endpoint() {
        let api = ScriptedApi::new().on_post("/tags/t1/notes", "{}");

        let result = associate(&api, &NoteId::new("n1"), &TagId::new("t1")).unwrap();

        assert_eq!(result, Association::Attached);
        assert_eq!(
            api.posts(),
            vec![("/tags/t1/notes".to_string(), json!({"id": "n1"}))]
        );
    }

    #[test]
    fn conflict_is_treated_as_already_attached() {
        let api = ScriptedApi::new().fail_post("/tags/t1/notes", 409);

        let result = associate(&api, &NoteId::new("n1"), &TagId::new("t1"));

        assert_eq!(result.unwrap(), Association::AlreadyAttached);
    }

    #[test]
    fn other_statuses_are_failures() {
        for status in [400, 404, 500, 503] {
            let api = ScriptedApi::new().fail_post("/tags/t1/notes", status);

            let result = associate(&api, &NoteId::new("n1"), &TagId::new("t1"));

            assert_eq!(result.unwrap_err().status(), Some(status));
        }
    }
}
