//! Drives the scan-match-tag workflow over the whole note corpus.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use super::associator::{Association, associate};
use super::matcher::MatchCriteria;
use super::membership::note_tag_ids;
use super::resolver::{TagResolution, resolve_tag};
use super::TagError;
use crate::api::{ApiError, NotesApi};
use crate::fetcher::{CollectionQuery, fetch_all};
use crate::models::{Note, TagId};

/// Why a single matching note could not be processed.
#[derive(Debug, Error)]
pub enum NoteFailure {
    /// The note's current tags could not be fetched.
    #[error("failed to get existing tags: {0}")]
    MembershipCheck(#[source] ApiError),

    /// The association request failed.
    #[error("failed to attach tag: {0}")]
    Association(#[source] ApiError),
}

/// What happened to a note that matched the criteria.
#[derive(Debug)]
pub enum NoteOutcome {
    /// The tag was attached during this run.
    Tagged,
    /// The note already carried the tag.
    AlreadyTagged,
    /// The note was skipped after a failure.
    Failed(NoteFailure),
}

/// Totals for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// The tag that was applied.
    pub tag_id: TagId,
    /// True when the tag was created by this run.
    pub tag_created: bool,
    /// Notes returned by the backend.
    pub notes_scanned: usize,
    /// Notes whose body contained every substring.
    pub notes_matched: usize,
    /// Notes newly tagged in this run.
    pub tagged: usize,
    /// Matching notes that already had the tag.
    pub already_tagged: usize,
    /// Matching notes skipped because of an error.
    pub failed: usize,
}

impl RunSummary {
    fn new(resolution: TagResolution, notes_scanned: usize) -> Self {
        Self {
            tag_id: resolution.id,
            tag_created: resolution.created,
            notes_scanned,
            notes_matched: 0,
            tagged: 0,
            already_tagged: 0,
            failed: 0,
        }
    }

    fn record(&mut self, outcome: &NoteOutcome) {
        match outcome {
            NoteOutcome::Tagged => self.tagged += 1,
            NoteOutcome::AlreadyTagged => self.already_tagged += 1,
            NoteOutcome::Failed(_) => self.failed += 1,
        }
    }
}

/// Progress callbacks for a run. All methods default to doing nothing.
pub trait RunObserver {
    /// Called once the target tag is known.
    fn tag_resolved(&mut self, _title: &str, _resolution: &TagResolution) {}

    /// Called once the note listing is complete.
    fn notes_loaded(&mut self, _count: usize) {}

    /// Called after each matching note has been handled.
    ///
    /// `position` is the 1-based index of the note in the listing.
    fn note_processed(
        &mut self,
        _position: usize,
        _total: usize,
        _note: &Note,
        _outcome: &NoteOutcome,
    ) {
    }
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentObserver;

impl RunObserver for SilentObserver {}

/// Tags every note whose body contains all required substrings.
///
/// Requests are issued one at a time; each note's check-then-attach finishes
/// before the next note is looked at.
pub struct ScanTagger {
    api: Arc<dyn NotesApi>,
}

impl ScanTagger {
    /// Creates a tagger that talks to the given backend.
    #[must_use]
    pub fn new(api: Arc<dyn NotesApi>) -> Self {
        Self { api }
    }

    /// Runs the workflow without progress reporting.
    ///
    /// # Errors
    ///
    /// See [`ScanTagger::run_with_observer`].
    pub fn run(&self, tag_title: &str, criteria: &MatchCriteria) -> Result<RunSummary, TagError> {
        self.run_with_observer(tag_title, criteria, &mut SilentObserver)
    }

    /// Runs the workflow, reporting progress to `observer`.
    ///
    /// # Errors
    ///
    /// Returns `TagError::EmptyCriteria` before any request if `criteria` is
    /// empty. Returns `TagError::ListTags`, `TagError::CreateTag` or
    /// `TagError::ListNotes` if the tag or the note corpus cannot be
    /// established. Per-note failures never abort the run; they are counted in
    /// [`RunSummary::failed`].
    pub fn run_with_observer(
        &self,
        tag_title: &str,
        criteria: &MatchCriteria,
        observer: &mut dyn RunObserver,
    ) -> Result<RunSummary, TagError> {
        if criteria.is_empty() {
            return Err(TagError::EmptyCriteria);
        }

        let resolution = resolve_tag(self.api.as_ref(), tag_title)?;
        observer.tag_resolved(tag_title, &resolution);

        let notes = self.list_notes()?;
        let total = notes.len();
        info!(count = total, "loaded notes");
        observer.notes_loaded(total);

        let mut summary = RunSummary::new(resolution, total);

        for (index, note) in notes.iter().enumerate() {
            if !criteria.matches_body(&note.body) {
                continue;
            }
            summary.notes_matched += 1;

            let outcome = self.process_note(note, &summary.tag_id);
            summary.record(&outcome);
            observer.note_processed(index + 1, total, note, &outcome);
        }

        info!(
            tagged = summary.tagged,
            already_tagged = summary.already_tagged,
            failed = summary.failed,
            "scan complete"
        );
        Ok(summary)
    }

    fn list_notes(&self) -> Result<Vec<Note>, TagError> {
        let query = CollectionQuery::new("/notes").param("fields", "id,title,body");
        fetch_all(self.api.as_ref(), &query).map_err(TagError::ListNotes)
    }

    /// Check-then-attach for one matching note.
    fn process_note(&self, note: &Note, tag_id: &TagId) -> NoteOutcome {
        let api = self.api.as_ref();

        let existing = match note_tag_ids(api, &note.id) {
            Ok(existing) => existing,
            Err(e) => {
                warn!(
                    note = %note.id,
                    title = %note.title,
                    error = %e,
                    "skipping note: tag lookup failed"
                );
                return NoteOutcome::Failed(NoteFailure::MembershipCheck(e));
            }
        };

        if existing.contains(tag_id) {
            debug!(note = %note.id, "already tagged");
            return NoteOutcome::AlreadyTagged;
        }

        match associate(api, &note.id, tag_id) {
            Ok(Association::Attached) => NoteOutcome::Tagged,
            Ok(Association::AlreadyAttached) => {
                debug!(note = %note.id, "backend reported tag already attached");
                NoteOutcome::AlreadyTagged
            }
            Err(e) => {
                warn!(
                    note = %note.id,
                    title = %note.title,
                    error = %e,
                    "failed to attach tag"
                );
                NoteOutcome::Failed(NoteFailure::Association(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedApi;

    const EMPTY: &str = r#"{"items": []}"#;
    const NOTES_PAGE_1: &str = "/notes?page=1&fields=id,title,body";
    const NOTES_PAGE_2: &str = "/notes?page=2&fields=id,title,body";
    const TAGS_PAGE_1: &str = r#"{"items": [{"id": "t1", "title": "Important Project"}]}"#;

    fn criteria() -> MatchCriteria {
        MatchCriteria::new(["deadline", "project x"])
    }

    /// Backend with tag `t1` present and three notes, of which 1 and 3 match.
    fn backend() -> ScriptedApi {
        ScriptedApi::new()
            .on_get("/tags?page=1", TAGS_PAGE_1)
            .on_get("/tags?page=2", EMPTY)
            .on_get(
                NOTES_PAGE_1,
                r#"{"items": [
                    {"id": "1", "title": "Ship", "body": "Deadline: Project X ships Friday"},
                    {"id": "2", "title": "Shopping", "body": "Grocery list"},
                    {"id": "3", "title": "Update", "body": "project x deadline extended"}
                ]}"#,
            )
            .on_get(NOTES_PAGE_2, EMPTY)
    }

    #[derive(Default)]
    struct Recorder {
        resolved: Option<TagResolution>,
        loaded: Option<usize>,
        processed: Vec<(usize, String, &'static str)>,
    }

    impl RunObserver for Recorder {
        fn tag_resolved(&mut self, _title: &str, resolution: &TagResolution) {
            self.resolved = Some(resolution.clone());
        }

        fn notes_loaded(&mut self, count: usize) {
            self.loaded = Some(count);
        }

        fn note_processed(
            &mut self,
            position: usize,
            _total: usize,
            note: &Note,
            outcome: &NoteOutcome,
        ) {
            let kind = match outcome {
                NoteOutcome::Tagged => "tagged",
                NoteOutcome::AlreadyTagged => "already",
                NoteOutcome::Failed(_) => "failed",
            };
            self.processed.push((position, note.id.to_string(), kind));
        }
    }

    #[test]
    fn tags_matching_notes_and_leaves_others_untouched() {
        let api = Arc::new(
            backend()
                .on_get("/notes/1/tags?page=1", EMPTY)
                .on_get("/notes/3/tags?page=1", EMPTY),
        );
        let tagger = ScanTagger::new(api.clone());

        let summary = tagger.run("Important Project", &criteria()).unwrap();

        assert_eq!(summary.tagged, 2);
        assert_eq!(summary.notes_scanned, 3);
        assert_eq!(summary.notes_matched, 2);
        assert!(!summary.tag_created);

        let posted: Vec<String> = api
            .posts()
            .into_iter()
            .map(|(_, body)| body["id"].to_string())
            .collect();
        assert_eq!(posted, vec![r#""1""#, r#""3""#]);
        assert!(!api.gets().iter().any(|e| e.starts_with("/notes/2/")));
    }

    #[test]
    fn note_already_carrying_tag_is_not_reposted() {
        let api = Arc::new(
            backend()
                .on_get("/notes/1/tags?page=1", TAGS_PAGE_1)
                .on_get("/notes/1/tags?page=2", EMPTY)
                .on_get("/notes/3/tags?page=1", EMPTY),
        );
        let tagger = ScanTagger::new(api.clone());

        let summary = tagger.run("Important Project", &criteria()).unwrap();

        assert_eq!(summary.tagged, 1);
        assert_eq!(summary.already_tagged, 1);
        assert_eq!(api.posts().len(), 1);
        assert_eq!(api.posts()[0].0, "/tags/t1/notes");
    }

    #[test]
    fn membership_failure_skips_note_and_continues() {
        let api = Arc::new(
            backend()
                .fail_get("/notes/1/tags?page=1", 500)
                .on_get("/notes/3/tags?page=1", EMPTY),
        );
        let tagger = ScanTagger::new(api.clone());
        let mut recorder = Recorder::default();

        let summary = tagger
            .run_with_observer("Important Project", &criteria(), &mut recorder)
            .unwrap();

        assert_eq!(summary.tagged, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(
            recorder.processed,
            vec![(1, "1".to_string(), "failed"), (3, "3".to_string(), "tagged")]
        );
    }

    #[test]
    fn association_failure_is_counted_but_not_fatal() {
        let api = Arc::new(
            backend()
                .on_get("/notes/1/tags?page=1", EMPTY)
                .on_get("/notes/3/tags?page=1", EMPTY)
                .fail_post("/tags/t1/notes", 500),
        );
        let tagger = ScanTagger::new(api);

        let summary = tagger.run("Important Project", &criteria()).unwrap();

        assert_eq!(summary.tagged, 0);
        assert_eq!(summary.failed, 2);
    }

    #[test]
    fn conflict_on_attach_counts_as_already_tagged() {
        let api = Arc::new(
            backend()
                .on_get("/notes/1/tags?page=1", EMPTY)
                .on_get("/notes/3/tags?page=1", EMPTY)
                .fail_post("/tags/t1/notes", 409),
        );
        let tagger = ScanTagger::new(api);

        let summary = tagger.run("Important Project", &criteria()).unwrap();

        assert_eq!(summary.tagged, 0);
        assert_eq!(summary.already_tagged, 2);
        assert_eq!(summary.failed, 0);
    }

    #[test]
    fn missing_tag_is_created_before_scanning() {
        let api = Arc::new(
            ScriptedApi::new()
                .on_get("/tags?page=1", EMPTY)
                .on_post("/tags", r#"{"id": "new", "title": "Important Project"}"#)
                .on_get(NOTES_PAGE_1, EMPTY),
        );
        let tagger = ScanTagger::new(api.clone());
        let mut recorder = Recorder::default();

        let summary = tagger
            .run_with_observer("Important Project", &criteria(), &mut recorder)
            .unwrap();

        assert!(summary.tag_created);
        assert_eq!(summary.tag_id, TagId::new("new"));
        assert_eq!(summary.tagged, 0);
        assert_eq!(recorder.loaded, Some(0));
        assert!(recorder.resolved.is_some_and(|r| r.created));
    }

    #[test]
    fn note_listing_failure_is_fatal() {
        let api = Arc::new(
            ScriptedApi::new()
                .on_get("/tags?page=1", TAGS_PAGE_1)
                .on_get("/tags?page=2", EMPTY)
                .fail_get(NOTES_PAGE_1, 502),
        );
        let tagger = ScanTagger::new(api);

        let result = tagger.run("Important Project", &criteria());

        assert!(matches!(result, Err(TagError::ListNotes(_))));
    }

    #[test]
    fn empty_criteria_is_rejected_before_any_request() {
        let api = Arc::new(ScriptedApi::new());
        let tagger = ScanTagger::new(api.clone());

        let result = tagger.run("links", &MatchCriteria::new(Vec::<String>::new()));

        assert!(matches!(result, Err(TagError::EmptyCriteria)));
        assert!(api.gets().is_empty());
    }
}
