//! Content-based bulk tagging against the notes backend.
//!
//! The workflow runs in five phases, strictly in order:
//!
//! 1. resolve the target tag by title, creating it if absent
//! 2. list every note
//! 3. match each note body against the required substrings
//! 4. for matching notes, fetch the tags already attached
//! 5. attach the target tag where it is missing
//!
//! Failures in phases 1 and 2 abort the run. Failures in phases 4 and 5 only
//! skip the affected note.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use tagsweep::{ApiClientBuilder, ApiConfig};
//! use tagsweep::tagging::{MatchCriteria, ScanTagger};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ApiConfig::builder().token("abc123").build()?;
//! let client = ApiClientBuilder::new(config).build()?;
//!
//! let tagger = ScanTagger::new(Arc::new(client));
//! let criteria = MatchCriteria::new(["deadline", "project x"]);
//! let summary = tagger.run("Important Project", &criteria)?;
//!
//! println!("tagged {} note(s)", summary.tagged);
//! # Ok(())
//! # }
//! ```

mod associator;
mod matcher;
mod membership;
mod orchestrator;
mod resolver;

use thiserror::Error;

use crate::api::ApiError;

pub use associator::{Association, associate};
pub use matcher::{MatchCriteria, matches};
pub use membership::note_tag_ids;
pub use orchestrator::{
    NoteFailure, NoteOutcome, RunObserver, RunSummary, ScanTagger, SilentObserver,
};
pub use resolver::{TagResolution, resolve_tag};

/// Errors that stop a tagging run.
#[derive(Debug, Error)]
pub enum TagError {
    /// No substrings were supplied.
    #[error("At least one required substring must be given")]
    EmptyCriteria,

    /// The tag listing could not be retrieved.
    #[error("Failed to list tags: {0}")]
    ListTags(#[source] ApiError),

    /// The tag did not exist and could not be created.
    #[error("Failed to create tag '{title}': {source}")]
    CreateTag {
        title: String,
        #[source]
        source: ApiError,
    },

    /// The note listing could not be retrieved.
    #[error("Failed to list notes: {0}")]
    ListNotes(#[source] ApiError),
}
