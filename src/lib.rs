pub mod api;
pub mod config;
pub mod fetcher;
pub mod models;
pub mod tagging;

#[cfg(test)]
mod testing;

pub use api::{ApiClient, ApiClientBuilder, ApiError, NotesApi};
pub use config::{ApiConfig, ApiConfigBuilder, ConfigError};
pub use models::{Note, NoteBuilder, NoteId, Tag, TagId};
pub use tagging::{MatchCriteria, RunSummary, ScanTagger, TagError};
