//! REST client for the notes backend.
//!
//! This module provides the blocking HTTP client used by every tagging
//! component, the error type for remote calls, and the `NotesApi` trait that
//! lets tests swap in a scripted backend.

mod client;

pub use client::{ApiClient, ApiClientBuilder, ApiError, NotesApi};
