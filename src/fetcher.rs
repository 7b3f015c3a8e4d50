//! Paginated retrieval of backend collections.
//!
//! Collection endpoints answer with `{"items": [...]}`. Pages are requested
//! as `page=1, 2, 3, ...` until one comes back with no items; there is no
//! upper bound on the page number.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::api::{ApiError, NotesApi};

/// A collection endpoint plus the fixed query parameters sent with every page.
///
/// # Examples
///
/// ```
/// use tagsweep::fetcher::CollectionQuery;
///
/// let query = CollectionQuery::new("/notes").param("fields", "id,title,body");
/// assert_eq!(query.endpoint(2), "/notes?page=2&fields=id,title,body");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionQuery {
    path: String,
    params: Vec<(String, String)>,
}

impl CollectionQuery {
    /// Creates a query for the given collection path.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            params: Vec::new(),
        }
    }

    /// Adds a fixed query parameter, kept in insertion order.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// The collection path without query string.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Builds the endpoint for a 1-based page number.
    pub fn endpoint(&self, page: u32) -> String {
        let mut endpoint = format!("{}?page={}", self.path, page);
        for (key, value) in &self.params {
            endpoint.push('&');
            endpoint.push_str(key);
            endpoint.push('=');
            endpoint.push_str(value);
        }
        endpoint
    }
}

/// Response envelope shared by all list endpoints.
#[derive(Debug, Deserialize)]
struct Page {
    /// Absent and `null` both mean an empty page.
    #[serde(default)]
    items: Option<Vec<serde_json::Value>>,
}

/// Fetches every item of a collection, decoding each into `T`.
///
/// Items that fail to decode are logged and dropped; the rest of the page
/// is still used.
///
/// # Errors
///
/// Any transport failure, non-success status, or malformed envelope on any
/// page aborts the whole fetch. No partial result is returned.
pub fn fetch_all<T>(api: &dyn NotesApi, query: &CollectionQuery) -> Result<Vec<T>, ApiError>
where
    T: DeserializeOwned,
{
    let mut items = Vec::new();
    let mut page = 1;

    loop {
        let endpoint = query.endpoint(page);
        debug!(%endpoint, "fetching page");

        let body = api.get(&endpoint)?;
        let envelope: Page = serde_json::from_str(&body).map_err(|source| ApiError::Decode {
            context: format!("{} page {}", query.path(), page),
            source,
        })?;

        let raw_items = envelope.items.unwrap_or_default();
        if raw_items.is_empty() {
            break;
        }

        for raw in raw_items {
            match serde_json::from_value::<T>(raw) {
                Ok(item) => items.push(item),
                Err(e) => warn!(path = query.path(), page, error = %e, "skipping undecodable item"),
            }
        }

        page += 1;
    }

    Ok(items)
}
