//! Scripted in-memory backend shared by unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::api::{ApiError, NotesApi};

/// Answers each endpoint with a canned body or status and records every call.
///
/// Unscripted GETs answer 404, unscripted POSTs answer `{}`.
#[derive(Default)]
pub struct ScriptedApi {
    gets: HashMap<String, Result<String, u16>>,
    posts: HashMap<String, Result<String, u16>>,
    get_log: Mutex<Vec<String>>,
    post_log: Mutex<Vec<(String, serde_json::Value)>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_get(mut self, endpoint: &str, body: &str) -> Self {
        self.gets.insert(endpoint.to_string(), Ok(body.to_string()));
        self
    }

    pub fn fail_get(mut self, endpoint: &str, status: u16) -> Self {
        self.gets.insert(endpoint.to_string(), Err(status));
        self
    }

    pub fn on_post(mut self, endpoint: &str, body: &str) -> Self {
        self.posts.insert(endpoint.to_string(), Ok(body.to_string()));
        self
    }

    pub fn fail_post(mut self, endpoint: &str, status: u16) -> Self {
        self.posts.insert(endpoint.to_string(), Err(status));
        self
    }

    pub fn gets(&self) -> Vec<String> {
        self.get_log.lock().unwrap().clone()
    }

    pub fn posts(&self) -> Vec<(String, serde_json::Value)> {
        self.post_log.lock().unwrap().clone()
    }
}

fn answer(
    scripted: Option<&Result<String, u16>>,
    endpoint: &str,
    fallback: Result<String, u16>,
) -> Result<String, ApiError> {
    match scripted.cloned().unwrap_or(fallback) {
        Ok(body) => Ok(body),
        Err(status) => Err(ApiError::Http {
            status,
            endpoint: endpoint.to_string(),
        }),
    }
}

impl NotesApi for ScriptedApi {
    fn get(&self, endpoint: &str) -> Result<String, ApiError> {
        self.get_log.lock().unwrap().push(endpoint.to_string());
        answer(self.gets.get(endpoint), endpoint, Err(404))
    }

    fn post(&self, endpoint: &str, body: &serde_json::Value) -> Result<String, ApiError> {
        self.post_log
            .lock()
            .unwrap()
            .push((endpoint.to_string(), body.clone()));
        answer(self.posts.get(endpoint), endpoint, Ok("{}".to_string()))
    }
}
