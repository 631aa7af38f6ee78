//! In-memory fetcher for tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{Credential, FetchedFile, Fetcher, Location};
use crate::error::FetchError;

#[derive(Debug, Clone)]
enum MockResponse {
    Body(Vec<u8>),
    Status(u16),
}

/// Serves canned responses keyed by the location's display string.
///
/// Unknown locations behave like missing files (for paths) or HTTP 404
/// (for URLs). Every request is recorded together with the credential it
/// carried, so tests can check which token went where.
#[derive(Debug, Clone, Default)]
pub struct MockFetcher {
    responses: HashMap<String, MockResponse>,
    requests: Arc<Mutex<Vec<(String, Option<String>)>>>,
}

impl MockFetcher {
    /// Create a fetcher with no responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `location`.
    pub fn with_text(self, location: impl Into<String>, body: impl Into<String>) -> Self {
        self.with_bytes(location, body.into().into_bytes())
    }

    /// Serve raw bytes for `location`.
    pub fn with_bytes(mut self, location: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.responses
            .insert(location.into(), MockResponse::Body(body.into()));
        self
    }

    /// Answer `location` with a non-success HTTP status.
    pub fn with_status(mut self, location: impl Into<String>, status: u16) -> Self {
        self.responses
            .insert(location.into(), MockResponse::Status(status));
        self
    }

    /// Requests made so far, as `(location, credential token)` pairs.
    ///
    /// The token is what would have been sent, so it is `None` for hosts
    /// that do not accept credentials.
    pub fn requests(&self) -> Vec<(String, Option<String>)> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    fn respond(
        &self,
        location: &Location,
        credential: Option<&Credential>,
    ) -> Result<Vec<u8>, FetchError> {
        let key = location.to_string();
        let sent = credential
            .filter(|_| location.accepts_credential())
            .map(|c| c.expose().to_string());
        if let Ok(mut requests) = self.requests.lock() {
            requests.push((key.clone(), sent));
        }

        match (self.responses.get(&key), location) {
            (Some(MockResponse::Body(body)), _) => Ok(body.clone()),
            (Some(MockResponse::Status(status)), _) => Err(FetchError::Status {
                url: key,
                status: *status,
            }),
            (None, Location::Url(_)) => Err(FetchError::Status {
                url: key,
                status: 404,
            }),
            (None, Location::Path(path)) => Err(FetchError::FileNotFound { path: path.clone() }),
        }
    }
}

impl Fetcher for MockFetcher {
    fn fetch_text(
        &self,
        location: &Location,
        credential: Option<&Credential>,
    ) -> Result<String, FetchError> {
        let bytes = self.respond(location, credential)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn fetch_binary(
        &self,
        location: &Location,
        credential: Option<&Credential>,
    ) -> Result<FetchedFile, FetchError> {
        let bytes = self.respond(location, credential)?;
        FetchedFile::from_bytes(&bytes, &location.extension_suffix())
    }
}
