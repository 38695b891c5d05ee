use std::time::Duration;

use serde::Deserialize;

/// Options for a collection upload. `None` leaves the node default in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadOptions {
    /// Return before chunks are synced to the network
    pub deferred: Option<bool>,
    pub encrypt: Option<bool>,
    /// Path served when a requested path is missing
    pub error_document: Option<String>,
    /// Path served for the collection root
    pub index_document: Option<String>,
    pub pin: Option<bool>,
    /// Existing tag to attach the upload to
    pub tag: Option<u64>,
}

/// Transport options for a single request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Extra attempts after a retryable failure
    pub retry: Option<u32>,
    /// Per-attempt timeout in milliseconds
    pub timeout: Option<u64>,
}

impl RequestOptions {
    pub fn timeout_duration(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_millis)
    }
}

/// What the node returns for a finished upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    pub reference: String,
    /// Tag tracking chunk sync, absent when the node did not report one
    pub tag_uid: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReferenceResponse {
    pub reference: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NodeErrorResponse {
    pub message: Option<String>,
}
