use std::io;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client as HttpClient, Response, StatusCode};
use url::Url;

use super::collection::pack_directory;
use super::options::{NodeErrorResponse, ReferenceResponse, RequestOptions, UploadOptions, UploadResult};
use super::{Connect, DirectoryUploader};
use crate::core::{BatchId, BeeError, Result};
use crate::inputs::Headers;

pub const SWARM_POSTAGE_BATCH_ID: &str = "swarm-postage-batch-id";
pub const SWARM_COLLECTION: &str = "swarm-collection";
pub const SWARM_PIN: &str = "swarm-pin";
pub const SWARM_ENCRYPT: &str = "swarm-encrypt";
pub const SWARM_DEFERRED_UPLOAD: &str = "swarm-deferred-upload";
pub const SWARM_TAG: &str = "swarm-tag";
pub const SWARM_INDEX_DOCUMENT: &str = "swarm-index-document";
pub const SWARM_ERROR_DOCUMENT: &str = "swarm-error-document";

/// Base delay between attempts, multiplied by the attempt number
const RETRY_DELAY: Duration = Duration::from_millis(250);

/// HTTP client for a single Bee node
#[derive(Debug, Clone)]
pub struct BeeClient {
    /// Node API root, always ending in `/`
    url: Url,

    /// Underlying HTTP client carrying the custom headers
    http: HttpClient,
}

impl BeeClient {
    /// Create a client for the node at `url` that sends `headers` with every request
    pub fn new(url: &str, headers: &Headers) -> Result<Self> {
        let mut url = Url::parse(url).map_err(|e| BeeError::InvalidUrl(format!("{}: {}", url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(BeeError::InvalidUrl(format!("unsupported scheme '{}'", url.scheme())));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        let mut default_headers = HeaderMap::new();
        for (name, value) in headers.iter() {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| BeeError::InvalidHeader(format!("invalid header name: {}", name)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| BeeError::InvalidHeader(format!("invalid value for header {}", name)))?;
            default_headers.insert(name, value);
        }

        let http = HttpClient::builder().default_headers(default_headers).build()?;

        Ok(Self { url, http })
    }

    /// Node API root
    pub fn url(&self) -> &Url {
        &self.url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.url
            .join(path)
            .map_err(|e| BeeError::InvalidUrl(format!("{}: {}", path, e)))
    }

    /// Upload every file below `dir` as one collection
    pub async fn upload_files_from_directory(
        &self,
        batch_id: &BatchId,
        dir: &Path,
        options: &UploadOptions,
        request: &RequestOptions,
    ) -> Result<UploadResult> {
        let owned_dir = dir.to_path_buf();
        let body = tokio::task::spawn_blocking(move || pack_directory(&owned_dir))
            .await
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))??;

        tracing::debug!(bytes = body.len(), dir = %dir.display(), "packed collection");

        let headers = upload_headers(batch_id, options)?;
        let response = self.send_with_retry(self.endpoint("bzz")?, headers, body, request).await?;
        let response = check_status(response).await?;

        let tag_uid = response
            .headers()
            .get(SWARM_TAG)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok());

        let body: ReferenceResponse = response
            .json()
            .await
            .map_err(|e| BeeError::Decode(format!("failed to parse upload response: {}", e)))?;

        Ok(UploadResult {
            reference: body.reference,
            tag_uid,
        })
    }

    async fn send_with_retry(
        &self,
        url: Url,
        headers: HeaderMap,
        body: Bytes,
        request: &RequestOptions,
    ) -> Result<Response> {
        let max_retries = request.retry.unwrap_or(0);
        let mut attempt = 0;

        loop {
            let mut builder = self
                .http
                .post(url.clone())
                .headers(headers.clone())
                .body(body.clone());
            if let Some(timeout) = request.timeout_duration() {
                builder = builder.timeout(timeout);
            }

            let outcome = builder.send().await;
            let retryable = match &outcome {
                Ok(response) => is_retryable_status(response.status()),
                Err(e) => e.is_connect() || e.is_timeout(),
            };

            if !retryable || attempt >= max_retries {
                return outcome.map_err(BeeError::from);
            }

            attempt += 1;
            match &outcome {
                Ok(response) => tracing::warn!(status = %response.status(), attempt, max_retries, "retrying upload"),
                Err(e) => tracing::warn!(error = %e, attempt, max_retries, "retrying upload"),
            }
            tokio::time::sleep(RETRY_DELAY * attempt).await;
        }
    }
}

#[async_trait]
impl DirectoryUploader for BeeClient {
    async fn upload_files_from_directory(
        &self,
        batch_id: &BatchId,
        dir: &Path,
        options: &UploadOptions,
        request: &RequestOptions,
    ) -> Result<UploadResult> {
        BeeClient::upload_files_from_directory(self, batch_id, dir, options, request).await
    }
}

/// Connects real HTTP clients
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpConnector;

impl Connect for HttpConnector {
    type Client = BeeClient;

    fn connect(&self, url: &str, headers: &Headers) -> Result<BeeClient> {
        BeeClient::new(url, headers)
    }
}

/// Headers describing one collection upload. Unset options are not sent.
pub fn upload_headers(batch_id: &BatchId, options: &UploadOptions) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/x-tar"));
    headers.insert(SWARM_COLLECTION, HeaderValue::from_static("true"));
    headers.insert(SWARM_POSTAGE_BATCH_ID, header_value(batch_id.as_str())?);

    if let Some(pin) = options.pin {
        headers.insert(SWARM_PIN, bool_value(pin));
    }
    if let Some(encrypt) = options.encrypt {
        headers.insert(SWARM_ENCRYPT, bool_value(encrypt));
    }
    if let Some(deferred) = options.deferred {
        headers.insert(SWARM_DEFERRED_UPLOAD, bool_value(deferred));
    }
    if let Some(tag) = options.tag {
        headers.insert(SWARM_TAG, HeaderValue::from(tag));
    }
    if let Some(index) = &options.index_document {
        headers.insert(SWARM_INDEX_DOCUMENT, header_value(index)?);
    }
    if let Some(error) = &options.error_document {
        headers.insert(SWARM_ERROR_DOCUMENT, header_value(error)?);
    }

    Ok(headers)
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|_| BeeError::InvalidHeader(format!("invalid header value: {}", value)))
}

fn bool_value(value: bool) -> HeaderValue {
    HeaderValue::from_static(if value { "true" } else { "false" })
}

fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Turn a non-success response into an error carrying the node's message
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<NodeErrorResponse>(&text)
        .ok()
        .and_then(|body| body.message)
        .filter(|message| !message.is_empty())
        .or_else(|| Some(text.trim().to_string()).filter(|text| !text.is_empty()))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());

    Err(BeeError::Response {
        status: status.as_u16(),
        message,
    })
}
