//! Step inputs: lookup, coercion and validation.

mod headers;
mod options;

pub use headers::{parse_headers, Headers};
pub use options::{to_boolean, to_number, to_string};

use std::collections::HashMap;
use std::path::PathBuf;

use crate::bee::{RequestOptions, UploadOptions};
use crate::core::{BatchId, InputError};

pub const BEE_URL: &str = "bee-url";
pub const POSTAGE_BATCH_ID: &str = "postage-batch-id";
pub const DIR: &str = "dir";
pub const HEADERS: &str = "headers";
pub const DEFERRED: &str = "deferred";
pub const ENCRYPT: &str = "encrypt";
pub const ERROR_DOCUMENT: &str = "error-document";
pub const INDEX_DOCUMENT: &str = "index-document";
pub const PIN: &str = "pin";
pub const TAG: &str = "tag";
pub const RETRY: &str = "retry";
pub const TIMEOUT: &str = "timeout";

/// Where raw input text comes from
pub trait InputSource {
    /// Raw value of a named input, `None` if it was never set
    fn raw(&self, name: &str) -> Option<String>;
}

impl InputSource for HashMap<String, String> {
    fn raw(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Read an input, trimmed. Absent optional inputs read as empty text.
pub fn get_input(source: &dyn InputSource, name: &str, required: bool) -> Result<String, InputError> {
    let value = source.raw(name).unwrap_or_default().trim().to_string();
    if required && value.is_empty() {
        return Err(InputError::MissingRequiredInput(name.to_string()));
    }
    Ok(value)
}

/// Everything one upload needs, resolved from raw inputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunInputs {
    pub bee_url: String,
    pub postage_batch_id: BatchId,
    pub dir: PathBuf,
    pub headers: Headers,
    pub options: UploadOptions,
    pub request_options: RequestOptions,
}

impl RunInputs {
    /// Resolve and validate all inputs.
    ///
    /// The batch id is read and checked before anything else.
    pub fn resolve(source: &dyn InputSource) -> Result<Self, InputError> {
        let postage_batch_id = BatchId::parse(&get_input(source, POSTAGE_BATCH_ID, true)?)?;
        let bee_url = get_input(source, BEE_URL, true)?;
        let dir = PathBuf::from(get_input(source, DIR, true)?);

        let options = UploadOptions {
            deferred: to_boolean(&get_input(source, DEFERRED, false)?),
            encrypt: to_boolean(&get_input(source, ENCRYPT, false)?),
            error_document: to_string(&get_input(source, ERROR_DOCUMENT, false)?),
            index_document: to_string(&get_input(source, INDEX_DOCUMENT, false)?),
            pin: to_boolean(&get_input(source, PIN, false)?),
            tag: to_number(TAG, &get_input(source, TAG, false)?)?,
        };

        let request_options = RequestOptions {
            retry: to_number(RETRY, &get_input(source, RETRY, false)?)?,
            timeout: to_number(TIMEOUT, &get_input(source, TIMEOUT, false)?)?,
        };

        // Header lines carry their own whitespace rules, read them untrimmed
        let headers = parse_headers(&source.raw(HEADERS).unwrap_or_default())?;

        Ok(Self {
            bee_url,
            postage_batch_id,
            dir,
            headers,
            options,
            request_options,
        })
    }
}
