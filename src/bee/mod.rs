// Bee node integration
// Packs a directory into a collection and uploads it through the node's HTTP API

mod client;
mod collection;
mod options;

pub use client::{upload_headers, BeeClient, HttpConnector};
pub use collection::{collect_files, pack_directory, CollectionEntry};
pub use options::{RequestOptions, UploadOptions, UploadResult};

use std::path::Path;

use async_trait::async_trait;

use crate::core::{BatchId, Result};
use crate::inputs::Headers;

/// Something that can upload a directory as a collection
#[async_trait]
pub trait DirectoryUploader: Send + Sync {
    async fn upload_files_from_directory(
        &self,
        batch_id: &BatchId,
        dir: &Path,
        options: &UploadOptions,
        request: &RequestOptions,
    ) -> Result<UploadResult>;
}

/// Builds an uploader for a node endpoint
pub trait Connect {
    type Client: DirectoryUploader;

    fn connect(&self, url: &str, headers: &Headers) -> Result<Self::Client>;
}
