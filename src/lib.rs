//! swarm-upload-dir: a CI step that uploads a directory to a Swarm Bee node
//! and publishes the resulting reference as step outputs

pub mod action;
pub mod bee;
pub mod core;
pub mod inputs;
pub mod runner;
pub mod utils;

// Re-export main components for easier consumption
pub use action::{ActionOutput, GithubActionOutput, MemoryOutput};
pub use bee::{BeeClient, Connect, DirectoryUploader, HttpConnector, RequestOptions, UploadOptions, UploadResult};
pub use crate::core::{BatchId, BeeError, InputError, LayeredInputs, StepError};
pub use inputs::{Headers, InputSource, RunInputs};
pub use runner::{execute, run};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
