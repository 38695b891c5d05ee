use thiserror::Error;

/// Result type used by the storage node client
pub type Result<T> = std::result::Result<T, BeeError>;

/// Errors raised while resolving and validating step inputs
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// A required input was absent or empty
    #[error("Input required and not supplied: {0}")]
    MissingRequiredInput(String),

    /// The postage batch id is not 64 hex characters
    #[error("postage-batch-id must be a 64-character hexadecimal string")]
    InvalidBatchIdFormat,

    /// A numeric input did not parse as a base-10 number
    #[error("Input {name} must be a base-10 number, got '{value}'")]
    InvalidNumber { name: String, value: String },

    /// A header line is not of the form `Name: Value`
    #[error("Invalid header line '{0}', expected 'Name: Value'")]
    InvalidHeader(String),

    /// The configuration layer could not be built
    #[error("Configuration error: {0}")]
    Source(String),
}

/// Errors raised by the storage node client
#[derive(Error, Debug)]
pub enum BeeError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// The node answered with a non-success status
    #[error("Request failed with status {status}: {message}")]
    Response { status: u16, message: String },

    #[error("Invalid Bee URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid request header: {0}")]
    InvalidHeader(String),

    #[error("Unexpected response from node: {0}")]
    Decode(String),
}

/// Terminal failure of one step invocation.
///
/// The display text is exactly the message handed to the CI host.
#[derive(Error, Debug)]
pub enum StepError {
    #[error("Error running main: {0}")]
    Main(#[from] InputError),

    #[error("Error uploading files: {0}")]
    Upload(String),

    #[error("{0}")]
    Unhandled(String),
}

impl From<BeeError> for StepError {
    fn from(err: BeeError) -> Self {
        StepError::Upload(err.to_string())
    }
}

impl From<config::ConfigError> for InputError {
    fn from(err: config::ConfigError) -> Self {
        InputError::Source(err.to_string())
    }
}
