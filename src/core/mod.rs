pub mod config;
pub mod error;

use std::fmt;

pub use self::config::LayeredInputs;
pub use self::error::{BeeError, InputError, Result, StepError};

/// Length of a postage batch id in hex characters
pub const BATCH_ID_HEX_LENGTH: usize = 64;

/// Identifier of a prepaid postage batch on the storage network
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BatchId(String);

impl BatchId {
    /// Validate a batch id given as hex text.
    ///
    /// Upper and lower case digits are both accepted and the text is kept as
    /// written.
    pub fn parse(hex: &str) -> std::result::Result<Self, InputError> {
        if hex.len() != BATCH_ID_HEX_LENGTH {
            return Err(InputError::InvalidBatchIdFormat);
        }

        match hex::decode(hex) {
            Ok(bytes) if bytes.len() == BATCH_ID_HEX_LENGTH / 2 => Ok(Self(hex.to_string())),
            _ => Err(InputError::InvalidBatchIdFormat),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for BatchId {
    type Err = InputError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}
