//! Output channel of the CI host.

mod github;

pub use github::{escape_data, escape_property, GithubActionOutput};

use std::io;

/// Where a step publishes its outputs and failure
pub trait ActionOutput {
    /// Publish several outputs together: either all of them land or none do
    fn set_outputs(&mut self, outputs: &[(&str, &str)]) -> io::Result<()>;

    /// Publish a named output value
    fn set_output(&mut self, name: &str, value: &str) -> io::Result<()> {
        self.set_outputs(&[(name, value)])
    }

    /// Mark the step failed with a message
    fn set_failed(&mut self, message: &str);

    fn is_failed(&self) -> bool;
}

/// Records outputs and failures in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryOutput {
    pub outputs: Vec<(String, String)>,
    pub failures: Vec<String>,
}

impl MemoryOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output(&self, name: &str) -> Option<&str> {
        self.outputs
            .iter()
            .rev()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }
}

impl ActionOutput for MemoryOutput {
    fn set_outputs(&mut self, outputs: &[(&str, &str)]) -> io::Result<()> {
        self.outputs
            .extend(outputs.iter().map(|(name, value)| (name.to_string(), value.to_string())));
        Ok(())
    }

    fn set_failed(&mut self, message: &str) {
        self.failures.push(message.to_string());
    }

    fn is_failed(&self) -> bool {
        !self.failures.is_empty()
    }
}
