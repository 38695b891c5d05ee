use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;

use uuid::Uuid;

use super::ActionOutput;

/// Environment variable naming the runner's step output file
pub const GITHUB_OUTPUT: &str = "GITHUB_OUTPUT";

/// Publishes outputs the way the GitHub Actions runner reads them.
///
/// Outputs go to the `GITHUB_OUTPUT` file when the runner provides one,
/// otherwise to the legacy `::set-output` command on `out`.
pub struct GithubActionOutput<W: Write> {
    output_file: Option<PathBuf>,
    out: W,
    failed: bool,
}

impl GithubActionOutput<io::Stdout> {
    /// Output channel for the current process
    pub fn from_env() -> Self {
        let output_file = std::env::var_os(GITHUB_OUTPUT)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        Self::new(output_file, io::stdout())
    }
}

impl<W: Write> GithubActionOutput<W> {
    pub fn new(output_file: Option<PathBuf>, out: W) -> Self {
        Self {
            output_file,
            out,
            failed: false,
        }
    }

    /// Give back the command stream
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Heredoc entries for the output file, one delimiter per entry
    fn file_entries(outputs: &[(&str, &str)]) -> io::Result<String> {
        let mut entries = String::new();
        for (name, value) in outputs {
            let delimiter = format!("ghadelimiter_{}", Uuid::new_v4());
            if name.contains(&delimiter) || value.contains(&delimiter) {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("output {} must not contain the delimiter {}", name, delimiter),
                ));
            }
            entries.push_str(&format!("{name}<<{delimiter}\n{value}\n{delimiter}\n"));
        }
        Ok(entries)
    }

    fn command_entries(outputs: &[(&str, &str)]) -> String {
        outputs
            .iter()
            .map(|(name, value)| format!("::set-output name={}::{}\n", escape_property(name), escape_data(value)))
            .collect()
    }
}

impl<W: Write> ActionOutput for GithubActionOutput<W> {
    fn set_outputs(&mut self, outputs: &[(&str, &str)]) -> io::Result<()> {
        match &self.output_file {
            Some(path) => {
                let entries = Self::file_entries(outputs)?;
                let mut file = OpenOptions::new().create(true).append(true).open(path)?;
                file.write_all(entries.as_bytes())
            }
            None => {
                self.out.write_all(Self::command_entries(outputs).as_bytes())?;
                self.out.flush()
            }
        }
    }

    fn set_failed(&mut self, message: &str) {
        self.failed = true;
        // Nowhere left to report a failure to write the failure
        let _ = writeln!(self.out, "::error::{}", escape_data(message));
        let _ = self.out.flush();
    }

    fn is_failed(&self) -> bool {
        self.failed
    }
}

/// Escape a workflow command message
pub fn escape_data(value: &str) -> String {
    value.replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A")
}

/// Escape a workflow command property value
pub fn escape_property(value: &str) -> String {
    escape_data(value).replace(':', "%3A").replace(',', "%2C")
}
