//! Layered source for step inputs.
//!
//! Precedence, lowest first: optional TOML file, `INPUT_*` environment
//! variables exported by the runner, explicit `name=value` overrides.

use std::ffi::OsString;
use std::path::Path;

use config::{Config, File, FileFormat};

use super::InputError;
use crate::inputs::InputSource;

/// Prefix the Actions runner puts in front of every step input variable
pub const INPUT_ENV_PREFIX: &str = "INPUT_";

/// Step inputs merged from file, environment and command line
#[derive(Debug, Clone)]
pub struct LayeredInputs {
    config: Config,
}

/// Normalize an input name the way the runner does before exporting it.
/// Lookups are case-insensitive.
pub fn input_key(name: &str) -> String {
    name.trim().replace(' ', "_").to_lowercase()
}

impl LayeredInputs {
    /// Load inputs from the process environment
    pub fn load(config_file: Option<&Path>, overrides: &[(String, String)]) -> Result<Self, InputError> {
        Self::from_parts(config_file, input_vars(std::env::vars_os()), overrides)
    }

    /// Build inputs from explicit parts
    pub fn from_parts<I>(
        config_file: Option<&Path>,
        env: I,
        overrides: &[(String, String)],
    ) -> Result<Self, InputError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut builder = Config::builder();

        if let Some(path) = config_file {
            if !path.is_file() {
                return Err(InputError::Source(format!("config file not found: {}", path.display())));
            }
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }

        for (var, value) in env {
            let Some(name) = strip_prefix_ignore_case(&var, INPUT_ENV_PREFIX) else {
                continue;
            };
            if name.is_empty() || !is_plain_key(name) {
                continue;
            }
            builder = builder.set_override(input_key(name), value)?;
        }

        for (name, value) in overrides {
            builder = builder.set_override(input_key(name), value.as_str())?;
        }

        Ok(Self { config: builder.build()? })
    }
}

impl InputSource for LayeredInputs {
    fn raw(&self, name: &str) -> Option<String> {
        self.config.get_string(&input_key(name)).ok()
    }
}

/// Keep the variables that can carry step inputs.
///
/// Names that are not UTF-8 cannot be inputs and are dropped; input values
/// that are not UTF-8 are converted lossily.
pub fn input_vars<I>(vars: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    vars.into_iter()
        .filter_map(|(name, value)| {
            let name = name.into_string().ok()?;
            strip_prefix_ignore_case(&name, INPUT_ENV_PREFIX)?;
            Some((name, value.to_string_lossy().into_owned()))
        })
        .collect()
}

fn strip_prefix_ignore_case<'a>(value: &'a str, prefix: &str) -> Option<&'a str> {
    let head = value.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        value.get(prefix.len()..)
    } else {
        None
    }
}

/// Keys the config path parser takes as a single segment
fn is_plain_key(name: &str) -> bool {
    name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == ' ')
}
