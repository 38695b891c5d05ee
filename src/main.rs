use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use swarm_upload_dir::{execute, ActionOutput, GithubActionOutput, HttpConnector, LayeredInputs, StepError};

#[derive(Parser)]
#[command(name = "swarm-upload-dir")]
#[command(version)]
#[command(about = "Upload a directory to a Swarm Bee node as a CI step", long_about = None)]
struct Cli {
    /// TOML file with input values, overridden by INPUT_* variables
    #[arg(long)]
    config: Option<PathBuf>,

    /// Set an input, e.g. --input dir=./build (repeatable, wins over everything else)
    #[arg(long = "input", value_name = "NAME=VALUE", value_parser = parse_key_val)]
    inputs: Vec<(String, String)>,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", s))
}

fn init_tracing() {
    let default_level = if std::env::var("RUNNER_DEBUG").as_deref() == Ok("1") {
        "debug"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_ansi(false)
        .with_target(false)
        .with_writer(std::io::stdout)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    let mut outputs = GithubActionOutput::from_env();

    let source = match LayeredInputs::load(cli.config.as_deref(), &cli.inputs) {
        Ok(source) => source,
        Err(e) => {
            outputs.set_failed(&StepError::Main(e).to_string());
            return ExitCode::FAILURE;
        }
    };

    // Failures are already signaled on the output channel
    match execute(&source, &HttpConnector, &mut outputs).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
