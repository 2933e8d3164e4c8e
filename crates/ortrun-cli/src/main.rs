mod cli;
mod render;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use ortrun_backend_ort::OrtEngine;
use ortrun_core::run_model;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", error_line(&err));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let filter = EnvFilter::try_new(&cli.log).context("invalid --log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let request = cli.into_request()?;
    tracing::debug!(model = %request.model_path.display(), dims = ?request.dynamic_dims, "starting run");

    let report = run_model(&OrtEngine::new(), &request)?;
    print!("{}", render::render(&report));
    Ok(())
}

/// One-line failure message, context chain included.
fn error_line(err: &anyhow::Error) -> String {
    format!("error: {err:#}")
}
