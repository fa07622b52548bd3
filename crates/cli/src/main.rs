//! ossup - upload files and remote links to object storage
//!
//! Takes a local file, a directory, a remote link or a list of remote links,
//! uploads them to a bucket and records the results in uploaded_list.json.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod commands;
mod exit_code;
mod output;

use commands::Cli;
use exit_code::ExitCode;
use output::{Formatter, OutputConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    let formatter = Formatter::new(OutputConfig::detect());

    let config = match commands::load_config(cli) {
        Ok(config) => config,
        Err(e) => {
            formatter.error(&e.to_string());
            std::process::exit(ExitCode::from(&e).into());
        }
    };

    let filter = if config.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let exit_code = commands::execute(config, &formatter).await;
    tracing::debug!(%exit_code, "run finished");

    std::process::exit(exit_code.into());
}
