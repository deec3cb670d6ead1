mod article;
mod client;
mod config;
mod constant;
mod feed;
mod llm;
mod notify;
mod pipeline;
mod summarizer;
mod translate;

#[cfg(test)]
mod test_utils;

use anyhow::Result;
use chrono::Utc;

use std::process::ExitCode;

use crate::config::{Config, USAGE};
use crate::pipeline::{Pipeline, RunReport};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    setup_env_and_tracing();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}\n\n{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    match run(&config).await {
        Ok(report) => {
            tracing::info!(
                "Done: {} of {} recent articles summarized, {} translated",
                report.summarized,
                report.recent,
                report.translated
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: &Config) -> Result<RunReport> {
    let pipeline = Pipeline::from_config(config)?;
    let mut stdout = std::io::stdout().lock();
    pipeline.run_once(Utc::now(), &mut stdout).await
}

pub fn setup_env_and_tracing() {
    dotenv::dotenv().ok();
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
