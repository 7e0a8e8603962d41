//! Starlift CLI: batch loader for a song-play star schema.

use std::process::ExitCode;

use clap::Parser;
use tracing::info;

use starlift::{Config, init_tracing, run_job};

/// Command line arguments.
#[derive(Debug, Parser)]
#[command(name = "starlift", about = "Reshape raw song and play-event records into a Parquet star schema")]
struct CliArgs {
    /// Path to the YAML configuration file.
    #[arg(short, long)]
    config: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let args = CliArgs::parse();

    let config = match Config::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run_job(&config).await {
        Ok(stats) => {
            info!(
                songs = stats.songs,
                artists = stats.artists,
                users = stats.users,
                time = stats.time,
                songplays = stats.songplays,
                skipped_rows = stats.skipped_rows,
                "All tables published"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Job failed: {e}");
            ExitCode::FAILURE
        }
    }
}
