//! Main entry point for the starwarp window.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use starwarp::StarfieldConfig;

use crate::cli::Cli;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if cli.verbose > 0 {
        log::set_max_level(match cli.verbose {
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        });
    } else if cli.quiet {
        log::set_max_level(log::LevelFilter::Error);
    }

    let mut config = match &cli.config {
        Some(path) => StarfieldConfig::from_json_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => StarfieldConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }

    starwarp::run(config).context("running starfield")
}
