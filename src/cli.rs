//! Command-line arguments for the starwarp binary

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(name = "starwarp")]
#[command(about = "Interactive warp-speed starfield", long_about = None)]
#[command(version)]
pub struct Cli {
    /// JSON file overriding starfield settings
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Fixed random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}
