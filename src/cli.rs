//! Command-line interface definitions.
//!
//! All options can be provided via command-line flags or environment
//! variables.

use crate::fetch::{FetchConfig, DEFAULT_USER_AGENT};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Extract video metadata from MIT TechTV, MIT Video and OpenCourseWare pages.
///
/// # Examples
///
/// ```sh
/// # Print the extracted metadata as JSON
/// mit_video http://techtv.mit.edu/videos/25418-mit-dna-learning-center-set
///
/// # Also write one .info.json file per URL
/// mit_video -j ./info http://video.mit.edu/watch/the-government-is-profiling-you-13222/
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Page URLs to extract
    #[arg(required = true)]
    pub urls: Vec<String>,

    /// Output directory for .info.json files
    #[arg(short, long, env = "MIT_VIDEO_JSON_DIR")]
    pub json_output_dir: Option<PathBuf>,

    /// User-Agent header sent with every request
    #[arg(long, env = "MIT_VIDEO_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "MIT_VIDEO_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Number of URLs extracted concurrently
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u16).range(1..))]
    pub jobs: u16,
}

impl Cli {
    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            user_agent: self.user_agent.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}
