//! # mit_video
//!
//! Command-line front end: extracts every URL given on the command line,
//! prints each result as JSON, and optionally writes `.info.json` files.
//!
//! ## Usage
//!
//! ```sh
//! mit_video -j ./info http://techtv.mit.edu/videos/25418-mit-dna-learning-center-set
//! ```

use clap::Parser;
use futures::stream::{self, StreamExt};
use mit_video::cli::Cli;
use mit_video::dispatch::Dispatcher;
use mit_video::fetch::HttpFetcher;
use mit_video::output::{ensure_writable_dir, to_json, write_info_json};
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("mit_video starting up");

    let args = Cli::parse();
    debug!(urls = ?args.urls, ?args.json_output_dir, "Parsed CLI arguments");

    // Early check: ensure JSON output dir is writable
    if let Some(dir) = &args.json_output_dir {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(
                path = %dir.display(),
                error = %e,
                "JSON output directory is not writable (fix perms or choose a different path)"
            );
            return Err(e.into());
        }
    }

    let fetcher = HttpFetcher::new(&args.fetch_config())?;
    let dispatcher = Dispatcher::new(Box::new(fetcher));

    let total = args.urls.len();
    let results: Vec<bool> = stream::iter(args.urls.iter())
        .map(|url| {
            let dispatcher = &dispatcher;
            let json_output_dir = args.json_output_dir.as_deref();
            async move {
                let extraction = match dispatcher.extract(url).await {
                    Ok(extraction) => extraction,
                    Err(e) => {
                        error!(%url, error = %e, "Extraction failed");
                        return false;
                    }
                };

                match to_json(&extraction) {
                    Ok(json) => println!("{json}"),
                    Err(e) => {
                        error!(%url, error = %e, "Failed to serialize result");
                        return false;
                    }
                }

                if let Some(dir) = json_output_dir {
                    if let Err(e) = write_info_json(&extraction, dir).await {
                        error!(%url, error = %e, "Failed to write info JSON");
                        return false;
                    }
                }
                true
            }
        })
        .buffered(usize::from(args.jobs))
        .collect()
        .await;

    let failed = results.iter().filter(|ok| !**ok).count();
    let elapsed = start_time.elapsed();
    info!(
        total,
        succeeded = total - failed,
        failed,
        millis = elapsed.as_millis() as u64,
        "Execution complete"
    );

    if failed > 0 {
        return Err(format!("{failed} of {total} extractions failed").into());
    }
    Ok(())
}
