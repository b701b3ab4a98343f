//! # mit_video
//!
//! Extracts downloadable video metadata (title, description, stream URLs,
//! subtitles) from MIT video sites by scraping the player configuration
//! embedded in their HTML pages.
//!
//! ## Sites
//!
//! - **MIT TechTV** (`techtv.mit.edu`): stream variants, title, description
//!   and thumbnail straight from the page
//! - **MIT Video** (`video.mit.edu/watch/...`): delegates to the TechTV player
//!   embedded in the page
//! - **MIT OpenCourseWare** (`ocw.mit.edu/courses/...`): delegates to YouTube
//!   and attaches the lecture's subtitles URL
//!
//! ## Usage
//!
//! ```no_run
//! use mit_video::dispatch::Dispatcher;
//! use mit_video::fetch::{FetchConfig, HttpFetcher};
//!
//! # async fn example() -> mit_video::error::Result<()> {
//! let fetcher = HttpFetcher::new(&FetchConfig::default())?;
//! let dispatcher = Dispatcher::new(Box::new(fetcher));
//! let extraction = dispatcher
//!     .extract("http://techtv.mit.edu/videos/25418-mit-dna-learning-center-set")
//!     .await?;
//! println!("{}", mit_video::output::to_json(&extraction)?);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod dispatch;
pub mod error;
pub mod extractors;
pub mod fetch;
pub mod models;
pub mod output;
pub mod utils;

pub use dispatch::{Dispatcher, PlatformResolver};
pub use error::{ExtractorError, Result};
pub use models::{DelegationResult, Extraction, FormatVariant, VideoDescriptor};
