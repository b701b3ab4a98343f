//! Site extractors for MIT video pages.
//!
//! Each extractor recognizes one family of URLs and turns the fetched page
//! into an [`Extraction`]: either a finished [`VideoDescriptor`] or a
//! [`DelegationResult`] pointing somewhere else.
//!
//! # Supported Sites
//!
//! | Site | Module | Key | Result |
//! |------|--------|-----|--------|
//! | MIT TechTV | [`techtv`] | `TechTVMIT` | Full descriptor from the embedded player config |
//! | MIT Video | [`mit_video`] | `MIT` | Delegates the iframe URL to `TechTVMIT` |
//! | MIT OpenCourseWare | [`ocw`] | `OCWMIT` | Delegates to `Youtube`, carrying the subtitles URL |
//!
//! # Common Patterns
//!
//! Extractors are stateless: a compiled URL pattern, a key and a display
//! name. They scrape with regexes over the raw page and `scraper` DOM lookups
//! over the comment-stripped page, and fail with
//! [`ExtractorError::NotFound`](crate::error::ExtractorError::NotFound) as
//! soon as a required value is missing.
//!
//! [`VideoDescriptor`]: crate::models::VideoDescriptor
//! [`DelegationResult`]: crate::models::DelegationResult

pub mod embed_call;
pub mod mit_video;
pub mod ocw;
pub mod techtv;

use crate::error::Result;
use crate::fetch::PageFetcher;
use crate::models::Extraction;
use async_trait::async_trait;
use regex::Regex;

pub use mit_video::MitVideo;
pub use ocw::OcwMit;
pub use techtv::TechTvMit;

/// A site-specific extractor.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Stable key other extractors use to delegate here (e.g. `"TechTVMIT"`).
    fn key(&self) -> &'static str;

    /// Human-readable name, usually the site's host.
    fn display_name(&self) -> &'static str;

    /// Pattern of URLs this extractor accepts.
    fn valid_url(&self) -> &'static Regex;

    /// Returns `true` if this extractor can handle `url`.
    fn suitable(&self, url: &str) -> bool {
        self.valid_url().is_match(url)
    }

    /// Fetch and scrape `url`.
    async fn extract(&self, url: &str, fetcher: &dyn PageFetcher) -> Result<Extraction>;
}

/// The built-in extractors, in matching order.
pub fn builtin() -> Vec<Box<dyn Extractor>> {
    vec![
        Box::new(TechTvMit),
        Box::new(MitVideo),
        Box::new(OcwMit),
    ]
}

/// Capture the named group `group` of `extractor`'s URL pattern.
pub(crate) fn match_url<'u>(
    extractor: &dyn Extractor,
    url: &'u str,
    group: &str,
) -> Result<&'u str> {
    extractor
        .valid_url()
        .captures(url)
        .and_then(|caps| caps.name(group))
        .map(|m| m.as_str())
        .ok_or_else(|| crate::error::ExtractorError::UnsupportedUrl(url.to_string()))
}
