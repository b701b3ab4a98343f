//! MIT Video watch pages.
//!
//! `video.mit.edu/watch/<slug>` pages carry no metadata of their own; they
//! embed a TechTV player in an iframe. This extractor only finds that iframe
//! and hands its URL to [`TechTvMit`](super::TechTvMit).

use super::{match_url, techtv, Extractor, TechTvMit};
use crate::error::Result;
use crate::fetch::PageFetcher;
use crate::models::{DelegationResult, Extraction};
use crate::utils::search_regex;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, instrument};

pub const IE_KEY: &str = "MIT";
pub const IE_NAME: &str = "video.mit.edu";

static VALID_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://video\.mit\.edu/watch/(?P<slug>[^/]+)").unwrap());
static EMBED_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r#"<iframe .*?src="(.+?)""#).unwrap());

/// Extractor for `video.mit.edu` watch pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct MitVideo;

#[async_trait]
impl Extractor for MitVideo {
    fn key(&self) -> &'static str {
        IE_KEY
    }

    fn display_name(&self) -> &'static str {
        IE_NAME
    }

    fn valid_url(&self) -> &'static Regex {
        &VALID_URL
    }

    #[instrument(level = "info", skip_all, fields(%url))]
    async fn extract(&self, url: &str, fetcher: &dyn PageFetcher) -> Result<Extraction> {
        let slug = match_url(self, url, "slug")?;
        let webpage = fetcher.fetch_page_text(url, slug).await?;

        info!(%slug, target = TechTvMit.display_name(), "Extracting embedded player url");
        let embed_url = search_regex(&EMBED_URL, &webpage, "embed url")?;

        Ok(Extraction::Delegate(DelegationResult::new(
            embed_url,
            techtv::IE_KEY,
        )))
    }
}
