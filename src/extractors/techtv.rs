//! MIT TechTV extractor.
//!
//! TechTV pages embed their player configuration as JavaScript. The stream
//! variants live in a `bitrates: [...]` JSON array whose `url` entries look
//! like `"mp4:videos/25418/720p.mp4"`, and the CDN prefix they hang off is
//! the `ipadUrl` entry pointing at CloudFront.
//!
//! # URL Pattern
//!
//! `http(s)://techtv.mit.edu/videos/<id>...` and `.../embeds/<id>...`. Both
//! are fetched through the canonical `/videos/<id>` page.

use super::{match_url, Extractor};
use crate::error::{ExtractorError, Result};
use crate::fetch::PageFetcher;
use crate::models::{Extraction, FormatVariant, VideoDescriptor};
use crate::utils::{
    clean_html, get_element_by_id, get_element_text_by_id, search_regex, strip_html_comments,
};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, info, instrument};
use url::Url;

pub const IE_KEY: &str = "TechTVMIT";
pub const IE_NAME: &str = "techtv.mit.edu";

static VALID_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://techtv\.mit\.edu/(?:videos|embeds)/(?P<id>\d+)").unwrap());
static BASE_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"ipadUrl: '(.+?cloudfront.net/)").unwrap());
static BITRATES: Lazy<Regex> = Lazy::new(|| Regex::new(r"bitrates: (\[.+?\])").unwrap());
static THUMBNAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)playlist:.*?url: '(.+?)'").unwrap());

/// One entry of the player's `bitrates` array.
#[derive(Debug, Deserialize)]
struct Bitrate {
    label: String,
    url: String,
    width: u32,
    bitrate: u64,
}

impl Bitrate {
    /// Split `ext:path` and hang the path off the CDN base URL.
    fn into_format(self, base_url: &str) -> Result<FormatVariant> {
        let (ext, path) = self
            .url
            .split_once(':')
            .ok_or_else(|| ExtractorError::parse("video formats", format!("no container prefix in {:?}", self.url)))?;
        let url = format!("{base_url}{path}");
        Url::parse(&url).map_err(|e| ExtractorError::parse("video formats", format!("{url}: {e}")))?;

        Ok(FormatVariant {
            format_id: self.label.clone(),
            url,
            ext: ext.to_string(),
            format: self.label,
            width: self.width,
            vbr: self.bitrate,
        })
    }
}

/// Parse the `bitrates` array into format variants, keeping source order.
pub fn parse_formats(bitrates_json: &str, base_url: &str) -> Result<Vec<FormatVariant>> {
    let bitrates: Vec<Bitrate> = serde_json::from_str(bitrates_json)
        .map_err(|e| ExtractorError::parse("video formats", e))?;
    bitrates
        .into_iter()
        .map(|bitrate| bitrate.into_format(base_url))
        .collect()
}

/// Extractor for `techtv.mit.edu` video and embed pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct TechTvMit;

impl TechTvMit {
    /// Scrape an already downloaded TechTV page.
    pub fn extract_from_page(video_id: &str, raw_page: &str) -> Result<VideoDescriptor> {
        let clean_page = strip_html_comments(raw_page);

        let base_url = search_regex(&BASE_URL, raw_page, "base url")?;
        let formats_json = search_regex(&BITRATES, raw_page, "video formats")?;
        let formats = parse_formats(formats_json, base_url)?;
        debug!(count = formats.len(), %base_url, "Parsed TechTV formats");

        let title = get_element_text_by_id("edit-title", &clean_page)
            .ok_or_else(|| ExtractorError::not_found("title"))?;
        let description = get_element_by_id("edit-description", &clean_page)
            .map(|html| clean_html(&html))
            .ok_or_else(|| ExtractorError::not_found("description"))?;
        let thumbnail = search_regex(&THUMBNAIL, raw_page, "thumbnail")?;

        Ok(VideoDescriptor {
            id: video_id.to_string(),
            title,
            description,
            thumbnail: Some(thumbnail.to_string()),
            formats,
            subtitles: None,
        })
    }
}

#[async_trait]
impl Extractor for TechTvMit {
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
        let video_id = match_url(self, url, "id")?;
        let page_url = format!("http://techtv.mit.edu/videos/{video_id}");
        let raw_page = fetcher.fetch_page_text(&page_url, video_id).await?;

        let video = Self::extract_from_page(video_id, &raw_page)?;
        info!(id = %video.id, formats = video.formats.len(), "Extracted TechTV video");
        Ok(Extraction::Video(video))
    }
}
