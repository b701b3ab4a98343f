//! MIT OpenCourseWare lecture pages.
//!
//! Lecture videos are hosted on YouTube; the course page only knows the
//! YouTube id and where the captions file lives. Both come from the
//! `ocw_embed_chapter_media(...)` or `ocw_embed_media(...)` call in the page
//! script, and the result is a delegation to the `Youtube` platform with the
//! subtitles URL attached.

use super::embed_call::{EmbedCall, CHAPTER_MEDIA, MEDIA};
use super::{match_url, Extractor};
use crate::error::{ExtractorError, Result};
use crate::fetch::PageFetcher;
use crate::models::{DelegationResult, Extraction};
use crate::utils::html_search_meta;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, instrument};
use url::Url;

pub const IE_KEY: &str = "OCWMIT";
pub const IE_NAME: &str = "ocw.mit.edu";
pub const BASE_URL: &str = "http://ocw.mit.edu/";
/// Platform that actually hosts OCW lecture videos.
pub const DELEGATE_PLATFORM: &str = "Youtube";

static VALID_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://ocw\.mit\.edu/courses/(?P<topic>[a-z0-9\-]+)").unwrap());

/// Extractor for `ocw.mit.edu/courses/...` lecture pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct OcwMit;

impl OcwMit {
    /// Locate the embed call, preferring the chapter form.
    pub fn find_embed(webpage: &str) -> Result<EmbedCall> {
        if let Some(call) = CHAPTER_MEDIA.find(webpage)? {
            debug!(function = CHAPTER_MEDIA.function, "Found embed call");
            return Ok(call);
        }
        if let Some(call) = MEDIA.find(webpage)? {
            debug!(function = MEDIA.function, "Found embed call");
            return Ok(call);
        }
        Err(ExtractorError::not_found("embedded video"))
    }

    /// Resolve a captions path against the site root. Empty means none.
    pub fn subtitles_url(captions_file: &str) -> Result<Option<String>> {
        if captions_file.is_empty() {
            return Ok(None);
        }
        let base = Url::parse(BASE_URL).map_err(|e| ExtractorError::parse("base url", e))?;
        let joined = base
            .join(captions_file)
            .map_err(|e| ExtractorError::parse("subtitles url", e))?;
        Ok(Some(joined.to_string()))
    }

    /// Scrape an already downloaded lecture page.
    pub fn extract_from_page(webpage: &str) -> Result<DelegationResult> {
        let title = html_search_meta("WT.cg_s", webpage).unwrap_or_default();
        let description = html_search_meta("Description", webpage).unwrap_or_default();

        let call = Self::find_embed(webpage)?;
        if call.media_id.is_empty() {
            return Err(ExtractorError::Delegation(format!(
                "embed call names no {DELEGATE_PLATFORM} video"
            )));
        }

        let mut delegation = DelegationResult::new(call.media_id, DELEGATE_PLATFORM);
        if let Some(subtitles) = Self::subtitles_url(&call.captions_file)? {
            delegation = delegation.with_extra("subtitles", subtitles);
        }
        if !title.is_empty() {
            delegation = delegation.with_extra("title", title);
        }
        if !description.is_empty() {
            delegation = delegation.with_extra("description", description);
        }
        Ok(delegation)
    }
}

#[async_trait]
impl Extractor for OcwMit {
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
        let topic = match_url(self, url, "topic")?;
        let webpage = fetcher.fetch_page_text(url, IE_NAME).await?;

        let delegation = Self::extract_from_page(&webpage)?;
        info!(%topic, id = %delegation.target_url, "Found embedded lecture video");
        Ok(Extraction::Delegate(delegation))
    }
}
