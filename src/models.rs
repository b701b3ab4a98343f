//! Data models for extraction results.
//!
//! This module defines the structures every extractor produces:
//! - [`VideoDescriptor`]: A fully extracted video with its stream variants
//! - [`FormatVariant`]: One downloadable stream variant
//! - [`DelegationResult`]: A reference to another extractor or platform
//! - [`Extraction`]: Either of the two outcomes above
//!
//! Results are serialized with a `_type` tag (`"video"` or `"url"`) so that
//! downstream download tooling can tell final results from delegations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// A single downloadable stream variant of a video.
///
/// The `url` is always absolute: it is built by concatenating the page's
/// CDN base URL with the variant-specific path.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FormatVariant {
    /// Short label identifying the variant (e.g. `"720p"`).
    pub format_id: String,
    /// Absolute stream URL.
    pub url: String,
    /// Container extension (e.g. `"mp4"`, `"flv"`).
    pub ext: String,
    /// Human-readable label for the variant.
    pub format: String,
    /// Frame width in pixels.
    pub width: u32,
    /// Video bitrate as published by the page.
    pub vbr: u64,
}

/// A fully extracted video.
///
/// Produced once per extraction call and returned by value; nothing keeps a
/// reference to it afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct VideoDescriptor {
    /// Site-specific video identifier.
    pub id: String,
    /// The video title.
    pub title: String,
    /// Plain-text description.
    pub description: String,
    /// Thumbnail image URL, when the site publishes one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// Stream variants in the order the page lists them.
    pub formats: Vec<FormatVariant>,
    /// Absolute URL of a subtitles file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitles: Option<String>,
}

impl VideoDescriptor {
    /// Merge delegation extras into this descriptor.
    ///
    /// `subtitles` always overrides. `title`, `description` and `thumbnail`
    /// only fill fields the delegate left empty. Unknown keys are skipped.
    pub fn merge_extra(&mut self, extra: &BTreeMap<String, String>) {
        for (key, value) in extra {
            match key.as_str() {
                "subtitles" => self.subtitles = Some(value.clone()),
                "title" if self.title.is_empty() => self.title = value.clone(),
                "description" if self.description.is_empty() => {
                    self.description = value.clone()
                }
                "thumbnail" if self.thumbnail.is_none() => self.thumbnail = Some(value.clone()),
                "title" | "description" | "thumbnail" => {}
                _ => warn!(%key, "Ignoring unknown delegation field"),
            }
        }
    }
}

/// A deferred extraction: the caller must re-run extraction on `target_url`
/// with the extractor or platform named by `target_extractor`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DelegationResult {
    /// URL or platform-specific id to extract next.
    #[serde(rename = "url")]
    pub target_url: String,
    /// Key of the extractor or platform that should handle `target_url`.
    #[serde(rename = "ie_key")]
    pub target_extractor: String,
    /// Fields to merge into the delegate's eventual descriptor.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl DelegationResult {
    pub fn new(target_url: impl Into<String>, target_extractor: impl Into<String>) -> Self {
        Self {
            target_url: target_url.into(),
            target_extractor: target_extractor.into(),
            extra: BTreeMap::new(),
        }
    }

    /// Attach a field to merge into the delegate's result.
    pub fn with_extra(mut self, key: &str, value: impl Into<String>) -> Self {
        self.extra.insert(key.to_string(), value.into());
        self
    }
}

/// Outcome of a single extractor run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "_type", rename_all = "snake_case")]
pub enum Extraction {
    /// A final result.
    Video(VideoDescriptor),
    /// A reference that still has to be resolved.
    #[serde(rename = "url")]
    Delegate(DelegationResult),
}

impl Extraction {
    /// Identifier used to name output files for this result.
    pub fn stem(&self) -> String {
        match self {
            Extraction::Video(video) => video.id.clone(),
            Extraction::Delegate(delegation) => format!(
                "{}-{}",
                delegation.target_extractor.to_lowercase(),
                crate::utils::slugify_title(&delegation.target_url)
            ),
        }
    }
}
