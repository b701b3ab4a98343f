//! URL routing and delegation resolution.
//!
//! The [`Dispatcher`] picks the extractor for a URL and follows delegations
//! until it reaches a final [`VideoDescriptor`]:
//!
//! - a delegation to another built-in extractor is followed directly;
//! - a delegation to an external platform goes through a registered
//!   [`PlatformResolver`], or is handed back to the caller unresolved when
//!   none is registered for that platform.
//!
//! Extra fields carried by each delegation are merged into the final
//! descriptor.

use crate::error::{ExtractorError, Result};
use crate::extractors::{self, Extractor};
use crate::fetch::PageFetcher;
use crate::models::{Extraction, VideoDescriptor};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

/// Delegation chains longer than this are treated as loops.
pub const MAX_DELEGATION_DEPTH: usize = 5;

/// Resolves video ids on a platform this crate does not scrape itself.
#[async_trait]
pub trait PlatformResolver: Send + Sync {
    /// Key used by delegations to this platform (e.g. `"Youtube"`).
    fn platform(&self) -> &'static str;

    async fn resolve(&self, id: &str) -> Result<VideoDescriptor>;
}

pub struct Dispatcher {
    extractors: Vec<Box<dyn Extractor>>,
    resolvers: Vec<Box<dyn PlatformResolver>>,
    fetcher: Box<dyn PageFetcher>,
}

impl Dispatcher {
    /// Dispatcher over the built-in extractors.
    pub fn new(fetcher: Box<dyn PageFetcher>) -> Self {
        Self {
            extractors: extractors::builtin(),
            resolvers: Vec::new(),
            fetcher,
        }
    }

    pub fn register_resolver(&mut self, resolver: Box<dyn PlatformResolver>) {
        self.resolvers.push(resolver);
    }

    /// First extractor whose URL pattern accepts `url`.
    pub fn extractor_for(&self, url: &str) -> Option<&dyn Extractor> {
        self.extractors
            .iter()
            .find(|e| e.suitable(url))
            .map(|e| &**e)
    }

    fn extractor_by_key(&self, key: &str) -> Option<&dyn Extractor> {
        self.extractors
            .iter()
            .find(|e| e.key() == key)
            .map(|e| &**e)
    }

    fn resolver_for(&self, platform: &str) -> Option<&dyn PlatformResolver> {
        self.resolvers
            .iter()
            .find(|r| r.platform() == platform)
            .map(|r| &**r)
    }

    /// Extract `url`, following delegations as far as this crate can.
    #[instrument(level = "info", skip_all, fields(%url))]
    pub async fn extract(&self, url: &str) -> Result<Extraction> {
        let mut extractor = self
            .extractor_for(url)
            .ok_or_else(|| ExtractorError::UnsupportedUrl(url.to_string()))?;
        let mut target = url.to_string();
        let mut extra = BTreeMap::new();

        for hop in 0..=MAX_DELEGATION_DEPTH {
            debug!(hop, extractor = extractor.key(), %target, "Running extractor");
            let mut delegation = match extractor.extract(&target, self.fetcher.as_ref()).await? {
                Extraction::Video(mut video) => {
                    video.merge_extra(&extra);
                    return Ok(Extraction::Video(video));
                }
                Extraction::Delegate(delegation) => delegation,
            };

            // Fields set closer to the original page win over later ones.
            for (key, value) in std::mem::take(&mut delegation.extra) {
                extra.entry(key).or_insert(value);
            }

            if let Some(next) = self.extractor_by_key(&delegation.target_extractor) {
                if !next.suitable(&delegation.target_url) {
                    return Err(ExtractorError::Delegation(format!(
                        "{} does not accept {}",
                        delegation.target_extractor, delegation.target_url
                    )));
                }
                info!(
                    from = extractor.display_name(),
                    to = next.display_name(),
                    url = %delegation.target_url,
                    "Following delegation"
                );
                extractor = next;
                target = delegation.target_url;
                continue;
            }

            return match self.resolver_for(&delegation.target_extractor) {
                Some(resolver) => {
                    info!(platform = resolver.platform(), id = %delegation.target_url, "Resolving on external platform");
                    let mut video = resolver.resolve(&delegation.target_url).await?;
                    video.merge_extra(&extra);
                    Ok(Extraction::Video(video))
                }
                None => {
                    debug!(platform = %delegation.target_extractor, "No resolver registered; returning delegation");
                    delegation.extra = extra;
                    Ok(Extraction::Delegate(delegation))
                }
            };
        }

        Err(ExtractorError::Delegation(format!(
            "more than {MAX_DELEGATION_DEPTH} delegations starting at {url}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::ocw::tests::{CHAPTER_PAGE, LECTURE_URL};
    use crate::extractors::techtv::tests::PAGE as TECHTV_PAGE;
    use crate::fetch::fixtures::StaticFetcher;
    use crate::models::DelegationResult;

    const WATCH_URL: &str = "http://video.mit.edu/watch/mit-dna-learning-center-set-25418/";

    struct FakeYoutube;

    #[async_trait]
    impl PlatformResolver for FakeYoutube {
        fn platform(&self) -> &'static str {
            "Youtube"
        }

        async fn resolve(&self, id: &str) -> Result<VideoDescriptor> {
            Ok(VideoDescriptor {
                id: id.to_string(),
                title: "Lecture 7: Multiple Variables".to_string(),
                ..VideoDescriptor::default()
            })
        }
    }

    fn fetcher() -> StaticFetcher {
        StaticFetcher::new()
            .with_page("http://techtv.mit.edu/videos/25418", TECHTV_PAGE)
            .with_page(
                WATCH_URL,
                r#"<iframe width="640" src="http://techtv.mit.edu/embeds/25418?size=large"></iframe>"#,
            )
            .with_page(LECTURE_URL, CHAPTER_PAGE)
    }

    #[tokio::test]
    async fn test_unsupported_url() {
        let dispatcher = Dispatcher::new(Box::new(fetcher()));
        let err = dispatcher.extract("https://example.com/video/1").await.unwrap_err();
        assert!(matches!(err, ExtractorError::UnsupportedUrl(_)));
    }

    #[tokio::test]
    async fn test_watch_page_resolves_through_techtv() {
        let dispatcher = Dispatcher::new(Box::new(fetcher()));
        let extraction = dispatcher.extract(WATCH_URL).await.unwrap();
        let Extraction::Video(video) = extraction else {
            panic!("expected video");
        };
        assert_eq!(video.id, "25418");
        assert_eq!(video.title, "MIT DNA Learning Center Set");
        assert_eq!(video.formats.len(), 3);
    }

    #[tokio::test]
    async fn test_query_string_does_not_change_routing() {
        let url = format!("{LECTURE_URL}?ref=http://techtv.mit.edu/videos/1");
        let fetcher = StaticFetcher::new().with_page(&url, CHAPTER_PAGE);
        let dispatcher = Dispatcher::new(Box::new(fetcher));

        assert_eq!(dispatcher.extractor_for(&url).map(|e| e.key()), Some("OCWMIT"));
        let Extraction::Delegate(delegation) = dispatcher.extract(&url).await.unwrap() else {
            panic!("expected delegation");
        };
        assert_eq!(delegation.target_extractor, "Youtube");
    }

    #[tokio::test]
    async fn test_delegation_to_foreign_url_fails() {
        let fetcher = StaticFetcher::new().with_page(
            WATCH_URL,
            r#"<iframe class="p" src="http://embed.example/123"></iframe>"#,
        );
        let dispatcher = Dispatcher::new(Box::new(fetcher));
        let err = dispatcher.extract(WATCH_URL).await.unwrap_err();
        assert!(matches!(err, ExtractorError::Delegation(_)));
    }

    #[tokio::test]
    async fn test_external_delegation_returned_without_resolver() {
        let dispatcher = Dispatcher::new(Box::new(fetcher()));
        let extraction = dispatcher.extract(LECTURE_URL).await.unwrap();
        let Extraction::Delegate(DelegationResult { target_url, target_extractor, extra }) = extraction else {
            panic!("expected delegation");
        };
        assert_eq!(target_url, "EObHWIEKGjA");
        assert_eq!(target_extractor, "Youtube");
        assert!(extra["subtitles"].ends_with("MIT6_041F11_lec07_300k.mp4.srt"));
    }

    #[tokio::test]
    async fn test_external_delegation_resolved_and_merged() {
        let mut dispatcher = Dispatcher::new(Box::new(fetcher()));
        dispatcher.register_resolver(Box::new(FakeYoutube));

        let Extraction::Video(video) = dispatcher.extract(LECTURE_URL).await.unwrap() else {
            panic!("expected video");
        };
        assert_eq!(video.id, "EObHWIEKGjA");
        assert_eq!(video.title, "Lecture 7: Multiple Variables");
        assert!(video.description.starts_with("In this lecture"));
        assert!(video.subtitles.unwrap().ends_with("MIT6_041F11_lec07_300k.mp4.srt"));
    }

    #[tokio::test]
    async fn test_repeated_extraction_is_identical() {
        let dispatcher = Dispatcher::new(Box::new(fetcher()));
        let first = dispatcher.extract(WATCH_URL).await.unwrap();
        let second = dispatcher.extract(WATCH_URL).await.unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_extractor_for() {
        let dispatcher = Dispatcher::new(Box::new(StaticFetcher::new()));
        assert_eq!(
            dispatcher.extractor_for("http://techtv.mit.edu/videos/1").map(|e| e.key()),
            Some("TechTVMIT")
        );
        assert_eq!(
            dispatcher
                .extractor_for("http://ocw.mit.edu/courses/x/?ref=http://techtv.mit.edu/videos/1")
                .map(|e| e.key()),
            Some("OCWMIT")
        );
        assert!(dispatcher.extractor_for("http://evil.example/?u=http://video.mit.edu/watch/slug").is_none());
        assert!(dispatcher.extractor_for("http://example.com").is_none());
    }
}
