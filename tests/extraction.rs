//! Embed page harvesting tests.

use nagare::config::PrimaryConfig;
use nagare::extract::{EmbedExtractor, harvest_links, resolve_links};
use nagare::types::{ServerRef, Track};

mod common;
use common::EMBED_PAGE;

const PAGE_URL: &str = "https://embed.example/watch/one-piece?ep=2142";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_harvest_applies_all_strategies() {
        let links = harvest_links(EMBED_PAGE, PAGE_URL);
        let urls: Vec<_> = links.iter().map(|l| l.url.as_str()).collect();

        assert!(urls.contains(&"https://player.example/e/abc123"));
        assert!(urls.contains(&"https://embed.example/lazy/player"));
        assert!(urls.contains(&"https://embed.example/media/episode.mp4"));
        assert!(urls.contains(&"https://embed.example/watch/backup/episode.m3u8"));
        assert!(urls.contains(&"https://files.example/stream/42"));
        assert!(urls.contains(&"https://cdn.example/hls/master.m3u8?token=xyz"));

        // the non-media anchor is not harvested
        assert!(!urls.iter().any(|u| u.ends_with("/about")));
    }

    #[test]
    fn test_harvest_tags_by_strategy() {
        let links = harvest_links(EMBED_PAGE, PAGE_URL);

        let tag_of = |url: &str| {
            links
                .iter()
                .find(|l| l.url == url)
                .and_then(|l| l.title.clone())
        };

        assert_eq!(
            tag_of("https://player.example/e/abc123").as_deref(),
            Some("embed")
        );
        assert_eq!(
            tag_of("https://embed.example/media/episode.mp4").as_deref(),
            Some("video")
        );
        assert_eq!(
            tag_of("https://files.example/stream/42").as_deref(),
            Some("Mirror")
        );
        assert_eq!(
            tag_of("https://cdn.example/hls/master.m3u8?token=xyz").as_deref(),
            Some("m3u8")
        );
    }

    #[test]
    fn test_harvest_dedupes_by_absolute_url() {
        // "backup/episode.m3u8" and "./backup/episode.m3u8" resolve to the
        // same absolute URL; the first occurrence's tag wins
        let links = harvest_links(EMBED_PAGE, PAGE_URL);
        let backups: Vec<_> = links
            .iter()
            .filter(|l| l.url == "https://embed.example/watch/backup/episode.m3u8")
            .collect();

        assert_eq!(backups.len(), 1);
        assert_eq!(backups[0].title.as_deref(), Some("Backup"));
    }

    #[test]
    fn test_harvest_falls_back_to_page_url() {
        let links = harvest_links("<html><body><p>maintenance</p></body></html>", PAGE_URL);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].url, PAGE_URL);
        assert_eq!(links[0].title.as_deref(), Some("page"));
    }

    #[test]
    fn test_resolve_links_drops_unresolvable_candidates() {
        let links = resolve_links(
            vec![
                ("https://cdn.example/a.m3u8".to_string(), None),
                ("relative/b.mp4".to_string(), None),
            ],
            "not a url",
        );
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].url, "https://cdn.example/a.m3u8");
    }

    #[test]
    fn test_embed_url_shape() {
        let extractor = EmbedExtractor::new(&PrimaryConfig::default());
        let server = ServerRef {
            name: "HD-1".to_string(),
            track: Track::Sub,
        };

        let url = extractor.embed_url(&server, 2142);
        assert!(url.starts_with("https://"));
        assert!(url.contains("/embed/sub/hd-1"));
        assert!(url.ends_with("ep=2142"));
    }
}
