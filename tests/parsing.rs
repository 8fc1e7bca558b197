//! Normalization tests for the primary and localized upstream shapes.

use serde_json::json;

use nagare::localized::{episode_key, links_for_episode};
use nagare::primary::{normalize_episode_payload, parse_episode_fragment, parse_server_fragment};

mod common;
use common::{EPISODE_FRAGMENT, SERVER_FRAGMENT};

#[cfg(test)]
mod primary_tests {
    use super::*;

    #[test]
    fn test_episode_fragment_parsing() {
        let episodes = parse_episode_fragment(EPISODE_FRAGMENT, "one-piece-100");
        assert_eq!(episodes.len(), 3);

        assert_eq!(episodes[0].id, "one-piece-100?ep=2142");
        assert_eq!(episodes[0].episode_number, Some(1));
        assert_eq!(episodes[0].title, "Romance Dawn");
        assert!(!episodes[0].is_filler);

        assert!(episodes[1].is_filler);
        assert_eq!(episodes[1].title, "The Great Swordsman Appears!");

        // unparseable data-number degrades to None, never fails
        assert_eq!(episodes[2].episode_number, None);
        assert_eq!(episodes[2].title, "Morgan vs. Luffy");
    }

    #[test]
    fn test_episode_fragment_preserves_listing_order() {
        let episodes = parse_episode_fragment(EPISODE_FRAGMENT, "one-piece-100");
        let ids: Vec<_> = episodes.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "one-piece-100?ep=2142",
                "one-piece-100?ep=2143",
                "one-piece-100?ep=2144",
            ]
        );
    }

    #[test]
    fn test_structured_payload_field_candidates() {
        let payload = json!([
            {
                "episodeNumber": 1,
                "title": "First",
                "isFiller": false,
                "subStreams": [{ "name": "HD-1" }, "HD-2"],
                "dubStreams": []
            },
            {
                "episode": "2",
                "name": "Second",
                "filler": true,
                "sources": { "sub": ["HD-1"], "dub": ["HD-1"] }
            },
            {
                "id": "one-piece-100?ep=2144"
            }
        ]);

        let episodes = normalize_episode_payload(&payload, "one-piece-100");
        assert_eq!(episodes.len(), 3);

        assert_eq!(episodes[0].episode_number, Some(1));
        assert_eq!(episodes[0].sub_streams.len(), 2);
        assert_eq!(episodes[0].sub_streams[0].name, "HD-1");
        assert_eq!(episodes[0].sub_streams[1].name, "HD-2");

        assert_eq!(episodes[1].episode_number, Some(2));
        assert_eq!(episodes[1].title, "Second");
        assert!(episodes[1].is_filler);
        assert_eq!(episodes[1].dub_streams.len(), 1);

        // number recovered from the id's ep= suffix
        assert_eq!(episodes[2].episode_number, Some(2144));
        assert_eq!(episodes[2].id, "one-piece-100?ep=2144");
    }

    #[test]
    fn test_structured_payload_under_container_key() {
        let payload = json!({
            "episodes": [ { "episodeNumber": 9, "title": "Nine" } ]
        });
        let episodes = normalize_episode_payload(&payload, "show-1");
        assert_eq!(episodes.len(), 1);
        assert_eq!(episodes[0].episode_number, Some(9));
    }

    #[test]
    fn test_server_fragment_parsing() {
        let listing = parse_server_fragment(SERVER_FRAGMENT);

        let sub_names: Vec<_> = listing.sub.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(sub_names, vec!["HD-1", "HD-2"]);

        let dub_names: Vec<_> = listing.dub.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(dub_names, vec!["HD-1"]);

        // raw track nodes are ignored
        assert!(listing.sub.iter().all(|s| s.name != "RAW-1"));
        assert!(listing.localized.is_empty());
    }
}

#[cfg(test)]
mod localized_tests {
    use super::*;

    #[test]
    fn test_episode_key_candidates() {
        assert_eq!(episode_key(&json!({ "episodeNumber": 7 })), Some("7".into()));
        assert_eq!(episode_key(&json!({ "episode": "7" })), Some("7".into()));
        assert_eq!(episode_key(&json!({ "number": 7 })), Some("7".into()));
        assert_eq!(
            episode_key(&json!({ "id": "show-100?ep=12" })),
            Some("12".into())
        );
        assert_eq!(episode_key(&json!({ "id": "show-ep-12" })), Some("12".into()));
        assert_eq!(episode_key(&json!({ "quality": "1080p" })), None);
    }

    #[test]
    fn test_links_for_episode_matches_by_coerced_number() {
        let payload = json!({
            "episodes": [
                { "episode": "1", "streams": ["https://cdn.example/1.m3u8"] },
                { "episode": "2", "streams": ["https://cdn.example/2.m3u8"] }
            ]
        });

        let links = links_for_episode(&payload, 2, "https://provider.example/anime/21/2/hindi");
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].url, "https://cdn.example/2.m3u8");
    }

    #[test]
    fn test_links_for_episode_container_and_entry_shapes() {
        let payload = json!([
            {
                "number": 5,
                "links": [
                    "https://cdn.example/a.m3u8",
                    { "url": "/relative/b.mp4", "title": "backup" },
                    { "label": "alt", "file": "https://cdn.example/c.mp4" },
                    42
                ]
            }
        ]);

        let links = links_for_episode(&payload, 5, "https://provider.example/anime/21/5/hindi");
        let urls: Vec<_> = links.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://cdn.example/a.m3u8",
                "https://provider.example/relative/b.mp4",
                "https://cdn.example/c.mp4",
            ]
        );
        assert_eq!(links[1].title.as_deref(), Some("backup"));
    }

    #[test]
    fn test_links_for_episode_no_match_is_empty() {
        let payload = json!({ "episodes": [ { "episode": 1, "streams": ["https://a/1.m3u8"] } ] });
        assert!(links_for_episode(&payload, 99, "https://provider.example/").is_empty());
    }
}
