use nagare::prelude::*;
use nagare::error::Error;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_from_slug_drops_trailing_id() {
        assert_eq!(title_from_slug("one-piece-100"), "one piece");
    }

    #[test]
    fn test_title_from_slug_drops_season_pair() {
        assert_eq!(
            title_from_slug("attack-on-titan-season-2-5"),
            "attack on titan"
        );
    }

    #[test]
    fn test_title_from_slug_strips_query_suffix() {
        assert_eq!(title_from_slug("one-piece-100?ep=2142"), "one piece");
    }

    #[test]
    fn test_title_from_slug_is_total_and_idempotent() {
        for slug in ["", "---", "42", "demon-slayer-season-3-1555", "plain"] {
            let once = title_from_slug(slug);
            // re-application once trailing tokens are gone changes nothing
            let again = title_from_slug(&once.replace(' ', "-"));
            assert_eq!(once, again, "not idempotent for {:?}", slug);
        }
    }

    #[test]
    fn test_track_filter_parsing() {
        assert_eq!("sub".parse::<TrackFilter>().unwrap(), TrackFilter::Sub);
        assert_eq!("DUB".parse::<TrackFilter>().unwrap(), TrackFilter::Dub);
        assert_eq!(
            " Localized ".parse::<TrackFilter>().unwrap(),
            TrackFilter::Localized
        );
        assert_eq!("all".parse::<TrackFilter>().unwrap(), TrackFilter::All);
        assert_eq!(TrackFilter::default(), TrackFilter::All);

        let err = "bluray".parse::<TrackFilter>().unwrap_err();
        assert!(matches!(err, Error::InvalidInput { .. }));
    }

    #[test]
    fn test_episode_id_parsing() {
        let id = EpisodeId::parse("one-piece-100?ep=2142").unwrap();
        assert_eq!(id.slug, "one-piece-100");
        assert_eq!(id.episode, 2142);

        // trailing query params after the episode value are ignored
        let id = EpisodeId::parse("one-piece-100?ep=2142&lang=en").unwrap();
        assert_eq!(id.episode, 2142);
    }

    #[test]
    fn test_episode_id_rejects_malformed_input() {
        assert!(matches!(
            EpisodeId::parse(""),
            Err(Error::InvalidInput { .. })
        ));
        assert!(matches!(
            EpisodeId::parse("one-piece-100"),
            Err(Error::InvalidInput { .. })
        ));
        assert!(matches!(
            EpisodeId::parse("one-piece-100?ep=twelve"),
            Err(Error::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_server_ref_matching_is_case_insensitive() {
        let server = ServerRef {
            name: "HD-1".to_string(),
            track: Track::Sub,
        };
        assert!(server.matches_name("hd-1"));
        assert!(server.matches_name(" HD-1 "));
        assert!(!server.matches_name("HD-2"));
    }

    #[test]
    fn test_stream_query_builder_defaults() {
        let query = StreamQueryBuilder::default()
            .id("one-piece-100?ep=2142")
            .build()
            .unwrap();

        assert_eq!(query.id, "one-piece-100?ep=2142");
        assert_eq!(query.track, TrackFilter::All);
        assert!(query.server.is_none());
    }

    #[test]
    fn test_stream_link_page_fallback() {
        let link = StreamLink::page("https://embed.example/anime/21/5/hindi");
        assert_eq!(link.url, "https://embed.example/anime/21/5/hindi");
        assert_eq!(link.title.as_deref(), Some("page"));
    }

    #[test]
    fn test_error_taxonomy() {
        assert!(Error::invalid_input("bad").is_reported());
        assert!(Error::upstream("down").is_reported());
        assert!(Error::invalid_server("HD-9").is_reported());
        assert!(Error::extraction("gone").is_reported());
        assert!(!Error::parse("oops").is_reported());

        assert_eq!(Error::invalid_input("bad").http_status(), 400);
        assert_eq!(Error::invalid_server("HD-9").http_status(), 400);
        assert_eq!(Error::upstream("down").http_status(), 404);
        assert_eq!(Error::parse("oops").http_status(), 500);

        let err = Error::invalid_input_example("id is required", "one-piece-100");
        assert!(format!("{}", err).contains("id is required"));
    }

    #[test]
    fn test_episode_serializes_camel_case() {
        let episode = Episode {
            id: "one-piece-100?ep=2142".to_string(),
            episode_number: Some(1),
            title: "Romance Dawn".to_string(),
            is_filler: false,
            sub_streams: vec![ServerRef {
                name: "HD-1".to_string(),
                track: Track::Sub,
            }],
            dub_streams: vec![],
            localized_streams: vec![],
        };

        let value = serde_json::to_value(&episode).unwrap();
        assert_eq!(value["episodeNumber"], 1);
        assert_eq!(value["isFiller"], false);
        assert_eq!(value["subStreams"][0]["name"], "HD-1");
        assert_eq!(value["subStreams"][0]["track"], "sub");
    }

    #[test]
    fn test_stream_response_shapes() {
        let listing = StreamResponse::Listing {
            servers: ServerListing::default(),
        };
        let value = serde_json::to_value(&listing).unwrap();
        assert!(value.get("servers").is_some());
        assert!(value.get("server").is_none());

        let resolved = StreamResponse::Resolved {
            server: "HD-1".to_string(),
            streams: vec![StreamLink::new("https://cdn.example/master.m3u8", None)],
        };
        let value = serde_json::to_value(&resolved).unwrap();
        assert_eq!(value["server"], "HD-1");
        assert_eq!(value["streams"][0]["url"], "https://cdn.example/master.m3u8");
    }
}
