use game_stash_catalog::{CatalogRecord, Game, Genre, Tag};

fn sample_game() -> Game {
    Game {
        id: 3498,
        name: "Grand Theft Auto V".to_string(),
        slug: "grand-theft-auto-v".to_string(),
        released: Some("2013-09-17".to_string()),
        rating: Some(4.47),
        background_image: None,
        metacritic: Some(92),
        playtime: Some(74),
    }
}

#[test]
fn record_exposes_entity_id_as_key() {
    let record = CatalogRecord::Game(sample_game());
    assert_eq!(record.key(), 3498);

    let record = CatalogRecord::Tag(Tag {
        id: 31,
        name: "Singleplayer".to_string(),
        slug: "singleplayer".to_string(),
        games_count: None,
        image_background: None,
    });
    assert_eq!(record.key(), 31);
}

#[test]
fn record_maps_to_canonical_store() {
    let record = CatalogRecord::Game(sample_game());
    assert_eq!(record.store_name(), "games");
    assert_eq!(record.kind(), "game");

    let record = CatalogRecord::Genre(Genre {
        id: 4,
        name: "Action".to_string(),
        slug: "action".to_string(),
        games_count: Some(183_000),
        image_background: None,
    });
    assert_eq!(record.store_name(), "genres");
    assert_eq!(record.kind(), "genre");
}

#[test]
fn payload_is_tagged_with_kind() {
    let record = CatalogRecord::Game(sample_game());
    let payload = serde_json::to_string(&record).unwrap();

    let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
    assert_eq!(value["kind"], "game");
    assert_eq!(value["id"], 3498);
    assert_eq!(value["slug"], "grand-theft-auto-v");
}

#[test]
fn payload_decodes_to_the_same_record() {
    // Genre and Tag share a field set; the kind tag has to disambiguate.
    let record = CatalogRecord::Genre(Genre {
        id: 51,
        name: "Indie".to_string(),
        slug: "indie".to_string(),
        games_count: None,
        image_background: Some("https://example.com/indie.jpg".to_string()),
    });

    let payload = serde_json::to_string(&record).unwrap();
    let decoded: CatalogRecord = serde_json::from_str(&payload).unwrap();
    assert_eq!(decoded, record);
    assert!(matches!(decoded, CatalogRecord::Genre(_)));
}

#[test]
fn partial_api_payload_fills_defaults() {
    let decoded: CatalogRecord =
        serde_json::from_str(r#"{"kind":"game","id":7,"name":"Portal","slug":"portal"}"#).unwrap();
    match decoded {
        CatalogRecord::Game(game) => {
            assert_eq!(game.id, 7);
            assert_eq!(game.released, None);
            assert_eq!(game.metacritic, None);
        }
        other => panic!("expected a game, got {other:?}"),
    }
}
