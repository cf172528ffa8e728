use serde_json::{Value, json};
use topsync::{
    error::ServiceError,
    spotify::reshape,
    types::{
        ItemType, TimeRange, TopArtist, TopEmotion, TopGenre, TopItemsData, TopTrack,
    },
};

fn items(value: Value) -> Vec<Value> {
    value.as_array().cloned().unwrap()
}

fn assert_missing(result: Result<TopItemsData, ServiceError>, expected_field: &str) {
    let message = match &result {
        Err(e) => e.to_string(),
        Ok(data) => panic!("expected missing field `{expected_field}`, got {data:?}"),
    };
    match result {
        Err(ServiceError::MissingField { field, .. }) => {
            assert_eq!(field, expected_field);
            assert!(
                message.contains(expected_field),
                "message should name the field: {message}"
            );
        }
        other => panic!("expected missing field `{expected_field}`, got {other:?}"),
    }
}

#[test]
fn test_reshape_artists_assigns_positions_in_input_order() {
    let raw = items(json!([{"id": "c"}, {"id": "a"}, {"id": "b"}]));

    let data = reshape(&raw, ItemType::Artist, TimeRange::ShortTerm).unwrap();

    let TopItemsData::Artists(artists) = data else {
        panic!("expected artists");
    };
    assert_eq!(artists.time_range, TimeRange::ShortTerm);
    assert_eq!(
        artists.top_artists,
        vec![
            TopArtist { id: "c".into(), position: 1 },
            TopArtist { id: "a".into(), position: 2 },
            TopArtist { id: "b".into(), position: 3 },
        ]
    );
}

#[test]
fn test_reshape_tracks_positions_are_one_to_n() {
    let raw: Vec<Value> = (0..50).map(|i| json!({"id": format!("track{i}")})).collect();

    let data = reshape(&raw, ItemType::Track, TimeRange::LongTerm).unwrap();

    let TopItemsData::Tracks(tracks) = data else {
        panic!("expected tracks");
    };
    let positions: Vec<u32> = tracks.top_tracks.iter().map(|t| t.position).collect();
    assert_eq!(positions, (1..=50).collect::<Vec<u32>>());
    assert_eq!(
        tracks.top_tracks[0],
        TopTrack { id: "track0".into(), position: 1 }
    );
}

#[test]
fn test_reshape_ignores_extra_fields() {
    let raw = items(json!([{"id": "1", "name": "Artist", "popularity": 80}]));

    let data = reshape(&raw, ItemType::Artist, TimeRange::MediumTerm).unwrap();

    assert_eq!(data.item_type(), ItemType::Artist);
    assert_eq!(data.len(), 1);
}

#[test]
fn test_reshape_genres_keeps_values_and_order() {
    let raw = items(json!([
        {"name": "rock", "count": 1},
        {"name": "jazz", "count": 7},
        {"name": "pop", "count": 3}
    ]));

    let data = reshape(&raw, ItemType::Genre, TimeRange::MediumTerm).unwrap();

    let TopItemsData::Genres(genres) = data else {
        panic!("expected genres");
    };
    assert_eq!(
        genres.top_genres,
        vec![
            TopGenre { name: "rock".into(), count: 1 },
            TopGenre { name: "jazz".into(), count: 7 },
            TopGenre { name: "pop".into(), count: 3 },
        ]
    );
    assert_eq!(genres.time_range, TimeRange::MediumTerm);
}

#[test]
fn test_reshape_emotions_keeps_values_and_track_id() {
    let raw = items(json!([
        {"name": "happy", "percentage": 0.25, "track_id": "t1"},
        {"name": "calm", "percentage": 0.5}
    ]));

    let data = reshape(&raw, ItemType::Emotion, TimeRange::LongTerm).unwrap();

    let TopItemsData::Emotions(emotions) = data else {
        panic!("expected emotions");
    };
    assert_eq!(
        emotions.top_emotions,
        vec![
            TopEmotion {
                name: "happy".into(),
                percentage: 0.25,
                track_id: Some("t1".into())
            },
            TopEmotion {
                name: "calm".into(),
                percentage: 0.5,
                track_id: None
            },
        ]
    );
}

#[test]
fn test_reshape_emotion_percentage_accepts_integers() {
    let raw = items(json!([{"name": "sad", "percentage": 1}]));

    let data = reshape(&raw, ItemType::Emotion, TimeRange::ShortTerm).unwrap();

    let TopItemsData::Emotions(emotions) = data else {
        panic!("expected emotions");
    };
    assert_eq!(emotions.top_emotions[0].percentage, 1.0);
}

#[test]
fn test_reshape_empty_list_gives_empty_result() {
    let data = reshape(&[], ItemType::Genre, TimeRange::ShortTerm).unwrap();

    assert!(data.is_empty());
    assert_eq!(data.time_range(), TimeRange::ShortTerm);
}

#[test]
fn test_reshape_missing_artist_id() {
    let raw = items(json!([{"id": "1"}, {"name": "no id here"}]));

    let result = reshape(&raw, ItemType::Artist, TimeRange::ShortTerm);

    let message = result.as_ref().unwrap_err().to_string();
    assert!(message.contains("artist"), "message should name the item type: {message}");
    assert_missing(result, "id");
}

#[test]
fn test_reshape_missing_track_id() {
    let raw = items(json!([{}]));

    assert_missing(reshape(&raw, ItemType::Track, TimeRange::ShortTerm), "id");
}

#[test]
fn test_reshape_null_id_counts_as_missing() {
    let raw = items(json!([{"id": null}]));

    assert_missing(reshape(&raw, ItemType::Track, TimeRange::ShortTerm), "id");
}

#[test]
fn test_reshape_missing_genre_name() {
    let raw = items(json!([{"count": 1}]));

    assert_missing(reshape(&raw, ItemType::Genre, TimeRange::ShortTerm), "name");
}

#[test]
fn test_reshape_missing_genre_count() {
    let raw = items(json!([{"name": "rock"}]));

    assert_missing(reshape(&raw, ItemType::Genre, TimeRange::ShortTerm), "count");
}

#[test]
fn test_reshape_missing_emotion_name() {
    let raw = items(json!([{"percentage": 0.3}]));

    assert_missing(reshape(&raw, ItemType::Emotion, TimeRange::ShortTerm), "name");
}

#[test]
fn test_reshape_missing_emotion_percentage() {
    let raw = items(json!([{"name": "happy", "percentage": 0.1}, {"name": "sad"}]));

    assert_missing(
        reshape(&raw, ItemType::Emotion, TimeRange::ShortTerm),
        "percentage",
    );
}

#[test]
fn test_reshape_reports_name_before_count_when_both_missing() {
    let raw = items(json!([{}]));

    assert_missing(reshape(&raw, ItemType::Genre, TimeRange::ShortTerm), "name");
}

#[test]
fn test_reshape_rejects_wrongly_typed_fields() {
    let raw = items(json!([{"name": "rock", "count": "many"}]));

    let result = reshape(&raw, ItemType::Genre, TimeRange::ShortTerm);

    assert!(matches!(result, Err(ServiceError::UnexpectedFormat(_))));
}

#[test]
fn test_reshape_rejects_non_object_entries() {
    let raw = items(json!(["1", "2"]));

    let result = reshape(&raw, ItemType::Artist, TimeRange::ShortTerm);

    assert!(matches!(result, Err(ServiceError::UnexpectedFormat(_))));
}

#[test]
fn test_item_type_rejects_unknown_tags() {
    for tag in ["album", "Artist", "artists", ""] {
        match tag.parse::<ItemType>() {
            Err(ServiceError::InvalidArgument(message)) => {
                assert!(message.contains("invalid item type"), "{message}")
            }
            other => panic!("expected invalid argument for {tag:?}, got {other:?}"),
        }
    }
}

#[test]
fn test_item_type_tags_round_trip_and_pluralize() {
    for item_type in ItemType::ALL {
        assert_eq!(item_type.as_str().parse::<ItemType>().unwrap(), item_type);
    }
    assert_eq!(ItemType::Artist.endpoint_segment(), "artists");
    assert_eq!(ItemType::Track.endpoint_segment(), "tracks");
    assert_eq!(ItemType::Genre.endpoint_segment(), "genres");
    assert_eq!(ItemType::Emotion.endpoint_segment(), "emotions");
}

#[test]
fn test_time_range_order_and_tags() {
    assert_eq!(
        TimeRange::ALL.map(|t| t.to_string()),
        ["short_term", "medium_term", "long_term"]
    );
    assert!(TimeRange::ShortTerm < TimeRange::MediumTerm);
    assert!(TimeRange::MediumTerm < TimeRange::LongTerm);
    assert!("forever".parse::<TimeRange>().is_err());
}
