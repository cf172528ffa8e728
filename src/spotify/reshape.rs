//! Raw payload → typed top-items records.
//!
//! Artists and tracks carry no ranking of their own, so their position is the
//! 1-based index in the API's ordering. Genres and emotions come with their
//! own `count` / `percentage` which are kept verbatim.

use serde_json::{Map, Value};

use crate::{
    error::{ServiceError, ServiceResult},
    types::{
        ItemType, TimeRange, TopArtist, TopArtistsData, TopEmotion, TopEmotionsData, TopGenre,
        TopGenresData, TopItemsData, TopTrack, TopTracksData,
    },
};

/// Validates and reshapes one fetch result.
///
/// Entries are checked in order and the first absent required field fails the
/// whole result with [`ServiceError::MissingField`] naming that field.
pub fn reshape(
    raw_items: &[Value],
    item_type: ItemType,
    time_range: TimeRange,
) -> ServiceResult<TopItemsData> {
    let data = match item_type {
        ItemType::Artist => TopItemsData::Artists(TopArtistsData {
            top_artists: positioned(raw_items, item_type, |id, position| TopArtist {
                id,
                position,
            })?,
            time_range,
        }),
        ItemType::Track => TopItemsData::Tracks(TopTracksData {
            top_tracks: positioned(raw_items, item_type, |id, position| TopTrack { id, position })?,
            time_range,
        }),
        ItemType::Genre => TopItemsData::Genres(TopGenresData {
            top_genres: raw_items
                .iter()
                .map(|entry| -> ServiceResult<TopGenre> {
                    let entry = as_object(entry, item_type)?;
                    Ok(TopGenre {
                        name: string_field(entry, "name", item_type)?,
                        count: integer_field(entry, "count", item_type)?,
                    })
                })
                .collect::<ServiceResult<Vec<_>>>()?,
            time_range,
        }),
        ItemType::Emotion => TopItemsData::Emotions(TopEmotionsData {
            top_emotions: raw_items
                .iter()
                .map(|entry| -> ServiceResult<TopEmotion> {
                    let entry = as_object(entry, item_type)?;
                    Ok(TopEmotion {
                        name: string_field(entry, "name", item_type)?,
                        percentage: float_field(entry, "percentage", item_type)?,
                        track_id: optional_string_field(entry, "track_id", item_type)?,
                    })
                })
                .collect::<ServiceResult<Vec<_>>>()?,
            time_range,
        }),
    };

    Ok(data)
}

fn positioned<T>(
    raw_items: &[Value],
    item_type: ItemType,
    make: impl Fn(String, u32) -> T,
) -> ServiceResult<Vec<T>> {
    raw_items
        .iter()
        .zip(1u32..)
        .map(|(entry, position)| -> ServiceResult<T> {
            let entry = as_object(entry, item_type)?;
            Ok(make(string_field(entry, "id", item_type)?, position))
        })
        .collect()
}

fn as_object(entry: &Value, item_type: ItemType) -> ServiceResult<&Map<String, Value>> {
    entry.as_object().ok_or_else(|| {
        ServiceError::UnexpectedFormat(format!("{item_type} entry is not an object: {entry}"))
    })
}

fn required<'a>(
    entry: &'a Map<String, Value>,
    field: &str,
    item_type: ItemType,
) -> ServiceResult<&'a Value> {
    match entry.get(field) {
        Some(Value::Null) | None => Err(ServiceError::missing_field(field, item_type.as_str())),
        Some(value) => Ok(value),
    }
}

fn wrong_type(field: &str, item_type: ItemType, value: &Value) -> ServiceError {
    ServiceError::UnexpectedFormat(format!("{item_type} field `{field}` has value {value}"))
}

fn string_field(
    entry: &Map<String, Value>,
    field: &str,
    item_type: ItemType,
) -> ServiceResult<String> {
    let value = required(entry, field, item_type)?;
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| wrong_type(field, item_type, value))
}

fn optional_string_field(
    entry: &Map<String, Value>,
    field: &str,
    item_type: ItemType,
) -> ServiceResult<Option<String>> {
    match entry.get(field) {
        Some(Value::Null) | None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(value) => Err(wrong_type(field, item_type, value)),
    }
}

fn integer_field(
    entry: &Map<String, Value>,
    field: &str,
    item_type: ItemType,
) -> ServiceResult<i64> {
    let value = required(entry, field, item_type)?;
    value.as_i64().ok_or_else(|| wrong_type(field, item_type, value))
}

fn float_field(
    entry: &Map<String, Value>,
    field: &str,
    item_type: ItemType,
) -> ServiceResult<f64> {
    let value = required(entry, field, item_type)?;
    value.as_f64().ok_or_else(|| wrong_type(field, item_type, value))
}
