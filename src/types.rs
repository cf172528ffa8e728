use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::error::ServiceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Artist,
    Track,
    Genre,
    Emotion,
}

impl ItemType {
    pub const ALL: [ItemType; 4] = [
        ItemType::Artist,
        ItemType::Track,
        ItemType::Genre,
        ItemType::Emotion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Artist => "artist",
            ItemType::Track => "track",
            ItemType::Genre => "genre",
            ItemType::Emotion => "emotion",
        }
    }

    /// Path segment of the top-items endpoint, e.g. `artists`.
    pub fn endpoint_segment(&self) -> String {
        format!("{}s", self.as_str())
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "artist" => Ok(ItemType::Artist),
            "track" => Ok(ItemType::Track),
            "genre" => Ok(ItemType::Genre),
            "emotion" => Ok(ItemType::Emotion),
            other => Err(ServiceError::InvalidArgument(format!(
                "invalid item type: {other}"
            ))),
        }
    }
}

/// Aggregation window of the top-items endpoint. Ordered short to long.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeRange {
    ShortTerm,
    MediumTerm,
    LongTerm,
}

impl TimeRange {
    pub const ALL: [TimeRange; 3] = [
        TimeRange::ShortTerm,
        TimeRange::MediumTerm,
        TimeRange::LongTerm,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::ShortTerm => "short_term",
            TimeRange::MediumTerm => "medium_term",
            TimeRange::LongTerm => "long_term",
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeRange {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "short_term" => Ok(TimeRange::ShortTerm),
            "medium_term" => Ok(TimeRange::MediumTerm),
            "long_term" => Ok(TimeRange::LongTerm),
            other => Err(ServiceError::InvalidArgument(format!(
                "invalid time range: {other}"
            ))),
        }
    }
}

/// Credential pair returned by a token refresh.
///
/// `refresh_token` is only set when the API rotated it; otherwise the
/// caller's existing refresh token stays valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopArtist {
    pub id: String,
    pub position: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopTrack {
    pub id: String,
    pub position: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopGenre {
    pub name: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopEmotion {
    pub name: String,
    pub percentage: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopArtistsData {
    pub top_artists: Vec<TopArtist>,
    pub time_range: TimeRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopTracksData {
    pub top_tracks: Vec<TopTrack>,
    pub time_range: TimeRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopGenresData {
    pub top_genres: Vec<TopGenre>,
    pub time_range: TimeRange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopEmotionsData {
    pub top_emotions: Vec<TopEmotion>,
    pub time_range: TimeRange,
}

/// Reshaped result of one (item type, time range) fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum TopItemsData {
    Artists(TopArtistsData),
    Tracks(TopTracksData),
    Genres(TopGenresData),
    Emotions(TopEmotionsData),
}

impl TopItemsData {
    pub fn item_type(&self) -> ItemType {
        match self {
            TopItemsData::Artists(_) => ItemType::Artist,
            TopItemsData::Tracks(_) => ItemType::Track,
            TopItemsData::Genres(_) => ItemType::Genre,
            TopItemsData::Emotions(_) => ItemType::Emotion,
        }
    }

    pub fn time_range(&self) -> TimeRange {
        match self {
            TopItemsData::Artists(d) => d.time_range,
            TopItemsData::Tracks(d) => d.time_range,
            TopItemsData::Genres(d) => d.time_range,
            TopItemsData::Emotions(d) => d.time_range,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            TopItemsData::Artists(d) => d.top_artists.len(),
            TopItemsData::Tracks(d) => d.top_tracks.len(),
            TopItemsData::Genres(d) => d.top_genres.len(),
            TopItemsData::Emotions(d) => d.top_emotions.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Everything collected for one user in one invocation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserTopItems {
    pub refresh_token: Option<String>,
    pub top_artists_data: Vec<TopArtistsData>,
    pub top_tracks_data: Vec<TopTracksData>,
    pub top_genres_data: Vec<TopGenresData>,
    pub top_emotions_data: Vec<TopEmotionsData>,
}

impl UserTopItems {
    /// Distributes reshaped results into their typed lists, each ordered by
    /// time range regardless of the order the results arrive in.
    pub fn assemble<I>(refresh_token: Option<String>, results: I) -> Self
    where
        I: IntoIterator<Item = TopItemsData>,
    {
        let mut assembled = UserTopItems {
            refresh_token,
            ..Default::default()
        };

        for data in results {
            match data {
                TopItemsData::Artists(d) => assembled.top_artists_data.push(d),
                TopItemsData::Tracks(d) => assembled.top_tracks_data.push(d),
                TopItemsData::Genres(d) => assembled.top_genres_data.push(d),
                TopItemsData::Emotions(d) => assembled.top_emotions_data.push(d),
            }
        }

        assembled.top_artists_data.sort_by_key(|d| d.time_range);
        assembled.top_tracks_data.sort_by_key(|d| d.time_range);
        assembled.top_genres_data.sort_by_key(|d| d.time_range);
        assembled.top_emotions_data.sort_by_key(|d| d.time_range);
        assembled
    }
}

/// Message body forwarded to the queue: the collected data keyed by user.
#[derive(Debug, Serialize)]
pub struct QueueMessage<'a> {
    pub user_id: &'a str,
    #[serde(flatten)]
    pub data: &'a UserTopItems,
}

impl<'a> QueueMessage<'a> {
    pub fn new(user_id: &'a str, data: &'a UserTopItems) -> Self {
        QueueMessage { user_id, data }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Tabled)]
pub struct SummaryTableRow {
    #[tabled(rename = "type")]
    pub item_type: String,
    pub time_range: String,
    pub items: usize,
}
