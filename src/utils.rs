use crate::types::{ItemType, SummaryTableRow, TimeRange, UserTopItems};

/// One row per (item type, time range) with the number of collected items.
pub fn summary_rows(data: &UserTopItems) -> Vec<SummaryTableRow> {
    let row = |item_type: ItemType, time_range: TimeRange, items: usize| SummaryTableRow {
        item_type: item_type.to_string(),
        time_range: time_range.to_string(),
        items,
    };

    let artists = data
        .top_artists_data
        .iter()
        .map(|d| row(ItemType::Artist, d.time_range, d.top_artists.len()));
    let tracks = data
        .top_tracks_data
        .iter()
        .map(|d| row(ItemType::Track, d.time_range, d.top_tracks.len()));
    let genres = data
        .top_genres_data
        .iter()
        .map(|d| row(ItemType::Genre, d.time_range, d.top_genres.len()));
    let emotions = data
        .top_emotions_data
        .iter()
        .map(|d| row(ItemType::Emotion, d.time_range, d.top_emotions.len()));

    artists.chain(tracks).chain(genres).chain(emotions).collect()
}

/// Shortens a secret for display, keeping only its first characters.
pub fn mask_token(token: &str) -> String {
    let visible: String = token.chars().take(4).collect();
    if visible.len() == token.len() {
        "****".to_string()
    } else {
        format!("{visible}****")
    }
}
