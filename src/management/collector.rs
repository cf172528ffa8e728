use tracing::{debug, error, info};

use crate::{
    error::ServiceResult,
    spotify::SpotifyApi,
    types::{ItemType, UserTopItems},
};

/// Collects every top-items list for one user.
///
/// One token refresh, then all four item types across all three time ranges
/// concurrently (12 requests in flight), then assembly. Any failure aborts
/// the collection; there is no partial result.
pub struct UserDataCollector {
    api: SpotifyApi,
}

impl UserDataCollector {
    pub fn new(api: SpotifyApi) -> Self {
        UserDataCollector { api }
    }

    pub async fn collect(&self, refresh_token: &str) -> ServiceResult<UserTopItems> {
        let tokens = self
            .api
            .refresh_tokens(refresh_token)
            .await
            .inspect_err(|e| error!(stage = "refresh", error = %e, "collection aborted"))?;

        let access_token = tokens.access_token.as_str();
        let (artists, tracks, genres, emotions) = tokio::try_join!(
            self.api.fetch_all_time_ranges(access_token, ItemType::Artist),
            self.api.fetch_all_time_ranges(access_token, ItemType::Track),
            self.api.fetch_all_time_ranges(access_token, ItemType::Genre),
            self.api.fetch_all_time_ranges(access_token, ItemType::Emotion),
        )
        .inspect_err(|e| error!(stage = "fetch", error = %e, "collection aborted"))?;

        let collected = UserTopItems::assemble(
            tokens.refresh_token,
            artists
                .into_iter()
                .chain(tracks)
                .chain(genres)
                .chain(emotions),
        );
        debug!(?collected, "assembled user top items");
        info!(
            artists = collected.top_artists_data.len(),
            tracks = collected.top_tracks_data.len(),
            genres = collected.top_genres_data.len(),
            emotions = collected.top_emotions_data.len(),
            "collected top items"
        );

        Ok(collected)
    }
}
