//! Top-items endpoints of the data API.
//!
//! One call covers one `(item type, time range)` pair. Callers usually want a
//! whole item type at once, which [`SpotifyApi::fetch_all_time_ranges`] runs
//! as three concurrent calls.

use futures::future::try_join_all;
use serde_json::Value;
use tracing::{error, info};

use crate::{
    error::{ServiceError, ServiceResult},
    spotify::{ApiRequest, SpotifyApi, TOP_ITEMS_LIMIT, reshape},
    types::{ItemType, TimeRange, TopItemsData},
};

impl SpotifyApi {
    /// Fetches and reshapes the user's top items of one type for one window.
    ///
    /// Sends `GET {base}/me/top/{artists|tracks|genres|emotions}` with the
    /// access token as bearer auth and `time_range` / `limit` query
    /// parameters, then validates the item list through [`reshape`].
    ///
    /// # Arguments
    ///
    /// * `access_token` - Access token from a fresh token refresh
    /// * `item_type` - Which top list to request
    /// * `time_range` - The listening window to request it for
    ///
    /// # Returns
    ///
    /// Returns a `ServiceResult` containing:
    /// - `Ok(TopItemsData)` - The typed list tagged with `time_range`
    /// - `Err(ServiceError::Gateway)` - The request failed or was rejected
    /// - `Err(ServiceError::MissingField)` - The body or an entry lacks a required field
    /// - `Err(ServiceError::UnexpectedFormat)` - The body or an entry has the wrong shape
    ///
    /// # Example
    ///
    /// ```
    /// let data = api
    ///     .fetch_top_items(&tokens.access_token, ItemType::Artist, TimeRange::ShortTerm)
    ///     .await?;
    /// assert_eq!(data.time_range(), TimeRange::ShortTerm);
    /// ```
    pub async fn fetch_top_items(
        &self,
        access_token: &str,
        item_type: ItemType,
        time_range: TimeRange,
    ) -> ServiceResult<TopItemsData> {
        info!(%item_type, %time_range, "fetching top items");

        let url = format!(
            "{base}/me/top/{segment}",
            base = self.data_api_base_url,
            segment = item_type.endpoint_segment()
        );
        let request = ApiRequest::get(url)
            .bearer_auth(access_token)
            .query("time_range", time_range)
            .query("limit", TOP_ITEMS_LIMIT);

        let result = match self.gateway.request(request).await {
            Ok(body) => items_of(&body, item_type)
                .and_then(|raw_items| reshape(raw_items, item_type, time_range)),
            Err(e) => Err(e),
        };

        result.inspect_err(|e| {
            error!(%item_type, %time_range, error = %e, "failed to fetch top items");
        })
    }

    /// Fetches one item type for every time range concurrently.
    ///
    /// # Arguments
    ///
    /// * `access_token` - Access token shared by all three calls
    /// * `item_type` - Which top list to request
    ///
    /// # Returns
    ///
    /// The three results ordered short, medium, long, regardless of which
    /// call finished first. The first failure fails the group and drops the
    /// remaining in-flight requests.
    pub async fn fetch_all_time_ranges(
        &self,
        access_token: &str,
        item_type: ItemType,
    ) -> ServiceResult<Vec<TopItemsData>> {
        info!(%item_type, "fetching top items for all time ranges");

        try_join_all(
            TimeRange::ALL
                .into_iter()
                .map(|time_range| self.fetch_top_items(access_token, item_type, time_range)),
        )
        .await
    }
}

/// The item list of a top-items response: either `{"items": [...]}` or a
/// bare array.
fn items_of(body: &Value, item_type: ItemType) -> ServiceResult<&[Value]> {
    match body {
        Value::Array(items) => Ok(items.as_slice()),
        Value::Object(map) => match map.get("items") {
            Some(Value::Array(items)) => Ok(items.as_slice()),
            Some(Value::Null) | None => Err(ServiceError::missing_field(
                "items",
                format!("top {}", item_type.endpoint_segment()),
            )),
            Some(other) => Err(ServiceError::UnexpectedFormat(format!(
                "`items` is not a list: {other}"
            ))),
        },
        other => Err(ServiceError::UnexpectedFormat(format!(
            "top {} response is neither an object nor a list: {other}",
            item_type.endpoint_segment()
        ))),
    }
}
