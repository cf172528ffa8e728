use serde_json::{Value, json};
use tracing::{debug, error};

use crate::{
    config::TokenGrant,
    error::{ServiceError, ServiceResult},
    spotify::{ApiRequest, SpotifyApi},
    types::Tokens,
};

impl SpotifyApi {
    /// Exchanges a refresh token for a fresh access token.
    ///
    /// The returned `refresh_token` is `None` unless the API rotated it; the
    /// caller decides whether to keep using the old one.
    pub async fn refresh_tokens(&self, refresh_token: &str) -> ServiceResult<Tokens> {
        let request = match &self.token_grant {
            TokenGrant::Json => {
                ApiRequest::post(&self.token_url).json(json!({ "refresh_token": refresh_token }))
            }
            TokenGrant::Form { client } => {
                let request = ApiRequest::post(&self.token_url).form(&[
                    ("grant_type", "refresh_token"),
                    ("refresh_token", refresh_token),
                ]);
                match client {
                    Some(c) => request.basic_auth(&c.client_id, &c.client_secret),
                    None => request,
                }
            }
        };

        let token_data = self.gateway.request(request).await?;
        let tokens = parse_tokens(&token_data)?;
        debug!(rotated = tokens.refresh_token.is_some(), "refreshed access token");

        Ok(tokens)
    }
}

/// Reads the credential pair out of a token endpoint response.
pub fn parse_tokens(token_data: &Value) -> ServiceResult<Tokens> {
    let Some(access_token) = token_data.get("access_token").and_then(Value::as_str) else {
        let err = ServiceError::missing_field("access_token", "token refresh");
        error!(error = %err, "token refresh response rejected");
        return Err(err);
    };

    Ok(Tokens {
        access_token: access_token.to_string(),
        refresh_token: token_data
            .get("refresh_token")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}
