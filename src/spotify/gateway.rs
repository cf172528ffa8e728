//! HTTP plumbing shared by every data API call.
//!
//! Requests are described as [`ApiRequest`] values and sent through one
//! [`Gateway`], which applies the deadline and maps every failure onto a
//! [`GatewayFailure`]. JSON response bodies are returned undecoded as
//! [`Value`] for the callers to validate.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde_json::Value;
use tracing::{error, info};

use crate::error::{GatewayFailure, ServiceError, ServiceResult};

#[derive(Debug, Clone)]
enum Auth {
    Bearer(String),
    Basic { user: String, password: String },
}

#[derive(Debug, Clone)]
enum Body {
    Json(Value),
    Form(Vec<(String, String)>),
}

/// A single API call described independently of the HTTP client.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    url: String,
    query: Vec<(String, String)>,
    auth: Option<Auth>,
    body: Option<Body>,
}

impl ApiRequest {
    /// Starts a request with no query, auth, or body.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        ApiRequest {
            method,
            url: url.into(),
            query: Vec::new(),
            auth: None,
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    /// Appends one query parameter. Repeated keys are all sent.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Sends `token` as `Authorization: Bearer`.
    pub fn bearer_auth(mut self, token: impl Into<String>) -> Self {
        self.auth = Some(Auth::Bearer(token.into()));
        self
    }

    /// Sends HTTP basic auth. Replaces any bearer token set earlier.
    pub fn basic_auth(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = Some(Auth::Basic {
            user: user.into(),
            password: password.into(),
        });
        self
    }

    /// Sends `body` as `application/json`.
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(Body::Json(body));
        self
    }

    /// Sends `fields` URL-encoded as `application/x-www-form-urlencoded`.
    pub fn form(mut self, fields: &[(&str, &str)]) -> Self {
        let fields = fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.body = Some(Body::Form(fields));
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn build(self, client: &Client, timeout: Duration) -> RequestBuilder {
        let mut builder = client
            .request(self.method, &self.url)
            .timeout(timeout)
            .query(&self.query);

        builder = match self.auth {
            Some(Auth::Bearer(token)) => builder.bearer_auth(token),
            Some(Auth::Basic { user, password }) => builder.basic_auth(user, Some(password)),
            None => builder,
        };

        match self.body {
            Some(Body::Json(value)) => builder.json(&value),
            Some(Body::Form(fields)) => builder.form(&fields),
            None => builder,
        }
    }
}

/// The single network chokepoint for all API calls.
///
/// Wraps a shared [`Client`] (cheap to clone, pooled connections) and applies
/// the per-request deadline. Failures are classified into a
/// [`GatewayFailure`] and never retried.
#[derive(Debug, Clone)]
pub struct Gateway {
    client: Client,
    timeout: Duration,
}

impl Gateway {
    pub fn new(client: Client, timeout: Duration) -> Self {
        Gateway { client, timeout }
    }

    /// Sends one request and decodes the JSON response body.
    ///
    /// No retries are attempted. Each failure is logged with the method, URL
    /// and status before it is returned.
    ///
    /// # Arguments
    ///
    /// * `request` - The call to make
    ///
    /// # Returns
    ///
    /// Returns a `ServiceResult` containing:
    /// - `Ok(Value)` - The decoded body of a 2xx response
    /// - `Err(ServiceError::Gateway)` with
    ///   - `GatewayFailure::Unauthorized` - The API answered 401
    ///   - `GatewayFailure::Unsuccessful` - Any other 4xx/5xx status
    ///   - `GatewayFailure::RequestFailed` - Connection error, timeout, or a body
    ///     that is not JSON
    ///
    /// # Example
    ///
    /// ```
    /// let gateway = Gateway::new(Client::new(), Duration::from_secs(10));
    /// let body = gateway
    ///     .request(ApiRequest::get(format!("{base}/me/top/artists")).bearer_auth(token))
    ///     .await?;
    /// ```
    pub async fn request(&self, request: ApiRequest) -> ServiceResult<Value> {
        let method = request.method().clone();
        let url = request.url().to_string();
        info!(%method, %url, "sending API request");

        let response = match request.build(&self.client, self.timeout).send().await {
            Ok(resp) => resp,
            Err(err) => return Err(failed(&method, &url, GatewayFailure::RequestFailed, err)),
        };

        let response = match response.error_for_status() {
            Ok(valid_response) => valid_response,
            Err(err) => {
                let failure = match err.status() {
                    Some(StatusCode::UNAUTHORIZED) => GatewayFailure::Unauthorized,
                    _ => GatewayFailure::Unsuccessful,
                };
                return Err(failed(&method, &url, failure, err));
            }
        };

        response
            .json::<Value>()
            .await
            .map_err(|err| failed(&method, &url, GatewayFailure::RequestFailed, err))
    }
}

fn failed(
    method: &Method,
    url: &str,
    failure: GatewayFailure,
    err: reqwest::Error,
) -> ServiceError {
    error!(
        %method,
        %url,
        status = err.status().map(|s| s.as_u16()),
        error = %err,
        "{}",
        failure
    );
    ServiceError::Gateway {
        failure,
        detail: err.to_string(),
    }
}
