use std::sync::Arc;
use std::time::Duration;

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use crate::session::SessionStore;

/// The single configured request pipeline. Every request goes through
/// [`ApiClient::execute`], which attaches the bearer credential when one is
/// present and tears the session down on an authorization failure before
/// the error reaches the caller.
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    store: Arc<SessionStore>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, store: Arc<SessionStore>) -> ApiResult<Self> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| ApiError::Config(format!("bad api url '{}': {}", config.base_url, e)))?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { http, base, store })
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> ApiResult<Response> {
        self.execute(self.http.get(self.endpoint(path)).query(query))
            .await
    }

    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<Response> {
        self.execute(self.http.post(self.endpoint(path)).json(body))
            .await
    }

    pub async fn post_empty(&self, path: &str) -> ApiResult<Response> {
        self.execute(self.http.post(self.endpoint(path))).await
    }

    pub async fn put_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<Response> {
        self.execute(self.http.put(self.endpoint(path)).json(body))
            .await
    }

    pub async fn delete(&self, path: &str) -> ApiResult<Response> {
        self.execute(self.http.delete(self.endpoint(path))).await
    }

    async fn execute(&self, req: RequestBuilder) -> ApiResult<Response> {
        let req = match self.store.token() {
            Some(token) => req.bearer_auth(token),
            None => req,
        };
        let resp = req.send().await?;

        if resp.status() == StatusCode::UNAUTHORIZED {
            // Forced teardown; the caller's own error handling still runs,
            // but the shell is already navigating to login.
            tracing::warn!("authorization failure, invalidating session");
            self.store.invalidate();
        }

        Ok(resp)
    }
}

/// Decode a successful response as JSON, or surface the backend's message
/// with `default` as the fallback.
pub async fn decode_json<T: DeserializeOwned>(resp: Response, default: &str) -> ApiResult<T> {
    if resp.status().is_success() {
        resp.json::<T>().await.map_err(|e| {
            tracing::error!("unreadable response body: {}", e);
            ApiError::Api(default.to_string())
        })
    } else {
        Err(ApiError::Api(failure_message(resp, &["message"], default).await))
    }
}

/// Succeed on any 2xx, otherwise surface the backend's message.
pub async fn expect_success(resp: Response, default: &str) -> ApiResult<()> {
    if resp.status().is_success() {
        Ok(())
    } else {
        Err(ApiError::Api(failure_message(resp, &["message"], default).await))
    }
}

/// Extract a human-readable message from an error response body, checking
/// `fields` in order before falling back to `default`.
pub async fn failure_message(resp: Response, fields: &[&str], default: &str) -> String {
    match resp.json::<serde_json::Value>().await {
        Ok(body) => pick_message(&body, fields).unwrap_or_else(|| default.to_string()),
        Err(_) => default.to_string(),
    }
}

fn pick_message(body: &serde_json::Value, fields: &[&str]) -> Option<String> {
    fields
        .iter()
        .find_map(|f| body.get(f).and_then(|v| v.as_str()).map(str::to_string))
}
