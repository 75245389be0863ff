use crate::config::OmdbConfig;
use crate::error::{MovieError, Result};
use crate::models::{is_true_flag, MovieDetail, SearchResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

#[async_trait]
pub trait MovieApi: Send + Sync {
    async fn search(&self, query: &str, page: u32) -> Result<SearchResult>;
    async fn details(&self, imdb_id: &str) -> Result<MovieDetail>;
}

#[derive(Debug, Clone)]
pub struct OmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OmdbClient {
    pub fn new(config: &OmdbConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| MovieError::transport("Failed to build OMDb HTTP client", e))?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(&OmdbConfig::from_env()?)
    }

    pub(crate) fn build_url(&self, params: &[(&str, &str)]) -> String {
        let sep = if self.base_url.contains('?') { '&' } else { '?' };
        let mut url = format!(
            "{}{sep}apikey={}",
            self.base_url,
            urlencoding::encode(&self.api_key)
        );
        for (key, value) in params {
            url.push('&');
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, params: &[(&str, &str)]) -> Result<T> {
        let url = self.build_url(params);
        debug!(params = ?params, "OMDb request");
        let res = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| MovieError::transport("OMDb request failed", e))?;
        let status = res.status();
        let text = res
            .text()
            .await
            .map_err(|e| MovieError::transport("Reading OMDb body failed", e))?;

        // OMDb reports most failures as JSON with "Response": "False", sometimes with a 4xx status.
        let parsed: Option<Value> = serde_json::from_str(&text).ok();
        if let Some(value) = parsed.as_ref() {
            if let Some(flag) = value.get("Response").and_then(|v| v.as_str()) {
                if !is_true_flag(flag) {
                    let message = value
                        .get("Error")
                        .and_then(|v| v.as_str())
                        .map(|s| s.to_string());
                    return Err(MovieError::remote(message));
                }
            }
        }
        if !status.is_success() {
            debug!(%status, body = %text, "OMDb error body");
            return Err(MovieError::transport(
                format!("OMDb HTTP error (status {status})"),
                body_snippet(&text),
            ));
        }
        let value = parsed.ok_or_else(|| {
            debug!(body = %text, "OMDb non-JSON body");
            MovieError::transport(
                "OMDb JSON parse failed",
                format!("not JSON: {}", body_snippet(&text)),
            )
        })?;
        serde_json::from_value(value).map_err(|e| MovieError::transport("OMDb JSON parse failed", e))
    }
}

const SNIPPET_CHARS: usize = 80;

/// Upstream body with whitespace collapsed, cut to a short prefix for error messages.
fn body_snippet(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.is_empty() {
        return "empty body".to_string();
    }
    match flat.char_indices().nth(SNIPPET_CHARS) {
        Some((cut, _)) => format!("{}...", &flat[..cut]),
        None => flat,
    }
}

#[async_trait]
impl MovieApi for OmdbClient {
    async fn search(&self, query: &str, page: u32) -> Result<SearchResult> {
        let page = page.to_string();
        let result: Result<SearchResult> = self
            .get_json(&[("s", query), ("page", page.as_str())])
            .await
            .and_then(SearchResult::into_checked);
        if let Err(e) = &result {
            warn!("OMDb search for '{}' failed: {}", query, e);
        }
        result
    }

    async fn details(&self, imdb_id: &str) -> Result<MovieDetail> {
        let result = self.get_json(&[("i", imdb_id), ("plot", "full")]).await;
        if let Err(e) = &result {
            warn!("OMDb detail lookup for '{}' failed: {}", imdb_id, e);
        }
        result
    }
}
