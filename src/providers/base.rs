//! Shared fetch helper giving every adapter its fail-soft guarantee.

use crate::utils::error::Result;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Scoped HTTP client bound to one provider's base URL.
///
/// This is the single chokepoint for upstream calls: network failures,
/// non-2xx statuses and malformed bodies are logged here and surface as
/// `None`, never as errors the adapters would have to propagate.
#[derive(Debug, Clone)]
pub struct FetchClient {
    base_url: String,
    client: Client,
}

impl FetchClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `url` and parse the JSON body, swallowing any failure.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Option<T> {
        self.fail_soft(url, self.try_get(url, None).await)
    }

    /// Same as [`get_json`](Self::get_json) with a bearer token attached.
    pub async fn get_json_with_bearer<T: DeserializeOwned>(
        &self,
        url: &str,
        token: &str,
    ) -> Option<T> {
        self.fail_soft(url, self.try_get(url, Some(token)).await)
    }

    async fn try_get<T: DeserializeOwned>(&self, url: &str, bearer: Option<&str>) -> Result<T> {
        tracing::debug!("Fetching {}", url);

        let mut request = self.client.get(url);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?.error_for_status()?;
        let body = response.json::<T>().await?;
        Ok(body)
    }

    fn fail_soft<T>(&self, url: &str, outcome: Result<T>) -> Option<T> {
        match outcome {
            Ok(body) => Some(body),
            Err(e) => {
                tracing::error!("Fetch error from {}: {}", url, e);
                None
            }
        }
    }
}

/// Extension of the last path segment of an asset URL, `None` when the
/// filename has no dot.
pub(crate) fn file_ext(url: &str) -> Option<&str> {
    url.rsplit('/')
        .next()
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
}

/// Upstream fields that are sometimes a single object and sometimes a
/// sequence. Normalizes both forms to an ordered `Vec`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Many(items) => items,
            Self::One(item) => vec![item],
        }
    }

    pub fn into_first(self) -> Option<T> {
        match self {
            Self::Many(items) => items.into_iter().next(),
            Self::One(item) => Some(item),
        }
    }
}
