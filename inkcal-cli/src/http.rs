//! HTTP event source backing the cache.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use inkcal_core::cache::EventSource;
use inkcal_core::{InkCalError, InkCalResult};

use crate::config::SourceConfig;

/// Fetches ICS text over HTTPS, one configured URL per source name.
pub struct HttpEventSource {
    client: reqwest::Client,
    urls: HashMap<String, String>,
}

impl HttpEventSource {
    pub fn new(sources: &[SourceConfig], timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let urls = sources
            .iter()
            .map(|s| (s.name.clone(), s.url.clone()))
            .collect();
        Ok(HttpEventSource { client, urls })
    }
}

impl EventSource for HttpEventSource {
    fn fetch(&self, source_id: &str) -> impl Future<Output = InkCalResult<String>> + Send {
        async move {
            let url = self
                .urls
                .get(source_id)
                .ok_or_else(|| InkCalError::Config(format!("unknown source '{source_id}'")))?;
            let url = normalize_webcal(url);

            // A timeout surfaces here as an error, never a hang.
            let response = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| InkCalError::Network(e.to_string()))?;

            if !response.status().is_success() {
                return Err(InkCalError::Network(format!(
                    "HTTP {} from {url}",
                    response.status()
                )));
            }
            response
                .text()
                .await
                .map_err(|e| InkCalError::Network(e.to_string()))
        }
    }
}

/// Rewrite `webcal://` subscription URLs to `https://`.
fn normalize_webcal(url: &str) -> String {
    match url.strip_prefix("webcal://") {
        Some(rest) => format!("https://{rest}"),
        None => url.to_string(),
    }
}
