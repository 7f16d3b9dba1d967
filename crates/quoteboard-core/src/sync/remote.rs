use serde_json::Value;

use crate::config::SyncConfig;
use crate::constants::SERVER_CATEGORY;
use crate::error::QuoteError;
use crate::models::Quote;

/// HTTP client for the remote quote endpoint.
///
/// Reads: `GET <endpoint>` returns a JSON array of objects carrying a
/// `title` (or `text`) field. Writes: `POST <endpoint>` with the full
/// collection as a JSON array. Any 2xx status counts as success.
#[derive(Clone)]
pub struct RemoteClient {
    client: reqwest::Client,
    endpoint: String,
    fetch_limit: usize,
}

impl RemoteClient {
    pub fn new(config: &SyncConfig) -> Result<Self, QuoteError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            fetch_limit: config.fetch_limit,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch and map remote records. Fails open: any transport, status or
    /// decode problem is logged and yields an empty list.
    pub async fn fetch_remote(&self) -> Vec<Quote> {
        match self.try_fetch_remote().await {
            Ok(quotes) => quotes,
            Err(e) => {
                tracing::warn!("sync: fetch from {} failed: {}", self.endpoint, e);
                Vec::new()
            }
        }
    }

    pub async fn try_fetch_remote(&self) -> Result<Vec<Quote>, QuoteError> {
        let response = self.client.get(&self.endpoint).send().await?;

        if !response.status().is_success() {
            return Err(QuoteError::Transport(format!(
                "GET {} returned {}",
                self.endpoint,
                response.status()
            )));
        }

        let items: Vec<Value> = response
            .json()
            .await
            .map_err(|e| QuoteError::Transport(format!("invalid response body: {e}")))?;

        let quotes = map_remote_items(&items, self.fetch_limit);
        tracing::debug!(
            "sync: fetched {} items, mapped {} quotes",
            items.len(),
            quotes.len()
        );
        Ok(quotes)
    }

    /// POST the full collection. Local state is never touched here.
    pub async fn push_quotes(&self, quotes: &[Quote]) -> Result<(), QuoteError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(quotes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(QuoteError::Transport(format!(
                "POST {} returned {}: {}",
                self.endpoint, status, body
            )));
        }

        tracing::debug!("sync: pushed {} quotes ({})", quotes.len(), status);
        Ok(())
    }
}

/// Map the first `limit` remote items into quotes. The title becomes the
/// text and every quote lands in the fixed server category. Items without a
/// usable title are skipped.
pub fn map_remote_items(items: &[Value], limit: usize) -> Vec<Quote> {
    items
        .iter()
        .take(limit)
        .filter_map(|item| {
            let text = item
                .get("title")
                .and_then(Value::as_str)
                .or_else(|| item.get("text").and_then(Value::as_str))?;
            Quote::new(text, SERVER_CATEGORY).ok()
        })
        .collect()
}
