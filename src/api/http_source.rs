use async_trait::async_trait;
use tracing::debug;

use crate::api::{DataSource, EntityId, HistoryEnvelope, HistorySnapshot};
use crate::error::DataError;

/// [`DataSource`] over the dashboard's `/api/business-history/{entity}`
/// endpoint.
#[derive(Debug, Clone)]
pub struct HttpDataSource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpDataSource {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    #[must_use]
    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            client,
        }
    }

    #[must_use]
    pub fn history_url(&self, entity: &EntityId) -> String {
        format!("{}/api/business-history/{}", self.base_url, entity)
    }
}

#[async_trait]
impl DataSource for HttpDataSource {
    async fn fetch(&self, entity: &EntityId) -> Result<HistorySnapshot, DataError> {
        let url = self.history_url(entity);
        debug!(%url, "fetching history");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| DataError::Network(format!("request to `{url}` failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DataError::Rejected(format!(
                "history request failed with status {status}: {body}"
            )));
        }

        let envelope = response
            .json::<HistoryEnvelope>()
            .await
            .map_err(|e| DataError::Parse(format!("failed to parse history response: {e}")))?;
        envelope.into_snapshot()
    }
}
