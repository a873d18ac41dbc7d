use std::fmt;

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{MetricKey, SeriesBundle};
use crate::error::DataError;

/// Identifier of the business entity whose history is displayed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// One fetched history: the dated series plus the most recent record.
#[derive(Debug, Clone, PartialEq)]
pub struct HistorySnapshot {
    pub bundle: SeriesBundle,
    /// Numeric fields of the latest record, in payload order.
    pub latest: IndexMap<MetricKey, f64>,
}

impl HistorySnapshot {
    #[must_use]
    pub fn new(bundle: SeriesBundle) -> Self {
        Self {
            bundle,
            latest: IndexMap::new(),
        }
    }
}

/// Both payload generations served by the history endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SeriesPayload {
    /// `{ dates, series: { key: [..] } }`
    Current {
        dates: Vec<String>,
        series: IndexMap<MetricKey, Vec<Option<f64>>>,
    },
    /// Flat `{ dates, revenue: [..], expenses: [..], .. }`
    Legacy {
        dates: Vec<String>,
        #[serde(flatten)]
        columns: IndexMap<MetricKey, Vec<Option<f64>>>,
    },
}

impl SeriesPayload {
    pub fn into_bundle(self) -> Result<SeriesBundle, DataError> {
        let (dates, series) = match self {
            Self::Current { dates, series } => (dates, series),
            Self::Legacy { dates, columns } => (dates, columns),
        };
        SeriesBundle::new(dates, series).map_err(|err| DataError::Parse(err.to_string()))
    }
}

/// Response envelope of `/api/business-history/{entity}`.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<SeriesPayload>,
    #[serde(default)]
    pub latest: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<String>,
}

impl HistoryEnvelope {
    pub fn into_snapshot(self) -> Result<HistorySnapshot, DataError> {
        if !self.success {
            return Err(DataError::Rejected(
                self.error
                    .unwrap_or_else(|| "history request was not successful".to_owned()),
            ));
        }
        let payload = self
            .data
            .ok_or_else(|| DataError::Parse("history envelope has no `data`".to_owned()))?;

        let latest = match self.latest {
            Some(serde_json::Value::Object(record)) => record
                .into_iter()
                .filter_map(|(key, value)| value.as_f64().map(|value| (MetricKey::new(key), value)))
                .collect(),
            _ => IndexMap::new(),
        };

        Ok(HistorySnapshot {
            bundle: payload.into_bundle()?,
            latest,
        })
    }
}

/// Decodes a raw history response body.
pub fn decode_history(body: &str) -> Result<HistorySnapshot, DataError> {
    let envelope: HistoryEnvelope = serde_json::from_str(body)
        .map_err(|e| DataError::Parse(format!("failed to parse history json: {e}")))?;
    let snapshot = envelope.into_snapshot()?;
    debug!(
        dates = snapshot.bundle.len(),
        series = snapshot.bundle.series_count(),
        "decoded history payload"
    );
    Ok(snapshot)
}

/// Async provider of entity histories.
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch(&self, entity: &EntityId) -> Result<HistorySnapshot, DataError>;
}

/// Identifies one load request; results are applied only while the ticket's
/// generation is still current.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LoadTicket {
    pub generation: u64,
    pub entity: EntityId,
}

/// Runs a fetch for `ticket` and hands the ticket back with the result.
pub async fn fetch_for_ticket<D>(
    source: &D,
    ticket: LoadTicket,
) -> (LoadTicket, Result<HistorySnapshot, DataError>)
where
    D: DataSource + ?Sized,
{
    let result = source.fetch(&ticket.entity).await;
    (ticket, result)
}

/// Serves canned response bodies per entity through [`decode_history`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryDataSource {
    responses: IndexMap<EntityId, Result<String, DataError>>,
}

impl InMemoryDataSource {
    #[must_use]
    pub fn with_body(mut self, entity: impl Into<EntityId>, body: impl Into<String>) -> Self {
        self.responses.insert(entity.into(), Ok(body.into()));
        self
    }

    #[must_use]
    pub fn with_error(mut self, entity: impl Into<EntityId>, error: DataError) -> Self {
        self.responses.insert(entity.into(), Err(error));
        self
    }
}

#[async_trait]
impl DataSource for InMemoryDataSource {
    async fn fetch(&self, entity: &EntityId) -> Result<HistorySnapshot, DataError> {
        match self.responses.get(entity) {
            Some(Ok(body)) => decode_history(body),
            Some(Err(error)) => Err(error.clone()),
            None => Err(DataError::Rejected(format!("unknown entity `{entity}`"))),
        }
    }
}
