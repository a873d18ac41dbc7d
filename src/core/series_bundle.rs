use indexmap::IndexMap;
use serde::Serialize;

use crate::core::MetricKey;
use crate::error::{ChartError, ChartResult};

/// Dated multi-series snapshot for one business entity.
///
/// Every series has exactly `dates.len()` samples; `None` marks a gap.
/// Bundles are immutable once built and replaced wholesale on reload.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SeriesBundle {
    dates: Vec<String>,
    series: IndexMap<MetricKey, Vec<Option<f64>>>,
}

impl SeriesBundle {
    pub fn new(
        dates: Vec<String>,
        series: IndexMap<MetricKey, Vec<Option<f64>>>,
    ) -> ChartResult<Self> {
        for (key, values) in &series {
            if values.len() != dates.len() {
                return Err(ChartError::InvalidData(format!(
                    "series `{key}` has {} samples but bundle has {} dates",
                    values.len(),
                    dates.len()
                )));
            }
            if values.iter().flatten().any(|value| !value.is_finite()) {
                return Err(ChartError::InvalidData(format!(
                    "series `{key}` contains non-finite samples"
                )));
            }
        }

        Ok(Self { dates, series })
    }

    /// Convenience constructor for dense series without gaps.
    pub fn from_dense<I, K>(dates: Vec<String>, series: I) -> ChartResult<Self>
    where
        I: IntoIterator<Item = (K, Vec<f64>)>,
        K: Into<MetricKey>,
    {
        let series = series
            .into_iter()
            .map(|(key, values)| (key.into(), values.into_iter().map(Some).collect()))
            .collect();
        Self::new(dates, series)
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    #[must_use]
    pub fn last_index(&self) -> Option<usize> {
        self.dates.len().checked_sub(1)
    }

    #[must_use]
    pub fn dates(&self) -> &[String] {
        &self.dates
    }

    #[must_use]
    pub fn series(&self, key: &str) -> Option<&[Option<f64>]> {
        self.series.get(key).map(Vec::as_slice)
    }

    #[must_use]
    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &MetricKey> {
        self.series.keys()
    }

    pub fn iter_series(&self) -> impl Iterator<Item = (&MetricKey, &[Option<f64>])> {
        self.series
            .iter()
            .map(|(key, values)| (key, values.as_slice()))
    }

    /// Suffix starting at `start`, applied identically to dates and series.
    ///
    /// `start >= len` yields a bundle with the same keys and no samples.
    #[must_use]
    pub fn tail_from(&self, start: usize) -> Self {
        let start = start.min(self.dates.len());
        Self {
            dates: self.dates[start..].to_vec(),
            series: self
                .series
                .iter()
                .map(|(key, values)| (key.clone(), values[start..].to_vec()))
                .collect(),
        }
    }
}
