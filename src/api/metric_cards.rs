use serde::Serialize;

use crate::core::{MetricGroup, MetricKey, SelectionState, SeriesBundle, format_grouped, unit_suffix};

/// One tile of the "all metrics" grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCard {
    pub key: MetricKey,
    pub label: String,
    pub group: MetricGroup,
    pub unit_suffix: String,
    /// Last sample of the series; `None` when it is a gap or the series is empty.
    pub latest_value: Option<f64>,
    pub active: bool,
}

impl MetricCard {
    /// `"1 234 ₽"`-style value text; gaps read as zero.
    #[must_use]
    pub fn display_value(&self) -> String {
        let value = format_grouped(self.latest_value.unwrap_or(0.0));
        if self.unit_suffix.is_empty() {
            value
        } else {
            format!("{value} {}", self.unit_suffix)
        }
    }
}

/// Cards for every series of `bundle`, in bundle order.
#[must_use]
pub fn build_metric_cards(
    bundle: &SeriesBundle,
    selection: &SelectionState,
    currency_suffix: &str,
) -> Vec<MetricCard> {
    bundle
        .iter_series()
        .map(|(key, values)| {
            let group = key.group();
            MetricCard {
                key: key.clone(),
                label: key.label().to_owned(),
                group,
                unit_suffix: unit_suffix(group, currency_suffix).to_owned(),
                latest_value: values.last().copied().flatten(),
                active: selection.has(key.as_str()),
            }
        })
        .collect()
}
