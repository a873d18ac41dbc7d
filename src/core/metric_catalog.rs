use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical identifier of one financial/operational measure.
///
/// Keys outside the static catalog are still representable; they classify as
/// [`MetricGroup::Count`] and label as themselves.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricKey(String);

impl MetricKey {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn group(&self) -> MetricGroup {
        classify(&self.0)
    }

    #[must_use]
    pub fn label(&self) -> &str {
        label(&self.0)
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for MetricKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MetricKey {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for MetricKey {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

/// Unit classification; each group renders in its own panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricGroup {
    Currency,
    Count,
    Percent,
}

impl MetricGroup {
    /// Panel order used by partitioning and rebuilds.
    pub const ALL: [MetricGroup; 3] = [
        MetricGroup::Currency,
        MetricGroup::Count,
        MetricGroup::Percent,
    ];

    #[must_use]
    pub const fn panel_name(self) -> &'static str {
        match self {
            Self::Currency => "currency",
            Self::Count => "counts",
            Self::Percent => "percent",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricDescriptor {
    pub key: &'static str,
    pub group: MetricGroup,
    pub label: &'static str,
}

const fn entry(key: &'static str, group: MetricGroup, label: &'static str) -> MetricDescriptor {
    MetricDescriptor { key, group, label }
}

/// Static catalog in declaration order. Partitioning iterates this order.
pub const METRIC_CATALOG: [MetricDescriptor; 26] = [
    entry("revenue", MetricGroup::Currency, "Revenue"),
    entry("expenses", MetricGroup::Currency, "Expenses"),
    entry("profit", MetricGroup::Currency, "Profit"),
    entry("clients", MetricGroup::Count, "Clients"),
    entry("average_check", MetricGroup::Currency, "Avg. check"),
    entry("investments", MetricGroup::Currency, "Investments"),
    entry("marketing_costs", MetricGroup::Currency, "Marketing"),
    entry("profit_margin", MetricGroup::Percent, "Margin"),
    entry("roi", MetricGroup::Percent, "ROI"),
    entry("employees", MetricGroup::Count, "Employees"),
    entry("break_even_clients", MetricGroup::Count, "Break-even clients"),
    entry("safety_margin", MetricGroup::Percent, "Safety margin"),
    entry("profitability_index", MetricGroup::Percent, "Profitability idx."),
    entry("ltv", MetricGroup::Currency, "LTV"),
    entry("cac", MetricGroup::Currency, "CAC"),
    entry("ltv_cac_ratio", MetricGroup::Percent, "LTV/CAC"),
    entry("customer_profit_margin", MetricGroup::Percent, "Customer margin"),
    entry("sgr", MetricGroup::Percent, "SGR"),
    entry("revenue_growth_rate", MetricGroup::Percent, "Revenue growth"),
    entry("asset_turnover", MetricGroup::Count, "Asset turnover"),
    entry("roe", MetricGroup::Percent, "ROE"),
    entry("months_to_bankruptcy", MetricGroup::Count, "Months to bankruptcy"),
    entry("financial_health_score", MetricGroup::Count, "Financial health"),
    entry("growth_health_score", MetricGroup::Count, "Growth"),
    entry("efficiency_health_score", MetricGroup::Count, "Efficiency"),
    entry("overall_health_score", MetricGroup::Count, "Overall rating"),
];

#[must_use]
pub fn describe(key: &str) -> Option<&'static MetricDescriptor> {
    METRIC_CATALOG.iter().find(|descriptor| descriptor.key == key)
}

/// Position of `key` in catalog declaration order.
#[must_use]
pub fn catalog_position(key: &str) -> Option<usize> {
    METRIC_CATALOG
        .iter()
        .position(|descriptor| descriptor.key == key)
}

/// Anything neither currency nor percent is a count.
#[must_use]
pub fn classify(key: &str) -> MetricGroup {
    describe(key).map_or(MetricGroup::Count, |descriptor| descriptor.group)
}

#[must_use]
pub fn label(key: &str) -> &str {
    describe(key).map_or(key, |descriptor| descriptor.label)
}

/// Display suffix appended to values of `group` in cards.
#[must_use]
pub fn unit_suffix(group: MetricGroup, currency_suffix: &str) -> &str {
    match group {
        MetricGroup::Currency => currency_suffix,
        MetricGroup::Percent => "%",
        MetricGroup::Count => "",
    }
}
