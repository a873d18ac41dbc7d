use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::metric_catalog::{METRIC_CATALOG, catalog_position, label};
use crate::core::{MetricGroup, MetricKey, SelectionState, SeriesBundle};
use crate::render::Color;

pub const DEFAULT_PALETTE_HEX: [&str; 8] = [
    "#3b82f6", "#ef4444", "#10b981", "#f59e0b", "#8b5cf6", "#ec4899", "#6366f1", "#14b8a6",
];

pub const DEFAULT_FILL_ALPHA: f64 = 0.1;

/// Stroke colors cycled by the partition-wide series counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    colors: Vec<Color>,
    fill_alpha: f64,
}

impl Default for Palette {
    fn default() -> Self {
        Self::from_hex(DEFAULT_PALETTE_HEX, DEFAULT_FILL_ALPHA)
    }
}

impl Palette {
    /// Malformed entries become black rather than failing.
    #[must_use]
    pub fn from_hex<I, S>(hex_colors: I, fill_alpha: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            colors: hex_colors
                .into_iter()
                .map(|hex| Color::from_hex_or_black(hex.as_ref()))
                .collect(),
            fill_alpha: fill_alpha.clamp(0.0, 1.0),
        }
    }

    #[must_use]
    pub fn color_at(&self, index: usize) -> Color {
        if self.colors.is_empty() {
            return Color::BLACK;
        }
        self.colors[index % self.colors.len()]
    }

    #[must_use]
    pub fn fill_alpha(&self) -> f64 {
        self.fill_alpha
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// One renderable series inside a panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelDataset {
    pub key: MetricKey,
    pub label: String,
    pub values: Vec<Option<f64>>,
    pub color: Color,
    pub fill_color: Color,
    pub color_index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupDatasets {
    pub group: MetricGroup,
    pub datasets: Vec<PanelDataset>,
}

/// Result of one partition call: all three groups, in panel order, possibly
/// empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelPartition {
    groups: Vec<GroupDatasets>,
}

impl PanelPartition {
    #[must_use]
    pub fn group(&self, group: MetricGroup) -> &[PanelDataset] {
        self.groups
            .iter()
            .find(|entry| entry.group == group)
            .map(|entry| entry.datasets.as_slice())
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GroupDatasets> {
        self.groups.iter()
    }

    #[must_use]
    pub fn dataset_count(&self) -> usize {
        self.groups.iter().map(|entry| entry.datasets.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dataset_count() == 0
    }
}

/// Splits the selected series of `bundle` into per-group datasets.
///
/// Within a group, catalog keys come in declaration order, followed by
/// uncatalogued keys (count group only) in bundle order. The color counter
/// runs across all groups and restarts at zero on every call.
#[must_use]
pub fn partition(
    bundle: &SeriesBundle,
    selection: &SelectionState,
    palette: &Palette,
) -> PanelPartition {
    let mut color_index = 0usize;
    let mut groups = Vec::with_capacity(MetricGroup::ALL.len());

    for group in MetricGroup::ALL {
        let mut ordered_keys: Vec<&str> = METRIC_CATALOG
            .iter()
            .filter(|descriptor| descriptor.group == group)
            .map(|descriptor| descriptor.key)
            .collect();
        if group == MetricGroup::Count {
            ordered_keys.extend(
                bundle
                    .keys()
                    .map(MetricKey::as_str)
                    .filter(|key| catalog_position(key).is_none()),
            );
        }

        let mut datasets = Vec::new();
        for key in ordered_keys {
            if !selection.has(key) {
                continue;
            }
            let Some(values) = bundle.series(key) else {
                continue;
            };

            let color = palette.color_at(color_index);
            datasets.push(PanelDataset {
                key: MetricKey::new(key),
                label: label(key).to_owned(),
                values: values.to_vec(),
                color,
                fill_color: color.with_alpha(palette.fill_alpha()),
                color_index,
            });
            color_index += 1;
        }

        trace!(?group, datasets = datasets.len(), "partitioned group");
        groups.push(GroupDatasets { group, datasets });
    }

    PanelPartition { groups }
}
