use serde::Serialize;
use smallvec::SmallVec;
use tracing::trace;

use crate::core::{CategoryAxis, MetricKey, PanelDataset};
use crate::error::{ChartError, ChartResult};
use crate::render::Color;

/// One series value shown at the cursor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadoutEntry {
    pub key: MetricKey,
    pub label: String,
    pub value: f64,
    pub color: Color,
}

/// Human-facing value set at a cursor position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Readout {
    /// The panel's bundle has no samples.
    NoData,
    Point {
        date_label: String,
        index: f64,
        entries: SmallVec<[ReadoutEntry; 8]>,
    },
}

impl Readout {
    #[must_use]
    pub fn date_label(&self) -> Option<&str> {
        match self {
            Self::NoData => None,
            Self::Point { date_label, .. } => Some(date_label),
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[ReadoutEntry] {
        match self {
            Self::NoData => &[],
            Self::Point { entries, .. } => entries,
        }
    }

    #[must_use]
    pub fn value_of(&self, key: &str) -> Option<f64> {
        self.entries()
            .iter()
            .find(|entry| entry.key.as_str() == key)
            .map(|entry| entry.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub enum CursorPosition {
    #[default]
    Inactive,
    Active {
        pixel_x: f64,
        index: f64,
    },
}

/// Interpolated readout at a continuous `index` over `dates`.
///
/// Values are linearly interpolated between the two neighbouring samples and
/// rounded. A missing neighbour disables interpolation for that series; a
/// series missing on both sides is left out. The date label snaps to the
/// nearest sample.
#[must_use]
pub fn interpolate_readout(index: f64, dates: &[String], datasets: &[PanelDataset]) -> Readout {
    let Some(last_index) = dates.len().checked_sub(1) else {
        return Readout::NoData;
    };

    let index = if index.is_finite() {
        index.clamp(0.0, last_index as f64)
    } else {
        0.0
    };
    let i0 = (index.floor() as usize).min(last_index);
    let i1 = (i0 + 1).min(last_index);
    let t = (index - i0 as f64).clamp(0.0, 1.0);

    let entries = datasets
        .iter()
        .filter_map(|dataset| {
            let start = dataset.values.get(i0).copied().flatten();
            let end = dataset.values.get(i1).copied().flatten();
            let value = match (start, end) {
                (Some(start), Some(end)) => start + (end - start) * t,
                (Some(start), None) => start,
                (None, Some(end)) => end,
                (None, None) => return None,
            };
            Some(ReadoutEntry {
                key: dataset.key.clone(),
                label: dataset.label.clone(),
                value: value.round(),
                color: dataset.color,
            })
        })
        .collect();

    let label_index = if t < 0.5 { i0 } else { i1 };
    Readout::Point {
        date_label: dates[label_index].clone(),
        index,
        entries,
    }
}

/// Pointer-driven readout for one panel.
///
/// The readout is sticky: it only changes on `update`, `refresh` or
/// `invalidate`, never on pointer leave.
#[derive(Debug, Clone, Default)]
pub struct CursorInterpolator {
    position: CursorPosition,
    readout: Option<Readout>,
}

impl CursorInterpolator {
    #[must_use]
    pub fn position(&self) -> CursorPosition {
        self.position
    }

    #[must_use]
    pub fn readout(&self) -> Option<&Readout> {
        self.readout.as_ref()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self.position, CursorPosition::Active { .. })
    }

    /// Moves the cursor to `pixel_x`, clamped into the axis plot area.
    pub fn update(
        &mut self,
        pixel_x: f64,
        axis: CategoryAxis,
        dates: &[String],
        datasets: &[PanelDataset],
    ) -> ChartResult<&Readout> {
        if !pixel_x.is_finite() {
            return Err(ChartError::InvalidData(
                "cursor pixel must be finite".to_owned(),
            ));
        }

        let clamped = axis.clamp_pixel(pixel_x);
        let readout = if dates.is_empty() {
            self.position = CursorPosition::Inactive;
            Readout::NoData
        } else {
            let index = axis.index_at_pixel(clamped)?;
            let readout = interpolate_readout(index, dates, datasets);
            let index = match &readout {
                Readout::Point { index, .. } => *index,
                Readout::NoData => 0.0,
            };
            self.position = CursorPosition::Active {
                pixel_x: clamped,
                index,
            };
            readout
        };

        trace!(pixel_x, clamped, position = ?self.position, "cursor update");
        Ok(&*self.readout.insert(readout))
    }

    /// Recomputes the readout at the stored pixel against new panel data.
    ///
    /// Does nothing while inactive.
    pub fn refresh(
        &mut self,
        axis: CategoryAxis,
        dates: &[String],
        datasets: &[PanelDataset],
    ) -> ChartResult<Option<&Readout>> {
        match self.position {
            CursorPosition::Inactive => Ok(self.readout.as_ref()),
            CursorPosition::Active { pixel_x, .. } => {
                self.update(pixel_x, axis, dates, datasets).map(Some)
            }
        }
    }

    /// Drops position and readout, e.g. when the bundle is superseded.
    pub fn invalidate(&mut self) {
        self.position = CursorPosition::Inactive;
        self.readout = None;
    }
}
