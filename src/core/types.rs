use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Pixel rectangle of a panel's plot area (excludes padding and axes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl PlotArea {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> ChartResult<Self> {
        let area = Self {
            left,
            top,
            right,
            bottom,
        };
        area.validate()?;
        Ok(area)
    }

    pub fn validate(self) -> ChartResult<()> {
        if ![self.left, self.top, self.right, self.bottom]
            .iter()
            .all(|value| value.is_finite())
        {
            return Err(ChartError::InvalidData(
                "plot area edges must be finite".to_owned(),
            ));
        }
        if self.right < self.left || self.bottom < self.top {
            return Err(ChartError::InvalidData(
                "plot area edges must satisfy left <= right and top <= bottom".to_owned(),
            ));
        }
        Ok(())
    }

    /// Plot area inset by `padding_px` on every side of `viewport`.
    pub fn inset(viewport: Viewport, padding_px: f64) -> ChartResult<Self> {
        if !viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        let width = f64::from(viewport.width);
        let height = f64::from(viewport.height);
        let padding = padding_px.clamp(0.0, width.min(height) / 2.0);
        Self::new(padding, padding, width - padding, height - padding)
    }
}
