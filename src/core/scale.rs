use serde::{Deserialize, Serialize};

use crate::core::PlotArea;
use crate::error::{ChartError, ChartResult};

/// Linear mapping between a value domain and a pixel range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    pixel_start: f64,
    pixel_end: f64,
}

impl LinearScale {
    pub fn new(
        domain_start: f64,
        domain_end: f64,
        pixel_start: f64,
        pixel_end: f64,
    ) -> ChartResult<Self> {
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start == domain_end {
            return Err(ChartError::InvalidData(
                "scale domain must be finite and non-zero".to_owned(),
            ));
        }
        if !pixel_start.is_finite() || !pixel_end.is_finite() {
            return Err(ChartError::InvalidData(
                "scale pixel range must be finite".to_owned(),
            ));
        }

        Ok(Self {
            domain_start,
            domain_end,
            pixel_start,
            pixel_end,
        })
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    pub fn domain_to_pixel(self, value: f64) -> ChartResult<f64> {
        if !value.is_finite() {
            return Err(ChartError::InvalidData("value must be finite".to_owned()));
        }

        let normalized = (value - self.domain_start) / (self.domain_end - self.domain_start);
        Ok(self.pixel_start + normalized * (self.pixel_end - self.pixel_start))
    }

    pub fn pixel_to_domain(self, pixel: f64) -> ChartResult<f64> {
        if !pixel.is_finite() {
            return Err(ChartError::InvalidData("pixel must be finite".to_owned()));
        }

        let pixel_span = self.pixel_end - self.pixel_start;
        if pixel_span == 0.0 {
            return Ok(self.domain_start);
        }
        let normalized = (pixel - self.pixel_start) / pixel_span;
        Ok(self.domain_start + normalized * (self.domain_end - self.domain_start))
    }
}

/// Categorical x axis: sample `i` of `len` sits at an evenly spaced pixel
/// between the plot area's left and right edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryAxis {
    plot_area: PlotArea,
    len: usize,
}

impl CategoryAxis {
    /// Rejects plot areas with non-finite or inverted edges.
    pub fn new(plot_area: PlotArea, len: usize) -> ChartResult<Self> {
        plot_area.validate()?;
        Ok(Self { plot_area, len })
    }

    #[must_use]
    pub fn plot_area(self) -> PlotArea {
        self.plot_area
    }

    #[must_use]
    pub fn len(self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn clamp_pixel(self, pixel_x: f64) -> f64 {
        pixel_x.clamp(self.plot_area.left, self.plot_area.right)
    }

    /// Continuous index at `pixel_x`; single-sample and empty axes map to 0.
    pub fn index_at_pixel(self, pixel_x: f64) -> ChartResult<f64> {
        match self.index_scale()? {
            Some(scale) => scale.pixel_to_domain(pixel_x),
            None if pixel_x.is_finite() => Ok(0.0),
            None => Err(ChartError::InvalidData("pixel must be finite".to_owned())),
        }
    }

    pub fn pixel_at_index(self, index: f64) -> ChartResult<f64> {
        match self.index_scale()? {
            Some(scale) => scale.domain_to_pixel(index),
            None => Ok((self.plot_area.left + self.plot_area.right) / 2.0),
        }
    }

    fn index_scale(self) -> ChartResult<Option<LinearScale>> {
        if self.len < 2 {
            return Ok(None);
        }
        let last_index = (self.len - 1) as f64;
        LinearScale::new(0.0, last_index, self.plot_area.left, self.plot_area.right).map(Some)
    }
}
