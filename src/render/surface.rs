use serde::{Deserialize, Serialize};

use crate::core::{CategoryAxis, MetricGroup, PanelDataset};
use crate::error::{ChartError, ChartResult};
use crate::render::RenderFrame;

/// Opaque handle to one chart instance living on a render surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceHandle(u64);

impl SurfaceHandle {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Trace styling forwarded to the surface: smoothed, filled line traces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineTraceOptions {
    pub border_width: f64,
    /// Curve smoothing in `0..=1`; `0` draws straight segments.
    pub tension: f64,
    pub point_radius: f64,
    pub fill: bool,
}

impl Default for LineTraceOptions {
    fn default() -> Self {
        Self {
            border_width: 2.0,
            tension: 0.4,
            point_radius: 0.0,
            fill: true,
        }
    }
}

impl LineTraceOptions {
    pub fn validate(self) -> ChartResult<Self> {
        if !self.border_width.is_finite() || self.border_width <= 0.0 {
            return Err(ChartError::InvalidData(
                "trace border width must be finite and > 0".to_owned(),
            ));
        }
        if !self.tension.is_finite() || !(0.0..=1.0).contains(&self.tension) {
            return Err(ChartError::InvalidData(
                "trace tension must be finite and in [0, 1]".to_owned(),
            ));
        }
        if !self.point_radius.is_finite() || self.point_radius < 0.0 {
            return Err(ChartError::InvalidData(
                "trace point radius must be finite and >= 0".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// Everything a surface needs to draw one panel.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelRenderSpec {
    pub labels: Vec<String>,
    pub datasets: Vec<PanelDataset>,
    pub options: LineTraceOptions,
}

/// Chart-rendering capability consumed by the dashboard.
///
/// Implementations own the actual drawing library. Handles are created and
/// destroyed by the panel coordinator only.
pub trait RenderSurface {
    fn create(&mut self, panel: MetricGroup, spec: &PanelRenderSpec) -> ChartResult<SurfaceHandle>;

    fn destroy(&mut self, handle: SurfaceHandle) -> ChartResult<()>;

    /// Pixel ↔ sample-index mapping of the handle's x axis.
    fn axis(&self, handle: SurfaceHandle) -> ChartResult<CategoryAxis>;

    fn redraw(&mut self, handle: SurfaceHandle) -> ChartResult<()>;

    /// Static image of the handle's current drawing.
    fn snapshot(&self, handle: SurfaceHandle) -> ChartResult<RenderFrame>;
}
