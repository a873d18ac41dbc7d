use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::core::{CategoryAxis, LinearScale, MetricGroup, PlotArea, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::render::{
    Color, LinePrimitive, PanelRenderSpec, RectPrimitive, RenderFrame, RenderSurface,
    SurfaceHandle,
};

const BACKGROUND: Color = Color::rgb(1.0, 1.0, 1.0);

#[derive(Debug, Clone)]
struct HeadlessPanel {
    panel: MetricGroup,
    spec: PanelRenderSpec,
    redraws: usize,
}

/// In-memory render surface that projects panels into [`RenderFrame`]s.
///
/// Used by tests and by hosts that only need exports. Every panel shares the
/// same viewport and plot padding.
#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    viewport: Viewport,
    plot_padding_px: f64,
    panels: IndexMap<SurfaceHandle, HeadlessPanel>,
    next_handle: u64,
    created: usize,
    destroyed: usize,
}

impl HeadlessSurface {
    pub fn new(viewport: Viewport, plot_padding_px: f64) -> ChartResult<Self> {
        if !viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        if !plot_padding_px.is_finite() || plot_padding_px < 0.0 {
            return Err(ChartError::InvalidData(
                "plot padding must be finite and >= 0".to_owned(),
            ));
        }

        Ok(Self {
            viewport,
            plot_padding_px,
            panels: IndexMap::new(),
            next_handle: 1,
            created: 0,
            destroyed: 0,
        })
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn live_count(&self) -> usize {
        self.panels.len()
    }

    #[must_use]
    pub fn is_live(&self, handle: SurfaceHandle) -> bool {
        self.panels.contains_key(&handle)
    }

    /// Live handle currently drawing `panel`, if any.
    #[must_use]
    pub fn handle_for(&self, panel: MetricGroup) -> Option<SurfaceHandle> {
        self.panels
            .iter()
            .find(|(_, entry)| entry.panel == panel)
            .map(|(handle, _)| *handle)
    }

    #[must_use]
    pub fn spec(&self, handle: SurfaceHandle) -> Option<&PanelRenderSpec> {
        self.panels.get(&handle).map(|entry| &entry.spec)
    }

    #[must_use]
    pub fn redraw_count(&self, handle: SurfaceHandle) -> usize {
        self.panels.get(&handle).map_or(0, |entry| entry.redraws)
    }

    #[must_use]
    pub fn created_count(&self) -> usize {
        self.created
    }

    #[must_use]
    pub fn destroyed_count(&self) -> usize {
        self.destroyed
    }

    fn panel(&self, handle: SurfaceHandle) -> ChartResult<&HeadlessPanel> {
        self.panels.get(&handle).ok_or_else(|| {
            ChartError::RenderSurface(format!("unknown surface handle {}", handle.raw()))
        })
    }

    fn plot_area(&self) -> ChartResult<PlotArea> {
        PlotArea::inset(self.viewport, self.plot_padding_px)
    }
}

impl RenderSurface for HeadlessSurface {
    fn create(&mut self, panel: MetricGroup, spec: &PanelRenderSpec) -> ChartResult<SurfaceHandle> {
        spec.options.validate()?;
        for dataset in &spec.datasets {
            if dataset.values.len() != spec.labels.len() {
                return Err(ChartError::RenderSurface(format!(
                    "dataset `{}` has {} values for {} labels",
                    dataset.key,
                    dataset.values.len(),
                    spec.labels.len()
                )));
            }
        }

        let handle = SurfaceHandle::new(self.next_handle);
        self.next_handle += 1;
        self.created += 1;
        self.panels.insert(
            handle,
            HeadlessPanel {
                panel,
                spec: spec.clone(),
                redraws: 0,
            },
        );

        debug!(
            panel = panel.panel_name(),
            handle = handle.raw(),
            datasets = spec.datasets.len(),
            "headless surface created"
        );
        Ok(handle)
    }

    fn destroy(&mut self, handle: SurfaceHandle) -> ChartResult<()> {
        if self.panels.shift_remove(&handle).is_none() {
            return Err(ChartError::RenderSurface(format!(
                "unknown surface handle {}",
                handle.raw()
            )));
        }
        self.destroyed += 1;
        debug!(handle = handle.raw(), "headless surface destroyed");
        Ok(())
    }

    fn axis(&self, handle: SurfaceHandle) -> ChartResult<CategoryAxis> {
        let entry = self.panel(handle)?;
        CategoryAxis::new(self.plot_area()?, entry.spec.labels.len())
    }

    fn redraw(&mut self, handle: SurfaceHandle) -> ChartResult<()> {
        let entry = self.panels.get_mut(&handle).ok_or_else(|| {
            ChartError::RenderSurface(format!("unknown surface handle {}", handle.raw()))
        })?;
        entry.redraws += 1;
        trace!(handle = handle.raw(), redraws = entry.redraws, "headless redraw");
        Ok(())
    }

    fn snapshot(&self, handle: SurfaceHandle) -> ChartResult<RenderFrame> {
        let entry = self.panel(handle)?;
        let axis = self.axis(handle)?;
        let plot_area = axis.plot_area();

        let mut frame = RenderFrame::new(self.viewport).with_rect(RectPrimitive::new(
            0.0,
            0.0,
            f64::from(self.viewport.width),
            f64::from(self.viewport.height),
            BACKGROUND,
        ));

        let Some(y_scale) = value_scale(&entry.spec, plot_area)? else {
            return Ok(frame);
        };

        let stroke_width = entry.spec.options.border_width;
        for dataset in &entry.spec.datasets {
            // Gaps break the polyline; isolated samples draw nothing.
            let mut previous: Option<(f64, f64)> = None;
            for (index, value) in dataset.values.iter().enumerate() {
                let Some(value) = value else {
                    previous = None;
                    continue;
                };
                let x = axis.pixel_at_index(index as f64)?;
                let y = y_scale.domain_to_pixel(*value)?;
                if let Some((x1, y1)) = previous {
                    frame = frame.with_line(LinePrimitive::new(
                        x1,
                        y1,
                        x,
                        y,
                        stroke_width,
                        dataset.color,
                    ));
                }
                previous = Some((x, y));
            }
        }

        frame.validate()?;
        Ok(frame)
    }
}

/// Autoscaled value axis over every present sample; `None` when there is
/// nothing to draw.
fn value_scale(spec: &PanelRenderSpec, plot_area: PlotArea) -> ChartResult<Option<LinearScale>> {
    let mut bounds: Option<(f64, f64)> = None;
    for value in spec
        .datasets
        .iter()
        .flat_map(|dataset| dataset.values.iter().flatten())
    {
        bounds = Some(match bounds {
            Some((min, max)) => (min.min(*value), max.max(*value)),
            None => (*value, *value),
        });
    }

    let Some((mut min, mut max)) = bounds else {
        return Ok(None);
    };
    if min == max {
        min -= 1.0;
        max += 1.0;
    }
    LinearScale::new(min, max, plot_area.bottom, plot_area.top).map(Some)
}
