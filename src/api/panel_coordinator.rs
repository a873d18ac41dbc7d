use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, warn};

use crate::core::{MetricGroup, PanelDataset, PanelPartition};
use crate::render::{LineTraceOptions, PanelRenderSpec, RenderSurface, SurfaceHandle};

static HIDDEN: PanelState = PanelState::Hidden;

/// Lifecycle state of one unit-group panel.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub enum PanelState {
    /// Nothing selected for this group; no surface handle exists.
    #[default]
    Hidden,
    Rendered {
        handle: SurfaceHandle,
        datasets: Vec<PanelDataset>,
    },
    /// Surface creation failed; the message is shown inline in the panel.
    Failed { message: String },
}

impl PanelState {
    #[must_use]
    pub fn handle(&self) -> Option<SurfaceHandle> {
        match self {
            Self::Rendered { handle, .. } => Some(*handle),
            Self::Hidden | Self::Failed { .. } => None,
        }
    }

    #[must_use]
    pub fn datasets(&self) -> &[PanelDataset] {
        match self {
            Self::Rendered { datasets, .. } => datasets,
            Self::Hidden | Self::Failed { .. } => &[],
        }
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        !matches!(self, Self::Hidden)
    }
}

/// Owns the surface handles of the three panels.
///
/// A panel's previous handle is always destroyed before a new one is created.
#[derive(Debug, Clone)]
pub struct PanelCoordinator {
    panels: IndexMap<MetricGroup, PanelState>,
    options: LineTraceOptions,
    rebuilds: u64,
}

impl PanelCoordinator {
    #[must_use]
    pub fn new(options: LineTraceOptions) -> Self {
        Self {
            panels: MetricGroup::ALL
                .into_iter()
                .map(|group| (group, PanelState::Hidden))
                .collect(),
            options,
            rebuilds: 0,
        }
    }

    #[must_use]
    pub fn state(&self, panel: MetricGroup) -> &PanelState {
        self.panels.get(&panel).unwrap_or(&HIDDEN)
    }

    #[must_use]
    pub fn handle(&self, panel: MetricGroup) -> Option<SurfaceHandle> {
        self.state(panel).handle()
    }

    #[must_use]
    pub fn datasets(&self, panel: MetricGroup) -> &[PanelDataset] {
        self.state(panel).datasets()
    }

    /// Number of completed rebuild passes.
    #[must_use]
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }

    /// Re-creates every panel from `partition` over the x-axis `labels`.
    pub fn rebuild<S: RenderSurface>(
        &mut self,
        surface: &mut S,
        labels: &[String],
        partition: &PanelPartition,
    ) {
        for group in MetricGroup::ALL {
            self.rebuild_panel(surface, group, labels, partition.group(group));
        }
        self.rebuilds += 1;
    }

    /// Destroys every live handle and hides all panels.
    pub fn teardown<S: RenderSurface>(&mut self, surface: &mut S) {
        for group in MetricGroup::ALL {
            self.release(surface, group);
        }
    }

    fn rebuild_panel<S: RenderSurface>(
        &mut self,
        surface: &mut S,
        group: MetricGroup,
        labels: &[String],
        datasets: &[PanelDataset],
    ) {
        self.release(surface, group);

        if datasets.is_empty() {
            debug!(panel = group.panel_name(), "panel hidden");
            return;
        }

        let spec = PanelRenderSpec {
            labels: labels.to_vec(),
            datasets: datasets.to_vec(),
            options: self.options,
        };
        let state = match surface.create(group, &spec) {
            Ok(handle) => {
                debug!(
                    panel = group.panel_name(),
                    handle = handle.raw(),
                    datasets = datasets.len(),
                    "panel created"
                );
                PanelState::Rendered {
                    handle,
                    datasets: spec.datasets,
                }
            }
            Err(err) => {
                warn!(panel = group.panel_name(), error = %err, "panel creation failed");
                PanelState::Failed {
                    message: err.to_string(),
                }
            }
        };
        self.panels.insert(group, state);
    }

    fn release<S: RenderSurface>(&mut self, surface: &mut S, group: MetricGroup) {
        let previous = self
            .panels
            .insert(group, PanelState::Hidden)
            .unwrap_or_default();
        let Some(handle) = previous.handle() else {
            return;
        };
        if let Err(err) = surface.destroy(handle) {
            // Treated as already gone.
            warn!(
                panel = group.panel_name(),
                handle = handle.raw(),
                error = %err,
                "panel destroy failed"
            );
        }
    }
}
