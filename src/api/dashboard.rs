use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::api::{
    Clock, DashboardConfig, EntityId, HistorySnapshot, LoadTicket, MetricCard, PanelCoordinator,
    PanelState, RebuildScheduler, build_metric_cards,
};
use crate::core::{
    MetricGroup, MetricKey, Palette, RangeAvailability, RangeToken, SelectionState, SeriesBundle,
    TimeRangeFilter, partition,
};
use crate::error::{ChartError, ChartResult, DataError};
use crate::interaction::{CursorInterpolator, InputDecision, InputSession, PointerEvent, Readout};
use crate::render::{ExportOverlay, ExportTarget, ImageEncoder, RenderSurface};

/// What happened to a completed load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The bundle was swapped in and panels rebuilt.
    Applied,
    /// The ticket belongs to an older selection generation; nothing changed.
    Stale,
    /// The fetch failed; the previous bundle stays on screen.
    Failed(DataError),
}

#[derive(Debug, Clone, Default)]
struct PanelCursor {
    session: InputSession,
    interpolator: CursorInterpolator,
}

/// One dashboard session: selection, range, active bundle, panels and
/// cursors. Independent instances share nothing.
pub struct Dashboard<S: RenderSurface, C: Clock> {
    config: DashboardConfig,
    surface: S,
    clock: C,
    palette: Palette,
    filter: TimeRangeFilter,
    overlay: ExportOverlay,
    selection: SelectionState,
    range: RangeToken,
    entity: Option<EntityId>,
    bundle: Arc<SeriesBundle>,
    visible: SeriesBundle,
    latest: IndexMap<MetricKey, f64>,
    coordinator: PanelCoordinator,
    cursors: IndexMap<MetricGroup, PanelCursor>,
    generation: u64,
    scheduler: RebuildScheduler,
    last_data_error: Option<DataError>,
}

impl<S: RenderSurface, C: Clock> Dashboard<S, C> {
    pub fn new(config: DashboardConfig, surface: S, clock: C) -> ChartResult<Self> {
        config.validate()?;

        let filter = TimeRangeFilter::new(config.local_offset()?);
        let overlay = ExportOverlay::new(config.overlay)?;
        let mut dashboard = Self {
            palette: config.palette(),
            filter,
            overlay,
            selection: config.initial_selection(),
            range: config.default_range,
            entity: None,
            bundle: Arc::new(SeriesBundle::empty()),
            visible: SeriesBundle::empty(),
            latest: IndexMap::new(),
            coordinator: PanelCoordinator::new(config.line_trace),
            cursors: IndexMap::new(),
            generation: 0,
            scheduler: RebuildScheduler::new(config.rebuild_debounce()),
            last_data_error: None,
            config,
            surface,
            clock,
        };
        dashboard.rebuild_panels()?;
        Ok(dashboard)
    }

    #[must_use]
    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    #[must_use]
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    #[must_use]
    pub fn time_range(&self) -> RangeToken {
        self.range
    }

    #[must_use]
    pub fn entity(&self) -> Option<&EntityId> {
        self.entity.as_ref()
    }

    /// Full, unfiltered bundle of the last applied load.
    #[must_use]
    pub fn bundle(&self) -> &Arc<SeriesBundle> {
        &self.bundle
    }

    /// Bundle slice currently drawn under the active range.
    #[must_use]
    pub fn visible_bundle(&self) -> &SeriesBundle {
        &self.visible
    }

    #[must_use]
    pub fn latest(&self) -> &IndexMap<MetricKey, f64> {
        &self.latest
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn last_data_error(&self) -> Option<&DataError> {
        self.last_data_error.as_ref()
    }

    #[must_use]
    pub fn panel_state(&self, panel: MetricGroup) -> &PanelState {
        self.coordinator.state(panel)
    }

    #[must_use]
    pub fn has_pending_rebuild(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// Flips `key` in the selection and rebuilds the panels.
    ///
    /// Returns whether `key` is active afterwards.
    pub fn toggle_metric(&mut self, key: &str) -> ChartResult<bool> {
        let active = self.selection.toggle(key);
        debug!(key, active, "metric toggled");
        self.rebuild_panels()?;
        Ok(active)
    }

    pub fn set_time_range(&mut self, token: RangeToken) -> ChartResult<()> {
        self.range = token;
        self.refilter();
        debug!(?token, visible = self.visible.len(), "time range changed");
        self.rebuild_panels()
    }

    #[must_use]
    pub fn range_availability(&self) -> RangeAvailability {
        self.filter.availability(&self.bundle, self.clock.now())
    }

    /// Starts loading `entity`; any in-flight load becomes stale.
    pub fn select_entity(&mut self, entity: impl Into<EntityId>) -> LoadTicket {
        let entity = entity.into();
        self.entity = Some(entity.clone());
        self.next_ticket(entity)
    }

    /// Re-fetches the current entity, if one is selected.
    pub fn begin_reload(&mut self) -> Option<LoadTicket> {
        let entity = self.entity.clone()?;
        Some(self.next_ticket(entity))
    }

    /// Applies the result of the fetch started for `ticket`.
    pub fn complete_load(
        &mut self,
        ticket: &LoadTicket,
        result: Result<HistorySnapshot, DataError>,
    ) -> ChartResult<LoadOutcome> {
        if ticket.generation != self.generation {
            debug!(
                ticket_generation = ticket.generation,
                current_generation = self.generation,
                entity = %ticket.entity,
                "discarding stale load result"
            );
            return Ok(LoadOutcome::Stale);
        }

        let snapshot = match result {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(entity = %ticket.entity, error = %err, "history load failed; keeping previous bundle");
                self.last_data_error = Some(err.clone());
                return Ok(LoadOutcome::Failed(err));
            }
        };

        self.bundle = Arc::new(snapshot.bundle);
        self.latest = snapshot.latest;
        self.last_data_error = None;
        for cursor in self.cursors.values_mut() {
            cursor.interpolator.invalidate();
        }
        self.refilter();
        info!(
            entity = %ticket.entity,
            generation = self.generation,
            dates = self.bundle.len(),
            series = self.bundle.series_count(),
            "bundle swapped"
        );
        self.rebuild_panels()?;
        Ok(LoadOutcome::Applied)
    }

    /// Schedules a debounced rebuild; bursts collapse into one.
    pub fn notify_resize(&mut self) {
        self.scheduler.schedule(self.clock.now(), self.generation);
    }

    /// Runs a due debounced rebuild; returns whether one ran.
    pub fn poll_timers(&mut self) -> ChartResult<bool> {
        if !self.scheduler.poll(self.clock.now(), self.generation) {
            return Ok(false);
        }
        self.rebuild_panels()?;
        Ok(true)
    }

    /// Starts routing pointer input of `panel` to its cursor interpolator.
    ///
    /// Idempotent; handlers survive panel rebuilds.
    pub fn attach_cursor_handlers(&mut self, panel: MetricGroup) {
        self.cursors.entry(panel).or_default();
        debug!(panel = panel.panel_name(), "cursor handlers attached");
    }

    #[must_use]
    pub fn has_cursor_handlers(&self, panel: MetricGroup) -> bool {
        self.cursors.contains_key(&panel)
    }

    /// Feeds one pointer event of `panel`; returns the panel's readout after
    /// the event.
    pub fn handle_input(
        &mut self,
        panel: MetricGroup,
        event: PointerEvent,
    ) -> ChartResult<Option<&Readout>> {
        let Some(cursor) = self.cursors.get_mut(&panel) else {
            return Ok(None);
        };

        let InputDecision::Interpolate { x } = cursor.session.handle(event) else {
            return Ok(cursor.interpolator.readout());
        };
        let Some(handle) = self.coordinator.handle(panel) else {
            return Ok(cursor.interpolator.readout());
        };

        let axis = self.surface.axis(handle)?;
        cursor.interpolator.update(
            x,
            axis,
            self.visible.dates(),
            self.coordinator.datasets(panel),
        )?;
        self.surface.redraw(handle)?;
        Ok(cursor.interpolator.readout())
    }

    #[must_use]
    pub fn readout(&self, panel: MetricGroup) -> Option<&Readout> {
        self.cursors
            .get(&panel)
            .and_then(|cursor| cursor.interpolator.readout())
    }

    /// Exports `panel` with its last readout burned in; returns the delivered
    /// file name.
    pub fn export_chart<E, T>(
        &self,
        panel: MetricGroup,
        encoder: &mut E,
        target: &mut T,
    ) -> ChartResult<String>
    where
        E: ImageEncoder + ?Sized,
        T: ExportTarget + ?Sized,
    {
        let handle = self
            .coordinator
            .handle(panel)
            .ok_or(ChartError::PanelUnavailable(panel))?;

        let snapshot = self.surface.snapshot(handle)?;
        let frame = self.overlay.compose(snapshot, self.readout(panel));
        let image = encoder.encode(&frame)?;

        let file_name = format!(
            "{}-{}.{}",
            panel.panel_name(),
            self.clock.now().format("%Y%m%d_%H%M%S"),
            image.extension
        );
        let bytes = image.bytes.len();
        target.deliver(&file_name, image)?;

        info!(panel = panel.panel_name(), %file_name, bytes, "chart exported");
        Ok(file_name)
    }

    /// Cards for every series of the full bundle, in bundle order.
    #[must_use]
    pub fn metric_cards(&self) -> Vec<MetricCard> {
        build_metric_cards(&self.bundle, &self.selection, &self.config.currency_suffix)
    }

    /// Destroys all surface handles; panels report hidden afterwards.
    pub fn teardown(&mut self) {
        self.scheduler.cancel();
        self.coordinator.teardown(&mut self.surface);
        for cursor in self.cursors.values_mut() {
            cursor.session.reset();
            cursor.interpolator.invalidate();
        }
    }

    fn next_ticket(&mut self, entity: EntityId) -> LoadTicket {
        self.generation += 1;
        self.scheduler.cancel();
        debug!(generation = self.generation, %entity, "load started");
        LoadTicket {
            generation: self.generation,
            entity,
        }
    }

    fn refilter(&mut self) {
        self.visible = self
            .filter
            .apply(&self.bundle, self.range, self.clock.now());
    }

    fn rebuild_panels(&mut self) -> ChartResult<()> {
        let partitioned = partition(&self.visible, &self.selection, &self.palette);
        self.coordinator
            .rebuild(&mut self.surface, self.visible.dates(), &partitioned);

        for (panel, cursor) in &mut self.cursors {
            let Some(handle) = self.coordinator.handle(*panel) else {
                cursor.interpolator.invalidate();
                continue;
            };
            let axis = self.surface.axis(handle)?;
            cursor.interpolator.refresh(
                axis,
                self.visible.dates(),
                self.coordinator.datasets(*panel),
            )?;
            if cursor.interpolator.is_active() {
                self.surface.redraw(handle)?;
            }
        }

        debug!(
            generation = self.generation,
            datasets = partitioned.dataset_count(),
            "panels rebuilt"
        );
        Ok(())
    }
}
