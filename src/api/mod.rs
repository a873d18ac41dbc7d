mod clock;
mod dashboard;
mod dashboard_config;
mod data_source;
#[cfg(feature = "http-source")]
mod http_source;
mod metric_cards;
mod panel_coordinator;
mod rebuild_scheduler;

pub use clock::{Clock, ManualClock, SystemClock};
pub use dashboard::{Dashboard, LoadOutcome};
pub use dashboard_config::DashboardConfig;
pub use data_source::{
    DataSource, EntityId, HistoryEnvelope, HistorySnapshot, InMemoryDataSource, LoadTicket,
    SeriesPayload, decode_history, fetch_for_ticket,
};
#[cfg(feature = "http-source")]
pub use http_source::HttpDataSource;
pub use metric_cards::{MetricCard, build_metric_cards};
pub use panel_coordinator::{PanelCoordinator, PanelState};
pub use rebuild_scheduler::{PendingRebuild, RebuildScheduler};
