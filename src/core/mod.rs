pub mod metric_catalog;
pub mod number_format;
pub mod partition;
pub mod scale;
pub mod selection;
pub mod series_bundle;
pub mod time_range;
pub mod types;

pub use metric_catalog::{
    METRIC_CATALOG, MetricDescriptor, MetricGroup, MetricKey, classify, label, unit_suffix,
};
pub use number_format::format_grouped;
pub use partition::{GroupDatasets, Palette, PanelDataset, PanelPartition, partition};
pub use scale::{CategoryAxis, LinearScale};
pub use selection::{DEFAULT_SELECTED_METRICS, SelectionState};
pub use series_bundle::SeriesBundle;
pub use time_range::{
    RangeAvailability, RangeToken, TimeRangeFilter, parse_date_label, utc_offset,
};
pub use types::{PlotArea, Viewport};
