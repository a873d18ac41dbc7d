//! bizchart: interactive time-series engine for business analytics dashboards.
//!
//! Splits dated metric series into per-unit panels, slices them to relative
//! time windows, turns pointer input into interpolated readouts and burns the
//! last readout into exported images. Drawing is delegated to a
//! [`render::RenderSurface`]; data arrives through an async
//! [`api::DataSource`].

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{Dashboard, DashboardConfig};
pub use error::{ChartError, ChartResult, DataError, DateParseError};
