use thiserror::Error;

use crate::core::MetricGroup;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    DateParse(#[from] DateParseError),

    #[error("render surface failure: {0}")]
    RenderSurface(String),

    #[error("panel `{}` has no rendered surface", .0.panel_name())]
    PanelUnavailable(MetricGroup),

    #[error("export failed: {0}")]
    Export(String),
}

/// Failure while fetching or decoding a series payload.
///
/// Recovered locally: the dashboard keeps the previously displayed bundle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    #[error("network error: {0}")]
    Network(String),

    #[error("payload parse error: {0}")]
    Parse(String),

    #[error("data source rejected request: {0}")]
    Rejected(String),
}

/// One date label that matched none of the accepted encodings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized date label `{label}`")]
pub struct DateParseError {
    pub label: String,
}
