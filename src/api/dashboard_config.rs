use chrono::{FixedOffset, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::core::{
    DEFAULT_SELECTED_METRICS, MetricKey, Palette, RangeToken, SelectionState, Viewport,
    partition::{DEFAULT_FILL_ALPHA, DEFAULT_PALETTE_HEX},
};
use crate::error::{ChartError, ChartResult};
use crate::render::{LineTraceOptions, OverlayStyle};

/// Dashboard bootstrap configuration.
///
/// Serializable so hosts can keep it next to their own settings; every field
/// has a default, so `{}` is a valid document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_panel_viewport")]
    pub panel_viewport: Viewport,
    #[serde(default = "default_plot_padding_px")]
    pub plot_padding_px: f64,
    /// Offset applied to date labels without a zone marker.
    #[serde(default)]
    pub local_utc_offset_minutes: i32,
    #[serde(default = "default_palette")]
    pub palette: Vec<String>,
    #[serde(default = "default_fill_alpha")]
    pub fill_alpha: f64,
    #[serde(default)]
    pub line_trace: LineTraceOptions,
    #[serde(default = "default_rebuild_debounce_ms")]
    pub rebuild_debounce_ms: u64,
    #[serde(default = "default_selected_metrics")]
    pub default_selection: Vec<MetricKey>,
    #[serde(default)]
    pub default_range: RangeToken,
    #[serde(default = "default_currency_suffix")]
    pub currency_suffix: String,
    #[serde(default)]
    pub overlay: OverlayStyle,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            panel_viewport: default_panel_viewport(),
            plot_padding_px: default_plot_padding_px(),
            local_utc_offset_minutes: 0,
            palette: default_palette(),
            fill_alpha: default_fill_alpha(),
            line_trace: LineTraceOptions::default(),
            rebuild_debounce_ms: default_rebuild_debounce_ms(),
            default_selection: default_selected_metrics(),
            default_range: RangeToken::default(),
            currency_suffix: default_currency_suffix(),
            overlay: OverlayStyle::default(),
        }
    }
}

impl DashboardConfig {
    #[must_use]
    pub fn with_panel_viewport(mut self, viewport: Viewport) -> Self {
        self.panel_viewport = viewport;
        self
    }

    #[must_use]
    pub fn with_local_utc_offset_minutes(mut self, minutes: i32) -> Self {
        self.local_utc_offset_minutes = minutes;
        self
    }

    #[must_use]
    pub fn with_rebuild_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.rebuild_debounce_ms = debounce_ms;
        self
    }

    #[must_use]
    pub fn with_default_selection<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<MetricKey>,
    {
        self.default_selection = keys.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_default_range(mut self, token: RangeToken) -> Self {
        self.default_range = token;
        self
    }

    #[must_use]
    pub fn with_overlay(mut self, overlay: OverlayStyle) -> Self {
        self.overlay = overlay;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.panel_viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.panel_viewport.width,
                height: self.panel_viewport.height,
            });
        }
        if !self.plot_padding_px.is_finite() || self.plot_padding_px < 0.0 {
            return Err(ChartError::InvalidData(
                "plot padding must be finite and >= 0".to_owned(),
            ));
        }
        if !self.fill_alpha.is_finite() || !(0.0..=1.0).contains(&self.fill_alpha) {
            return Err(ChartError::InvalidData(
                "fill alpha must be finite and in [0, 1]".to_owned(),
            ));
        }
        self.local_offset()?;
        self.line_trace.validate()?;
        self.overlay.validate()?;
        Ok(())
    }

    pub fn local_offset(&self) -> ChartResult<FixedOffset> {
        self.local_utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                ChartError::InvalidData(format!(
                    "local utc offset of {} minutes is out of range",
                    self.local_utc_offset_minutes
                ))
            })
    }

    #[must_use]
    pub fn palette(&self) -> Palette {
        Palette::from_hex(&self.palette, self.fill_alpha)
    }

    #[must_use]
    pub fn rebuild_debounce(&self) -> TimeDelta {
        TimeDelta::milliseconds(i64::try_from(self.rebuild_debounce_ms).unwrap_or(i64::MAX))
    }

    #[must_use]
    pub fn initial_selection(&self) -> SelectionState {
        SelectionState::from_keys(self.default_selection.iter().cloned())
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidData(format!("failed to parse dashboard config json: {e}"))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize dashboard config json: {e}"))
        })
    }
}

fn default_panel_viewport() -> Viewport {
    Viewport::new(800, 300)
}

fn default_plot_padding_px() -> f64 {
    16.0
}

fn default_palette() -> Vec<String> {
    DEFAULT_PALETTE_HEX.iter().map(|hex| (*hex).to_owned()).collect()
}

fn default_fill_alpha() -> f64 {
    DEFAULT_FILL_ALPHA
}

fn default_rebuild_debounce_ms() -> u64 {
    250
}

fn default_selected_metrics() -> Vec<MetricKey> {
    DEFAULT_SELECTED_METRICS.into_iter().map(MetricKey::new).collect()
}

fn default_currency_suffix() -> String {
    "₽".to_owned()
}
