use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::format_grouped;
use crate::error::{ChartError, ChartResult};
use crate::interaction::Readout;
use crate::render::{
    Color, RectPrimitive, RenderFrame, TextHAlign, TextPrimitive, estimate_text_width_px,
};

pub const NO_DATA_TEXT: &str = "No data";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayCorner {
    #[default]
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Geometry and colors of the readout legend box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayStyle {
    pub corner: OverlayCorner,
    pub margin_px: f64,
    pub padding_px: f64,
    pub font_size_px: f64,
    pub line_height_px: f64,
    pub corner_radius_px: f64,
    /// Horizontal space between entries sharing a line.
    pub entry_gap_px: f64,
    pub background: Color,
    pub title_color: Color,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            corner: OverlayCorner::TopLeft,
            margin_px: 8.0,
            padding_px: 8.0,
            font_size_px: 12.0,
            line_height_px: 16.0,
            corner_radius_px: 6.0,
            entry_gap_px: 12.0,
            background: Color::rgba(30.0 / 255.0, 41.0 / 255.0, 59.0 / 255.0, 0.85),
            title_color: Color::rgb(248.0 / 255.0, 250.0 / 255.0, 252.0 / 255.0),
        }
    }
}

impl OverlayStyle {
    pub fn validate(self) -> ChartResult<Self> {
        for (name, value) in [
            ("margin", self.margin_px),
            ("padding", self.padding_px),
            ("corner radius", self.corner_radius_px),
            ("entry gap", self.entry_gap_px),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "overlay {name} must be finite and >= 0"
                )));
            }
        }
        for (name, value) in [
            ("font size", self.font_size_px),
            ("line height", self.line_height_px),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "overlay {name} must be finite and > 0"
                )));
            }
        }
        self.background.validate()?;
        self.title_color.validate()?;
        Ok(self)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct OverlayToken {
    text: String,
    color: Color,
    width: f64,
}

/// Burns a readout legend into a panel snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ExportOverlay {
    style: OverlayStyle,
}

impl ExportOverlay {
    pub fn new(style: OverlayStyle) -> ChartResult<Self> {
        Ok(Self {
            style: style.validate()?,
        })
    }

    #[must_use]
    pub fn style(&self) -> OverlayStyle {
        self.style
    }

    /// Returns `snapshot` with the legend appended to its overlay layer.
    ///
    /// Without a readout the snapshot is returned unchanged.
    #[must_use]
    pub fn compose(&self, snapshot: RenderFrame, readout: Option<&Readout>) -> RenderFrame {
        let Some(readout) = readout else {
            return snapshot;
        };

        let style = self.style;
        let viewport_width = f64::from(snapshot.viewport.width);
        let viewport_height = f64::from(snapshot.viewport.height);
        let max_line_width = (viewport_width - 2.0 * (style.margin_px + style.padding_px)).max(1.0);

        let lines = self.layout_lines(readout, max_line_width);
        if lines.is_empty() {
            return snapshot;
        }

        let content_width = lines
            .iter()
            .map(|line| self.line_width(line))
            .fold(0.0, f64::max);
        let box_width = (content_width + 2.0 * style.padding_px)
            .min((viewport_width - 2.0 * style.margin_px).max(0.0));
        let box_height = lines.len() as f64 * style.line_height_px + 2.0 * style.padding_px;

        let (box_x, box_y) = match style.corner {
            OverlayCorner::TopLeft => (style.margin_px, style.margin_px),
            OverlayCorner::TopRight => (viewport_width - style.margin_px - box_width, style.margin_px),
            OverlayCorner::BottomLeft => {
                (style.margin_px, viewport_height - style.margin_px - box_height)
            }
            OverlayCorner::BottomRight => (
                viewport_width - style.margin_px - box_width,
                viewport_height - style.margin_px - box_height,
            ),
        };
        let box_x = box_x.max(0.0);
        let box_y = box_y.max(0.0);

        let mut frame = snapshot;
        frame.overlay_rects.push(
            RectPrimitive::new(box_x, box_y, box_width, box_height, style.background)
                .with_corner_radius(style.corner_radius_px),
        );

        // Line text is vertically centered within its line box.
        let baseline_offset = ((style.line_height_px - style.font_size_px) / 2.0).max(0.0);
        for (line_index, line) in lines.iter().enumerate() {
            let y = box_y + style.padding_px + line_index as f64 * style.line_height_px + baseline_offset;
            let mut x = box_x + style.padding_px;
            for token in line {
                frame.overlay_texts.push(TextPrimitive::new(
                    token.text.clone(),
                    x,
                    y,
                    style.font_size_px,
                    token.color,
                    TextHAlign::Left,
                ));
                x += token.width + style.entry_gap_px;
            }
        }

        debug!(
            lines = lines.len(),
            texts = frame.overlay_texts.len(),
            corner = ?style.corner,
            "export overlay composed"
        );
        frame
    }

    fn layout_lines(&self, readout: &Readout, max_line_width: f64) -> Vec<Vec<OverlayToken>> {
        let font_size = self.style.font_size_px;
        let token = |text: String, color: Color| OverlayToken {
            width: estimate_text_width_px(&text, font_size),
            text,
            color,
        };

        let (date_label, entries) = match readout {
            Readout::NoData => {
                return vec![vec![token(NO_DATA_TEXT.to_owned(), self.style.title_color)]];
            }
            Readout::Point {
                date_label,
                entries,
                ..
            } => (date_label, entries),
        };

        let mut lines = Vec::new();
        if !date_label.is_empty() {
            lines.push(vec![token(date_label.clone(), self.style.title_color)]);
        }

        let mut current: Vec<OverlayToken> = Vec::new();
        let mut current_width = 0.0;
        for entry in entries.iter() {
            let next = token(
                format!("{} {}", entry.label, format_grouped(entry.value)),
                entry.color,
            );
            let needed = if current.is_empty() {
                next.width
            } else {
                current_width + self.style.entry_gap_px + next.width
            };
            if !current.is_empty() && needed > max_line_width {
                lines.push(std::mem::take(&mut current));
                current_width = next.width;
            } else {
                current_width = needed;
            }
            current.push(next);
        }
        if !current.is_empty() {
            lines.push(current);
        }

        lines
    }

    fn line_width(&self, line: &[OverlayToken]) -> f64 {
        let text_width: f64 = line.iter().map(|token| token.width).sum();
        let gaps = line.len().saturating_sub(1) as f64 * self.style.entry_gap_px;
        text_width + gaps
    }
}
