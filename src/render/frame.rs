use serde::{Deserialize, Serialize};

use crate::core::Viewport;
use crate::error::{ChartError, ChartResult};
use crate::render::{LinePrimitive, RectPrimitive, TextPrimitive};

/// Backend-agnostic scene for one panel.
///
/// Draw order is rects, then lines, then texts. Exports are built by
/// appending primitives to a surface snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub rects: Vec<RectPrimitive>,
    pub lines: Vec<LinePrimitive>,
    pub texts: Vec<TextPrimitive>,
    /// Drawn after `texts`; used for overlays stacked above the chart.
    pub overlay_rects: Vec<RectPrimitive>,
    pub overlay_texts: Vec<TextPrimitive>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            rects: Vec::new(),
            lines: Vec::new(),
            texts: Vec::new(),
            overlay_rects: Vec::new(),
            overlay_texts: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_line(mut self, line: LinePrimitive) -> Self {
        self.lines.push(line);
        self
    }

    #[must_use]
    pub fn with_rect(mut self, rect: RectPrimitive) -> Self {
        self.rects.push(rect);
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }

        for rect in self.rects.iter().chain(&self.overlay_rects) {
            rect.validate()?;
        }
        for line in &self.lines {
            line.validate()?;
        }
        for text in self.texts.iter().chain(&self.overlay_texts) {
            text.validate()?;
        }

        Ok(())
    }

    #[must_use]
    pub fn has_overlay(&self) -> bool {
        !self.overlay_rects.is_empty() || !self.overlay_texts.is_empty()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.rects.is_empty() && self.texts.is_empty() && !self.has_overlay()
    }
}
