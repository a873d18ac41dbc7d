use std::fmt::Write as _;

use crate::error::ChartResult;
use crate::render::{Color, RectPrimitive, RenderFrame, TextHAlign, TextPrimitive};

/// Serialized image ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub mime_type: &'static str,
    pub extension: &'static str,
    pub bytes: Vec<u8>,
}

/// Turns a frame into image bytes.
pub trait ImageEncoder {
    fn encode(&mut self, frame: &RenderFrame) -> ChartResult<EncodedImage>;
}

/// Always-available SVG encoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgEncoder {
    font_family: Option<&'static str>,
}

impl SvgEncoder {
    #[must_use]
    pub fn with_font_family(mut self, font_family: &'static str) -> Self {
        self.font_family = Some(font_family);
        self
    }

    #[must_use]
    pub fn render_markup(&self, frame: &RenderFrame) -> String {
        let width = frame.viewport.width;
        let height = frame.viewport.height;
        let font_family = self.font_family.unwrap_or("sans-serif");

        let mut svg = String::new();
        let _ = writeln!(
            svg,
            "<svg xmlns='http://www.w3.org/2000/svg' width='{width}' height='{height}' viewBox='0 0 {width} {height}'>"
        );

        for rect in &frame.rects {
            write_rect(&mut svg, rect);
        }
        for line in &frame.lines {
            let _ = writeln!(
                svg,
                "  <line x1='{:.2}' y1='{:.2}' x2='{:.2}' y2='{:.2}' stroke='{}' stroke-opacity='{:.3}' stroke-width='{:.2}' stroke-linecap='round'/>",
                line.x1,
                line.y1,
                line.x2,
                line.y2,
                line.color.css_rgb(),
                line.color.alpha,
                line.stroke_width
            );
        }
        for text in &frame.texts {
            write_text(&mut svg, text, font_family);
        }
        if frame.has_overlay() {
            let _ = writeln!(svg, "  <g class='overlay'>");
            for rect in &frame.overlay_rects {
                write_rect(&mut svg, rect);
            }
            for text in &frame.overlay_texts {
                write_text(&mut svg, text, font_family);
            }
            let _ = writeln!(svg, "  </g>");
        }

        let _ = writeln!(svg, "</svg>");
        svg
    }
}

impl ImageEncoder for SvgEncoder {
    fn encode(&mut self, frame: &RenderFrame) -> ChartResult<EncodedImage> {
        frame.validate()?;
        Ok(EncodedImage {
            mime_type: "image/svg+xml",
            extension: "svg",
            bytes: self.render_markup(frame).into_bytes(),
        })
    }
}

fn write_rect(svg: &mut String, rect: &RectPrimitive) {
    let _ = write!(
        svg,
        "  <rect x='{:.2}' y='{:.2}' width='{:.2}' height='{:.2}' rx='{:.2}' {}",
        rect.x,
        rect.y,
        rect.width,
        rect.height,
        rect.corner_radius,
        paint_attrs("fill", rect.fill_color)
    );
    if rect.border_width > 0.0 {
        let _ = write!(
            svg,
            " {} stroke-width='{:.2}'",
            paint_attrs("stroke", rect.border_color),
            rect.border_width
        );
    }
    let _ = writeln!(svg, "/>");
}

fn write_text(svg: &mut String, text: &TextPrimitive, font_family: &str) {
    let anchor = match text.h_align {
        TextHAlign::Left => "start",
        TextHAlign::Center => "middle",
        TextHAlign::Right => "end",
    };
    let _ = writeln!(
        svg,
        "  <text x='{:.2}' y='{:.2}' font-family='{}' font-size='{:.1}' text-anchor='{anchor}' dominant-baseline='hanging' {}>{}</text>",
        text.x,
        text.y,
        escape_text(font_family),
        text.font_size_px,
        paint_attrs("fill", text.color),
        escape_text(&text.text)
    );
}

fn paint_attrs(attr: &str, color: Color) -> String {
    format!("{attr}='{}' {attr}-opacity='{:.3}'", color.css_rgb(), color.alpha)
}

fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}
