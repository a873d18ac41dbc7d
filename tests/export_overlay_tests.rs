use bizchart::core::{MetricKey, Viewport};
use bizchart::interaction::{Readout, ReadoutEntry};
use bizchart::render::{
    Color, DirectoryExportTarget, ExportOverlay, ExportTarget, ImageEncoder, InMemoryExportTarget,
    LinePrimitive, NO_DATA_TEXT, OverlayCorner, OverlayStyle, RenderFrame, SvgEncoder,
};
use smallvec::smallvec;

fn snapshot() -> RenderFrame {
    RenderFrame::new(Viewport::new(400, 200)).with_line(LinePrimitive::new(
        10.0,
        150.0,
        390.0,
        40.0,
        2.0,
        Color::rgb(0.23, 0.51, 0.96),
    ))
}

fn entry(key: &str, label: &str, value: f64) -> ReadoutEntry {
    ReadoutEntry {
        key: MetricKey::new(key),
        label: label.to_owned(),
        value,
        color: Color::rgb(0.94, 0.27, 0.27),
    }
}

fn point_readout() -> Readout {
    Readout::Point {
        date_label: "2024-01-02".to_owned(),
        index: 1.0,
        entries: smallvec![
            entry("revenue", "Revenue", 1_250_000.0),
            entry("profit", "Profit", -300.0)
        ],
    }
}

#[test]
fn no_readout_exports_snapshot_unchanged() {
    let overlay = ExportOverlay::default();
    let composed = overlay.compose(snapshot(), None);
    assert_eq!(composed, snapshot());
    assert!(!composed.has_overlay());
}

#[test]
fn readout_adds_rounded_box_with_date_then_entries() {
    let overlay = ExportOverlay::default();
    let composed = overlay.compose(snapshot(), Some(&point_readout()));

    assert_eq!(composed.lines, snapshot().lines);
    assert_eq!(composed.overlay_rects.len(), 1);
    let legend = composed.overlay_rects[0];
    assert!(legend.corner_radius > 0.0);
    assert!(legend.fill_color.alpha < 1.0);
    assert_eq!((legend.x, legend.y), (8.0, 8.0));

    let texts: Vec<_> = composed.overlay_texts.iter().map(|text| text.text.as_str()).collect();
    assert_eq!(
        texts,
        ["2024-01-02", "Revenue 1\u{a0}250\u{a0}000", "Profit -300"]
    );
    assert_eq!(composed.overlay_texts[1].color, Color::rgb(0.94, 0.27, 0.27));
    assert!(composed.overlay_texts[1].y > composed.overlay_texts[0].y);
    composed.validate().expect("composed frame is valid");
}

#[test]
fn entries_wrap_to_new_lines_on_narrow_panels() {
    let overlay = ExportOverlay::default();
    let narrow = RenderFrame::new(Viewport::new(120, 200));
    let composed = overlay.compose(narrow, Some(&point_readout()));

    let revenue = &composed.overlay_texts[1];
    let profit = &composed.overlay_texts[2];
    assert!(profit.y > revenue.y);
    assert_eq!(profit.x, revenue.x);
}

#[test]
fn entries_share_a_line_when_width_allows() {
    let overlay = ExportOverlay::default();
    let wide = RenderFrame::new(Viewport::new(1200, 200));
    let composed = overlay.compose(wide, Some(&point_readout()));

    let revenue = &composed.overlay_texts[1];
    let profit = &composed.overlay_texts[2];
    assert_eq!(profit.y, revenue.y);
    assert!(profit.x > revenue.x);
}

#[test]
fn no_data_readout_burns_single_line() {
    let overlay = ExportOverlay::default();
    let composed = overlay.compose(snapshot(), Some(&Readout::NoData));
    assert_eq!(composed.overlay_texts.len(), 1);
    assert_eq!(composed.overlay_texts[0].text, NO_DATA_TEXT);
}

#[test]
fn bottom_right_corner_anchors_box_to_viewport_edges() {
    let style = OverlayStyle {
        corner: OverlayCorner::BottomRight,
        ..OverlayStyle::default()
    };
    let overlay = ExportOverlay::new(style).expect("valid style");
    let composed = overlay.compose(snapshot(), Some(&point_readout()));

    let legend = composed.overlay_rects[0];
    assert!((legend.x + legend.width - (400.0 - style.margin_px)).abs() <= 1e-9);
    assert!((legend.y + legend.height - (200.0 - style.margin_px)).abs() <= 1e-9);
}

#[test]
fn invalid_overlay_style_is_rejected() {
    let style = OverlayStyle {
        font_size_px: 0.0,
        ..OverlayStyle::default()
    };
    assert!(ExportOverlay::new(style).is_err());
}

#[test]
fn svg_encoder_escapes_text_and_draws_overlay_last() {
    let overlay = ExportOverlay::default();
    let readout = Readout::Point {
        date_label: "Q1 <draft>".to_owned(),
        index: 0.0,
        entries: smallvec![entry("ltv_cac_ratio", "LTV/CAC", 3.0)],
    };
    let composed = overlay.compose(snapshot(), Some(&readout));

    let image = SvgEncoder::default().encode(&composed).expect("encode svg");
    assert_eq!(image.mime_type, "image/svg+xml");
    assert_eq!(image.extension, "svg");

    let markup = String::from_utf8(image.bytes).expect("utf-8 svg");
    assert!(markup.starts_with("<svg"));
    assert!(markup.contains("Q1 &lt;draft&gt;"));
    assert!(markup.contains("LTV/CAC 3"));
    let line_at = markup.find("<line").expect("series line");
    let overlay_at = markup.find("class='overlay'").expect("overlay group");
    assert!(line_at < overlay_at);
}

#[test]
fn in_memory_target_keeps_deliveries() {
    let image = SvgEncoder::default().encode(&snapshot()).expect("encode svg");
    let mut target = InMemoryExportTarget::default();
    target.deliver("currency-1.svg", image.clone()).expect("deliver");

    assert_eq!(target.files().len(), 1);
    assert_eq!(target.last().expect("last export").image, image);
    assert_eq!(target.take().len(), 1);
    assert!(target.files().is_empty());
}

#[test]
fn directory_target_writes_file_and_rejects_paths() {
    let dir = std::env::temp_dir().join(format!("bizchart-export-{}", std::process::id()));
    let mut target = DirectoryExportTarget::new(&dir);
    let image = SvgEncoder::default().encode(&snapshot()).expect("encode svg");

    target.deliver("counts-1.svg", image.clone()).expect("deliver");
    let written = std::fs::read(dir.join("counts-1.svg")).expect("read export");
    assert_eq!(written, image.bytes);

    assert!(target.deliver("../escape.svg", image).is_err());
    let _ = std::fs::remove_dir_all(&dir);
}
