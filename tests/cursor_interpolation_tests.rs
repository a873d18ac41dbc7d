use approx::assert_abs_diff_eq;
use bizchart::core::{
    CategoryAxis, MetricGroup, MetricKey, Palette, PanelDataset, PlotArea, SelectionState,
    SeriesBundle, partition,
};
use bizchart::interaction::{CursorInterpolator, CursorPosition, Readout, interpolate_readout};
use indexmap::IndexMap;

fn dates(count: usize) -> Vec<String> {
    (1..=count).map(|day| format!("2024-01-{day:02}")).collect()
}

fn revenue_datasets(values: Vec<Option<f64>>) -> Vec<PanelDataset> {
    let mut series: IndexMap<MetricKey, Vec<Option<f64>>> = IndexMap::new();
    series.insert(MetricKey::new("revenue"), values.clone());
    let bundle = SeriesBundle::new(dates(values.len()), series).expect("valid bundle");
    partition(&bundle, &SelectionState::default(), &Palette::default())
        .group(MetricGroup::Currency)
        .to_vec()
}

fn axis(len: usize) -> CategoryAxis {
    // Plot area spans x = 100..=300, so index 1.5 of 3 samples sits at 250.
    CategoryAxis::new(PlotArea::new(100.0, 10.0, 300.0, 90.0).expect("valid plot area"), len)
        .expect("valid axis")
}

#[test]
fn fractional_index_interpolates_and_rounds() {
    let datasets = revenue_datasets(vec![Some(100.0), Some(200.0), Some(300.0)]);
    let readout = interpolate_readout(1.5, &dates(3), &datasets);

    assert_eq!(readout.value_of("revenue"), Some(250.0));
    assert_eq!(readout.date_label(), Some("2024-01-03"));

    let readout = interpolate_readout(0.26, &dates(3), &datasets);
    assert_eq!(readout.value_of("revenue"), Some(126.0));
    assert_eq!(readout.date_label(), Some("2024-01-01"));
}

#[test]
fn integer_index_returns_sample_exactly() {
    let datasets = revenue_datasets(vec![Some(100.4), Some(200.0), Some(300.0)]);
    let readout = interpolate_readout(1.0, &dates(3), &datasets);
    assert_eq!(readout.value_of("revenue"), Some(200.0));
    assert_eq!(readout.date_label(), Some("2024-01-02"));
}

#[test]
fn update_maps_pixel_through_axis() {
    let datasets = revenue_datasets(vec![Some(100.0), Some(200.0), Some(300.0)]);
    let mut cursor = CursorInterpolator::default();

    let readout = cursor
        .update(250.0, axis(3), &dates(3), &datasets)
        .expect("cursor update");
    assert_eq!(readout.value_of("revenue"), Some(250.0));

    match cursor.position() {
        CursorPosition::Active { pixel_x, index } => {
            assert_abs_diff_eq!(pixel_x, 250.0, epsilon = 1e-9);
            assert_abs_diff_eq!(index, 1.5, epsilon = 1e-9);
        }
        CursorPosition::Inactive => panic!("cursor should be active"),
    }
}

#[test]
fn pixel_beyond_right_edge_clamps_to_last_sample() {
    let datasets = revenue_datasets(vec![Some(100.0), Some(200.0), Some(300.0)]);
    let mut cursor = CursorInterpolator::default();

    let readout = cursor
        .update(10_000.0, axis(3), &dates(3), &datasets)
        .expect("cursor update");
    assert_eq!(readout.value_of("revenue"), Some(300.0));
    assert_eq!(readout.date_label(), Some("2024-01-03"));

    let readout = cursor
        .update(-50.0, axis(3), &dates(3), &datasets)
        .expect("cursor update");
    assert_eq!(readout.value_of("revenue"), Some(100.0));
}

#[test]
fn empty_bundle_gives_explicit_no_data() {
    let mut cursor = CursorInterpolator::default();
    let readout = cursor
        .update(150.0, axis(0), &[], &[])
        .expect("cursor update");
    assert_eq!(*readout, Readout::NoData);
    assert!(!cursor.is_active());
}

#[test]
fn single_sample_reads_that_point_everywhere() {
    let datasets = revenue_datasets(vec![Some(42.0)]);
    let mut cursor = CursorInterpolator::default();

    for pixel in [100.0, 180.0, 300.0] {
        let readout = cursor
            .update(pixel, axis(1), &dates(1), &datasets)
            .expect("cursor update");
        assert_eq!(readout.value_of("revenue"), Some(42.0));
        assert_eq!(readout.date_label(), Some("2024-01-01"));
    }
}

#[test]
fn gaps_fall_back_to_present_neighbour_or_omit_series() {
    let datasets = revenue_datasets(vec![Some(100.0), None, None, Some(400.0)]);

    let readout = interpolate_readout(0.5, &dates(4), &datasets);
    assert_eq!(readout.value_of("revenue"), Some(100.0));

    let readout = interpolate_readout(2.5, &dates(4), &datasets);
    assert_eq!(readout.value_of("revenue"), Some(400.0));

    let readout = interpolate_readout(1.5, &dates(4), &datasets);
    assert_eq!(readout.value_of("revenue"), None);
    assert!(readout.entries().is_empty());
    assert_eq!(readout.date_label(), Some("2024-01-03"));
}

#[test]
fn non_finite_pixel_keeps_previous_readout() {
    let datasets = revenue_datasets(vec![Some(100.0), Some(200.0), Some(300.0)]);
    let mut cursor = CursorInterpolator::default();
    cursor
        .update(200.0, axis(3), &dates(3), &datasets)
        .expect("cursor update");

    assert!(cursor.update(f64::NAN, axis(3), &dates(3), &datasets).is_err());
    assert_eq!(
        cursor.readout().and_then(|readout| readout.value_of("revenue")),
        Some(200.0)
    );
}

#[test]
fn refresh_recomputes_at_stored_pixel_and_invalidate_clears() {
    let mut cursor = CursorInterpolator::default();
    let before = revenue_datasets(vec![Some(100.0), Some(200.0), Some(300.0)]);
    cursor
        .update(300.0, axis(3), &dates(3), &before)
        .expect("cursor update");

    let after = revenue_datasets(vec![Some(1.0), Some(2.0), Some(3.0)]);
    let refreshed = cursor
        .refresh(axis(3), &dates(3), &after)
        .expect("refresh")
        .expect("active cursor keeps a readout");
    assert_eq!(refreshed.value_of("revenue"), Some(3.0));

    cursor.invalidate();
    assert!(cursor.readout().is_none());
    assert!(!cursor.is_active());
}

#[test]
fn readout_entry_carries_panel_color() {
    let datasets = revenue_datasets(vec![Some(1.0), Some(2.0)]);
    let readout = interpolate_readout(0.0, &dates(2), &datasets);
    let entry = &readout.entries()[0];
    assert_eq!(entry.label, "Revenue");
    assert_eq!(entry.color, datasets[0].color);
}

#[test]
fn axis_rejects_inverted_or_nan_plot_area() {
    let inverted = PlotArea {
        left: 300.0,
        top: 10.0,
        right: 100.0,
        bottom: 90.0,
    };
    assert!(CategoryAxis::new(inverted, 3).is_err());

    let nan_edge = PlotArea {
        left: f64::NAN,
        ..PlotArea::new(100.0, 10.0, 300.0, 90.0).expect("valid plot area")
    };
    assert!(CategoryAxis::new(nan_edge, 3).is_err());
}
