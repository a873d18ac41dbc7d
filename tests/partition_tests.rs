use bizchart::core::{
    MetricGroup, MetricKey, Palette, PanelPartition, SelectionState, SeriesBundle, partition,
};
use bizchart::render::Color;
use indexmap::IndexMap;

fn dates(count: usize) -> Vec<String> {
    (1..=count).map(|day| format!("2024-01-{day:02}")).collect()
}

fn mixed_bundle() -> SeriesBundle {
    SeriesBundle::from_dense(
        dates(2),
        [
            ("churn", vec![5.0, 6.0]),
            ("roi", vec![12.0, 14.0]),
            ("profit", vec![30.0, 40.0]),
            ("clients", vec![10.0, 11.0]),
            ("revenue", vec![100.0, 120.0]),
            ("expenses", vec![70.0, 80.0]),
        ],
    )
    .expect("valid bundle")
}

fn keys(partitioned: &PanelPartition, group: MetricGroup) -> Vec<String> {
    partitioned
        .group(group)
        .iter()
        .map(|dataset| dataset.key.to_string())
        .collect()
}

#[test]
fn groups_follow_catalog_order_with_unknown_keys_last_in_counts() {
    let selection = SelectionState::from_keys(["churn", "roi", "profit", "clients", "revenue"]);
    let partitioned = partition(&mixed_bundle(), &selection, &Palette::default());

    assert_eq!(keys(&partitioned, MetricGroup::Currency), ["revenue", "profit"]);
    assert_eq!(keys(&partitioned, MetricGroup::Count), ["clients", "churn"]);
    assert_eq!(keys(&partitioned, MetricGroup::Percent), ["roi"]);

    let groups: Vec<_> = partitioned.iter().map(|entry| entry.group).collect();
    assert_eq!(groups, MetricGroup::ALL);
}

#[test]
fn color_counter_runs_across_groups() {
    let selection = SelectionState::from_keys(["churn", "roi", "profit", "clients", "revenue"]);
    let palette = Palette::default();
    let partitioned = partition(&mixed_bundle(), &selection, &palette);

    let indices: Vec<_> = partitioned
        .iter()
        .flat_map(|entry| entry.datasets.iter().map(|dataset| dataset.color_index))
        .collect();
    assert_eq!(indices, [0, 1, 2, 3, 4]);

    let clients = &partitioned.group(MetricGroup::Count)[0];
    assert_eq!(clients.color, palette.color_at(2));
    assert_eq!(clients.fill_color, palette.color_at(2).with_alpha(0.1));
    assert_eq!(clients.label, "Clients");
}

#[test]
fn palette_wraps_and_bad_hex_is_black() {
    let palette = Palette::from_hex(["#ff0000", "nonsense"], 0.25);
    assert_eq!(palette.color_at(0), Color::rgb(1.0, 0.0, 0.0));
    assert_eq!(palette.color_at(1), Color::BLACK);
    assert_eq!(palette.color_at(2), Color::rgb(1.0, 0.0, 0.0));
    assert_eq!(Palette::from_hex(Vec::<String>::new(), 0.1).color_at(7), Color::BLACK);
}

#[test]
fn empty_selection_yields_no_datasets() {
    let partitioned = partition(&mixed_bundle(), &SelectionState::empty(), &Palette::default());
    assert!(partitioned.is_empty());
    for group in MetricGroup::ALL {
        assert!(partitioned.group(group).is_empty());
    }
}

#[test]
fn selected_keys_missing_from_bundle_are_skipped() {
    let selection = SelectionState::from_keys(["ltv", "revenue"]);
    let partitioned = partition(&mixed_bundle(), &selection, &Palette::default());
    assert_eq!(keys(&partitioned, MetricGroup::Currency), ["revenue"]);
    assert_eq!(partitioned.group(MetricGroup::Currency)[0].color_index, 0);
}

#[test]
fn toggling_revenue_drops_it_from_currency_panel() {
    let bundle = mixed_bundle();
    let mut selection = SelectionState::default();
    let before = partition(&bundle, &selection, &Palette::default());
    assert_eq!(keys(&before, MetricGroup::Currency), ["revenue", "expenses", "profit"]);

    selection.toggle("revenue");
    let after = partition(&bundle, &selection, &Palette::default());
    assert_eq!(keys(&after, MetricGroup::Currency), ["expenses", "profit"]);
    assert_eq!(after.group(MetricGroup::Currency)[0].color_index, 0);
}

#[test]
fn gaps_are_carried_into_datasets() {
    let mut series: IndexMap<MetricKey, Vec<Option<f64>>> = IndexMap::new();
    series.insert(MetricKey::new("revenue"), vec![Some(1.0), None, Some(3.0)]);
    let bundle = SeriesBundle::new(dates(3), series).expect("valid bundle");

    let partitioned = partition(&bundle, &SelectionState::default(), &Palette::default());
    assert_eq!(
        partitioned.group(MetricGroup::Currency)[0].values,
        [Some(1.0), None, Some(3.0)]
    );
}

#[test]
fn bundle_rejects_mismatched_series_length() {
    let result = SeriesBundle::from_dense(dates(3), [("revenue", vec![1.0, 2.0])]);
    assert!(result.is_err());

    let result = SeriesBundle::from_dense(dates(1), [("revenue", vec![f64::NAN])]);
    assert!(result.is_err());
}
