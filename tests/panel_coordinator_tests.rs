use bizchart::api::{PanelCoordinator, PanelState};
use bizchart::core::{MetricGroup, Palette, SelectionState, SeriesBundle, Viewport, partition};
use bizchart::render::{HeadlessSurface, LineTraceOptions};

fn bundle() -> SeriesBundle {
    SeriesBundle::from_dense(
        vec!["2024-02-01".to_owned(), "2024-02-02".to_owned()],
        [
            ("revenue", vec![10.0, 20.0]),
            ("clients", vec![1.0, 2.0]),
            ("roi", vec![5.0, 6.0]),
        ],
    )
    .expect("valid bundle")
}

#[test]
fn rebuild_replaces_handles_and_hides_empty_groups() {
    let bundle = bundle();
    let mut surface = HeadlessSurface::new(Viewport::new(320, 160), 8.0).expect("surface");
    let mut coordinator = PanelCoordinator::new(LineTraceOptions::default());

    let selection = SelectionState::from_keys(["revenue", "roi"]);
    let partitioned = partition(&bundle, &selection, &Palette::default());
    coordinator.rebuild(&mut surface, bundle.dates(), &partitioned);

    let first = coordinator.handle(MetricGroup::Currency).expect("currency handle");
    assert!(coordinator.handle(MetricGroup::Percent).is_some());
    assert_eq!(*coordinator.state(MetricGroup::Count), PanelState::Hidden);

    coordinator.rebuild(&mut surface, bundle.dates(), &partitioned);
    let second = coordinator.handle(MetricGroup::Currency).expect("currency handle");
    assert_ne!(first, second);
    assert_eq!(coordinator.rebuild_count(), 2);
    assert_eq!(surface.created_count(), 4);
    assert_eq!(surface.destroyed_count(), 2);
    assert_eq!(surface.live_count(), 2);
}

#[test]
fn teardown_releases_every_handle() {
    let bundle = bundle();
    let mut surface = HeadlessSurface::new(Viewport::new(320, 160), 8.0).expect("surface");
    let mut coordinator = PanelCoordinator::new(LineTraceOptions::default());

    let selection = SelectionState::from_keys(["revenue", "clients", "roi"]);
    let partitioned = partition(&bundle, &selection, &Palette::default());
    coordinator.rebuild(&mut surface, bundle.dates(), &partitioned);
    assert_eq!(surface.live_count(), 3);

    coordinator.teardown(&mut surface);
    assert_eq!(surface.live_count(), 0);
    for group in MetricGroup::ALL {
        assert!(!coordinator.state(group).is_visible());
        assert!(coordinator.datasets(group).is_empty());
    }
}
