mod support;

use dynavis::{
    CullObject, CullerConfig, OcclusionMode, Real, ValidationError, Visibility, VisibilityCuller,
};
use nalgebra::Point2;
use support::{l_shape, rect, square, triangle};

fn culler(mode: OcclusionMode) -> VisibilityCuller {
    VisibilityCuller::new(CullerConfig::default().with_mode(mode)).unwrap()
}

fn wall() -> Vec<Point2<Real>> {
    rect(0.0, 0.0, 320.0, 480.0)
}

#[test]
fn config_validation() {
    assert!(CullerConfig::default().validate().is_ok());
    assert_eq!(
        CullerConfig::default().with_screen(0, 100).validate(),
        Err(ValidationError::EmptyScreen { width: 0, height: 100 })
    );
    assert!(matches!(
        CullerConfig::default().with_min_occluder_area(-1.0).validate(),
        Err(ValidationError::InvalidOccluderArea(_))
    ));
    assert!(VisibilityCuller::new(CullerConfig::default().with_min_occluder_area(Real::NAN)).is_err());
}

#[test]
fn bsp_mode_verdicts() {
    let mut culler = culler(OcclusionMode::SolidBsp);
    assert!(culler.add_occluder(&wall(), 2.0));

    assert_eq!(culler.test_object(&square(100.0, 100.0, 50.0), 5.0), Visibility::Occluded);
    assert_eq!(
        culler.test_object(&rect(280.0, 100.0, 120.0, 200.0), 5.0),
        Visibility::PartiallyVisible
    );
    assert_eq!(culler.test_object(&square(400.0, 100.0, 50.0), 5.0), Visibility::FullyVisible);
    assert_eq!(culler.test_object(&square(900.0, 100.0, 50.0), 5.0), Visibility::Occluded);

    let stats = culler.stats();
    assert_eq!(stats.tested, 4);
    assert_eq!(stats.occluded, 2);
    assert_eq!(stats.partially_visible, 1);
    assert_eq!(stats.fully_visible, 1);
    assert_eq!(stats.occluders_added, 1);
}

#[test]
fn coverage_mode_writes_queued_occluders_on_demand() {
    let mut culler = culler(OcclusionMode::CoverageBuffer);
    assert!(culler.add_occluder(&wall(), 2.0));
    assert_eq!(culler.pending_occluders(), 1);

    // in front of the wall: nothing gets written
    assert!(culler.test_object(&square(100.0, 100.0, 50.0), 1.0).is_visible());
    assert_eq!(culler.pending_occluders(), 1);
    assert_eq!(culler.stats().queue_writes, 0);

    // behind it
    assert_eq!(culler.test_object(&square(100.0, 100.0, 50.0), 5.0), Visibility::Occluded);
    assert_eq!(culler.pending_occluders(), 0);
    assert_eq!(culler.stats().queue_writes, 1);

    assert!(culler.test_object(&rect(280.0, 100.0, 120.0, 200.0), 5.0).is_visible());
    assert!(culler.test_object(&square(400.0, 100.0, 50.0), 5.0).is_visible());
}

#[test]
fn coverage_mode_reports_full_and_partial_visibility() {
    let mut culler = culler(OcclusionMode::CoverageBuffer);
    culler.begin_frame();
    assert_eq!(culler.test_object(&square(10.0, 10.0, 10.0), 1.0), Visibility::FullyVisible);

    assert!(culler.add_occluder(&wall(), 2.0));
    assert_eq!(
        culler.test_object(&rect(280.0, 100.0, 120.0, 200.0), 5.0),
        Visibility::PartiallyVisible
    );
    assert_eq!(culler.test_object(&square(400.0, 100.0, 50.0), 5.0), Visibility::FullyVisible);

    let stats = culler.stats();
    assert_eq!(stats.fully_visible, 2);
    assert_eq!(stats.partially_visible, 1);
}

#[test]
fn cull_frame_goes_front_to_back() {
    for mode in [OcclusionMode::SolidBsp, OcclusionMode::CoverageBuffer] {
        let mut culler = culler(mode);
        let objects = vec![
            CullObject::new(square(100.0, 100.0, 50.0), 10.0, 11.0),
            CullObject::new(square(400.0, 100.0, 50.0), 10.0, 11.0),
            CullObject::new(wall(), 1.0, 2.0).as_occluder(),
        ];
        let verdicts = culler.cull_frame(&objects);
        assert_eq!(verdicts.len(), 3);
        assert_eq!(verdicts[0], Visibility::Occluded, "{mode:?}");
        assert!(verdicts[1].is_visible(), "{mode:?}");
        assert!(verdicts[2].is_visible(), "{mode:?}");
        assert_eq!(culler.stats().frame, 1);
        assert_eq!(culler.stats().occluders_added, 1);
    }
}

#[test]
fn hidden_occluders_are_not_added() {
    let mut culler = culler(OcclusionMode::SolidBsp);
    let objects = vec![
        CullObject::new(wall(), 1.0, 2.0).as_occluder(),
        CullObject::new(square(10.0, 10.0, 100.0), 3.0, 4.0).as_occluder(),
    ];
    let verdicts = culler.cull_frame(&objects);
    assert_eq!(verdicts[1], Visibility::Occluded);
    assert_eq!(culler.stats().occluders_added, 1);
}

#[test]
fn concave_and_tiny_occluders_are_rejected() {
    let mut culler = VisibilityCuller::new(CullerConfig::default().with_min_occluder_area(10.0)).unwrap();
    assert!(!culler.add_occluder(&l_shape(0.0, 0.0, 200.0, 20.0), 1.0));
    assert!(!culler.add_occluder(&triangle([0.0, 0.0], [2.0, 0.0], [0.0, 2.0]), 1.0));
    assert!(!culler.add_occluder(&[Point2::new(0.0, 0.0), Point2::new(5.0, 5.0)], 1.0));
    assert_eq!(culler.stats().occluders_rejected, 3);
    assert_eq!(culler.stats().occluders_added, 0);

    // nothing was inserted, so everything stays visible
    assert_eq!(culler.test_object(&square(5.0, 5.0, 10.0), 5.0), Visibility::FullyVisible);
}

#[test]
fn concave_objects_are_tested_conservatively() {
    for mode in [OcclusionMode::SolidBsp, OcclusionMode::CoverageBuffer] {
        let mut culler = culler(mode);
        culler.add_occluder(&wall(), 1.0);
        // the corner is hidden but the long arm reaches past the wall
        let object = l_shape(300.0, 100.0, 100.0, 10.0);
        assert!(culler.test_object(&object, 5.0).is_visible(), "{mode:?}");
    }
}

#[test]
fn degenerate_objects_are_occluded() {
    let mut culler = culler(OcclusionMode::SolidBsp);
    let segment = [Point2::new(400.0, 100.0), Point2::new(450.0, 150.0)];
    assert_eq!(culler.test_object(&segment, 1.0), Visibility::Occluded);
}

#[test]
fn begin_frame_forgets_occluders() {
    for mode in [OcclusionMode::SolidBsp, OcclusionMode::CoverageBuffer] {
        let mut culler = culler(mode);
        culler.add_occluder(&wall(), 1.0);
        assert_eq!(culler.test_object(&square(100.0, 100.0, 50.0), 5.0), Visibility::Occluded);

        culler.begin_frame();
        assert!(culler.test_object(&square(100.0, 100.0, 50.0), 5.0).is_visible());
        assert_eq!(culler.pending_occluders(), 0);
        assert_eq!(culler.stats().tested, 1);
        assert_eq!(culler.stats().frame, 1);
    }
}

#[test]
fn test_batch_leaves_the_tree_alone() {
    let mut culler = culler(OcclusionMode::SolidBsp);
    culler.add_occluder(&wall(), 1.0);
    let nodes = culler.bsp().node_count(culler.pool());

    let outlines = vec![
        square(100.0, 100.0, 50.0),
        square(400.0, 100.0, 50.0),
        rect(300.0, 10.0, 40.0, 40.0),
    ];
    assert_eq!(culler.test_batch(&outlines), vec![false, true, true]);
    assert_eq!(culler.bsp().node_count(culler.pool()), nodes);
    assert_eq!(culler.stats().tested, 0);
}

#[test]
fn pool_is_reused_across_frames() {
    let mut culler = culler(OcclusionMode::SolidBsp);
    let objects = vec![
        CullObject::new(wall(), 1.0, 2.0).as_occluder(),
        CullObject::new(triangle([350.0, 50.0], [600.0, 80.0], [400.0, 400.0]), 3.0, 4.0).as_occluder(),
        CullObject::new(square(500.0, 300.0, 60.0), 5.0, 6.0),
    ];
    culler.cull_frame(&objects);
    let nodes = culler.stats().pool.nodes;
    for _ in 0..5 {
        culler.cull_frame(&objects);
    }
    assert_eq!(culler.stats().pool.nodes, nodes);
    assert_eq!(culler.stats().frame, 6);
}

#[test]
fn dump_describes_state() {
    let mut culler = culler(OcclusionMode::CoverageBuffer);
    culler.add_occluder(&wall(), 1.0);
    let dump = culler.dump();
    assert!(dump.contains("frame 0"));
    assert!(dump.contains("write queue: 1 pending"));
    assert!(dump.contains("coverage buffer"));
}
