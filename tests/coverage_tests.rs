mod support;

use dynavis::covbuf::TiledCoverageBuffer;
use dynavis::errors::ValidationError;
use dynavis::tile::{NUM_TILECOL, NUM_TILEROW};
use nalgebra::Point2;
use support::{bounds, rect, square, triangle};

fn screen() -> TiledCoverageBuffer {
    TiledCoverageBuffer::new(640, 480).unwrap()
}

#[test]
fn rejects_empty_screen() {
    assert_eq!(
        TiledCoverageBuffer::new(0, 10).unwrap_err(),
        ValidationError::EmptyScreen { width: 0, height: 10 }
    );
    assert!(TiledCoverageBuffer::new(10, 0).is_err());
}

#[test]
fn tile_grid_rounds_up() {
    let buffer = screen();
    assert_eq!(
        buffer.tile_grid(),
        (640usize.div_ceil(NUM_TILECOL), 480usize.div_ceil(NUM_TILEROW))
    );
    assert_eq!((buffer.width(), buffer.height()), (640, 480));
}

#[test]
fn empty_buffer_sees_everything_on_screen() {
    let buffer = screen();
    assert!(buffer.test_rectangle(&bounds(10.0, 10.0), 1.0));
    assert!(buffer.test_polygon(&square(100.0, 100.0, 50.0), 1.0));
    assert!(buffer.test_point(&Point2::new(5.5, 5.5), 1.0));
    assert_eq!(buffer.covered_count(), 0);
}

#[test]
fn off_screen_is_not_visible() {
    let buffer = screen();
    assert!(!buffer.test_polygon(&square(1000.0, 1000.0, 10.0), 1.0));
    assert!(!buffer.test_polygon(&square(-50.0, -50.0, 10.0), 1.0));
    assert!(!buffer.test_point(&Point2::new(-1.0, 5.0), 1.0));
    assert!(!buffer.test_point(&Point2::new(700.0, 5.0), 1.0));
}

#[test]
fn occluder_hides_farther_objects_only() {
    let mut buffer = screen();
    assert!(buffer.insert_polygon(&square(0.0, 0.0, 100.0), 10.0));
    assert_eq!(buffer.covered_count(), 100 * 100);

    let inside = rect(10.0, 10.0, 40.0, 40.0);
    assert!(!buffer.test_polygon(&inside, 20.0));
    assert!(buffer.test_polygon(&inside, 5.0));
    // equal depth is not hidden
    assert!(buffer.test_polygon(&inside, 10.0));

    assert!(!buffer.test_rectangle(&dynavis::Box2::from_coords(10.0, 10.0, 50.0, 50.0), 20.0));
    assert!(!buffer.test_point(&Point2::new(50.5, 50.5), 20.0));
}

#[test]
fn object_sticking_out_is_visible() {
    let mut buffer = screen();
    buffer.insert_polygon(&square(0.0, 0.0, 100.0), 10.0);
    assert!(buffer.test_polygon(&square(50.0, 50.0, 100.0), 20.0));
    assert!(buffer.test_polygon(&rect(10.0, 10.0, 90.5, 10.0), 20.0));
}

#[test]
fn classify_tells_partial_from_full() {
    let mut buffer = screen();
    assert!(buffer.classify_polygon(&square(100.0, 100.0, 50.0), 1.0).is_fully_visible());

    buffer.insert_polygon(&square(0.0, 0.0, 100.0), 10.0);
    let hidden = buffer.classify_polygon(&rect(10.0, 10.0, 40.0, 40.0), 20.0);
    assert!(hidden.is_occluded());
    assert!(hidden.solid);

    let partial = buffer.classify_polygon(&square(50.0, 50.0, 100.0), 20.0);
    assert!(partial.visible && partial.solid);

    // in front of the occluder
    assert!(buffer.classify_polygon(&square(50.0, 50.0, 100.0), 5.0).is_fully_visible());
    assert!(buffer.classify_polygon(&square(300.0, 300.0, 20.0), 20.0).is_fully_visible());
    assert!(buffer.classify_polygon(&square(1000.0, 1000.0, 10.0), 1.0).is_occluded());
}

#[test]
fn only_fully_covered_pixels_are_written() {
    let mut buffer = screen();
    buffer.insert_polygon(&square(0.5, 0.5, 10.0), 1.0);
    // pixels 1..10 in both directions
    assert_eq!(buffer.covered_count(), 9 * 9);
    assert!(buffer.test_point(&Point2::new(0.7, 0.7), 100.0));
    assert!(!buffer.test_point(&Point2::new(5.0, 5.0), 100.0));
}

#[test]
fn writing_twice_changes_nothing() {
    let mut buffer = screen();
    let occluder = triangle([20.0, 20.0], [200.0, 40.0], [60.0, 300.0]);
    assert!(buffer.insert_polygon(&occluder, 4.0));
    let covered = buffer.covered_count();
    assert!(!buffer.insert_polygon(&occluder, 4.0));
    assert_eq!(buffer.covered_count(), covered);
}

#[test]
fn triangle_occluder() {
    let mut buffer = screen();
    buffer.insert_polygon(&triangle([0.0, 0.0], [200.0, 0.0], [0.0, 200.0]), 2.0);
    assert!(!buffer.test_polygon(&triangle([10.0, 10.0], [50.0, 10.0], [10.0, 50.0]), 3.0));
    assert!(buffer.test_polygon(&square(120.0, 120.0, 10.0), 3.0));
}

#[test]
fn occluder_spanning_tiles() {
    let mut buffer = screen();
    // crosses tile borders in both directions
    buffer.insert_polygon(&rect(20.0, 50.0, 100.0, 100.0), 1.0);
    assert_eq!(buffer.covered_count(), 100 * 100);
    assert!(!buffer.test_polygon(&rect(25.0, 55.0, 90.0, 90.0), 2.0));
    assert!(buffer.test_polygon(&rect(25.0, 55.0, 96.0, 90.0), 2.0));
}

#[test]
fn initialize_uncovers_everything() {
    let mut buffer = screen();
    buffer.insert_polygon(&square(0.0, 0.0, 100.0), 1.0);
    buffer.initialize();
    assert_eq!(buffer.covered_count(), 0);
    assert!(buffer.test_polygon(&square(10.0, 10.0, 10.0), 50.0));
}

#[test]
fn dump_reports_covered_tiles() {
    let mut buffer = screen();
    assert!(buffer.dump().contains("0 pixels covered"));
    buffer.insert_polygon(&square(0.0, 0.0, 100.0), 1.0);
    let dump = buffer.dump();
    assert!(dump.contains("10000 pixels covered"));
    assert!(dump.contains("tile (0,0)"));
}
