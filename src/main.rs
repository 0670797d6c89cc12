// main.rs
//
// Culls one synthetic frame with both occlusion modes and logs the verdicts.
// Run with `RUST_LOG=debug` (or `trace`) to see what the culler does.

use dynavis::{CullObject, CullerConfig, OcclusionMode, Real, VisibilityCuller};
use log::info;
use nalgebra::Point2;

fn rect(x: Real, y: Real, w: Real, h: Real) -> Vec<Point2<Real>> {
    vec![
        Point2::new(x, y),
        Point2::new(x + w, y),
        Point2::new(x + w, y + h),
        Point2::new(x, y + h),
    ]
}

fn scene() -> Vec<CullObject> {
    vec![
        // a wall close to the camera covering the left half
        CullObject::new(rect(0.0, 0.0, 320.0, 480.0), 1.0, 2.0).as_occluder(),
        // a crate right behind the wall
        CullObject::new(rect(100.0, 200.0, 80.0, 80.0), 5.0, 6.0),
        // a building straddling the wall edge
        CullObject::new(rect(280.0, 100.0, 120.0, 200.0), 8.0, 12.0).as_occluder(),
        // something behind the building
        CullObject::new(rect(300.0, 150.0, 60.0, 60.0), 20.0, 21.0),
        // a tree in the open
        CullObject::new(
            vec![
                Point2::new(500.0, 300.0),
                Point2::new(560.0, 300.0),
                Point2::new(530.0, 200.0),
            ],
            15.0,
            16.0,
        ),
        // entirely off screen
        CullObject::new(rect(700.0, 10.0, 20.0, 20.0), 3.0, 4.0),
    ]
}

fn main() -> Result<(), dynavis::ValidationError> {
    env_logger::init();

    let objects = scene();
    for mode in [OcclusionMode::SolidBsp, OcclusionMode::CoverageBuffer] {
        let mut culler = VisibilityCuller::new(CullerConfig::default().with_mode(mode))?;
        let verdicts = culler.cull_frame(&objects);
        for (object, verdict) in objects.iter().zip(&verdicts) {
            info!(
                "{mode:?}: object at depth {:.1} -> {verdict:?}",
                object.min_depth
            );
        }
        let stats = culler.stats();
        println!(
            "{:?}: {} of {} objects visible, {} occluders, {} nodes in pool",
            mode,
            stats.tested - stats.occluded,
            stats.tested,
            stats.occluders_added,
            stats.pool.nodes
        );
        log::debug!("{}", culler.dump());
    }
    Ok(())
}
