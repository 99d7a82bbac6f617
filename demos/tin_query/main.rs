//! Builds a small synthetic terrain and runs a few queries against it.
//!
//! ```text
//! cargo run --example tin_query
//! RUST_LOG=tinindex=debug cargo run --example tin_query
//! ```

use tinindex::math::{Envelope, Point2};
use tinindex::operations::TriangulatePoints;
use tinindex::tin::{TinBreakline, TinPoint};
use tinindex::{IndexParams, Result, TinIndex, TinTopology};

fn terrain() -> Result<Vec<TinPoint>> {
    let mut points = Vec::new();
    for i in 0..20_u32 {
        for j in 0..20_u32 {
            let x = f64::from(i) * 5.0 + f64::from(j % 3) * 0.7;
            let y = f64::from(j) * 5.0;
            let z = 100.0 + (x * 0.05).sin() * 8.0 + (y * 0.08).cos() * 5.0;
            points.push(TinPoint::new(x, y, z)?);
        }
    }
    Ok(points)
}

fn main() -> Result<()> {
    // Default: WARN for everything, INFO for tinindex.
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("tinindex=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let ridge = TinBreakline::new(vec![
        TinPoint::new(10.0, 10.0, 104.0)?,
        TinPoint::new(60.0, 40.0, 109.0)?,
    ])?;
    let index = TriangulatePoints::new(terrain()?)
        .with_breaklines(vec![ridge])
        .with_params(IndexParams {
            elevation_interval: 2.0,
            ..IndexParams::default()
        })
        .execute()?;
    println!("{} faces, {} points", index.face_count(), index.point_count());

    let here = Point2::new(42.0, 17.5);
    let face = index.tin_face_at_location(here, 1.0)?;
    println!(
        "face at ({}, {}): z = {:.3}, {} neighbours",
        here.x,
        here.y,
        index.elevation_at(here)?,
        index.adjacent_faces(face)?.len()
    );

    let window = Envelope::new(Point2::new(20.0, 20.0), Point2::new(40.0, 40.0));
    println!(
        "{} faces overlap the window",
        index.tin_faces_in_envelope(&window).len()
    );
    println!(
        "{} faces cross z = 104",
        index.triangles_at_height(104.0)?.len()
    );
    Ok(())
}
