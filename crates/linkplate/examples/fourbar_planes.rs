//! Four-bar layering walkthrough.
//!
//! Purpose
//! - Build a crank-rocker with the authoring operations, sample one cycle and
//!   print its plates and plane assignment.
//! - Serve as a quick timing probe for the full pipeline.

use std::time::Instant;

use linkplate::api::{layout, GeomCfg, LayerCfg, Linkage};
use nalgebra::Vector2;

fn main() {
    let mut linkage = Linkage::starter();
    linkage
        .add_hinge_to_ground(0.0, "p1", Vector2::new(3.0, 0.0), Vector2::new(1.5625, 1.3905))
        .expect("hinge over the crank tip");

    let mech = linkage.mechanism().expect("authored linkage compiles");
    let start = Instant::now();
    let out = layout(&linkage, &GeomCfg::default(), &LayerCfg::default())
        .expect("four-bar has a layering");
    let elapsed = start.elapsed().as_secs_f64() * 1e3;

    for (i, plate) in out.plates.iter().enumerate() {
        let names: Vec<&str> = plate.points.iter().map(|&p| mech.name(p)).collect();
        println!("plate {i}: {names:?}");
    }
    for (k, plane) in out.planes.planes.iter().enumerate() {
        let ids: Vec<usize> = plane.iter().map(|p| p.0).collect();
        println!("plane {k}: plates {ids:?}");
    }
    println!(
        "score={} optima={} time_ms={elapsed:.3}",
        out.layering.score,
        out.layering.solutions.len()
    );
}
