//! Curated entry points for callers that work with whole linkages.
//!
//! Everything here compiles the linkage first, so name lookups happen once and
//! results come back keyed by point name where that is the natural handle.
//! Re-exports below cover the rest of the surface.

use std::collections::BTreeMap;

use nalgebra::Vector2;
use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::plates;

pub use crate::error::Error;
pub use crate::geom2::{Affine2, GeomCfg};
pub use crate::layering::{
    is_shift_or_mirror, layer_plates, Assignment, LayerCfg, Layering, Planes,
};
pub use crate::linkage::{
    Anchor, Axis, Driver, Edit, Joint, Linkage, Mechanism, Param, PointId, Pose, Sampling, Trace,
};
pub use crate::plates::{Plate, PlateGraph, PlateId};

/// Every point of `linkage` at drive angle `theta`, keyed by name.
pub fn evaluate(linkage: &Linkage, theta: f64) -> Result<BTreeMap<String, Vector2<f64>>> {
    let mech = linkage.mechanism()?;
    Ok(mech.evaluate(theta)?.named(&mech))
}

/// Motion traces of every moving point over `n` samples, keyed by name.
pub fn compute_traces(linkage: &Linkage, n: usize) -> Result<BTreeMap<String, Trace>> {
    let mech = linkage.mechanism()?;
    Ok(mech
        .traces(n)
        .into_iter()
        .map(|(id, trace)| (mech.name(id).to_string(), trace))
        .collect())
}

/// Rigid plates of `linkage`; plate 0 is the ground frame.
pub fn build_plates(linkage: &Linkage) -> Result<Vec<Plate>> {
    Ok(plates::build_plates(&linkage.mechanism()?))
}

/// Plates grouped into the fewest planes, given the poses of one cycle.
pub fn compute_planes(linkage: &Linkage, poses: &[Pose]) -> Result<Planes> {
    let plates = build_plates(linkage)?;
    let graph = PlateGraph::analyze(&plates, poses, &GeomCfg::default());
    Ok(layer_plates(&graph, &LayerCfg::default())?.planes())
}

/// Full layering pipeline output.
#[derive(Clone, Debug, Serialize)]
pub struct Layout {
    pub plates: Vec<Plate>,
    #[serde(skip)]
    pub graph: PlateGraph,
    pub layering: Layering,
    pub planes: Planes,
}

/// Sample `linkage` over `geom.samples` angles and layer its plates.
pub fn layout(linkage: &Linkage, geom: &GeomCfg, layer: &LayerCfg) -> Result<Layout> {
    let mech = linkage.mechanism()?;
    let sampling = mech.sample_with(geom.samples, geom);
    let plates = plates::build_plates(&mech);
    let graph = PlateGraph::analyze(&plates, &sampling.poses, geom);
    let layering = layer_plates(&graph, layer)?;
    let planes = layering.planes();
    debug!(
        plates = plates.len(),
        runs = sampling.run_count(),
        score = layering.score,
        optima = layering.solutions.len(),
        "layout complete"
    );
    Ok(Layout {
        plates,
        graph,
        layering,
        planes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn four_bar() -> Linkage {
        let y = (2.25f64 - 0.5625 * 0.5625).sqrt();
        let mut l = Linkage::default();
        l.params.insert("a".into(), Param::Point(vector![0.0, 0.0]));
        l.params.insert("d".into(), Param::Point(vector![3.0, 0.0]));
        l.params.insert("len".into(), Param::Scalar(1.0));
        l.params.insert("off".into(), Param::Scalar(0.0));
        l.params.insert("pt".into(), Param::Point(vector![0.5625, y]));
        l.params.insert("l2t".into(), Param::Scalar(2.0));
        l.links.push(Joint::Rotary {
            p0: "a".into(),
            p1: "b".into(),
            len: "len".into(),
            theta: "off".into(),
        });
        l.links.push(Joint::Hinge {
            p0: "b".into(),
            p1: "d".into(),
            pt: "pt".into(),
            l2t: "l2t".into(),
            p2: "c".into(),
        });
        l
    }

    #[test]
    fn evaluate_is_keyed_by_name() {
        let pts = evaluate(&four_bar(), 0.0).unwrap();
        assert_eq!(pts.len(), 4);
        assert!((pts["b"] - vector![1.0, 0.0]).norm() < 1e-12);
        assert!(evaluate(&four_bar(), std::f64::consts::PI)
            .unwrap_err()
            .is_infeasible());
    }

    #[test]
    fn traces_cover_moving_points_only() {
        let traces = compute_traces(&four_bar(), 100).unwrap();
        assert_eq!(traces.keys().collect::<Vec<_>>(), ["b", "c"]);
        assert_eq!(traces["c"].len(), 2);
    }

    #[test]
    fn evaluation_is_deterministic_for_random_angles() {
        let l = four_bar();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let theta = rng.gen_range(0.0..std::f64::consts::TAU);
            assert_eq!(evaluate(&l, theta), evaluate(&l, theta));
        }
    }

    #[test]
    fn four_bar_without_relations_fits_one_plane() {
        let plates = build_plates(&four_bar()).unwrap();
        assert_eq!(plates.len(), 4);
        let l = layer_plates(&PlateGraph::empty(plates.len()), &LayerCfg::default()).unwrap();
        assert_eq!(l.score, 1);
    }

    #[test]
    fn four_bar_pipeline_respects_every_constraint() {
        let out = layout(&four_bar(), &GeomCfg::default(), &LayerCfg::default()).unwrap();
        let g = &out.graph;
        let a = out.layering.best();
        // ring of four bars, and the coupler crosses the ground bar
        assert_eq!(out.layering.score, 3);
        assert_eq!(a, &vec![0, 1, 2, 1]);
        assert_eq!(
            out.planes.planes,
            vec![vec![PlateId(0)], vec![PlateId(1), PlateId(3)], vec![PlateId(2)]]
        );
        for i in 0..g.len() {
            for j in g.connections[i].iter().chain(&g.intersections[i]) {
                assert_ne!(a[i], a[j.0]);
            }
            for group in &g.pass_thrus[i] {
                let lo = group.iter().map(|p| a[p.0]).min().unwrap();
                let hi = group.iter().map(|p| a[p.0]).max().unwrap();
                assert!(!(lo < a[i] && a[i] < hi));
            }
        }

        // same result through the pose-driven entry point
        let mech = four_bar().mechanism().unwrap();
        let poses = mech.sample_poses(GeomCfg::default().samples);
        assert_eq!(compute_planes(&four_bar(), &poses).unwrap(), out.planes);
    }

    #[test]
    fn layout_samples_with_the_given_tolerances() {
        // no pose assembles, so only the connection ring constrains the planes
        let geom = GeomCfg {
            eps_det: 10.0,
            ..GeomCfg::default()
        };
        let out = layout(&four_bar(), &geom, &LayerCfg::default()).unwrap();
        assert!(out.graph.intersections.iter().all(|s| s.is_empty()));
        assert!(out.graph.pass_thrus.iter().all(|g| g.is_empty()));
        assert_eq!(out.layering.score, 2);
    }

    #[test]
    fn malformed_linkage_surfaces_from_every_entry_point() {
        let mut l = four_bar();
        l.links.reverse();
        assert!(matches!(evaluate(&l, 0.0), Err(Error::MalformedLinkage { .. })));
        assert!(matches!(build_plates(&l), Err(Error::MalformedLinkage { .. })));
        assert!(matches!(compute_traces(&l, 10), Err(Error::MalformedLinkage { .. })));
    }
}
