//! Read-only linkage introspection and picking.

use nalgebra::Vector2;

use super::types::{Joint, Linkage, Mechanism, PointId, Pose, Step};
use crate::geom2::distance_to_segment;

impl Linkage {
    /// Every point name used by a joint, first appearance first.
    pub fn point_refs(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for link in &self.links {
            for p in link.points() {
                if !out.iter().any(|q| q == p) {
                    out.push(p.to_string());
                }
            }
        }
        out
    }

    /// Point names that are ground parameters, first appearance first.
    pub fn ground_point_refs(&self) -> Vec<String> {
        self.point_refs()
            .into_iter()
            .filter(|p| self.params.contains_key(p))
            .collect()
    }

    /// Drawable bars as point-name pairs: crank, the two hinge arms, slider `p0–p2`.
    pub fn segments(&self) -> Vec<[String; 2]> {
        let mut out = Vec::new();
        for link in &self.links {
            match link {
                Joint::Rotary { p0, p1, .. } => out.push([p0.clone(), p1.clone()]),
                Joint::Hinge { p0, p1, p2, .. } => {
                    out.push([p0.clone(), p2.clone()]);
                    out.push([p1.clone(), p2.clone()]);
                }
                Joint::Slider { p0, p2, .. } => out.push([p0.clone(), p2.clone()]),
            }
        }
        out
    }
}

impl Mechanism {
    /// The point nearest to `at`, if closer than `radius`.
    pub fn nearest_point(&self, pose: &Pose, at: Vector2<f64>, radius: f64) -> Option<PointId> {
        self.ids()
            .map(|id| (id, (pose.get(id) - at).norm()))
            .fold(None, |best: Option<(PointId, f64)>, (id, d)| match best {
                Some((_, bd)) if bd <= d => best,
                _ => Some((id, d)),
            })
            .filter(|&(_, d)| d < radius)
            .map(|(id, _)| id)
    }

    /// The bar nearest to `at` among `segments`, if closer than `radius`.
    pub fn nearest_link(
        &self,
        pose: &Pose,
        segments: &[[PointId; 2]],
        at: Vector2<f64>,
        radius: f64,
    ) -> Option<[PointId; 2]> {
        segments
            .iter()
            .map(|&[a, b]| ([a, b], distance_to_segment(at, pose.get(a), pose.get(b)).0))
            .fold(None, |best: Option<([PointId; 2], f64)>, (seg, d)| match best {
                Some((_, bd)) if bd <= d => best,
                _ => Some((seg, d)),
            })
            .filter(|&(_, d)| d < radius)
            .map(|(seg, _)| seg)
    }

    /// Drawable bars as handle pairs, same order as `Linkage::segments`.
    pub fn segments(&self) -> Vec<[PointId; 2]> {
        let mut out = Vec::new();
        for step in self.steps() {
            match *step {
                Step::Rotary { p0, p1, .. } => out.push([p0, p1]),
                Step::Hinge { p0, p1, p2, .. } => {
                    out.push([p0, p2]);
                    out.push([p1, p2]);
                }
                Step::Slider { p0, p2, .. } => out.push([p0, p2]),
            }
        }
        out
    }
}
