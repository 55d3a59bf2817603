//! Pairwise plate relations over a motion cycle: shared joints, collisions and
//! plates sweeping past joints they do not belong to.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use super::types::{Plate, PlateId};
use crate::geom2::{distance_to_segment, segments_intersect, GeomCfg};
use crate::linkage::{PointId, Pose};

/// Relations between plates, indexed by `PlateId`.
///
/// `connections` and `intersections` are symmetric and never relate a plate
/// to itself. A connected pair is never also recorded as intersecting.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlateGraph {
    pub connections: Vec<BTreeSet<PlateId>>,
    /// Plates incident to each connection point.
    pub joints: BTreeMap<PointId, BTreeSet<PlateId>>,
    pub intersections: Vec<BTreeSet<PlateId>>,
    /// Per plate: incident sets of the connection points it sweeps past,
    /// in the order they were first detected.
    pub pass_thrus: Vec<Vec<BTreeSet<PlateId>>>,
}

impl PlateGraph {
    /// `n` plates with no relations.
    pub fn empty(n: usize) -> Self {
        Self {
            connections: vec![BTreeSet::new(); n],
            joints: BTreeMap::new(),
            intersections: vec![BTreeSet::new(); n],
            pass_thrus: vec![Vec::new(); n],
        }
    }

    /// Number of plates.
    #[inline]
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    pub fn connect(&mut self, a: PlateId, b: PlateId) -> &mut Self {
        self.connections[a.0].insert(b);
        self.connections[b.0].insert(a);
        self
    }

    pub fn intersect(&mut self, a: PlateId, b: PlateId) -> &mut Self {
        self.intersections[a.0].insert(b);
        self.intersections[b.0].insert(a);
        self
    }

    /// Record that `plate` sweeps past the joint shared by `group`.
    pub fn pass_thru(
        &mut self,
        plate: PlateId,
        group: impl IntoIterator<Item = PlateId>,
    ) -> &mut Self {
        self.pass_thrus[plate.0].push(group.into_iter().collect());
        self
    }

    #[inline]
    pub fn connected(&self, a: PlateId, b: PlateId) -> bool {
        self.connections[a.0].contains(&b)
    }

    /// Connected or intersecting: the two may not share a plane.
    #[inline]
    pub fn conflicts(&self, a: PlateId, b: PlateId) -> bool {
        self.connections[a.0].contains(&b) || self.intersections[a.0].contains(&b)
    }

    /// Derive all relations from the plates and the sampled poses of one cycle.
    pub fn analyze(plates: &[Plate], poses: &[Pose], cfg: &GeomCfg) -> Self {
        let mut g = Self::empty(plates.len());
        g.find_connections(plates);
        g.find_intersections(plates, poses, cfg);
        g.find_pass_thrus(plates, poses, cfg);
        debug!(
            plates = plates.len(),
            poses = poses.len(),
            joints = g.joints.len(),
            intersections = g.intersections.iter().map(BTreeSet::len).sum::<usize>() / 2,
            "analyzed plate relations"
        );
        g
    }

    /// Two plates share at most one point; the first in discovery order is their joint.
    fn find_connections(&mut self, plates: &[Plate]) {
        for (i, a) in plates.iter().enumerate() {
            for (j, b) in plates.iter().enumerate().skip(i + 1) {
                let Some(&p) = a.points.iter().find(|&&p| b.contains(p)) else {
                    continue;
                };
                let (pi, pj) = (PlateId(i), PlateId(j));
                self.connect(pi, pj);
                let incident = self.joints.entry(p).or_default();
                incident.insert(pi);
                incident.insert(pj);
            }
        }
    }

    fn find_intersections(&mut self, plates: &[Plate], poses: &[Pose], cfg: &GeomCfg) {
        for pose in poses {
            for (i, a) in plates.iter().enumerate() {
                for (j, b) in plates.iter().enumerate().skip(i + 1) {
                    let (pi, pj) = (PlateId(i), PlateId(j));
                    if self.conflicts(pi, pj) {
                        continue;
                    }
                    if plates_intersect(a, b, pose, cfg.eps_orient) {
                        self.intersect(pi, pj);
                    }
                }
            }
        }
    }

    fn find_pass_thrus(&mut self, plates: &[Plate], poses: &[Pose], cfg: &GeomCfg) {
        let mut pending: Vec<Vec<PointId>> = (0..plates.len())
            .map(|i| {
                self.joints
                    .iter()
                    .filter(|(_, incident)| !incident.contains(&PlateId(i)))
                    .map(|(&p, _)| p)
                    .collect()
            })
            .collect();

        for pose in poses {
            for (i, plate) in plates.iter().enumerate() {
                let joints = &self.joints;
                let pass_thrus = &mut self.pass_thrus[i];
                pending[i].retain(|&p| {
                    let at = pose.get(p);
                    let near = plate.segments.iter().any(|&[a, b]| {
                        distance_to_segment(at, pose.get(a), pose.get(b)).0 < cfg.pass_thru_margin
                    });
                    if near {
                        pass_thrus.push(joints[&p].clone());
                    }
                    !near
                });
            }
        }
    }
}

/// Does any bar of `a` cross any bar of `b` in this pose?
fn plates_intersect(a: &Plate, b: &Plate, pose: &Pose, eps: f64) -> bool {
    a.segments.iter().any(|&[a0, a1]| {
        b.segments.iter().any(|&[b0, b1]| {
            segments_intersect(pose.get(a0), pose.get(a1), pose.get(b0), pose.get(b1), eps)
        })
    })
}
