//! Plate data: rigid point groups with the bars, triangles and slider guides they carry.

use serde::{Deserialize, Serialize};

use crate::linkage::PointId;

/// Handle of a plate inside the list returned by `build_plates`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlateId(pub usize);

impl PlateId {
    /// The frame every ground point is fixed to.
    pub const GROUND: PlateId = PlateId(0);
}

/// A rigid body: points with fixed mutual distances.
///
/// Invariants:
/// - `points` has no duplicates and keeps discovery order.
/// - Every id in `segments`, `triangles` and `sliders` is in `points`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Plate {
    pub points: Vec<PointId>,
    pub segments: Vec<[PointId; 2]>,
    /// Ternary links closed by a hinge: `(p0, p2, p1)`.
    pub triangles: Vec<[PointId; 3]>,
    /// Slider descriptors `(p0, p1, p2)`; `p1` is the guide point.
    pub sliders: Vec<[PointId; 3]>,
}

impl Plate {
    #[inline]
    pub fn contains(&self, p: PointId) -> bool {
        self.points.contains(&p)
    }

    /// Is `p` the guide point of a slider riding on this plate?
    #[inline]
    pub fn guides(&self, p: PointId) -> bool {
        self.sliders.iter().any(|s| s[1] == p)
    }

    pub(crate) fn add_point(&mut self, p: PointId) {
        if !self.contains(p) {
            self.points.push(p);
        }
    }

    pub(crate) fn add_segment(&mut self, a: PointId, b: PointId) {
        self.add_point(a);
        self.add_point(b);
        self.segments.push([a, b]);
    }
}
