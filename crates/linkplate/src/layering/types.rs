//! Search configuration and layering results.

use serde::Serialize;

use crate::plates::PlateId;

/// Layering search configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LayerCfg {
    /// Stop after placing this many plates in total. `None` searches exhaustively.
    pub max_frames: Option<usize>,
    /// Keep exploring branches that tie the best score, so every optimum is
    /// collected instead of the first one found.
    pub enumerate_ties: bool,
}

/// Plane index per plate, indexed by `PlateId`.
pub type Assignment = Vec<usize>;

/// Minimum-score assignments, deduplicated up to shift and mirror.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Layering {
    /// `max − min + 1` shared by every solution.
    pub score: usize,
    /// Non-empty; in discovery order.
    pub solutions: Vec<Assignment>,
}

impl Layering {
    /// The first optimum found.
    #[inline]
    pub fn best(&self) -> &Assignment {
        &self.solutions[0]
    }

    /// Plates grouped by plane for the first optimum, planes counted from its minimum.
    pub fn planes(&self) -> Planes {
        Planes::from_assignment(self.best())
    }
}

/// Plates grouped by fabrication layer, bottom first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Planes {
    pub planes: Vec<Vec<PlateId>>,
}

impl Planes {
    pub fn from_assignment(assignment: &[usize]) -> Self {
        let Some(&min) = assignment.iter().min() else {
            return Self::default();
        };
        let mut planes: Vec<Vec<PlateId>> = Vec::new();
        for (plate, &plane) in assignment.iter().enumerate() {
            let k = plane - min;
            if planes.len() <= k {
                planes.resize_with(k + 1, Vec::new);
            }
            planes[k].push(PlateId(plate));
        }
        Self { planes }
    }

    /// Plane of each plate, inverse of the grouping.
    pub fn plane_of(&self, plate: PlateId) -> Option<usize> {
        self.planes.iter().position(|ps| ps.contains(&plate))
    }
}

/// `max − min + 1` over the assigned planes; 0 when nothing is assigned.
pub fn score(assignment: &[usize]) -> usize {
    match (assignment.iter().min(), assignment.iter().max()) {
        (Some(lo), Some(hi)) => hi - lo + 1,
        _ => 0,
    }
}

/// Are `a` and `b` the same layering up to a uniform shift or a mirror?
pub fn is_shift_or_mirror(a: &[usize], b: &[usize]) -> bool {
    debug_assert_eq!(a.len(), b.len());
    let (Some(&a_min), Some(&b_min), Some(&b_max)) =
        (a.iter().min(), b.iter().min(), b.iter().max())
    else {
        return true;
    };
    let shifted = a.iter().zip(b).all(|(&x, &y)| x - a_min == y - b_min);
    let mirrored = a.iter().zip(b).all(|(&x, &y)| x - a_min == b_max - y);
    shifted || mirrored
}
