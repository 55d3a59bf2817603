//! Basic 2D types and tolerances used by the evaluator and plate analysis.
//!
//! - `GeomCfg`: centralizes epsilons, the pass-through margin and the cycle sample count.
//! - `Affine2`: 2D rigid/affine map; a hinge's local frame is one of these.
//!
//! Code cross-refs: `util::{segments_intersect, distance_to_segment}`, `linkage::eval`

use nalgebra::{Matrix2, Vector2};

/// Geometry configuration (tolerances and sampling).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeomCfg {
    /// Lengths at or below this are treated as zero (degenerate frames, point segments).
    pub eps_det: f64,
    /// Orientation values within this band count as collinear.
    pub eps_orient: f64,
    /// Distance under which a plate's segment passes through a connection point.
    /// Matches the point-snap radius of the authoring UI.
    pub pass_thru_margin: f64,
    /// Drive angle samples per full rotation.
    pub samples: usize,
}

impl Default for GeomCfg {
    fn default() -> Self {
        Self {
            eps_det: 1e-12,
            eps_orient: 1e-12,
            pass_thru_margin: 0.15,
            samples: 100,
        }
    }
}

/// 2D affine map: `x ↦ M x + t`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Affine2 {
    pub m: Matrix2<f64>,
    pub t: Vector2<f64>,
}

impl Affine2 {
    /// Local frame with origin `p0` and x-axis along `p0 → p1`.
    ///
    /// None if the two points coincide (within `eps`).
    pub fn frame(p0: Vector2<f64>, p1: Vector2<f64>, eps: f64) -> Option<Self> {
        let d = p1 - p0;
        let len = d.norm();
        if !(len > eps) {
            return None;
        }
        let (c, s) = (d.x / len, d.y / len);
        Some(Self {
            m: Matrix2::new(c, -s, s, c),
            t: p0,
        })
    }

    #[inline]
    pub fn apply(&self, v: Vector2<f64>) -> Vector2<f64> {
        self.m * v + self.t
    }

    #[inline]
    pub fn inverse(&self) -> Option<Self> {
        self.m.try_inverse().map(|minv| Self {
            m: minv,
            t: -minv * self.t,
        })
    }
}
