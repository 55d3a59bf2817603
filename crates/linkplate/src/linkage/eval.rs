//! Forward kinematics: single poses, full-cycle sampling and per-point traces.
//!
//! Evaluation walks the compiled steps in declaration order. Each step is a
//! closed-form construction (circle point, triangle closure, ray projection),
//! so a pose is a pure function of the mechanism and the drive angle.

use std::collections::BTreeMap;
use std::f64::consts::TAU;
use std::iter;

use nalgebra::Vector2;
use tracing::trace;

use super::types::{Mechanism, PointId, Pose, Step};
use crate::error::{Error, Result};
use crate::geom2::{Affine2, GeomCfg};

/// One point's motion over a cycle: feasible runs in sampling order.
pub type Trace = Vec<Vec<Vector2<f64>>>;

/// Side lengths `(l0, l1)` encoded by a hinge's `(pt, l2t)`:
/// `l0 = |p0 p2|`, `l1 = |p1 p2|`.
#[inline]
pub fn hinge_sides(pt: Vector2<f64>, l2t: f64) -> (f64, f64) {
    let l0 = pt.norm();
    let l1 = Vector2::new(l2t - pt.x, pt.y).norm();
    (l0, l1)
}

/// Solve the local-frame apex of triangle (l0, l1, l2) on the branch `branch_y`.
fn close_triangle(l0: f64, l1: f64, l2: f64, branch_y: f64) -> Result<Vector2<f64>> {
    if l2 > l0 + l1 || l0 > l2 + l1 || l1 > l2 + l0 {
        return Err(Error::infeasible("hinge side lengths do not make a triangle"));
    }
    let sign = if branch_y > 0.0 { 1.0 } else { -1.0 };
    let xt = (l2 * l2 + l0 * l0 - l1 * l1) / (2.0 * l2);
    let yt = sign * (l0 * l0 - xt * xt).max(0.0).sqrt();
    Ok(Vector2::new(xt, yt))
}

/// Place a hinge's third point from its two references and stored parameters.
pub fn solve_hinge(
    p0: Vector2<f64>,
    p1: Vector2<f64>,
    pt: Vector2<f64>,
    l2t: f64,
    cfg: &GeomCfg,
) -> Result<Vector2<f64>> {
    let frame = Affine2::frame(p0, p1, cfg.eps_det)
        .ok_or(Error::infeasible("hinge reference points coincide"))?;
    let (l0, l1) = hinge_sides(pt, l2t);
    let l2 = (p1 - p0).norm();
    let local = close_triangle(l0, l1, l2, pt.y)?;
    Ok(frame.apply(local))
}

/// Place a slider's carried point on the ray `p0 → p1`.
pub fn solve_slider(
    p0: Vector2<f64>,
    p1: Vector2<f64>,
    len: f64,
    cfg: &GeomCfg,
) -> Result<Vector2<f64>> {
    let d = p1 - p0;
    let guide = d.norm();
    if !(guide > cfg.eps_det) {
        return Err(Error::infeasible("slider guide points coincide"));
    }
    if len < guide {
        return Err(Error::infeasible("slider retracted past its guide point"));
    }
    Ok(p0 + d * (len / guide))
}

/// Capture `(pt, l2t)` for a hinge with references `p0, p1` and apex `p2`.
///
/// None if `p0` and `p1` coincide.
pub fn hinge_params(
    p0: Vector2<f64>,
    p1: Vector2<f64>,
    p2: Vector2<f64>,
) -> Option<(Vector2<f64>, f64)> {
    let frame = Affine2::frame(p0, p1, 0.0)?;
    let pt = frame.inverse()?.apply(p2);
    Some((pt, (p1 - p0).norm()))
}

/// Which hinge side a length edit targets.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HingeSide {
    /// New `p0–p2` length.
    L0(f64),
    /// New `p1–p2` length.
    L1(f64),
}

/// Recompute `(pt, l2t)` for the current reference positions after changing one side.
///
/// The other side length and the branch sign are kept.
pub fn hinge_params_with_lengths(
    p0: Vector2<f64>,
    p1: Vector2<f64>,
    pt: Vector2<f64>,
    l2t: f64,
    side: HingeSide,
) -> Result<(Vector2<f64>, f64)> {
    let (old_l0, old_l1) = hinge_sides(pt, l2t);
    let (l0, l1) = match side {
        HingeSide::L0(l0) => (l0, old_l1),
        HingeSide::L1(l1) => (old_l0, l1),
    };
    let l2 = (p1 - p0).norm();
    if !(l2 > 0.0) {
        return Err(Error::infeasible("hinge reference points coincide"));
    }
    let local = close_triangle(l0, l1, l2, pt.y)?;
    Ok((local, l2))
}

/// Feasible poses of one sampling pass, each tagged with its run index.
#[derive(Clone, Debug, Default)]
pub struct Sampling {
    pub poses: Vec<Pose>,
    /// Run index per pose; advances once per failed sample.
    pub runs: Vec<usize>,
}

impl Mechanism {
    /// Evaluate every point at drive angle `theta` with default tolerances.
    pub fn evaluate(&self, theta: f64) -> Result<Pose> {
        self.evaluate_with(theta, &GeomCfg::default())
    }

    pub fn evaluate_with(&self, theta: f64, cfg: &GeomCfg) -> Result<Pose> {
        let mut points = vec![Vector2::zeros(); self.len()];
        for &(id, p) in self.ground() {
            points[id.0] = p;
        }
        for step in self.steps() {
            match *step {
                Step::Rotary {
                    p0,
                    p1,
                    len,
                    theta: offset,
                } => {
                    let a = theta + offset;
                    points[p1.0] = points[p0.0] + Vector2::new(a.cos(), a.sin()) * len;
                }
                Step::Hinge { p0, p1, pt, l2t, p2 } => {
                    points[p2.0] = solve_hinge(points[p0.0], points[p1.0], pt, l2t, cfg)?;
                }
                Step::Slider { p0, p1, len, p2 } => {
                    points[p2.0] = solve_slider(points[p0.0], points[p1.0], len, cfg)?;
                }
            }
        }
        Ok(Pose { theta, points })
    }

    /// Sample `theta = 2π·i/n` for `i ∈ [0, n)` plus a closing sample at `i = 0`.
    pub fn sample(&self, n: usize) -> Sampling {
        self.sample_with(n, &GeomCfg::default())
    }

    pub fn sample_with(&self, n: usize, cfg: &GeomCfg) -> Sampling {
        let mut out = Sampling::default();
        if n == 0 {
            return out;
        }
        let mut run = 0usize;
        for i in (0..n).chain(iter::once(0)) {
            let theta = i as f64 / n as f64 * TAU;
            match self.evaluate_with(theta, cfg) {
                Ok(pose) => {
                    out.poses.push(pose);
                    out.runs.push(run);
                }
                Err(e) => {
                    debug_assert!(e.is_infeasible(), "compiled mechanism failed: {e}");
                    run += 1;
                }
            }
        }
        out
    }

    /// Feasible poses of one sampling pass, in sampling order.
    pub fn sample_poses(&self, n: usize) -> Vec<Pose> {
        self.sample(n).poses
    }

    /// Motion trace of every non-ground point over one sampled cycle.
    pub fn traces(&self, n: usize) -> BTreeMap<PointId, Trace> {
        self.sample(n).traces(self)
    }
}

impl Sampling {
    /// Split each non-ground point's positions into runs.
    ///
    /// All points share the same run boundaries.
    pub fn traces(&self, mech: &Mechanism) -> BTreeMap<PointId, Trace> {
        let mut out = BTreeMap::new();
        for id in mech.ids().filter(|&id| !mech.is_ground(id)) {
            let mut trace: Trace = Vec::new();
            let mut current = None;
            for (pose, &run) in self.poses.iter().zip(&self.runs) {
                if current != Some(run) {
                    trace.push(Vec::new());
                    current = Some(run);
                }
                if let Some(last) = trace.last_mut() {
                    last.push(pose.get(id));
                }
            }
            out.insert(id, trace);
        }
        out
    }

    /// Number of distinct runs.
    pub fn run_count(&self) -> usize {
        let mut count = 0;
        let mut current = None;
        for &run in &self.runs {
            if current != Some(run) {
                count += 1;
                current = Some(run);
            }
        }
        count
    }
}

/// Animation drive: advances the crank and bounces off lock-up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Driver {
    pub theta: f64,
    /// Revolutions per unit of `dt`; the sign is the current direction.
    pub speed: f64,
}

impl Default for Driver {
    fn default() -> Self {
        Self {
            theta: 0.0,
            speed: 1.0,
        }
    }
}

impl Driver {
    /// Step the drive angle by `dt·2π·speed`.
    ///
    /// On lock-up the direction reverses, the step is undone and the previous
    /// angle is evaluated once more.
    pub fn advance(&mut self, mech: &Mechanism, dt: f64) -> Result<Pose> {
        let delta = dt * TAU * self.speed;
        self.theta += delta;
        match mech.evaluate(self.theta) {
            Err(e) if e.is_infeasible() => {
                self.speed = -self.speed;
                self.theta -= delta;
                trace!(theta = self.theta, "lock-up, reversing drive");
                mech.evaluate(self.theta)
            }
            res => res,
        }
    }
}
