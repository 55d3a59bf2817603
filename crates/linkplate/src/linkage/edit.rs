//! Authoring operations on a `Linkage`.
//!
//! Every mutation runs as a transaction: the touched parameters (and, for
//! structural edits, the joint list) are snapshotted, the change is applied,
//! and the linkage is re-evaluated at the current drive angle. A failed
//! evaluation restores the snapshot and reports `Edit::RolledBack`. Edits that
//! need the current pose report the same when the linkage is already locked
//! at that angle.

use std::f64::consts::TAU;

use nalgebra::Vector2;
use tracing::trace;

use super::eval::{hinge_params, hinge_params_with_lengths, HingeSide};
use super::types::{Joint, Linkage, Mechanism, Param, Pose};
use crate::error::{Error, Result};
use crate::geom2::project_onto_line;

/// Outcome of an authoring operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edit {
    /// The change was committed.
    Applied,
    /// Re-evaluation failed; the linkage is unchanged (except the name counter).
    RolledBack,
    /// The operation was declined up front (e.g. removing a shared point).
    Ignored,
}

/// Coordinate axis of a ground point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Endpoint of a new joint: an existing point, or a fresh ground point.
#[derive(Clone, Debug, PartialEq)]
pub enum Anchor {
    Point(String),
    Ground(Vector2<f64>),
}

/// Snapshot of everything a transaction touched.
struct Txn<'a> {
    linkage: &'a mut Linkage,
    saved: Vec<(String, Option<Param>)>,
    links: Option<Vec<Joint>>,
}

impl<'a> Txn<'a> {
    fn new(linkage: &'a mut Linkage) -> Self {
        Self {
            linkage,
            saved: Vec::new(),
            links: None,
        }
    }

    fn remember(&mut self, name: &str) {
        if !self.saved.iter().any(|(n, _)| n == name) {
            let old = self.linkage.params.get(name).copied();
            self.saved.push((name.to_string(), old));
        }
    }

    fn set(&mut self, name: &str, value: Param) {
        self.remember(name);
        self.linkage.params.insert(name.to_string(), value);
    }

    fn remove(&mut self, name: &str) {
        self.remember(name);
        self.linkage.params.remove(name);
    }

    fn links_mut(&mut self) -> &mut Vec<Joint> {
        if self.links.is_none() {
            self.links = Some(self.linkage.links.clone());
        }
        &mut self.linkage.links
    }

    fn mint(&mut self, prefix: &str) -> String {
        self.linkage.mint(prefix)
    }

    /// Name of an anchor, minting a ground parameter for a fresh one.
    fn anchor(&mut self, anchor: Anchor) -> String {
        match anchor {
            Anchor::Point(name) => name,
            Anchor::Ground(p) => {
                let name = self.mint("p");
                self.set(&name, Param::Point(p));
                name
            }
        }
    }

    fn rollback(self) {
        for (name, old) in self.saved {
            match old {
                Some(v) => {
                    self.linkage.params.insert(name, v);
                }
                None => {
                    self.linkage.params.remove(&name);
                }
            }
        }
        if let Some(links) = self.links {
            self.linkage.links = links;
        }
    }

    /// Re-evaluate at `theta`; keep the change only if the linkage still assembles.
    fn commit(self, theta: f64) -> Result<Edit> {
        let res = self
            .linkage
            .mechanism()
            .and_then(|m| m.evaluate(theta).map(|_| ()));
        match res {
            Ok(()) => Ok(Edit::Applied),
            Err(e) if e.is_infeasible() => {
                trace!(theta, error = %e, "edit rolled back");
                self.rollback();
                Ok(Edit::RolledBack)
            }
            Err(e) => {
                self.rollback();
                Err(e)
            }
        }
    }
}

impl Linkage {
    /// Current pose at `theta`, for edits that need world positions.
    ///
    /// `names` must be points of the linkage. None if the linkage does not
    /// assemble at `theta`; the edit then reports `Edit::RolledBack`.
    fn pose_at(&self, theta: f64, names: &[&str]) -> Result<Option<(Mechanism, Pose)>> {
        let mech = self.mechanism()?;
        for name in names {
            mech.require(name)?;
        }
        match mech.evaluate(theta) {
            Ok(pose) => Ok(Some((mech, pose))),
            Err(e) if e.is_infeasible() => {
                trace!(theta, error = %e, "edit rejected, linkage locked");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn position(&self, theta: f64, name: &str) -> Result<Option<Vector2<f64>>> {
        let Some((mech, pose)) = self.pose_at(theta, &[name])? else {
            return Ok(None);
        };
        locate(&mech, &pose, name).map(Some)
    }

    /// Ground points are point parameters referenced by a joint.
    fn is_ground_point(&self, name: &str) -> bool {
        matches!(self.params.get(name), Some(Param::Point(_)))
            && self.links.iter().any(|l| l.touches(name))
    }

    /// Add a unit crank pivoting on a new ground point `at`.
    pub fn add_rotary(&mut self, theta: f64, at: Vector2<f64>) -> Result<Edit> {
        let mut txn = Txn::new(self);
        let p0 = txn.mint("p");
        let p1 = txn.mint("p");
        let len = txn.mint("len");
        let offset = txn.mint("theta");
        txn.set(&p0, Param::Point(at));
        txn.set(&len, Param::Scalar(1.0));
        txn.set(&offset, Param::Scalar(0.0));
        txn.links_mut().push(Joint::Rotary {
            p0,
            p1,
            len,
            theta: offset,
        });
        txn.commit(theta)
    }

    /// Add a hinge whose apex currently sits at `p2_at`, hung from two existing points.
    pub fn add_hinge(&mut self, theta: f64, p0: &str, p1: &str, p2_at: Vector2<f64>) -> Result<Edit> {
        let Some((mech, pose)) = self.pose_at(theta, &[p0, p1])? else {
            return Ok(Edit::RolledBack);
        };
        let a = locate(&mech, &pose, p0)?;
        let b = locate(&mech, &pose, p1)?;
        let Some((pt, l2t)) = hinge_params(a, b, p2_at) else {
            return Ok(Edit::Ignored);
        };
        let mut txn = Txn::new(self);
        let pt_name = txn.mint("pt");
        let l2t_name = txn.mint("l2t");
        let p2 = txn.mint("p");
        txn.set(&pt_name, Param::Point(pt));
        txn.set(&l2t_name, Param::Scalar(l2t));
        txn.links_mut().push(Joint::Hinge {
            p0: p0.to_string(),
            p1: p1.to_string(),
            pt: pt_name,
            l2t: l2t_name,
            p2,
        });
        txn.commit(theta)
    }

    /// Add a hinge from an existing point `p0` and a new ground pivot at `p1_at`.
    pub fn add_hinge_to_ground(
        &mut self,
        theta: f64,
        p0: &str,
        p1_at: Vector2<f64>,
        p2_at: Vector2<f64>,
    ) -> Result<Edit> {
        let Some(a) = self.position(theta, p0)? else {
            return Ok(Edit::RolledBack);
        };
        let Some((pt, l2t)) = hinge_params(a, p1_at, p2_at) else {
            return Ok(Edit::Ignored);
        };
        let mut txn = Txn::new(self);
        let p1 = txn.mint("p");
        txn.set(&p1, Param::Point(p1_at));
        let pt_name = txn.mint("pt");
        let l2t_name = txn.mint("l2t");
        let p2 = txn.mint("p");
        txn.set(&pt_name, Param::Point(pt));
        txn.set(&l2t_name, Param::Scalar(l2t));
        txn.links_mut().push(Joint::Hinge {
            p0: p0.to_string(),
            p1,
            pt: pt_name,
            l2t: l2t_name,
            p2,
        });
        txn.commit(theta)
    }

    /// Add a slider along `p0 → p1`, carrying a point at the projection of `toward`.
    ///
    /// Declined when the projection falls short of `p1`.
    pub fn add_slider(
        &mut self,
        theta: f64,
        p0: Anchor,
        p1: Anchor,
        toward: Vector2<f64>,
    ) -> Result<Edit> {
        let resolve = |a: &Anchor| match a {
            Anchor::Point(name) => self.position(theta, name),
            Anchor::Ground(p) => Ok(Some(*p)),
        };
        let (Some(a), Some(b)) = (resolve(&p0)?, resolve(&p1)?) else {
            return Ok(Edit::RolledBack);
        };
        let p2_at = project_onto_line(a, b, toward);
        let total = (p2_at - a).norm();
        if total < (b - a).norm() {
            return Ok(Edit::Ignored);
        }

        let mut txn = Txn::new(self);
        let len = txn.mint("len");
        let p0 = txn.anchor(p0);
        let p1 = txn.anchor(p1);
        let p2 = txn.mint("p");
        txn.set(&len, Param::Scalar(total));
        txn.links_mut().push(Joint::Slider { p0, p1, len, p2 });
        txn.commit(theta)
    }

    fn links_touching(&self, name: &str) -> Vec<usize> {
        self.links
            .iter()
            .enumerate()
            .filter(|(_, l)| l.touches(name))
            .map(|(i, _)| i)
            .collect()
    }

    /// Remove the only joint attached to `name`, with the parameters it alone used.
    ///
    /// Declined when the point, or the joint's output, is shared with other joints.
    pub fn remove_point(&mut self, theta: f64, name: &str) -> Result<Edit> {
        let touching = self.links_touching(name);
        let idx = match touching.as_slice() {
            [] => return Err(Error::unknown(name)),
            [i] => *i,
            _ => return Ok(Edit::Ignored),
        };
        let link = self.links[idx].clone();
        if self.links_touching(link.output()).len() > 1 {
            return Ok(Edit::Ignored);
        }
        let (anchors, own): (Vec<&str>, Vec<&str>) = match &link {
            Joint::Rotary { p0, len, theta, .. } => {
                (vec![p0.as_str()], vec![len.as_str(), theta.as_str()])
            }
            Joint::Hinge { p0, p1, pt, l2t, .. } => (
                vec![p0.as_str(), p1.as_str()],
                vec![pt.as_str(), l2t.as_str()],
            ),
            Joint::Slider { p0, p1, len, .. } => {
                (vec![p0.as_str(), p1.as_str()], vec![len.as_str()])
            }
        };
        let mut doomed: Vec<&str> = anchors
            .into_iter()
            .filter(|p| self.links_touching(p).len() == 1)
            .collect();
        doomed.extend(own);
        let mut txn = Txn::new(self);
        for p in doomed {
            // computed points have no parameter; removal is then a no-op
            txn.remove(p);
        }
        txn.links_mut().remove(idx);
        txn.commit(theta)
    }

    /// Drag a point to `to`, adjusting whichever parameters define it.
    ///
    /// Ground points move directly; a crank tip changes its crank's length and
    /// phase; a slider's carried point changes the slider length; any other
    /// point re-captures the hinges it belongs to.
    pub fn move_point(&mut self, theta: f64, name: &str, to: Vector2<f64>) -> Result<Edit> {
        if self.is_ground_point(name) {
            let mut txn = Txn::new(self);
            txn.set(name, Param::Point(to));
            return txn.commit(theta);
        }

        let Some((mech, pose)) = self.pose_at(theta, &[name])? else {
            return Ok(Edit::RolledBack);
        };
        let at = |p: &str| locate(&mech, &pose, p);

        let rotary = self.links.iter().find_map(|l| match l {
            Joint::Rotary { p0, p1, len, theta } if p1 == name => {
                Some((p0.clone(), len.clone(), theta.clone()))
            }
            _ => None,
        });
        if let Some((p0, len, offset)) = rotary {
            let c = at(p0.as_str())?;
            let d = to - c;
            let mut txn = Txn::new(self);
            txn.set(&len, Param::Scalar(d.norm()));
            txn.set(&offset, Param::Scalar((d.y.atan2(d.x) - theta) % TAU));
            return txn.commit(theta);
        }

        let slider = self.links.iter().find_map(|l| match l {
            Joint::Slider { p0, len, p2, .. } if p2 == name => Some((p0.clone(), len.clone())),
            _ => None,
        });
        if let Some((p0, len)) = slider {
            let c = at(p0.as_str())?;
            let mut txn = Txn::new(self);
            txn.set(&len, Param::Scalar((to - c).norm()));
            return txn.commit(theta);
        }

        let mut updates = Vec::new();
        for link in &self.links {
            let Joint::Hinge {
                p0,
                p1,
                pt,
                l2t,
                p2,
            } = link
            else {
                continue;
            };
            if p0 != name && p1 != name && p2 != name {
                continue;
            }
            let mut ps = [at(p0.as_str())?, at(p1.as_str())?, at(p2.as_str())?];
            if p0 == name {
                ps[0] = to;
            } else if p1 == name {
                ps[1] = to;
            } else {
                ps[2] = to;
            }
            if let Some(params) = hinge_params(ps[0], ps[1], ps[2]) {
                updates.push((pt.clone(), l2t.clone(), params));
            }
        }
        if updates.is_empty() {
            return if self.links.iter().any(|l| l.touches(name)) {
                Ok(Edit::Ignored)
            } else {
                Err(Error::unknown(name))
            };
        }
        let mut txn = Txn::new(self);
        for (pt, l2t, (pt_v, l2t_v)) in updates {
            txn.set(&pt, Param::Point(pt_v));
            txn.set(&l2t, Param::Scalar(l2t_v));
        }
        txn.commit(theta)
    }

    /// Set the length of the link between points `a` and `b` (either order).
    pub fn set_link_length(&mut self, theta: f64, a: &str, b: &str, len: f64) -> Result<Edit> {
        let is_pair = |x: &str, y: &str| (x == a && y == b) || (x == b && y == a);
        let target = self.links.iter().find_map(|link| match link {
            Joint::Rotary { p0, p1, len, .. } if is_pair(p0, p1) => {
                Some(LengthTarget::Scalar(len.clone()))
            }
            Joint::Slider { p0, p2, len, .. } if is_pair(p0, p2) => {
                Some(LengthTarget::Scalar(len.clone()))
            }
            Joint::Hinge {
                p0,
                p1,
                pt,
                l2t,
                p2,
            } if is_pair(p0, p2) || is_pair(p1, p2) => Some(LengthTarget::Hinge {
                p0: p0.clone(),
                p1: p1.clone(),
                pt: pt.clone(),
                l2t: l2t.clone(),
                l0_side: is_pair(p0, p2),
            }),
            _ => None,
        });

        match target {
            None => Err(Error::unknown(format!("{a}-{b}"))),
            Some(LengthTarget::Scalar(param)) => {
                let mut txn = Txn::new(self);
                txn.set(&param, Param::Scalar(len));
                txn.commit(theta)
            }
            Some(LengthTarget::Hinge {
                p0,
                p1,
                pt,
                l2t,
                l0_side,
            }) => {
                let side = if l0_side {
                    HingeSide::L0(len)
                } else {
                    HingeSide::L1(len)
                };
                let Some((mech, pose)) = self.pose_at(theta, &[p0.as_str(), p1.as_str()])? else {
                    return Ok(Edit::RolledBack);
                };
                let updated = hinge_params_with_lengths(
                    locate(&mech, &pose, &p0)?,
                    locate(&mech, &pose, &p1)?,
                    self.point(&pt)?,
                    self.scalar(&l2t)?,
                    side,
                );
                let (pt_v, l2t_v) = match updated {
                    Ok(v) => v,
                    Err(e) if e.is_infeasible() => {
                        trace!(error = %e, "hinge length edit rejected");
                        return Ok(Edit::RolledBack);
                    }
                    Err(e) => return Err(e),
                };
                let mut txn = Txn::new(self);
                txn.set(&pt, Param::Point(pt_v));
                txn.set(&l2t, Param::Scalar(l2t_v));
                txn.commit(theta)
            }
        }
    }

    /// Set one coordinate of a ground point.
    pub fn set_ground_coord(&mut self, theta: f64, name: &str, axis: Axis, value: f64) -> Result<Edit> {
        let mut p = match self.params.get(name) {
            Some(Param::Point(p)) if self.is_ground_point(name) => *p,
            _ => return Err(Error::unknown(name)),
        };
        match axis {
            Axis::X => p.x = value,
            Axis::Y => p.y = value,
        }
        let mut txn = Txn::new(self);
        txn.set(name, Param::Point(p));
        txn.commit(theta)
    }

    /// Shift every ground point by `delta` (panning the whole mechanism).
    pub fn translate_ground(&mut self, theta: f64, delta: Vector2<f64>) -> Result<Edit> {
        let grounds: Vec<(String, Vector2<f64>)> = self
            .ground_point_refs()
            .into_iter()
            .filter_map(|name| {
                let p = self.params.get(&name)?.as_point()?;
                Some((name, p))
            })
            .collect();
        let mut txn = Txn::new(self);
        for (name, p) in grounds {
            txn.set(&name, Param::Point(p + delta));
        }
        txn.commit(theta)
    }
}

/// Parameter(s) behind a link length.
enum LengthTarget {
    Scalar(String),
    Hinge {
        p0: String,
        p1: String,
        pt: String,
        l2t: String,
        l0_side: bool,
    },
}

fn locate(mech: &Mechanism, pose: &Pose, name: &str) -> Result<Vector2<f64>> {
    Ok(pose.get(mech.require(name)?))
}
