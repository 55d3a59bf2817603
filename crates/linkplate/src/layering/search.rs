//! Branch-and-bound plane assignment with an explicit frame stack.

use tracing::{debug, warn};

use super::types::{is_shift_or_mirror, score, Assignment, LayerCfg, Layering};
use crate::error::{Error, Result};
use crate::plates::{PlateGraph, PlateId};

/// Assign every plate a plane, minimizing the number of planes spanned.
///
/// Plates are placed in id order, candidate planes `0..n` in increasing order.
/// Connected or intersecting plates never share a plane, and no plate ends up
/// strictly between the planes of a joint group it sweeps past.
pub fn layer_plates(graph: &PlateGraph, cfg: &LayerCfg) -> Result<Layering> {
    LayerRunner::new(graph, *cfg).solve()
}

/// One level of the search: which plate, and the next plane to try for it.
#[derive(Clone, Copy, Debug)]
struct Frame {
    plate: usize,
    next_plane: usize,
}

/// Search state shared by all frames; placements are undone on backtrack.
struct LayerRunner<'a> {
    g: &'a PlateGraph,
    cfg: LayerCfg,
    n: usize,
    placed: Vec<Option<usize>>,
    occupants: Vec<Vec<PlateId>>,
    bound: usize,
    found: Vec<(usize, Assignment)>,
    frames: usize,
}

impl<'a> LayerRunner<'a> {
    fn new(g: &'a PlateGraph, cfg: LayerCfg) -> Self {
        let n = g.len();
        Self {
            g,
            cfg,
            n,
            placed: vec![None; n],
            occupants: vec![Vec::new(); n],
            // every plate on its own plane, plus one
            bound: n + 1,
            found: Vec::new(),
            frames: 0,
        }
    }

    fn solve(mut self) -> Result<Layering> {
        if self.n == 0 {
            return Err(Error::NoLayeringSolution);
        }
        let exhausted = self.search();
        debug!(
            plates = self.n,
            frames = self.frames,
            complete = self.found.len(),
            bound = self.bound,
            "plane search finished"
        );
        if exhausted {
            warn!(
                max_frames = self.cfg.max_frames,
                complete = self.found.len(),
                "plane search stopped at its frame budget"
            );
        }
        self.collect()
    }

    /// Run the search; true if the frame budget cut it short.
    fn search(&mut self) -> bool {
        let mut stack = vec![Frame {
            plate: 0,
            next_plane: 0,
        }];
        while let Some(top) = stack.last_mut() {
            let plate = top.plate;
            let plane = top.next_plane;
            top.next_plane += 1;
            self.unplace(plate);
            if plane >= self.n {
                stack.pop();
                continue;
            }
            if !self.admissible(plate, plane) {
                continue;
            }

            self.place(plate, plane);
            self.frames += 1;
            if plate + 1 == self.n {
                let assignment: Assignment = self.placed.iter().flatten().copied().collect();
                let s = score(&assignment);
                self.bound = self.bound.min(s);
                self.found.push((s, assignment));
            } else {
                stack.push(Frame {
                    plate: plate + 1,
                    next_plane: 0,
                });
            }

            if self.cfg.max_frames.is_some_and(|max| self.frames >= max) {
                return true;
            }
        }
        false
    }

    fn place(&mut self, plate: usize, plane: usize) {
        self.placed[plate] = Some(plane);
        self.occupants[plane].push(PlateId(plate));
    }

    fn unplace(&mut self, plate: usize) {
        if let Some(plane) = self.placed[plate].take() {
            self.occupants[plane].retain(|&p| p != PlateId(plate));
        }
    }

    /// Bound, conflict and sandwich checks for putting `plate` on `plane`.
    fn admissible(&self, plate: usize, plane: usize) -> bool {
        let (lo, hi) = self
            .placed
            .iter()
            .flatten()
            .fold((plane, plane), |(lo, hi), &p| (lo.min(p), hi.max(p)));
        let partial = hi - lo + 1;
        let beaten = if self.cfg.enumerate_ties {
            partial > self.bound
        } else {
            partial >= self.bound
        };
        if beaten {
            return false;
        }
        let id = PlateId(plate);
        if self.occupants[plane].iter().any(|&o| self.g.conflicts(id, o)) {
            return false;
        }
        !self.sandwiches(id, plane)
    }

    /// Would `plate` on `plane` sit inside, or close around, a pass-through sandwich?
    fn sandwiches(&self, plate: PlateId, plane: usize) -> bool {
        // plate sweeps past a joint whose plates already straddle `plane`
        for group in &self.g.pass_thrus[plate.0] {
            if let Some((lo, hi)) = span(group.iter().filter_map(|p| self.placed[p.0])) {
                if lo < plane && plane < hi {
                    return true;
                }
            }
        }
        // plate joins a group and closes the span around another placed plate
        for (other, groups) in self.g.pass_thrus.iter().enumerate() {
            if other == plate.0 {
                continue;
            }
            let Some(inside) = self.placed[other] else {
                continue;
            };
            for group in groups.iter().filter(|g| g.contains(&plate)) {
                let planes = group.iter().filter_map(|p| {
                    if *p == plate {
                        Some(plane)
                    } else {
                        self.placed[p.0]
                    }
                });
                if let Some((lo, hi)) = span(planes) {
                    if lo < inside && inside < hi {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Keep the optima, dropping shifts and mirrors of earlier ones.
    fn collect(self) -> Result<Layering> {
        let Some(best) = self.found.iter().map(|(s, _)| *s).min() else {
            return Err(Error::NoLayeringSolution);
        };
        let mut solutions: Vec<Assignment> = Vec::new();
        for (s, assignment) in self.found {
            if s != best {
                continue;
            }
            if solutions.iter().any(|kept| is_shift_or_mirror(&assignment, kept)) {
                continue;
            }
            solutions.push(assignment);
        }
        Ok(Layering {
            score: best,
            solutions,
        })
    }
}

/// Lowest and highest plane, if any.
fn span(planes: impl Iterator<Item = usize>) -> Option<(usize, usize)> {
    planes.fold(None, |acc, p| match acc {
        None => Some((p, p)),
        Some((lo, hi)) => Some((lo.min(p), hi.max(p))),
    })
}
