//! Planar geometry primitives for linkage evaluation and plate analysis.
//!
//! Purpose
//! - Keep the numerically delicate pieces (orientation tests, segment
//!   intersection, point/segment distance, local frames) in one place with
//!   explicit tolerances.
//!
//! Code cross-refs: `GeomCfg`, `Affine2`, `segments_intersect`, `distance_to_segment`

mod types;
mod util;

pub use types::{Affine2, GeomCfg};
pub use util::{cross, distance_to_segment, orientation, project_onto_line, segments_intersect, xy};

#[cfg(test)]
mod tests;
