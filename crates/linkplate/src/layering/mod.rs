//! Plane layering: stack plates into the fewest fabrication layers.
//!
//! Purpose
//! - Assign each plate an integer plane so that plates which share a joint or
//!   collide sit on different planes, and no plate is trapped between the
//!   plates of a joint it sweeps past (a "sandwich").
//!
//! Search
//! - Depth-first over plates in id order with an explicit frame stack.
//!   Branches are cut when the partial span already reaches the best complete
//!   span, when a plane holds a conflicting plate, or when a sandwich forms.
//! - By default ties with the incumbent are pruned, so a single optimum is
//!   reported. `LayerCfg::enumerate_ties` keeps them and collects every
//!   optimum, deduplicated up to shift and mirror.
//!
//! Code cross-refs: `crate::plates::PlateGraph`, `layer_plates`, `Layering`, `Planes`

mod search;
mod types;

pub use search::layer_plates;
pub use types::{is_shift_or_mirror, score, Assignment, LayerCfg, Layering, Planes};

#[cfg(test)]
mod tests;
