//! Rigid plates and their relations over a motion cycle.
//!
//! Purpose
//! - Group linkage points into plates (rigid bodies) from the joint graph alone.
//! - Relate plates using sampled poses: which share a joint, which collide at
//!   some angle, and which sweep past a joint they are not part of.
//!
//! Conventions
//! - `PlateId(0)` is the ground frame, present even when empty.
//! - Relations are stored per plate as ordered sets for deterministic output.
//!
//! Code cross-refs: `build_plates`, `PlateGraph::analyze`, `crate::layering`

mod build;
mod relations;
mod types;

pub use build::build_plates;
pub use relations::PlateGraph;
pub use types::{Plate, PlateId};
