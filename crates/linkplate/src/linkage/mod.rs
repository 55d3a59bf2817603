//! Planar linkages: description, compilation, forward kinematics and authoring.
//!
//! Purpose
//! - Hold a mechanism as named parameters plus an ordered joint list (the
//!   persisted shape), compile it to an index form, and evaluate poses for a
//!   drive angle.
//! - Provide the authoring edits (add, remove, move, set length) with
//!   rollback when an edit leaves the mechanism unable to assemble.
//!
//! Conventions
//! - Ground points are point-valued parameters; every other point is defined
//!   by exactly one joint and must be defined before it is used.
//! - Hinges remember their branch through the sign of `pt.y`; evaluation never
//!   flips a hinge to its mirror solution.
//! - Fresh names are `{prefix}{n}` with a monotonic counter that is not
//!   rewound by rollbacks.
//!
//! Code cross-refs: `Linkage`, `Mechanism`, `Pose`, `Sampling`, `Driver`, `Edit`

mod edit;
mod eval;
mod query;
mod types;

pub use edit::{Anchor, Axis, Edit};
pub use eval::{
    hinge_params, hinge_params_with_lengths, hinge_sides, solve_hinge, solve_slider, Driver,
    HingeSide, Sampling, Trace,
};
pub use types::{Joint, Linkage, Mechanism, Param, PointId, Pose, Step};
