//! Planar linkage kinematics and plate layering.
//!
//! A linkage is a set of named ground points and parameters plus an ordered
//! list of joints (cranks, hinges, sliders). This crate evaluates it for any
//! drive angle, samples full cycles into motion traces, splits it into rigid
//! plates and stacks those plates into the fewest fabrication planes.
//!
//! Module map
//! - `geom2`: 2D primitives and tolerances.
//! - `linkage`: description, compilation, evaluation and authoring edits.
//! - `plates`: rigid-body partition and plate relations over a cycle.
//! - `layering`: branch-and-bound plane assignment.
//! - `api`: whole-linkage entry points and a flat re-export surface.

pub mod api;
pub mod error;
pub mod geom2;
pub mod layering;
pub mod linkage;
pub mod plates;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{Error, Result};
pub use geom2::GeomCfg;
pub use nalgebra::Vector2 as Vec2;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::geom2::GeomCfg;
    pub use crate::layering::{LayerCfg, Layering, Planes};
    pub use crate::linkage::{
        Anchor, Axis, Driver, Edit, Joint, Linkage, Mechanism, Param, PointId, Pose,
    };
    pub use crate::plates::{build_plates, Plate, PlateGraph, PlateId};
    pub use nalgebra::Vector2 as Vec2;
}
