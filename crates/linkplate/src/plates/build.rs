//! Partition a mechanism's points into rigid plates.

use tracing::debug;

use super::types::Plate;
use crate::linkage::{Mechanism, PointId, Step};

/// Group the mechanism's points into plates, joints in declaration order.
///
/// Plate 0 is the ground frame and is always present. A hinge whose two
/// references already share a plate (and neither is that plate's slider
/// guide) closes a rigid triangle on it; otherwise each joint opens new plates.
pub fn build_plates(mech: &Mechanism) -> Vec<Plate> {
    let mut plates = vec![Plate::default()];

    for step in mech.steps() {
        match *step {
            Step::Rotary { p0, p1, .. } => {
                if mech.is_ground(p0) {
                    plates[0].add_point(p0);
                }
                let mut crank = Plate::default();
                crank.add_segment(p0, p1);
                plates.push(crank);
            }
            Step::Hinge { p0, p1, p2, .. } => match rigid_with(&plates, p0, p1) {
                Some(i) => {
                    let plate = &mut plates[i];
                    plate.add_point(p0);
                    plate.add_point(p2);
                    plate.add_point(p1);
                    plate.segments.push([p0, p2]);
                    plate.segments.push([p2, p1]);
                    plate.triangles.push([p0, p2, p1]);
                }
                None => {
                    let mut left = Plate::default();
                    left.add_segment(p0, p2);
                    let mut right = Plate::default();
                    right.add_segment(p2, p1);
                    plates.push(left);
                    plates.push(right);
                    fold_ground(mech, &mut plates[0], [p0, p1]);
                }
            },
            Step::Slider { p0, p1, p2, .. } => {
                let i = match rigid_with(&plates, p0, p1) {
                    Some(i) => i,
                    None => {
                        plates.push(Plate::default());
                        fold_ground(mech, &mut plates[0], [p0, p1]);
                        plates.len() - 1
                    }
                };
                let plate = &mut plates[i];
                for p in [p0, p1, p2] {
                    plate.add_point(p);
                }
                plate.segments.push([p0, p2]);
                plate.sliders.push([p0, p1, p2]);
            }
        }
    }

    // chain the ground points so the frame has bars of its own
    let ground: Vec<PointId> = plates[0].points.clone();
    for w in ground.windows(2) {
        plates[0].segments.push([w[0], w[1]]);
    }

    debug!(plates = plates.len(), points = mech.len(), "partitioned plates");
    plates
}

/// First plate holding both `p0` and `p1` rigidly (not as a slider guide).
fn rigid_with(plates: &[Plate], p0: PointId, p1: PointId) -> Option<usize> {
    plates
        .iter()
        .position(|pl| !pl.guides(p0) && !pl.guides(p1) && pl.contains(p0) && pl.contains(p1))
}

fn fold_ground(mech: &Mechanism, ground: &mut Plate, refs: [PointId; 2]) {
    for p in refs {
        if mech.is_ground(p) {
            ground.add_point(p);
        }
    }
}
