//! JSON views that address points by name instead of index.

use std::collections::BTreeMap;

use linkplate::api::{Layout, Mechanism, PointId, Pose};
use linkplate::plates::Plate;
use linkplate::Vec2;
use serde_json::{json, Value};

fn xy(p: Vec2<f64>) -> Value {
    json!({"x": p.x, "y": p.y})
}

pub fn pose(mech: &Mechanism, pose: &Pose) -> Value {
    let named: BTreeMap<String, Value> = pose
        .named(mech)
        .into_iter()
        .map(|(name, p)| (name, xy(p)))
        .collect();
    json!({"theta": pose.theta, "points": named})
}

fn names<const N: usize>(mech: &Mechanism, ids: &[[PointId; N]]) -> Vec<Vec<String>> {
    ids.iter()
        .map(|group| group.iter().map(|&p| mech.name(p).to_string()).collect())
        .collect()
}

pub fn plate(mech: &Mechanism, plate: &Plate) -> Value {
    let points: Vec<&str> = plate.points.iter().map(|&p| mech.name(p)).collect();
    json!({
        "points": points,
        "segments": names(mech, &plate.segments),
        "triangles": names(mech, &plate.triangles),
        "sliders": names(mech, &plate.sliders),
    })
}

pub fn plates(mech: &Mechanism, plates: &[Plate]) -> Value {
    Value::Array(plates.iter().map(|p| plate(mech, p)).collect())
}

pub fn layout(mech: &Mechanism, out: &Layout) -> Value {
    json!({
        "score": out.layering.score,
        "planes": out.planes.planes,
        "solutions": out.layering.solutions,
        "plates": plates(mech, &out.plates),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkplate::api::{self, GeomCfg, LayerCfg, Linkage};

    #[test]
    fn pose_and_plates_use_point_names() {
        let l = Linkage::starter();
        let mech = l.mechanism().unwrap();
        let v = pose(&mech, &mech.evaluate(0.0).unwrap());
        assert_eq!(v["points"]["p1"], json!({"x": 1.0, "y": 0.0}));
        assert_eq!(v["theta"], 0.0);

        let ps = plates(&mech, &linkplate::plates::build_plates(&mech));
        assert_eq!(ps[0]["points"], json!(["p0"]));
        assert_eq!(ps[1]["segments"], json!([["p0", "p1"]]));
    }

    #[test]
    fn layout_view_lists_planes_by_plate_id() {
        let mut l = Linkage::starter();
        l.add_hinge_to_ground(0.0, "p1", Vec2::new(3.0, 0.0), Vec2::new(1.5625, 1.3905))
            .unwrap();
        let mech = l.mechanism().unwrap();
        let out = api::layout(&l, &GeomCfg::default(), &LayerCfg::default()).unwrap();
        let v = layout(&mech, &out);
        assert_eq!(v["score"], out.layering.score);
        assert_eq!(v["planes"].as_array().unwrap().len(), out.layering.score);
        assert_eq!(v["plates"].as_array().unwrap().len(), 4);
    }
}
