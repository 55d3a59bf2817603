use nalgebra::Vector2;

/// Twice the signed area of triangle (a, b, c); positive for a counterclockwise turn.
#[inline]
pub fn cross(a: Vector2<f64>, b: Vector2<f64>, c: Vector2<f64>) -> f64 {
    let ab = b - a;
    let ac = c - a;
    ab.x * ac.y - ab.y * ac.x
}

/// Turn direction of (a, b, c): `1` counterclockwise, `-1` clockwise, `0` collinear within `eps`.
#[inline]
pub fn orientation(a: Vector2<f64>, b: Vector2<f64>, c: Vector2<f64>, eps: f64) -> i8 {
    let v = cross(a, b, c);
    if v > eps {
        1
    } else if v < -eps {
        -1
    } else {
        0
    }
}

/// For collinear (a, q, b): does `q` lie within the bounding box of segment a–b?
#[inline]
fn on_segment(a: Vector2<f64>, q: Vector2<f64>, b: Vector2<f64>) -> bool {
    q.x <= a.x.max(b.x) && q.x >= a.x.min(b.x) && q.y <= a.y.max(b.y) && q.y >= a.y.min(b.y)
}

/// Closed segment intersection test for `p1–q1` and `p2–q2`, including collinear overlap.
pub fn segments_intersect(
    p1: Vector2<f64>,
    q1: Vector2<f64>,
    p2: Vector2<f64>,
    q2: Vector2<f64>,
    eps: f64,
) -> bool {
    let o1 = orientation(p1, q1, p2, eps);
    let o2 = orientation(p1, q1, q2, eps);
    let o3 = orientation(p2, q2, p1, eps);
    let o4 = orientation(p2, q2, q1, eps);

    if o1 != o2 && o3 != o4 {
        return true;
    }
    (o1 == 0 && on_segment(p1, p2, q1))
        || (o2 == 0 && on_segment(p1, q2, q1))
        || (o3 == 0 && on_segment(p2, p1, q2))
        || (o4 == 0 && on_segment(p2, q1, q2))
}

/// Distance from `p` to segment `a–b`, with the closest point on the segment.
pub fn distance_to_segment(
    p: Vector2<f64>,
    a: Vector2<f64>,
    b: Vector2<f64>,
) -> (f64, Vector2<f64>) {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq == 0.0 {
        return ((p - a).norm(), a);
    }
    let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    let closest = a + ab * t;
    ((p - closest).norm(), closest)
}

/// Orthogonal projection of `p` onto the line through `p0` and `p1`.
///
/// Returns `p0` when the line is degenerate.
pub fn project_onto_line(p0: Vector2<f64>, p1: Vector2<f64>, p: Vector2<f64>) -> Vector2<f64> {
    let d = p1 - p0;
    let len_sq = d.norm_squared();
    if len_sq == 0.0 {
        return p0;
    }
    p0 + d * ((p - p0).dot(&d) / len_sq)
}

/// Serde adapter writing a `Vector2<f64>` as `{"x": .., "y": ..}`.
pub mod xy {
    use nalgebra::Vector2;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct Xy {
        x: f64,
        y: f64,
    }

    pub fn serialize<S: Serializer>(v: &Vector2<f64>, s: S) -> Result<S::Ok, S::Error> {
        Xy { x: v.x, y: v.y }.serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vector2<f64>, D::Error> {
        let Xy { x, y } = Xy::deserialize(d)?;
        Ok(Vector2::new(x, y))
    }
}
