use super::*;
use nalgebra::vector;

#[test]
fn crossing_and_disjoint_segments() {
    let eps = GeomCfg::default().eps_orient;
    // X shape
    assert!(segments_intersect(
        vector![0.0, 0.0],
        vector![2.0, 2.0],
        vector![0.0, 2.0],
        vector![2.0, 0.0],
        eps
    ));
    // parallel, offset
    assert!(!segments_intersect(
        vector![0.0, 0.0],
        vector![2.0, 0.0],
        vector![0.0, 1.0],
        vector![2.0, 1.0],
        eps
    ));
    // T-junction touching at an endpoint counts
    assert!(segments_intersect(
        vector![0.0, 0.0],
        vector![2.0, 0.0],
        vector![1.0, 0.0],
        vector![1.0, 3.0],
        eps
    ));
    // would cross only if extended
    assert!(!segments_intersect(
        vector![0.0, 0.0],
        vector![1.0, 1.0],
        vector![3.0, 0.0],
        vector![2.0, 1.5],
        eps
    ));
}

#[test]
fn collinear_overlap_special_case() {
    let eps = GeomCfg::default().eps_orient;
    assert!(segments_intersect(
        vector![0.0, 0.0],
        vector![2.0, 0.0],
        vector![1.0, 0.0],
        vector![3.0, 0.0],
        eps
    ));
    // collinear but separated
    assert!(!segments_intersect(
        vector![0.0, 0.0],
        vector![1.0, 0.0],
        vector![2.0, 0.0],
        vector![3.0, 0.0],
        eps
    ));
}

#[test]
fn point_to_segment_distance_clamps_to_endpoints() {
    let (d, c) = distance_to_segment(vector![1.0, 2.0], vector![0.0, 0.0], vector![2.0, 0.0]);
    assert!((d - 2.0).abs() < 1e-12);
    assert!((c - vector![1.0, 0.0]).norm() < 1e-12);

    let (d_end, c_end) =
        distance_to_segment(vector![5.0, 4.0], vector![0.0, 0.0], vector![2.0, 0.0]);
    assert!((d_end - 5.0).abs() < 1e-12);
    assert_eq!(c_end, vector![2.0, 0.0]);

    // degenerate segment
    let (d_pt, _) = distance_to_segment(vector![3.0, 4.0], vector![0.0, 0.0], vector![0.0, 0.0]);
    assert!((d_pt - 5.0).abs() < 1e-12);
}

#[test]
fn frame_round_trip() {
    let f = Affine2::frame(vector![1.0, 1.0], vector![1.0, 3.0], 1e-12).unwrap();
    // x-axis of the frame points along +y in world coordinates
    let w = f.apply(vector![2.0, 0.0]);
    assert!((w - vector![1.0, 3.0]).norm() < 1e-12);
    let back = f.inverse().unwrap().apply(w);
    assert!((back - vector![2.0, 0.0]).norm() < 1e-12);
    assert!(Affine2::frame(vector![1.0, 1.0], vector![1.0, 1.0], 1e-12).is_none());
}

#[test]
fn projection_onto_line() {
    let p = project_onto_line(vector![0.0, 0.0], vector![2.0, 0.0], vector![5.0, 3.0]);
    assert!((p - vector![5.0, 0.0]).norm() < 1e-12);
    assert_eq!(
        project_onto_line(vector![1.0, 1.0], vector![1.0, 1.0], vector![5.0, 3.0]),
        vector![1.0, 1.0]
    );
}

#[test]
fn orientation_signs() {
    let eps = 1e-12;
    assert_eq!(orientation(vector![0.0, 0.0], vector![1.0, 0.0], vector![0.0, 1.0], eps), 1);
    assert_eq!(orientation(vector![0.0, 0.0], vector![1.0, 0.0], vector![0.0, -1.0], eps), -1);
    assert_eq!(orientation(vector![0.0, 0.0], vector![1.0, 0.0], vector![3.0, 0.0], eps), 0);
    assert!((cross(vector![0.0, 0.0], vector![2.0, 0.0], vector![0.0, 3.0]) - 6.0).abs() < 1e-12);
}
