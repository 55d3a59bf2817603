use super::*;
use crate::error::Error;
use crate::plates::{PlateGraph, PlateId};

const A: PlateId = PlateId(0);
const B: PlateId = PlateId(1);
const C: PlateId = PlateId(2);
const D: PlateId = PlateId(3);
const E: PlateId = PlateId(4);
const F: PlateId = PlateId(5);

/// Four plates joined in a ring `a–b–c–d–a`.
fn ring4() -> PlateGraph {
    let mut g = PlateGraph::empty(4);
    g.connect(A, B).connect(B, C).connect(C, D).connect(D, A);
    g
}

/// Ring of four plus `e` on `a` and `f` bridging `e` and `c`.
fn klann() -> PlateGraph {
    let mut g = PlateGraph::empty(6);
    g.connect(A, B).connect(B, C).connect(C, D).connect(D, A);
    g.connect(E, A).connect(F, C).connect(E, F);
    g
}

fn four_bar() -> PlateGraph {
    let mut g = ring4();
    g.intersect(A, C).pass_thru(A, [B, C]).pass_thru(C, [A, B]);
    g
}

fn hard() -> PlateGraph {
    let mut g = ring4();
    g.intersect(A, C).intersect(B, D);
    g.pass_thru(A, [B, C]).pass_thru(B, [A, D]).pass_thru(C, [A, B]);
    g
}

fn solve(g: &PlateGraph) -> Layering {
    layer_plates(g, &LayerCfg::default()).unwrap()
}

/// Panics with the offending plate if `a` breaks a conflict or sandwich rule.
fn assert_valid(g: &PlateGraph, a: &[usize]) {
    assert_eq!(a.len(), g.len());
    for i in 0..g.len() {
        for j in g.connections[i].iter().chain(&g.intersections[i]) {
            assert_ne!(a[i], a[j.0], "plates {i} and {} share a plane", j.0);
        }
        for group in &g.pass_thrus[i] {
            let lo = group.iter().map(|p| a[p.0]).min().unwrap();
            let hi = group.iter().map(|p| a[p.0]).max().unwrap();
            assert!(!(lo < a[i] && a[i] < hi), "plate {i} is sandwiched");
        }
    }
}

#[test]
fn four_bar_needs_three_planes() {
    let g = four_bar();
    let l = solve(&g);
    assert_eq!(l.score, 3);
    assert_eq!(l.solutions, vec![vec![0, 1, 2, 1]]);
    assert_valid(&g, l.best());
}

#[test]
fn clock_puts_ground_above_crank() {
    let mut g = ring4();
    g.intersect(B, D).pass_thru(B, [A, D]).pass_thru(D, [A, B]);
    let l = solve(&g);
    assert_eq!(l.score, 3);
    assert_eq!(l.best(), &vec![1, 0, 1, 2]);
    assert_valid(&g, l.best());

    // planes are counted from the lowest one used
    let planes = l.planes();
    assert_eq!(planes.planes, vec![vec![B], vec![A, C], vec![D]]);
    assert_eq!(planes.plane_of(D), Some(2));
}

#[test]
fn crossing_couplers_need_four_planes() {
    let g = hard();
    let l = solve(&g);
    assert_eq!(l.score, 4);
    assert_eq!(l.best(), &vec![0, 2, 3, 1]);
    assert_valid(&g, l.best());

    let mut g = hard();
    g.pass_thru(D, [A, B]);
    let l = solve(&g);
    assert_eq!(l.score, 4);
    assert_eq!(l.best(), &vec![1, 2, 3, 0]);
    assert_valid(&g, l.best());
}

#[test]
fn klann_variants() {
    let mut g = klann();
    g.intersect(A, C);
    let l = solve(&g);
    assert_eq!((l.score, l.best().clone()), (3, vec![0, 1, 2, 1, 1, 0]));

    let mut flat = klann();
    flat.intersect(A, C).intersect(C, E).intersect(D, E);
    let l = solve(&flat);
    assert_eq!((l.score, l.best().clone()), (4, vec![0, 1, 2, 1, 3, 0]));
    assert_valid(&flat, l.best());

    let mut sharp = klann();
    sharp.intersect(A, C).intersect(A, F).intersect(D, F);
    let l = solve(&sharp);
    assert_eq!((l.score, l.best().clone()), (4, vec![0, 1, 2, 1, 1, 3]));
    assert_valid(&sharp, l.best());
}

#[test]
fn unrelated_plates_share_one_plane() {
    let l = solve(&PlateGraph::empty(4));
    assert_eq!(l.score, 1);
    assert_eq!(l.solutions, vec![vec![0; 4]]);
    assert_eq!(l.planes().planes, vec![vec![A, B, C, D]]);
}

#[test]
fn intersecting_pair_is_split() {
    let mut g = PlateGraph::empty(2);
    g.intersect(A, B);
    let l = solve(&g);
    assert!(l.score >= 2);
    assert_ne!(l.best()[0], l.best()[1]);
}

#[test]
fn enumerating_ties_keeps_distinct_optima() {
    let cfg = LayerCfg {
        enumerate_ties: true,
        ..LayerCfg::default()
    };
    let g = hard();
    let l = layer_plates(&g, &cfg).unwrap();
    assert_eq!(l.score, solve(&g).score);
    assert_eq!(l.solutions, vec![vec![0, 2, 3, 1], vec![1, 2, 3, 0]]);

    for g in [four_bar(), hard(), klann()] {
        let l = layer_plates(&g, &cfg).unwrap();
        assert_eq!(l.score, solve(&g).score);
        for (i, a) in l.solutions.iter().enumerate() {
            assert_eq!(score(a), l.score);
            assert_valid(&g, a);
            for b in &l.solutions[..i] {
                assert!(!is_shift_or_mirror(a, b));
            }
        }
    }
}

#[test]
fn frame_budget() {
    let cfg = LayerCfg {
        max_frames: Some(1),
        ..LayerCfg::default()
    };
    assert_eq!(layer_plates(&four_bar(), &cfg), Err(Error::NoLayeringSolution));

    // the first complete assignment lands on the fourth placement
    let cfg = LayerCfg {
        max_frames: Some(4),
        ..LayerCfg::default()
    };
    let l = layer_plates(&PlateGraph::empty(4), &cfg).unwrap();
    assert_eq!(l.score, 1);
}

#[test]
fn no_plates_no_solution() {
    assert_eq!(
        layer_plates(&PlateGraph::empty(0), &LayerCfg::default()),
        Err(Error::NoLayeringSolution)
    );
}

#[test]
fn shift_and_mirror_detection() {
    assert!(is_shift_or_mirror(&[0, 1, 2], &[1, 2, 3]));
    assert!(is_shift_or_mirror(&[0, 1, 2], &[2, 1, 0]));
    assert!(is_shift_or_mirror(&[0, 2, 1], &[3, 1, 2]));
    assert!(!is_shift_or_mirror(&[0, 1, 2, 1], &[0, 2, 1, 1]));
    assert_eq!(score(&[3, 1, 2]), 3);
    assert_eq!(score(&[]), 0);
    assert_eq!(Planes::from_assignment(&[2, 4, 2]).planes, vec![vec![A, C], vec![], vec![B]]);
}
