//! Assertion helpers for canvas tests

use blockflow_core::{BlockGraph, BlockId};
use blockflow_graphics::Point;

/// Assert that a value is within `tolerance` of the expected one.
pub fn assert_approx_eq(actual: f32, expected: f32, tolerance: f32, msg: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "{}: expected {} (±{}), got {} (diff: {})",
        msg,
        expected,
        tolerance,
        actual,
        diff
    );
}

pub fn assert_point_approx_eq(actual: Point, expected: Point, tolerance: f32, msg: &str) {
    assert_approx_eq(actual.x, expected.x, tolerance, &format!("{} - x", msg));
    assert_approx_eq(actual.y, expected.y, tolerance, &format!("{} - y", msg));
}

/// Assert that following `next` from `head` visits exactly `expected`.
pub fn assert_chain(graph: &BlockGraph, head: BlockId, expected: &[BlockId]) {
    assert_eq!(graph.chain(head), expected, "chain from {head}");
}

/// Assert that the graph satisfies every topology invariant.
pub fn assert_consistent(graph: &BlockGraph) {
    if let Err(err) = graph.check_invariants() {
        panic!("graph invariants broken: {err}");
    }
}
