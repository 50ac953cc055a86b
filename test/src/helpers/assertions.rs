/// Assert that a 2D vector is within `epsilon` of the expected one on both
/// axes
#[macro_export]
macro_rules! assert_vec2_near {
    ($actual:expr, $expected:expr) => {
        $crate::assert_vec2_near!($actual, $expected, 1e-4)
    };
    ($actual:expr, $expected:expr, $epsilon:expr) => {{
        let actual: perch_shared::Vec2 = $actual;
        let expected: perch_shared::Vec2 = $expected;
        assert!(
            (actual.x - expected.x).abs() <= $epsilon && (actual.y - expected.y).abs() <= $epsilon,
            "expected {:?} to be within {} of {:?}",
            actual,
            $epsilon,
            expected
        );
    }};
}

/// Assert that the server and client copies of an object hold the same
/// full snapshot
#[macro_export]
macro_rules! assert_in_sync {
    ($peers:expr, $key:expr) => {
        assert!(
            $peers.in_sync($key),
            "server and client disagree on {}",
            $key
        );
    };
}
