//! Shared test utilities for the trackmap workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Synthetic track/activity generators
//! - Common test fixtures (known polylines, small activity sets)
//! - A float-tolerance assertion for projection and geometry tests
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod fixtures;
pub mod generators;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;

/// Assert that two floats agree within `tol`.
///
/// Mercator projection and polyline quantization are exact only up to
/// rounding, so the geometry tests compare against an explicit tolerance
/// instead of `assert_eq!`.
///
/// ```
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(0.1 + 0.2, 0.3, 1e-12);
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $tol:expr) => {{
        let (left, right, tol) = ($left as f64, $right as f64, $tol as f64);
        let diff = (left - right).abs();
        assert!(
            diff <= tol,
            "{left} and {right} differ by {diff}, more than the allowed {tol}"
        );
    }};
}
