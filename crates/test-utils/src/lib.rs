//! Test fixtures and builders shared by the updater crates.
//!
//! - [`fixtures`]: canned GetCapabilities documents (WMS 1.1.1 and 1.3.0,
//!   WMTS 1.0.0, WFS 1.1.0 and 2.0.0, a ServiceException report)
//! - [`generators`]: `LayerRef` builders and a Latin-1 encoder for charset tests
//!
//! Pull it in as a dev-dependency and import what a test needs:
//!
//! ```ignore
//! use test_utils::{fixtures, wms_layer, with_login};
//! ```

pub mod fixtures;
pub mod generators;

pub use generators::*;

/// Assert two numbers are within `epsilon` of each other.
///
/// Scale denominators derived from ScaleHint and tile matrices are not exact,
/// so parser tests compare them with this.
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}
