//! Consistency checks for face groups and matrices.
//!
//! Validated types implement [`DebugInvariants`]. Constructors re-check
//! through [`debug_invariants!`](crate::debug_invariants), which compiles to
//! nothing in release builds unless `check-invariants` or `strict-invariants`
//! is enabled.

use crate::flux_error::FluxError;

/// A type that can re-verify its own structure.
pub trait DebugInvariants {
    /// First violation found, if any.
    fn validate_invariants(&self) -> Result<(), FluxError>;

    /// Panics if [`validate_invariants`](Self::validate_invariants) fails and
    /// checking is compiled in.
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "debug_assert_invariants");
    }
}

/// `debug_invariants!(check, "context")` panics with `context` and the error
/// when `check` is `Err`. Expands to an empty block when checking is off.
#[macro_export]
macro_rules! debug_invariants {
    ($checked:expr, $ctx:literal) => {{
        #[cfg(any(
            debug_assertions,
            feature = "check-invariants",
            feature = "strict-invariants"
        ))]
        {
            if let ::core::result::Result::Err(err) = $checked {
                panic!("{} found a broken invariant: {}", $ctx, err);
            }
        }
    }};
}
