//! Re-export public algorithms.

pub mod dispatch;
pub mod options;
#[cfg(feature = "rayon")]
pub mod parallel;
pub mod perform_flux;

pub use dispatch::{AnyTarget, perform_flux_dyn};
pub use options::{FluxMode, FluxOptions};
#[cfg(feature = "rayon")]
pub use parallel::{par_perform_flux, par_perform_flux_detailed};
pub use perform_flux::{EvaluationStats, perform_flux, perform_flux_detailed};
