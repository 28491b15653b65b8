//! Mock content generation and reconciliation
//!
//! - [`generator`]: one generator per field kind
//! - [`overrides`]: user mock config validated and layered on top
//! - [`variation`]: builds or patches a single variation
//! - [`reconciler`]: diff-aware entry point over a whole slice

pub mod error;
pub mod generator;
pub mod overrides;
pub mod reconciler;
pub mod variation;

pub use error::{MockError, MockResult, Zone};
pub use generator::MockGenerator;
pub use overrides::{apply_overrides, parse_override, VariationOverrides};
pub use reconciler::{classify, MockReconciler, VariationStatus};

#[cfg(test)]
mod reconciler_test;
