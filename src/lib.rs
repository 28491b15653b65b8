//! # slicemock - Slice mock content reconciler
//!
//! Generates schema-valid placeholder content for the variations of a slice
//! model and keeps it in step as the model is edited. Content the user has
//! not touched survives edits; configured overrides always win.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use slicemock::config::GeneratorSettings;
//! use slicemock::domain::mock_config::MockConfig;
//! use slicemock::domain::model::SliceSchema;
//! use slicemock::mock::MockReconciler;
//!
//! fn main() -> anyhow::Result<()> {
//!     let model: SliceSchema = serde_json::from_str(&std::fs::read_to_string("model.json")?)?;
//!
//!     let mut reconciler = MockReconciler::new(GeneratorSettings::seeded(42));
//!     let mocks = reconciler.reconcile(&model, &MockConfig::default(), &[], None)?;
//!
//!     println!("{}", serde_json::to_string_pretty(&mocks)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **Domain**: slice models, mock content, diffs and mock config
//! - **Mock**: field generators, override layer, variation builder, reconciler
//! - **Adapters**: filesystem store and model watcher
//! - **Config**: settings loading and validation

pub mod adapters;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod mock;

pub use domain::content::{SharedSliceContent, SliceMock};
pub use domain::diff::SliceDiff;
pub use domain::mock_config::MockConfig;
pub use domain::model::SliceSchema;
pub use mock::{MockError, MockReconciler};
