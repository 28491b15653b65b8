//! Diff-aware reconciler
//!
//! Decides, per variation of the current model, whether its mock content is
//! reused, patched or generated from scratch.

use rand::rngs::StdRng;
use rand::Rng;
use tracing::{debug, warn};

use crate::config::GeneratorSettings;
use crate::domain::content::{SharedSliceContent, SliceMock};
use crate::domain::diff::{SliceDiff, VariationChanges, VariationDiff};
use crate::domain::mock_config::MockConfig;
use crate::domain::model::SliceSchema;
use crate::mock::error::MockResult;
use crate::mock::generator::MockGenerator;
use crate::mock::overrides::VariationOverrides;

/// How a variation's content is produced in a reconciliation pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VariationStatus<'a> {
    /// Previous content reused, patched only for new fields
    Unchanged,
    /// Generated from scratch
    Added,
    /// Previous content reused, changed fields regenerated
    Updated(&'a VariationChanges),
    /// Left out of the output
    Removed,
}

pub struct MockReconciler<R: Rng = StdRng> {
    generator: MockGenerator<R>,
}

impl MockReconciler<StdRng> {
    pub fn new(settings: GeneratorSettings) -> Self {
        Self::with_generator(MockGenerator::from_settings(settings))
    }
}

impl<R: Rng> MockReconciler<R> {
    pub fn with_generator(generator: MockGenerator<R>) -> Self {
        Self { generator }
    }

    /// Produce the mock content for `slice`.
    ///
    /// Output follows the model's variation order. Content for variations
    /// that are no longer in the model is dropped.
    pub fn reconcile(
        &mut self,
        slice: &SliceSchema,
        config: &MockConfig,
        previous: &[SharedSliceContent],
        diff: Option<&SliceDiff>,
    ) -> MockResult<SliceMock> {
        if let Some(SliceDiff::Removed(_)) = diff {
            debug!(slice = %slice.id, "Slice removed, no mocks to produce");
            return Ok(Vec::new());
        }

        if let Some(SliceDiff::Updated(changes)) = diff {
            for (id, entry) in &changes.variations {
                if slice.variation(id).is_none() && !matches!(entry, VariationDiff::Removed(_)) {
                    warn!(slice = %slice.id, variation = %id, "Ignoring diff entry for a variation missing from the model");
                }
            }
        }

        let mut mocks = Vec::with_capacity(slice.variations.len());

        for variation in &slice.variations {
            let prior = previous.iter().find(|p| p.variation == variation.id);
            let status = classify(&variation.id, prior.is_some(), diff);
            let overrides = VariationOverrides::resolve(variation, config.variation(&variation.id))?;

            debug!(slice = %slice.id, variation = %variation.id, ?status, "Reconciling variation");

            let content = match status {
                VariationStatus::Removed => continue,
                VariationStatus::Added => self.generator.build_variation(variation, &overrides, None)?,
                VariationStatus::Unchanged => self.generator.build_variation(variation, &overrides, prior)?,
                VariationStatus::Updated(changes) => match prior {
                    Some(prior) => self.generator.update_variation(variation, &overrides, prior, changes)?,
                    None => self.generator.build_variation(variation, &overrides, None)?,
                },
            };
            mocks.push(content);
        }

        Ok(mocks)
    }
}

/// Classify a variation of the current model against the diff
pub fn classify<'a>(id: &str, has_previous: bool, diff: Option<&'a SliceDiff>) -> VariationStatus<'a> {
    let entry = match diff {
        Some(SliceDiff::Added(_)) => return VariationStatus::Added,
        Some(SliceDiff::Removed(_)) => return VariationStatus::Removed,
        Some(SliceDiff::Updated(changes)) => changes.variations.get(id),
        None => None,
    };

    match entry {
        Some(VariationDiff::Removed(_)) => VariationStatus::Removed,
        Some(VariationDiff::Added(_)) => VariationStatus::Added,
        Some(VariationDiff::Updated(_)) if !has_previous => VariationStatus::Added,
        Some(VariationDiff::Updated(changes)) => VariationStatus::Updated(changes),
        None if has_previous => VariationStatus::Unchanged,
        None => VariationStatus::Added,
    }
}
