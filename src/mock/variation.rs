//! Variation mock builder

use rand::Rng;
use tracing::debug;

use crate::domain::content::{ContentMap, GroupItemContent, SharedSliceContent};
use crate::domain::diff::VariationChanges;
use crate::domain::model::{FieldMap, VariationSchema};
use crate::mock::error::MockResult;
use crate::mock::generator::{ensure_supported, MockGenerator};
use crate::mock::overrides::{apply_overrides, VariationOverrides};

impl<R: Rng> MockGenerator<R> {
    /// Build the content of one variation.
    ///
    /// Without `previous` everything is generated. With it, existing values
    /// are kept in their order, values for fields gone from the model are
    /// dropped and only missing fields are generated. Overrides always win.
    pub fn build_variation(
        &mut self,
        variation: &VariationSchema,
        overrides: &VariationOverrides,
        previous: Option<&SharedSliceContent>,
    ) -> MockResult<SharedSliceContent> {
        self.rebuild_variation(variation, overrides, previous, &[], &[])
    }

    /// Patch `previous` after a model edit, regenerating in place the fields
    /// that `changes` marks as added or updated.
    pub fn update_variation(
        &mut self,
        variation: &VariationSchema,
        overrides: &VariationOverrides,
        previous: &SharedSliceContent,
        changes: &VariationChanges,
    ) -> MockResult<SharedSliceContent> {
        let stale_primary: Vec<&str> = changes.regenerated_primary().collect();
        let stale_items: Vec<&str> = changes.regenerated_items().collect();
        self.rebuild_variation(variation, overrides, Some(previous), &stale_primary, &stale_items)
    }

    fn rebuild_variation(
        &mut self,
        variation: &VariationSchema,
        overrides: &VariationOverrides,
        previous: Option<&SharedSliceContent>,
        stale_primary: &[&str],
        stale_items: &[&str],
    ) -> MockResult<SharedSliceContent> {
        ensure_supported(&variation.id, &variation.primary)?;
        ensure_supported(&variation.id, &variation.items)?;

        let (primary, items) = match previous {
            None => {
                let primary = apply_overrides(self.generate_fields(&variation.primary)?, &overrides.primary);
                (primary, self.generate_items(&variation.items, &overrides.items)?)
            }
            Some(previous) => {
                let primary = self.patch_zone(&variation.primary, &previous.primary, &overrides.primary, stale_primary)?;
                let items = if previous.items.is_empty() {
                    self.generate_items(&variation.items, &overrides.items)?
                } else {
                    let mut items = Vec::with_capacity(previous.items.len());
                    for item in &previous.items {
                        let patched = self.patch_zone(&variation.items, &item.to_map(), &overrides.items, stale_items)?;
                        items.push(GroupItemContent::from_map(patched));
                    }
                    items
                };
                (primary, items)
            }
        };

        Ok(SharedSliceContent::new(variation.id.clone(), primary, items))
    }

    fn generate_items(&mut self, fields: &FieldMap, overrides: &ContentMap) -> MockResult<Vec<GroupItemContent>> {
        if fields.is_empty() {
            return Ok(Vec::new());
        }

        let count = self.settings().items_count;
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            let generated = apply_overrides(self.generate_fields(fields)?, overrides);
            items.push(GroupItemContent::from_map(generated));
        }
        Ok(items)
    }

    /// Keep previous values that still fit the model, generate the rest
    fn patch_zone(
        &mut self,
        fields: &FieldMap,
        previous: &ContentMap,
        overrides: &ContentMap,
        stale: &[&str],
    ) -> MockResult<ContentMap> {
        let mut patched = ContentMap::with_capacity(fields.len());

        for (key, content) in previous {
            match fields.get(key) {
                Some(field) if stale.contains(&key.as_str()) => {
                    debug!(field = %key, "Regenerating changed field");
                    patched.insert(key.clone(), self.generate(key, field)?);
                }
                Some(field) if content.matches(field) => {
                    patched.insert(key.clone(), content.clone());
                }
                Some(field) => {
                    debug!(field = %key, kind = field.kind(), "Regenerating content that no longer fits its field");
                    patched.insert(key.clone(), self.generate(key, field)?);
                }
                None => debug!(field = %key, "Dropping content of a removed field"),
            }
        }

        for (key, field) in fields {
            if !patched.contains_key(key) {
                patched.insert(key.clone(), self.generate(key, field)?);
            }
        }

        Ok(apply_overrides(patched, overrides))
    }
}
