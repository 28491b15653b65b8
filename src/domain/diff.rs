//! Structural diffs between two versions of a slice model

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::model::{FieldMap, FieldSchema, SliceSchema, VariationSchema};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "value", rename_all = "lowercase")]
pub enum SliceDiff {
    Added(SliceSchema),
    Removed(SliceSchema),
    Updated(SliceChanges),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SliceChanges {
    #[serde(default)]
    pub variations: IndexMap<String, VariationDiff>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "value", rename_all = "lowercase")]
pub enum VariationDiff {
    Added(VariationSchema),
    Removed(VariationSchema),
    Updated(VariationChanges),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariationChanges {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub primary: IndexMap<String, FieldDiff>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub items: IndexMap<String, FieldDiff>,
}

impl VariationChanges {
    pub fn is_empty(&self) -> bool {
        self.primary.is_empty() && self.items.is_empty()
    }

    /// Primary keys whose content must be regenerated
    pub fn regenerated_primary(&self) -> impl Iterator<Item = &str> {
        regenerated(&self.primary)
    }

    /// Item keys whose content must be regenerated
    pub fn regenerated_items(&self) -> impl Iterator<Item = &str> {
        regenerated(&self.items)
    }
}

fn regenerated(diffs: &IndexMap<String, FieldDiff>) -> impl Iterator<Item = &str> {
    diffs
        .iter()
        .filter(|(_, diff)| !matches!(diff, FieldDiff::Removed(_)))
        .map(|(key, _)| key.as_str())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "value", rename_all = "lowercase")]
pub enum FieldDiff {
    Added(FieldSchema),
    Removed(FieldSchema),
    Updated(FieldSchema),
}

impl SliceDiff {
    /// Compare two versions of a slice model. Returns `None` when the
    /// variations and their fields are identical.
    pub fn between(old: &SliceSchema, new: &SliceSchema) -> Option<SliceDiff> {
        let mut variations = IndexMap::new();

        for variation in &new.variations {
            match old.variation(&variation.id) {
                None => {
                    variations.insert(variation.id.clone(), VariationDiff::Added(variation.clone()));
                }
                Some(previous) => {
                    let changes = VariationChanges {
                        primary: compare_fields(&previous.primary, &variation.primary),
                        items: compare_fields(&previous.items, &variation.items),
                    };
                    if !changes.is_empty() {
                        variations.insert(variation.id.clone(), VariationDiff::Updated(changes));
                    }
                }
            }
        }

        for variation in &old.variations {
            if new.variation(&variation.id).is_none() {
                variations.insert(variation.id.clone(), VariationDiff::Removed(variation.clone()));
            }
        }

        if variations.is_empty() {
            None
        } else {
            Some(SliceDiff::Updated(SliceChanges { variations }))
        }
    }
}

fn compare_fields(old: &FieldMap, new: &FieldMap) -> IndexMap<String, FieldDiff> {
    let mut diffs = IndexMap::new();
    for (key, field) in new {
        match old.get(key) {
            None => {
                diffs.insert(key.clone(), FieldDiff::Added(field.clone()));
            }
            Some(previous) if previous != field => {
                diffs.insert(key.clone(), FieldDiff::Updated(field.clone()));
            }
            Some(_) => {}
        }
    }
    for (key, field) in old {
        if !new.contains_key(key) {
            diffs.insert(key.clone(), FieldDiff::Removed(field.clone()));
        }
    }
    diffs
}
