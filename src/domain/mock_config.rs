use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// User-supplied mock values, keyed by variation id.
///
/// Values are raw JSON until they are checked against the field they target;
/// a field without an entry is generated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MockConfig(pub IndexMap<String, VariationMockConfig>);

impl MockConfig {
    pub fn variation(&self, id: &str) -> Option<&VariationMockConfig> {
        self.0.get(id)
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(VariationMockConfig::is_empty)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariationMockConfig {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub primary: IndexMap<String, Value>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub items: IndexMap<String, Value>,
}

impl VariationMockConfig {
    pub fn is_empty(&self) -> bool {
        self.primary.is_empty() && self.items.is_empty()
    }
}
