//! Config override layer
//!
//! Raw override values from the mock config are checked against the field
//! they target before they are merged, so a value of the wrong shape is
//! reported instead of reaching a preview renderer.

use chrono::{DateTime, NaiveDate};
use indexmap::IndexMap;
use serde_json::Value;
use tracing::warn;

use crate::domain::content::{
    Block, BooleanContent, Content, ContentMap, EmbedContent, Extra, FieldContent, FieldKind,
    GeoPointContent, GeoPosition, GroupContent, GroupItemContent, LinkContent, LinkValue,
    StructuredTextContent, TextBlock,
};
use crate::domain::mock_config::VariationMockConfig;
use crate::domain::model::{FieldMap, FieldSchema, VariationSchema};
use crate::mock::error::{MockError, MockResult, Zone};
use crate::mock::generator::ensure_field_supported;

/// Validated overrides for one variation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariationOverrides {
    pub primary: ContentMap,
    /// Applied to every repeatable item instance
    pub items: ContentMap,
}

impl VariationOverrides {
    pub fn resolve(variation: &VariationSchema, config: Option<&VariationMockConfig>) -> MockResult<Self> {
        match config {
            None => Ok(Self::default()),
            Some(config) => Ok(Self {
                primary: resolve_zone(&variation.id, Zone::Primary, &variation.primary, &config.primary)?,
                items: resolve_zone(&variation.id, Zone::Items, &variation.items, &config.items)?,
            }),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_empty() && self.items.is_empty()
    }
}

fn resolve_zone(
    variation: &str,
    zone: Zone,
    fields: &FieldMap,
    raw: &IndexMap<String, Value>,
) -> MockResult<ContentMap> {
    let mut resolved = ContentMap::with_capacity(raw.len());

    for (key, value) in raw {
        let field = match fields.get(key) {
            Some(field) => field,
            None => {
                warn!(variation, %zone, field = %key, "Ignoring override for a field missing from the model");
                continue;
            }
        };

        ensure_field_supported(&format!("{}.{}.{}", variation, zone, key), field)?;

        let content = parse_override(field, value).map_err(|reason| MockError::MalformedOverride {
            variation: variation.to_string(),
            zone,
            field: key.clone(),
            reason,
        })?;
        resolved.insert(key.clone(), content);
    }

    Ok(resolved)
}

/// Replace generated values with overrides, keeping key order.
///
/// An override replaces the whole value of its field.
pub fn apply_overrides(mut generated: ContentMap, overrides: &ContentMap) -> ContentMap {
    for (key, value) in overrides {
        generated.insert(key.clone(), value.clone());
    }
    generated
}

/// Convert one raw override into content for `field`.
///
/// Accepts tagged content, the legacy `{"content": ...}` wrapper, or a
/// shorthand literal for the field's kind.
pub fn parse_override(field: &FieldSchema, raw: &Value) -> Result<Content, String> {
    let raw = unwrap_legacy(raw);

    if raw.get("__TYPE__").is_some() {
        let content: Content =
            serde_json::from_value(raw.clone()).map_err(|e| format!("Invalid content: {}", e))?;
        return if content.matches(field) {
            Ok(content)
        } else {
            Err(format!("{} does not fit a {} field", content.type_name(), field.kind()))
        };
    }

    match field {
        FieldSchema::Text(_) => Ok(field_content(FieldKind::Text, expect_str(raw)?)),
        FieldSchema::Select(config) => {
            let value = expect_str(raw)?;
            if !config.options.is_empty() && !config.options.iter().any(|o| o == value) {
                return Err(format!("'{}' is not one of {:?}", value, config.options));
            }
            Ok(field_content(FieldKind::Select, value))
        }
        FieldSchema::Date(_) => {
            let value = expect_str(raw)?;
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .map_err(|e| format!("'{}' is not a YYYY-MM-DD date: {}", value, e))?;
            Ok(field_content(FieldKind::Date, value))
        }
        FieldSchema::Timestamp(_) => {
            let value = expect_str(raw)?;
            DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%z")
                .or_else(|_| DateTime::parse_from_rfc3339(value))
                .map_err(|e| format!("'{}' is not a timestamp: {}", value, e))?;
            Ok(field_content(FieldKind::Timestamp, value))
        }
        FieldSchema::Color(_) => {
            let value = expect_str(raw)?;
            if !is_hex_color(value) {
                return Err(format!("'{}' is not a #rrggbb color", value));
            }
            Ok(field_content(FieldKind::Color, value))
        }
        FieldSchema::Number(_) => match raw {
            Value::Number(n) => Ok(field_content(FieldKind::Number, &n.to_string())),
            Value::String(s) if s.parse::<f64>().is_ok() => Ok(field_content(FieldKind::Number, s)),
            other => Err(format!("Expected a number, got {}", other)),
        },
        FieldSchema::Boolean(_) => raw
            .as_bool()
            .map(|value| Content::Boolean(BooleanContent { value }))
            .ok_or_else(|| format!("Expected a boolean, got {}", raw)),
        FieldSchema::StructuredText(config) => {
            let text = expect_str(raw)?;
            let kind = config.first_block();
            if !kind.is_text() {
                return Err(format!(
                    "Text cannot fill a rich text field whose first block is {:?}",
                    kind
                ));
            }
            Ok(Content::StructuredText(StructuredTextContent {
                value: vec![Block::Text(TextBlock::new(kind, text))],
            }))
        }
        FieldSchema::Link(_) => {
            let target = expect_str(raw)?;
            let value = if target.starts_with("http://") || target.starts_with("https://") {
                LinkValue::external(target, None)
            } else if !target.is_empty() && target.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
                LinkValue::document(target)
            } else {
                return Err(format!("'{}' is neither a URL nor a document id", target));
            };
            Ok(Content::Link(LinkContent { value }))
        }
        FieldSchema::Image(_) => Err("an image override must be full ImageContent".to_string()),
        FieldSchema::GeoPoint(_) => {
            let position: GeoPosition = serde_json::from_value(raw.clone())
                .map_err(|e| format!("Expected {{lat, lng}}: {}", e))?;
            if !position.is_valid() {
                return Err(format!("Coordinates out of range: {}, {}", position.lat, position.lng));
            }
            Ok(Content::GeoPoint(GeoPointContent { position }))
        }
        FieldSchema::Embed(_) => {
            let url = expect_str(raw)?;
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(format!("'{}' is not an embed URL", url));
            }
            Ok(Content::Embed(EmbedContent {
                embed_url: url.to_string(),
                kind: "link".to_string(),
                version: None,
                title: None,
                provider_name: None,
                html: None,
                extra: Extra::new(),
            }))
        }
        FieldSchema::Group(config) => {
            let items = raw
                .as_array()
                .ok_or_else(|| format!("Expected an array of group items, got {}", raw))?;
            let mut value = Vec::with_capacity(items.len());
            for item in items {
                let object = item
                    .as_object()
                    .ok_or_else(|| format!("Expected a group item object, got {}", item))?;
                let mut content = ContentMap::with_capacity(object.len());
                for (key, nested) in object {
                    let nested_field = config
                        .fields
                        .get(key)
                        .ok_or_else(|| format!("Group has no field '{}'", key))?;
                    let parsed = parse_override(nested_field, nested).map_err(|e| format!("{}: {}", key, e))?;
                    content.insert(key.clone(), parsed);
                }
                value.push(GroupItemContent::from_map(content));
            }
            Ok(Content::Group(GroupContent { value }))
        }
        FieldSchema::SliceZone(_) | FieldSchema::Unsupported { .. } => {
            Err(format!("Field kind '{}' has no content shape", field.kind()))
        }
    }
}

fn unwrap_legacy(raw: &Value) -> &Value {
    match raw.as_object() {
        Some(object) if object.len() == 1 => object.get("content").unwrap_or(raw),
        _ => raw,
    }
}

fn expect_str(raw: &Value) -> Result<&str, String> {
    raw.as_str().ok_or_else(|| format!("Expected a string, got {}", raw))
}

fn field_content(kind: FieldKind, value: &str) -> Content {
    Content::Field(FieldContent::new(kind, value))
}

fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}
