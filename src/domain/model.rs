//! Slice model types
//!
//! Mirrors the CMS model JSON: a slice owns ordered variations, each with a
//! `primary` zone and a repeatable `items` zone of typed fields.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Ordered mapping of field key to field schema
pub type FieldMap = IndexMap<String, FieldSchema>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliceSchema {
    pub id: String,
    #[serde(rename = "type", default = "default_slice_type")]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub variations: Vec<VariationSchema>,
}

fn default_slice_type() -> String {
    "SharedSlice".to_string()
}

impl SliceSchema {
    pub fn variation(&self, id: &str) -> Option<&VariationSchema> {
        self.variations.iter().find(|v| v.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariationSchema {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "docURL", default, skip_serializing_if = "Option::is_none")]
    pub doc_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(rename = "imageUrl", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "deserialize_field_map")]
    pub primary: FieldMap,
    #[serde(default, deserialize_with = "deserialize_field_map")]
    pub items: FieldMap,
}

/// A field definition, dispatched on its `type` tag.
///
/// Unknown kinds load as [`FieldSchema::Unsupported`] so that a model can be
/// read and diffed even when no generator exists for one of its fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawField", into = "RawField")]
pub enum FieldSchema {
    Text(TextConfig),
    StructuredText(StructuredTextConfig),
    Image(ImageConfig),
    Link(LinkConfig),
    GeoPoint(BasicConfig),
    Boolean(BooleanConfig),
    Number(NumberConfig),
    Date(DateConfig),
    Timestamp(DateConfig),
    Color(BasicConfig),
    Select(SelectConfig),
    Embed(TextConfig),
    Group(GroupConfig),
    SliceZone(Value),
    Unsupported { kind: String, config: Value },
}

impl FieldSchema {
    /// The model `type` string of this field
    pub fn kind(&self) -> &str {
        match self {
            FieldSchema::Text(_) => "Text",
            FieldSchema::StructuredText(_) => "StructuredText",
            FieldSchema::Image(_) => "Image",
            FieldSchema::Link(_) => "Link",
            FieldSchema::GeoPoint(_) => "GeoPoint",
            FieldSchema::Boolean(_) => "Boolean",
            FieldSchema::Number(_) => "Number",
            FieldSchema::Date(_) => "Date",
            FieldSchema::Timestamp(_) => "Timestamp",
            FieldSchema::Color(_) => "Color",
            FieldSchema::Select(_) => "Select",
            FieldSchema::Embed(_) => "Embed",
            FieldSchema::Group(_) => "Group",
            FieldSchema::SliceZone(_) => "Slices",
            FieldSchema::Unsupported { kind, .. } => kind,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawField {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    config: Value,
}

fn config_from<T: for<'de> Deserialize<'de> + Default>(kind: &str, config: Value) -> Result<T, String> {
    if config.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(config).map_err(|e| format!("Invalid {} config: {}", kind, e))
}

/// Empty configs are omitted on output
fn config_to<T: Serialize>(config: &T) -> Value {
    match serde_json::to_value(config) {
        Ok(Value::Object(map)) if map.is_empty() => Value::Null,
        Ok(value) => value,
        Err(_) => Value::Null,
    }
}

impl TryFrom<RawField> for FieldSchema {
    type Error = String;

    fn try_from(raw: RawField) -> Result<Self, Self::Error> {
        let RawField { kind, config } = raw;
        let field = match kind.as_str() {
            "Text" => FieldSchema::Text(config_from(&kind, config)?),
            "StructuredText" => FieldSchema::StructuredText(config_from(&kind, config)?),
            "Image" => FieldSchema::Image(config_from(&kind, config)?),
            "Link" => FieldSchema::Link(config_from(&kind, config)?),
            "GeoPoint" => FieldSchema::GeoPoint(config_from(&kind, config)?),
            "Boolean" => FieldSchema::Boolean(config_from(&kind, config)?),
            "Number" => FieldSchema::Number(config_from(&kind, config)?),
            "Date" => FieldSchema::Date(config_from(&kind, config)?),
            "Timestamp" => FieldSchema::Timestamp(config_from(&kind, config)?),
            "Color" => FieldSchema::Color(config_from(&kind, config)?),
            "Select" => FieldSchema::Select(config_from(&kind, config)?),
            "Embed" => FieldSchema::Embed(config_from(&kind, config)?),
            "Group" => FieldSchema::Group(config_from(&kind, config)?),
            "Slices" => FieldSchema::SliceZone(config),
            _ => FieldSchema::Unsupported { kind, config },
        };
        Ok(field)
    }
}

impl From<FieldSchema> for RawField {
    fn from(field: FieldSchema) -> Self {
        let kind = field.kind().to_string();
        let config = match field {
            FieldSchema::Text(c) | FieldSchema::Embed(c) => config_to(&c),
            FieldSchema::StructuredText(c) => config_to(&c),
            FieldSchema::Image(c) => config_to(&c),
            FieldSchema::Link(c) => config_to(&c),
            FieldSchema::GeoPoint(c) | FieldSchema::Color(c) => config_to(&c),
            FieldSchema::Boolean(c) => config_to(&c),
            FieldSchema::Number(c) => config_to(&c),
            FieldSchema::Date(c) | FieldSchema::Timestamp(c) => config_to(&c),
            FieldSchema::Select(c) => config_to(&c),
            FieldSchema::Group(c) => config_to(&c),
            FieldSchema::SliceZone(config) | FieldSchema::Unsupported { config, .. } => config,
        };
        RawField { kind, config }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuredTextConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub single: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multi: Option<String>,
}

impl StructuredTextConfig {
    /// Allowed entries in configuration order, marks and block types alike
    pub fn allowed(&self) -> Vec<RichTextNode> {
        self.single
            .as_deref()
            .or(self.multi.as_deref())
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(RichTextNode::parse)
            .collect()
    }

    /// First allowed block type; paragraph when only marks are configured
    pub fn first_block(&self) -> BlockKind {
        self.allowed()
            .into_iter()
            .find_map(|node| match node {
                RichTextNode::Block(kind) => Some(kind),
                RichTextNode::Mark(_) => None,
            })
            .unwrap_or(BlockKind::Paragraph)
    }
}

/// Entry of a rich text `single`/`multi` list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RichTextNode {
    Block(BlockKind),
    Mark(MarkKind),
}

impl RichTextNode {
    pub fn parse(s: &str) -> Option<Self> {
        if let Some(mark) = MarkKind::parse(s) {
            return Some(RichTextNode::Mark(mark));
        }
        BlockKind::parse(s).map(RichTextNode::Block)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    #[serde(rename = "heading1")]
    Heading1,
    #[serde(rename = "heading2")]
    Heading2,
    #[serde(rename = "heading3")]
    Heading3,
    #[serde(rename = "heading4")]
    Heading4,
    #[serde(rename = "heading5")]
    Heading5,
    #[serde(rename = "heading6")]
    Heading6,
    #[serde(rename = "paragraph")]
    Paragraph,
    #[serde(rename = "preformatted")]
    Preformatted,
    #[serde(rename = "list-item")]
    ListItem,
    #[serde(rename = "o-list-item")]
    OListItem,
    #[serde(rename = "image")]
    Image,
    #[serde(rename = "embed")]
    Embed,
}

impl BlockKind {
    pub fn parse(s: &str) -> Option<Self> {
        let kind = match s {
            "heading1" => BlockKind::Heading1,
            "heading2" => BlockKind::Heading2,
            "heading3" => BlockKind::Heading3,
            "heading4" => BlockKind::Heading4,
            "heading5" => BlockKind::Heading5,
            "heading6" => BlockKind::Heading6,
            "paragraph" => BlockKind::Paragraph,
            "preformatted" => BlockKind::Preformatted,
            "list-item" => BlockKind::ListItem,
            "o-list-item" => BlockKind::OListItem,
            "image" => BlockKind::Image,
            "embed" => BlockKind::Embed,
            _ => return None,
        };
        Some(kind)
    }

    pub fn is_heading(self) -> bool {
        matches!(
            self,
            BlockKind::Heading1
                | BlockKind::Heading2
                | BlockKind::Heading3
                | BlockKind::Heading4
                | BlockKind::Heading5
                | BlockKind::Heading6
        )
    }

    pub fn is_text(self) -> bool {
        !matches!(self, BlockKind::Image | BlockKind::Embed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkKind {
    Strong,
    Em,
    Hyperlink,
    Label,
    Rtl,
}

impl MarkKind {
    pub fn parse(s: &str) -> Option<Self> {
        let kind = match s {
            "strong" => MarkKind::Strong,
            "em" => MarkKind::Em,
            "hyperlink" => MarkKind::Hyperlink,
            "label" => MarkKind::Label,
            "rtl" => MarkKind::Rtl,
            _ => return None,
        };
        Some(kind)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub constraint: ImageConstraint,
    pub thumbnails: Vec<ThumbnailConfig>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConstraint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThumbnailConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl ThumbnailConfig {
    pub fn constraint(&self) -> ImageConstraint {
        ImageConstraint {
            width: self.width,
            height: self.height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkSelect {
    Document,
    Web,
    Media,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub select: Option<LinkSelect>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub customtypes: Vec<String>,
    #[serde(rename = "allowTargetBlank", skip_serializing_if = "Option::is_none")]
    pub allow_target_blank: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BooleanConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder_true: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder_false: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub options: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(deserialize_with = "deserialize_field_map")]
    pub fields: FieldMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat: Option<bool>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FieldMapRepr {
    Map(FieldMap),
    List(Vec<FieldEntry>),
}

#[derive(Deserialize)]
struct FieldEntry {
    key: String,
    value: FieldSchema,
}

/// Accepts a field map either as an object keyed by field id or as the
/// editor's `[{key, value}]` list; `null` reads as empty.
pub fn deserialize_field_map<'de, D>(deserializer: D) -> Result<FieldMap, D::Error>
where
    D: Deserializer<'de>,
{
    let repr = Option::<FieldMapRepr>::deserialize(deserializer)?;
    Ok(match repr {
        None => FieldMap::new(),
        Some(FieldMapRepr::Map(map)) => map,
        Some(FieldMapRepr::List(entries)) => entries.into_iter().map(|e| (e.key, e.value)).collect(),
    })
}
