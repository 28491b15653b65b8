//! Mock content types
//!
//! Every value carries the `__TYPE__` discriminator expected by preview
//! renderers and the content codec, so the serialized form of these types is
//! the persisted `mocks.json` contract.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Number;

use super::model::{BlockKind, FieldSchema};

/// Ordered mapping of field key to content
pub type ContentMap = IndexMap<String, Content>;

/// Mock content of a whole slice, one entry per variation
pub type SliceMock = Vec<SharedSliceContent>;

/// Properties of stored content that no generator writes, carried through untouched
pub type Extra = IndexMap<String, serde_json::Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "__TYPE__")]
pub enum Content {
    #[serde(rename = "FieldContent")]
    Field(FieldContent),
    #[serde(rename = "BooleanContent")]
    Boolean(BooleanContent),
    #[serde(rename = "StructuredTextContent")]
    StructuredText(StructuredTextContent),
    #[serde(rename = "ImageContent")]
    Image(ImageContent),
    #[serde(rename = "LinkContent")]
    Link(LinkContent),
    #[serde(rename = "GeoPointContent")]
    GeoPoint(GeoPointContent),
    #[serde(rename = "EmbedContent")]
    Embed(EmbedContent),
    #[serde(rename = "GroupContentType")]
    Group(GroupContent),
}

impl Content {
    /// The discriminator written as `__TYPE__`
    pub fn type_name(&self) -> &'static str {
        match self {
            Content::Field(_) => "FieldContent",
            Content::Boolean(_) => "BooleanContent",
            Content::StructuredText(_) => "StructuredTextContent",
            Content::Image(_) => "ImageContent",
            Content::Link(_) => "LinkContent",
            Content::GeoPoint(_) => "GeoPointContent",
            Content::Embed(_) => "EmbedContent",
            Content::Group(_) => "GroupContentType",
        }
    }

    /// Whether this content has the shape a field of the given kind produces
    pub fn matches(&self, field: &FieldSchema) -> bool {
        match (self, field) {
            (Content::Field(c), FieldSchema::Text(_)) => c.kind == FieldKind::Text,
            (Content::Field(c), FieldSchema::Select(_)) => c.kind == FieldKind::Select,
            (Content::Field(c), FieldSchema::Number(_)) => c.kind == FieldKind::Number,
            (Content::Field(c), FieldSchema::Date(_)) => c.kind == FieldKind::Date,
            (Content::Field(c), FieldSchema::Timestamp(_)) => c.kind == FieldKind::Timestamp,
            (Content::Field(c), FieldSchema::Color(_)) => c.kind == FieldKind::Color,
            (Content::Boolean(_), FieldSchema::Boolean(_)) => true,
            (Content::StructuredText(_), FieldSchema::StructuredText(_)) => true,
            (Content::Image(_), FieldSchema::Image(_)) => true,
            (Content::Link(_), FieldSchema::Link(_)) => true,
            (Content::GeoPoint(_), FieldSchema::GeoPoint(_)) => true,
            (Content::Embed(_), FieldSchema::Embed(_)) => true,
            (Content::Group(group), FieldSchema::Group(config)) => group.value.iter().all(|item| {
                item.value.iter().all(|(key, content)| {
                    config.fields.get(key).map_or(false, |field| content.matches(field))
                })
            }),
            _ => false,
        }
    }
}

/// Scalar field kinds sharing the `FieldContent` shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    Text,
    Select,
    Number,
    Date,
    Timestamp,
    Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldContent {
    pub value: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
}

impl FieldContent {
    pub fn new(kind: FieldKind, value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BooleanContent {
    pub value: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredTextContent {
    pub value: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Block {
    Text(TextBlock),
    Image(ImageBlock),
    Embed(EmbedBlock),
}

impl Block {
    pub fn kind(&self) -> BlockKind {
        match self {
            Block::Text(block) => block.kind,
            Block::Image(_) => BlockKind::Image,
            Block::Embed(_) => BlockKind::Embed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    #[serde(rename = "type")]
    pub kind: BlockKind,
    pub content: TextBlockContent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl TextBlock {
    pub fn new(kind: BlockKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            content: TextBlockContent {
                text: text.into(),
                spans: Vec::new(),
            },
            direction: None,
            extra: Extra::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlockContent {
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub spans: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageBlock {
    #[serde(rename = "type")]
    pub kind: ImageBlockTag,
    pub data: ImageView,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageBlockTag {
    #[serde(rename = "image")]
    Image,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedBlock {
    #[serde(rename = "type")]
    pub kind: EmbedBlockTag,
    pub data: EmbedContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmbedBlockTag {
    #[serde(rename = "embed")]
    Embed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageOrigin {
    pub id: String,
    pub url: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageEdit {
    pub zoom: Number,
    pub crop: ImageCrop,
    pub background: String,
}

impl Default for ImageEdit {
    fn default() -> Self {
        Self {
            zoom: Number::from(1),
            crop: ImageCrop::default(),
            background: "transparent".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageCrop {
    pub x: Number,
    pub y: Number,
}

impl Default for ImageCrop {
    fn default() -> Self {
        Self {
            x: Number::from(0),
            y: Number::from(0),
        }
    }
}

/// An image rendition: the main image or one of its thumbnails
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageView {
    pub origin: ImageOrigin,
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub edit: ImageEdit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageContent {
    pub origin: ImageOrigin,
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub edit: ImageEdit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default)]
    pub thumbnails: IndexMap<String, ImageView>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl ImageContent {
    pub fn from_view(view: ImageView, thumbnails: IndexMap<String, ImageView>) -> Self {
        Self {
            origin: view.origin,
            url: view.url,
            width: view.width,
            height: view.height,
            edit: view.edit,
            credits: view.credits,
            alt: view.alt,
            provider: view.provider,
            thumbnails,
            extra: view.extra,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkContent {
    pub value: LinkValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "__TYPE__")]
pub enum LinkValue {
    #[serde(rename = "DocumentLink")]
    Document {
        id: String,
        #[serde(flatten)]
        extra: Extra,
    },
    #[serde(rename = "ExternalLink")]
    External {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<String>,
        #[serde(flatten)]
        extra: Extra,
    },
    #[serde(rename = "ImageLink")]
    Image {
        id: String,
        url: String,
        name: String,
        kind: String,
        size: String,
        width: String,
        height: String,
        #[serde(flatten)]
        extra: Extra,
    },
}

impl LinkValue {
    pub fn document(id: impl Into<String>) -> Self {
        LinkValue::Document {
            id: id.into(),
            extra: Extra::new(),
        }
    }

    pub fn external(url: impl Into<String>, target: Option<String>) -> Self {
        LinkValue::External {
            url: url.into(),
            target,
            extra: Extra::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPointContent {
    pub position: GeoPosition,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPosition {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPosition {
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedContent {
    pub embed_url: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupContent {
    pub value: Vec<GroupItemContent>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupItemTag {
    #[default]
    GroupItemContent,
}

/// One repeatable instance: an ordered list of `[key, content]` pairs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupItemContent {
    #[serde(rename = "__TYPE__")]
    pub tag: GroupItemTag,
    pub value: Vec<(String, Content)>,
}

impl GroupItemContent {
    pub fn from_map(map: ContentMap) -> Self {
        Self {
            tag: GroupItemTag::GroupItemContent,
            value: map.into_iter().collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Content> {
        self.value.iter().find(|(k, _)| k == key).map(|(_, c)| c)
    }

    pub fn to_map(&self) -> ContentMap {
        self.value.iter().cloned().collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SliceContentTag {
    #[default]
    SharedSliceContent,
}

/// Mock content of a single variation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedSliceContent {
    #[serde(rename = "__TYPE__")]
    pub tag: SliceContentTag,
    pub variation: String,
    #[serde(default)]
    pub primary: ContentMap,
    #[serde(default, deserialize_with = "deserialize_items")]
    pub items: Vec<GroupItemContent>,
}

impl SharedSliceContent {
    pub fn new(variation: impl Into<String>, primary: ContentMap, items: Vec<GroupItemContent>) -> Self {
        Self {
            tag: SliceContentTag::SharedSliceContent,
            variation: variation.into(),
            primary,
            items,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ItemsRepr {
    List(Vec<GroupItemContent>),
    Empty(IndexMap<String, serde_json::Value>),
}

/// Older mocks wrote an empty items zone as `{}`; read it as no instances.
fn deserialize_items<'de, D>(deserializer: D) -> Result<Vec<GroupItemContent>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<ItemsRepr>::deserialize(deserializer)? {
        None => Ok(Vec::new()),
        Some(ItemsRepr::List(items)) => Ok(items),
        Some(ItemsRepr::Empty(map)) if map.is_empty() => Ok(Vec::new()),
        Some(ItemsRepr::Empty(_)) => Err(serde::de::Error::custom(
            "items must be an array of GroupItemContent",
        )),
    }
}
