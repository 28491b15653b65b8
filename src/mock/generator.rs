//! Field mock generators
//!
//! One generator per field kind, selected by an exhaustive match on
//! [`FieldSchema`]. All randomness is drawn from the generator's own RNG so a
//! seeded generator yields reproducible content.

use chrono::Utc;
use fake::faker::internet::en::DomainSuffix;
use fake::faker::lorem::en::{Paragraph, Sentence, Word, Words};
use fake::Fake;
use indexmap::IndexMap;
use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::GeneratorSettings;
use crate::domain::content::{
    Block, BooleanContent, Content, ContentMap, EmbedBlock, EmbedBlockTag, EmbedContent, Extra,
    FieldContent, FieldKind, GeoPointContent, GeoPosition, GroupContent, GroupItemContent,
    ImageBlock, ImageBlockTag, ImageContent, ImageEdit, ImageOrigin, ImageView, LinkContent,
    LinkValue, StructuredTextContent, TextBlock,
};
use crate::domain::model::{
    BlockKind, FieldMap, FieldSchema, GroupConfig, ImageConfig, ImageConstraint, LinkConfig,
    LinkSelect, NumberConfig, StructuredTextConfig,
};
use crate::mock::error::{MockError, MockResult};

pub struct MockGenerator<R: Rng = StdRng> {
    rng: R,
    settings: GeneratorSettings,
}

impl MockGenerator<StdRng> {
    /// Seeded from `settings.seed` when present, from entropy otherwise
    pub fn from_settings(settings: GeneratorSettings) -> Self {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(rng, settings)
    }
}

impl<R: Rng> MockGenerator<R> {
    pub fn new(rng: R, settings: GeneratorSettings) -> Self {
        Self { rng, settings }
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    /// Generate schema-valid content for a single field
    pub fn generate(&mut self, key: &str, field: &FieldSchema) -> MockResult<Content> {
        let content = match field {
            FieldSchema::Text(_) => Content::Field(FieldContent::new(FieldKind::Text, self.sentence())),
            FieldSchema::StructuredText(config) => {
                Content::StructuredText(self.generate_structured_text(config))
            }
            FieldSchema::Image(config) => Content::Image(self.generate_image(config)),
            FieldSchema::Link(config) => Content::Link(self.generate_link(config)),
            FieldSchema::GeoPoint(_) => Content::GeoPoint(self.generate_geo_point()),
            FieldSchema::Boolean(config) => Content::Boolean(BooleanContent {
                value: config.default_value.unwrap_or_else(|| self.rng.gen_bool(0.5)),
            }),
            FieldSchema::Number(config) => {
                Content::Field(FieldContent::new(FieldKind::Number, self.generate_number(config)))
            }
            FieldSchema::Date(config) => {
                let value = config
                    .default
                    .clone()
                    .unwrap_or_else(|| Utc::now().format("%Y-%m-%d").to_string());
                Content::Field(FieldContent::new(FieldKind::Date, value))
            }
            FieldSchema::Timestamp(config) => {
                let value = config
                    .default
                    .clone()
                    .unwrap_or_else(|| Utc::now().format("%Y-%m-%dT%H:%M:%S%z").to_string());
                Content::Field(FieldContent::new(FieldKind::Timestamp, value))
            }
            FieldSchema::Color(_) => {
                let rgb: u32 = self.rng.gen_range(0..=0xFF_FFFF);
                Content::Field(FieldContent::new(FieldKind::Color, format!("#{:06x}", rgb)))
            }
            FieldSchema::Select(config) => {
                let value = config
                    .default_value
                    .clone()
                    .or_else(|| config.options.first().cloned())
                    .unwrap_or_default();
                Content::Field(FieldContent::new(FieldKind::Select, value))
            }
            FieldSchema::Embed(_) => Content::Embed(self.generate_embed()),
            FieldSchema::Group(config) => Content::Group(self.generate_group(key, config)?),
            FieldSchema::SliceZone(_) | FieldSchema::Unsupported { .. } => {
                return Err(MockError::UnsupportedFieldKind {
                    field: key.to_string(),
                    kind: field.kind().to_string(),
                })
            }
        };
        Ok(content)
    }

    /// Generate every field of a zone, in schema order
    pub fn generate_fields(&mut self, fields: &FieldMap) -> MockResult<ContentMap> {
        let mut content = ContentMap::with_capacity(fields.len());
        for (key, field) in fields {
            content.insert(key.clone(), self.generate(key, field)?);
        }
        Ok(content)
    }

    fn generate_group(&mut self, key: &str, config: &GroupConfig) -> MockResult<GroupContent> {
        ensure_supported(key, &config.fields)?;

        let count = match config.repeat {
            Some(false) => 1,
            _ => self.settings.group_items_count,
        };

        let mut value = Vec::with_capacity(count);
        for _ in 0..count {
            value.push(GroupItemContent::from_map(self.generate_fields(&config.fields)?));
        }
        Ok(GroupContent { value })
    }

    fn generate_structured_text(&mut self, config: &StructuredTextConfig) -> StructuredTextContent {
        let block = match config.first_block() {
            BlockKind::Image => Block::Image(ImageBlock {
                kind: ImageBlockTag::Image,
                data: self.image_view(ImageConstraint::default()),
            }),
            BlockKind::Embed => Block::Embed(EmbedBlock {
                kind: EmbedBlockTag::Embed,
                data: self.generate_embed(),
            }),
            kind if kind.is_heading() => Block::Text(TextBlock::new(kind, self.heading())),
            kind @ (BlockKind::Paragraph | BlockKind::Preformatted) => {
                Block::Text(TextBlock::new(kind, self.paragraph()))
            }
            kind => Block::Text(TextBlock::new(kind, self.sentence())),
        };
        StructuredTextContent { value: vec![block] }
    }

    fn generate_image(&mut self, config: &ImageConfig) -> ImageContent {
        let (width, height) = self.dimensions(config.constraint);
        let origin = self.image_origin(width, height);

        let thumbnails: IndexMap<String, ImageView> = config
            .thumbnails
            .iter()
            .map(|thumbnail| {
                let (w, h) = self.dimensions(thumbnail.constraint());
                (thumbnail.name.clone(), view_of(&origin, w, h))
            })
            .collect();

        ImageContent::from_view(view_of(&origin, width, height), thumbnails)
    }

    fn image_view(&mut self, constraint: ImageConstraint) -> ImageView {
        let (width, height) = self.dimensions(constraint);
        let origin = self.image_origin(width, height);
        view_of(&origin, width, height)
    }

    fn image_origin(&mut self, width: u32, height: u32) -> ImageOrigin {
        let id = uuid::Builder::from_random_bytes(self.rng.gen()).into_uuid();
        ImageOrigin {
            id: "main".to_string(),
            url: format!("{}/{}.jpeg", self.image_base_url(), id),
            width,
            height,
        }
    }

    fn image_base_url(&self) -> &str {
        self.settings.image.base_url.trim_end_matches('/')
    }

    /// Size honouring a constraint; a single bound keeps the default aspect ratio
    fn dimensions(&self, constraint: ImageConstraint) -> (u32, u32) {
        let default_w = self.settings.image.width.max(1);
        let default_h = self.settings.image.height.max(1);
        let scale = |value: u32, num: u32, den: u32| -> u32 {
            ((value as u64 * num as u64) / den as u64).clamp(1, u32::MAX as u64) as u32
        };

        match (
            constraint.width.filter(|w| *w > 0),
            constraint.height.filter(|h| *h > 0),
        ) {
            (Some(w), Some(h)) => (w, h),
            (Some(w), None) => (w, scale(w, default_h, default_w)),
            (None, Some(h)) => (scale(h, default_w, default_h), h),
            (None, None) => (default_w, default_h),
        }
    }

    fn generate_link(&mut self, config: &LinkConfig) -> LinkContent {
        let value = match config.select {
            Some(LinkSelect::Document) => LinkValue::document(self.document_id()),
            Some(LinkSelect::Media) => {
                let (width, height) = self.dimensions(ImageConstraint::default());
                let id = self.document_id();
                let name: String = Word().fake_with_rng(&mut self.rng);
                LinkValue::Image {
                    url: format!("{}/{}.jpeg", self.image_base_url(), id),
                    id,
                    name: format!("{}.jpeg", name),
                    kind: "image".to_string(),
                    size: self.rng.gen_range(10_000..500_000u32).to_string(),
                    width: width.to_string(),
                    height: height.to_string(),
                    extra: Extra::new(),
                }
            }
            Some(LinkSelect::Web) | None => LinkValue::external(
                self.web_url(),
                config
                    .allow_target_blank
                    .filter(|allowed| *allowed)
                    .map(|_| "_blank".to_string()),
            ),
        };
        LinkContent { value }
    }

    fn generate_geo_point(&mut self) -> GeoPointContent {
        let round = |v: f64| (v * 1_000_000.0).round() / 1_000_000.0;
        GeoPointContent {
            position: GeoPosition {
                lat: round(self.rng.gen_range(-90.0..=90.0)),
                lng: round(self.rng.gen_range(-180.0..=180.0)),
            },
        }
    }

    fn generate_number(&mut self, config: &NumberConfig) -> String {
        let min = config.min.unwrap_or(0.0);
        let max = config.max.unwrap_or(100.0).max(min);
        let (low, high) = (min.ceil() as i64, max.floor() as i64);
        if low > high {
            return min.to_string();
        }
        self.rng.gen_range(low..=high).to_string()
    }

    fn generate_embed(&mut self) -> EmbedContent {
        let video_id: String = (0..11).map(|_| char::from(self.rng.sample(Alphanumeric))).collect();
        let embed_url = format!("https://www.youtube.com/watch?v={}", video_id);
        EmbedContent {
            html: Some(format!(
                "<iframe src=\"https://www.youtube.com/embed/{}\" frameborder=\"0\" allowfullscreen></iframe>",
                video_id
            )),
            embed_url,
            kind: "video".to_string(),
            version: Some("1.0".to_string()),
            title: Some(self.heading()),
            provider_name: Some("YouTube".to_string()),
            extra: Extra::new(),
        }
    }

    fn document_id(&mut self) -> String {
        (0..16).map(|_| char::from(self.rng.sample(Alphanumeric))).collect()
    }

    fn web_url(&mut self) -> String {
        let host: String = Word().fake_with_rng(&mut self.rng);
        let suffix: String = DomainSuffix().fake_with_rng(&mut self.rng);
        format!("https://{}.{}", host.to_lowercase(), suffix)
    }

    fn heading(&mut self) -> String {
        let words: Vec<String> = Words(2..5).fake_with_rng(&mut self.rng);
        capitalize(&words.join(" "))
    }

    fn sentence(&mut self) -> String {
        Sentence(3..8).fake_with_rng(&mut self.rng)
    }

    fn paragraph(&mut self) -> String {
        Paragraph(1..3).fake_with_rng(&mut self.rng)
    }
}

/// Fail on any field, nested groups included, that has no generator
pub fn ensure_supported(prefix: &str, fields: &FieldMap) -> MockResult<()> {
    for (key, field) in fields {
        ensure_field_supported(&format!("{}.{}", prefix, key), field)?;
    }
    Ok(())
}

pub fn ensure_field_supported(path: &str, field: &FieldSchema) -> MockResult<()> {
    match field {
        FieldSchema::SliceZone(_) | FieldSchema::Unsupported { .. } => Err(MockError::UnsupportedFieldKind {
            field: path.to_string(),
            kind: field.kind().to_string(),
        }),
        FieldSchema::Group(group) => ensure_supported(path, &group.fields),
        _ => Ok(()),
    }
}

fn view_of(origin: &ImageOrigin, width: u32, height: u32) -> ImageView {
    ImageView {
        origin: origin.clone(),
        url: format!(
            "{}?auto=compress,format&rect=0,0,{},{}&w={}&h={}",
            origin.url, origin.width, origin.height, width, height
        ),
        width,
        height,
        edit: ImageEdit::default(),
        credits: None,
        alt: None,
        provider: None,
        extra: Extra::new(),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
