use super::error::MockError;
use super::reconciler::{classify, MockReconciler, VariationStatus};
use crate::config::GeneratorSettings;
use crate::domain::content::{Block, Content, SliceMock};
use crate::domain::diff::SliceDiff;
use crate::domain::mock_config::MockConfig;
use crate::domain::model::{BlockKind, SliceSchema};
use serde_json::{json, Value};

fn reconciler() -> MockReconciler {
    MockReconciler::new(GeneratorSettings::seeded(7))
}

fn slice(value: Value) -> SliceSchema {
    serde_json::from_value(value).unwrap()
}

fn mocks(value: Value) -> SliceMock {
    serde_json::from_value(value).unwrap()
}

fn diff(value: Value) -> SliceDiff {
    serde_json::from_value(value).unwrap()
}

fn title_and_description() -> Value {
    json!({
        "title": {
            "type": "StructuredText",
            "config": { "single": "heading1", "label": "Title", "placeholder": "This is where it all begins..." }
        },
        "description": {
            "type": "StructuredText",
            "config": { "single": "paragraph", "label": "Description", "placeholder": "A nice description of your feature" }
        }
    })
}

fn variation(id: &str) -> Value {
    json!({
        "id": id,
        "name": id,
        "docURL": "...",
        "version": "sktwi1xtmkfgx8626",
        "description": "Testing",
        "primary": title_and_description(),
        "items": {}
    })
}

fn previous_default() -> Value {
    json!([{
        "__TYPE__": "SharedSliceContent",
        "variation": "default",
        "primary": {
            "title": {
                "__TYPE__": "StructuredTextContent",
                "value": [{ "type": "heading1", "content": { "text": "Test Heading" } }]
            },
            "description": {
                "__TYPE__": "StructuredTextContent",
                "value": [{ "type": "paragraph", "content": { "text": "Some text on the default slice." } }]
            }
        },
        "items": [{ "__TYPE__": "GroupItemContent", "value": [] }]
    }])
}

fn first_block(content: &Content) -> (BlockKind, String) {
    match content {
        Content::StructuredText(st) => match &st.value[0] {
            Block::Text(block) => (block.kind, block.content.text.clone()),
            other => panic!("Expected a text block, got {:?}", other),
        },
        other => panic!("Expected StructuredTextContent, got {:?}", other),
    }
}

#[test]
fn test_fresh_slice_generates_default_mock() {
    let model = slice(json!({
        "id": "some_slice",
        "type": "SharedSlice",
        "name": "SomeSlice",
        "description": "SomeSlice",
        "variations": [{
            "id": "default",
            "name": "Default",
            "docURL": "...",
            "version": "sktwi1xtmkfgx8626",
            "description": "SomeSlice",
            "primary": [
                { "key": "title", "value": { "type": "StructuredText", "config": { "single": "heading1" } } },
                { "key": "description", "value": { "type": "StructuredText", "config": { "single": "paragraph" } } }
            ]
        }]
    }));

    let result = reconciler().reconcile(&model, &MockConfig::default(), &[], None).unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result[0].variation, "default");
    assert!(result[0].items.is_empty());
    assert_eq!(result[0].primary.keys().collect::<Vec<_>>(), vec!["title", "description"]);

    let (kind, text) = first_block(&result[0].primary["title"]);
    assert_eq!(kind, BlockKind::Heading1);
    assert!(!text.is_empty());
    let (kind, text) = first_block(&result[0].primary["description"]);
    assert_eq!(kind, BlockKind::Paragraph);
    assert!(!text.is_empty());

    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value[0]["__TYPE__"], "SharedSliceContent");
    assert_eq!(value[0]["items"], json!([]));
}

#[test]
fn test_empty_overrides_still_generate_image() {
    let mut primary = title_and_description();
    primary["image"] = json!({
        "type": "Image",
        "config": { "label": "image", "constraint": {}, "thumbnails": [] }
    });
    let model = slice(json!({
        "id": "some_slice",
        "name": "SomeSlice",
        "variations": [{ "id": "default", "name": "Default", "primary": primary, "items": [] }]
    }));
    let config: MockConfig = serde_json::from_value(json!({ "default": { "primary": {} } })).unwrap();

    let result = reconciler().reconcile(&model, &config, &[], None).unwrap();
    let image = serde_json::to_value(&result[0].primary["image"]).unwrap();

    assert_eq!(image["__TYPE__"], "ImageContent");
    assert!(image["url"].is_string());
    assert_eq!(image["origin"]["id"], "main");
    assert!(image["origin"]["url"].is_string());
    assert!(image["origin"]["width"].is_u64());
    assert!(image["origin"]["height"].is_u64());
    assert!(image["width"].is_u64());
    assert!(image["height"].is_u64());
    assert_eq!(
        image["edit"],
        json!({ "zoom": 1, "crop": { "x": 0, "y": 0 }, "background": "transparent" })
    );
    assert_eq!(image["thumbnails"], json!({}));
}

#[test]
fn test_added_variation_keeps_previous_content() {
    let model = slice(json!({
        "id": "testing",
        "type": "SharedSlice",
        "name": "Testing",
        "variations": [variation("default"), variation("foo")]
    }));
    let previous_json = previous_default();
    let previous = mocks(previous_json.clone());
    let slice_diff = diff(json!({
        "op": "updated",
        "value": { "variations": { "foo": { "op": "added", "value": variation("foo") } } }
    }));

    let result = reconciler()
        .reconcile(&model, &MockConfig::default(), &previous, Some(&slice_diff))
        .unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(result[0], previous[0]);
    assert_eq!(serde_json::to_value(&result[0]).unwrap(), previous_json[0]);

    assert_eq!(result[1].variation, "foo");
    assert_eq!(first_block(&result[1].primary["title"]).0, BlockKind::Heading1);
    assert_eq!(first_block(&result[1].primary["description"]).0, BlockKind::Paragraph);
    assert!(result[1].items.is_empty());
}

#[test]
fn test_removed_variation_is_dropped() {
    let model = slice(json!({ "id": "testing", "variations": [variation("foo")] }));
    let previous = mocks(previous_default());
    let slice_diff = diff(json!({
        "op": "updated",
        "value": { "variations": { "default": { "op": "removed", "value": variation("default") } } }
    }));

    let result = reconciler()
        .reconcile(&model, &MockConfig::default(), &previous, Some(&slice_diff))
        .unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result[0].variation, "foo");
}

#[test]
fn test_content_for_variations_missing_from_model_is_dropped() {
    let model = slice(json!({ "id": "testing", "variations": [variation("foo")] }));
    let previous = mocks(previous_default());

    let result = reconciler().reconcile(&model, &MockConfig::default(), &previous, None).unwrap();

    assert_eq!(result.iter().map(|m| m.variation.as_str()).collect::<Vec<_>>(), vec!["foo"]);
}

#[test]
fn test_updated_field_is_regenerated_in_place() {
    let model = slice(json!({ "id": "testing", "variations": [variation("default")] }));
    let previous = mocks(previous_default());
    let slice_diff = diff(json!({
        "op": "updated",
        "value": { "variations": { "default": { "op": "updated", "value": {
            "primary": { "title": { "op": "updated", "value": {
                "type": "StructuredText", "config": { "single": "heading1" }
            } } }
        } } } }
    }));

    let result = reconciler()
        .reconcile(&model, &MockConfig::default(), &previous, Some(&slice_diff))
        .unwrap();

    let primary = &result[0].primary;
    assert_eq!(primary.keys().collect::<Vec<_>>(), vec!["title", "description"]);
    assert_ne!(first_block(&primary["title"]).1, "Test Heading");
    assert_eq!(primary["description"], previous[0].primary["description"]);
    assert_eq!(result[0].items, previous[0].items);
}

#[test]
fn test_new_field_is_appended_and_removed_field_dropped() {
    let model = slice(json!({
        "id": "testing",
        "variations": [{
            "id": "default",
            "primary": {
                "cta": { "type": "Link" },
                "title": { "type": "StructuredText", "config": { "single": "heading1" } }
            }
        }]
    }));
    let previous = mocks(previous_default());

    let result = reconciler().reconcile(&model, &MockConfig::default(), &previous, None).unwrap();

    let primary = &result[0].primary;
    assert_eq!(primary.keys().collect::<Vec<_>>(), vec!["title", "cta"]);
    assert_eq!(primary["title"], previous[0].primary["title"]);
    assert!(matches!(primary["cta"], Content::Link(_)));
}

#[test]
fn test_content_of_wrong_shape_is_regenerated() {
    let model = slice(json!({ "id": "testing", "variations": [variation("default")] }));
    let previous = mocks(json!([{
        "__TYPE__": "SharedSliceContent",
        "variation": "default",
        "primary": {
            "title": { "__TYPE__": "FieldContent", "value": "Plain", "type": "Text" }
        },
        "items": {}
    }]));

    let result = reconciler().reconcile(&model, &MockConfig::default(), &previous, None).unwrap();

    assert_eq!(first_block(&result[0].primary["title"]).0, BlockKind::Heading1);
    assert_eq!(result[0].primary.keys().collect::<Vec<_>>(), vec!["title", "description"]);
}

#[test]
fn test_overrides_win_over_previous_content() {
    let model = slice(json!({ "id": "testing", "variations": [variation("default")] }));
    let previous = mocks(previous_default());
    let config: MockConfig = serde_json::from_value(json!({
        "default": { "primary": { "title": "Overridden" } }
    }))
    .unwrap();

    let result = reconciler().reconcile(&model, &config, &previous, None).unwrap();

    assert_eq!(first_block(&result[0].primary["title"]), (BlockKind::Heading1, "Overridden".to_string()));
    assert_eq!(result[0].primary["description"], previous[0].primary["description"]);
}

#[test]
fn test_items_are_generated_and_patched() {
    let model = slice(json!({
        "id": "testing",
        "variations": [{
            "id": "default",
            "primary": {},
            "items": { "label": { "type": "Text" }, "on": { "type": "Boolean" } }
        }]
    }));
    let config: MockConfig = serde_json::from_value(json!({
        "default": { "items": { "label": "Same everywhere" } }
    }))
    .unwrap();
    let mut reconciler = reconciler();

    let fresh = reconciler.reconcile(&model, &config, &[], None).unwrap();
    assert_eq!(fresh[0].items.len(), 1);
    assert_eq!(
        serde_json::to_value(fresh[0].items[0].get("label")).unwrap(),
        json!({ "__TYPE__": "FieldContent", "value": "Same everywhere", "type": "Text" })
    );

    let previous = mocks(json!([{
        "__TYPE__": "SharedSliceContent",
        "variation": "default",
        "primary": {},
        "items": [
            { "__TYPE__": "GroupItemContent", "value": [["on", { "__TYPE__": "BooleanContent", "value": true }]] },
            { "__TYPE__": "GroupItemContent", "value": [] }
        ]
    }]));
    let patched = reconciler.reconcile(&model, &config, &previous, None).unwrap();

    assert_eq!(patched[0].items.len(), 2);
    let first: Vec<&str> = patched[0].items[0].value.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(first, vec!["on", "label"]);
    assert!(matches!(patched[0].items[0].get("on"), Some(Content::Boolean(b)) if b.value));
}

#[test]
fn test_whole_slice_diffs() {
    let model = slice(json!({ "id": "testing", "variations": [variation("default")] }));
    let previous = mocks(previous_default());

    let removed = diff(json!({ "op": "removed", "value": model.clone() }));
    let result = reconciler()
        .reconcile(&model, &MockConfig::default(), &previous, Some(&removed))
        .unwrap();
    assert!(result.is_empty());

    let added = diff(json!({ "op": "added", "value": model.clone() }));
    let result = reconciler()
        .reconcile(&model, &MockConfig::default(), &previous, Some(&added))
        .unwrap();
    assert_eq!(result.len(), 1);
    assert_ne!(first_block(&result[0].primary["title"]).1, "Test Heading");
    assert!(result[0].items.is_empty());
}

#[test]
fn test_diff_entry_for_unknown_variation_is_ignored() {
    let model = slice(json!({ "id": "testing", "variations": [variation("default")] }));
    let previous = mocks(previous_default());
    let slice_diff = diff(json!({
        "op": "updated",
        "value": { "variations": { "ghost": { "op": "added", "value": variation("ghost") } } }
    }));

    let result = reconciler()
        .reconcile(&model, &MockConfig::default(), &previous, Some(&slice_diff))
        .unwrap();

    assert_eq!(result, previous);
}

#[test]
fn test_unsupported_field_fails_reconciliation() {
    let model = slice(json!({
        "id": "testing",
        "variations": [{ "id": "default", "primary": { "body": { "type": "Slices" } } }]
    }));

    let err = reconciler()
        .reconcile(&model, &MockConfig::default(), &[], None)
        .unwrap_err();
    assert!(matches!(err, MockError::UnsupportedFieldKind { ref kind, .. } if kind == "Slices"));
}

#[test]
fn test_same_seed_is_reproducible() {
    let model = slice(json!({ "id": "testing", "variations": [variation("default"), variation("foo")] }));

    let first = reconciler().reconcile(&model, &MockConfig::default(), &[], None).unwrap();
    let second = reconciler().reconcile(&model, &MockConfig::default(), &[], None).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_classify() {
    let changes = diff(json!({
        "op": "updated",
        "value": { "variations": {
            "new": { "op": "added", "value": variation("new") },
            "gone": { "op": "removed", "value": variation("gone") },
            "edited": { "op": "updated", "value": {} }
        } }
    }));

    assert_eq!(classify("new", true, Some(&changes)), VariationStatus::Added);
    assert_eq!(classify("gone", true, Some(&changes)), VariationStatus::Removed);
    assert!(matches!(classify("edited", true, Some(&changes)), VariationStatus::Updated(_)));
    assert_eq!(classify("edited", false, Some(&changes)), VariationStatus::Added);
    assert_eq!(classify("other", true, Some(&changes)), VariationStatus::Unchanged);
    assert_eq!(classify("other", false, Some(&changes)), VariationStatus::Added);
    assert_eq!(classify("other", true, None), VariationStatus::Unchanged);
}

#[test]
fn test_unchanged_variation_keeps_unmodelled_properties() {
    let model = slice(json!({
        "id": "media",
        "variations": [{
            "id": "default",
            "primary": {
                "title": { "type": "StructuredText", "config": { "single": "heading1" } },
                "video": { "type": "Embed" },
                "file": { "type": "Link", "config": { "select": "media" } },
                "cta": { "type": "Link" },
                "picture": { "type": "Image" }
            },
            "items": {}
        }]
    }));
    let view = json!({
        "origin": { "id": "main", "url": "https://images.prismic.io/a.png", "width": 800, "height": 600 },
        "url": "https://images.prismic.io/a.png?w=800&h=600",
        "width": 800,
        "height": 600,
        "edit": { "zoom": 1, "crop": { "x": 0, "y": 0 }, "background": "transparent" },
        "copyright": "Prismic"
    });
    let mut picture = view.clone();
    picture["__TYPE__"] = json!("ImageContent");
    picture["thumbnails"] = json!({ "mobile": view });
    let raw = json!([{
        "__TYPE__": "SharedSliceContent",
        "variation": "default",
        "primary": {
            "title": {
                "__TYPE__": "StructuredTextContent",
                "value": [{ "type": "heading1", "content": { "text": "Hello" }, "label": "my-label" }]
            },
            "video": {
                "__TYPE__": "EmbedContent",
                "embed_url": "https://youtu.be/x",
                "type": "video",
                "thumbnail_url": "https://i.ytimg.com/vi/x/hqdefault.jpg",
                "author_name": "Prismic",
                "width": 480,
                "height": 270
            },
            "file": {
                "__TYPE__": "LinkContent",
                "value": {
                    "__TYPE__": "ImageLink",
                    "id": "abc",
                    "url": "https://images.prismic.io/abc.jpeg",
                    "name": "abc.jpeg",
                    "kind": "image",
                    "size": "1024",
                    "width": "800",
                    "height": "600",
                    "date": "2021-01-01"
                }
            },
            "cta": {
                "__TYPE__": "LinkContent",
                "value": { "__TYPE__": "ExternalLink", "url": "https://prismic.io", "preview": { "title": "Prismic" } }
            },
            "picture": picture
        },
        "items": []
    }]);

    let result = reconciler()
        .reconcile(&model, &MockConfig::default(), &mocks(raw.clone()), None)
        .unwrap();

    assert_eq!(serde_json::to_value(&result).unwrap(), raw);
}
