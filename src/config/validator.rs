use std::collections::HashMap;
use thiserror::Error;

use crate::config::{GeneratorSettings, ProjectSettings, Settings};
use crate::domain::model::{FieldMap, FieldSchema, SliceSchema};

/// Upper bound for generated repeatable instances
pub const MAX_GENERATED_ITEMS: usize = 20;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Duplicate entry: {0}")]
    Duplicate(String),
}

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(settings: &Settings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = Self::validate_generator(&settings.generator) {
            errors.extend(e);
        }

        if let Err(e) = Self::validate_project(&settings.project) {
            errors.extend(e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_generator(generator: &GeneratorSettings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        for (field, count) in [
            ("generator.items_count", generator.items_count),
            ("generator.group_items_count", generator.group_items_count),
        ] {
            if count > MAX_GENERATED_ITEMS {
                errors.push(ValidationError::InvalidValue {
                    field: field.to_string(),
                    reason: format!("Must be at most {}", MAX_GENERATED_ITEMS),
                });
            }
        }

        let image = &generator.image;
        if image.base_url.is_empty() {
            errors.push(ValidationError::MissingField("generator.image.base_url".to_string()));
        } else if !image.base_url.starts_with("http://") && !image.base_url.starts_with("https://") {
            errors.push(ValidationError::InvalidValue {
                field: "generator.image.base_url".to_string(),
                reason: "Must be an http(s) URL".to_string(),
            });
        }

        if image.width == 0 || image.height == 0 {
            errors.push(ValidationError::InvalidValue {
                field: "generator.image".to_string(),
                reason: "Width and height must be greater than 0".to_string(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_project(project: &ProjectSettings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if project.libraries.is_empty() {
            errors.push(ValidationError::MissingField("project.libraries".to_string()));
        }

        for (idx, library) in project.libraries.iter().enumerate() {
            if library.trim().is_empty() {
                errors.push(ValidationError::MissingField(format!("project.libraries[{}]", idx)));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Structural checks on a slice model before it is reconciled
pub struct ModelValidator;

impl ModelValidator {
    pub fn validate(slice: &SliceSchema) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        let mut seen_ids = HashMap::new();

        if slice.id.is_empty() {
            errors.push(ValidationError::MissingField("id".to_string()));
        }

        for (idx, variation) in slice.variations.iter().enumerate() {
            if let Some(prev_idx) = seen_ids.insert(&variation.id, idx) {
                errors.push(ValidationError::Duplicate(format!(
                    "Variation id '{}' appears at indices {} and {}",
                    variation.id, prev_idx, idx
                )));
            }

            if variation.id.is_empty() {
                errors.push(ValidationError::MissingField(format!("variations[{}].id", idx)));
            }

            Self::validate_fields(&format!("variations[{}].primary", idx), &variation.primary, &mut errors);
            Self::validate_fields(&format!("variations[{}].items", idx), &variation.items, &mut errors);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_fields(path: &str, fields: &FieldMap, errors: &mut Vec<ValidationError>) {
        for (key, field) in fields {
            match field {
                FieldSchema::SliceZone(_) | FieldSchema::Unsupported { .. } => {
                    errors.push(ValidationError::InvalidValue {
                        field: format!("{}.{}", path, key),
                        reason: format!("Field kind '{}' cannot be mocked inside a slice", field.kind()),
                    });
                }
                FieldSchema::Group(group) => {
                    Self::validate_fields(&format!("{}.{}.fields", path, key), &group.fields, errors);
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ImageSettings;
    use serde_json::json;

    #[test]
    fn test_valid_config() {
        let settings = Settings::default();

        let result = ConfigValidator::validate(&settings);
        assert!(result.is_ok());
    }

    #[test]
    fn test_invalid_generator() {
        let mut settings = Settings::default();
        settings.generator.items_count = MAX_GENERATED_ITEMS + 1;
        settings.generator.image = ImageSettings {
            base_url: "ftp://images".to_string(),
            width: 0,
            height: 10,
        };

        let errors = ConfigValidator::validate(&settings).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().any(|e| e.to_string().contains("generator.items_count")));
    }

    #[test]
    fn test_missing_libraries() {
        let mut settings = Settings::default();
        settings.project.libraries = vec![];

        let errors = ConfigValidator::validate(&settings).unwrap_err();
        assert!(matches!(errors[0], ValidationError::MissingField(ref f) if f == "project.libraries"));
    }

    #[test]
    fn test_model_validation() {
        let slice: SliceSchema = serde_json::from_value(json!({
            "id": "hero",
            "variations": [
                { "id": "default", "primary": { "title": { "type": "Text" } } },
                {
                    "id": "default",
                    "items": {
                        "list": {
                            "type": "Group",
                            "config": { "fields": { "zone": { "type": "Slices" } } }
                        }
                    }
                }
            ]
        }))
        .unwrap();

        let errors = ModelValidator::validate(&slice).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(matches!(errors[0], ValidationError::Duplicate(_)));
        assert!(errors[1].to_string().contains("variations[1].items.list.fields.zone"));
    }

    #[test]
    fn test_valid_model() {
        let slice: SliceSchema = serde_json::from_value(json!({
            "id": "hero",
            "variations": [{ "id": "default", "primary": { "title": { "type": "Text" } } }]
        }))
        .unwrap();

        assert!(ModelValidator::validate(&slice).is_ok());
    }
}
