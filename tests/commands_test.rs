use serde_json::{json, Value};
use slicemock::cli::GenerateArgs;
use slicemock::commands::{run_check, run_generate};
use slicemock::config::{GeneratorSettings, ProjectSettings, Settings};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn settings(cwd: &Path) -> Settings {
    Settings {
        generator: GeneratorSettings::seeded(5),
        project: ProjectSettings {
            cwd: cwd.to_path_buf(),
            libraries: vec!["@/slices".to_string()],
        },
    }
}

fn model(variations: &[&str]) -> Value {
    let variations: Vec<Value> = variations
        .iter()
        .map(|id| {
            json!({
                "id": id,
                "name": id,
                "primary": {
                    "title": { "type": "StructuredText", "config": { "single": "heading1" } },
                    "link": { "type": "Link", "config": { "select": "web" } }
                },
                "items": {
                    "label": { "type": "Text" }
                }
            })
        })
        .collect();
    json!({ "id": "hero", "type": "SharedSlice", "name": "Hero", "variations": variations })
}

fn write_json(path: &Path, value: &Value) -> PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    path.to_path_buf()
}

fn args(model: PathBuf) -> GenerateArgs {
    GenerateArgs {
        model,
        mocks: None,
        mock_config: None,
        diff: None,
        previous_model: None,
        output: None,
    }
}

#[test]
fn test_generate_prints_mocks() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let model_path = write_json(&temp_dir.path().join("model.json"), &model(&["default"]));

    let json = run_generate(&settings(temp_dir.path()), &args(model_path))?.expect("json output");
    let mocks: Value = serde_json::from_str(&json)?;

    assert_eq!(mocks[0]["__TYPE__"], "SharedSliceContent");
    assert_eq!(mocks[0]["variation"], "default");
    assert_eq!(mocks[0]["primary"]["link"]["value"]["__TYPE__"], "ExternalLink");
    assert_eq!(mocks[0]["items"].as_array().map(Vec::len), Some(1));
    Ok(())
}

#[test]
fn test_generate_with_previous_model_keeps_content() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    let settings = settings(root);

    let old_model = write_json(&root.join("old.json"), &model(&["default"]));
    let first = run_generate(&settings, &args(old_model.clone()))?.expect("json output");
    let mocks_path = write_json(&root.join("mocks.json"), &serde_json::from_str(&first)?);

    let new_model = write_json(&root.join("model.json"), &model(&["default", "wide"]));
    let output = root.join("out/mocks.json");
    let result = run_generate(
        &settings,
        &GenerateArgs {
            mocks: Some(mocks_path),
            previous_model: Some(old_model),
            output: Some(output.clone()),
            ..args(new_model)
        },
    )?;
    assert!(result.is_none());

    let first: Value = serde_json::from_str(&first)?;
    let second: Value = serde_json::from_str(&fs::read_to_string(&output)?)?;
    assert_eq!(second[0], first[0]);
    assert_eq!(second[1]["variation"], "wide");
    Ok(())
}

#[test]
fn test_generate_applies_mock_config_and_diff_file() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();

    let model_path = write_json(&root.join("model.json"), &model(&["default"]));
    let config_path = root.join("mock-config.yaml");
    fs::write(&config_path, "default:\n  primary:\n    link: https://prismic.io\n")?;
    let diff_path = write_json(
        &root.join("diff.json"),
        &json!({ "op": "added", "value": model(&["default"]) }),
    );

    let json = run_generate(
        &settings(root),
        &GenerateArgs {
            mock_config: Some(config_path),
            diff: Some(diff_path),
            ..args(model_path)
        },
    )?
    .expect("json output");
    let mocks: Value = serde_json::from_str(&json)?;

    assert_eq!(
        mocks[0]["primary"]["link"]["value"],
        json!({ "__TYPE__": "ExternalLink", "url": "https://prismic.io" })
    );
    Ok(())
}

#[test]
fn test_generate_rejects_unsupported_model() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let model_path = write_json(
        &temp_dir.path().join("model.json"),
        &json!({ "id": "page", "variations": [{ "id": "default", "primary": { "body": { "type": "Slices" } } }] }),
    );

    let err = run_generate(&settings(temp_dir.path()), &args(model_path)).unwrap_err();
    assert!(err.to_string().contains("Invalid slice model"));
    Ok(())
}

#[test]
fn test_check_generates_missing_mocks() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    write_json(&root.join("slices/Hero/model.json"), &model(&["default"]));

    assert!(run_check(&settings(root), false).is_err());

    let reports = run_check(&settings(root), true)?;
    assert_eq!(reports.len(), 1);
    assert!(root.join("slices/Hero/mocks.json").exists());

    let reports = run_check(&settings(root), false)?;
    assert!(reports.iter().all(|r| r.is_ok()));
    Ok(())
}
