use config::{Config, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub mod validator;

use crate::cli::Cli;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub generator: GeneratorSettings,
    #[serde(default)]
    pub project: ProjectSettings,
}

/// Controls how placeholder content is generated
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneratorSettings {
    /// Seed for reproducible output; entropy when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Instances generated for a fresh items zone that has fields
    #[serde(default = "default_items_count")]
    pub items_count: usize,
    /// Instances generated for a repeatable Group field
    #[serde(default = "default_group_items_count")]
    pub group_items_count: usize,
    #[serde(default)]
    pub image: ImageSettings,
}

fn default_items_count() -> usize {
    1
}

fn default_group_items_count() -> usize {
    2
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            seed: None,
            items_count: default_items_count(),
            group_items_count: default_group_items_count(),
            image: ImageSettings::default(),
        }
    }
}

impl GeneratorSettings {
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImageSettings {
    /// Placeholder image host, without trailing slash
    #[serde(default = "default_image_base_url")]
    pub base_url: String,
    #[serde(default = "default_image_width")]
    pub width: u32,
    #[serde(default = "default_image_height")]
    pub height: u32,
}

fn default_image_base_url() -> String {
    "https://images.prismic.io/slice-machine".to_string()
}

fn default_image_width() -> u32 {
    2048
}

fn default_image_height() -> u32 {
    1536
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            base_url: default_image_base_url(),
            width: default_image_width(),
            height: default_image_height(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProjectSettings {
    /// Project root that library paths are resolved against
    #[serde(default = "default_cwd")]
    pub cwd: PathBuf,
    /// Slice libraries, e.g. `@/slices` or `./slices`
    #[serde(default = "default_libraries")]
    pub libraries: Vec<String>,
}

fn default_cwd() -> PathBuf {
    PathBuf::from(".")
}

fn default_libraries() -> Vec<String> {
    vec!["@/slices".to_string()]
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            cwd: default_cwd(),
            libraries: default_libraries(),
        }
    }
}

impl Settings {
    /// Create settings from CLI arguments (includes config file and CLI overrides)
    pub fn new_with_cli(cli: &Cli) -> Result<Self, anyhow::Error> {
        let mut settings = Self::load(File::from(cli.config.clone()).required(false))?;

        // CLI > env vars > config file
        settings.apply_cli_overrides(cli);

        settings.validate()?;
        Ok(settings)
    }

    /// Load `slicemock.{toml,yaml,json}` from a directory
    pub fn from_root(root: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        let root = root.as_ref();
        let mut settings = Self::load(File::from(root.join("slicemock")).required(false))?;

        if settings.project.cwd.is_relative() {
            settings.project.cwd = root.join(&settings.project.cwd);
        }

        settings.validate()?;
        Ok(settings)
    }

    fn load<T>(source: T) -> Result<Self, anyhow::Error>
    where
        T: config::Source + Send + Sync + 'static,
    {
        let s = Config::builder()
            .add_source(source)
            .set_default("generator.items_count", default_items_count() as u64)?
            .set_default("generator.group_items_count", default_group_items_count() as u64)?
            .build()?;

        Ok(s.try_deserialize()?)
    }

    fn validate(&self) -> Result<(), anyhow::Error> {
        validator::ConfigValidator::validate(self).map_err(|errors| {
            let error_messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            anyhow::anyhow!(
                "Configuration validation failed:\n{}",
                error_messages.join("\n")
            )
        })
    }

    /// Apply CLI argument overrides to settings
    fn apply_cli_overrides(&mut self, cli: &Cli) {
        if let Some(cwd) = &cli.cwd {
            self.project.cwd = cwd.clone();
        }
        if cli.seed.is_some() {
            self.generator.seed = cli.seed;
        }
        if !cli.libraries.is_empty() {
            self.project.libraries = cli.libraries.clone();
        }
    }
}
