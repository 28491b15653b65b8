//! Filesystem store for slice models and their mocks
//!
//! Layout follows the project's slice libraries:
//! `<library>/<SliceName>/model.json` next to `<library>/<SliceName>/mocks.json`.

use rand::Rng;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::content::{ContentMap, SliceMock};
use crate::domain::mock_config::MockConfig;
use crate::domain::model::{FieldMap, SliceSchema};
use crate::mock::{MockError, MockReconciler};

pub const MODEL_FILE: &str = "model.json";
pub const MOCKS_FILE: &str = "mocks.json";
pub const LEGACY_MOCK_CONFIG: &str = ".slicemachine/mock-config.json";

/// Prefixes marking a library that lives inside the project
const LOCAL_PREFIXES: [&str; 4] = ["@/", "~/", "./", "/"];

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("YAML error in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Invalid mocks for slice '{slice}': {reason}")]
    InvalidMocks { slice: String, reason: String },

    #[error(transparent)]
    Mock(#[from] MockError),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A slice library resolved against the project root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryPath {
    pub name: String,
    pub is_local: bool,
    /// Library path with its local prefix stripped
    pub relative: String,
    /// Directory holding one sub-directory per slice
    pub slices_dir: PathBuf,
}

impl LibraryPath {
    pub fn resolve(cwd: &Path, library: &str) -> Self {
        match LOCAL_PREFIXES.iter().find(|prefix| library.starts_with(*prefix)) {
            Some(prefix) => {
                let relative = library[prefix.len()..].to_string();
                Self {
                    name: library.to_string(),
                    is_local: true,
                    slices_dir: cwd.join(&relative),
                    relative,
                }
            }
            None => Self {
                name: library.to_string(),
                is_local: false,
                relative: library.to_string(),
                slices_dir: cwd.join("node_modules").join(library).join("slices"),
            },
        }
    }
}

/// Outcome of checking one slice's mocks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockStatus {
    Valid,
    Missing,
    Invalid(String),
    /// Missing mocks were generated
    Generated,
    /// Invalid mocks were regenerated
    Replaced(String),
    /// The model could not be read or has no generator for a field
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockReport {
    pub library: String,
    pub slice: String,
    pub path: PathBuf,
    pub status: MockStatus,
}

impl MockReport {
    /// Whether the slice ends up with usable mocks on disk
    pub fn is_ok(&self) -> bool {
        matches!(
            self.status,
            MockStatus::Valid | MockStatus::Generated | MockStatus::Replaced(_)
        )
    }
}

#[derive(Debug, Clone)]
pub struct MockStore {
    cwd: PathBuf,
}

impl MockStore {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self { cwd: cwd.into() }
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn library(&self, library: &str) -> LibraryPath {
        LibraryPath::resolve(&self.cwd, library)
    }

    pub fn model_path(&self, library: &str, slice: &str) -> PathBuf {
        self.library(library).slices_dir.join(slice).join(MODEL_FILE)
    }

    pub fn mock_path(&self, library: &str, slice: &str) -> PathBuf {
        self.cwd
            .join(self.library(library).relative)
            .join(slice)
            .join(MOCKS_FILE)
    }

    /// Slice directory names of a library that contain a model, sorted
    pub fn list_slices(&self, library: &str) -> StoreResult<Vec<String>> {
        let dir = self.library(library).slices_dir;
        let pattern = format!(
            "{}/*/{}",
            glob::Pattern::escape(&dir.to_string_lossy()),
            MODEL_FILE
        );

        let mut slices = Vec::new();
        for entry in glob::glob(&pattern)? {
            match entry {
                Ok(path) => {
                    let name = path
                        .parent()
                        .and_then(Path::file_name)
                        .and_then(|n| n.to_str());
                    if let Some(name) = name {
                        slices.push(name.to_string());
                    }
                }
                Err(e) => warn!("Failed to read glob entry: {}", e),
            }
        }
        slices.sort();
        Ok(slices)
    }

    pub fn read_model(&self, library: &str, slice: &str) -> StoreResult<SliceSchema> {
        read_document(&self.model_path(library, slice))
    }

    /// Stored mocks, `None` when the slice has none yet
    pub fn read_mocks(&self, library: &str, slice: &str) -> StoreResult<Option<SliceMock>> {
        let path = self.mock_path(library, slice);
        if !path.exists() {
            return Ok(None);
        }
        let raw: Value = read_document(&path)?;
        decode_mocks(raw)
            .map(Some)
            .map_err(|reason| StoreError::InvalidMocks {
                slice: slice.to_string(),
                reason,
            })
    }

    /// Validate raw mocks and write them; nothing is written when they do not decode
    pub fn save_mocks(&self, library: &str, slice: &str, raw: Value) -> StoreResult<PathBuf> {
        let mocks = decode_mocks(raw).map_err(|reason| StoreError::InvalidMocks {
            slice: slice.to_string(),
            reason,
        })?;
        self.write_mocks(library, slice, &mocks)
    }

    pub fn write_mocks(&self, library: &str, slice: &str, mocks: &SliceMock) -> StoreResult<PathBuf> {
        let path = self.mock_path(library, slice);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let content = serde_json::to_string_pretty(mocks).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, content).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;

        info!(library, slice, variations = mocks.len(), "Wrote mocks to {}", path.display());
        Ok(path)
    }

    /// Overrides for a slice from the project's legacy mock config, empty when absent
    pub fn read_mock_config(&self, library: &str, slice: &str) -> StoreResult<MockConfig> {
        let path = self.cwd.join(LEGACY_MOCK_CONFIG);
        if !path.exists() {
            return Ok(MockConfig::default());
        }

        let document: Value = read_document(&path)?;
        match document
            .get("_slices")
            .and_then(|slices| slices.get(library))
            .and_then(|lib| lib.get(slice))
        {
            Some(config) => serde_json::from_value(config.clone())
                .map_err(|source| StoreError::Json { path, source }),
            None => Ok(MockConfig::default()),
        }
    }

    /// Check every slice's mocks, regenerating missing or invalid ones when `replace` is set
    pub fn validate_or_replace<R: Rng>(
        &self,
        libraries: &[String],
        reconciler: &mut MockReconciler<R>,
        replace: bool,
    ) -> StoreResult<Vec<MockReport>> {
        let mut reports = Vec::new();

        for library in libraries {
            for slice in self.list_slices(library)? {
                let status = self.check_slice(library, &slice, reconciler, replace);
                debug!(library = %library, slice = %slice, ?status, "Checked mocks");
                reports.push(MockReport {
                    library: library.clone(),
                    path: self.mock_path(library, &slice),
                    slice,
                    status,
                });
            }
        }

        Ok(reports)
    }

    fn check_slice<R: Rng>(
        &self,
        library: &str,
        slice: &str,
        reconciler: &mut MockReconciler<R>,
        replace: bool,
    ) -> MockStatus {
        let model = match self.read_model(library, slice) {
            Ok(model) => model,
            Err(e) => {
                warn!(library, slice, "Cannot read model: {}", e);
                return MockStatus::Failed(e.to_string());
            }
        };

        let status = match self.read_mocks(library, slice) {
            Ok(Some(mocks)) => match check_mocks(&model, &mocks) {
                Ok(()) => MockStatus::Valid,
                Err(reason) => MockStatus::Invalid(reason),
            },
            Ok(None) => MockStatus::Missing,
            Err(e) => MockStatus::Invalid(e.to_string()),
        };

        if !replace || status == MockStatus::Valid {
            return status;
        }

        match self.regenerate(library, slice, &model, reconciler) {
            Ok(()) => match status {
                MockStatus::Invalid(reason) => MockStatus::Replaced(reason),
                _ => MockStatus::Generated,
            },
            Err(e) => {
                warn!(library, slice, "Cannot regenerate mocks: {}", e);
                MockStatus::Failed(e.to_string())
            }
        }
    }

    fn regenerate<R: Rng>(
        &self,
        library: &str,
        slice: &str,
        model: &SliceSchema,
        reconciler: &mut MockReconciler<R>,
    ) -> StoreResult<()> {
        let config = self.read_mock_config(library, slice)?;
        let mocks = reconciler.reconcile(model, &config, &[], None)?;
        self.write_mocks(library, slice, &mocks)?;
        Ok(())
    }
}

/// Read a JSON or YAML document, chosen by file extension
pub fn read_document<T: DeserializeOwned>(path: &Path) -> StoreResult<T> {
    let content = fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content).map_err(|source| StoreError::Yaml {
            path: path.to_path_buf(),
            source,
        }),
        _ => serde_json::from_str(&content).map_err(|source| StoreError::Json {
            path: path.to_path_buf(),
            source,
        }),
    }
}

pub fn decode_mocks(raw: Value) -> Result<SliceMock, String> {
    serde_json::from_value(raw).map_err(|e| e.to_string())
}

/// Every entry must name a model variation and every value must fit its field.
/// Fields without content are allowed.
pub fn check_mocks(model: &SliceSchema, mocks: &SliceMock) -> Result<(), String> {
    for mock in mocks {
        let variation = model
            .variation(&mock.variation)
            .ok_or_else(|| format!("Unknown variation '{}'", mock.variation))?;

        check_zone(&variation.primary, &mock.primary)
            .map_err(|e| format!("{}.primary.{}", mock.variation, e))?;
        for item in &mock.items {
            check_zone(&variation.items, &item.to_map())
                .map_err(|e| format!("{}.items.{}", mock.variation, e))?;
        }
    }
    Ok(())
}

fn check_zone(fields: &FieldMap, content: &ContentMap) -> Result<(), String> {
    for (key, value) in content {
        match fields.get(key) {
            Some(field) if value.matches(field) => {}
            Some(field) => {
                return Err(format!(
                    "{}: {} does not fit a {} field",
                    key,
                    value.type_name(),
                    field.kind()
                ))
            }
            None => return Err(format!("{}: no such field", key)),
        }
    }
    Ok(())
}
