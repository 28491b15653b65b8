use anyhow::Result;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use rand::rngs::StdRng;
use rand::Rng;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::adapters::mock_store::{MockStore, StoreResult, MODEL_FILE};
use crate::domain::diff::SliceDiff;
use crate::domain::model::SliceSchema;
use crate::mock::MockReconciler;

/// Watches slice library directories and reports changed `model.json` files
pub struct ModelWatcher {
    _watcher: RecommendedWatcher,
}

impl ModelWatcher {
    pub fn new<F>(paths: Vec<PathBuf>, on_change: F) -> Result<Self>
    where
        F: Fn(&Path) + Send + Sync + 'static,
    {
        let (tx, rx) = channel();

        let mut watcher = RecommendedWatcher::new(tx, Config::default())?;

        for path in &paths {
            if path.exists() {
                watcher.watch(path, RecursiveMode::Recursive)?;
                info!("Watching slice library: {}", path.display());
            } else {
                warn!("Slice library does not exist, skipping: {}", path.display());
            }
        }

        std::thread::spawn(move || loop {
            match rx.recv() {
                Ok(Ok(event)) => {
                    let models = changed_models(&event);
                    if models.is_empty() {
                        continue;
                    }
                    // Editors write in several steps
                    std::thread::sleep(Duration::from_millis(100));
                    for model in models {
                        info!("Model change detected: {}", model.display());
                        on_change(&model);
                    }
                }
                Ok(Err(e)) => error!("Watch error: {:?}", e),
                Err(e) => {
                    error!("Watch channel error: {:?}", e);
                    break;
                }
            }
        });

        Ok(Self { _watcher: watcher })
    }
}

fn changed_models(event: &Event) -> Vec<PathBuf> {
    if !matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    ) {
        return Vec::new();
    }
    event
        .paths
        .iter()
        .filter(|p| p.file_name().and_then(|n| n.to_str()) == Some(MODEL_FILE))
        .cloned()
        .collect()
}

/// What a model change led to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Model identical to the last one seen
    Unchanged,
    /// Mocks reconciled and written
    Written(PathBuf),
    /// Model file gone; its mocks are left in place
    Removed,
    /// Path is not a model of a configured library
    Ignored,
}

/// Keeps mocks in step with model edits, diffing each model against the
/// version seen last
pub struct MockSync<R: Rng = StdRng> {
    store: MockStore,
    libraries: Vec<String>,
    reconciler: MockReconciler<R>,
    seen: HashMap<PathBuf, SliceSchema>,
}

impl<R: Rng> MockSync<R> {
    pub fn new(store: MockStore, libraries: Vec<String>, reconciler: MockReconciler<R>) -> Self {
        Self {
            store,
            libraries,
            reconciler,
            seen: HashMap::new(),
        }
    }

    /// Directories to hand to the watcher
    pub fn watch_paths(&self) -> Vec<PathBuf> {
        self.libraries
            .iter()
            .map(|library| self.store.library(library).slices_dir)
            .collect()
    }

    /// Record the current models so the first edit is diffed against them
    pub fn prime(&mut self) -> StoreResult<usize> {
        for library in self.libraries.clone() {
            for slice in self.store.list_slices(&library)? {
                match self.store.read_model(&library, &slice) {
                    Ok(model) => {
                        self.seen.insert(self.store.model_path(&library, &slice), model);
                    }
                    Err(e) => warn!(library = %library, slice = %slice, "Skipping unreadable model: {}", e),
                }
            }
        }
        debug!(models = self.seen.len(), "Primed model cache");
        Ok(self.seen.len())
    }

    /// React to a change of the model file at `path`
    pub fn model_changed(&mut self, path: &Path) -> StoreResult<SyncOutcome> {
        let (library, slice) = match self.locate(path) {
            Some(found) => found,
            None => {
                debug!("Ignoring change outside configured libraries: {}", path.display());
                return Ok(SyncOutcome::Ignored);
            }
        };
        let model_path = self.store.model_path(&library, &slice);

        if !model_path.exists() {
            self.seen.remove(&model_path);
            info!(library = %library, slice = %slice, "Model removed");
            return Ok(SyncOutcome::Removed);
        }

        let model = self.store.read_model(&library, &slice)?;
        let diff = match self.seen.get(&model_path) {
            Some(last) => match SliceDiff::between(last, &model) {
                Some(diff) => Some(diff),
                None => {
                    debug!(library = %library, slice = %slice, "Model unchanged");
                    return Ok(SyncOutcome::Unchanged);
                }
            },
            None => None,
        };

        let previous = match self.store.read_mocks(&library, &slice) {
            Ok(mocks) => mocks.unwrap_or_default(),
            Err(e) => {
                warn!(library = %library, slice = %slice, "Discarding unreadable mocks: {}", e);
                Vec::new()
            }
        };
        let config = self.store.read_mock_config(&library, &slice)?;

        let mocks = self
            .reconciler
            .reconcile(&model, &config, &previous, diff.as_ref())?;
        let written = self.store.write_mocks(&library, &slice, &mocks)?;

        self.seen.insert(model_path, model);
        Ok(SyncOutcome::Written(written))
    }

    /// Library and slice name of a model path
    fn locate(&self, path: &Path) -> Option<(String, String)> {
        let slice_dir = path.parent()?;
        let slice = slice_dir.file_name()?.to_str()?.to_string();
        let parent = slice_dir.parent()?;

        self.libraries
            .iter()
            .find(|library| same_dir(&self.store.library(library).slices_dir, parent))
            .map(|library| (library.clone(), slice))
    }
}

fn same_dir(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
