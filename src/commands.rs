//! Entry points behind the CLI subcommands

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{error, info, warn};

use crate::adapters::mock_store::{decode_mocks, read_document, MockReport, MockStatus, MockStore};
use crate::adapters::model_watcher::{MockSync, ModelWatcher, SyncOutcome};
use crate::cli::GenerateArgs;
use crate::config::validator::ModelValidator;
use crate::config::Settings;
use crate::domain::content::SliceMock;
use crate::domain::diff::SliceDiff;
use crate::domain::mock_config::MockConfig;
use crate::domain::model::SliceSchema;
use crate::mock::MockReconciler;

/// Reconcile one model's mocks. Returns the JSON when no output file is given.
pub fn run_generate(settings: &Settings, args: &GenerateArgs) -> Result<Option<String>> {
    let model: SliceSchema = read_document(&args.model)?;
    if let Err(errors) = ModelValidator::validate(&model) {
        let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        bail!("Invalid slice model {}:\n{}", args.model.display(), messages.join("\n"));
    }

    let previous: SliceMock = match &args.mocks {
        Some(path) if path.exists() => {
            let raw: Value = read_document(path)?;
            decode_mocks(raw).map_err(|e| anyhow::anyhow!("Invalid mocks in {}: {}", path.display(), e))?
        }
        Some(path) => {
            warn!("Mocks file {} does not exist, generating from scratch", path.display());
            Vec::new()
        }
        None => Vec::new(),
    };

    let config: MockConfig = match &args.mock_config {
        Some(path) => read_document(path)?,
        None => MockConfig::default(),
    };

    let diff: Option<SliceDiff> = match (&args.diff, &args.previous_model) {
        (Some(path), _) => Some(read_document(path)?),
        (None, Some(path)) => {
            let old: SliceSchema = read_document(path)?;
            SliceDiff::between(&old, &model)
        }
        (None, None) => None,
    };

    let mut reconciler = MockReconciler::new(settings.generator.clone());
    let mocks = reconciler
        .reconcile(&model, &config, &previous, diff.as_ref())
        .with_context(|| format!("Failed to reconcile mocks for slice '{}'", model.id))?;
    let json = serde_json::to_string_pretty(&mocks)?;

    match &args.output {
        Some(path) => {
            write_file(path, &json)?;
            info!(slice = %model.id, variations = mocks.len(), "Wrote mocks to {}", path.display());
            Ok(None)
        }
        None => Ok(Some(json)),
    }
}

/// Validate, and optionally replace, the mocks of every configured library.
/// Fails when a slice is left without usable mocks.
pub fn run_check(settings: &Settings, replace: bool) -> Result<Vec<MockReport>> {
    let store = MockStore::new(&settings.project.cwd);
    let mut reconciler = MockReconciler::new(settings.generator.clone());
    let reports = store.validate_or_replace(&settings.project.libraries, &mut reconciler, replace)?;

    for report in &reports {
        match &report.status {
            MockStatus::Valid => info!(library = %report.library, slice = %report.slice, "Mocks valid"),
            MockStatus::Generated => info!(library = %report.library, slice = %report.slice, "Mocks generated"),
            MockStatus::Replaced(reason) => {
                info!(library = %report.library, slice = %report.slice, "Mocks replaced: {}", reason)
            }
            MockStatus::Missing => warn!(library = %report.library, slice = %report.slice, "Mocks missing"),
            MockStatus::Invalid(reason) => {
                warn!(library = %report.library, slice = %report.slice, "Mocks invalid: {}", reason)
            }
            MockStatus::Failed(reason) => {
                error!(library = %report.library, slice = %report.slice, "Mocks unavailable: {}", reason)
            }
        }
    }

    let failing = reports.iter().filter(|r| !r.is_ok()).count();
    if failing > 0 {
        bail!("{} of {} slices have no usable mocks", failing, reports.len());
    }
    Ok(reports)
}

/// Watch every configured library until the process is stopped
pub fn run_watch(settings: &Settings) -> Result<()> {
    let store = MockStore::new(&settings.project.cwd);
    let mut sync = MockSync::new(
        store,
        settings.project.libraries.clone(),
        MockReconciler::new(settings.generator.clone()),
    );
    let primed = sync.prime()?;
    info!("Tracking {} slice models", primed);

    let paths = sync.watch_paths();
    let sync = Arc::new(Mutex::new(sync));
    let sync_for_watcher = sync.clone();

    let _watcher = ModelWatcher::new(paths, move |path| {
        let mut sync = match sync_for_watcher.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match sync.model_changed(path) {
            Ok(SyncOutcome::Written(mocks)) => info!("Mocks updated: {}", mocks.display()),
            Ok(outcome) => tracing::debug!(?outcome, "No mocks written for {}", path.display()),
            Err(e) => error!("Failed to update mocks for {}: {}", path.display(), e),
        }
    })?;

    loop {
        std::thread::park();
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}
