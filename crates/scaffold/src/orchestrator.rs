use crate::error::{Result, ScaffoldError};
use crate::manifest::{Manifest, MANIFEST_FILE_NAME};
use crate::policy::{self, DependencyTarget, Placement};
use crate::writer::ScaffoldWriter;
use log::{debug, info};
use modlink_protocol::{DocumentRefresher, EditorHost, FileSystem, ScaffoldSettings, Strategy};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const INDEX_FILE_NAME: &str = "index.js";
const GENERIC_FAILURE: &str = "Failed to create the module";

/// How one creation attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreationOutcome {
    /// Files written, in creation order
    Created(Vec<PathBuf>),
    /// The user cancelled a prompt; nothing is left on disk
    Aborted,
    /// The message shown to the user
    Failed(String),
}

/// Turns a missing module name into files on disk, then refreshes the requesting
/// document and opens what was created.
pub struct ScaffoldOrchestrator {
    fs: Arc<dyn FileSystem>,
    host: Arc<dyn EditorHost>,
    refresher: Arc<dyn DocumentRefresher>,
    settings: ScaffoldSettings,
}

impl ScaffoldOrchestrator {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        host: Arc<dyn EditorHost>,
        refresher: Arc<dyn DocumentRefresher>,
        settings: ScaffoldSettings,
    ) -> Self {
        Self {
            fs,
            host,
            refresher,
            settings,
        }
    }

    pub fn settings(&self) -> &ScaffoldSettings {
        &self.settings
    }

    /// Create the module `requested_name`, prompting for a name when none is given.
    pub async fn create_module(
        &self,
        requested_name: Option<&str>,
        active_document: &Path,
    ) -> CreationOutcome {
        let name = match non_empty(requested_name) {
            Some(name) => name.to_string(),
            None => match non_empty(self.host.input_module_name().await.as_deref()) {
                Some(name) => name.to_string(),
                None => {
                    debug!("Module creation cancelled at naming");
                    return CreationOutcome::Aborted;
                }
            },
        };

        let Some(base_dir) = active_document.parent() else {
            return self.fail(&ScaffoldError::InvalidName(name));
        };

        let mut writer = ScaffoldWriter::new(self.fs.clone());
        let completed = match self.scaffold(&name, base_dir, &mut writer).await {
            Ok(completed) => completed,
            Err(err) => {
                writer.rollback().await;
                return self.fail(&err);
            }
        };
        if !completed {
            debug!("Module creation cancelled at strategy choice");
            writer.rollback().await;
            return CreationOutcome::Aborted;
        }

        let files = writer.created_files();
        info!("Created module {name}: {} file(s)", files.len());
        self.refresher.refresh(active_document).await;
        for file in &files {
            let host = self.host.clone();
            let file = file.clone();
            tokio::spawn(async move {
                if let Err(err) = host.open_document(&file).await {
                    debug!("Could not open {}: {err}", file.display());
                }
            });
        }
        CreationOutcome::Created(files)
    }

    /// Returns `false` when the user cancelled.
    async fn scaffold(&self, name: &str, base_dir: &Path, writer: &mut ScaffoldWriter) -> Result<bool> {
        let target = match policy::classify(name, base_dir)? {
            Placement::LocalFile(path) => {
                writer.create_file(&path, b"").await?;
                return Ok(true);
            }
            Placement::Dependency(target) => target,
        };

        writer.ensure_directory(&target.node_modules).await?;
        let Some(strategy) = self.choose_strategy(&target).await else {
            return Ok(false);
        };
        for dir in target.intermediate_dirs() {
            writer.ensure_directory(&dir).await?;
        }

        match strategy {
            Strategy::File => {
                writer.create_file(&target.file_path(), b"").await?;
            }
            Strategy::IndexPackage => {
                let package_dir = create_package_dir(&target, writer).await?;
                writer.create_file(&package_dir.join(INDEX_FILE_NAME), b"").await?;
            }
            Strategy::FullPackage => {
                let manifest = Manifest::render(&self.settings.package_defaults, &target.name)?;
                let entry = manifest.main_entry()?;
                let contents = manifest.to_bytes()?;

                let package_dir = create_package_dir(&target, writer).await?;
                writer
                    .create_file(&package_dir.join(MANIFEST_FILE_NAME), &contents)
                    .await?;
                let mut entry_dir = package_dir;
                for dir in &entry.dirs {
                    entry_dir = writer.ensure_directory(&entry_dir.join(dir)).await?;
                }
                writer.create_file(&entry_dir.join(&entry.file), b"").await?;
            }
        }
        Ok(true)
    }

    async fn choose_strategy(&self, target: &DependencyTarget) -> Option<Strategy> {
        if target.forced_file {
            return Some(Strategy::File);
        }
        match self.settings.package_type.fixed_strategy() {
            Some(strategy) => Some(strategy),
            None => self.host.pick_strategy(&target.name).await,
        }
    }

    fn fail(&self, err: &ScaffoldError) -> CreationOutcome {
        let mut message = err.to_string();
        if message.trim().is_empty() {
            message = GENERIC_FAILURE.to_string();
        }
        debug!("Module creation failed: {message}");
        self.host.show_error(&message);
        CreationOutcome::Failed(message)
    }
}

/// An existing package directory of any kind is a conflict; nothing is written then.
async fn create_package_dir(target: &DependencyTarget, writer: &mut ScaffoldWriter) -> Result<PathBuf> {
    let package_dir = target.package_dir();
    writer.ensure_absent(&package_dir).await?;
    writer.ensure_directory(&package_dir).await
}

fn non_empty(name: Option<&str>) -> Option<&str> {
    name.map(str::trim).filter(|name| !name.is_empty())
}
