// Provisioning sequence: host directories -> image build -> container start
//
// Strictly ordered, each step blocks, first failure aborts the rest.
// Nothing is retried and nothing is rolled back: an image built before a
// failed start stays in place.

use crate::config::Config;
use crate::container::ContainerLaunch;
use crate::directories::{self, DirectoryOutcome};
use crate::errors::Result;
use crate::runtime::ContainerRuntime;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// What a successful run did
#[derive(Debug, Clone, Serialize)]
pub struct ProvisionReport {
    pub created_dirs: Vec<PathBuf>,
    pub existing_dirs: Vec<PathBuf>,
    pub image: String,
    pub container_name: String,
    pub container_id: String,
}

pub struct Provisioner<'a, R: ContainerRuntime + ?Sized> {
    config: &'a Config,
    runtime: &'a R,
}

impl<'a, R: ContainerRuntime + ?Sized> Provisioner<'a, R> {
    pub fn new(config: &'a Config, runtime: &'a R) -> Self {
        Self { config, runtime }
    }

    /// Create the volume directories and any missing parents
    pub fn ensure_directories(&self, paths: &[PathBuf]) -> Result<Vec<DirectoryOutcome>> {
        let outcomes = directories::ensure_directories(paths)?;

        for outcome in &outcomes {
            if outcome.was_created() {
                info!(path = %outcome.path().display(), "created directory");
            } else {
                info!(path = %outcome.path().display(), "directory already present");
            }
        }

        Ok(outcomes)
    }

    /// Build the image from `context`, tagged `tag`
    pub fn build_image(&self, context: &Path, tag: &str) -> Result<()> {
        info!(context = %context.display(), %tag, "building image");
        self.runtime.build(context, &self.config.descriptor, tag)?;
        info!(%tag, "image built");
        Ok(())
    }

    /// Start the container
    ///
    /// A container already holding the name is reported but never removed;
    /// the engine's own answer decides the outcome.
    pub fn run_container(&self, launch: &ContainerLaunch) -> Result<String> {
        match self.runtime.exists_by_name(&launch.name) {
            Ok(true) => warn!(
                name = %launch.name,
                "a container with this name already exists; it is not removed automatically"
            ),
            Ok(false) => {}
            Err(e) => warn!(name = %launch.name, error = %e, "could not check for an existing container"),
        }

        info!(name = %launch.name, image = %launch.image, "starting container");
        let id = self.runtime.run(launch)?;
        info!(name = %launch.name, %id, "container started");
        Ok(id)
    }

    /// Run the whole sequence
    pub fn provision(&self) -> Result<ProvisionReport> {
        let outcomes = self.ensure_directories(&self.config.host_directories())?;

        let tag = self.config.image_tag();
        self.build_image(&self.config.context, &tag)?;

        let launch = self.config.launch();
        let container_id = self.run_container(&launch)?;

        let (created, existing): (Vec<_>, Vec<_>) =
            outcomes.into_iter().partition(DirectoryOutcome::was_created);

        Ok(ProvisionReport {
            created_dirs: created.iter().map(|o| o.path().to_path_buf()).collect(),
            existing_dirs: existing.iter().map(|o| o.path().to_path_buf()).collect(),
            image: tag,
            container_name: launch.name,
            container_id,
        })
    }
}
