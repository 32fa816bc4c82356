use crate::container::{ContainerLaunch, PortMapping, RunMode, VolumeMount};
use crate::errors::{ProvisionError, Result};
use crate::runtime::docker::DEFAULT_ENGINE;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "provision.yml";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project name; container name and image tag derive from it
    #[serde(default = "default_project")]
    pub project: String,
    /// Host directory holding `volumes/`; defaults to `~/jenkins`
    #[serde(default)]
    pub jenkins_root: Option<PathBuf>,
    #[serde(default = "default_context")]
    pub context: PathBuf,
    #[serde(default = "default_descriptor")]
    pub descriptor: String,
    #[serde(default = "default_engine")]
    pub engine: String,
    #[serde(default)]
    pub mounts: MountsConfig,
    #[serde(default = "default_ports")]
    pub ports: Vec<PortMapping>,
}

/// Container-side paths for the two volume binds
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MountsConfig {
    #[serde(default = "default_certs_mount")]
    pub certs: String,
    #[serde(default = "default_home_mount")]
    pub home: String,
}

impl Default for MountsConfig {
    fn default() -> Self {
        Self {
            certs: default_certs_mount(),
            home: default_home_mount(),
        }
    }
}

fn default_project() -> String {
    "jenkins".to_string()
}

fn default_context() -> PathBuf {
    PathBuf::from(".")
}

fn default_descriptor() -> String {
    crate::container::DEFAULT_DESCRIPTOR.to_string()
}

fn default_engine() -> String {
    DEFAULT_ENGINE.to_string()
}

fn default_certs_mount() -> String {
    "/certs/client".to_string()
}

fn default_home_mount() -> String {
    "/var/jenkins_home".to_string()
}

fn default_ports() -> Vec<PortMapping> {
    vec![PortMapping::new(8080, 8080), PortMapping::new(50000, 50000)]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project: default_project(),
            jenkins_root: None,
            context: default_context(),
            descriptor: default_descriptor(),
            engine: default_engine(),
            mounts: MountsConfig::default(),
            ports: default_ports(),
        }
    }
}

impl Config {
    /// Load config from an explicit file, or from `provision.yml` in `cwd` if present
    ///
    /// Relative paths in the file are resolved against `cwd`.
    pub fn load(cwd: &Path, explicit: Option<&Path>) -> Result<Self> {
        let config_path = match explicit {
            Some(path) => {
                if !path.is_file() {
                    return Err(ProvisionError::ConfigError(format!(
                        "Config file {} not found",
                        path.display()
                    )));
                }
                Some(path.to_path_buf())
            }
            None => Some(cwd.join(DEFAULT_CONFIG_FILE)).filter(|p| p.is_file()),
        };

        let config = match config_path {
            Some(path) => {
                let content = fs::read_to_string(&path)?;
                Self::parse(&content)?
            }
            // No config file, return defaults
            None => Config::default(),
        };

        config.validate()?;
        Ok(config.resolved(cwd))
    }

    pub fn parse(content: &str) -> Result<Self> {
        // An empty file means "all defaults"
        if content.trim().is_empty() {
            return Ok(Config::default());
        }

        serde_yml::from_str(content)
            .map_err(|e| ProvisionError::ConfigError(format!("Failed to parse config: {}", e)))
    }

    /// Validate the project name against the engine's container name and
    /// image reference rules, and the port list for clashing host ports
    ///
    /// Runs before anything touches the filesystem.
    pub fn validate(&self) -> Result<()> {
        let name_rule = Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9_.-]*$").expect("static regex");
        if !name_rule.is_match(&self.project) {
            return Err(ProvisionError::ConfigError(format!(
                "Invalid project name '{}': must start with a letter or digit and contain only [a-zA-Z0-9_.-]",
                self.project
            )));
        }

        // Image repositories are lowercase only; `Jenkins` is a fine
        // container name but `Jenkins-image` is not a valid tag
        let tag_rule =
            Regex::new(r"^[a-z0-9]+(?:(?:[._]|__|-+)[a-z0-9]+)*$").expect("static regex");
        let tag = self.image_tag();
        if !tag_rule.is_match(&tag) {
            return Err(ProvisionError::ConfigError(format!(
                "Invalid project name '{}': image tag '{}' must be lowercase [a-z0-9] separated by '.', '_' or '-'",
                self.project, tag
            )));
        }

        if self.engine.trim().is_empty() {
            return Err(ProvisionError::ConfigError(
                "Engine program cannot be empty".to_string(),
            ));
        }

        if self.ports.is_empty() {
            return Err(ProvisionError::ConfigError(
                "At least one port mapping is required".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for mapping in &self.ports {
            if !seen.insert(mapping.host) {
                return Err(ProvisionError::ConfigError(format!(
                    "Host port {} is mapped more than once",
                    mapping.host
                )));
            }
        }

        Ok(())
    }

    fn resolved(mut self, cwd: &Path) -> Self {
        let root = self.jenkins_root.take().unwrap_or_else(default_jenkins_root);
        self.jenkins_root = Some(absolutize(cwd, root));
        self.context = absolutize(cwd, self.context);
        self
    }

    pub fn jenkins_root(&self) -> PathBuf {
        self.jenkins_root.clone().unwrap_or_else(default_jenkins_root)
    }

    /// `<jenkins_root>/volumes/<project>_certs`
    pub fn certs_dir(&self) -> PathBuf {
        self.volumes_dir().join(format!("{}_certs", self.project))
    }

    /// `<jenkins_root>/volumes/<project>_home`
    pub fn home_dir(&self) -> PathBuf {
        self.volumes_dir().join(format!("{}_home", self.project))
    }

    fn volumes_dir(&self) -> PathBuf {
        self.jenkins_root().join("volumes")
    }

    pub fn host_directories(&self) -> Vec<PathBuf> {
        vec![self.certs_dir(), self.home_dir()]
    }

    pub fn image_tag(&self) -> String {
        format!("{}-image", self.project)
    }

    pub fn container_name(&self) -> String {
        self.project.clone()
    }

    pub fn volume_mounts(&self) -> Vec<VolumeMount> {
        vec![
            VolumeMount::new(self.certs_dir(), self.mounts.certs.clone()),
            VolumeMount::new(self.home_dir(), self.mounts.home.clone()),
        ]
    }

    pub fn launch(&self) -> ContainerLaunch {
        ContainerLaunch {
            image: self.image_tag(),
            name: self.container_name(),
            volumes: self.volume_mounts(),
            ports: self.ports.clone(),
            mode: RunMode::detached_interactive(),
        }
    }
}

fn default_jenkins_root() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join("jenkins"))
        .unwrap_or_else(|| PathBuf::from("jenkins"))
}

fn absolutize(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else if path == Path::new(".") {
        base.to_path_buf()
    } else {
        base.join(path)
    }
}
