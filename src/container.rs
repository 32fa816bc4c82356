// Container launch description
// Volume binds, published ports and run mode for the single provisioned container

use crate::errors::ProvisionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Bind mount from a host directory into the container
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VolumeMount {
    pub host: PathBuf,
    pub container: String,
}

impl VolumeMount {
    pub fn new(host: impl Into<PathBuf>, container: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            container: container.into(),
        }
    }

    /// `host:container` form accepted by `-v`
    pub fn to_arg(&self) -> String {
        format!("{}:{}", self.host.display(), self.container)
    }
}

/// Host port published to a container port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PortMapping {
    pub host: u16,
    pub container: u16,
}

impl PortMapping {
    pub fn new(host: u16, container: u16) -> Self {
        Self { host, container }
    }
}

impl fmt::Display for PortMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.container)
    }
}

impl FromStr for PortMapping {
    type Err = ProvisionError;

    /// Parse `"8080:8080"`, or a bare `"8080"` meaning the same port on both sides
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let invalid = || ProvisionError::ConfigError(format!("Invalid port mapping '{}'", s));
        let parse = |p: &str| p.trim().parse::<u16>().ok().filter(|&n| n != 0);

        match s.split_once(':') {
            Some((host, container)) => Ok(Self {
                host: parse(host).ok_or_else(invalid)?,
                container: parse(container).ok_or_else(invalid)?,
            }),
            None => {
                let port = parse(s).ok_or_else(invalid)?;
                Ok(Self::new(port, port))
            }
        }
    }
}

impl TryFrom<String> for PortMapping {
    type Error = ProvisionError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PortMapping> for String {
    fn from(mapping: PortMapping) -> Self {
        mapping.to_string()
    }
}

/// How the container process is attached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunMode {
    pub detached: bool,
    pub interactive: bool,
    pub tty: bool,
}

impl RunMode {
    /// Background process that keeps stdin open and a pseudo-terminal attached
    pub fn detached_interactive() -> Self {
        Self {
            detached: true,
            interactive: true,
            tty: true,
        }
    }

    fn flags(&self) -> Vec<String> {
        let mut flags = Vec::new();
        if self.detached {
            flags.push("-d".to_string());
        }
        if self.interactive {
            flags.push("-i".to_string());
        }
        if self.tty {
            flags.push("-t".to_string());
        }
        flags
    }
}

impl Default for RunMode {
    fn default() -> Self {
        Self::detached_interactive()
    }
}

/// Everything needed to start the container
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerLaunch {
    pub image: String,
    pub name: String,
    pub volumes: Vec<VolumeMount>,
    pub ports: Vec<PortMapping>,
    pub mode: RunMode,
}

impl ContainerLaunch {
    /// Arguments for `<engine> run` (safe from injection, no shell involved)
    pub fn run_args(&self) -> Vec<String> {
        let mut args = vec!["run".to_string()];
        args.extend(self.mode.flags());
        args.push("--name".to_string());
        args.push(self.name.clone());

        for volume in &self.volumes {
            args.push("-v".to_string());
            args.push(volume.to_arg());
        }

        for port in &self.ports {
            args.push("-p".to_string());
            args.push(port.to_string());
        }

        args.push(self.image.clone());
        args
    }
}

/// Arguments for `<engine> build`
///
/// `-f` is only passed when the descriptor is not the engine's default
/// `Dockerfile`, so the default invocation stays `build -t <tag> <context>`.
pub fn build_args(context: &Path, tag: &str, descriptor: &str) -> Vec<String> {
    let mut args = vec!["build".to_string(), "-t".to_string(), tag.to_string()];

    if descriptor != DEFAULT_DESCRIPTOR {
        args.push("-f".to_string());
        args.push(context.join(descriptor).to_string_lossy().to_string());
    }

    args.push(context.to_string_lossy().to_string());
    args
}

/// Build descriptor name the engine looks for when `-f` is absent
pub const DEFAULT_DESCRIPTOR: &str = "Dockerfile";

#[cfg(test)]
mod tests {
    use super::*;

    fn jenkins_launch() -> ContainerLaunch {
        ContainerLaunch {
            image: "jenkins-image".to_string(),
            name: "jenkins".to_string(),
            volumes: vec![
                VolumeMount::new("/srv/jenkins/volumes/jenkins_certs", "/certs/client"),
                VolumeMount::new("/srv/jenkins/volumes/jenkins_home", "/var/jenkins_home"),
            ],
            ports: vec![PortMapping::new(8080, 8080), PortMapping::new(50000, 50000)],
            mode: RunMode::detached_interactive(),
        }
    }

    #[test]
    fn test_run_args() {
        let args = jenkins_launch().run_args();
        assert_eq!(
            args,
            vec![
                "run",
                "-d",
                "-i",
                "-t",
                "--name",
                "jenkins",
                "-v",
                "/srv/jenkins/volumes/jenkins_certs:/certs/client",
                "-v",
                "/srv/jenkins/volumes/jenkins_home:/var/jenkins_home",
                "-p",
                "8080:8080",
                "-p",
                "50000:50000",
                "jenkins-image",
            ]
        );
    }

    #[test]
    fn test_run_args_foreground() {
        let mut launch = jenkins_launch();
        launch.mode = RunMode {
            detached: false,
            interactive: false,
            tty: false,
        };
        let args = launch.run_args();
        assert_eq!(args[1], "--name");
    }

    #[test]
    fn test_build_args_default_descriptor() {
        let args = build_args(Path::new("."), "jenkins-image", "Dockerfile");
        assert_eq!(args, vec!["build", "-t", "jenkins-image", "."]);
    }

    #[test]
    fn test_build_args_custom_descriptor() {
        let args = build_args(Path::new("ctx"), "jenkins-image", "Jenkins.Dockerfile");
        assert_eq!(args[3], "-f");
        assert!(args[4].ends_with("Jenkins.Dockerfile"));
        assert_eq!(args.last().map(String::as_str), Some("ctx"));
    }

    #[test]
    fn test_parse_port_mapping() {
        assert_eq!(
            "8080:80".parse::<PortMapping>().unwrap(),
            PortMapping::new(8080, 80)
        );
        assert_eq!(
            "50000".parse::<PortMapping>().unwrap(),
            PortMapping::new(50000, 50000)
        );
        assert!("abc".parse::<PortMapping>().is_err());
        assert!("0:80".parse::<PortMapping>().is_err());
        assert!("80:70000".parse::<PortMapping>().is_err());
    }
}
