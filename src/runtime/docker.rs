// Docker engine backend
// Builds images and starts containers by invoking the engine CLI directly

use crate::container::{build_args, ContainerLaunch};
use crate::errors::{ProvisionError, Result};
use crate::runtime::ContainerRuntime;
use regex::Regex;
use std::io::ErrorKind;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use std::sync::OnceLock;
use tracing::debug;

/// Default engine program
pub const DEFAULT_ENGINE: &str = "docker";

/// Container runtime backed by the `docker` CLI (or a compatible one such as `podman`)
#[derive(Debug, Clone)]
pub struct DockerRuntime {
    program: String,
}

impl DockerRuntime {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Spawn error for a missing engine binary is reported as a runtime error
    fn spawn_error(&self, err: std::io::Error) -> ProvisionError {
        if err.kind() == ErrorKind::NotFound {
            ProvisionError::Runtime {
                reason: format!("'{}' not found on PATH. Please install it.", self.program),
                code: None,
            }
        } else {
            ProvisionError::Io(err)
        }
    }

    fn output(&self, args: &[String]) -> Result<Output> {
        debug!(program = %self.program, ?args, "invoking engine");
        Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| self.spawn_error(e))
    }
}

impl Default for DockerRuntime {
    fn default() -> Self {
        Self::new(DEFAULT_ENGINE)
    }
}

impl ContainerRuntime for DockerRuntime {
    fn is_available(&self) -> bool {
        Command::new(&self.program)
            .args(["version", "--format", "{{.Server.Version}}"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    fn build(&self, context: &Path, descriptor: &str, tag: &str) -> Result<()> {
        check_build_context(context, descriptor)?;

        let args = build_args(context, tag, descriptor);
        debug!(program = %self.program, ?args, "invoking engine");

        // Build output goes straight to the operator's terminal
        let status = Command::new(&self.program)
            .args(&args)
            .status()
            .map_err(|e| self.spawn_error(e))?;

        if !status.success() {
            return Err(ProvisionError::Build {
                reason: format!("'{} build' exited with {}", self.program, status),
                code: status.code(),
            });
        }

        Ok(())
    }

    fn run(&self, launch: &ContainerLaunch) -> Result<String> {
        let output = self.output(&launch.run_args())?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(classify_run_failure(
                &stderr,
                &launch.name,
                output.status.code(),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn exists_by_name(&self, name: &str) -> Result<bool> {
        let args = vec![
            "ps".to_string(),
            "-a".to_string(),
            "--filter".to_string(),
            format!("name=^/{}$", name),
            "--format".to_string(),
            "{{.Names}}".to_string(),
        ];
        let output = self.output(&args)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ProvisionError::Runtime {
                reason: format!("Failed to list containers: {}", stderr.trim()),
                code: output.status.code(),
            });
        }

        // The name filter is a regex match, so compare exactly
        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .any(|line| line.trim() == name))
    }
}

/// Verify the build context and descriptor before handing off to the engine
pub fn check_build_context(context: &Path, descriptor: &str) -> Result<()> {
    if !context.is_dir() {
        return Err(ProvisionError::Build {
            reason: format!("build context {} is not a directory", context.display()),
            code: None,
        });
    }

    let descriptor_path = context.join(descriptor);
    if !descriptor_path.is_file() {
        return Err(ProvisionError::Build {
            reason: format!("build descriptor {} not found", descriptor_path.display()),
            code: None,
        });
    }

    Ok(())
}

/// Host port in the engine's bind errors:
/// `Bind for 0.0.0.0:8080 failed`, `listen tcp4 0.0.0.0:8080: bind`,
/// and `bind host port for 0.0.0.0:8080:172.17.0.2:8080/tcp`
fn port_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?:bind host port for (?:\[[^\]]*\]|[^:\s]+):(?P<host>\d{1,5}):)|(?::(?P<legacy>\d{1,5})(?: failed: port is already allocated|: bind: address already in use))",
        )
        .expect("static regex")
    })
}

/// Name clash as reported by docker (`... is already in use by container "<id>"`)
/// and podman (`the container name "x" is already in use by <id> ... that name is already in use`)
fn name_conflict_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?i)container name "[^"]*" is already in use|that name is already in use|is already in use by container|conflict\."#)
            .expect("static regex")
    })
}

/// Map a failed `run` onto the error taxonomy using the engine's stderr
pub fn classify_run_failure(stderr: &str, name: &str, code: Option<i32>) -> ProvisionError {
    if name_conflict_pattern().is_match(stderr) {
        return ProvisionError::Conflict {
            name: name.to_string(),
            code,
        };
    }

    let lowered = stderr.to_lowercase();
    if lowered.contains("port is already allocated") || lowered.contains("address already in use") {
        let port = port_pattern()
            .captures(stderr)
            .and_then(|caps| caps.name("host").or_else(|| caps.name("legacy")))
            .and_then(|m| m.as_str().parse::<u16>().ok());
        return ProvisionError::PortBind { port, code };
    }

    ProvisionError::Runtime {
        reason: stderr.trim().to_string(),
        code,
    }
}
