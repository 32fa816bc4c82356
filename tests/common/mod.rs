/// Common test utilities for jenkins-provision integration tests
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// A scratch workspace: build context, jenkins root and a config file
#[allow(dead_code)]
pub struct TestWorkspace {
    pub temp_dir: TempDir,
    pub context: PathBuf,
    pub jenkins_root: PathBuf,
}

impl TestWorkspace {
    /// Create a workspace whose build context holds a Dockerfile
    pub fn new() -> Self {
        let workspace = Self::without_descriptor();
        std::fs::write(
            workspace.context.join("Dockerfile"),
            "FROM jenkins/jenkins:lts\n",
        )
        .expect("Failed to write Dockerfile");
        workspace
    }

    /// Create a workspace with an empty build context
    pub fn without_descriptor() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let context = temp_dir.path().join("context");
        std::fs::create_dir(&context).expect("Failed to create context directory");
        let jenkins_root = temp_dir.path().join("jenkins");

        let workspace = TestWorkspace {
            temp_dir,
            context,
            jenkins_root,
        };
        workspace.create_config("");
        workspace
    }

    /// Write provision.yml in the context, always pinning jenkins_root into the workspace
    pub fn create_config(&self, extra: &str) {
        let content = format!("jenkins_root: {}\n{}", self.jenkins_root.display(), extra);
        std::fs::write(self.context.join("provision.yml"), content)
            .expect("Failed to write config file");
    }

    #[allow(dead_code)]
    pub fn certs_dir(&self) -> PathBuf {
        self.jenkins_root.join("volumes").join("jenkins_certs")
    }

    #[allow(dead_code)]
    pub fn home_dir(&self) -> PathBuf {
        self.jenkins_root.join("volumes").join("jenkins_home")
    }

    /// Install a shell script standing in for the engine CLI and point the config at it
    ///
    /// The script appends each invocation to `engine.log` and keeps a marker
    /// file per started container so a second `run` reports a name conflict.
    #[cfg(unix)]
    #[allow(dead_code)]
    pub fn install_fake_engine(&self, busy_port: Option<u16>) -> PathBuf {
        self.install_fake_engine_with(busy_port, 0)
    }

    /// Same as `install_fake_engine`, with `build` exiting `build_exit`
    #[cfg(unix)]
    #[allow(dead_code)]
    pub fn install_fake_engine_with(&self, busy_port: Option<u16>, build_exit: i32) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let state = self.temp_dir.path().join("engine-state");
        std::fs::create_dir_all(&state).expect("Failed to create engine state dir");
        let log = self.engine_log();
        let busy = busy_port.map(|p| p.to_string()).unwrap_or_default();

        let script = format!(
            r#"#!/bin/sh
echo "$@" >> "{log}"
case "$1" in
  version) exit 0 ;;
  build) exit {build_exit} ;;
  ps) [ -f "{state}/jenkins" ] && echo jenkins; exit 0 ;;
  run)
    if [ -f "{state}/jenkins" ]; then
      echo 'docker: Error response from daemon: Conflict. The container name "/jenkins" is already in use by container "4f1c". You have to remove (or rename) that container to be able to reuse that name.' >&2
      exit 125
    fi
    if [ -n "{busy}" ]; then
      echo 'docker: Error response from daemon: driver failed programming external connectivity on endpoint jenkins: Bind for 0.0.0.0:{busy} failed: port is already allocated.' >&2
      exit 125
    fi
    touch "{state}/jenkins"
    echo 0123456789abcdef0123456789abcdef
    exit 0 ;;
esac
exit 1
"#,
            log = log.display(),
            state = state.display(),
            busy = busy,
            build_exit = build_exit,
        );

        let path = self.temp_dir.path().join("fake-engine");
        std::fs::write(&path, script).expect("Failed to write fake engine");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("Failed to make fake engine executable");

        self.create_config(&format!("engine: {}\n", path.display()));
        path
    }

    #[allow(dead_code)]
    pub fn engine_log(&self) -> PathBuf {
        self.temp_dir.path().join("engine.log")
    }

    /// Lines the fake engine recorded, one per invocation
    #[allow(dead_code)]
    pub fn engine_calls(&self) -> Vec<String> {
        std::fs::read_to_string(self.engine_log())
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Run jenkins-provision from the build context
    pub fn provision(&self, args: &[&str]) -> CommandResult {
        run_in(&self.context, args)
    }
}

/// Run the binary in `dir`
pub fn run_in(dir: &Path, args: &[&str]) -> CommandResult {
    let output = Command::new(env!("CARGO_BIN_EXE_jenkins-provision"))
        .args(args)
        .current_dir(dir)
        .output()
        .expect("Failed to execute jenkins-provision");

    CommandResult {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        success: output.status.success(),
        exit_code: output.status.code(),
    }
}

/// Result of running a command
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    pub exit_code: Option<i32>,
}

impl CommandResult {
    /// Assert the command succeeded
    pub fn assert_success(&self) {
        if !self.success {
            panic!(
                "Command failed:\nstdout: {}\nstderr: {}\nexit code: {:?}",
                self.stdout, self.stderr, self.exit_code
            );
        }
    }

    /// Assert the command failed
    #[allow(dead_code)]
    pub fn assert_failure(&self) {
        if self.success {
            panic!(
                "Command succeeded when it should have failed:\nstdout: {}\nstderr: {}",
                self.stdout, self.stderr
            );
        }
    }

    /// Assert stdout contains text
    #[allow(dead_code)]
    pub fn assert_stdout_contains(&self, text: &str) {
        assert!(
            self.stdout.contains(text),
            "stdout does not contain '{}'\nstdout: {}",
            text,
            self.stdout
        );
    }

    /// Assert stderr contains text
    #[allow(dead_code)]
    pub fn assert_stderr_contains(&self, text: &str) {
        assert!(
            self.stderr.contains(text),
            "stderr does not contain '{}'\nstderr: {}",
            text,
            self.stderr
        );
    }
}
