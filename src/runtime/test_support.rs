// In-memory container runtime for tests
// Models the engine's name and port namespaces and records every call.
// Compiled only for unit tests or with the `test-support` feature.

use crate::container::ContainerLaunch;
use crate::errors::{ProvisionError, Result};
use crate::runtime::docker::check_build_context;
use crate::runtime::ContainerRuntime;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Exit code the docker CLI uses for daemon-side failures
const ENGINE_ERROR_CODE: i32 = 125;

/// A call made against the fake, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeCall {
    Build {
        context: PathBuf,
        descriptor: String,
        tag: String,
    },
    Run(ContainerLaunch),
    ExistsByName(String),
}

#[derive(Debug, Default)]
struct FakeState {
    calls: Vec<RuntimeCall>,
    images: BTreeSet<String>,
    containers: BTreeMap<String, ContainerLaunch>,
    bound_ports: BTreeSet<u16>,
    next_id: u64,
}

/// Fake engine that never touches a real daemon
#[derive(Debug, Default)]
pub struct FakeRuntime {
    state: RefCell<FakeState>,
    unavailable: bool,
    build_failure: Option<i32>,
}

impl FakeRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend a container with this name already exists
    pub fn with_existing_container(self, name: &str) -> Self {
        self.state.borrow_mut().containers.insert(
            name.to_string(),
            ContainerLaunch {
                image: "unknown".to_string(),
                name: name.to_string(),
                volumes: Vec::new(),
                ports: Vec::new(),
                mode: Default::default(),
            },
        );
        self
    }

    /// Pretend another process already holds this host port
    pub fn with_bound_port(self, port: u16) -> Self {
        self.state.borrow_mut().bound_ports.insert(port);
        self
    }

    /// Make every build step fail with the given engine exit code
    pub fn with_failing_build(mut self, exit_code: i32) -> Self {
        self.build_failure = Some(exit_code);
        self
    }

    /// Report the engine as unreachable
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    pub fn calls(&self) -> Vec<RuntimeCall> {
        self.state.borrow().calls.clone()
    }

    pub fn has_image(&self, tag: &str) -> bool {
        self.state.borrow().images.contains(tag)
    }

    /// Launch recorded for a container started through this fake
    pub fn container(&self, name: &str) -> Option<ContainerLaunch> {
        self.state.borrow().containers.get(name).cloned()
    }

    pub fn container_count(&self) -> usize {
        self.state.borrow().containers.len()
    }

    fn record(&self, call: RuntimeCall) {
        self.state.borrow_mut().calls.push(call);
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable {
            return Err(ProvisionError::Runtime {
                reason: "engine not available".to_string(),
                code: None,
            });
        }
        Ok(())
    }
}

impl ContainerRuntime for FakeRuntime {
    fn is_available(&self) -> bool {
        !self.unavailable
    }

    fn build(&self, context: &Path, descriptor: &str, tag: &str) -> Result<()> {
        self.record(RuntimeCall::Build {
            context: context.to_path_buf(),
            descriptor: descriptor.to_string(),
            tag: tag.to_string(),
        });

        self.check_available()?;
        check_build_context(context, descriptor)?;

        if let Some(code) = self.build_failure {
            return Err(ProvisionError::Build {
                reason: format!("build step failed with exit code {}", code),
                code: Some(code),
            });
        }

        self.state.borrow_mut().images.insert(tag.to_string());
        Ok(())
    }

    fn run(&self, launch: &ContainerLaunch) -> Result<String> {
        self.record(RuntimeCall::Run(launch.clone()));
        self.check_available()?;

        let mut state = self.state.borrow_mut();

        if !state.images.contains(&launch.image) {
            return Err(ProvisionError::Runtime {
                reason: format!("Unable to find image '{}'", launch.image),
                code: Some(ENGINE_ERROR_CODE),
            });
        }

        if state.containers.contains_key(&launch.name) {
            return Err(ProvisionError::Conflict {
                name: launch.name.clone(),
                code: Some(ENGINE_ERROR_CODE),
            });
        }

        if let Some(port) = launch
            .ports
            .iter()
            .map(|p| p.host)
            .find(|p| state.bound_ports.contains(p))
        {
            return Err(ProvisionError::PortBind {
                port: Some(port),
                code: Some(ENGINE_ERROR_CODE),
            });
        }

        state.bound_ports.extend(launch.ports.iter().map(|p| p.host));
        state.containers.insert(launch.name.clone(), launch.clone());
        state.next_id += 1;

        Ok(format!("{:064x}", state.next_id))
    }

    fn exists_by_name(&self, name: &str) -> Result<bool> {
        self.record(RuntimeCall::ExistsByName(name.to_string()));
        self.check_available()?;

        Ok(self.state.borrow().containers.contains_key(name))
    }
}
