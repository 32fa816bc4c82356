use crate::config::Config;
use crate::errors::{ProvisionError, Result};
use crate::ports;
use crate::runtime::docker::check_build_context;
use crate::runtime::{ContainerRuntime, DockerRuntime};
use colored::Colorize;

/// Read-only preflight: engine, build context, container name, host ports
pub fn run(config: &Config) -> Result<()> {
    let runtime = DockerRuntime::new(&config.engine);
    run_with(config, &runtime, ports::is_port_free)
}

pub fn run_with<R, F>(config: &Config, runtime: &R, port_free: F) -> Result<()>
where
    R: ContainerRuntime + ?Sized,
    F: Fn(u16) -> bool,
{
    let mut first_failure: Option<ProvisionError> = None;
    let mut record = |ok: bool, label: String, err: Option<ProvisionError>| {
        if ok {
            println!("{} {}", "✓".green(), label);
        } else {
            println!("{} {}", "✗".red(), label);
            if first_failure.is_none() {
                first_failure = err;
            }
        }
    };

    let available = runtime.is_available();
    record(
        available,
        format!("engine '{}' reachable", config.engine),
        Some(ProvisionError::Runtime {
            reason: format!("engine '{}' is not reachable", config.engine),
            code: None,
        }),
    );

    let context = check_build_context(&config.context, &config.descriptor);
    record(
        context.is_ok(),
        format!(
            "build descriptor {}",
            config.context.join(&config.descriptor).display()
        ),
        context.err(),
    );

    let name = config.container_name();
    if available {
        match runtime.exists_by_name(&name) {
            Ok(taken) => record(
                !taken,
                format!("container name '{}' free", name),
                Some(ProvisionError::Conflict {
                    name: name.clone(),
                    code: None,
                }),
            ),
            Err(e) => record(false, format!("container name '{}' free", name), Some(e)),
        }
    }

    for mapping in &config.ports {
        let free = port_free(mapping.host);
        record(
            free,
            format!("host port {} free", mapping.host),
            Some(ProvisionError::PortBind {
                port: Some(mapping.host),
                code: None,
            }),
        );
    }

    match first_failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
