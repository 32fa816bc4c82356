use crate::config::Config;
use crate::errors::Result;
use crate::provisioner::{ProvisionReport, Provisioner};
use crate::runtime::{ContainerRuntime, DockerRuntime};
use colored::Colorize;

/// Provision against the configured engine
pub fn run(config: &Config) -> Result<()> {
    let runtime = DockerRuntime::new(&config.engine);
    run_with(config, &runtime).map(|_| ())
}

pub fn run_with<R: ContainerRuntime + ?Sized>(
    config: &Config,
    runtime: &R,
) -> Result<ProvisionReport> {
    println!("Provisioning '{}'...", config.container_name());

    let report = Provisioner::new(config, runtime).provision()?;

    for dir in &report.created_dirs {
        println!("{} Created {}", "✓".green(), dir.display());
    }
    for dir in &report.existing_dirs {
        println!("{} Exists  {}", "•".dimmed(), dir.display());
    }
    println!("{} Built image {}", "✓".green(), report.image.cyan());
    println!(
        "{} Started container {} ({})",
        "✓".green(),
        report.container_name.cyan().bold(),
        short_id(&report.container_id)
    );
    for port in &config.ports {
        println!("  {} host {} → container {}", "port".dimmed(), port.host, port.container);
    }

    Ok(report)
}

fn short_id(id: &str) -> &str {
    id.get(..12).unwrap_or(id)
}
