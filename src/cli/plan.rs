use crate::config::Config;
use crate::container::{build_args, ContainerLaunch};
use crate::errors::{ProvisionError, Result};
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

/// Side-effect free description of a provisioning run
#[derive(Debug, Serialize)]
pub struct Plan {
    pub directories: Vec<PathBuf>,
    pub build: Vec<String>,
    pub run: Vec<String>,
    pub launch: ContainerLaunch,
}

impl Plan {
    pub fn from_config(config: &Config) -> Self {
        let mut build = vec![config.engine.clone()];
        build.extend(build_args(
            &config.context,
            &config.image_tag(),
            &config.descriptor,
        ));

        let launch = config.launch();
        let mut run = vec![config.engine.clone()];
        run.extend(launch.run_args());

        Self {
            directories: config.host_directories(),
            build,
            run,
            launch,
        }
    }
}

/// Print the plan without touching the filesystem or the engine
pub fn run(config: &Config, json: bool) -> Result<()> {
    let plan = Plan::from_config(config);

    if json {
        let out = serde_json::to_string_pretty(&plan)
            .map_err(|e| ProvisionError::ConfigError(format!("Failed to serialize plan: {}", e)))?;
        println!("{}", out);
        return Ok(());
    }

    println!("{}", "Directories".bold());
    for dir in &plan.directories {
        println!("  mkdir -p {}", shell_words::quote(&dir.to_string_lossy()));
    }
    println!("{}", "Build".bold());
    println!("  {}", shell_words::join(&plan.build));
    println!("{}", "Run".bold());
    println!("  {}", shell_words::join(&plan.run));

    Ok(())
}
