use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod check;
pub mod completions;
pub mod plan;
pub mod up;

#[derive(Parser, Debug)]
#[command(name = "jenkins-provision")]
#[command(
    about = "Create Jenkins host volumes, build the image and start the container",
    long_about = "Without a subcommand, creates <jenkins_root>/volumes/<project>_certs and \
<project>_home, builds <project>-image from the current directory and starts a \
detached container named <project> publishing ports 8080 and 50000."
)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to ./provision.yml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create directories, build the image and start the container (default)
    Up,
    /// Show what would be done without touching anything
    Plan {
        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },
    /// Report whether provisioning can succeed right now
    Check,
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
