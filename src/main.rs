use clap::Parser;
use jenkins_provision::cli::{self, Cli, Commands};
use jenkins_provision::config::Config;
use jenkins_provision::errors::Result;
use jenkins_provision::{logging, suggestions};
use std::env;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose, cli.quiet) {
        eprintln!("warning: {}", e);
    }

    // Completions need no config
    if let Some(Commands::Completions { shell }) = cli.command {
        return match cli::completions::run(shell) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => exit_code(e.exit_code()),
        };
    }

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            suggestions::display_error_with_suggestions(&e, "docker");
            return exit_code(e.exit_code());
        }
    };

    match dispatch(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            suggestions::display_error_with_suggestions(&e, &config.engine);
            exit_code(e.exit_code())
        }
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let cwd = env::current_dir()?;
    Config::load(&cwd, cli.config.as_deref())
}

fn dispatch(command: Option<Commands>, config: &Config) -> Result<()> {
    match command.unwrap_or(Commands::Up) {
        Commands::Up => cli::up::run(config)?,
        Commands::Plan { json } => cli::plan::run(config, json)?,
        Commands::Check => cli::check::run(config)?,
        Commands::Completions { shell } => cli::completions::run(shell)?,
    }

    Ok(())
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
