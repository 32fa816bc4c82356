use crate::cli::Cli;
use crate::errors::Result;
use clap::CommandFactory;
use clap_complete::{generate, Shell};
use std::io;

/// Print a completion script for `shell` to stdout
///
/// ```bash
/// jenkins-provision completions bash > ~/.local/share/bash-completion/completions/jenkins-provision
/// ```
pub fn run(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
