// Error suggestion system for better operator experience
use crate::errors::ProvisionError;
use colored::Colorize;

/// Display an error with helpful suggestions
pub fn display_error_with_suggestions(error: &ProvisionError, engine: &str) {
    eprintln!("\n{}: {}", "Error".bright_red().bold(), error);

    let suggestions = suggestions_for(error, engine);
    if suggestions.is_empty() {
        return;
    }

    eprintln!("\n{}:", "Suggestions".bright_yellow());
    for (text, command) in suggestions {
        match command {
            Some(cmd) => eprintln!("  • {}: {}", text, cmd.bright_cyan()),
            None => eprintln!("  • {}", text),
        }
    }
}

/// Suggestion lines for an error: description plus an optional command
pub fn suggestions_for(error: &ProvisionError, engine: &str) -> Vec<(String, Option<String>)> {
    match error {
        // Pre-existing containers are never removed automatically
        ProvisionError::Conflict { name, .. } => vec![
            (
                "Inspect the existing container".to_string(),
                Some(format!("{} ps -a --filter name=^/{}$", engine, name)),
            ),
            (
                "Remove it manually, then run again".to_string(),
                Some(format!("{} rm -f {}", engine, name)),
            ),
        ],

        ProvisionError::PortBind { port, .. } => {
            let mut lines = vec![(
                "Find which container publishes the port".to_string(),
                Some(format!("{} ps --format '{{{{.Names}}}} {{{{.Ports}}}}'", engine)),
            )];
            if let Some(p) = port {
                lines.push((
                    "Find which process listens on it".to_string(),
                    Some(format!("ss -ltnp 'sport = :{}'", p)),
                ));
            }
            lines.push((
                "Or publish different host ports in provision.yml".to_string(),
                None,
            ));
            lines
        }

        ProvisionError::Build { code: None, .. } => vec![(
            "Make sure the build context contains a Dockerfile (or set `descriptor:`)".to_string(),
            None,
        )],

        ProvisionError::Build { .. } => vec![(
            "Re-run the build by hand to see the failing step".to_string(),
            Some(format!("{} build .", engine)),
        )],

        ProvisionError::Runtime { code: None, .. } => vec![
            ("Check that the engine is installed and running".to_string(), Some(format!("{} version", engine))),
        ],

        ProvisionError::Filesystem { .. } => vec![(
            "Check permissions on the jenkins root, or set `jenkins_root:` in provision.yml".to_string(),
            None,
        )],

        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_suggests_manual_removal() {
        let err = ProvisionError::Conflict {
            name: "jenkins".to_string(),
            code: Some(125),
        };
        let lines = suggestions_for(&err, "docker");
        assert!(lines
            .iter()
            .any(|(_, cmd)| cmd.as_deref() == Some("docker rm -f jenkins")));
    }

    #[test]
    fn test_port_bind_mentions_port() {
        let err = ProvisionError::PortBind {
            port: Some(50000),
            code: Some(125),
        };
        let lines = suggestions_for(&err, "podman");
        assert!(lines
            .iter()
            .filter_map(|(_, cmd)| cmd.as_deref())
            .any(|cmd| cmd.contains(":50000")));
        assert!(lines[0].1.as_deref().unwrap().starts_with("podman ps"));
    }

    #[test]
    fn test_config_error_has_no_suggestions() {
        let err = ProvisionError::ConfigError("bad".to_string());
        assert!(suggestions_for(&err, "docker").is_empty());
    }
}
