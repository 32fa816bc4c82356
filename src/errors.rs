use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("Cannot create directory {}: {reason}", .path.display())]
    Filesystem { path: PathBuf, reason: String },

    #[error("Image build failed: {reason}")]
    Build { reason: String, code: Option<i32> },

    #[error("Container name '{name}' is already in use. Remove the existing container first.")]
    Conflict { name: String, code: Option<i32> },

    #[error("Host port {} is already bound", .port.map(|p| p.to_string()).unwrap_or_else(|| "(unknown)".to_string()))]
    PortBind { port: Option<u16>, code: Option<i32> },

    #[error("Container runtime error: {reason}")]
    Runtime { reason: String, code: Option<i32> },

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProvisionError {
    /// Exit code to hand back to the invoking shell.
    ///
    /// Engine failures carry the engine's own exit code; everything else
    /// exits with 1.
    pub fn exit_code(&self) -> i32 {
        let code = match self {
            ProvisionError::Build { code, .. }
            | ProvisionError::Conflict { code, .. }
            | ProvisionError::PortBind { code, .. }
            | ProvisionError::Runtime { code, .. } => *code,
            _ => None,
        };

        match code {
            Some(c) if c != 0 => c,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, ProvisionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_propagates_engine_code() {
        let err = ProvisionError::Conflict {
            name: "jenkins".to_string(),
            code: Some(125),
        };
        assert_eq!(err.exit_code(), 125);
    }

    #[test]
    fn test_exit_code_defaults_to_one() {
        let err = ProvisionError::Filesystem {
            path: PathBuf::from("/x"),
            reason: "blocked".to_string(),
        };
        assert_eq!(err.exit_code(), 1);

        let err = ProvisionError::Build {
            reason: "missing Dockerfile".to_string(),
            code: None,
        };
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_port_bind_message() {
        let err = ProvisionError::PortBind {
            port: Some(8080),
            code: Some(125),
        };
        assert_eq!(err.to_string(), "Host port 8080 is already bound");

        let err = ProvisionError::PortBind {
            port: None,
            code: None,
        };
        assert!(err.to_string().contains("(unknown)"));
    }
}
