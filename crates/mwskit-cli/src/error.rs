use mwskit_core::{ConfigError, MwsError, MwsErrorKind};
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Mws(#[from] MwsError),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::InvalidArgument(_) => 2,
            Self::Mws(error) => match error.kind() {
                MwsErrorKind::Configuration
                | MwsErrorKind::Validation
                | MwsErrorKind::UnknownOperation => 2,
                MwsErrorKind::Service => 3,
                MwsErrorKind::Transport => 4,
                MwsErrorKind::Decode => 5,
            },
            Self::Serialization(_) => 5,
            Self::Io(_) => 10,
        }
    }
}
