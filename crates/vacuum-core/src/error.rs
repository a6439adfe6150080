use thiserror::Error;
use vacuum_platform::TransformId;

pub type Result<T> = std::result::Result<T, VacuumError>;

#[derive(Debug, Error)]
pub enum VacuumError {
    #[error("required system `{0}` is not registered")]
    MissingSystem(&'static str),
    #[error("vacuum effect updated before start")]
    NotStarted,
    #[error("vacuum target {0:?} no longer exists")]
    TargetMissing(TransformId),
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
    #[error("failed to play collected sound")]
    Audio(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("failed to parse settings")]
    Config(#[from] toml::de::Error),
    #[error("failed to read settings file")]
    Io(#[from] std::io::Error),
}
