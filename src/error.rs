use thiserror::Error;

/// Errors raised while turning stored or imported values into domain types.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("unknown task status: {0}")]
    UnknownTaskStatus(String),

    #[error("unknown project phase: {0}")]
    UnknownPhase(String),

    #[error("invalid value for {key}: {value}")]
    InvalidSetting { key: &'static str, value: String },

    #[error("{0} must be set to a production Postgres instance")]
    MissingSetting(&'static str),
}
