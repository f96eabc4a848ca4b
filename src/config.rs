use crate::error::ModelError;

const DATABASE_URL: &str = "DATABASE_URL";
const MAX_CONNECTIONS: &str = "HEALTH_PULSE_MAX_CONNECTIONS";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub database_url: String,
    pub max_connections: u32,
}

impl Settings {
    pub fn from_env() -> Result<Self, ModelError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ModelError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup(DATABASE_URL)
            .filter(|value| !value.trim().is_empty())
            .ok_or(ModelError::MissingSetting(DATABASE_URL))?;

        let max_connections = match lookup(MAX_CONNECTIONS) {
            None => DEFAULT_MAX_CONNECTIONS,
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|value| *value > 0)
                .ok_or(ModelError::InvalidSetting {
                    key: MAX_CONNECTIONS,
                    value: raw,
                })?,
        };

        Ok(Self {
            database_url,
            max_connections,
        })
    }
}
