use serde::Deserialize;
use std::env;
use std::sync::OnceLock;
use thiserror::Error;

/// Default cap on the number of students returned by a list request.
pub const DEFAULT_LIST_LIMIT: i64 = 1000;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable was not provided.
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
    /// Configuration was installed more than once.
    #[error("Configuration already initialized")]
    AlreadyInitialized,
}

/// Runtime configuration for the student registry server.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Storage backend holding student documents.
    pub store_backend: StoreBackend,
    /// MongoDB connection string, required for the `mongo` backend.
    pub mongodb_uri: Option<String>,
    /// Database that owns the student collection.
    pub mongodb_database: String,
    /// Collection storing one document per student.
    pub mongodb_collection: String,
    /// Maximum number of students returned by `GET /students`.
    pub list_limit: i64,
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
}

/// Supported storage backends for student documents.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// External MongoDB deployment.
    Mongo,
    /// Process-local map, useful for demos and tests.
    Memory,
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let store_backend = match optional("STORE_BACKEND") {
            Some(value) => value
                .parse()
                .map_err(|()| ConfigError::InvalidValue("STORE_BACKEND".into()))?,
            None => StoreBackend::Mongo,
        };

        let mongodb_uri = optional("MONGODB_URI");
        if store_backend == StoreBackend::Mongo && mongodb_uri.is_none() {
            return Err(ConfigError::MissingVariable("MONGODB_URI".into()));
        }

        let list_limit = optional("STUDENTS_LIST_LIMIT")
            .map(|value| {
                value
                    .trim()
                    .parse::<i64>()
                    .ok()
                    .filter(|limit| *limit > 0)
                    .ok_or_else(|| ConfigError::InvalidValue("STUDENTS_LIST_LIMIT".into()))
            })
            .transpose()?
            .unwrap_or(DEFAULT_LIST_LIMIT);

        Ok(Self {
            store_backend,
            mongodb_uri,
            mongodb_database: optional("MONGODB_DATABASE").unwrap_or_else(|| "student_db".into()),
            mongodb_collection: optional("MONGODB_COLLECTION")
                .unwrap_or_else(|| "students".into()),
            list_limit,
            server_port: optional("SERVER_PORT")
                .map(|value| {
                    value
                        .trim()
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".into()))
                })
                .transpose()?,
        })
    }
}

impl std::str::FromStr for StoreBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(Self::Mongo),
            "memory" => Ok(Self::Memory),
            _ => Err(()),
        }
    }
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, panicking if initialization has not occurred.
pub fn get_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

/// Load configuration from the environment (and `.env`) and install it in the global cache.
pub fn init_config() -> Result<&'static Config, ConfigError> {
    dotenvy::dotenv().ok();
    install(Config::from_env()?)
}

fn install(config: Config) -> Result<&'static Config, ConfigError> {
    CONFIG
        .set(config)
        .map_err(|_| ConfigError::AlreadyInitialized)?;
    Ok(get_config())
}
