use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Environment variable pointing at an explicit `.env` file
pub const ENV_FILE_VAR: &str = "HEY_ENV_FILE";

/// Loaded when `HEY_ENV_FILE` is unset and the file exists
pub const DEFAULT_ENV_FILE: &str = "./.env";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown environment `{0}`, expected development, production or test")]
    UnknownEnvironment(String),
    #[error("failed to load environment file {path}")]
    EnvFile {
        path: String,
        #[source]
        source: dotenv::Error,
    },
}

/// Deployment the process runs in. Error reporting is only live in production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
    Test,
}

impl Environment {
    pub fn is_production(self) -> bool {
        self == Environment::Production
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Test => "test",
        }
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            "test" => Ok(Environment::Test),
            _ => Err(ConfigError::UnknownEnvironment(s.to_string())),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Load variables from `HEY_ENV_FILE`, or from `./.env` when it exists.
///
/// Returns the path that was loaded. A missing default file is not an error,
/// a missing explicit file is.
pub fn load_env() -> Result<Option<PathBuf>, ConfigError> {
    if let Ok(path) = env::var(ENV_FILE_VAR) {
        return load_from_path(&path).map(Some);
    }

    if Path::new(DEFAULT_ENV_FILE).exists() {
        return load_from_path(DEFAULT_ENV_FILE).map(Some);
    }

    Ok(None)
}

fn load_from_path(path: &str) -> Result<PathBuf, ConfigError> {
    dotenv::from_path(path).map_err(|source| ConfigError::EnvFile {
        path: path.to_string(),
        source,
    })?;
    Ok(PathBuf::from(path))
}
