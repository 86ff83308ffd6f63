//! Application configuration.
//!
//! Values come from the process environment (optionally seeded from a `.env`
//! file) or from any lookup function, which keeps tests free of global state.
//!
//! | variable | default |
//! |---|---|
//! | `SECRET_KEY` | `secret-dev` |
//! | `API_PORT` | `3001` |
//! | `DATABASE_URL` | `jobly`, or `jobly_test` in the test environment |
//! | `JOBLY_ENV` | anything but `test` is the regular environment |

use crate::error::{JoblyError, JoblyResult};

pub const DEFAULT_SECRET_KEY: &str = "secret-dev";
pub const DEFAULT_PORT: u16 = 3001;

/// Runtime environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Regular,
    Test,
}

impl Environment {
    fn from_name(name: Option<&str>) -> Self {
        match name {
            Some("test") => Self::Test,
            _ => Self::Regular,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub secret_key: String,
    pub port: u16,
    /// Explicit `DATABASE_URL`, if set.
    pub database_url: Option<String>,
    pub environment: Environment,
}

impl Config {
    /// Load from the process environment, reading `.env` first if present.
    pub fn from_env() -> JoblyResult<Self> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(JoblyError::config(format!("failed to read .env: {e}")));
            }
        }
        let config = Self::from_lookup(|key| std::env::var(key).ok())?;

        tracing::info!(
            target: "jobly.config",
            port = config.port,
            database = %config.database_uri(),
            environment = ?config.environment,
            "configuration loaded"
        );
        Ok(config)
    }

    /// Resolve from an arbitrary lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> JoblyResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("API_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| {
                JoblyError::config(format!("API_PORT must be a port number, got {raw:?}: {e}"))
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            secret_key: get("SECRET_KEY").unwrap_or_else(|| DEFAULT_SECRET_KEY.to_string()),
            port,
            database_url: get("DATABASE_URL"),
            environment: Environment::from_name(get("JOBLY_ENV").as_deref()),
        })
    }

    pub fn is_test(&self) -> bool {
        self.environment == Environment::Test
    }

    /// Database connection string: `DATABASE_URL` if set, else the default
    /// database name for the environment.
    pub fn database_uri(&self) -> &str {
        match (&self.database_url, self.environment) {
            (Some(url), _) => url.as_str(),
            (None, Environment::Test) => "jobly_test",
            (None, Environment::Regular) => "jobly",
        }
    }

    /// Password hashing cost; minimal in tests to keep them fast.
    pub fn bcrypt_work_factor(&self) -> u32 {
        match self.environment {
            Environment::Test => 1,
            Environment::Regular => 12,
        }
    }
}
