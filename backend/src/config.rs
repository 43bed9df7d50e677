//! Process configuration.
//!
//! Loaded once at startup: defaults, then the YAML file named by `TAXI_CONFIG`, then
//! `TAXI_*` environment variables. Immutable afterwards.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

pub const CONFIG_PATH_VAR: &str = "TAXI_CONFIG";

/// A driver created at startup when no driver with that username exists yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BootstrapDriver {
    pub username: String,
    pub password: String,
    pub license_number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_address: String,
    /// Origin allowed by CORS. Cross-origin requests are refused when unset.
    pub cors_allowed_origin: Option<String>,
    pub session_ttl_hours: i64,
    pub password_iterations: u32,
    pub bootstrap_driver: Option<BootstrapDriver>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:taxi.db".to_string(),
            bind_address: "127.0.0.1:8000".to_string(),
            cors_allowed_origin: None,
            session_ttl_hours: 24 * 14,
            password_iterations: 260_000,
            bootstrap_driver: None,
        }
    }
}

impl AppConfig {
    /// Load the configuration for this process
    pub fn load() -> Result<Self> {
        let mut config = match env::var(CONFIG_PATH_VAR) {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: AppConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Apply `TAXI_*` overrides read through `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("TAXI_DATABASE_URL") {
            self.database_url = url;
        }
        if let Some(address) = lookup("TAXI_BIND_ADDRESS") {
            self.bind_address = address;
        }
        if let Some(origin) = lookup("TAXI_CORS_ALLOWED_ORIGIN") {
            self.cors_allowed_origin = Some(origin);
        }
        if let Some(hours) = lookup("TAXI_SESSION_TTL_HOURS") {
            self.session_ttl_hours = hours
                .parse()
                .with_context(|| format!("TAXI_SESSION_TTL_HOURS is not a number: {}", hours))?;
        }
        if let Some(iterations) = lookup("TAXI_PASSWORD_ITERATIONS") {
            self.password_iterations = iterations
                .parse()
                .with_context(|| format!("TAXI_PASSWORD_ITERATIONS is not a number: {}", iterations))?;
        }

        let username = lookup("TAXI_BOOTSTRAP_USERNAME");
        let password = lookup("TAXI_BOOTSTRAP_PASSWORD");
        let license_number = lookup("TAXI_BOOTSTRAP_LICENSE_NUMBER");
        match (username, password, license_number) {
            (Some(username), Some(password), Some(license_number)) => {
                self.bootstrap_driver = Some(BootstrapDriver {
                    username,
                    password,
                    license_number,
                });
            }
            (None, None, None) => {}
            _ => bail!(
                "TAXI_BOOTSTRAP_USERNAME, TAXI_BOOTSTRAP_PASSWORD and \
                 TAXI_BOOTSTRAP_LICENSE_NUMBER must be set together"
            ),
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.database_url.trim().is_empty() {
            bail!("database_url must not be empty");
        }
        self.bind_address
            .parse::<std::net::SocketAddr>()
            .with_context(|| format!("Invalid bind_address: {}", self.bind_address))?;
        if self.session_ttl_hours <= 0 {
            bail!("session_ttl_hours must be positive, got {}", self.session_ttl_hours);
        }
        if self.password_iterations == 0 {
            bail!("password_iterations must be positive");
        }
        if let Some(origin) = &self.cors_allowed_origin {
            origin
                .parse::<axum::http::HeaderValue>()
                .with_context(|| format!("Invalid cors_allowed_origin: {}", origin))?;
        }
        Ok(())
    }

    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.session_ttl_hours)
    }
}
