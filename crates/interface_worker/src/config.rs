//! Worker configuration

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use application::ConfigurationJobs;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Lecture de la configuration impossible: {0}")]
    Lecture(#[from] config::ConfigError),

    #[error("La variable WORKER_{0} est obligatoire")]
    Manquante(&'static str),
}

/// Worker configuration, read from `WORKER_*` variables
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// HTTP host
    pub host: String,
    /// HTTP port
    pub port: u16,
    /// PostgreSQL connection string
    pub database_url: String,
    /// Secret the access tokens are signed with
    pub jwt_secret: String,
    /// Default level when `RUST_LOG` is not set
    pub log_level: String,
    /// `pretty` or `json`
    pub log_format: String,
    /// Delay between two polls of the planificateur
    pub poll_interval_secs: u64,
    /// Maximum number of jobs claimed per poll
    pub batch_jobs: u64,
    /// Jobs running at the same time
    pub max_jobs_simultanes: u32,
    pub pause_entre_notifications_ms: u64,
    pub retention_suivi_jobs_jours: i64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_url: String::new(),
            jwt_secret: String::new(),
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            poll_interval_secs: 10,
            batch_jobs: 20,
            max_jobs_simultanes: 4,
            pause_entre_notifications_ms: 500,
            retention_suivi_jobs_jours: 30,
        }
    }
}

impl WorkerConfig {
    /// Loads configuration from the environment, a `.env` file included
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config: WorkerConfig = config::Config::builder()
            .add_source(config::Environment::with_prefix("WORKER"))
            .build()?
            .try_deserialize()?;
        config.verifier()
    }

    /// The database and the token secret have no usable default
    pub fn verifier(self) -> Result<Self, ConfigError> {
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::Manquante("DATABASE_URL"));
        }
        if self.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Manquante("JWT_SECRET"));
        }
        Ok(self)
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    pub fn json_logs(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }

    pub fn configuration_jobs(&self) -> ConfigurationJobs {
        ConfigurationJobs {
            pause_entre_notifications: Duration::from_millis(self.pause_entre_notifications_ms),
            retention_suivi_jobs_jours: self.retention_suivi_jobs_jours,
        }
    }
}
