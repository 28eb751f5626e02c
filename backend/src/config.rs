//! Server configuration, read once at startup from the environment.
//!
//! | variable                   | default          |
//! |----------------------------|------------------|
//! | `ADMIN_HOST`               | `127.0.0.1`      |
//! | `ADMIN_PORT`               | `5000`           |
//! | `ADMIN_DATABASE`           | `parking.sqlite` |
//! | `ADMIN_REPORTS_DIR`        | `reports`        |
//! | `ADMIN_JOB_RETENTION_SECS` | `3600`           |

use log::warn;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_DATABASE: &str = "parking.sqlite";
const DEFAULT_REPORTS_DIR: &str = "reports";
const DEFAULT_JOB_RETENTION_SECS: u64 = 3600;

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// SQLite file holding lots, spots and reservations.
    pub database_path: PathBuf,
    /// Directory generated CSV exports are written to and served from.
    pub reports_dir: PathBuf,
    /// How long finished jobs stay listed before they are forgotten.
    pub job_retention: Duration,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; blank or invalid values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let value = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = match value("ADMIN_PORT") {
            Some(raw) => raw.parse::<u16>().unwrap_or_else(|_| {
                warn!("ADMIN_PORT={} is not a valid port, using {}", raw, DEFAULT_PORT);
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        let retention_secs = match value("ADMIN_JOB_RETENTION_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    warn!(
                        "ADMIN_JOB_RETENTION_SECS={} is not a positive number of seconds, using {}",
                        raw, DEFAULT_JOB_RETENTION_SECS
                    );
                    DEFAULT_JOB_RETENTION_SECS
                }
            },
            None => DEFAULT_JOB_RETENTION_SECS,
        };

        Self {
            host: value("ADMIN_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            database_path: PathBuf::from(
                value("ADMIN_DATABASE").unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
            ),
            reports_dir: PathBuf::from(
                value("ADMIN_REPORTS_DIR").unwrap_or_else(|| DEFAULT_REPORTS_DIR.to_string()),
            ),
            job_retention: Duration::from_secs(retention_secs),
        }
    }
}
