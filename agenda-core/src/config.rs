//! Agenda configuration.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono_tz::Tz;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{AgendaError, AgendaResult};

static DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";
const DEFAULT_UPCOMING_LIMIT: usize = 5;
const DEFAULT_PATIENT_LIMIT: usize = 100;

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_upcoming_limit() -> usize {
    DEFAULT_UPCOMING_LIMIT
}

fn default_patient_limit() -> usize {
    DEFAULT_PATIENT_LIMIT
}

/// Configuration at ~/.config/agenda/config.toml, overridable with
/// `AGENDA_*` environment variables (e.g. `AGENDA_TOKEN`).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AgendaConfig {
    /// Base URL of the clinic REST API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Bearer token issued by the backend's login endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// IANA zone used for local dates. Detected from the system when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,

    #[serde(default = "default_upcoming_limit")]
    pub upcoming_limit: usize,

    #[serde(default = "default_patient_limit")]
    pub patient_limit: usize,
}

impl Default for AgendaConfig {
    fn default() -> Self {
        AgendaConfig {
            api_url: default_api_url(),
            token: None,
            timezone: None,
            upcoming_limit: DEFAULT_UPCOMING_LIMIT,
            patient_limit: DEFAULT_PATIENT_LIMIT,
        }
    }
}

impl AgendaConfig {
    pub fn config_path() -> AgendaResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| {
                AgendaError::Config("No se pudo determinar el directorio de configuración".into())
            })?
            .join("agenda");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads the user config, creating a commented default file on first run.
    pub fn load() -> AgendaResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Loads `path` (optional) layered under `AGENDA_*` environment variables.
    pub fn load_from(path: &Path) -> AgendaResult<Self> {
        Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("AGENDA").try_parsing(true))
            .build()
            .map_err(|e| AgendaError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| AgendaError::Config(e.to_string()))
    }

    /// Resolves the configured zone, falling back to `detected` and then UTC.
    pub fn time_zone(&self, detected: Option<&str>) -> AgendaResult<Tz> {
        match self.timezone.as_deref() {
            Some(name) => Tz::from_str(name)
                .map_err(|_| AgendaError::Config(format!("Zona horaria desconocida '{}'", name))),
            None => Ok(detected.and_then(|name| Tz::from_str(name).ok()).unwrap_or(Tz::UTC)),
        }
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> AgendaResult<()> {
        let contents = format!(
            "\
# agenda configuration

# Clinic API base URL:
# api_url = \"{}\"

# Bearer token from the clinic login:
# token = \"...\"

# Time zone for calendar days (defaults to the system zone):
# timezone = \"America/Santiago\"

# How many upcoming consultations to list:
# upcoming_limit = {}
",
            DEFAULT_API_URL, DEFAULT_UPCOMING_LIMIT
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("agenda-config-test-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn default_file_loads_as_defaults() {
        let path = temp_path("default.toml");
        AgendaConfig::create_default_config(&path).unwrap();

        let config = AgendaConfig::load_from(&path).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.upcoming_limit, DEFAULT_UPCOMING_LIMIT);
        assert_eq!(config.patient_limit, DEFAULT_PATIENT_LIMIT);
        assert!(config.timezone.is_none());
    }

    #[test]
    fn file_values_are_read() {
        let path = temp_path("custom.toml");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(
            &path,
            "api_url = \"https://vet.example/api/v1\"\ntimezone = \"America/Santiago\"\n",
        )
        .unwrap();

        let config = AgendaConfig::load_from(&path).unwrap();
        assert_eq!(config.api_url, "https://vet.example/api/v1");
        assert_eq!(config.time_zone(None).unwrap(), chrono_tz::America::Santiago);
    }

    #[test]
    fn unwritable_config_path_is_an_io_error() {
        let blocker = temp_path("not-a-dir");
        std::fs::create_dir_all(blocker.parent().unwrap()).unwrap();
        std::fs::write(&blocker, "").unwrap();

        let err = AgendaConfig::create_default_config(&blocker.join("config.toml")).unwrap_err();
        assert!(matches!(err, AgendaError::Io(_)));
    }

    #[test]
    fn time_zone_fallbacks() {
        let config = AgendaConfig::default();
        assert_eq!(config.time_zone(None).unwrap(), Tz::UTC);
        assert_eq!(config.time_zone(Some("Europe/Madrid")).unwrap(), chrono_tz::Europe::Madrid);
        assert_eq!(config.time_zone(Some("Not/AZone")).unwrap(), Tz::UTC);

        let bad = AgendaConfig {
            timezone: Some("Mars/Olympus".into()),
            ..Default::default()
        };
        assert!(bad.time_zone(None).is_err());
    }
}
