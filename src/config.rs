use chrono_tz::Tz;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_ENV: &str = "LAUNDROMAT_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "kiosk.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("unknown time zone {0:?}")]
    UnknownTimezone(String),
}

/// Kiosk settings. Every field has a default, so a config file only needs
/// the values that differ for this store.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct KioskConfig {
    pub database_path: PathBuf,
    pub receipt_dir: PathBuf,
    pub printer_name: String,
    pub media: String,
    pub timezone: String,
    pub store_name: String,
    pub store_address: String,
}

impl Default for KioskConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("store.db"),
            receipt_dir: PathBuf::from("receipts"),
            printer_name: "HP_LaserJet_MFP_M28_M31".to_string(),
            media: "A4".to_string(),
            timezone: "America/Los_Angeles".to_string(),
            store_name: "SENTER LAUNDROMAT".to_string(),
            store_address: "2266 Senter Road".to_string(),
        }
    }
}

impl KioskConfig {
    /// `$LAUNDROMAT_CONFIG` if set, else `kiosk.json` when present, else
    /// defaults.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Self::from_file(path);
        }
        let fallback = Path::new(DEFAULT_CONFIG_FILE);
        if fallback.is_file() {
            return Self::from_file(fallback);
        }
        Ok(Self::default())
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        config.tz()?;
        Ok(config)
    }

    pub fn tz(&self) -> Result<Tz, ConfigError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| ConfigError::UnknownTimezone(self.timezone.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_the_store() {
        let config = KioskConfig::default();
        assert_eq!(config.database_path, PathBuf::from("store.db"));
        assert_eq!(config.tz().unwrap(), chrono_tz::America::Los_Angeles);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"printer_name": "Front_Desk", "timezone": "America/Chicago"}}"#)
            .unwrap();
        let config = KioskConfig::from_file(file.path()).unwrap();
        assert_eq!(config.printer_name, "Front_Desk");
        assert_eq!(config.media, "A4");
        assert_eq!(config.tz().unwrap(), chrono_tz::America::Chicago);
    }

    #[test]
    fn bad_timezone_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"timezone": "Mars/Olympus"}}"#).unwrap();
        match KioskConfig::from_file(file.path()) {
            Err(ConfigError::UnknownTimezone(name)) => assert_eq!(name, "Mars/Olympus"),
            other => panic!("expected unknown time zone, got {:?}", other),
        }
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = KioskConfig::from_file(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
