use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Keys every complete configuration file carries.
pub const CONFIG_KEYS: [&str; 8] = [
    "database",
    "attendance_sheet",
    "roster_sheet",
    "summary_sheet",
    "roster_cache_secs",
    "previous_cache_secs",
    "risk_threshold",
    "access_password",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_attendance_sheet")]
    pub attendance_sheet: String,
    #[serde(default = "default_roster_sheet")]
    pub roster_sheet: String,
    #[serde(default = "default_summary_sheet")]
    pub summary_sheet: String,
    #[serde(default = "default_roster_cache_secs")]
    pub roster_cache_secs: u64,
    #[serde(default = "default_previous_cache_secs")]
    pub previous_cache_secs: u64,
    #[serde(default = "default_risk_threshold")]
    pub risk_threshold: f64,
    #[serde(default)]
    pub access_password: Option<String>,
}

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_attendance_sheet() -> String {
    "Asistencias".to_string()
}
fn default_roster_sheet() -> String {
    "Jugadoras".to_string()
}
fn default_summary_sheet() -> String {
    "Resumen".to_string()
}
fn default_roster_cache_secs() -> u64 {
    300
}
fn default_previous_cache_secs() -> u64 {
    120
}
fn default_risk_threshold() -> f64 {
    50.0
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            attendance_sheet: default_attendance_sheet(),
            roster_sheet: default_roster_sheet(),
            summary_sheet: default_summary_sheet(),
            roster_cache_secs: default_roster_cache_secs(),
            previous_cache_secs: default_previous_cache_secs(),
            risk_threshold: default_risk_threshold(),
            access_password: None,
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("squadlog")
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".squadlog")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("squadlog.conf")
    }

    /// Return the full path of the default workbook
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("squadlog.sqlite")
    }

    /// Parse a configuration document; absent keys take their defaults.
    pub fn from_yaml(content: &str) -> AppResult<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            Self::from_yaml(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Keys of [`CONFIG_KEYS`] that the YAML document does not define.
    pub fn missing_keys(content: &str) -> AppResult<Vec<String>> {
        let value: serde_yaml::Value = serde_yaml::from_str(content)?;
        let map = value
            .as_mapping()
            .ok_or_else(|| AppError::Config("configuration is not a YAML mapping".to_string()))?;

        Ok(CONFIG_KEYS
            .iter()
            .filter(|k| !map.contains_key(**k))
            .map(|k| k.to_string())
            .collect())
    }

    /// Resolve the workbook path: absolute paths are kept, bare names land
    /// in the configuration directory.
    pub fn resolve_database(custom_name: Option<&str>) -> PathBuf {
        let dir = Self::config_dir();
        match custom_name {
            Some(name) => {
                let p = Path::new(name);
                if p.is_absolute() {
                    p.to_path_buf()
                } else {
                    dir.join(p)
                }
            }
            None => dir.join("squadlog.sqlite"),
        }
    }

    /// Write the configuration file (skipped in test mode) and make sure
    /// the workbook's directory exists. Returns the configuration in use.
    pub fn init_all(custom_name: Option<&str>, is_test: bool) -> AppResult<Self> {
        let db_path = Self::resolve_database(custom_name);

        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        if !is_test {
            fs::create_dir_all(Self::config_dir())?;
            let yaml = serde_yaml::to_string(&config)?;
            fs::write(Self::config_file(), yaml)?;
            success(format!("Config file: {}", Self::config_file().display()));
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_is_filled_with_defaults() {
        let cfg = Config::from_yaml("database: /tmp/a.sqlite\nrisk_threshold: 60.0\n").unwrap();
        assert_eq!(cfg.database, "/tmp/a.sqlite");
        assert_eq!(cfg.risk_threshold, 60.0);
        assert_eq!(cfg.attendance_sheet, "Asistencias");
        assert_eq!(cfg.roster_cache_secs, 300);
        assert_eq!(cfg.previous_cache_secs, 120);
        assert!(cfg.access_password.is_none());
    }

    #[test]
    fn missing_keys_are_listed() {
        let missing = Config::missing_keys("database: x\nroster_sheet: J\n").unwrap();
        assert!(missing.contains(&"attendance_sheet".to_string()));
        assert!(!missing.contains(&"database".to_string()));
        assert!(!missing.contains(&"roster_sheet".to_string()));
    }

    #[test]
    fn non_mapping_config_is_rejected() {
        assert!(Config::missing_keys("- a\n- b\n").is_err());
    }
}
