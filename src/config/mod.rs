//! Configuration module for company-ingest
//!
//! Handles loading settings from YAML files and environment variables.
//! Settings are built once at startup and shared behind an `Arc`; nothing
//! mutates them afterwards.

mod settings;

pub use settings::*;

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable naming a settings file
pub const SETTINGS_PATH_ENV: &str = "COMPANY_INGEST_SETTINGS_PATH";

/// Load settings from an explicit path, the environment, or the default
/// locations, falling back to built-in defaults.
pub fn load(explicit: Option<&Path>) -> Result<Settings> {
    let mut settings = match find_settings_file(explicit) {
        Some(path) => {
            info!("Loading settings from: {}", path.display());
            Settings::from_file(&path)?
        }
        None => {
            info!("No settings file found, using defaults");
            Settings::default()
        }
    };
    settings.merge_env();
    Ok(settings)
}

fn find_settings_file(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(SETTINGS_PATH_ENV) {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
    }

    let mut candidates = vec![
        PathBuf::from("settings.yml"),
        PathBuf::from("config/settings.yml"),
    ];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("company-ingest/settings.yml"));
    }

    candidates.into_iter().find(|p| p.exists())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_explicit_file() {
        let path = std::env::temp_dir().join(format!(
            "company-ingest-settings-{}.yml",
            std::process::id()
        ));
        std::fs::write(&path, "general:\n  instance_name: test-instance\n").unwrap();

        let settings = load(Some(&path)).unwrap();
        assert_eq!(settings.general.instance_name, "test-instance");

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let path = Path::new("/definitely/not/here/settings.yml");
        assert!(load(Some(path)).is_err());
    }
}
