use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct DoctorConfig {
    #[serde(default)]
    pub search: SearchSection,
    #[serde(default)]
    pub report: ReportSection,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchSection {
    /// Repository root to audit when no --root flag is given.
    pub root: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportSection {
    /// Emit JSON reports by default.
    #[serde(default)]
    pub json: Option<bool>,
}

pub fn load() -> Result<DoctorConfig> {
    let path_override = std::env::var("ACTION_DOCTOR_CONFIG").ok();
    load_from(path_override.as_deref())
}

pub fn load_from(path_override: Option<&str>) -> Result<DoctorConfig> {
    let Some(path) = config_path_override(path_override) else {
        return Ok(DoctorConfig::default());
    };

    if !path.exists() {
        return Ok(DoctorConfig::default());
    }

    let raw = fs::read_to_string(&path)
        .with_context(|| format!("failed to read config at {}", path.display()))?;
    let config: DoctorConfig = toml::from_str(&raw)
        .with_context(|| format!("failed to parse config at {}", path.display()))?;
    Ok(config)
}

fn config_path_override(path_override: Option<&str>) -> Option<PathBuf> {
    if let Some(raw) = path_override {
        return Some(PathBuf::from(raw));
    }
    config_path()
}

pub fn config_path() -> Option<PathBuf> {
    // Prefer XDG-style config path, but fall back to legacy ~/.action-doctor/config.toml.
    if let Some(mut dir) = dirs::config_dir() {
        dir.push("action-doctor");
        dir.push("config.toml");
        if dir.exists() {
            return Some(dir);
        }
    }
    dirs::home_dir().map(|mut home| {
        home.push(".action-doctor");
        home.push("config.toml");
        home
    })
}
