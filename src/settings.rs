use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SmsfinError};

/// Where the trained classifier artifacts live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_model_path")]
    pub model_path: String,
    #[serde(default = "default_vectorizer_path")]
    pub vectorizer_path: String,
}

fn default_model_path() -> String {
    config_dir().join("category_model.json").to_string_lossy().to_string()
}

fn default_vectorizer_path() -> String {
    config_dir().join("vectorizer.json").to_string_lossy().to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            vectorizer_path: default_vectorizer_path(),
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("smsfin")
}

fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

pub fn load_settings() -> Settings {
    load_settings_from(&settings_path())
}

fn load_settings_from(path: &Path) -> Settings {
    if path.exists() {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_default()
    } else {
        Settings::default()
    }
}

pub fn save_settings(settings: &Settings) -> Result<PathBuf> {
    let path = settings_path();
    save_settings_to(settings, &path)?;
    Ok(path)
}

fn save_settings_to(settings: &Settings, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| SmsfinError::Settings(e.to_string()))?;
    std::fs::write(path, format!("{json}\n"))?;
    Ok(())
}

pub fn shellexpand_path(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    path.to_string()
}

/// Artifact paths for this run: command-line values win over saved settings.
pub fn resolve_model_paths(model: Option<&str>, vectorizer: Option<&str>) -> (PathBuf, PathBuf) {
    let settings = load_settings();
    let model = model.map(str::to_string).unwrap_or(settings.model_path);
    let vectorizer = vectorizer
        .map(str::to_string)
        .unwrap_or(settings.vectorizer_path);
    (
        PathBuf::from(shellexpand_path(&model)),
        PathBuf::from(shellexpand_path(&vectorizer)),
    )
}
