use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use crate::validation;

/// Fallback endpoint when nothing is configured.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// Environment variable that overrides the configured base URL.
pub const API_URL_ENV: &str = "CHATBUBBLE_API_URL";

#[derive(Serialize, Deserialize)]
pub struct Settings {
    pub api_base_url: String,
    pub theme: String,
    #[serde(default)]
    pub history: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE.to_string(),
            theme: "light".to_string(),
            history: Vec::new(),
        }
    }
}

/// Resolve the chat endpoint base URL: environment variable first, then
/// the saved setting, then the hard-coded default. A candidate that
/// fails validation falls through to the next. Trailing slashes are
/// trimmed so endpoint paths join cleanly.
pub fn resolve_api_base(saved: Option<&str>) -> String {
    let base = std::env::var(API_URL_ENV)
        .ok()
        .filter(|v| validation::validate_api_base(v).is_ok())
        .or_else(|| {
            saved
                .filter(|v| validation::validate_api_base(v).is_ok())
                .map(str::to_string)
        })
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    base.trim().trim_end_matches('/').to_string()
}

pub fn settings_path() -> Option<PathBuf> {
    if let Some(proj) = ProjectDirs::from("com", "chatbubble", "chatbubble") {
        let dir = proj.config_dir();
        if let Err(e) = fs::create_dir_all(dir) {
            eprintln!("Failed to create config dir: {}", e);
            return None;
        }
        return Some(dir.join("settings.json"));
    }
    None
}

pub fn load_settings() -> Option<Settings> {
    let path = settings_path()?;
    let content = fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}

pub fn save_settings(settings: &Settings) -> std::io::Result<()> {
    if let Some(path) = settings_path() {
        let mut file = fs::File::create(path)?;
        let data = serde_json::to_string_pretty(settings)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        file.write_all(data.as_bytes())?;
    }
    Ok(())
}
