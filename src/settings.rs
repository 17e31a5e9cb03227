//! Application settings, read from a JSON file next to the database.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::BatchPolicy;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub app_name: String,
    pub batch_policy: BatchPolicy,
    /// Log file size before it is rotated
    pub log_max_bytes: u64,
    /// Lines kept in memory for the diagnostics view
    pub log_buffer_lines: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("cms_reorder.db"),
            log_dir: PathBuf::from("logs"),
            app_name: "CmsReorder".to_string(),
            batch_policy: BatchPolicy::Minimal,
            log_max_bytes: rolling_logger::DEFAULT_MAX_BYTES,
            log_buffer_lines: rolling_logger::DEFAULT_BUFFER_LINES,
        }
    }
}

impl AppConfig {
    /// Load from `path`. A missing file gives the defaults.
    pub fn load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {}", path.display(), e))?;
        serde_json::from_str(&raw)
            .map_err(|e| format!("Invalid config {}: {}", path.display(), e))
    }

    pub fn save(&self, path: &Path) -> Result<(), String> {
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| format!("Failed to create {}: {}", dir.display(), e))?;
        }
        let raw = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;
        fs::write(path, raw).map_err(|e| format!("Failed to write config {}: {}", path.display(), e))
    }
}
