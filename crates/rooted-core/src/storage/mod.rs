mod config;
pub mod kv;
mod profile_store;
mod session_log;

pub use config::{AiConfig, AssessmentConfig, BreathingConfig, Config, StorageConfig};
pub use kv::{KvStore, MemoryStore, Modify, SqliteStore};
pub use profile_store::{ProfileStore, PROFILE_KEY};
pub use session_log::{SessionLog, SESSIONS_KEY};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/rooted[-dev]/` based on ROOTED_ENV.
///
/// Set ROOTED_ENV=dev to use the development data directory, or
/// ROOTED_DATA_DIR to point somewhere else entirely.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("ROOTED_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("ROOTED_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("rooted-dev")
            } else {
                base_dir.join("rooted")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
