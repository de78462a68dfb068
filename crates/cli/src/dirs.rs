//! Platform-specific directories.
//!
//! - macOS: `~/Library/Caches/assistant`, `~/Library/Application Support/assistant`
//! - Linux: `~/.cache/assistant`, `~/.local/share/assistant` (XDG aware)
//! - Windows: `%LOCALAPPDATA%\assistant`, `%APPDATA%\assistant`

use std::path::PathBuf;

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", "assistant")
}

/// Root of the per-session log directories.
pub fn log_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| std::env::temp_dir().join("assistant"))
        .join("logs")
}

/// Default location of saved learning history.
pub fn data_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./assistant_data"))
}
