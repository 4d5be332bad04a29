//! Platform-specific directory paths.
//!
//! Uses XDG on Linux, standard locations on macOS/Windows.

use std::path::PathBuf;

use directories::ProjectDirs;

const QUALIFIER: &str = "dev";
const ORGANIZATION: &str = "smartgrid";
const APPLICATION: &str = "smartgrid";

/// Get project directories, or None if home directory cannot be determined.
fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Get the data directory for persistent application data.
///
/// - Linux: `$XDG_DATA_HOME/smartgrid` or `~/.local/share/smartgrid`
/// - macOS: `~/Library/Application Support/dev.smartgrid.smartgrid`
/// - Windows: `C:\Users\<User>\AppData\Roaming\smartgrid\smartgrid\data`
pub fn data_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
}

/// Get the cache directory for temporary/regenerable data.
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Get the path to the local preferences database.
pub fn preferences_db() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("preferences.db"))
}

/// Get the path to the log file.
pub fn log_file() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join("smartgrid.log"))
}
