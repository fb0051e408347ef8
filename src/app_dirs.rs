use directories::ProjectDirs;
use std::path::PathBuf;

/// Where typograph keeps its state files.
pub struct AppDirs;

impl AppDirs {
    pub fn state_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            return Some(PathBuf::from(home).join(".local").join("state").join("typograph"));
        }
        ProjectDirs::from("", "", "typograph").map(|dirs| dirs.data_local_dir().to_path_buf())
    }

    pub fn log_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join("typograph.log"))
    }
}
