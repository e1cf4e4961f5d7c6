use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn preferences_path() -> PathBuf {
        if let Some(pd) = ProjectDirs::from("", "", "gridplot") {
            pd.config_dir().join("preferences.json")
        } else {
            PathBuf::from("gridplot_preferences.json")
        }
    }

    pub fn log_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("gridplot");
            Some(state_dir.join("gridplot.log"))
        } else {
            ProjectDirs::from("", "", "gridplot")
                .map(|proj_dirs| proj_dirs.data_local_dir().join("gridplot.log"))
        }
    }
}
