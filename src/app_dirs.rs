use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn corpus_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "keydrill")
            .map(|proj_dirs| proj_dirs.config_dir().join("corpus.json"))
    }

    pub fn history_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "keydrill")
            .map(|proj_dirs| proj_dirs.config_dir().join("log.csv"))
    }
}
