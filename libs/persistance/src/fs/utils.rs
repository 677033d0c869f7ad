use directories::{ProjectDirs, UserDirs};
use std::{env, path::PathBuf};

pub fn get_data_dir_location() -> PathBuf {
    match ProjectDirs::from("", "", "roster") {
        Some(project_dir) => project_dir.data_dir().to_owned(),
        None => PathBuf::from(".roster"),
    }
}

/// Returns the config directory and the path of the config file inside it.
/// `ROSTER_CONFIG` points at a config file directly.
pub fn get_config_location() -> (PathBuf, PathBuf) {
    if let Ok(file) = env::var("ROSTER_CONFIG") {
        let file = PathBuf::from(file);
        let dir = file
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));
        return (dir, file);
    }
    let config_dir = match ProjectDirs::from("", "", "roster") {
        Some(project_dir) => project_dir.config_dir().to_owned(),
        None => PathBuf::from(".roster"),
    };
    let config_path = config_dir.join("config.toml");
    (config_dir, config_path)
}

pub fn parse_location(location: &str) -> PathBuf {
    let loc = if location.contains('~') {
        if let Some(dirs) = UserDirs::new() {
            let home_dir: String = dirs.home_dir().to_string_lossy().into();
            location.replace('~', &home_dir)
        } else {
            location.replace('~', &env::var("HOME").unwrap_or_default())
        }
    } else {
        location.to_owned()
    };
    PathBuf::from(loc)
}
