pub mod config;
pub mod utils;

use std::{fs, io, path::PathBuf};

use log::info;
use thiserror::Error;

use self::{
    config::{Config, DEFAULT_CONFIG},
    utils::{get_config_location, parse_location},
};
use crate::users::DEFAULT_USERS;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config file at {0:?}")]
    Read(PathBuf, #[source] io::Error),
    #[error("could not parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Error, Debug)]
pub enum InstallError {
    #[error("could not write {0:?}")]
    Write(PathBuf, #[source] io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Writes a default config and user file unless they already exist.
pub fn install() -> Result<(), InstallError> {
    let (config_dir, config_file) = get_config_location();
    if !config_file.exists() {
        fs::create_dir_all(&config_dir).map_err(|e| InstallError::Write(config_dir.clone(), e))?;
        fs::write(&config_file, DEFAULT_CONFIG)
            .map_err(|e| InstallError::Write(config_file.clone(), e))?;
        info!("wrote default config to {:?}", config_file);
    }
    let raw = fs::read_to_string(&config_file)
        .map_err(|e| ConfigError::Read(config_file.clone(), e))?;
    let config = Config::parse(&raw)?;
    let users_file = parse_location(&config.general.users_location);
    if !users_file.exists() {
        if let Some(parent) = users_file.parent() {
            fs::create_dir_all(parent).map_err(|e| InstallError::Write(parent.to_owned(), e))?;
        }
        fs::write(&users_file, DEFAULT_USERS)
            .map_err(|e| InstallError::Write(users_file.clone(), e))?;
        info!("wrote example users to {:?}", users_file);
    }
    Ok(())
}
