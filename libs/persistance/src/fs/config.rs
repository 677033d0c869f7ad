use std::fs;

use serde_derive::{Deserialize, Serialize};

use super::{utils::get_config_location, ConfigError};

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct General {
    pub port: u16,
    pub host: String,
    /// Base url the site is reachable at, without a trailing slash.
    pub url: String,
    /// Directory holding the `themes` and `static` folders.
    pub root: String,
    pub theme: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub debug: bool,
    pub cookie_prefix: String,
    #[serde(default)]
    pub cookie_domain_wide: bool,
    pub users_location: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Organization {
    pub shortname: String,
    pub longname: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Config {
    pub general: General,
    pub organization: Organization,
    #[serde(default)]
    pub settings: toml::value::Table,
}

fn default_language() -> String {
    String::from("en")
}

pub const DEFAULT_CONFIG: &str = r#"[general]
port = 6683
host = "localhost"
url = "http://localhost:6683"
root = "."
theme = "simple"
language = "en"
debug = false
cookie_prefix = "ROSTER"
cookie_domain_wide = false
users_location = "~/.local/share/roster/users.toml"

[organization]
shortname = "DEMO"
longname = "Demo Organization"

[settings]
system_browser_update_check = false
system_cookie_note = true
system_url_imprint = ""
system_url_data_protection = ""
registration_enable_module = true
"#;

impl Config {
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(ConfigError::Parse)
    }

    /// Domain part of the configured url, used for cookies.
    pub fn domain(&self) -> &str {
        let without_scheme = self
            .general
            .url
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(&self.general.url);
        let host = without_scheme.split('/').next().unwrap_or_default();
        // bracketed ipv6 literals carry colons of their own
        if let Some(end) = host.find(']') {
            return &host[..=end];
        }
        host.split(':').next().unwrap_or(host)
    }

    /// Path part of the configured url, empty if the site lives at the root.
    pub fn url_path(&self) -> &str {
        let without_scheme = self
            .general
            .url
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(&self.general.url);
        match without_scheme.find('/') {
            Some(idx) => without_scheme[idx..].trim_end_matches('/'),
            None => "",
        }
    }

    /// Configured url without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.general.url.trim_end_matches('/')
    }

    pub fn theme_url(&self) -> String {
        format!("{}/themes/{}", self.base_url(), self.general.theme)
    }
}

pub fn read_config() -> Result<Config, ConfigError> {
    let (_, file) = get_config_location();
    let raw = fs::read_to_string(&file).map_err(|e| ConfigError::Read(file, e))?;
    Config::parse(&raw)
}
