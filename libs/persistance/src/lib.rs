pub mod fs;
pub mod settings;
pub mod users;
pub mod vcard;

use fs::config::{Config, Organization};
use settings::Settings;
use users::User;

/// Everything a page needs to know about the request it is built for.
/// Built once per request from the shared server state and handed to the
/// page and the renderer explicitly.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub config: Config,
    pub settings: Settings,
    pub organization: Organization,
    pub current_user: Option<User>,
    pub language: String,
}

impl RequestContext {
    pub fn new(config: &Config) -> Self {
        Self {
            settings: Settings::from(config.settings.clone()),
            organization: config.organization.clone(),
            language: config.general.language.clone(),
            config: config.clone(),
            current_user: None,
        }
    }

    pub fn with_user(mut self, user: Option<User>) -> Self {
        self.current_user = user;
        self
    }

    pub fn user_id(&self) -> u32 {
        self.current_user.as_ref().map(|u| u.id).unwrap_or(0)
    }

    pub fn valid_login(&self) -> bool {
        self.current_user.is_some()
    }

    pub fn debug(&self) -> bool {
        self.config.general.debug
    }
}
