// Application state module
// Read-only data shared by every request handler

use super::types::Config;
use crate::i18n::SupportedLocales;
use crate::users::UserTable;

/// Application state
///
/// Built once at startup and shared behind an `Arc`; nothing in it is
/// mutated afterwards, so handlers read it without locking.
pub struct AppState {
    pub config: Config,
    pub locales: SupportedLocales,
    pub users: UserTable,
}

impl AppState {
    pub fn new(config: &Config, users: UserTable) -> Self {
        Self {
            config: config.clone(),
            locales: SupportedLocales::new(&config.i18n.languages),
            users,
        }
    }

    pub fn default_locale(&self) -> &str {
        &self.config.i18n.default_locale
    }

    pub fn default_timezone(&self) -> &str {
        &self.config.i18n.default_timezone
    }
}
