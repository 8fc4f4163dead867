//! Per-request context
//!
//! Everything the page renderer needs about the current request, computed
//! once before the handler runs and dropped with the response.

use chrono::{DateTime, Utc};

use crate::config::AppState;
use crate::http::QueryParams;
use crate::i18n::{resolve_locale, resolve_timezone, AcceptLanguage};
use crate::users::UserRecord;

/// Resolved request state
#[derive(Debug, Clone)]
pub struct RequestContext<'a> {
    /// User named by `login_as`, if any
    pub user: Option<&'a UserRecord>,
    /// Always one of the supported locales
    pub locale: String,
    /// Always a valid timezone name
    pub timezone: String,
    /// When the request was received
    pub time: DateTime<Utc>,
}

/// Build the context for a request: look up the user, capture the
/// timestamp, then resolve locale and timezone.
pub fn before_request<'a>(
    query: &QueryParams,
    accept_language: Option<&str>,
    state: &'a AppState,
    now: DateTime<Utc>,
) -> RequestContext<'a> {
    let user = state.users.get_user(query.get("login_as"));
    let preferences = accept_language.map(AcceptLanguage::parse).unwrap_or_default();

    let locale = resolve_locale(
        query.get("locale"),
        user,
        &preferences,
        &state.locales,
        state.default_locale(),
    );
    let timezone = resolve_timezone(query.get("timezone"), user, state.default_timezone());

    RequestContext {
        user,
        locale,
        timezone,
        time: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use crate::users::UserTable;

    fn state() -> AppState {
        AppState::new(&test_config(), UserTable::seeded())
    }

    fn ctx_for<'a>(query: &str, accept: Option<&str>, state: &'a AppState) -> RequestContext<'a> {
        before_request(&QueryParams::parse(Some(query)), accept, state, Utc::now())
    }

    #[test]
    fn test_anonymous_defaults() {
        let state = state();
        let ctx = ctx_for("", None, &state);
        assert!(ctx.user.is_none());
        assert_eq!(ctx.locale, "en");
        assert_eq!(ctx.timezone, "UTC");
    }

    #[test]
    fn test_logged_in_user_preferences() {
        let state = state();
        let ctx = ctx_for("login_as=1", None, &state);
        assert_eq!(ctx.user.map(|u| u.name.as_str()), Some("Balou"));
        assert_eq!(ctx.locale, "fr");
        assert_eq!(ctx.timezone, "Europe/Paris");
    }

    #[test]
    fn test_query_overrides_user() {
        let state = state();
        let ctx = ctx_for("login_as=1&locale=en&timezone=US/Central", None, &state);
        assert_eq!(ctx.locale, "en");
        assert_eq!(ctx.timezone, "US/Central");
    }

    #[test]
    fn test_spock_falls_back() {
        let state = state();
        let ctx = ctx_for("login_as=3", Some("fr-FR,fr;q=0.9"), &state);
        assert_eq!(ctx.user.map(|u| u.name.as_str()), Some("Spock"));
        assert_eq!(ctx.locale, "fr");
        assert_eq!(ctx.timezone, "UTC");
    }

    #[test]
    fn test_bad_login_is_anonymous() {
        let state = state();
        let ctx = ctx_for("login_as=abc", Some("fr"), &state);
        assert!(ctx.user.is_none());
        assert_eq!(ctx.locale, "fr");
    }
}
