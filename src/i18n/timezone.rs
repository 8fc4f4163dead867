//! Timezone resolution module

use crate::users::UserRecord;
use chrono_tz::Tz;

/// Look a name up in the IANA timezone database, ignoring case
pub fn find_timezone(name: &str) -> Option<Tz> {
    Tz::from_str_insensitive(name).ok()
}

/// The database spelling of `name`, e.g. `Europe/Paris` for `europe/paris`
pub fn canonical_timezone(name: &str) -> Option<&'static str> {
    find_timezone(name).map(|tz| tz.name())
}

pub fn is_valid_timezone(name: &str) -> bool {
    find_timezone(name).is_some()
}

/// Pick the timezone a page is rendered in.
///
/// The `timezone` query parameter is used when non-empty, otherwise the
/// logged-in user's timezone. Whatever was picked must name a real zone,
/// else `default` is returned. Names match case-insensitively and come
/// back in the database spelling. An invalid query value does not fall
/// back to the user's zone.
pub fn resolve_timezone(
    query_timezone: Option<&str>,
    user: Option<&UserRecord>,
    default: &str,
) -> String {
    let candidate = query_timezone
        .map(str::trim)
        .filter(|tz| !tz.is_empty())
        .or_else(|| user.and_then(|u| u.timezone.as_deref()));

    candidate
        .and_then(canonical_timezone)
        .unwrap_or(default)
        .to_string()
}
