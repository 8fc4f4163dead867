//! Locale and timezone selection
//!
//! Pure functions over request inputs, the user record and the server
//! configuration. Nothing here can fail: bad candidates fall through to the
//! next source and finally to the configured default.

mod accept;
mod locale;
mod timezone;

pub use accept::{AcceptLanguage, LanguagePreference};
pub use locale::{resolve_locale, SupportedLocales};
pub use timezone::{canonical_timezone, find_timezone, is_valid_timezone, resolve_timezone};
