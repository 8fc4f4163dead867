//! Locale resolution module

use super::accept::AcceptLanguage;
use crate::users::UserRecord;

/// Ordered set of locale codes the server can render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportedLocales {
    codes: Vec<String>,
}

impl SupportedLocales {
    /// Build from codes in priority order; blanks and duplicates are skipped
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut unique: Vec<String> = Vec::new();
        for code in codes {
            let code = code.as_ref().trim();
            if !code.is_empty() && !unique.iter().any(|c| c == code) {
                unique.push(code.to_string());
            }
        }
        Self { codes: unique }
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.iter().any(|c| c == code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().map(String::as_str)
    }

    /// Return the stored code equal to `code`, borrowed from the set
    fn get(&self, code: &str) -> Option<&str> {
        self.iter().find(|c| *c == code)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Pick the locale a page is rendered in.
///
/// Precedence, first hit wins:
/// 1. `locale` query parameter, if supported
/// 2. the logged-in user's locale, if supported
/// 3. best Accept-Language match
/// 4. `default`
///
/// Unsupported candidates are skipped, never reported.
pub fn resolve_locale(
    query_locale: Option<&str>,
    user: Option<&UserRecord>,
    browser_preferences: &AcceptLanguage,
    supported: &SupportedLocales,
    default: &str,
) -> String {
    if let Some(locale) = query_locale.map(str::trim).and_then(|q| supported.get(q)) {
        return locale.to_string();
    }

    if let Some(locale) = user
        .and_then(|u| u.locale.as_deref())
        .and_then(|l| supported.get(l))
    {
        return locale.to_string();
    }

    browser_preferences
        .best_match(supported)
        .unwrap_or(default)
        .to_string()
}
