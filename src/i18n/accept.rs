//! Accept-Language parsing module
//!
//! Parses the weighted preference list a client sends and matches it
//! against the locales the server supports.

use super::locale::SupportedLocales;

/// One entry of an Accept-Language header
#[derive(Debug, Clone, PartialEq)]
pub struct LanguagePreference {
    pub tag: String,
    pub quality: f32,
}

/// Client preferences, highest quality first, header order kept for ties
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AcceptLanguage {
    preferences: Vec<LanguagePreference>,
}

impl AcceptLanguage {
    /// Parse an Accept-Language header value
    ///
    /// Malformed entries and entries with `q=0` are dropped rather than
    /// rejecting the whole header. A quality above 1 counts as 1.
    pub fn parse(header: &str) -> Self {
        let mut preferences: Vec<LanguagePreference> =
            header.split(',').filter_map(parse_entry).collect();

        // Vec::sort_by is stable, so equal qualities keep declaration order
        preferences.sort_by(|a, b| b.quality.total_cmp(&a.quality));

        Self { preferences }
    }

    /// Build directly from tags in preference order, all with quality 1
    pub fn from_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            preferences: tags
                .into_iter()
                .map(|tag| LanguagePreference {
                    tag: tag.into(),
                    quality: 1.0,
                })
                .collect(),
        }
    }

    pub fn preferences(&self) -> &[LanguagePreference] {
        &self.preferences
    }

    pub fn is_empty(&self) -> bool {
        self.preferences.is_empty()
    }

    /// Find the supported locale the client prefers most
    ///
    /// Exact tag matches win over primary-subtag matches: with `en-US, fr`
    /// against `{en, fr}` the answer is `fr`, with only `en-US` it is `en`.
    pub fn best_match<'a>(&self, supported: &'a SupportedLocales) -> Option<&'a str> {
        self.find(supported, tags_equal)
            .or_else(|| self.find(supported, primary_tags_equal))
    }

    fn find<'a>(
        &self,
        supported: &'a SupportedLocales,
        matches: fn(&str, &str) -> bool,
    ) -> Option<&'a str> {
        self.preferences.iter().find_map(|pref| {
            if pref.tag == "*" {
                return supported.iter().next();
            }
            supported.iter().find(|locale| matches(&pref.tag, locale))
        })
    }
}

/// Parse a single `tag;q=0.8` entry
fn parse_entry(entry: &str) -> Option<LanguagePreference> {
    let mut parts = entry.split(';');
    let tag = parts.next()?.trim();
    if tag.is_empty() {
        return None;
    }

    let mut quality = 1.0_f32;
    for param in parts {
        let Some((name, value)) = param.split_once('=') else {
            continue;
        };
        if name.trim().eq_ignore_ascii_case("q") {
            quality = value.trim().parse().ok()?;
        }
    }

    if quality.is_nan() || quality <= 0.0 {
        return None;
    }

    Some(LanguagePreference {
        tag: tag.to_string(),
        quality: quality.min(1.0),
    })
}

/// Compare tags ignoring case and the `-`/`_` spelling difference
fn tags_equal(a: &str, b: &str) -> bool {
    a.len() == b.len()
        && a.chars()
            .zip(b.chars())
            .all(|(x, y)| normalize_char(x) == normalize_char(y))
}

fn primary_tags_equal(a: &str, b: &str) -> bool {
    tags_equal(primary_subtag(a), primary_subtag(b))
}

fn primary_subtag(tag: &str) -> &str {
    tag.split(['-', '_']).next().unwrap_or(tag)
}

const fn normalize_char(c: char) -> char {
    if c == '_' {
        '-'
    } else {
        c.to_ascii_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn supported() -> SupportedLocales {
        SupportedLocales::new(["en", "fr"])
    }

    #[test]
    fn test_parse_orders_by_quality() {
        let accept = AcceptLanguage::parse("fr;q=0.5, en-US, de;q=0.9");
        let tags: Vec<&str> = accept.preferences().iter().map(|p| p.tag.as_str()).collect();
        assert_eq!(tags, vec!["en-US", "de", "fr"]);
    }

    #[test]
    fn test_parse_keeps_declaration_order_on_ties() {
        let accept = AcceptLanguage::parse("de;q=0.8, fr;q=0.8, en;q=0.8");
        let tags: Vec<&str> = accept.preferences().iter().map(|p| p.tag.as_str()).collect();
        assert_eq!(tags, vec!["de", "fr", "en"]);
    }

    #[test]
    fn test_parse_drops_bad_entries() {
        let accept = AcceptLanguage::parse("en;q=abc, , fr;q=0, de;q=-1, it;q=0.3");
        assert_eq!(accept.preferences().len(), 1);
        assert_eq!(accept.preferences()[0].tag, "it");
    }

    #[test]
    fn test_parse_clamps_quality_above_one() {
        let accept = AcceptLanguage::parse("de;q=1.5, fr;q=0.5");
        assert_eq!(accept.preferences()[0].tag, "de");
        assert!((accept.preferences()[0].quality - 1.0).abs() < f32::EPSILON);

        // Clamped entries tie with q=1 ones and keep header order
        let accept = AcceptLanguage::parse("fr;q=2, en");
        assert_eq!(accept.best_match(&supported()), Some("fr"));
    }

    #[test]
    fn test_parse_empty_header() {
        assert!(AcceptLanguage::parse("").is_empty());
        assert!(AcceptLanguage::parse(" , ").is_empty());
    }

    #[test]
    fn test_best_match_by_quality() {
        let accept = AcceptLanguage::parse("en;q=0.4, fr;q=0.9");
        assert_eq!(accept.best_match(&supported()), Some("fr"));
    }

    #[test]
    fn test_best_match_tie_uses_header_order() {
        let accept = AcceptLanguage::parse("fr, en");
        assert_eq!(accept.best_match(&supported()), Some("fr"));
    }

    #[test]
    fn test_best_match_skips_unsupported() {
        let accept = AcceptLanguage::parse("de, ja;q=0.9, en;q=0.1");
        assert_eq!(accept.best_match(&supported()), Some("en"));
    }

    #[test]
    fn test_best_match_exact_before_primary() {
        let accept = AcceptLanguage::parse("en-US, fr;q=0.8");
        assert_eq!(accept.best_match(&supported()), Some("fr"));

        let accept = AcceptLanguage::parse("en-US, de;q=0.8");
        assert_eq!(accept.best_match(&supported()), Some("en"));
    }

    #[test]
    fn test_best_match_region_in_supported() {
        let regional = SupportedLocales::new(["en", "fr-CA"]);
        let accept = AcceptLanguage::parse("fr_ca");
        assert_eq!(accept.best_match(&regional), Some("fr-CA"));

        let accept = AcceptLanguage::parse("fr");
        assert_eq!(accept.best_match(&regional), Some("fr-CA"));
    }

    #[test]
    fn test_best_match_wildcard() {
        let accept = AcceptLanguage::parse("de, *;q=0.1");
        assert_eq!(accept.best_match(&supported()), Some("en"));
    }

    #[test]
    fn test_best_match_case_insensitive() {
        let accept = AcceptLanguage::parse("FR");
        assert_eq!(accept.best_match(&supported()), Some("fr"));
    }

    #[test]
    fn test_no_match() {
        assert_eq!(AcceptLanguage::parse("de, ja").best_match(&supported()), None);
        assert_eq!(AcceptLanguage::default().best_match(&supported()), None);
    }
}
