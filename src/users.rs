//! User lookup module
//!
//! A fixed, read-only table of users seeded at startup. There is no login:
//! the `login_as` query parameter names the user id directly.

use std::collections::HashMap;

/// A known user and their display preferences
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub name: String,
    /// Preferred locale code, not necessarily a supported one
    pub locale: Option<String>,
    /// Preferred timezone name, not necessarily a valid one
    pub timezone: Option<String>,
}

impl UserRecord {
    pub fn new(name: &str, locale: Option<&str>, timezone: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            locale: locale.map(String::from),
            timezone: timezone.map(String::from),
        }
    }
}

/// Immutable mapping from user id to record
#[derive(Debug, Clone, Default)]
pub struct UserTable {
    users: HashMap<i64, UserRecord>,
}

impl UserTable {
    pub fn new(users: HashMap<i64, UserRecord>) -> Self {
        Self { users }
    }

    /// The table the server starts with
    pub fn seeded() -> Self {
        let users = [
            (1, UserRecord::new("Balou", Some("fr"), Some("Europe/Paris"))),
            (2, UserRecord::new("Beyonce", Some("en"), Some("US/Central"))),
            (3, UserRecord::new("Spock", Some("kg"), Some("Vulcan"))),
            (4, UserRecord::new("Teletubby", None, Some("Europe/London"))),
        ];
        Self::new(users.into_iter().collect())
    }

    /// Look a user up by the raw `login_as` value.
    ///
    /// Absent, non-numeric and unknown identifiers all yield `None`.
    pub fn get_user(&self, identifier: Option<&str>) -> Option<&UserRecord> {
        let id = identifier?.trim().parse::<i64>().ok()?;
        self.users.get(&id)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_user() {
        let table = UserTable::seeded();
        let user = table.get_user(Some("2")).unwrap();
        assert_eq!(user.name, "Beyonce");
        assert_eq!(user.locale.as_deref(), Some("en"));
        assert_eq!(user.timezone.as_deref(), Some("US/Central"));
    }

    #[test]
    fn test_unknown_or_malformed_id() {
        let table = UserTable::seeded();
        assert!(table.get_user(Some("99")).is_none());
        assert!(table.get_user(Some("abc")).is_none());
        assert!(table.get_user(Some("")).is_none());
        assert!(table.get_user(Some("1.5")).is_none());
        assert!(table.get_user(None).is_none());
    }

    #[test]
    fn test_surrounding_whitespace() {
        let table = UserTable::seeded();
        assert_eq!(table.get_user(Some(" 4 ")).unwrap().name, "Teletubby");
    }

    #[test]
    fn test_user_without_locale() {
        let table = UserTable::seeded();
        let user = table.get_user(Some("4")).unwrap();
        assert!(user.locale.is_none());
    }

    #[test]
    fn test_seeded_size() {
        let table = UserTable::seeded();
        assert_eq!(table.len(), 4);
        assert!(!table.is_empty());
        assert!(UserTable::default().is_empty());
    }
}
