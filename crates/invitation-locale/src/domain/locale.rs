//! Supported display languages.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A supported display language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Locale {
    /// English, the fallback language.
    #[default]
    #[serde(rename = "en")]
    English,
    /// Spanish.
    #[serde(rename = "es")]
    Spanish,
}

impl Locale {
    /// Every supported locale, in selector order.
    pub const ALL: [Self; 2] = [Self::English, Self::Spanish];

    /// Short code used in markers and in the persisted preference.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Spanish => "es",
        }
    }

    /// Parses a locale code. Surrounding whitespace and case are ignored;
    /// anything else unrecognized yields `None`.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL
            .into_iter()
            .find(|locale| locale.code().eq_ignore_ascii_case(code))
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code_round_trips_every_locale() {
        for locale in Locale::ALL {
            assert_eq!(Locale::from_code(locale.code()), Some(locale));
        }
    }

    #[test]
    fn test_from_code_tolerates_case_and_whitespace() {
        assert_eq!(Locale::from_code(" ES "), Some(Locale::Spanish));
        assert_eq!(Locale::from_code("En"), Some(Locale::English));
    }

    #[test]
    fn test_from_code_rejects_unknown_codes() {
        assert_eq!(Locale::from_code("fr"), None);
        assert_eq!(Locale::from_code(""), None);
        assert_eq!(Locale::from_code("english"), None);
    }

    #[test]
    fn test_default_is_english() {
        assert_eq!(Locale::default(), Locale::English);
    }

    #[test]
    fn test_serializes_as_code() {
        assert_eq!(serde_json::to_string(&Locale::Spanish).unwrap(), "\"es\"");
        let parsed: Locale = serde_json::from_str("\"en\"").unwrap();
        assert_eq!(parsed, Locale::English);
    }
}
