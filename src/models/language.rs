//! Languages the website and its e-mails are available in.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Cs,
    En,
    De,
    Pl,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Cs => "cs",
            Language::En => "en",
            Language::De => "de",
            Language::Pl => "pl",
        }
    }

    /// Language of a submitted form; unknown or missing codes use the default.
    pub fn from_submitted(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.parse().ok()).unwrap_or_default()
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cs" | "cz" => Ok(Language::Cs),
            "en" => Ok(Language::En),
            "de" => Ok(Language::De),
            "pl" => Ok(Language::Pl),
            other => Err(format!("Unsupported language: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submitted_language_fallback() {
        assert_eq!(Language::from_submitted(Some("DE")), Language::De);
        assert_eq!(Language::from_submitted(Some("cz")), Language::Cs);
        assert_eq!(Language::from_submitted(Some("fr")), Language::Cs);
        assert_eq!(Language::from_submitted(None), Language::Cs);
    }

    #[test]
    fn test_parse_language_code() {
        assert_eq!(" EN ".parse::<Language>(), Ok(Language::En));
        assert!("fr".parse::<Language>().is_err());
    }
}
