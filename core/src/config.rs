//! Client configuration.

use std::fmt;
use std::str::FromStr;

use crate::product::ProductLine;

/// Response language for item descriptions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Language {
    #[default]
    Ru,
    En,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Language::Ru => "ru",
            Language::En => "en",
        })
    }
}

/// Returned when a string names no supported language.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown language \"{0}\" (expected ru or en)")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ru" => Ok(Language::Ru),
            "en" => Ok(Language::En),
            _ => Err(UnknownLanguage(s.to_string())),
        }
    }
}

/// Everything needed to build a `MarketClient`.
///
/// `base_url` overrides the product line's own URL, e.g. for a mirror or a
/// local mock server.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub key: String,
    pub product: ProductLine,
    pub base_url: Option<String>,
    pub language: Language,
}

impl ClientConfig {
    pub fn new(key: impl Into<String>, product: ProductLine) -> Self {
        Self {
            key: key.into(),
            product,
            base_url: None,
            language: Language::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// The URL requests are sent to, without a trailing slash.
    pub fn resolved_base_url(&self) -> String {
        self.base_url
            .as_deref()
            .unwrap_or(self.product.base_url())
            .trim_end_matches('/')
            .to_string()
    }
}

// Keeps the access key out of logs and panic messages.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("key", &"<redacted>")
            .field("product", &self.product)
            .field("base_url", &self.base_url)
            .field("language", &self.language)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_product_url_and_russian() {
        let config = ClientConfig::new("k", ProductLine::Gifts);
        assert_eq!(config.resolved_base_url(), "https://gifts.tm");
        assert_eq!(config.language, Language::Ru);
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let config = ClientConfig::new("k", ProductLine::Dota2).with_base_url("http://localhost:3000/");
        assert_eq!(config.resolved_base_url(), "http://localhost:3000");
    }

    #[test]
    fn debug_output_hides_key() {
        let config = ClientConfig::new("SECRET-KEY", ProductLine::Csgo);
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("SECRET-KEY"));
        assert!(rendered.contains("Csgo"));
    }

    #[test]
    fn language_parses_and_displays() {
        assert_eq!("EN".parse::<Language>(), Ok(Language::En));
        assert_eq!(Language::Ru.to_string(), "ru");
        assert!("de".parse::<Language>().is_err());
    }
}
