use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Output / UI language. Passed to the model as a plain hint ("en", "de").
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    De,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::De => "de",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "de" => Ok(Language::De),
            other => Err(format!("unsupported language '{other}' (expected en or de)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("DE".parse::<Language>().unwrap(), Language::De);
        assert_eq!(" en ".parse::<Language>().unwrap(), Language::En);
        assert!("fr".parse::<Language>().is_err());
    }

    #[test]
    fn test_serde_uses_lowercase_codes() {
        assert_eq!(serde_json::to_string(&Language::De).unwrap(), r#""de""#);
        let lang: Language = serde_json::from_str(r#""en""#).unwrap();
        assert_eq!(lang, Language::En);
    }
}
