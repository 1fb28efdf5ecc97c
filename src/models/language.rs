//! Interface Language

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Language of prompts, fallback strings and rendered responses.
///
/// Intent detection always consults both keyword sets regardless of this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Zh,
    En,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::Zh => "zh",
            Language::En => "en",
        }
    }

    /// Pick the string for this language.
    pub fn pick<'a>(&self, zh: &'a str, en: &'a str) -> &'a str {
        match self {
            Language::Zh => zh,
            Language::En => en,
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
            "zh" | "zh-cn" | "zh_cn" | "cn" | "chinese" => Ok(Language::Zh),
            "en" | "en-us" | "en_us" | "english" => Ok(Language::En),
            other => Err(format!(
                "Unsupported language: {}. Must be 'zh' or 'en'",
                other
            )),
        }
    }
}
