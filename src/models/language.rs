use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Recognition language / model selector
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    #[default]
    Eng,
    Hin,
    Spa,
    Fra,
    Deu,
    Ara,
    ChiSim,
    Jpn,
}

impl Language {
    pub const ALL: [Language; 8] = [
        Language::Eng,
        Language::Hin,
        Language::Spa,
        Language::Fra,
        Language::Deu,
        Language::Ara,
        Language::ChiSim,
        Language::Jpn,
    ];

    /// Engine language code
    pub fn code(&self) -> &'static str {
        match self {
            Self::Eng => "eng",
            Self::Hin => "hin",
            Self::Spa => "spa",
            Self::Fra => "fra",
            Self::Deu => "deu",
            Self::Ara => "ara",
            Self::ChiSim => "chi_sim",
            Self::Jpn => "jpn",
        }
    }

    /// Human-readable label for language pickers
    pub fn label(&self) -> &'static str {
        match self {
            Self::Eng => "English",
            Self::Hin => "Hindi",
            Self::Spa => "Spanish",
            Self::Fra => "French",
            Self::Deu => "German",
            Self::Ara => "Arabic",
            Self::ChiSim => "Chinese (Simplified)",
            Self::Jpn => "Japanese",
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
        Self::ALL
            .iter()
            .copied()
            .find(|lang| lang.code() == s)
            .ok_or_else(|| format!("Unsupported language code: '{}'", s))
    }
}
