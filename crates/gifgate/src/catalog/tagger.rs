//! Theme and mood tagging from the file name
//!
//! Pure function of the lowercased file name; the bytes are never inspected.
//! A name can land in any number of theme buckets. Mood is picked from the
//! matched themes by fixed priority.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    Trade,
    Intel,
    Threat,
    RetroWeb,
    Misc,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trade => "trade",
            Self::Intel => "intel",
            Self::Threat => "threat",
            Self::RetroWeb => "retro-web",
            Self::Misc => "misc",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Threat,
    Signal,
    Reward,
    Absurd,
    Neutral,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Threat => "threat",
            Self::Signal => "signal",
            Self::Reward => "reward",
            Self::Absurd => "absurd",
            Self::Neutral => "neutral",
        }
    }
}

/// Keyword bucket for one theme.
struct ThemeRule {
    theme: Theme,
    keywords: &'static [&'static str],
}

/// Bucket order is the order themes are reported in.
const THEME_RULES: &[ThemeRule] = &[
    ThemeRule {
        theme: Theme::Trade,
        keywords: &[
            "trade", "trading", "buy", "sell", "pump", "moon", "rocket", "chart", "candle", "bull",
            "bear", "profit", "money", "cash", "coin", "stonks", "whale", "gains",
        ],
    },
    ThemeRule {
        theme: Theme::Intel,
        keywords: &[
            "intel", "radar", "signal", "satellite", "spy", "matrix", "terminal", "hacker",
            "decrypt", "scanner", "data", "eye", "globe", "map", "code",
        ],
    },
    ThemeRule {
        theme: Theme::Threat,
        keywords: &[
            "threat", "alert", "alarm", "siren", "warning", "danger", "skull", "fire",
            "explosion", "bomb", "hazard", "nuke", "virus", "glitch",
        ],
    },
    ThemeRule {
        theme: Theme::RetroWeb,
        keywords: &[
            "retro", "construction", "geocities", "netscape", "banner", "counter", "guestbook",
            "new", "email", "mail", "dancing", "under", "welcome", "webring", "90s", "blink",
        ],
    },
];

/// Mood priority over the matched theme set.
const MOOD_PRIORITY: &[(Theme, Mood)] = &[
    (Theme::Threat, Mood::Threat),
    (Theme::Intel, Mood::Signal),
    (Theme::Trade, Mood::Reward),
    (Theme::RetroWeb, Mood::Absurd),
];

/// Themes and mood for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tags {
    pub themes: Vec<Theme>,
    pub mood: Mood,
}

/// Tag a file by name.
pub fn tag_file_name(file_name: &str) -> Tags {
    let name = file_name.to_lowercase();

    let matched: Vec<Theme> = THEME_RULES
        .iter()
        .filter(|rule| rule.keywords.iter().any(|kw| name.contains(kw)))
        .map(|rule| rule.theme)
        .collect();

    let mood = MOOD_PRIORITY
        .iter()
        .find(|(theme, _)| matched.contains(theme))
        .map(|(_, mood)| *mood)
        .unwrap_or(Mood::Neutral);

    let themes = if matched.is_empty() {
        vec![Theme::Misc]
    } else {
        matched
    };

    Tags { themes, mood }
}
