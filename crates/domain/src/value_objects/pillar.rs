//! Pillar value object
//!
//! Coarse life-area bucket used to group the daily briefing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Life area an event or task belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Pillar {
    /// Health, learning, self-care
    #[default]
    Personal,
    /// Work and client business
    Professional,
    /// Home and family
    Domestic,
}

const CATEGORY_PILLARS: &[(&str, Pillar)] = &[
    ("health", Pillar::Personal),
    ("fitness", Pillar::Personal),
    ("personal", Pillar::Personal),
    ("wellness", Pillar::Personal),
    ("mindfulness", Pillar::Personal),
    ("journal", Pillar::Personal),
    ("learning", Pillar::Personal),
    ("reading", Pillar::Personal),
    ("meditation", Pillar::Personal),
    ("work", Pillar::Professional),
    ("professional", Pillar::Professional),
    ("business", Pillar::Professional),
    ("consulting", Pillar::Professional),
    ("biosero", Pillar::Professional),
    ("lilly", Pillar::Professional),
    ("gbgreg", Pillar::Professional),
    ("dev", Pillar::Professional),
    ("development", Pillar::Professional),
    ("meeting", Pillar::Professional),
    ("r&d", Pillar::Professional),
    ("domestic", Pillar::Domestic),
    ("home", Pillar::Domestic),
    ("family", Pillar::Domestic),
    ("baby", Pillar::Domestic),
    ("oliver", Pillar::Domestic),
    ("meal", Pillar::Domestic),
    ("freezer", Pillar::Domestic),
    ("cooking", Pillar::Domestic),
    ("cleaning", Pillar::Domestic),
    ("maintenance", Pillar::Domestic),
    ("errand", Pillar::Domestic),
    ("shopping", Pillar::Domestic),
];

// Checked in this order; the first pillar with a matching keyword wins.
const TITLE_KEYWORDS: &[(Pillar, &[&str])] = &[
    (
        Pillar::Professional,
        &[
            "standup",
            "sprint",
            "retro",
            "deploy",
            "release",
            "code review",
            "pr review",
            "client",
            "invoice",
            "biosero",
            "lilly",
            "gbgreg",
            "consulting",
        ],
    ),
    (
        Pillar::Domestic,
        &[
            "grocery",
            "doctor",
            "pediatr",
            "daycare",
            "nanny",
            "diaper",
            "formula",
            "laundry",
            "dishes",
            "vacuum",
            "meal prep",
            "freezer",
            "oliver",
            "alissa",
            "baby",
        ],
    ),
    (
        Pillar::Personal,
        &[
            "workout", "rowing", "meditat", "journal", "read", "stretch", "walk", "therapy",
            "bath",
        ],
    ),
];

impl Pillar {
    /// Classify an item by its categories first, then by title keywords
    ///
    /// The first category with a known pillar decides. Without one, the title
    /// is searched for keywords. Everything else is personal.
    #[must_use]
    pub fn classify<S: AsRef<str>>(categories: &[S], title: &str) -> Self {
        for category in categories {
            let category = category.as_ref().trim().to_lowercase();
            if let Some((_, pillar)) = CATEGORY_PILLARS.iter().find(|(name, _)| *name == category)
            {
                return *pillar;
            }
        }

        let title = title.to_lowercase();
        TITLE_KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|kw| title.contains(kw)))
            .map_or(Self::Personal, |(pillar, _)| *pillar)
    }

    /// Lowercase name used on the wire
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Personal => "personal",
            Self::Professional => "professional",
            Self::Domestic => "domestic",
        }
    }
}

impl fmt::Display for Pillar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
