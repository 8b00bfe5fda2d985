//! Recommendation ranking.
//!
//! Candidates from the chaining and fuzzy engines compete inside fixed
//! categories. Only the strongest few per category surface ("winner takes
//! all"), labelled with a priority taken from the fuzzy crisp score.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::storage::RankerConfig;

/// Recommendation bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Health,
    Status,
    Quest,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Health => "health",
            Category::Status => "status",
            Category::Quest => "quest",
        }
    }

    fn keywords(&self) -> &'static [&'static str] {
        match self {
            Category::Health => HEALTH_KEYWORDS,
            Category::Status => STATUS_KEYWORDS,
            Category::Quest => QUEST_KEYWORDS,
        }
    }

    /// Keyword classification. Unmatched messages count as health advice.
    pub fn classify(message: &str) -> Self {
        let lowered = message.to_lowercase();
        [Category::Health, Category::Status, Category::Quest]
            .into_iter()
            .find(|category| category.keywords().iter().any(|k| lowered.contains(k)))
            .unwrap_or(Category::Health)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const HEALTH_KEYWORDS: &[&str] = &[
    "stress", "sitting", "stand", "stretch", "walk", "move", "breath", "break", "sleep", "relax",
    "meditation", "health", "wellness", "rest",
];

const STATUS_KEYWORDS: &[&str] = &[
    "level", "status", "xp", "streak", "progress", "productiv", "rhythm", "novice", "adventurer",
    "master",
];

const QUEST_KEYWORDS: &[&str] = &["quest", "challenge", "task", "mission", "team"];

/// Priority label derived from the crisp advice score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityLabel {
    High,
    Medium,
    Low,
}

impl PriorityLabel {
    pub fn from_score(score: Option<f64>, config: &RankerConfig) -> Self {
        match score {
            Some(s) if s >= config.high_threshold => PriorityLabel::High,
            Some(s) if s >= config.medium_threshold => PriorityLabel::Medium,
            _ => PriorityLabel::Low,
        }
    }
}

/// Unranked message with its confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub message: String,
    pub confidence: f64,
    /// Skips keyword classification when set.
    #[serde(default)]
    pub category: Option<Category>,
}

impl Candidate {
    pub fn new(message: impl Into<String>, confidence: f64) -> Self {
        Self {
            message: message.into(),
            confidence,
            category: None,
        }
    }

    pub fn in_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    fn category(&self) -> Category {
        self.category.unwrap_or_else(|| Category::classify(&self.message))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    /// `<category>_<index>` within its bucket.
    pub id: String,
    pub category: Category,
    pub message: String,
    pub priority: PriorityLabel,
    pub confidence: f64,
}

/// Surviving recommendations per category. Empty buckets are empty vectors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRecommendations {
    pub health: Vec<Recommendation>,
    pub status: Vec<Recommendation>,
    pub quests: Vec<Recommendation>,
    pub priority: PriorityLabel,
    pub crisp_score: Option<f64>,
}

impl RankedRecommendations {
    /// All surviving recommendations, health first.
    pub fn iter(&self) -> impl Iterator<Item = &Recommendation> {
        self.health.iter().chain(&self.status).chain(&self.quests)
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Ranker {
    config: RankerConfig,
}

impl Ranker {
    pub fn new(config: RankerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RankerConfig {
        &self.config
    }

    pub fn rank<I>(&self, candidates: I, crisp_score: Option<f64>) -> RankedRecommendations
    where
        I: IntoIterator<Item = Candidate>,
    {
        let priority = PriorityLabel::from_score(crisp_score, &self.config);

        let mut health = Vec::new();
        let mut status = Vec::new();
        let mut quests = Vec::new();
        for candidate in candidates {
            match candidate.category() {
                Category::Health => health.push(candidate),
                Category::Status => status.push(candidate),
                Category::Quest => quests.push(candidate),
            }
        }

        RankedRecommendations {
            health: self.select(Category::Health, health, priority),
            status: self.select(Category::Status, status, priority),
            quests: self.select(Category::Quest, quests, priority),
            priority,
            crisp_score,
        }
    }

    fn select(&self, category: Category, mut bucket: Vec<Candidate>, priority: PriorityLabel) -> Vec<Recommendation> {
        // stable: equal confidences keep submission order
        bucket.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        bucket
            .into_iter()
            .take(self.config.per_category)
            .enumerate()
            .map(|(i, c)| Recommendation {
                id: format!("{category}_{i}"),
                category,
                message: c.message,
                priority,
                confidence: c.confidence,
            })
            .collect()
    }
}
