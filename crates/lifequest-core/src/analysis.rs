//! User analysis: snapshot in, ranked report out.
//!
//! One analysis runs forward chaining over the user's observations, feeds
//! the numeric readings to the fuzzy engine, and ranks everything the two
//! produced. Each call works in a fresh [`InferenceSession`] unless the
//! caller goes through [`SharedAnalyzer`].

use chrono::Timelike;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex};

use crate::chaining::ForwardChainer;
use crate::error::{CoreError, Result};
use crate::facts::{Fact, FactStore};
use crate::fuzzy::FuzzyOutcome;
use crate::kb::KnowledgeBase;
use crate::ranker::{Candidate, Category, RankedRecommendations, Ranker};
use crate::session::InferenceSession;
use crate::storage::{Config, EngineConfig, ObservationConfig};

/// What the app knows about a user at analysis time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSnapshot {
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub xp: u32,
    #[serde(default)]
    pub total_tasks: u32,
    #[serde(default)]
    pub tasks_completed_today: u32,
    #[serde(default)]
    pub tasks_completed_this_week: u32,
    #[serde(default)]
    pub streak_days: u32,
    #[serde(default)]
    pub friends_count: u32,
    #[serde(default = "default_account_age")]
    pub account_age_days: u32,
    /// Self-reported, 0 to 10.
    #[serde(default)]
    pub stress_level: Option<f64>,
    /// Self-reported.
    #[serde(default)]
    pub sitting_hours: Option<f64>,
    /// Minutes, self-reported.
    #[serde(default)]
    pub physical_activity_today: f64,
    /// Score from the external productivity model, 0 to 100.
    #[serde(default)]
    pub productivity: Option<f64>,
    /// Local hour override; the wall clock is used when absent.
    #[serde(default)]
    pub current_hour: Option<u32>,
}

fn default_level() -> u32 {
    1
}
fn default_account_age() -> u32 {
    1
}

impl Default for UserSnapshot {
    fn default() -> Self {
        Self {
            level: default_level(),
            xp: 0,
            total_tasks: 0,
            tasks_completed_today: 0,
            tasks_completed_this_week: 0,
            streak_days: 0,
            friends_count: 0,
            account_age_days: default_account_age(),
            stress_level: None,
            sitting_hours: None,
            physical_activity_today: 0.0,
            productivity: None,
            current_hour: None,
        }
    }
}

impl UserSnapshot {
    /// Observations for the fact store.
    ///
    /// Counters are certain; self-reported readings carry the configured
    /// confidence and are skipped when missing.
    pub fn to_facts(&self, observations: &ObservationConfig) -> Vec<Fact> {
        let hour = self
            .current_hour
            .unwrap_or_else(|| chrono::Local::now().hour());

        let mut facts = vec![
            Fact::certain("user_level", self.level),
            Fact::certain("user_xp", self.xp),
            Fact::certain("total_tasks", self.total_tasks),
            Fact::certain("tasks_completed_today", self.tasks_completed_today),
            Fact::certain("tasks_completed_this_week", self.tasks_completed_this_week),
            Fact::certain("streak_days", self.streak_days),
            Fact::certain("friends_count", self.friends_count),
            Fact::certain("account_age_days", self.account_age_days),
            Fact::certain("current_hour", hour),
            Fact::new(
                "physical_activity_today",
                self.physical_activity_today,
                observations.activity,
            ),
        ];
        if let Some(stress) = self.stress_level {
            facts.push(Fact::new("stress_level", stress, observations.stress));
        }
        if let Some(sitting) = self.sitting_hours {
            facts.push(Fact::new("sitting_hours", sitting, observations.sitting));
        }
        facts
    }

    /// Crisp inputs for the fuzzy engine, keyed by variable name.
    pub fn fuzzy_inputs(&self) -> Vec<(&'static str, f64)> {
        [
            ("stress", self.stress_level),
            ("sitting_hours", self.sitting_hours),
            ("tasks_completed_today", Some(f64::from(self.tasks_completed_today))),
            ("productivity", self.productivity),
        ]
        .into_iter()
        .filter_map(|(name, value)| Some((name, value?)))
        .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Guess from the quest name.
    pub fn from_name(name: &str) -> Self {
        let lowered = name.to_lowercase();
        if ["first", "intro", "5 min"].iter().any(|k| lowered.contains(k)) {
            Difficulty::Easy
        } else if ["master", "marathon"].iter().any(|k| lowered.contains(k)) {
            Difficulty::Hard
        } else {
            Difficulty::Medium
        }
    }

    pub fn xp_reward(&self) -> u32 {
        match self {
            Difficulty::Easy => 10,
            Difficulty::Medium => 25,
            Difficulty::Hard => 50,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestCategory {
    Team,
    Challenge,
    Productivity,
    Health,
    General,
}

impl QuestCategory {
    /// Guess from the quest name.
    pub fn from_name(name: &str) -> Self {
        let lowered = name.to_lowercase();
        if lowered.contains("team") {
            QuestCategory::Team
        } else if lowered.contains("challenge") {
            QuestCategory::Challenge
        } else if lowered.contains("productiv") {
            QuestCategory::Productivity
        } else {
            QuestCategory::General
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestSuggestion {
    pub id: String,
    pub name: String,
    pub difficulty: Difficulty,
    pub xp_reward: u32,
    pub category: QuestCategory,
    /// Proposed in response to the user's current state rather than unlocked.
    pub suggested: bool,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusLine {
    pub status: String,
    pub confidence: f64,
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (confidence {:.0}%)", self.status, self.confidence * 100.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub id: String,
    pub message: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analytics {
    pub rounds: usize,
    pub rules_fired: Vec<String>,
    pub new_facts: usize,
    pub final_facts: Vec<Fact>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub status: Option<StatusLine>,
    pub quests: Vec<QuestSuggestion>,
    pub recommendations: RankedRecommendations,
    pub notifications: Vec<Notification>,
    /// `None` when no fuzzy rule triggered.
    pub fuzzy: Option<FuzzyOutcome>,
    pub analytics: Analytics,
}

/// Runs the full pipeline against a shared, read-only knowledge base.
#[derive(Debug, Clone)]
pub struct AnalysisService {
    kb: Arc<KnowledgeBase>,
    engine: EngineConfig,
    observations: ObservationConfig,
    ranker: Ranker,
}

impl AnalysisService {
    /// Service with default settings.
    pub fn new(kb: Arc<KnowledgeBase>) -> Self {
        Self::with_config(kb, &Config::default())
    }

    pub fn with_config(kb: Arc<KnowledgeBase>, config: &Config) -> Self {
        Self {
            kb,
            engine: config.engine.clone(),
            observations: config.observations.clone(),
            ranker: Ranker::new(config.ranker.clone()),
        }
    }

    /// Load the configured knowledge base, or the built-in one.
    pub fn from_config(config: &Config) -> Result<Self> {
        let kb = match &config.knowledge_base {
            Some(path) => KnowledgeBase::load(path)?,
            None => KnowledgeBase::builtin()?,
        };
        Ok(Self::with_config(Arc::new(kb), config))
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.kb
    }

    /// Analyze in a fresh session.
    pub fn analyze(&self, snapshot: &UserSnapshot) -> AnalysisReport {
        let mut session = InferenceSession::new(&self.kb);
        self.analyze_in(&mut session, snapshot)
    }

    /// Reset `session`, then analyze in it.
    pub fn analyze_in(&self, session: &mut InferenceSession, snapshot: &UserSnapshot) -> AnalysisReport {
        session.reset();
        session.observe_all(snapshot.to_facts(&self.observations));

        let forward = ForwardChainer::new(&self.kb)
            .with_max_rounds(self.engine.max_rounds)
            .run(session);
        let fuzzy = self.kb.fuzzy().evaluate(snapshot.fuzzy_inputs());

        let facts = session.facts();
        let candidates = ranking_candidates(facts, fuzzy.as_ref());
        let recommendations = self
            .ranker
            .rank(candidates, fuzzy.as_ref().map(|f| f.crisp_score));

        let report = AnalysisReport {
            status: facts.get("user_status").map(|fact| StatusLine {
                status: fact.value.to_string(),
                confidence: fact.confidence,
            }),
            quests: quest_suggestions(facts),
            recommendations,
            notifications: notifications(facts),
            fuzzy,
            analytics: Analytics {
                rounds: forward.rounds,
                rules_fired: forward.rules_fired,
                new_facts: forward.new_facts,
                final_facts: forward.final_facts,
            },
        };
        tracing::info!(
            rules_fired = report.analytics.rules_fired.len(),
            quests = report.quests.len(),
            priority = ?report.recommendations.priority,
            "user analysis finished"
        );
        report
    }
}

/// Elements of a list-valued fact with the fact's aggregate confidence.
fn list_elements(facts: &FactStore, name: &str) -> Vec<(String, f64)> {
    let Some(fact) = facts.get(name) else {
        return Vec::new();
    };
    match fact.value.as_list() {
        Some(items) => items
            .iter()
            .map(|item| (item.to_string(), fact.confidence))
            .collect(),
        None => vec![(fact.value.to_string(), fact.confidence)],
    }
}

fn ranking_candidates(facts: &FactStore, fuzzy: Option<&FuzzyOutcome>) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = fuzzy
        .map(|outcome| {
            outcome
                .advice
                .iter()
                .map(|advice| Candidate::new(advice.text.clone(), advice.confidence))
                .collect()
        })
        .unwrap_or_default();

    for name in ["health_tips", "wellness_tips"] {
        candidates.extend(
            list_elements(facts, name)
                .into_iter()
                .map(|(message, cf)| Candidate::new(message, cf).in_category(Category::Health)),
        );
    }
    if let Some(status) = facts.get("user_status") {
        candidates.push(
            Candidate::new(status.value.to_string(), status.confidence).in_category(Category::Status),
        );
    }
    for name in ["available_quests", "suggested_quest"] {
        candidates.extend(
            list_elements(facts, name)
                .into_iter()
                .map(|(message, cf)| Candidate::new(message, cf).in_category(Category::Quest)),
        );
    }
    candidates
}

/// Unlocked quests first, then suggestions; each name appears once.
fn quest_suggestions(facts: &FactStore) -> Vec<QuestSuggestion> {
    let mut quests: Vec<QuestSuggestion> = Vec::new();

    for (i, (name, confidence)) in list_elements(facts, "available_quests").into_iter().enumerate() {
        if quests.iter().any(|q| q.name == name) {
            continue;
        }
        let difficulty = Difficulty::from_name(&name);
        quests.push(QuestSuggestion {
            id: format!("quest_avail_{i}"),
            difficulty,
            xp_reward: difficulty.xp_reward(),
            category: QuestCategory::from_name(&name),
            suggested: false,
            confidence,
            name,
        });
    }

    for (i, (name, confidence)) in list_elements(facts, "suggested_quest").into_iter().enumerate() {
        if quests.iter().any(|q| q.name == name) {
            continue;
        }
        quests.push(QuestSuggestion {
            id: format!("quest_suggested_{i}"),
            difficulty: Difficulty::Easy,
            xp_reward: Difficulty::Easy.xp_reward(),
            category: QuestCategory::Health,
            suggested: true,
            confidence,
            name,
        });
    }
    quests
}

fn notifications(facts: &FactStore) -> Vec<Notification> {
    list_elements(facts, "notifications")
        .into_iter()
        .enumerate()
        .map(|(i, (message, confidence))| Notification {
            id: format!("notification_{i}"),
            message,
            confidence,
        })
        .collect()
}

/// One analyzer whose session is reused across calls.
///
/// The lock is held for the whole reset, seed, infer and format sequence,
/// so concurrent callers never observe each other's facts.
#[derive(Debug)]
pub struct SharedAnalyzer {
    service: AnalysisService,
    session: Mutex<InferenceSession>,
}

impl SharedAnalyzer {
    pub fn new(service: AnalysisService) -> Self {
        let session = InferenceSession::new(service.knowledge_base());
        Self {
            service,
            session: Mutex::new(session),
        }
    }

    pub fn analyze(&self, snapshot: &UserSnapshot) -> Result<AnalysisReport> {
        let mut session = self
            .session
            .lock()
            .map_err(|e| CoreError::Custom(format!("Lock error: {e}")))?;
        Ok(self.service.analyze_in(&mut session, snapshot))
    }
}
