//! The badge catalog and the pure achievement rule engine.
//!
//! Badges are named boolean achievements tracked per couple. The server's
//! copy is authoritative across devices; the client evaluates rules
//! optimistically against fresh domain counters and pushes the result.
//!
//! Two invariants hold everywhere:
//! - A rule fires at most once. Once a badge is earned it is never
//!   re-evaluated back to false.
//! - [`evaluate`] is idempotent: run twice over the same snapshot and
//!   state, the second run reports no change.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Every badge the app can award, in display order.
///
/// Only a subset has counter-backed rules (see [`evaluate`]); the rest are
/// earned through server-side tracking and reach the client via state
/// merges.
pub const BADGE_KEYS: [&str; 15] = [
    "first_date",
    "movie_buffs",
    "bookworms",
    "challenge_accepted",
    "goal_crushers",
    "consistent_communicator",
    "memory_makers",
    "romantic_planner",
    "mood_tracker",
    "anniversary_hero",
    "bucket_list_boss",
    "surprise_specialist",
    "streak_master",
    "early_bird",
    "night_owl",
];

/// Domain counters the achievement rules are judged against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterSnapshot {
    /// Activities with status `completed`.
    pub completed_activities: u32,
    /// Movies with status `watched`.
    pub watched_movies: u32,
    /// Books with status `completed`.
    pub finished_books: u32,
    /// Challenges with a completion timestamp.
    pub completed_challenges: u32,
    /// Goals marked completed.
    pub completed_goals: u32,
    /// Photos in the shared gallery.
    pub uploaded_photos: u32,
}

struct Rule {
    key: &'static str,
    satisfied: fn(&CounterSnapshot) -> bool,
}

// Thresholds mirror the badge descriptions shown to users.
const RULES: [Rule; 6] = [
    Rule {
        key: "first_date",
        satisfied: |c| c.completed_activities >= 1,
    },
    Rule {
        key: "movie_buffs",
        satisfied: |c| c.watched_movies >= 10,
    },
    Rule {
        key: "bookworms",
        satisfied: |c| c.finished_books >= 5,
    },
    Rule {
        key: "challenge_accepted",
        satisfied: |c| c.completed_challenges >= 1,
    },
    Rule {
        key: "goal_crushers",
        satisfied: |c| c.completed_goals >= 5,
    },
    Rule {
        key: "memory_makers",
        satisfied: |c| c.uploaded_photos >= 10,
    },
];

/// The earned/unearned badge map for one couple.
///
/// Serializes as a flat JSON object (`{"first_date": true, ...}`), which is
/// the exact wire shape of the progress endpoint. Keys absent from the map
/// count as not earned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BadgeState(BTreeMap<String, bool>);

impl BadgeState {
    /// An empty state with nothing earned.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the badge is earned. Missing keys read as false.
    #[must_use]
    pub fn earned(&self, key: &str) -> bool {
        self.0.get(key).copied().unwrap_or(false)
    }

    /// Mark a badge earned. Returns true if it was not earned before.
    pub fn award(&mut self, key: &str) -> bool {
        let entry = self.0.entry(key.to_owned()).or_insert(false);
        let newly_earned = !*entry;
        *entry = true;
        newly_earned
    }

    /// Union-merge another state into this one. Earned always wins, so a
    /// merge can never take a badge away.
    pub fn merge(&mut self, other: &Self) {
        for (key, &earned) in &other.0 {
            let entry = self.0.entry(key.clone()).or_insert(false);
            *entry = *entry || earned;
        }
    }

    /// Keys currently earned, in sorted order.
    pub fn earned_keys(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .filter(|&(_, &earned)| earned)
            .map(|(key, _)| key.as_str())
    }

    /// Number of earned badges.
    #[must_use]
    pub fn earned_count(&self) -> usize {
        self.0.values().filter(|&&earned| earned).count()
    }

    /// View of the underlying map, for serialization call sites.
    #[must_use]
    pub const fn as_map(&self) -> &BTreeMap<String, bool> {
        &self.0
    }
}

impl FromIterator<(String, bool)> for BadgeState {
    fn from_iter<I: IntoIterator<Item = (String, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Evaluate every counter-backed rule against a snapshot.
///
/// Returns the updated state plus whether anything newly fired. Rules whose
/// badge is already earned are skipped, which is what makes repeat runs
/// no-ops.
#[must_use]
pub fn evaluate(snapshot: &CounterSnapshot, state: &BadgeState) -> (BadgeState, bool) {
    let mut next = state.clone();
    let mut changed = false;

    for rule in &RULES {
        if !next.earned(rule.key) && (rule.satisfied)(snapshot) {
            next.award(rule.key);
            changed = true;
        }
    }

    (next, changed)
}
