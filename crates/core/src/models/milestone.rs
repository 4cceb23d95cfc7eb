//! Relationship timeline milestones.
//!
//! Milestones are a client-local journal: they are stored per couple on the
//! device and never leave it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What kind of moment a milestone marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneKind {
    Anniversary,
    #[default]
    Date,
    Achievement,
    Emotion,
    Place,
}

impl MilestoneKind {
    /// The storage token for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Anniversary => "anniversary",
            Self::Date => "date",
            Self::Achievement => "achievement",
            Self::Emotion => "emotion",
            Self::Place => "place",
        }
    }
}

impl std::fmt::Display for MilestoneKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MilestoneKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "anniversary" => Ok(Self::Anniversary),
            "date" => Ok(Self::Date),
            "achievement" => Ok(Self::Achievement),
            "emotion" => Ok(Self::Emotion),
            "place" => Ok(Self::Place),
            _ => Err(format!(
                "invalid milestone kind: {s} (expected anniversary, date, achievement, emotion \
                 or place)"
            )),
        }
    }
}

/// A moment on the couple's timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Milestone {
    pub id: Uuid,
    pub title: String,
    /// The day the moment happened, without a time component.
    pub date: NaiveDate,
    pub description: String,
    #[serde(rename = "type", default)]
    pub kind: MilestoneKind,
}

impl Milestone {
    /// Create a milestone with a fresh random id.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        date: NaiveDate,
        description: impl Into<String>,
        kind: MilestoneKind,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            date,
            description: description.into(),
            kind,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serializes_under_type_key() {
        let milestone = Milestone::new(
            "First met",
            NaiveDate::from_ymd_opt(2023, 5, 15).unwrap(),
            "Coffee shop downtown",
            MilestoneKind::Place,
        );
        let json = serde_json::to_value(&milestone).unwrap();
        assert_eq!(json["type"], "place");
        assert_eq!(json["date"], "2023-05-15");
    }

    #[test]
    fn test_fresh_milestones_get_distinct_ids() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let a = Milestone::new("A", date, "", MilestoneKind::Date);
        let b = Milestone::new("B", date, "", MilestoneKind::Date);
        assert_ne!(a.id, b.id);
    }
}
