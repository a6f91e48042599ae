use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::achievements::{Achievement, AchievementId};

/// Accumulated progress for one user.
///
/// The core never holds on to this; callers pass it in and persist whatever
/// comes back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    #[serde(default)]
    pub points: u64,
    #[serde(default)]
    pub daily_streak: u32,
    #[serde(default)]
    pub weekly_streak: u32,
    #[serde(default)]
    pub achievements: BTreeSet<AchievementId>,
    /// Last day a status change was recorded. `None` counts as today.
    #[serde(default)]
    pub last_active: Option<NaiveDate>,
}

impl UserStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_achievement(&self, id: AchievementId) -> bool {
        self.achievements.contains(&id)
    }

    pub fn add_points(&mut self, points: u32) {
        self.points = self.points.saturating_add(u64::from(points));
    }

    /// Record an unlock. Returns false if it was already held.
    pub(crate) fn unlock(&mut self, achievement: &Achievement) -> bool {
        if !self.achievements.insert(achievement.id) {
            return false;
        }
        self.add_points(achievement.points);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_partial_json() {
        let stats: UserStats = serde_json::from_str(r#"{"points": 120}"#).unwrap();
        assert_eq!(stats.points, 120);
        assert_eq!(stats.daily_streak, 0);
        assert!(stats.achievements.is_empty());
        assert!(stats.last_active.is_none());
    }

    #[test]
    fn roundtrips_achievement_ids() {
        let mut stats = UserStats::new();
        stats.achievements.insert(AchievementId::EarlyBird);
        stats.last_active = NaiveDate::from_ymd_opt(2024, 5, 6);

        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"early_bird\""));
        let back: UserStats = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stats);
    }

    #[test]
    fn unlock_is_idempotent() {
        let mut stats = UserStats::new();
        let achievement = AchievementId::TaskMaster.describe(10, 500);
        assert!(stats.unlock(&achievement));
        assert!(!stats.unlock(&achievement));
        assert_eq!(stats.points, 500);
    }
}
