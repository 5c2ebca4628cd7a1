//! Achievement evaluation pass
//!
//! Walks the catalogue in order and unlocks every achievement whose condition
//! holds and that is not unlocked yet. Unlocks are never revoked, and a
//! condition that fails to evaluate simply counts as not met.

use super::definitions::{Achievement, ACHIEVEMENTS};
use crate::progress::models::Profile;

/// Display status of one achievement.
#[derive(Debug, Clone, Copy)]
pub struct AchievementStatus {
    pub achievement: &'static Achievement,
    pub unlocked: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct AchievementEngine {
    catalogue: &'static [Achievement],
}

impl Default for AchievementEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AchievementEngine {
    pub fn new() -> Self {
        Self::with_catalogue(ACHIEVEMENTS)
    }

    pub fn with_catalogue(catalogue: &'static [Achievement]) -> Self {
        Self { catalogue }
    }

    pub fn catalogue(&self) -> &'static [Achievement] {
        self.catalogue
    }

    pub fn get(&self, id: &str) -> Option<&'static Achievement> {
        self.catalogue.iter().find(|a| a.id == id)
    }

    /// Achievements that would unlock if the profile were evaluated now.
    pub fn pending(&self, profile: &Profile) -> Vec<&'static Achievement> {
        self.catalogue
            .iter()
            .filter(|a| !profile.achievements.is_unlocked(a.id) && is_met(a, profile))
            .collect()
    }

    /// Unlock everything that is newly satisfied, in catalogue order.
    pub fn evaluate(&self, profile: &mut Profile) -> Vec<&'static Achievement> {
        // Every condition sees the same snapshot, so unlock order cannot
        // change what else unlocks in this pass.
        let newly_unlocked = self.pending(profile);

        for achievement in &newly_unlocked {
            profile.achievements.unlock(achievement.id, achievement.points);
            tracing::info!(
                "Achievement unlocked: {} (+{} points)",
                achievement.id,
                achievement.points
            );
        }

        newly_unlocked
    }

    /// Every achievement with its unlocked flag, for display.
    pub fn progress(&self, profile: &Profile) -> Vec<AchievementStatus> {
        self.catalogue
            .iter()
            .map(|achievement| AchievementStatus {
                achievement,
                unlocked: profile.achievements.is_unlocked(achievement.id),
            })
            .collect()
    }

    /// Points the unlocked set is worth according to this catalogue.
    pub fn points_for(&self, profile: &Profile) -> u32 {
        profile
            .achievements
            .unlocked
            .iter()
            .filter_map(|id| self.get(id))
            .map(|a| a.points)
            .sum()
    }

    /// Recompute the stored point total from the unlocked set.
    /// Returns true if it was out of step.
    pub fn repair_total(&self, profile: &mut Profile) -> bool {
        let expected = self.points_for(profile);
        if profile.achievements.total_points == expected {
            return false;
        }
        tracing::warn!(
            "Achievement points were {}, recomputed as {}",
            profile.achievements.total_points,
            expected
        );
        profile.achievements.total_points = expected;
        true
    }
}

fn is_met(achievement: &Achievement, profile: &Profile) -> bool {
    match (achievement.predicate)(profile) {
        Ok(met) => met,
        Err(e) => {
            tracing::warn!("Achievement '{}' could not be evaluated: {}", achievement.id, e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::progress::achievements::definitions::AchievementCategory;
    use crate::progress::error::RuleError;

    static TEST_CATALOGUE: &[Achievement] = &[
        Achievement {
            id: "broken",
            title: "Broken",
            description: "Always fails to evaluate",
            icon: "💣",
            category: AchievementCategory::Milestone,
            points: 99,
            predicate: |_| Err(RuleError::NoQuestDay),
        },
        Achievement {
            id: "played",
            title: "Played",
            description: "Played once",
            icon: "▶️",
            category: AchievementCategory::Milestone,
            points: 5,
            predicate: |p| Ok(p.stats.games_played > 0),
        },
        Achievement {
            id: "scored",
            title: "Scored",
            description: "Scored 100",
            icon: "💯",
            category: AchievementCategory::Score,
            points: 20,
            predicate: |p| Ok(p.stats.total_score >= 100),
        },
    ];

    fn engine() -> AchievementEngine {
        AchievementEngine::with_catalogue(TEST_CATALOGUE)
    }

    #[test]
    fn test_failing_predicate_does_not_block_others() {
        let mut profile = Profile::fresh(Utc::now());
        profile.stats.games_played = 1;
        profile.stats.total_score = 150;

        let unlocked = engine().evaluate(&mut profile);
        let ids: Vec<_> = unlocked.iter().map(|a| a.id).collect();

        assert_eq!(ids, vec!["played", "scored"]);
        assert_eq!(profile.achievements.total_points, 25);
    }

    #[test]
    fn test_unlocks_happen_once() {
        let mut profile = Profile::fresh(Utc::now());
        profile.stats.games_played = 1;

        assert_eq!(engine().evaluate(&mut profile).len(), 1);
        assert!(engine().evaluate(&mut profile).is_empty());
        assert_eq!(profile.achievements.unlocked, vec!["played"]);
    }

    #[test]
    fn test_unlocks_are_never_revoked() {
        let mut profile = Profile::fresh(Utc::now());
        profile.stats.total_score = 120;
        engine().evaluate(&mut profile);

        profile.stats.total_score = -40;
        engine().evaluate(&mut profile);
        assert!(profile.achievements.is_unlocked("scored"));
        assert_eq!(engine().points_for(&profile), profile.achievements.total_points);
    }

    #[test]
    fn test_pending_does_not_mutate() {
        let mut profile = Profile::fresh(Utc::now());
        profile.stats.games_played = 3;
        assert_eq!(engine().pending(&profile).len(), 1);
        assert!(profile.achievements.unlocked.is_empty());

        let status = engine().progress(&profile);
        assert_eq!(status.len(), 3);
        assert!(status.iter().all(|s| !s.unlocked));
    }

    #[test]
    fn test_repair_total_from_unlocked_set() {
        let mut profile = Profile::fresh(Utc::now());
        profile.achievements.unlocked = vec!["played".into(), "scored".into()];

        assert!(engine().repair_total(&mut profile));
        assert_eq!(profile.achievements.total_points, 25);
        assert!(!engine().repair_total(&mut profile));
    }

    #[test]
    fn test_default_catalogue_first_game() {
        let mut profile = Profile::fresh(Utc::now());
        assert!(AchievementEngine::new().evaluate(&mut profile).is_empty());

        profile.stats.games_played = 1;
        let unlocked = AchievementEngine::new().evaluate(&mut profile);
        assert_eq!(unlocked[0].id, "first_game");
    }
}
