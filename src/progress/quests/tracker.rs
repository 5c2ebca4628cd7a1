//! Daily quest rotation and completion
//!
//! Selection and completion are separate steps. A new selection replaces the
//! previous day's set in full; completion credits the reward exactly once
//! through the same score path the recorder uses.

use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;

use super::definitions::{DailyQuest, DAILY_QUESTS};
use crate::progress::models::Profile;

/// Quests handed out per calendar day.
pub const QUESTS_PER_DAY: usize = 3;

/// Display status of one of today's quests.
#[derive(Debug, Clone, Copy)]
pub struct QuestStatus {
    pub quest: &'static DailyQuest,
    pub completed: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct DailyQuestEngine {
    catalogue: &'static [DailyQuest],
    clamp_total_at_zero: bool,
}

impl Default for DailyQuestEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DailyQuestEngine {
    pub fn new() -> Self {
        Self::with_catalogue(DAILY_QUESTS)
    }

    pub fn with_catalogue(catalogue: &'static [DailyQuest]) -> Self {
        Self {
            catalogue,
            clamp_total_at_zero: false,
        }
    }

    /// Apply the same total-score clamping as the score recorder.
    pub fn clamp_total_at_zero(mut self, clamp: bool) -> Self {
        self.clamp_total_at_zero = clamp;
        self
    }

    pub fn get(&self, id: &str) -> Option<&'static DailyQuest> {
        self.catalogue.iter().find(|q| q.id == id)
    }

    /// True if `today` has no quest selection yet.
    pub fn needs_rotation(&self, profile: &Profile, today: NaiveDate) -> bool {
        let quests = &profile.daily_quests;
        !quests.is_for(today) || (quests.quest_ids.is_empty() && !self.catalogue.is_empty())
    }

    /// Select today's quests if the stored selection belongs to another day.
    /// Returns true if a new selection was made.
    pub fn ensure_todays_quests<R: Rng + ?Sized>(
        &self,
        profile: &mut Profile,
        today: NaiveDate,
        rng: &mut R,
    ) -> bool {
        if !self.needs_rotation(profile, today) {
            return false;
        }

        if self.catalogue.len() < QUESTS_PER_DAY {
            tracing::warn!(
                "Quest catalogue has {} entries, fewer than {} per day",
                self.catalogue.len(),
                QUESTS_PER_DAY
            );
        }

        let mut ids: Vec<&'static str> = self.catalogue.iter().map(|q| q.id).collect();
        ids.shuffle(rng);
        ids.truncate(QUESTS_PER_DAY);

        let quests = &mut profile.daily_quests;
        quests.for_date = Some(today);
        quests.quest_ids = ids.into_iter().map(str::to_string).collect();
        quests.completed_ids.clear();
        quests.reward_total = 0;

        tracing::info!("Daily quests for {}: {}", today, quests.quest_ids.join(", "));
        true
    }

    /// Complete every selected quest whose condition now holds, crediting its
    /// reward to the quest total, the running score and the day's score row.
    pub fn check_completion(&self, profile: &mut Profile, today: NaiveDate) -> Vec<&'static DailyQuest> {
        if !profile.daily_quests.is_for(today) {
            return Vec::new();
        }

        let mut newly_completed = Vec::new();
        let selected = profile.daily_quests.quest_ids.clone();

        for id in &selected {
            if profile.daily_quests.is_completed(id) {
                continue;
            }
            let Some(quest) = self.get(id) else {
                tracing::debug!("Selected quest '{}' is no longer in the catalogue", id);
                continue;
            };
            if !is_met(quest, profile) {
                continue;
            }

            let quests = &mut profile.daily_quests;
            quests.completed_ids.push(quest.id.to_string());
            quests.reward_total += quest.reward;
            quests.lifetime_completed += 1;
            profile
                .stats
                .apply_points(today, quest.reward, self.clamp_total_at_zero);

            tracing::info!("Daily quest completed: {} (+{} points)", quest.id, quest.reward);
            newly_completed.push(quest);
        }

        newly_completed
    }

    /// Quests that would complete if checked now.
    pub fn pending(&self, profile: &Profile, today: NaiveDate) -> Vec<&'static DailyQuest> {
        if !profile.daily_quests.is_for(today) {
            return Vec::new();
        }
        profile
            .daily_quests
            .quest_ids
            .iter()
            .filter(|id| !profile.daily_quests.is_completed(id))
            .filter_map(|id| self.get(id))
            .filter(|q| is_met(q, profile))
            .collect()
    }

    /// Today's selection with completion flags, in selection order.
    pub fn statuses(&self, profile: &Profile) -> Vec<QuestStatus> {
        profile
            .daily_quests
            .quest_ids
            .iter()
            .filter_map(|id| self.get(id))
            .map(|quest| QuestStatus {
                quest,
                completed: profile.daily_quests.is_completed(quest.id),
            })
            .collect()
    }
}

fn is_met(quest: &DailyQuest, profile: &Profile) -> bool {
    match (quest.predicate)(profile) {
        Ok(met) => met,
        Err(e) => {
            tracing::warn!("Quest '{}' could not be evaluated: {}", quest.id, e);
            false
        }
    }
}
