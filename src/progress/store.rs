//! Profile store - sole owner of the persisted profile
//!
//! All mutation goes through [`ProfileStore::update`], which holds the store
//! lock across load, mutate and save. Callers get owned snapshots back and
//! never a live reference to the stored record.

use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};

use super::achievements::AchievementEngine;
use super::clock::Clock;
use super::models::{Profile, STORAGE_KEY};
use crate::storage::ProfileStorage;

#[derive(Clone)]
pub struct ProfileStore {
    storage: Arc<dyn ProfileStorage>,
    clock: Arc<dyn Clock>,
    key: String,
    achievements: AchievementEngine,
    write_lock: Arc<Mutex<()>>,
}

impl ProfileStore {
    pub fn new(storage: Arc<dyn ProfileStorage>, clock: Arc<dyn Clock>) -> Self {
        Self::with_key(storage, clock, STORAGE_KEY)
    }

    /// Store the profile under a key other than the default one.
    pub fn with_key(storage: Arc<dyn ProfileStorage>, clock: Arc<dyn Clock>, key: &str) -> Self {
        Self {
            storage,
            clock,
            key: key.to_string(),
            achievements: AchievementEngine::new(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Catalogue used to keep the stored achievement total in step with
    /// the unlocked set when a document is loaded.
    pub fn with_achievements(mut self, achievements: AchievementEngine) -> Self {
        self.achievements = achievements;
        self
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Load the profile, creating and persisting a default one if there is
    /// none or the stored document is unreadable.
    pub fn load(&self) -> Result<Profile> {
        let _guard = self.lock();
        self.load_locked()
    }

    /// Overwrite the stored profile.
    pub fn save(&self, profile: &Profile) -> Result<()> {
        let _guard = self.lock();
        self.save_locked(profile)
    }

    /// Load, mutate and save as one step. If `mutate` fails nothing is written.
    pub fn update<F>(&self, mutate: F) -> Result<Profile>
    where
        F: FnOnce(&mut Profile) -> Result<()>,
    {
        self.update_with(mutate).map(|(profile, ())| profile)
    }

    /// Like [`update`](Self::update), also handing back what `mutate` returned.
    pub fn update_with<T, F>(&self, mutate: F) -> Result<(Profile, T)>
    where
        F: FnOnce(&mut Profile) -> Result<T>,
    {
        let _guard = self.lock();
        let mut profile = self.load_locked()?;
        let out = mutate(&mut profile)?;
        self.save_locked(&profile)?;
        Ok((profile, out))
    }

    /// Delete the stored profile. The next load creates a fresh one.
    pub fn reset(&self) -> Result<()> {
        let _guard = self.lock();
        self.storage
            .remove(&self.key)
            .with_context(|| format!("Failed to remove stored profile '{}'", self.key))?;
        tracing::info!("Profile '{}' reset", self.key);
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ()> {
        // The guarded data is (), so a poisoned lock carries no broken state.
        self.write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn load_locked(&self) -> Result<Profile> {
        let raw = self
            .storage
            .read(&self.key)
            .with_context(|| format!("Failed to read stored profile '{}'", self.key))?;

        if let Some(raw) = raw {
            match parse_profile(&raw) {
                Some(mut profile) => {
                    let migrated = profile.normalize();
                    let repaired = self.achievements.repair_total(&mut profile);
                    if migrated || repaired {
                        tracing::debug!("Profile {} migrated to current schema", profile.id);
                        self.save_locked(&profile)?;
                    }
                    return Ok(profile);
                }
                None => {
                    tracing::warn!(
                        "Stored profile '{}' is unreadable; starting a fresh profile",
                        self.key
                    );
                }
            }
        }

        let profile = Profile::fresh(self.clock.now());
        tracing::info!("Created profile {}", profile.id);
        self.save_locked(&profile)?;
        Ok(profile)
    }

    fn save_locked(&self, profile: &Profile) -> Result<()> {
        let json = serde_json::to_string(profile).with_context(|| "Failed to serialize profile")?;
        self.storage
            .write(&self.key, &json)
            .with_context(|| format!("Failed to write stored profile '{}'", self.key))
    }
}

/// Parse a stored document. Anything that does not yield a usable profile is `None`.
fn parse_profile(raw: &str) -> Option<Profile> {
    match serde_json::from_str::<Profile>(raw) {
        Ok(profile) if !profile.id.trim().is_empty() => Some(profile),
        Ok(_) => {
            tracing::debug!("Stored profile has an empty id");
            None
        }
        Err(e) => {
            tracing::debug!("Stored profile failed to parse: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::clock::SystemClock;
    use crate::storage::MemoryStorage;

    fn store_with(storage: MemoryStorage) -> (ProfileStore, Arc<MemoryStorage>) {
        let storage = Arc::new(storage);
        let store = ProfileStore::new(storage.clone(), Arc::new(SystemClock));
        (store, storage)
    }

    #[test]
    fn test_load_creates_and_persists_default() {
        let (store, storage) = store_with(MemoryStorage::new());
        let profile = store.load().unwrap();

        assert!(!profile.id.is_empty());
        assert!(storage.read(STORAGE_KEY).unwrap().is_some());
        assert_eq!(store.load().unwrap().id, profile.id);
    }

    #[test]
    fn test_corrupt_documents_self_heal() {
        for raw in [
            "not json at all",
            "{\"username\": \"no id\"}",
            "{\"id\": \"\", \"createdAt\": \"2024-01-01T00:00:00Z\"}",
            "[1, 2, 3]",
        ] {
            let (store, storage) = store_with(MemoryStorage::with_entry(STORAGE_KEY, raw));
            let profile = store.load().unwrap();
            assert!(!profile.id.is_empty(), "fresh profile expected for {raw}");

            let stored = storage.read(STORAGE_KEY).unwrap().unwrap();
            assert!(stored.contains(&profile.id));
        }
    }

    #[test]
    fn test_failed_update_commits_nothing() {
        let (store, _) = store_with(MemoryStorage::new());
        let before = store.load().unwrap();

        let result = store.update(|p| {
            p.stats.total_score = 999;
            anyhow::bail!("rejected")
        });

        assert!(result.is_err());
        assert_eq!(store.load().unwrap(), before);
    }

    #[test]
    fn test_update_returns_saved_snapshot() {
        let (store, _) = store_with(MemoryStorage::new());
        let (profile, old) = store
            .update_with(|p| {
                let old = p.username.clone();
                p.username = "Rita".into();
                Ok(old)
            })
            .unwrap();

        assert_eq!(old, "Player");
        assert_eq!(profile.username, "Rita");
        assert_eq!(store.load().unwrap().username, "Rita");
    }

    #[test]
    fn test_load_repairs_achievement_total() {
        let raw = r#"{
            "id": "lx0abc",
            "createdAt": "2024-02-01T10:00:00.000Z",
            "achievements": { "unlocked": ["first_game", "movie_master"] }
        }"#;
        let (store, storage) = store_with(MemoryStorage::with_entry(STORAGE_KEY, raw));

        let profile = store.load().unwrap();
        assert_eq!(profile.achievements.total_points, 60);

        let stored: Profile =
            serde_json::from_str(&storage.read(STORAGE_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(stored.achievements.total_points, 60);
        assert_eq!(stored.version, crate::progress::models::PROFILE_VERSION);
    }

    #[test]
    fn test_reset_starts_over() {
        let (store, _) = store_with(MemoryStorage::new());
        let first = store.load().unwrap();
        store.reset().unwrap();
        assert_ne!(store.load().unwrap().id, first.id);
    }
}
