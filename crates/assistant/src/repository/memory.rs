//! In-memory history repository for tests and ephemeral sessions.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::learning::LearningSnapshot;
use crate::repository::{HistoryRepository, RepositoryError, Result};

#[derive(Debug, Default)]
pub struct InMemoryHistoryRepo {
    profiles: RwLock<HashMap<String, LearningSnapshot>>,
}

impl InMemoryHistoryRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryRepository for InMemoryHistoryRepo {
    fn save(&self, profile: &str, snapshot: &LearningSnapshot) -> Result<()> {
        let mut profiles = self
            .profiles
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        profiles.insert(profile.to_string(), snapshot.clone());
        Ok(())
    }

    fn load(&self, profile: &str) -> Result<Option<LearningSnapshot>> {
        let profiles = self
            .profiles
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(profiles.get(profile).cloned())
    }

    fn exists(&self, profile: &str) -> bool {
        self.profiles
            .read()
            .map(|profiles| profiles.contains_key(profile))
            .unwrap_or(false)
    }

    fn delete(&self, profile: &str) -> Result<()> {
        let mut profiles = self
            .profiles
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        profiles.remove(profile);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{UserPreferences, Verbosity};

    #[test]
    fn profiles_are_isolated() {
        let repo = InMemoryHistoryRepo::new();
        let snapshot = LearningSnapshot {
            preferences: UserPreferences {
                verbosity: Verbosity::Brief,
                ..Default::default()
            },
            ..Default::default()
        };

        repo.save("alice", &snapshot).unwrap();
        assert!(repo.exists("alice"));
        assert!(!repo.exists("bob"));
        assert_eq!(repo.load("alice").unwrap(), Some(snapshot));
        assert_eq!(repo.load("bob").unwrap(), None);

        repo.delete("alice").unwrap();
        assert!(!repo.exists("alice"));
    }
}
