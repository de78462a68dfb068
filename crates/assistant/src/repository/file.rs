//! File-based history repository.

use std::fs;
use std::path::{Path, PathBuf};

use crate::learning::LearningSnapshot;
use crate::repository::{HistoryRepository, RepositoryError, Result, validate_profile};

/// Stores each profile as `learning_{profile}.bin` in bincode format.
///
/// Writes go to a temporary file first and are renamed into place, so a
/// crash mid-save leaves the previous snapshot intact.
pub struct FileHistoryRepository {
    base_dir: PathBuf,
}

impl FileHistoryRepository {
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn profile_path(&self, profile: &str) -> Result<PathBuf> {
        validate_profile(profile)?;
        Ok(self.base_dir.join(format!("learning_{profile}.bin")))
    }
}

impl HistoryRepository for FileHistoryRepository {
    fn save(&self, profile: &str, snapshot: &LearningSnapshot) -> Result<()> {
        let path = self.profile_path(profile)?;
        let temp_path = path.with_extension("bin.tmp");

        let bytes = bincode::serialize(snapshot)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, &path)?;

        tracing::debug!(
            profile,
            interactions = snapshot.history.len(),
            "saved learning history to {}",
            path.display()
        );
        Ok(())
    }

    fn load(&self, profile: &str) -> Result<Option<LearningSnapshot>> {
        let path = self.profile_path(profile)?;
        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path)?;
        let snapshot: LearningSnapshot = bincode::deserialize(&bytes)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        tracing::debug!(profile, "loaded learning history from {}", path.display());
        Ok(Some(snapshot))
    }

    fn exists(&self, profile: &str) -> bool {
        self.profile_path(profile).is_ok_and(|path| path.exists())
    }

    fn delete(&self, profile: &str) -> Result<()> {
        let path = self.profile_path(profile)?;
        if path.exists() {
            fs::remove_file(&path)?;
            tracing::debug!(profile, "deleted learning history");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{InteractionOutcome, LearningMilestone, UserInteraction};
    use tempfile::TempDir;

    fn snapshot() -> LearningSnapshot {
        LearningSnapshot {
            history: vec![UserInteraction {
                tick: 4,
                category: "setup_lighting".into(),
                query: None,
                outcome: InteractionOutcome::Answered,
            }],
            milestones: vec![LearningMilestone {
                category: "setup_lighting".into(),
                threshold: 1,
                reached_at: 4,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn survives_a_new_repository_instance() {
        let dir = TempDir::new().unwrap();
        FileHistoryRepository::new(dir.path())
            .unwrap()
            .save("default", &snapshot())
            .unwrap();

        let reopened = FileHistoryRepository::new(dir.path()).unwrap();
        assert!(reopened.exists("default"));
        assert_eq!(reopened.load("default").unwrap(), Some(snapshot()));
        assert!(!dir.path().join("learning_default.bin.tmp").exists());
    }

    #[test]
    fn missing_profile_loads_none() {
        let dir = TempDir::new().unwrap();
        let repo = FileHistoryRepository::new(dir.path()).unwrap();
        assert_eq!(repo.load("nobody").unwrap(), None);
        repo.delete("nobody").unwrap();
    }

    #[test]
    fn corrupted_file_is_a_serialization_error() {
        let dir = TempDir::new().unwrap();
        let repo = FileHistoryRepository::new(dir.path()).unwrap();
        fs::write(dir.path().join("learning_default.bin"), b"\xff\xff\xff").unwrap();

        assert!(matches!(
            repo.load("default"),
            Err(RepositoryError::Serialization(_))
        ));
    }

    #[test]
    fn unsafe_profile_names_are_rejected() {
        let dir = TempDir::new().unwrap();
        let repo = FileHistoryRepository::new(dir.path()).unwrap();

        for profile in ["../evil", "a.b", "", "with space"] {
            assert!(matches!(
                repo.save(profile, &snapshot()),
                Err(RepositoryError::InvalidProfile(_))
            ));
            assert!(!repo.exists(profile));
        }
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn similar_profiles_keep_separate_files() {
        let dir = TempDir::new().unwrap();
        let repo = FileHistoryRepository::new(dir.path()).unwrap();
        let empty = LearningSnapshot::default();

        repo.save("a_b", &snapshot()).unwrap();
        repo.save("a-b", &empty).unwrap();

        assert_eq!(repo.load("a_b").unwrap(), Some(snapshot()));
        assert_eq!(repo.load("a-b").unwrap(), Some(empty));
    }
}
