//! Persistence of learning history across sessions.
//!
//! The assistant only ever hands a whole [`LearningSnapshot`] to the
//! repository; what "a profile" maps to on disk is up to the implementation.

mod error;
mod file;
mod memory;

pub use error::{RepositoryError, Result};
pub use file::FileHistoryRepository;
pub use memory::InMemoryHistoryRepo;

use crate::learning::LearningSnapshot;

pub const MAX_PROFILE_LEN: usize = 64;

/// Profile names are used as file stems, so they are restricted to
/// `[A-Za-z0-9_-]{1,64}`.
pub fn validate_profile(profile: &str) -> Result<()> {
    let valid = !profile.is_empty()
        && profile.len() <= MAX_PROFILE_LEN
        && profile
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(RepositoryError::InvalidProfile(profile.to_string()))
    }
}

/// Stores one learning snapshot per user profile.
pub trait HistoryRepository: Send + Sync {
    /// Replace the stored snapshot for `profile`.
    fn save(&self, profile: &str, snapshot: &LearningSnapshot) -> Result<()>;

    /// Load the stored snapshot, `None` if the profile was never saved.
    fn load(&self, profile: &str) -> Result<Option<LearningSnapshot>>;

    fn exists(&self, profile: &str) -> bool {
        matches!(self.load(profile), Ok(Some(_)))
    }

    fn delete(&self, profile: &str) -> Result<()>;
}
