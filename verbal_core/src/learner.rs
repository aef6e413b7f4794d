//! The active learner: routes review, flashcard and stats updates to the
//! profile store. With no active profile every operation is a no-op.

use crate::corpus::{Level, LevelFilter};
use crate::error::{Result, VerbalError};
use crate::ledger::ReviewEntry;
use crate::profile::{Profile, ProfileSummary};
use crate::questions::QuestionType;
use crate::quiz::TypeMix;
use crate::store::ProfileRepository;

pub struct Learner<S: ProfileRepository> {
    store: S,
    active: Option<String>,
}

impl<S: ProfileRepository> Learner<S> {
    /// No active profile; review features are unavailable
    pub fn anonymous(store: S) -> Self {
        Self { store, active: None }
    }

    pub fn new(store: S, profile_id: impl Into<String>) -> Self {
        Self { store, active: Some(profile_id.into()) }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn set_active(&mut self, profile_id: Option<String>) {
        self.active = profile_id;
    }

    /// Create a profile and make it the active one
    pub fn create_profile(&mut self, name: &str) -> Result<Profile> {
        let profile = self.store.create(name)?;
        self.active = Some(profile.id.clone());
        Ok(profile)
    }

    /// Delete a profile, clearing it if it was active
    pub fn delete_profile(&mut self, profile_id: &str) -> Result<bool> {
        let deleted = self.store.delete(profile_id)?;
        if self.active.as_deref() == Some(profile_id) {
            self.active = None;
        }
        Ok(deleted)
    }

    /// The active profile, if there is one and it still exists
    pub fn profile(&self) -> Result<Option<Profile>> {
        match &self.active {
            Some(id) => self.store.load(id),
            None => Ok(None),
        }
    }

    fn update(&self, mut mutate: impl FnMut(&mut Profile)) -> Result<Option<Profile>> {
        let Some(id) = &self.active else {
            return Ok(None);
        };
        match self.store.update(id, &mut mutate) {
            Ok(profile) => Ok(Some(profile)),
            // a profile deleted elsewhere behaves like no profile at all
            Err(VerbalError::ProfileNotFound(_)) => {
                log::warn!("Active profile {} no longer exists", id);
                Ok(None)
            }
            Err(e) => {
                log::error!("Failed to update profile {}: {}", id, e);
                Err(e)
            }
        }
    }

    pub fn record_miss(
        &self,
        word: &str,
        question_type: QuestionType,
        level: Level,
        sentence: Option<&str>,
    ) -> Result<Option<Profile>> {
        self.update(|p| {
            p.review_words.record_miss(word, question_type, level, sentence);
        })
    }

    pub fn record_mastery(
        &self,
        word: &str,
        question_type: QuestionType,
    ) -> Result<Option<Profile>> {
        self.update(|p| {
            p.review_words.record_mastery(word, question_type);
        })
    }

    /// Review words, most missed first. Empty without a profile.
    pub fn review_words(
        &self,
        level: LevelFilter,
        question_type: Option<QuestionType>,
    ) -> Result<Vec<ReviewEntry>> {
        Ok(self
            .profile()?
            .map(|p| p.review_words.query(level, question_type))
            .unwrap_or_default())
    }

    pub fn record_quiz_result(
        &self,
        score: u32,
        total: u32,
        level: LevelFilter,
        mix: TypeMix,
        time_used: Option<u64>,
    ) -> Result<Option<Profile>> {
        self.update(|p| p.record_quiz_result(score, total, level, mix, time_used))
    }

    pub fn mark_known(&self, word: &str) -> Result<Option<Profile>> {
        self.update(|p| p.mark_known(word))
    }

    pub fn unmark_known(&self, word: &str) -> Result<Option<Profile>> {
        self.update(|p| p.unmark_known(word))
    }

    pub fn is_known(&self, word: &str) -> Result<bool> {
        Ok(self.profile()?.is_some_and(|p| p.is_known(word)))
    }

    pub fn summary(&self) -> Result<Option<ProfileSummary>> {
        Ok(self.profile()?.map(|p| p.summary()))
    }
}
