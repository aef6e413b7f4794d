//! Learner profile: quiz statistics, review ledger and flashcard progress

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{QUIZ_HISTORY_LIMIT, RECENT_QUIZ_WINDOW};
use crate::corpus::LevelFilter;
use crate::ledger::ReviewLedger;
use crate::quiz::TypeMix;

/// One finished quiz
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizRecord {
    pub date: DateTime<Utc>,
    pub level: LevelFilter,
    #[serde(rename = "type")]
    pub mix: TypeMix,
    pub score: u32,
    pub total: u32,
    /// Seconds, only when the quiz was timed
    pub time_used: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizStats {
    pub total_quizzes: u32,
    pub total_questions: u32,
    pub total_correct: u32,
    /// Newest first
    pub quiz_history: Vec<QuizRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashcardProgress {
    pub known: Vec<String>,
    pub last_studied: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub stats: QuizStats,
    #[serde(default)]
    pub review_words: ReviewLedger,
    #[serde(default)]
    pub flashcard_progress: FlashcardProgress,
}

/// Read-only view of a profile's progress
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
    pub total_quizzes: u32,
    pub total_questions: u32,
    pub total_correct: u32,
    pub accuracy: u32,
    pub recent_accuracy: u32,
    pub words_to_review: usize,
    pub quiz_history: Vec<QuizRecord>,
    pub member_since: DateTime<Utc>,
}

fn generate_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let salt: u32 = rand::thread_rng().gen();
    format!("{:x}{:08x}", millis, salt)
}

fn percent(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        0
    } else {
        ((part as f64 / whole as f64) * 100.0).round() as u32
    }
}

impl Profile {
    pub fn new(name: &str) -> Self {
        Self {
            id: generate_id(),
            name: name.trim().to_string(),
            created_at: Utc::now(),
            stats: QuizStats::default(),
            review_words: ReviewLedger::new(),
            flashcard_progress: FlashcardProgress::default(),
        }
    }

    pub fn record_quiz_result(
        &mut self,
        score: u32,
        total: u32,
        level: LevelFilter,
        mix: TypeMix,
        time_used: Option<u64>,
    ) {
        let record = QuizRecord {
            date: Utc::now(),
            level,
            mix,
            score,
            total,
            time_used,
        };
        let stats = &mut self.stats;
        stats.total_quizzes += 1;
        stats.total_questions += total;
        stats.total_correct += score;
        stats.quiz_history.insert(0, record);
        stats.quiz_history.truncate(QUIZ_HISTORY_LIMIT);
    }

    /// Add to the known set; refreshes `last_studied` either way
    pub fn mark_known(&mut self, word: &str) {
        let progress = &mut self.flashcard_progress;
        if !progress.known.iter().any(|w| w == word) {
            progress.known.push(word.to_string());
        }
        progress.last_studied = Some(Utc::now());
    }

    pub fn unmark_known(&mut self, word: &str) {
        self.flashcard_progress.known.retain(|w| w != word);
    }

    pub fn is_known(&self, word: &str) -> bool {
        self.flashcard_progress.known.iter().any(|w| w == word)
    }

    pub fn summary(&self) -> ProfileSummary {
        let stats = &self.stats;
        let recent = &stats.quiz_history[..stats.quiz_history.len().min(RECENT_QUIZ_WINDOW)];
        let recent_score: u32 = recent.iter().map(|q| q.score).sum();
        let recent_total: u32 = recent.iter().map(|q| q.total).sum();

        ProfileSummary {
            total_quizzes: stats.total_quizzes,
            total_questions: stats.total_questions,
            total_correct: stats.total_correct,
            accuracy: percent(stats.total_correct, stats.total_questions),
            recent_accuracy: percent(recent_score, recent_total),
            words_to_review: self.review_words.len(),
            quiz_history: stats.quiz_history.clone(),
            member_since: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_is_newest_first_and_capped() {
        let mut profile = Profile::new("  Ada ");
        assert_eq!(profile.name, "Ada");
        for i in 0..60 {
            profile.record_quiz_result(i % 10, 10, LevelFilter::All, TypeMix::Mixed, None);
        }
        assert_eq!(profile.stats.total_quizzes, 60);
        assert_eq!(profile.stats.total_questions, 600);
        assert_eq!(profile.stats.quiz_history.len(), QUIZ_HISTORY_LIMIT);
        assert_eq!(profile.stats.quiz_history[0].score, 9);
    }

    #[test]
    fn summary_accuracies() {
        let mut profile = Profile::new("Ada");
        assert_eq!(profile.summary().accuracy, 0);
        // oldest: 0/10, then five quizzes of 8/10
        profile.record_quiz_result(0, 10, LevelFilter::All, TypeMix::SynonymsOnly, None);
        for _ in 0..5 {
            profile.record_quiz_result(8, 10, LevelFilter::All, TypeMix::SynonymsOnly, Some(42));
        }
        let summary = profile.summary();
        assert_eq!(summary.accuracy, 67);
        assert_eq!(summary.recent_accuracy, 80);
        assert_eq!(summary.total_quizzes, 6);
    }

    #[test]
    fn known_words_toggle() {
        let mut profile = Profile::new("Ada");
        profile.mark_known("happy");
        profile.mark_known("happy");
        assert_eq!(profile.flashcard_progress.known, vec!["happy".to_string()]);
        assert!(profile.flashcard_progress.last_studied.is_some());
        profile.unmark_known("happy");
        assert!(!profile.is_known("happy"));
    }

    #[test]
    fn json_document_round_trips() {
        let mut profile = Profile::new("Ada");
        profile.record_quiz_result(3, 4, LevelFilter::All, TypeMix::Mixed, None);
        let json = serde_json::to_string(&profile).unwrap();
        assert!(json.contains("\"reviewWords\""));
        let back: Profile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, profile);
    }
}
