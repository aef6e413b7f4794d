//! Review ledger - missed words, miss counts and recency

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::corpus::{Level, LevelFilter};
use crate::questions::QuestionType;

/// A word the learner has missed at least once
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewEntry {
    pub word: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub level: Level,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentence: Option<String>,
    pub missed_count: u32,
    pub last_missed: DateTime<Utc>,
}

/// Every tracked `(word, type)` key appears at most once
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewLedger {
    entries: Vec<ReviewEntry>,
}

impl ReviewLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, word: &str, question_type: QuestionType) -> Option<&ReviewEntry> {
        self.entries
            .iter()
            .find(|e| e.word == word && e.question_type == question_type)
    }

    pub fn contains(&self, word: &str, question_type: QuestionType) -> bool {
        self.get(word, question_type).is_some()
    }

    pub fn record_miss(
        &mut self,
        word: &str,
        question_type: QuestionType,
        level: Level,
        sentence: Option<&str>,
    ) -> &ReviewEntry {
        self.record_miss_at(word, question_type, level, sentence, Utc::now())
    }

    /// Start tracking the key with a count of one, or bump the count and
    /// refresh `last_missed` if it is already tracked
    pub fn record_miss_at(
        &mut self,
        word: &str,
        question_type: QuestionType,
        level: Level,
        sentence: Option<&str>,
        at: DateTime<Utc>,
    ) -> &ReviewEntry {
        let index = match self
            .entries
            .iter()
            .position(|e| e.word == word && e.question_type == question_type)
        {
            Some(i) => {
                let entry = &mut self.entries[i];
                entry.missed_count += 1;
                entry.last_missed = at;
                i
            }
            None => {
                self.entries.push(ReviewEntry {
                    word: word.to_string(),
                    question_type,
                    level,
                    sentence: sentence.map(str::to_string),
                    missed_count: 1,
                    last_missed: at,
                });
                self.entries.len() - 1
            }
        };
        &self.entries[index]
    }

    /// Stop tracking the key. Returns whether anything was removed.
    pub fn record_mastery(&mut self, word: &str, question_type: QuestionType) -> bool {
        let before = self.entries.len();
        self.entries
            .retain(|e| !(e.word == word && e.question_type == question_type));
        self.entries.len() < before
    }

    /// Matching entries, most missed first, more recent miss breaking ties
    pub fn query(
        &self,
        level: LevelFilter,
        question_type: Option<QuestionType>,
    ) -> Vec<ReviewEntry> {
        let mut words: Vec<ReviewEntry> = self
            .entries
            .iter()
            .filter(|e| level.matches(e.level))
            .filter(|e| question_type.map_or(true, |t| e.question_type == t))
            .cloned()
            .collect();
        words.sort_by(|a, b| {
            b.missed_count
                .cmp(&a.missed_count)
                .then_with(|| b.last_missed.cmp(&a.last_missed))
        });
        words
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReviewEntry> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn repeated_miss_increments_single_entry() {
        let mut ledger = ReviewLedger::new();
        ledger.record_miss_at("terse", QuestionType::Synonym, Level::Upper, None, t(0));
        let entry =
            ledger.record_miss_at("terse", QuestionType::Synonym, Level::Upper, None, t(60));
        assert_eq!(entry.missed_count, 2);
        assert_eq!(entry.last_missed, t(60));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn same_word_different_type_is_separate() {
        let mut ledger = ReviewLedger::new();
        ledger.record_miss("arid", QuestionType::Synonym, Level::Upper, None);
        ledger.record_miss("arid", QuestionType::Sentence, Level::Upper, Some("An ____ land."));
        assert_eq!(ledger.len(), 2);
        assert_eq!(
            ledger.get("arid", QuestionType::Sentence).unwrap().sentence.as_deref(),
            Some("An ____ land.")
        );
    }

    #[test]
    fn mastery_removes_key() {
        let mut ledger = ReviewLedger::new();
        ledger.record_miss("terse", QuestionType::Synonym, Level::Upper, None);
        assert!(ledger.record_mastery("terse", QuestionType::Synonym));
        assert!(!ledger.contains("terse", QuestionType::Synonym));
        assert!(!ledger.record_mastery("terse", QuestionType::Synonym));
    }

    #[test]
    fn query_orders_by_count_then_recency() {
        let mut ledger = ReviewLedger::new();
        ledger.record_miss_at("one", QuestionType::Synonym, Level::Lower, None, t(500));
        for i in 0..3 {
            ledger.record_miss_at("three", QuestionType::Synonym, Level::Lower, None, t(i));
        }
        for i in 0..2 {
            ledger.record_miss_at("two-old", QuestionType::Synonym, Level::Lower, None, t(i));
        }
        for i in 0..2 {
            ledger.record_miss_at("two-new", QuestionType::Synonym, Level::Lower, None, t(100 + i));
        }
        let counts: Vec<(String, u32)> = ledger
            .query(LevelFilter::All, None)
            .into_iter()
            .map(|e| (e.word, e.missed_count))
            .collect();
        assert_eq!(
            counts,
            vec![
                ("three".to_string(), 3),
                ("two-new".to_string(), 2),
                ("two-old".to_string(), 2),
                ("one".to_string(), 1),
            ]
        );
    }

    #[test]
    fn query_filters_level_and_type() {
        let mut ledger = ReviewLedger::new();
        let now = Utc::now();
        ledger.record_miss_at("a", QuestionType::Synonym, Level::Lower, None, now);
        ledger.record_miss_at("b", QuestionType::Sentence, Level::Lower, None, now);
        let earlier = now - Duration::hours(1);
        ledger.record_miss_at("c", QuestionType::Synonym, Level::Upper, None, earlier);
        assert_eq!(ledger.query(Level::Lower.into(), None).len(), 2);
        assert_eq!(ledger.query(LevelFilter::All, Some(QuestionType::Synonym)).len(), 2);
        assert_eq!(ledger.query(Level::Upper.into(), Some(QuestionType::Sentence)).len(), 0);
    }

    #[test]
    fn serializes_like_the_stored_profile() {
        let mut ledger = ReviewLedger::new();
        ledger.record_miss_at("terse", QuestionType::Synonym, Level::Upper, None, t(0));
        let json = serde_json::to_value(&ledger).unwrap();
        assert_eq!(json[0]["type"], "synonym");
        assert_eq!(json[0]["missedCount"], 1);
        let back: ReviewLedger = serde_json::from_value(json).unwrap();
        assert_eq!(back, ledger);
    }
}
