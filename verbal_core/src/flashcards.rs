//! Flashcard deck selection over synonym entries

use std::collections::HashSet;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::corpus::{Corpus, LevelFilter, SynonymEntry};
use crate::profile::Profile;
use crate::questions::QuestionType;
use crate::sampler::shuffle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeckMode {
    #[default]
    All,
    /// Words not yet marked as known
    Learning,
    /// Words in the synonym review ledger
    Review,
}

impl FromStr for DeckMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(DeckMode::All),
            "learning" => Ok(DeckMode::Learning),
            "review" => Ok(DeckMode::Review),
            other => Err(format!("Unknown deck mode: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeckOptions {
    pub level: LevelFilter,
    pub mode: DeckMode,
    /// `None` takes every matching card
    pub count: Option<usize>,
    pub shuffle: bool,
}

/// Cards for a study session. The mode filters only apply when a profile
/// is given; without one every card at the level is used.
pub fn build_deck<R: Rng + ?Sized>(
    corpus: &Corpus,
    options: &DeckOptions,
    profile: Option<&Profile>,
    rng: &mut R,
) -> Vec<SynonymEntry> {
    let mut cards: Vec<SynonymEntry> = corpus
        .synonyms_at(options.level)
        .into_iter()
        .cloned()
        .collect();

    match (options.mode, profile) {
        (DeckMode::Review, Some(profile)) => {
            let review: HashSet<String> = profile
                .review_words
                .query(options.level, Some(QuestionType::Synonym))
                .into_iter()
                .map(|e| e.word)
                .collect();
            cards.retain(|c| review.contains(&c.word));
        }
        (DeckMode::Learning, Some(profile)) => {
            cards.retain(|c| !profile.is_known(&c.word));
        }
        _ => {}
    }

    if options.shuffle {
        cards = shuffle(&cards, rng);
    }
    if let Some(count) = options.count {
        cards.truncate(count);
    }
    cards
}

/// Known / still-learning tallies for one study session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyTally {
    pub reviewed: usize,
    pub known: usize,
    pub learning: usize,
}

impl StudyTally {
    pub fn new(reviewed: usize) -> Self {
        Self { reviewed, ..Self::default() }
    }

    /// Counts only when the word was not already known
    pub fn marked_known(&mut self, was_known: bool) {
        if !was_known {
            self.known += 1;
        }
    }

    pub fn marked_learning(&mut self, was_known: bool) {
        if was_known {
            self.known = self.known.saturating_sub(1);
        }
        self.learning += 1;
    }

    /// Cards left to learn after the session
    pub fn remaining(&self) -> usize {
        self.reviewed.saturating_sub(self.known)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Level;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn corpus() -> Corpus {
        let words = ["happy", "big", "fast", "cold", "terse"];
        Corpus::new(
            words
                .iter()
                .enumerate()
                .map(|(i, w)| SynonymEntry {
                    word: w.to_string(),
                    synonym: format!("syn{}", i),
                    level: if *w == "terse" { Level::Upper } else { Level::Lower },
                })
                .collect(),
            vec![],
        )
    }

    fn options(mode: DeckMode) -> DeckOptions {
        DeckOptions { level: Level::Lower.into(), mode, count: None, shuffle: false }
    }

    #[test]
    fn learning_deck_skips_known_words() {
        let mut profile = Profile::new("Ada");
        profile.mark_known("happy");
        let mut rng = StdRng::seed_from_u64(1);
        let deck = build_deck(&corpus(), &options(DeckMode::Learning), Some(&profile), &mut rng);
        let words: Vec<&str> = deck.iter().map(|c| c.word.as_str()).collect();
        assert_eq!(words, vec!["big", "fast", "cold"]);
    }

    #[test]
    fn review_deck_uses_synonym_ledger() {
        let mut profile = Profile::new("Ada");
        profile.review_words.record_miss("fast", QuestionType::Synonym, Level::Lower, None);
        profile.review_words.record_miss(
            "cold",
            QuestionType::Sentence,
            Level::Lower,
            Some("A ____ day."),
        );
        let mut rng = StdRng::seed_from_u64(2);
        let deck = build_deck(&corpus(), &options(DeckMode::Review), Some(&profile), &mut rng);
        assert_eq!(deck.len(), 1);
        assert_eq!(deck[0].word, "fast");
    }

    #[test]
    fn without_profile_every_card_is_used() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut opts = options(DeckMode::Review);
        opts.count = Some(2);
        opts.shuffle = true;
        let deck = build_deck(&corpus(), &opts, None, &mut rng);
        assert_eq!(deck.len(), 2);
        assert!(deck.iter().all(|c| c.level == Level::Lower));
    }

    #[test]
    fn tally_tracks_known_toggles() {
        let mut tally = StudyTally::new(4);
        tally.marked_known(false);
        tally.marked_known(true);
        tally.marked_learning(true);
        tally.marked_learning(false);
        assert_eq!(tally, StudyTally { reviewed: 4, known: 0, learning: 2 });
        assert_eq!(tally.remaining(), 4);
    }
}
