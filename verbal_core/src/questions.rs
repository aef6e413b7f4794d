//! MCQ question generation for synonym and sentence-completion items

use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::DISTRACTOR_COUNT;
use crate::corpus::{Level, SentenceEntry, SynonymEntry};
use crate::sampler::{shuffle, take_random};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Synonym,
    Sentence,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Synonym => "synonym",
            QuestionType::Sentence => "sentence",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "synonym" | "synonyms" => Ok(QuestionType::Synonym),
            "sentence" | "sentences" => Ok(QuestionType::Sentence),
            other => Err(format!("Unknown question type: {}", other)),
        }
    }
}

/// Multiple-choice question. Options are distinct and contain the answer.
///
/// Fields are read-only: a retry builds a new value instead of editing this one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "type")]
    question_type: QuestionType,
    prompt: String,
    correct_answer: String,
    options: Vec<String>,
    level: Level,
}

impl Question {
    pub fn question_type(&self) -> QuestionType {
        self.question_type
    }

    /// Headword for synonym questions, a sentence with a blank otherwise
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn level(&self) -> Level {
        self.level
    }

    /// The corpus headword this question was built from. This is the key the
    /// review ledger tracks.
    pub fn headword(&self) -> &str {
        match self.question_type {
            QuestionType::Synonym => &self.prompt,
            QuestionType::Sentence => &self.correct_answer,
        }
    }

    /// Position of the correct answer among the options
    pub fn correct_index(&self) -> Option<usize> {
        self.options.iter().position(|o| *o == self.correct_answer)
    }

    pub fn is_correct(&self, answer: &str) -> bool {
        answer == self.correct_answer
    }

    /// Same question with the options in a fresh order
    pub fn with_reshuffled_options<R: Rng + ?Sized>(&self, rng: &mut R) -> Question {
        Question {
            options: shuffle(&self.options, rng),
            ..self.clone()
        }
    }
}

/// Distinct candidate strings, never equal to the answer, sampled down to
/// the distractor count. Fewer come back when the pool is small.
fn pick_distractors<'a, R: Rng + ?Sized>(
    candidates: impl Iterator<Item = &'a str>,
    correct_answer: &str,
    rng: &mut R,
) -> Vec<String> {
    let mut pool: Vec<&str> = Vec::new();
    for candidate in candidates {
        if candidate != correct_answer && !pool.contains(&candidate) {
            pool.push(candidate);
        }
    }
    take_random(&pool, DISTRACTOR_COUNT, rng)
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn build_options<R: Rng + ?Sized>(
    correct_answer: &str,
    distractors: Vec<String>,
    rng: &mut R,
) -> Vec<String> {
    let mut options = Vec::with_capacity(distractors.len() + 1);
    options.push(correct_answer.to_string());
    options.extend(distractors);
    shuffle(&options, rng)
}

/// Generate a synonym question for `entry`, drawing wrong options from
/// other synonyms at the same level
pub fn create_synonym_question<R: Rng + ?Sized>(
    entry: &SynonymEntry,
    all_synonyms: &[SynonymEntry],
    rng: &mut R,
) -> Question {
    let candidates = all_synonyms
        .iter()
        .filter(|e| e.level == entry.level && e.word != entry.word && e.synonym != entry.word)
        .map(|e| e.synonym.as_str());
    let distractors = pick_distractors(candidates, &entry.synonym, rng);

    Question {
        question_type: QuestionType::Synonym,
        prompt: entry.word.clone(),
        correct_answer: entry.synonym.clone(),
        options: build_options(&entry.synonym, distractors, rng),
        level: entry.level,
    }
}

/// Generate a sentence-completion question for `entry` using one of its
/// sentences at random. `None` if the entry has no sentences.
pub fn create_sentence_question<R: Rng + ?Sized>(
    entry: &SentenceEntry,
    all_sentences: &[SentenceEntry],
    rng: &mut R,
) -> Option<Question> {
    let candidates = all_sentences
        .iter()
        .filter(|e| e.level == entry.level && e.word != entry.word)
        .map(|e| e.word.as_str());
    let distractors = pick_distractors(candidates, &entry.word, rng);
    let options = build_options(&entry.word, distractors, rng);
    let sentence = entry.sentences.choose(rng)?.clone();

    Some(Question {
        question_type: QuestionType::Sentence,
        prompt: sentence,
        correct_answer: entry.word.clone(),
        options,
        level: entry.level,
    })
}
