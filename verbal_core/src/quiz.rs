//! Quiz assembly from the corpus (practice) or the review ledger (review)

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::corpus::{Corpus, LevelFilter};
use crate::ledger::ReviewLedger;
use crate::questions::{create_sentence_question, create_synonym_question, Question, QuestionType};
use crate::sampler::{shuffle, take_random};

/// An ordered list of questions. May be shorter than requested.
pub type Quiz = Vec<Question>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TypeMix {
    #[serde(rename = "synonyms")]
    SynonymsOnly,
    #[serde(rename = "sentences")]
    SentencesOnly,
    #[default]
    #[serde(rename = "mixed")]
    Mixed,
}

impl TypeMix {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeMix::SynonymsOnly => "synonyms",
            TypeMix::SentencesOnly => "sentences",
            TypeMix::Mixed => "mixed",
        }
    }

    /// The single question type this mix is limited to, if any
    pub fn only_type(&self) -> Option<QuestionType> {
        match self {
            TypeMix::SynonymsOnly => Some(QuestionType::Synonym),
            TypeMix::SentencesOnly => Some(QuestionType::Sentence),
            TypeMix::Mixed => None,
        }
    }
}

impl fmt::Display for TypeMix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeMix {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "synonyms" | "synonym" => Ok(TypeMix::SynonymsOnly),
            "sentences" | "sentence" => Ok(TypeMix::SentencesOnly),
            "mixed" | "all" => Ok(TypeMix::Mixed),
            other => Err(format!("Unknown question mix: {}", other)),
        }
    }
}

impl From<QuestionType> for TypeMix {
    fn from(t: QuestionType) -> Self {
        match t {
            QuestionType::Synonym => TypeMix::SynonymsOnly,
            QuestionType::Sentence => TypeMix::SentencesOnly,
        }
    }
}

/// What the learner asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizConfig {
    pub level: LevelFilter,
    #[serde(rename = "questionType")]
    pub mix: TypeMix,
    #[serde(rename = "questionCount")]
    pub count: usize,
}

impl QuizConfig {
    pub fn new(level: impl Into<LevelFilter>, mix: TypeMix, count: usize) -> Self {
        Self { level: level.into(), mix, count }
    }
}

fn split_count(mix: TypeMix, count: usize) -> (usize, usize) {
    match mix {
        TypeMix::SynonymsOnly => (count, 0),
        TypeMix::SentencesOnly => (0, count),
        TypeMix::Mixed => (count.div_ceil(2), count / 2),
    }
}

/// Build a practice quiz from the corpus. Returns fewer questions (possibly
/// none) when the level does not hold enough entries.
pub fn assemble<R: Rng + ?Sized>(corpus: &Corpus, config: &QuizConfig, rng: &mut R) -> Quiz {
    let (synonym_count, sentence_count) = split_count(config.mix, config.count);
    let mut questions = Vec::new();

    if synonym_count > 0 {
        let picked = take_random(&corpus.synonyms_at(config.level), synonym_count, rng);
        for entry in picked {
            questions.push(create_synonym_question(entry, corpus.synonyms(), rng));
        }
    }

    if sentence_count > 0 {
        let picked = take_random(&corpus.sentences_at(config.level), sentence_count, rng);
        for entry in picked {
            questions.extend(create_sentence_question(entry, corpus.sentences(), rng));
        }
    }

    let mut quiz = shuffle(&questions, rng);
    quiz.truncate(config.count);

    if quiz.len() < config.count {
        log::debug!(
            "Quiz for level={} mix={} has {} of {} requested questions",
            String::from(config.level),
            config.mix,
            quiz.len(),
            config.count
        );
    }
    quiz
}

/// Review questions in priority order: most missed first. Ledger words that
/// are no longer in the corpus are skipped.
pub fn review_questions<R: Rng + ?Sized>(
    corpus: &Corpus,
    ledger: &ReviewLedger,
    config: &QuizConfig,
    rng: &mut R,
) -> Quiz {
    let mut questions = Vec::new();

    for review in ledger.query(config.level, config.mix.only_type()) {
        if questions.len() >= config.count {
            break;
        }
        let question = match review.question_type {
            QuestionType::Synonym => corpus
                .find_synonym(&review.word)
                .map(|entry| create_synonym_question(entry, corpus.synonyms(), rng)),
            QuestionType::Sentence => corpus
                .find_sentence(&review.word)
                .and_then(|entry| create_sentence_question(entry, corpus.sentences(), rng)),
        };
        match question {
            Some(q) => questions.push(q),
            None => log::debug!(
                "Skipping review word '{}' ({}): not in corpus",
                review.word,
                review.question_type
            ),
        }
    }
    questions
}

/// Build a review-mode quiz. The priority order is shuffled away before the
/// learner sees it.
pub fn assemble_from_review<R: Rng + ?Sized>(
    corpus: &Corpus,
    ledger: &ReviewLedger,
    config: &QuizConfig,
    rng: &mut R,
) -> Quiz {
    let questions = review_questions(corpus, ledger, config, rng);
    shuffle(&questions, rng)
}

/// A fresh quiz over the same questions: new question order, new option order.
pub fn reshuffle<R: Rng + ?Sized>(quiz: &[Question], rng: &mut R) -> Quiz {
    shuffle(quiz, rng)
        .iter()
        .map(|q| q.with_reshuffled_options(rng))
        .collect()
}
