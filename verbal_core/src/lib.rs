//! Verbal Core - question generation and spaced review for vocabulary practice
//!
//! Builds randomized multiple-choice quizzes from a synonym / sentence-completion
//! corpus, tracks the words a learner misses, and brings them back in review mode.

pub mod config;
pub mod corpus;
pub mod error;
pub mod flashcards;
pub mod import;
pub mod learner;
pub mod ledger;
pub mod profile;
pub mod questions;
pub mod quiz;
pub mod sampler;
pub mod session;
pub mod store;
pub mod timer;

#[cfg(feature = "python")]
mod python;

pub use corpus::{
    load_corpus_dir, write_corpus_dir, Corpus, CorpusLoader, CorpusSource, JsonDirSource, Level,
    LevelFilter, SentenceEntry, SynonymEntry,
};
pub use error::{Result, VerbalError};
pub use flashcards::{build_deck, DeckMode, DeckOptions, StudyTally};
pub use import::{import_sentences, import_synonyms};
pub use learner::Learner;
pub use ledger::{ReviewEntry, ReviewLedger};
pub use profile::{Profile, ProfileSummary, QuizRecord};
pub use questions::{create_sentence_question, create_synonym_question, Question, QuestionType};
pub use quiz::{assemble, assemble_from_review, Quiz, QuizConfig, TypeMix};
pub use sampler::{shuffle, take_random};
pub use session::{AnswerOutcome, QuizMode, QuizSummary, Session};
pub use store::{MemoryProfileStore, ProfileRepository, SqliteProfileStore};
pub use timer::{start_countdown, CountdownHandle, TimerUrgency};
