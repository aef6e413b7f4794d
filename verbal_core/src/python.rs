//! Python bindings (enabled with the `python` feature)

use std::path::PathBuf;
use std::str::FromStr;

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use crate::corpus::{load_corpus_dir, Level, LevelFilter};
use crate::error::VerbalError;
use crate::ledger::ReviewEntry;
use crate::learner::Learner;
use crate::profile::ProfileSummary;
use crate::questions::{Question, QuestionType};
use crate::quiz::{assemble, assemble_from_review, QuizConfig, TypeMix};
use crate::store::{ProfileRepository, SqliteProfileStore};

fn runtime_err(e: VerbalError) -> PyErr {
    PyRuntimeError::new_err(e.to_string())
}

fn parse<T: FromStr<Err = String>>(value: &str) -> PyResult<T> {
    value.parse().map_err(PyValueError::new_err)
}

fn quiz_config(level: &str, question_type: &str, count: usize) -> PyResult<QuizConfig> {
    Ok(QuizConfig::new(parse::<LevelFilter>(level)?, parse::<TypeMix>(question_type)?, count))
}

fn learner(db_path: &str, profile_id: Option<String>) -> PyResult<Learner<SqliteProfileStore>> {
    let store = SqliteProfileStore::open(db_path).map_err(runtime_err)?;
    Ok(match profile_id {
        Some(id) => Learner::new(store, id),
        None => Learner::anonymous(store),
    })
}

/// MCQ question as seen from Python
#[pyclass(name = "Question")]
#[derive(Debug, Clone)]
pub struct PyQuestion {
    #[pyo3(get)]
    pub question_type: String,
    #[pyo3(get)]
    pub prompt: String,
    #[pyo3(get)]
    pub correct_answer: String,
    #[pyo3(get)]
    pub options: Vec<String>,
    #[pyo3(get)]
    pub correct_index: Option<usize>,
    #[pyo3(get)]
    pub level: String,
}

#[pymethods]
impl PyQuestion {
    fn __repr__(&self) -> String {
        format!(
            "Question(type='{}', prompt='{}...')",
            self.question_type,
            self.prompt.chars().take(40).collect::<String>()
        )
    }
}

impl From<&Question> for PyQuestion {
    fn from(q: &Question) -> Self {
        Self {
            question_type: q.question_type().to_string(),
            prompt: q.prompt().to_string(),
            correct_answer: q.correct_answer().to_string(),
            options: q.options().to_vec(),
            correct_index: q.correct_index(),
            level: q.level().to_string(),
        }
    }
}

#[pyclass(name = "ReviewWord")]
#[derive(Debug, Clone)]
pub struct PyReviewWord {
    #[pyo3(get)]
    pub word: String,
    #[pyo3(get)]
    pub question_type: String,
    #[pyo3(get)]
    pub level: String,
    #[pyo3(get)]
    pub sentence: Option<String>,
    #[pyo3(get)]
    pub missed_count: u32,
    #[pyo3(get)]
    pub last_missed: String,
}

#[pymethods]
impl PyReviewWord {
    fn __repr__(&self) -> String {
        format!(
            "ReviewWord(word='{}', type='{}', missed={})",
            self.word, self.question_type, self.missed_count
        )
    }
}

impl From<ReviewEntry> for PyReviewWord {
    fn from(e: ReviewEntry) -> Self {
        Self {
            word: e.word,
            question_type: e.question_type.to_string(),
            level: e.level.to_string(),
            sentence: e.sentence,
            missed_count: e.missed_count,
            last_missed: e.last_missed.to_rfc3339(),
        }
    }
}

#[pyclass(name = "ProfileSummary")]
#[derive(Debug, Clone)]
pub struct PyProfileSummary {
    #[pyo3(get)]
    pub total_quizzes: u32,
    #[pyo3(get)]
    pub total_questions: u32,
    #[pyo3(get)]
    pub total_correct: u32,
    #[pyo3(get)]
    pub accuracy: u32,
    #[pyo3(get)]
    pub recent_accuracy: u32,
    #[pyo3(get)]
    pub words_to_review: usize,
    #[pyo3(get)]
    pub member_since: String,
}

#[pymethods]
impl PyProfileSummary {
    fn __repr__(&self) -> String {
        format!(
            "ProfileSummary(quizzes={}, accuracy={}%, review={})",
            self.total_quizzes, self.accuracy, self.words_to_review
        )
    }
}

impl From<ProfileSummary> for PyProfileSummary {
    fn from(s: ProfileSummary) -> Self {
        Self {
            total_quizzes: s.total_quizzes,
            total_questions: s.total_questions,
            total_correct: s.total_correct,
            accuracy: s.accuracy,
            recent_accuracy: s.recent_accuracy,
            words_to_review: s.words_to_review,
            member_since: s.member_since.to_rfc3339(),
        }
    }
}

#[pyfunction]
pub fn generate_quiz(
    corpus_dir: PathBuf,
    level: &str,
    question_type: &str,
    count: usize,
) -> PyResult<Vec<PyQuestion>> {
    let corpus = load_corpus_dir(corpus_dir).map_err(runtime_err)?;
    let config = quiz_config(level, question_type, count)?;
    let quiz = assemble(&corpus, &config, &mut rand::thread_rng());
    Ok(quiz.iter().map(PyQuestion::from).collect())
}

#[pyfunction]
#[pyo3(signature = (corpus_dir, db_path, profile_id, level, question_type, count))]
pub fn generate_review_quiz(
    corpus_dir: PathBuf,
    db_path: &str,
    profile_id: Option<String>,
    level: &str,
    question_type: &str,
    count: usize,
) -> PyResult<Vec<PyQuestion>> {
    let corpus = load_corpus_dir(corpus_dir).map_err(runtime_err)?;
    let config = quiz_config(level, question_type, count)?;
    let Some(profile) = learner(db_path, profile_id)?.profile().map_err(runtime_err)? else {
        return Ok(Vec::new());
    };
    let mut rng = rand::thread_rng();
    let quiz = assemble_from_review(&corpus, &profile.review_words, &config, &mut rng);
    Ok(quiz.iter().map(PyQuestion::from).collect())
}

/// Create a profile and return its id
#[pyfunction]
pub fn create_profile(db_path: &str, name: &str) -> PyResult<String> {
    let store = SqliteProfileStore::open(db_path).map_err(runtime_err)?;
    store.create(name).map(|p| p.id).map_err(runtime_err)
}

#[pyfunction]
#[pyo3(signature = (db_path, profile_id, word, question_type, level, sentence=None))]
pub fn record_miss(
    db_path: &str,
    profile_id: Option<String>,
    word: &str,
    question_type: &str,
    level: &str,
    sentence: Option<&str>,
) -> PyResult<bool> {
    let question_type = parse::<QuestionType>(question_type)?;
    let level = parse::<Level>(level)?;
    learner(db_path, profile_id)?
        .record_miss(word, question_type, level, sentence)
        .map(|p| p.is_some())
        .map_err(runtime_err)
}

#[pyfunction]
#[pyo3(signature = (db_path, profile_id, word, question_type))]
pub fn record_mastery(
    db_path: &str,
    profile_id: Option<String>,
    word: &str,
    question_type: &str,
) -> PyResult<bool> {
    let question_type = parse::<QuestionType>(question_type)?;
    learner(db_path, profile_id)?
        .record_mastery(word, question_type)
        .map(|p| p.is_some())
        .map_err(runtime_err)
}

#[pyfunction]
#[pyo3(signature = (db_path, profile_id, level="all", question_type="mixed"))]
pub fn get_review_words(
    db_path: &str,
    profile_id: Option<String>,
    level: &str,
    question_type: &str,
) -> PyResult<Vec<PyReviewWord>> {
    let level = parse::<LevelFilter>(level)?;
    let mix = parse::<TypeMix>(question_type)?;
    let words = learner(db_path, profile_id)?
        .review_words(level, mix.only_type())
        .map_err(runtime_err)?;
    Ok(words.into_iter().map(PyReviewWord::from).collect())
}

#[pyfunction]
#[pyo3(signature = (db_path, profile_id, score, total, level, question_type, time_used=None))]
pub fn record_quiz_result(
    db_path: &str,
    profile_id: Option<String>,
    score: u32,
    total: u32,
    level: &str,
    question_type: &str,
    time_used: Option<u64>,
) -> PyResult<bool> {
    let level = parse::<LevelFilter>(level)?;
    let mix = parse::<TypeMix>(question_type)?;
    learner(db_path, profile_id)?
        .record_quiz_result(score, total, level, mix, time_used)
        .map(|p| p.is_some())
        .map_err(runtime_err)
}

#[pyfunction]
#[pyo3(signature = (db_path, profile_id))]
pub fn get_profile_summary(
    db_path: &str,
    profile_id: Option<String>,
) -> PyResult<Option<PyProfileSummary>> {
    let summary = learner(db_path, profile_id)?.summary().map_err(runtime_err)?;
    Ok(summary.map(PyProfileSummary::from))
}

/// Verbal practice core Python module
#[pymodule]
fn verbal_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Quiz generation
    m.add_function(wrap_pyfunction!(generate_quiz, m)?)?;
    m.add_function(wrap_pyfunction!(generate_review_quiz, m)?)?;

    // Profiles and review ledger
    m.add_function(wrap_pyfunction!(create_profile, m)?)?;
    m.add_function(wrap_pyfunction!(record_miss, m)?)?;
    m.add_function(wrap_pyfunction!(record_mastery, m)?)?;
    m.add_function(wrap_pyfunction!(get_review_words, m)?)?;
    m.add_function(wrap_pyfunction!(record_quiz_result, m)?)?;
    m.add_function(wrap_pyfunction!(get_profile_summary, m)?)?;

    m.add_class::<PyQuestion>()?;
    m.add_class::<PyReviewWord>()?;
    m.add_class::<PyProfileSummary>()?;

    Ok(())
}
