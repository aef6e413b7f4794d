//! Quiz-taking session: current question, score, and the answer/timeout race

use std::time::{Duration, Instant};

use rand::Rng;
use serde::Serialize;

use crate::config::TIME_EXPIRED_ANSWER;
use crate::error::Result;
use crate::learner::Learner;
use crate::questions::{Question, QuestionType};
use crate::quiz::{reshuffle, Quiz, QuizConfig};
use crate::store::ProfileRepository;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizMode {
    Practice,
    Review,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissedQuestion {
    pub question: Question,
    pub selected_answer: String,
}

/// Result of resolving one question
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOutcome {
    pub question_index: usize,
    pub is_correct: bool,
    pub timed_out: bool,
    pub correct_answer: String,
    pub is_last: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSummary {
    pub score: u32,
    pub total: u32,
    pub percent: u32,
    /// Seconds spent answering, only for timed quizzes
    pub time_used: Option<u64>,
    pub missed: Vec<MissedQuestion>,
}

pub struct Session {
    config: QuizConfig,
    mode: QuizMode,
    timer_seconds: Option<u32>,
    quiz: Quiz,
    index: usize,
    score: u32,
    missed: Vec<MissedQuestion>,
    resolved: bool,
    abandoned: bool,
    question_started: Instant,
    time_used: Duration,
}

impl Session {
    /// `None` for an empty quiz: nothing to take
    pub fn start(
        quiz: Quiz,
        config: QuizConfig,
        mode: QuizMode,
        timer_seconds: Option<u32>,
    ) -> Option<Self> {
        if quiz.is_empty() {
            log::debug!("Not starting a {:?} session with no questions", mode);
            return None;
        }
        Some(Self {
            config,
            mode,
            timer_seconds,
            quiz,
            index: 0,
            score: 0,
            missed: Vec::new(),
            resolved: false,
            abandoned: false,
            question_started: Instant::now(),
            time_used: Duration::ZERO,
        })
    }

    pub fn mode(&self) -> QuizMode {
        self.mode
    }

    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    pub fn quiz(&self) -> &[Question] {
        &self.quiz
    }

    /// Seconds per question when the quiz is timed
    pub fn timer_seconds(&self) -> Option<u32> {
        self.timer_seconds
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.quiz.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quiz.is_empty()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn missed(&self) -> &[MissedQuestion] {
        &self.missed
    }

    /// Progress through the quiz as a percentage of questions passed
    pub fn progress_percent(&self) -> f64 {
        (self.index as f64 / self.quiz.len() as f64) * 100.0
    }

    /// The question being asked, or `None` once the session is over
    pub fn current(&self) -> Option<&Question> {
        if self.abandoned {
            return None;
        }
        self.quiz.get(self.index)
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    pub fn is_over(&self) -> bool {
        self.abandoned || self.index >= self.quiz.len()
    }

    fn resolve(&mut self) -> Option<(usize, Question)> {
        if self.resolved || self.is_over() {
            return None;
        }
        self.resolved = true;
        self.time_used += self.question_started.elapsed();
        Some((self.index, self.quiz[self.index].clone()))
    }

    fn outcome(
        &self,
        index: usize,
        question: &Question,
        is_correct: bool,
        timed_out: bool,
    ) -> AnswerOutcome {
        AnswerOutcome {
            question_index: index,
            is_correct,
            timed_out,
            correct_answer: question.correct_answer().to_string(),
            is_last: index + 1 == self.quiz.len(),
        }
    }

    fn record_miss<S: ProfileRepository>(
        &mut self,
        question: Question,
        selected: &str,
        learner: &Learner<S>,
    ) -> Result<()> {
        let sentence = match question.question_type() {
            QuestionType::Sentence => Some(question.prompt().to_string()),
            QuestionType::Synonym => None,
        };
        let (word, question_type, level) =
            (question.headword().to_string(), question.question_type(), question.level());
        // the session keeps the miss even if the store update fails
        self.missed.push(MissedQuestion {
            question,
            selected_answer: selected.to_string(),
        });
        learner.record_miss(&word, question_type, level, sentence.as_deref())?;
        Ok(())
    }

    /// The learner picked an option. Returns `None` when the question was
    /// already resolved (by a timeout or an earlier answer) or the session
    /// has ended; nothing is recorded in that case.
    ///
    /// Score and missed list are updated before the profile. A store error
    /// is returned but the question stays resolved and counted.
    pub fn answer<S: ProfileRepository>(
        &mut self,
        selected: &str,
        learner: &Learner<S>,
    ) -> Result<Option<AnswerOutcome>> {
        let Some((index, question)) = self.resolve() else {
            return Ok(None);
        };
        let is_correct = question.is_correct(selected);
        let outcome = self.outcome(index, &question, is_correct, false);

        if is_correct {
            self.score += 1;
            // only review mode clears a word from the ledger
            if self.mode == QuizMode::Review {
                learner.record_mastery(question.headword(), question.question_type())?;
            }
        } else {
            self.record_miss(question, selected, learner)?;
        }
        Ok(Some(outcome))
    }

    /// The countdown ran out. Same exclusivity rules as [`Session::answer`].
    pub fn time_out<S: ProfileRepository>(
        &mut self,
        learner: &Learner<S>,
    ) -> Result<Option<AnswerOutcome>> {
        let Some((index, question)) = self.resolve() else {
            return Ok(None);
        };
        let outcome = self.outcome(index, &question, false, true);
        self.record_miss(question, TIME_EXPIRED_ANSWER, learner)?;
        Ok(Some(outcome))
    }

    /// Move to the next question; `None` when the quiz is complete
    pub fn advance(&mut self) -> Option<&Question> {
        if self.is_over() {
            return None;
        }
        self.index += 1;
        self.resolved = false;
        self.question_started = Instant::now();
        self.current()
    }

    /// Stop early. Pending answers and timeouts are ignored from now on.
    pub fn abandon(&mut self) {
        self.abandoned = true;
    }

    /// Record the result on the learner's profile and summarize. An
    /// abandoned session is summarized but leaves no quiz result behind.
    pub fn finish<S: ProfileRepository>(self, learner: &Learner<S>) -> Result<QuizSummary> {
        let total = self.quiz.len() as u32;
        let time_used = self.timer_seconds.map(|_| self.time_used.as_secs());
        if self.abandoned {
            log::debug!("Session abandoned at question {} of {}", self.index + 1, total);
        } else {
            let config = self.config;
            learner.record_quiz_result(self.score, total, config.level, config.mix, time_used)?;
        }

        Ok(QuizSummary {
            score: self.score,
            total,
            percent: ((self.score as f64 / total as f64) * 100.0).round() as u32,
            time_used,
            missed: self.missed,
        })
    }

    /// A fresh session over the same questions, reshuffled
    pub fn retry<R: Rng + ?Sized>(&self, rng: &mut R) -> Session {
        Session {
            config: self.config,
            mode: self.mode,
            timer_seconds: self.timer_seconds,
            quiz: reshuffle(&self.quiz, rng),
            index: 0,
            score: 0,
            missed: Vec::new(),
            resolved: false,
            abandoned: false,
            question_started: Instant::now(),
            time_used: Duration::ZERO,
        }
    }
}
