//! Engine constants

/// Wrong options drawn for every question.
pub const DISTRACTOR_COUNT: usize = 3;

/// Quiz results kept in a profile's history, newest first.
pub const QUIZ_HISTORY_LIMIT: usize = 50;

/// Quizzes counted towards "recent accuracy".
pub const RECENT_QUIZ_WINDOW: usize = 5;

pub const TIMER_WARNING_SECS: u32 = 10;
pub const TIMER_DANGER_SECS: u32 = 5;

pub const SYNONYMS_FILE: &str = "synonyms.json";
pub const SENTENCES_FILE: &str = "sentences.json";

/// Shown in place of a selected answer when the countdown runs out.
pub const TIME_EXPIRED_ANSWER: &str = "(time expired)";
