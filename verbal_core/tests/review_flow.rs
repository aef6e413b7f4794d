use std::sync::mpsc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use verbal_core::corpus::write_corpus_dir;
use verbal_core::{
    assemble, assemble_from_review, load_corpus_dir, start_countdown, Corpus, Learner, Level,
    LevelFilter, QuestionType, QuizConfig, QuizMode, SentenceEntry, Session, SqliteProfileStore,
    SynonymEntry, TypeMix, VerbalError,
};

fn corpus() -> Corpus {
    let synonyms = [
        ("happy", "joyful"),
        ("big", "large"),
        ("fast", "quick"),
        ("cold", "chilly"),
        ("smart", "clever"),
        ("tired", "weary"),
    ]
    .iter()
    .map(|(w, s)| SynonymEntry { word: w.to_string(), synonym: s.to_string(), level: Level::Lower })
    .collect();
    let sentences = ["brave", "calm", "eager", "fond", "glad"]
        .iter()
        .map(|w| SentenceEntry {
            word: w.to_string(),
            level: Level::Lower,
            sentences: vec![
                format!("The ____ one ({}).", w),
                format!("A ____ moment ({}).", w),
            ],
        })
        .collect();
    Corpus::new(synonyms, sentences)
}

#[test]
fn corpus_directory_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    write_corpus_dir(dir.path(), &corpus()).unwrap();
    let loaded = load_corpus_dir(dir.path()).unwrap();
    assert_eq!(loaded.synonyms().len(), 6);
    assert_eq!(loaded.sentences().len(), 5);
    assert_eq!(loaded.find_synonym("happy").unwrap().synonym, "joyful");
}

#[test]
fn missing_corpus_is_data_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_corpus_dir(dir.path());
    assert!(matches!(result, Err(VerbalError::DataUnavailable(_))));
}

#[test]
fn missed_words_come_back_in_review_until_answered() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteProfileStore::open(dir.path().join("profiles.db")).unwrap();
    let mut learner = Learner::anonymous(store);
    learner.create_profile("Ada").unwrap();

    let corpus = corpus();
    let mut rng = StdRng::seed_from_u64(21);

    // practice: miss every question
    let config = QuizConfig::new(Level::Lower, TypeMix::Mixed, 4);
    let quiz = assemble(&corpus, &config, &mut rng);
    assert_eq!(quiz.len(), 4);
    let mut session = Session::start(quiz, config, QuizMode::Practice, None).unwrap();
    while let Some(q) = session.current() {
        let wrong = q.options().iter().find(|o| !q.is_correct(o)).unwrap().clone();
        session.answer(&wrong, &learner).unwrap();
        session.advance();
    }
    let summary = session.finish(&learner).unwrap();
    assert_eq!(summary.score, 0);
    assert!(summary.time_used.is_none());

    let review = learner.review_words(LevelFilter::All, None).unwrap();
    assert_eq!(review.len(), 4);
    let sentence_misses = review
        .iter()
        .filter(|e| e.question_type == QuestionType::Sentence)
        .count();
    assert_eq!(sentence_misses, 2);
    assert!(review
        .iter()
        .filter(|e| e.question_type == QuestionType::Sentence)
        .all(|e| e.sentence.as_deref().is_some_and(|s| s.contains("____"))));

    // review: answer everything correctly, ledger empties
    let profile = learner.profile().unwrap().unwrap();
    let config = QuizConfig::new(LevelFilter::All, TypeMix::Mixed, 10);
    let quiz = assemble_from_review(&corpus, &profile.review_words, &config, &mut rng);
    assert_eq!(quiz.len(), 4);
    let mut session = Session::start(quiz, config, QuizMode::Review, None).unwrap();
    while let Some(q) = session.current() {
        let answer = q.correct_answer().to_string();
        session.answer(&answer, &learner).unwrap();
        session.advance();
    }
    session.finish(&learner).unwrap();

    assert!(learner.review_words(LevelFilter::All, None).unwrap().is_empty());
    assert_eq!(learner.summary().unwrap().unwrap().total_quizzes, 2);
}

#[derive(Debug, PartialEq)]
enum Event {
    Tick(u32),
    Expired,
}

#[test]
fn manual_answer_between_tick_and_timeout_wins() {
    let mut learner = Learner::anonymous(verbal_core::MemoryProfileStore::new());
    learner.create_profile("Ada").unwrap();
    let mut rng = StdRng::seed_from_u64(5);
    let config = QuizConfig::new(Level::Lower, TypeMix::SynonymsOnly, 1);
    let quiz = assemble(&corpus(), &config, &mut rng);
    let mut session = Session::start(quiz, config, QuizMode::Practice, Some(2)).unwrap();

    let (tx, rx) = mpsc::channel();
    let expire_tx = tx.clone();
    let countdown = start_countdown(
        2,
        Duration::from_millis(20),
        move |left| {
            let _ = tx.send(Event::Tick(left));
        },
        move || {
            let _ = expire_tx.send(Event::Expired);
        },
    );

    assert_eq!(rx.recv_timeout(Duration::from_secs(2)).unwrap(), Event::Tick(1));
    let wrong = {
        let q = session.current().unwrap();
        q.options().iter().find(|o| !q.is_correct(o)).unwrap().clone()
    };
    countdown.cancel();
    assert!(session.answer(&wrong, &learner).unwrap().is_some());

    // anything the timer managed to send before cancel is fed through too
    while let Ok(event) = rx.try_recv() {
        if event == Event::Expired {
            assert!(session.time_out(&learner).unwrap().is_none());
        }
    }
    assert!(session.time_out(&learner).unwrap().is_none());

    assert_eq!(session.missed().len(), 1);
    let review = learner.review_words(LevelFilter::All, None).unwrap();
    assert_eq!(review.len(), 1);
    assert_eq!(review[0].missed_count, 1);
}
