//! Vocabulary corpus: synonym pairs and sentence-completion items

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::thread;

use serde::{Deserialize, Serialize};

use crate::config::{SENTENCES_FILE, SYNONYMS_FILE};
use crate::error::{Result, VerbalError};

/// Difficulty band of a corpus entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Lower,
    Middle,
    Upper,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Lower => "lower",
            Level::Middle => "middle",
            Level::Upper => "upper",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Level::Lower => "Lower Level",
            Level::Middle => "Middle Level",
            Level::Upper => "Upper Level",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lower" => Ok(Level::Lower),
            "middle" => Ok(Level::Middle),
            "upper" => Ok(Level::Upper),
            other => Err(format!("Unknown level: {}", other)),
        }
    }
}

/// Level selection for a request; `all` matches every entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LevelFilter {
    #[default]
    All,
    Only(Level),
}

impl LevelFilter {
    pub fn matches(&self, level: Level) -> bool {
        match self {
            LevelFilter::All => true,
            LevelFilter::Only(l) => *l == level,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LevelFilter::All => "All Levels",
            LevelFilter::Only(l) => l.label(),
        }
    }
}

impl From<Level> for LevelFilter {
    fn from(level: Level) -> Self {
        LevelFilter::Only(level)
    }
}

impl FromStr for LevelFilter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(LevelFilter::All)
        } else {
            s.parse().map(LevelFilter::Only)
        }
    }
}

impl TryFrom<String> for LevelFilter {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<LevelFilter> for String {
    fn from(filter: LevelFilter) -> Self {
        match filter {
            LevelFilter::All => "all".to_string(),
            LevelFilter::Only(l) => l.as_str().to_string(),
        }
    }
}

/// Headword with the synonym that counts as the correct answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynonymEntry {
    pub word: String,
    pub synonym: String,
    pub level: Level,
}

/// Headword with example sentences that each contain a blank
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceEntry {
    pub word: String,
    pub level: Level,
    pub sentences: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LevelCounts {
    pub synonyms: usize,
    pub sentences: usize,
}

/// Both corpus collections. Read-only once built.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Corpus {
    synonyms: Vec<SynonymEntry>,
    sentences: Vec<SentenceEntry>,
}

impl Corpus {
    pub fn new(synonyms: Vec<SynonymEntry>, sentences: Vec<SentenceEntry>) -> Self {
        let total = sentences.len();
        let sentences: Vec<SentenceEntry> = sentences
            .into_iter()
            .filter(|s| !s.sentences.is_empty())
            .collect();
        if sentences.len() < total {
            log::warn!(
                "Dropped {} sentence entries without example sentences",
                total - sentences.len()
            );
        }
        Self { synonyms, sentences }
    }

    pub fn synonyms(&self) -> &[SynonymEntry] {
        &self.synonyms
    }

    pub fn sentences(&self) -> &[SentenceEntry] {
        &self.sentences
    }

    pub fn synonyms_at(&self, filter: LevelFilter) -> Vec<&SynonymEntry> {
        self.synonyms.iter().filter(|e| filter.matches(e.level)).collect()
    }

    pub fn sentences_at(&self, filter: LevelFilter) -> Vec<&SentenceEntry> {
        self.sentences.iter().filter(|e| filter.matches(e.level)).collect()
    }

    pub fn find_synonym(&self, word: &str) -> Option<&SynonymEntry> {
        self.synonyms.iter().find(|e| e.word == word)
    }

    pub fn find_sentence(&self, word: &str) -> Option<&SentenceEntry> {
        self.sentences.iter().find(|e| e.word == word)
    }

    /// Levels present in either collection, sorted
    pub fn available_levels(&self) -> Vec<Level> {
        let mut levels: Vec<Level> = self
            .synonyms
            .iter()
            .map(|e| e.level)
            .chain(self.sentences.iter().map(|e| e.level))
            .collect();
        levels.sort();
        levels.dedup();
        levels
    }

    pub fn count_by_level(&self, filter: LevelFilter) -> LevelCounts {
        LevelCounts {
            synonyms: self.synonyms.iter().filter(|e| filter.matches(e.level)).count(),
            sentences: self.sentences.iter().filter(|e| filter.matches(e.level)).count(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.synonyms.is_empty() && self.sentences.is_empty()
    }
}

/// Where the two corpus collections come from
pub trait CorpusSource: Sync {
    fn fetch_synonyms(&self) -> Result<Vec<SynonymEntry>>;
    fn fetch_sentences(&self) -> Result<Vec<SentenceEntry>>;
}

/// Reads `synonyms.json` and `sentences.json` from one directory
#[derive(Debug, Clone)]
pub struct JsonDirSource {
    dir: PathBuf,
}

impl JsonDirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

impl CorpusSource for JsonDirSource {
    fn fetch_synonyms(&self) -> Result<Vec<SynonymEntry>> {
        read_json(&self.dir.join(SYNONYMS_FILE))
    }

    fn fetch_sentences(&self) -> Result<Vec<SentenceEntry>> {
        read_json(&self.dir.join(SENTENCES_FILE))
    }
}

/// Loads the corpus once and hands out the cached copy afterwards
pub struct CorpusLoader<S: CorpusSource> {
    source: S,
    cached: Option<Arc<Corpus>>,
}

impl<S: CorpusSource> CorpusLoader<S> {
    pub fn new(source: S) -> Self {
        Self { source, cached: None }
    }

    pub fn is_loaded(&self) -> bool {
        self.cached.is_some()
    }

    /// Fetch both collections concurrently. Nothing may be generated until
    /// this has succeeded; a failed load is not cached and can be retried.
    pub fn load(&mut self) -> Result<Arc<Corpus>> {
        if let Some(corpus) = &self.cached {
            return Ok(Arc::clone(corpus));
        }

        let source = &self.source;
        let (synonyms, sentences) = thread::scope(|s| {
            let synonyms = s.spawn(|| source.fetch_synonyms());
            let sentences = s.spawn(|| source.fetch_sentences());
            (synonyms.join(), sentences.join())
        });

        let synonyms = unavailable(synonyms, "synonyms")?;
        let sentences = unavailable(sentences, "sentences")?;

        log::info!("Loaded {} synonym entries", synonyms.len());
        log::info!("Loaded {} sentence entries", sentences.len());

        let corpus = Arc::new(Corpus::new(synonyms, sentences));
        self.cached = Some(Arc::clone(&corpus));
        Ok(corpus)
    }
}

fn unavailable<T>(
    joined: thread::Result<Result<T>>,
    what: &str,
) -> Result<T> {
    match joined {
        Ok(Ok(data)) => Ok(data),
        Ok(Err(VerbalError::DataUnavailable(msg))) => Err(VerbalError::DataUnavailable(msg)),
        Ok(Err(e)) => {
            log::error!("Error loading {}: {}", what, e);
            Err(VerbalError::DataUnavailable(format!("{}: {}", what, e)))
        }
        Err(_) => {
            log::error!("Loading {} panicked", what);
            Err(VerbalError::DataUnavailable(format!("{}: loader panicked", what)))
        }
    }
}

/// Load a corpus directory without keeping a loader around
pub fn load_corpus_dir(dir: impl Into<PathBuf>) -> Result<Arc<Corpus>> {
    CorpusLoader::new(JsonDirSource::new(dir)).load()
}

/// Write both collections as JSON files into `dir`
pub fn write_corpus_dir(dir: &Path, corpus: &Corpus) -> Result<()> {
    fs::create_dir_all(dir)?;
    fs::write(
        dir.join(SYNONYMS_FILE),
        serde_json::to_string_pretty(corpus.synonyms())?,
    )?;
    fs::write(
        dir.join(SENTENCES_FILE),
        serde_json::to_string_pretty(corpus.sentences())?,
    )?;
    Ok(())
}
