//! Corpus import from spreadsheets (Excel and CSV)

use std::path::Path;

use calamine::{open_workbook, Data, Reader, Xlsx};
use csv::ReaderBuilder;

use crate::corpus::{Level, SentenceEntry, SynonymEntry};
use crate::error::{Result, VerbalError};

/// Header row plus data rows, all as trimmed strings
struct Sheet {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

fn read_sheet(file_path: &Path) -> Result<Sheet> {
    let extension = file_path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "xlsx" | "xls" => read_excel(file_path),
        "csv" => read_csv(file_path),
        _ => Err(VerbalError::Import(format!("Unsupported file format: .{}", extension))),
    }
}

fn read_excel(file_path: &Path) -> Result<Sheet> {
    let mut workbook: Xlsx<_> = open_workbook(file_path)
        .map_err(|e| VerbalError::Import(format!("Failed to open Excel file: {}", e)))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .ok_or_else(|| VerbalError::Import("No sheets found in Excel file".to_string()))?
        .clone();

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| VerbalError::Import(format!("Failed to read sheet: {}", e)))?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .ok_or_else(|| VerbalError::Import("Empty file - no header row".to_string()))?
        .iter()
        .map(get_cell_string)
        .collect();
    let rows: Vec<Vec<String>> = rows
        .map(|row| row.iter().map(get_cell_string).collect::<Vec<String>>())
        .collect();

    Ok(Sheet { headers, rows })
}

fn read_csv(file_path: &Path) -> Result<Sheet> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(file_path)
        .map_err(|e| VerbalError::Import(format!("Failed to open CSV file: {}", e)))?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| VerbalError::Import(format!("Failed to read CSV headers: {}", e)))?
        .iter()
        .map(|s| s.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record =
            result.map_err(|e| VerbalError::Import(format!("Failed to read CSV row: {}", e)))?;
        rows.push(record.iter().map(|s| s.trim().to_string()).collect::<Vec<String>>());
    }

    Ok(Sheet { headers, rows })
}

/// Helper to extract string from Excel cell
fn get_cell_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(_) | Data::Empty => String::new(),
    }
}

fn cell(row: &[String], index: Option<usize>) -> &str {
    index.and_then(|i| row.get(i)).map(String::as_str).unwrap_or("")
}

/// Column indices shared by both sheet kinds
#[derive(Debug, Default)]
struct Columns {
    word: Option<usize>,
    synonym: Option<usize>,
    level: Option<usize>,
    sentences: Vec<usize>,
}

fn detect_columns(headers: &[String]) -> Columns {
    let mut columns = Columns::default();
    for (i, header) in headers.iter().enumerate() {
        let name = header.trim().to_lowercase();
        match name.as_str() {
            "word" | "words" | "vocabulary" => columns.word = Some(i),
            "synonym" | "synonyms" | "answer" => columns.synonym = Some(i),
            "level" | "difficulty" => columns.level = Some(i),
            _ if name.starts_with("sentence") => columns.sentences.push(i),
            _ => {} // Unknown columns ignored
        }
    }
    columns
}

fn require(index: Option<usize>, name: &str) -> Result<usize> {
    index.ok_or_else(|| {
        VerbalError::Import(format!("Missing required '{}' column in file header", name))
    })
}

fn parse_level(raw: &str, row: usize) -> Option<Level> {
    match raw.parse() {
        Ok(level) => Some(level),
        Err(e) => {
            log::warn!("Skipping row {}: {}", row + 2, e);
            None
        }
    }
}

/// Import synonym pairs. Needs `word`, `synonym` and `level` columns.
pub fn import_synonyms(file_path: &Path) -> Result<Vec<SynonymEntry>> {
    let sheet = read_sheet(file_path)?;
    let columns = detect_columns(&sheet.headers);
    let word = require(columns.word, "Word")?;
    let synonym = require(columns.synonym, "Synonym")?;
    let level_col = require(columns.level, "Level")?;

    let mut entries = Vec::new();
    for (n, row) in sheet.rows.iter().enumerate() {
        let word_val = cell(row, Some(word));
        let synonym_val = cell(row, Some(synonym));
        if word_val.is_empty() || synonym_val.is_empty() {
            continue;
        }
        let Some(level) = parse_level(cell(row, Some(level_col)), n) else {
            continue;
        };
        entries.push(SynonymEntry {
            word: word_val.to_string(),
            synonym: synonym_val.to_string(),
            level,
        });
    }

    log::info!("Imported {} synonym entries from {}", entries.len(), file_path.display());
    Ok(entries)
}

/// Import sentence items. Needs `word`, `level` and at least one
/// `sentence...` column; blank sentence cells are dropped.
pub fn import_sentences(file_path: &Path) -> Result<Vec<SentenceEntry>> {
    let sheet = read_sheet(file_path)?;
    let columns = detect_columns(&sheet.headers);
    let word = require(columns.word, "Word")?;
    let level_col = require(columns.level, "Level")?;
    if columns.sentences.is_empty() {
        return Err(VerbalError::Import(
            "At least one 'Sentence' column required".to_string(),
        ));
    }

    let mut entries = Vec::new();
    for (n, row) in sheet.rows.iter().enumerate() {
        let word_val = cell(row, Some(word));
        if word_val.is_empty() {
            continue;
        }
        let sentences: Vec<String> = columns
            .sentences
            .iter()
            .map(|&i| cell(row, Some(i)))
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if sentences.is_empty() {
            log::warn!("Skipping row {}: '{}' has no sentences", n + 2, word_val);
            continue;
        }
        let Some(level) = parse_level(cell(row, Some(level_col)), n) else {
            continue;
        };
        entries.push(SentenceEntry {
            word: word_val.to_string(),
            level,
            sentences,
        });
    }

    log::info!("Imported {} sentence entries from {}", entries.len(), file_path.display());
    Ok(entries)
}
