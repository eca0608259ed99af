//! Importing rules and scenario documents into the game state.
//!
//! Imported text is cached under `<state dir>/library/<kind>/<stem>.txt` and
//! referenced from the `rules` or `scenario` section of the record, together
//! with a short summary the oracle stages receive as reference material.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde_json::{Map, Value, json};

use crate::error::{ImportError, ImportResult, StoreError};
use crate::store::StateStore;

/// Number of lines kept in a section's `active_summary`.
pub const SUMMARY_LINES: usize = 20;

/// Which section of the record a document belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// Rules reference material.
    Rules,
    /// Scenario material.
    Scenario,
}

impl ContentKind {
    /// Parse a kind name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "rules" => Some(Self::Rules),
            "scenario" => Some(Self::Scenario),
            _ => None,
        }
    }

    fn section<'a>(&self, state: &'a mut crate::state::GameState) -> &'a mut Value {
        match self {
            Self::Rules => &mut state.rules,
            Self::Scenario => &mut state.scenario,
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rules => write!(f, "rules"),
            Self::Scenario => write!(f, "scenario"),
        }
    }
}

/// Where an imported document ended up.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedDocument {
    /// Display title stored in the record.
    pub title: String,
    /// Path of the cached plain-text copy.
    pub cached_text: PathBuf,
    /// Number of summary lines stored.
    pub summary_lines: usize,
}

/// Extract plain text from a `.txt`, `.md`, or `.pdf` file.
///
/// PDFs go through the external `pdftotext` tool.
pub fn extract_text(source: &Path) -> ImportResult<String> {
    let ext = source
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "txt" | "md" => fs::read_to_string(source)
            .map(|s| s.trim().to_string())
            .map_err(|source_err| ImportError::Io {
                path: source.to_path_buf(),
                source: source_err,
            }),
        "pdf" => extract_pdf(source),
        _ => Err(ImportError::UnsupportedFormat(source.display().to_string())),
    }
}

fn extract_pdf(source: &Path) -> ImportResult<String> {
    let output = Command::new("pdftotext")
        .args(["-layout", "-nopgbrk"])
        .arg(source)
        .arg("-")
        .output()
        .map_err(|e| {
            ImportError::Extraction(format!(
                "pdftotext is not available ({e}); install poppler-utils to import PDFs"
            ))
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ImportError::Extraction(format!(
            "pdftotext failed: {}",
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// The first `max_lines` non-empty lines of `text`, trimmed.
pub fn summarize(text: &str, max_lines: usize) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .take(max_lines)
        .map(str::to_string)
        .collect()
}

/// Import a document into the persisted record behind `store`.
///
/// The record must already exist; importing never seeds a new game.
pub fn import_document(
    store: &StateStore,
    source: &Path,
    kind: ContentKind,
    title: Option<&str>,
) -> ImportResult<ImportedDocument> {
    if !store.exists() {
        return Err(StoreError::NotFound {
            path: store.path().to_path_buf(),
        }
        .into());
    }
    if !source.is_file() {
        return Err(ImportError::SourceNotFound(source.to_path_buf()));
    }

    let text = extract_text(source)?;
    if text.is_empty() {
        return Err(ImportError::EmptyContent);
    }

    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document")
        .to_string();
    let library = store
        .path()
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join("library")
        .join(kind.to_string());
    fs::create_dir_all(&library).map_err(|e| ImportError::Io {
        path: library.clone(),
        source: e,
    })?;
    let cached_text = library.join(format!("{stem}.txt"));
    fs::write(&cached_text, &text).map_err(|e| ImportError::Io {
        path: cached_text.clone(),
        source: e,
    })?;

    let title = title.map(str::to_string).unwrap_or(stem);
    let summary = summarize(&text, SUMMARY_LINES);
    let summary_lines = summary.len();

    let mut state = store.load()?;
    let section = kind.section(&mut state);
    if !section.is_object() {
        *section = Value::Object(Map::new());
    }
    if let Value::Object(map) = section {
        let documents = map
            .entry("source_documents")
            .or_insert_with(|| Value::Array(Vec::new()));
        if !documents.is_array() {
            *documents = Value::Array(Vec::new());
        }
        if let Value::Array(list) = documents {
            list.push(json!({
                "title": title,
                "source": source.display().to_string(),
                "cached_text": cached_text.display().to_string(),
            }));
        }
        map.insert("active_summary".to_string(), json!(summary));
    }
    store.save(&state)?;

    tracing::info!(%kind, title = %title, lines = summary_lines, "document imported");
    Ok(ImportedDocument {
        title,
        cached_text,
        summary_lines,
    })
}
