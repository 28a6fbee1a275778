//! Phrase dictionary
//!
//! Known phrases (book titles) come from a CSV file with a `phrase` column.
//! A missing or malformed file is an empty dictionary, never an error.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::RwLock;

/// Name of the CSV column holding phrases
pub const PHRASE_COLUMN: &str = "phrase";

/// Read phrases from CSV with a header row
///
/// Values are trimmed and empty values skipped; dictionary order is kept.
pub fn parse_phrases<R: Read>(reader: R) -> Result<Vec<String>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let Some(column) = reader
        .headers()?
        .iter()
        .position(|header| header == PHRASE_COLUMN)
    else {
        tracing::warn!("Phrase list has no '{}' column", PHRASE_COLUMN);
        return Ok(Vec::new());
    };

    let mut phrases = Vec::new();
    for record in reader.records() {
        let record = record?;
        if let Some(phrase) = record.get(column).map(str::trim) {
            if !phrase.is_empty() {
                phrases.push(phrase.to_string());
            }
        }
    }

    Ok(phrases)
}

/// Phrase dictionary backed by a CSV file
#[derive(Clone)]
pub struct PhraseDictionary {
    path: PathBuf,
    /// Loaded once and shared when caching is enabled
    cache: Option<Arc<RwLock<Option<Arc<Vec<String>>>>>>,
}

impl PhraseDictionary {
    /// Create a dictionary; with `cache` the file is read only once
    pub fn new(path: impl Into<PathBuf>, cache: bool) -> Self {
        Self {
            path: path.into(),
            cache: cache.then(|| Arc::new(RwLock::new(None))),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load phrases from a file, degrading to an empty list
    pub fn load(path: &Path) -> Vec<String> {
        let file = match std::fs::File::open(path) {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!("{} not found ({}). No phrases loaded.", path.display(), e);
                return Vec::new();
            }
        };

        match parse_phrases(file) {
            Ok(phrases) => {
                tracing::debug!("Loaded {} phrases from {}", phrases.len(), path.display());
                phrases
            }
            Err(e) => {
                tracing::warn!("Malformed phrase list {}: {}", path.display(), e);
                Vec::new()
            }
        }
    }

    /// Current phrases
    pub async fn phrases(&self) -> Arc<Vec<String>> {
        let Some(cache) = &self.cache else {
            return Arc::new(self.load_blocking().await);
        };

        if let Some(phrases) = cache.read().await.as_ref() {
            return phrases.clone();
        }

        let mut slot = cache.write().await;
        if let Some(phrases) = slot.as_ref() {
            return phrases.clone();
        }
        let phrases = Arc::new(self.load_blocking().await);
        *slot = Some(phrases.clone());
        phrases
    }

    async fn load_blocking(&self) -> Vec<String> {
        let path = self.path.clone();
        match tokio::task::spawn_blocking(move || Self::load(&path)).await {
            Ok(phrases) => phrases,
            Err(e) => {
                tracing::error!("Phrase list loader panicked: {}", e);
                Vec::new()
            }
        }
    }
}
