//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::dictionary::PhraseDictionary;
use crate::finder::{BookFinder, FinderSettings};
use crate::ocr::OcrService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    finder: BookFinder,
}

impl AppState {
    /// Create application state with the OCR provider selected in `config`
    pub fn new(config: Config) -> Self {
        let ocr = OcrService::from_config(&config.ocr);
        Self::with_ocr(config, ocr)
    }

    /// Create application state around an already constructed OCR service
    pub fn with_ocr(config: Config, ocr: OcrService) -> Self {
        let dictionary = PhraseDictionary::new(&config.dictionary.path, config.dictionary.cache);
        let settings = FinderSettings::from(&config.matching);

        Self {
            inner: Arc::new(AppStateInner {
                finder: BookFinder::new(ocr, dictionary, settings),
                config,
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the book finder
    pub fn finder(&self) -> &BookFinder {
        &self.inner.finder
    }
}
