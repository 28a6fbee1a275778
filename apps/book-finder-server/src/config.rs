//! Configuration management for Book Finder Server

use std::env;
use std::path::PathBuf;

use crate::matching::{DEFAULT_COARSE_THRESHOLD, DEFAULT_MATCH_THRESHOLD, DEFAULT_PADDING};
use crate::ocr::{GoogleVisionProvider, OcrProvider, OcrServiceConfig};
use crate::render::OutputFormat;

/// Default upload limit: 20MB
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub ocr: OcrServiceConfig,
    pub dictionary: DictionaryConfig,
    pub matching: MatchingConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct DictionaryConfig {
    pub path: PathBuf,
    /// Load the phrase list once instead of on every request
    pub cache: bool,
}

#[derive(Debug, Clone)]
pub struct MatchingConfig {
    /// Coarse candidates need a partial score strictly above this
    pub coarse_threshold: u8,
    /// Windows need a full-string score of at least this
    pub match_threshold: u8,
    /// Rectangle padding in pixels
    pub padding: i32,
    pub output_format: OutputFormat,
}

/// Invalid configuration values
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}' ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
                max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            },
            ocr: OcrServiceConfig::default(),
            dictionary: DictionaryConfig {
                path: PathBuf::from("book_list.csv"),
                cache: false,
            },
            matching: MatchingConfig {
                coarse_threshold: DEFAULT_COARSE_THRESHOLD,
                match_threshold: DEFAULT_MATCH_THRESHOLD,
                padding: DEFAULT_PADDING,
                output_format: OutputFormat::Jpeg,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup (environment, map, ...)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Ok(Config {
            server: ServerConfig {
                host: var("SERVER_HOST").unwrap_or(defaults.server.host),
                port: parse_or("SERVER_PORT", var("SERVER_PORT"), defaults.server.port)?,
                max_upload_bytes: parse_or(
                    "MAX_UPLOAD_BYTES",
                    var("MAX_UPLOAD_BYTES"),
                    defaults.server.max_upload_bytes,
                )?,
            },
            ocr: OcrServiceConfig {
                provider: parse_or("OCR_PROVIDER", var("OCR_PROVIDER"), OcrProvider::default())?,
                vision_endpoint: var("GOOGLE_VISION_ENDPOINT")
                    .unwrap_or_else(|| GoogleVisionProvider::DEFAULT_ENDPOINT.to_string()),
                vision_api_key: var("GOOGLE_VISION_API_KEY"),
                vision_access_token: var("GOOGLE_VISION_ACCESS_TOKEN"),
                tesseract_path: var("TESSERACT_PATH").unwrap_or(defaults.ocr.tesseract_path),
                language: var("OCR_LANGUAGE"),
            },
            dictionary: DictionaryConfig {
                path: var("PHRASE_LIST_PATH")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.dictionary.path),
                cache: parse_or("PHRASE_CACHE", var("PHRASE_CACHE"), defaults.dictionary.cache)?,
            },
            matching: MatchingConfig {
                coarse_threshold: parse_score(
                    "COARSE_THRESHOLD",
                    var("COARSE_THRESHOLD"),
                    defaults.matching.coarse_threshold,
                )?,
                match_threshold: parse_score(
                    "MATCH_THRESHOLD",
                    var("MATCH_THRESHOLD"),
                    defaults.matching.match_threshold,
                )?,
                padding: parse_or("BOX_PADDING", var("BOX_PADDING"), defaults.matching.padding)?,
                output_format: parse_or(
                    "OUTPUT_FORMAT",
                    var("OUTPUT_FORMAT"),
                    defaults.matching.output_format,
                )?,
            },
        })
    }
}

fn parse_or<T>(key: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                key,
                reason: e.to_string(),
                value,
            }),
    }
}

fn parse_score(key: &'static str, value: Option<String>, default: u8) -> Result<u8, ConfigError> {
    let score = parse_or(key, value, default)?;
    if score > 100 {
        return Err(ConfigError::InvalidValue {
            key,
            value: score.to_string(),
            reason: "scores range from 0 to 100".to_string(),
        });
    }
    Ok(score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.server.port, 8000);
        assert_eq!(config.ocr.provider, OcrProvider::GoogleVision);
        assert_eq!(config.dictionary.path, PathBuf::from("book_list.csv"));
        assert!(!config.dictionary.cache);
        assert_eq!(config.matching.coarse_threshold, 80);
        assert_eq!(config.matching.match_threshold, 85);
        assert_eq!(config.matching.padding, 20);
        assert_eq!(config.matching.output_format, OutputFormat::Jpeg);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("SERVER_PORT", "9000"),
            ("OCR_PROVIDER", "tesseract"),
            ("OCR_LANGUAGE", "eng"),
            ("PHRASE_LIST_PATH", "/data/titles.csv"),
            ("PHRASE_CACHE", "true"),
            ("MATCH_THRESHOLD", "90"),
            ("BOX_PADDING", "8"),
            ("OUTPUT_FORMAT", "png"),
            ("GOOGLE_VISION_API_KEY", ""),
        ]))
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.ocr.provider, OcrProvider::Tesseract);
        assert_eq!(config.ocr.language.as_deref(), Some("eng"));
        assert_eq!(config.ocr.vision_api_key, None);
        assert_eq!(config.dictionary.path, PathBuf::from("/data/titles.csv"));
        assert!(config.dictionary.cache);
        assert_eq!(config.matching.match_threshold, 90);
        assert_eq!(config.matching.padding, 8);
        assert_eq!(config.matching.output_format, OutputFormat::Png);
    }

    #[test]
    fn test_invalid_values() {
        let err = Config::from_lookup(lookup(&[("SERVER_PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("SERVER_PORT"));

        assert!(Config::from_lookup(lookup(&[("COARSE_THRESHOLD", "101")])).is_err());
        assert!(Config::from_lookup(lookup(&[("OCR_PROVIDER", "ollama")])).is_err());
    }
}
