use crate::error::{LibraryError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";

/// Configuration for libris, stored as `config.json` in the data directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LibraryConfig {
    #[serde(default = "default_students_file")]
    pub students_file: String,

    #[serde(default = "default_books_file")]
    pub books_file: String,

    #[serde(default = "default_loans_file")]
    pub loans_file: String,

    #[serde(default = "default_authors_file")]
    pub authors_file: String,

    /// Book-author links
    #[serde(default = "default_links_file")]
    pub links_file: String,

    /// Log level used when neither `--verbose` nor `RUST_LOG` is given
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_students_file() -> String {
    "students.csv".to_string()
}

fn default_books_file() -> String {
    "books.csv".to_string()
}

fn default_loans_file() -> String {
    "loans.csv".to_string()
}

fn default_authors_file() -> String {
    "authors.csv".to_string()
}

fn default_links_file() -> String {
    "book_authors.csv".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            students_file: default_students_file(),
            books_file: default_books_file(),
            loans_file: default_loans_file(),
            authors_file: default_authors_file(),
            links_file: default_links_file(),
            log_level: default_log_level(),
        }
    }
}

impl LibraryConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(LibraryError::Io)?;
        let config: LibraryConfig =
            serde_json::from_str(&content).map_err(LibraryError::Serialization)?;
        Ok(config)
    }
}
