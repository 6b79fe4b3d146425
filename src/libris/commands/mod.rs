//! # Command Layer
//!
//! Business logic, one module per concern. Every command takes the loaded
//! [`Library`](crate::model::Library) and, if it mutates, the
//! [`DataStore`](crate::store::DataStore) to persist through. Commands return
//! a [`CmdResult`] and never print.
//!
//! Mutating commands validate every precondition first and only then touch
//! state, so a failed command leaves the library exactly as it was. Once the
//! in-memory mutation is done, save failures are downgraded to warnings (see
//! [`persist`]): memory stays authoritative even if the disk write did not land.

use crate::error::Result;
use crate::model::{Author, Book, LoanRecord, Student};
use log::warn;

pub mod authors;
pub mod books;
pub mod borrow;
pub mod history;
pub mod reports;
pub mod return_copy;
pub mod students;

pub use borrow::BorrowOutcome;
pub use reports::{OverdueEntry, OverdueStatus, PenalizedEntry, ShelfEntry, UnreturnedEntry};
pub use return_copy::ReturnOutcome;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// A book together with its active authors, for listings.
#[derive(Debug, Clone)]
pub struct BookListing {
    pub book: Book,
    pub authors: Vec<Author>,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub students: Vec<Student>,
    pub authors: Vec<Author>,
    pub books: Vec<BookListing>,
    pub history: Vec<LoanRecord>,
    pub shelf: Vec<ShelfEntry>,
    pub borrowed: Option<BorrowOutcome>,
    pub returned: Option<ReturnOutcome>,
    pub unreturned: Vec<UnreturnedEntry>,
    pub overdue: Vec<OverdueEntry>,
    pub penalized: Vec<PenalizedEntry>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_students(mut self, students: Vec<Student>) -> Self {
        self.students = students;
        self
    }

    pub fn with_authors(mut self, authors: Vec<Author>) -> Self {
        self.authors = authors;
        self
    }

    pub fn with_books(mut self, books: Vec<BookListing>) -> Self {
        self.books = books;
        self
    }

    pub fn with_history(mut self, history: Vec<LoanRecord>) -> Self {
        self.history = history;
        self
    }

    /// True if any save during the command failed.
    pub fn has_warnings(&self) -> bool {
        self.messages
            .iter()
            .any(|m| m.level == MessageLevel::Warning)
    }
}

/// Downgrades a failed save to a warning on `result`.
pub fn persist(result: &mut CmdResult, collection: &str, outcome: Result<()>) {
    if let Err(e) = outcome {
        warn!(
            "event=save_failed collection={} error={}",
            collection, e
        );
        result.add_message(CmdMessage::warning(format!(
            "Could not save {}: {} (changes kept in memory)",
            collection, e
        )));
    }
}
