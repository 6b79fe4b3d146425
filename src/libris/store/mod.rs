//! # Storage Layer
//!
//! The [`DataStore`] trait is the repository interface the commands persist
//! through. It is deliberately coarse: one bulk load at startup, and one
//! full-overwrite save per collection.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: Production flat-file storage
//!   - One comma-delimited file per collection, no header row
//!   - Every save rewrites the whole file (tmp file + rename)
//!
//! - [`memory::InMemoryStore`]: In-memory storage for testing
//!   - No persistence
//!   - Can be told to fail saves, to exercise the non-fatal save path
//!
//! ## Storage Format
//!
//! ```text
//! <data dir>/
//! ├── students.csv       # id,first,last,points
//! ├── books.csv          # B,isbn,quantity,title  then  C,label,status
//! ├── loans.csv          # student,label,kind(0|1),DD-MM-YYYY
//! ├── authors.csv        # id,first,last
//! ├── book_authors.csv   # isbn,author_id (-1 = removed)
//! └── config.json
//! ```
//!
//! Line encoding lives in [`codec`] so both the file store and tests share it.

use crate::error::Result;
use crate::model::{Author, Book, BookAuthorLink, Library, LoanRecord, Student};

pub mod codec;
pub mod fs;
pub mod memory;

/// Abstract interface for library persistence.
///
/// Saves always receive the full current collection and replace whatever was
/// stored before.
pub trait DataStore {
    /// Load every collection.
    fn load_all(&self) -> Result<Library>;

    fn save_students(&mut self, students: &[Student]) -> Result<()>;

    fn save_books(&mut self, books: &[Book]) -> Result<()>;

    fn save_loans(&mut self, loans: &[LoanRecord]) -> Result<()>;

    fn save_authors(&mut self, authors: &[Author]) -> Result<()>;

    fn save_links(&mut self, links: &[BookAuthorLink]) -> Result<()>;
}
