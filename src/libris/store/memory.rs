use super::DataStore;
use crate::error::{LibraryError, Result};
use crate::model::{Author, Book, BookAuthorLink, Library, LoanRecord, Student};

/// Which collection a save call targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Students,
    Books,
    Loans,
    Authors,
    Links,
}

/// In-memory storage for testing and development.
/// Does NOT persist data.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    data: Library,
    saves: Vec<Collection>,
    fail_saves: bool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_library(data: Library) -> Self {
        Self {
            data,
            ..Self::default()
        }
    }

    /// Makes every subsequent save fail with an IO error.
    pub fn fail_saves(&mut self, fail: bool) {
        self.fail_saves = fail;
    }

    /// What has been saved so far.
    pub fn stored(&self) -> &Library {
        &self.data
    }

    /// Save calls in the order they happened, failed ones included.
    pub fn saves(&self) -> &[Collection] {
        &self.saves
    }

    fn record(&mut self, collection: Collection) -> Result<()> {
        self.saves.push(collection);
        if self.fail_saves {
            return Err(LibraryError::Io(std::io::Error::other(format!(
                "simulated failure saving {:?}",
                collection
            ))));
        }
        Ok(())
    }
}

impl DataStore for InMemoryStore {
    fn load_all(&self) -> Result<Library> {
        Ok(self.data.clone())
    }

    fn save_students(&mut self, students: &[Student]) -> Result<()> {
        self.record(Collection::Students)?;
        self.data.students = students.to_vec();
        Ok(())
    }

    fn save_books(&mut self, books: &[Book]) -> Result<()> {
        self.record(Collection::Books)?;
        self.data.books = books.to_vec();
        Ok(())
    }

    fn save_loans(&mut self, loans: &[LoanRecord]) -> Result<()> {
        self.record(Collection::Loans)?;
        self.data.loans = loans.to_vec();
        Ok(())
    }

    fn save_authors(&mut self, authors: &[Author]) -> Result<()> {
        self.record(Collection::Authors)?;
        self.data.authors = authors.to_vec();
        Ok(())
    }

    fn save_links(&mut self, links: &[BookAuthorLink]) -> Result<()> {
        self.record(Collection::Links)?;
        self.data.links = links.to_vec();
        Ok(())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::{AuthorRef, LoanKind};

    /// Builds a [`Library`] snapshot and the store that holds it.
    #[derive(Default)]
    pub struct StoreFixture {
        pub library: Library,
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_student(mut self, id: &str, points: u32) -> Self {
            let mut student = Student::new(
                id.parse().unwrap(),
                format!("First{}", id),
                format!("Last{}", id),
            );
            student.points = points;
            self.library.students.push(student);
            self
        }

        pub fn with_book(mut self, title: &str, isbn: &str, quantity: u32) -> Self {
            let book = Book::new(title.to_string(), isbn.parse().unwrap(), quantity);
            self.library.books.push(book);
            self
        }

        pub fn with_author(mut self, first: &str, last: &str) -> Self {
            let author = Author {
                id: self.library.next_author_id(),
                first_name: first.to_string(),
                last_name: last.to_string(),
            };
            self.library.insert_author(author);
            self
        }

        pub fn with_link(mut self, isbn: &str, author_id: u32) -> Self {
            self.library.links.push(BookAuthorLink {
                isbn: isbn.parse().unwrap(),
                author: AuthorRef::Author(author_id),
            });
            self
        }

        /// Appends a raw history record without touching copy status.
        pub fn with_record(mut self, student: &str, label: &str, kind: LoanKind, date: &str) -> Self {
            self.library.loans.push(LoanRecord {
                student: student.parse().unwrap(),
                label: label.parse().unwrap(),
                kind,
                date: date.parse().unwrap(),
            });
            self
        }

        /// Marks a copy as held by `student`, without logging anything.
        pub fn with_holder(mut self, label: &str, student: &str) -> Self {
            let label = label.parse().unwrap();
            let copy = self.library.copy_mut(&label).unwrap();
            copy.status = crate::model::CopyStatus::Borrowed(student.parse().unwrap());
            self
        }

        pub fn store(self) -> InMemoryStore {
            InMemoryStore::with_library(self.library)
        }
    }
}
