//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It owns the
//! store and the loaded [`Library`], and is the single entry point for every
//! operation regardless of the UI in front of it.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Loads** all collections once, in [`LibraryApi::open`]
//! - **Dispatches** to the appropriate command function
//! - **Normalizes inputs**: raw strings become validated ids, ISBNs, labels
//!   and dates here, so commands only ever see well-formed values
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! ## Sequencing
//!
//! Mutating methods take `&mut self`, so one operation (persistence included)
//! always completes before the next starts. A host that shares a
//! `LibraryApi` across threads has to wrap it in a `Mutex`.
//!
//! ## Generic Over DataStore
//!
//! - Production: `LibraryApi<FileStore>`
//! - Testing: `LibraryApi<InMemoryStore>`

use crate::commands::{self, CmdResult};
use crate::date::Date;
use crate::error::Result;
use crate::model::{CopyLabel, Isbn, Library, StudentId};
use crate::store::DataStore;

pub struct LibraryApi<S: DataStore> {
    store: S,
    library: Library,
}

impl<S: DataStore> LibraryApi<S> {
    /// Loads every collection from `store`.
    pub fn open(store: S) -> Result<Self> {
        let library = store.load_all()?;
        Ok(Self { store, library })
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // --- Circulation ---

    pub fn borrow(&mut self, student: &str, isbn: &str, date: Option<&str>) -> Result<CmdResult> {
        let student: StudentId = student.parse()?;
        let isbn: Isbn = isbn.parse()?;
        let date = parse_date(date)?;
        commands::borrow::run(&mut self.library, &mut self.store, &student, &isbn, date)
    }

    pub fn return_copy(
        &mut self,
        student: &str,
        label: &str,
        date: Option<&str>,
    ) -> Result<CmdResult> {
        let student: StudentId = student.parse()?;
        let label: CopyLabel = label.parse()?;
        let date = parse_date(date)?;
        commands::return_copy::run(&mut self.library, &mut self.store, &student, &label, date)
    }

    // --- Reports ---

    pub fn unreturned(&self) -> Result<CmdResult> {
        commands::reports::unreturned(&self.library)
    }

    /// Overdue loans as of `today` (defaults to the local date).
    pub fn overdue(&self, today: Option<&str>) -> Result<CmdResult> {
        commands::reports::overdue(&self.library, parse_date(today)?)
    }

    pub fn penalized(&self) -> Result<CmdResult> {
        commands::reports::penalized(&self.library)
    }

    pub fn books_on_shelf(&self) -> Result<CmdResult> {
        commands::reports::on_shelf(&self.library)
    }

    // --- Students ---

    pub fn add_student(&mut self, id: &str, first: &str, last: &str) -> Result<CmdResult> {
        let id: StudentId = id.parse()?;
        commands::students::add(&mut self.library, &mut self.store, id, first, last)
    }

    pub fn delete_student(&mut self, id: &str) -> Result<CmdResult> {
        let id: StudentId = id.parse()?;
        commands::students::delete(&mut self.library, &mut self.store, &id)
    }

    pub fn update_student(&mut self, id: &str, first: &str, last: &str) -> Result<CmdResult> {
        let id: StudentId = id.parse()?;
        commands::students::update(&mut self.library, &mut self.store, &id, first, last)
    }

    pub fn show_student(&self, id: &str) -> Result<CmdResult> {
        let id: StudentId = id.parse()?;
        commands::students::show(&self.library, &id)
    }

    pub fn list_students(&self) -> Result<CmdResult> {
        commands::students::list(&self.library)
    }

    // --- Authors ---

    pub fn add_author(&mut self, first: &str, last: &str) -> Result<CmdResult> {
        commands::authors::add(&mut self.library, &mut self.store, first, last)
    }

    pub fn delete_author(&mut self, id: u32) -> Result<CmdResult> {
        commands::authors::delete(&mut self.library, &mut self.store, id)
    }

    pub fn update_author(&mut self, id: u32, first: &str, last: &str) -> Result<CmdResult> {
        commands::authors::update(&mut self.library, &mut self.store, id, first, last)
    }

    pub fn show_author(&self, first_name: &str) -> Result<CmdResult> {
        commands::authors::show(&self.library, first_name)
    }

    pub fn list_authors(&self) -> Result<CmdResult> {
        commands::authors::list(&self.library)
    }

    // --- Books ---

    pub fn add_book(&mut self, title: &str, isbn: &str, quantity: u32) -> Result<CmdResult> {
        let isbn: Isbn = isbn.parse()?;
        commands::books::add(&mut self.library, &mut self.store, title, isbn, quantity)
    }

    pub fn delete_book(&mut self, isbn: &str) -> Result<CmdResult> {
        let isbn: Isbn = isbn.parse()?;
        commands::books::delete(&mut self.library, &mut self.store, &isbn)
    }

    pub fn rename_book(&mut self, isbn: &str, title: &str) -> Result<CmdResult> {
        let isbn: Isbn = isbn.parse()?;
        commands::books::rename(&mut self.library, &mut self.store, &isbn, title)
    }

    pub fn find_book(&self, title: &str) -> Result<CmdResult> {
        commands::books::find_by_title(&self.library, title)
    }

    pub fn list_books(&self) -> Result<CmdResult> {
        commands::books::list(&self.library)
    }

    pub fn link_author(&mut self, isbn: &str, author_id: u32) -> Result<CmdResult> {
        let isbn: Isbn = isbn.parse()?;
        commands::books::link_author(&mut self.library, &mut self.store, &isbn, author_id)
    }

    pub fn replace_authors(&mut self, isbn: &str, author_ids: &[u32]) -> Result<CmdResult> {
        let isbn: Isbn = isbn.parse()?;
        commands::books::replace_authors(&mut self.library, &mut self.store, &isbn, author_ids)
    }
}

fn parse_date(input: Option<&str>) -> Result<Date> {
    match input {
        Some(s) => s.parse(),
        None => Ok(Date::today()),
    }
}

pub use crate::commands::{CmdMessage, MessageLevel};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LibraryError;
    use crate::model::CopyStatus;
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::memory::InMemoryStore;

    fn api() -> LibraryApi<InMemoryStore> {
        let store = StoreFixture::new()
            .with_student("10000001", 100)
            .with_book("Dune", "1234567890123", 1)
            .store();
        LibraryApi::open(store).unwrap()
    }

    #[test]
    fn late_return_scenario() {
        let mut api = api();
        let result = api
            .borrow("10000001", "1234567890123", Some("01-01-2024"))
            .unwrap();
        assert_eq!(
            result.borrowed.unwrap().label.as_str(),
            "1234567890123_1"
        );
        assert_eq!(
            api.library().books[0].copies[0].status.to_string(),
            "10000001"
        );

        let result = api
            .return_copy("10000001", "1234567890123_1", Some("20-01-2024"))
            .unwrap();
        assert!(result.returned.unwrap().penalty_applied);
        assert_eq!(api.library().books[0].copies[0].status, CopyStatus::OnShelf);
        assert_eq!(api.library().students[0].points, 90);
        assert_eq!(api.penalized().unwrap().penalized.len(), 1);
    }

    #[test]
    fn on_time_return_scenario() {
        let mut api = api();
        api.borrow("10000001", "1234567890123", Some("01-01-2024"))
            .unwrap();
        let result = api
            .return_copy("10000001", "1234567890123_1", Some("10-01-2024"))
            .unwrap();
        assert!(!result.returned.unwrap().penalty_applied);
        assert_eq!(api.library().students[0].points, 100);
        assert!(api.penalized().unwrap().penalized.is_empty());
    }

    #[test]
    fn second_borrow_scenario() {
        let mut api = api();
        api.borrow("10000001", "1234567890123", Some("01-01-2024"))
            .unwrap();
        let before = api.library().clone();
        let err = api
            .borrow("10000001", "1234567890123", Some("02-01-2024"))
            .unwrap_err();
        assert!(matches!(err, LibraryError::NoCopiesAvailable(_)));
        assert_eq!(api.library(), &before);
    }

    #[test]
    fn editors_keep_borrowed_copies_reachable() {
        let mut api = api();
        api.borrow("10000001", "1234567890123", Some("01-01-2024"))
            .unwrap();

        assert!(matches!(
            api.delete_book("1234567890123").unwrap_err(),
            LibraryError::CopiesOnLoan { .. }
        ));
        assert!(matches!(
            api.delete_student("10000001").unwrap_err(),
            LibraryError::StudentHoldsCopies { .. }
        ));

        let result = api
            .return_copy("10000001", "1234567890123_1", Some("05-01-2024"))
            .unwrap();
        assert_eq!(result.returned.unwrap().days_out, Some(4));
        api.delete_book("1234567890123").unwrap();
        api.delete_student("10000001").unwrap();
        assert!(api.unreturned().unwrap().unreturned.is_empty());
    }

    #[test]
    fn rejects_malformed_inputs_before_dispatch() {
        let mut api = api();
        assert!(matches!(
            api.borrow("123", "1234567890123", None).unwrap_err(),
            LibraryError::InvalidStudentId(_)
        ));
        assert!(matches!(
            api.borrow("10000001", "978", None).unwrap_err(),
            LibraryError::InvalidIsbn(_)
        ));
        assert!(matches!(
            api.borrow("10000001", "1234567890123", Some("2024-01-01"))
                .unwrap_err(),
            LibraryError::InvalidDate(_)
        ));
        assert!(api.library().loans.is_empty());
    }
}
