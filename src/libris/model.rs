use crate::date::Date;
use crate::error::{LibraryError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Balance every student starts with.
pub const INITIAL_POINTS: u32 = 100;
/// A loan kept longer than this many days is late.
pub const LATE_THRESHOLD_DAYS: i64 = 15;
/// Points deducted for a late return.
pub const LATE_PENALTY_POINTS: u32 = 10;

const STUDENT_ID_LEN: usize = 8;
const ISBN_LEN: usize = 13;

fn all_digits(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| b.is_ascii_digit())
}

/// Rejects values that would break the comma-delimited store format.
pub fn validate_field(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(LibraryError::InvalidField {
            field,
            reason: "cannot be empty".to_string(),
        });
    }
    if value.contains(',') || value.contains('\n') || value.contains('\r') {
        return Err(LibraryError::InvalidField {
            field,
            reason: "cannot contain commas or line breaks".to_string(),
        });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(String);

impl StudentId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for StudentId {
    type Err = LibraryError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if all_digits(s, STUDENT_ID_LEN) {
            Ok(StudentId(s.to_string()))
        } else {
            Err(LibraryError::InvalidStudentId(s.to_string()))
        }
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Isbn(String);

impl Isbn {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Isbn {
    type Err = LibraryError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if all_digits(s, ISBN_LEN) {
            Ok(Isbn(s.to_string()))
        } else {
            Err(LibraryError::InvalidIsbn(s.to_string()))
        }
    }
}

impl fmt::Display for Isbn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifies one physical copy, `{isbn}_{sequence}`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CopyLabel(String);

impl CopyLabel {
    pub fn new(isbn: &Isbn, sequence: u32) -> Self {
        CopyLabel(format!("{}_{}", isbn, sequence))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for CopyLabel {
    type Err = LibraryError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        validate_field("copy label", s)?;
        if s.chars().any(char::is_whitespace) {
            return Err(LibraryError::InvalidField {
                field: "copy label",
                reason: "cannot contain whitespace".to_string(),
            });
        }
        Ok(CopyLabel(s.to_string()))
    }
}

impl fmt::Display for CopyLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub first_name: String,
    pub last_name: String,
    pub points: u32,
}

impl Student {
    pub fn new(id: StudentId, first_name: String, last_name: String) -> Self {
        Self {
            id,
            first_name,
            last_name,
            points: INITIAL_POINTS,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Deducts the late penalty, flooring at zero.
    pub fn apply_late_penalty(&mut self) {
        self.points = self.points.saturating_sub(LATE_PENALTY_POINTS);
    }
}

/// Where a copy currently is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CopyStatus {
    #[default]
    OnShelf,
    Borrowed(StudentId),
}

impl CopyStatus {
    /// Marker written to the store for [`CopyStatus::OnShelf`].
    pub const SHELF_SENTINEL: &'static str = "ON_SHELF";

    pub fn is_on_shelf(&self) -> bool {
        matches!(self, CopyStatus::OnShelf)
    }

    pub fn is_held_by(&self, student: &StudentId) -> bool {
        matches!(self, CopyStatus::Borrowed(holder) if holder == student)
    }
}

impl FromStr for CopyStatus {
    type Err = LibraryError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s == Self::SHELF_SENTINEL {
            Ok(CopyStatus::OnShelf)
        } else {
            s.parse().map(CopyStatus::Borrowed)
        }
    }
}

impl fmt::Display for CopyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CopyStatus::OnShelf => f.write_str(Self::SHELF_SENTINEL),
            CopyStatus::Borrowed(id) => write!(f, "{}", id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Copy {
    pub label: CopyLabel,
    pub status: CopyStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub title: String,
    pub isbn: Isbn,
    pub quantity: u32,
    pub copies: Vec<Copy>,
}

impl Book {
    /// Creates a book with `quantity` copies, all on the shelf.
    pub fn new(title: String, isbn: Isbn, quantity: u32) -> Self {
        let copies = (1..=quantity)
            .map(|seq| Copy {
                label: CopyLabel::new(&isbn, seq),
                status: CopyStatus::OnShelf,
            })
            .collect();
        Self {
            title,
            isbn,
            quantity,
            copies,
        }
    }

    pub fn on_shelf(&self) -> impl Iterator<Item = &Copy> {
        self.copies.iter().filter(|c| c.status.is_on_shelf())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoanKind {
    Loan,
    Return,
}

impl LoanKind {
    pub fn code(self) -> u8 {
        match self {
            LoanKind::Loan => 0,
            LoanKind::Return => 1,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(LoanKind::Loan),
            1 => Some(LoanKind::Return),
            _ => None,
        }
    }
}

impl fmt::Display for LoanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoanKind::Loan => f.write_str("LOAN"),
            LoanKind::Return => f.write_str("RETURN"),
        }
    }
}

/// One circulation event. Never mutated once logged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanRecord {
    pub student: StudentId,
    pub label: CopyLabel,
    pub kind: LoanKind,
    pub date: Date,
}

impl LoanRecord {
    pub fn loan(student: StudentId, label: CopyLabel, date: Date) -> Self {
        Self {
            student,
            label,
            kind: LoanKind::Loan,
            date,
        }
    }

    pub fn returned(student: StudentId, label: CopyLabel, date: Date) -> Self {
        Self {
            student,
            label,
            kind: LoanKind::Return,
            date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: u32,
    pub first_name: String,
    pub last_name: String,
}

impl Author {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Target of a book-author link. `Removed` keeps the ISBN history after the
/// author is deleted or replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthorRef {
    Author(u32),
    Removed,
}

impl AuthorRef {
    pub const REMOVED_SENTINEL: i64 = -1;

    pub fn author_id(self) -> Option<u32> {
        match self {
            AuthorRef::Author(id) => Some(id),
            AuthorRef::Removed => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookAuthorLink {
    pub isbn: Isbn,
    pub author: AuthorRef,
}

/// Every collection the application works with, owned in one place.
///
/// Loaded once via [`crate::store::DataStore::load_all`] and handed to the
/// commands by reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Library {
    pub students: Vec<Student>,
    pub books: Vec<Book>,
    pub loans: Vec<LoanRecord>,
    /// Sorted by id.
    pub authors: Vec<Author>,
    pub links: Vec<BookAuthorLink>,
}

impl Library {
    pub fn student(&self, id: &StudentId) -> Option<&Student> {
        self.students.iter().find(|s| &s.id == id)
    }

    pub fn student_mut(&mut self, id: &StudentId) -> Option<&mut Student> {
        self.students.iter_mut().find(|s| &s.id == id)
    }

    pub fn book(&self, isbn: &Isbn) -> Option<&Book> {
        self.books.iter().find(|b| &b.isbn == isbn)
    }

    pub fn book_mut(&mut self, isbn: &Isbn) -> Option<&mut Book> {
        self.books.iter_mut().find(|b| &b.isbn == isbn)
    }

    pub fn copy(&self, label: &CopyLabel) -> Option<&Copy> {
        self.books
            .iter()
            .flat_map(|b| b.copies.iter())
            .find(|c| &c.label == label)
    }

    pub fn copy_mut(&mut self, label: &CopyLabel) -> Option<&mut Copy> {
        self.books
            .iter_mut()
            .flat_map(|b| b.copies.iter_mut())
            .find(|c| &c.label == label)
    }

    pub fn author(&self, id: u32) -> Option<&Author> {
        self.authors
            .binary_search_by_key(&id, |a| a.id)
            .ok()
            .and_then(|pos| self.authors.get(pos))
    }

    pub fn author_mut(&mut self, id: u32) -> Option<&mut Author> {
        match self.authors.binary_search_by_key(&id, |a| a.id) {
            Ok(pos) => self.authors.get_mut(pos),
            Err(_) => None,
        }
    }

    pub fn next_author_id(&self) -> u32 {
        self.authors.iter().map(|a| a.id).max().unwrap_or(0) + 1
    }

    /// Inserts keeping the list sorted by id.
    pub fn insert_author(&mut self, author: Author) {
        let pos = self.authors.partition_point(|a| a.id < author.id);
        self.authors.insert(pos, author);
    }

    /// Active (non-removed) authors linked to `isbn`, in link order.
    pub fn authors_of(&self, isbn: &Isbn) -> Vec<&Author> {
        self.links
            .iter()
            .filter(|l| &l.isbn == isbn)
            .filter_map(|l| l.author.author_id())
            .filter_map(|id| self.author(id))
            .collect()
    }

    /// Books reachable from active links to `author_id`, in link order.
    pub fn books_by(&self, author_id: u32) -> Vec<&Book> {
        self.links
            .iter()
            .filter(|l| l.author == AuthorRef::Author(author_id))
            .filter_map(|l| self.book(&l.isbn))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn isbn(s: &str) -> Isbn {
        s.parse().unwrap()
    }

    #[test]
    fn student_id_requires_eight_digits() {
        assert!("10000001".parse::<StudentId>().is_ok());
        assert!("1000001".parse::<StudentId>().is_err());
        assert!("1000000a".parse::<StudentId>().is_err());
    }

    #[test]
    fn isbn_requires_thirteen_digits() {
        assert!("1234567890123".parse::<Isbn>().is_ok());
        assert!("123456789012".parse::<Isbn>().is_err());
        assert!("123456789012X".parse::<Isbn>().is_err());
    }

    #[test]
    fn new_book_creates_labeled_copies_on_shelf() {
        let book = Book::new("Dune".into(), isbn("1234567890123"), 3);
        let labels: Vec<_> = book.copies.iter().map(|c| c.label.to_string()).collect();
        assert_eq!(
            labels,
            vec!["1234567890123_1", "1234567890123_2", "1234567890123_3"]
        );
        assert!(book.copies.iter().all(|c| c.status.is_on_shelf()));
    }

    #[test]
    fn penalty_floors_at_zero() {
        let mut s = Student::new("10000001".parse().unwrap(), "A".into(), "B".into());
        s.points = 5;
        s.apply_late_penalty();
        assert_eq!(s.points, 0);
        s.apply_late_penalty();
        assert_eq!(s.points, 0);
    }

    #[test]
    fn copy_status_round_trips_through_text() {
        let held: CopyStatus = "10000001".parse().unwrap();
        assert!(held.is_held_by(&"10000001".parse().unwrap()));
        assert_eq!("ON_SHELF".parse::<CopyStatus>().unwrap(), CopyStatus::OnShelf);
        assert!("someone".parse::<CopyStatus>().is_err());
    }

    #[test]
    fn authors_stay_sorted_on_insert() {
        let mut lib = Library::default();
        for id in [3, 1, 2] {
            lib.insert_author(Author {
                id,
                first_name: "F".into(),
                last_name: "L".into(),
            });
        }
        let ids: Vec<_> = lib.authors.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(lib.next_author_id(), 4);
        assert_eq!(lib.author(2).map(|a| a.id), Some(2));
    }

    #[test]
    fn validate_field_rejects_delimiters() {
        assert!(validate_field("name", "Ada").is_ok());
        assert!(validate_field("name", "Ada, Countess").is_err());
        assert!(validate_field("name", "  ").is_err());
    }
}
