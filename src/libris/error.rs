use thiserror::Error;

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("Student not found: {0}")]
    StudentNotFound(String),

    #[error("Book not found: {0}")]
    BookNotFound(String),

    #[error("Book copy not found: {0}")]
    CopyNotFound(String),

    #[error("Author not found: {0}")]
    AuthorNotFound(u32),

    #[error("Student {student} has insufficient points ({points})")]
    InsufficientPoints { student: String, points: u32 },

    #[error("All copies of {0} are currently borrowed")]
    NoCopiesAvailable(String),

    #[error("Copy {label} is not borrowed by student {student}")]
    NotBorrowedByStudent { student: String, label: String },

    #[error("Student {student} still holds {count} borrowed copy(ies)")]
    StudentHoldsCopies { student: String, count: usize },

    #[error("Book {isbn} has {count} copy(ies) on loan")]
    CopiesOnLoan { isbn: String, count: usize },

    #[error("Student already exists: {0}")]
    DuplicateStudent(String),

    #[error("Book already exists: {0}")]
    DuplicateBook(String),

    #[error("Invalid student id '{0}': expected 8 digits")]
    InvalidStudentId(String),

    #[error("Invalid ISBN '{0}': expected 13 digits")]
    InvalidIsbn(String),

    #[error("Invalid date '{0}': expected DD-MM-YYYY")]
    InvalidDate(String),

    #[error("Invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("{file}:{line}: {reason}")]
    Parse {
        file: String,
        line: usize,
        reason: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LibraryError>;
