use crate::commands::{persist, CmdMessage, CmdResult};
use crate::date::Date;
use crate::error::{LibraryError, Result};
use crate::model::{CopyLabel, CopyStatus, Isbn, Library, LoanRecord, StudentId};
use crate::store::DataStore;
use log::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorrowOutcome {
    pub student: StudentId,
    pub label: CopyLabel,
    pub date: Date,
}

/// Lends the first on-shelf copy of `isbn` to `student`.
///
/// Checks, in order: the student exists, has points left, the book exists and
/// has a copy on the shelf. The first failing check is returned and nothing
/// is changed.
pub fn run<S: DataStore>(
    lib: &mut Library,
    store: &mut S,
    student: &StudentId,
    isbn: &Isbn,
    date: Date,
) -> Result<CmdResult> {
    let holder = lib
        .student(student)
        .ok_or_else(|| LibraryError::StudentNotFound(student.to_string()))?;
    if holder.points == 0 {
        return Err(LibraryError::InsufficientPoints {
            student: student.to_string(),
            points: holder.points,
        });
    }

    let book = lib
        .book_mut(isbn)
        .ok_or_else(|| LibraryError::BookNotFound(isbn.to_string()))?;
    // Always the first free copy in list order, so selection is deterministic.
    let copy = book
        .copies
        .iter_mut()
        .find(|c| c.status.is_on_shelf())
        .ok_or_else(|| LibraryError::NoCopiesAvailable(isbn.to_string()))?;

    copy.status = CopyStatus::Borrowed(student.clone());
    let label = copy.label.clone();
    lib.loans
        .push(LoanRecord::loan(student.clone(), label.clone(), date));

    let mut result = CmdResult::default();
    persist(&mut result, "loans", store.save_loans(&lib.loans));
    persist(&mut result, "books", store.save_books(&lib.books));

    debug!(
        "event=borrow student={} label={} date={}",
        student, label, date
    );
    result.add_message(CmdMessage::success(format!(
        "Book {} successfully borrowed by {}.",
        label, student
    )));
    result.borrowed = Some(BorrowOutcome {
        student: student.clone(),
        label,
        date,
    });
    Ok(result)
}
