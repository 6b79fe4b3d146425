use crate::commands::history::open_loan;
use crate::commands::{persist, CmdMessage, CmdResult};
use crate::date::{days_between, Date};
use crate::error::{LibraryError, Result};
use crate::model::{CopyLabel, CopyStatus, Library, LoanRecord, StudentId, LATE_THRESHOLD_DAYS};
use crate::store::DataStore;
use log::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnOutcome {
    pub student: StudentId,
    pub label: CopyLabel,
    pub date: Date,
    /// Days since the matching loan; `None` if the history has no open loan.
    pub days_out: Option<i64>,
    pub penalty_applied: bool,
    pub points: u32,
}

/// Puts `label` back on the shelf and applies the late-return penalty.
///
/// The student must exist, the copy must exist, and the copy must currently
/// be held by this student. Nothing changes if any of these fail.
pub fn run<S: DataStore>(
    lib: &mut Library,
    store: &mut S,
    student: &StudentId,
    label: &CopyLabel,
    date: Date,
) -> Result<CmdResult> {
    if lib.student(student).is_none() {
        return Err(LibraryError::StudentNotFound(student.to_string()));
    }
    let copy = lib
        .copy(label)
        .ok_or_else(|| LibraryError::CopyNotFound(label.to_string()))?;
    if !copy.status.is_held_by(student) {
        return Err(LibraryError::NotBorrowedByStudent {
            student: student.to_string(),
            label: label.to_string(),
        });
    }

    // The latest open loan, so an older one left open is never charged.
    let days_out = open_loan(&lib.loans, student, label).map(|l| days_between(l.date, date));
    if days_out.is_none() {
        warn!(
            "event=return_without_loan student={} label={}",
            student, label
        );
    }
    let penalty_applied = days_out.is_some_and(|d| d > LATE_THRESHOLD_DAYS);

    let mut result = CmdResult::default();

    let holder = lib
        .student_mut(student)
        .ok_or_else(|| LibraryError::StudentNotFound(student.to_string()))?;
    if penalty_applied {
        holder.apply_late_penalty();
    }
    let points = holder.points;
    if penalty_applied {
        persist(&mut result, "students", store.save_students(&lib.students));
        result.add_message(CmdMessage::warning(format!(
            "Returned late ({} days). Penalty applied, {} points left.",
            days_out.unwrap_or_default(),
            points
        )));
    }

    if let Some(copy) = lib.copy_mut(label) {
        copy.status = CopyStatus::OnShelf;
    }
    lib.loans
        .push(LoanRecord::returned(student.clone(), label.clone(), date));
    persist(&mut result, "loans", store.save_loans(&lib.loans));
    persist(&mut result, "books", store.save_books(&lib.books));

    debug!(
        "event=return student={} label={} date={} days_out={:?} penalty={}",
        student, label, date, days_out, penalty_applied
    );
    result.add_message(CmdMessage::success(format!(
        "Book {} successfully returned.",
        label
    )));
    result.returned = Some(ReturnOutcome {
        student: student.clone(),
        label: label.clone(),
        date,
        days_out,
        penalty_applied,
        points,
    });
    Ok(result)
}
