//! Read-only reports over loan history and current copy state.
//!
//! The history-based reports all pair records through
//! [`pair_loans`](super::history::pair_loans). The penalized-students report is
//! reconstructed from history alone and may disagree with stored balances if
//! points were edited by hand; each is authoritative for its own purpose.

use crate::commands::history::pair_loans;
use crate::commands::{CmdMessage, CmdResult};
use crate::date::Date;
use crate::error::Result;
use crate::model::{CopyLabel, Isbn, Library, Student, StudentId, LATE_THRESHOLD_DAYS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutstandingLoan {
    pub label: CopyLabel,
    pub since: Date,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnreturnedEntry {
    pub student: Student,
    pub outstanding: Vec<OutstandingLoan>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverdueStatus {
    ReturnedLate { returned: Date },
    Outstanding,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverdueEntry {
    pub student: StudentId,
    pub label: CopyLabel,
    pub loaned: Date,
    pub days: i64,
    pub status: OverdueStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PenalizedEntry {
    pub student: Student,
    pub label: CopyLabel,
    pub loaned: Date,
    pub returned: Date,
    pub days: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShelfEntry {
    pub title: String,
    pub isbn: Isbn,
    pub label: CopyLabel,
}

/// Students, in directory order, with at least one loan still open.
pub fn unreturned(lib: &Library) -> Result<CmdResult> {
    let pairs = pair_loans(&lib.loans);
    let entries: Vec<UnreturnedEntry> = lib
        .students
        .iter()
        .filter_map(|student| {
            let outstanding: Vec<OutstandingLoan> = pairs
                .iter()
                .filter(|p| p.is_open() && p.loan.student == student.id)
                .map(|p| OutstandingLoan {
                    label: p.loan.label.clone(),
                    since: p.loan.date,
                })
                .collect();
            (!outstanding.is_empty()).then(|| UnreturnedEntry {
                student: student.clone(),
                outstanding,
            })
        })
        .collect();

    let mut result = CmdResult::default();
    if entries.is_empty() {
        result.add_message(CmdMessage::info("No students with unreturned books."));
    }
    result.unreturned = entries;
    Ok(result)
}

/// Loans, in log order, that went past the threshold: returned late, or still
/// out as of `today`.
pub fn overdue(lib: &Library, today: Date) -> Result<CmdResult> {
    let entries: Vec<OverdueEntry> = pair_loans(&lib.loans)
        .into_iter()
        .filter_map(|pair| {
            let days = pair.days_out(today);
            (days > LATE_THRESHOLD_DAYS).then(|| OverdueEntry {
                student: pair.loan.student.clone(),
                label: pair.loan.label.clone(),
                loaned: pair.loan.date,
                days,
                status: match pair.returned {
                    Some(r) => OverdueStatus::ReturnedLate { returned: r.date },
                    None => OverdueStatus::Outstanding,
                },
            })
        })
        .collect();

    let mut result = CmdResult::default();
    if entries.is_empty() {
        result.add_message(CmdMessage::info("No overdue books."));
    }
    result.overdue = entries;
    Ok(result)
}

/// Every late return in history, for students still in the directory.
pub fn penalized(lib: &Library) -> Result<CmdResult> {
    let entries: Vec<PenalizedEntry> = pair_loans(&lib.loans)
        .into_iter()
        .filter_map(|pair| {
            let returned = pair.returned?;
            let days = crate::date::days_between(pair.loan.date, returned.date);
            if days <= LATE_THRESHOLD_DAYS {
                return None;
            }
            let student = lib.student(&pair.loan.student)?;
            Some(PenalizedEntry {
                student: student.clone(),
                label: pair.loan.label.clone(),
                loaned: pair.loan.date,
                returned: returned.date,
                days,
            })
        })
        .collect();

    let mut result = CmdResult::default();
    if entries.is_empty() {
        result.add_message(CmdMessage::info("No penalized students."));
    }
    result.penalized = entries;
    Ok(result)
}

/// Every copy currently on the shelf, in catalog order.
pub fn on_shelf(lib: &Library) -> Result<CmdResult> {
    let shelf: Vec<ShelfEntry> = lib
        .books
        .iter()
        .flat_map(|book| {
            book.on_shelf().map(move |copy| ShelfEntry {
                title: book.title.clone(),
                isbn: book.isbn.clone(),
                label: copy.label.clone(),
            })
        })
        .collect();

    let mut result = CmdResult::default();
    if shelf.is_empty() {
        result.add_message(CmdMessage::info("No books on the shelf."));
    }
    result.shelf = shelf;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{borrow, return_copy};
    use crate::model::LoanKind::{Loan, Return};
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::DataStore;

    const S1: &str = "10000001";
    const S2: &str = "10000002";
    const L1: &str = "1234567890123_1";
    const L2: &str = "1234567890123_2";

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    fn base() -> StoreFixture {
        StoreFixture::new()
            .with_student(S1, 100)
            .with_student(S2, 100)
            .with_book("Dune", "1234567890123", 2)
    }

    #[test]
    fn unreturned_lists_students_with_open_loans() {
        let lib = base()
            .with_record(S1, L1, Loan, "01-01-2024")
            .with_record(S2, L2, Loan, "02-01-2024")
            .with_record(S2, L2, Return, "03-01-2024")
            .store()
            .load_all()
            .unwrap();

        let result = unreturned(&lib).unwrap();
        assert_eq!(result.unreturned.len(), 1);
        let entry = &result.unreturned[0];
        assert_eq!(entry.student.id.as_str(), S1);
        assert_eq!(entry.outstanding[0].label.as_str(), L1);
        assert_eq!(entry.outstanding[0].since, date("01-01-2024"));
    }

    #[test]
    fn reborrow_after_return_is_still_unreturned() {
        // A scan for "any return of this label" would hide the second loan.
        let lib = base()
            .with_record(S1, L1, Loan, "01-01-2024")
            .with_record(S1, L1, Return, "03-01-2024")
            .with_record(S1, L1, Loan, "04-01-2024")
            .store()
            .load_all()
            .unwrap();

        let result = unreturned(&lib).unwrap();
        assert_eq!(result.unreturned.len(), 1);
        assert_eq!(result.unreturned[0].outstanding.len(), 1);
        assert_eq!(result.unreturned[0].outstanding[0].since, date("04-01-2024"));
    }

    #[test]
    fn unreturned_empty_has_message() {
        let lib = base().store().load_all().unwrap();
        let result = unreturned(&lib).unwrap();
        assert!(result.unreturned.is_empty());
        assert_eq!(result.messages.len(), 1);
    }

    #[test]
    fn overdue_reports_late_returns_and_open_loans() {
        let lib = base()
            .with_record(S1, L1, Loan, "01-01-2024")
            .with_record(S1, L1, Return, "20-01-2024")
            .with_record(S2, L2, Loan, "01-02-2024")
            .with_record(S1, L1, Loan, "25-01-2024")
            .with_record(S1, L1, Return, "30-01-2024")
            .store()
            .load_all()
            .unwrap();

        let result = overdue(&lib, date("01-03-2024")).unwrap();
        assert_eq!(result.overdue.len(), 2);

        let late = &result.overdue[0];
        assert_eq!(late.student.as_str(), S1);
        assert_eq!(late.days, 19);
        assert_eq!(
            late.status,
            OverdueStatus::ReturnedLate {
                returned: date("20-01-2024")
            }
        );

        let open = &result.overdue[1];
        assert_eq!(open.student.as_str(), S2);
        assert_eq!(open.days, 29);
        assert_eq!(open.status, OverdueStatus::Outstanding);
    }

    #[test]
    fn recent_open_loan_is_not_overdue() {
        let lib = base()
            .with_record(S1, L1, Loan, "01-01-2024")
            .store()
            .load_all()
            .unwrap();
        let result = overdue(&lib, date("16-01-2024")).unwrap();
        assert!(result.overdue.is_empty());
        let result = overdue(&lib, date("17-01-2024")).unwrap();
        assert_eq!(result.overdue.len(), 1);
    }

    #[test]
    fn penalized_reconstructs_late_returns_from_history() {
        let lib = base()
            .with_record(S1, L1, Loan, "01-01-2024")
            .with_record(S1, L1, Return, "20-01-2024")
            .with_record(S2, L2, Loan, "01-01-2024")
            .with_record(S2, L2, Return, "10-01-2024")
            .store()
            .load_all()
            .unwrap();

        let result = penalized(&lib).unwrap();
        assert_eq!(result.penalized.len(), 1);
        let entry = &result.penalized[0];
        assert_eq!(entry.student.id.as_str(), S1);
        assert_eq!(entry.days, 19);
        // Stored balance is not consulted.
        assert_eq!(entry.student.points, 100);
    }

    #[test]
    fn penalized_pairs_each_cycle_separately() {
        // First-match pairing would measure the second return against the
        // first loan and report 29 days.
        let lib = base()
            .with_record(S1, L1, Loan, "01-01-2024")
            .with_record(S1, L1, Return, "05-01-2024")
            .with_record(S1, L1, Loan, "25-01-2024")
            .with_record(S1, L1, Return, "30-01-2024")
            .store()
            .load_all()
            .unwrap();
        assert!(penalized(&lib).unwrap().penalized.is_empty());
    }

    #[test]
    fn penalized_skips_removed_students() {
        let lib = StoreFixture::new()
            .with_book("Dune", "1234567890123", 1)
            .with_record(S1, L1, Loan, "01-01-2024")
            .with_record(S1, L1, Return, "20-01-2024")
            .store()
            .load_all()
            .unwrap();
        assert!(penalized(&lib).unwrap().penalized.is_empty());
    }

    #[test]
    fn reports_agree_with_return_processing() {
        let mut store = base().store();
        let mut lib = store.load_all().unwrap();
        let s1 = S1.parse().unwrap();
        let isbn = "1234567890123".parse().unwrap();

        borrow::run(&mut lib, &mut store, &s1, &isbn, date("01-01-2024")).unwrap();
        let label = L1.parse().unwrap();
        return_copy::run(&mut lib, &mut store, &s1, &label, date("20-01-2024")).unwrap();
        assert_eq!(lib.students[0].points, 90);

        let result = penalized(&lib).unwrap();
        assert_eq!(result.penalized.len(), 1);
        assert_eq!(result.penalized[0].days, 19);
        assert!(unreturned(&lib).unwrap().unreturned.is_empty());
    }

    #[test]
    fn shelf_lists_only_free_copies() {
        let lib = base().with_holder(L1, S1).store().load_all().unwrap();
        let result = on_shelf(&lib).unwrap();
        assert_eq!(result.shelf.len(), 1);
        assert_eq!(result.shelf[0].label.as_str(), L2);
        assert_eq!(result.shelf[0].title, "Dune");
    }
}
