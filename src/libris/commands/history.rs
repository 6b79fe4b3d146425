//! Reconstructs loan/return pairs from the flat history log.
//!
//! Records carry no link between a loan and its return, so pairing is done by
//! scanning. One policy is used everywhere: per (student, label), each return
//! closes the most recent still-open loan. An older loan left open (history
//! written before a copy was re-created, or edited by hand) stays outstanding
//! and is never charged against a later cycle. Return processing and every
//! report go through [`pair_loans`], so they can never disagree about which
//! loan a return belongs to.

use crate::date::{days_between, Date};
use crate::model::{CopyLabel, LoanKind, LoanRecord, StudentId};
use log::debug;
use std::collections::HashMap;

/// A loan and, if it has been closed, the return that closed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoanPair<'a> {
    pub loan: &'a LoanRecord,
    pub returned: Option<&'a LoanRecord>,
}

impl LoanPair<'_> {
    pub fn is_open(&self) -> bool {
        self.returned.is_none()
    }

    /// Days the copy was out: until the return, or until `today` if still open.
    pub fn days_out(&self, today: Date) -> i64 {
        let end = self.returned.map(|r| r.date).unwrap_or(today);
        days_between(self.loan.date, end)
    }
}

/// Pairs every loan with its return. Output is in loan log order.
///
/// Returns with no open loan to close are skipped.
pub fn pair_loans(records: &[LoanRecord]) -> Vec<LoanPair<'_>> {
    let mut pairs: Vec<LoanPair<'_>> = Vec::new();
    let mut open: HashMap<(&StudentId, &CopyLabel), Vec<usize>> = HashMap::new();

    for record in records {
        let key = (&record.student, &record.label);
        match record.kind {
            LoanKind::Loan => {
                open.entry(key).or_default().push(pairs.len());
                pairs.push(LoanPair {
                    loan: record,
                    returned: None,
                });
            }
            LoanKind::Return => {
                let idx = open.get_mut(&key).and_then(Vec::pop);
                match idx.and_then(|i| pairs.get_mut(i)) {
                    Some(pair) => pair.returned = Some(record),
                    None => debug!(
                        "event=orphan_return student={} label={} date={}",
                        record.student, record.label, record.date
                    ),
                }
            }
        }
    }

    pairs
}

/// The loan a return of `label` by `student` would close right now: the
/// latest one still open.
pub fn open_loan<'a>(
    records: &'a [LoanRecord],
    student: &StudentId,
    label: &CopyLabel,
) -> Option<&'a LoanRecord> {
    pair_loans(records)
        .into_iter()
        .rev()
        .find(|p| p.is_open() && &p.loan.student == student && &p.loan.label == label)
        .map(|p| p.loan)
}
