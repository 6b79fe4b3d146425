//! Line codecs for the flat-file store.
//!
//! Each `encode_*` renders a whole collection; each `decode_*` parses a whole
//! file and reports the first malformed line as [`LibraryError::Parse`].
//! Blank lines are skipped on decode.

use crate::date::Date;
use crate::error::{LibraryError, Result};
use crate::model::{
    Author, AuthorRef, Book, BookAuthorLink, Copy, CopyLabel, CopyStatus, LoanKind, LoanRecord,
    Student,
};

const BOOK_TAG: &str = "B";
const COPY_TAG: &str = "C";

struct LineCtx<'a> {
    file: &'a str,
    line: usize,
}

impl LineCtx<'_> {
    fn err(&self, reason: impl Into<String>) -> LibraryError {
        LibraryError::Parse {
            file: self.file.to_string(),
            line: self.line,
            reason: reason.into(),
        }
    }

    /// Splits into exactly `n` fields; the last one keeps any further commas.
    fn fields<'l>(&self, line: &'l str, n: usize) -> Result<Vec<&'l str>> {
        let fields: Vec<&str> = line.splitn(n, ',').collect();
        if fields.len() != n {
            return Err(self.err(format!("expected {} fields, found {}", n, fields.len())));
        }
        Ok(fields)
    }

    fn parse<T: std::str::FromStr>(&self, field: &str, what: &str) -> Result<T> {
        field
            .trim()
            .parse()
            .map_err(|_| self.err(format!("invalid {}: '{}'", what, field)))
    }
}

fn lines(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim_end_matches('\r')))
        .filter(|(_, l)| !l.trim().is_empty())
}

pub fn encode_students(students: &[Student]) -> String {
    students
        .iter()
        .map(|s| {
            format!(
                "{},{},{},{}\n",
                s.id, s.first_name, s.last_name, s.points
            )
        })
        .collect()
}

pub fn decode_students(file: &str, content: &str) -> Result<Vec<Student>> {
    lines(content)
        .map(|(line, text)| {
            let ctx = LineCtx { file, line };
            let f = ctx.fields(text, 4)?;
            Ok(Student {
                id: ctx.parse(f[0], "student id")?,
                first_name: f[1].to_string(),
                last_name: f[2].to_string(),
                points: ctx.parse(f[3], "points")?,
            })
        })
        .collect()
}

pub fn encode_books(books: &[Book]) -> String {
    let mut out = String::new();
    for book in books {
        out.push_str(&format!(
            "{},{},{},{}\n",
            BOOK_TAG, book.isbn, book.quantity, book.title
        ));
        for copy in &book.copies {
            out.push_str(&format!("{},{},{}\n", COPY_TAG, copy.label, copy.status));
        }
    }
    out
}

pub fn decode_books(file: &str, content: &str) -> Result<Vec<Book>> {
    let mut books: Vec<Book> = Vec::new();
    for (line, text) in lines(content) {
        let ctx = LineCtx { file, line };
        match text.split(',').next() {
            Some(BOOK_TAG) => {
                let f = ctx.fields(text, 4)?;
                books.push(Book {
                    isbn: ctx.parse(f[1], "isbn")?,
                    quantity: ctx.parse(f[2], "quantity")?,
                    title: f[3].to_string(),
                    copies: Vec::new(),
                });
            }
            Some(COPY_TAG) => {
                let f = ctx.fields(text, 3)?;
                let copy = Copy {
                    label: ctx.parse::<CopyLabel>(f[1], "copy label")?,
                    status: ctx.parse::<CopyStatus>(f[2], "copy status")?,
                };
                books
                    .last_mut()
                    .ok_or_else(|| ctx.err("copy record before any book record"))?
                    .copies
                    .push(copy);
            }
            _ => return Err(ctx.err("unknown record tag")),
        }
    }
    Ok(books)
}

pub fn encode_loans(loans: &[LoanRecord]) -> String {
    loans
        .iter()
        .map(|l| format!("{},{},{},{}\n", l.student, l.label, l.kind.code(), l.date))
        .collect()
}

pub fn decode_loans(file: &str, content: &str) -> Result<Vec<LoanRecord>> {
    lines(content)
        .map(|(line, text)| {
            let ctx = LineCtx { file, line };
            let f = ctx.fields(text, 4)?;
            let code: u8 = ctx.parse(f[2], "record kind")?;
            let kind = LoanKind::from_code(code)
                .ok_or_else(|| ctx.err(format!("unknown record kind {}", code)))?;
            Ok(LoanRecord {
                student: ctx.parse(f[0], "student id")?,
                label: ctx.parse(f[1], "copy label")?,
                kind,
                date: ctx.parse::<Date>(f[3], "date")?,
            })
        })
        .collect()
}

pub fn encode_authors(authors: &[Author]) -> String {
    authors
        .iter()
        .map(|a| format!("{},{},{}\n", a.id, a.first_name, a.last_name))
        .collect()
}

/// Decodes authors and sorts them by id.
pub fn decode_authors(file: &str, content: &str) -> Result<Vec<Author>> {
    let mut authors = lines(content)
        .map(|(line, text)| {
            let ctx = LineCtx { file, line };
            let f = ctx.fields(text, 3)?;
            Ok(Author {
                id: ctx.parse(f[0], "author id")?,
                first_name: f[1].to_string(),
                last_name: f[2].to_string(),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    authors.sort_by_key(|a| a.id);
    Ok(authors)
}

pub fn encode_links(links: &[BookAuthorLink]) -> String {
    links
        .iter()
        .map(|l| {
            let author = match l.author {
                AuthorRef::Author(id) => i64::from(id),
                AuthorRef::Removed => AuthorRef::REMOVED_SENTINEL,
            };
            format!("{},{}\n", l.isbn, author)
        })
        .collect()
}

pub fn decode_links(file: &str, content: &str) -> Result<Vec<BookAuthorLink>> {
    lines(content)
        .map(|(line, text)| {
            let ctx = LineCtx { file, line };
            let f = ctx.fields(text, 2)?;
            let raw: i64 = ctx.parse(f[1], "author id")?;
            let author = if raw == AuthorRef::REMOVED_SENTINEL {
                AuthorRef::Removed
            } else {
                u32::try_from(raw)
                    .map(AuthorRef::Author)
                    .map_err(|_| ctx.err(format!("invalid author id: {}", raw)))?
            };
            Ok(BookAuthorLink {
                isbn: ctx.parse(f[0], "isbn")?,
                author,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Isbn;

    fn isbn(s: &str) -> Isbn {
        s.parse().unwrap()
    }

    #[test]
    fn books_keep_commas_and_underscores_in_titles() {
        let mut book = Book::new("War_and_Peace, Vol 1".into(), isbn("1234567890123"), 2);
        book.copies[1].status = CopyStatus::Borrowed("10000001".parse().unwrap());

        let text = encode_books(&[book.clone()]);
        assert_eq!(
            text,
            "B,1234567890123,2,War_and_Peace, Vol 1\n\
             C,1234567890123_1,ON_SHELF\n\
             C,1234567890123_2,10000001\n"
        );
        assert_eq!(decode_books("books.csv", &text).unwrap(), vec![book]);
    }

    #[test]
    fn copy_before_book_is_a_parse_error() {
        let err = decode_books("books.csv", "C,1234567890123_1,ON_SHELF\n").unwrap_err();
        assert!(matches!(err, LibraryError::Parse { line: 1, .. }));
    }

    #[test]
    fn loans_use_numeric_kind_codes() {
        let text = "10000001,1234567890123_1,0,01-01-2024\n10000001,1234567890123_1,1,20-01-2024\n";
        let loans = decode_loans("loans.csv", text).unwrap();
        assert_eq!(loans.len(), 2);
        assert_eq!(loans[0].kind, LoanKind::Loan);
        assert_eq!(loans[1].kind, LoanKind::Return);
        assert_eq!(encode_loans(&loans), text);
    }

    #[test]
    fn unknown_loan_kind_reports_line() {
        let text = "10000001,1234567890123_1,0,01-01-2024\n10000001,1234567890123_1,7,02-01-2024\n";
        let err = decode_loans("loans.csv", text).unwrap_err();
        assert!(matches!(err, LibraryError::Parse { line: 2, .. }));
    }

    #[test]
    fn removed_links_use_sentinel() {
        let links = vec![
            BookAuthorLink {
                isbn: isbn("1234567890123"),
                author: AuthorRef::Author(4),
            },
            BookAuthorLink {
                isbn: isbn("1234567890123"),
                author: AuthorRef::Removed,
            },
        ];
        let text = encode_links(&links);
        assert_eq!(text, "1234567890123,4\n1234567890123,-1\n");
        assert_eq!(decode_links("book_authors.csv", &text).unwrap(), links);
    }

    #[test]
    fn authors_are_sorted_on_load() {
        let authors = decode_authors("authors.csv", "3,C,C\n1,A,A\n\n2,B,B\n").unwrap();
        let ids: Vec<_> = authors.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn students_reject_bad_points() {
        let err = decode_students("students.csv", "10000001,Ada,Lovelace,lots\n").unwrap_err();
        assert!(matches!(err, LibraryError::Parse { line: 1, .. }));
    }
}
