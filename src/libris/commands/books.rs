use crate::commands::{persist, BookListing, CmdMessage, CmdResult};
use crate::error::{LibraryError, Result};
use crate::model::{AuthorRef, Book, BookAuthorLink, Isbn, Library};
use crate::store::DataStore;
use log::debug;

fn validate_title(title: &str) -> Result<()> {
    // The title is the trailing field of its record, so commas are fine.
    if title.trim().is_empty() || title.contains('\n') || title.contains('\r') {
        return Err(LibraryError::InvalidField {
            field: "title",
            reason: "must be a single non-empty line".to_string(),
        });
    }
    Ok(())
}

fn listing(lib: &Library, book: &Book) -> BookListing {
    BookListing {
        book: book.clone(),
        authors: lib.authors_of(&book.isbn).into_iter().cloned().collect(),
    }
}

/// Adds a book with `quantity` copies, all on the shelf.
pub fn add<S: DataStore>(
    lib: &mut Library,
    store: &mut S,
    title: &str,
    isbn: Isbn,
    quantity: u32,
) -> Result<CmdResult> {
    validate_title(title)?;
    if lib.book(&isbn).is_some() {
        return Err(LibraryError::DuplicateBook(isbn.to_string()));
    }

    let book = Book::new(title.trim().to_string(), isbn, quantity);
    debug!("event=book_add isbn={} copies={}", book.isbn, quantity);
    lib.books.push(book.clone());

    let mut result = CmdResult::default();
    persist(&mut result, "books", store.save_books(&lib.books));
    result.add_message(CmdMessage::success(format!(
        "Book added: {} ({}, {} copies)",
        book.title, book.isbn, quantity
    )));
    let listed = listing(lib, &book);
    Ok(result.with_books(vec![listed]))
}

/// Removes a book and its copies. Loan history and author links are kept.
///
/// Refused while any copy is out, so every open loan stays returnable.
pub fn delete<S: DataStore>(lib: &mut Library, store: &mut S, isbn: &Isbn) -> Result<CmdResult> {
    let pos = lib
        .books
        .iter()
        .position(|b| &b.isbn == isbn)
        .ok_or_else(|| LibraryError::BookNotFound(isbn.to_string()))?;
    let out = lib.books[pos]
        .copies
        .iter()
        .filter(|c| !c.status.is_on_shelf())
        .count();
    if out > 0 {
        return Err(LibraryError::CopiesOnLoan {
            isbn: isbn.to_string(),
            count: out,
        });
    }
    let removed = lib.books.remove(pos);
    debug!("event=book_delete isbn={}", isbn);

    let mut result = CmdResult::default();
    persist(&mut result, "books", store.save_books(&lib.books));
    result.add_message(CmdMessage::success(format!(
        "Book deleted: {} ({})",
        removed.title, isbn
    )));
    Ok(result.with_books(vec![BookListing {
        book: removed,
        authors: Vec::new(),
    }]))
}

pub fn rename<S: DataStore>(
    lib: &mut Library,
    store: &mut S,
    isbn: &Isbn,
    title: &str,
) -> Result<CmdResult> {
    validate_title(title)?;
    let book = lib
        .book_mut(isbn)
        .ok_or_else(|| LibraryError::BookNotFound(isbn.to_string()))?;
    book.title = title.trim().to_string();

    let mut result = CmdResult::default();
    persist(&mut result, "books", store.save_books(&lib.books));
    result.add_message(CmdMessage::success(format!(
        "Book title updated: {}",
        isbn
    )));
    Ok(result)
}

/// First book whose title matches exactly.
pub fn find_by_title(lib: &Library, title: &str) -> Result<CmdResult> {
    match lib.books.iter().find(|b| b.title == title.trim()) {
        Some(book) => Ok(CmdResult::default().with_books(vec![listing(lib, book)])),
        None => {
            let mut result = CmdResult::default();
            result.add_message(CmdMessage::error(format!("No book titled {}.", title)));
            Ok(result)
        }
    }
}

pub fn list(lib: &Library) -> Result<CmdResult> {
    let books: Vec<_> = lib.books.iter().map(|b| listing(lib, b)).collect();
    let mut result = CmdResult::default().with_books(books);
    if result.books.is_empty() {
        result.add_message(CmdMessage::info("No books."));
    }
    Ok(result)
}

/// Appends one book-author link.
pub fn link_author<S: DataStore>(
    lib: &mut Library,
    store: &mut S,
    isbn: &Isbn,
    author_id: u32,
) -> Result<CmdResult> {
    if lib.book(isbn).is_none() {
        return Err(LibraryError::BookNotFound(isbn.to_string()));
    }
    if lib.author(author_id).is_none() {
        return Err(LibraryError::AuthorNotFound(author_id));
    }
    lib.links.push(BookAuthorLink {
        isbn: isbn.clone(),
        author: AuthorRef::Author(author_id),
    });

    let mut result = CmdResult::default();
    persist(&mut result, "book-author links", store.save_links(&lib.links));
    result.add_message(CmdMessage::success(format!(
        "Mapping added: book {} -> author {}",
        isbn, author_id
    )));
    Ok(result)
}

/// Marks every current link of `isbn` removed, then links the given authors.
pub fn replace_authors<S: DataStore>(
    lib: &mut Library,
    store: &mut S,
    isbn: &Isbn,
    author_ids: &[u32],
) -> Result<CmdResult> {
    if lib.book(isbn).is_none() {
        return Err(LibraryError::BookNotFound(isbn.to_string()));
    }
    if let Some(missing) = author_ids.iter().find(|id| lib.author(**id).is_none()) {
        return Err(LibraryError::AuthorNotFound(*missing));
    }

    let mut result = CmdResult::default();
    let mut cleared = 0;
    for link in lib
        .links
        .iter_mut()
        .filter(|l| &l.isbn == isbn && l.author != AuthorRef::Removed)
    {
        link.author = AuthorRef::Removed;
        cleared += 1;
    }
    if cleared == 0 {
        result.add_message(CmdMessage::info(format!(
            "No existing authors found for {}.",
            isbn
        )));
    } else {
        result.add_message(CmdMessage::info(format!(
            "{} old author(s) removed for {}.",
            cleared, isbn
        )));
    }
    lib.links
        .extend(author_ids.iter().map(|id| BookAuthorLink {
            isbn: isbn.clone(),
            author: AuthorRef::Author(*id),
        }));

    persist(&mut result, "book-author links", store.save_links(&lib.links));
    result.add_message(CmdMessage::success(format!(
        "Authors for book {} updated.",
        isbn
    )));
    Ok(result)
}
