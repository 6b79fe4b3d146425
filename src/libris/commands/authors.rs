use crate::commands::{persist, BookListing, CmdMessage, CmdResult};
use crate::error::{LibraryError, Result};
use crate::model::{validate_field, Author, AuthorRef, Library};
use crate::store::DataStore;
use log::debug;

/// Adds an author with the next free id (current max + 1).
pub fn add<S: DataStore>(
    lib: &mut Library,
    store: &mut S,
    first_name: &str,
    last_name: &str,
) -> Result<CmdResult> {
    validate_field("first name", first_name)?;
    validate_field("last name", last_name)?;

    let author = Author {
        id: lib.next_author_id(),
        first_name: first_name.trim().to_string(),
        last_name: last_name.trim().to_string(),
    };
    debug!("event=author_add id={}", author.id);
    lib.insert_author(author.clone());

    let mut result = CmdResult::default();
    persist(&mut result, "authors", store.save_authors(&lib.authors));
    result.add_message(CmdMessage::success(format!(
        "Author added: {} ({})",
        author.full_name(),
        author.id
    )));
    Ok(result.with_authors(vec![author]))
}

/// Removes the author. Links to them are kept but marked removed.
pub fn delete<S: DataStore>(lib: &mut Library, store: &mut S, id: u32) -> Result<CmdResult> {
    let pos = lib
        .authors
        .binary_search_by_key(&id, |a| a.id)
        .map_err(|_| LibraryError::AuthorNotFound(id))?;
    let removed = lib.authors.remove(pos);

    let mut sentineled = 0;
    for link in lib
        .links
        .iter_mut()
        .filter(|l| l.author == AuthorRef::Author(id))
    {
        link.author = AuthorRef::Removed;
        sentineled += 1;
    }
    debug!("event=author_delete id={} links_removed={}", id, sentineled);

    let mut result = CmdResult::default();
    if sentineled > 0 {
        persist(&mut result, "book-author links", store.save_links(&lib.links));
        result.add_message(CmdMessage::info(format!(
            "{} book link(s) marked removed for author {}.",
            sentineled, id
        )));
    }
    persist(&mut result, "authors", store.save_authors(&lib.authors));
    result.add_message(CmdMessage::success(format!(
        "Author deleted: {} ({})",
        removed.full_name(),
        id
    )));
    Ok(result.with_authors(vec![removed]))
}

pub fn update<S: DataStore>(
    lib: &mut Library,
    store: &mut S,
    id: u32,
    first_name: &str,
    last_name: &str,
) -> Result<CmdResult> {
    validate_field("first name", first_name)?;
    validate_field("last name", last_name)?;
    let author = lib
        .author_mut(id)
        .ok_or(LibraryError::AuthorNotFound(id))?;
    author.first_name = first_name.trim().to_string();
    author.last_name = last_name.trim().to_string();
    let updated = author.clone();

    let mut result = CmdResult::default();
    persist(&mut result, "authors", store.save_authors(&lib.authors));
    result.add_message(CmdMessage::success(format!("Author updated: {}", id)));
    Ok(result.with_authors(vec![updated]))
}

/// First author (by id) with this first name, and their linked books.
pub fn show(lib: &Library, first_name: &str) -> Result<CmdResult> {
    let Some(author) = lib.authors.iter().find(|a| a.first_name == first_name.trim()) else {
        let mut result = CmdResult::default();
        result.add_message(CmdMessage::error(format!(
            "No author named {}.",
            first_name
        )));
        return Ok(result);
    };
    let books = lib
        .books_by(author.id)
        .into_iter()
        .map(|book| BookListing {
            book: book.clone(),
            authors: vec![author.clone()],
        })
        .collect();
    Ok(CmdResult::default()
        .with_authors(vec![author.clone()])
        .with_books(books))
}

pub fn list(lib: &Library) -> Result<CmdResult> {
    let mut result = CmdResult::default().with_authors(lib.authors.clone());
    if result.authors.is_empty() {
        result.add_message(CmdMessage::info("No authors."));
    }
    Ok(result)
}
