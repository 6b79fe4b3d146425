use super::{codec, DataStore};
use crate::config::LibraryConfig;
use crate::error::{LibraryError, Result};
use crate::model::{Author, Book, BookAuthorLink, Library, LoanRecord, Student};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

pub struct FileStore {
    root: PathBuf,
    config: LibraryConfig,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            config: LibraryConfig::default(),
        }
    }

    pub fn with_config(mut self, config: LibraryConfig) -> Self {
        self.config = config;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(LibraryError::Io)?;
        }
        Ok(())
    }

    /// Reads a store file; a missing file reads as empty.
    fn read(&self, name: &str) -> Result<String> {
        let path = self.root.join(name);
        if !path.exists() {
            debug!("event=store_missing file={}", path.display());
            return Ok(String::new());
        }
        fs::read_to_string(path).map_err(LibraryError::Io)
    }

    /// Replaces a store file in full: write to a tmp file, then rename over.
    fn write(&self, name: &str, content: String) -> Result<()> {
        self.ensure_dir()?;
        let target = self.root.join(name);
        let tmp = self
            .root
            .join(format!(".{}.{}.tmp", name, std::process::id()));
        fs::write(&tmp, content).map_err(LibraryError::Io)?;
        if let Err(e) = fs::rename(&tmp, &target) {
            let _ = fs::remove_file(&tmp);
            return Err(LibraryError::Io(e));
        }
        debug!("event=store_saved file={}", target.display());
        Ok(())
    }
}

impl DataStore for FileStore {
    fn load_all(&self) -> Result<Library> {
        let cfg = &self.config;
        let library = Library {
            students: codec::decode_students(&cfg.students_file, &self.read(&cfg.students_file)?)?,
            books: codec::decode_books(&cfg.books_file, &self.read(&cfg.books_file)?)?,
            loans: codec::decode_loans(&cfg.loans_file, &self.read(&cfg.loans_file)?)?,
            authors: codec::decode_authors(&cfg.authors_file, &self.read(&cfg.authors_file)?)?,
            links: codec::decode_links(&cfg.links_file, &self.read(&cfg.links_file)?)?,
        };
        debug!(
            "event=store_loaded root={} students={} books={} loans={} authors={} links={}",
            self.root.display(),
            library.students.len(),
            library.books.len(),
            library.loans.len(),
            library.authors.len(),
            library.links.len()
        );
        Ok(library)
    }

    fn save_students(&mut self, students: &[Student]) -> Result<()> {
        self.write(&self.config.students_file, codec::encode_students(students))
    }

    fn save_books(&mut self, books: &[Book]) -> Result<()> {
        self.write(&self.config.books_file, codec::encode_books(books))
    }

    fn save_loans(&mut self, loans: &[LoanRecord]) -> Result<()> {
        self.write(&self.config.loans_file, codec::encode_loans(loans))
    }

    fn save_authors(&mut self, authors: &[Author]) -> Result<()> {
        self.write(&self.config.authors_file, codec::encode_authors(authors))
    }

    fn save_links(&mut self, links: &[BookAuthorLink]) -> Result<()> {
        self.write(&self.config.links_file, codec::encode_links(links))
    }
}
