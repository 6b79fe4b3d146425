use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "libris", version)]
#[command(about = "Library records: students, books, copies and loans", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding the data files
    #[arg(long, global = true, env = "LIBRIS_HOME")]
    pub data_dir: Option<PathBuf>,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Lend the first available copy of a book
    #[command(alias = "b")]
    Borrow {
        /// Student id (8 digits)
        student: String,
        /// Book ISBN (13 digits)
        isbn: String,
        /// Loan date, DD-MM-YYYY (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Take a borrowed copy back
    #[command(alias = "r")]
    Return {
        /// Student id (8 digits)
        student: String,
        /// Copy label (e.g. 9780441013593_1)
        label: String,
        /// Return date, DD-MM-YYYY (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Student directory and student reports
    #[command(alias = "s")]
    Student {
        #[command(subcommand)]
        action: StudentCommands,
    },

    /// Author directory
    #[command(alias = "a")]
    Author {
        #[command(subcommand)]
        action: AuthorCommands,
    },

    /// Book catalog and book reports
    Book {
        #[command(subcommand)]
        action: BookCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum StudentCommands {
    /// Add a student (starts with 100 points)
    Add {
        id: String,
        first_name: String,
        last_name: String,
    },

    /// Delete a student
    #[command(alias = "rm")]
    Delete { id: String },

    /// Change a student's name
    Update {
        id: String,
        first_name: String,
        last_name: String,
    },

    /// Show a student with their loan history
    Show { id: String },

    /// List all students
    #[command(alias = "ls")]
    List,

    /// Students who still hold a borrowed copy
    Unreturned,

    /// Students with late returns in their history
    Penalized,
}

#[derive(Subcommand, Debug)]
pub enum AuthorCommands {
    /// Add an author (id is assigned)
    Add { first_name: String, last_name: String },

    /// Delete an author, keeping their book links as removed
    #[command(alias = "rm")]
    Delete { id: u32 },

    /// Change an author's name
    Update {
        id: u32,
        first_name: String,
        last_name: String,
    },

    /// Show an author, by first name, with their books
    Show { first_name: String },

    /// List all authors
    #[command(alias = "ls")]
    List,
}

#[derive(Subcommand, Debug)]
pub enum BookCommands {
    /// Add a book and its copies
    Add {
        title: String,
        isbn: String,
        /// Number of copies
        quantity: u32,
    },

    /// Delete a book and its copies
    #[command(alias = "rm")]
    Delete { isbn: String },

    /// Change a book's title
    Rename { isbn: String, title: String },

    /// Show a book by exact title
    Find { title: String },

    /// List copies currently on the shelf
    Shelf,

    /// List all books with copies and authors
    #[command(alias = "ls")]
    List,

    /// Loans that were returned late or are still out too long
    Overdue {
        /// Reference date, DD-MM-YYYY (defaults to today)
        #[arg(long)]
        today: Option<String>,
    },

    /// Link an author to a book
    Link { isbn: String, author_id: u32 },

    /// Replace all authors of a book
    Relink {
        isbn: String,
        #[arg(num_args = 0..)]
        author_ids: Vec<u32>,
    },
}
