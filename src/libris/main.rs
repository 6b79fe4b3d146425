use clap::Parser;
use colored::*;
use directories::ProjectDirs;
use libris::api::{CmdMessage, LibraryApi, MessageLevel};
use libris::commands::{BookListing, OverdueEntry, OverdueStatus, PenalizedEntry, UnreturnedEntry};
use libris::config::LibraryConfig;
use libris::error::Result;
use libris::logging::init_logging;
use libris::model::{Author, LoanRecord, Student};
use libris::store::fs::FileStore;
use std::path::PathBuf;
use unicode_width::UnicodeWidthStr;

mod args;
use args::{AuthorCommands, BookCommands, Cli, Commands, StudentCommands};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let data_dir = resolve_data_dir(cli.data_dir.clone());
    let config = LibraryConfig::load(&data_dir)?;

    let level = if cli.verbose { "debug" } else { config.log_level.as_str() };
    let _logger = match init_logging(level) {
        Ok(handle) => Some(handle),
        Err(e) => {
            eprintln!("Warning: logging disabled: {}", e);
            None
        }
    };

    let store = FileStore::new(data_dir).with_config(config);
    let mut api = LibraryApi::open(store)?;

    match cli.command {
        Commands::Borrow {
            student,
            isbn,
            date,
        } => {
            let result = api.borrow(&student, &isbn, date.as_deref())?;
            print_messages(&result.messages);
        }
        Commands::Return {
            student,
            label,
            date,
        } => {
            let result = api.return_copy(&student, &label, date.as_deref())?;
            print_messages(&result.messages);
        }
        Commands::Student { action } => handle_student(&mut api, action)?,
        Commands::Author { action } => handle_author(&mut api, action)?,
        Commands::Book { action } => handle_book(&mut api, action)?,
    }
    Ok(())
}

fn resolve_data_dir(flag: Option<PathBuf>) -> PathBuf {
    flag.unwrap_or_else(|| {
        ProjectDirs::from("com", "libris", "libris")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".libris"))
    })
}

fn handle_student(api: &mut LibraryApi<FileStore>, action: StudentCommands) -> Result<()> {
    let result = match action {
        StudentCommands::Add {
            id,
            first_name,
            last_name,
        } => api.add_student(&id, &first_name, &last_name)?,
        StudentCommands::Delete { id } => api.delete_student(&id)?,
        StudentCommands::Update {
            id,
            first_name,
            last_name,
        } => api.update_student(&id, &first_name, &last_name)?,
        StudentCommands::Show { id } => {
            let result = api.show_student(&id)?;
            if let Some(student) = result.students.first() {
                print_student_card(student, &result.history);
            }
            result
        }
        StudentCommands::List => {
            let result = api.list_students()?;
            print_students(&result.students);
            result
        }
        StudentCommands::Unreturned => {
            let result = api.unreturned()?;
            print_unreturned(&result.unreturned);
            result
        }
        StudentCommands::Penalized => {
            let result = api.penalized()?;
            print_penalized(&result.penalized);
            result
        }
    };
    print_messages(&result.messages);
    Ok(())
}

fn handle_author(api: &mut LibraryApi<FileStore>, action: AuthorCommands) -> Result<()> {
    let result = match action {
        AuthorCommands::Add {
            first_name,
            last_name,
        } => api.add_author(&first_name, &last_name)?,
        AuthorCommands::Delete { id } => api.delete_author(id)?,
        AuthorCommands::Update {
            id,
            first_name,
            last_name,
        } => api.update_author(id, &first_name, &last_name)?,
        AuthorCommands::Show { first_name } => {
            let result = api.show_author(&first_name)?;
            if let Some(author) = result.authors.first() {
                println!("Author ID: {}", author.id);
                println!("Name: {}", author.full_name().bold());
                println!("Books by this author:");
                for listing in &result.books {
                    println!("- {} (ISBN: {})", listing.book.title, listing.book.isbn);
                }
            }
            result
        }
        AuthorCommands::List => {
            let result = api.list_authors()?;
            print_authors(&result.authors);
            result
        }
    };
    print_messages(&result.messages);
    Ok(())
}

fn handle_book(api: &mut LibraryApi<FileStore>, action: BookCommands) -> Result<()> {
    let result = match action {
        BookCommands::Add {
            title,
            isbn,
            quantity,
        } => api.add_book(&title, &isbn, quantity)?,
        BookCommands::Delete { isbn } => api.delete_book(&isbn)?,
        BookCommands::Rename { isbn, title } => api.rename_book(&isbn, &title)?,
        BookCommands::Find { title } => {
            let result = api.find_book(&title)?;
            print_books(&result.books);
            result
        }
        BookCommands::Shelf => {
            let result = api.books_on_shelf()?;
            for entry in &result.shelf {
                println!("Book: {} | Copy: {}", entry.title.bold(), entry.label);
            }
            result
        }
        BookCommands::List => {
            let result = api.list_books()?;
            print_books(&result.books);
            result
        }
        BookCommands::Overdue { today } => {
            let result = api.overdue(today.as_deref())?;
            print_overdue(&result.overdue);
            result
        }
        BookCommands::Link { isbn, author_id } => api.link_author(&isbn, author_id)?,
        BookCommands::Relink { isbn, author_ids } => api.replace_authors(&isbn, &author_ids)?,
    };
    print_messages(&result.messages);
    Ok(())
}

fn print_unreturned(entries: &[UnreturnedEntry]) {
    for entry in entries {
        let labels: Vec<String> = entry
            .outstanding
            .iter()
            .map(|o| format!("{} (since {})", o.label, o.since))
            .collect();
        println!(
            "ID: {} | {} | {}",
            entry.student.id,
            pad(&entry.student.full_name(), NAME_WIDTH),
            labels.join(", ")
        );
    }
}

fn print_overdue(entries: &[OverdueEntry]) {
    for entry in entries {
        match entry.status {
            OverdueStatus::ReturnedLate { returned } => println!(
                "{} Overdue ({} days, returned {}) | Student: {}",
                entry.label,
                entry.days.to_string().red(),
                returned,
                entry.student
            ),
            OverdueStatus::Outstanding => println!(
                "{} Still not returned ({} days passed) | Student: {}",
                entry.label,
                entry.days.to_string().red(),
                entry.student
            ),
        }
    }
}

fn print_penalized(entries: &[PenalizedEntry]) {
    for entry in entries {
        println!(
            "ID: {} | {} | Late Return: {} days ({})",
            entry.student.id,
            pad(&entry.student.full_name(), NAME_WIDTH),
            entry.days.to_string().red(),
            entry.label
        );
    }
}

fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

const NAME_WIDTH: usize = 28;

/// Right-pads to a display width, so wide characters line up.
fn pad(s: &str, width: usize) -> String {
    let padding = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(padding))
}

fn print_students(students: &[Student]) {
    for s in students {
        println!(
            "ID: {} | Name: {} | Points: {}",
            s.id,
            pad(&s.full_name(), NAME_WIDTH),
            points_colored(s.points)
        );
    }
}

fn print_student_card(student: &Student, history: &[LoanRecord]) {
    println!("ID: {}", student.id.to_string().bold());
    println!("Name: {}", student.full_name());
    println!("Points: {}", points_colored(student.points));
    println!("Loan History:");
    if history.is_empty() {
        println!("  {}", "none".dimmed());
    }
    for record in history {
        println!("- {} [{}] on {}", record.label, record.kind, record.date);
    }
}

fn points_colored(points: u32) -> ColoredString {
    if points == 0 {
        points.to_string().red()
    } else {
        points.to_string().normal()
    }
}

fn print_authors(authors: &[Author]) {
    for a in authors {
        println!("ID: {:>4} | Name: {}", a.id, a.full_name());
    }
}

fn print_books(books: &[BookListing]) {
    for listing in books {
        let book = &listing.book;
        println!(
            "Book: {}, ISBN: {}, Qty: {}",
            book.title.bold(),
            book.isbn,
            book.quantity
        );
        let authors: Vec<String> = listing.authors.iter().map(Author::full_name).collect();
        if authors.is_empty() {
            println!("  Authors: {}", "None".dimmed());
        } else {
            println!("  Authors: {}", authors.join(", "));
        }
        for copy in &book.copies {
            let status = if copy.status.is_on_shelf() {
                copy.status.to_string().green()
            } else {
                copy.status.to_string().yellow()
            };
            println!("   Copy: {}, Status: {}", copy.label, status);
        }
    }
}
