use libris::config::LibraryConfig;
use libris::date::Date;
use libris::model::{
    Author, AuthorRef, Book, BookAuthorLink, CopyStatus, LoanRecord, Student,
};
use libris::store::fs::FileStore;
use libris::store::DataStore;

fn sample_library() -> (Vec<Student>, Vec<Book>, Vec<LoanRecord>, Vec<Author>, Vec<BookAuthorLink>) {
    let id = "12345678".parse().unwrap();
    let student = Student::new(id, "Ada".to_string(), "Lovelace".to_string());

    let mut book = Book::new(
        "Notes, Sketches_and Drafts".to_string(),
        "9780441013593".parse().unwrap(),
        2,
    );
    book.copies[0].status = CopyStatus::Borrowed(student.id.clone());
    let label = book.copies[0].label.clone();

    let loans = vec![LoanRecord::loan(
        student.id.clone(),
        label,
        Date::from_ymd(2024, 1, 1).unwrap(),
    )];
    let authors = vec![
        Author {
            id: 1,
            first_name: "Frank".to_string(),
            last_name: "Herbert".to_string(),
        },
        Author {
            id: 2,
            first_name: "Brian".to_string(),
            last_name: "Herbert".to_string(),
        },
    ];
    let links = vec![
        BookAuthorLink {
            isbn: book.isbn.clone(),
            author: AuthorRef::Author(1),
        },
        BookAuthorLink {
            isbn: book.isbn.clone(),
            author: AuthorRef::Removed,
        },
    ];
    (vec![student], vec![book], loans, authors, links)
}

#[test]
fn test_round_trip_all_collections() {
    let temp_dir = tempfile::tempdir().unwrap();
    let (students, books, loans, authors, links) = sample_library();

    let mut store = FileStore::new(temp_dir.path().to_path_buf());
    store.save_students(&students).unwrap();
    store.save_books(&books).unwrap();
    store.save_loans(&loans).unwrap();
    store.save_authors(&authors).unwrap();
    store.save_links(&links).unwrap();

    let reopened = FileStore::new(temp_dir.path().to_path_buf());
    let lib = reopened.load_all().unwrap();
    assert_eq!(lib.students, students);
    assert_eq!(lib.books, books);
    assert_eq!(lib.loans, loans);
    assert_eq!(lib.authors, authors);
    assert_eq!(lib.links, links);
    assert_eq!(lib.books[0].title, "Notes, Sketches_and Drafts");
}

#[test]
fn test_missing_files_load_empty() {
    let temp_dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(temp_dir.path().join("not-yet-created"));
    let lib = store.load_all().unwrap();
    assert!(lib.students.is_empty());
    assert!(lib.books.is_empty());
    assert!(lib.loans.is_empty());
    assert!(lib.authors.is_empty());
    assert!(lib.links.is_empty());
}

#[test]
fn test_save_leaves_no_tmp_files() {
    let temp_dir = tempfile::tempdir().unwrap();
    let (students, books, ..) = sample_library();

    let mut store = FileStore::new(temp_dir.path().to_path_buf());
    store.save_students(&students).unwrap();
    store.save_books(&books).unwrap();
    // Second save overwrites in place.
    store.save_books(&books).unwrap();

    let leftovers: Vec<_> = std::fs::read_dir(temp_dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());

    let content = std::fs::read_to_string(temp_dir.path().join("students.csv")).unwrap();
    assert_eq!(content, "12345678,Ada,Lovelace,100\n");
}

#[test]
fn test_custom_file_names_from_config() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = LibraryConfig {
        students_file: "people.txt".to_string(),
        ..LibraryConfig::default()
    };
    let (students, ..) = sample_library();

    let mut store = FileStore::new(temp_dir.path().to_path_buf()).with_config(config.clone());
    store.save_students(&students).unwrap();
    assert!(temp_dir.path().join("people.txt").exists());
    assert!(!temp_dir.path().join("students.csv").exists());

    let lib = FileStore::new(temp_dir.path().to_path_buf())
        .with_config(config)
        .load_all()
        .unwrap();
    assert_eq!(lib.students, students);
}

#[test]
fn test_corrupt_line_reports_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    std::fs::write(temp_dir.path().join("loans.csv"), "12345678,oops\n").unwrap();

    let err = FileStore::new(temp_dir.path().to_path_buf())
        .load_all()
        .unwrap_err();
    assert!(err.to_string().contains("loans.csv"));
}
