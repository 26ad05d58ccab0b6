// Text rendering for the CLI. The library never formats; this module does.

use library_catalog::{
    AuditReport, Author, Book, BorrowOutcome, CatalogRegistry, Patron, ReturnOutcome,
};

pub fn book_line(registry: &CatalogRegistry, book: &Book) -> String {
    let author = book
        .author()
        .and_then(|id| registry.find_author(id))
        .map_or("(unknown)", |a| a.name.as_str());
    let due = book
        .due_date()
        .map(|d| format!(" / Due: {d}"))
        .unwrap_or_default();

    format!(
        "BOOK [ID: {} / Title: {} / Author: {} / ISBN: {} / Publisher: {} / Status: {}{} / Copies Available to Borrow: {}]",
        book.id(),
        book.title,
        author,
        book.isbn(),
        book.publisher,
        book.status(),
        due,
        registry.available_copies(book.isbn()),
    )
}

pub fn author_line(author: &Author) -> String {
    format!(
        "AUTHOR [ID: {} / Name: {} / Date of Birth: {} / Books: {}]",
        author.id(),
        author.name,
        author.date_of_birth,
        author.written_books().len(),
    )
}

pub fn patron_line(patron: &Patron) -> String {
    let c = &patron.contact;
    format!(
        "PATRON [ID: {} / Name: {} / Address: {} / City: {} / Province: {} / Postal Code: {} / Phone: {} / Borrowed: {}]",
        patron.id(),
        patron.name,
        c.address,
        c.city,
        c.province,
        c.postal_code,
        c.phone,
        patron.borrowed_count(),
    )
}

pub fn book_list(registry: &CatalogRegistry, books: &[&Book]) -> String {
    if books.is_empty() {
        return "  (no matching books)".to_string();
    }
    books
        .iter()
        .map(|b| format!("  {}", book_line(registry, b)))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn full_report(registry: &CatalogRegistry) -> String {
    let mut out = String::new();

    out.push_str("📚 BOOKS\n━━━━━━━━━━━━━━━━━━━━\n");
    for book in registry.all_books() {
        out.push_str(&format!("  {}\n", book_line(registry, book)));
    }

    out.push_str("\n✍️  AUTHORS\n━━━━━━━━━━━━━━━━━━━━\n");
    for author in registry.all_authors() {
        out.push_str(&format!("  {}\n", author_line(author)));
    }

    out.push_str("\n🪪 PATRONS\n━━━━━━━━━━━━━━━━━━━━\n");
    for patron in registry.all_patrons() {
        out.push_str(&format!("  {}\n", patron_line(patron)));
    }

    out
}

pub fn overdue_report(books: &[Book]) -> String {
    if books.is_empty() {
        return "No books are currently overdue.".to_string();
    }
    let mut out = String::from("Overdue books:\n**************\n");
    for book in books {
        let due = book.due_date().map(|d| d.to_string()).unwrap_or_default();
        out.push_str(&format!(
            "BOOK [ID: {} Title: '{}' Due: {}]\n",
            book.id(),
            book.title,
            due
        ));
    }
    out
}

pub fn borrow_message(
    registry: &CatalogRegistry,
    book: &Book,
    patron: &Patron,
    outcome: &BorrowOutcome,
) -> String {
    match outcome {
        BorrowOutcome::Borrowed { due_date } => format!(
            "✓ Book ID: {} '{}' borrowed by {} (due {}). {} cop{} of ISBN {} left on the shelf.",
            book.id(),
            book.title,
            patron.name,
            due_date,
            registry.available_copies(book.isbn()),
            if registry.available_copies(book.isbn()) == 1 { "y" } else { "ies" },
            book.isbn(),
        ),
        BorrowOutcome::Unavailable { status } => format!(
            "✗ Sorry, Book ID: {} is currently {}. Check back soon!",
            book.id(),
            status
        ),
    }
}

pub fn return_message(book: &Book, patron: &Patron, outcome: &ReturnOutcome) -> String {
    match outcome {
        ReturnOutcome::Returned => format!(
            "✓ Book ID: {} '{}' returned by {}.",
            book.id(),
            book.title,
            patron.name
        ),
        ReturnOutcome::NotHeld => format!(
            "✗ Unable to return: '{}' was not found in {}'s list of borrowed books.",
            book.title, patron.name
        ),
    }
}

/// Books currently held by `patron`, one line each
pub fn borrowed_list(registry: &CatalogRegistry, patron: &Patron, books: &[&Book]) -> String {
    if books.is_empty() {
        return format!("{} has no books borrowed.", patron.name);
    }
    let mut out = format!("{}'s borrowed books:", patron.name);
    for book in books {
        out.push_str(&format!("\n  {}", book_line(registry, book)));
    }
    out
}

pub fn audit_report(report: &AuditReport) -> String {
    let mut out = report.summary();
    for issue in &report.issues {
        out.push_str(&format!("\n  [{:?}] {}", issue.severity(), issue));
    }
    out
}
