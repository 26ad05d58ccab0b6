// Interactive session over stdin: one command per line.
// Identity lookup happens here; the registry only ever sees ids.

use crate::display;
use anyhow::{anyhow, bail, Context as AnyhowContext, Result};
use chrono::NaiveDate;
use library_catalog::{audit, local_today, AuthorId, BookId, CatalogRegistry, PatronId};
use std::io::{BufRead, Write};

pub const HELP: &str = "\
Commands:
  books | authors | patrons          list the catalog
  borrow <patron> <book> [date]      lend a book (date: YYYY-MM-DD, default today)
  return <patron> <book>             take a book back
  borrowed <patron>                  list a patron's borrowed books
  delete-book <book>                 remove a copy
  delete-author <author>             remove an author and all their books
  delete-patron <patron>             remove a patron (held books become overdue)
  search title|author|isbn <text>    exact, case-insensitive search
  overdue [date]                     mark and list overdue books
  audit                              check catalog consistency
  help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchField {
    Title,
    Author,
    Isbn,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Books,
    Authors,
    Patrons,
    Borrow {
        patron: PatronId,
        book: BookId,
        on: Option<NaiveDate>,
    },
    Return {
        patron: PatronId,
        book: BookId,
    },
    Borrowed(PatronId),
    DeleteBook(BookId),
    DeleteAuthor(AuthorId),
    DeletePatron(PatronId),
    Search {
        field: SearchField,
        value: String,
    },
    Overdue(Option<NaiveDate>),
    Audit,
    Help,
    Quit,
}

fn parse_id(raw: Option<&str>, what: &str) -> Result<u64> {
    let raw = raw.ok_or_else(|| anyhow!("missing {what} id"))?;
    raw.parse::<u64>()
        .with_context(|| format!("invalid {what} id: {raw:?}"))
}

fn parse_date(raw: Option<&str>) -> Result<Option<NaiveDate>> {
    raw.map(|s| {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("invalid date (expected YYYY-MM-DD): {s:?}"))
    })
    .transpose()
}

impl ShellCommand {
    pub fn parse(line: &str) -> Result<Self> {
        let mut words = line.split_whitespace();
        let verb = words.next().unwrap_or("").to_lowercase();

        let command = match verb.as_str() {
            "books" => ShellCommand::Books,
            "authors" => ShellCommand::Authors,
            "patrons" => ShellCommand::Patrons,
            "borrow" => ShellCommand::Borrow {
                patron: PatronId(parse_id(words.next(), "patron")?),
                book: BookId(parse_id(words.next(), "book")?),
                on: parse_date(words.next())?,
            },
            "return" => ShellCommand::Return {
                patron: PatronId(parse_id(words.next(), "patron")?),
                book: BookId(parse_id(words.next(), "book")?),
            },
            "borrowed" => ShellCommand::Borrowed(PatronId(parse_id(words.next(), "patron")?)),
            "delete-book" => ShellCommand::DeleteBook(BookId(parse_id(words.next(), "book")?)),
            "delete-author" => {
                ShellCommand::DeleteAuthor(AuthorId(parse_id(words.next(), "author")?))
            }
            "delete-patron" => {
                ShellCommand::DeletePatron(PatronId(parse_id(words.next(), "patron")?))
            }
            "search" => {
                let field = match words.next().map(str::to_lowercase).as_deref() {
                    Some("title") => SearchField::Title,
                    Some("author") => SearchField::Author,
                    Some("isbn") => SearchField::Isbn,
                    other => bail!("search by title, author or isbn (got {other:?})"),
                };
                let value = words.collect::<Vec<_>>().join(" ");
                if value.is_empty() {
                    bail!("missing search text");
                }
                ShellCommand::Search { field, value }
            }
            "overdue" => ShellCommand::Overdue(parse_date(words.next())?),
            "audit" => ShellCommand::Audit,
            "help" | "?" => ShellCommand::Help,
            "quit" | "exit" | "q" => ShellCommand::Quit,
            "" => bail!("empty command"),
            other => bail!("unknown command: {other} (try 'help')"),
        };
        Ok(command)
    }
}

fn write_borrowed<W: Write>(registry: &CatalogRegistry, id: PatronId, out: &mut W) -> Result<()> {
    let books = registry.borrowed_books(id)?;
    writeln!(out, "{}", display::borrowed_list(registry, registry.patron(id)?, &books))?;
    Ok(())
}

/// Apply one command; returns false when the session should end.
pub fn execute<W: Write>(
    registry: &mut CatalogRegistry,
    command: ShellCommand,
    out: &mut W,
) -> Result<bool> {
    match command {
        ShellCommand::Books => {
            let books: Vec<_> = registry.all_books().iter().collect();
            writeln!(out, "{}", display::book_list(registry, &books))?;
        }
        ShellCommand::Authors => {
            for author in registry.all_authors() {
                writeln!(out, "  {}", display::author_line(author))?;
            }
        }
        ShellCommand::Patrons => {
            for patron in registry.all_patrons() {
                writeln!(out, "  {}", display::patron_line(patron))?;
            }
        }
        ShellCommand::Borrow { patron, book, on } => {
            let outcome = registry.borrow_book_on(patron, book, on.unwrap_or_else(local_today))?;
            let message = display::borrow_message(
                registry,
                registry.book(book)?,
                registry.patron(patron)?,
                &outcome,
            );
            writeln!(out, "{message}")?;
            write_borrowed(registry, patron, out)?;
        }
        ShellCommand::Return { patron, book } => {
            let outcome = registry.return_book(patron, book)?;
            let message =
                display::return_message(registry.book(book)?, registry.patron(patron)?, &outcome);
            writeln!(out, "{message}")?;
            write_borrowed(registry, patron, out)?;
        }
        ShellCommand::Borrowed(patron) => write_borrowed(registry, patron, out)?,
        ShellCommand::DeleteBook(id) => {
            let book = registry.delete_book(id)?;
            writeln!(out, "✓ Deleted book {} '{}'", book.id(), book.title)?;
        }
        ShellCommand::DeleteAuthor(id) => {
            let removal = registry.delete_author(id)?;
            writeln!(
                out,
                "✓ Deleted author {} and {} of their books",
                removal.author.name,
                removal.removed_books.len()
            )?;
        }
        ShellCommand::DeletePatron(id) => {
            let removal = registry.delete_patron(id)?;
            writeln!(out, "✓ Deleted patron {}", removal.patron.name)?;
            if !removal.stranded_books.is_empty() {
                let ids: Vec<String> =
                    removal.stranded_books.iter().map(|b| b.to_string()).collect();
                writeln!(out, "⚠️  Books marked overdue with no holder: {}", ids.join(", "))?;
            }
        }
        ShellCommand::Search { field, value } => {
            let hits = match field {
                SearchField::Title => registry.search_by_title(&value),
                SearchField::Author => registry.search_by_author(&value),
                SearchField::Isbn => registry.search_by_isbn(&value),
            };
            writeln!(out, "{}", display::book_list(registry, &hits))?;
        }
        ShellCommand::Overdue(on) => {
            let overdue = registry.overdue_book_list_on(on.unwrap_or_else(local_today));
            writeln!(out, "{}", display::overdue_report(&overdue))?;
        }
        ShellCommand::Audit => {
            writeln!(out, "{}", display::audit_report(&audit(registry)))?;
        }
        ShellCommand::Help => writeln!(out, "{HELP}")?,
        ShellCommand::Quit => return Ok(false),
    }
    Ok(true)
}

/// Read commands until EOF or `quit`. Bad input is reported and skipped.
pub fn run<R: BufRead, W: Write>(
    registry: &mut CatalogRegistry,
    input: R,
    out: &mut W,
) -> Result<()> {
    writeln!(out, "Library catalog shell. Type 'help' for commands.")?;
    for line in input.lines() {
        let line = line.context("Failed to read command")?;
        if line.trim().is_empty() {
            continue;
        }
        let command = match ShellCommand::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                writeln!(out, "❌ {e:#}")?;
                continue;
            }
        };
        match execute(registry, command, out) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => writeln!(out, "❌ {e:#}")?,
        }
    }
    Ok(())
}
