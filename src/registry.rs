// 🏛️ Catalog Registry - Owns every book, author and patron
//
// The registry is the only owner of entities. Cross references are ids:
//   Book.author          -> Author        (Author.written_books is the back-reference)
//   Patron.borrowed_books -> Book          (holder relation)
// Every add/delete repairs the references on the other side itself; nothing
// is cleaned up implicitly.

use crate::circulation::{BorrowOutcome, Circulation, ReturnOutcome};
use crate::config::CatalogConfig;
use crate::entities::{Author, Book, ContactInfo, Patron};
use crate::error::{CatalogError, CatalogResult};
use crate::ids::{AuthorId, BookId, IdGenerator, PatronId};
use crate::inventory::InventoryTracker;
use crate::overdue::OverdueScanner;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Current date on the local calendar
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

// ============================================================================
// INPUT / OUTPUT RECORDS
// ============================================================================

/// Fields for a new copy. The registry assigns its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author: Option<AuthorId>,
    pub isbn: String,
    pub publisher: String,
}

impl NewBook {
    pub fn new(
        title: impl Into<String>,
        author: Option<AuthorId>,
        isbn: impl Into<String>,
        publisher: impl Into<String>,
    ) -> Self {
        NewBook {
            title: title.into(),
            author,
            isbn: isbn.into(),
            publisher: publisher.into(),
        }
    }
}

/// Descriptive fields of a book that may change after cataloguing.
/// `None` leaves the field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookEdit {
    pub title: Option<String>,
    pub publisher: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorEdit {
    pub name: Option<String>,
    pub date_of_birth: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatronEdit {
    pub name: Option<String>,
    pub contact: Option<ContactInfo>,
}

/// What `delete_author` took out of the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorRemoval {
    pub author: Author,
    pub removed_books: Vec<Book>,
}

/// What `delete_patron` left behind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatronRemoval {
    pub patron: Patron,
    /// Books forced to OVERDUE with no holder
    pub stranded_books: Vec<BookId>,
}

/// Serializable copy of the whole catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub books: Vec<Book>,
    pub authors: Vec<Author>,
    pub patrons: Vec<Patron>,
    pub inventory: InventoryTracker,
}

// ============================================================================
// CATALOG REGISTRY
// ============================================================================

#[derive(Debug, Clone)]
pub struct CatalogRegistry {
    config: CatalogConfig,
    circulation: Circulation,
    ids: IdGenerator,
    inventory: InventoryTracker,
    books: Vec<Book>,
    authors: Vec<Author>,
    patrons: Vec<Patron>,
}

impl CatalogRegistry {
    /// Create new empty registry with default loan policy
    pub fn new() -> Self {
        Self::with_config(CatalogConfig::default())
    }

    pub fn with_config(config: CatalogConfig) -> Self {
        CatalogRegistry {
            circulation: Circulation::new(config.loan_period_days),
            config,
            ids: IdGenerator::new(),
            inventory: InventoryTracker::new(),
            books: Vec::new(),
            authors: Vec::new(),
            patrons: Vec::new(),
        }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub fn inventory(&self) -> &InventoryTracker {
        &self.inventory
    }

    /// Shelved copies of `isbn`
    pub fn available_copies(&self, isbn: &str) -> u32 {
        self.inventory.count(isbn)
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn all_books(&self) -> &[Book] {
        &self.books
    }

    pub fn all_authors(&self) -> &[Author] {
        &self.authors
    }

    pub fn all_patrons(&self) -> &[Patron] {
        &self.patrons
    }

    pub fn find_book(&self, id: BookId) -> Option<&Book> {
        self.books.iter().find(|b| b.id() == id)
    }

    pub fn find_author(&self, id: AuthorId) -> Option<&Author> {
        self.authors.iter().find(|a| a.id() == id)
    }

    pub fn find_patron(&self, id: PatronId) -> Option<&Patron> {
        self.patrons.iter().find(|p| p.id() == id)
    }

    pub fn book(&self, id: BookId) -> CatalogResult<&Book> {
        self.find_book(id).ok_or(CatalogError::BookNotFound(id))
    }

    pub fn author(&self, id: AuthorId) -> CatalogResult<&Author> {
        self.find_author(id).ok_or(CatalogError::AuthorNotFound(id))
    }

    pub fn patron(&self, id: PatronId) -> CatalogResult<&Patron> {
        self.find_patron(id).ok_or(CatalogError::PatronNotFound(id))
    }

    /// Books by this author, in the order they were catalogued
    pub fn books_by_author(&self, id: AuthorId) -> CatalogResult<Vec<&Book>> {
        let author = self.author(id)?;
        Ok(author
            .written_books()
            .iter()
            .filter_map(|book_id| self.find_book(*book_id))
            .collect())
    }

    /// Books this patron currently holds, in borrow order
    pub fn borrowed_books(&self, id: PatronId) -> CatalogResult<Vec<&Book>> {
        let patron = self.patron(id)?;
        Ok(patron
            .borrowed_books()
            .iter()
            .filter_map(|book_id| self.find_book(*book_id))
            .collect())
    }

    /// Who holds this book, if anyone
    pub fn holder_of(&self, id: BookId) -> Option<&Patron> {
        self.patrons.iter().find(|p| p.holds(id))
    }

    // ------------------------------------------------------------------------
    // Books
    // ------------------------------------------------------------------------

    /// Catalog a new copy: links it to its author and shelves it
    pub fn add_book(&mut self, new_book: NewBook) -> CatalogResult<BookId> {
        if let Some(author_id) = new_book.author {
            self.author(author_id)?;
        }

        let id = self.ids.next_book();
        let book = Book::new(
            id,
            new_book.title,
            new_book.author,
            new_book.isbn,
            new_book.publisher,
        );

        if let Some(author) = book.author().and_then(|a| self.author_mut(a)) {
            author.add_written_book(id);
        }
        self.inventory.register_copy(book.isbn());

        info!(book_id = %id, title = %book.title, isbn = %book.isbn(), "book added");
        self.books.push(book);
        Ok(id)
    }

    /// Remove a copy from the catalog.
    ///
    /// Clears the author back-reference and every patron's borrowed set.
    /// The inventory count for its ISBN is left as is.
    pub fn delete_book(&mut self, id: BookId) -> CatalogResult<Book> {
        let book = self.remove_book_record(id)?;
        info!(book_id = %id, title = %book.title, "book deleted");
        Ok(book)
    }

    fn remove_book_record(&mut self, id: BookId) -> CatalogResult<Book> {
        let index = self
            .books
            .iter()
            .position(|b| b.id() == id)
            .ok_or(CatalogError::BookNotFound(id))?;
        let book = self.books.remove(index);

        if let Some(author) = book.author().and_then(|a| self.author_mut(a)) {
            author.remove_written_book(id);
        }
        for patron in &mut self.patrons {
            if patron.remove_borrowed_book(id) {
                debug!(
                    book_id = %id,
                    patron = %patron.name,
                    "dropped deleted book from borrowed list"
                );
            }
        }

        Ok(book)
    }

    /// Edit title/publisher. Status, ISBN and author are not reachable here.
    pub fn update_book(&mut self, id: BookId, edit: BookEdit) -> CatalogResult<()> {
        let book = self
            .books
            .iter_mut()
            .find(|b| b.id() == id)
            .ok_or(CatalogError::BookNotFound(id))?;
        if let Some(title) = edit.title {
            book.title = title;
        }
        if let Some(publisher) = edit.publisher {
            book.publisher = publisher;
        }
        debug!(book_id = %id, "book details updated");
        Ok(())
    }

    /// Move a book to another author (or none), keeping back-references in sync
    pub fn reassign_author(&mut self, id: BookId, author: Option<AuthorId>) -> CatalogResult<()> {
        if let Some(author_id) = author {
            self.author(author_id)?;
        }
        let previous = self.book(id)?.author();
        if previous == author {
            return Ok(());
        }

        if let Some(old) = previous.and_then(|a| self.author_mut(a)) {
            old.remove_written_book(id);
        }
        if let Some(new) = author.and_then(|a| self.author_mut(a)) {
            new.add_written_book(id);
        }
        if let Some(book) = self.books.iter_mut().find(|b| b.id() == id) {
            book.set_author(author);
        }

        info!(book_id = %id, ?previous, ?author, "book reassigned");
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Authors
    // ------------------------------------------------------------------------

    pub fn add_author(
        &mut self,
        name: impl Into<String>,
        date_of_birth: impl Into<String>,
    ) -> AuthorId {
        let id = self.ids.next_author();
        let author = Author::new(id, name, date_of_birth);
        info!(author_id = %id, name = %author.name, "author added");
        self.authors.push(author);
        id
    }

    /// Delete an author and every book attributed to them
    pub fn delete_author(&mut self, id: AuthorId) -> CatalogResult<AuthorRemoval> {
        self.author(id)?;

        let doomed: Vec<BookId> = self
            .books
            .iter()
            .filter(|b| b.author() == Some(id))
            .map(|b| b.id())
            .collect();

        let mut removed_books = Vec::with_capacity(doomed.len());
        for book_id in doomed {
            removed_books.push(self.remove_book_record(book_id)?);
        }

        let index = self
            .authors
            .iter()
            .position(|a| a.id() == id)
            .ok_or(CatalogError::AuthorNotFound(id))?;
        let author = self.authors.remove(index);

        info!(
            author_id = %id,
            name = %author.name,
            removed_books = removed_books.len(),
            "author deleted with their books"
        );
        Ok(AuthorRemoval {
            author,
            removed_books,
        })
    }

    /// Edit name/date of birth. The written-books list is not reachable here.
    pub fn update_author(&mut self, id: AuthorId, edit: AuthorEdit) -> CatalogResult<()> {
        let author = self.author_mut(id).ok_or(CatalogError::AuthorNotFound(id))?;
        if let Some(name) = edit.name {
            author.name = name;
        }
        if let Some(date_of_birth) = edit.date_of_birth {
            author.date_of_birth = date_of_birth;
        }
        debug!(author_id = %id, "author details updated");
        Ok(())
    }

    fn author_mut(&mut self, id: AuthorId) -> Option<&mut Author> {
        self.authors.iter_mut().find(|a| a.id() == id)
    }

    // ------------------------------------------------------------------------
    // Patrons
    // ------------------------------------------------------------------------

    pub fn add_patron(&mut self, name: impl Into<String>, contact: ContactInfo) -> PatronId {
        let id = self.ids.next_patron();
        let patron = Patron::new(id, name, contact);
        info!(patron_id = %id, name = %patron.name, "patron added");
        self.patrons.push(patron);
        id
    }

    /// Remove a patron. Books they still hold are forced to OVERDUE and stay
    /// out with no holder.
    pub fn delete_patron(&mut self, id: PatronId) -> CatalogResult<PatronRemoval> {
        let index = self
            .patrons
            .iter()
            .position(|p| p.id() == id)
            .ok_or(CatalogError::PatronNotFound(id))?;
        let patron = self.patrons.remove(index);

        let stranded_books = patron.borrowed_books().to_vec();
        for book in self
            .books
            .iter_mut()
            .filter(|b| stranded_books.contains(&b.id()))
        {
            if book.status().is_out() {
                book.flag_overdue();
            }
        }

        if stranded_books.is_empty() {
            info!(patron_id = %id, name = %patron.name, "patron deleted");
        } else {
            warn!(
                patron_id = %id,
                name = %patron.name,
                stranded = stranded_books.len(),
                "patron deleted while holding books; marked overdue"
            );
        }
        Ok(PatronRemoval {
            patron,
            stranded_books,
        })
    }

    /// Edit name/contact details. The borrowed set is not reachable here.
    pub fn update_patron(&mut self, id: PatronId, edit: PatronEdit) -> CatalogResult<()> {
        let patron = self
            .patrons
            .iter_mut()
            .find(|p| p.id() == id)
            .ok_or(CatalogError::PatronNotFound(id))?;
        if let Some(name) = edit.name {
            patron.name = name;
        }
        if let Some(contact) = edit.contact {
            patron.contact = contact;
        }
        debug!(patron_id = %id, "patron details updated");
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Search (case-insensitive, exact match, catalog order)
    // ------------------------------------------------------------------------

    pub fn search_by_title(&self, title: &str) -> Vec<&Book> {
        let wanted = title.to_lowercase();
        let found: Vec<&Book> = self
            .books
            .iter()
            .filter(|b| b.title.to_lowercase() == wanted)
            .collect();
        debug!(title, hits = found.len(), "search by title");
        found
    }

    pub fn search_by_author(&self, name: &str) -> Vec<&Book> {
        let wanted = name.to_lowercase();
        let found: Vec<&Book> = self
            .books
            .iter()
            .filter(|b| {
                b.author()
                    .and_then(|a| self.find_author(a))
                    .map_or(false, |a| a.name.to_lowercase() == wanted)
            })
            .collect();
        debug!(author = name, hits = found.len(), "search by author");
        found
    }

    pub fn search_by_isbn(&self, isbn: &str) -> Vec<&Book> {
        let wanted = isbn.to_lowercase();
        let found: Vec<&Book> = self
            .books
            .iter()
            .filter(|b| b.isbn().to_lowercase() == wanted)
            .collect();
        debug!(isbn, hits = found.len(), "search by isbn");
        found
    }

    // ------------------------------------------------------------------------
    // Circulation
    // ------------------------------------------------------------------------

    /// Lend a book today
    pub fn borrow_book(&mut self, patron: PatronId, book: BookId) -> CatalogResult<BorrowOutcome> {
        self.borrow_book_on(patron, book, local_today())
    }

    pub fn borrow_book_on(
        &mut self,
        patron_id: PatronId,
        book_id: BookId,
        today: NaiveDate,
    ) -> CatalogResult<BorrowOutcome> {
        let patron = self
            .patrons
            .iter_mut()
            .find(|p| p.id() == patron_id)
            .ok_or(CatalogError::PatronNotFound(patron_id))?;
        let book = self
            .books
            .iter_mut()
            .find(|b| b.id() == book_id)
            .ok_or(CatalogError::BookNotFound(book_id))?;

        self.circulation
            .borrow(book, patron, &mut self.inventory, today)
    }

    pub fn return_book(
        &mut self,
        patron_id: PatronId,
        book_id: BookId,
    ) -> CatalogResult<ReturnOutcome> {
        let patron = self
            .patrons
            .iter_mut()
            .find(|p| p.id() == patron_id)
            .ok_or(CatalogError::PatronNotFound(patron_id))?;
        let book = self
            .books
            .iter_mut()
            .find(|b| b.id() == book_id)
            .ok_or(CatalogError::BookNotFound(book_id))?;

        Ok(self.circulation.return_book(book, patron, &mut self.inventory))
    }

    /// Mark and list overdue books as of today
    pub fn overdue_book_list(&mut self) -> Vec<Book> {
        self.overdue_book_list_on(local_today())
    }

    pub fn overdue_book_list_on(&mut self, today: NaiveDate) -> Vec<Book> {
        OverdueScanner::new(self.circulation).scan(&mut self.books, today)
    }

    // ------------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------------

    pub fn snapshot(&self) -> CatalogSnapshot {
        CatalogSnapshot {
            books: self.books.clone(),
            authors: self.authors.clone(),
            patrons: self.patrons.clone(),
            inventory: self.inventory.clone(),
        }
    }
}

impl Default for CatalogRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
