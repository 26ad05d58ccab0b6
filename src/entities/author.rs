// ✍️ Author Entity
//
// The written-books list is a back-reference only. The registry owns every
// Book and keeps this list in sync on add, delete and reassignment.

use crate::ids::{AuthorId, BookId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    id: AuthorId,

    pub name: String,

    /// Free text, e.g. "12/31/1965"
    pub date_of_birth: String,

    /// Catalogued books in insertion order
    written_books: Vec<BookId>,
}

impl Author {
    pub fn new(id: AuthorId, name: impl Into<String>, date_of_birth: impl Into<String>) -> Self {
        Author {
            id,
            name: name.into(),
            date_of_birth: date_of_birth.into(),
            written_books: Vec::new(),
        }
    }

    pub fn id(&self) -> AuthorId {
        self.id
    }

    pub fn written_books(&self) -> &[BookId] {
        &self.written_books
    }

    pub fn has_written(&self, book: BookId) -> bool {
        self.written_books.contains(&book)
    }

    pub(crate) fn add_written_book(&mut self, book: BookId) {
        self.written_books.push(book);
    }

    pub(crate) fn remove_written_book(&mut self, book: BookId) {
        self.written_books.retain(|b| *b != book);
    }
}
