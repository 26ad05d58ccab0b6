// 🪪 Patron Entity - A registered borrower

use crate::ids::{BookId, PatronId};
use serde::{Deserialize, Serialize};

// ============================================================================
// CONTACT INFO
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub address: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub phone: String,
}

impl ContactInfo {
    pub fn new(
        address: impl Into<String>,
        city: impl Into<String>,
        province: impl Into<String>,
        postal_code: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        ContactInfo {
            address: address.into(),
            city: city.into(),
            province: province.into(),
            postal_code: postal_code.into(),
            phone: phone.into(),
        }
    }
}

// ============================================================================
// PATRON ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patron {
    id: PatronId,

    pub name: String,

    pub contact: ContactInfo,

    /// Books currently held, in borrow order
    borrowed_books: Vec<BookId>,
}

impl Patron {
    pub fn new(id: PatronId, name: impl Into<String>, contact: ContactInfo) -> Self {
        Patron {
            id,
            name: name.into(),
            contact,
            borrowed_books: Vec::new(),
        }
    }

    pub fn id(&self) -> PatronId {
        self.id
    }

    pub fn borrowed_books(&self) -> &[BookId] {
        &self.borrowed_books
    }

    pub fn borrowed_count(&self) -> usize {
        self.borrowed_books.len()
    }

    /// Does this patron currently hold `book`?
    pub fn holds(&self, book: BookId) -> bool {
        self.borrowed_books.contains(&book)
    }

    pub(crate) fn add_borrowed_book(&mut self, book: BookId) {
        if !self.holds(book) {
            self.borrowed_books.push(book);
        }
    }

    /// Returns whether the book was held
    pub(crate) fn remove_borrowed_book(&mut self, book: BookId) -> bool {
        let before = self.borrowed_books.len();
        self.borrowed_books.retain(|b| *b != book);
        self.borrowed_books.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_patron() -> Patron {
        Patron::new(
            PatronId(1),
            "Mini Mouse",
            ContactInfo::new("1 Main St", "Corner Brook", "NL", "A1A 1A1", "709-111-1111"),
        )
    }

    #[test]
    fn test_patron_creation() {
        let patron = sample_patron();

        assert_eq!(patron.id(), PatronId(1));
        assert_eq!(patron.name, "Mini Mouse");
        assert_eq!(patron.contact.city, "Corner Brook");
        assert_eq!(patron.contact.postal_code, "A1A 1A1");
        assert_eq!(patron.borrowed_count(), 0);
    }

    #[test]
    fn test_borrowed_set_has_no_duplicates() {
        let mut patron = sample_patron();
        patron.add_borrowed_book(BookId(3));
        patron.add_borrowed_book(BookId(3));
        patron.add_borrowed_book(BookId(1));

        assert_eq!(patron.borrowed_books(), &[BookId(3), BookId(1)]);
        assert!(patron.holds(BookId(1)));
    }

    #[test]
    fn test_remove_borrowed_book_reports_membership() {
        let mut patron = sample_patron();
        patron.add_borrowed_book(BookId(3));

        assert!(patron.remove_borrowed_book(BookId(3)));
        assert!(!patron.remove_borrowed_book(BookId(3)));
        assert!(patron.borrowed_books().is_empty());
    }
}
