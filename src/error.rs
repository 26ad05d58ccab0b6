// Catalog Errors
// Reference-not-found and invariant faults. Unmet borrow/return preconditions
// are reported as outcomes (see circulation.rs), never as errors.

use crate::ids::{AuthorId, BookId, PatronId};
use chrono::NaiveDate;
use thiserror::Error;

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// No book with this id is in the catalog
    #[error("book {0} not found")]
    BookNotFound(BookId),

    /// No author with this id is in the catalog
    #[error("author {0} not found")]
    AuthorNotFound(AuthorId),

    /// No patron with this id is registered
    #[error("patron {0} not found")]
    PatronNotFound(PatronId),

    /// Shelved-copy count for an ISBN would drop below zero
    #[error("inventory underflow for ISBN {isbn}: no shelved copies left to lend")]
    InventoryUnderflow { isbn: String },

    /// Due-date arithmetic left the representable calendar
    #[error("due date out of range: {from} + {days} days")]
    DueDateOutOfRange { from: NaiveDate, days: u32 },
}

impl CatalogError {
    /// True for the not-found family (the caller handed us a stale or bogus id)
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CatalogError::BookNotFound(_)
                | CatalogError::AuthorNotFound(_)
                | CatalogError::PatronNotFound(_)
        )
    }

    /// True for internal-consistency faults
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, CatalogError::InventoryUnderflow { .. })
    }
}
