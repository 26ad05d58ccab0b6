// 📖 Book Entity - One physical copy of a title
//
// Several Book records may share an ISBN: each one is a separate copy on the
// shelf. The status/due-date pair is owned by the circulation state machine;
// outside this crate it is read-only.

use crate::ids::{AuthorId, BookId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// BOOK STATUS
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookStatus {
    /// On the shelf, can be borrowed
    #[default]
    Available,

    /// Lent to a patron, due date not yet passed
    CheckedOut,

    /// Lent out and past its due date
    Overdue,
}

impl BookStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::Available => "AVAILABLE",
            BookStatus::CheckedOut => "CHECKED_OUT",
            BookStatus::Overdue => "OVERDUE",
        }
    }

    /// Not on the shelf (CHECKED_OUT or OVERDUE)
    pub fn is_out(&self) -> bool {
        matches!(self, BookStatus::CheckedOut | BookStatus::Overdue)
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// BOOK ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    id: BookId,

    /// Title as catalogued
    pub title: String,

    /// Back-referenced by the author's written-books list
    author: Option<AuthorId>,

    /// Shared by every copy of the same title/edition
    isbn: String,

    pub publisher: String,

    status: BookStatus,

    /// Set iff status is not AVAILABLE
    due_date: Option<NaiveDate>,
}

impl Book {
    /// New copy, AVAILABLE with no due date
    pub fn new(
        id: BookId,
        title: impl Into<String>,
        author: Option<AuthorId>,
        isbn: impl Into<String>,
        publisher: impl Into<String>,
    ) -> Self {
        Book {
            id,
            title: title.into(),
            author,
            isbn: isbn.into(),
            publisher: publisher.into(),
            status: BookStatus::Available,
            due_date: None,
        }
    }

    pub fn id(&self) -> BookId {
        self.id
    }

    pub fn author(&self) -> Option<AuthorId> {
        self.author
    }

    pub fn isbn(&self) -> &str {
        &self.isbn
    }

    pub fn status(&self) -> BookStatus {
        self.status
    }

    pub fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    pub fn is_available(&self) -> bool {
        self.status == BookStatus::Available
    }

    /// Out and due strictly before `today`
    pub fn is_overdue_on(&self, today: NaiveDate) -> bool {
        self.status.is_out() && self.due_date.map_or(false, |due| due < today)
    }

    pub(crate) fn set_author(&mut self, author: Option<AuthorId>) {
        self.author = author;
    }

    /// AVAILABLE -> CHECKED_OUT
    pub(crate) fn check_out(&mut self, due_date: NaiveDate) {
        self.status = BookStatus::CheckedOut;
        self.due_date = Some(due_date);
    }

    /// Back on the shelf, due date cleared
    pub(crate) fn check_in(&mut self) {
        self.status = BookStatus::Available;
        self.due_date = None;
    }

    /// Only meaningful while out: the due date is kept
    pub(crate) fn flag_overdue(&mut self) {
        debug_assert!(self.status.is_out(), "only an out book can become overdue");
        self.status = BookStatus::Overdue;
    }
}
