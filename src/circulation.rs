// 🔄 Circulation - Borrow/return state machine for a single copy
//
//   AVAILABLE --borrow--> CHECKED_OUT --return--> AVAILABLE
//                              |                      ^
//                              +--overdue--> OVERDUE -+ return
//
// Every transition touches the book, the patron's borrowed set and the
// inventory together. All checks run before the first mutation, so a failed
// call leaves all three exactly as they were.

use crate::entities::{Book, BookStatus, Patron};
use crate::error::{CatalogError, CatalogResult};
use crate::inventory::InventoryTracker;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

// ============================================================================
// OUTCOMES
// ============================================================================

/// Result of a borrow request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BorrowOutcome {
    /// Copy is now CHECKED_OUT
    Borrowed { due_date: NaiveDate },

    /// Copy was not AVAILABLE; nothing changed
    Unavailable { status: BookStatus },
}

impl BorrowOutcome {
    pub fn is_borrowed(&self) -> bool {
        matches!(self, BorrowOutcome::Borrowed { .. })
    }
}

/// Result of a return request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReturnOutcome {
    /// Copy is back on the shelf
    Returned,

    /// Copy not found in the patron's borrowed list; nothing changed
    NotHeld,
}

impl ReturnOutcome {
    pub fn is_returned(&self) -> bool {
        matches!(self, ReturnOutcome::Returned)
    }
}

/// Result of an overdue check on one copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverdueMark {
    /// CHECKED_OUT -> OVERDUE
    Marked,

    /// Already OVERDUE
    AlreadyOverdue,

    /// Not out, or not past due yet
    NotDue,
}

// ============================================================================
// CIRCULATION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Circulation {
    loan_period_days: u32,
}

impl Circulation {
    pub fn new(loan_period_days: u32) -> Self {
        Circulation { loan_period_days }
    }

    /// Due date for a loan starting on `today`
    pub fn due_date_from(&self, today: NaiveDate) -> CatalogResult<NaiveDate> {
        today
            .checked_add_days(Days::new(u64::from(self.loan_period_days)))
            .ok_or(CatalogError::DueDateOutOfRange {
                from: today,
                days: self.loan_period_days,
            })
    }

    /// Lend `book` to `patron` on `today`.
    ///
    /// A non-AVAILABLE book is reported as `Unavailable`, not as an error.
    /// Errors are reserved for date overflow and inventory underflow, both of
    /// which leave the book, patron and inventory unchanged.
    pub fn borrow(
        &self,
        book: &mut Book,
        patron: &mut Patron,
        inventory: &mut InventoryTracker,
        today: NaiveDate,
    ) -> CatalogResult<BorrowOutcome> {
        if !book.is_available() {
            warn!(
                book_id = %book.id(),
                status = %book.status(),
                "book is currently borrowed"
            );
            return Ok(BorrowOutcome::Unavailable {
                status: book.status(),
            });
        }

        let due_date = self.due_date_from(today)?;
        inventory.on_borrow(book.isbn())?;

        book.check_out(due_date);
        patron.add_borrowed_book(book.id());

        info!(
            book_id = %book.id(),
            title = %book.title,
            patron = %patron.name,
            %due_date,
            "book borrowed"
        );
        Ok(BorrowOutcome::Borrowed { due_date })
    }

    /// Take `book` back from `patron`.
    ///
    /// Only the holding patron can return a copy, and only while it is out.
    pub fn return_book(
        &self,
        book: &mut Book,
        patron: &mut Patron,
        inventory: &mut InventoryTracker,
    ) -> ReturnOutcome {
        if !book.status().is_out() || !patron.holds(book.id()) {
            warn!(
                book_id = %book.id(),
                title = %book.title,
                patron = %patron.name,
                "book not found in patron's borrowed list"
            );
            return ReturnOutcome::NotHeld;
        }

        book.check_in();
        patron.remove_borrowed_book(book.id());
        inventory.on_return(book.isbn());

        info!(
            book_id = %book.id(),
            title = %book.title,
            patron = %patron.name,
            "book returned"
        );
        ReturnOutcome::Returned
    }

    /// Promote a past-due CHECKED_OUT copy to OVERDUE
    pub fn mark_overdue(&self, book: &mut Book, today: NaiveDate) -> OverdueMark {
        match book.status() {
            BookStatus::Overdue => OverdueMark::AlreadyOverdue,
            BookStatus::CheckedOut if book.is_overdue_on(today) => {
                book.flag_overdue();
                OverdueMark::Marked
            }
            _ => OverdueMark::NotDue,
        }
    }
}

impl Default for Circulation {
    fn default() -> Self {
        Circulation::new(crate::config::DEFAULT_LOAN_PERIOD_DAYS)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ContactInfo;
    use crate::ids::{AuthorId, BookId, PatronId};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_test_book(id: u64) -> Book {
        Book::new(BookId(id), "The Wish", Some(AuthorId(1)), "123458D", "Random House")
    }

    fn create_test_patron(id: u64, name: &str) -> Patron {
        Patron::new(PatronId(id), name, ContactInfo::default())
    }

    fn shelved(isbn: &str, copies: usize) -> InventoryTracker {
        let mut inventory = InventoryTracker::new();
        for _ in 0..copies {
            inventory.register_copy(isbn);
        }
        inventory
    }

    #[test]
    fn test_borrow_available_book() {
        let desk = Circulation::default();
        let mut book = create_test_book(1);
        let mut patron = create_test_patron(1, "Mini Mouse");
        let mut inventory = shelved("123458D", 2);

        let outcome = desk
            .borrow(&mut book, &mut patron, &mut inventory, date(2024, 3, 1))
            .unwrap();

        assert_eq!(outcome, BorrowOutcome::Borrowed { due_date: date(2024, 3, 15) });
        assert_eq!(book.status(), BookStatus::CheckedOut);
        assert_eq!(book.due_date(), Some(date(2024, 3, 15)));
        assert!(patron.holds(BookId(1)));
        assert_eq!(inventory.count("123458D"), 1);
    }

    #[test]
    fn test_borrow_unavailable_book_changes_nothing() {
        let desk = Circulation::default();
        let mut book = create_test_book(1);
        let mut first = create_test_patron(1, "Mini Mouse");
        let mut second = create_test_patron(2, "Daisy Duck");
        let mut inventory = shelved("123458D", 2);

        desk.borrow(&mut book, &mut first, &mut inventory, date(2024, 3, 1))
            .unwrap();
        let outcome = desk
            .borrow(&mut book, &mut second, &mut inventory, date(2024, 3, 2))
            .unwrap();

        assert_eq!(outcome, BorrowOutcome::Unavailable { status: BookStatus::CheckedOut });
        assert_eq!(book.due_date(), Some(date(2024, 3, 15)));
        assert!(!second.holds(BookId(1)));
        assert_eq!(inventory.count("123458D"), 1);
    }

    #[test]
    fn test_borrow_overdue_book_is_unavailable() {
        let desk = Circulation::default();
        let mut book = create_test_book(1);
        let mut patron = create_test_patron(1, "Mini Mouse");
        let mut inventory = shelved("123458D", 1);

        desk.borrow(&mut book, &mut patron, &mut inventory, date(2024, 3, 1))
            .unwrap();
        desk.mark_overdue(&mut book, date(2024, 4, 1));

        let outcome = desk
            .borrow(&mut book, &mut patron, &mut inventory, date(2024, 4, 1))
            .unwrap();
        assert_eq!(outcome, BorrowOutcome::Unavailable { status: BookStatus::Overdue });
    }

    #[test]
    fn test_borrow_with_empty_inventory_is_invariant_violation() {
        let desk = Circulation::default();
        let mut book = create_test_book(1);
        let mut patron = create_test_patron(1, "Mini Mouse");
        let mut inventory = InventoryTracker::new();

        let err = desk
            .borrow(&mut book, &mut patron, &mut inventory, date(2024, 3, 1))
            .unwrap_err();

        assert!(err.is_invariant_violation());
        assert_eq!(book.status(), BookStatus::Available);
        assert!(book.due_date().is_none());
        assert_eq!(patron.borrowed_count(), 0);
    }

    #[test]
    fn test_due_date_overflow_leaves_state_unchanged() {
        let desk = Circulation::default();
        let mut book = create_test_book(1);
        let mut patron = create_test_patron(1, "Mini Mouse");
        let mut inventory = shelved("123458D", 1);

        let err = desk
            .borrow(&mut book, &mut patron, &mut inventory, NaiveDate::MAX)
            .unwrap_err();

        assert!(matches!(err, CatalogError::DueDateOutOfRange { .. }));
        assert!(book.is_available());
        assert_eq!(inventory.count("123458D"), 1);
    }

    #[test]
    fn test_return_by_holder() {
        let desk = Circulation::default();
        let mut book = create_test_book(1);
        let mut patron = create_test_patron(1, "Mini Mouse");
        let mut inventory = shelved("123458D", 2);

        desk.borrow(&mut book, &mut patron, &mut inventory, date(2024, 3, 1))
            .unwrap();
        let outcome = desk.return_book(&mut book, &mut patron, &mut inventory);

        assert_eq!(outcome, ReturnOutcome::Returned);
        assert_eq!(book.status(), BookStatus::Available);
        assert!(book.due_date().is_none());
        assert!(!patron.holds(BookId(1)));
        assert_eq!(inventory.count("123458D"), 2);
    }

    #[test]
    fn test_return_by_non_holder_is_noop() {
        let desk = Circulation::default();
        let mut book = create_test_book(1);
        let mut holder = create_test_patron(1, "Mini Mouse");
        let mut other = create_test_patron(2, "Daisy Duck");
        let mut inventory = shelved("123458D", 2);

        desk.borrow(&mut book, &mut holder, &mut inventory, date(2024, 3, 1))
            .unwrap();
        let outcome = desk.return_book(&mut book, &mut other, &mut inventory);

        assert_eq!(outcome, ReturnOutcome::NotHeld);
        assert_eq!(book.status(), BookStatus::CheckedOut);
        assert!(holder.holds(BookId(1)));
        assert_eq!(inventory.count("123458D"), 1);
    }

    #[test]
    fn test_return_of_shelved_book_is_noop() {
        let desk = Circulation::default();
        let mut book = create_test_book(1);
        let mut patron = create_test_patron(1, "Mini Mouse");
        let mut inventory = shelved("123458D", 1);

        let outcome = desk.return_book(&mut book, &mut patron, &mut inventory);

        assert_eq!(outcome, ReturnOutcome::NotHeld);
        assert_eq!(inventory.count("123458D"), 1);
    }

    #[test]
    fn test_return_overdue_book() {
        let desk = Circulation::default();
        let mut book = create_test_book(1);
        let mut patron = create_test_patron(1, "Mini Mouse");
        let mut inventory = shelved("123458D", 1);

        desk.borrow(&mut book, &mut patron, &mut inventory, date(2024, 3, 1))
            .unwrap();
        assert_eq!(desk.mark_overdue(&mut book, date(2024, 3, 20)), OverdueMark::Marked);

        let outcome = desk.return_book(&mut book, &mut patron, &mut inventory);
        assert!(outcome.is_returned());
        assert!(book.is_available());
        assert_eq!(inventory.count("123458D"), 1);
    }

    #[test]
    fn test_mark_overdue_transitions() {
        let desk = Circulation::default();
        let mut book = create_test_book(1);
        let mut patron = create_test_patron(1, "Mini Mouse");
        let mut inventory = shelved("123458D", 1);

        assert_eq!(desk.mark_overdue(&mut book, date(2024, 3, 1)), OverdueMark::NotDue);

        desk.borrow(&mut book, &mut patron, &mut inventory, date(2024, 3, 1))
            .unwrap();
        // due date itself is not yet overdue
        assert_eq!(desk.mark_overdue(&mut book, date(2024, 3, 15)), OverdueMark::NotDue);
        assert_eq!(book.status(), BookStatus::CheckedOut);

        assert_eq!(desk.mark_overdue(&mut book, date(2024, 3, 16)), OverdueMark::Marked);
        assert_eq!(book.status(), BookStatus::Overdue);
        assert_eq!(book.due_date(), Some(date(2024, 3, 15)));

        assert_eq!(
            desk.mark_overdue(&mut book, date(2024, 3, 17)),
            OverdueMark::AlreadyOverdue
        );
    }

    #[test]
    fn test_custom_loan_period() {
        let desk = Circulation::new(21);
        assert_eq!(desk.due_date_from(date(2024, 2, 20)).unwrap(), date(2024, 3, 12));
    }
}
