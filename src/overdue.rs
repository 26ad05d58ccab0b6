// ⏰ Overdue Scanner - Sweep the catalog for expired loans

use crate::circulation::{Circulation, OverdueMark};
use crate::entities::Book;
use chrono::NaiveDate;
use tracing::debug;

/// Promotes every out copy whose due date is strictly before `today` to
/// OVERDUE and returns those copies in catalog order.
///
/// Safe to run repeatedly: already-overdue copies are reported again but not
/// changed. Copies forced to OVERDUE with a future due date are not reported.
#[derive(Debug, Clone, Copy, Default)]
pub struct OverdueScanner {
    circulation: Circulation,
}

impl OverdueScanner {
    pub fn new(circulation: Circulation) -> Self {
        OverdueScanner { circulation }
    }

    pub fn scan(&self, books: &mut [Book], today: NaiveDate) -> Vec<Book> {
        let mut overdue = Vec::new();

        for book in books.iter_mut() {
            if !book.is_overdue_on(today) {
                continue;
            }
            if self.circulation.mark_overdue(book, today) == OverdueMark::Marked {
                debug!(book_id = %book.id(), title = %book.title, "book marked overdue");
            }
            overdue.push(book.clone());
        }

        debug!(%today, count = overdue.len(), "overdue scan complete");
        overdue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::BookStatus;
    use crate::ids::BookId;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn book_due(id: u64, due: Option<NaiveDate>) -> Book {
        let mut book = Book::new(BookId(id), format!("Book {id}"), None, "ISBN", "Publisher");
        if let Some(due) = due {
            book.check_out(due);
        }
        book
    }

    #[test]
    fn test_scan_empty_catalog() {
        let mut books: Vec<Book> = Vec::new();
        assert!(OverdueScanner::default().scan(&mut books, date(2024, 1, 1)).is_empty());
    }

    #[test]
    fn test_scan_promotes_only_past_due_books() {
        let mut books = vec![
            book_due(1, Some(date(2024, 3, 1))),
            book_due(2, None),
            book_due(3, Some(date(2024, 3, 10))),
            book_due(4, Some(date(2024, 2, 1))),
        ];

        let overdue = OverdueScanner::default().scan(&mut books, date(2024, 3, 10));
        let ids: Vec<BookId> = overdue.iter().map(|b| b.id()).collect();

        assert_eq!(ids, vec![BookId(1), BookId(4)]);
        assert_eq!(books[0].status(), BookStatus::Overdue);
        assert_eq!(books[1].status(), BookStatus::Available);
        assert_eq!(books[2].status(), BookStatus::CheckedOut);
        assert_eq!(books[3].status(), BookStatus::Overdue);
    }

    #[test]
    fn test_scan_is_idempotent() {
        let scanner = OverdueScanner::default();
        let mut books = vec![book_due(1, Some(date(2024, 3, 1)))];

        let first = scanner.scan(&mut books, date(2024, 3, 5));
        let second = scanner.scan(&mut books, date(2024, 3, 5));

        assert_eq!(first, second);
        assert_eq!(second.len(), 1);
        assert_eq!(books[0].status(), BookStatus::Overdue);
        assert_eq!(books[0].due_date(), Some(date(2024, 3, 1)));
    }

    #[test]
    fn test_forced_overdue_with_future_due_date_not_reported() {
        let mut book = book_due(1, Some(date(2024, 3, 20)));
        book.flag_overdue();
        let mut books = vec![book];

        assert!(OverdueScanner::default().scan(&mut books, date(2024, 3, 10)).is_empty());
        assert_eq!(books[0].status(), BookStatus::Overdue);
    }

    #[test]
    fn test_scan_agrees_with_circulation() {
        let today = date(2024, 3, 10);
        let desk = Circulation::new(7);
        let mut books = vec![
            book_due(1, Some(date(2024, 3, 9))),
            book_due(2, Some(date(2024, 3, 10))),
            book_due(3, None),
        ];
        let mut by_hand = books.clone();

        OverdueScanner::new(desk).scan(&mut books, today);
        let marks: Vec<OverdueMark> =
            by_hand.iter_mut().map(|b| desk.mark_overdue(b, today)).collect();

        assert_eq!(marks, vec![OverdueMark::Marked, OverdueMark::NotDue, OverdueMark::NotDue]);
        assert_eq!(books, by_hand);
    }
}
