// 🔍 Catalog Audit - Check cross-entity consistency
//
// Recomputes every relationship the registry is supposed to maintain and
// reports where the stored state disagrees:
//   - status != AVAILABLE  <=>  due date set
//   - out books have exactly one holder, shelved books none
//   - author back-references match Book.author
//   - inventory(isbn) == copies with that ISBN currently AVAILABLE
//
// Two findings are expected in normal use and reported as warnings:
// books stranded by a deleted patron (MissingHolder) and counts left behind
// by deleted copies (InventoryDrift).

use crate::ids::{AuthorId, BookId, PatronId};
use crate::registry::CatalogRegistry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

// ============================================================================
// AUDIT ISSUES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Critical, // Broken invariant
    Warning,  // Known, tolerated divergence
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditIssue {
    /// Status and due date disagree
    DueDateMismatch { book: BookId },

    /// Out book that no patron holds
    MissingHolder { book: BookId },

    /// Shelved book with a holder, or out book with several
    HolderMismatch { book: BookId, holders: Vec<PatronId> },

    /// Back-reference that does not match the book's author
    AuthorLinkMismatch { book: BookId, author: AuthorId },

    /// Id that points at nothing in the catalog
    DanglingReference { owner: String, target: String },

    /// Shelved-copy count differs from the books on the shelf
    InventoryDrift { isbn: String, expected: u32, actual: u32 },
}

impl AuditIssue {
    pub fn severity(&self) -> Severity {
        match self {
            AuditIssue::MissingHolder { .. } | AuditIssue::InventoryDrift { .. } => {
                Severity::Warning
            }
            _ => Severity::Critical,
        }
    }
}

impl fmt::Display for AuditIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditIssue::DueDateMismatch { book } => {
                write!(f, "book {book}: status and due date disagree")
            }
            AuditIssue::MissingHolder { book } => {
                write!(f, "book {book}: out with no holder")
            }
            AuditIssue::HolderMismatch { book, holders } => {
                let holders: Vec<String> = holders.iter().map(|p| p.to_string()).collect();
                write!(f, "book {book}: unexpected holders [{}]", holders.join(", "))
            }
            AuditIssue::AuthorLinkMismatch { book, author } => {
                write!(f, "book {book}: author {author} back-reference out of sync")
            }
            AuditIssue::DanglingReference { owner, target } => {
                write!(f, "{owner} references missing {target}")
            }
            AuditIssue::InventoryDrift {
                isbn,
                expected,
                actual,
            } => write!(
                f,
                "ISBN {isbn}: inventory says {actual} shelved, catalog has {expected}"
            ),
        }
    }
}

// ============================================================================
// AUDIT REPORT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    pub books_checked: usize,
    pub issues: Vec<AuditIssue>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn has_critical_issues(&self) -> bool {
        self.issues
            .iter()
            .any(|i| i.severity() == Severity::Critical)
    }

    pub fn summary(&self) -> String {
        format!(
            "Audit: {} books checked, {} issues ({} critical)",
            self.books_checked,
            self.issues.len(),
            self.issues
                .iter()
                .filter(|i| i.severity() == Severity::Critical)
                .count()
        )
    }
}

// ============================================================================
// AUDIT
// ============================================================================

pub fn audit(registry: &CatalogRegistry) -> AuditReport {
    let mut issues = Vec::new();

    for book in registry.all_books() {
        if book.status().is_out() != book.due_date().is_some() {
            issues.push(AuditIssue::DueDateMismatch { book: book.id() });
        }

        let holders: Vec<PatronId> = registry
            .all_patrons()
            .iter()
            .filter(|p| p.holds(book.id()))
            .map(|p| p.id())
            .collect();
        match (book.status().is_out(), holders.len()) {
            (true, 0) => issues.push(AuditIssue::MissingHolder { book: book.id() }),
            (true, 1) | (false, 0) => {}
            _ => issues.push(AuditIssue::HolderMismatch {
                book: book.id(),
                holders,
            }),
        }

        if let Some(author_id) = book.author() {
            match registry.find_author(author_id) {
                Some(author) if author.has_written(book.id()) => {}
                Some(_) => issues.push(AuditIssue::AuthorLinkMismatch {
                    book: book.id(),
                    author: author_id,
                }),
                None => issues.push(AuditIssue::DanglingReference {
                    owner: format!("book {}", book.id()),
                    target: format!("author {author_id}"),
                }),
            }
        }
    }

    for author in registry.all_authors() {
        for book_id in author.written_books() {
            match registry.find_book(*book_id) {
                Some(book) if book.author() == Some(author.id()) => {}
                Some(_) => issues.push(AuditIssue::AuthorLinkMismatch {
                    book: *book_id,
                    author: author.id(),
                }),
                None => issues.push(AuditIssue::DanglingReference {
                    owner: format!("author {}", author.id()),
                    target: format!("book {book_id}"),
                }),
            }
        }
    }

    for patron in registry.all_patrons() {
        for book_id in patron.borrowed_books() {
            if registry.find_book(*book_id).is_none() {
                issues.push(AuditIssue::DanglingReference {
                    owner: format!("patron {}", patron.id()),
                    target: format!("book {book_id}"),
                });
            }
        }
    }

    let mut shelved: BTreeMap<&str, u32> = BTreeMap::new();
    for book in registry.all_books() {
        let entry = shelved.entry(book.isbn()).or_insert(0);
        if book.is_available() {
            *entry += 1;
        }
    }
    for (isbn, _) in registry.inventory().iter() {
        shelved.entry(isbn).or_insert(0);
    }
    for (isbn, expected) in shelved {
        let actual = registry.available_copies(isbn);
        if actual != expected {
            issues.push(AuditIssue::InventoryDrift {
                isbn: isbn.to_string(),
                expected,
                actual,
            });
        }
    }

    let report = AuditReport {
        books_checked: registry.all_books().len(),
        issues,
    };
    debug!(summary = %report.summary(), "catalog audited");
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ContactInfo;
    use crate::registry::NewBook;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_test_registry() -> (CatalogRegistry, PatronId, BookId, BookId) {
        let mut registry = CatalogRegistry::new();
        let author = registry.add_author("Nicholas Sparks", "12/31/1965");
        let patron = registry.add_patron("Mini Mouse", ContactInfo::default());
        let first = registry
            .add_book(NewBook::new("The Wish", Some(author), "123458D", "Random House"))
            .unwrap();
        let second = registry
            .add_book(NewBook::new("The Wish", Some(author), "123458D", "Random House"))
            .unwrap();
        (registry, patron, first, second)
    }

    #[test]
    fn test_fresh_catalog_is_clean() {
        let (registry, ..) = create_test_registry();
        let report = audit(&registry);

        assert!(report.is_clean());
        assert_eq!(report.books_checked, 2);
    }

    #[test]
    fn test_clean_after_borrow_return_and_overdue() {
        let (mut registry, patron, first, second) = create_test_registry();
        registry.borrow_book_on(patron, first, date(2024, 3, 1)).unwrap();
        registry.borrow_book_on(patron, second, date(2024, 3, 1)).unwrap();
        registry.return_book(patron, first).unwrap();
        registry.overdue_book_list_on(date(2024, 4, 1));

        assert!(audit(&registry).is_clean());
    }

    #[test]
    fn test_deleted_patron_leaves_missing_holder_warning() {
        let (mut registry, patron, first, _) = create_test_registry();
        registry.borrow_book_on(patron, first, date(2024, 3, 1)).unwrap();
        registry.delete_patron(patron).unwrap();

        let report = audit(&registry);
        assert_eq!(report.issues, vec![AuditIssue::MissingHolder { book: first }]);
        assert!(!report.has_critical_issues());
    }

    #[test]
    fn test_deleted_shelved_copy_shows_inventory_drift() {
        let (mut registry, _, first, _) = create_test_registry();
        registry.delete_book(first).unwrap();

        let report = audit(&registry);
        assert_eq!(
            report.issues,
            vec![AuditIssue::InventoryDrift {
                isbn: "123458D".to_string(),
                expected: 1,
                actual: 2,
            }]
        );
        assert_eq!(report.issues[0].severity(), Severity::Warning);
    }

    #[test]
    fn test_summary_and_display() {
        let issue = AuditIssue::InventoryDrift {
            isbn: "123458D".to_string(),
            expected: 1,
            actual: 2,
        };
        assert_eq!(
            issue.to_string(),
            "ISBN 123458D: inventory says 2 shelved, catalog has 1"
        );

        let report = AuditReport {
            books_checked: 4,
            issues: vec![issue, AuditIssue::DueDateMismatch { book: BookId(1) }],
        };
        assert_eq!(report.summary(), "Audit: 4 books checked, 2 issues (1 critical)");
        assert!(report.has_critical_issues());
    }
}
