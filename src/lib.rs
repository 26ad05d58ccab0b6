// Library Catalog - Core Library
// In-memory catalog of books, authors and patrons with borrow/return
// circulation, per-ISBN inventory and overdue detection.
// Exposes all modules for use in the CLI and tests

pub mod audit;
pub mod circulation;
pub mod config;
pub mod entities;
pub mod error;
pub mod ids;
pub mod inventory;
pub mod overdue;
pub mod registry;
pub mod seed;

// Re-export commonly used types
pub use audit::{audit, AuditIssue, AuditReport, Severity};
pub use circulation::{BorrowOutcome, Circulation, OverdueMark, ReturnOutcome};
pub use config::{CatalogConfig, DEFAULT_LOAN_PERIOD_DAYS};
pub use entities::{Author, Book, BookStatus, ContactInfo, Patron};
pub use error::{CatalogError, CatalogResult};
pub use ids::{AuthorId, BookId, IdGenerator, PatronId};
pub use inventory::InventoryTracker;
pub use overdue::OverdueScanner;
pub use registry::{
    local_today, AuthorEdit, AuthorRemoval, BookEdit, CatalogRegistry, CatalogSnapshot, NewBook,
    PatronEdit, PatronRemoval,
};
pub use seed::load_sample_catalog;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
