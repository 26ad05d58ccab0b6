// Entity Models - Books, authors and patrons
//
// Each entity has:
// - Stable identity (see ids.rs) that never changes or gets reused
// - Public descriptive fields the driver may edit
// - Private relationship/state fields only the registry and circulation touch

pub mod author;
pub mod book;
pub mod patron;

pub use author::Author;
pub use book::{Book, BookStatus};
pub use patron::{ContactInfo, Patron};
