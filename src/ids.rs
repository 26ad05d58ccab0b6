// Identity - Stable per-entity identifiers
//
// Each entity kind has its own monotonic counter starting at 1.
// Ids are never reused, even after the entity is deleted.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Identity of one physical copy record
    BookId
);
entity_id!(
    /// Identity of an author
    AuthorId
);
entity_id!(
    /// Identity of a patron
    PatronId
);

// ============================================================================
// ID GENERATOR
// ============================================================================

/// Hands out the next identity per entity kind.
///
/// Owned by the registry, so two registries never share counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdGenerator {
    next_book: u64,
    next_author: u64,
    next_patron: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        IdGenerator {
            next_book: 1,
            next_author: 1,
            next_patron: 1,
        }
    }

    pub fn next_book(&mut self) -> BookId {
        BookId(bump(&mut self.next_book))
    }

    pub fn next_author(&mut self) -> AuthorId {
        AuthorId(bump(&mut self.next_author))
    }

    pub fn next_patron(&mut self) -> PatronId {
        PatronId(bump(&mut self.next_patron))
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn bump(counter: &mut u64) -> u64 {
    let id = *counter;
    *counter += 1;
    id
}
