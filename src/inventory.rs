// 📦 Inventory Tracker - Shelved copies per ISBN
//
// Pure counter arithmetic. Counts follow:
//   count(isbn) = copies registered - copies currently out
// The one exception is book deletion, which leaves the count untouched
// (see audit.rs, InventoryDrift).

use crate::error::{CatalogError, CatalogResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::error;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InventoryTracker {
    copies: BTreeMap<String, u32>,
}

impl InventoryTracker {
    pub fn new() -> Self {
        InventoryTracker {
            copies: BTreeMap::new(),
        }
    }

    /// One more physical copy of `isbn` joined the catalog
    pub fn register_copy(&mut self, isbn: &str) {
        *self.copies.entry(isbn.to_string()).or_insert(0) += 1;
    }

    /// A copy left the shelf. Fails instead of going negative.
    pub fn on_borrow(&mut self, isbn: &str) -> CatalogResult<()> {
        match self.copies.get_mut(isbn) {
            Some(count) if *count > 0 => {
                *count -= 1;
                Ok(())
            }
            _ => {
                error!(isbn, "inventory underflow on borrow");
                Err(CatalogError::InventoryUnderflow {
                    isbn: isbn.to_string(),
                })
            }
        }
    }

    /// A copy came back to the shelf
    pub fn on_return(&mut self, isbn: &str) {
        *self.copies.entry(isbn.to_string()).or_insert(0) += 1;
    }

    /// Shelved copies, 0 for an unseen ISBN
    pub fn count(&self, isbn: &str) -> u32 {
        self.copies.get(isbn).copied().unwrap_or(0)
    }

    /// All tracked ISBNs with their counts, sorted by ISBN
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.copies.iter().map(|(isbn, count)| (isbn.as_str(), *count))
    }

    pub fn isbn_count(&self) -> usize {
        self.copies.len()
    }
}
