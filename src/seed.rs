// 🌱 Sample Catalog - Bootstrap data for demos and the CLI

use crate::entities::ContactInfo;
use crate::error::CatalogResult;
use crate::registry::{CatalogRegistry, NewBook};
use tracing::info;

/// Register the sample authors, patrons and books.
///
/// "The Wish" is catalogued twice under one ISBN: two physical copies.
pub fn load_sample_catalog(registry: &mut CatalogRegistry) -> CatalogResult<()> {
    let steele = registry.add_author("Danielle Steele", "04/15/1977");
    let peterson = registry.add_author("Jordan Peterson", "01/31/1969");
    let sparks = registry.add_author("Nicholas Sparks", "12/31/1965");

    registry.add_patron(
        "Mini Mouse",
        ContactInfo::new("1 Main St", "Corner Brook", "NL", "A1A 1A1", "709-111-1111"),
    );
    registry.add_patron(
        "Daisy Duck",
        ContactInfo::new("44 Forth Street", "Vancouver", "BC", "V5K 0A1", "604-555-5555"),
    );
    registry.add_patron(
        "Betty Boop",
        ContactInfo::new("100 Vintage Street", "St. John's", "NL", "A4N 2M8", "709-121-1212"),
    );

    let books = [
        NewBook::new("Upside Down", Some(steele), "123456D", "Random House"),
        NewBook::new("12 Rules For Life", Some(peterson), "123457H", "Random House"),
        NewBook::new("The Wish", Some(sparks), "123458D", "Random House"),
        NewBook::new("The Wish", Some(sparks), "123458D", "Random House"),
    ];
    for book in books {
        registry.add_book(book)?;
    }

    info!(
        books = registry.all_books().len(),
        authors = registry.all_authors().len(),
        patrons = registry.all_patrons().len(),
        "sample catalog loaded"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::audit;
    use crate::ids::{AuthorId, BookId, PatronId};

    #[test]
    fn test_sample_catalog_contents() {
        let mut registry = CatalogRegistry::new();
        load_sample_catalog(&mut registry).unwrap();

        assert_eq!(registry.all_authors().len(), 3);
        assert_eq!(registry.all_patrons().len(), 3);
        assert_eq!(registry.all_books().len(), 4);
        assert_eq!(registry.available_copies("123458D"), 2);
        assert_eq!(registry.available_copies("123457H"), 1);
        assert_eq!(registry.search_by_author("Danielle Steele").len(), 1);
        assert_eq!(registry.search_by_title("The Wish").len(), 2);
    }

    #[test]
    fn test_sample_catalog_ids_are_deterministic() {
        let mut registry = CatalogRegistry::new();
        load_sample_catalog(&mut registry).unwrap();

        assert_eq!(registry.author(AuthorId(3)).unwrap().name, "Nicholas Sparks");
        assert_eq!(registry.patron(PatronId(2)).unwrap().name, "Daisy Duck");
        assert_eq!(registry.book(BookId(2)).unwrap().title, "12 Rules For Life");
        assert_eq!(
            registry.author(AuthorId(3)).unwrap().written_books(),
            &[BookId(3), BookId(4)]
        );
    }

    #[test]
    fn test_sample_catalog_is_consistent() {
        let mut registry = CatalogRegistry::new();
        load_sample_catalog(&mut registry).unwrap();

        assert!(audit(&registry).is_clean());
    }
}
