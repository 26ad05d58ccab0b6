// Library Catalog CLI
// Driver around the catalog core: seeds the sample catalog, then reports,
// searches, runs the scripted demo or an interactive shell.

mod display;
mod shell;

use anyhow::{Context as AnyhowContext, Result};
use chrono::{Days, NaiveDate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use library_catalog::{
    audit, load_sample_catalog, local_today, BookId, CatalogConfig, CatalogRegistry, PatronId,
};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// In-memory lending library catalog.
#[derive(Parser)]
#[command(name = "library-catalog")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a JSON config file (loan policy)
    #[arg(global = true, short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(global = true, short, long)]
    verbose: bool,

    /// Start with an empty catalog instead of the sample data
    #[arg(global = true, long)]
    empty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct SearchBy {
    /// Exact title (case-insensitive)
    #[arg(long)]
    title: Option<String>,

    /// Exact author name (case-insensitive)
    #[arg(long)]
    author: Option<String>,

    /// Exact ISBN (case-insensitive)
    #[arg(long)]
    isbn: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all books, authors and patrons
    Report {
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,
    },

    /// Search books by title, author or ISBN
    Search {
        #[command(flatten)]
        by: SearchBy,
    },

    /// Mark and list overdue books
    Overdue {
        /// Date to check against (YYYY-MM-DD, default today)
        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// Scripted walkthrough of borrowing, returning and overdue detection
    Demo {
        /// Days after the loans to run the overdue scan
        #[arg(long, default_value = "15")]
        days_later: u64,
    },

    /// Interactive session reading commands from stdin
    Shell,

    /// Show version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging (RUST_LOG wins over --verbose)
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => CatalogConfig::from_file(path)?,
        None => CatalogConfig::default(),
    };
    let mut registry = CatalogRegistry::with_config(config);
    if !cli.empty {
        load_sample_catalog(&mut registry).context("Failed to load sample catalog")?;
    }

    match cli.command {
        Commands::Report { format } => run_report(&registry, format)?,
        Commands::Search { by } => run_search(&registry, by),
        Commands::Overdue { today } => {
            let overdue = registry.overdue_book_list_on(today.unwrap_or_else(local_today));
            println!("{}", display::overdue_report(&overdue));
        }
        Commands::Demo { days_later } => run_demo(&mut registry, days_later)?,
        Commands::Shell => {
            let stdin = io::stdin();
            shell::run(&mut registry, stdin.lock(), &mut io::stdout())?;
        }
        Commands::Version => {
            println!("Library Catalog v{}", library_catalog::VERSION);
        }
    }

    Ok(())
}

fn run_report(registry: &CatalogRegistry, format: Format) -> Result<()> {
    match format {
        Format::Text => print!("{}", display::full_report(registry)),
        Format::Json => {
            let json = serde_json::to_string_pretty(&registry.snapshot())
                .context("Failed to serialize catalog")?;
            println!("{json}");
        }
    }
    Ok(())
}

fn run_search(registry: &CatalogRegistry, by: SearchBy) {
    let (label, hits) = if let Some(title) = &by.title {
        ("Title", registry.search_by_title(title))
    } else if let Some(author) = &by.author {
        ("Author", registry.search_by_author(author))
    } else if let Some(isbn) = &by.isbn {
        ("ISBN", registry.search_by_isbn(isbn))
    } else {
        ("", Vec::new())
    };

    println!("🔍 Search results by {label}");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("{}", display::book_list(registry, &hits));
}

fn run_demo(registry: &mut CatalogRegistry, days_later: u64) -> Result<()> {
    if registry.all_books().len() < 3 || registry.all_patrons().len() < 2 {
        anyhow::bail!("demo needs the sample catalog (drop --empty)");
    }

    let start = local_today();
    let scan_day = start
        .checked_add_days(Days::new(days_later))
        .context("Scan date out of range")?;
    let mini = PatronId(1);
    let daisy = PatronId(2);
    let wish = BookId(3);
    let rules = BookId(2);

    println!("📚 Library Catalog Demo");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    println!("Loan period: {} days", registry.config().loan_period_days);

    println!("\n📖 Borrowing...");
    for (patron, book) in [(mini, wish), (daisy, wish), (daisy, rules)] {
        let outcome = registry.borrow_book_on(patron, book, start)?;
        let message = display::borrow_message(
            registry,
            registry.book(book)?,
            registry.patron(patron)?,
            &outcome,
        );
        println!("{message}");
    }

    println!("\n↩️  Returning...");
    for (patron, book) in [(daisy, wish), (daisy, rules)] {
        let outcome = registry.return_book(patron, book)?;
        println!(
            "{}",
            display::return_message(registry.book(book)?, registry.patron(patron)?, &outcome)
        );
    }

    println!("\n⏰ Overdue scan on {scan_day} ({days_later} days later)...");
    let overdue = registry.overdue_book_list_on(scan_day);
    println!("{}", display::overdue_report(&overdue));

    println!("\n🔍 Consistency check...");
    println!("{}", display::audit_report(&audit(registry)));

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    print!("{}", display::full_report(registry));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_search_needs_exactly_one_field() {
        assert!(Cli::try_parse_from(["library-catalog", "search"]).is_err());
        assert!(Cli::try_parse_from([
            "library-catalog",
            "search",
            "--title",
            "The Wish",
            "--isbn",
            "123458D",
        ])
        .is_err());

        let cli = Cli::try_parse_from(["library-catalog", "search", "--title", "The Wish"]);
        match cli.map(|c| c.command) {
            Ok(Commands::Search { by }) => {
                assert_eq!(by.title.as_deref(), Some("The Wish"));
                assert!(by.author.is_none());
                assert!(by.isbn.is_none());
            }
            _ => panic!("expected a title search"),
        }
    }

    #[test]
    fn test_overdue_parses_today() {
        let cli = Cli::try_parse_from(["library-catalog", "overdue", "--today", "2024-03-16"]);
        match cli.map(|c| c.command) {
            Ok(Commands::Overdue { today }) => {
                assert_eq!(today, NaiveDate::from_ymd_opt(2024, 3, 16));
            }
            _ => panic!("expected overdue with a date"),
        }

        assert!(
            Cli::try_parse_from(["library-catalog", "overdue", "--today", "03/16/2024"]).is_err()
        );
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["library-catalog", "report", "--empty", "-v"]);
        match cli {
            Ok(cli) => {
                assert!(cli.empty);
                assert!(cli.verbose);
                assert!(cli.config.is_none());
                assert!(matches!(cli.command, Commands::Report { format: Format::Text }));
            }
            Err(e) => panic!("report should parse: {e}"),
        }
    }
}
