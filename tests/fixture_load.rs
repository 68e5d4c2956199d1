use bookstore_fixture::configs::FixtureConfig;
use bookstore_fixture::item::repo::MemoryObjectManager;
use bookstore_fixture::item::is_valid_isbn13;
use bookstore_fixture::Argument;
use clap::Parser;
use std::collections::{HashMap, HashSet};

fn seeded_config(seed: u64) -> FixtureConfig {
    FixtureConfig { seed: Some(seed), ..FixtureConfig::default() }
}

#[test]
fn seed_empty_store_end_to_end() {
    let argument = Argument::parse_from(["bookstore-fixture", "--dry-run"]);
    let mut manager = MemoryObjectManager::new();

    let summary = bookstore_fixture::run(&argument, &seeded_config(20250501), &mut manager).unwrap();

    assert_eq!(summary.books, 100);
    assert_eq!(summary.reviews, 500);
    assert_eq!(manager.books().len(), 100);
    assert_eq!(manager.reviews().len(), 500);

    let book_ids: HashSet<u64> = manager.books().iter().map(|b| b.id()).collect();
    assert_eq!(book_ids.len(), 100);
    for review in manager.reviews() {
        assert!(book_ids.contains(&review.book_id()), "orphan review: {:?}", review);
        assert!((1..=5).contains(&review.rating()));
        assert!(!review.author().is_empty());
        assert!(!review.body().is_empty());
    }

    for book in manager.books() {
        assert_eq!(book.isbn().len(), 13);
        assert!(book.isbn().chars().all(|c| c.is_ascii_digit()));
        assert!(is_valid_isbn13(book.isbn()));
        assert!(!book.title().is_empty());
        assert!(!book.author().is_empty());
    }
}

#[test]
fn reviews_spread_over_many_books() {
    let argument = Argument::parse_from(["bookstore-fixture", "--dry-run"]);
    let mut manager = MemoryObjectManager::new();
    bookstore_fixture::run(&argument, &seeded_config(8), &mut manager).unwrap();

    let mut per_book: HashMap<u64, usize> = HashMap::new();
    for review in manager.reviews() {
        *per_book.entry(review.book_id()).or_default() += 1;
    }

    assert!(per_book.len() > 50, "reviews hit only {} books", per_book.len());
    assert_eq!(per_book.values().sum::<usize>(), 500);
}

#[test]
fn rerun_with_append_duplicates_rows() {
    let argument = Argument::parse_from(["bookstore-fixture", "--append", "--dry-run"]);
    let mut manager = MemoryObjectManager::new();

    bookstore_fixture::run(&argument, &seeded_config(1), &mut manager).unwrap();
    bookstore_fixture::run(&argument, &seeded_config(1), &mut manager).unwrap();

    assert_eq!(manager.books().len(), 200);
    assert_eq!(manager.reviews().len(), 1000);
}

#[test]
fn rerun_without_append_resets_store() {
    let argument = Argument::parse_from(["bookstore-fixture", "--dry-run"]);
    let mut manager = MemoryObjectManager::new();

    bookstore_fixture::run(&argument, &seeded_config(1), &mut manager).unwrap();
    bookstore_fixture::run(&argument, &seeded_config(2), &mut manager).unwrap();

    assert_eq!(manager.books().len(), 100);
    assert_eq!(manager.reviews().len(), 500);
    let book_ids: HashSet<u64> = manager.books().iter().map(|b| b.id()).collect();
    assert!(manager.reviews().iter().all(|r| book_ids.contains(&r.book_id())));
}

#[test]
fn custom_counts_from_arguments() {
    let argument = Argument::parse_from(["bookstore-fixture", "--books", "5", "--reviews", "12", "--seed", "4"]);
    let config = argument.merge(&FixtureConfig::default());
    let mut manager = MemoryObjectManager::new();

    let summary = bookstore_fixture::run(&argument, &config, &mut manager).unwrap();

    assert_eq!((summary.books, summary.reviews), (5, 12));
    assert_eq!(manager.books().len(), 5);
    assert_eq!(manager.reviews().len(), 12);
}
