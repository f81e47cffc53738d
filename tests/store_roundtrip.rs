//! Store persistence round-trip through real files.

use std::collections::HashMap;

use verse_solver::core::book::BookId;
use verse_solver::core::mapping::VersificationMapping;
use verse_solver::core::reference::Reference;
use verse_solver::core::scheme::VersificationScheme;
use verse_solver::store::set::SchemeStore;

fn r(book: BookId, chapter: u32, verse: &str) -> Reference {
    Reference::parse_parts(book, chapter, verse).unwrap()
}

fn build_store() -> SchemeStore {
    let mut store = SchemeStore::new();

    // A scheme with a deliberately non-sorted order: title pseudo-verse
    // before verse 1, and Psalms before Genesis.
    let odd = VersificationScheme::from_reference_list(
        "Odd",
        Some("unusual ordering".to_string()),
        vec!["Strange".to_string()],
        vec![
            r(BookId::Ps, 3, "1/t"),
            r(BookId::Ps, 3, "1"),
            r(BookId::Gen, 1, "1"),
            r(BookId::Gen, 1, "2"),
        ],
    )
    .unwrap();

    let plain = VersificationScheme::from_reference_list(
        "Plain",
        None,
        Vec::new(),
        vec![
            r(BookId::Gen, 1, "1"),
            r(BookId::Gen, 1, "2"),
            r(BookId::Ps, 3, "1"),
        ],
    )
    .unwrap();

    store.add_scheme(odd).unwrap();
    store.add_scheme(plain).unwrap();

    let odd = store.find_scheme("Odd").unwrap().clone();
    let plain = store.find_scheme("Plain").unwrap().clone();
    let rules: HashMap<Reference, Vec<Reference>> = HashMap::from([
        (
            r(BookId::Ps, 3, "1/t"),
            vec![r(BookId::Ps, 3, "1")],
        ),
        (
            r(BookId::Ps, 3, "1"),
            vec![r(BookId::Ps, 3, "1")],
        ),
        (
            r(BookId::Gen, 1, "1"),
            vec![r(BookId::Gen, 1, "1"), r(BookId::Gen, 1, "2")],
        ),
    ]);
    let mapping = VersificationMapping::build(odd, plain, rules).unwrap();
    store.add_mapping(mapping).unwrap();

    store
}

#[test]
fn test_file_round_trip_preserves_semantics() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");

    let store = build_store();
    store.save_to_file(&path).unwrap();

    let loaded = SchemeStore::load_from_file(&path).unwrap();
    assert_eq!(loaded.schemes().len(), 2);
    assert_eq!(loaded.mappings().len(), 1);

    // Order and membership survive
    let odd = loaded.find_scheme("Strange").unwrap();
    assert_eq!(odd.name(), "Odd");
    assert_eq!(odd.description(), Some("unusual ordering"));
    assert_eq!(odd.reference(0).unwrap(), &r(BookId::Ps, 3, "1/t"));
    assert_eq!(odd.reference(2).unwrap(), &r(BookId::Gen, 1, "1"));

    // Rules survive, including multi-target ones
    let mapping = loaded.find_mapping("Odd/Plain").unwrap();
    assert_eq!(mapping.rule_count(), 3);
    assert_eq!(
        mapping.lookup(&r(BookId::Gen, 1, "1")),
        Some(&[r(BookId::Gen, 1, "1"), r(BookId::Gen, 1, "2")][..])
    );
    // Unmapped member stays unmapped, not an error
    assert_eq!(mapping.lookup(&r(BookId::Gen, 1, "2")), Some(&[][..]));
}

#[test]
fn test_save_load_save_is_stable() {
    let dir = tempfile::tempdir().unwrap();
    let path_a = dir.path().join("a.json");
    let path_b = dir.path().join("b.json");

    let store = build_store();
    store.save_to_file(&path_a).unwrap();

    let loaded = SchemeStore::load_from_file(&path_a).unwrap();
    loaded.save_to_file(&path_b).unwrap();

    let strip_timestamp = |text: &str| {
        text.lines()
            .filter(|line| !line.contains("created_at"))
            .collect::<Vec<_>>()
            .join("\n")
    };
    let a = strip_timestamp(&std::fs::read_to_string(&path_a).unwrap());
    let b = strip_timestamp(&std::fs::read_to_string(&path_b).unwrap());
    assert_eq!(a, b);
}

#[test]
fn test_identity_selector_matches_manual_identity() {
    let store = build_store();
    let from = store.find_scheme("Plain").unwrap().clone();
    let to = store.find_scheme("Odd").unwrap().clone();

    let manual = VersificationMapping::identity(from, to).unwrap();
    let via_store = store.find_mapping("Plain/Odd/-1").unwrap();

    assert_eq!(manual.rule_count(), 3);
    assert_eq!(manual.rule_count(), via_store.rule_count());
    for reference in store.find_scheme("Plain").unwrap().references() {
        assert_eq!(manual.lookup(reference), via_store.lookup(reference));
    }
}
