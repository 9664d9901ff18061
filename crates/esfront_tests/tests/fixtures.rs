//! Runs every case under `fixtures/`.

use std::path::Path;

use esfront_tests::{discover, FixtureSuite};

fn fixtures_root() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures"))
}

#[test]
fn test_fixture_tree_is_discovered() {
    let cases = discover(fixtures_root());
    assert!(cases.iter().any(|c| c.category == "core"));
    assert!(cases.iter().any(|c| c.category == "flow"));
    assert!(cases.iter().any(|c| c.category == "jsx"));
}

#[test]
fn test_all_fixtures_pass() {
    let suite = FixtureSuite::run(fixtures_root());
    suite.print_summary();
    assert!(suite.failures().is_empty(), "{} fixture(s) failed", suite.failures().len());
}
