//! Integration tests for the similarity index.
//!
//! These build small catalogs through the public API and check the
//! ranking guarantees callers rely on.

use data_loader::{Catalog, MatchMode, MovieId};
use similarity::{IndexConfig, SimilarityIndex};
use std::sync::Arc;

fn s(v: &str) -> Option<String> {
    Some(v.to_string())
}

fn scenario_catalog() -> Catalog {
    let mut catalog = Catalog::new();
    catalog.push(
        "toy story",
        s("john"),
        [s("tom"), s("tim"), s("ted")],
        s("animation comedy"),
    );
    catalog.push(
        "toy story 2",
        s("john"),
        [s("tom"), s("tim"), s("ted")],
        s("animation comedy"),
    );
    catalog.push(
        "alien",
        s("ridley"),
        [s("sig"), s("john"), s("ian")],
        s("horror scifi"),
    );
    catalog
}

/// A mid-sized catalog with overlapping credits for property checks
fn create_test_setup() -> SimilarityIndex {
    let mut catalog = scenario_catalog();
    catalog.push(
        "The Matrix",
        s("Lana Wachowski"),
        [s("Keanu Reeves"), s("Laurence Fishburne"), s("Carrie-Anne Moss")],
        s("Action Sci-Fi"),
    );
    catalog.push(
        "The Matrix Reloaded",
        s("Lana Wachowski"),
        [s("Keanu Reeves"), s("Laurence Fishburne"), s("Carrie-Anne Moss")],
        s("Action Sci-Fi Thriller"),
    );
    catalog.push(
        "John Wick",
        s("Chad Stahelski"),
        [s("Keanu Reeves"), s("Michael Nyqvist"), s("Alfie Allen")],
        s("Action Crime Thriller"),
    );
    catalog.push(
        "Clone",
        s("Benedek Fliegauf"),
        [s("Eva Green"), s("Matt Smith"), None],
        s("Drama Sci-Fi"),
    );
    catalog.push(
        "Clone",
        s("Someone Else"),
        [s("Eva Green"), None, None],
        s("Horror"),
    );
    catalog.push(
        "Speed",
        s("Jan de Bont"),
        [s("Keanu Reeves"), s("Sandra Bullock"), s("Dennis Hopper")],
        s("Action Crime Thriller"),
    );
    catalog.push("No Credits", None, [None, None, None], None);
    SimilarityIndex::build(catalog, IndexConfig::default())
}

fn ids(index: &SimilarityIndex, title: &str, k: usize) -> Vec<MovieId> {
    index.query(title, k).iter().map(|r| r.movie_id).collect()
}

#[test]
fn test_scenario_a_shared_signature_ranks_higher() {
    let index = SimilarityIndex::build(scenario_catalog(), IndexConfig::default());
    let recs = index.query("toy story", 2);

    let titles: Vec<&str> = recs.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["toy story 2", "alien"]);
    assert!(recs[0].score > recs[1].score);
}

#[test]
fn test_scenario_b_no_match_is_empty() {
    let index = create_test_setup();
    assert!(index.query("nonexistent movie xyz", 5).is_empty());
}

#[test]
fn test_scenario_c_substring_anchor_excluded() {
    let index = create_test_setup();
    assert_eq!(index.find_anchor("matrix", MatchMode::Substring), Some(3));

    let recs = index.query("matrix", 5);
    assert!(!recs.is_empty());
    assert!(recs.iter().all(|r| r.movie_id != 3));
    assert_eq!(recs[0].title, "the matrix reloaded");
}

#[test]
fn test_scenario_d_duplicate_titles_anchor_lowest_ordinal() {
    let index = create_test_setup();
    assert_eq!(index.find_anchor("clone", MatchMode::Exact), Some(6));

    let recs = index.query("clone", 3);
    assert!(recs.iter().all(|r| r.movie_id != 6));
    // The other "clone" row is a legitimate neighbour
    assert!(recs.iter().any(|r| r.movie_id == 7));
    assert_eq!(recs, index.query("CLONE", 3));
}

#[test]
fn test_determinism() {
    let index = create_test_setup();
    let first = index.query("matrix", 5);
    assert!(!first.is_empty());
    for _ in 0..10 {
        assert_eq!(index.query("matrix", 5), first);
    }
    // Rebuilding from the same catalog gives the same answer
    let rebuilt = create_test_setup();
    assert_eq!(ids(&rebuilt, "the matrix", 9), ids(&index, "the matrix", 9));
}

#[test]
fn test_symmetry_and_self_maximality() {
    let index = create_test_setup();
    let n = index.catalog().len();
    for i in 0..n {
        let own = index.similarity(i, i).unwrap();
        assert_eq!(own, 1.0);
        for j in 0..n {
            let sij = index.similarity(i, j).unwrap();
            assert_eq!(sij, index.similarity(j, i).unwrap());
            assert!(own >= sij);
            assert!((0.0..=1.0).contains(&sij));
        }
    }
}

#[test]
fn test_bounded_output() {
    let index = create_test_setup();
    let n = index.catalog().len();
    for k in [0, 1, 3, 5, n - 1, n, n + 10] {
        let recs = index.query("speed", k);
        assert!(recs.len() <= k);
        assert_eq!(recs.len(), k.min(n - 1));
    }
}

#[test]
fn test_case_insensitivity() {
    let index = create_test_setup();
    assert_eq!(index.query("JOHN WICK", 5), index.query("john wick", 5));
    assert_eq!(index.query("  John Wick ", 5), index.query("john wick", 5));
}

#[test]
fn test_ordering_descending_with_ordinal_ties() {
    let index = create_test_setup();
    let recs = index.query("no credits", 20);
    // Every score is 0: pure ordinal order
    let got: Vec<MovieId> = recs.iter().map(|r| r.movie_id).collect();
    assert_eq!(got, (0..9).collect::<Vec<_>>());

    let recs = index.query("speed", 20);
    for pair in recs.windows(2) {
        assert!(
            pair[0].score > pair[1].score
                || (pair[0].score == pair[1].score && pair[0].movie_id < pair[1].movie_id)
        );
    }
}

#[test]
fn test_default_k_from_config() {
    let catalog = create_test_setup().catalog().clone();
    let index = SimilarityIndex::build(catalog, IndexConfig::default().with_default_k(2));
    assert_eq!(index.query_default("speed").len(), 2);
}

#[test]
fn test_exact_mode_config() {
    let catalog = create_test_setup().catalog().clone();
    let index = SimilarityIndex::build(
        catalog,
        IndexConfig::default().with_match_mode(MatchMode::Exact),
    );
    assert!(index.query("matrix", 5).is_empty());
    assert!(!index.query("the matrix", 5).is_empty());
}

#[test]
fn test_concurrent_queries_share_index() {
    let index = Arc::new(create_test_setup());
    let expected = index.query("speed", 4);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let index = Arc::clone(&index);
            std::thread::spawn(move || index.query("speed", 4))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
