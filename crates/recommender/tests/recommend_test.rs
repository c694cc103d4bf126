//! Integration tests for recommendations over loaded files.
//!
//! These tests write small record files, load them the way the CLI does,
//! and check the ranked output end to end.

use data_loader::{DataIndex, MOVIES_FILE, USERS_FILE};
use rayon::prelude::*;
use recommender::{MovieAndRank, Recommender};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

const MOVIES: &str = "\
ID00001
The Long Night
2001
Ana Ruiz
Kim Park,Lee Moss
Drama,Thriller
8.0

ID00002
Morning After
2003
Ana Ruiz
Lee Moss
Drama
7.0

ID00003
Quiet Rooms
1998
Ana Ruiz
Kim Park
Drama
7.5

ID00004
Harbor Lights
2010
Jo Grant

Comedy
9.1

ID00005
Second Watch
2005
Jo Grant
Kim Park
Thriller
6.0
";

const USERS: &str = "\
Dana Holt
dana@example.com
2
ID00001
ID00404

Eli Stone
eli@example.com
0
";

fn create_test_setup() -> (TempDir, Arc<DataIndex>) {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(MOVIES_FILE), MOVIES).unwrap();
    fs::write(dir.path().join(USERS_FILE), USERS).unwrap();

    let index = DataIndex::load_from_files(dir.path()).unwrap();
    (dir, Arc::new(index))
}

#[test]
fn test_full_ranking_from_files() {
    let (_dir, index) = create_test_setup();
    let recommender = Recommender::new(index);

    let recs = recommender.recommend_movies("dana@example.com", 10);

    // ID00002: director 20 + actor Lee Moss 30 + Drama 1 = 51
    // ID00003: director 20 + actor Kim Park 30 + Drama 1 = 51, higher rating
    // ID00005: actor Kim Park 30 + Thriller 1 = 31
    // ID00004 shares nothing; ID00001 is watched; ID00404 is unknown
    assert_eq!(
        recs,
        vec![
            MovieAndRank::new("ID00003", 51),
            MovieAndRank::new("ID00002", 51),
            MovieAndRank::new("ID00005", 31),
        ]
    );
}

#[test]
fn test_truncation_and_empty_history() {
    let (_dir, index) = create_test_setup();
    let recommender = Recommender::new(index);

    let top = recommender.recommend_movies("dana@example.com", 1);
    assert_eq!(top, vec![MovieAndRank::new("ID00003", 51)]);

    assert!(recommender.recommend_movies("eli@example.com", 10).is_empty());
    assert!(recommender.recommend_movies("DANA@example.com", 10).is_empty());
}

#[test]
fn test_concurrent_requests_agree() {
    let (_dir, index) = create_test_setup();
    let recommender = Recommender::new(index);
    let expected = recommender.recommend_movies("dana@example.com", 10);

    let results: Vec<Vec<MovieAndRank>> = (0..64)
        .into_par_iter()
        .map(|_| recommender.recommend_movies("dana@example.com", 10))
        .collect();

    assert!(results.iter().all(|recs| *recs == expected));
}
