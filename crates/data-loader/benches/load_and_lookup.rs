//! Benchmarks for building and querying the movie indices
//!
//! Run with: cargo bench --package data-loader
//!
//! Uses a synthetic catalog so no data files are needed. The sorted case
//! shows the cost of the unbalanced tree when ids arrive in key order.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use data_loader::{Movie, MovieDatabase};

fn synthetic_movies(count: usize, sorted_ids: bool) -> Vec<Movie> {
    (0..count)
        .map(|i| {
            // Multiplying by a prime scatters keys across the tree
            let n = if sorted_ids { i } else { (i * 7919) % count };
            Movie {
                id: format!("ID{:05}", n),
                title: format!("Movie {}", n),
                release_year: "2000".to_string(),
                directors: vec![format!("Director {}", n % 97)],
                actors: vec![format!("Actor {}", n % 301), format!("Actor {}", n % 89)],
                genres: vec![format!("Genre {}", n % 20)],
                rating: (n % 50) as f32 / 10.0,
            }
        })
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let movies = synthetic_movies(5_000, false);
    c.bench_function("build_movie_database_scattered", |b| {
        b.iter(|| MovieDatabase::from_movies(black_box(movies.clone())))
    });

    let sorted = synthetic_movies(5_000, true);
    c.bench_function("build_movie_database_sorted", |b| {
        b.iter(|| MovieDatabase::from_movies(black_box(sorted.clone())))
    });
}

fn bench_lookup(c: &mut Criterion) {
    let db = MovieDatabase::from_movies(synthetic_movies(5_000, false));

    c.bench_function("get_movie_from_id", |b| {
        b.iter(|| black_box(db.get_movie_from_id(black_box("ID04321"))))
    });
    c.bench_function("get_movies_with_actor", |b| {
        b.iter(|| black_box(db.get_movies_with_actor(black_box("Actor 42"))))
    });
}

criterion_group!(benches, bench_build, bench_lookup);
criterion_main!(benches);
