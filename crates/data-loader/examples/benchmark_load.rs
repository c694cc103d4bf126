use data_loader::DataIndex;
use std::path::Path;
use std::time::Instant;

fn main() {
    let data_dir = Path::new("data");

    println!("Loading users.txt and movies.txt...\n");

    let start = Instant::now();
    let index = DataIndex::load_from_files(data_dir)
        .expect("Failed to load dataset");
    let elapsed = start.elapsed();

    let (users, movies) = index.counts();

    println!("=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Users: {}", users);
    println!("Movies: {}", movies);
    for stats in index.movies().index_stats() {
        println!(
            "  {:<8} index: {} keys, {} entries, height {}",
            stats.name, stats.keys, stats.entries, stats.height
        );
    }
    println!("\nPerformance: {:.0} records/second",
             (users + movies) as f64 / elapsed.as_secs_f64());
}
