use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{DataIndex, MOVIES_FILE, USERS_FILE};
use rayon::prelude::*;
use recommender::{ExplainedRecommendation, MovieAndRank, Recommender, ScoreWeights};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

/// movie-recs - Movie lookups and recommendations
#[derive(Parser)]
#[command(name = "movie-recs")]
#[command(about = "Movie lookups and recommendations from a user's watch history", long_about = None)]
struct Cli {
    /// Directory containing the record files
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    /// User records file, relative to the data directory
    #[arg(long, default_value = USERS_FILE)]
    users_file: PathBuf,

    /// Movie records file, relative to the data directory
    #[arg(long, default_value = MOVIES_FILE)]
    movies_file: PathBuf,

    /// Points per director shared with a watched movie
    #[arg(long, default_value_t = ScoreWeights::default().director)]
    director_weight: u32,

    /// Points per actor shared with a watched movie
    #[arg(long, default_value_t = ScoreWeights::default().actor)]
    actor_weight: u32,

    /// Points per genre shared with a watched movie
    #[arg(long, default_value_t = ScoreWeights::default().genre)]
    genre_weight: u32,

    /// Defaults to the interactive menu
    #[command(subcommand)]
    command: Option<Commands>,
}

impl Cli {
    fn weights(&self) -> ScoreWeights {
        ScoreWeights {
            director: self.director_weight,
            actor: self.actor_weight,
            genre: self.genre_weight,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Menu-driven lookups and recommendations
    Interactive,

    /// Look up a user by email
    User {
        #[arg(long)]
        email: String,
    },

    /// Find movies by id, actor, director or genre (exact match)
    Movie {
        #[arg(long)]
        query: String,
    },

    /// Get movie recommendations for a user
    Recommend {
        /// Email of the user to recommend for
        #[arg(long)]
        email: String,

        /// Number of recommendations to return
        #[arg(long, default_value = "10", allow_negative_numbers = true)]
        count: i32,

        /// Show the points behind each score
        #[arg(long)]
        explain: bool,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run benchmark to test performance
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Recommendations per request
        #[arg(long, default_value = "10")]
        count: i32,
    },
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let users_path = cli.data_dir.join(&cli.users_file);
    let movies_path = cli.data_dir.join(&cli.movies_file);

    let start = Instant::now();
    let data_index = Arc::new(
        DataIndex::load(&users_path, &movies_path).with_context(|| {
            format!("Failed to load record files from {}", cli.data_dir.display())
        })?,
    );
    let (users, movies) = data_index.counts();
    println!(
        "{} Loaded {} users and {} movies in {:?}",
        "✓".green(),
        users,
        movies,
        start.elapsed()
    );

    let recommender = Recommender::new(data_index.clone()).with_weights(cli.weights());

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Interactive => run_interactive(&data_index, &recommender)?,
        Commands::User { email } => handle_user(&data_index, &email),
        Commands::Movie { query } => handle_movie(&data_index, &query),
        Commands::Recommend {
            email,
            count,
            explain,
            json,
        } => handle_recommend(&recommender, &email, count, explain, json)?,
        Commands::Benchmark { requests, count } => {
            handle_benchmark(&data_index, &recommender, requests, count)?
        }
    }

    Ok(())
}

/// Menu loop: 1 user lookup, 2 movie lookup, 3 recommendations, 9 exit
fn run_interactive(data_index: &DataIndex, recommender: &Recommender) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        println!("1. User lookup\n2. Movie lookup\n3. Recommendation generator\n9. Exit");
        let Some(choice) = prompt(&mut lines, "Enter a number: ")? else {
            return Ok(());
        };

        match choice.as_str() {
            "1" => loop {
                match prompt(&mut lines, "Enter user email address (or quit): ")? {
                    Some(email) if email != "quit" => handle_user(data_index, &email),
                    _ => break,
                }
            },
            "2" => loop {
                match prompt(&mut lines, "Enter movie attribute (or quit): ")? {
                    Some(query) if query != "quit" => handle_movie(data_index, &query),
                    _ => break,
                }
            },
            "3" => {
                let Some(email) = prompt(&mut lines, "Please enter your email address: ")? else {
                    return Ok(());
                };
                let Some(count) =
                    prompt(&mut lines, "How many recommendations would you like to receive? ")?
                else {
                    return Ok(());
                };
                match count.trim().parse::<i32>() {
                    Ok(count) => handle_recommend(recommender, &email, count, false, false)?,
                    Err(_) => println!("{} is not a number", count),
                }
            }
            "9" => return Ok(()),
            _ => println!("Unknown choice"),
        }
    }
}

/// Print `message` and read one line; `None` once stdin is exhausted
fn prompt<I>(lines: &mut I, message: &str) -> Result<Option<String>>
where
    I: Iterator<Item = io::Result<String>>,
{
    print!("{}", message);
    io::stdout().flush()?;
    match lines.next() {
        Some(line) => Ok(Some(line?)),
        None => Ok(None),
    }
}

/// Handle the 'user' command
fn handle_user(data_index: &DataIndex, email: &str) {
    let start = Instant::now();
    let user = data_index.users().get_user_from_email(email);
    let elapsed = start.elapsed();

    match user {
        None => println!("No user in the database has that email address."),
        Some(user) => {
            println!("{}", format!("Found {}", user.full_name).bold().blue());
            println!("{}Email: {}", "• ".green(), user.email);
            println!("{}Movies watched: {}", "• ".green(), user.watch_history.len());
            for movie_id in &user.watch_history {
                match data_index.movies().get_movie_from_id(movie_id) {
                    Some(movie) => println!("  - {} ({})", movie.title, movie.release_year),
                    None => println!("  - {} {}", movie_id, "(not in catalog)".yellow()),
                }
            }
        }
    }
    println!("Took {}µs", elapsed.as_micros());
}

/// Handle the 'movie' command
fn handle_movie(data_index: &DataIndex, query: &str) {
    let start = Instant::now();
    let matches = data_index.movies().lookup_attribute(query);
    let elapsed = start.elapsed();

    for hit in &matches {
        println!("{}: Found {}", hit.kind.to_string().cyan(), hit.movie.title);
    }
    println!("Found a total of {} matches.", matches.len());
    println!("Took {}µs", elapsed.as_micros());
}

/// Handle the 'recommend' command
fn handle_recommend(
    recommender: &Recommender,
    email: &str,
    count: i32,
    explain: bool,
    json: bool,
) -> Result<()> {
    let start = Instant::now();
    let recommendations = recommender.explain_recommendations(email, count);
    let elapsed = start.elapsed();
    info!(
        "Generated {} recommendations for {} in {:?}",
        recommendations.len(),
        email,
        elapsed
    );

    if json {
        let output = if explain {
            serde_json::to_string_pretty(&recommendations)?
        } else {
            let ranks: Vec<_> = recommendations
                .iter()
                .map(|rec| MovieAndRank::new(rec.movie_id.clone(), rec.compatibility_score))
                .collect();
            serde_json::to_string_pretty(&ranks)?
        };
        println!("{}", output);
        return Ok(());
    }

    println!("Recommendation generation took {}ms", elapsed.as_millis());
    print_recommendations(&recommendations, explain);
    Ok(())
}

/// Helper function to format and print recommendations
fn print_recommendations(
    recommendations: &[ExplainedRecommendation],
    explain: bool,
) {
    if recommendations.is_empty() {
        println!("No recommendations found");
        return;
    }

    println!("{}", "Movie Recommendations:".bold().blue());
    for (rank, rec) in recommendations.iter().enumerate() {
        println!("{}. {}", (rank + 1).to_string().green(), rec.title);
        println!("   Rating: {}", rec.rating);
        println!("   Compatibility Score: {}", rec.compatibility_score);
        if explain {
            let b = &rec.breakdown;
            println!(
                "   Points from directors: {}, actors: {}, genres: {}",
                b.director, b.actor, b.genre
            );
        }
    }
}

/// Handle the 'benchmark' command
fn handle_benchmark(
    data_index: &DataIndex,
    recommender: &Recommender,
    requests: usize,
    count: i32,
) -> Result<()> {
    let emails: Vec<&str> = data_index.users().emails().collect();
    if emails.is_empty() {
        bail!("No users loaded; nothing to benchmark");
    }
    if requests == 0 {
        bail!("--requests must be at least 1");
    }

    // Pick random users up front
    let picked: Vec<&str> = (0..requests)
        .map(|_| emails[rand::random::<u32>() as usize % emails.len()])
        .collect();

    // Requests share the recommender read-only and run in parallel
    let wall_start = Instant::now();
    let mut timings: Vec<Duration> = picked
        .par_iter()
        .map(|email| {
            let start = Instant::now();
            let recs = recommender.recommend_movies(email, count);
            std::hint::black_box(recs);
            start.elapsed()
        })
        .collect();
    let wall_time = wall_start.elapsed();

    let total_latency: Duration = timings.iter().sum();
    let avg_latency = total_latency / timings.len() as u32;
    timings.sort();
    let p50 = timings[timings.len() / 2];
    let p95 = timings[(timings.len() as f32 * 0.95) as usize];
    let p99 = timings[(timings.len() as f32 * 0.99) as usize];
    let throughput = requests as f32 / wall_time.as_secs_f32();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Total time: {:?}", wall_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", p50);
    println!("P95 latency: {:?}", p95);
    println!("P99 latency: {:?}", p99);
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}
