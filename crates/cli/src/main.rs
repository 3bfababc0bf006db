use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::MatchMode;
use rand::Rng;
use server::{AppConfig, AppContext, SearchHit};
use similarity::{Recommendation, SimilarityIndex};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::info;

/// CineSmart - Content-Based Movie Recommendations
#[derive(Parser)]
#[command(name = "cinesmart")]
#[command(about = "Movie recommendations from shared directors, cast and genres", long_about = None)]
struct Cli {
    /// Path to the movie CSV dataset
    #[arg(short, long, default_value = "final_data.csv")]
    data_path: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get movies similar to a title
    Recommend {
        /// Movie title to start from (case-insensitive)
        #[arg(long)]
        title: String,

        /// Number of recommendations to return
        #[arg(long, default_value = "5")]
        limit: usize,

        /// Require the whole title to match instead of a substring
        #[arg(long)]
        exact: bool,

        /// Fetch poster and overview data (needs TMDB_API_KEY)
        #[arg(long)]
        enrich: bool,
    },

    /// Search the catalog for titles
    Search {
        /// Title to search for (case-insensitive)
        #[arg(long)]
        title: String,

        /// Require the whole title to match instead of a substring
        #[arg(long)]
        exact: bool,
    },

    /// Show the signature and heaviest terms of a movie
    Inspect {
        /// Movie title to inspect
        #[arg(long)]
        title: String,

        /// Number of terms to show
        #[arg(long, default_value = "10")]
        terms: usize,
    },

    /// Run benchmark to test query performance
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Number of concurrent requests
        #[arg(long, default_value = "10")]
        concurrent: usize,
    },
}

fn match_mode(exact: bool) -> MatchMode {
    if exact {
        MatchMode::Exact
    } else {
        MatchMode::Substring
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::from_env()?;
    config.dataset_path = cli.data_path.clone();

    // Load the dataset and build the index (this may take a moment)
    println!("Loading movie dataset from {}...", cli.data_path.display());
    let start = Instant::now();
    let context = AppContext::build(config).context("Failed to build recommendation index")?;
    let stats = context.index.stats();
    println!(
        "{} Indexed {} movies ({} terms) in {:?}",
        "✓".green(),
        stats.movies,
        stats.vocabulary_size,
        start.elapsed()
    );

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Recommend {
            title,
            limit,
            exact,
            enrich,
        } => handle_recommend(&context, &title, limit, match_mode(exact), enrich).await?,
        Commands::Search { title, exact } => {
            handle_search(&context.index, &title, match_mode(exact))
        }
        Commands::Inspect { title, terms } => handle_inspect(&context.index, &title, terms)?,
        Commands::Benchmark {
            requests,
            concurrent,
        } => handle_benchmark(context.index.clone(), requests, concurrent).await?,
    }

    Ok(())
}

/// Handle the 'recommend' command
async fn handle_recommend(
    context: &AppContext,
    title: &str,
    limit: usize,
    mode: MatchMode,
    enrich: bool,
) -> Result<()> {
    let index = &context.index;
    let Some(anchor) = index.find_anchor(title, mode) else {
        println!("{} No movie matches '{}'", "✗".red(), title);
        return Ok(());
    };
    let anchor_title = index
        .catalog()
        .get(anchor)
        .map(|m| m.title.as_str())
        .unwrap_or(title);

    let recommendations = index.query_with_mode(title, limit, mode);
    print_recommendations(anchor_title, &recommendations);

    if enrich {
        let service = context.search_service()?;
        info!("Fetching metadata for {} recommendations", recommendations.len());
        let hits = service.enrich(recommendations).await;
        print_hits(&hits);
    }
    Ok(())
}

/// Handle the 'search' command
fn handle_search(index: &SimilarityIndex, title: &str, mode: MatchMode) {
    let matches = index.catalog().find_all(title, mode);
    let anchor = index.find_anchor(title, mode);

    println!(
        "{}",
        format!("Search results for '{}' ({} match):", title, mode)
            .bold()
            .blue()
    );
    if matches.is_empty() {
        println!("  no matching titles");
        return;
    }
    for movie in matches.iter().take(20) {
        let marker = if Some(movie.id) == anchor {
            " [anchor]".yellow().to_string()
        } else {
            String::new()
        };
        println!(
            "{}: {} - {}{}",
            movie.id,
            movie.title,
            movie.director.as_deref().unwrap_or("unknown director"),
            marker
        );
    }
    if matches.len() > 20 {
        println!("  ... and {} more", matches.len() - 20);
    }
}

/// Handle the 'inspect' command
fn handle_inspect(index: &SimilarityIndex, title: &str, terms: usize) -> Result<()> {
    let Some(id) = index.find_anchor(title, index.config().match_mode) else {
        bail!("No movie matches '{}'", title);
    };
    let Some(movie) = index.catalog().get(id) else {
        bail!("Movie {} missing from catalog", id);
    };

    println!("{}", format!("Movie {}: {}", id, movie.title).bold().blue());
    println!("{}Director: {}", "• ".green(), movie.director.as_deref().unwrap_or("-"));
    let cast: Vec<&str> = movie.actors.iter().flatten().map(String::as_str).collect();
    println!("{}Cast: {}", "• ".green(), cast.join(", "));
    println!("{}Genres: {}", "• ".green(), movie.genres.as_deref().unwrap_or("-"));
    println!("{}Signature: {:?}", "• ".cyan(), movie.signature);

    println!("Heaviest terms:");
    for (term, weight) in index.top_terms(id, terms) {
        println!("  - {:<30} {:.4}", term, weight);
    }
    Ok(())
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    index: Arc<SimilarityIndex>,
    requests: usize,
    concurrent: usize,
) -> Result<()> {
    let catalog_size = index.catalog().len();
    if catalog_size == 0 || requests == 0 {
        bail!("Benchmark needs a non-empty catalog and at least one request");
    }

    // Random catalog titles as queries
    let titles: Vec<String> = {
        let mut rng = rand::rng();
        (0..requests)
            .filter_map(|_| {
                let id = rng.random_range(0..catalog_size);
                index.catalog().get(id).map(|m| m.title.clone())
            })
            .collect()
    };

    let permits = Arc::new(Semaphore::new(concurrent.max(1)));
    let wall_clock = Instant::now();

    // Use tokio::spawn to make concurrent requests
    let mut handles = vec![];
    for title in titles {
        let index = Arc::clone(&index);
        let permits = Arc::clone(&permits);
        let handle = tokio::spawn(async move {
            let _permit = permits.acquire_owned().await?;
            let start = Instant::now();
            tokio::task::spawn_blocking(move || index.query(&title, 5)).await?;
            Ok::<_, anyhow::Error>(start.elapsed())
        });
        handles.push(handle);
    }
    // Wait for all tasks to complete and collect timings
    let mut timings = vec![];
    for handle in handles {
        let elapsed = handle.await??;
        timings.push(elapsed);
    }
    let total_time = wall_clock.elapsed();

    let latency_sum: Duration = timings.iter().sum();
    let avg_latency = latency_sum / (timings.len() as u32);
    timings.sort();
    let percentile = |p: f32| timings[((timings.len() as f32 * p) as usize).min(timings.len() - 1)];
    let throughput = timings.len() as f32 / total_time.as_secs_f32();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Requests: {} ({} concurrent)", timings.len(), concurrent.max(1));
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

/// Helper function to format and print recommendations
fn print_recommendations(anchor: &str, recommendations: &[Recommendation]) {
    println!("{}", format!("Movies like '{}':", anchor).bold().blue());
    if recommendations.is_empty() {
        println!("  no recommendations");
    }
    for (i, rec) in recommendations.iter().enumerate() {
        println!(
            "{}. {} - Score: {:.3}",
            (i + 1).to_string().green(),
            rec.title,
            rec.score
        );
    }
}

fn print_hits(hits: &[SearchHit]) {
    println!("{}", "Metadata:".bold().blue());
    if hits.is_empty() {
        println!("  no metadata found");
    }
    for hit in hits {
        let meta = &hit.metadata;
        println!(
            "{} ({}) rating {}",
            meta.title.as_deref().unwrap_or(&hit.title).bold(),
            meta.release_year()
                .map(|y| y.to_string())
                .unwrap_or_else(|| "????".to_string()),
            meta.vote_average
                .map(|v| format!("{:.1}", v))
                .unwrap_or_else(|| "-".to_string())
        );
        if let Some(overview) = meta.overview.as_deref().filter(|o| !o.is_empty()) {
            println!("   {}", overview);
        }
        if let Some(url) = meta.poster_url() {
            println!("   {}", url.dimmed());
        }
    }
}
