use clap::{Parser, Subcommand};
use std::io::BufRead;
use wine_rating_engine::{enrich, EngineConfig, EnrichOptions, ScoreResolver, WineListing};

#[derive(Parser)]
#[command(name = "wine-engine-cli")]
#[command(about = "Wine Rating Engine CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Score cache path (overrides WINE_DB_PATH)
    #[arg(short, long)]
    db: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the rating of one product name
    Resolve {
        /// Raw product name
        name: String,

        /// Disable cache
        #[arg(long)]
        no_cache: bool,

        /// Print how each candidate was scored
        #[arg(long)]
        trace: bool,
    },

    /// Resolve product names read from stdin, one per line
    Enrich {
        /// Disable cache
        #[arg(long)]
        no_cache: bool,

        /// Pause between lookups in milliseconds (defaults to config)
        #[arg(long)]
        delay_ms: Option<u64>,
    },

    /// Get cache statistics
    Stats,

    /// Clean up old cache entries
    Cleanup {
        /// Maximum age in days
        #[arg(short, long, default_value = "30")]
        max_age_days: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wine_rating_engine=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = EngineConfig::from_env()?;
    if let Some(db) = cli.db {
        config.db_path = Some(db);
    }

    let resolver = ScoreResolver::from_config(&config).await?;

    match cli.command {
        Commands::Resolve { name, no_cache, trace } => {
            println!("🔍 Resolving: {}", name);

            let (result, evaluations) = resolver
                .resolve_traced(&name, config.use_cache && !no_cache)
                .await;

            println!("   Cleaned: {}", result.cleaned_name);
            println!(
                "   Year: {}",
                result.year.map(|y| y.to_string()).unwrap_or_else(|| "N/A".to_string())
            );
            println!("   Score: {}", result.score);
            if let Some(matched) = &result.matched_name {
                println!("   Matched: {}", matched);
            }
            if let Some(ratio) = result.match_ratio {
                println!("   Match ratio: {:.2}", ratio);
            }
            println!("   Source: {}", result.source);
            println!("   Cached: {}", result.from_cache);

            if trace {
                println!("\n📋 Candidates:");
                if evaluations.is_empty() {
                    println!("   (none fetched)");
                }
                for evaluation in &evaluations {
                    println!("   {}", serde_json::to_string(&evaluation)?);
                }
            }
        }

        Commands::Enrich { no_cache, delay_ms } => {
            let stdin = std::io::stdin();
            let mut listings = Vec::new();
            for line in stdin.lock().lines() {
                let line = line?;
                let name = line.trim();
                if !name.is_empty() {
                    listings.push(WineListing::new(name, ""));
                }
            }

            let options = EnrichOptions {
                delay: delay_ms
                    .map(std::time::Duration::from_millis)
                    .unwrap_or_else(|| config.politeness_delay()),
                force: true,
                use_cache: config.use_cache && !no_cache,
            };

            let summary = enrich(&resolver, &mut listings, &options).await;

            for listing in &listings {
                println!("{}\t{}", listing.name, listing.vivino_score);
            }
            eprintln!(
                "✅ {} resolved, {} not found",
                summary.resolved, summary.not_found
            );
        }

        Commands::Stats => match resolver.cache_stats().await? {
            Some(stats) => {
                println!("📊 Cache Statistics:");
                println!("   Total entries: {}", stats.total_entries);
                println!("   Total hits: {}", stats.total_hits);
                println!("   Avg hits/entry: {:.2}", stats.avg_hit_count);

                if let Some(oldest) = stats.oldest_entry {
                    println!("   Oldest entry: {}", oldest.format("%Y-%m-%d %H:%M:%S"));
                }

                if let Some(newest) = stats.newest_entry {
                    println!("   Newest entry: {}", newest.format("%Y-%m-%d %H:%M:%S"));
                }
            }
            None => println!("Cache disabled"),
        },

        Commands::Cleanup { max_age_days } => {
            println!("🧹 Cleaning up entries older than {} days...", max_age_days);

            let deleted = resolver.cleanup_cache(max_age_days).await?;

            println!("✅ Deleted {} entries", deleted);
        }
    }

    Ok(())
}
