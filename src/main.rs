//! Newsfeed Ingestion CLI
//! Runs the feed pipeline once and prints the normalized records

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use newsfeed_ingestion::{metrics, Config, FeedPipeline, Locale, NewsRecord};

/// Newsfeed Ingestion - fetch and normalize a news search feed
#[derive(Parser, Debug)]
#[command(name = "newsfeed-ingestion")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Fetch, parse and normalize a news feed with thumbnails")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, default_value = "false", global = true)]
    json_logs: bool,

    /// Print Prometheus metrics before exiting
    #[arg(long, default_value = "false", global = true)]
    metrics: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch the feed once and print its records
    Fetch {
        /// Query URL to fetch instead of the configured one
        #[arg(long)]
        query_url: Option<String>,

        /// Date locale, e.g. en_US or en_GB ("system" reads LC_ALL/LC_TIME/LANG)
        #[arg(long)]
        locale: Option<String>,

        /// Output format (json, table, summary)
        #[arg(short, long, default_value = "summary")]
        output: String,
    },

    /// Print the configured query URL
    Query,
}

/// Sets up structured logging with tracing
fn setup_logging(log_level: &str, json_output: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    if json_output {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(&cli.log_level, cli.json_logs);

    let mut config = Config::load()?;
    config.validate()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        endpoint = %config.api_endpoint,
        page_size = config.page_size,
        "Configuration loaded"
    );

    match cli.command {
        Commands::Fetch {
            query_url,
            locale,
            output,
        } => {
            if let Some(locale) = locale {
                config.locale = if locale == "system" {
                    Locale::from_env().unwrap_or_default().to_string()
                } else {
                    locale
                };
            }
            fetch_once(&config, query_url, &output).await?;
        }

        Commands::Query => {
            println!("{}", config.feed_query().to_url()?);
        }
    }

    if cli.metrics {
        print!("{}", metrics::gather_metrics());
    }

    Ok(())
}

/// Runs the pipeline once and prints the result
async fn fetch_once(config: &Config, query_url: Option<String>, output_format: &str) -> Result<()> {
    let query_url = match query_url {
        Some(url) => url,
        None => config.feed_query().to_url()?.to_string(),
    };

    let pipeline = FeedPipeline::from_config(config)?;

    info!(locale = %pipeline.parser().locale(), "Fetching feed");

    let records = pipeline.fetch_feed(&query_url).await;

    match output_format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        "table" => {
            println!(
                "\n{:<10} {:<14} {:<24} {:<5} {}",
                "Date", "Section", "Author", "Img", "Title"
            );
            println!("{}", "-".repeat(100));
            for record in &records {
                println!(
                    "{:<10} {:<14} {:<24} {:<5} {}",
                    record.published_date(),
                    truncate(record.section(), 14),
                    truncate(record.author(), 24),
                    if record.has_thumbnail() { "yes" } else { "no" },
                    record.title()
                );
            }
            println!("\nTotal: {} records", records.len());
        }
        _ => print_summary(&records),
    }

    Ok(())
}

fn print_summary(records: &[NewsRecord]) {
    println!("\nFeed Summary");
    println!("============");

    if records.is_empty() {
        println!("No news found (offline, empty feed or unreadable response)");
        return;
    }

    println!("Records:    {}", records.len());
    println!(
        "Thumbnails: {}",
        records.iter().filter(|r| r.has_thumbnail()).count()
    );

    let mut by_section: Vec<(String, usize)> = Vec::new();
    for record in records {
        match by_section.iter().position(|(s, _)| s.as_str() == record.section()) {
            Some(i) => by_section[i].1 += 1,
            None => by_section.push((record.section().to_string(), 1)),
        }
    }

    println!("\nBy Section:");
    for (section, count) in by_section {
        let section = if section.is_empty() { "(none)" } else { section.as_str() };
        println!("  - {}: {}", section, count);
    }

    println!("\nLatest: {} ({})", records[0].title(), records[0].link());
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        value.to_string()
    } else {
        let cut: String = value.chars().take(width.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}
