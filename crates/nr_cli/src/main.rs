use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use clap::Parser;
use nr_core::pagination::PAGE_SIZE_OPTIONS;
use nr_core::{ArticleRepository, Category, DateRange, FilterUpdate, Notification};
use nr_feed::{load_article, ArticleView, FeedConfig, FeedManager};
use nr_storage::{create_repository, CorpusSource, GeneratorConfig, MemoryConfig};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{info, warn, Level};

mod duration;
mod logging;
mod output;

use duration::HumanDuration;

#[derive(Parser, Debug)]
#[command(author, version, about = "Browse a news corpus from the terminal", long_about = None)]
pub struct Cli {
    /// Load the corpus from a JSON file instead of generating one
    #[arg(long)]
    corpus: Option<PathBuf>,
    /// Seed for the generated corpus
    #[arg(long, default_value_t = nr_storage::generator::DEFAULT_SEED)]
    seed: u64,
    /// Number of generated articles
    #[arg(long, default_value_t = nr_storage::generator::DEFAULT_ARTICLE_COUNT)]
    articles: usize,
    /// Simulated latency applied to every repository call (e.g. 0ms, 250ms).
    /// Defaults to per-call latencies.
    #[arg(long)]
    latency: Option<HumanDuration>,
    /// Give up on a search after this long (e.g. 2s)
    #[arg(long, default_value = "10s")]
    timeout: HumanDuration,
    #[arg(long, default_value = "info")]
    log_level: Level,
    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Search articles by keyword, source and category
    Search {
        /// Matches title or description, case-insensitive. Repeat for OR.
        #[arg(long = "keyword", short = 'k')]
        keywords: Vec<String>,
        /// Source id, e.g. bbc-news. Repeat for OR.
        #[arg(long = "source", short = 's')]
        sources: Vec<String>,
        /// Category, e.g. technology. Repeat for OR.
        #[arg(long = "category", short = 'c')]
        categories: Vec<Category>,
        /// Earliest publication date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Latest publication date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// One of 5, 10, 20 or 50
        #[arg(
            long,
            default_value_t = nr_core::pagination::DEFAULT_PAGE_SIZE,
            value_parser = parse_page_size
        )]
        page_size: usize,
    },
    /// Show a single article
    Show { id: String },
    /// List news sources
    Sources,
    /// List categories
    Categories,
    /// Write the corpus to a JSON file
    Export { path: PathBuf },
}

fn render_categories(categories: &[Category], json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(categories)?);
    }
    let names: Vec<String> = categories.iter().map(Category::to_string).collect();
    Ok(names.join("\n"))
}

fn parse_page_size(value: &str) -> std::result::Result<usize, String> {
    let size: usize = value.parse::<usize>().map_err(|e| e.to_string())?;
    if PAGE_SIZE_OPTIONS.contains(&size) {
        Ok(size)
    } else {
        Err(format!("page size must be one of {:?}", PAGE_SIZE_OPTIONS))
    }
}

fn date_range(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Option<DateRange> {
    if from.is_none() && to.is_none() {
        return None;
    }
    Some(DateRange {
        from: from.map(|d| Utc.from_utc_datetime(&d.and_time(NaiveTime::MIN))),
        to: to
            .and_then(|d| d.and_hms_milli_opt(23, 59, 59, 999))
            .map(|dt| Utc.from_utc_datetime(&dt)),
    })
}

fn report(notifications: &mut UnboundedReceiver<Notification>) {
    while let Ok(notification) = notifications.try_recv() {
        if notification.is_error() {
            warn!("🚨 {}: {}", notification.title, notification.description);
        } else {
            info!("💬 {}: {}", notification.title, notification.description);
        }
    }
}

async fn search(
    repository: Arc<dyn ArticleRepository>,
    cli: &Cli,
    update: FilterUpdate,
    page: usize,
    page_size: usize,
) -> Result<()> {
    let config = FeedConfig {
        search_timeout: Some(cli.timeout.0),
        ..FeedConfig::default()
    };
    let (manager, mut notifications) = FeedManager::new(repository, config);

    if !update.is_empty() {
        manager.set_filters(update);
    }
    if page_size != manager.pagination().page_size {
        manager.set_page_size(page_size);
    }
    if page != 1 {
        manager.set_page(page);
    }

    let snapshot = manager.wait_until_idle().await;
    report(&mut notifications);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        output::print_results(&snapshot, Utc::now());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level);

    let source = match &cli.corpus {
        Some(path) => CorpusSource::JsonFile(path.clone()),
        None => CorpusSource::Generated(GeneratorConfig {
            count: cli.articles,
            seed: cli.seed,
            ..GeneratorConfig::default()
        }),
    };
    let memory_config = cli
        .latency
        .map(|latency| MemoryConfig::uniform(latency.0))
        .unwrap_or_default();

    match &cli.command {
        Commands::Search {
            keywords,
            sources,
            categories,
            from,
            to,
            page,
            page_size,
        } => {
            let mut update = FilterUpdate::new();
            if !keywords.is_empty() {
                update = update.keywords(keywords.iter().cloned());
            }
            if !sources.is_empty() {
                update = update.sources(sources.iter().cloned());
            }
            if !categories.is_empty() {
                update = update.categories(categories.iter().copied());
            }
            if let Some(range) = date_range(*from, *to) {
                update = update.date_range(Some(range));
            }
            let repository = create_repository(&source, memory_config)?;
            search(repository, &cli, update, *page, *page_size).await?;
        }
        Commands::Show { id } => {
            let repository = create_repository(&source, memory_config)?;
            match load_article(repository.as_ref(), id).await {
                ArticleView::Found(article) if cli.json => {
                    println!("{}", serde_json::to_string_pretty(&article)?)
                }
                ArticleView::Found(article) => output::print_article(&article),
                ArticleView::Redirect(notification) => {
                    warn!("🚨 {}: {}", notification.title, notification.description);
                }
            }
        }
        Commands::Sources => {
            let repository = create_repository(&source, memory_config)?;
            let sources = repository.list_sources().await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&sources)?);
            } else {
                for source in sources {
                    println!("{:<12} {:<12} {}", source.id, source.name, source.url);
                }
            }
        }
        Commands::Categories => {
            let repository = create_repository(&source, memory_config)?;
            let categories = repository.list_categories().await?;
            println!("{}", render_categories(&categories, cli.json)?);
        }
        Commands::Export { path } => {
            let corpus = source.load().context("Failed to load corpus")?;
            corpus
                .write_json_file(path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("💾 Wrote {} articles to {}", corpus.articles().len(), path.display());
        }
    }

    Ok(())
}
