use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use reelpress::config::Config;
use reelpress::models::LinkFinderResult;
use reelpress::pipeline::Pipeline;
use reelpress::publisher::WordPressClient;
use reelpress::utils::HttpClient;

#[derive(Parser)]
#[command(name = "reelpress")]
#[command(about = "Movie listing scraper with WordPress draft publishing")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "reelpress.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve,
    /// Show posts from a listing page
    List {
        /// Listing page number
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Extract details and resolved download links from a post
    Extract {
        /// Detail page URL
        url: String,
        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Extract a post and publish it as a WordPress draft
    Publish {
        /// Detail page URL
        url: String,
        /// Configured WordPress site name (all sites when omitted)
        #[arg(short, long)]
        site: Option<String>,
    },
    /// Write a default configuration file
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose)?;

    // Load configuration (a missing file means defaults)
    let config = Config::load(&cli.config)?;

    match cli.command {
        Commands::Serve => {
            info!("Starting ReelPress API...");
            reelpress::web::serve(config).await?;
        }
        Commands::List { page } => {
            run_list(&config, page).await?;
        }
        Commands::Extract { url, json } => {
            run_extract(&config, &url, json).await?;
        }
        Commands::Publish { url, site } => {
            run_publish(&config, &url, site.as_deref()).await?;
        }
        Commands::Init => {
            run_init(&cli.config)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(format!("reelpress={}", level))
        .with_target(false)
        .with_thread_ids(true)
        .with_thread_names(true)
        .init();

    Ok(())
}

fn build_pipeline(config: &Config) -> Result<(Pipeline, HttpClient)> {
    let http = HttpClient::new(&config.http)?;
    let pipeline = Pipeline::from_config(config, Arc::new(http.clone()));
    Ok((pipeline, http))
}

fn run_init(config_path: &str) -> Result<()> {
    if Path::new(config_path).exists() {
        warn!("Configuration already exists at {}, leaving it untouched", config_path);
        return Ok(());
    }
    Config::default().save(config_path)?;
    info!("📝 Wrote default configuration to {}", config_path);
    Ok(())
}

async fn run_list(config: &Config, page: u32) -> Result<()> {
    let (pipeline, _) = build_pipeline(config)?;
    let domains = config.site.domain_settings();
    let result = pipeline.list_movies(&domains, page).await;

    if let Some(error) = &result.error {
        anyhow::bail!("{}", error);
    }

    println!("🎬 Page {} ({} posts)", page.max(1), result.total_found);
    println!("{:<4} {:<60} {}", "#", "Title", "URL");
    println!("{}", "-".repeat(110));
    for (index, post) in result.posts.iter().enumerate() {
        println!("{:<4} {:<60} {}", index + 1, post.title, post.url);
    }

    Ok(())
}

async fn extract(pipeline: &Pipeline, config: &Config, url: &str) -> Result<LinkFinderResult> {
    let domains = config.site.domain_settings();
    let result = pipeline.extract_links(&domains, url).await?;
    if let Some(error) = &result.error {
        anyhow::bail!("{}", error);
    }
    Ok(result)
}

async fn run_extract(config: &Config, url: &str, json: bool) -> Result<()> {
    let (pipeline, _) = build_pipeline(config)?;
    let result = extract(&pipeline, config, url).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if let Some(details) = &result.movie_details {
        println!("🎬 {}", details.title);
        let fields = [
            ("Rating", &details.imdb_rating),
            ("Genre", &details.genre),
            ("Language", &details.language),
            ("Quality", &details.quality),
            ("Director", &details.director),
        ];
        for (label, value) in fields {
            if let Some(value) = value {
                println!("   {:<10} {}", label, value);
            }
        }
        println!("   {:<10} {}", "Shots", details.screenshots.len());
        println!();
        println!("{:<40} {}", "Label", "Link");
        println!("{}", "-".repeat(100));
        for link in &details.download_links {
            println!("{:<40} {}", link.label, link.url);
        }
    }
    println!(
        "\n{} links found in {} ms",
        result.total_found, result.processing_time
    );

    Ok(())
}

async fn run_publish(config: &Config, url: &str, site: Option<&str>) -> Result<()> {
    let sites = match site {
        Some(name) => vec![config
            .get_wordpress_site(name)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("WordPress site '{}' not configured", name))?],
        None => config.wordpress.clone(),
    };
    if sites.is_empty() {
        anyhow::bail!("No WordPress sites configured");
    }

    let (pipeline, http) = build_pipeline(config)?;
    let result = extract(&pipeline, config, url).await?;
    let details = result
        .movie_details
        .ok_or_else(|| anyhow::anyhow!("No details extracted from {}", url))?;

    let publisher = WordPressClient::new(http.inner().clone(), config.content.max_screenshots);

    let mut failures = 0;
    for outcome in publisher.publish_all(&sites, &details).await {
        if outcome.result.success {
            println!(
                "✅ {}: draft {} {}",
                outcome.site,
                outcome.result.post_id.map(|id| id.to_string()).unwrap_or_default(),
                outcome.result.post_url.unwrap_or_default()
            );
        } else {
            failures += 1;
            println!(
                "❌ {}: {}",
                outcome.site,
                outcome.result.error.unwrap_or_default()
            );
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} sites failed", failures, sites.len());
    }
    Ok(())
}
