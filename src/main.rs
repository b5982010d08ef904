use std::process::ExitCode;

use clap::Parser;
use log::error;
use recipe_crawl::{load_config, scrape_with_config, ScrapeRequest};

/// Scrape recipes from a page and the recipe pages it links to
#[derive(Debug, Parser)]
#[command(name = "recipe-crawl", version, about)]
struct Cli {
    /// Starting URL
    url: String,

    /// Maximum number of pages fetched
    #[arg(long)]
    max_pages: Option<usize>,

    /// Maximum link depth from the starting page (0 = starting page only)
    #[arg(long)]
    max_depth: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Cookbook id to attach to every recipe
    #[arg(long)]
    cookbook_id: Option<String>,

    /// Print single-line JSON
    #[arg(long)]
    compact: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(max_pages) = cli.max_pages {
        config.max_pages = max_pages;
    }
    if let Some(max_depth) = cli.max_depth {
        config.max_depth = max_depth;
    }
    if let Some(timeout) = cli.timeout {
        config.timeout_secs = timeout;
    }

    let request = ScrapeRequest {
        url: Some(cli.url),
        cookbook_id: cli.cookbook_id,
    };
    let response = scrape_with_config(&request, &config).await;

    let output = if cli.compact {
        serde_json::to_string(&response)
    } else {
        serde_json::to_string_pretty(&response)
    };
    match output {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Failed to serialize response: {e}");
            return ExitCode::FAILURE;
        }
    }

    if response.is_error() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
