use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use log::{info, LevelFilter};
use lounge_scraping::config::CrawlConfig;
use lounge_scraping::crawl::crawl;
use lounge_scraping::document::convert_file;
use lounge_scraping::fetcher::{BrowserPageSource, UrlTemplate};
use lounge_scraping_utils::fs_json_util::read_toml;

#[derive(Parser)]
struct Opts {
    #[command(subcommand)]
    sub: Sub,
}

#[derive(Subcommand)]
enum Sub {
    /// Extract lounges from a saved listing page.
    StaticFile(StaticFile),
    /// Render listing pages one by one in headless Chrome until one is empty.
    Crawl(Crawl),
}

#[derive(Args)]
struct StaticFile {
    #[arg(default_value = "Newcastle (NCL) Airport lounges _ LoungeReview.com.html")]
    input: PathBuf,
    #[arg(long, default_value = "output/lounges_from_sample.json")]
    output: PathBuf,
}

#[derive(Args)]
struct Crawl {
    /// TOML file with crawl settings; flags below take precedence.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Listing URL containing `{page}`.
    #[arg(long)]
    url_template: Option<UrlTemplate>,
    #[arg(long)]
    max_pages: Option<u32>,
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<ExitCode> {
    pretty_env_logger::formatted_timed_builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    match Opts::parse().sub {
        Sub::StaticFile(args) => Ok(run_static(args)),
        Sub::Crawl(args) => run_crawl(args),
    }
}

fn run_static(args: StaticFile) -> ExitCode {
    if convert_file(&args.input, &args.output) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn run_crawl(args: Crawl) -> anyhow::Result<ExitCode> {
    let mut config: CrawlConfig = match &args.config {
        Some(path) => read_toml(path)?,
        None => CrawlConfig::default(),
    };
    if let Some(url_template) = args.url_template {
        config.url_template = Some(url_template);
    }
    if let Some(max_pages) = args.max_pages {
        config.max_pages = max_pages;
    }
    if let Some(output_dir) = args.output_dir {
        config.output_dir = output_dir;
    }

    let (fetch, options) = config.into_parts()?;
    info!(
        "Crawling up to {} pages of {} into {:?}",
        options.max_pages, fetch.url_template, options.output_dir
    );
    let summary = crawl(&mut BrowserPageSource::new(fetch), &options);
    info!(
        "Finished after {} pages with lounges ({:?})",
        summary.pages_with_records(),
        summary.termination()
    );
    Ok(ExitCode::SUCCESS)
}
