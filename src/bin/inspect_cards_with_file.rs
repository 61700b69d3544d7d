use std::path::PathBuf;

use clap::Parser;
use lounge_scraping::{
    document::{select_cards, CardSelectors},
    extractor::{extract_card, Extraction},
};
use scraper::Html;

/// Prints how every card of a saved listing page is extracted.
#[derive(Parser)]
struct Opts {
    input_file: PathBuf,
    /// Use the crawler's selectors (no fallback) instead of the saved-page ones.
    #[arg(long)]
    live: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opts = Opts::parse();
    let html = Html::parse_document(&fs_err::read_to_string(&opts.input_file)?);
    let selectors = if opts.live {
        CardSelectors::Live
    } else {
        CardSelectors::Static
    };

    let cards = select_cards(&html, selectors);
    println!("{} cards", cards.len());
    for (index, card) in cards.into_iter().enumerate() {
        let extraction = extract_card(card);
        let status = match &extraction {
            Extraction::Complete(_) => "complete".to_owned(),
            Extraction::Partial { warnings, .. } => format!("partial ({} warnings)", warnings.len()),
            Extraction::Failed { error, .. } => format!("failed: {error}"),
        };
        let kept = if extraction.record().has_name() {
            "kept"
        } else {
            "dropped"
        };
        println!("#{index}: {status}, {kept}");
        for warning in extraction.warnings() {
            println!("  - {warning}");
        }
        println!("{}", serde_json::to_string_pretty(extraction.record())?);
    }

    Ok(())
}
