use std::path::Path;

use itertools::Itertools;
use log::{error, info, warn};
use lounge_scraping_utils::selector;
use scraper::{ElementRef, Html, Selector};

use crate::{extractor::extract_card, output::save_records, schema::LoungeRecord};

/// Which selectors locate listing cards in a page.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CardSelectors {
    /// Saved pages: `.geodir-post`, falling back to the much looser `.col.mb-4`.
    Static,
    /// Rendered pages from the crawler: `.geodir-post` only.
    Live,
}

impl CardSelectors {
    pub fn primary(self) -> &'static Selector {
        selector!(".geodir-post")
    }

    pub fn fallback(self) -> Option<&'static Selector> {
        match self {
            Self::Static => Some(selector!(".col.mb-4")),
            Self::Live => None,
        }
    }
}

pub fn select_cards(html: &Html, selectors: CardSelectors) -> Vec<ElementRef<'_>> {
    let cards = html.select(selectors.primary()).collect_vec();
    if !cards.is_empty() {
        return cards;
    }
    match selectors.fallback() {
        Some(fallback) => {
            warn!("No lounge cards found using '.geodir-post' selector");
            html.select(fallback).collect_vec()
        }
        None => cards,
    }
}

/// Extracts every named lounge in `html`, in document order.
pub fn parse_document(html: &Html, selectors: CardSelectors) -> Vec<LoungeRecord> {
    let cards = select_cards(html, selectors);
    info!("Found {} lounge cards", cards.len());

    let lounges = cards
        .into_iter()
        .enumerate()
        .map(|(index, card)| {
            let extraction = extract_card(card);
            extraction.log(index);
            extraction.into_record()
        })
        .filter(LoungeRecord::has_name)
        .collect_vec();
    info!("Successfully extracted data for {} lounges", lounges.len());
    lounges
}

/// Reads and parses a saved page. A file that cannot be read yields no lounges.
pub fn parse_file(path: &Path) -> Vec<LoungeRecord> {
    info!("Parsing HTML file: {path:?}");
    match fs_err::read_to_string(path) {
        Ok(text) => parse_document(&Html::parse_document(&text), CardSelectors::Static),
        Err(e) => {
            error!("Error parsing HTML file: {e}");
            vec![]
        }
    }
}

/// Static-file mode: extracts `input` and writes the lounges to `output`.
///
/// Returns `false` without writing anything when `input` does not exist or
/// yields no lounges, and `false` when the write fails.
pub fn convert_file(input: &Path, output: &Path) -> bool {
    if !input.exists() {
        error!("File not found: {input:?}");
        return false;
    }
    let lounges = parse_file(input);
    if lounges.is_empty() {
        error!("No lounges extracted from {input:?}");
        return false;
    }
    match save_records(output, &lounges) {
        Ok(()) => true,
        Err(e) => {
            error!("Error saving to JSON: {e:#}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::Html;

    use super::{convert_file, parse_document, parse_file, CardSelectors};
    use crate::output::load_records;

    const PAGE: &str = r#"<!DOCTYPE html>
<html><body>
<div class="geodir-loop-container">
  <div class="geodir-post"><h2><a href="/one">Plaza Premium</a></h2></div>
  <div class="geodir-post"><div class="badges-container"><span class="gd-badge">Orphan</span></div></div>
  <div class="geodir-post"><h2><a href="/blank">   </a></h2></div>
  <div class="geodir-post"><h2><a href="/two">Aspire Lounge</a></h2></div>
</div>
</body></html>"#;

    const FALLBACK_PAGE: &str = r#"<!DOCTYPE html>
<html><body>
  <div class="col mb-4"><h2><a href="/three">Servisair Lounge</a></h2></div>
  <div class="col mb-4"><p>Advertisement</p></div>
</body></html>"#;

    fn names(selectors: CardSelectors, page: &str) -> Vec<String> {
        parse_document(&Html::parse_document(page), selectors)
            .into_iter()
            .filter_map(|record| record.name)
            .collect()
    }

    #[test]
    fn unnamed_cards_are_dropped_in_order() {
        assert_eq!(
            names(CardSelectors::Static, PAGE),
            ["Plaza Premium", "Aspire Lounge"]
        );
    }

    #[test]
    fn fallback_only_for_static_pages() {
        assert_eq!(
            names(CardSelectors::Static, FALLBACK_PAGE),
            ["Servisair Lounge"]
        );
        assert!(names(CardSelectors::Live, FALLBACK_PAGE).is_empty());
    }

    #[test]
    fn unreadable_file_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(parse_file(&dir.path().join("absent.html")).is_empty());

        let path = dir.path().join("page.html");
        fs_err::write(&path, PAGE).unwrap();
        assert_eq!(parse_file(&path).len(), 2);
    }

    #[test]
    fn missing_input_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("output/lounges_from_sample.json");
        assert!(!convert_file(&dir.path().join("absent.html"), &output));
        assert!(!output.exists());
        assert!(!dir.path().join("output").exists());
    }

    #[test]
    fn page_without_lounges_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("empty.html");
        fs_err::write(&input, "<html><body><p>Nothing here</p></body></html>").unwrap();
        let output = dir.path().join("out.json");
        assert!(!convert_file(&input, &output));
        assert!(!output.exists());
    }

    #[test]
    fn converts_saved_page() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("page.html");
        fs_err::write(&input, PAGE).unwrap();
        let output = dir.path().join("output/lounges.json");
        assert!(convert_file(&input, &output));
        let names = load_records(&output)
            .unwrap()
            .into_iter()
            .filter_map(|record| record.name)
            .collect::<Vec<_>>();
        assert_eq!(names, ["Plaza Premium", "Aspire Lounge"]);
    }
}
