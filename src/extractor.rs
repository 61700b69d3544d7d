use std::panic::{catch_unwind, AssertUnwindSafe};

use itertools::Itertools;
use log::{error, warn};
use lounge_scraping_utils::{regex, selector};
use thiserror::Error;

use crate::{
    dom::DomNode,
    schema::{Amenity, LoungeRecord, Rating},
};

/// Outcome of extracting one listing card.
///
/// Every variant carries a record; callers keep it iff it has a name.
#[derive(Debug)]
pub enum Extraction {
    Complete(LoungeRecord),
    /// All steps ran, but some anomalies were skipped over.
    Partial {
        record: LoungeRecord,
        warnings: Vec<String>,
    },
    /// Extraction panicked part-way; the steps after that point did not run.
    Failed {
        record: LoungeRecord,
        warnings: Vec<String>,
        error: ExtractError,
    },
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Extraction aborted: {0}")]
    Panicked(String),
}

impl Extraction {
    pub fn record(&self) -> &LoungeRecord {
        match self {
            Self::Complete(record)
            | Self::Partial { record, .. }
            | Self::Failed { record, .. } => record,
        }
    }

    pub fn into_record(self) -> LoungeRecord {
        match self {
            Self::Complete(record)
            | Self::Partial { record, .. }
            | Self::Failed { record, .. } => record,
        }
    }

    pub fn warnings(&self) -> &[String] {
        match self {
            Self::Complete(_) => &[],
            Self::Partial { warnings, .. } | Self::Failed { warnings, .. } => warnings,
        }
    }

    pub fn error(&self) -> Option<&ExtractError> {
        match self {
            Self::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Reports warnings and errors of the card at `index` (zero-based) to the log.
    pub fn log(&self, index: usize) {
        for warning in self.warnings() {
            warn!("Card #{index}: {warning}");
        }
        if let Some(e) = self.error() {
            error!("Error extracting lounge data from card #{index}: {e}");
        }
    }
}

/// Never panics: a panic inside a lookup is turned into [`Extraction::Failed`]
/// carrying whatever was collected before it.
pub fn extract_card<'a, N: DomNode<'a>>(card: N) -> Extraction {
    let mut builder = RecordBuilder::default();
    let result = catch_unwind(AssertUnwindSafe(|| builder.run(card)));
    let RecordBuilder { record, warnings } = builder;
    match result {
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_owned());
            Extraction::Failed {
                record,
                warnings,
                error: ExtractError::Panicked(message),
            }
        }
        Ok(()) if warnings.is_empty() => Extraction::Complete(record),
        Ok(()) => Extraction::Partial { record, warnings },
    }
}

#[derive(Default)]
struct RecordBuilder {
    record: LoungeRecord,
    warnings: Vec<String>,
}

impl RecordBuilder {
    fn run<'a, N: DomNode<'a>>(&mut self, card: N) {
        self.title(card);
        if let Some(location) = card.select_first(selector!(".geodir-output-location")) {
            self.operator(location);
            self.address(location);
            self.hours(location);
            self.amenities(location);
        }
        self.rating(card);
        self.badges(card);
        self.booking(card);
    }

    fn title<'a, N: DomNode<'a>>(&mut self, card: N) {
        let Some(link) = card.select_first(selector!("h2 a")) else {
            return;
        };
        self.record.name = Some(link.trimmed_text());
        match link.attribute("href") {
            Some(href) => self.record.url = Some(href.to_owned()),
            None => self.warnings.push("Title link has no href".to_owned()),
        }
    }

    fn operator<'a, N: DomNode<'a>>(&mut self, location: N) {
        self.record.operator = location
            .select_first(selector!(".operatoralliance_listing_operator"))
            .and_then(|div| div.select_first(selector!("a")))
            .map(N::trimmed_text);
    }

    fn address<'a, N: DomNode<'a>>(&mut self, location: N) {
        self.record.location = location
            .select_first(selector!(".geodir_address"))
            .and_then(|div| div.select_first(selector!(".address_details")))
            .map(N::trimmed_text);
    }

    fn hours<'a, N: DomNode<'a>>(&mut self, location: N) {
        let Some(table) = location.select_first(selector!(".geodir-field-business_hours")) else {
            return;
        };
        for row in table.select_all(selector!(".gd-bh-days-list")) {
            let day = row.select_first(selector!(".gd-bh-days-d"));
            let slot = row.select_first(selector!(".gd-bh-slot-r"));
            if let (Some(day), Some(slot)) = (day, slot) {
                self.record
                    .hours
                    .insert(day.trimmed_text(), slot.trimmed_text());
            }
        }
    }

    fn amenities<'a, N: DomNode<'a>>(&mut self, location: N) {
        let Some(icons) = location.select_first(selector!(".geodir_more_info.amenities")) else {
            return;
        };
        for img in icons.select_all(selector!("img")) {
            let Some(label) = img.attribute("title") else {
                continue;
            };
            match label.split(": ").collect_vec().as_slice() {
                &[name, status] => self.record.amenities.push(Amenity {
                    name: name.to_owned(),
                    available: status.eq_ignore_ascii_case("yes"),
                }),
                _ => self
                    .warnings
                    .push(format!("Skipping amenity with unexpected label {label:?}")),
            }
        }
    }

    fn rating<'a, N: DomNode<'a>>(&mut self, card: N) {
        let Some(element) = card.select_first(selector!(r#"[class*="geodir-post-rating-value-"]"#))
        else {
            return;
        };
        for class in element.class_tokens() {
            // The value is whatever follows the last hyphen.
            let Some(captures) =
                regex!(r"^geodir-post-rating-value-(?:.*-)?([^-]*)$").captures(class)
            else {
                continue;
            };
            let value = match captures[1].parse::<u32>() {
                Ok(value) => value,
                Err(e) => {
                    self.warnings
                        .push(format!("Unparseable rating class {class:?}: {e}"));
                    continue;
                }
            };
            match Rating::try_from(value) {
                Ok(rating) => self.record.rating = rating,
                Err(e) => self
                    .warnings
                    .push(format!("Ignoring rating class {class:?}: {e}")),
            }
        }
    }

    fn badges<'a, N: DomNode<'a>>(&mut self, card: N) {
        let Some(container) = card.select_first(selector!(".badges-container")) else {
            return;
        };
        self.record.badges = container
            .select_all(selector!(".gd-badge"))
            .into_iter()
            .map(N::trimmed_text)
            .filter(|text| !text.is_empty())
            .collect();
    }

    fn booking<'a, N: DomNode<'a>>(&mut self, card: N) {
        if card
            .select_first(selector!(".book-now-badge-details"))
            .is_some()
        {
            self.record.online_booking_available = Some(true);
        }
    }
}
