use std::{
    path::{Path, PathBuf},
    thread::sleep,
    time::Duration,
};

use getset::{CopyGetters, Getters};
use log::{error, info};
use typed_builder::TypedBuilder;

use crate::{fetcher::PageSource, output::save_records, schema::LoungeRecord};

#[derive(Clone, Debug, TypedBuilder)]
pub struct CrawlOptions {
    pub max_pages: u32,
    #[builder(setter(into))]
    pub output_dir: PathBuf,
    #[builder(default = Duration::from_secs(2))]
    pub delay: Duration,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Termination {
    /// `page` came back empty.
    Exhausted { page: u32 },
    MaxPagesReached,
}

#[derive(Debug, Getters, CopyGetters)]
pub struct CrawlSummary {
    #[getset(get = "pub")]
    records: Vec<LoungeRecord>,
    /// Number of pages that yielded at least one lounge.
    #[getset(get_copy = "pub")]
    pages_with_records: u32,
    #[getset(get_copy = "pub")]
    termination: Termination,
}

impl CrawlSummary {
    pub fn into_records(self) -> Vec<LoungeRecord> {
        self.records
    }
}

pub fn snapshot_path(output_dir: &Path, page: u32) -> PathBuf {
    output_dir.join(format!("lounges_page_{page}.json"))
}

pub fn final_path(output_dir: &Path) -> PathBuf {
    output_dir.join("lounges_all.json")
}

/// Walks pages `1..=max_pages` until one comes back empty.
///
/// After every non-empty page the whole accumulation so far is written to a
/// snapshot file; when the walk ends it is written once more to `lounges_all.json`.
/// Failed writes are logged and do not interrupt the walk.
pub fn crawl<S: PageSource>(source: &mut S, options: &CrawlOptions) -> CrawlSummary {
    if let Err(e) = fs_err::create_dir_all(&options.output_dir) {
        error!("Could not create output directory: {e}");
    }

    let mut records = vec![];
    let mut pages_with_records = 0;
    let mut termination = Termination::MaxPagesReached;
    for page in 1..=options.max_pages {
        let lounges = source.fetch_page(page);
        if lounges.is_empty() {
            info!("No lounges found on page {page}. Stopping.");
            termination = Termination::Exhausted { page };
            break;
        }
        info!("Found {} lounges on page {page}", lounges.len());
        records.extend(lounges);
        pages_with_records += 1;

        if let Err(e) = save_records(snapshot_path(&options.output_dir, page), &records) {
            error!("Error saving snapshot for page {page}: {e:#}");
        }
        if page < options.max_pages {
            sleep(options.delay);
        }
    }
    if termination == Termination::MaxPagesReached {
        info!("Reached the page limit of {}", options.max_pages);
    }

    if let Err(e) = save_records(final_path(&options.output_dir), &records) {
        error!("Error saving combined results: {e:#}");
    }
    info!("Total lounges collected: {}", records.len());
    CrawlSummary {
        records,
        pages_with_records,
        termination,
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::VecDeque, time::Duration};

    use super::{crawl, final_path, snapshot_path, CrawlOptions, Termination};
    use crate::{fetcher::PageSource, output::load_records, schema::LoungeRecord};

    /// Serves a fixed number of lounges per page and remembers what was asked for.
    struct ScriptedSource {
        counts: VecDeque<usize>,
        requested: Vec<u32>,
    }

    impl ScriptedSource {
        fn new(counts: impl IntoIterator<Item = usize>) -> Self {
            Self {
                counts: counts.into_iter().collect(),
                requested: vec![],
            }
        }
    }

    impl PageSource for ScriptedSource {
        fn fetch_page(&mut self, page: u32) -> Vec<LoungeRecord> {
            self.requested.push(page);
            let count = self.counts.pop_front().unwrap_or(0);
            (0..count)
                .map(|i| LoungeRecord {
                    name: Some(format!("Lounge {page}-{i}")),
                    ..Default::default()
                })
                .collect()
        }
    }

    fn options(dir: &std::path::Path, max_pages: u32) -> CrawlOptions {
        CrawlOptions::builder()
            .max_pages(max_pages)
            .output_dir(dir.join("results"))
            .delay(Duration::ZERO)
            .build()
    }

    #[test]
    fn stops_at_first_empty_page() {
        let dir = tempfile::tempdir().unwrap();
        let options = options(dir.path(), 10);
        let mut source = ScriptedSource::new([3, 2, 0, 4]);

        let summary = crawl(&mut source, &options);

        assert_eq!(source.requested, [1, 2, 3]);
        assert_eq!(summary.termination(), Termination::Exhausted { page: 3 });
        assert_eq!(summary.pages_with_records(), 2);
        assert_eq!(summary.records().len(), 5);

        let out = &options.output_dir;
        assert_eq!(load_records(snapshot_path(out, 1)).unwrap().len(), 3);
        assert_eq!(load_records(snapshot_path(out, 2)).unwrap().len(), 5);
        assert!(!snapshot_path(out, 3).exists());
        assert_eq!(load_records(final_path(out)).unwrap(), *summary.records());
    }

    #[test]
    fn stops_at_page_limit() {
        let dir = tempfile::tempdir().unwrap();
        let options = options(dir.path(), 2);
        let mut source = ScriptedSource::new([1; 5]);

        let summary = crawl(&mut source, &options);

        assert_eq!(source.requested, [1, 2]);
        assert_eq!(summary.termination(), Termination::MaxPagesReached);
        let names = load_records(final_path(&options.output_dir))
            .unwrap()
            .into_iter()
            .filter_map(|record| record.name)
            .collect::<Vec<_>>();
        assert_eq!(names, ["Lounge 1-0", "Lounge 2-0"]);
    }

    #[test]
    fn empty_first_page_still_writes_final_file() {
        let dir = tempfile::tempdir().unwrap();
        let options = options(dir.path(), 3);
        let mut source = ScriptedSource::new([]);

        let summary = crawl(&mut source, &options);

        assert_eq!(summary.termination(), Termination::Exhausted { page: 1 });
        assert!(!snapshot_path(&options.output_dir, 1).exists());
        assert!(load_records(final_path(&options.output_dir))
            .unwrap()
            .is_empty());
    }
}
