use std::{fmt::Debug, path::Path};

use log::info;
use lounge_scraping_utils::fs_json_util::{read_json, write_json_pretty};

use crate::schema::LoungeRecord;

pub fn save_records<P: AsRef<Path> + Debug>(
    path: P,
    lounges: &[LoungeRecord],
) -> anyhow::Result<()> {
    write_json_pretty(path.as_ref(), &lounges)?;
    info!("Saved {} lounges to {path:?}", lounges.len());
    Ok(())
}

pub fn load_records<P: AsRef<Path> + Debug>(path: P) -> anyhow::Result<Vec<LoungeRecord>> {
    read_json(path.as_ref())
}
