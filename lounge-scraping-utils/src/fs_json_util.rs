use std::{
    fmt::Debug,
    io::{BufReader, BufWriter, Write},
    path::PathBuf,
};

use anyhow::Context;
use fs_err::File;
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;

pub fn read_json<P: Into<PathBuf> + Debug, T: for<'de> Deserialize<'de>>(
    path: P,
) -> anyhow::Result<T> {
    let path = path.into();
    (|| serde_json::from_reader(BufReader::new(File::open(&path)?)).map_err(anyhow::Error::new))()
        .with_context(|| {
            format!(
                "While trying to parse {path:?} as {}",
                std::any::type_name::<T>()
            )
        })
}

/// Writes `value` as JSON indented by four spaces, creating missing parent
/// directories first. Non-ASCII characters are written as-is.
pub fn write_json_pretty<P: Into<PathBuf>, T: Serialize>(path: P, value: &T) -> anyhow::Result<()> {
    let path = path.into();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs_err::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(&path)?);
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(b"    "));
    value
        .serialize(&mut serializer)
        .with_context(|| format!("While trying to serialize into {path:?}"))?;
    writer.flush()?;
    Ok(())
}

pub fn read_toml<P: Into<PathBuf> + Debug, T: for<'de> Deserialize<'de>>(
    path: P,
) -> anyhow::Result<T> {
    let path = path.into();
    (|| toml::from_str(&fs_err::read_to_string(&path)?).map_err(anyhow::Error::new))().with_context(
        || {
            format!(
                "While trying to parse {path:?} as {}",
                std::any::type_name::<T>()
            )
        },
    )
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::{read_json, write_json_pretty};

    #[test]
    fn pretty_output_uses_four_spaces_and_keeps_non_ascii() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/out.json");
        let value = BTreeMap::from([("name", vec!["Café Ørsted"])]);
        write_json_pretty(&path, &value).unwrap();

        let written = fs_err::read_to_string(&path).unwrap();
        assert_eq!(written, "{\n    \"name\": [\n        \"Café Ørsted\"\n    ]\n}");

        let read: BTreeMap<String, Vec<String>> = read_json(&path).unwrap();
        assert_eq!(read["name"], ["Café Ørsted"]);
    }

    #[test]
    fn read_json_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        let err = read_json::<_, Vec<u32>>(&path).unwrap_err();
        assert!(format!("{err:#}").contains("missing.json"));
    }
}
