//! Archive directory scanning and message file decoding.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use serde::Deserialize;
use tracing::debug;

use wind_common::MonthKey;

use crate::error::{AggregationError, Result};
use crate::message::RawMessage;

/// A message file is either one message or an array of them.
#[derive(Deserialize)]
#[serde(untagged)]
enum MessageFile {
    Many(Vec<RawMessage>),
    One(RawMessage),
}

/// Scan an archive root for `YYYY-MM/` month directories and list the
/// message files inside each, sorted by name.
pub fn scan_archive(root: &Path) -> Result<BTreeMap<MonthKey, Vec<PathBuf>>> {
    if !root.is_dir() {
        return Err(AggregationError::InvalidArchiveRoot(
            root.display().to_string(),
        ));
    }

    let mut months = BTreeMap::new();
    for entry in std::fs::read_dir(root)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        let month = match parse_month_dir(&name) {
            Some(month) => month,
            None => continue,
        };

        let mut files = Vec::new();
        for file in std::fs::read_dir(entry.path())? {
            let file = file?;
            if !file.file_type()?.is_file() {
                continue;
            }
            let path = file.path();
            if is_message_file(&path) {
                files.push(path);
            }
        }
        files.sort();
        if !files.is_empty() {
            months.insert(month, files);
        }
    }

    debug!(root = %root.display(), months = months.len(), "Scanned archive");
    Ok(months)
}

/// Decode every message in one archive file. `.gz` suffixed files are
/// gzip-decompressed first.
pub fn read_messages(path: &Path) -> Result<Vec<RawMessage>> {
    let file = File::open(path)
        .map_err(|e| AggregationError::archive(path.display().to_string(), e.to_string()))?;
    let reader: Box<dyn Read> = if is_gzipped(path) {
        Box::new(GzDecoder::new(BufReader::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };

    let decoded: MessageFile = serde_json::from_reader(reader)
        .map_err(|e| AggregationError::archive(path.display().to_string(), e.to_string()))?;
    Ok(match decoded {
        MessageFile::Many(messages) => messages,
        MessageFile::One(message) => vec![message],
    })
}

fn parse_month_dir(name: &str) -> Option<MonthKey> {
    let (year, month) = name.split_once('-')?;
    if year.len() != 4 || month.len() != 2 {
        return None;
    }
    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    if !(1..=12).contains(&month) {
        return None;
    }
    Some(MonthKey::new(year, month))
}

fn is_gzipped(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

fn is_message_file(path: &Path) -> bool {
    let name = path.file_name().map(|n| n.to_string_lossy());
    match name {
        Some(name) => name.ends_with(".json") || name.ends_with(".json.gz"),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use std::io::Write;

    fn sample_json() -> String {
        r#"[{
            "date": 20020601, "step": 0, "component": "u",
            "lats": [50.0], "lons": [10.0], "values": [3.0]
        }]"#
        .to_string()
    }

    #[test]
    fn test_scan_groups_by_month_dir() {
        let dir = tempfile::tempdir().unwrap();
        let june = dir.path().join("2002-06");
        std::fs::create_dir(&june).unwrap();
        std::fs::write(june.join("b.json"), sample_json()).unwrap();
        std::fs::write(june.join("a.json"), sample_json()).unwrap();
        std::fs::write(june.join("notes.txt"), "ignored").unwrap();
        std::fs::create_dir(dir.path().join("not-a-month")).unwrap();

        let months = scan_archive(dir.path()).unwrap();
        assert_eq!(months.len(), 1);
        let files = &months[&MonthKey::new(2002, 6)];
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("a.json"));
    }

    #[test]
    fn test_read_plain_and_gzipped() {
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("m.json");
        std::fs::write(&plain, sample_json()).unwrap();
        assert_eq!(read_messages(&plain).unwrap().len(), 1);

        let gz_path = dir.path().join("m.json.gz");
        let mut encoder = GzEncoder::new(File::create(&gz_path).unwrap(), Default::default());
        encoder.write_all(sample_json().as_bytes()).unwrap();
        encoder.finish().unwrap();
        assert_eq!(read_messages(&gz_path).unwrap().len(), 1);
    }

    #[test]
    fn test_single_object_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("one.json");
        std::fs::write(
            &path,
            r#"{"date": 20020601, "step": 6, "component": "v",
                "lats": [50.0], "lons": [10.0], "values": [4.0]}"#,
        )
        .unwrap();
        assert_eq!(read_messages(&path).unwrap().len(), 1);
    }

    #[test]
    fn test_garbage_file_is_archive_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            read_messages(&path),
            Err(AggregationError::Archive { .. })
        ));
    }
}
