//! External artifact validator.
//!
//! Checks scripts written by another implementation. The directory is
//! searched recursively; `name.xml` and `name.json` side by side form one
//! pair and are checked like a golden fixture, except that a JSON text
//! which decodes correctly but is not in canonical form is only a warning.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;
use walkdir::WalkDir;

use super::codec::check_pair;
use crate::report::{ConformanceReport, Severity, TestResult};

const VALIDATOR: &str = "artifacts";

#[derive(Default)]
struct Pair {
    xml: Option<PathBuf>,
    json: Option<PathBuf>,
}

/// Validates every XML/JSON pair under `dir`.
///
/// # Errors
///
/// Returns an error if the directory cannot be walked or a file cannot be
/// read.
pub fn validate(dir: &Path) -> Result<ConformanceReport> {
    let mut report = ConformanceReport::new();
    if !dir.is_dir() {
        report.push(TestResult::fail(
            VALIDATOR,
            format!("{} is not a directory", dir.display()),
        ));
        return Ok(report);
    }

    let mut pairs: BTreeMap<PathBuf, Pair> = BTreeMap::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let is_xml = match path.extension().and_then(|e| e.to_str()) {
            Some("xml") => true,
            Some("json") => false,
            _ => continue,
        };
        let pair = pairs.entry(path.with_extension("")).or_default();
        if is_xml {
            pair.xml = Some(path.to_path_buf());
        } else {
            pair.json = Some(path.to_path_buf());
        }
    }
    debug!(dir = %dir.display(), pairs = pairs.len(), "collected artifacts");

    if pairs.is_empty() {
        report.push(TestResult::warn(
            VALIDATOR,
            format!("no .xml or .json artifacts under {}", dir.display()),
        ));
    }
    for (stem, pair) in pairs {
        let subject = stem
            .strip_prefix(dir)
            .unwrap_or(stem.as_path())
            .display()
            .to_string();
        match (pair.xml, pair.json) {
            (Some(xml), Some(json)) => {
                let xml = read(&xml)?;
                let json = read(&json)?;
                report.extend(check_pair(&subject, &xml, &json, Severity::Warning));
            }
            (Some(_), None) => report.push(TestResult::warn(
                VALIDATOR,
                format!("{subject}: XML without a JSON counterpart, skipped"),
            )),
            (None, Some(_)) => report.push(TestResult::warn(
                VALIDATOR,
                format!("{subject}: JSON without an XML counterpart, skipped"),
            )),
            (None, None) => {}
        }
    }
    Ok(report)
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    fn write(dir: &Path, name: &str, text: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("creates directories");
        }
        std::fs::write(path, text).expect("writes artifact");
    }

    #[test]
    fn pairs_are_checked_and_orphans_warned() {
        let dir = tempfile::tempdir().expect("temp dir");
        write(dir.path(), "call.xml", fixtures::CALL.xml);
        write(dir.path(), "call.json", fixtures::CALL.json);
        write(dir.path(), "nested/try.xml", fixtures::TRY_CATCH.xml);
        write(dir.path(), "nested/try.json", fixtures::TRY_CATCH.json);
        write(dir.path(), "lonely.xml", fixtures::DATA_WRITE.xml);
        write(dir.path(), "notes.txt", "ignored");

        let report = validate(dir.path()).expect("validates");
        assert!(report.all_passed(), "{:#?}", report.results);
        assert_eq!(report.count(Severity::Warning), 1);
        assert!(report.results.iter().any(|r| r.message.starts_with("nested/try: ")
            || r.message.starts_with("nested\\try: ")));
    }

    #[test]
    fn disagreeing_pair_fails() {
        let dir = tempfile::tempdir().expect("temp dir");
        write(dir.path(), "x.xml", fixtures::CALL.xml);
        write(dir.path(), "x.json", fixtures::DATA_WRITE.json);

        let report = validate(dir.path()).expect("validates");
        assert_eq!(report.failure_count(), 1);
        assert!(report
            .results
            .iter()
            .any(|r| r.is_failure() && r.validator == "codec/agreement"));
    }

    #[test]
    fn missing_directory_fails_without_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let report = validate(&dir.path().join("absent")).expect("validates");
        assert_eq!(report.failure_count(), 1);
    }

    #[test]
    fn empty_directory_warns() {
        let dir = tempfile::tempdir().expect("temp dir");
        let report = validate(dir.path()).expect("validates");
        assert!(report.all_passed());
        assert_eq!(report.count(Severity::Warning), 1);
    }
}
