//! Parsing of the disease count report.
//!
//! A report looks like this:
//! ```text
//! DISEASE COUNT
//! ==============================
//! Acne                        120
//! Atopic dermatitis            87
//! ------------------------------
//! Total rows: 207
//! Unique diseases: 2
//! ```
//! Only the data lines (`<name> <count>`) contribute names.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::{info_time, Error, Result};

/// `<name><whitespace><count>` anchored to the end of the line.
static DATA_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)\s+\d+$").expect("data line pattern is valid"));

/// Substrings marking header and summary lines.
const MARKERS: [&str; 3] = ["DISEASE COUNT", "Total rows", "Unique diseases"];

/// Extracts entity names from the report text in file order.
/// Lines that are not data lines are dropped without error, and duplicates are kept.
pub fn parse_report(text: &str) -> Vec<String> {
    text.split(['\n', '\r']).filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('=') || line.starts_with('-') {
        return None;
    }
    if MARKERS.iter().any(|marker| line.contains(marker)) {
        return None;
    }

    let name = DATA_LINE_RE.captures(line)?.get(1)?.as_str().trim();
    (!name.is_empty()).then(|| name.to_string())
}

/// Reads and parses the report at `path`.
pub async fn read_report(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let text = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::ReportNotFound(path.to_path_buf()))
        }
        Err(e) => return Err(e.into()),
    };

    let names = parse_report(&text);
    info_time!("Parsed {} names from {}", names.len(), path.display());
    Ok(names)
}
