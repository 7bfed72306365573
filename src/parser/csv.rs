//! Semicolon-delimited CSV decoding for supplier data files.
//!
//! Files come from spreadsheet exports, so they may carry a UTF-8 byte-order
//! mark or be plain Latin-1, and occasionally contain ragged rows.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use crate::services::validation::{CSV_DELIMITER, CSV_SAMPLE_LINES};

const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// A CSV row keyed by header name, in column order.
pub type CsvRow = Map<String, Value>;

#[derive(Debug, Error)]
pub enum CsvParseError {
    #[error("CSV file has no header row")]
    MissingHeader,

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextEncoding {
    Utf8,
    Latin1,
}

#[derive(Debug, Clone, Serialize)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<CsvRow>,
    pub encoding: TextEncoding,
    /// Set when strict parsing failed and ragged rows were accepted.
    pub tolerant: bool,
}

/// Decodes file bytes as UTF-8 (BOM stripped), falling back to Latin-1.
#[must_use]
pub fn decode_text(bytes: &[u8]) -> (String, TextEncoding) {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => (text.to_string(), TextEncoding::Utf8),
        // Latin-1 maps every byte to the code point of the same value.
        Err(_) => (
            bytes.iter().map(|&b| char::from(b)).collect(),
            TextEncoding::Latin1,
        ),
    }
}

/// Parses raw file bytes into a table.
///
/// Strict parsing is tried first. When it fails on a structural error
/// (rows with a different field count than the header) the file is parsed
/// again in tolerant mode: short rows are padded with nulls and surplus
/// cells are dropped. Rows whose cells are all empty are skipped.
pub fn parse_bytes(bytes: &[u8]) -> Result<CsvTable, CsvParseError> {
    let (text, encoding) = decode_text(bytes);

    match parse_text(&text, false) {
        Ok((headers, rows)) => Ok(CsvTable {
            headers,
            rows,
            encoding,
            tolerant: false,
        }),
        Err(CsvParseError::Csv(e)) if is_structural(&e) => {
            tracing::debug!(error = %e, "Strict CSV parse failed, retrying in tolerant mode");
            let (headers, rows) = parse_text(&text, true)?;
            Ok(CsvTable {
                headers,
                rows,
                encoding,
                tolerant: true,
            })
        }
        Err(e) => Err(e),
    }
}

fn is_structural(error: &csv::Error) -> bool {
    matches!(error.kind(), csv::ErrorKind::UnequalLengths { .. })
}

fn parse_text(text: &str, flexible: bool) -> Result<(Vec<String>, Vec<CsvRow>), CsvParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(CSV_DELIMITER)
        .quote(b'"')
        .has_headers(true)
        .flexible(flexible)
        .from_reader(text.as_bytes());

    let raw_headers = reader.headers()?.clone();
    if raw_headers.is_empty() {
        return Err(CsvParseError::MissingHeader);
    }
    let headers = normalize_headers(raw_headers.iter());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }

        let row: CsvRow = headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                let value = match record.get(i) {
                    Some(cell) if !cell.is_empty() => Value::String(cell.to_string()),
                    _ => Value::Null,
                };
                (header.clone(), value)
            })
            .collect();
        rows.push(row);
    }

    Ok((headers, rows))
}

/// Names blank headers `Unnamed: <index>` and suffixes repeats with `.1`,
/// `.2`, ... so every column gets a distinct key.
fn normalize_headers<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();

    raw.enumerate()
        .map(|(i, name)| {
            let base = if name.trim().is_empty() {
                format!("Unnamed: {i}")
            } else {
                name.to_string()
            };

            let count = seen.entry(base.clone()).or_insert(0);
            let header = if *count == 0 {
                base
            } else {
                format!("{base}.{count}")
            };
            *count += 1;
            header
        })
        .collect()
}

/// First few raw lines of a file, decoded leniently, for error diagnosis.
#[must_use]
pub fn sample_lines(path: &Path) -> Option<String> {
    let bytes = std::fs::read(path).ok()?;
    let (text, _) = decode_text(&bytes);
    let sample: String = text.split_inclusive('\n').take(CSV_SAMPLE_LINES).collect();
    (!sample.is_empty()).then_some(sample)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_text_strips_bom() {
        let (text, encoding) = decode_text(b"\xef\xbb\xbfa;b\n");
        assert_eq!(text, "a;b\n");
        assert_eq!(encoding, TextEncoding::Utf8);
    }

    #[test]
    fn test_decode_text_latin1_fallback() {
        let (text, encoding) = decode_text(b"K\xf6ln;d\xe9p\xf4t");
        assert_eq!(text, "Köln;dépôt");
        assert_eq!(encoding, TextEncoding::Latin1);
    }

    #[test]
    fn test_parse_quoted_fields_and_empty_rows() {
        let input = "Nom du fichier;Commentaire;Score\n\
                     \"img_01.png\";\"a; b\";12\n\
                     ;;\n\
                     img_02.jpg;;7\n";
        let table = parse_bytes(input.as_bytes()).unwrap();

        assert!(!table.tolerant);
        assert_eq!(table.headers, vec!["Nom du fichier", "Commentaire", "Score"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0]["Commentaire"], "a; b");
        assert_eq!(table.rows[1]["Nom du fichier"], "img_02.jpg");
        assert!(table.rows[1]["Commentaire"].is_null());
    }

    #[test]
    fn test_parse_preserves_column_order() {
        let table = parse_bytes(b"z;a;m\n1;2;3\n").unwrap();
        let keys: Vec<&String> = table.rows[0].keys().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_ragged_rows_use_tolerant_mode() {
        let table = parse_bytes(b"a;b;c\n1;2;3\n4;5\n6;7;8;9\n").unwrap();

        assert!(table.tolerant);
        assert_eq!(table.rows.len(), 3);
        assert!(table.rows[1]["c"].is_null());
        assert_eq!(table.rows[2]["c"], "8");
        assert_eq!(table.rows[2].len(), 3);
    }

    #[test]
    fn test_duplicate_and_blank_headers() {
        let table = parse_bytes(b"id;;id\n1;2;3\n").unwrap();
        assert_eq!(table.headers, vec!["id", "Unnamed: 1", "id.1"]);
    }

    #[test]
    fn test_latin1_file_parses() {
        let table = parse_bytes(b"ville;code\nK\xf6ln;1\n").unwrap();
        assert_eq!(table.encoding, TextEncoding::Latin1);
        assert_eq!(table.rows[0]["ville"], "Köln");
    }

    #[test]
    fn test_sample_lines() {
        let path = std::env::temp_dir().join(format!("portal-sample-{}.csv", uuid::Uuid::new_v4()));
        std::fs::write(&path, "l1\nl2\nl3\nl4\n").unwrap();
        assert_eq!(sample_lines(&path).as_deref(), Some("l1\nl2\nl3\n"));
        std::fs::remove_file(path).ok();
    }
}
