//! Dictionary of Japanese Particles, transcribed as a two-column CSV (`page, entry`).

use crate::config::{CSV_ALTERNATE_SEPARATOR, DOJP_HEADER};
use crate::content::{clean_cell, normalize_document};
use crate::dictionary::Dictionary;
use crate::error::SourceError;
use crate::forms::expand_forms_with;
use crate::models::{Book, Entry};
use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

static SPACE_BEFORE_QUOTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?m)(^|,)[ \t]+""#).unwrap());

pub fn load(path: &Path) -> Result<Dictionary> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read dojp index: {}", path.display()))?;
    let dictionary =
        parse(&raw).with_context(|| format!("Malformed dojp index: {}", path.display()))?;
    Ok(dictionary)
}

pub fn parse(raw: &str) -> Result<Dictionary, SourceError> {
    let normalized = normalize_document(raw);
    let prepared = skip_initial_space(&normalized);
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(prepared.as_bytes());

    let csv_error = |source| SourceError::Csv {
        book: Book::Dojp,
        source,
    };

    let mut records = reader.records();
    let header = records.next().transpose().map_err(csv_error)?;
    validate_header(header.as_ref())?;

    let mut entries = Vec::new();
    for (i, record) in records.enumerate() {
        let record = record.map_err(csv_error)?;
        entries.push(extract_entry(i + 1, &record)?);
    }

    info!(book = %Book::Dojp, entries = entries.len(), "Parsed dojp index");
    Ok(Dictionary::new(Book::Dojp, entries))
}

/// Drops blanks between a delimiter and an opening quote, so `20, "から, ので"` reads
/// as two fields. The `csv` reader only recognizes a quote as the first byte of a field.
fn skip_initial_space(text: &str) -> Cow<'_, str> {
    SPACE_BEFORE_QUOTE.replace_all(text, "${1}\"")
}

fn validate_header(header: Option<&StringRecord>) -> Result<(), SourceError> {
    let found: Vec<String> = header
        .map(|h| h.iter().map(str::to_string).collect())
        .unwrap_or_default();

    if found.iter().map(String::as_str).eq(DOJP_HEADER) {
        Ok(())
    } else {
        Err(SourceError::Header {
            book: Book::Dojp,
            expected: DOJP_HEADER,
            found,
        })
    }
}

fn extract_entry(row: usize, record: &StringRecord) -> Result<Entry, SourceError> {
    if record.len() != DOJP_HEADER.len() {
        return Err(SourceError::FieldCount {
            book: Book::Dojp,
            row,
            expected: DOJP_HEADER.len(),
            found: record.len(),
        });
    }

    let page = clean_cell(&record[0]);
    let concept = clean_cell(&record[1]);
    let all_forms = expand_forms_with(&concept, CSV_ALTERNATE_SEPARATOR);
    debug!(concept = %concept, forms = ?all_forms.as_slice(), page = %page, "dojp entry");

    Ok(Entry {
        concept,
        all_forms,
        sub_entry: None,
        usage: None,
        english: None,
        book: Book::Dojp,
        volume: None,
        page,
        page_count: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rows_in_order() {
        let dict = parse("page,entry\n12, か\n20,\"から, ので\"\n").unwrap();
        let pages: Vec<_> = dict.entries().iter().map(|e| e.page.as_str()).collect();
        assert_eq!(pages, vec!["12", "20"]);

        let entry = &dict.entries()[1];
        assert_eq!(entry.concept, "から, ので");
        assert_eq!(entry.all_forms.as_slice(), ["から", "ので"]);
        assert_eq!(entry.sub_entry, None);
        assert_eq!(entry.book, Book::Dojp);
    }

    #[test]
    fn quoted_entry_after_space() {
        let dict = parse("page, entry\n20, \"から, ので\"\n21,\t\"で, にて\"\n").unwrap();
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.entries()[0].concept, "から, ので");
        assert_eq!(dict.entries()[0].all_forms.as_slice(), ["から", "ので"]);
        assert_eq!(dict.entries()[1].all_forms.as_slice(), ["で", "にて"]);
    }

    #[test]
    fn quote_inside_field_is_untouched() {
        assert_eq!(skip_initial_space("1, \"a\"\n2,b \"c\""), "1,\"a\"\n2,b \"c\"");
    }

    #[test]
    fn optional_parts_expand() {
        let dict = parse("page,entry\n30,か(な)\n").unwrap();
        assert_eq!(dict.entries()[0].all_forms.as_slice(), ["か", "かな"]);
    }

    #[test]
    fn header_with_spaces_is_accepted() {
        let dict = parse("page, entry\n1, は\n").unwrap();
        assert_eq!(dict.len(), 1);
    }

    #[test]
    fn wrong_header_aborts() {
        let err = parse("entry,page\nは,1\n").unwrap_err();
        assert!(matches!(err, SourceError::Header { .. }));

        let err = parse("page,entry,notes\n1,は,x\n").unwrap_err();
        assert!(matches!(err, SourceError::Header { .. }));
    }

    #[test]
    fn empty_document_aborts() {
        let err = parse("").unwrap_err();
        match err {
            SourceError::Header { found, .. } => assert!(found.is_empty()),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn short_row_aborts() {
        let err = parse("page,entry\n1\n").unwrap_err();
        assert!(matches!(
            err,
            SourceError::FieldCount {
                row: 1,
                found: 1,
                ..
            }
        ));
    }

    #[test]
    fn full_width_text_is_normalized() {
        let dict = parse("page,entry\n５,で（も）\n").unwrap();
        let entry = &dict.entries()[0];
        assert_eq!(entry.page, "5");
        assert_eq!(entry.all_forms.as_slice(), ["で", "でも"]);
    }
}
