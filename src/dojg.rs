//! A Dictionary of Japanese Grammar.
//!
//! Each row is `<th>heading</th><td>usage … <div class="equiv">english</div></td><td>B. 63</td>`.
//! The page label starts with the volume letter.

use crate::content::{clean_cell, strip_newlines};
use crate::dictionary::Dictionary;
use crate::error::SourceError;
use crate::forms::{expand_forms, split_sub_entry};
use crate::models::{Book, Entry, Volume, VolumeFilter};
use crate::parser::{element_text, TableDocument, TableRow};
use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use scraper::Selector;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

static EQUIV: Lazy<Selector> = Lazy::new(|| Selector::parse("div.equiv").unwrap());

pub fn load(path: &Path, volumes: &VolumeFilter) -> Result<Dictionary> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read dojg index: {}", path.display()))?;
    let dictionary = parse(&raw, volumes)
        .with_context(|| format!("Malformed dojg index: {}", path.display()))?;
    Ok(dictionary)
}

/// Parses every row, then keeps the ones whose volume `volumes` admits.
pub fn parse(raw: &str, volumes: &VolumeFilter) -> Result<Dictionary, SourceError> {
    let document = TableDocument::parse(Book::Dojg, raw);
    let entries = document
        .rows()?
        .iter()
        .map(extract_entry)
        .collect::<Result<Vec<_>, _>>()?;

    let parsed = entries.len();
    let admitted: Vec<Entry> = entries
        .into_iter()
        .filter(|entry| volumes.admits(entry.volume))
        .collect();

    info!(
        book = %Book::Dojg,
        parsed,
        admitted = admitted.len(),
        volumes = ?volumes.volumes(),
        "Parsed dojg index"
    );

    Ok(Dictionary::new(Book::Dojg, admitted))
}

fn extract_entry(row: &TableRow<'_>) -> Result<Entry, SourceError> {
    let heading_text = clean_cell(&element_text(row.heading()?));
    let heading = split_sub_entry(&heading_text).map_err(|_| SourceError::SubEntry {
        book: Book::Dojg,
        row: row.number(),
        text: heading_text.clone(),
    })?;

    let usage_cell = row.cell(0)?;
    let english_div = usage_cell
        .select(&EQUIV)
        .next()
        .ok_or_else(|| row.missing("english equivalent <div class=\"equiv\">"))?;
    let english = strip_newlines(&element_text(english_div));

    // The english equivalent is printed as the tail of the usage text.
    let full_usage = strip_newlines(&element_text(usage_cell));
    let usage = full_usage
        .strip_suffix(english.as_str())
        .ok_or_else(|| SourceError::EnglishSuffix {
            book: Book::Dojg,
            row: row.number(),
            usage: full_usage.clone(),
            english: english.clone(),
        })?
        .to_string();

    let page = clean_cell(&element_text(row.cell(1)?));
    let volume = page
        .chars()
        .next()
        .and_then(Volume::from_code)
        .ok_or_else(|| SourceError::UnknownVolume {
            book: Book::Dojg,
            row: row.number(),
            page: page.clone(),
        })?;

    let all_forms = expand_forms(&heading.concept);
    debug!(concept = %heading.concept, forms = ?all_forms.as_slice(), page = %page, "dojg entry");

    Ok(Entry {
        concept: heading.concept,
        all_forms,
        sub_entry: heading.sub_entry,
        usage: Some(usage),
        english: Some(english),
        book: Book::Dojg,
        volume: Some(volume),
        page,
        page_count: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(heading: &str, usage: &str, english: &str, page: &str) -> String {
        format!(
            "<tr><th>{}</th><td>{}<div class=\"equiv\">{}</div></td><td>{}</td></tr>",
            heading, usage, english, page
        )
    }

    fn page(rows: &[String]) -> String {
        format!(
            "<html><body><table><tbody id=\"tablebody\">{}</tbody></table></body></html>",
            rows.concat()
        )
    }

    #[test]
    fn extracts_all_fields() {
        let html = page(&[row("あげる (2)", "used with verbs", "do something for", "B. 65")]);
        let dict = parse(&html, &VolumeFilter::default()).unwrap();
        let entry = &dict.entries()[0];

        assert_eq!(entry.concept, "あげる");
        assert_eq!(entry.sub_entry, Some(2));
        assert_eq!(entry.usage.as_deref(), Some("used with verbs"));
        assert_eq!(entry.english.as_deref(), Some("do something for"));
        assert_eq!(entry.volume, Some(Volume::Basic));
        assert_eq!(entry.page, "B. 65");
        assert_eq!(entry.page_count, None);
        assert_eq!(entry.book, Book::Dojg);
        assert_eq!(entry.all_forms.as_slice(), ["あげる"]);
    }

    #[test]
    fn newlines_inside_usage_are_removed() {
        let html = page(&[row("の", "used\nafter nouns", "of", "B. 300")]);
        let dict = parse(&html, &VolumeFilter::default()).unwrap();
        assert_eq!(dict.entries()[0].usage.as_deref(), Some("usedafter nouns"));
    }

    #[test]
    fn full_width_heading_is_normalized() {
        let html = page(&[row("為（に）・ため（に）", "purpose", "in order to", "B. 447")]);
        let dict = parse(&html, &VolumeFilter::default()).unwrap();
        assert_eq!(
            dict.entries()[0].all_forms.as_slice(),
            ["為", "為に", "ため", "ために"]
        );
    }

    #[test]
    fn volume_filter_is_applied_after_parsing() {
        let html = page(&[
            row("あげる (1)", "u", "e", "B. 63"),
            row("あげく", "u", "e", "I. 3"),
            row("あえて", "u", "e", "A. 1"),
        ]);

        let basic = parse(&html, &VolumeFilter::default()).unwrap();
        assert_eq!(basic.len(), 1);

        let all = parse(&html, &VolumeFilter::all()).unwrap();
        let volumes: Vec<_> = all.entries().iter().map(|e| e.volume).collect();
        assert_eq!(
            volumes,
            vec![
                Some(Volume::Basic),
                Some(Volume::Intermediate),
                Some(Volume::Advanced)
            ]
        );
    }

    #[test]
    fn unknown_volume_code_aborts() {
        let html = page(&[row("の", "u", "e", "X. 1")]);
        let err = parse(&html, &VolumeFilter::default()).unwrap_err();
        assert!(matches!(err, SourceError::UnknownVolume { row: 1, .. }));
    }

    #[test]
    fn malformed_row_outside_filter_still_aborts() {
        let html = page(&[row("の", "u", "e", "B. 1"), row("が", "u", "e", "Z. 2")]);
        let err = parse(&html, &VolumeFilter::default()).unwrap_err();
        assert!(matches!(err, SourceError::UnknownVolume { row: 2, .. }));
    }

    #[test]
    fn english_must_be_the_usage_suffix() {
        let html = page(&[
            "<tr><th>の</th><td><div class=\"equiv\">of</div>trailing</td><td>B. 1</td></tr>"
                .to_string(),
        ]);
        let err = parse(&html, &VolumeFilter::default()).unwrap_err();
        assert!(matches!(err, SourceError::EnglishSuffix { .. }));
    }

    #[test]
    fn missing_equiv_div_aborts() {
        let html = page(&["<tr><th>の</th><td>usage</td><td>B. 1</td></tr>".to_string()]);
        let err = parse(&html, &VolumeFilter::default()).unwrap_err();
        assert!(matches!(err, SourceError::MissingElement { row: 1, .. }));
    }

    #[test]
    fn oversized_sub_entry_aborts() {
        let html = page(&[row("あげる (99999999999)", "u", "e", "B. 63")]);
        let err = parse(&html, &VolumeFilter::default()).unwrap_err();
        assert!(matches!(err, SourceError::SubEntry { row: 1, .. }));
    }

    #[test]
    fn missing_page_cell_aborts() {
        let html = page(&[
            "<tr><th>の</th><td>u<div class=\"equiv\">e</div></td></tr>".to_string(),
        ]);
        let err = parse(&html, &VolumeFilter::default()).unwrap_err();
        assert!(matches!(err, SourceError::MissingElement { .. }));
    }
}
