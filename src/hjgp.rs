//! Handbook of Japanese Grammar Patterns.
//!
//! Heading cells come in two shapes:
//!
//! ```html
//! <a class="form links" data-concept="あと" data-id="7">あと<sub>1</sub></a>
//!
//! <ruby>
//!     <a class="form links" data-concept="間" data-id="1">間</a>
//!     <rt class="form" data-concept="あいだ" data-id="1">あいだ</rt>
//! </ruby>
//! ```
//!
//! The page cell reads `"<page> (<page count>)"`.

use crate::content::clean_cell;
use crate::dictionary::Dictionary;
use crate::error::SourceError;
use crate::forms::expand_forms;
use crate::models::{Book, Entry, Forms};
use crate::parser::{element_text, text_excluding, TableDocument, TableRow};
use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Selector;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

static PAGE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+) \((\d+)\)$").unwrap());

static RUBY: Lazy<Selector> = Lazy::new(|| Selector::parse("ruby").unwrap());
static READING: Lazy<Selector> = Lazy::new(|| Selector::parse("rt").unwrap());
static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").unwrap());
static SUB: Lazy<Selector> = Lazy::new(|| Selector::parse("sub").unwrap());

pub fn load(path: &Path) -> Result<Dictionary> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read hjgp index: {}", path.display()))?;
    let dictionary =
        parse(&raw).with_context(|| format!("Malformed hjgp index: {}", path.display()))?;
    Ok(dictionary)
}

pub fn parse(raw: &str) -> Result<Dictionary, SourceError> {
    let document = TableDocument::parse(Book::Hjgp, raw);
    let entries = document
        .rows()?
        .iter()
        .map(extract_entry)
        .collect::<Result<Vec<_>, _>>()?;

    info!(book = %Book::Hjgp, entries = entries.len(), "Parsed hjgp index");
    Ok(Dictionary::new(Book::Hjgp, entries))
}

/// Heading cell contents: reading (if ruby-annotated), main text and sub-entry number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RubyHeading {
    pub reading: Option<String>,
    pub text: String,
    pub sub_entry: Option<u32>,
}

impl RubyHeading {
    /// Reading first, then every form of the main text.
    pub fn forms(&self) -> Forms {
        let mut forms = Forms::new();
        if let Some(reading) = &self.reading {
            forms.insert(reading.clone());
        }
        forms.extend(expand_forms(&self.text).as_slice().iter().cloned());
        forms
    }

    pub fn concept(&self) -> &str {
        self.reading.as_deref().unwrap_or(&self.text)
    }
}

fn extract_entry(row: &TableRow<'_>) -> Result<Entry, SourceError> {
    let heading = parse_heading(row)?;
    let (page, page_count) = parse_page_field(row, &element_text(row.cell(1)?))?;

    let all_forms = heading.forms();
    debug!(concept = heading.concept(), forms = ?all_forms.as_slice(), page = %page, "hjgp entry");

    Ok(Entry {
        concept: heading.concept().to_string(),
        all_forms,
        sub_entry: heading.sub_entry,
        usage: None,
        english: None,
        book: Book::Hjgp,
        volume: None,
        page,
        page_count: Some(page_count),
    })
}

pub fn parse_heading(row: &TableRow<'_>) -> Result<RubyHeading, SourceError> {
    let cell = row.heading()?;

    let rubies: Vec<_> = cell.select(&RUBY).collect();
    let reading = match rubies.as_slice() {
        [] => None,
        [ruby] => {
            let rt = ruby
                .select(&READING)
                .next()
                .ok_or_else(|| row.missing("ruby reading <rt>"))?;
            Some(clean_cell(&element_text(rt)))
        }
        _ => {
            return Err(SourceError::RubyCount {
                book: Book::Hjgp,
                row: row.number(),
                count: rubies.len(),
            })
        }
    };

    let anchor = cell
        .select(&ANCHOR)
        .next()
        .ok_or_else(|| row.missing("heading link <a>"))?;

    let sub_entry = match anchor.select(&SUB).next() {
        Some(sub) => {
            let digits = clean_cell(&element_text(sub));
            let n = digits.parse::<u32>().map_err(|_| SourceError::SubEntry {
                book: Book::Hjgp,
                row: row.number(),
                text: digits.clone(),
            })?;
            Some(n)
        }
        None => None,
    };

    Ok(RubyHeading {
        reading,
        text: clean_cell(&text_excluding(anchor, "sub")),
        sub_entry,
    })
}

pub fn parse_page_field(row: &TableRow<'_>, field: &str) -> Result<(String, u32), SourceError> {
    let field = clean_cell(field);
    let bad_field = || SourceError::PageField {
        book: Book::Hjgp,
        row: row.number(),
        field: field.clone(),
    };

    let caps = PAGE_REGEX.captures(&field).ok_or_else(bad_field)?;
    let page_count = caps[2].parse::<u32>().map_err(|_| bad_field())?;
    Ok((caps[1].to_string(), page_count))
}
