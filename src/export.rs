use crate::config::{CSV_BUFFER_SIZE, PAGE_LIST_SEPARATOR};
use crate::crossref::crossreference;
use crate::dictionary::Dictionary;
use crate::models::{Book, Entry};
use crate::stats::ExportStats;
use anyhow::{Context, Result};
use csv::Writer;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::cmp::Ordering;
use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

/// Entry attributes that can be exported as a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Concept,
    SubEntry,
    Usage,
    English,
    Book,
    Volume,
    Page,
    PageCount,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::Concept,
        Field::SubEntry,
        Field::Usage,
        Field::English,
        Field::Book,
        Field::Volume,
        Field::Page,
        Field::PageCount,
    ];

    pub fn identifier(self) -> &'static str {
        match self {
            Field::Concept => "concept",
            Field::SubEntry => "sub_entry",
            Field::Usage => "usage",
            Field::English => "english",
            Field::Book => "book",
            Field::Volume => "volume",
            Field::Page => "page",
            Field::PageCount => "page_count",
        }
    }

    pub fn header(self) -> &'static str {
        match self {
            Field::Concept => "Concept",
            Field::SubEntry => "Sub-entry",
            Field::Usage => "Usage",
            Field::English => "English",
            Field::Book => "Book",
            Field::Volume => "Volume",
            Field::Page => "Page",
            Field::PageCount => "Page Count",
        }
    }

    /// Pure accessor rendering this field of an entry; absent values are empty.
    pub fn accessor(self) -> fn(&Entry) -> String {
        match self {
            Field::Concept => |e| e.concept.clone(),
            Field::SubEntry => |e| optional(e.sub_entry),
            Field::Usage => |e| e.usage.clone().unwrap_or_default(),
            Field::English => |e| e.english.clone().unwrap_or_default(),
            Field::Book => |e| e.book.to_string(),
            Field::Volume => |e| optional(e.volume),
            Field::Page => |e| e.page.clone(),
            Field::PageCount => |e| optional(e.page_count),
        }
    }

    pub fn value(self, entry: &Entry) -> String {
        (self.accessor())(entry)
    }
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|f| f.identifier() == s)
            .ok_or_else(|| format!("unknown column `{}`", s))
    }
}

#[derive(Clone, Copy)]
pub enum ColumnValue {
    Field(Field),
    Computed(fn(&Entry) -> String),
}

impl fmt::Debug for ColumnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnValue::Field(field) => f.debug_tuple("Field").field(field).finish(),
            ColumnValue::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub value: ColumnValue,
}

impl Column {
    pub fn field(name: impl Into<String>, field: Field) -> Self {
        Self {
            name: name.into(),
            value: ColumnValue::Field(field),
        }
    }

    pub fn computed(name: impl Into<String>, compute: fn(&Entry) -> String) -> Self {
        Self {
            name: name.into(),
            value: ColumnValue::Computed(compute),
        }
    }

    pub fn render(&self, entry: &Entry) -> String {
        match self.value {
            ColumnValue::Field(field) => field.value(entry),
            ColumnValue::Computed(compute) => compute(entry),
        }
    }
}

impl From<Field> for Column {
    fn from(field: Field) -> Self {
        Column::field(field.header(), field)
    }
}

/// `forms` selects [`forms_column`]; anything else must be a [`Field`] identifier.
impl FromStr for Column {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "forms" | "all_forms" => Ok(forms_column()),
            other => other.parse::<Field>().map(Column::from),
        }
    }
}

pub fn forms_column() -> Column {
    Column::computed("Forms", |entry| entry.all_forms.join(", "))
}

pub fn default_columns(book: Book) -> Vec<Column> {
    let fields: &[Field] = match book {
        Book::Dojg => &[Field::Concept, Field::SubEntry, Field::Volume, Field::Page],
        Book::Hjgp => &[Field::Concept, Field::SubEntry, Field::Page, Field::PageCount],
        Book::Dojp => &[Field::Concept, Field::Page],
    };
    fields.iter().copied().map(Column::from).collect()
}

/// Orders strings treating digit runs as numbers: `"B. 9" < "B. 10"`.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = Chunks { rest: a };
    let mut right = Chunks { rest: b };
    loop {
        match (left.next(), right.next()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ord = x.cmp_natural(&y);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

enum Chunk<'a> {
    Digits(&'a str),
    Text(&'a str),
}

impl Chunk<'_> {
    fn cmp_natural(&self, other: &Chunk<'_>) -> Ordering {
        match (self, other) {
            (Chunk::Digits(x), Chunk::Digits(y)) => {
                let x = x.trim_start_matches('0');
                let y = y.trim_start_matches('0');
                x.len().cmp(&y.len()).then_with(|| x.cmp(y))
            }
            (Chunk::Text(x), Chunk::Text(y)) => x.cmp(y),
            (Chunk::Digits(_), Chunk::Text(_)) => Ordering::Less,
            (Chunk::Text(_), Chunk::Digits(_)) => Ordering::Greater,
        }
    }
}

struct Chunks<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Chunks<'a> {
    type Item = Chunk<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.rest.chars().next()?;
        let digits = first.is_ascii_digit();
        let end = self
            .rest
            .char_indices()
            .find(|(_, c)| c.is_ascii_digit() != digits)
            .map(|(i, _)| i)
            .unwrap_or(self.rest.len());
        let (chunk, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(if digits {
            Chunk::Digits(chunk)
        } else {
            Chunk::Text(chunk)
        })
    }
}

/// Distinct page labels of `references`, naturally sorted and joined by `", "`.
pub fn page_list(references: &[&Entry]) -> String {
    let mut pages: Vec<&str> = references.iter().map(|e| e.page.as_str()).collect();
    pages.sort_by(|a, b| natural_cmp(a, b));
    pages.dedup();
    pages.join(PAGE_LIST_SEPARATOR)
}

/// Writes one row per entry of `target`: its configured columns, then one cell per
/// other dictionary listing the pages cross-referenced there.
///
/// `dictionaries` may include `target`; it gets no column of its own.
pub fn write_table<W: Write>(
    target: &Dictionary,
    dictionaries: &[Dictionary],
    columns: &[Column],
    out: W,
    stats: &ExportStats,
    progress: &ProgressBar,
) -> Result<()> {
    let others: Vec<&Dictionary> = dictionaries
        .iter()
        .filter(|d| d.name() != target.name())
        .collect();

    let mut writer = Writer::from_writer(out);

    let mut header: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
    header.extend(others.iter().map(|d| d.name()));
    writer.write_record(&header)?;

    for entry in target.entries() {
        let mut record: Vec<String> = columns.iter().map(|c| c.render(entry)).collect();
        let mut referenced = false;

        for other in &others {
            let references = crossreference(entry, [*other]);
            stats.add_references(references.len() as u64);
            referenced |= !references.is_empty();
            record.push(page_list(&references));
        }

        if !referenced {
            stats.inc_unreferenced();
        }
        writer.write_record(&record)?;
        stats.inc_rows();
        progress.inc(1);
    }

    writer.flush()?;
    stats.inc_tables();
    Ok(())
}

/// Which book to export and with which columns.
#[derive(Debug, Clone)]
pub struct TablePlan {
    pub book: Book,
    pub columns: Vec<Column>,
}

impl TablePlan {
    pub fn new(book: Book, columns: Option<&[Column]>, with_forms: bool) -> Self {
        let mut columns = match columns {
            Some(columns) => columns.to_vec(),
            None => default_columns(book),
        };
        if with_forms && !columns.iter().any(|c| c.name == "Forms") {
            columns.push(forms_column());
        }
        Self { book, columns }
    }

    pub fn file_name(&self) -> String {
        format!("{}.csv", self.book)
    }
}

fn make_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("    {spinner:.cyan} {msg:<14} [{bar:30.cyan/blue}] {pos}/{len} rows")
            .unwrap()
            .progress_chars("=> "),
    );
    pb.set_message("Exporting");
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Writes `<output_dir>/<book>.csv` for every plan, one table per rayon task.
///
/// Returns the written paths in plan order.
pub fn export_tables(
    dictionaries: &[Dictionary],
    plans: &[TablePlan],
    output_dir: &Path,
    stats: &ExportStats,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;

    let total: usize = plans
        .iter()
        .filter_map(|plan| dictionaries.iter().find(|d| d.book() == plan.book))
        .map(Dictionary::len)
        .sum();
    let pb = make_progress_bar(total as u64);

    let paths = plans
        .par_iter()
        .map(|plan| -> Result<PathBuf> {
            let target = dictionaries
                .iter()
                .find(|d| d.book() == plan.book)
                .with_context(|| format!("No dictionary loaded for {}", plan.book))?;

            let path = output_dir.join(plan.file_name());
            let file = File::create(&path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let out = BufWriter::with_capacity(CSV_BUFFER_SIZE, file);

            write_table(target, dictionaries, &plan.columns, out, stats, &pb)
                .with_context(|| format!("Failed to write {}", path.display()))?;

            info!(
                book = %plan.book,
                rows = target.len(),
                path = %path.display(),
                "Table written"
            );
            Ok(path)
        })
        .collect::<Result<Vec<_>>>()?;

    pb.finish_and_clear();
    Ok(paths)
}
