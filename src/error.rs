use crate::models::Book;

/// A structural assumption about a source document did not hold.
///
/// These mean the source format changed; loading stops at the first one.
/// Row numbers are 1-based and count data rows only.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("{book}: table body `#{id}` not found")]
    MissingTable { book: Book, id: &'static str },

    #[error("{book}: row {row}: missing {element}")]
    MissingElement {
        book: Book,
        row: usize,
        element: &'static str,
    },

    #[error("{book}: row {row}: page {page:?} does not start with a known volume code")]
    UnknownVolume { book: Book, row: usize, page: String },

    #[error("{book}: row {row}: usage {usage:?} does not end with english equivalent {english:?}")]
    EnglishSuffix {
        book: Book,
        row: usize,
        usage: String,
        english: String,
    },

    #[error("{book}: row {row}: page field {field:?} does not match `<page> (<count>)`")]
    PageField { book: Book, row: usize, field: String },

    #[error("{book}: row {row}: sub-entry number in {text:?} is not a valid u32")]
    SubEntry { book: Book, row: usize, text: String },

    #[error("{book}: row {row}: expected at most one ruby annotation, found {count}")]
    RubyCount { book: Book, row: usize, count: usize },

    #[error("{book}: expected header {expected:?}, found {found:?}")]
    Header {
        book: Book,
        expected: [&'static str; 2],
        found: Vec<String>,
    },

    #[error("{book}: row {row}: expected {expected} fields, found {found}")]
    FieldCount {
        book: Book,
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("{book}: {source}")]
    Csv {
        book: Book,
        #[source]
        source: csv::Error,
    },
}
