use crate::config::TABLE_BODY_ID;
use crate::content::normalize_document;
use crate::error::SourceError;
use crate::models::Book;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

static TABLE_BODY: Lazy<Selector> =
    Lazy::new(|| Selector::parse(&format!("#{}", TABLE_BODY_ID)).unwrap());
static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").unwrap());
static HEADER_CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("th").unwrap());
static DATA_CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("td").unwrap());

/// An HTML index page, NFKC-normalized before parsing.
pub struct TableDocument {
    book: Book,
    html: Html,
}

impl TableDocument {
    pub fn parse(book: Book, raw: &str) -> Self {
        Self {
            book,
            html: Html::parse_document(&normalize_document(raw)),
        }
    }

    /// Rows under `#tablebody`, in document order.
    pub fn rows(&self) -> Result<Vec<TableRow<'_>>, SourceError> {
        let body = self
            .html
            .select(&TABLE_BODY)
            .next()
            .ok_or(SourceError::MissingTable {
                book: self.book,
                id: TABLE_BODY_ID,
            })?;

        Ok(body
            .select(&ROW)
            .enumerate()
            .map(|(i, element)| TableRow {
                book: self.book,
                number: i + 1,
                element,
            })
            .collect())
    }
}

/// One `tr`, numbered from 1 for error reporting.
#[derive(Clone, Copy)]
pub struct TableRow<'a> {
    book: Book,
    number: usize,
    element: ElementRef<'a>,
}

impl<'a> TableRow<'a> {
    pub fn number(&self) -> usize {
        self.number
    }

    pub fn heading(&self) -> Result<ElementRef<'a>, SourceError> {
        self.element
            .select(&HEADER_CELL)
            .next()
            .ok_or_else(|| self.missing("heading cell <th>"))
    }

    /// The `index`-th `td` of the row.
    pub fn cell(&self, index: usize) -> Result<ElementRef<'a>, SourceError> {
        self.element
            .select(&DATA_CELL)
            .nth(index)
            .ok_or_else(|| self.missing(DATA_CELL_NAMES.get(index).copied().unwrap_or("<td>")))
    }

    pub fn missing(&self, element: &'static str) -> SourceError {
        SourceError::MissingElement {
            book: self.book,
            row: self.number,
            element,
        }
    }
}

const DATA_CELL_NAMES: [&str; 2] = ["first data cell <td>", "second data cell <td>"];

/// Concatenated text of every descendant text node.
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Text of `element`, leaving out anything nested inside a `skip` tag.
///
/// Used to drop the `<sub>` sub-entry digits from a heading anchor.
pub fn text_excluding(element: ElementRef<'_>, skip: &str) -> String {
    let mut out = String::new();
    for node in element.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let skipped = node
            .ancestors()
            .take_while(|ancestor| ancestor.id() != element.id())
            .any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|e| e.name() == skip)
            });
        if !skipped {
            out.push_str(text);
        }
    }
    out
}
