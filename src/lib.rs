//! bunpo-xref: cross-referencing Japanese grammar reference indexes
//!
//! This crate loads the grammar-point indexes of three reference works and links
//! entries that describe the same grammar point:
//!
//! 1. **Loading** -- Each source is read whole, NFKC-normalized and parsed row by row
//!    into [`models::Entry`] values:
//!    - *A Dictionary of Japanese Grammar* (`dojg`): HTML table, page labels carry a
//!      volume letter (`B. 63`), usage text ends with an english equivalent
//!    - *Handbook of Japanese Grammar Patterns* (`hjgp`): HTML table with ruby-annotated
//!      headings and `<sub>` sub-entry numbers, pages written as `7 (2)`
//!    - *Dictionary of Japanese Particles* (`dojp`): two-column CSV
//! 2. **Form expansion** -- Every heading becomes a set of exact lookup strings
//!    (`か(どうか)` → `か`, `かどうか`; `方・かた` → `方`, `かた`)
//! 3. **Cross-referencing** -- Entries from different books that share a form are linked
//! 4. **Export** -- One CSV per book, one row per entry, plus one column per other book
//!    listing the matching page labels in natural order
//!
//! # Key Modules
//!
//! - [`forms`] -- Heading → lookup forms, sub-entry splitting, irregular overrides
//! - [`dojg`], [`hjgp`], [`dojp`] -- One adapter per source format
//! - [`parser`] -- HTML table access shared by the HTML adapters
//! - [`content`] -- Document normalization and cell cleanup
//! - [`dictionary`] -- Per-book entry list with form lookup
//! - [`crossref`] -- Cross-book matching
//! - [`export`] -- Column model, natural ordering and CSV tables
//! - [`sources`] -- Source locations and eager loading
//! - [`error`] -- Malformed-source errors
//! - [`stats`] -- Export counters
//! - [`config`] -- Constants
//!
//! # Example Usage
//!
//! ```bash
//! # Write dojg.csv, hjgp.csv and dojp.csv into out/
//! bunpo-xref export -o out/
//!
//! # Every entry, in every book, that answers to あいだ
//! bunpo-xref lookup あいだ
//!
//! # Entries on a dojg page and where else they are covered
//! bunpo-xref page dojg "B. 67"
//! ```

pub mod config;
pub mod content;
pub mod crossref;
pub mod dictionary;
pub mod dojg;
pub mod dojp;
pub mod error;
pub mod export;
pub mod forms;
pub mod hjgp;
pub mod models;
pub mod parser;
pub mod sources;
pub mod stats;
