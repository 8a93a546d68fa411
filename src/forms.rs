//! Turns a printed grammar heading into the set of strings it can be looked up by.
//!
//! Rules, in precedence order:
//!
//! 1. Headings listed in the irregular table map straight to their hand-written forms.
//! 2. The heading is split on the alternate separator (`・` for the HTML sources, `,`
//!    for the particle CSV); each segment is a synonym of the same concept.
//! 3. Within a segment, a parenthesised part is optional: `か(どうか)` yields `か` and
//!    `かどうか`. Text after the closing parenthesis is kept on both forms.
//! 4. Duplicates are dropped, first occurrence wins.
//!
//! Sub-entry numbers (`あげる (2)`) are split off the heading by [`split_sub_entry`]
//! before any of the above runs.

use crate::config::ALTERNATE_SEPARATOR;
use crate::models::Forms;
use once_cell::sync::Lazy;
use regex::Regex;
use std::num::ParseIntError;

static SUB_ENTRY_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(.*) \((\d+)\)$").unwrap());

static OPTIONAL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+?)\(([^()]+)\)(.*)$").unwrap());

/// Headings the general rules get wrong. Keys are post-NFKC.
///
/// `も~も` also answers to plain `も`. No other heading matches on a substring.
static IRREGULAR_FORMS: &[(&str, &[&str])] = &[
    ("ことが出来る・できる", &["ことが出来る", "ことができる"]),
    ("も~も", &["も~も", "も"]),
];

/// A heading with its trailing ` (N)` sub-entry number split off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub concept: String,
    pub sub_entry: Option<u32>,
}

/// Splits `"欲しい・ほしい (2)"` into concept `"欲しい・ほしい"` and sub-entry `2`.
///
/// Headings without the suffix come back whole with no sub-entry. A suffix whose
/// number does not fit a `u32` is an error.
pub fn split_sub_entry(heading: &str) -> Result<Heading, ParseIntError> {
    let Some(caps) = SUB_ENTRY_REGEX.captures(heading) else {
        return Ok(Heading {
            concept: heading.to_string(),
            sub_entry: None,
        });
    };
    Ok(Heading {
        concept: caps[1].to_string(),
        sub_entry: Some(caps[2].parse::<u32>()?),
    })
}

pub fn irregular_forms(concept: &str) -> Option<Forms> {
    IRREGULAR_FORMS
        .iter()
        .find(|(key, _)| *key == concept)
        .map(|(_, forms)| forms.iter().map(|f| f.to_string()).collect())
}

/// Expands a table heading using the `・` separator.
pub fn expand_forms(concept: &str) -> Forms {
    expand_forms_with(concept, ALTERNATE_SEPARATOR)
}

/// Expands a heading into its lookup forms, splitting alternates on `separator`.
///
/// Never returns an empty set: a heading that yields nothing falls back to itself.
pub fn expand_forms_with(concept: &str, separator: char) -> Forms {
    if let Some(forms) = irregular_forms(concept) {
        return forms;
    }

    let mut forms = Forms::new();
    for segment in concept.split(separator) {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        forms.extend(expand_optional(segment));
    }

    if forms.is_empty() {
        forms.insert(concept.trim());
    }
    forms
}

/// `"あいだ(に)"` → `["あいだ", "あいだに"]`; a segment without parentheses is returned as is.
pub fn expand_optional(segment: &str) -> Vec<String> {
    match OPTIONAL_REGEX.captures(segment) {
        Some(caps) => {
            let required = &caps[1];
            let optional = &caps[2];
            let rest = &caps[3];
            vec![
                format!("{}{}", required, rest),
                format!("{}{}{}", required, optional, rest),
            ]
        }
        None => vec![segment.to_string()],
    }
}
