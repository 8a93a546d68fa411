use crate::models::{Book, Entry};
use rustc_hash::FxHashMap;
use tracing::debug;

/// All entries of one source, in document order, with a form → entries index.
///
/// Built once per load and never modified.
#[derive(Debug)]
pub struct Dictionary {
    book: Book,
    entries: Vec<Entry>,
    by_form: FxHashMap<String, Vec<usize>>,
}

impl Dictionary {
    pub fn new(book: Book, entries: impl IntoIterator<Item = Entry>) -> Self {
        let entries: Vec<Entry> = entries.into_iter().collect();
        let mut by_form: FxHashMap<String, Vec<usize>> = FxHashMap::default();

        // Forms are distinct within an entry, so each index lands once per key.
        for (i, entry) in entries.iter().enumerate() {
            for form in entry.all_forms.iter() {
                by_form.entry(form.to_string()).or_default().push(i);
            }
        }

        debug!(
            book = %book,
            entries = entries.len(),
            forms = by_form.len(),
            "Dictionary built"
        );

        Self {
            book,
            entries,
            by_form,
        }
    }

    pub fn book(&self) -> Book {
        self.book
    }

    pub fn name(&self) -> &'static str {
        self.book.as_str()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries whose forms contain `form` exactly, in document order.
    pub fn find(&self, form: &str) -> Vec<&Entry> {
        self.by_form
            .get(form)
            .map(|indices| indices.iter().map(|&i| &self.entries[i]).collect())
            .unwrap_or_default()
    }

    /// Entries printed on `page` (compared as the raw label, e.g. `"B. 63"`).
    pub fn on_page(&self, page: &str) -> Vec<&Entry> {
        self.entries.iter().filter(|e| e.page == page).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::expand_forms;

    fn entry(concept: &str, sub_entry: Option<u32>, page: &str) -> Entry {
        Entry {
            concept: concept.to_string(),
            all_forms: expand_forms(concept),
            sub_entry,
            usage: None,
            english: None,
            book: Book::Dojg,
            volume: None,
            page: page.to_string(),
            page_count: None,
        }
    }

    fn make_dictionary(entries: Vec<Entry>) -> Dictionary {
        Dictionary::new(Book::Dojg, entries)
    }

    fn pages(found: Vec<&Entry>) -> Vec<&str> {
        found.into_iter().map(|e| e.page.as_str()).collect()
    }

    #[test]
    fn find_exact_form() {
        let dict = make_dictionary(vec![entry("のだ", None, "B. 325")]);
        assert_eq!(pages(dict.find("のだ")), vec!["B. 325"]);
    }

    #[test]
    fn find_sub_entries_in_document_order() {
        let dict = make_dictionary(vec![
            entry("あげる", Some(1), "B. 63"),
            entry("間・あいだ(に)", None, "B. 67"),
            entry("あげる", Some(2), "B. 65"),
        ]);
        assert_eq!(pages(dict.find("あげる")), vec!["B. 63", "B. 65"]);
    }

    #[test]
    fn find_each_alternate() {
        let dict = make_dictionary(vec![entry("方・かた", None, "B. 183")]);
        assert_eq!(dict.find("方"), dict.find("かた"));
        assert_eq!(pages(dict.find("方")), vec!["B. 183"]);
    }

    #[test]
    fn find_optional_forms() {
        let dict = make_dictionary(vec![
            entry("か", Some(1), "B. 164"),
            entry("か", Some(2), "B. 166"),
            entry("か(どうか)", None, "B. 168"),
        ]);
        assert_eq!(pages(dict.find("か")), vec!["B. 164", "B. 166", "B. 168"]);
        assert_eq!(pages(dict.find("かどうか")), vec!["B. 168"]);
    }

    #[test]
    fn find_no_match_is_empty() {
        let dict = make_dictionary(vec![entry("のだ", None, "B. 325")]);
        assert!(dict.find("のです").is_empty());
        assert!(dict.find("").is_empty());
    }

    #[test]
    fn find_is_case_sensitive() {
        let dict = make_dictionary(vec![entry("Vte", None, "B. 1")]);
        assert_eq!(dict.find("Vte").len(), 1);
        assert!(dict.find("vte").is_empty());
    }

    #[test]
    fn on_page_exact_label() {
        let dict = make_dictionary(vec![
            entry("か", Some(1), "B. 164"),
            entry("が", Some(1), "B. 164"),
            entry("か(どうか)", None, "B. 168"),
        ]);
        let found: Vec<_> = dict
            .on_page("B. 164")
            .into_iter()
            .map(|e| e.concept.as_str())
            .collect();
        assert_eq!(found, vec!["か", "が"]);
        assert!(dict.on_page("164").is_empty());
    }

    #[test]
    fn empty_dictionary() {
        let dict = make_dictionary(vec![]);
        assert!(dict.is_empty());
        assert!(dict.find("か").is_empty());
        assert!(dict.on_page("B. 1").is_empty());
    }

    #[test]
    fn name_is_book_identifier() {
        let dict = Dictionary::new(Book::Hjgp, Vec::new());
        assert_eq!(dict.name(), "hjgp");
        assert_eq!(dict.book(), Book::Hjgp);
    }
}
