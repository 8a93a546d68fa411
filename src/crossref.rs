use crate::dictionary::Dictionary;
use crate::models::Entry;
use rustc_hash::FxHashSet;

/// Entries in other sources sharing at least one form with `entry`.
///
/// Dictionaries of `entry`'s own book are skipped even when passed in. Results keep
/// first-seen order: dictionaries as given, then `entry.all_forms` order, then each
/// dictionary's document order. An entry reached through several forms appears once.
pub fn crossreference<'a, I>(entry: &Entry, dictionaries: I) -> Vec<&'a Entry>
where
    I: IntoIterator<Item = &'a Dictionary>,
{
    let mut found = Vec::new();
    let mut seen: FxHashSet<&Entry> = FxHashSet::default();

    for dictionary in dictionaries {
        if dictionary.book() == entry.book {
            continue;
        }
        for form in entry.all_forms.iter() {
            for candidate in dictionary.find(form) {
                if seen.insert(candidate) {
                    found.push(candidate);
                }
            }
        }
    }

    found
}
