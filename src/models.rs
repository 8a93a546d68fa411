use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Source a grammar entry was extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Book {
    /// A Dictionary of Japanese Grammar (basic / intermediate / advanced volumes)
    Dojg,
    /// Handbook of Japanese Grammar Patterns
    Hjgp,
    /// Dictionary of Japanese Particles
    Dojp,
}

impl Book {
    pub const ALL: [Book; 3] = [Book::Dojg, Book::Hjgp, Book::Dojp];

    pub fn as_str(self) -> &'static str {
        match self {
            Book::Dojg => "dojg",
            Book::Hjgp => "hjgp",
            Book::Dojp => "dojp",
        }
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Book {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Book::ALL
            .into_iter()
            .find(|book| book.as_str() == s)
            .ok_or_else(|| format!("unknown book `{}` (expected dojg, hjgp or dojp)", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Volume {
    Basic,
    Intermediate,
    Advanced,
}

impl Volume {
    pub const ALL: [Volume; 3] = [Volume::Basic, Volume::Intermediate, Volume::Advanced];

    /// Maps the leading letter of a dojg page label ("B. 63") to its volume.
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'B' => Some(Volume::Basic),
            'I' => Some(Volume::Intermediate),
            'A' => Some(Volume::Advanced),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Volume::Basic => "basic",
            Volume::Intermediate => "intermediate",
            Volume::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Volume {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Volume::ALL
            .into_iter()
            .find(|volume| volume.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!(
                    "unknown volume `{}` (expected basic, intermediate or advanced)",
                    s
                )
            })
    }
}

/// Volumes admitted when building the dojg dictionary.
///
/// Applied after every row has been parsed, so a malformed row in an excluded
/// volume still aborts the load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeFilter {
    volumes: Vec<Volume>,
}

impl VolumeFilter {
    pub fn only(volumes: impl IntoIterator<Item = Volume>) -> Self {
        let mut filter = Self {
            volumes: Vec::new(),
        };
        for volume in volumes {
            if !filter.volumes.contains(&volume) {
                filter.volumes.push(volume);
            }
        }
        filter
    }

    pub fn all() -> Self {
        Self::only(Volume::ALL)
    }

    pub fn admits(&self, volume: Option<Volume>) -> bool {
        volume.is_some_and(|v| self.volumes.contains(&v))
    }

    pub fn volumes(&self) -> &[Volume] {
        &self.volumes
    }
}

impl Default for VolumeFilter {
    fn default() -> Self {
        Self::only([Volume::Basic])
    }
}

/// Ordered set of matchable surface forms; insertion order kept, duplicates dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Forms(Vec<String>);

impl Forms {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the form was already present.
    pub fn insert(&mut self, form: impl Into<String>) -> bool {
        let form = form.into();
        if self.0.contains(&form) {
            return false;
        }
        self.0.push(form);
        true
    }

    pub fn contains(&self, form: &str) -> bool {
        self.0.iter().any(|f| f == form)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn join(&self, sep: &str) -> String {
        self.0.join(sep)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl Extend<String> for Forms {
    fn extend<I: IntoIterator<Item = String>>(&mut self, iter: I) {
        for form in iter {
            self.insert(form);
        }
    }
}

impl FromIterator<String> for Forms {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut forms = Forms::new();
        forms.extend(iter);
        forms
    }
}

impl<'a> IntoIterator for &'a Forms {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// One grammar point as listed by one source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Entry {
    pub concept: String,
    pub all_forms: Forms,
    pub sub_entry: Option<u32>,
    pub usage: Option<String>,
    pub english: Option<String>,
    pub book: Book,
    pub volume: Option<Volume>,
    pub page: String,
    pub page_count: Option<u32>,
}

impl Entry {
    pub fn matches_form(&self, form: &str) -> bool {
        self.all_forms.contains(form)
    }
}
