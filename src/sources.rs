use crate::config::{DEFAULT_DATA_DIR, DOJG_FILE, DOJP_FILE, HJGP_FILE};
use crate::dictionary::Dictionary;
use crate::models::{Book, VolumeFilter};
use crate::{dojg, dojp, hjgp};
use anyhow::Result;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

/// Where each source lives and which dojg volumes to keep.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub dojg: PathBuf,
    pub hjgp: PathBuf,
    pub dojp: PathBuf,
    pub volumes: VolumeFilter,
}

impl SourceConfig {
    /// Standard file names under `data_dir`, basic dojg volume only.
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        Self {
            dojg: data_dir.join(DOJG_FILE),
            hjgp: data_dir.join(HJGP_FILE),
            dojp: data_dir.join(DOJP_FILE),
            volumes: VolumeFilter::default(),
        }
    }

    pub fn path(&self, book: Book) -> &Path {
        match book {
            Book::Dojg => &self.dojg,
            Book::Hjgp => &self.hjgp,
            Book::Dojp => &self.dojp,
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self::in_dir(DEFAULT_DATA_DIR)
    }
}

pub fn load(book: Book, config: &SourceConfig) -> Result<Dictionary> {
    let path = config.path(book);
    match book {
        Book::Dojg => dojg::load(path, &config.volumes),
        Book::Hjgp => hjgp::load(path),
        Book::Dojp => dojp::load(path),
    }
}

/// Loads every source fully, in `Book::ALL` order. The first malformed source aborts.
pub fn load_all(config: &SourceConfig) -> Result<Vec<Dictionary>> {
    let start = Instant::now();
    let dictionaries = Book::ALL
        .into_iter()
        .map(|book| load(book, config))
        .collect::<Result<Vec<_>>>()?;

    info!(
        duration_secs = start.elapsed().as_secs_f64(),
        entries = dictionaries.iter().map(Dictionary::len).sum::<usize>(),
        "All sources loaded"
    );
    Ok(dictionaries)
}
