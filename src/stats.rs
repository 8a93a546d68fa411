use std::sync::atomic::{AtomicU64, Ordering};

/// Counters collected while writing the cross-reference tables.
///
/// Tables are written in parallel, one per book, so the counters are atomic.
#[derive(Default)]
pub struct ExportStats {
    pub tables_written: AtomicU64,
    pub rows_written: AtomicU64,
    pub references_found: AtomicU64,
    pub unreferenced_entries: AtomicU64,
}

impl ExportStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc_tables(&self) {
        self.tables_written.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_rows(&self) {
        self.rows_written.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_references(&self, count: u64) {
        self.references_found.fetch_add(count, Ordering::Relaxed);
    }

    pub fn inc_unreferenced(&self) {
        self.unreferenced_entries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn tables(&self) -> u64 {
        self.tables_written.load(Ordering::Relaxed)
    }

    pub fn rows(&self) -> u64 {
        self.rows_written.load(Ordering::Relaxed)
    }

    pub fn references(&self) -> u64 {
        self.references_found.load(Ordering::Relaxed)
    }

    pub fn unreferenced(&self) -> u64 {
        self.unreferenced_entries.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn new_stats_are_zero() {
        let stats = ExportStats::new();
        assert_eq!(stats.tables(), 0);
        assert_eq!(stats.rows(), 0);
        assert_eq!(stats.references(), 0);
        assert_eq!(stats.unreferenced(), 0);
    }

    #[test]
    fn counters_accumulate() {
        let stats = ExportStats::new();
        stats.inc_rows();
        stats.inc_rows();
        stats.add_references(5);
        stats.inc_unreferenced();
        stats.inc_tables();
        assert_eq!(stats.rows(), 2);
        assert_eq!(stats.references(), 5);
        assert_eq!(stats.unreferenced(), 1);
        assert_eq!(stats.tables(), 1);
    }

    #[test]
    fn concurrent_increments() {
        let stats = Arc::new(ExportStats::new());
        let handles: Vec<_> = (0..3)
            .map(|_| {
                let stats = Arc::clone(&stats);
                thread::spawn(move || {
                    for _ in 0..100 {
                        stats.inc_rows();
                        stats.add_references(2);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(stats.rows(), 300);
        assert_eq!(stats.references(), 600);
    }
}
