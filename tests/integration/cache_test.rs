use std::fmt::Write as _;
use std::sync::{Arc, Barrier, Mutex, Once};
use std::thread;

use log::{Level, LevelFilter, Metadata, Record};

use crate::utils::{rich_csv, write_fixture};
use inundation_impact::{Dataset, DatasetCache, ImpactError, MatchPolicy, Selection};

/// Records every load summary line emitted in this test binary
struct LoadLog {
    lines: Mutex<Vec<String>>,
}

impl log::Log for LoadLog {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Info
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let message = record.args().to_string();
        if message.starts_with("Loaded ") {
            self.lines.lock().unwrap().push(message);
        }
    }

    fn flush(&self) {}
}

static LOAD_LOG: LoadLog = LoadLog {
    lines: Mutex::new(Vec::new()),
};

fn install_load_log() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        log::set_logger(&LOAD_LOG).unwrap();
        log::set_max_level(LevelFilter::Info);
    });
}

fn loads_of(file_name: &str) -> usize {
    LOAD_LOG
        .lines
        .lock()
        .unwrap()
        .iter()
        .filter(|line| line.contains(file_name))
        .count()
}

fn large_csv(rows: usize) -> String {
    let mut csv = String::from("State,County,SLOSH,Establishments,Employment,wages_week,sales_week\n");
    for i in 0..rows {
        writeln!(csv, "Alabama,County {i},{},10,100,35000,90000", i % 5 + 1).unwrap();
    }
    csv
}

/// Threads racing the first load wait for it instead of reading the file again
#[test]
fn test_racing_first_load_reads_file_once() {
    install_load_log();
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(dir.path(), "racing_losses.csv", &large_csv(20_000));
    let cache = Arc::new(DatasetCache::new(&path));
    let start = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let start = Arc::clone(&start);
            thread::spawn(move || {
                start.wait();
                cache.get().unwrap().len()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 20_000);
    }
    assert_eq!(loads_of("racing_losses.csv"), 1);

    cache.get().unwrap();
    assert_eq!(loads_of("racing_losses.csv"), 1);
}

/// Concurrent readers all see the single loaded dataset
#[test]
fn test_concurrent_readers_share_one_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(dir.path(), "losses.csv", &rich_csv());
    let cache = Arc::new(DatasetCache::new(&path));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                let dataset = cache.get().unwrap();
                let selection = Selection::new()
                    .with_state("Alabama")
                    .with_county("Mobile County")
                    .with_category("Category 3");
                let record = dataset.resolve(&selection, MatchPolicy::FirstMatch).unwrap();
                (Arc::as_ptr(&dataset) as usize, record.establishments)
            })
        })
        .collect();

    let results: Vec<(usize, u64)> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let first = cache.get().unwrap();
    for (ptr, establishments) in results {
        assert_eq!(ptr, Arc::as_ptr(&first) as usize);
        assert_eq!(establishments, 120);
    }
}

/// A failed first load leaves the process-wide dataset unbound
#[test]
fn test_shared_dataset_is_process_wide() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.csv");
    assert!(Dataset::shared(&missing).is_err());

    let path = write_fixture(dir.path(), "losses.csv", &rich_csv());
    let first = Dataset::shared(&path).unwrap();
    assert_eq!(first.source(), path.as_path());

    let other = dir.path().join("other.csv");
    let second = Dataset::shared(&other).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second.source(), path.as_path());
}

#[test]
fn test_load_failure_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.csv");
    let cache = DatasetCache::new(&path);

    match cache.get() {
        Err(error @ ImpactError::DataSourceUnavailable { .. }) => {
            assert!(!error.is_recoverable());
            assert!(error.to_string().contains("absent.csv"));
        }
        other => panic!("expected DataSourceUnavailable, got {other:?}"),
    }
}
