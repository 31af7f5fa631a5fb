//! The panic hook is process-wide, so this lives in its own test binary.

use std::panic;
use std::sync::Mutex;

use log::{Level, LevelFilter, Log, Metadata, Record};

static RECORDS: Mutex<Vec<String>> = Mutex::new(Vec::new());

struct Collect;

impl Log for Collect {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= Level::Error
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            RECORDS.lock().unwrap().push(record.args().to_string());
        }
    }

    fn flush(&self) {}
}

static LOGGER: Collect = Collect;

fn blow_up() -> u8 {
    panic!("handler blew up")
}

#[test]
fn panic_report_goes_to_log() {
    log::set_logger(&LOGGER).unwrap();
    log::set_max_level(LevelFilter::Error);
    minish_terminal::log_panics();

    let outcome = panic::catch_unwind(blow_up);
    assert!(outcome.is_err());

    let _ = panic::take_hook();
    let records = RECORDS.lock().unwrap();
    assert!(
        records.iter().any(|r| r.contains("handler blew up")),
        "{records:?}"
    );
}
