//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use horizon_loglist::{FilterableByString, LogItem, Record, RecordNumber, Renderer};
use horizon_loglist_core::Signal;

/// A log line: timestamp, source and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub time: u64,
    pub source: &'static str,
    pub message: String,
}

impl Line {
    pub fn new(time: u64, source: &'static str, message: impl Into<String>) -> Self {
        Self {
            time,
            source,
            message: message.into(),
        }
    }

    /// A line whose message is its time.
    pub fn at(time: u64) -> Self {
        Self::new(time, "test", format!("line {time}"))
    }
}

impl LogItem for Line {
    type Time = u64;

    fn time(&self) -> u64 {
        self.time
    }
}

impl FilterableByString for Line {
    fn filter_string(&self) -> Cow<'_, str> {
        Cow::Owned(format!("{} {}", self.source, self.message))
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] {}", self.time, self.source, self.message)
    }
}

/// Route trace output to the test harness. `RUST_LOG` narrows it.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("horizon_loglist=debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Collect every value emitted on `signal`.
pub fn recorder<A: Clone + Send + 'static>(signal: &Signal<A>) -> Arc<Mutex<Vec<A>>> {
    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = received.clone();
    signal.connect(move |value: &A| sink.lock().push(value.clone()));
    received
}

pub fn numbers<T>(records: &[Record<T>]) -> Vec<u64> {
    records.iter().map(|r| r.number().as_u64()).collect()
}

/// A renderer that simulates containers as a map from record to row.
///
/// After a plan is applied, `rows()` lists the records that remain on
/// screen, ordered by row.
#[derive(Default)]
pub struct RowModel {
    pub rows: Vec<(RecordNumber, isize)>,
    pub created: usize,
    pub animated: usize,
}

impl RowModel {
    pub fn shown(&self) -> Vec<u64> {
        let mut rows = self.rows.clone();
        rows.sort_by_key(|&(_, row)| row);
        rows.into_iter().map(|(n, _)| n.as_u64()).collect()
    }

    fn row_mut(&mut self, number: RecordNumber) -> Option<&mut isize> {
        self.rows.iter_mut().find(|(n, _)| *n == number).map(|(_, row)| row)
    }

    fn remove(&mut self, number: RecordNumber) {
        self.rows.retain(|(n, _)| *n != number);
    }
}

impl<T> Renderer<T> for RowModel {
    fn create(&mut self, record: &Record<T>, row: isize) {
        assert!(self.row_mut(record.number()).is_none(), "container created twice");
        self.rows.push((record.number(), row));
        self.created += 1;
    }

    fn move_to(&mut self, record: &Record<T>, _from: isize, to: isize, remove_after: bool, animate: bool) {
        if animate {
            self.animated += 1;
        }
        if remove_after {
            self.remove(record.number());
        } else if let Some(row) = self.row_mut(record.number()) {
            *row = to;
        } else {
            panic!("moved a record without a container");
        }
    }

    fn fade_in(&mut self, record: &Record<T>, _animate: bool) {
        assert!(self.row_mut(record.number()).is_some(), "faded in a record without a container");
    }

    fn fade_out(&mut self, record: &Record<T>, _animate: bool) {
        self.remove(record.number());
    }
}
