//! Server-side metric store.
//!
//! The default implementation ([`mem::MemStorage`]) keeps the latest gauge
//! values and running counter sums in memory for the lifetime of the process.

pub mod error;
pub mod mem;


use guardian_common::types::Metric;

pub use error::{Result, StorageError};
pub use mem::MemStorage;

/// Authoritative metric table shared by every request handler.
///
/// Implementations must be safe to share across threads (`Send + Sync`)
/// because every inbound HTTP request may read or write concurrently.
pub trait Storage: Send + Sync {
    /// Applies one update. Gauges overwrite the stored value; counters add
    /// their delta to the running sum. Returns the metric as stored after the
    /// update. On error the table is unchanged.
    fn update_metric(&self, metric: Metric) -> Result<Metric>;

    /// Latest value of the gauge `name`, if it was ever written.
    fn get_gauge(&self, name: &str) -> Option<f64>;

    /// Running sum of the counter `name`, if it was ever written.
    fn get_counter(&self, name: &str) -> Option<i64>;

    /// Every stored gauge and counter. Order is unspecified.
    fn get_all(&self) -> Vec<Metric>;
}
