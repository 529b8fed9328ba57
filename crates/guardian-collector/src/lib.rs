//! Runtime measurement collection for the guardian agent.
//!
//! Each [`Collector`] samples one category of host or process state and
//! returns it as a [`MetricSet`]. The agent scheduler only ever sees a single
//! collector; [`runtime::RuntimeCollector`] composes the categories into one.

pub mod cpu;
pub mod load;
pub mod memory;
pub mod process;
pub mod runtime;

use guardian_common::types::MetricSet;

pub use runtime::RuntimeCollector;

/// A source of runtime measurements sampled on every poll tick.
///
/// Collection never fails: a measurement the platform cannot provide is left
/// out of the returned set. Every call returns a fresh set.
pub trait Collector: Send {
    /// Returns the collector name (e.g., `"cpu"`), used for logging.
    fn name(&self) -> &str;

    /// Samples the current values.
    fn collect(&mut self) -> MetricSet;
}
