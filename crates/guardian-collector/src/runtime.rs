use crate::cpu::CpuCollector;
use crate::load::LoadCollector;
use crate::memory::MemoryCollector;
use crate::process::ProcessCollector;
use crate::Collector;
use guardian_common::types::MetricSet;

/// Merges several collectors into one.
///
/// Collectors run in registration order; a later collector overwrites a key
/// produced by an earlier one.
pub struct RuntimeCollector {
    collectors: Vec<Box<dyn Collector>>,
}

impl RuntimeCollector {
    pub fn new(collectors: Vec<Box<dyn Collector>>) -> Self {
        Self { collectors }
    }

    /// Host memory, CPU, load and own-process collectors.
    pub fn system() -> Self {
        Self::new(vec![
            Box::new(MemoryCollector::new()),
            Box::new(CpuCollector::new()),
            Box::new(LoadCollector::new()),
            Box::new(ProcessCollector::new()),
        ])
    }
}

impl Collector for RuntimeCollector {
    fn name(&self) -> &str {
        "runtime"
    }

    fn collect(&mut self) -> MetricSet {
        let mut metrics = MetricSet::new();
        for collector in &mut self.collectors {
            let sample = collector.collect();
            tracing::trace!(collector = collector.name(), count = sample.len(), "Collected");
            metrics.extend(sample);
        }
        metrics
    }
}
