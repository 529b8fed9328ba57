use crate::Collector;
use guardian_common::types::MetricSet;
use sysinfo::System;

/// Global and per-core CPU utilization in percent.
///
/// Usage is computed between two refreshes, so the first sample after
/// construction is primed in [`CpuCollector::new`].
pub struct CpuCollector {
    system: System,
}

impl CpuCollector {
    pub fn new() -> Self {
        let mut system = System::new();
        system.refresh_cpu_all();
        Self { system }
    }
}

impl Default for CpuCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl Collector for CpuCollector {
    fn name(&self) -> &str {
        "cpu"
    }

    fn collect(&mut self) -> MetricSet {
        self.system.refresh_cpu_all();
        let mut metrics = MetricSet::new();

        let cpus = self.system.cpus();
        if cpus.is_empty() {
            return metrics;
        }

        metrics.insert(
            "CPUutilization".to_string(),
            f64::from(self.system.global_cpu_usage()),
        );
        for (i, cpu) in cpus.iter().enumerate() {
            metrics.insert(
                format!("CPUutilization{}", i + 1),
                f64::from(cpu.cpu_usage()),
            );
        }

        metrics
    }
}
