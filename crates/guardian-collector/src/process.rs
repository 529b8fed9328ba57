use crate::Collector;
use guardian_common::types::MetricSet;
use sysinfo::{Pid, ProcessesToUpdate, System};

/// Resource usage of the agent's own process.
pub struct ProcessCollector {
    system: System,
    pid: Pid,
}

impl ProcessCollector {
    pub fn new() -> Self {
        Self {
            system: System::new(),
            pid: Pid::from_u32(std::process::id()),
        }
    }
}

impl Default for ProcessCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl Collector for ProcessCollector {
    fn name(&self) -> &str {
        "process"
    }

    fn collect(&mut self) -> MetricSet {
        self.system
            .refresh_processes(ProcessesToUpdate::Some(&[self.pid]), true);
        let mut metrics = MetricSet::new();

        let Some(process) = self.system.process(self.pid) else {
            tracing::debug!(pid = %self.pid, "Own process not visible, skipping");
            return metrics;
        };

        metrics.insert(
            "ProcessResidentMemory".to_string(),
            process.memory() as f64,
        );
        metrics.insert(
            "ProcessVirtualMemory".to_string(),
            process.virtual_memory() as f64,
        );
        metrics.insert(
            "ProcessCpuUsage".to_string(),
            f64::from(process.cpu_usage()),
        );

        metrics
    }
}
