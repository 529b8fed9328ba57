use crate::Collector;
use guardian_common::types::MetricSet;
use sysinfo::System;

pub struct MemoryCollector {
    system: System,
}

impl MemoryCollector {
    pub fn new() -> Self {
        Self {
            system: System::new(),
        }
    }
}

impl Default for MemoryCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl Collector for MemoryCollector {
    fn name(&self) -> &str {
        "memory"
    }

    fn collect(&mut self) -> MetricSet {
        self.system.refresh_memory();
        let mut metrics = MetricSet::new();

        let total = self.system.total_memory();
        if total == 0 {
            // Platform reported nothing usable.
            return metrics;
        }
        metrics.insert("TotalMemory".to_string(), total as f64);
        metrics.insert("FreeMemory".to_string(), self.system.free_memory() as f64);
        metrics.insert(
            "AvailableMemory".to_string(),
            self.system.available_memory() as f64,
        );
        metrics.insert("UsedMemory".to_string(), self.system.used_memory() as f64);

        // Swap
        metrics.insert("TotalSwap".to_string(), self.system.total_swap() as f64);
        metrics.insert("UsedSwap".to_string(), self.system.used_swap() as f64);

        metrics
    }
}
