use crate::Collector;
use guardian_common::types::MetricSet;
use sysinfo::System;

pub struct LoadCollector;

impl LoadCollector {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LoadCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl Collector for LoadCollector {
    fn name(&self) -> &str {
        "load"
    }

    fn collect(&mut self) -> MetricSet {
        let mut metrics = MetricSet::new();

        // Windows has no load average and reports all zeroes.
        if !cfg!(windows) {
            let load_avg = System::load_average();
            metrics.insert("LoadAverage1".to_string(), load_avg.one);
            metrics.insert("LoadAverage5".to_string(), load_avg.five);
            metrics.insert("LoadAverage15".to_string(), load_avg.fifteen);
        }

        metrics.insert("Uptime".to_string(), System::uptime() as f64);
        metrics
    }
}
