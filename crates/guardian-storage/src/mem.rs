use crate::{Result, Storage, StorageError};
use guardian_common::types::{Metric, MetricValue};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Gauges and counters live in separate namespaces: the same name may hold
/// one of each.
#[derive(Default)]
struct Tables {
    gauges: HashMap<String, f64>,
    counters: HashMap<String, i64>,
}

/// In-memory [`Storage`] guarded by a single reader/writer lock over both
/// tables.
#[derive(Default)]
pub struct MemStorage {
    tables: RwLock<Tables>,
}

impl MemStorage {
    pub fn new() -> Self {
        Self::default()
    }

    // Every mutation is one map operation, so a poisoned lock never hides a
    // half-applied update.
    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Storage for MemStorage {
    fn update_metric(&self, metric: Metric) -> Result<Metric> {
        if metric.name.is_empty() {
            return Err(StorageError::EmptyName);
        }

        let mut tables = self.write();
        match metric.value {
            MetricValue::Gauge(value) => {
                tables.gauges.insert(metric.name.clone(), value);
                Ok(metric)
            }
            MetricValue::Counter(delta) => {
                let current = tables.counters.get(&metric.name).copied().unwrap_or(0);
                let total = current
                    .checked_add(delta)
                    .ok_or_else(|| StorageError::CounterOverflow {
                        name: metric.name.clone(),
                    })?;
                tables.counters.insert(metric.name.clone(), total);
                Ok(Metric::counter(metric.name, total))
            }
        }
    }

    fn get_gauge(&self, name: &str) -> Option<f64> {
        self.read().gauges.get(name).copied()
    }

    fn get_counter(&self, name: &str) -> Option<i64> {
        self.read().counters.get(name).copied()
    }

    fn get_all(&self) -> Vec<Metric> {
        let tables = self.read();
        let gauges = tables
            .gauges
            .iter()
            .map(|(name, value)| Metric::gauge(name.clone(), *value));
        let counters = tables
            .counters
            .iter()
            .map(|(name, total)| Metric::counter(name.clone(), *total));
        gauges.chain(counters).collect()
    }
}
