use std::time::Duration;

/// Metrics reported by a module through [`Module::metrics`](crate::Module::metrics).
///
/// The schema is fixed so observers can aggregate across modules; fields a module
/// does not track stay at their defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModuleMetrics {
    /// Operations handled since the module was initialized.
    pub operations_total: u64,
    /// Operations that failed.
    pub errors_total: u64,
    /// Operations currently in progress.
    pub in_flight: u64,
    /// Mean operation latency, if measured.
    pub average_latency: Option<Duration>,
    /// Resident memory attributed to the module, if known.
    pub memory_bytes: Option<u64>,
}

impl ModuleMetrics {
    /// Error ratio in `[0.0, 1.0]`; `0.0` when nothing was handled yet.
    pub fn error_rate(&self) -> f64 {
        if self.operations_total == 0 {
            return 0.0;
        }
        self.errors_total as f64 / self.operations_total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_rate_handles_idle_module() {
        assert_eq!(ModuleMetrics::default().error_rate(), 0.0);

        let m = ModuleMetrics {
            operations_total: 8,
            errors_total: 2,
            ..ModuleMetrics::default()
        };
        assert_eq!(m.error_rate(), 0.25);
    }
}
