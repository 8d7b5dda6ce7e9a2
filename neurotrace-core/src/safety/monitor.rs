//! Safety monitor implementation
//!
//! Tracks configuration faults and sample ring overruns.

use crate::config::ConfigError;
use crate::state::FaultKind;

/// Safety condition status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SafetyStatus {
    /// All conditions normal
    Ok,
    /// Samples were lost to ring overruns; recording continues
    Degraded { overruns: u32 },
    /// Unrecoverable condition
    Fault(FaultKind),
}

/// Safety monitor for fault detection
#[derive(Debug, Clone, Default)]
pub struct SafetyMonitor {
    /// First fault reported; later ones are ignored
    fault: Option<FaultKind>,
    /// Samples dropped since boot
    overruns: u32,
}

impl SafetyMonitor {
    /// Create a new safety monitor
    pub const fn new() -> Self {
        Self {
            fault: None,
            overruns: 0,
        }
    }

    /// Record the outcome of a configuration check
    pub fn update_config(&mut self, result: Result<(), ConfigError>) {
        if let Err(error) = result {
            self.report_fault(FaultKind::Config(error));
        }
    }

    /// Add samples dropped by the ring since the last report
    pub fn record_overruns(&mut self, count: u32) {
        self.overruns = self.overruns.saturating_add(count);
    }

    /// Latch a fault; the first one wins
    pub fn report_fault(&mut self, kind: FaultKind) {
        if self.fault.is_none() {
            self.fault = Some(kind);
        }
    }

    /// Check all safety conditions
    ///
    /// A latched fault takes precedence over lost samples.
    pub fn check(&self) -> SafetyStatus {
        if let Some(kind) = self.fault {
            return SafetyStatus::Fault(kind);
        }
        if self.overruns > 0 {
            return SafetyStatus::Degraded {
                overruns: self.overruns,
            };
        }
        SafetyStatus::Ok
    }

    pub fn fault(&self) -> Option<FaultKind> {
        self.fault
    }

    /// Samples dropped since boot
    pub fn total_overruns(&self) -> u32 {
        self.overruns
    }
}
