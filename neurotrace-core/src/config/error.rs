//! Configuration errors
//!
//! Any of these found at boot or on mode entry latches the recorder in
//! its fault state.

/// Invalid configuration value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Hold window minimum is zero ticks
    EmptyHoldWindow,
    /// Hold window maximum is not above its minimum
    HoldWindowOrder,
    /// Hold window does not fit the tick counter
    HoldWindowTooLong,
    /// Touch tick period is zero
    ZeroTickPeriod,
    /// Lower threshold is not below the upper threshold for a stage
    ThresholdOrder { stage: u8 },
    /// Gain window shorter than two samples
    WindowTooShort,
    /// Gain stage outside the ladder
    InvalidStage,
    /// Mode duration or sample rate is zero
    ZeroDuration,
    /// Calibration reference parameters are zero or overflow the counter
    ZeroReference,
    /// Simple calibration rounds are zero or above the limit
    SimpleRounds,
    /// Watchdog timeout does not cover the loop wake-up period
    WatchdogTooShort,
}
