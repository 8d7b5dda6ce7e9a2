//! Trim search
//!
//! The oscillator is measured by counting loop iterations while an external
//! reference clock advances a fixed number of ticks. A binary search over a
//! 7-bit trim range gets close; a short neighbour search then checks the
//! values next to the final binary result. The best trim seen in any
//! measurement is committed.
//!
//! With a split trim register the binary strategies search the second range
//! too, unless the first one hit the target exactly. The simple strategy
//! only ever walks the first range.

use crate::config::{CalibrationConfig, CalibrationStrategy, ConfigError, TrimLayout};
use crate::traits::Oscillator;

/// Trim values per range (7-bit)
pub const RANGE_SIZE: u8 = 128;

/// First binary search step, a quarter of the range
pub const INITIAL_STEP: u8 = RANGE_SIZE / 4;

/// Neighbours measured after the binary search
pub const MAX_NEIGHBORS: u8 = 3;

/// Worst-case measurements per range for the binary strategies
pub const MAX_MEASUREMENTS_PER_RANGE: u32 = 7 + MAX_NEIGHBORS as u32;

/// One contiguous trim range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TrimRange {
    base: u8,
}

impl TrimRange {
    pub const LOW: TrimRange = TrimRange { base: 0x00 };
    pub const HIGH: TrimRange = TrimRange { base: 0x80 };

    /// Search start (0x40 or 0xC0)
    pub const fn midpoint(&self) -> u8 {
        self.base + RANGE_SIZE / 2
    }

    pub const fn first(&self) -> u8 {
        self.base
    }

    pub const fn last(&self) -> u8 {
        self.base + (RANGE_SIZE - 1)
    }

    pub const fn contains(&self, trim: u8) -> bool {
        trim >= self.first() && trim <= self.last()
    }

    /// Move `trim` by `step` in `direction`, staying inside the range
    fn offset(&self, trim: u8, direction: i8, step: u8) -> u8 {
        let moved = i16::from(trim) + i16::from(direction) * i16::from(step);
        moved.clamp(i16::from(self.first()), i16::from(self.last())) as u8
    }

    /// Move `trim` by one in `direction`, or `None` at the range edge
    fn neighbor(&self, trim: u8, direction: i8) -> Option<u8> {
        let moved = i16::from(trim) + i16::from(direction);
        u8::try_from(moved).ok().filter(|t| self.contains(*t))
    }
}

impl TrimLayout {
    /// Ranges in search order
    pub fn ranges(self) -> &'static [TrimRange] {
        match self {
            TrimLayout::Single => &[TrimRange::LOW],
            TrimLayout::Split => &[TrimRange::LOW, TrimRange::HIGH],
        }
    }
}

/// Search phase within one range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SearchPhase {
    BinarySearch,
    NeighborSearch,
    Done,
}

/// Committed calibration result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationOutcome {
    /// Trim written to the oscillator
    pub trim: u8,
    /// |measured - target| at that trim
    pub difference: u32,
    /// Total measurements over all ranges
    pub measurements: u32,
}

/// Search state for one range
#[derive(Debug)]
struct CalibrationState {
    target: u32,
    range: TrimRange,
    trim: u8,
    step: u8,
    best_trim: u8,
    best_difference: u32,
    direction: i8,
    phase: SearchPhase,
    neighbors: u8,
    measurements: u32,
}

impl CalibrationState {
    fn new(target: u32, range: TrimRange) -> Self {
        Self {
            target,
            range,
            trim: range.midpoint(),
            step: INITIAL_STEP,
            best_trim: range.midpoint(),
            best_difference: u32::MAX,
            direction: 0,
            phase: SearchPhase::BinarySearch,
            neighbors: 0,
            measurements: 0,
        }
    }

    /// Account for a measurement at the current trim
    fn record(&mut self, count: u32) -> u32 {
        self.measurements = self.measurements.saturating_add(1);
        let difference = count.abs_diff(self.target);
        if difference < self.best_difference {
            self.best_difference = difference;
            self.best_trim = self.trim;
        }
        difference
    }

    fn direction_towards_target(&self, count: u32) -> i8 {
        if count > self.target {
            -1
        } else {
            1
        }
    }

    fn binary_step(&mut self, count: u32, with_neighbors: bool) {
        let difference = self.record(count);

        match self.phase {
            SearchPhase::BinarySearch => {
                if difference == 0 {
                    self.phase = SearchPhase::Done;
                } else if self.step > 0 {
                    self.direction = self.direction_towards_target(count);
                    self.trim = self.range.offset(self.trim, self.direction, self.step);
                    self.step >>= 1;
                } else if with_neighbors {
                    // Final binary trim measured; walk on in the last direction
                    self.phase = SearchPhase::NeighborSearch;
                    self.advance_neighbor();
                } else {
                    self.phase = SearchPhase::Done;
                }
            }
            SearchPhase::NeighborSearch => {
                self.neighbors += 1;
                if difference == 0 || self.neighbors >= MAX_NEIGHBORS {
                    self.phase = SearchPhase::Done;
                } else {
                    self.advance_neighbor();
                }
            }
            SearchPhase::Done => {}
        }
    }

    fn simple_step(&mut self, count: u32, rounds: u16) {
        let difference = self.record(count);
        if difference == 0 || self.measurements >= u32::from(rounds) {
            self.phase = SearchPhase::Done;
            return;
        }
        self.direction = self.direction_towards_target(count);
        match self.range.neighbor(self.trim, self.direction) {
            Some(trim) => self.trim = trim,
            None => self.phase = SearchPhase::Done,
        }
    }

    fn advance_neighbor(&mut self) {
        match self.range.neighbor(self.trim, self.direction) {
            Some(trim) => self.trim = trim,
            None => self.phase = SearchPhase::Done,
        }
    }
}

/// Oscillator calibrator
#[derive(Debug, Clone)]
pub struct OscillatorCalibrator {
    config: CalibrationConfig,
    target: u32,
}

impl OscillatorCalibrator {
    pub fn new(config: CalibrationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let target = config.target_count()?;
        Ok(Self { config, target })
    }

    /// Loop count of a perfectly trimmed oscillator
    pub fn target_count(&self) -> u32 {
        self.target
    }

    /// Trim ranges this calibrator searches, in order
    pub fn ranges(&self) -> &'static [TrimRange] {
        match self.config.strategy {
            CalibrationStrategy::Simple => &[TrimRange::LOW],
            _ => self.config.layout.ranges(),
        }
    }

    /// Search the ranges, commit the best trim and release the reference
    pub fn run<O: Oscillator>(&self, osc: &mut O) -> CalibrationOutcome {
        let mut best: Option<CalibrationOutcome> = None;
        let mut measurements = 0u32;

        for range in self.ranges() {
            let state = self.search(osc, *range);
            measurements = measurements.saturating_add(state.measurements);

            // Ties keep the earlier range
            let improves = best.map_or(true, |b| state.best_difference < b.difference);
            if improves {
                best = Some(CalibrationOutcome {
                    trim: state.best_trim,
                    difference: state.best_difference,
                    measurements: 0,
                });
            }
            if state.best_difference == 0 {
                break;
            }
        }

        let mut outcome = best.unwrap_or(CalibrationOutcome {
            trim: TrimRange::LOW.midpoint(),
            difference: u32::MAX,
            measurements: 0,
        });
        outcome.measurements = measurements;

        osc.set_trim(outcome.trim);
        osc.finish();
        outcome
    }

    fn search<O: Oscillator>(&self, osc: &mut O, range: TrimRange) -> CalibrationState {
        let mut state = CalibrationState::new(self.target, range);

        while state.phase != SearchPhase::Done {
            osc.set_trim(state.trim);
            let count = osc.count_reference_window(self.config.reference_ticks);
            match self.config.strategy {
                CalibrationStrategy::Simple => state.simple_step(count, self.config.simple_rounds),
                CalibrationStrategy::BinarySearch => state.binary_step(count, false),
                CalibrationStrategy::BinaryWithNeighbors => state.binary_step(count, true),
            }
        }
        state
    }
}
