//! Ring oscillator trim
//!
//! The ROSC has eight inverter stages, each with a thermometer-coded drive
//! strength (0 to 3 bits set), and a frequency range select. A trim byte
//! maps onto that as follows:
//!
//! - bit 7 picks the range: `LOW` for 0x00-0x7F, `MEDIUM` for 0x80-0xFF
//! - bits 0-6 spread 0 to 23 drive-strength steps over the stages
//!
//! Frequency rises monotonically with the offset inside each half, which
//! is what the boot calibration relies on.
//!
//! Measurements use the CLOCKS frequency counter with `clk_ref` (the 12 MHz
//! crystal) as reference. One "reference tick" is one crystal cycle and
//! one "loop iteration" is one ROSC cycle, so a calibration for this board
//! uses `reference_hz = 12_000_000` and `loop_cycles = 1`.

use embassy_rp::pac;
use embassy_rp::pac::clocks::vals::Fc0src;
use embassy_rp::pac::rosc::vals::{FreqRange, Passwd};
use neurotrace_core::traits::Oscillator;

/// Crystal (and `clk_ref`) frequency in kHz
pub const REFERENCE_KHZ: u32 = 12_000;

/// Drive-strength steps available across all stages
pub const DRIVE_STEPS: u32 = 24;

const STAGES: usize = 8;

/// Thermometer code for each per-stage drive level
const DRIVE_CODE: [u8; 4] = [0b000, 0b001, 0b011, 0b111];

/// Drive-strength field for each stage at the given 7-bit offset
pub fn drive_strengths(offset: u8) -> [u8; STAGES] {
    let steps = u32::from(offset & 0x7F) * DRIVE_STEPS / 128;
    let base = steps / STAGES as u32;
    let extra = (steps % STAGES as u32) as usize;

    let mut fields = [0u8; STAGES];
    for (stage, field) in fields.iter_mut().enumerate() {
        let level = base as usize + usize::from(stage < extra);
        *field = DRIVE_CODE[level];
    }
    fields
}

/// RP2040 ring oscillator
pub struct RingOscillator {
    settle_cycles: u32,
}

impl RingOscillator {
    /// Take control of the ROSC trim
    ///
    /// `settle_cycles` is the CPU busy-wait after each trim change.
    pub fn new(settle_cycles: u32) -> Self {
        Self { settle_cycles }
    }

    /// Measure the ROSC with the frequency counter
    pub fn measure_khz(&mut self) -> u32 {
        let clocks = pac::CLOCKS;
        while clocks.fc0_status().read().running() {}

        clocks.fc0_ref_khz().write(|w| w.set_fc0_ref_khz(REFERENCE_KHZ));
        clocks.fc0_interval().write(|w| w.set_fc0_interval(10));
        clocks.fc0_min_khz().write(|w| w.set_fc0_min_khz(0));
        clocks.fc0_max_khz().write(|w| w.set_fc0_max_khz(0x1FF_FFFF));
        clocks.fc0_src().write(|w| w.set_fc0_src(Fc0src::ROSC_CLKSRC));

        while !clocks.fc0_status().read().done() {}
        clocks.fc0_result().read().khz()
    }
}

impl Oscillator for RingOscillator {
    fn set_trim(&mut self, trim: u8) {
        let ds = drive_strengths(trim);
        let rosc = pac::ROSC;

        rosc.freqa().write(|w| {
            w.set_passwd(Passwd::PASS);
            w.set_ds0(ds[0]);
            w.set_ds1(ds[1]);
            w.set_ds2(ds[2]);
            w.set_ds3(ds[3]);
        });
        rosc.freqb().write(|w| {
            w.set_passwd(Passwd::PASS);
            w.set_ds4(ds[4]);
            w.set_ds5(ds[5]);
            w.set_ds6(ds[6]);
            w.set_ds7(ds[7]);
        });
        rosc.ctrl().modify(|w| {
            w.set_freq_range(if trim & 0x80 != 0 {
                FreqRange::MEDIUM
            } else {
                FreqRange::LOW
            });
        });

        cortex_m::asm::delay(self.settle_cycles);
    }

    fn count_reference_window(&mut self, reference_ticks: u16) -> u32 {
        self.measure_khz() * u32::from(reference_ticks) / REFERENCE_KHZ
    }

    fn finish(&mut self) {
        #[cfg(feature = "defmt")]
        {
            let khz = self.measure_khz();
            defmt::info!("ROSC settled at {} kHz", khz);
        }
    }
}
