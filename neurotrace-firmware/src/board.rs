//! RP2040 recorder board
//!
//! Pin assignments (board-specific):
//!
//! | Function              | GPIO |
//! |-----------------------|------|
//! | Touch pad             | 2    |
//! | Charger status (low)  | 3    |
//! | Scale switch          | 4    |
//! | LED blue / red / green| 5 / 6 / 7 |
//! | Scale sine (PWM4 A)   | 8    |
//! | Accel. sleep (low)    | 9    |
//! | PGA112 MISO / CS      | 16 / 17 |
//! | PGA112 SCK / MOSI     | 18 / 19 |
//! | Amplifier output (ADC0)| 26  |

use embassy_rp::peripherals::SPI0;
use portable_atomic::Ordering;

use neurotrace_core::traits::{Board, Indication};
use neurotrace_drivers::accelerometer::Mma7341lc;
use neurotrace_drivers::amplifier::Pga112;
use neurotrace_drivers::indicator::RgbIndicator;
use neurotrace_drivers::scale::ScaleSwitch;
use neurotrace_drivers::touch::CapacitiveKey;
use neurotrace_hal::persist::StoredFlag;
use neurotrace_hal::OutputPin;
use neurotrace_hal_rp2040::gpio::RpOutput;
use neurotrace_hal_rp2040::spi::RpSpi;
use neurotrace_hal_rp2040::{AdcSampler, RcPad, RingOscillator, RpWatchdog};

use crate::channels::CHARGER_PRESENT;

pub type Amplifier = Pga112<RpSpi<'static, SPI0>, RpOutput<'static>>;
pub type Leds = RgbIndicator<RpOutput<'static>, RpOutput<'static>, RpOutput<'static>>;

pub struct RpBoard {
    pub amplifier: Amplifier,
    pub touch: CapacitiveKey<RcPad<'static>>,
    pub sampler: AdcSampler<'static>,
    pub oscillator: RingOscillator,
    pub scale_signal: ScaleSwitch<'static>,
    pub accelerometer: Mma7341lc<RpOutput<'static>>,
    /// Watchdog, reachable through the flag's store
    pub fault_flag: StoredFlag<RpWatchdog>,
    pub scale_switch: RpOutput<'static>,
    pub leds: Leds,
}

impl RpBoard {
    /// Advance LED blinking
    pub fn refresh_indicator(&mut self, now_ms: u32) {
        self.leds.refresh(now_ms);
    }
}

impl Board for RpBoard {
    type Amplifier = Amplifier;
    type TouchSensor = CapacitiveKey<RcPad<'static>>;
    type Sampler = AdcSampler<'static>;
    type Oscillator = RingOscillator;
    type ScaleSignal = ScaleSwitch<'static>;
    type Accelerometer = Mma7341lc<RpOutput<'static>>;
    type Watchdog = RpWatchdog;
    type FaultFlag = StoredFlag<RpWatchdog>;

    fn amplifier(&mut self) -> &mut Self::Amplifier {
        &mut self.amplifier
    }

    fn touch_sensor(&mut self) -> &mut Self::TouchSensor {
        &mut self.touch
    }

    fn sampler(&mut self) -> &mut Self::Sampler {
        &mut self.sampler
    }

    fn oscillator(&mut self) -> &mut Self::Oscillator {
        &mut self.oscillator
    }

    fn scale_signal(&mut self) -> &mut Self::ScaleSignal {
        &mut self.scale_signal
    }

    fn accelerometer(&mut self) -> &mut Self::Accelerometer {
        &mut self.accelerometer
    }

    fn watchdog(&mut self) -> &mut Self::Watchdog {
        self.fault_flag.store()
    }

    fn fault_flag(&mut self) -> &mut Self::FaultFlag {
        &mut self.fault_flag
    }

    fn charger_present(&mut self) -> bool {
        CHARGER_PRESENT.load(Ordering::Acquire)
    }

    fn set_scale_switch(&mut self, closed: bool) {
        self.scale_switch.set_state(closed);
    }

    fn indicate(&mut self, indication: Indication, active: bool) {
        self.leds.set(indication, active);
    }
}
