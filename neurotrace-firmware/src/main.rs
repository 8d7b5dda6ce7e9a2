//! NeuroTrace - Wearable Bio-Signal Recorder Firmware
//!
//! Main firmware binary for RP2040-based recorder boards. A capacitive
//! key starts and stops recording, the amplifier gain follows the signal
//! amplitude, and plugging in a charger mid-session resets the recorder
//! into charging mode.
//!
//! Boot runs to completion before any clock task is spawned, so the
//! oscillator calibration never competes with the sample clock.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{self, Adc, Channel};
use embassy_rp::gpio::{Level, Pull};
use embassy_rp::spi::Spi;
use portable_atomic::Ordering;
use {defmt_rtt as _, panic_probe as _};

use neurotrace_core::recorder::Recorder;
use neurotrace_drivers::accelerometer::Mma7341lc;
use neurotrace_drivers::amplifier::Pga112;
use neurotrace_drivers::indicator::RgbIndicator;
use neurotrace_drivers::scale::{ScaleSwitch, SineScale};
use neurotrace_drivers::touch::{CapacitiveKey, KeyConfig};
use neurotrace_hal::gpio::ActiveLevel;
use neurotrace_hal::persist::StoredFlag;
use neurotrace_hal::spi::SpiConfig;
use neurotrace_hal::PersistKey;
use neurotrace_hal_rp2040::{gpio, spi, AdcSampler, RcPad, RingOscillator, RpPwm, RpWatchdog};

mod board;
mod channels;
mod config;
mod tasks;

use crate::board::RpBoard;
use crate::channels::{CHARGER_PRESENT, SHARED};

/// Charge/discharge cycles averaged per touch acquisition
const PAD_BURSTS: u8 = 8;

/// Poll limit per discharge
const PAD_LIMIT: u16 = 2_000;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("NeuroTrace firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = config::recorder_config();
    let tick_ms = config.timing.tick_ms;
    let sample_rate_hz = config.timing.sample_rate_hz;

    // PGA112 on SPI0
    let bus = Spi::new_blocking(
        p.SPI0,
        p.PIN_18,
        p.PIN_19,
        p.PIN_16,
        spi::config(&SpiConfig::default()),
    );
    let amplifier = Pga112::new(spi::bus(bus), gpio::output(p.PIN_17, Level::High));
    info!("Amplifier SPI initialized");

    // Amplifier output on ADC0
    let adc = Adc::new_blocking(p.ADC, adc::Config::default());
    let electrode = Channel::new_pin(p.PIN_26, Pull::None);
    let sampler = AdcSampler::new(adc, electrode, &SHARED);

    let touch = CapacitiveKey::new(
        RcPad::new(p.PIN_2, PAD_BURSTS, PAD_LIMIT),
        KeyConfig::default(),
    );

    // Charger status is open-drain, active low
    let charger = ActiveLevel::active_low(gpio::input(p.PIN_3, Pull::Up));
    CHARGER_PRESENT.store(charger.is_asserted(), Ordering::Release);

    // Filtered PWM feeds the scale switch
    let scale = SineScale::new(RpPwm::channel_a(p.PWM_SLICE4, p.PIN_8));

    // Sleep pin is active low; the sensor starts asleep
    let accelerometer = Mma7341lc::new(gpio::output(p.PIN_9, Level::Low));

    let leds = RgbIndicator::new(
        gpio::output(p.PIN_6, Level::High),
        gpio::output(p.PIN_7, Level::High),
        gpio::output(p.PIN_5, Level::High),
        true,
    );

    let board = RpBoard {
        amplifier,
        touch,
        sampler,
        oscillator: RingOscillator::new(config::ROSC_SETTLE_CYCLES),
        scale_signal: ScaleSwitch::new(&SHARED),
        accelerometer,
        fault_flag: StoredFlag::new(RpWatchdog::new(p.WATCHDOG), PersistKey::ChargerReset),
        scale_switch: gpio::output(p.PIN_4, Level::Low),
        leds,
    };

    let mut recorder = Recorder::new(board, &SHARED, config);
    let report = recorder.boot();
    info!(
        "Boot complete: reset={:?}, charger_reset={}, mode={:?}",
        report.reset_cause, report.charger_reset, report.mode
    );
    match report.calibration {
        Some(outcome) => info!(
            "Oscillator trim {=u8:#x} (off by {}, {} measurements)",
            outcome.trim, outcome.difference, outcome.measurements
        ),
        None => error!("Configuration rejected: {:?}", recorder.safety().fault()),
    }

    let amplifier = &mut recorder.board_mut().amplifier;
    match amplifier.read_configuration() {
        Ok((channel, gain)) if (channel, gain) == (amplifier.channel(), amplifier.gain()) => {
            info!("Amplifier at {:?} on {:?}", gain, channel)
        }
        Ok((channel, gain)) => warn!(
            "Amplifier reads back {:?} on {:?}, expected {:?} on {:?}",
            gain,
            channel,
            amplifier.gain(),
            amplifier.channel()
        ),
        Err(e) => warn!("Amplifier readback failed: {:?}", e),
    }

    spawner.spawn(tasks::touch_tick_task(charger, tick_ms)).unwrap();
    spawner
        .spawn(tasks::sample_clock_task(sample_rate_hz))
        .unwrap();
    spawner.spawn(tasks::scale_signal_task(scale)).unwrap();
    spawner.spawn(tasks::recorder_task(recorder)).unwrap();

    info!("All tasks spawned, recorder running");
}
