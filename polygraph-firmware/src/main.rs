//! Polygraph - pulse-link demo firmware
//!
//! Drives the toy's single-wire link from an RP2040 board, cycling a
//! canned calibrate/measure/verdict session so the sound/shock board can
//! be exercised without the original main unit.
//!
//! The data line is GPIO15; each `send_packet` busy-waits for the frame
//! duration (about 30 ms worst case), which is fine for a demo loop.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Level, Output};
use embassy_time::Timer;
use {defmt_rtt as _, panic_probe as _};

use polygraph_drivers::transmitter::PacketGenerator;
use polygraph_hal_rp2040::{PulsePin, SystemClock};
use polygraph_protocol::{Command, LED_STRIPE_MAX};

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Polygraph demo firmware starting...");

    let p = embassy_rp::init(Default::default());

    // Data line to the sound/shock board, idle low
    let line = Output::new(p.PIN_15, Level::Low);
    let mut tx = PacketGenerator::new(PulsePin::new(line), SystemClock);
    tx.begin();
    info!("Pulse link ready on GPIO15");

    tx.send_packet(Command::On, false, false, 0).unwrap();
    Timer::after_secs(2).await;

    let mut shock_verdict = false;
    loop {
        info!("calibrating");
        tx.send_packet(Command::Calib, true, false, 0).unwrap();
        Timer::after_millis(1500).await;
        tx.send_packet(Command::CalibFinished, true, true, 0).unwrap();
        Timer::after_millis(500).await;

        info!("measuring");
        for level in 0..=LED_STRIPE_MAX {
            tx.send_packet(Command::Measure, true, true, level).unwrap();
            Timer::after_millis(250).await;
        }

        if shock_verdict {
            info!("verdict: lying");
            tx.send_packet(Command::MeasureFinShock, true, true, LED_STRIPE_MAX)
                .unwrap();
        } else {
            info!("verdict: truthful");
            tx.send_packet(Command::MeasureFinOk, true, true, 0).unwrap();
        }
        shock_verdict = !shock_verdict;

        Timer::after_secs(3).await;
    }
}
