//! Potentiometer position sensor.
//!
//! Reads the wiper voltage through an ESP32-S3 ADC1 channel at the native
//! 12-bit width and scales it down to the 10-bit sample domain by dropping
//! the two least significant bits.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads ADC1 via the oneshot API (initialised by hw_init).
//! On host/test: reads from a static `AtomicU16` for injection, with an
//! injectable error code for fault testing.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicI32, AtomicU16, Ordering};

use crate::control::RawSample;
use crate::drivers::hw_init;
use crate::error::SensorError;
use crate::pins;

#[cfg(not(target_os = "espidf"))]
static SIM_POT_ADC: AtomicU16 = AtomicU16::new(0);
/// Non-zero = the next reads fail with this code.
#[cfg(not(target_os = "espidf"))]
static SIM_POT_FAULT: AtomicI32 = AtomicI32::new(0);

/// Inject the 12-bit reading the host "converter" returns.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_pot_adc(raw: u16) {
    SIM_POT_ADC.store(raw, Ordering::Relaxed);
}

/// Inject (or clear, with `None`) a conversion failure.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_pot_fault(rc: Option<i32>) {
    SIM_POT_FAULT.store(rc.unwrap_or(0), Ordering::Relaxed);
}

pub struct Potentiometer {
    channel: u32,
    shift: u32,
    total_reads: u32,
}

impl Potentiometer {
    pub fn new(channel: u32) -> Self {
        Self {
            channel,
            shift: pins::POT_ADC_BITS.saturating_sub(pins::SAMPLE_BITS),
            total_reads: 0,
        }
    }

    /// One conversion, scaled to the 10-bit domain.
    pub fn read(&mut self) -> Result<RawSample, SensorError> {
        self.total_reads = self.total_reads.saturating_add(1);
        let raw = self.read_adc()?;
        Ok(raw >> self.shift)
    }

    pub fn total_reads(&self) -> u32 {
        self.total_reads
    }

    #[cfg(target_os = "espidf")]
    fn read_adc(&self) -> Result<u16, SensorError> {
        hw_init::adc1_read(self.channel).map_err(adc_error)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_adc(&self) -> Result<u16, SensorError> {
        let _ = self.channel;
        match SIM_POT_FAULT.load(Ordering::Relaxed) {
            0 => Ok(SIM_POT_ADC.load(Ordering::Relaxed)),
            rc => Err(adc_error(rc)),
        }
    }
}

fn adc_error(rc: i32) -> SensorError {
    match rc {
        hw_init::RC_INVALID_STATE => SensorError::NotInitialised,
        rc => SensorError::AdcReadFailed(rc),
    }
}
