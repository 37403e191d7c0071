//! LEDC channel as an `embedded-hal` PWM output.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: writes the duty register via `hw_init::ledc_set`.
//! On host/test: records the last duty in a static `AtomicU16` that the
//! simulator and tests can read back, and can be told to fail writes.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicBool, AtomicU16, Ordering};

use embedded_hal::pwm::{self, ErrorKind, ErrorType, SetDutyCycle};

use crate::drivers::hw_init;

#[cfg(not(target_os = "espidf"))]
static SIM_LEDC_DUTY: AtomicU16 = AtomicU16::new(0);
#[cfg(not(target_os = "espidf"))]
static SIM_LEDC_FAIL: AtomicBool = AtomicBool::new(false);

/// Last duty written on the host, in ticks.
#[cfg(not(target_os = "espidf"))]
pub fn sim_ledc_duty() -> u16 {
    SIM_LEDC_DUTY.load(Ordering::Relaxed)
}

/// Make every subsequent host-side duty write fail (or succeed again).
#[cfg(not(target_os = "espidf"))]
pub fn sim_fail_ledc_writes(fail: bool) {
    SIM_LEDC_FAIL.store(fail, Ordering::Relaxed);
}

/// ESP-IDF error code from a rejected duty write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedcError(pub i32);

impl pwm::Error for LedcError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

impl core::fmt::Display for LedcError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "LEDC duty write failed (rc={})", self.0)
    }
}

/// One LEDC channel, already configured by [`hw_init::init_peripherals`].
pub struct LedcChannel {
    channel: u32,
    max_duty: u16,
}

impl LedcChannel {
    /// `resolution_bits` must match the timer the channel is bound to.
    pub fn new(channel: u32, resolution_bits: u32) -> Self {
        let max_duty = ((1u32 << resolution_bits.min(16)) - 1) as u16;
        Self { channel, max_duty }
    }
}

impl ErrorType for LedcChannel {
    type Error = LedcError;
}

impl SetDutyCycle for LedcChannel {
    fn max_duty_cycle(&self) -> u16 {
        self.max_duty
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        #[cfg(not(target_os = "espidf"))]
        if SIM_LEDC_FAIL.load(Ordering::Relaxed) {
            return Err(LedcError(-1));
        }
        hw_init::ledc_set(self.channel, u32::from(duty)).map_err(LedcError)?;
        #[cfg(not(target_os = "espidf"))]
        SIM_LEDC_DUTY.store(duty, Ordering::Relaxed);
        Ok(())
    }
}
