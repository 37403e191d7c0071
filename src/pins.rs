//! GPIO / peripheral pin assignments for the dimmer board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Potentiometer (ADC1)
// ---------------------------------------------------------------------------

/// Potentiometer wiper, 0 – 3.1 V through the 12 dB attenuator.
/// ADC1 channel 4 (GPIO 5 on ESP32-S3).
pub const POT_ADC_GPIO: i32 = 5;
/// ADC1 channel number for [`POT_ADC_GPIO`].
pub const POT_ADC1_CHANNEL: u32 = 4;
/// Native converter width.  Readings are scaled down to [`SAMPLE_BITS`].
pub const POT_ADC_BITS: u32 = 12;
/// Width of the raw samples fed into the pipeline (0 – 1023).
pub const SAMPLE_BITS: u32 = 10;

// ---------------------------------------------------------------------------
// LED (LEDC PWM)
// ---------------------------------------------------------------------------

/// Dimmed LED, active high through a current-limiting resistor.
pub const LED_PWM_GPIO: i32 = 2;
/// LEDC channel driving [`LED_PWM_GPIO`].
pub const LED_LEDC_CHANNEL: u32 = 0;
/// 1 kHz → 1000 µs period.
pub const LED_PWM_FREQ_HZ: u32 = 1_000;
/// 10-bit duty: one duty step per raw sample step.
pub const LED_PWM_RESOLUTION_BITS: u32 = 10;
