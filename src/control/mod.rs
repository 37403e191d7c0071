//! Signal conditioning between the ADC and the PWM output.
//!
//! Pure, allocation-free arithmetic: the filter's rolling [`History`],
//! the two-pass [`trimmed_mean`], and the linear [`DriveCommand`] mapping.
//! The pipeline stages in [`crate::app`] own instances of these and do the
//! I/O around them.

pub mod duty;
pub mod history;
pub mod trimmed_mean;

pub use duty::DriveCommand;
pub use history::History;
pub use trimmed_mean::{TrimmedMean, trimmed_mean};

/// One ADC reading in `[0, adc_max]`.
pub type RawSample = u16;
