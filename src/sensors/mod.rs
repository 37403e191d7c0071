//! Sensor drivers.

pub mod potentiometer;

pub use potentiometer::Potentiometer;
