//! Actuator drivers, hardware initialisation, and thread helpers.

pub mod hw_init;
pub mod led;
pub mod ledc;
pub mod task_pin;
