//! Adapters — concrete implementations of the pipeline port traits.
//!
//! | Adapter    | Implements   | Connects to                    |
//! |------------|--------------|--------------------------------|
//! | `hardware` | SensorPort   | ESP32 ADC1 (potentiometer)     |
//! |            | ActuatorPort | ESP32 LEDC PWM (LED)           |
//! | `log_sink` | EventSink    | Serial / console log output    |
//! | `sim`      | SensorPort   | Synthetic waveform (host only) |
//! | `time`     | TimePort     | ESP32 system timer             |

pub mod hardware;
pub mod log_sink;
#[cfg(not(target_os = "espidf"))]
pub mod sim;
pub mod time;
