//! Host-side potentiometer simulation.
//!
//! [`SimWaveform`] sweeps a 12-bit triangle wave and injects a full-scale
//! spike every `spike_every` samples.  [`SimPotSensor`] feeds each point
//! into the potentiometer driver's sim hook and reads it back through the
//! normal driver path, so the host binary exercises the same scaling code
//! the firmware runs.

use crate::app::ports::SensorPort;
use crate::control::RawSample;
use crate::error::SensorError;
use crate::pins;
use crate::sensors::Potentiometer;
use crate::sensors::potentiometer::sim_set_pot_adc;

const ADC_FULL_SCALE: u16 = (1 << pins::POT_ADC_BITS) - 1;

#[derive(Debug, Clone)]
pub struct SimWaveform {
    level: u16,
    step: u16,
    rising: bool,
    spike_every: u32,
    tick: u32,
}

impl SimWaveform {
    /// `step` is in 12-bit counts per sample; `spike_every == 0` disables
    /// spikes.
    pub fn new(step: u16, spike_every: u32) -> Self {
        Self {
            level: 0,
            step: step.max(1),
            rising: true,
            spike_every,
            tick: 0,
        }
    }

    /// Next 12-bit converter reading.
    pub fn next_raw(&mut self) -> u16 {
        self.tick = self.tick.wrapping_add(1);
        if self.spike_every != 0 && self.tick % self.spike_every == 0 {
            return ADC_FULL_SCALE;
        }

        let out = self.level;
        if self.rising {
            self.level = self.level.saturating_add(self.step).min(ADC_FULL_SCALE);
            self.rising = self.level < ADC_FULL_SCALE;
        } else {
            self.level = self.level.saturating_sub(self.step);
            self.rising = self.level == 0;
        }
        out
    }
}

pub struct SimPotSensor {
    wave: SimWaveform,
    pot: Potentiometer,
}

impl SimPotSensor {
    pub fn new(wave: SimWaveform) -> Self {
        Self {
            wave,
            pot: Potentiometer::new(pins::POT_ADC1_CHANNEL),
        }
    }
}

impl SensorPort for SimPotSensor {
    fn acquire(&mut self) -> Result<RawSample, SensorError> {
        sim_set_pot_adc(self.wave.next_raw());
        self.pot.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_turns_at_both_ends() {
        let mut w = SimWaveform::new(2000, 0);
        let seq: Vec<u16> = (0..6).map(|_| w.next_raw()).collect();
        assert_eq!(seq, vec![0, 2000, 4000, 4095, 2095, 95]);
        assert_eq!(w.next_raw(), 0);
        assert_eq!(w.next_raw(), 2000);
    }

    #[test]
    fn spikes_replace_every_nth_point() {
        let mut w = SimWaveform::new(10, 3);
        let seq: Vec<u16> = (0..6).map(|_| w.next_raw()).collect();
        assert_eq!(seq, vec![0, 10, 4095, 20, 30, 4095]);
    }
}
