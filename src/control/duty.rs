//! Linear mapping from a filtered ADC value to an actuator duty.

use super::RawSample;

/// A drive command: `level / full_scale` of the actuator's range.
///
/// Kept as an exact ratio so each actuation mode (fraction, percent, pulse
/// width, hardware duty ticks) does its own rounding once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriveCommand {
    level: RawSample,
    full_scale: RawSample,
}

impl DriveCommand {
    /// Map a filtered value onto `[0, full_scale]`.  Values above full
    /// scale saturate; a zero full scale yields an always-off command.
    pub fn from_filtered(value: RawSample, full_scale: RawSample) -> Self {
        Self {
            level: value.min(full_scale),
            full_scale,
        }
    }

    pub fn level(&self) -> RawSample {
        self.level
    }

    pub fn full_scale(&self) -> RawSample {
        self.full_scale
    }

    /// Duty as a fraction in `[0.0, 1.0]`.
    pub fn duty_fraction(&self) -> f32 {
        if self.full_scale == 0 {
            return 0.0;
        }
        f32::from(self.level) / f32::from(self.full_scale)
    }

    /// Duty as a whole percentage (truncated).
    pub fn duty_percent(&self) -> u8 {
        self.scale(100) as u8
    }

    /// High time within one PWM period of `period_us` microseconds.
    pub fn pulse_us(&self, period_us: u32) -> u32 {
        self.scale(period_us)
    }

    /// `range * level / full_scale`, truncated.
    pub fn scale(&self, range: u32) -> u32 {
        if self.full_scale == 0 {
            return 0;
        }
        (u64::from(range) * u64::from(self.level) / u64::from(self.full_scale)) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mid_scale_value() {
        let cmd = DriveCommand::from_filtered(500, 1023);
        assert!((cmd.duty_fraction() - 500.0 / 1023.0).abs() < 1e-6);
        assert_eq!(cmd.duty_percent(), 48);
        assert_eq!(cmd.pulse_us(1000), 488);
    }

    #[test]
    fn endpoints() {
        let off = DriveCommand::from_filtered(0, 1023);
        assert_eq!(off.pulse_us(1000), 0);
        assert_eq!(off.duty_percent(), 0);

        let full = DriveCommand::from_filtered(1023, 1023);
        assert_eq!(full.pulse_us(1000), 1000);
        assert_eq!(full.duty_percent(), 100);
        assert!((full.duty_fraction() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn saturates_above_full_scale() {
        let cmd = DriveCommand::from_filtered(4000, 1023);
        assert_eq!(cmd.level(), 1023);
        assert_eq!(cmd.pulse_us(1000), 1000);
    }

    #[test]
    fn zero_full_scale_is_off() {
        let cmd = DriveCommand::from_filtered(10, 0);
        assert_eq!(cmd.duty_fraction(), 0.0);
        assert_eq!(cmd.pulse_us(1000), 0);
    }
}
