//! Dimmable LED driver.
//!
//! A dumb actuator over any [`SetDutyCycle`] output: it turns a
//! `level / full_scale` ratio into duty ticks and remembers what it last
//! applied.  On a failed write the previous duty stays in effect.

use embedded_hal::pwm::SetDutyCycle;

pub struct LedDriver<P> {
    pwm: P,
    duty: u16,
}

impl<P: SetDutyCycle> LedDriver<P> {
    pub fn new(pwm: P) -> Self {
        Self { pwm, duty: 0 }
    }

    /// Set brightness to `level / full_scale`.  `level` saturates at
    /// `full_scale`; a zero `full_scale` turns the LED off.
    pub fn set_level(&mut self, level: u16, full_scale: u16) -> Result<(), P::Error> {
        if full_scale == 0 {
            return self.off();
        }
        let level = level.min(full_scale);
        let max = u32::from(self.pwm.max_duty_cycle());
        let duty = (u32::from(level) * max / u32::from(full_scale)) as u16;
        self.pwm.set_duty_cycle(duty)?;
        self.duty = duty;
        Ok(())
    }

    pub fn off(&mut self) -> Result<(), P::Error> {
        self.pwm.set_duty_cycle_fully_off()?;
        self.duty = 0;
        Ok(())
    }

    /// Duty last applied successfully, in ticks.
    pub fn duty(&self) -> u16 {
        self.duty
    }

    pub fn max_duty(&self) -> u16 {
        self.pwm.max_duty_cycle()
    }

    pub fn is_on(&self) -> bool {
        self.duty > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::pwm::ErrorType;

    struct FakePwm {
        max: u16,
        written: Vec<u16>,
    }

    impl ErrorType for FakePwm {
        type Error = Infallible;
    }

    impl SetDutyCycle for FakePwm {
        fn max_duty_cycle(&self) -> u16 {
            self.max
        }

        fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Infallible> {
            self.written.push(duty);
            Ok(())
        }
    }

    fn led(max: u16) -> LedDriver<FakePwm> {
        LedDriver::new(FakePwm {
            max,
            written: Vec::new(),
        })
    }

    #[test]
    fn ten_bit_scale_maps_one_to_one() {
        let mut l = led(1023);
        l.set_level(500, 1023).unwrap();
        assert_eq!(l.duty(), 500);
        l.set_level(1023, 1023).unwrap();
        assert_eq!(l.duty(), 1023);
    }

    #[test]
    fn eight_bit_timer_rescales() {
        let mut l = led(255);
        l.set_level(512, 1023).unwrap();
        assert_eq!(l.duty(), 127);
    }

    #[test]
    fn level_saturates_and_zero_scale_is_off() {
        let mut l = led(1023);
        l.set_level(2000, 1023).unwrap();
        assert_eq!(l.duty(), 1023);
        l.set_level(10, 0).unwrap();
        assert!(!l.is_on());
        assert_eq!(l.pwm.written, vec![1023, 0]);
    }
}
