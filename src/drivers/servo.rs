// TiltWatch — Servo Driver
//
// Converts pulse widths to LEDC duty values on the 50 Hz carrier. The driver
// parks the servo at its rest pulse when dropped, so any exit from the
// control loop (error return or unwinding panic) leaves the latch open.

use crate::config::*;
use crate::drivers::PulseOutput;

/// Duty value for a pulse of `us` microseconds, clamped to the servo range.
pub fn pulse_to_duty(us: u32, max_duty: u32) -> u32 {
    let us = us.clamp(SERVO_MIN_US, SERVO_MAX_US);
    (u64::from(us) * u64::from(max_duty) / u64::from(SERVO_PERIOD_US)) as u32
}

pub struct ServoDriver<P: PulseOutput> {
    pwm: P,
}

impl<P: PulseOutput> ServoDriver<P> {
    pub fn new(pwm: P) -> Self {
        Self { pwm }
    }

    pub fn set_pulse(&mut self, us: u32) -> anyhow::Result<()> {
        let duty = pulse_to_duty(us, self.pwm.max_duty());
        log::debug!("Servo pulse {} us (duty {})", us, duty);
        self.pwm.set_duty(duty)
    }

    pub fn engage(&mut self) -> anyhow::Result<()> {
        self.set_pulse(SERVO_ENGAGED_US)
    }

    pub fn rest(&mut self) -> anyhow::Result<()> {
        self.set_pulse(SERVO_REST_US)
    }
}

impl<P: PulseOutput> Drop for ServoDriver<P> {
    fn drop(&mut self) {
        log::warn!("Parking servo at rest position");
        // Best effort: a failure here must not replace the fault that got us here.
        let _ = self.rest();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct FakePwm {
        duties: Rc<RefCell<Vec<u32>>>,
        fail: bool,
    }

    impl PulseOutput for FakePwm {
        fn max_duty(&self) -> u32 {
            65_535
        }

        fn set_duty(&mut self, duty: u32) -> anyhow::Result<()> {
            if self.fail {
                anyhow::bail!("ledc write failed");
            }
            self.duties.borrow_mut().push(duty);
            Ok(())
        }
    }

    #[test]
    fn duty_matches_u16_scale() {
        assert_eq!(pulse_to_duty(500, 65_535), 1_638);
        assert_eq!(pulse_to_duty(2400, 65_535), 7_864);
    }

    #[test]
    fn duty_is_monotonic_and_clamped() {
        let max = (1 << 14) - 1;
        let mut prev = 0;
        for us in (0..3000).step_by(7) {
            let d = pulse_to_duty(us, max);
            assert!(d >= prev);
            prev = d;
        }
        assert_eq!(pulse_to_duty(100, max), pulse_to_duty(SERVO_MIN_US, max));
        assert_eq!(pulse_to_duty(9000, max), pulse_to_duty(SERVO_MAX_US, max));
    }

    #[test]
    fn drop_parks_at_rest() {
        let duties = Rc::new(RefCell::new(Vec::new()));
        {
            let mut servo = ServoDriver::new(FakePwm { duties: Rc::clone(&duties), fail: false });
            servo.engage().unwrap();
        }
        assert_eq!(*duties.borrow(), vec![7_864, 1_638]);
    }

    #[test]
    fn failed_park_is_swallowed() {
        let servo = ServoDriver::new(FakePwm { duties: Rc::default(), fail: true });
        drop(servo);
    }
}
