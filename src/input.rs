// TiltWatch — Reset Button Protocol
//
// Debounced, edge-triggered two-phase toggle polled once per control cycle:
//   first press  → servo to the engaged pulse (latch armed)
//   second press → servo back to rest, alarm latch cleared
// Presses only count while the displayed status is RISICO or GEVAAR; a press
// while VEILIG is ignored and consumes nothing.

use crate::alarm::AlarmLatch;
use crate::config::*;
use crate::drivers::servo::ServoDriver;
use crate::drivers::{Delay, PulseOutput};
use crate::events::Severity;

/// What an accepted press did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAction {
    Armed,
    /// Servo back at rest; `cleared` is set when the latch was released.
    Disarmed { cleared: bool },
}

pub struct ButtonProtocol {
    // Debounce state
    last_raw: bool,
    last_change: u32,

    // Press tracking
    last_action: Option<u32>,
    awaiting_release: bool,

    servo_engaged: bool,
}

impl ButtonProtocol {
    /// `level` is the button level read at boot (pull-up → idle HIGH).
    pub fn new(level: bool, now: u32) -> Self {
        Self {
            last_raw: level,
            last_change: now,
            last_action: None,
            awaiting_release: false,
            servo_engaged: false,
        }
    }

    pub fn servo_engaged(&self) -> bool {
        self.servo_engaged
    }

    /// Call once per cycle with the raw button level. Blocks for
    /// `SERVO_SETTLE_MS` when a press moves the servo.
    pub fn poll<P: PulseOutput, D: Delay>(
        &mut self,
        level: bool,
        now: u32,
        displayed: Severity,
        servo: &mut ServoDriver<P>,
        latch: &mut AlarmLatch,
        delay: &mut D,
    ) -> anyhow::Result<Option<ButtonAction>> {
        // ---- debounce filter ----
        if level != self.last_raw {
            self.last_change = now;
            self.last_raw = level;
        }
        if now.wrapping_sub(self.last_change) < DEBOUNCE_MS {
            return Ok(None);
        }

        let pressed = !level; // active LOW
        if !pressed {
            self.awaiting_release = false;
            return Ok(None);
        }
        if self.awaiting_release || !self.cooled_down(now) {
            return Ok(None);
        }

        if !displayed.is_alarm() {
            log::debug!("Button press ignored while {}", displayed);
            return Ok(None);
        }

        let action = if !self.servo_engaged {
            servo.engage()?;
            delay.delay_ms(SERVO_SETTLE_MS);
            self.servo_engaged = true;
            log::info!("Servo engaged ({})", displayed);
            ButtonAction::Armed
        } else {
            servo.rest()?;
            delay.delay_ms(SERVO_SETTLE_MS);
            self.servo_engaged = false;
            let cleared = latch.is_locked();
            if cleared {
                latch.clear();
            }
            log::info!("Servo released");
            ButtonAction::Disarmed { cleared }
        };

        self.last_action = Some(now);
        self.awaiting_release = true;
        Ok(Some(action))
    }

    fn cooled_down(&self, now: u32) -> bool {
        self.last_action
            .map(|t| now.wrapping_sub(t) > ACTION_COOLDOWN_MS)
            .unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct FakePwm(Rc<RefCell<Vec<u32>>>);

    impl PulseOutput for FakePwm {
        fn max_duty(&self) -> u32 {
            20_000 // one duty step per microsecond
        }

        fn set_duty(&mut self, duty: u32) -> anyhow::Result<()> {
            self.0.borrow_mut().push(duty);
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeDelay(Vec<u32>);

    impl Delay for FakeDelay {
        fn delay_ms(&mut self, ms: u32) {
            self.0.push(ms);
        }
    }

    struct Rig {
        button: ButtonProtocol,
        pwm: FakePwm,
        servo: ServoDriver<FakePwm>,
        latch: AlarmLatch,
        delay: FakeDelay,
    }

    impl Rig {
        fn new() -> Self {
            let pwm = FakePwm::default();
            Self {
                button: ButtonProtocol::new(true, 0),
                servo: ServoDriver::new(pwm.clone()),
                pwm,
                latch: AlarmLatch::new(),
                delay: FakeDelay::default(),
            }
        }

        fn poll(&mut self, level: bool, now: u32) -> Option<ButtonAction> {
            let displayed = self.latch.displayed();
            self.button
                .poll(level, now, displayed, &mut self.servo, &mut self.latch, &mut self.delay)
                .unwrap()
        }

        /// Press at `t`, hold through debounce, release.
        fn press(&mut self, t: u32) -> Option<ButtonAction> {
            assert_eq!(self.poll(false, t), None);
            let action = self.poll(false, t + 100);
            self.poll(true, t + 200);
            self.poll(true, t + 300);
            action
        }

        fn pulses(&self) -> Vec<u32> {
            self.pwm.0.borrow().clone()
        }
    }

    #[test]
    fn ignored_while_safe() {
        let mut rig = Rig::new();
        assert_eq!(rig.press(1_000), None);
        assert!(rig.pulses().is_empty());
        assert!(rig.delay.0.is_empty());
        assert_eq!(rig.button.last_action, None);
    }

    #[test]
    fn two_presses_arm_then_disarm_and_clear() {
        let mut rig = Rig::new();
        rig.latch.update(Severity::Danger);

        assert_eq!(rig.press(1_000), Some(ButtonAction::Armed));
        assert!(rig.button.servo_engaged());
        assert_eq!(rig.pulses(), vec![SERVO_ENGAGED_US]);
        assert_eq!(rig.delay.0, vec![SERVO_SETTLE_MS]);

        assert_eq!(rig.press(2_000), Some(ButtonAction::Disarmed { cleared: true }));
        assert!(!rig.button.servo_engaged());
        assert_eq!(rig.pulses(), vec![SERVO_ENGAGED_US, SERVO_REST_US]);
        assert!(!rig.latch.is_locked());
        assert_eq!(rig.latch.displayed(), Severity::Safe);
    }

    #[test]
    fn bounce_shorter_than_debounce_is_ignored() {
        let mut rig = Rig::new();
        rig.latch.update(Severity::Risk);
        assert_eq!(rig.poll(false, 1_000), None);
        assert_eq!(rig.poll(true, 1_020), None);
        assert_eq!(rig.poll(false, 1_040), None);
        assert_eq!(rig.poll(false, 1_080), None);
        assert_eq!(rig.poll(false, 1_090), Some(ButtonAction::Armed));
    }

    #[test]
    fn held_button_fires_once() {
        let mut rig = Rig::new();
        rig.latch.update(Severity::Risk);
        rig.poll(false, 1_000);
        assert_eq!(rig.poll(false, 1_100), Some(ButtonAction::Armed));
        for t in (1_200..5_000).step_by(100) {
            assert_eq!(rig.poll(false, t), None);
        }
        assert_eq!(rig.pulses().len(), 1);
    }

    #[test]
    fn cooldown_blocks_quick_second_press() {
        let mut rig = Rig::new();
        rig.latch.update(Severity::Risk);
        rig.poll(false, 1_000);
        assert_eq!(rig.poll(false, 1_060), Some(ButtonAction::Armed));
        rig.poll(true, 1_070);
        rig.poll(true, 1_130);
        rig.poll(false, 1_140);
        // settled at 1_190 but only 130 ms since the action
        assert_eq!(rig.poll(false, 1_190), None);
        assert_eq!(rig.poll(false, 1_261), Some(ButtonAction::Disarmed { cleared: true }));
    }

    #[test]
    fn press_held_through_escalation_is_honoured() {
        let mut rig = Rig::new();
        rig.poll(false, 1_000);
        assert_eq!(rig.poll(false, 1_100), None);
        rig.latch.update(Severity::Risk);
        assert_eq!(rig.poll(false, 1_200), Some(ButtonAction::Armed));
    }

    #[test]
    fn disarm_without_lock_leaves_latch_alone() {
        let mut rig = Rig::new();
        rig.latch.update(Severity::Risk);
        rig.press(1_000);
        rig.latch.clear();
        // displayed is SAFE now, so the press is ignored and the servo stays engaged
        assert_eq!(rig.press(2_000), None);
        assert!(rig.button.servo_engaged());
    }
}
