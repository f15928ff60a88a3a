// TiltWatch — Alarm Latch
//
// Holds the highest severity seen until someone clears it with the button.
// While locked the held level can only rise; the clear path is the only way
// back to `Safe`.

use crate::events::Severity;

#[derive(Debug, Default)]
pub struct AlarmLatch {
    locked: bool,
    locked_status: Severity,
}

impl AlarmLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed this cycle's instantaneous severity; returns the displayed status.
    pub fn update(&mut self, status: Severity) -> Severity {
        if !self.locked {
            self.locked_status = status;
            if status.is_alarm() {
                self.locked = true;
                log::warn!("Alarm latched at {}", status);
            }
        } else if status == Severity::Danger && self.locked_status != Severity::Danger {
            self.locked_status = Severity::Danger;
            log::warn!("Alarm escalated to {}", Severity::Danger);
        }
        self.locked_status
    }

    /// Release the latch and return to `Safe`.
    pub fn clear(&mut self) {
        self.locked = false;
        self.locked_status = Severity::Safe;
        log::info!("Alarm cleared");
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn displayed(&self) -> Severity {
        self.locked_status
    }
}
