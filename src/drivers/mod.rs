// TiltWatch — Hardware Collaborators
//
// The alarm logic talks to the board only through these traits. The ESP-IDF
// implementations live in `esp`; tests supply in-memory fakes.

pub mod indicator;
pub mod servo;

#[cfg(target_os = "espidf")]
pub mod esp;

use std::thread;
use std::time::Duration;

/// A digital input sampled once per cycle. `true` = logic HIGH.
pub trait LevelInput {
    fn level(&self) -> bool;
}

/// A single on/off lamp.
pub trait Lamp {
    fn switch(&mut self, on: bool) -> anyhow::Result<()>;
}

/// A PWM channel running at the servo carrier frequency.
pub trait PulseOutput {
    /// Duty value corresponding to a 100 % duty cycle.
    fn max_duty(&self) -> u32;
    fn set_duty(&mut self, duty: u32) -> anyhow::Result<()>;
}

/// Blocking wait used for the servo settle time.
pub trait Delay {
    fn delay_ms(&mut self, ms: u32);
}

/// Sleeps the calling thread (a FreeRTOS task on target).
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadDelay;

impl Delay for ThreadDelay {
    fn delay_ms(&mut self, ms: u32) {
        thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}
