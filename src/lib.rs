// TiltWatch — vibration alarm with a servo-actuated latch.
//
// The control logic is target-independent; the ESP-IDF glue sits behind
// `drivers::esp` and the firmware entry point in `main.rs`.

pub mod alarm;
pub mod config;
pub mod detector;
pub mod drivers;
pub mod events;
pub mod input;
pub mod tasks;

pub use alarm::AlarmLatch;
pub use detector::{SampleBuffer, VibrationDetector};
pub use events::{CycleReport, Severity};
pub use input::{ButtonAction, ButtonProtocol};
pub use tasks::monitor::{alarm_task, Monitor};
