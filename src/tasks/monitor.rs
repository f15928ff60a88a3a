// TiltWatch — Alarm Monitor Task
//
// One fixed-period control loop on a single task:
//   tilt reading → sample buffer → vibration detector → severity
//   → alarm latch → button protocol (may move the servo) → lamps → telemetry
// All state is owned by `Monitor`; nothing is shared with other tasks.

use std::thread;
use std::time::{Duration, Instant};

use crate::alarm::AlarmLatch;
use crate::config::*;
use crate::detector::{SampleBuffer, VibrationDetector};
use crate::drivers::indicator::IndicatorDriver;
use crate::drivers::servo::ServoDriver;
use crate::drivers::{Delay, Lamp, LevelInput, PulseOutput};
use crate::events::{CycleReport, Severity};
use crate::input::ButtonProtocol;

pub struct Monitor<S, B, L, P, D>
where
    S: LevelInput,
    B: LevelInput,
    L: Lamp,
    P: PulseOutput,
    D: Delay,
{
    tilt: S,
    button_pin: B,
    lamps: IndicatorDriver<L>,
    // Dropping the monitor parks the servo.
    servo: ServoDriver<P>,
    delay: D,

    buffer: SampleBuffer,
    detector: VibrationDetector,
    latch: AlarmLatch,
    button: ButtonProtocol,
}

impl<S, B, L, P, D> Monitor<S, B, L, P, D>
where
    S: LevelInput,
    B: LevelInput,
    L: Lamp,
    P: PulseOutput,
    D: Delay,
{
    /// Pre-fill the buffer from the current tilt level and move the servo to rest.
    pub fn new(
        tilt: S,
        button_pin: B,
        lamps: IndicatorDriver<L>,
        mut servo: ServoDriver<P>,
        delay: D,
        now: u32,
    ) -> anyhow::Result<Self> {
        servo.rest()?;
        let buffer = SampleBuffer::new(tilt.level());
        let button = ButtonProtocol::new(button_pin.level(), now);
        Ok(Self {
            tilt,
            button_pin,
            lamps,
            servo,
            delay,
            buffer,
            detector: VibrationDetector::new(),
            latch: AlarmLatch::new(),
            button,
        })
    }

    /// Run one control cycle at time `now` (ms since boot).
    pub fn cycle(&mut self, now: u32) -> anyhow::Result<CycleReport> {
        let transitions = self.buffer.push(self.tilt.level());
        self.detector.update(transitions, now);
        let elapsed_secs = self.detector.elapsed_secs(now);

        let displayed = self.latch.update(Severity::classify(elapsed_secs));

        let action = self.button.poll(
            self.button_pin.level(),
            now,
            displayed,
            &mut self.servo,
            &mut self.latch,
            &mut self.delay,
        )?;
        if let Some(action) = action {
            log::debug!("Button action: {:?}", action);
        }

        let status = self.latch.displayed();
        self.lamps.set(status)?;

        Ok(CycleReport {
            reading: self.buffer.latest(),
            transitions,
            vibrating: self.detector.is_vibrating(),
            elapsed_secs,
            status,
        })
    }

    pub fn status(&self) -> Severity {
        self.latch.displayed()
    }

    pub fn is_locked(&self) -> bool {
        self.latch.is_locked()
    }

    pub fn servo_engaged(&self) -> bool {
        self.button.servo_engaged()
    }
}

/// Drive `monitor` every `SAMPLE_INTERVAL_MS` until a cycle fails.
///
/// Returning drops the monitor, which parks the servo before the error
/// reaches the caller.
pub fn alarm_task<S, B, L, P, D>(
    mut monitor: Monitor<S, B, L, P, D>,
    now_ms: impl Fn() -> u32,
) -> anyhow::Result<()>
where
    S: LevelInput,
    B: LevelInput,
    L: Lamp,
    P: PulseOutput,
    D: Delay,
{
    log::info!("Alarm task started");

    let interval = Duration::from_millis(u64::from(SAMPLE_INTERVAL_MS));

    loop {
        let tick_start = Instant::now();

        let report = monitor.cycle(now_ms())?;
        log::info!("{}", report);

        // Sleep for the remainder of the interval. A cycle that held the
        // servo already overran it and starts the next one immediately.
        let elapsed = tick_start.elapsed();
        if elapsed < interval {
            thread::sleep(interval - elapsed);
        }
    }
}
