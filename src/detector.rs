// TiltWatch — Vibration Detection
//
// The tilt switch is sampled once per cycle into a fixed ring of readings.
// The number of level changes inside the ring is the vibration proxy: more
// than `VIBRATION_TRANSITIONS_THRESHOLD` changes opens an episode, and the
// episode's age drives the severity classification.

use crate::config::*;

// ---------------------------------------------------------------------------
// Sample buffer
// ---------------------------------------------------------------------------
pub struct SampleBuffer<const N: usize = BUFFER_SIZE> {
    readings: [bool; N],
    cursor: usize,
}

impl<const N: usize> SampleBuffer<N> {
    /// Fill every slot with `initial` so the first cycle sees no transitions.
    pub fn new(initial: bool) -> Self {
        assert!(N >= 2, "sample buffer needs at least two slots");
        Self {
            readings: [initial; N],
            cursor: 0,
        }
    }

    /// Store `reading` at the cursor, advance it, and return the transition
    /// count.
    pub fn push(&mut self, reading: bool) -> usize {
        self.readings[self.cursor] = reading;
        self.cursor = (self.cursor + 1) % N;
        self.transitions()
    }

    /// Adjacent pairs that differ, compared in storage order. Slot `N-1` is
    /// not compared with slot `0`, so a change straddling the cursor is not
    /// counted.
    pub fn transitions(&self) -> usize {
        self.readings.windows(2).filter(|w| w[0] != w[1]).count()
    }

    /// The reading written by the last `push`.
    pub fn latest(&self) -> bool {
        self.readings[(self.cursor + N - 1) % N]
    }

    /// Readings oldest first.
    pub fn chronological(&self) -> impl Iterator<Item = bool> + '_ {
        (0..N).map(move |i| self.readings[(self.cursor + i) % N])
    }
}

// ---------------------------------------------------------------------------
// Vibration detector
// ---------------------------------------------------------------------------
#[derive(Debug, Default)]
pub struct VibrationDetector {
    /// Start of the current episode (ms since boot); `None` while calm.
    episode_start: Option<u32>,
}

impl VibrationDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, transitions: usize, now: u32) {
        let shaking = transitions > VIBRATION_TRANSITIONS_THRESHOLD;
        match (shaking, self.episode_start) {
            (true, None) => {
                log::info!("Vibration started ({} transitions)", transitions);
                self.episode_start = Some(now);
            }
            (false, Some(start)) => {
                log::info!(
                    "Vibration stopped after {:.2} s",
                    now.wrapping_sub(start) as f32 / 1000.0
                );
                self.episode_start = None;
            }
            _ => {}
        }
    }

    pub fn is_vibrating(&self) -> bool {
        self.episode_start.is_some()
    }

    /// Seconds since the episode began, or 0 when not vibrating.
    /// Tolerates the millisecond counter wrapping.
    pub fn elapsed_secs(&self, now: u32) -> f32 {
        self.episode_start
            .map(|start| now.wrapping_sub(start) as f32 / 1000.0)
            .unwrap_or(0.0)
    }
}
