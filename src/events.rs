// TiltWatch — Severity Levels & Cycle Telemetry

use std::fmt;

use crate::config::*;

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------
/// Alarm severity, ordered `Safe < Risk < Danger`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Severity {
    #[default]
    Safe,
    Risk,
    Danger,
}

impl Severity {
    /// Classify how long the current vibration episode has lasted.
    /// Each tier includes its lower bound.
    pub fn classify(elapsed_secs: f32) -> Self {
        if elapsed_secs >= DANGER_AFTER_SECS {
            Self::Danger
        } else if elapsed_secs >= RISK_AFTER_SECS {
            Self::Risk
        } else {
            Self::Safe
        }
    }

    /// Label used on the serial telemetry line.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Safe   => "VEILIG",
            Self::Risk   => "RISICO",
            Self::Danger => "GEVAAR",
        }
    }

    /// `true` for `Risk` and `Danger`: the levels that latch and that
    /// enable the button.
    pub fn is_alarm(&self) -> bool {
        !matches!(self, Self::Safe)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Cycle telemetry
// ---------------------------------------------------------------------------
/// Snapshot of one control cycle, logged once per sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleReport {
    /// Most recent buffer slot after this cycle's write.
    pub reading: bool,
    pub transitions: usize,
    pub vibrating: bool,
    pub elapsed_secs: f32,
    /// Status driving the lamps (latched level after button handling).
    pub status: Severity,
}

impl fmt::Display for CycleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tilt: {} transitions: {} vibrating: {} duration_vibrations: {:.2} status: {}",
            u8::from(self.reading),
            self.transitions,
            self.vibrating,
            self.elapsed_secs,
            self.status
        )
    }
}
