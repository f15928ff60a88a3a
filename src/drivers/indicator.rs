// TiltWatch — Indicator Lamps
//
// Three GPIO-driven lamps; exactly one is lit at a time.

use crate::drivers::Lamp;
use crate::events::Severity;

pub struct IndicatorDriver<L: Lamp> {
    red: L,
    yellow: L,
    green: L,
}

impl<L: Lamp> IndicatorDriver<L> {
    pub fn new(red: L, yellow: L, green: L) -> Self {
        Self { red, yellow, green }
    }

    /// Switch all lamps off, then light the one for `level`.
    pub fn set(&mut self, level: Severity) -> anyhow::Result<()> {
        self.red.switch(false)?;
        self.yellow.switch(false)?;
        self.green.switch(false)?;
        match level {
            Severity::Danger => self.red.switch(true),
            Severity::Risk   => self.yellow.switch(true),
            Severity::Safe   => self.green.switch(true),
        }
    }
}
