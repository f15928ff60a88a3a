// TiltWatch — ESP-IDF back-end for the collaborator traits.

use esp_idf_hal::gpio::{AnyInputPin, AnyOutputPin, Input, Output, PinDriver};
use esp_idf_hal::ledc::LedcDriver;
use esp_idf_sys::EspError;

use crate::drivers::{Lamp, LevelInput, PulseOutput};

/// Milliseconds since boot (wraps at ~49 days; all users subtract with
/// `wrapping_sub`).
pub fn now_ms() -> u32 {
    unsafe { (esp_idf_sys::esp_timer_get_time() / 1000) as u32 }
}

/// Enable the internal pull-up on `pin`. Downgraded `AnyInputPin` drivers
/// don't expose `set_pull`, so this goes through the raw GPIO API.
pub fn configure_pullup(pin: i32) -> Result<(), EspError> {
    esp_idf_sys::esp!(unsafe {
        esp_idf_sys::gpio_set_pull_mode(pin, esp_idf_sys::gpio_pull_mode_t_GPIO_PULLUP_ONLY)
    })
}

impl<'d> LevelInput for PinDriver<'d, AnyInputPin, Input> {
    fn level(&self) -> bool {
        self.is_high()
    }
}

impl<'d> Lamp for PinDriver<'d, AnyOutputPin, Output> {
    fn switch(&mut self, on: bool) -> anyhow::Result<()> {
        if on {
            self.set_high()?;
        } else {
            self.set_low()?;
        }
        Ok(())
    }
}

impl<'d> PulseOutput for LedcDriver<'d> {
    fn max_duty(&self) -> u32 {
        self.get_max_duty()
    }

    fn set_duty(&mut self, duty: u32) -> anyhow::Result<()> {
        LedcDriver::set_duty(self, duty)?;
        Ok(())
    }
}
