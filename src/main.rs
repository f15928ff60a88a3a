// TiltWatch — Firmware Entry Point
//
// Boot sequence:
//   1. Install the logger.
//   2. Configure the tilt switch and reset button (pull-up inputs), the three
//      indicator lamps, and a 50 Hz LEDC channel for the servo.
//   3. Pre-fill the sample buffer from the tilt switch and park the servo.
//   4. Run the alarm loop on the main task.
//
// The loop only returns on a hardware fault. The servo is parked at rest on
// the way out and the error is handed back to ESP-IDF.

#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    use esp_idf_hal::gpio::{InputPin, OutputPin, PinDriver};
    use esp_idf_hal::ledc::{config::TimerConfig, LedcDriver, LedcTimerDriver, Resolution};
    use esp_idf_hal::prelude::*;

    use tiltwatch::config::*;
    use tiltwatch::drivers::esp::{configure_pullup, now_ms};
    use tiltwatch::drivers::indicator::IndicatorDriver;
    use tiltwatch::drivers::servo::ServoDriver;
    use tiltwatch::drivers::ThreadDelay;
    use tiltwatch::{alarm_task, Monitor};

    // Link esp-idf-sys runtime patches and initialise logging.
    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();
    log::info!("TiltWatch firmware starting…");

    // ---- Peripherals ------------------------------------------------------
    let peripherals = Peripherals::take()?;
    let pins = peripherals.pins;

    // Tilt switch and button: pull-up, contact/press reads LOW.
    let tilt = PinDriver::input(pins.gpio15.downgrade_input())?;
    configure_pullup(PIN_TILT)?;
    let button = PinDriver::input(pins.gpio0.downgrade_input())?;
    configure_pullup(PIN_BUTTON)?;
    log::info!("Inputs ready (tilt GPIO{}, button GPIO{})", PIN_TILT, PIN_BUTTON);

    let lamps = IndicatorDriver::new(
        PinDriver::output(pins.gpio38.downgrade_output())?,
        PinDriver::output(pins.gpio37.downgrade_output())?,
        PinDriver::output(pins.gpio36.downgrade_output())?,
    );
    log::info!(
        "Lamps ready (red GPIO{}, yellow GPIO{}, green GPIO{})",
        PIN_RED,
        PIN_YELLOW,
        PIN_GREEN
    );

    // ---- Servo PWM (50 Hz carrier) ----------------------------------------
    let timer = LedcTimerDriver::new(
        peripherals.ledc.timer0,
        &TimerConfig::new()
            .frequency(SERVO_FREQUENCY_HZ.Hz().into())
            .resolution(Resolution::Bits14),
    )?;
    let pwm = LedcDriver::new(peripherals.ledc.channel0, &timer, pins.gpio18)?;
    log::info!("Servo PWM on GPIO{} ({} Hz)", PIN_SERVO, SERVO_FREQUENCY_HZ);

    // ---- Alarm loop -------------------------------------------------------
    let monitor = Monitor::new(
        tilt,
        button,
        lamps,
        ServoDriver::new(pwm),
        ThreadDelay,
        now_ms(),
    )?;
    log::info!("Boot complete — monitoring vibration");

    let result = alarm_task(monitor, now_ms);
    if let Err(e) = &result {
        log::error!("Alarm loop stopped: {:#}", e);
    }
    result
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    eprintln!("tiltwatch is ESP-IDF firmware; build it for an espidf target.");
}
