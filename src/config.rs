// TiltWatch — Hardware & System Configuration
// Target: ESP32-S3 DevKit (Xtensa)

// ---------------------------------------------------------------------------
// GPIO Pin Definitions
// ---------------------------------------------------------------------------
pub const PIN_TILT: i32 = 15;   // Tilt switch (INPUT_PULLUP, contact reads LOW)
pub const PIN_RED: i32 = 38;    // Red lamp    — GEVAAR
pub const PIN_YELLOW: i32 = 37; // Yellow lamp — RISICO
pub const PIN_GREEN: i32 = 36;  // Green lamp  — VEILIG
pub const PIN_BUTTON: i32 = 0;  // Reset/acknowledge button (INPUT_PULLUP, active LOW)
pub const PIN_SERVO: i32 = 18;  // Servo PWM output

// ---------------------------------------------------------------------------
// Sampling (milliseconds)
// ---------------------------------------------------------------------------
pub const SAMPLE_INTERVAL_MS: u32 = 100;   // 10 Hz control cycle
pub const WINDOW_MS: u32 = 1000;           // Detection window covered by the buffer

/// Number of readings held by the sample buffer: the window divided by the
/// sample interval, rounded, and never fewer than two.
pub const BUFFER_SIZE: usize = buffer_size(WINDOW_MS, SAMPLE_INTERVAL_MS);

pub const fn buffer_size(window_ms: u32, interval_ms: u32) -> usize {
    let n = ((window_ms + interval_ms / 2) / interval_ms) as usize;
    if n < 2 {
        2
    } else {
        n
    }
}

// ---------------------------------------------------------------------------
// Vibration detection / severity
// ---------------------------------------------------------------------------
pub const VIBRATION_TRANSITIONS_THRESHOLD: usize = 1; // strictly more → vibrating
pub const RISK_AFTER_SECS: f32 = 3.0;
pub const DANGER_AFTER_SECS: f32 = 5.0;

// ---------------------------------------------------------------------------
// Button (milliseconds)
// ---------------------------------------------------------------------------
pub const DEBOUNCE_MS: u32 = 50;
pub const ACTION_COOLDOWN_MS: u32 = 200;

// ---------------------------------------------------------------------------
// Servo (standard hobby servo on a 50 Hz carrier)
// ---------------------------------------------------------------------------
pub const SERVO_FREQUENCY_HZ: u32 = 50;
pub const SERVO_PERIOD_US: u32 = 1_000_000 / SERVO_FREQUENCY_HZ; // 20 000
pub const SERVO_MIN_US: u32 = 500;
pub const SERVO_MAX_US: u32 = 2400;
pub const SERVO_REST_US: u32 = SERVO_MIN_US;
pub const SERVO_ENGAGED_US: u32 = SERVO_MAX_US;
pub const SERVO_SETTLE_MS: u32 = 500; // blocking hold after each move
