use super::{FeedbackSink, InputSource, Led, Pin};
use crate::event;
use rand::Rng;

/// Stand-in input board for bench runs against the simulator: neutral
/// joystick, potentiometer held at mid travel, and a small random jitter on
/// the accelerometer so the tilt path stays exercised.
pub struct BenchInputs {
    pot: f32,
}

impl BenchInputs {
    const TILT_JITTER: f32 = 0.02;

    pub fn new() -> Self {
        Self { pot: 0.5 }
    }
}

impl Default for BenchInputs {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for BenchInputs {
    fn read_accel(&mut self) -> (f32, f32, f32) {
        let jitter = rand::rng().random_range(-Self::TILT_JITTER..=Self::TILT_JITTER);
        (jitter, 0.0, 1.0)
    }

    fn read_pot(&mut self) -> f32 {
        self.pot
    }

    fn read_digital(&mut self, _pin: Pin) -> bool {
        false
    }
}

/// Feedback sink that mirrors panel output to the process log. LED and
/// buzzer writes only show up with `LOG_LANDER_EVENTS` set, the display
/// text is deduplicated so the log follows state changes instead of the
/// render cadence.
pub struct LogPanel {
    last_text: String,
}

impl LogPanel {
    pub fn new() -> Self {
        Self {
            last_text: String::new(),
        }
    }
}

impl Default for LogPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedbackSink for LogPanel {
    fn set_led(&mut self, led: Led, on: bool) {
        event!("led {led} -> {}", if on { "on" } else { "off" });
    }

    fn set_buzzer(&mut self, on: bool) {
        event!("buzzer -> {}", if on { "on" } else { "off" });
    }

    fn display(&mut self, text: &str) {
        if text != self.last_text {
            crate::log!("display: {}", text.replace('\n', " | "));
            self.last_text = text.to_string();
        }
    }
}
