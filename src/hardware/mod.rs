mod bench;

pub use bench::{BenchInputs, LogPanel};

use strum_macros::Display;

/// Digital joystick pins consumed by the input fusion logic.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pin {
    JoyUp,
    JoyLeft,
    JoyRight,
}

/// Indicator LEDs driven by the feedback state machine.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Led {
    Red,
    Green,
    Blue,
    Warn,
}

/// Raw operator input as exposed by the board support layer.
///
/// Register-level sensor access lives behind this trait; the control core
/// only ever sees scaled readings.
pub trait InputSource {
    /// Raw 3-axis accelerometer reading in g.
    fn read_accel(&mut self) -> (f32, f32, f32);
    /// Potentiometer position in `[0, 1]`.
    fn read_pot(&mut self) -> f32;
    /// Level of a digital joystick pin, `true` when pressed.
    fn read_digital(&mut self, pin: Pin) -> bool;
}

/// Operator-facing output primitives (LEDs, buzzer, text display).
pub trait FeedbackSink {
    fn set_led(&mut self, led: Led, on: bool);
    fn set_buzzer(&mut self, on: bool);
    fn display(&mut self, text: &str);
}
