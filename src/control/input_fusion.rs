use super::controller_state::ControllerState;
use crate::hardware::{InputSource, Pin};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Potentiometer readings at or above this are snapped to exactly 100 so
/// full throttle stays reachable through ADC noise.
const FULL_THROTTLE_SNAP: f32 = 99.5;
/// Tilt angles within this band around level are treated as neutral.
const TILT_DEADBAND_RAD: f32 = 0.1;

/// Resolves the competing digital, analog and inertial input sources into
/// one throttle/roll command per scheduler tick.
pub struct InputFusion {
    inputs: Box<dyn InputSource + Send>,
    state: Arc<RwLock<ControllerState>>,
}

impl InputFusion {
    pub fn new(inputs: Box<dyn InputSource + Send>, state: Arc<RwLock<ControllerState>>) -> Self {
        Self { inputs, state }
    }

    /// Reads the raw sources, fuses them and writes the command pair into
    /// the shared state. Returns the fused pair.
    pub async fn sample(&mut self) -> (f32, f32) {
        let throttle =
            resolve_throttle(self.inputs.read_digital(Pin::JoyUp), self.inputs.read_pot());
        let roll = resolve_roll(
            self.inputs.read_digital(Pin::JoyLeft),
            self.inputs.read_digital(Pin::JoyRight),
            self.inputs.read_accel(),
        );
        self.state.write().await.set_command(throttle, roll);
        (throttle, roll)
    }
}

/// Throttle priority: the digital "up" button forces full throttle,
/// otherwise the potentiometer scales to `[0, 100]` with the near-full
/// snap applied.
pub(crate) fn resolve_throttle(full_throttle: bool, pot: f32) -> f32 {
    if full_throttle {
        return 100.0;
    }
    let throttle = (pot * 100.0).clamp(0.0, 100.0);
    if throttle >= FULL_THROTTLE_SNAP { 100.0 } else { throttle }
}

/// Roll priority: "left" forces −1, else "right" forces +1, else the roll
/// is derived from the tilt angle of the accelerometer vector with the
/// deadband applied and the sign inverted for the physical mounting
/// orientation.
pub(crate) fn resolve_roll(left: bool, right: bool, accel: (f32, f32, f32)) -> f32 {
    if left {
        return -1.0;
    }
    if right {
        return 1.0;
    }
    let (x, y, z) = accel;
    let magnitude = (x * x + y * y + z * z).sqrt();
    if magnitude == 0.0 {
        // A free-fall reading carries no tilt information.
        return 0.0;
    }
    let angle = (x / magnitude).clamp(-1.0, 1.0).asin();
    if angle.abs() <= TILT_DEADBAND_RAD { 0.0 } else { -angle }
}
