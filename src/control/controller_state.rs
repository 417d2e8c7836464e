use crate::comms::codec::{FieldUpdate, TelemetryKey, TelemetryUpdate};
use chrono::{DateTime, Utc};

/// Shared record of the fused operator command and the last-known lander
/// telemetry. Created once at startup, mutated every scheduler tick, read
/// by the dashboard feed and the rendering loop.
///
/// Lives behind `Arc<RwLock<..>>`; consumers that need more than one field
/// go through [`ControllerState::snapshot`] so telemetry groups are always
/// read consistently.
#[derive(Debug)]
pub struct ControllerState {
    throttle: f32,
    roll: f32,
    telemetry: Telemetry,
}

#[derive(Debug, Clone, Copy)]
struct Telemetry {
    altitude: f32,
    fuel: f32,
    flying: bool,
    crashed: bool,
    orientation: i32,
    vel: (i32, i32),
    last_update: Option<DateTime<Utc>>,
}

/// Full-state copy taken under one read guard, for transmission or
/// rendering.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot {
    pub throttle: f32,
    pub roll: f32,
    pub altitude: f32,
    pub fuel: f32,
    pub flying: bool,
    pub crashed: bool,
    pub orientation: i32,
    pub vel: (i32, i32),
    pub last_update: Option<DateTime<Utc>>,
}

impl ControllerState {
    pub fn new() -> Self {
        Self {
            throttle: 0.0,
            roll: 0.0,
            telemetry: Telemetry {
                altitude: 0.0,
                fuel: 100.0,
                flying: false,
                crashed: false,
                orientation: 0,
                vel: (0, 0),
                last_update: None,
            },
        }
    }

    pub fn throttle(&self) -> f32 { self.throttle }

    pub fn roll(&self) -> f32 { self.roll }

    /// Stores the fused command pair. Throttle is clamped to `[0, 100]` on
    /// every write.
    pub fn set_command(&mut self, throttle: f32, roll: f32) {
        self.throttle = throttle.clamp(0.0, 100.0);
        self.roll = roll;
    }

    /// Applies a decoded telemetry reply and returns the number of fields
    /// that carried a parsable value.
    ///
    /// Fields absent from the reply keep their previous value. Malformed
    /// fields are zeroed. `flying` and `crashed` are taken as reported, a
    /// reply asserting both is accepted as-is.
    pub fn apply_reply(&mut self, updates: &[FieldUpdate]) -> usize {
        let mut applied = 0;
        for update in updates {
            match update {
                FieldUpdate::Updated(value) => {
                    self.telemetry.set(*value);
                    applied += 1;
                }
                FieldUpdate::Malformed(key) => self.telemetry.zero(*key),
                FieldUpdate::Ignored(_) => {}
            }
        }
        self.telemetry.last_update = Some(Utc::now());
        applied
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            throttle: self.throttle,
            roll: self.roll,
            altitude: self.telemetry.altitude,
            fuel: self.telemetry.fuel,
            flying: self.telemetry.flying,
            crashed: self.telemetry.crashed,
            orientation: self.telemetry.orientation,
            vel: self.telemetry.vel,
            last_update: self.telemetry.last_update,
        }
    }
}

impl Default for ControllerState {
    fn default() -> Self {
        Self::new()
    }
}

impl Telemetry {
    fn set(&mut self, update: TelemetryUpdate) {
        match update {
            TelemetryUpdate::Altitude(v) => self.altitude = v,
            TelemetryUpdate::Fuel(v) => self.fuel = v,
            TelemetryUpdate::Flying(v) => self.flying = v,
            TelemetryUpdate::Crashed(v) => self.crashed = v,
            TelemetryUpdate::Orientation(v) => self.orientation = v,
            TelemetryUpdate::VelX(v) => self.vel.0 = v,
            TelemetryUpdate::VelY(v) => self.vel.1 = v,
        }
    }

    fn zero(&mut self, key: TelemetryKey) {
        match key {
            TelemetryKey::Altitude => self.altitude = 0.0,
            TelemetryKey::Fuel => self.fuel = 0.0,
            TelemetryKey::Flying => self.flying = false,
            TelemetryKey::Crashed => self.crashed = false,
            TelemetryKey::Orientation => self.orientation = 0,
            TelemetryKey::VelX => self.vel.0 = 0,
            TelemetryKey::VelY => self.vel.1 = 0,
        }
    }
}
