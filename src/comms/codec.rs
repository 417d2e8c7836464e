use crate::control::Snapshot;
use std::str::FromStr;
use strum_macros::{Display, EnumString};

/// Canonical key set of the lander telemetry protocol. Keys are matched
/// case-sensitively, exactly as they appear on the wire.
#[derive(Debug, Display, EnumString, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TelemetryKey {
    #[strum(serialize = "altitude")]
    Altitude,
    #[strum(serialize = "fuel")]
    Fuel,
    #[strum(serialize = "flying")]
    Flying,
    #[strum(serialize = "crashed")]
    Crashed,
    #[strum(serialize = "orientation")]
    Orientation,
    #[strum(serialize = "Vx")]
    VelX,
    #[strum(serialize = "Vy")]
    VelY,
}

/// A single parsed telemetry field with its typed value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TelemetryUpdate {
    Altitude(f32),
    Fuel(f32),
    Flying(bool),
    Crashed(bool),
    Orientation(i32),
    VelX(i32),
    VelY(i32),
}

/// Outcome of decoding one telemetry line.
///
/// `Malformed` covers a known key whose value is missing or non-numeric;
/// applying it zeroes the field, which keeps the lenient semantics of the
/// original wire peers. Keys absent from a message produce no entry at all,
/// so the prior value stays untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    Updated(TelemetryUpdate),
    Malformed(TelemetryKey),
    Ignored(String),
}

/// Formats the per-tick command message for the lander.
///
/// # Arguments
/// - `throttle`: commanded throttle in `[0, 100]`, truncated to an integer
///   on the wire.
/// - `roll`: commanded roll, sent with three decimal places.
#[allow(clippy::cast_possible_truncation)]
pub fn encode_command(throttle: f32, roll: f32) -> String {
    format!("command:!\nthrottle:{}\nroll:{roll:.3}", throttle as i32)
}

/// Formats the full state snapshot for the dashboard, floats at two
/// decimal places, flags as `0`/`1`.
pub fn encode_snapshot(snapshot: &Snapshot) -> String {
    format!(
        "command:=\naltitude:{:.2}\nfuel:{:.2}\nflying:{}\ncrashed:{}\norientation:{}\nVx:{}\nVy:{}",
        snapshot.altitude,
        snapshot.fuel,
        u8::from(snapshot.flying),
        u8::from(snapshot.crashed),
        snapshot.orientation,
        snapshot.vel.0,
        snapshot.vel.1,
    )
}

/// Splits a telemetry payload into per-field outcomes.
///
/// Lines are separated by CR or LF (empty lines are skipped) and split at
/// the first `:` into key and value.
pub fn decode_telemetry(payload: &str) -> Vec<FieldUpdate> {
    payload.split(['\r', '\n']).filter(|line| !line.is_empty()).map(parse_line).collect()
}

fn parse_line(line: &str) -> FieldUpdate {
    let (raw_key, raw_value) = match line.split_once(':') {
        Some((key, value)) => (key, Some(value)),
        None => (line, None),
    };
    let Ok(key) = TelemetryKey::from_str(raw_key) else {
        return FieldUpdate::Ignored(raw_key.to_string());
    };
    let Some(value) = raw_value else {
        return FieldUpdate::Malformed(key);
    };
    let update = match key {
        TelemetryKey::Altitude => lenient_f32(value).map(TelemetryUpdate::Altitude),
        TelemetryKey::Fuel => lenient_f32(value).map(TelemetryUpdate::Fuel),
        TelemetryKey::Flying => lenient_i32(value).map(|v| TelemetryUpdate::Flying(v != 0)),
        TelemetryKey::Crashed => lenient_i32(value).map(|v| TelemetryUpdate::Crashed(v != 0)),
        TelemetryKey::Orientation => lenient_i32(value).map(TelemetryUpdate::Orientation),
        TelemetryKey::VelX => lenient_i32(value).map(TelemetryUpdate::VelX),
        TelemetryKey::VelY => lenient_i32(value).map(TelemetryUpdate::VelY),
    };
    update.map_or(FieldUpdate::Malformed(key), FieldUpdate::Updated)
}

/// Longest leading numeric prefix, matching what the wire peers accept
/// (`atof`/`atoi` stop at the first non-numeric byte).
fn numeric_prefix(value: &str, allow_fraction: bool) -> Option<&str> {
    let trimmed = value.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let mut seen_digit = false;
    let mut seen_dot = false;
    while let Some(&byte) = bytes.get(end) {
        match byte {
            b'0'..=b'9' => seen_digit = true,
            b'.' if allow_fraction && !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }
    seen_digit.then(|| &trimmed[..end])
}

fn lenient_f32(value: &str) -> Option<f32> {
    numeric_prefix(value, true)?.parse().ok()
}

fn lenient_i32(value: &str) -> Option<i32> {
    numeric_prefix(value, false)?.parse().ok()
}
