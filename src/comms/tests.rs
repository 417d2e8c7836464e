use super::codec::{self, FieldUpdate, TelemetryKey, TelemetryUpdate};
use super::{DashboardPublisher, ExchangeOutcome, LanderLink, UdpLink};
use crate::control::ControllerState;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::sync::RwLock;

const EPS: f32 = 1e-5;

fn loopback() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::LOCALHOST, 0))
}

/// Binds a fake peer socket and a link whose lander endpoint points at it.
/// The dashboard endpoint points at the peer as well unless a test binds
/// its own.
async fn link_to_peer() -> (Arc<UdpLink>, UdpSocket) {
    let peer = UdpSocket::bind(loopback()).await.unwrap();
    let peer_addr = peer.local_addr().unwrap();
    let link = UdpLink::bind(loopback(), peer_addr, peer_addr).await.unwrap();
    (Arc::new(link), peer)
}

#[test]
fn command_message_matches_wire_format() {
    assert_eq!(codec::encode_command(87.6, -0.25), "command:!\nthrottle:87\nroll:-0.250");
    assert_eq!(codec::encode_command(100.0, 1.0), "command:!\nthrottle:100\nroll:1.000");
    assert_eq!(codec::encode_command(0.0, 0.0), "command:!\nthrottle:0\nroll:0.000");
}

#[test]
fn snapshot_message_lists_all_fields() {
    let mut state = ControllerState::new();
    state.apply_reply(&codec::decode_telemetry(
        "altitude:120.50\nfuel:95.00\nflying:1\ncrashed:0\norientation:3\nVx:2\nVy:-1",
    ));
    assert_eq!(
        codec::encode_snapshot(&state.snapshot()),
        "command:=\naltitude:120.50\nfuel:95.00\nflying:1\ncrashed:0\norientation:3\nVx:2\nVy:-1"
    );
}

#[test]
fn decode_splits_on_cr_and_lf() {
    let updates = codec::decode_telemetry("altitude:10.5\r\nfuel:20.0\n\nflying:1");
    assert_eq!(
        updates,
        vec![
            FieldUpdate::Updated(TelemetryUpdate::Altitude(10.5)),
            FieldUpdate::Updated(TelemetryUpdate::Fuel(20.0)),
            FieldUpdate::Updated(TelemetryUpdate::Flying(true)),
        ]
    );
}

#[test]
fn decode_reports_unknown_keys_as_ignored() {
    let updates = codec::decode_telemetry("altitude:10.0\nchecksum:77\nXy:4");
    assert_eq!(updates[0], FieldUpdate::Updated(TelemetryUpdate::Altitude(10.0)));
    assert_eq!(updates[1], FieldUpdate::Ignored("checksum".to_string()));
    // Only the canonical Vx/Vy spellings are recognized.
    assert_eq!(updates[2], FieldUpdate::Ignored("Xy".to_string()));
}

#[test]
fn decode_reports_bad_values_as_malformed() {
    let updates = codec::decode_telemetry("fuel:full\naltitude\nVx:");
    assert_eq!(
        updates,
        vec![
            FieldUpdate::Malformed(TelemetryKey::Fuel),
            FieldUpdate::Malformed(TelemetryKey::Altitude),
            FieldUpdate::Malformed(TelemetryKey::VelX),
        ]
    );
}

#[test]
fn decode_accepts_leading_numeric_prefix() {
    let updates = codec::decode_telemetry("altitude:12.5mbar\norientation:3:4");
    assert_eq!(updates[0], FieldUpdate::Updated(TelemetryUpdate::Altitude(12.5)));
    assert_eq!(updates[1], FieldUpdate::Updated(TelemetryUpdate::Orientation(3)));
}

#[test]
fn malformed_fields_zero_previous_values() {
    let mut state = ControllerState::new();
    state.apply_reply(&codec::decode_telemetry("fuel:80.00"));
    state.apply_reply(&codec::decode_telemetry("fuel:empty"));
    assert!(state.snapshot().fuel.abs() < EPS);
}

#[test]
fn missing_keys_keep_previous_values() {
    let mut state = ControllerState::new();
    state.apply_reply(&codec::decode_telemetry("altitude:50.00\nfuel:80.00\nflying:1"));
    let applied = state.apply_reply(&codec::decode_telemetry("altitude:45.00"));
    assert_eq!(applied, 1);

    let snapshot = state.snapshot();
    assert!((snapshot.altitude - 45.0).abs() < EPS);
    assert!((snapshot.fuel - 80.0).abs() < EPS);
    assert!(snapshot.flying);
}

#[test]
fn snapshot_roundtrips_through_telemetry_decoder() {
    let mut state = ControllerState::new();
    state.apply_reply(&codec::decode_telemetry(
        "altitude:120.56\nfuel:95.12\nflying:1\ncrashed:0\norientation:3\nVx:2\nVy:-1",
    ));
    let encoded = codec::encode_snapshot(&state.snapshot());

    // The dashboard message decodes with the reply decoder, the command
    // marker line is the only unrecognized one.
    let mut mirror = ControllerState::new();
    let updates = codec::decode_telemetry(&encoded);
    assert_eq!(updates[0], FieldUpdate::Ignored("command".to_string()));
    mirror.apply_reply(&updates);

    let original = state.snapshot();
    let copy = mirror.snapshot();
    assert!((original.altitude - copy.altitude).abs() < 0.005);
    assert!((original.fuel - copy.fuel).abs() < 0.005);
    assert_eq!(original.flying, copy.flying);
    assert_eq!(original.crashed, copy.crashed);
    assert_eq!(original.orientation, copy.orientation);
    assert_eq!(original.vel, copy.vel);
}

#[tokio::test]
async fn exchange_sends_command_and_applies_reply() {
    let state = Arc::new(RwLock::new(ControllerState::new()));
    state.write().await.set_command(42.0, 0.5);
    let (link, peer) = link_to_peer().await;
    let lander = LanderLink::new(link, Arc::clone(&state));

    let fake_lander = tokio::spawn(async move {
        let mut buffer = [0u8; 512];
        let (n, source) = peer.recv_from(&mut buffer).await.unwrap();
        let reply = "altitude:120.50\nfuel:95.00\nflying:1\ncrashed:0\norientation:3\nVx:2\nVy:-1";
        peer.send_to(reply.as_bytes(), source).await.unwrap();
        String::from_utf8_lossy(&buffer[..n]).into_owned()
    });

    let outcome = lander.exchange().await.unwrap();
    assert_eq!(outcome, ExchangeOutcome::Updated(7));
    assert_eq!(fake_lander.await.unwrap(), "command:!\nthrottle:42\nroll:0.500");

    let snapshot = state.read().await.snapshot();
    assert!((snapshot.altitude - 120.5).abs() < EPS);
    assert!((snapshot.fuel - 95.0).abs() < EPS);
    assert!(snapshot.flying);
    assert!(!snapshot.crashed);
    assert_eq!(snapshot.vel, (2, -1));
    assert!(snapshot.last_update.is_some());
}

#[tokio::test]
async fn exchange_times_out_against_silent_peer() {
    let state = Arc::new(RwLock::new(ControllerState::new()));
    let (link, _peer) = link_to_peer().await;
    let lander = LanderLink::new(link, Arc::clone(&state));

    let outcome = lander.exchange().await.unwrap();
    assert_eq!(outcome, ExchangeOutcome::TimedOut);
    assert!(state.read().await.snapshot().last_update.is_none());
}

#[tokio::test]
async fn empty_reply_is_no_update() {
    let state = Arc::new(RwLock::new(ControllerState::new()));
    let (link, peer) = link_to_peer().await;
    let lander = LanderLink::new(link, Arc::clone(&state));

    tokio::spawn(async move {
        let mut buffer = [0u8; 512];
        let (_, source) = peer.recv_from(&mut buffer).await.unwrap();
        peer.send_to(b"", source).await.unwrap();
    });

    let outcome = lander.exchange().await.unwrap();
    assert_eq!(outcome, ExchangeOutcome::Empty);
    assert!(state.read().await.snapshot().last_update.is_none());
}

#[tokio::test]
async fn publish_sends_one_snapshot_datagram() {
    let dash = UdpSocket::bind(loopback()).await.unwrap();
    let dash_addr = dash.local_addr().unwrap();
    let link =
        Arc::new(UdpLink::bind(loopback(), dash_addr, dash_addr).await.unwrap());
    let state = Arc::new(RwLock::new(ControllerState::new()));
    let publisher = DashboardPublisher::new(link, Arc::clone(&state));

    publisher.publish().await.unwrap();

    let mut buffer = [0u8; 512];
    let (n, _) = dash.recv_from(&mut buffer).await.unwrap();
    let message = String::from_utf8_lossy(&buffer[..n]).into_owned();
    assert_eq!(
        message,
        "command:=\naltitude:0.00\nfuel:100.00\nflying:0\ncrashed:0\norientation:0\nVx:0\nVy:0"
    );
}
