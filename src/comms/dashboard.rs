use super::codec;
use super::udp_link::UdpLink;
use crate::control::ControllerState;
use std::io;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Fire-and-forget telemetry mirror to the dashboard endpoint. No reply is
/// awaited, delivery is whatever UDP makes of it.
pub struct DashboardPublisher {
    link: Arc<UdpLink>,
    state: Arc<RwLock<ControllerState>>,
}

impl DashboardPublisher {
    pub fn new(link: Arc<UdpLink>, state: Arc<RwLock<ControllerState>>) -> Self {
        Self { link, state }
    }

    /// Sends one full state snapshot, taken under a single read guard.
    pub async fn publish(&self) -> io::Result<()> {
        let snapshot = self.state.read().await.snapshot();
        self.link.send_dashboard(&codec::encode_snapshot(&snapshot)).await
    }
}
