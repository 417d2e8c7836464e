use super::codec::{self, FieldUpdate};
use super::udp_link::UdpLink;
use crate::control::ControllerState;
use crate::{event, warn};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use strum_macros::Display;
use tokio::sync::RwLock;

/// Result of one command/telemetry round trip.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeOutcome {
    /// A reply arrived and the given number of fields were updated.
    Updated(usize),
    /// A zero-length reply arrived, state is kept for this tick.
    Empty,
    /// No reply within the wait bound, state is kept for this tick.
    TimedOut,
}

/// Synchronous request/response leg to the lander: one command out, one
/// telemetry reply in, applied to the shared state.
pub struct LanderLink {
    link: Arc<UdpLink>,
    state: Arc<RwLock<ControllerState>>,
}

impl LanderLink {
    /// Reply wait bound. Kept well below the scheduler tick so a silent
    /// lander cannot starve input sampling or the dashboard feed.
    pub const REPLY_TIMEOUT: Duration = Duration::from_millis(25);

    pub fn new(link: Arc<UdpLink>, state: Arc<RwLock<ControllerState>>) -> Self {
        Self { link, state }
    }

    /// Performs one round trip. Lost requests are not retried, the next
    /// tick sends a fresh command anyway.
    pub async fn exchange(&self) -> io::Result<ExchangeOutcome> {
        let message = {
            let state = self.state.read().await;
            codec::encode_command(state.throttle(), state.roll())
        };
        self.link.send_lander(&message).await?;

        let Some(reply) = self.link.recv_reply(Self::REPLY_TIMEOUT).await? else {
            return Ok(ExchangeOutcome::TimedOut);
        };
        if reply.is_empty() {
            return Ok(ExchangeOutcome::Empty);
        }

        let updates = codec::decode_telemetry(&reply);
        for update in &updates {
            match update {
                FieldUpdate::Malformed(key) => {
                    warn!("unparsable telemetry value for {key}, defaulting to zero");
                }
                FieldUpdate::Ignored(key) => event!("ignoring unknown telemetry key {key}"),
                FieldUpdate::Updated(_) => {}
            }
        }
        let applied = self.state.write().await.apply_reply(&updates);
        Ok(ExchangeOutcome::Updated(applied))
    }
}
