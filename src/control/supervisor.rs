use super::input_fusion::InputFusion;
use crate::comms::{DashboardPublisher, ExchangeOutcome, LanderLink};
use crate::{event, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;

/// Cooperative dispatcher for the periodic control tasks: input fusion,
/// the lander round trip and the dashboard publish run back to back, each
/// to completion, once per tick.
pub struct Supervisor {
    fusion: Mutex<InputFusion>,
    lander: LanderLink,
    dashboard: DashboardPublisher,
    cancel: CancellationToken,
}

impl Supervisor {
    /// Fixed control period. 50ms keeps the command stream responsive.
    pub const TICK_PERIOD: Duration = Duration::from_millis(50);

    pub fn new(fusion: InputFusion, lander: LanderLink, dashboard: DashboardPublisher) -> Self {
        Self {
            fusion: Mutex::new(fusion),
            lander,
            dashboard,
            cancel: CancellationToken::new(),
        }
    }

    /// Token the rendering loop cancels on touchdown to stop the periodic
    /// tasks before process exit.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Runs the tick loop until cancelled. A tick that runs long delays
    /// the next, there is no overrun handling beyond that.
    pub async fn run(self: Arc<Self>) {
        let mut tick = interval(Self::TICK_PERIOD);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut silent_ticks = 0u32;

        loop {
            tokio::select! {
                () = self.cancel.cancelled() => break,
                _ = tick.tick() => {}
            }

            let (throttle, roll) = self.fusion.lock().await.sample().await;
            event!("fused command: throttle {throttle:.1} roll {roll:.3}");

            match self.lander.exchange().await {
                Ok(ExchangeOutcome::Updated(applied)) => {
                    if silent_ticks > 0 {
                        info!("lander link recovered after {silent_ticks} silent ticks");
                        silent_ticks = 0;
                    }
                    event!("lander reply applied {applied} fields");
                }
                Ok(ExchangeOutcome::Empty) => event!("empty lander reply, keeping state"),
                Ok(ExchangeOutcome::TimedOut) => {
                    silent_ticks += 1;
                    if silent_ticks == 1 {
                        warn!("lander reply timed out, holding last telemetry");
                    }
                }
                Err(e) => warn!("lander exchange failed: {e}"),
            }

            if let Err(e) = self.dashboard.publish().await {
                warn!("dashboard publish failed: {e}");
            }
        }
        info!("supervisor stopped");
    }
}
