#![allow(dead_code, clippy::similar_names)]
#![warn(clippy::shadow_reuse, clippy::shadow_same, clippy::builtin_type_shadow)]
mod comms;
mod control;
mod hardware;
mod keychain;
mod logger;

use crate::control::{FeedbackStateMachine, RenderOutcome};
use crate::hardware::{BenchInputs, LogPanel};
use crate::keychain::Keychain;
use std::{env, net::SocketAddr, time::Duration};

/// Rendering cadence of the feedback loop, looser than the control tick.
const RENDER_PERIOD: Duration = Duration::from_millis(500);

/// Reference deployment endpoints, overridable from the environment.
const DEF_LANDER_ADDR: &str = "192.168.80.9:65200";
const DEF_DASHBOARD_ADDR: &str = "192.168.80.6:65250";

#[tokio::main(flavor = "multi_thread", worker_threads = 4)]
async fn main() {
    let lander = resolve_addr("LANDER_ADDR", DEF_LANDER_ADDR);
    let dashboard = resolve_addr("DASHBOARD_ADDR", DEF_DASHBOARD_ADDR);
    let keychain = init(lander, dashboard).await;

    let supervisor = keychain.supervisor();
    let cancel = supervisor.cancellation_token();
    let ticker = tokio::spawn(supervisor.run());

    let mut feedback = FeedbackStateMachine::new(Box::new(LogPanel::new()));
    loop {
        let snapshot = keychain.state().read().await.snapshot();
        match feedback.render(&snapshot).await {
            RenderOutcome::Touchdown => break,
            RenderOutcome::Continue => {}
        }
        tokio::time::sleep(RENDER_PERIOD).await;
    }

    // Stop the periodic tasks before exiting.
    cancel.cancel();
    if let Err(e) = ticker.await {
        error!("Supervisor task aborted: {e}");
    }
    info!("Controller shut down");
}

fn resolve_addr(var: &str, default: &str) -> SocketAddr {
    let configured = env::var(var);
    let value = configured.as_ref().map_or(default, |v| v.as_str());
    value.parse().unwrap_or_else(|_| fatal!("{var} is not a valid ip:port pair: {value}"))
}

async fn init(lander: SocketAddr, dashboard: SocketAddr) -> Keychain {
    let keychain = Keychain::new(lander, dashboard, Box::new(BenchInputs::new())).await;
    let link = keychain.link();
    match link.local_addr() {
        Ok(local) => info!("Controller bound on {local}"),
        Err(e) => warn!("Controller socket has no local address: {e}"),
    }
    info!("Lander is on {}", link.lander());
    info!("Dash   is on {}", link.dashboard());
    keychain
}
