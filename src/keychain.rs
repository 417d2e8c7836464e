use crate::comms::{DashboardPublisher, LanderLink, UdpLink};
use crate::control::{ControllerState, InputFusion, Supervisor};
use crate::fatal;
use crate::hardware::InputSource;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Struct bundling the key components of the controller, providing access
/// to the UDP link, the shared state and the periodic-task supervisor.
pub struct Keychain {
    /// The UDP link carrying both peer exchanges.
    link: Arc<UdpLink>,
    /// The shared command/telemetry state.
    state: Arc<RwLock<ControllerState>>,
    /// The supervisor owning the periodic control tasks.
    supervisor: Arc<Supervisor>,
}

impl Keychain {
    /// Creates a new instance of `Keychain` asynchronously.
    ///
    /// # Arguments
    /// - `lander`: the lander command/telemetry endpoint.
    /// - `dashboard`: the one-way dashboard endpoint.
    /// - `inputs`: the board support input source the fusion task samples.
    ///
    /// # Returns
    /// A new instance of `Keychain` containing initialized subsystems.
    pub async fn new(
        lander: SocketAddr,
        dashboard: SocketAddr,
        inputs: Box<dyn InputSource + Send>,
    ) -> Self {
        let local = SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0));
        let link = Arc::new(
            UdpLink::bind(local, lander, dashboard)
                .await
                .unwrap_or_else(|e| fatal!("Cannot open controller socket: {e}")),
        );
        let state = Arc::new(RwLock::new(ControllerState::new()));
        let fusion = InputFusion::new(inputs, Arc::clone(&state));
        let lander_link = LanderLink::new(Arc::clone(&link), Arc::clone(&state));
        let dashboard_pub = DashboardPublisher::new(Arc::clone(&link), Arc::clone(&state));
        let supervisor = Arc::new(Supervisor::new(fusion, lander_link, dashboard_pub));
        Self { link, state, supervisor }
    }

    /// Provides a cloned reference to the UDP link.
    pub fn link(&self) -> Arc<UdpLink> { Arc::clone(&self.link) }

    /// Provides a cloned reference to the shared state.
    pub fn state(&self) -> Arc<RwLock<ControllerState>> { Arc::clone(&self.state) }

    /// Provides a cloned reference to the supervisor.
    pub fn supervisor(&self) -> Arc<Supervisor> { Arc::clone(&self.supervisor) }
}
