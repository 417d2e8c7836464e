use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::timeout;

/// A single UDP socket shared by both remote peers, preconfigured with the
/// lander and dashboard destination addresses.
#[derive(Debug)]
pub struct UdpLink {
    socket: UdpSocket,
    lander: SocketAddr,
    dashboard: SocketAddr,
}

impl UdpLink {
    /// Datagrams beyond this size are truncated on receive. Telemetry
    /// replies are a few dozen bytes, so the bound is generous.
    const MAX_DATAGRAM: usize = 512;

    /// Binds the controller socket and fixes both peer endpoints.
    pub async fn bind(
        local: SocketAddr,
        lander: SocketAddr,
        dashboard: SocketAddr,
    ) -> io::Result<UdpLink> {
        let socket = UdpSocket::bind(local).await?;
        Ok(UdpLink { socket, lander, dashboard })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> { self.socket.local_addr() }

    pub fn lander(&self) -> SocketAddr { self.lander }

    pub fn dashboard(&self) -> SocketAddr { self.dashboard }

    pub async fn send_lander(&self, payload: &str) -> io::Result<()> {
        self.socket.send_to(payload.as_bytes(), self.lander).await?;
        Ok(())
    }

    pub async fn send_dashboard(&self, payload: &str) -> io::Result<()> {
        self.socket.send_to(payload.as_bytes(), self.dashboard).await?;
        Ok(())
    }

    /// Waits up to `wait` for the next inbound datagram. Returns `None` on
    /// timeout. Only the bytes actually received are handed out, a
    /// zero-length datagram comes back as an empty string.
    pub async fn recv_reply(&self, wait: Duration) -> io::Result<Option<String>> {
        let mut buffer = [0u8; Self::MAX_DATAGRAM];
        match timeout(wait, self.socket.recv_from(&mut buffer)).await {
            Ok(received) => {
                let (n, _source) = received?;
                Ok(Some(String::from_utf8_lossy(&buffer[..n]).into_owned()))
            }
            Err(_elapsed) => Ok(None),
        }
    }
}
