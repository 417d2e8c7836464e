pub mod codec;
mod dashboard;
mod lander_link;
mod udp_link;
#[cfg(test)]
mod tests;

pub use dashboard::DashboardPublisher;
pub use lander_link::{ExchangeOutcome, LanderLink};
pub use udp_link::UdpLink;
