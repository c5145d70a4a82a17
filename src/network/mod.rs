//! A network abstraction layer for load-cell firmware
//!
//! The traits in this module describe the collaborators the firmware glue
//! delegates to: the WiFi station driver and an MQTT client library. Neither
//! the association handshake nor the MQTT wire protocol is implemented here;
//! a board support crate implements [`Station`] and [`MqttTransport`] on top of
//! its vendor stack and hands them to [`WifiConnector`](wifi::WifiConnector)
//! and [`MqttSession`](application::mqtt::MqttSession).
//!

#![deny(unsafe_code)]

use core::net::Ipv4Addr;

/// Common error types for network operations
pub mod error;

/// Retry policies for the blocking connect loops
pub mod retry;

/// WiFi station connector
pub mod wifi;

/// Application layer sessions running over the station link
pub mod application;

#[cfg(feature = "std")]
mod delay;

#[cfg(feature = "std")]
pub use delay::StdDelay;

/// Re-exports of common traits
pub mod prelude {
    pub use super::{MessageSink, MqttTransport, Station};
    pub use embedded_hal::delay::DelayNs;
}

/// Association state reported by a WiFi station driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    /// The radio is up but no association has been requested.
    Idle,
    /// The configured SSID is not visible.
    NoSsidAvailable,
    /// Association and DHCP finished; the station has an address.
    Connected,
    /// The access point refused the association.
    ConnectFailed,
    /// The passphrase was rejected.
    WrongPassword,
    /// A previously associated link went away.
    ConnectionLost,
    /// Not associated.
    Disconnected,
}

impl LinkStatus {
    /// Returns `true` only for [`LinkStatus::Connected`].
    pub fn is_connected(self) -> bool {
        self == LinkStatus::Connected
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for LinkStatus {
    fn format(&self, f: defmt::Formatter) {
        match self {
            LinkStatus::Idle => defmt::write!(f, "Idle"),
            LinkStatus::NoSsidAvailable => defmt::write!(f, "NoSsidAvailable"),
            LinkStatus::Connected => defmt::write!(f, "Connected"),
            LinkStatus::ConnectFailed => defmt::write!(f, "ConnectFailed"),
            LinkStatus::WrongPassword => defmt::write!(f, "WrongPassword"),
            LinkStatus::ConnectionLost => defmt::write!(f, "ConnectionLost"),
            LinkStatus::Disconnected => defmt::write!(f, "Disconnected"),
        }
    }
}

/// A WiFi station driver.
pub trait Station {
    /// Start associating with `ssid`. Returns immediately; progress is observed
    /// through [`Station::status`].
    fn begin(&mut self, ssid: &str, passphrase: &str);
    /// Current association state.
    fn status(&mut self) -> LinkStatus;
    /// Address assigned to the station, once associated.
    fn local_ip(&self) -> Option<Ipv4Addr>;
}

/// Receiver for incoming MQTT messages.
///
/// The transport calls [`MessageSink::deliver`] synchronously from inside
/// [`MqttTransport::service`], once per queued message.
pub trait MessageSink {
    /// Accept one message.
    fn deliver(&mut self, topic: &str, payload: &[u8]);
}

impl<F> MessageSink for F
where
    F: FnMut(&str, &[u8]),
{
    fn deliver(&mut self, topic: &str, payload: &[u8]) {
        self(topic, payload)
    }
}

/// An MQTT client library riding on an already established link.
///
/// Implementations own the socket, the framing, and keep-alive handling.
pub trait MqttTransport {
    /// Associated error type
    type Error: core::fmt::Debug;

    /// Bind the client to a broker. No I/O happens until [`MqttTransport::connect`].
    fn begin(&mut self, host: &str, port: u16);
    /// Keep-alive interval advertised in CONNECT.
    fn set_keep_alive(&mut self, seconds: u16);
    /// Clean-session flag advertised in CONNECT.
    fn set_clean_session(&mut self, clean: bool);
    /// Open the connection and perform the CONNECT/CONNACK handshake.
    fn connect(&mut self, client_id: &str) -> Result<(), Self::Error>;
    /// Subscribe to a single topic filter.
    fn subscribe(&mut self, topic: &str) -> Result<(), Self::Error>;
    /// Publish `payload` on `topic`.
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), Self::Error>;
    /// Whether the client currently believes it is connected.
    fn connected(&mut self) -> bool;
    /// Service pending I/O, handing every received message to `sink`.
    fn service(&mut self, sink: &mut dyn MessageSink) -> Result<(), Self::Error>;
}
