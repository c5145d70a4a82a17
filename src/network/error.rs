//! Common error types for network operations

/// A common error type for the WiFi and MQTT layers.
///
/// Per-topic subscribe failures are not errors; they are reported through
/// [`SubscribeReport`](crate::network::application::mqtt::SubscribeReport).
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// The SSID or passphrase does not fit the credential buffers.
    InvalidCredentials,
    /// The broker host is empty or does not fit the endpoint buffer.
    InvalidAddress,
    /// The MQTT client identifier is empty or too long.
    InvalidClientId,
    /// A bounded retry policy ran out before the station associated.
    AssociationFailed,
    /// A bounded retry policy ran out before the broker accepted the connection.
    ConnectFailed,
    /// The transport rejected a publish.
    PublishFailed,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::InvalidCredentials => defmt::write!(f, "InvalidCredentials"),
            Error::InvalidAddress => defmt::write!(f, "InvalidAddress"),
            Error::InvalidClientId => defmt::write!(f, "InvalidClientId"),
            Error::AssociationFailed => defmt::write!(f, "AssociationFailed"),
            Error::ConnectFailed => defmt::write!(f, "ConnectFailed"),
            Error::PublishFailed => defmt::write!(f, "PublishFailed"),
        }
    }
}
