//! # Application Layer Sessions
//!
//! Sessions that run over the station link once
//! [`WifiConnector::connect`](crate::network::wifi::WifiConnector::connect)
//! has returned.
//!
//! - **[`mqtt`]**: MQTT session with fixed subscriptions, last-message slot
//!   and poll-driven reconnect

/// MQTT session implementation.
///
/// Wraps an MQTT client library with a broker endpoint, a subscription list
/// and reconnect handling.
pub mod mqtt;
