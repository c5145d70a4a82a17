//! Device configuration.
//!
//! [`DeviceConfig`] gathers everything a load-cell node needs at boot: WiFi
//! credentials, the broker endpoint, the MQTT client identifier and the retry
//! schedules for both connect loops. [`DeviceConfig::default`] carries
//! placeholder credentials; firmware overrides them with the builder methods.
//!
//! ```rust
//! use loadcell_mqtt::config::DeviceConfig;
//! use loadcell_mqtt::loadcell::SensorId;
//! use loadcell_mqtt::network::retry::RetryPolicy;
//!
//! let config = DeviceConfig::default()
//!     .with_wifi("barn", "hunter22")?
//!     .with_broker("10.0.0.5", 1883)?
//!     .with_client_id("loadcell2")?
//!     .with_sensor(SensorId::Two)
//!     .with_mqtt_retry(RetryPolicy::bounded(10, 1_000));
//!
//! assert_eq!(config.broker()?.host(), "10.0.0.5");
//! assert_eq!(config.session_options().keep_alive_seconds, 30);
//! # Ok::<(), loadcell_mqtt::network::error::Error>(())
//! ```

use heapless::String;

use crate::loadcell::SensorId;
use crate::network::application::mqtt::session::{
    DEFAULT_CONNECT_INTERVAL_MS, DEFAULT_KEEP_ALIVE_SECONDS, MAX_HOST_LEN,
};
use crate::network::application::mqtt::{BrokerEndpoint, DEFAULT_PORT, MqttSession, Options};
use crate::network::error::Error;
use crate::network::retry::RetryPolicy;
use crate::network::wifi::{
    Credentials, DEFAULT_POLL_INTERVAL_MS, MAX_PASSPHRASE_LEN, MAX_SSID_LEN, WifiConnector,
};
use crate::network::{MqttTransport, Station};

/// Longest client identifier every MQTT 3.1.1 broker must accept.
pub const MAX_CLIENT_ID_LEN: usize = 23;

/// Placeholder SSID.
pub const DEFAULT_SSID: &str = "your-ssid";
/// Placeholder passphrase.
pub const DEFAULT_PASSPHRASE: &str = "your-password";
/// Broker on the feeder's local network.
pub const DEFAULT_BROKER_HOST: &str = "192.168.1.100";
/// Client identifier of the first load-cell node.
pub const DEFAULT_CLIENT_ID: &str = "loadcell1";

/// Boot-time configuration of a load-cell node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceConfig {
    /// Network name.
    pub ssid: String<MAX_SSID_LEN>,
    /// Network passphrase.
    pub passphrase: String<MAX_PASSPHRASE_LEN>,
    /// Broker host name or IP address.
    pub broker_host: String<MAX_HOST_LEN>,
    /// Broker TCP port.
    pub broker_port: u16,
    /// MQTT client identifier.
    pub client_id: String<MAX_CLIENT_ID_LEN>,
    /// Keep-alive advertised to the broker, in seconds.
    pub keep_alive_seconds: u16,
    /// Whether the broker discards session state between connections.
    pub clean_session: bool,
    /// Which load cell this node drives.
    pub sensor: SensorId,
    /// Status-poll schedule while associating with the access point.
    pub wifi_retry: RetryPolicy,
    /// Attempt schedule for broker connects.
    pub mqtt_retry: RetryPolicy,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            ssid: String::try_from(DEFAULT_SSID).unwrap_or_default(),
            passphrase: String::try_from(DEFAULT_PASSPHRASE).unwrap_or_default(),
            broker_host: String::try_from(DEFAULT_BROKER_HOST).unwrap_or_default(),
            broker_port: DEFAULT_PORT,
            client_id: String::try_from(DEFAULT_CLIENT_ID).unwrap_or_default(),
            keep_alive_seconds: DEFAULT_KEEP_ALIVE_SECONDS,
            clean_session: true,
            sensor: SensorId::One,
            wifi_retry: RetryPolicy::forever(DEFAULT_POLL_INTERVAL_MS),
            mqtt_retry: RetryPolicy::forever(DEFAULT_CONNECT_INTERVAL_MS),
        }
    }
}

impl DeviceConfig {
    /// Set WiFi credentials.
    pub fn with_wifi(mut self, ssid: &str, passphrase: &str) -> Result<Self, Error> {
        self.ssid = String::try_from(ssid).map_err(|_| Error::InvalidCredentials)?;
        self.passphrase = String::try_from(passphrase).map_err(|_| Error::InvalidCredentials)?;
        Ok(self)
    }

    /// Set the broker endpoint.
    pub fn with_broker(mut self, host: &str, port: u16) -> Result<Self, Error> {
        if host.is_empty() {
            return Err(Error::InvalidAddress);
        }
        self.broker_host = String::try_from(host).map_err(|_| Error::InvalidAddress)?;
        self.broker_port = port;
        Ok(self)
    }

    /// Set the MQTT client identifier.
    pub fn with_client_id(mut self, client_id: &str) -> Result<Self, Error> {
        if client_id.is_empty() {
            return Err(Error::InvalidClientId);
        }
        self.client_id = String::try_from(client_id).map_err(|_| Error::InvalidClientId)?;
        Ok(self)
    }

    /// Select the load cell.
    pub fn with_sensor(mut self, sensor: SensorId) -> Self {
        self.sensor = sensor;
        self
    }

    /// Replace the WiFi polling schedule.
    pub fn with_wifi_retry(mut self, retry: RetryPolicy) -> Self {
        self.wifi_retry = retry;
        self
    }

    /// Replace the broker connect schedule.
    pub fn with_mqtt_retry(mut self, retry: RetryPolicy) -> Self {
        self.mqtt_retry = retry;
        self
    }

    /// Broker endpoint built from the configured host and port.
    pub fn broker(&self) -> Result<BrokerEndpoint, Error> {
        BrokerEndpoint::new(&self.broker_host, self.broker_port)
    }

    /// Session options built from keep-alive, clean-session and the MQTT
    /// retry policy.
    pub fn session_options(&self) -> Options {
        Options {
            keep_alive_seconds: self.keep_alive_seconds,
            clean_session: self.clean_session,
            connect_retry: self.mqtt_retry,
        }
    }

    /// A connector for `station` holding the configured credentials.
    pub fn wifi_connector<S: Station>(&self, station: S) -> Result<WifiConnector<S>, Error> {
        let credentials = Credentials::new(&self.ssid, &self.passphrase)?;
        Ok(WifiConnector::with_credentials(station, credentials).with_retry(self.wifi_retry))
    }

    /// A session on `transport` subscribed to the configured sensor's topics.
    pub fn session<T: MqttTransport>(
        &self,
        transport: T,
    ) -> Result<MqttSession<'static, T>, Error> {
        Ok(MqttSession::with_options(
            transport,
            self.broker()?,
            self.sensor.subscriptions(),
            self.session_options(),
        ))
    }
}
