//! WiFi station connector.
//!
//! [`WifiConnector`] stores network credentials and drives a [`Station`]
//! driver until it reports an association. It does not reconnect on its own;
//! once associated, keeping the link up is the platform's job.
//!
//! ```rust
//! use core::net::Ipv4Addr;
//! use embedded_hal::delay::DelayNs;
//! use loadcell_mqtt::network::{LinkStatus, Station};
//! use loadcell_mqtt::network::wifi::WifiConnector;
//!
//! struct Radio { polls: u32 }
//!
//! impl Station for Radio {
//!     fn begin(&mut self, _ssid: &str, _passphrase: &str) {}
//!     fn status(&mut self) -> LinkStatus {
//!         self.polls += 1;
//!         if self.polls > 2 { LinkStatus::Connected } else { LinkStatus::Disconnected }
//!     }
//!     fn local_ip(&self) -> Option<Ipv4Addr> { Some(Ipv4Addr::new(10, 0, 0, 7)) }
//! }
//!
//! struct NoDelay;
//! impl DelayNs for NoDelay { fn delay_ns(&mut self, _ns: u32) {} }
//!
//! let mut wifi = WifiConnector::new(Radio { polls: 0 }, "barn", "hunter22").unwrap();
//! wifi.connect(&mut NoDelay).unwrap();
//! assert_eq!(wifi.local_ip(), Some(Ipv4Addr::new(10, 0, 0, 7)));
//! ```

use core::net::Ipv4Addr;

use embedded_hal::delay::DelayNs;
use heapless::String;
use log::{debug, info, warn};

use super::error::Error;
use super::retry::RetryPolicy;
use super::{LinkStatus, Station};

/// Maximum SSID length in bytes (IEEE 802.11).
pub const MAX_SSID_LEN: usize = 32;
/// Maximum WPA2 passphrase length in bytes.
pub const MAX_PASSPHRASE_LEN: usize = 64;

/// Interval between status polls while associating.
pub const DEFAULT_POLL_INTERVAL_MS: u32 = 500;

/// Network credentials for station mode.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    ssid: String<MAX_SSID_LEN>,
    passphrase: String<MAX_PASSPHRASE_LEN>,
}

impl Credentials {
    /// Copy `ssid` and `passphrase` into fixed buffers.
    ///
    /// Fails with [`Error::InvalidCredentials`] if either value is too long.
    pub fn new(ssid: &str, passphrase: &str) -> Result<Self, Error> {
        Ok(Self {
            ssid: String::try_from(ssid).map_err(|_| Error::InvalidCredentials)?,
            passphrase: String::try_from(passphrase).map_err(|_| Error::InvalidCredentials)?,
        })
    }

    /// Network name.
    pub fn ssid(&self) -> &str {
        &self.ssid
    }

    /// Network passphrase.
    pub fn passphrase(&self) -> &str {
        &self.passphrase
    }
}

// The passphrase stays out of logs and panic messages.
impl core::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Credentials")
            .field("ssid", &self.ssid)
            .field("passphrase", &"***")
            .finish()
    }
}

/// Associates a [`Station`] with a network and waits for the link.
#[derive(Debug)]
pub struct WifiConnector<S: Station> {
    station: S,
    credentials: Credentials,
    retry: RetryPolicy,
}

impl<S: Station> WifiConnector<S> {
    /// Store credentials for `station`. Nothing is sent to the radio yet.
    pub fn new(station: S, ssid: &str, passphrase: &str) -> Result<Self, Error> {
        Ok(Self::with_credentials(station, Credentials::new(ssid, passphrase)?))
    }

    /// Build a connector from already validated credentials.
    pub fn with_credentials(station: S, credentials: Credentials) -> Self {
        Self {
            station,
            credentials,
            retry: RetryPolicy::forever(DEFAULT_POLL_INTERVAL_MS),
        }
    }

    /// Replace the polling policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Start association and block until the station reports
    /// [`LinkStatus::Connected`].
    ///
    /// `begin` is issued once; afterwards the status is polled, sleeping on
    /// `delay` between polls according to the retry policy. With the default
    /// unbounded policy this only returns once associated. With a bounded
    /// policy it returns [`Error::AssociationFailed`] when the budget of
    /// status polls is spent.
    pub fn connect<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Error> {
        info!("Connecting to WPA SSID [{}]", self.credentials.ssid());
        self.station
            .begin(self.credentials.ssid(), self.credentials.passphrase());

        let mut attempt: u32 = 1;
        loop {
            let status = self.station.status();
            if status.is_connected() {
                break;
            }
            if !self.retry.allows(attempt + 1) {
                warn!(
                    "WiFi association gave up after {} polls (last status {:?})",
                    attempt, status
                );
                return Err(Error::AssociationFailed);
            }
            debug!("WiFi status {:?}, waiting", status);
            delay.delay_ms(self.retry.delay_for(attempt));
            attempt = attempt.saturating_add(1);
        }

        match self.station.local_ip() {
            Some(ip) => info!("WiFi connected, IP address is {}", ip),
            None => info!("WiFi connected"),
        }
        Ok(())
    }

    /// Whether the station currently reports an association.
    pub fn is_connected(&mut self) -> bool {
        self.station.status() == LinkStatus::Connected
    }

    /// Address assigned to the station, if any.
    pub fn local_ip(&self) -> Option<Ipv4Addr> {
        self.station.local_ip()
    }

    /// Stored credentials.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Active polling policy.
    pub fn retry(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Get the underlying station driver
    pub fn station(&self) -> &S {
        &self.station
    }

    /// Get a mutable reference to the underlying station driver
    pub fn station_mut(&mut self) -> &mut S {
        &mut self.station
    }

    /// Release the station driver.
    pub fn into_inner(self) -> S {
        self.station
    }
}
