//! Main-loop driver for one load-cell node.

use embedded_hal::delay::DelayNs;
use log::{info, warn};

use super::payload::{Command, WeightReport};
use super::{Error, SensorId};
use crate::network::MqttTransport;
use crate::network::application::mqtt::{MqttSession, SubscribeReport};

/// One sensor's view of the feeder backend.
///
/// Wraps an [`MqttSession`] subscribed to the sensor's topics, turns the
/// session's last message into a [`Command`], and tracks whether reporting
/// is enabled.
#[derive(Debug)]
pub struct LoadcellNode<'a, T: MqttTransport> {
    session: MqttSession<'a, T>,
    sensor: SensorId,
    enabled: bool,
}

impl<'a, T: MqttTransport> LoadcellNode<'a, T> {
    /// Drive `sensor` over `session`. Reporting starts enabled.
    ///
    /// The session should be subscribed to
    /// [`SensorId::subscriptions`]; see
    /// [`DeviceConfig::session`](crate::config::DeviceConfig::session).
    pub fn new(session: MqttSession<'a, T>, sensor: SensorId) -> Self {
        Self {
            session,
            sensor,
            enabled: true,
        }
    }

    /// Connect the session to the broker.
    pub fn connect<D: DelayNs>(
        &mut self,
        client_id: &str,
        delay: &mut D,
    ) -> Result<SubscribeReport, Error> {
        Ok(self.session.connect(client_id, delay)?)
    }

    /// Run one main-loop iteration.
    ///
    /// Polls the session (reconnecting if needed), then consumes the last
    /// message, if any. Commands for this sensor update the enabled flag and
    /// are returned so the caller can act on [`Command::Measure`]. Messages
    /// that do not decode are logged and discarded; commands for the other
    /// sensor are ignored.
    pub fn step<D: DelayNs>(
        &mut self,
        client_id: &str,
        delay: &mut D,
    ) -> Result<Option<Command>, Error> {
        self.session.poll(client_id, delay)?;
        if !self.session.has_message() {
            return Ok(None);
        }

        let decoded = Command::parse(self.session.topic(), self.session.message());
        let command = match decoded {
            Ok(Some(command)) if command.targets(self.sensor) => command,
            Ok(_) => {
                self.session.reset_message();
                return Ok(None);
            }
            Err(e) => {
                warn!(
                    "Ignoring message on [{}]: {:?}",
                    self.session.topic(),
                    e
                );
                self.session.reset_message();
                return Ok(None);
            }
        };
        self.session.reset_message();

        match command {
            Command::SensorControl { enable, .. } | Command::WeightEnable(enable) => {
                self.enabled = enable;
                info!(
                    "{} reporting {}",
                    self.sensor.report_topic(),
                    if enable { "enabled" } else { "disabled" }
                );
            }
            Command::Measure(_) => {}
        }
        Ok(Some(command))
    }

    /// Publish a weight reading.
    ///
    /// Returns `Ok(false)` when reporting is disabled or the session is not
    /// connected.
    pub fn report(&mut self, kilograms: f32) -> Result<bool, Error> {
        if !self.enabled {
            return Ok(false);
        }
        let payload = WeightReport::encode(kilograms)?;
        Ok(self
            .session
            .publish(self.sensor.report_topic(), payload.as_bytes())?)
    }

    /// Whether weight reports are currently sent.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The sensor this node drives.
    pub fn sensor(&self) -> SensorId {
        self.sensor
    }

    /// Get the underlying session
    pub fn session(&self) -> &MqttSession<'a, T> {
        &self.session
    }

    /// Get a mutable reference to the underlying session
    pub fn session_mut(&mut self) -> &mut MqttSession<'a, T> {
        &mut self.session
    }
}
