//! Load-cell node message contract.
//!
//! A load-cell node measures weight and talks to the feeder backend over
//! MQTT. This module pins down the topics and payloads both sides agree on:
//!
//! | Topic                  | Direction        | Payload                               |
//! |------------------------|------------------|---------------------------------------|
//! | `weightSensorN`        | node → backend   | `{"weight":"12.34"}`                  |
//! | `weightSensorN`        | backend → node   | `{"command":"measure","timestamp":…}` |
//! | `weightSensorNControl` | backend → node   | `enable` / `disable`                  |
//! | `weightEnable`         | backend → node   | `{"enable":true}`                     |
//!
//! Because reports and measure requests share `weightSensorN`, a node
//! subscribed to its own report topic sees its reports echoed back;
//! [`Command::parse`] recognises and skips them.

#![deny(unsafe_code)]

use crate::network::error::Error as NetworkError;

/// Typed payloads and command decoding
pub mod payload;

/// Application loop for a single sensor node
pub mod node;

pub use node::LoadcellNode;
pub use payload::{Command, WeightReport};

/// Weight reports and measure requests for sensor 1 (pet weight).
pub const WEIGHT_SENSOR1: &str = "weightSensor1";
/// Weight reports and measure requests for sensor 2 (food level).
pub const WEIGHT_SENSOR2: &str = "weightSensor2";
/// Enable/disable control for sensor 1.
pub const WEIGHT_SENSOR1_CONTROL: &str = "weightSensor1Control";
/// Enable/disable control for sensor 2.
pub const WEIGHT_SENSOR2_CONTROL: &str = "weightSensor2Control";
/// Global weight reporting switch.
pub const WEIGHT_ENABLE: &str = "weightEnable";

const SENSOR1_SUBSCRIPTIONS: &[&str] = &[WEIGHT_SENSOR1_CONTROL, WEIGHT_ENABLE, WEIGHT_SENSOR1];
const SENSOR2_SUBSCRIPTIONS: &[&str] = &[WEIGHT_SENSOR2_CONTROL, WEIGHT_ENABLE, WEIGHT_SENSOR2];

/// Which of the feeder's two load cells a node drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorId {
    /// Pet weight scale.
    One,
    /// Food container scale.
    Two,
}

impl SensorId {
    /// Topic this sensor publishes reports on and receives measure requests on.
    pub const fn report_topic(self) -> &'static str {
        match self {
            SensorId::One => WEIGHT_SENSOR1,
            SensorId::Two => WEIGHT_SENSOR2,
        }
    }

    /// Topic carrying `enable` / `disable` for this sensor.
    pub const fn control_topic(self) -> &'static str {
        match self {
            SensorId::One => WEIGHT_SENSOR1_CONTROL,
            SensorId::Two => WEIGHT_SENSOR2_CONTROL,
        }
    }

    /// Topics a node for this sensor subscribes to, in subscription order.
    pub const fn subscriptions(self) -> &'static [&'static str] {
        match self {
            SensorId::One => SENSOR1_SUBSCRIPTIONS,
            SensorId::Two => SENSOR2_SUBSCRIPTIONS,
        }
    }

    /// Sensor whose report topic is `topic`.
    pub fn from_report_topic(topic: &str) -> Option<Self> {
        match topic {
            WEIGHT_SENSOR1 => Some(SensorId::One),
            WEIGHT_SENSOR2 => Some(SensorId::Two),
            _ => None,
        }
    }

    /// Sensor whose control topic is `topic`.
    pub fn from_control_topic(topic: &str) -> Option<Self> {
        match topic {
            WEIGHT_SENSOR1_CONTROL => Some(SensorId::One),
            WEIGHT_SENSOR2_CONTROL => Some(SensorId::Two),
            _ => None,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for SensorId {
    fn format(&self, f: defmt::Formatter) {
        match self {
            SensorId::One => defmt::write!(f, "One"),
            SensorId::Two => defmt::write!(f, "Two"),
        }
    }
}

/// Errors from the load-cell layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A report could not be serialized (non-finite weight or buffer too small).
    Encode,
    /// An incoming payload was not in the expected format.
    Decode,
    /// A well-formed payload named a command this node does not know.
    UnknownCommand,
    /// The underlying session failed.
    Network(NetworkError),
}

impl From<NetworkError> for Error {
    fn from(err: NetworkError) -> Self {
        Error::Network(err)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::Encode => defmt::write!(f, "Encode"),
            Error::Decode => defmt::write!(f, "Decode"),
            Error::UnknownCommand => defmt::write!(f, "UnknownCommand"),
            Error::Network(e) => defmt::write!(f, "Network({})", e),
        }
    }
}
