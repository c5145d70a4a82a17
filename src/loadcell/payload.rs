//! Typed payloads exchanged with the feeder backend.

use core::fmt::Write;

use heapless::String;
use serde::{Deserialize, Serialize};

use super::{Error, SensorId, WEIGHT_ENABLE};

/// Capacity of an encoded weight report.
pub const REPORT_LEN: usize = 48;

const CONTROL_ENABLE: &str = "enable";
const CONTROL_DISABLE: &str = "disable";
const MEASURE: &str = "measure";

#[derive(Debug, Serialize, Deserialize)]
struct WeightJson<'a> {
    #[serde(borrow)]
    weight: &'a str,
}

#[derive(Debug, Deserialize)]
struct EnableJson {
    enable: bool,
}

#[derive(Debug, Deserialize)]
struct RequestJson<'a> {
    #[serde(borrow)]
    command: &'a str,
    #[serde(default, borrow)]
    #[allow(dead_code)]
    timestamp: Option<&'a str>,
}

/// Weight report published on a sensor's report topic.
///
/// The backend expects the weight as a decimal string inside a JSON object and
/// falls back to a bare number for older nodes.
///
/// ```rust
/// use loadcell_mqtt::loadcell::WeightReport;
///
/// let json = WeightReport::encode(12.344).unwrap();
/// assert_eq!(json.as_str(), r#"{"weight":"12.34"}"#);
/// assert_eq!(WeightReport::parse(json.as_bytes()), Ok(12.34));
/// assert_eq!(WeightReport::parse(b"7.5"), Ok(7.5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightReport;

impl WeightReport {
    /// Serialize `kilograms` with two decimals.
    pub fn encode(kilograms: f32) -> Result<String<REPORT_LEN>, Error> {
        if !kilograms.is_finite() {
            return Err(Error::Encode);
        }
        let mut value: String<24> = String::new();
        write!(value, "{:.2}", kilograms).map_err(|_| Error::Encode)?;
        serde_json_core::to_string(&WeightJson { weight: &value }).map_err(|_| Error::Encode)
    }

    /// Read a weight from either `{"weight":"…"}` or a plain number.
    pub fn parse(payload: &[u8]) -> Result<f32, Error> {
        let text = core::str::from_utf8(payload).map_err(|_| Error::Decode)?;
        let raw = match serde_json_core::from_str::<WeightJson>(text) {
            Ok((report, _)) => report.weight,
            Err(_) => text,
        };
        raw.trim().parse::<f32>().map_err(|_| Error::Decode)
    }
}

/// A command addressed to a load-cell node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Turn one sensor's reporting on or off.
    SensorControl {
        /// Target sensor.
        sensor: SensorId,
        /// New state.
        enable: bool,
    },
    /// Turn reporting on or off for every sensor.
    WeightEnable(bool),
    /// Take a measurement now and report it.
    Measure(SensorId),
}

impl Command {
    /// Decode a message received on `topic`.
    ///
    /// Returns `Ok(None)` for a weight report echoed back on a report topic,
    /// [`Error::Decode`] for malformed payloads, and
    /// [`Error::UnknownCommand`] for well-formed payloads on topics or with
    /// verbs this node does not handle.
    pub fn parse(topic: &str, payload: &str) -> Result<Option<Self>, Error> {
        if let Some(sensor) = SensorId::from_control_topic(topic) {
            return match payload.trim() {
                CONTROL_ENABLE => Ok(Some(Command::SensorControl {
                    sensor,
                    enable: true,
                })),
                CONTROL_DISABLE => Ok(Some(Command::SensorControl {
                    sensor,
                    enable: false,
                })),
                _ => Err(Error::UnknownCommand),
            };
        }

        if topic == WEIGHT_ENABLE {
            let (body, _) =
                serde_json_core::from_str::<EnableJson>(payload).map_err(|_| Error::Decode)?;
            return Ok(Some(Command::WeightEnable(body.enable)));
        }

        if let Some(sensor) = SensorId::from_report_topic(topic) {
            if serde_json_core::from_str::<WeightJson>(payload).is_ok() {
                return Ok(None);
            }
            let (request, _) =
                serde_json_core::from_str::<RequestJson>(payload).map_err(|_| Error::Decode)?;
            return if request.command == MEASURE {
                Ok(Some(Command::Measure(sensor)))
            } else {
                Err(Error::UnknownCommand)
            };
        }

        Err(Error::UnknownCommand)
    }

    /// Whether this command concerns `sensor`.
    pub fn targets(&self, sensor: SensorId) -> bool {
        match self {
            Command::SensorControl { sensor: s, .. } | Command::Measure(s) => *s == sensor,
            Command::WeightEnable(_) => true,
        }
    }
}
