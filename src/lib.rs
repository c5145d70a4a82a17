//! # loadcell-mqtt - connectivity for load-cell feeder nodes
//!
//! A load-cell node is a microcontroller that weighs something (a pet, a food
//! container) and reports the reading to a feeder backend over MQTT. This
//! crate is the glue between the node's radio, its MQTT client library and the
//! application loop. It supports `no_std` environments.
//!
//! ## Features
//!
//! ### Network
//! - **WiFi connector**: stores credentials and blocks until the station
//!   associates, on an explicit retry policy
//! - **MQTT session**: binds a client library to a broker, subscribes to a
//!   fixed topic list after every connect and keeps the last received message
//!
//! ### Load cell
//! - Topic and payload contract shared with the feeder backend
//! - A per-sensor node driver that decodes commands and publishes reports
//!
//! ### Configuration
//! - Boot-time [`DeviceConfig`](config::DeviceConfig) with builders
//!
//! ## Usage
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! loadcell-mqtt = "0.1.0"
//! ```
//!
//! ### Main loop example
//!
//! ```rust,no_run
//! use loadcell_mqtt::config::DeviceConfig;
//! use loadcell_mqtt::loadcell::{Command, LoadcellNode};
//! # use core::net::Ipv4Addr;
//! # use loadcell_mqtt::network::{LinkStatus, MessageSink, MqttTransport, Station};
//! # struct Radio;
//! # impl Station for Radio {
//! #     fn begin(&mut self, _ssid: &str, _passphrase: &str) {}
//! #     fn status(&mut self) -> LinkStatus { LinkStatus::Connected }
//! #     fn local_ip(&self) -> Option<Ipv4Addr> { None }
//! # }
//! # struct Client;
//! # impl MqttTransport for Client {
//! #     type Error = ();
//! #     fn begin(&mut self, _host: &str, _port: u16) {}
//! #     fn set_keep_alive(&mut self, _seconds: u16) {}
//! #     fn set_clean_session(&mut self, _clean: bool) {}
//! #     fn connect(&mut self, _id: &str) -> Result<(), ()> { Ok(()) }
//! #     fn subscribe(&mut self, _topic: &str) -> Result<(), ()> { Ok(()) }
//! #     fn publish(&mut self, _topic: &str, _payload: &[u8]) -> Result<(), ()> { Ok(()) }
//! #     fn connected(&mut self) -> bool { true }
//! #     fn service(&mut self, _sink: &mut dyn MessageSink) -> Result<(), ()> { Ok(()) }
//! # }
//! # struct Delay;
//! # impl embedded_hal::delay::DelayNs for Delay { fn delay_ns(&mut self, _ns: u32) {} }
//! # fn read_scale() -> f32 { 4.2 }
//!
//! let config = DeviceConfig::default().with_wifi("barn", "hunter22")?;
//! let mut delay = Delay;
//!
//! let mut wifi = config.wifi_connector(Radio)?;
//! wifi.connect(&mut delay)?;
//!
//! let mut node = LoadcellNode::new(config.session(Client)?, config.sensor);
//! node.connect(&config.client_id, &mut delay)?;
//!
//! loop {
//!     if let Some(Command::Measure(_)) = node.step(&config.client_id, &mut delay)? {
//!         node.report(read_scale())?;
//!     }
//! }
//! # Ok::<(), loadcell_mqtt::loadcell::Error>(())
//! ```
//!
//! ## Optional Features
//!
//! - `std`: Enable standard library support and [`StdDelay`](network::StdDelay)
//!   (default: disabled)
//! - `defmt`: Enable defmt formatting of the public enums

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(missing_docs)]
#![warn(missing_debug_implementations)]

/// Network abstraction layer: WiFi association and the MQTT session.
///
/// The radio driver and the MQTT client library are collaborators behind
/// traits; this layer owns the connect loops, subscriptions and message
/// delivery.
pub mod network;

/// Topic and payload contract with the feeder backend, plus the node driver.
pub mod loadcell;

/// Boot-time device configuration.
pub mod config;
