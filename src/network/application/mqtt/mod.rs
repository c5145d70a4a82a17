//! MQTT session layer for load-cell nodes.
//!
//! This module wraps an MQTT client library (anything implementing
//! [`MqttTransport`](crate::network::MqttTransport)) in a session that knows
//! its broker, subscribes to a fixed topic list after every connect, and
//! remembers the last message it received.
//!
//! # Lifecycle
//!
//! ```text
//!            connect() ok
//! Disconnected ──────────────▶ Connected ──┐ poll(): transport still up,
//!      ▲  │                        │       │ deliveries serviced
//!      │  └─ retry per policy      │ ◀─────┘
//!      │                           │
//!      └──── poll() sees the ──────┘
//!            link down, reconnects
//! ```
//!
//! Disconnects are detected lazily: only [`MqttSession::poll`] asks the
//! transport whether it is still connected, and it is also what drives
//! message delivery. Call it on every iteration of the main loop.
//!
//! # Message slot
//!
//! Each session owns a [`LastMessage`]. The transport writes into it while
//! `poll` runs; a newer message replaces an unread one. Read it with
//! [`MqttSession::topic`] / [`MqttSession::message`] and clear it with
//! [`MqttSession::reset_message`].

/// Last-message slot.
pub mod message;

/// Session, endpoint and options.
pub mod session;

pub use message::{LastMessage, MAX_PAYLOAD_LEN, MAX_TOPIC_LEN};
pub use session::{
    BrokerEndpoint, DEFAULT_PORT, MqttSession, Options, PollOutcome, SubscribeReport,
};
