#![allow(dead_code)]

use std::collections::VecDeque;
use std::net::Ipv4Addr;

use embedded_hal::delay::DelayNs;
use loadcell_mqtt::network::{LinkStatus, MessageSink, MqttTransport, Station};

/// Station that walks through a scripted list of statuses.
///
/// The last status repeats once the script runs out.
#[derive(Debug)]
pub struct MockStation {
    pub script: VecDeque<LinkStatus>,
    pub last: LinkStatus,
    pub begins: Vec<(String, String)>,
    pub polls: usize,
    pub ip: Option<Ipv4Addr>,
}

impl MockStation {
    pub fn new(script: &[LinkStatus]) -> Self {
        Self {
            script: script.iter().copied().collect(),
            last: LinkStatus::Idle,
            begins: Vec::new(),
            polls: 0,
            ip: Some(Ipv4Addr::new(192, 168, 1, 42)),
        }
    }

    /// Connected after `n` disconnected polls.
    pub fn connects_after(n: usize) -> Self {
        let mut script = vec![LinkStatus::Disconnected; n];
        script.push(LinkStatus::Connected);
        Self::new(&script)
    }
}

impl Station for MockStation {
    fn begin(&mut self, ssid: &str, passphrase: &str) {
        self.begins.push((ssid.to_string(), passphrase.to_string()));
    }

    fn status(&mut self) -> LinkStatus {
        self.polls += 1;
        if let Some(next) = self.script.pop_front() {
            self.last = next;
        }
        self.last
    }

    fn local_ip(&self) -> Option<Ipv4Addr> {
        if self.last.is_connected() { self.ip } else { None }
    }
}

/// Delay that records requested sleeps instead of sleeping.
#[derive(Debug, Default)]
pub struct MockDelay {
    pub sleeps_ms: Vec<u32>,
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.sleeps_ms.push(ns / 1_000_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.sleeps_ms.push(ms);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Begin(String, u16),
    KeepAlive(u16),
    CleanSession(bool),
    Connect(String),
    Subscribe(String),
    Publish(String, Vec<u8>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockError;

/// In-memory MQTT client library.
///
/// Records every state-changing call. Connect attempts consume
/// `connect_script` (true = accepted) and succeed once it is empty.
#[derive(Debug, Default)]
pub struct MockTransport {
    pub calls: Vec<Call>,
    pub connect_script: VecDeque<bool>,
    pub failing_topics: Vec<String>,
    pub fail_publish: bool,
    pub is_connected: bool,
    pub pending: VecDeque<(String, Vec<u8>)>,
    pub service_calls: usize,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the next `n` connect attempts.
    pub fn refusing(n: usize) -> Self {
        Self {
            connect_script: std::iter::repeat_n(false, n).collect(),
            ..Self::default()
        }
    }

    pub fn fail_subscribe(mut self, topic: &str) -> Self {
        self.failing_topics.push(topic.to_string());
        self
    }

    /// Queue a message for the next `service` call.
    pub fn inject(&mut self, topic: &str, payload: &[u8]) {
        self.pending.push_back((topic.to_string(), payload.to_vec()));
    }

    pub fn drop_link(&mut self) {
        self.is_connected = false;
    }

    pub fn connects(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::Connect(_)))
            .count()
    }

    pub fn subscribes(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Subscribe(topic) => Some(topic.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn publishes(&self) -> Vec<(String, Vec<u8>)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Publish(topic, payload) => Some((topic.clone(), payload.clone())),
                _ => None,
            })
            .collect()
    }
}

impl MqttTransport for MockTransport {
    type Error = MockError;

    fn begin(&mut self, host: &str, port: u16) {
        self.calls.push(Call::Begin(host.to_string(), port));
    }

    fn set_keep_alive(&mut self, seconds: u16) {
        self.calls.push(Call::KeepAlive(seconds));
    }

    fn set_clean_session(&mut self, clean: bool) {
        self.calls.push(Call::CleanSession(clean));
    }

    fn connect(&mut self, client_id: &str) -> Result<(), Self::Error> {
        self.calls.push(Call::Connect(client_id.to_string()));
        if self.connect_script.pop_front().unwrap_or(true) {
            self.is_connected = true;
            Ok(())
        } else {
            Err(MockError)
        }
    }

    fn subscribe(&mut self, topic: &str) -> Result<(), Self::Error> {
        self.calls.push(Call::Subscribe(topic.to_string()));
        if self.failing_topics.iter().any(|t| t == topic) {
            Err(MockError)
        } else {
            Ok(())
        }
    }

    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), Self::Error> {
        self.calls
            .push(Call::Publish(topic.to_string(), payload.to_vec()));
        if self.fail_publish { Err(MockError) } else { Ok(()) }
    }

    fn connected(&mut self) -> bool {
        self.is_connected
    }

    fn service(&mut self, sink: &mut dyn MessageSink) -> Result<(), Self::Error> {
        self.service_calls += 1;
        while let Some((topic, payload)) = self.pending.pop_front() {
            sink.deliver(&topic, &payload);
        }
        Ok(())
    }
}
