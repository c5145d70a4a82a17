//! MQTT session wrapper with fixed subscriptions and poll-driven reconnect.
use embedded_hal::delay::DelayNs;
use heapless::{String, Vec};
use log::{debug, info, warn};

use super::message::LastMessage;
use crate::network::MqttTransport;
use crate::network::error::Error;
use crate::network::retry::RetryPolicy;

/// Maximum broker host length in bytes.
pub const MAX_HOST_LEN: usize = 64;
/// Standard unencrypted MQTT port.
pub const DEFAULT_PORT: u16 = 1883;
/// Keep-alive advertised to the broker, in seconds.
pub const DEFAULT_KEEP_ALIVE_SECONDS: u16 = 30;
/// Interval between broker connect attempts.
pub const DEFAULT_CONNECT_INTERVAL_MS: u32 = 1_000;
/// Number of failed subscription indices a [`SubscribeReport`] keeps.
pub const MAX_REPORTED_FAILURES: usize = 16;

/// Address and port of the broker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerEndpoint {
    host: String<MAX_HOST_LEN>,
    port: u16,
}

impl BrokerEndpoint {
    /// Copy `host` into the endpoint.
    ///
    /// Fails with [`Error::InvalidAddress`] if `host` is empty or too long.
    pub fn new(host: &str, port: u16) -> Result<Self, Error> {
        if host.is_empty() {
            return Err(Error::InvalidAddress);
        }
        Ok(Self {
            host: String::try_from(host).map_err(|_| Error::InvalidAddress)?,
            port,
        })
    }

    /// Broker host name or IP address.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Broker TCP port.
    pub fn port(&self) -> u16 {
        self.port
    }
}

/// Session-level connection options.
///
/// ```rust
/// use loadcell_mqtt::network::application::mqtt::Options;
/// use loadcell_mqtt::network::retry::RetryPolicy;
///
/// let options = Options {
///     connect_retry: RetryPolicy::bounded(10, 1_000).with_backoff(2, 30_000),
///     ..Options::default()
/// };
/// assert_eq!(options.keep_alive_seconds, 30);
/// assert!(options.clean_session);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Keep-alive interval in seconds.
    pub keep_alive_seconds: u16,
    /// Whether the broker should discard session state between connections.
    pub clean_session: bool,
    /// Schedule for broker connect attempts.
    pub connect_retry: RetryPolicy,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            keep_alive_seconds: DEFAULT_KEEP_ALIVE_SECONDS,
            clean_session: true,
            connect_retry: RetryPolicy::forever(DEFAULT_CONNECT_INTERVAL_MS),
        }
    }
}

/// Outcome of the subscription pass that follows a successful connect.
///
/// Subscriptions are best effort: a failed topic is neither retried nor does
/// it stop the remaining ones. The report tells the caller which ones failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscribeReport {
    attempted: usize,
    failed_count: usize,
    failed: Vec<usize, MAX_REPORTED_FAILURES>,
}

impl SubscribeReport {
    /// Number of subscribe calls issued.
    pub fn attempted(&self) -> usize {
        self.attempted
    }

    /// Number of subscribe calls the transport accepted.
    pub fn succeeded(&self) -> usize {
        self.attempted - self.failed_count
    }

    /// Number of subscribe calls the transport rejected.
    pub fn failed_count(&self) -> usize {
        self.failed_count
    }

    /// Whether every topic was subscribed.
    pub fn all_subscribed(&self) -> bool {
        self.failed_count == 0
    }

    /// Indices into the subscription list of the first
    /// [`MAX_REPORTED_FAILURES`] topics that failed.
    pub fn failed_indices(&self) -> &[usize] {
        &self.failed
    }

    fn record(&mut self, index: usize, ok: bool) {
        self.attempted += 1;
        if !ok {
            self.failed_count += 1;
            // Counted above even when the index list is full.
            let _ = self.failed.push(index);
        }
    }
}

/// What a call to [`MqttSession::poll`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// The link was up; pending deliveries were processed.
    Serviced,
    /// The link was down and has been re-established.
    Reconnected(SubscribeReport),
}

/// An MQTT session with a fixed subscription list.
///
/// The session owns its transport and a [`LastMessage`] slot. The transport
/// delivers into that slot from inside [`MqttSession::poll`], so each session
/// sees only its own messages.
///
/// # Type Parameters
///
/// * `'a` - Lifetime of the borrowed subscription list
/// * `T` - The MQTT client library implementing [`MqttTransport`]
///
/// # Examples
///
/// ```rust,no_run
/// use loadcell_mqtt::network::application::mqtt::{BrokerEndpoint, MqttSession};
/// # use loadcell_mqtt::network::{MessageSink, MqttTransport};
/// # struct Client;
/// # impl MqttTransport for Client {
/// #     type Error = ();
/// #     fn begin(&mut self, _host: &str, _port: u16) {}
/// #     fn set_keep_alive(&mut self, _seconds: u16) {}
/// #     fn set_clean_session(&mut self, _clean: bool) {}
/// #     fn connect(&mut self, _id: &str) -> Result<(), ()> { Ok(()) }
/// #     fn subscribe(&mut self, _topic: &str) -> Result<(), ()> { Ok(()) }
/// #     fn publish(&mut self, _topic: &str, _payload: &[u8]) -> Result<(), ()> { Ok(()) }
/// #     fn connected(&mut self) -> bool { true }
/// #     fn service(&mut self, _sink: &mut dyn MessageSink) -> Result<(), ()> { Ok(()) }
/// # }
/// # struct Delay;
/// # impl embedded_hal::delay::DelayNs for Delay { fn delay_ns(&mut self, _ns: u32) {} }
///
/// const TOPICS: &[&str] = &["weightSensor1Control", "weightEnable"];
///
/// let broker = BrokerEndpoint::new("192.168.1.100", 1883).unwrap();
/// let mut session = MqttSession::with_subscriptions(Client, broker, TOPICS);
/// let mut delay = Delay;
///
/// session.connect("loadcell1", &mut delay).unwrap();
/// loop {
///     session.poll("loadcell1", &mut delay).unwrap();
///     if session.has_message() {
///         // act on session.topic() / session.message()
///         session.reset_message();
///     }
/// }
/// ```
#[derive(Debug)]
pub struct MqttSession<'a, T: MqttTransport> {
    transport: T,
    broker: BrokerEndpoint,
    subscriptions: &'a [&'a str],
    options: Options,
    last: LastMessage,
}

impl<'a, T: MqttTransport> MqttSession<'a, T> {
    /// A session with no subscriptions.
    pub fn new(transport: T, broker: BrokerEndpoint) -> Self {
        Self::with_options(transport, broker, &[], Options::default())
    }

    /// A session that subscribes to `subscriptions`, in order, after every
    /// successful connect.
    pub fn with_subscriptions(
        transport: T,
        broker: BrokerEndpoint,
        subscriptions: &'a [&'a str],
    ) -> Self {
        Self::with_options(transport, broker, subscriptions, Options::default())
    }

    /// A session with explicit options.
    ///
    /// Binds the transport to the broker and applies keep-alive and
    /// clean-session settings. No network I/O happens here.
    pub fn with_options(
        mut transport: T,
        broker: BrokerEndpoint,
        subscriptions: &'a [&'a str],
        options: Options,
    ) -> Self {
        transport.begin(broker.host(), broker.port());
        transport.set_keep_alive(options.keep_alive_seconds);
        transport.set_clean_session(options.clean_session);
        Self {
            transport,
            broker,
            subscriptions,
            options,
            last: LastMessage::new(),
        }
    }

    /// Connect to the broker, then subscribe to every configured topic.
    ///
    /// Connect attempts repeat on the session's retry policy, sleeping on
    /// `delay` in between. Under the default unbounded policy this blocks
    /// until the broker accepts; a bounded policy yields
    /// [`Error::ConnectFailed`] once exhausted.
    ///
    /// Once connected, one subscribe call is issued per topic in list order.
    /// Failures are logged and recorded in the returned [`SubscribeReport`];
    /// they do not abort the pass and are not retried.
    pub fn connect<D: DelayNs>(
        &mut self,
        client_id: &str,
        delay: &mut D,
    ) -> Result<SubscribeReport, Error> {
        info!(
            "Connecting to MQTT broker {}:{} as {}",
            self.broker.host(),
            self.broker.port(),
            client_id
        );

        let retry = self.options.connect_retry;
        let mut attempt: u32 = 1;
        loop {
            match self.transport.connect(client_id) {
                Ok(()) => break,
                Err(e) => {
                    if !retry.allows(attempt + 1) {
                        warn!("MQTT connect gave up after {} attempts: {:?}", attempt, e);
                        return Err(Error::ConnectFailed);
                    }
                    debug!("MQTT connect attempt {} failed: {:?}", attempt, e);
                    delay.delay_ms(retry.delay_for(attempt));
                    attempt = attempt.saturating_add(1);
                }
            }
        }
        info!("MQTT connected after {} attempt(s)", attempt);

        Ok(self.subscribe_all())
    }

    fn subscribe_all(&mut self) -> SubscribeReport {
        let subscriptions = self.subscriptions;
        let mut report = SubscribeReport::default();
        for (index, topic) in subscriptions.iter().enumerate() {
            match self.transport.subscribe(topic) {
                Ok(()) => {
                    info!("Subscribed to topic: {}", topic);
                    report.record(index, true);
                }
                Err(e) => {
                    warn!("Subscribe failed: {} ({:?})", topic, e);
                    report.record(index, false);
                }
            }
        }
        report
    }

    /// Publish `payload` on `topic`.
    ///
    /// Returns `Ok(false)` without touching the transport when the session is
    /// not connected; nothing is queued. Returns `Ok(true)` once the transport
    /// has accepted the message. Broker receipt is not confirmed.
    pub fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<bool, Error> {
        if !self.transport.connected() {
            debug!("Not connected, dropping publish to [{}]", topic);
            return Ok(false);
        }
        match self.transport.publish(topic, payload) {
            Ok(()) => {
                info!("Message published [ {} ]: {} bytes", topic, payload.len());
                Ok(true)
            }
            Err(e) => {
                warn!("Publish to [{}] failed: {:?}", topic, e);
                Err(Error::PublishFailed)
            }
        }
    }

    /// Service the transport and reconnect if the link dropped.
    ///
    /// Pending deliveries land in this session's message slot. If the
    /// transport then reports disconnected, [`MqttSession::connect`] runs once
    /// more, including the full subscription pass. Disconnects are only
    /// noticed here, so call this on every main-loop iteration.
    pub fn poll<D: DelayNs>(
        &mut self,
        client_id: &str,
        delay: &mut D,
    ) -> Result<PollOutcome, Error> {
        if let Err(e) = self.transport.service(&mut self.last) {
            debug!("MQTT service error: {:?}", e);
        }
        if self.transport.connected() {
            return Ok(PollOutcome::Serviced);
        }
        warn!("MQTT disconnected, reconnecting...");
        self.connect(client_id, delay).map(PollOutcome::Reconnected)
    }

    /// Payload of the last received message; empty if none.
    pub fn message(&self) -> &str {
        self.last.payload()
    }

    /// Topic of the last received message; empty if none.
    pub fn topic(&self) -> &str {
        self.last.topic()
    }

    /// Whether a message is waiting in the slot.
    pub fn has_message(&self) -> bool {
        !self.last.is_empty()
    }

    /// Clear the last message.
    pub fn reset_message(&mut self) {
        self.last.clear();
    }

    /// The message slot itself.
    pub fn last_message(&self) -> &LastMessage {
        &self.last
    }

    /// Deliveries discarded because they did not fit the slot.
    pub fn dropped(&self) -> u32 {
        self.last.dropped()
    }

    /// Ask the transport whether it is connected.
    pub fn is_connected(&mut self) -> bool {
        self.transport.connected()
    }

    /// Broker this session is bound to.
    pub fn broker(&self) -> &BrokerEndpoint {
        &self.broker
    }

    /// Topics subscribed after each connect.
    pub fn subscriptions(&self) -> &'a [&'a str] {
        self.subscriptions
    }

    /// Options the session was built with.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Get the underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Get a mutable reference to the underlying transport
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}
