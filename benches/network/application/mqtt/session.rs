use criterion::{BatchSize, Criterion, Throughput};
use embedded_hal::delay::DelayNs;
use loadcell_mqtt::network::application::mqtt::{BrokerEndpoint, MqttSession};
use loadcell_mqtt::network::{MessageSink, MqttTransport};
use std::hint::black_box;

const TOPICS: &[&str] = &["weightSensor1Control", "weightEnable", "weightSensor1"];

/// Client library stand-in that hands out a fixed number of queued messages.
struct LoopbackTransport {
    connected: bool,
    queued: usize,
    payload: &'static [u8],
}

impl LoopbackTransport {
    fn new(payload: &'static [u8]) -> Self {
        Self {
            connected: false,
            queued: 0,
            payload,
        }
    }
}

impl MqttTransport for LoopbackTransport {
    type Error = ();

    fn begin(&mut self, _host: &str, _port: u16) {}

    fn set_keep_alive(&mut self, _seconds: u16) {}

    fn set_clean_session(&mut self, _clean: bool) {}

    fn connect(&mut self, _client_id: &str) -> Result<(), Self::Error> {
        self.connected = true;
        Ok(())
    }

    fn subscribe(&mut self, _topic: &str) -> Result<(), Self::Error> {
        Ok(())
    }

    fn publish(&mut self, _topic: &str, payload: &[u8]) -> Result<(), Self::Error> {
        black_box(payload);
        self.queued += 1;
        Ok(())
    }

    fn connected(&mut self) -> bool {
        self.connected
    }

    fn service(&mut self, sink: &mut dyn MessageSink) -> Result<(), Self::Error> {
        while self.queued > 0 {
            sink.deliver("weightSensor1", self.payload);
            self.queued -= 1;
        }
        Ok(())
    }
}

struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

fn setup_session(payload: &'static [u8]) -> MqttSession<'static, LoopbackTransport> {
    let broker = BrokerEndpoint::new("192.168.1.100", 1883).expect("valid broker");
    let mut session =
        MqttSession::with_subscriptions(LoopbackTransport::new(payload), broker, TOPICS);
    session
        .connect("loadcell-bench", &mut NoDelay)
        .expect("Failed to connect");
    session
}

pub fn bench_publish(c: &mut Criterion) {
    let mut group = c.benchmark_group("publish");
    let payload = br#"{"weight":"12.34"}"#;
    group.throughput(Throughput::Bytes(payload.len() as u64));
    group.bench_function("publish", |b| {
        let mut session = setup_session(payload);
        b.iter(|| {
            session
                .publish("weightSensor1", black_box(payload))
                .expect("Failed to publish");
            session.transport_mut().queued = 0;
        })
    });
    group.finish();
}

pub fn bench_poll_idle(c: &mut Criterion) {
    let mut group = c.benchmark_group("poll_idle");
    group.bench_function("poll_idle", |b| {
        let mut session = setup_session(b"");
        let mut delay = NoDelay;
        b.iter(|| {
            black_box(session.poll("loadcell-bench", &mut delay).expect("Failed to poll"));
        })
    });
    group.finish();
}

pub fn bench_poll_delivery(c: &mut Criterion) {
    let mut group = c.benchmark_group("poll_delivery");
    let payload = br#"{"command":"measure","timestamp":"2024-05-01T08:00:00Z"}"#;
    group.throughput(Throughput::Bytes(payload.len() as u64 * 50));
    group.bench_function("poll_delivery", |b| {
        b.iter_batched_ref(
            || setup_session(payload),
            |session| {
                let mut delay = NoDelay;
                for _ in 0..50 {
                    session.transport_mut().queued = 1;
                    session
                        .poll("loadcell-bench", &mut delay)
                        .expect("Failed to poll");
                    black_box(session.message());
                    session.reset_message();
                }
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

pub fn bench_reconnect(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconnect");
    group.bench_function("reconnect", |b| {
        b.iter_batched_ref(
            || {
                let mut session = setup_session(b"");
                session.transport_mut().connected = false;
                session
            },
            |session| {
                session
                    .poll("loadcell-bench", &mut NoDelay)
                    .expect("Failed to reconnect");
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}
