use criterion::{criterion_group, criterion_main};

mod network;

criterion_group!(
    benches,
    network::application::mqtt::session::bench_publish,
    network::application::mqtt::session::bench_poll_idle,
    network::application::mqtt::session::bench_poll_delivery,
    network::application::mqtt::session::bench_reconnect
);
criterion_main!(benches);
