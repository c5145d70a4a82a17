//! Host-side delay provider.

use embedded_hal::delay::DelayNs;

/// [`DelayNs`] backed by `std::thread::sleep`, for running the connect loops
/// on a host or on platforms with a std port (ESP-IDF).
#[derive(Debug, Default, Clone, Copy)]
pub struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(u64::from(ns)));
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(std::time::Duration::from_millis(u64::from(ms)));
    }
}
