//! Poll loop with a fixed backoff schedule.

use std::hint::spin_loop;
use std::thread;
use std::time::{Duration, Instant};

use foundation::Timeout;

/// Rounds that busy-spin, doubling the spin count each time.
const SPIN_ROUNDS: u32 = 6;
/// Further rounds that yield the thread.
const YIELD_ROUNDS: u32 = 10;
/// Sleep between polls once spinning and yielding are exhausted.
const PARK_INTERVAL: Duration = Duration::from_micros(50);

#[derive(Debug, Default)]
pub struct Backoff {
    round: u32,
}

impl Backoff {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snooze(&mut self) {
        if self.round < SPIN_ROUNDS {
            for _ in 0..(1u32 << self.round) {
                spin_loop();
            }
        } else if self.round < SPIN_ROUNDS + YIELD_ROUNDS {
            thread::yield_now();
        } else {
            thread::sleep(PARK_INTERVAL);
            return;
        }
        self.round += 1;
    }

    pub fn is_parking(&self) -> bool {
        self.round >= SPIN_ROUNDS + YIELD_ROUNDS
    }
}

/// Call `attempt` until it yields a value or `timeout` expires.
///
/// On expiry returns the time actually waited.
pub fn poll_until<T>(
    timeout: Timeout,
    mut attempt: impl FnMut() -> Option<T>,
) -> Result<T, Duration> {
    let start = Instant::now();
    let limit = timeout.duration();
    let mut backoff = Backoff::new();
    loop {
        if let Some(value) = attempt() {
            return Ok(value);
        }
        if let Some(limit) = limit {
            let waited = start.elapsed();
            if waited >= limit {
                return Err(waited);
            }
        }
        backoff.snooze();
    }
}
