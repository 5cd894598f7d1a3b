use cfg_if::cfg_if;

use foundation::CycleCounter;

cfg_if! {
    if #[cfg(target_arch = "x86_64")] {
        use core::arch::x86_64::{_mm_lfence, _rdtsc};

        /// Name of the raw counter backing [`HostCycleCounter`].
        pub const SOURCE: &str = "tsc";

        #[inline]
        fn read_raw() -> u64 {
            unsafe {
                _mm_lfence();
                let tsc = _rdtsc();
                _mm_lfence();
                tsc
            }
        }
    } else {
        use std::sync::OnceLock;
        use std::time::Instant;

        pub const SOURCE: &str = "monotonic-ns";

        #[inline]
        fn read_raw() -> u64 {
            static EPOCH: OnceLock<Instant> = OnceLock::new();
            EPOCH.get_or_init(Instant::now).elapsed().as_nanos() as u64
        }
    }
}

/// Per-core cycle counter. `reset` records a base; captures are relative to it.
///
/// `capture_low` samples the raw counter once and latches the whole value,
/// so the `capture_high` that follows belongs to the same sample.
#[derive(Debug)]
pub struct HostCycleCounter {
    base: u64,
    latched: u64,
}

impl HostCycleCounter {
    pub fn new() -> Self {
        Self {
            base: read_raw(),
            latched: 0,
        }
    }
}

impl Default for HostCycleCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl CycleCounter for HostCycleCounter {
    fn reset(&mut self) {
        self.base = read_raw();
        self.latched = 0;
    }

    fn capture_low(&mut self) -> u32 {
        self.latched = read_raw().wrapping_sub(self.base);
        self.latched as u32
    }

    fn capture_high(&mut self) -> u32 {
        (self.latched >> 32) as u32
    }
}
