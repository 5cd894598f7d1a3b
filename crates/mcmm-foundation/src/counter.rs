//! Cycle counter interface.

/// Free-running counter wider than the machine word, read as two halves.
pub trait CycleCounter {
    /// Restart the counter from zero.
    fn reset(&mut self);

    fn capture_low(&mut self) -> u32;

    fn capture_high(&mut self) -> u32;

    /// Low half first, then high half.
    #[inline]
    fn capture(&mut self) -> u64 {
        let low = self.capture_low();
        let high = self.capture_high();
        combine_halves(low, high)
    }
}

#[inline]
pub const fn combine_halves(low: u32, high: u32) -> u64 {
    low as u64 | ((high as u64) << 32)
}
