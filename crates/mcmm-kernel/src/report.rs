//! Console report emitted by the coordinator.

use core::fmt::{self, Write};

use foundation::SharedMemory;

use crate::region::ProductView;

/// Write the product as lowercase hex (one row per line, no separators),
/// a blank line, and the timing summary.
pub fn write_report<M, W>(
    console: &mut W,
    product: &mut ProductView<'_, M>,
    core_count: u16,
    cycles: u64,
) -> fmt::Result
where
    M: SharedMemory,
    W: Write + ?Sized,
{
    let n = product.mat_size();
    for i in 0..n {
        for j in 0..n {
            write!(console, "{:x}", product.get(i, j))?;
        }
        console.write_char('\n')?;
    }
    write!(
        console,
        "\nExecution time for {core_count} cores is {cycles} clock cycles\n"
    )
}
