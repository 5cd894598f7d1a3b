//! Benchmark payload: row-block integer matrix multiplication.
//!
//! Any partitionable CPU-bound job could take its place; the protocol only
//! cares that each core writes nothing but its own rows.

use foundation::SharedMemory;

use crate::region::{Operand, OperandWriter, RowWriter};

/// Value of `A[row][col]`: increasing values mod 16.
#[inline]
pub fn operand_a(mat_size: usize, row: usize, col: usize) -> i32 {
    ((row * mat_size + col) % 0x10) as i32
}

/// Value of `B[row][col]`: the identity matrix.
#[inline]
pub fn operand_b(row: usize, col: usize) -> i32 {
    i32::from(row == col)
}

/// Fill `A` and `B`. Coordinator only.
pub fn init_operands<M: SharedMemory>(writer: &mut OperandWriter<'_, M>) {
    let n = writer.mat_size();
    for i in 0..n {
        for j in 0..n {
            writer.set(Operand::A, i, j, operand_a(n, i, j));
        }
    }
    for i in 0..n {
        for j in 0..n {
            writer.set(Operand::B, i, j, operand_b(i, j));
        }
    }
}

/// Compute the writer's rows of `C = A * B`.
///
/// Accumulation wraps on overflow, like the fixed-width hardware adder.
pub fn multiply_rows<M: SharedMemory>(writer: &mut RowWriter<'_, M>) {
    let n = writer.mat_size();
    for i in writer.rows().rows() {
        for j in 0..n {
            let mut sum = 0i32;
            for k in 0..n {
                let a = writer.operand(Operand::A, i, k);
                let b = writer.operand(Operand::B, k, j);
                sum = sum.wrapping_add(a.wrapping_mul(b));
            }
            writer.set(i, j, sum);
        }
    }
}

/// Expected `C[row][col]` for the benchmark operands. `B` is the identity,
/// so the product equals `A`.
#[inline]
pub fn expected_product(mat_size: usize, row: usize, col: usize) -> i32 {
    operand_a(mat_size, row, col)
}
