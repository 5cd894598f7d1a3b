//! Typed ownership of the shared matrix region.
//!
//! The region moves through two phases. While a core holds a writer it is
//! the only core allowed to touch that part of the region. Publishing a
//! writer runs the visibility barrier and returns a proof token; the
//! protocol will only send a signal that depends on the data when handed
//! that token, so a missing flush cannot be expressed.
//!
//! | writer            | owner       | token on publish      |
//! |-------------------|-------------|-----------------------|
//! | [`OperandWriter`] | coordinator | [`OperandsPublished`] |
//! | [`RowWriter`]     | every core  | [`RowsPublished`]     |
//!
//! [`ProductView`] is the read-only phase. It can only be built from the
//! coordinator's own [`RowsPublished`] plus the [`CompletionsCollected`]
//! returned by the completion barrier.

use foundation::{MatrixId, RowRange, SharedMemory};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    A,
    B,
}

impl From<Operand> for MatrixId {
    fn from(op: Operand) -> Self {
        match op {
            Operand::A => MatrixId::A,
            Operand::B => MatrixId::B,
        }
    }
}

/// Exclusive write access to both operands.
pub struct OperandWriter<'m, M: SharedMemory> {
    memory: &'m mut M,
}

impl<'m, M: SharedMemory> OperandWriter<'m, M> {
    pub fn new(memory: &'m mut M) -> Self {
        Self { memory }
    }

    #[inline]
    pub fn mat_size(&self) -> usize {
        self.memory.mat_size()
    }

    #[inline]
    pub fn set(&mut self, operand: Operand, row: usize, col: usize, value: i32) {
        self.memory.store(operand.into(), row, col, value);
    }

    /// Flush the operands and give up write access.
    pub fn publish(self) -> OperandsPublished {
        self.memory.flush_all();
        OperandsPublished { _private: () }
    }
}

/// Proof that the operands were flushed by their writer.
#[must_use]
#[derive(Debug)]
pub struct OperandsPublished {
    _private: (),
}

/// Exclusive write access to one core's rows of the product.
///
/// Operands are read through the same port; they are read-only by the time
/// a row writer exists.
pub struct RowWriter<'m, M: SharedMemory> {
    memory: &'m mut M,
    rows: RowRange,
}

impl<'m, M: SharedMemory> RowWriter<'m, M> {
    pub fn new(memory: &'m mut M, rows: RowRange) -> Self {
        debug_assert!(rows.end() <= memory.mat_size());
        Self { memory, rows }
    }

    #[inline]
    pub fn rows(&self) -> RowRange {
        self.rows
    }

    #[inline]
    pub fn mat_size(&self) -> usize {
        self.memory.mat_size()
    }

    #[inline]
    pub fn operand(&mut self, operand: Operand, row: usize, col: usize) -> i32 {
        self.memory.load(operand.into(), row, col)
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: i32) {
        debug_assert!(self.rows.contains(row), "row {row} outside {:?}", self.rows);
        self.memory.store(MatrixId::C, row, col, value);
    }

    /// Flush the owned rows and hand them over to every reader.
    pub fn publish(self) -> RowsPublished {
        self.memory.flush_all();
        RowsPublished { rows: self.rows }
    }
}

/// Proof that a core flushed its rows of the product.
#[must_use]
#[derive(Debug)]
pub struct RowsPublished {
    rows: RowRange,
}

impl RowsPublished {
    pub fn rows(&self) -> RowRange {
        self.rows
    }
}

/// Proof that every peer signalled completion. Only the completion
/// barrier creates one.
#[must_use]
#[derive(Debug)]
pub struct CompletionsCollected {
    peers: usize,
}

impl CompletionsCollected {
    pub(crate) fn new(peers: usize) -> Self {
        Self { peers }
    }

    pub fn peers(&self) -> usize {
        self.peers
    }
}

/// Read-only view of the finished product.
pub struct ProductView<'m, M: SharedMemory> {
    memory: &'m mut M,
}

impl<'m, M: SharedMemory> ProductView<'m, M> {
    pub fn new(memory: &'m mut M, own: RowsPublished, all: CompletionsCollected) -> Self {
        log::trace!(
            "product readable: own rows {:?}, {} peer completions",
            own.rows(),
            all.peers()
        );
        Self { memory }
    }

    #[inline]
    pub fn mat_size(&self) -> usize {
        self.memory.mat_size()
    }

    #[inline]
    pub fn get(&mut self, row: usize, col: usize) -> i32 {
        self.memory.load(MatrixId::C, row, col)
    }
}
