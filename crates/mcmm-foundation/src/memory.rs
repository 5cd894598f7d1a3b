//! Shared-region access and the explicit visibility barrier.
//!
//! Cores have no hardware coherency: a store made by one core is only
//! guaranteed to be observable by the others after that core runs
//! [`VisibilityBarrier::flush_all`].

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MatrixId {
    /// Left operand.
    A,
    /// Right operand.
    B,
    /// Product.
    C,
}

impl MatrixId {
    pub const ALL: [MatrixId; 3] = [MatrixId::A, MatrixId::B, MatrixId::C];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
            Self::C => 2,
        }
    }
}

pub trait VisibilityBarrier {
    /// Make every prior store of the calling core visible to all cores.
    fn flush_all(&mut self);
}

/// A core's port onto the shared matrix region.
pub trait SharedMemory: VisibilityBarrier {
    fn mat_size(&self) -> usize;

    fn load(&mut self, matrix: MatrixId, row: usize, col: usize) -> i32;

    fn store(&mut self, matrix: MatrixId, row: usize, col: usize, value: i32);
}

impl<T: VisibilityBarrier + ?Sized> VisibilityBarrier for &mut T {
    fn flush_all(&mut self) {
        (**self).flush_all()
    }
}

impl<T: SharedMemory + ?Sized> SharedMemory for &mut T {
    fn mat_size(&self) -> usize {
        (**self).mat_size()
    }

    fn load(&mut self, matrix: MatrixId, row: usize, col: usize) -> i32 {
        (**self).load(matrix, row, col)
    }

    fn store(&mut self, matrix: MatrixId, row: usize, col: usize, value: i32) {
        (**self).store(matrix, row, col, value)
    }
}
