use std::sync::atomic::{AtomicI32, Ordering};

use foundation::{region_cells, MatrixId};

/// Backing storage for `A`, `B` and `C`, zero-initialised.
pub struct SharedRegion {
    mat_size: usize,
    cells: Box<[AtomicI32]>,
}

impl SharedRegion {
    /// Panics if the region's cell count overflows `usize`; validated
    /// configurations never reach that.
    pub fn new(mat_size: usize) -> Self {
        let Some(len) = region_cells(mat_size) else {
            panic!("{mat_size}x{mat_size} region overflows the address space");
        };
        let cells = (0..len)
            .map(|_| AtomicI32::new(0))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Self { mat_size, cells }
    }

    #[inline]
    pub fn mat_size(&self) -> usize {
        self.mat_size
    }

    #[inline]
    pub(crate) fn offset(&self, matrix: MatrixId, row: usize, col: usize) -> usize {
        let n = self.mat_size;
        assert!(
            row < n && col < n,
            "{matrix:?}[{row}][{col}] outside {n}x{n} region"
        );
        matrix.index() * n * n + row * n + col
    }

    #[inline]
    pub(crate) fn read(&self, offset: usize) -> i32 {
        self.cells[offset].load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn write(&self, offset: usize, value: i32) {
        self.cells[offset].store(value, Ordering::Relaxed)
    }

    /// Region contents of `matrix`, row-major, as an outside observer sees them.
    pub fn snapshot(&self, matrix: MatrixId) -> Vec<i32> {
        let len = self.mat_size * self.mat_size;
        let base = matrix.index() * len;
        (base..base + len).map(|off| self.read(off)).collect()
    }
}
