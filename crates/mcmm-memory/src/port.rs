use std::collections::HashMap;
use std::sync::atomic::{fence, Ordering};
use std::sync::Arc;

use foundation::{MatrixId, SharedMemory, VisibilityBarrier};

use crate::region::SharedRegion;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CacheModel {
    #[default]
    Coherent,
    WriteBack,
}

/// One core's view of a [`SharedRegion`].
pub struct CorePort {
    region: Arc<SharedRegion>,
    model: CacheModel,
    dirty: HashMap<usize, i32>,
    flushes: u64,
}

impl CorePort {
    pub fn new(region: Arc<SharedRegion>, model: CacheModel) -> Self {
        Self {
            region,
            model,
            dirty: HashMap::new(),
            flushes: 0,
        }
    }

    pub fn model(&self) -> CacheModel {
        self.model
    }

    /// Stores not yet written back.
    pub fn pending(&self) -> usize {
        self.dirty.len()
    }

    pub fn flushes(&self) -> u64 {
        self.flushes
    }
}

impl VisibilityBarrier for CorePort {
    fn flush_all(&mut self) {
        let written = self.dirty.len();
        for (offset, value) in self.dirty.drain() {
            self.region.write(offset, value);
        }
        fence(Ordering::SeqCst);
        self.flushes += 1;
        log::trace!("flush #{} wrote back {written} cells", self.flushes);
    }
}

impl SharedMemory for CorePort {
    fn mat_size(&self) -> usize {
        self.region.mat_size()
    }

    fn load(&mut self, matrix: MatrixId, row: usize, col: usize) -> i32 {
        let offset = self.region.offset(matrix, row, col);
        match self.dirty.get(&offset) {
            Some(&value) => value,
            None => self.region.read(offset),
        }
    }

    fn store(&mut self, matrix: MatrixId, row: usize, col: usize, value: i32) {
        let offset = self.region.offset(matrix, row, col);
        match self.model {
            CacheModel::Coherent => self.region.write(offset, value),
            CacheModel::WriteBack => {
                self.dirty.insert(offset, value);
            }
        }
    }
}
