//! Launch configuration and role resolution.
//!
//! Every core image is built (or launched) with its own [`CoreId`] and the
//! cluster-wide [`ClusterConfig`]. Nothing here is negotiated at runtime:
//! the values are checked once, before the first core starts, and are
//! immutable afterwards.

use core::fmt;

use crate::partition::{row_range_for, RowRange};

/// Identity of the core that coordinates the run unless configured otherwise.
pub const MAIN_CORE: CoreId = CoreId(0);

/// Matrix dimension used by the benchmark images.
pub const DEFAULT_MAT_SIZE: usize = 104;

/// Largest accepted matrix dimension. The region holds three `i32`
/// matrices, so this caps it at 192 MiB.
pub const MAX_MAT_SIZE: usize = 4096;

/// Cells in a region holding `A`, `B` and `C`, or `None` on overflow.
pub const fn region_cells(mat_size: usize) -> Option<usize> {
    match mat_size.checked_mul(mat_size) {
        Some(square) => square.checked_mul(3),
        None => None,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CoreId(pub u16);

impl CoreId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u16> for CoreId {
    fn from(id: u16) -> Self {
        Self(id)
    }
}

impl fmt::Display for CoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Coordinator,
    Peer,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    NoCores,
    EmptyMatrix,
    MatrixTooLarge { mat_size: usize, max: usize },
    /// `mat_size` is not a multiple of `core_count`; the trailing rows
    /// would never be computed.
    UnevenPartition { mat_size: usize, core_count: u16 },
    CoreOutOfRange { core: CoreId, core_count: u16 },
    CoordinatorOutOfRange { coordinator: CoreId, core_count: u16 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCores => write!(f, "core count must be at least 1"),
            Self::EmptyMatrix => write!(f, "matrix size must be at least 1"),
            Self::MatrixTooLarge { mat_size, max } => {
                write!(f, "matrix size {mat_size} is too large (at most {max})")
            }
            Self::UnevenPartition {
                mat_size,
                core_count,
            } => write!(
                f,
                "matrix size {mat_size} is not divisible by core count {core_count} \
                 ({} rows would never be computed)",
                mat_size % *core_count as usize
            ),
            Self::CoreOutOfRange { core, core_count } => {
                write!(f, "core id {core} is outside [0, {core_count})")
            }
            Self::CoordinatorOutOfRange {
                coordinator,
                core_count,
            } => write!(
                f,
                "coordinator id {coordinator} is outside [0, {core_count})"
            ),
        }
    }
}

impl core::error::Error for ConfigError {}

/// Cluster-wide parameters shared by every core image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClusterConfig {
    core_count: u16,
    mat_size: usize,
    coordinator: CoreId,
}

impl ClusterConfig {
    pub fn new(core_count: u16, mat_size: usize) -> Result<Self, ConfigError> {
        Self::with_coordinator(core_count, mat_size, MAIN_CORE)
    }

    pub fn with_coordinator(
        core_count: u16,
        mat_size: usize,
        coordinator: CoreId,
    ) -> Result<Self, ConfigError> {
        if core_count == 0 {
            return Err(ConfigError::NoCores);
        }
        if mat_size == 0 {
            return Err(ConfigError::EmptyMatrix);
        }
        if mat_size > MAX_MAT_SIZE || region_cells(mat_size).is_none() {
            return Err(ConfigError::MatrixTooLarge {
                mat_size,
                max: MAX_MAT_SIZE,
            });
        }
        if mat_size % core_count as usize != 0 {
            return Err(ConfigError::UnevenPartition {
                mat_size,
                core_count,
            });
        }
        if coordinator.0 >= core_count {
            return Err(ConfigError::CoordinatorOutOfRange {
                coordinator,
                core_count,
            });
        }
        Ok(Self {
            core_count,
            mat_size,
            coordinator,
        })
    }

    #[inline]
    pub fn core_count(&self) -> u16 {
        self.core_count
    }

    #[inline]
    pub fn mat_size(&self) -> usize {
        self.mat_size
    }

    #[inline]
    pub fn coordinator(&self) -> CoreId {
        self.coordinator
    }

    #[inline]
    pub fn rows_per_core(&self) -> usize {
        self.mat_size / self.core_count as usize
    }

    pub fn cores(&self) -> impl Iterator<Item = CoreId> {
        (0..self.core_count).map(CoreId)
    }

    /// Every identity except the coordinator, in identity order.
    pub fn peers(&self) -> impl Iterator<Item = CoreId> {
        let coordinator = self.coordinator;
        self.cores().filter(move |id| *id != coordinator)
    }

    #[inline]
    pub fn peer_count(&self) -> usize {
        self.core_count as usize - 1
    }

    #[inline]
    pub fn row_range(&self, core: CoreId) -> RowRange {
        row_range_for(core.index(), self.core_count as usize, self.mat_size)
    }

    pub fn core(&self, core_id: CoreId) -> Result<CoreConfig, ConfigError> {
        CoreConfig::new(*self, core_id)
    }
}

/// A single core computing the default matrix.
impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            core_count: 1,
            mat_size: DEFAULT_MAT_SIZE,
            coordinator: MAIN_CORE,
        }
    }
}

/// Configuration of a single core image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CoreConfig {
    cluster: ClusterConfig,
    core_id: CoreId,
}

impl CoreConfig {
    pub fn new(cluster: ClusterConfig, core_id: CoreId) -> Result<Self, ConfigError> {
        if core_id.0 >= cluster.core_count {
            return Err(ConfigError::CoreOutOfRange {
                core: core_id,
                core_count: cluster.core_count,
            });
        }
        Ok(Self { cluster, core_id })
    }

    #[inline]
    pub fn core_id(&self) -> CoreId {
        self.core_id
    }

    #[inline]
    pub fn cluster(&self) -> &ClusterConfig {
        &self.cluster
    }

    #[inline]
    pub fn is_coordinator(&self) -> bool {
        self.core_id == self.cluster.coordinator
    }

    #[inline]
    pub fn role(&self) -> Role {
        if self.is_coordinator() {
            Role::Coordinator
        } else {
            Role::Peer
        }
    }

    #[inline]
    pub fn row_range(&self) -> RowRange {
        self.cluster.row_range(self.core_id)
    }
}
