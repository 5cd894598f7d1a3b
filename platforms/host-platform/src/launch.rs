//! Boot a cluster: one OS thread per core image, sharing one region and
//! one mailbox bus.

use std::collections::BTreeSet;
use std::fmt;
use std::io;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use derive_builder::Builder;
use foundation::{ClusterConfig, ConfigError, CoreId, MatrixId, Timeout};
use kernel::compute::expected_product;
use kernel::{CoreExit, CoreResources, Kernel, KernelError, LogObserver};
use mailbox::MailboxBus;
use memory::{CacheModel, CorePort, SharedRegion};

use crate::counter::HostCycleCounter;

#[derive(Clone, Debug, Default, Builder)]
#[builder(default)]
pub struct LaunchOptions {
    pub cluster: ClusterConfig,
    pub timeout: Timeout,
    pub cache_model: CacheModel,
}

#[derive(Debug)]
pub enum LaunchError {
    Config(ConfigError),
    DuplicateCore(CoreId),
    MissingCore(CoreId),
    Spawn { core: CoreId, source: io::Error },
    Kernel { core: CoreId, source: KernelError },
    Panicked(CoreId),
}

impl fmt::Display for LaunchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "invalid configuration: {e}"),
            Self::DuplicateCore(core) => write!(f, "core {core} has more than one image"),
            Self::MissingCore(core) => write!(f, "no image for core {core}"),
            Self::Spawn { core, .. } => write!(f, "failed to start core {core}"),
            Self::Kernel { core, .. } => write!(f, "core {core} stopped with an error"),
            Self::Panicked(core) => write!(f, "core {core} panicked"),
        }
    }
}

impl std::error::Error for LaunchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Spawn { source, .. } => Some(source),
            Self::Kernel { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for LaunchError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

#[derive(Debug)]
pub struct RunOutcome {
    pub cluster: ClusterConfig,
    pub cache_model: CacheModel,
    /// Terminal state of every core, in identity order.
    pub exits: Vec<(CoreId, CoreExit)>,
    /// What the coordinator wrote to its console.
    pub console: String,
    pub cycles: u64,
    /// The product matrix as left in the shared region, row-major.
    pub product: Vec<i32>,
    pub elapsed: Duration,
}

impl RunOutcome {
    /// Whether the product matches the closed form for the benchmark operands.
    pub fn verified(&self) -> bool {
        let n = self.cluster.mat_size();
        self.product.len() == n * n
            && self
                .product
                .iter()
                .enumerate()
                .all(|(i, &v)| v == expected_product(n, i / n, i % n))
    }
}

/// Launch every core of the configured cluster.
pub fn launch(options: &LaunchOptions) -> Result<RunOutcome, LaunchError> {
    let images: Vec<CoreId> = options.cluster.cores().collect();
    launch_images(options, &images)
}

/// Launch one image per entry of `images`.
///
/// Every identity in `[0, core_count)` must appear exactly once. This is
/// checked before any core starts.
///
/// Cores are not torn down when one of them fails. With
/// [`Timeout::Infinite`], a core that stops early (a spawn failure, or a
/// kernel error) leaves the cores waiting on it blocked, and this call
/// never returns. Use a finite timeout when that matters.
pub fn launch_images(
    options: &LaunchOptions,
    images: &[CoreId],
) -> Result<RunOutcome, LaunchError> {
    let cluster = options.cluster;
    let mut seen = BTreeSet::new();
    for &core in images {
        cluster.core(core)?;
        if !seen.insert(core) {
            return Err(LaunchError::DuplicateCore(core));
        }
    }
    if let Some(missing) = cluster.cores().find(|id| !seen.contains(id)) {
        return Err(LaunchError::MissingCore(missing));
    }

    log::info!(
        "launching {} cores, {}x{} matrix, coordinator {}, {:?} cache, timeout {}",
        cluster.core_count(),
        cluster.mat_size(),
        cluster.mat_size(),
        cluster.coordinator(),
        options.cache_model,
        options.timeout
    );

    let region = Arc::new(SharedRegion::new(cluster.mat_size()));
    let bus = MailboxBus::for_cluster(&cluster);
    let started = Instant::now();

    let joined = thread::scope(|s| {
        let mut handles = Vec::with_capacity(images.len());
        for &core in images {
            let config = cluster.core(core)?;
            let kernel = Kernel::new(config, options.timeout, LogObserver);
            let mut res = CoreResources {
                memory: CorePort::new(region.clone(), options.cache_model),
                registry: bus.clone(),
                counter: HostCycleCounter::new(),
                console: String::new(),
            };
            let handle = thread::Builder::new()
                .name(format!("core-{core}"))
                .spawn_scoped(s, move || {
                    kernel.run(&mut res).map(|exit| (exit, res.console))
                })
                .map_err(|source| LaunchError::Spawn { core, source })?;
            handles.push((core, handle));
        }

        let mut joined = Vec::with_capacity(handles.len());
        for (core, handle) in handles {
            joined.push((core, handle.join()));
        }
        Ok::<_, LaunchError>(joined)
    })?;
    let elapsed = started.elapsed();

    let mut exits = Vec::with_capacity(joined.len());
    let mut console = String::new();
    let mut cycles = 0;
    for (core, result) in joined {
        let (exit, out) = result
            .map_err(|_| LaunchError::Panicked(core))?
            .map_err(|source| LaunchError::Kernel { core, source })?;
        if let CoreExit::Reported { cycles: c } = exit {
            cycles = c;
            console = out;
        }
        exits.push((core, exit));
    }
    exits.sort_by_key(|(core, _)| *core);

    log::info!("run finished in {elapsed:?}, {cycles} cycles");

    Ok(RunOutcome {
        cluster,
        cache_model: options.cache_model,
        exits,
        console,
        cycles,
        product: region.snapshot(MatrixId::C),
        elapsed,
    })
}
