#![allow(dead_code)]

use std::fmt::{self, Write};
use std::sync::{Arc, Mutex};
use std::thread;

use foundation::{
    ChannelError, ClusterConfig, CoreId, CycleCounter, EndpointName, EndpointRegistry, MatrixId,
    Message, SharedMemory, SignalEndpoint, Timeout, VisibilityBarrier,
};
use kernel::compute::expected_product;
use kernel::{CoreExit, CoreResources, CoreState, Kernel, KernelError, StateObserver};
use mailbox::{MailboxBus, MailboxHandle};
use memory::{CacheModel, CorePort, SharedRegion};

pub const CYCLES: u64 = 0x1_0000_002a;

/// Counter that always reads the same value.
pub struct FixedCounter {
    value: u64,
    latched: u64,
    pub resets: u32,
}

impl FixedCounter {
    pub fn new(value: u64) -> Self {
        Self {
            value,
            latched: 0,
            resets: 0,
        }
    }
}

impl CycleCounter for FixedCounter {
    fn reset(&mut self) {
        self.resets += 1;
    }

    fn capture_low(&mut self) -> u32 {
        self.latched = self.value;
        self.latched as u32
    }

    fn capture_high(&mut self) -> u32 {
        (self.latched >> 32) as u32
    }
}

/// Which flushes a [`TestPort`] drops.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DroppedFlushes {
    None,
    All,
    /// Only the flush with this zero-based call index.
    Nth(u32),
}

/// Write-back port that can be told to drop some of its flushes.
pub struct TestPort {
    inner: CorePort,
    dropped: DroppedFlushes,
    calls: u32,
}

impl TestPort {
    pub fn write_back(region: Arc<SharedRegion>) -> Self {
        Self::dropping(region, DroppedFlushes::None)
    }

    pub fn without_flushes(region: Arc<SharedRegion>) -> Self {
        Self::dropping(region, DroppedFlushes::All)
    }

    /// Drops only the `nth` flush. A coordinator flushes its operands first
    /// (call 0) and its own product rows second (call 1).
    pub fn skipping_flush(region: Arc<SharedRegion>, nth: u32) -> Self {
        Self::dropping(region, DroppedFlushes::Nth(nth))
    }

    pub fn dropping(region: Arc<SharedRegion>, dropped: DroppedFlushes) -> Self {
        Self {
            inner: CorePort::new(region, CacheModel::WriteBack),
            dropped,
            calls: 0,
        }
    }

    /// Flushes requested so far, dropped or not.
    pub fn flush_calls(&self) -> u32 {
        self.calls
    }
}

impl VisibilityBarrier for TestPort {
    fn flush_all(&mut self) {
        let call = self.calls;
        self.calls += 1;
        let drop = match self.dropped {
            DroppedFlushes::None => false,
            DroppedFlushes::All => true,
            DroppedFlushes::Nth(n) => n == call,
        };
        if !drop {
            self.inner.flush_all();
        }
    }
}

impl SharedMemory for TestPort {
    fn mat_size(&self) -> usize {
        self.inner.mat_size()
    }

    fn load(&mut self, matrix: MatrixId, row: usize, col: usize) -> i32 {
        self.inner.load(matrix, row, col)
    }

    fn store(&mut self, matrix: MatrixId, row: usize, col: usize, value: i32) {
        self.inner.store(matrix, row, col, value)
    }
}

/// Console shared with the test thread.
#[derive(Clone, Default)]
pub struct SharedConsole(pub Arc<Mutex<String>>);

impl SharedConsole {
    pub fn contents(&self) -> String {
        self.0.lock().unwrap().clone()
    }
}

impl Write for SharedConsole {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.lock().unwrap().push_str(s);
        Ok(())
    }
}

#[derive(Default)]
pub struct Recorder {
    entries: Mutex<Vec<(CoreId, CoreState)>>,
}

impl Recorder {
    pub fn states_of(&self, core: CoreId) -> Vec<CoreState> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| *id == core)
            .map(|(_, s)| *s)
            .collect()
    }

    pub fn last_state(&self, core: CoreId) -> Option<CoreState> {
        self.states_of(core).last().copied()
    }
}

impl StateObserver for Recorder {
    fn on_enter(&self, core: CoreId, state: CoreState) {
        self.entries.lock().unwrap().push((core, state));
    }
}

/// Registry whose handle for `black_hole` accepts sends but never delivers.
#[derive(Clone)]
pub struct DroppingBus {
    pub inner: MailboxBus,
    pub black_hole: EndpointName,
}

pub enum TestEndpoint {
    Real(MailboxHandle),
    Dropping(EndpointName),
}

impl SignalEndpoint for TestEndpoint {
    fn name(&self) -> EndpointName {
        match self {
            Self::Real(h) => h.name(),
            Self::Dropping(name) => *name,
        }
    }

    fn send(&mut self, message: Message, timeout: Timeout) -> Result<(), ChannelError> {
        match self {
            Self::Real(h) => h.send(message, timeout),
            Self::Dropping(_) => Ok(()),
        }
    }

    fn receive(&mut self, timeout: Timeout) -> Result<Message, ChannelError> {
        match self {
            Self::Real(h) => h.receive(timeout),
            Self::Dropping(name) => Err(ChannelError::Disconnected(*name)),
        }
    }
}

impl EndpointRegistry for DroppingBus {
    type Endpoint = TestEndpoint;

    fn open(&mut self, name: EndpointName) -> Result<TestEndpoint, ChannelError> {
        let handle = self.inner.open(name)?;
        if name == self.black_hole {
            Ok(TestEndpoint::Dropping(name))
        } else {
            Ok(TestEndpoint::Real(handle))
        }
    }
}

pub struct ClusterRun {
    pub console: String,
    pub exits: Vec<(CoreId, Result<CoreExit, KernelError>)>,
    pub region: Arc<SharedRegion>,
    pub recorder: Recorder,
    pub bus: MailboxBus,
}

impl ClusterRun {
    pub fn exit_of(&self, core: CoreId) -> &Result<CoreExit, KernelError> {
        &self
            .exits
            .iter()
            .find(|(id, _)| *id == core)
            .expect("core ran")
            .1
    }
}

/// Run every core of `cluster` on its own thread and wait for all of them.
pub fn run_cluster(
    cluster: ClusterConfig,
    timeout: Timeout,
    mut port_for: impl FnMut(CoreId, Arc<SharedRegion>) -> TestPort,
) -> ClusterRun {
    let region = Arc::new(SharedRegion::new(cluster.mat_size()));
    let bus = MailboxBus::for_cluster(&cluster);
    let recorder = Recorder::default();

    let results = thread::scope(|s| {
        let handles: Vec<_> = cluster
            .cores()
            .map(|id| {
                let mut res = CoreResources {
                    memory: port_for(id, region.clone()),
                    registry: bus.clone(),
                    counter: FixedCounter::new(CYCLES),
                    console: String::new(),
                };
                let kernel = Kernel::new(cluster.core(id).unwrap(), timeout, &recorder);
                s.spawn(move || {
                    let exit = kernel.run(&mut res);
                    (id, exit, res.console)
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("core thread panicked"))
            .collect::<Vec<_>>()
    });

    let coordinator = cluster.coordinator();
    let mut console = String::new();
    let mut exits = Vec::new();
    for (id, exit, out) in results {
        if id == coordinator {
            console = out;
        } else {
            assert!(out.is_empty(), "peer {id} wrote to its console");
        }
        exits.push((id, exit));
    }
    ClusterRun {
        console,
        exits,
        region,
        recorder,
        bus,
    }
}

/// What the coordinator must print for the benchmark operands.
pub fn expected_console(mat_size: usize, core_count: u16, cycles: u64) -> String {
    let mut out = String::new();
    for i in 0..mat_size {
        for j in 0..mat_size {
            write!(out, "{:x}", expected_product(mat_size, i, j)).unwrap();
        }
        out.push('\n');
    }
    write!(
        out,
        "\nExecution time for {core_count} cores is {cycles} clock cycles\n"
    )
    .unwrap();
    out
}
