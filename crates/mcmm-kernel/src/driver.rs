//! Kernel driver: wires memory, mailboxes and the counter through the
//! per-role state machine.

use core::fmt::Write;

use foundation::{
    ChannelError, CoreConfig, CycleCounter, EndpointRegistry, Role, RowRange, SharedMemory,
    Timeout,
};

use crate::compute;
use crate::error::KernelError;
use crate::protocol::{self, OwnLink, PeerLinks};
use crate::region::{OperandWriter, ProductView, RowWriter};
use crate::report;
use crate::state::{CoordinatorState, CoreState, PeerState, StateObserver};

/// Everything a platform hands to one core image.
pub struct CoreResources<M, R, C, W> {
    pub memory: M,
    pub registry: R,
    pub counter: C,
    pub console: W,
}

/// Terminal state reached by a core.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CoreExit {
    /// The coordinator printed the product and its timing.
    Reported { cycles: u64 },
    /// A peer published its rows and signalled completion.
    Completed { rows: RowRange },
}

pub struct Kernel<O> {
    config: CoreConfig,
    timeout: Timeout,
    observer: O,
}

impl<O: StateObserver> Kernel<O> {
    pub fn new(config: CoreConfig, timeout: Timeout, observer: O) -> Self {
        Self {
            config,
            timeout,
            observer,
        }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// Run this core to its terminal state.
    pub fn run<M, R, C, W>(
        &self,
        res: &mut CoreResources<M, R, C, W>,
    ) -> Result<CoreExit, KernelError>
    where
        M: SharedMemory,
        R: EndpointRegistry,
        C: CycleCounter,
        W: Write,
    {
        let expected = self.config.cluster().mat_size();
        let actual = res.memory.mat_size();
        if expected != actual {
            return Err(KernelError::RegionMismatch { expected, actual });
        }

        log::info!(
            "[core {}] starting as {:?}, rows {:?}, timeout {}",
            self.config.core_id(),
            self.config.role(),
            self.config.row_range().rows(),
            self.timeout
        );

        match self.config.role() {
            Role::Coordinator => self.run_coordinator(res),
            Role::Peer => self.run_peer(res),
        }
    }

    pub fn run_coordinator<M, R, C, W>(
        &self,
        res: &mut CoreResources<M, R, C, W>,
    ) -> Result<CoreExit, KernelError>
    where
        M: SharedMemory,
        R: EndpointRegistry,
        C: CycleCounter,
        W: Write,
    {
        let cluster = *self.config.cluster();
        let mut links = PeerLinks::open(&mut res.registry, &cluster)
            .map_err(|e| self.channel_error(CoordinatorState::Init, e))?;

        self.enter(CoordinatorState::Init);
        let mut operands = OperandWriter::new(&mut res.memory);
        compute::init_operands(&mut operands);
        let ready = operands.publish();

        self.enter(CoordinatorState::BroadcastStart);
        res.counter.reset();
        protocol::broadcast_start(&mut links, &ready, self.timeout)
            .map_err(|e| self.channel_error(CoordinatorState::BroadcastStart, e))?;

        self.enter(CoordinatorState::Compute);
        let mut rows = RowWriter::new(&mut res.memory, self.config.row_range());
        compute::multiply_rows(&mut rows);
        let own = rows.publish();

        self.enter(CoordinatorState::CollectCompletions);
        let all = protocol::collect_completions(&mut links, self.timeout)
            .map_err(|e| self.channel_error(CoordinatorState::CollectCompletions, e))?;

        self.enter(CoordinatorState::Report);
        let cycles = res.counter.capture();
        let mut product = ProductView::new(&mut res.memory, own, all);
        report::write_report(
            &mut res.console,
            &mut product,
            cluster.core_count(),
            cycles,
        )?;

        self.enter(CoordinatorState::Idle);
        Ok(CoreExit::Reported { cycles })
    }

    pub fn run_peer<M, R, C, W>(
        &self,
        res: &mut CoreResources<M, R, C, W>,
    ) -> Result<CoreExit, KernelError>
    where
        M: SharedMemory,
        R: EndpointRegistry,
    {
        let mut link = OwnLink::open(&mut res.registry, self.config.core_id())
            .map_err(|e| self.channel_error(PeerState::AwaitStart, e))?;

        self.enter(PeerState::AwaitStart);
        protocol::await_start(&mut link, self.timeout)
            .map_err(|e| self.channel_error(PeerState::AwaitStart, e))?;

        self.enter(PeerState::Compute);
        let range = self.config.row_range();
        let mut rows = RowWriter::new(&mut res.memory, range);
        compute::multiply_rows(&mut rows);
        let published = rows.publish();

        self.enter(PeerState::SignalCompletion);
        protocol::signal_completion(&mut link, published, self.timeout)
            .map_err(|e| self.channel_error(PeerState::SignalCompletion, e))?;

        self.enter(PeerState::Idle);
        Ok(CoreExit::Completed { rows: range })
    }

    fn enter(&self, state: impl Into<CoreState>) {
        self.observer.on_enter(self.config.core_id(), state.into());
    }

    fn channel_error(&self, state: impl Into<CoreState>, source: ChannelError) -> KernelError {
        let err = KernelError::Channel {
            core: self.config.core_id(),
            state: state.into(),
            source,
        };
        log::error!("{err}");
        err
    }
}
