#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    GeneratorConfig, Mutex, ProcessRegistry, Result, SnowflakeProcessId, TimeSource, WallClock,
};

/// Value packed into the version bit.
///
/// Reserved to mark IDs minted after a detected clock rollback; no code path
/// sets it yet, so every generated ID carries version 0.
const VERSION: u64 = 0;

/// Cached process identity, valid only while the OS pid is unchanged.
#[derive(Clone, Copy, Debug)]
struct CachedIdentity {
    pid: u32,
    slot: u64,
}

/// Mutable generator state, all guarded by one process-wide lock.
#[derive(Debug)]
struct GeneratorState {
    /// Last clock reading used for an allocation, in Unix ms. Monotonically
    /// non-decreasing within a process.
    last_timestamp: u64,
    /// Per-millisecond counter in `0..=SnowflakeProcessId::max_sequence()`.
    sequence: u64,
    identity: Option<CachedIdentity>,
}

/// A lock-based Snowflake-style ID generator suitable for multi-threaded
/// environments.
///
/// All mutable state (sequence counter, last timestamp, cached process
/// identity) lives behind a single [`Mutex`], so any number of threads may
/// share one generator by reference. The critical section ends once a
/// `(timestamp, sequence)` pair is allocated; packing happens outside the
/// lock.
///
/// Exactly one generator should exist per process: the sequence counter is
/// what keeps IDs from the same (machine, slot) pair collision-free, and two
/// generators in one process would share a slot without sharing a counter.
/// See [`process_generator`] for process-wide wiring.
///
/// [`process_generator`]: crate::process_generator
#[derive(Debug)]
pub struct IdGenerator<T = WallClock>
where
    T: TimeSource,
{
    config: GeneratorConfig,
    registry: ProcessRegistry,
    state: Mutex<GeneratorState>,
    time: T,
}

impl IdGenerator<WallClock> {
    /// Creates a generator backed by the system wall clock.
    ///
    /// Validates the machine id and performs the one-time registry file
    /// creation (the file is left untouched if it already exists).
    ///
    /// # Errors
    ///
    /// - [`Error::MachineIdOutOfRange`] if the machine id exceeds 255
    /// - [`Error::RegistryIo`] if the registry file cannot be created
    ///
    /// # Example
    /// ```no_run
    /// use rimeid::{GeneratorConfig, IdGenerator};
    ///
    /// fn main() -> rimeid::Result<()> {
    ///     let generator = IdGenerator::new(GeneratorConfig::new(0))?;
    ///     let id = generator.try_next_id()?;
    ///     println!("{id}");
    ///     Ok(())
    /// }
    /// ```
    ///
    /// [`Error::MachineIdOutOfRange`]: crate::Error::MachineIdOutOfRange
    /// [`Error::RegistryIo`]: crate::Error::RegistryIo
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        Self::with_time_source(config, WallClock)
    }
}

impl<T> IdGenerator<T>
where
    T: TimeSource,
{
    /// Creates a generator with an explicit [`TimeSource`].
    ///
    /// Useful for driving the generator from a mocked clock in tests; see
    /// [`IdGenerator::new`] for the production constructor.
    pub fn with_time_source(config: GeneratorConfig, time: T) -> Result<Self> {
        config.validate()?;
        let registry = ProcessRegistry::new(config.registry_path.clone());
        registry.create_if_missing()?;
        Ok(Self {
            config,
            registry,
            state: Mutex::new(GeneratorState {
                last_timestamp: 0,
                sequence: 0,
                identity: None,
            }),
            time,
        })
    }

    /// Returns the generator's configuration.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generates the next unique ID.
    ///
    /// When the current millisecond's sequence space is exhausted this call
    /// **blocks**, busy-spinning on the clock until the next millisecond
    /// begins. Under heavy load that spin can momentarily consume a full
    /// core, and it has no upper bound: a frozen or far-backward-stepped
    /// system clock stalls the call until the clock passes the last recorded
    /// timestamp.
    ///
    /// # Errors
    ///
    /// - [`Error::RegistryIo`] / [`Error::SlotSpaceExhausted`] /
    ///   [`Error::ProcessNotRegistered`] from process-slot resolution
    /// - [`Error::LockPoisoned`] if another thread panicked while holding the
    ///   generator lock (std mutex builds only)
    ///
    /// [`Error::RegistryIo`]: crate::Error::RegistryIo
    /// [`Error::SlotSpaceExhausted`]: crate::Error::SlotSpaceExhausted
    /// [`Error::ProcessNotRegistered`]: crate::Error::ProcessNotRegistered
    /// [`Error::LockPoisoned`]: crate::Error::LockPoisoned
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_next_id(&self) -> Result<SnowflakeProcessId> {
        let mut state = {
            #[cfg(feature = "parking-lot")]
            {
                self.state.lock()
            }
            #[cfg(not(feature = "parking-lot"))]
            {
                self.state.lock()?
            }
        };

        let slot = self.resolve_slot(&mut state)?;
        let (timestamp, sequence) = self.allocate(&mut state);
        drop(state);

        let relative = timestamp.saturating_sub(self.config.epoch.as_millis() as u64);
        Ok(SnowflakeProcessId::from(
            relative,
            VERSION,
            self.config.machine_id,
            slot,
            sequence,
        ))
    }

    /// Resolves this process's slot, hitting the registry file only when the
    /// cached identity is stale.
    ///
    /// The cache is keyed on the OS pid: a forked child inherits the
    /// parent's in-memory cache but observes a new pid, which forces a fresh
    /// file-backed resolution instead of reusing the parent's slot.
    fn resolve_slot(&self, state: &mut GeneratorState) -> Result<u64> {
        let pid = std::process::id();
        if let Some(identity) = state.identity {
            if identity.pid == pid {
                return Ok(identity.slot);
            }
        }

        let slot = self.registry.slot_for(pid)?;
        state.identity = Some(CachedIdentity { pid, slot });
        Ok(slot)
    }

    /// Hands out the next `(timestamp, sequence)` pair.
    ///
    /// The sequence wraps modulo the 10-bit field width. A wrap to zero means
    /// the current millisecond is exhausted, so the clock is spun strictly
    /// past `last_timestamp` and the pair is issued under the fresh reading.
    fn allocate(&self, state: &mut GeneratorState) -> (u64, u64) {
        let mut now = self.time.current_millis();
        state.sequence = (state.sequence + 1) & SnowflakeProcessId::SEQUENCE_MASK;
        if state.sequence == 0 {
            now = self.time.spin_until_after(state.last_timestamp);
        }
        state.last_timestamp = now;
        (now, state.sequence)
    }
}
