use std::path::PathBuf;

pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for ID generation.
///
/// The packing and sequence-allocation hot path is infallible; every variant
/// here originates from process-slot discovery against the registry file or
/// from a poisoned generator lock.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Reading or appending the registry file failed.
    ///
    /// The generator cannot safely produce IDs without a resolvable process
    /// slot, so registry I/O failures are fatal to the calling operation.
    #[error("registry file {}: {source}", path.display())]
    RegistryIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// More distinct process ids have accumulated in the registry file than
    /// the process-slot field can encode.
    ///
    /// Wrapping the slot would reintroduce the collisions the registry exists
    /// to prevent, so generation is rejected instead.
    #[error("process slot {slot} exceeds the {limit} slots available per host")]
    SlotSpaceExhausted { slot: u64, limit: u64 },

    /// The current process id was appended to the registry file but did not
    /// appear in the re-read contents, which indicates the file was truncated
    /// or replaced underneath us.
    #[error("process id {pid} missing from registry after append")]
    ProcessNotRegistered { pid: u32 },

    /// The configured machine id does not fit the 8-bit machine field.
    #[error("machine id {machine_id} exceeds maximum {max}")]
    MachineIdOutOfRange { machine_id: u64, max: u64 },

    /// The operation failed because the generator lock was **poisoned**.
    ///
    /// This occurs when a thread panics while holding the lock. When the
    /// `parking-lot` feature is enabled, mutexes do **not** poison, so this
    /// variant is not available.
    #[cfg(not(feature = "parking-lot"))]
    #[error("generator lock poisoned")]
    LockPoisoned,
}

#[cfg(not(feature = "parking-lot"))]
impl<T> From<std::sync::PoisonError<T>> for Error {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        Self::LockPoisoned
    }
}
