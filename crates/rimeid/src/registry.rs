use std::{
    fs::{self, OpenOptions},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use crate::{Error, Result, SnowflakeProcessId};

/// Separator between process id entries in the registry file.
const SEPARATOR: char = ',';

/// Default location of the registry file, relative to the working directory.
pub const DEFAULT_REGISTRY_PATH: &str = "pid";

/// Handle to the shared per-host process identity file.
///
/// The file is a single run of `,`-separated OS process ids with no header or
/// checksum; a process's slot is the zero-based index of its first
/// occurrence. Every process on a host reads and appends the same file, so
/// assignment is first-come-first-served and survives process exit.
///
/// Cross-process coordination through this file is **best-effort, not
/// linearizable**: two processes starting at the same instant can each miss
/// the other's freshly appended entry and compute the same slot. The
/// append-then-reread in [`slot_for`] narrows that window without closing it.
///
/// [`slot_for`]: ProcessRegistry::slot_for
#[derive(Clone, Debug)]
pub struct ProcessRegistry {
    path: PathBuf,
}

impl ProcessRegistry {
    /// Number of process slots available per host, bounded by the 3-bit slot
    /// field.
    pub const MAX_SLOTS: u64 = SnowflakeProcessId::PROCESS_SLOT_MASK + 1;

    /// Creates a registry handle over the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the registry file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the registry file empty if it does not exist yet.
    ///
    /// The file is created at most once per host; later constructions leave
    /// it untouched so earlier slot assignments stay valid and the file is
    /// only ever appended to afterwards. When two processes race here,
    /// exactly one `create_new` succeeds and the loser observes
    /// `AlreadyExists`.
    pub fn create_if_missing(&self) -> Result<()> {
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(_) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(path = %self.path.display(), "created registry file");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }

    /// Resolves the slot for `pid`, registering it on first sight.
    ///
    /// An unknown pid is appended (`"{pid},"`) and the file is re-read once
    /// before indexing, to shrink the window against concurrent appenders.
    /// Comparison is by whole entry, never substring, so pid `10` is not
    /// mistaken for a prefix of `100`.
    ///
    /// # Errors
    ///
    /// - [`Error::RegistryIo`] if the file cannot be read or appended
    /// - [`Error::SlotSpaceExhausted`] if the pid's index exceeds the slot
    ///   field; generation must fail rather than wrap
    /// - [`Error::ProcessNotRegistered`] if the entry vanished between the
    ///   append and the re-read
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "trace", skip(self)))]
    pub fn slot_for(&self, pid: u32) -> Result<u64> {
        let entry = pid.to_string();

        let mut contents = self.read()?;
        if !contents.split(SEPARATOR).any(|token| token == entry) {
            self.append(&entry)?;
            contents = self.read()?;
        }

        let slot = contents
            .split(SEPARATOR)
            .position(|token| token == entry)
            .ok_or(Error::ProcessNotRegistered { pid })? as u64;

        if slot >= Self::MAX_SLOTS {
            return Err(Error::SlotSpaceExhausted {
                slot,
                limit: Self::MAX_SLOTS,
            });
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(pid, slot, "resolved process slot");
        Ok(slot)
    }

    fn read(&self) -> Result<String> {
        fs::read_to_string(&self.path).map_err(|e| self.io_error(e))
    }

    fn append(&self, entry: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;
        write!(file, "{entry}{SEPARATOR}").map_err(|e| self.io_error(e))
    }

    fn io_error(&self, source: std::io::Error) -> Error {
        Error::RegistryIo {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_registry() -> (tempfile::TempDir, ProcessRegistry) {
        let dir = tempfile::tempdir().expect("create temp dir");
        let registry = ProcessRegistry::new(dir.path().join("pid"));
        registry.create_if_missing().expect("create registry file");
        (dir, registry)
    }

    #[test]
    fn first_seen_order_assigns_slots() {
        let (_dir, registry) = temp_registry();

        assert_eq!(registry.slot_for(100).unwrap(), 0);
        assert_eq!(fs::read_to_string(registry.path()).unwrap(), "100,");

        assert_eq!(registry.slot_for(200).unwrap(), 1);
        assert_eq!(fs::read_to_string(registry.path()).unwrap(), "100,200,");

        // Re-resolving a known pid neither moves it nor re-appends it.
        assert_eq!(registry.slot_for(100).unwrap(), 0);
        assert_eq!(fs::read_to_string(registry.path()).unwrap(), "100,200,");
    }

    #[test]
    fn distinct_pids_get_distinct_slots() {
        let (_dir, registry) = temp_registry();
        let a = registry.slot_for(41).unwrap();
        let b = registry.slot_for(42).unwrap();
        assert_ne!(a, b);
        assert_eq!(registry.slot_for(41).unwrap(), a);
        assert_eq!(registry.slot_for(42).unwrap(), b);
    }

    #[test]
    fn pid_matching_is_whole_entry_not_substring() {
        let (_dir, registry) = temp_registry();
        assert_eq!(registry.slot_for(100).unwrap(), 0);
        // "10" is a prefix of the registered "100" and must still be
        // appended as its own entry.
        assert_eq!(registry.slot_for(10).unwrap(), 1);
        assert_eq!(fs::read_to_string(registry.path()).unwrap(), "100,10,");
    }

    #[test]
    fn ninth_pid_fails_fast() {
        let (_dir, registry) = temp_registry();
        for pid in 1..=8 {
            assert_eq!(registry.slot_for(pid).unwrap(), u64::from(pid) - 1);
        }
        let err = registry.slot_for(9).unwrap_err();
        assert!(matches!(
            err,
            Error::SlotSpaceExhausted { slot: 8, limit: 8 }
        ));
    }

    #[test]
    fn create_if_missing_preserves_existing_contents() {
        let (_dir, registry) = temp_registry();
        registry.slot_for(100).unwrap();
        registry.create_if_missing().unwrap();
        assert_eq!(fs::read_to_string(registry.path()).unwrap(), "100,");
    }

    #[test]
    fn missing_file_is_a_registry_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let registry = ProcessRegistry::new(dir.path().join("missing").join("pid"));
        assert!(matches!(
            registry.slot_for(100),
            Err(Error::RegistryIo { .. })
        ));
    }
}
