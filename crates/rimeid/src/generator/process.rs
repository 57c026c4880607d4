use std::sync::OnceLock;

use crate::{GeneratorConfig, IdGenerator, Mutex, Result};

static PROCESS_GENERATOR: OnceLock<IdGenerator> = OnceLock::new();
static INIT: Mutex<()> = Mutex::new(());

/// Returns the process-wide generator, constructing it on first call.
///
/// Construction is double-checked behind an init lock so concurrent first use
/// from multiple threads performs the one-time registry setup exactly once.
/// The first successful caller's `config` wins; configs passed on later calls
/// are ignored. A failed construction leaves the slot empty, so the next
/// caller retries.
///
/// Prefer constructing an [`IdGenerator`] yourself and threading it through
/// the code that needs it; this accessor exists for callers that have no way
/// to pass a handle down.
///
/// # Errors
///
/// Construction errors from [`IdGenerator::new`], and lock poisoning of the
/// init lock (std mutex builds only).
pub fn process_generator(config: GeneratorConfig) -> Result<&'static IdGenerator> {
    if let Some(generator) = PROCESS_GENERATOR.get() {
        return Ok(generator);
    }

    let _guard = {
        #[cfg(feature = "parking-lot")]
        {
            INIT.lock()
        }
        #[cfg(not(feature = "parking-lot"))]
        {
            INIT.lock()?
        }
    };

    if let Some(generator) = PROCESS_GENERATOR.get() {
        return Ok(generator);
    }

    let generator = IdGenerator::new(config)?;
    Ok(PROCESS_GENERATOR.get_or_init(|| generator))
}
