//! Process-aware Snowflake-style unique ID generation.
//!
//! `rimeid` produces strictly increasing, collision-free 64-bit numeric IDs
//! across many processes on many machines, coordinated only by a local clock
//! and a shared per-host identity file. Each ID packs, MSB to LSB:
//!
//! ```text
//! [ timestamp: 42 ][ version: 1 ][ machine ID: 8 ][ process slot: 3 ][ sequence: 10 ]
//! ```
//!
//! - the **machine ID** is assigned externally (0..=255, one per host),
//! - the **process slot** is discovered through a shared plain-text registry
//!   file that every process on the host reads and appends (up to 8 processes
//!   per host),
//! - the **sequence** hands out up to 1024 IDs per process per millisecond,
//!   busy-spinning into the next millisecond when exhausted.
//!
//! # Example
//!
//! ```no_run
//! use rimeid::{GeneratorConfig, IdGenerator};
//!
//! fn main() -> rimeid::Result<()> {
//!     let generator = IdGenerator::new(GeneratorConfig::new(0))?;
//!     let id = generator.try_next_id()?;
//!     println!("{}", id.to_raw());
//!     Ok(())
//! }
//! ```
//!
//! # Caveats
//!
//! Cross-process slot assignment is best-effort, not linearizable: two
//! processes starting at the same instant can race the registry file and
//! compute the same slot. The append-then-reread in
//! [`ProcessRegistry::slot_for`] narrows that window without closing it.
//!
//! The sequence-exhaustion wait is an unbounded busy spin on the wall clock;
//! a frozen or far-backward-stepped system clock stalls generation until the
//! clock catches up.
//!
//! # Feature flags
//!
//! - `parking-lot`: use `parking_lot::Mutex` for the generator lock
//!   (no poisoning)
//! - `serde`: `Serialize`/`Deserialize` for [`SnowflakeProcessId`]
//! - `tracing`: instrument generation and slot resolution

mod error;
mod generator;
mod id;
mod mutex;
mod registry;
mod time;

pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::mutex::*;
pub use crate::registry::*;
pub use crate::time::*;
