use core::time::Duration;
use std::time::{SystemTime, UNIX_EPOCH};

/// Default epoch: Thursday, November 4, 2010 1:42:54.657 UTC
///
/// Subtracting this offset before packing keeps the 42-bit timestamp field in
/// range well into the 22nd century and generated IDs at 19 decimal digits,
/// the widest numeric column most databases accept.
pub const DEFAULT_EPOCH: Duration = Duration::from_millis(1_288_834_974_657);

/// A trait for time sources that return a wall-clock timestamp.
///
/// This abstraction allows you to plug in the real system clock or a mocked
/// time source in tests.
///
/// Readings are **milliseconds since the Unix epoch**. The configured epoch
/// offset is subtracted later, by the generator, immediately before packing -
/// not here.
///
/// # Example
///
/// ```
/// use rimeid::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.current_millis(), 1234);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since the Unix epoch.
    fn current_millis(&self) -> u64;

    /// Busy-polls the clock until it strictly exceeds `last`, then returns
    /// the new reading.
    ///
    /// This is the wait primitive used when a millisecond's sequence space is
    /// exhausted. The spin has no sleep, no backoff, and no upper bound: if
    /// the clock is frozen or stepped backward past `last`, the call blocks
    /// until the clock catches up again, burning a core while it waits. Small
    /// backward jumps are silently absorbed this way; large regressions stall
    /// the caller indefinitely.
    fn spin_until_after(&self, last: u64) -> u64 {
        loop {
            let now = self.current_millis();
            if now > last {
                return now;
            }
            core::hint::spin_loop();
        }
    }
}

/// The production time source, reading the system wall clock.
///
/// Clock regression (the system clock moving backward) is neither detected
/// nor compensated. The `version` bit of [`SnowflakeProcessId`] is reserved
/// as a rollback indicator but no code path sets it.
///
/// [`SnowflakeProcessId`]: crate::SnowflakeProcessId
#[derive(Clone, Copy, Debug, Default)]
pub struct WallClock;

impl TimeSource for WallClock {
    fn current_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock before UNIX_EPOCH")
            .as_millis() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    struct StepTime {
        values: Vec<u64>,
        index: Cell<usize>,
    }

    impl StepTime {
        fn new(values: Vec<u64>) -> Self {
            Self {
                values,
                index: Cell::new(0),
            }
        }
    }

    impl TimeSource for StepTime {
        fn current_millis(&self) -> u64 {
            let i = self.index.get();
            self.index.set(i + 1);
            self.values[i.min(self.values.len() - 1)]
        }
    }

    #[test]
    fn wall_clock_is_past_default_epoch() {
        let now = WallClock.current_millis();
        assert!(now > DEFAULT_EPOCH.as_millis() as u64);
    }

    #[test]
    fn spin_waits_for_strictly_greater_reading() {
        let time = StepTime::new(vec![42, 42, 42, 43]);
        assert_eq!(time.spin_until_after(42), 43);
    }

    #[test]
    fn spin_absorbs_backward_readings() {
        // Readings below `last` keep spinning, same as equal readings.
        let time = StepTime::new(vec![40, 41, 42, 44]);
        assert_eq!(time.spin_until_after(42), 44);
    }
}
