use core::fmt;

/// A 64-bit Snowflake-style ID with a per-host process slot field
///
/// - 42 bits timestamp (ms since [`DEFAULT_EPOCH`])
/// - 1 bit version (reserved for a clock-rollback indicator, always 0)
/// - 8 bits machine ID
/// - 3 bits process slot
/// - 10 bits sequence
///
/// ```text
///  Bit Index:  63             22 21          21 20            13 12      10 9              0
///              +----------------+-------------+----------------+----------+---------------+
///  Field:      | timestamp (42) | version (1) | machine ID (8) | slot (3) | sequence (10) |
///              +----------------+-------------+----------------+----------+---------------+
///              |<---------------- MSB ---------- 64 bits --------- LSB ------------------>|
/// ```
///
/// The field partition guarantees uniqueness across distinct
/// (machine ID, process slot) pairs; within one pair, uniqueness comes from
/// the strictly increasing (timestamp, sequence) order the generator
/// enforces.
///
/// [`DEFAULT_EPOCH`]: crate::DEFAULT_EPOCH
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct SnowflakeProcessId {
    id: u64,
}

impl SnowflakeProcessId {
    /// Bitmask for extracting the 42-bit timestamp field. Occupies bits 22
    /// through 63.
    pub const TIMESTAMP_MASK: u64 = (1 << 42) - 1;

    /// Bitmask for extracting the 1-bit version field. Occupies bit 21.
    pub const VERSION_MASK: u64 = (1 << 1) - 1;

    /// Bitmask for extracting the 8-bit machine ID field. Occupies bits 13
    /// through 20.
    pub const MACHINE_ID_MASK: u64 = (1 << 8) - 1;

    /// Bitmask for extracting the 3-bit process slot field. Occupies bits 10
    /// through 12.
    pub const PROCESS_SLOT_MASK: u64 = (1 << 3) - 1;

    /// Bitmask for extracting the 10-bit sequence field. Occupies bits 0
    /// through 9.
    pub const SEQUENCE_MASK: u64 = (1 << 10) - 1;

    /// Number of bits to shift the timestamp to its correct position (bit 22).
    pub const TIMESTAMP_SHIFT: u64 = 22;

    /// Number of bits to shift the version to its correct position (bit 21).
    pub const VERSION_SHIFT: u64 = 21;

    /// Number of bits to shift the machine ID to its correct position (bit 13).
    pub const MACHINE_ID_SHIFT: u64 = 13;

    /// Number of bits to shift the process slot to its correct position
    /// (bit 10).
    pub const PROCESS_SLOT_SHIFT: u64 = 10;

    /// Number of bits to shift the sequence field (bit 0).
    pub const SEQUENCE_SHIFT: u64 = 0;

    /// Packs the five fields into a single 64-bit ID.
    ///
    /// Each field is reduced modulo its width (masked) before shifting, so no
    /// field can overflow into its neighbor.
    pub const fn from(
        timestamp: u64,
        version: u64,
        machine_id: u64,
        process_slot: u64,
        sequence: u64,
    ) -> Self {
        let timestamp = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let version = (version & Self::VERSION_MASK) << Self::VERSION_SHIFT;
        let machine_id = (machine_id & Self::MACHINE_ID_MASK) << Self::MACHINE_ID_SHIFT;
        let process_slot = (process_slot & Self::PROCESS_SLOT_MASK) << Self::PROCESS_SLOT_SHIFT;
        let sequence = (sequence & Self::SEQUENCE_MASK) << Self::SEQUENCE_SHIFT;
        Self {
            id: timestamp | version | machine_id | process_slot | sequence,
        }
    }

    /// Constructs an ID from components that are already in range.
    pub fn from_components(
        timestamp: u64,
        version: u64,
        machine_id: u64,
        process_slot: u64,
        sequence: u64,
    ) -> Self {
        debug_assert!(timestamp <= Self::TIMESTAMP_MASK, "timestamp overflow");
        debug_assert!(version <= Self::VERSION_MASK, "version overflow");
        debug_assert!(machine_id <= Self::MACHINE_ID_MASK, "machine_id overflow");
        debug_assert!(
            process_slot <= Self::PROCESS_SLOT_MASK,
            "process_slot overflow"
        );
        debug_assert!(sequence <= Self::SEQUENCE_MASK, "sequence overflow");
        Self::from(timestamp, version, machine_id, process_slot, sequence)
    }

    /// Extracts the timestamp from the packed ID.
    pub const fn timestamp(&self) -> u64 {
        (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
    }

    /// Extracts the version bit from the packed ID.
    pub const fn version(&self) -> u64 {
        (self.id >> Self::VERSION_SHIFT) & Self::VERSION_MASK
    }

    /// Extracts the machine ID from the packed ID.
    pub const fn machine_id(&self) -> u64 {
        (self.id >> Self::MACHINE_ID_SHIFT) & Self::MACHINE_ID_MASK
    }

    /// Extracts the process slot from the packed ID.
    pub const fn process_slot(&self) -> u64 {
        (self.id >> Self::PROCESS_SLOT_SHIFT) & Self::PROCESS_SLOT_MASK
    }

    /// Extracts the sequence number from the packed ID.
    pub const fn sequence(&self) -> u64 {
        (self.id >> Self::SEQUENCE_SHIFT) & Self::SEQUENCE_MASK
    }

    /// Returns the maximum representable timestamp value.
    pub const fn max_timestamp() -> u64 {
        Self::TIMESTAMP_MASK
    }

    /// Returns the maximum representable version value.
    pub const fn max_version() -> u64 {
        Self::VERSION_MASK
    }

    /// Returns the maximum representable machine ID value.
    pub const fn max_machine_id() -> u64 {
        Self::MACHINE_ID_MASK
    }

    /// Returns the maximum representable process slot value.
    pub const fn max_process_slot() -> u64 {
        Self::PROCESS_SLOT_MASK
    }

    /// Returns the maximum representable sequence value.
    pub const fn max_sequence() -> u64 {
        Self::SEQUENCE_MASK
    }

    /// Converts this ID into its raw `u64` representation.
    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Converts a raw `u64` into an ID.
    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }

    /// Returns the ID as a zero-padded 20-digit string.
    pub fn to_padded_string(&self) -> String {
        format!("{:020}", self.id)
    }
}

impl fmt::Display for SnowflakeProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for SnowflakeProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowflakeProcessId")
            .field("id", &self.id)
            .field("timestamp", &self.timestamp())
            .field("version", &self.version())
            .field("machine_id", &self.machine_id())
            .field("process_slot", &self.process_slot())
            .field("sequence", &self.sequence())
            .finish()
    }
}

impl From<SnowflakeProcessId> for u64 {
    fn from(id: SnowflakeProcessId) -> Self {
        id.to_raw()
    }
}
