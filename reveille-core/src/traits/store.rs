//! Persistent storage traits
//!
//! Two separate namespaces, matching the appliance's storage layout:
//!
//! - [`ByteStore`]: a small byte-addressed area holding the versioned
//!   records written by the persistence bridge. Writes are buffered until
//!   an explicit `commit`.
//! - [`FlagStore`]: a key/value namespace for standalone booleans (the
//!   "first boot" marker), kept apart from the record area so that a
//!   record-layout change cannot corrupt it.

/// Errors from storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// Read or write outside the store
    OutOfRange,
    /// Underlying storage failed
    Io,
}

/// Byte-addressed record storage with explicit commit
pub trait ByteStore {
    /// Read `buf.len()` bytes starting at `offset`
    fn read(&mut self, offset: usize, buf: &mut [u8]) -> Result<(), StoreError>;

    /// Write `data` starting at `offset` (buffered until commit)
    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), StoreError>;

    /// Flush buffered writes to the backing medium
    fn commit(&mut self) -> Result<(), StoreError>;

    /// Zero the whole store and commit
    fn wipe(&mut self) -> Result<(), StoreError>;
}

/// Key/value boolean storage
pub trait FlagStore {
    /// Read a flag, returning `default` if it was never written
    fn get_bool(&mut self, key: &str, default: bool) -> bool;

    /// Write a flag
    fn put_bool(&mut self, key: &str, value: bool) -> Result<(), StoreError>;

    /// Erase the whole namespace
    fn wipe(&mut self) -> Result<(), StoreError>;
}
