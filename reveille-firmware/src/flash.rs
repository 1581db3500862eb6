//! On-chip flash storage
//!
//! Two partitions at the top of the 2MB flash:
//!
//! - a single 4KB sector holding the record area (config, alarms, timer)
//!   as a RAM-buffered page committed with erase + write
//! - a 64KB wear-leveled sequential-storage map for standalone flags
//!
//! The record area implements [`ByteStore`], the flag map [`FlagStore`].

use embassy_futures::block_on;
use embassy_rp::flash::{Async, Flash, ERASE_SIZE};
use embassy_rp::peripherals::FLASH;
use sequential_storage::cache::NoCache;
use sequential_storage::map;

use reveille_core::persist::STORE_SIZE;
use reveille_core::traits::{ByteStore, FlagStore, StoreError};

/// Total flash size (2MB on the Pico)
pub const FLASH_SIZE: usize = 2 * 1024 * 1024;

/// Flag partition: last 64KB, wear-leveled
pub const FLAG_PARTITION_SIZE: usize = 64 * 1024;
pub const FLAG_PARTITION_START: usize = FLASH_SIZE - FLAG_PARTITION_SIZE;

/// Record partition: one erase sector below the flag partition
pub const RECORD_PARTITION_START: usize = FLAG_PARTITION_START - ERASE_SIZE;

const FLAG_RANGE: core::ops::Range<u32> = (FLAG_PARTITION_START as u32)..(FLASH_SIZE as u32);

/// Keys in the flag partition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FlagKey {
    FirstBoot = 0,
}

impl FlagKey {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "first_boot" => Some(FlagKey::FirstBoot),
            _ => None,
        }
    }
}

impl map::Key for FlagKey {
    fn serialize_into(&self, buffer: &mut [u8]) -> Result<usize, map::SerializationError> {
        if buffer.is_empty() {
            return Err(map::SerializationError::BufferTooSmall);
        }
        buffer[0] = *self as u8;
        Ok(1)
    }

    fn deserialize_from(buffer: &[u8]) -> Result<(Self, usize), map::SerializationError> {
        match buffer.first() {
            Some(0) => Ok((FlagKey::FirstBoot, 1)),
            Some(_) => Err(map::SerializationError::InvalidFormat),
            None => Err(map::SerializationError::BufferTooSmall),
        }
    }
}

/// Flash-backed storage for records and flags
pub struct ClockFlash<'d> {
    flash: Flash<'d, FLASH, Async, FLASH_SIZE>,
    /// RAM copy of the record page; writes land here until commit
    page: [u8; STORE_SIZE],
    dirty: bool,
}

impl<'d> ClockFlash<'d> {
    pub fn new(
        flash: FLASH,
        dma: impl embassy_rp::Peripheral<P = impl embassy_rp::dma::Channel> + 'd,
    ) -> Self {
        let mut flash = Flash::new(flash, dma);
        let mut page = [0u8; STORE_SIZE];
        if flash
            .blocking_read(RECORD_PARTITION_START as u32, &mut page)
            .is_err()
        {
            page = [0u8; STORE_SIZE];
        }
        Self {
            flash,
            page,
            dirty: false,
        }
    }
}

impl ByteStore for ClockFlash<'_> {
    fn read(&mut self, offset: usize, buf: &mut [u8]) -> Result<(), StoreError> {
        let end = offset.checked_add(buf.len()).ok_or(StoreError::OutOfRange)?;
        let src = self.page.get(offset..end).ok_or(StoreError::OutOfRange)?;
        buf.copy_from_slice(src);
        Ok(())
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), StoreError> {
        let end = offset.checked_add(data.len()).ok_or(StoreError::OutOfRange)?;
        let dst = self
            .page
            .get_mut(offset..end)
            .ok_or(StoreError::OutOfRange)?;
        dst.copy_from_slice(data);
        self.dirty = true;
        Ok(())
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        if !self.dirty {
            return Ok(());
        }
        let start = RECORD_PARTITION_START as u32;
        self.flash
            .blocking_erase(start, start + ERASE_SIZE as u32)
            .map_err(|_| StoreError::Io)?;
        self.flash
            .blocking_write(start, &self.page)
            .map_err(|_| StoreError::Io)?;
        self.dirty = false;
        Ok(())
    }

    fn wipe(&mut self) -> Result<(), StoreError> {
        self.page = [0u8; STORE_SIZE];
        self.dirty = true;
        self.commit()
    }
}

impl FlagStore for ClockFlash<'_> {
    fn get_bool(&mut self, key: &str, default: bool) -> bool {
        let Some(key) = FlagKey::from_name(key) else {
            return default;
        };
        let mut buffer = [0u8; 64];
        let result = block_on(map::fetch_item::<FlagKey, u8, _>(
            &mut self.flash,
            FLAG_RANGE,
            &mut NoCache::new(),
            &mut buffer,
            &key,
        ));
        match result {
            Ok(Some(value)) => value != 0,
            _ => default,
        }
    }

    fn put_bool(&mut self, key: &str, value: bool) -> Result<(), StoreError> {
        let key = FlagKey::from_name(key).ok_or(StoreError::OutOfRange)?;
        let mut buffer = [0u8; 64];
        block_on(map::store_item(
            &mut self.flash,
            FLAG_RANGE,
            &mut NoCache::new(),
            &mut buffer,
            &key,
            &(value as u8),
        ))
        .map_err(|_| StoreError::Io)
    }

    fn wipe(&mut self) -> Result<(), StoreError> {
        self.flash
            .blocking_erase(FLAG_RANGE.start, FLAG_RANGE.end)
            .map_err(|_| StoreError::Io)
    }
}
