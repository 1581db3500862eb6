//! Persistence bridge
//!
//! Maps the three persisted objects onto fixed slots in the byte store
//! and frames each one as a versioned record. A slot that fails to decode
//! for any reason yields defaults; the appliance must always come up.

use heapless::Vec;

use crate::alarm::Alarm;
use crate::config::{DeviceConfig, MAX_ALARMS};
use crate::countdown::CountdownTimer;
use crate::persist::record;
use crate::traits::{ByteStore, FlagStore, StoreError};

/// Slot offsets within the byte store
pub const CONFIG_OFFSET: usize = 0;
pub const ALARM_OFFSET: usize = 400;
pub const TIMER_OFFSET: usize = 800;

/// Total store size in bytes
pub const STORE_SIZE: usize = 1024;

const CONFIG_SLOT_LEN: usize = ALARM_OFFSET - CONFIG_OFFSET;
const ALARM_SLOT_LEN: usize = TIMER_OFFSET - ALARM_OFFSET;
const TIMER_SLOT_LEN: usize = STORE_SIZE - TIMER_OFFSET;

/// Flag namespace key for the first-boot marker
const FIRST_BOOT_KEY: &str = "first_boot";

/// Everything restored from the store at boot
#[derive(Debug, Clone, Default)]
pub struct LoadedState {
    pub config: DeviceConfig,
    pub alarms: Vec<Alarm, MAX_ALARMS>,
    pub timer: CountdownTimer,
}

/// Reads and writes the three persisted slots
pub struct PersistBridge<S: ByteStore> {
    store: S,
}

impl<S: ByteStore> PersistBridge<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Access the underlying store, e.g. when it also hosts a flag namespace
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Restore config, alarms and timer, falling back to defaults per slot
    pub fn load(&mut self) -> Result<LoadedState, StoreError> {
        let mut slot = [0u8; CONFIG_SLOT_LEN];

        self.store.read(CONFIG_OFFSET, &mut slot)?;
        let config = match record::decode::<DeviceConfig>(&slot) {
            Ok(config) if config.config_valid => config,
            _ => DeviceConfig::default(),
        };

        self.store.read(ALARM_OFFSET, &mut slot[..ALARM_SLOT_LEN])?;
        let alarms = record::decode::<Vec<Alarm, MAX_ALARMS>>(&slot[..ALARM_SLOT_LEN])
            .unwrap_or_default();

        self.store.read(TIMER_OFFSET, &mut slot[..TIMER_SLOT_LEN])?;
        let mut timer = record::decode::<CountdownTimer>(&slot[..TIMER_SLOT_LEN])
            .unwrap_or_default();
        // A countdown cannot survive a reboot; its reference clock is gone
        timer.stop();

        Ok(LoadedState {
            config,
            alarms,
            timer,
        })
    }

    /// Persist the config, marking it valid
    pub fn save_config(&mut self, config: &DeviceConfig) -> Result<(), StoreError> {
        let mut valid = config.clone();
        valid.config_valid = true;
        self.write_record(CONFIG_OFFSET, CONFIG_SLOT_LEN, &valid)
    }

    /// Persist the alarm list
    pub fn save_alarms(&mut self, alarms: &Vec<Alarm, MAX_ALARMS>) -> Result<(), StoreError> {
        self.write_record(ALARM_OFFSET, ALARM_SLOT_LEN, alarms)
    }

    /// Persist the countdown timer
    pub fn save_timer(&mut self, timer: &CountdownTimer) -> Result<(), StoreError> {
        self.write_record(TIMER_OFFSET, TIMER_SLOT_LEN, timer)
    }

    /// Zero the whole record area
    pub fn wipe(&mut self) -> Result<(), StoreError> {
        self.store.wipe()
    }

    fn write_record<T: serde::Serialize>(
        &mut self,
        offset: usize,
        slot_len: usize,
        value: &T,
    ) -> Result<(), StoreError> {
        let mut slot = [0u8; CONFIG_SLOT_LEN];
        let slot = &mut slot[..slot_len];
        let used = record::encode(value, slot).map_err(|_| StoreError::OutOfRange)?;
        self.store.write(offset, &slot[..used])?;
        self.store.commit()
    }
}

/// Check and consume the first-boot marker
///
/// Returns true exactly once per device lifetime; the caller is expected
/// to wipe the record area when it does.
pub fn first_boot(flags: &mut impl FlagStore) -> Result<bool, StoreError> {
    if flags.get_bool(FIRST_BOOT_KEY, true) {
        flags.put_bool(FIRST_BOOT_KEY, false)?;
        Ok(true)
    } else {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alarm::AlarmRegistry;
    use std::collections::BTreeMap;
    use std::string::String as StdString;

    /// In-memory byte store with commit tracking
    struct MemStore {
        data: [u8; STORE_SIZE],
        dirty: bool,
        commits: usize,
    }

    impl MemStore {
        fn new() -> Self {
            Self {
                data: [0xFF; STORE_SIZE],
                dirty: false,
                commits: 0,
            }
        }
    }

    impl ByteStore for MemStore {
        fn read(&mut self, offset: usize, buf: &mut [u8]) -> Result<(), StoreError> {
            let end = offset.checked_add(buf.len()).ok_or(StoreError::OutOfRange)?;
            let src = self.data.get(offset..end).ok_or(StoreError::OutOfRange)?;
            buf.copy_from_slice(src);
            Ok(())
        }

        fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), StoreError> {
            let end = offset.checked_add(data.len()).ok_or(StoreError::OutOfRange)?;
            let dst = self
                .data
                .get_mut(offset..end)
                .ok_or(StoreError::OutOfRange)?;
            dst.copy_from_slice(data);
            self.dirty = true;
            Ok(())
        }

        fn commit(&mut self) -> Result<(), StoreError> {
            self.dirty = false;
            self.commits += 1;
            Ok(())
        }

        fn wipe(&mut self) -> Result<(), StoreError> {
            self.data.fill(0);
            self.commit()
        }
    }

    struct MemFlags {
        map: BTreeMap<StdString, bool>,
    }

    impl MemFlags {
        fn new() -> Self {
            Self {
                map: BTreeMap::new(),
            }
        }
    }

    impl FlagStore for MemFlags {
        fn get_bool(&mut self, key: &str, default: bool) -> bool {
            self.map.get(key).copied().unwrap_or(default)
        }

        fn put_bool(&mut self, key: &str, value: bool) -> Result<(), StoreError> {
            self.map.insert(key.into(), value);
            Ok(())
        }

        fn wipe(&mut self) -> Result<(), StoreError> {
            self.map.clear();
            Ok(())
        }
    }

    #[test]
    fn test_blank_store_loads_defaults() {
        let mut bridge = PersistBridge::new(MemStore::new());
        let loaded = bridge.load().unwrap();
        assert_eq!(loaded.config, DeviceConfig::default());
        assert!(loaded.alarms.is_empty());
        assert!(!loaded.timer.is_active());
    }

    #[test]
    fn test_save_load_roundtrip() {
        let mut bridge = PersistBridge::new(MemStore::new());

        let mut config = DeviceConfig::default();
        config.device_name = heapless::String::try_from("bedroom").unwrap();
        bridge.save_config(&config).unwrap();

        let mut registry = AlarmRegistry::new();
        registry.add(Alarm::daily(7, 30, "wake")).unwrap();
        registry.add(Alarm::daily(22, 0, "meds")).unwrap();
        bridge.save_alarms(&registry.snapshot()).unwrap();

        let loaded = bridge.load().unwrap();
        assert_eq!(loaded.config.device_name.as_str(), "bedroom");
        // save_config marks the record valid so it is trusted on load
        assert!(loaded.config.config_valid);
        assert_eq!(loaded.alarms.len(), 2);
        assert_eq!(loaded.alarms[0].label.as_str(), "wake");
    }

    #[test]
    fn test_invalid_config_falls_back() {
        let mut store = MemStore::new();
        // Unmarked config record: decodes fine but config_valid is false
        let mut slot = [0u8; CONFIG_SLOT_LEN];
        let used = record::encode(&DeviceConfig::default(), &mut slot).unwrap();
        store.write(CONFIG_OFFSET, &slot[..used]).unwrap();
        store.commit().unwrap();

        let mut bridge = PersistBridge::new(store);
        let loaded = bridge.load().unwrap();
        assert_eq!(loaded.config, DeviceConfig::default());
    }

    #[test]
    fn test_active_timer_does_not_survive_reload() {
        let mut bridge = PersistBridge::new(MemStore::new());

        let mut timer = CountdownTimer::new();
        timer.start(300, "laundry", 0).unwrap();
        bridge.save_timer(&timer).unwrap();

        let loaded = bridge.load().unwrap();
        assert!(!loaded.timer.is_active());
        assert!(!loaded.timer.alert_active());
        assert_eq!(loaded.timer.label.as_str(), "laundry");
    }

    #[test]
    fn test_each_save_commits() {
        let mut bridge = PersistBridge::new(MemStore::new());
        bridge.save_config(&DeviceConfig::default()).unwrap();
        bridge.save_alarms(&Vec::new()).unwrap();
        bridge.save_timer(&CountdownTimer::new()).unwrap();
        assert_eq!(bridge.store.commits, 3);
        assert!(!bridge.store.dirty);
    }

    #[test]
    fn test_wipe_then_load_is_defaults() {
        let mut bridge = PersistBridge::new(MemStore::new());
        let mut registry = AlarmRegistry::new();
        registry.add(Alarm::daily(7, 30, "wake")).unwrap();
        bridge.save_alarms(&registry.snapshot()).unwrap();

        bridge.wipe().unwrap();
        let loaded = bridge.load().unwrap();
        assert!(loaded.alarms.is_empty());
    }

    #[test]
    fn test_first_boot_fires_once() {
        let mut flags = MemFlags::new();
        assert!(first_boot(&mut flags).unwrap());
        assert!(!first_boot(&mut flags).unwrap());
        assert!(!first_boot(&mut flags).unwrap());

        // A factory reset wipes the namespace and re-arms the marker
        FlagStore::wipe(&mut flags).unwrap();
        assert!(first_boot(&mut flags).unwrap());
    }
}
