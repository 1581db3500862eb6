//! Configuration type definitions
//!
//! These types represent the device configuration. Configuration is stored
//! in the persistent byte store as a versioned postcard record.

use heapless::String;
use serde::{Deserialize, Serialize};

/// Firmware version reported on the info page and the console
pub const FIRMWARE_VERSION: &str = "v0.1.0";

/// Maximum label length (also the character width of the display)
pub const MAX_LABEL_LEN: usize = 16;

/// Maximum scheduled alarms
pub const MAX_ALARMS: usize = 5;

/// Display width in characters
pub const DISPLAY_COLS: usize = 16;

/// Device configuration
///
/// `config_valid` doubles as the first-run marker: a freshly wiped store
/// deserializes (or defaults) to `config_valid = false`, in which case the
/// compiled-in defaults are used without being written back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceConfig {
    /// Device name shown on the info page
    pub device_name: String<32>,
    /// Config hotspot SSID (used by the out-of-scope network layer)
    pub hotspot_ssid: String<32>,
    /// Config hotspot password
    pub hotspot_password: String<32>,
    /// Set by `save_config`; unset means "never saved"
    pub config_valid: bool,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        let mut device_name = String::new();
        let _ = device_name.push_str("Reveille Clock");
        let mut hotspot_ssid = String::new();
        let _ = hotspot_ssid.push_str("REVEILLE");
        let mut hotspot_password = String::new();
        let _ = hotspot_password.push_str("12345678");
        Self {
            device_name,
            hotspot_ssid,
            hotspot_password,
            config_valid: false,
        }
    }
}

/// Per-peripheral boot status
///
/// Populated once during hardware bring-up. A failed peripheral is flagged
/// and reported, but does not keep working subsystems from running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HardwareStatus {
    /// Real-time clock answered on the bus
    pub clock_ok: bool,
    /// Character display initialized
    pub display_ok: bool,
    /// Network layer reported reachability at boot
    pub network_ok: bool,
}
