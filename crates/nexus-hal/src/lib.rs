//! Hardware Abstraction Layer (HAL)
//!
//! Simulated hardware for the Nexus handset: the physical keys, the battery,
//! audio feedback cues and the wall clock. Everything here is in-memory; the
//! device controller consumes these primitives and the launcher renders them.
//!
//! # Example
//!
//! ```
//! use nexus_hal::{Battery, HardwareKey, PowerConfig};
//!
//! let mut battery = Battery::new(PowerConfig::default());
//! battery.set_charging(true);
//! assert_eq!(battery.tick().level, 86);
//! assert_eq!(HardwareKey::parse("trackball"), Some(HardwareKey::Search));
//! ```

pub mod audio;
pub mod clock;
pub mod device;
pub mod input;
pub mod mock;
pub mod power;

pub use audio::{AudioConfig, Cue, CuePlayer, CueSink, Tone, Waveform};
pub use clock::{Clock, SystemClock, WallTime};
pub use device::{DeviceError, DeviceProfile, DisplaySpec};
pub use input::HardwareKey;
pub use power::{Battery, BatteryStatus, BatteryTick, PowerConfig};

/// HAL Result type
pub type Result<T> = std::result::Result<T, DeviceError>;
