//! Device controller for the Nexus handset simulator
//!
//! Owns the power/boot state machine, the battery simulation and hardware
//! button routing. Time is virtual: the controller only moves forward when
//! [`DeviceController::advance`] is called, so the whole boot sequence can be
//! exercised in a test without sleeping.
//!
//! # Example
//!
//! ```
//! use nexus_device::{ControllerConfig, DeviceController, PowerState};
//! use nexus_hal::{mock::MockClock, HardwareKey};
//! use std::time::Duration;
//!
//! let clock = Box::new(MockClock::default());
//! let mut device = DeviceController::new(ControllerConfig::default(), clock);
//! device.handle_hardware_button(HardwareKey::Power);
//! device.advance(Duration::from_secs(6));
//! assert_eq!(device.power_state(), PowerState::SetupWizard);
//! ```

pub mod apps;
pub mod controller;
pub mod events;
pub mod scheduler;
pub mod state;

pub use apps::{AppDefinition, AppRegistry, RegistryError};
pub use controller::{ControllerConfig, DeviceController, TickKind};
pub use events::{CueSubscriber, DeviceEvent, EventBus, EventRecorder, EventSubscriber};
pub use scheduler::{Fired, Scheduler, TimerId};
pub use state::{BootTarget, DeviceSnapshot, Notice, Overlays, PowerState};
