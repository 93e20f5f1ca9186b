//! Power, boot and app-lifecycle controller
//!
//! `DeviceController` is the single owner of the power state, the simulated
//! battery and the UI overlay flags. It is driven by three inputs: hardware
//! button presses, touch actions from the renderer, and timers firing on its
//! virtual-time [`Scheduler`]. Every observable change is published on the
//! [`EventBus`].

use crate::apps::AppRegistry;
use crate::events::{DeviceEvent, EventBus, EventSubscriber};
use crate::scheduler::{Scheduler, TimerId};
use crate::state::{BackLayer, BootTarget, DeviceSnapshot, Notice, Overlays, PowerState};
use nexus_config::NexusConfig;
use nexus_hal::{Battery, Clock, Cue, HardwareKey, PowerConfig};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Periodic inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickKind {
    /// Refresh the time and date strings
    Clock,
    /// Charge or drain the battery by one percent
    Battery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeviceTimer {
    Tick(TickKind),
    BootStage,
}

/// Timings and initial values for a controller
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    pub power: PowerConfig,
    pub logo_duration: Duration,
    pub animation_duration: Duration,
    pub clock_tick: Duration,
    /// Apps that bring up the virtual keyboard
    pub text_entry: Vec<String>,
}

impl ControllerConfig {
    pub fn from_config(config: &NexusConfig) -> Self {
        Self {
            power: PowerConfig {
                initial_level: config.power.initial_level,
                charging: config.power.charging,
                charge_interval: config.power.charge_interval(),
                drain_interval: config.power.drain_interval(),
                low_battery_threshold: config.power.low_battery_threshold,
            },
            logo_duration: config.boot.logo(),
            animation_duration: config.boot.animation(),
            clock_tick: config.clock.tick(),
            text_entry: config.apps.text_entry.clone(),
        }
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self::from_config(&NexusConfig::default())
    }
}

pub struct DeviceController {
    config: ControllerConfig,
    power: PowerState,
    battery: Battery,
    foreground: Option<String>,
    overlays: Overlays,
    pending_boot: Option<BootTarget>,
    apps: AppRegistry,
    scheduler: Scheduler<DeviceTimer>,
    battery_timer: TimerId,
    boot_timer: Option<TimerId>,
    clock: Box<dyn Clock>,
    time_text: String,
    date_text: String,
    bus: EventBus,
}

impl DeviceController {
    /// Create a never-booted device sitting in recovery
    pub fn new(config: ControllerConfig, clock: Box<dyn Clock>) -> Self {
        let battery = Battery::new(config.power.clone());
        let apps = AppRegistry::new(config.text_entry.iter().cloned());

        let mut scheduler = Scheduler::new();
        scheduler.schedule_every(config.clock_tick, DeviceTimer::Tick(TickKind::Clock));
        let battery_timer =
            scheduler.schedule_every(battery.tick_interval(), DeviceTimer::Tick(TickKind::Battery));

        let now = clock.now();
        info!(
            "Device created in recovery, battery {}%{}",
            battery.level(),
            if battery.is_charging() { " (charging)" } else { "" }
        );

        Self {
            config,
            power: PowerState::Recovery,
            battery,
            foreground: None,
            overlays: Overlays::default(),
            pending_boot: None,
            apps,
            scheduler,
            battery_timer,
            boot_timer: None,
            clock,
            time_text: now.time_text(),
            date_text: now.date_text(),
            bus: EventBus::new(),
        }
    }

    pub fn subscribe(&mut self, subscriber: Box<dyn EventSubscriber>) {
        self.bus.subscribe(subscriber);
    }

    /// Route a hardware button press. Every press clicks, even when ignored.
    pub fn handle_hardware_button(&mut self, key: HardwareKey) -> Option<Notice> {
        self.cue(Cue::Click);
        debug!("Button {} in {}", key, self.power);

        match self.power {
            PowerState::BootLogo | PowerState::BootAnimation => {
                debug!("Ignoring {} during boot", key);
                None
            }
            PowerState::Off => match key {
                HardwareKey::Power | HardwareKey::Search => {
                    if self.battery.is_empty() {
                        warn!("Power pressed with an empty battery");
                        self.bus.publish(DeviceEvent::Notice(Notice::BatteryEmpty));
                        Some(Notice::BatteryEmpty)
                    } else {
                        self.start_boot(BootTarget::Home);
                        None
                    }
                }
                _ => None,
            },
            PowerState::Recovery => {
                if matches!(key, HardwareKey::Power | HardwareKey::Search) {
                    self.start_boot(BootTarget::SetupWizard);
                }
                None
            }
            PowerState::SetupWizard => {
                if key == HardwareKey::Power {
                    self.power_off();
                }
                None
            }
            PowerState::Home | PowerState::AppOpen => {
                match key {
                    HardwareKey::Home => self.go_home(),
                    HardwareKey::Back => {
                        self.back();
                    }
                    HardwareKey::Menu => {
                        if self.foreground.is_none() {
                            self.overlays.menu = !self.overlays.menu;
                            self.publish_overlays();
                        }
                    }
                    HardwareKey::Power => self.power_off(),
                    HardwareKey::Search | HardwareKey::VolUp | HardwareKey::VolDown => {}
                }
                None
            }
        }
    }

    /// Apply one periodic tick
    pub fn tick(&mut self, kind: TickKind) {
        match kind {
            TickKind::Clock => {
                let now = self.clock.now();
                self.time_text = now.time_text();
                self.date_text = now.date_text();
            }
            TickKind::Battery => {
                let tick = self.battery.tick();
                if tick.changed() {
                    self.bus.publish(DeviceEvent::BatteryChanged { level: tick.level });
                }
                self.check_battery();
            }
        }
    }

    /// Advance virtual time, firing every timer that comes due in deadline order
    pub fn advance(&mut self, elapsed: Duration) {
        let until = self.scheduler.now() + elapsed;
        while let Some(fired) = self.scheduler.pop_due(until) {
            match fired.task {
                DeviceTimer::Tick(kind) => self.tick(kind),
                DeviceTimer::BootStage => {
                    if self.boot_timer == Some(fired.id) {
                        self.boot_timer = None;
                        self.next_boot_stage();
                    }
                }
            }
        }
        self.scheduler.advance_to(until);
    }

    /// Plug or unplug the charger. The battery timer restarts with the new period.
    pub fn set_charging(&mut self, charging: bool) {
        if !self.battery.set_charging(charging) {
            return;
        }
        self.scheduler.cancel(self.battery_timer);
        self.battery_timer = self.scheduler.schedule_every(
            self.battery.tick_interval(),
            DeviceTimer::Tick(TickKind::Battery),
        );
        self.bus.publish(DeviceEvent::ChargingChanged { charging });
    }

    /// Finish the setup wizard
    pub fn start_setup(&mut self) {
        if self.power != PowerState::SetupWizard {
            return;
        }
        self.cue(Cue::Unlock);
        self.transition(PowerState::Home);
    }

    /// Bring an app to the foreground. Ids are not checked against the registry.
    pub fn open_app(&mut self, id: &str) {
        if !self.power.is_interactive() {
            return;
        }
        self.cue(Cue::Click);

        if let Some(previous) = self.foreground.take() {
            self.bus.publish(DeviceEvent::AppClosed(previous));
        }
        self.foreground = Some(id.to_string());
        self.overlays.drawer = false;
        self.overlays.keyboard = self.apps.is_text_entry(id);

        info!("Opened {}", id);
        self.bus.publish(DeviceEvent::AppOpened(id.to_string()));
        self.transition(PowerState::AppOpen);
        self.publish_overlays();
    }

    /// Return from the foreground app to the home screen
    pub fn close_app(&mut self) {
        if self.foreground.is_none() {
            return;
        }
        self.clear_foreground();
        self.transition(PowerState::Home);
        self.publish_overlays();
    }

    pub fn open_drawer(&mut self) {
        if self.power == PowerState::Home && !self.overlays.drawer {
            self.cue(Cue::Click);
            self.overlays.drawer = true;
            self.publish_overlays();
        }
    }

    /// Status bar tap
    pub fn toggle_shade(&mut self) {
        if self.power.is_interactive() {
            self.overlays.shade = !self.overlays.shade;
            self.publish_overlays();
        }
    }

    pub fn close_menu(&mut self) {
        if self.overlays.menu {
            self.overlays.menu = false;
            self.publish_overlays();
        }
    }

    pub fn hide_keyboard(&mut self) {
        if self.overlays.keyboard {
            self.overlays.keyboard = false;
            self.publish_overlays();
        }
    }

    /// Long press on the home screen wallpaper opens the context menu
    pub fn long_press_home(&mut self) {
        if self.power == PowerState::Home
            && self.foreground.is_none()
            && !self.overlays.drawer
            && !self.overlays.shade
        {
            self.cue(Cue::Click);
            self.overlays.menu = true;
            self.publish_overlays();
        }
    }

    /// Key on the on-screen keyboard. Ignored while the keyboard is hidden.
    pub fn virtual_key(&mut self, key: &str) {
        if !self.overlays.keyboard {
            return;
        }
        self.cue(Cue::Type);
        self.bus.publish(DeviceEvent::VirtualKey(key.to_string()));
    }

    /// Publish a UI cue on behalf of an app screen
    pub fn cue(&mut self, cue: Cue) {
        self.bus.publish(DeviceEvent::Cue(cue));
    }

    pub fn power_state(&self) -> PowerState {
        self.power
    }

    pub fn battery_level(&self) -> u8 {
        self.battery.level()
    }

    pub fn is_charging(&self) -> bool {
        self.battery.is_charging()
    }

    pub fn battery(&self) -> &Battery {
        &self.battery
    }

    pub fn foreground_app(&self) -> Option<&str> {
        self.foreground.as_deref()
    }

    pub fn overlays(&self) -> Overlays {
        self.overlays
    }

    pub fn time_text(&self) -> &str {
        &self.time_text
    }

    pub fn date_text(&self) -> &str {
        &self.date_text
    }

    pub fn pending_boot_target(&self) -> Option<BootTarget> {
        self.pending_boot
    }

    pub fn apps(&self) -> &AppRegistry {
        &self.apps
    }

    pub fn apps_mut(&mut self) -> &mut AppRegistry {
        &mut self.apps
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Virtual time since creation
    pub fn uptime(&self) -> Duration {
        self.scheduler.now()
    }

    pub fn snapshot(&self) -> DeviceSnapshot {
        DeviceSnapshot {
            power: self.power,
            battery_level: self.battery.level(),
            charging: self.battery.is_charging(),
            battery_low: self.battery.is_low(),
            foreground_app: self.foreground.clone(),
            overlays: self.overlays,
            time: self.time_text.clone(),
            date: self.date_text.clone(),
        }
    }

    fn transition(&mut self, to: PowerState) {
        let from = self.power;
        if from == to {
            return;
        }
        info!("Power state {} -> {}", from, to);
        self.power = to;
        self.bus.publish(DeviceEvent::PowerChanged { from, to });
    }

    fn start_boot(&mut self, target: BootTarget) {
        info!("Booting towards {:?}", target);
        self.pending_boot = Some(target);
        self.transition(PowerState::BootLogo);
        self.boot_timer = Some(
            self.scheduler
                .schedule_once(self.config.logo_duration, DeviceTimer::BootStage),
        );
        // Only Recovery can start a boot on an empty battery
        self.check_battery();
    }

    fn next_boot_stage(&mut self) {
        match self.power {
            PowerState::BootLogo => {
                self.transition(PowerState::BootAnimation);
                self.boot_timer = Some(
                    self.scheduler
                        .schedule_once(self.config.animation_duration, DeviceTimer::BootStage),
                );
            }
            PowerState::BootAnimation => {
                let target = self.pending_boot.take().unwrap_or_else(|| {
                    warn!("Boot finished without a target, going home");
                    BootTarget::Home
                });
                if target == BootTarget::Home {
                    self.cue(Cue::Unlock);
                }
                self.transition(target.into());
            }
            other => debug!("Stale boot timer in {}", other),
        }
    }

    fn go_home(&mut self) {
        self.clear_foreground();
        self.overlays.clear();
        self.transition(PowerState::Home);
        self.publish_overlays();
    }

    fn back(&mut self) -> Option<BackLayer> {
        let layer = if self.overlays.shade {
            self.overlays.shade = false;
            BackLayer::Shade
        } else if self.overlays.menu {
            self.overlays.menu = false;
            BackLayer::Menu
        } else if self.foreground.is_some() {
            self.clear_foreground();
            self.transition(PowerState::Home);
            BackLayer::App
        } else if self.overlays.drawer {
            self.overlays.drawer = false;
            BackLayer::Drawer
        } else {
            debug!("Back with nothing to close");
            return None;
        };
        debug!("Back closed {:?}", layer);
        self.publish_overlays();
        Some(layer)
    }

    fn clear_foreground(&mut self) {
        self.overlays.keyboard = false;
        if let Some(app) = self.foreground.take() {
            info!("Closed {}", app);
            self.bus.publish(DeviceEvent::AppClosed(app));
        }
    }

    fn power_off(&mut self) {
        if let Some(timer) = self.boot_timer.take() {
            self.scheduler.cancel(timer);
        }
        self.pending_boot = None;
        self.clear_foreground();
        self.overlays.clear();
        self.transition(PowerState::Off);
        self.publish_overlays();
    }

    fn check_battery(&mut self) {
        if self.battery.is_empty() && !self.power.survives_empty_battery() {
            warn!("Battery empty in {}, shutting down", self.power);
            self.bus.publish(DeviceEvent::EmergencyShutdown);
            self.power_off();
        }
    }

    fn publish_overlays(&mut self) {
        self.bus.publish(DeviceEvent::OverlaysChanged(self.overlays));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexus_hal::mock::MockClock;

    fn controller() -> DeviceController {
        DeviceController::new(ControllerConfig::default(), Box::new(MockClock::default()))
    }

    fn booted_home() -> DeviceController {
        let mut device = controller();
        device.handle_hardware_button(HardwareKey::Power);
        device.advance(Duration::from_secs(6));
        device.start_setup();
        device
    }

    #[test]
    fn test_initial_state() {
        let device = controller();
        assert_eq!(device.power_state(), PowerState::Recovery);
        assert_eq!(device.battery_level(), 85);
        assert!(!device.is_charging());
        assert_eq!(device.foreground_app(), None);
        assert_eq!(device.time_text(), "12:00");
        assert_eq!(device.date_text(), "Mon, Oct 20");
    }

    #[test]
    fn test_first_boot_sequence() {
        let mut device = controller();
        device.handle_hardware_button(HardwareKey::Power);
        assert_eq!(device.power_state(), PowerState::BootLogo);
        assert_eq!(device.pending_boot_target(), Some(BootTarget::SetupWizard));

        device.advance(Duration::from_millis(1999));
        assert_eq!(device.power_state(), PowerState::BootLogo);
        device.advance(Duration::from_millis(1));
        assert_eq!(device.power_state(), PowerState::BootAnimation);
        device.advance(Duration::from_secs(4));
        assert_eq!(device.power_state(), PowerState::SetupWizard);
        assert_eq!(device.pending_boot_target(), None);
    }

    #[test]
    fn test_back_returns_layer() {
        let mut device = booted_home();
        device.open_drawer();
        device.open_app("calculator");
        assert!(!device.overlays().drawer);

        assert_eq!(device.back(), Some(BackLayer::App));
        assert_eq!(device.back(), None);
    }

    #[test]
    fn test_open_app_text_entry_keyboard() {
        let mut device = booted_home();
        device.open_app("browser");
        assert!(device.overlays().keyboard);
        device.open_app("clock");
        assert!(!device.overlays().keyboard);
        assert_eq!(device.foreground_app(), Some("clock"));
    }

    #[test]
    fn test_snapshot_matches_getters() {
        let mut device = booted_home();
        device.open_app("maps");
        let snapshot = device.snapshot();
        assert_eq!(snapshot.power, PowerState::AppOpen);
        assert_eq!(snapshot.foreground_app.as_deref(), Some("maps"));
        assert_eq!(snapshot.battery_level, device.battery_level());
    }

    #[test]
    fn test_from_config() {
        let mut config = NexusConfig::default();
        config.power.initial_level = 3;
        config.boot.logo_ms = 10;
        let controller_config = ControllerConfig::from_config(&config);
        assert_eq!(controller_config.power.initial_level, 3);
        assert_eq!(controller_config.logo_duration, Duration::from_millis(10));
    }
}
