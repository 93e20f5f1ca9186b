//! Launcher state and input handling

use crate::calculator::Calculator;
use crate::input::{cycle, hardware_key, key_name};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use nexus_assistant::{AssistantSession, GeminiClient, GeneratedImage};
use nexus_config::{KeyAction, NexusConfig};
use nexus_device::{
    AppDefinition, ControllerConfig, CueSubscriber, DeviceController, DeviceEvent, EventRecorder,
    Notice, PowerState,
};
use nexus_hal::{AudioConfig, Clock, Cue, CuePlayer, DeviceProfile, HardwareKey};
use std::time::Duration;
use tracing::{debug, info, warn};

pub const RECOVERY_OPTIONS: [&str; 8] = [
    "reboot system now",
    "apply update from sdcard",
    "wipe data/factory reset",
    "wipe cache partition",
    "install zip from sdcard",
    "backup and restore",
    "mounts and storage",
    "advanced",
];

pub const MENU_ITEMS: [&str; 3] = ["Wallpaper", "Notifications", "Settings"];

/// Home screen shortcuts; the last home slot opens the drawer
pub const HOME_SHORTCUTS: [&str; 3] = ["phone", "camera", "browser"];

const INSTALL_TIME: Duration = Duration::from_secs(2);

/// Generative work for the main loop to run off the UI task
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Chat {
        epoch: u64,
        prompt: String,
    },
    CreateImage {
        epoch: u64,
        prompt: String,
    },
    EditImage {
        epoch: u64,
        image: GeneratedImage,
        prompt: String,
    },
}

/// Result of a [`Request`]
#[derive(Debug)]
pub enum Reply {
    Chat {
        epoch: u64,
        text: String,
    },
    Image {
        epoch: u64,
        image: Option<GeneratedImage>,
    },
}

/// Market download in progress
#[derive(Debug, Clone)]
pub struct Download {
    pub id: String,
    remaining: Duration,
}

pub struct App {
    pub device: DeviceController,
    pub config: NexusConfig,
    pub profile: DeviceProfile,
    /// Buttons present on the chassis
    keys: Vec<HardwareKey>,
    events: EventRecorder,

    pub session: AssistantSession<GeminiClient>,
    pub gallery: Vec<GeneratedImage>,
    pub gallery_selected: Option<usize>,
    pub gallery_busy: bool,
    pub calculator: Calculator,
    /// Text typed on the virtual keyboard (or dialled) in the current app
    pub input: String,

    pub recovery_selected: usize,
    pub home_selected: usize,
    pub drawer_selected: usize,
    pub menu_selected: usize,
    pub market_selected: usize,
    pub download: Option<Download>,

    /// Blocking popup, dismissed with Enter or Esc
    pub notice: Option<Notice>,
    pub dark_wallpaper: bool,
    pub status: String,
    pub should_quit: bool,

    /// Bumped whenever an app is opened; replies from older epochs are stale
    epoch: u64,
}

impl App {
    pub fn new(config: NexusConfig, clock: Box<dyn Clock>, service: GeminiClient) -> Self {
        let mut device = DeviceController::new(ControllerConfig::from_config(&config), clock);

        let player = CuePlayer::new(AudioConfig {
            volume: config.audio.volume,
            muted: config.audio.muted,
            bell: config.audio.bell,
        });
        device.subscribe(Box::new(CueSubscriber::new(player)));

        let events = EventRecorder::new();
        device.subscribe(Box::new(events.clone()));

        let profile = DeviceProfile::nexus_one();
        Self {
            device,
            config,
            keys: profile.hardware_keys(),
            profile,
            events,
            session: AssistantSession::new(service),
            gallery: Vec::new(),
            gallery_selected: None,
            gallery_busy: false,
            calculator: Calculator::default(),
            input: String::new(),
            recovery_selected: 0,
            home_selected: 0,
            drawer_selected: 0,
            menu_selected: 0,
            market_selected: 0,
            download: None,
            notice: None,
            dark_wallpaper: false,
            status: "Ready".to_string(),
            should_quit: false,
            epoch: 0,
        }
    }

    /// Simulate a different chassis. Keys it lacks stop reaching the device.
    pub fn with_profile(mut self, profile: DeviceProfile) -> Self {
        self.keys = profile.hardware_keys();
        self.profile = profile;
        self
    }

    pub fn service(&self) -> GeminiClient {
        self.session.service().clone()
    }

    /// Display name for an app id
    pub fn app_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.device
            .apps()
            .get(id)
            .map(|app| app.name.as_str())
            .unwrap_or(id)
    }

    /// Apps listed in the Market
    pub fn market_apps(&self) -> Vec<&AppDefinition> {
        self.device.apps().all().iter().filter(|a| !a.system).collect()
    }

    /// Advance real time by one frame
    pub fn advance(&mut self, elapsed: Duration) {
        self.device.advance(elapsed);

        if let Some(download) = &mut self.download {
            download.remaining = download.remaining.saturating_sub(elapsed);
            if download.remaining.is_zero() {
                let id = download.id.clone();
                self.download = None;
                match self.device.apps_mut().install(&id) {
                    Ok(app) => self.status = format!("Installed {}", app.name),
                    Err(e) => {
                        warn!("Install failed: {}", e);
                        self.status = e.to_string();
                    }
                }
            }
        }

        self.drain_events();
    }

    fn drain_events(&mut self) {
        for event in self.events.take() {
            match event {
                DeviceEvent::ChargingChanged { charging } => {
                    self.status = if charging {
                        "Charger connected".to_string()
                    } else {
                        "Charger disconnected".to_string()
                    };
                }
                DeviceEvent::EmergencyShutdown => {
                    self.status = "Battery empty, shutting down".to_string();
                }
                DeviceEvent::PowerChanged { to, .. } => {
                    if to == PowerState::Off {
                        self.status = "Powered off".to_string();
                    } else if to == PowerState::Home {
                        self.status = "Ready".to_string();
                    }
                }
                DeviceEvent::AppOpened(id) => {
                    self.status = self.app_name(&id).to_string();
                }
                _ => {}
            }
        }
    }

    /// Handle a terminal key press
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Request> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return None;
        }

        if self.notice.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.notice = None;
            }
            return None;
        }

        if let Some(action) = key_name(key.code).and_then(|name| self.config.keys.action_for(&name))
        {
            self.dispatch(action);
            return None;
        }

        match self.device.power_state() {
            PowerState::Recovery => self.recovery_key(key.code),
            PowerState::SetupWizard => {
                if key.code == KeyCode::Enter {
                    self.device.start_setup();
                }
            }
            PowerState::Home | PowerState::AppOpen => return self.interactive_key(key),
            PowerState::Off | PowerState::BootLogo | PowerState::BootAnimation => {}
        }
        None
    }

    fn dispatch(&mut self, action: KeyAction) {
        match action {
            KeyAction::ToggleCharger => {
                let charging = !self.device.is_charging();
                self.device.set_charging(charging);
            }
            KeyAction::Quit => self.should_quit = true,
            _ => {
                if let Some(key) = hardware_key(action) {
                    self.press(key);
                }
            }
        }
    }

    /// Deliver a chassis button to the device
    pub fn press(&mut self, key: HardwareKey) {
        if !self.keys.contains(&key) {
            debug!("{} has no {} key", self.profile.name, key);
            return;
        }

        if self.device.power_state() == PowerState::Recovery {
            // The volume rocker scrolls the recovery menu
            match key {
                HardwareKey::VolUp => self.recovery_move(-1),
                HardwareKey::VolDown => self.recovery_move(1),
                _ => {}
            }
        }

        if let Some(notice) = self.device.handle_hardware_button(key) {
            info!("Notice: {}", notice.message());
            self.notice = Some(notice);
        }
    }

    fn recovery_move(&mut self, delta: isize) {
        let last = RECOVERY_OPTIONS.len() as isize - 1;
        let selected = self.recovery_selected as isize + delta;
        self.recovery_selected = selected.clamp(0, last) as usize;
    }

    fn recovery_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up => self.recovery_move(-1),
            KeyCode::Down => self.recovery_move(1),
            KeyCode::Enter => {
                if self.recovery_selected == 0 {
                    self.press(HardwareKey::Power);
                } else {
                    let option = RECOVERY_OPTIONS[self.recovery_selected];
                    self.status = format!("{}: not available", option);
                }
            }
            _ => {}
        }
    }

    fn interactive_key(&mut self, key: KeyEvent) -> Option<Request> {
        match key.code {
            // Status bar tap
            KeyCode::Tab => {
                self.device.toggle_shade();
                return None;
            }
            KeyCode::BackTab => {
                self.device.hide_keyboard();
                return None;
            }
            _ => {}
        }

        let overlays = self.device.overlays();
        if overlays.shade {
            if key.code == KeyCode::Enter {
                self.device.cue(Cue::Click);
                self.device.toggle_shade();
            }
            return None;
        }
        if overlays.menu {
            self.menu_key(key.code);
            return None;
        }

        match self.device.foreground_app().map(str::to_string) {
            Some(id) => self.app_key(&id, key),
            None if overlays.drawer => {
                self.drawer_key(key.code);
                None
            }
            None => {
                self.home_key(key.code);
                None
            }
        }
    }

    fn home_key(&mut self, code: KeyCode) {
        let slots = HOME_SHORTCUTS.len() + 1;
        match code {
            KeyCode::Left => self.home_selected = cycle(self.home_selected, -1, slots),
            KeyCode::Right => self.home_selected = cycle(self.home_selected, 1, slots),
            KeyCode::Enter => match HOME_SHORTCUTS.get(self.home_selected) {
                Some(id) => self.open_app(id),
                None => {
                    self.drawer_selected = 0;
                    self.device.open_drawer();
                }
            },
            // Long press on the wallpaper
            KeyCode::Char(' ') => self.device.long_press_home(),
            _ => {}
        }
    }

    fn drawer_key(&mut self, code: KeyCode) {
        let count = self.device.apps().installed().len();
        match code {
            KeyCode::Left | KeyCode::Up => {
                self.drawer_selected = cycle(self.drawer_selected, -1, count)
            }
            KeyCode::Right | KeyCode::Down => {
                self.drawer_selected = cycle(self.drawer_selected, 1, count)
            }
            KeyCode::Enter => {
                let id = self
                    .device
                    .apps()
                    .installed()
                    .get(self.drawer_selected)
                    .map(|app| app.id.clone());
                if let Some(id) = id {
                    self.open_app(&id);
                }
            }
            _ => {}
        }
    }

    fn menu_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Left | KeyCode::Up => {
                self.menu_selected = cycle(self.menu_selected, -1, MENU_ITEMS.len())
            }
            KeyCode::Right | KeyCode::Down => {
                self.menu_selected = cycle(self.menu_selected, 1, MENU_ITEMS.len())
            }
            KeyCode::Enter => {
                self.device.close_menu();
                match MENU_ITEMS[self.menu_selected] {
                    "Wallpaper" => {
                        self.device.cue(Cue::Click);
                        self.dark_wallpaper = !self.dark_wallpaper;
                    }
                    "Notifications" => {
                        self.device.cue(Cue::Click);
                        self.device.toggle_shade();
                    }
                    _ => self.open_app("settings"),
                }
            }
            _ => {}
        }
    }

    /// Open an app, resetting its screen state
    pub fn open_app(&mut self, id: &str) {
        self.epoch += 1;
        self.input.clear();
        match id {
            "gemini" => self.session = AssistantSession::new(self.service()),
            "calculator" => self.calculator = Calculator::default(),
            "market" => self.market_selected = 0,
            "gallery" => {
                self.gallery_selected = None;
                self.gallery_busy = false;
            }
            _ => {}
        }
        self.device.open_app(id);
    }

    fn app_key(&mut self, id: &str, key: KeyEvent) -> Option<Request> {
        if self.device.overlays().keyboard {
            match key.code {
                KeyCode::Char(c) => {
                    self.device.virtual_key(&c.to_string());
                    self.input.push(c);
                    return None;
                }
                KeyCode::Backspace => {
                    self.device.virtual_key("DEL");
                    self.input.pop();
                    return None;
                }
                _ => {}
            }
        }

        match id {
            "gemini" if key.code == KeyCode::Enter => self.send_chat(),
            "gallery" => self.gallery_key(key.code),
            "market" => {
                self.market_key(key.code);
                None
            }
            "calculator" => {
                if let KeyCode::Char(c) = key.code {
                    if c.is_ascii_digit() || "+-*/x=Cc".contains(c) {
                        self.calculator.press(c);
                        self.device.cue(Cue::Click);
                    }
                } else if key.code == KeyCode::Enter {
                    self.calculator.press('=');
                    self.device.cue(Cue::Click);
                }
                None
            }
            "phone" => {
                self.phone_key(key.code);
                None
            }
            _ => {
                if key.code == KeyCode::Enter && !self.input.trim().is_empty() {
                    self.device.cue(Cue::Click);
                    self.status = format!("Sent: {}", self.input.trim());
                    self.input.clear();
                }
                None
            }
        }
    }

    fn send_chat(&mut self) -> Option<Request> {
        let prompt = self.session.begin(self.input.trim())?;
        self.input.clear();
        self.device.cue(Cue::Click);
        Some(Request::Chat {
            epoch: self.epoch,
            prompt,
        })
    }

    fn gallery_key(&mut self, code: KeyCode) -> Option<Request> {
        let count = self.gallery.len();
        match code {
            KeyCode::Up if count > 0 => {
                self.gallery_selected = Some(match self.gallery_selected {
                    Some(i) => cycle(i, -1, count),
                    None => count - 1,
                });
                None
            }
            KeyCode::Down if count > 0 => {
                self.gallery_selected = Some(match self.gallery_selected {
                    Some(i) => cycle(i, 1, count),
                    None => 0,
                });
                None
            }
            KeyCode::Left => {
                self.gallery_selected = None;
                None
            }
            KeyCode::Enter => {
                let prompt = self.input.trim().to_string();
                if self.gallery_busy || prompt.is_empty() {
                    return None;
                }
                self.gallery_busy = true;
                self.input.clear();
                self.device.cue(Cue::Click);

                let epoch = self.epoch;
                Some(match self.gallery_selected.and_then(|i| self.gallery.get(i)) {
                    Some(image) => Request::EditImage {
                        epoch,
                        image: image.clone(),
                        prompt,
                    },
                    None => Request::CreateImage { epoch, prompt },
                })
            }
            _ => None,
        }
    }

    fn market_key(&mut self, code: KeyCode) {
        let count = self.market_apps().len();
        match code {
            KeyCode::Up => self.market_selected = cycle(self.market_selected, -1, count),
            KeyCode::Down => self.market_selected = cycle(self.market_selected, 1, count),
            KeyCode::Enter => {
                let Some(app) = self.market_apps().get(self.market_selected).map(|a| (*a).clone())
                else {
                    return;
                };
                if app.installed {
                    self.open_app(&app.id);
                } else if self.download.is_none() {
                    self.device.cue(Cue::Click);
                    self.status = format!("Downloading {}...", app.name);
                    self.download = Some(Download {
                        id: app.id,
                        remaining: INSTALL_TIME,
                    });
                }
            }
            _ => {}
        }
    }

    fn phone_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char(c) if c.is_ascii_digit() || c == '*' || c == '#' => {
                self.device.cue(Cue::Click);
                self.input.push(c);
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Enter if !self.input.is_empty() => {
                self.device.cue(Cue::Click);
                self.status = format!("Calling {}...", self.input);
            }
            _ => {}
        }
    }

    /// Apply a finished request, unless the app that asked has gone away
    pub fn on_reply(&mut self, reply: Reply) {
        let foreground = self.device.foreground_app().map(str::to_string);
        match reply {
            Reply::Chat { epoch, text } => {
                if epoch == self.epoch && foreground.as_deref() == Some("gemini") {
                    self.session.finish(&text);
                } else {
                    debug!("Discarding stale assistant reply");
                }
            }
            Reply::Image { epoch, image } => {
                if epoch != self.epoch || foreground.as_deref() != Some("gallery") {
                    debug!("Discarding stale image");
                    return;
                }
                self.gallery_busy = false;
                match image {
                    Some(image) => {
                        self.status = format!("Created {}", image.summary());
                        self.gallery.insert(0, image);
                        self.gallery_selected = Some(0);
                    }
                    None => {
                        self.device.cue(Cue::Error);
                        self.status = "Image generation failed".to_string();
                    }
                }
            }
        }
    }
}
