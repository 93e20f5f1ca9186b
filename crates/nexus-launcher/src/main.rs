//! Nexus One simulator
//!
//! Terminal front end for the handset: renders the chassis and screens,
//! maps keyboard input to hardware buttons and runs assistant requests in
//! the background while the device keeps ticking.

mod app;
mod calculator;
mod input;
mod ui;

use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures_util::StreamExt;
use nexus_assistant::{GeminiClient, create_image, edit_image, respond};
use nexus_config::{ENV_PREFIX, NexusConfig};
use nexus_hal::{DeviceProfile, SystemClock};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{error, info};

use app::{App, Reply, Request};

const FRAME: Duration = Duration::from_millis(100);

/// Command line options
#[derive(Debug, Default, PartialEq)]
struct Options {
    config: Option<PathBuf>,
    profile: Option<PathBuf>,
    /// Write the effective configuration here and exit
    write_config: Option<PathBuf>,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Options> {
    let mut args = args.into_iter();
    let mut options = Options::default();
    while let Some(arg) = args.next() {
        let mut value = |flag: &str| -> Result<PathBuf> {
            let path = args.next().with_context(|| format!("{} needs a path", flag))?;
            Ok(PathBuf::from(path))
        };
        match arg.as_str() {
            "--config" | "-c" => options.config = Some(value("--config")?),
            "--profile" | "-p" => options.profile = Some(value("--profile")?),
            "--write-config" => options.write_config = Some(value("--write-config")?),
            other => anyhow::bail!("Unknown argument: {}", other),
        }
    }
    Ok(options)
}

fn load_config(options: &Options) -> Result<NexusConfig> {
    let mut config = match &options.config {
        Some(path) => NexusConfig::load_layered(Some(path.as_path()), ENV_PREFIX)?,
        None => NexusConfig::load_default()?,
    };
    if let Some(profile) = &options.profile {
        config.device.profile = Some(profile.clone());
    }
    Ok(config)
}

fn load_profile(config: &NexusConfig) -> Result<DeviceProfile> {
    match &config.device.profile {
        Some(path) => DeviceProfile::from_profile_file(path)
            .with_context(|| format!("Failed to load device profile {}", path.display())),
        None => Ok(DeviceProfile::nexus_one()),
    }
}

fn system_clock(config: &NexusConfig) -> Result<SystemClock> {
    match config.clock.utc_offset_minutes {
        Some(minutes) => SystemClock::with_offset_minutes(minutes)
            .with_context(|| format!("UTC offset of {} minutes is out of range", minutes)),
        None => Ok(SystemClock::local()),
    }
}

/// Log to a file; the terminal belongs to the UI
fn setup_logging(config: &NexusConfig) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let path = config.logging.file_path();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

/// Run a generative request off the UI task and post the reply back
fn spawn_request(service: GeminiClient, request: Request, replies: mpsc::UnboundedSender<Reply>) {
    tokio::spawn(async move {
        let reply = match request {
            Request::Chat { epoch, prompt } => Reply::Chat {
                epoch,
                text: respond(&service, &prompt).await,
            },
            Request::CreateImage { epoch, prompt } => Reply::Image {
                epoch,
                image: create_image(&service, &prompt).await,
            },
            Request::EditImage {
                epoch,
                image,
                prompt,
            } => Reply::Image {
                epoch,
                image: edit_image(&service, &image, &prompt).await,
            },
        };
        // The UI may already be gone
        let _ = replies.send(reply);
    });
}

async fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    let mut events = EventStream::new();
    let mut frames = tokio::time::interval(FRAME);
    let (reply_tx, mut reply_rx) = mpsc::unbounded_channel();
    let mut last_frame = Instant::now();

    loop {
        terminal.draw(|f| ui::draw_ui(f, app))?;

        tokio::select! {
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    if let Some(request) = app.handle_key(key) {
                        spawn_request(app.service(), request, reply_tx.clone());
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
            _ = frames.tick() => {
                let now = Instant::now();
                app.advance(now - last_frame);
                last_frame = now;
            }
            Some(reply) = reply_rx.recv() => app.on_reply(reply),
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let options = parse_args(std::env::args().skip(1))?;
    let config = load_config(&options)?;

    if let Some(path) = &options.write_config {
        config.save(path)?;
        println!("Wrote configuration to {}", path.display());
        return Ok(());
    }

    setup_logging(&config)?;

    info!("Nexus One simulator starting...");

    let profile = load_profile(&config)?;
    let clock = system_clock(&config)?;
    let service =
        GeminiClient::new(&config.assistant).context("Failed to create assistant client")?;
    let mut app = App::new(config, Box::new(clock), service).with_profile(profile);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        error!("Launcher failed: {:#}", e);
    }
    info!("Nexus One simulator exiting");
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexus_hal::HardwareKey;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args() {
        let options = parse_args(args(&["-c", "nexus.toml", "--profile", "dream.toml"])).unwrap();
        assert_eq!(options.config, Some(PathBuf::from("nexus.toml")));
        assert_eq!(options.profile, Some(PathBuf::from("dream.toml")));
        assert_eq!(options.write_config, None);

        assert!(parse_args(args(&["--config"])).is_err());
        assert!(parse_args(args(&["--verbose"])).is_err());
        assert_eq!(parse_args(args(&[])).unwrap(), Options::default());
    }

    #[test]
    fn test_written_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nexus.toml");

        let mut config = NexusConfig::default();
        config.power.initial_level = 40;
        config.clock.utc_offset_minutes = Some(60);
        config.save(&path).unwrap();

        let options = Options {
            config: Some(path),
            ..Options::default()
        };
        let loaded = load_config(&options).unwrap();
        assert_eq!(loaded.power.initial_level, 40);
        let offset = system_clock(&loaded).unwrap().offset();
        assert_eq!(offset.map(|o| o.local_minus_utc()), Some(3600));
    }

    #[test]
    fn test_profile_flag_selects_chassis() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dream.toml");
        std::fs::write(
            &path,
            r#"
id = "dream"
name = "T-Mobile G1"
chipset = "MSM7201A"
os_version = "Android 1.6"
keys = ["back", "menu", "home", "power"]
battery_capacity = 1150

[display]
width = 320
height = 480
"#,
        )
        .unwrap();

        let mut config = NexusConfig::default();
        assert_eq!(load_profile(&config).unwrap().name, "Nexus One");

        config.device.profile = Some(path);
        let profile = load_profile(&config).unwrap();
        assert_eq!(profile.name, "T-Mobile G1");
        assert!(!profile.hardware_keys().contains(&HardwareKey::Search));

        config.device.profile = Some(dir.path().join("missing.toml"));
        assert!(load_profile(&config).is_err());
    }
}
