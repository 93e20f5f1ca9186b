//! Handset rendering

use crate::app::{App, HOME_SHORTCUTS, MENU_ITEMS, RECOVERY_OPTIONS};
use nexus_assistant::Role;
use nexus_device::PowerState;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

const BOOT_FRAMES: [&str; 4] = ["   X   ", "  -X-  ", " --X-- ", "---X---"];

fn highlight() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Green)
        .add_modifier(Modifier::BOLD)
}

/// Draw the whole handset: status bar, screen, branding and help footer
pub fn draw_ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Status bar
            Constraint::Min(0),    // Screen
            Constraint::Length(1), // Branding
            Constraint::Length(3), // Footer
        ])
        .split(frame.size());

    draw_status_bar(frame, chunks[0], app);
    draw_screen(frame, chunks[1], app);

    let brand = Paragraph::new("NEXUS ONE")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD));
    frame.render_widget(brand, chunks[2]);

    draw_footer(frame, chunks[3], app);

    if let Some(notice) = app.notice {
        draw_popup(frame, notice.message());
    }
}

fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let device = &app.device;
    let powered = !matches!(device.power_state(), PowerState::Off | PowerState::Recovery)
        && !device.power_state().is_booting();

    let mut spans = Vec::new();
    if powered {
        spans.push(Span::raw("3G "));
    }
    let battery_style = if device.battery().is_low() {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Green)
    };
    spans.push(Span::styled(format!("{}%", device.battery_level()), battery_style));
    if device.is_charging() {
        spans.push(Span::styled("+", Style::default().fg(Color::Yellow)));
    }
    if powered {
        spans.push(Span::raw(format!("  {}", device.time_text())));
    }

    let bar = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Right)
        .style(Style::default().bg(Color::Black).fg(Color::White));
    frame.render_widget(bar, area);
}

fn draw_screen(frame: &mut Frame, area: Rect, app: &App) {
    match app.device.power_state() {
        PowerState::Off => draw_off(frame, area, app),
        PowerState::Recovery => draw_recovery(frame, area, app),
        PowerState::BootLogo => {
            let logo = centered_text(vec![Line::styled(
                "Google",
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )]);
            frame.render_widget(logo, area);
        }
        PowerState::BootAnimation => {
            let index = (app.device.uptime().as_millis() / 250) as usize % BOOT_FRAMES.len();
            let animation = centered_text(vec![Line::styled(
                BOOT_FRAMES[index],
                Style::default().fg(Color::LightGreen),
            )]);
            frame.render_widget(animation, area);
        }
        PowerState::SetupWizard => {
            let setup = centered_text(vec![
                Line::styled(
                    "Welcome to Nexus One",
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Line::from(""),
                Line::from("Touch the android to begin"),
                Line::from("[Enter] Start"),
            ])
            .block(Block::default().borders(Borders::ALL));
            frame.render_widget(setup, area);
        }
        PowerState::Home => draw_home(frame, area, app),
        PowerState::AppOpen => draw_app(frame, area, app),
    }

    if app.device.overlays().shade {
        draw_shade(frame, area, app);
    }
}

fn centered_text(lines: Vec<Line<'static>>) -> Paragraph<'static> {
    Paragraph::new(lines).alignment(Alignment::Center)
}

fn draw_off(frame: &mut Frame, area: Rect, app: &App) {
    if !app.device.is_charging() {
        // Screen is dark
        frame.render_widget(Block::default().style(Style::default().bg(Color::Black)), area);
        return;
    }
    let charging = centered_text(vec![
        Line::from(""),
        Line::styled(
            format!("{}%", app.device.battery_level()),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        Line::from(app.device.battery().status().label()),
    ]);
    frame.render_widget(charging, area);
}

fn draw_recovery(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(area);

    let title = Paragraph::new("CWM-based Recovery v5.0.2.7")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    frame.render_widget(title, chunks[0]);

    let items: Vec<ListItem> = RECOVERY_OPTIONS.iter().map(|o| ListItem::new(*o)).collect();
    let list = List::new(items)
        .style(Style::default().fg(Color::Cyan))
        .highlight_style(Style::default().fg(Color::Black).bg(Color::Cyan))
        .highlight_symbol("- ");

    let mut state = ListState::default();
    state.select(Some(app.recovery_selected));
    frame.render_stateful_widget(list, chunks[1], &mut state);
}

fn draw_home(frame: &mut Frame, area: Rect, app: &App) {
    let background = if app.dark_wallpaper {
        Color::Black
    } else {
        Color::Blue
    };
    frame.render_widget(Block::default().style(Style::default().bg(background)), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Clock widget
            Constraint::Length(3), // Search widget
            Constraint::Min(0),
            Constraint::Length(3), // Dock
        ])
        .split(area);

    let clock = centered_text(vec![
        Line::styled(
            app.device.time_text().to_string(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Line::from(app.device.date_text().to_string()),
    ]);
    frame.render_widget(clock, chunks[0]);

    let search = Paragraph::new("Google  [              ]")
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(search, chunks[1]);

    let mut dock = Vec::new();
    for (i, id) in HOME_SHORTCUTS.iter().copied().chain(["apps"]).enumerate() {
        let label = if id == "apps" { "Apps" } else { app.app_name(id) };
        let style = if i == app.home_selected {
            highlight()
        } else {
            Style::default().fg(Color::White)
        };
        dock.push(Span::styled(format!(" {} ", label), style));
        dock.push(Span::raw(" "));
    }
    let dock = Paragraph::new(Line::from(dock))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(dock, chunks[3]);

    let overlays = app.device.overlays();
    if overlays.drawer {
        draw_drawer(frame, area, app);
    }
    if overlays.menu {
        draw_menu(frame, area, app);
    }
}

fn draw_drawer(frame: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = app
        .device
        .apps()
        .installed()
        .iter()
        .map(|a| ListItem::new(a.name.clone()))
        .collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Apps"))
        .style(Style::default().bg(Color::Black).fg(Color::White))
        .highlight_style(highlight())
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.drawer_selected));
    frame.render_widget(Clear, area);
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_menu(frame: &mut Frame, area: Rect, app: &App) {
    let height = 3.min(area.height);
    let menu_area = Rect::new(area.x, area.y + area.height - height, area.width, height);

    let mut spans = Vec::new();
    for (i, item) in MENU_ITEMS.iter().enumerate() {
        let style = if i == app.menu_selected {
            highlight()
        } else {
            Style::default()
        };
        spans.push(Span::styled(format!(" {} ", item), style));
        spans.push(Span::raw(" "));
    }
    let menu = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(Clear, menu_area);
    frame.render_widget(menu, menu_area);
}

fn draw_shade(frame: &mut Frame, area: Rect, app: &App) {
    let height = 6.min(area.height);
    let shade_area = Rect::new(area.x, area.y, area.width, height);

    let battery = app.device.battery();
    let lines = vec![
        Line::from(app.device.date_text().to_string()),
        Line::from(format!(
            "Battery {}% ({})",
            battery.level(),
            battery.status().label()
        )),
        Line::from(app.status.clone()),
        Line::styled("[Enter] Clear", Style::default().fg(Color::DarkGray)),
    ];
    let shade = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Notifications"))
        .style(Style::default().bg(Color::Black).fg(Color::White));

    frame.render_widget(Clear, shade_area);
    frame.render_widget(shade, shade_area);
}

fn draw_app(frame: &mut Frame, area: Rect, app: &App) {
    let Some(id) = app.device.foreground_app() else {
        return;
    };
    let keyboard = app.device.overlays().keyboard;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(app.app_name(id).to_string());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(if keyboard { 2 } else { 0 }),
        ])
        .split(inner);

    match id {
        "gemini" => draw_assistant(frame, chunks[0], app),
        "market" => draw_market(frame, chunks[0], app),
        "gallery" => draw_gallery(frame, chunks[0], app),
        "calculator" => {
            let calc = Paragraph::new(vec![
                Line::styled(
                    app.calculator.display().to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Line::from(""),
                Line::from("7 8 9 /"),
                Line::from("4 5 6 x"),
                Line::from("1 2 3 -"),
                Line::from("C 0 = +"),
            ])
            .alignment(Alignment::Right);
            frame.render_widget(calc, chunks[0]);
        }
        "phone" => {
            let dialer = centered_text(vec![
                Line::styled(
                    if app.input.is_empty() {
                        "Enter number".to_string()
                    } else {
                        app.input.clone()
                    },
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Line::from(""),
                Line::from("1 2 3"),
                Line::from("4 5 6"),
                Line::from("7 8 9"),
                Line::from("* 0 #"),
            ]);
            frame.render_widget(dialer, chunks[0]);
        }
        "settings" => draw_settings(frame, chunks[0], app),
        _ => {
            let body = centered_text(vec![
                Line::from(""),
                Line::from("Application not fully simulated yet."),
            ]);
            frame.render_widget(body, chunks[0]);
        }
    }

    if keyboard {
        let keys = Paragraph::new(vec![
            Line::from(format!("> {}_", app.input)),
            Line::styled(
                "q w e r t y u i o p  [Shift+Tab] hide",
                Style::default().fg(Color::DarkGray),
            ),
        ])
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));
        frame.render_widget(keys, chunks[1]);
    }
}

fn draw_assistant(frame: &mut Frame, area: Rect, app: &App) {
    let mut lines = Vec::new();
    for message in app.session.transcript() {
        let (who, color) = match message.role {
            Role::User => ("You", Color::Cyan),
            Role::Assistant => ("Gemini", Color::Green),
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!("{}: ", who),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::raw(message.text.clone()),
        ]));
    }
    if app.session.is_waiting() {
        lines.push(Line::styled("Processing...", Style::default().fg(Color::DarkGray)));
    }

    // Keep the latest messages in view
    let scroll = (lines.len() as u16).saturating_sub(area.height);
    let transcript = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .scroll((scroll, 0));
    frame.render_widget(transcript, area);
}

fn draw_market(frame: &mut Frame, area: Rect, app: &App) {
    let downloading = app.download.as_ref().map(|d| d.id.as_str());
    let items: Vec<ListItem> = app
        .market_apps()
        .iter()
        .map(|a| {
            let action = if a.installed {
                "OPEN"
            } else if downloading == Some(a.id.as_str()) {
                "..."
            } else {
                "FREE"
            };
            ListItem::new(format!(
                "{:<16} {:<12} {:>6}  {}",
                a.name,
                a.version.as_deref().unwrap_or(""),
                a.size.as_deref().unwrap_or(""),
                action
            ))
        })
        .collect();
    let list = List::new(items)
        .highlight_style(highlight())
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.market_selected));
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_gallery(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(area);

    let hint = match (app.gallery_busy, app.gallery_selected) {
        (true, _) => "Generating...".to_string(),
        (false, Some(i)) => format!("Describe an edit to image {}", i + 1),
        (false, None) => "Describe an image to create".to_string(),
    };
    frame.render_widget(
        Paragraph::new(hint).style(Style::default().fg(Color::Yellow)),
        chunks[0],
    );

    if app.gallery.is_empty() {
        frame.render_widget(centered_text(vec![Line::from("No images")]), chunks[1]);
        return;
    }
    let items: Vec<ListItem> = app
        .gallery
        .iter()
        .enumerate()
        .map(|(i, image)| ListItem::new(format!("{}. {}", i + 1, image.summary())))
        .collect();
    let list = List::new(items)
        .highlight_style(highlight())
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(app.gallery_selected);
    frame.render_stateful_widget(list, chunks[1], &mut state);
}

fn draw_settings(frame: &mut Frame, area: Rect, app: &App) {
    let profile = &app.profile;
    let battery = app.device.battery();
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let row = |label: &'static str, value: String| {
        Line::from(vec![Span::styled(label, bold), Span::raw(value)])
    };

    let lines = vec![
        Line::styled("About phone", bold.fg(Color::Cyan)),
        row("Model: ", profile.name.clone()),
        row("Android version: ", profile.os_version.clone()),
        row("Chipset: ", profile.chipset.clone()),
        row(
            "Display: ",
            format!(
                "{}x{} @ {}Hz",
                profile.display.width, profile.display.height, profile.display.refresh_rate
            ),
        ),
        row(
            "Battery: ",
            format!(
                "{}% {} ({} mAh)",
                battery.level(),
                battery.status().label(),
                profile.battery_capacity
            ),
        ),
        row("Uptime: ", format!("{}s", app.device.uptime().as_secs())),
    ];
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
}

fn draw_footer(frame: &mut Frame, area: Rect, app: &App) {
    let keys = &app.config.keys;
    let help = match app.device.power_state() {
        PowerState::Off => format!("[{}] Power  [{}] Charger", keys.power, keys.toggle_charger),
        PowerState::Recovery => "[↑↓] Navigate  [Enter] Select".to_string(),
        PowerState::BootLogo | PowerState::BootAnimation => "Booting...".to_string(),
        PowerState::SetupWizard => format!("[Enter] Start  [{}] Power", keys.power),
        PowerState::Home | PowerState::AppOpen => format!(
            "[{}] Back  [{}] Menu  [{}] Home  [Tab] Notifications  [{}] Quit",
            keys.back, keys.menu, keys.home, keys.quit
        ),
    };

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(area);

    let help = Paragraph::new(help)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    let status = Paragraph::new(app.status.as_str())
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(help, chunks[0]);
    frame.render_widget(status, chunks[1]);
}

fn draw_popup(frame: &mut Frame, message: &str) {
    let screen = frame.size();
    let width = 44.min(screen.width);
    let height = 5.min(screen.height);
    let area = Rect::new(
        screen.x + (screen.width - width) / 2,
        screen.y + (screen.height - height) / 2,
        width,
        height,
    );

    let popup = Paragraph::new(vec![Line::from(message), Line::from("[Enter] OK")])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Warning"))
        .style(Style::default().fg(Color::White).bg(Color::Red));

    frame.render_widget(Clear, area);
    frame.render_widget(popup, area);
}
