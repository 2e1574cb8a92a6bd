use anyhow::Result;
use clap::Parser;
use crossterm::event::{
    self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, Event,
    KeyCode, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use ratatui::DefaultTerminal;
use revenue_map::app::App;
use revenue_map::config::{self, Args, Settings};
use revenue_map::dashboard::Dashboard;
use revenue_map::data;
use revenue_map::map::MapRenderer;
use revenue_map::surface::MapSurface;
use revenue_map::ui;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

fn main() -> Result<()> {
    let args = Args::parse();
    config::init_logging(&args)?;

    // Resolve everything that can fail before taking over the terminal
    let settings = Settings::from_args(&args)?;
    let catalog = Arc::new(settings.catalog);
    info!(countries = catalog.len(), "revenue catalog ready");

    let mut geography = MapRenderer::new();
    data::load_or_fallback(&mut geography, &settings.geography);

    let surface = MapSurface::new(geography, catalog.clone());
    let dashboard = Dashboard::new(catalog, settings.panel);

    let mut terminal = ratatui::init();
    terminal.clear()?;
    execute!(std::io::stdout(), EnableMouseCapture, EnableFocusChange)?;

    let result = run(&mut terminal, surface, dashboard);

    let _ = execute!(std::io::stdout(), DisableMouseCapture, DisableFocusChange);
    ratatui::restore();

    result
}

/// Route mouse events to hover, zoom and pan
fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Moved => app.pointer_moved(mouse.column, mouse.row),
        // Scroll wheel zooms towards the pointer
        MouseEventKind::ScrollUp => app.zoom_in_at(mouse.column, mouse.row),
        MouseEventKind::ScrollDown => app.zoom_out_at(mouse.column, mouse.row),
        // Horizontal scroll for panning (trackpad two-finger swipe)
        MouseEventKind::ScrollLeft => app.pan(-15, 0),
        MouseEventKind::ScrollRight => app.pan(15, 0),
        MouseEventKind::Down(MouseButton::Left) => {
            app.last_mouse = Some((mouse.column, mouse.row));
            app.pointer_moved(mouse.column, mouse.row);
        }
        MouseEventKind::Drag(MouseButton::Left) => app.handle_drag(mouse.column, mouse.row),
        MouseEventKind::Up(MouseButton::Left) => app.end_drag(),
        _ => {}
    }
}

fn run(terminal: &mut DefaultTerminal, surface: MapSurface, dashboard: Dashboard) -> Result<()> {
    let size = terminal.size()?;
    let mut app = App::new(size.width, size.height, surface, dashboard);

    loop {
        terminal.draw(|frame| ui::render(frame, &app))?;

        // ~60fps poll
        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => app.quit(),

                    // Pan with hjkl or arrow keys
                    KeyCode::Left | KeyCode::Char('h') => app.pan(-10, 0),
                    KeyCode::Right | KeyCode::Char('l') => app.pan(10, 0),
                    KeyCode::Up | KeyCode::Char('k') => app.pan(0, -6),
                    KeyCode::Down | KeyCode::Char('j') => app.pan(0, 6),

                    KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_in(),
                    KeyCode::Char('-') | KeyCode::Char('_') => app.zoom_out(),

                    KeyCode::Char('r') | KeyCode::Char('0') => app.reset_view(),

                    _ => {}
                },
                Event::Mouse(mouse) => handle_mouse(&mut app, mouse),
                Event::FocusLost => app.pointer_left(),
                Event::Resize(width, height) => app.resize(width, height),
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    info!("exiting");
    Ok(())
}
