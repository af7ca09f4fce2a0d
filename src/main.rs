use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use office_globe::app::{App, InputMode};
use office_globe::config::{Args, GlobeConfig};
use office_globe::{data, ui};
use ratatui::DefaultTerminal;
use std::fs::File;
use std::time::{Duration, Instant};

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let config = GlobeConfig::from_args(&args);
    let locations = data::load_locations(&config)
        .with_context(|| format!("loading locations from {}", config.data_dir.display()))?;
    log::info!("loaded {} locations", locations.len());

    // Initialize terminal
    let mut terminal = ratatui::init();
    terminal.clear()?;

    // Enable mouse capture
    execute!(std::io::stdout(), EnableMouseCapture)?;

    // Run the app
    let result = run(&mut terminal, locations, args.dark, config);

    // Disable mouse capture and restore terminal
    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    result
}

/// Log to a file; the terminal belongs to the UI
fn init_logging(args: &Args) -> Result<()> {
    let file = File::create(&args.log_file)
        .with_context(|| format!("creating log file {}", args.log_file.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

/// Route mouse events to the globe pane or the side panel
fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let now = Instant::now();
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => app.mouse_down(mouse.column, mouse.row, now),
        MouseEventKind::Drag(MouseButton::Left) => app.mouse_drag(mouse.column, mouse.row),
        MouseEventKind::Up(MouseButton::Left) => app.mouse_up(mouse.column, mouse.row, now),
        _ => {}
    }
}

/// Keys while typing into the search box
fn handle_search_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Esc => app.end_search(),
        KeyCode::Backspace => app.search_pop(),
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => app.search_clear(),
        KeyCode::Char(c) => app.search_push(c),
        _ => {}
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if app.input_mode == InputMode::Search {
        handle_search_key(app, key);
        return;
    }

    match key.code {
        KeyCode::Esc if app.widget.selected().is_some() => app.clear_selection(),
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),

        // Category and search
        KeyCode::Tab | KeyCode::Char('t') => app.toggle_category(),
        KeyCode::Char('/') => app.begin_search(),

        // List navigation
        KeyCode::Up | KeyCode::Char('k') => app.cursor_up(),
        KeyCode::Down | KeyCode::Char('j') => app.cursor_down(),
        KeyCode::Enter => app.select_cursor(Instant::now()),
        KeyCode::Char('x') => app.clear_selection(),

        KeyCode::Char('d') => app.toggle_dark_mode(),
        KeyCode::Char('r') => app.remount(),

        _ => {}
    }
}

fn run(
    terminal: &mut DefaultTerminal,
    locations: Vec<office_globe::globe::Location>,
    dark_mode: bool,
    config: GlobeConfig,
) -> Result<()> {
    let size = terminal.size()?;
    let mut app = App::new(locations, dark_mode, config, size.width, size.height);

    // Main loop
    loop {
        terminal.draw(|frame| ui::render(frame, &app))?;

        // Handle events with ~60fps target
        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                // Only handle key press events (not release)
                Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(&mut app, key),
                Event::Mouse(mouse) => handle_mouse(&mut app, mouse),
                Event::Resize(width, height) => app.resize(width, height),
                _ => {}
            }
        }

        // Texture results and fly-to animation
        app.update(Instant::now());

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
