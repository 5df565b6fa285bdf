//! Trade Review Dashboard - Terminal UI
//!
//! One screen, three independent views:
//! - Ranked snapshot table (polled)
//! - Pending orders table (fetched on mount, `o` to reload)
//! - Livestream events (server-sent events)

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use trade_review_dashboard::bin_common::{config_type_from_args, load_config_from_env, parse_args};
use trade_review_dashboard::dashboard::application::visualizer::{ui, App};
use trade_review_dashboard::dashboard::infrastructure::init_file_tracing;
use trade_review_dashboard::dashboard::DashboardConfig;

/// Input poll timeout; also the redraw cadence
const TICK: Duration = Duration::from_millis(50);

fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    let config_path = load_config_from_env(config_type_from_args(&parse_args()));
    let config = DashboardConfig::load_or_default(&config_path)?;

    // Logs go to a file: stdout belongs to the alternate screen
    init_file_tracing(&config.log_level, &config.log_file)?;
    config.log();

    // Create tokio runtime
    let runtime = tokio::runtime::Runtime::new()?;

    // Mount the views (stream subscription, poll loop, one-shot fetch)
    let mut app = runtime.block_on(async { App::initialize(runtime.handle().clone(), &config).await })?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Unmount views
    app.shutdown();

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::draw(frame, app))?;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (not release)
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => {
                            app.should_quit = true;
                        }
                        KeyCode::Char('r') => {
                            app.refresh_snapshot();
                        }
                        KeyCode::Char('o') => {
                            app.reload_orders();
                        }
                        KeyCode::Char('j') | KeyCode::Down => {
                            app.scroll_down();
                        }
                        KeyCode::Char('k') | KeyCode::Up => {
                            app.scroll_up();
                        }
                        KeyCode::Char('g') | KeyCode::Home => {
                            app.scroll_top();
                        }
                        KeyCode::Char('G') | KeyCode::End => {
                            app.scroll_bottom();
                        }
                        _ => {}
                    }
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
