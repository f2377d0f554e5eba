use std::io::{self, Stdout};
use std::path::Path;

use anyhow::{bail, Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use tracing::{info, warn};

use pagescroll_core::AppConfig;
use pagescroll_tui::{
    app::App,
    event::{AppEvent, EventHandler},
    input::{handle_key_event, handle_mouse_event, Action},
    widgets::{PagesWidget, StatusBarWidget},
};

pub async fn run(config: AppConfig, file: &Path, page: Option<usize>) -> Result<()> {
    let start_page = match page {
        Some(0) => bail!("Pages are numbered from 1"),
        Some(page) => Some(page - 1),
        None => None,
    };

    let text = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let mut app = App::new(&text, config)?;
    info!("Opened {} ({} bytes)", file.display(), text.len());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    let title = format!("pagescroll - {}", file.display());
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, SetTitle(title))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app, file, start_page).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    app.shutdown()?;
    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    file: &Path,
    start_page: Option<usize>,
) -> Result<()> {
    let size = terminal.size()?;
    app.start(size.width, size.height, start_page)?;

    let event_handler =
        EventHandler::with_animation_fps(app.config.ui.tick_rate_ms, app.config.ui.animation_fps);

    // Main loop
    loop {
        app.tick();

        // Draw UI
        terminal.draw(|frame| {
            let area = frame.area();
            if app.config.ui.show_status_bar {
                let layout = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(1), Constraint::Length(1)])
                    .split(area);
                PagesWidget::render(frame, layout[0], app);
                StatusBarWidget::render(frame, layout[1], app);
            } else {
                PagesWidget::render(frame, area, app);
            }
        })?;

        // Poll at the frame rate while the engine has pending work
        let event = if app.needs_fast_update() {
            event_handler.next_animation()?
        } else {
            event_handler.next()?
        };
        if let Some(event) = event {
            match event {
                AppEvent::Key(key) => match handle_key_event(key) {
                    Action::Reload => reload(app, file).await,
                    action => app.handle_action(action),
                },
                AppEvent::Mouse(mouse) => {
                    let action = handle_mouse_event(mouse, &mut app.swipe);
                    app.handle_action(action);
                }
                AppEvent::Resize(width, height) => app.resize(width, height),
                AppEvent::Tick => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

async fn reload(app: &mut App, file: &Path) {
    match tokio::fs::read_to_string(file).await {
        Ok(text) => app.reload(&text),
        Err(e) => {
            warn!("Failed to reload {}: {}", file.display(), e);
            app.status_message = Some(format!("Reload failed: {}", e));
        }
    }
}
