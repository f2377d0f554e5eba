use anyhow::{Context, Result};
use pagescroll_core::scroll::{
    Disposition, HostAdapter, Interaction, Key, KeyInput, NativeEvent, ScrollEngine, ScrollEvent,
    SwipeDirection, WheelInput,
};
use pagescroll_core::AppConfig;
use regex::Regex;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::host::TerminalHost;
use crate::input::{Action, SwipeTracker};
use crate::theme::Theme;

/// Rows scrolled natively per wheel notch
const WHEEL_ROWS: f64 = 3.0;

/// Application state
pub struct App {
    /// Application configuration
    pub config: AppConfig,
    pub theme: Theme,
    pub engine: ScrollEngine<TerminalHost>,
    /// Status message, replaces the page summary while set
    pub status_message: Option<String>,
    /// Whether the app should quit
    pub should_quit: bool,
    pub swipe: SwipeTracker,
    separator: Regex,
    events: mpsc::UnboundedReceiver<ScrollEvent>,
}

impl App {
    pub fn new(text: &str, config: AppConfig) -> Result<Self> {
        let separator = Regex::new(&config.ui.page_separator)
            .with_context(|| format!("Invalid page separator: {}", config.ui.page_separator))?;
        let host = TerminalHost::from_text(text, &separator);
        let mut engine = ScrollEngine::new(host, config.scroll.clone());
        let events = engine.subscribe();

        Ok(Self {
            config,
            theme: Theme::default(),
            engine,
            status_message: None,
            should_quit: false,
            swipe: SwipeTracker::default(),
            separator,
            events,
        })
    }

    /// Size the viewport to the terminal and start paging
    pub fn start(&mut self, width: u16, height: u16, start_page: Option<usize>) -> Result<()> {
        let (width, height) = self.content_size(width, height);
        self.engine.host_mut().set_viewport(width, height);
        self.engine.init(start_page)?;
        info!(
            "Viewing {} pages in a {}x{} viewport",
            self.engine.page_count(),
            width,
            height
        );
        Ok(())
    }

    /// Terminal size minus the status bar
    pub fn content_size(&self, width: u16, height: u16) -> (u16, u16) {
        let status_rows = u16::from(self.config.ui.show_status_bar);
        (width, height.saturating_sub(status_rows))
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        let (width, height) = self.content_size(width, height);
        if self.engine.host_mut().set_viewport(width, height) {
            debug!("Viewport resized to {}x{}", width, height);
            self.engine.handle_resize();
        }
        self.forward_scroll();
    }

    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Key(input) => self.key(input),
            Action::Wheel(input) => self.wheel(input),
            Action::Swipe { row, direction } => self.swipe_at(row, direction),
            Action::JumpToFirst => self.go_to(0),
            Action::JumpToLast => self.go_to(self.engine.page_count().saturating_sub(1)),
            Action::GoTo(index) => self.go_to(index),
            Action::ToggleKeyboard => self.toggle(Interaction::Keyboard),
            Action::ToggleMouse => self.toggle(Interaction::Mouse),
            Action::ToggleSwipe => self.toggle(Interaction::Swipe),
            Action::ToggleOverflow => {
                self.engine.toggle_overflow(None);
                let state = if self.engine.overflow_on() == Some(true) { "on" } else { "off" };
                self.status_message = Some(format!("Native scrolling {}", state));
            }
            Action::TogglePause(include_system) => self.toggle_pause(include_system),
            // file access belongs to the caller
            Action::Reload | Action::None => {}
        }
        self.forward_scroll();
    }

    fn key(&mut self, input: KeyInput) {
        let disposition = if self.engine.host().is_listening(NativeEvent::KeyDown) {
            self.engine.handle_key(&input)
        } else {
            Disposition::Ignored
        };
        if disposition.prevents_default() {
            return;
        }

        let viewport = self.engine.host().viewport_height();
        let rows = match input.key {
            Key::ArrowDown => 1.0,
            Key::ArrowUp => -1.0,
            Key::PageDown => viewport,
            Key::PageUp => -viewport,
            Key::Other => return,
        };
        self.engine.host_mut().scroll_by(rows);
    }

    fn wheel(&mut self, input: WheelInput) {
        let disposition = if self.engine.host().is_listening(NativeEvent::Wheel) {
            self.engine.handle_wheel(&input)
        } else {
            Disposition::Ignored
        };
        if !disposition.prevents_default() {
            let notches = input.delta_y.unwrap_or(0.0);
            self.engine.host_mut().scroll_by(notches * WHEEL_ROWS);
        }
    }

    fn swipe_at(&mut self, row: u16, direction: SwipeDirection) {
        let Some(page) = self.engine.host().page_at_row(row) else {
            return;
        };
        let event = match direction {
            SwipeDirection::Up => NativeEvent::SwipeUp,
            SwipeDirection::Down => NativeEvent::SwipeDown,
        };
        if self.engine.host().is_listening_on(page, event) {
            self.engine.handle_swipe(page, direction);
        }
    }

    fn go_to(&mut self, index: usize) {
        if let Err(e) = self.engine.scroll_to(index, None) {
            self.status_message = Some(e.to_string());
        }
    }

    fn toggle(&mut self, interaction: Interaction) {
        self.engine.toggle(interaction, None);
        let message = match (self.engine.is_on(interaction), self.engine.is_active(interaction)) {
            (true, true) => format!("{} paging on", interaction),
            (true, false) => format!("{} paging on, waiting for pages to fit", interaction),
            (false, _) => format!("{} paging off", interaction),
        };
        self.status_message = Some(message);
    }

    fn toggle_pause(&mut self, include_system: bool) {
        if self.engine.interactions_paused() {
            self.engine.unpause_interactions();
            self.status_message = Some("Paging resumed".to_string());
        } else {
            self.engine.pause_interactions(include_system);
            self.status_message = Some(if include_system {
                "Paging and scrolling paused".to_string()
            } else {
                "Paging paused".to_string()
            });
        }
    }

    /// Replace the document, keeping the engine running
    pub fn reload(&mut self, text: &str) {
        self.engine.host_mut().set_document(text, &self.separator);
        if self.engine.refresh_pages() {
            self.engine.refresh_index();
        }
        self.status_message = Some(format!("Reloaded, {} pages", self.engine.page_count()));
        self.forward_scroll();
    }

    /// Advance animations and debounced events, then collect engine events
    pub fn tick(&mut self) {
        self.engine.tick();
        self.forward_scroll();

        while let Ok(event) = self.events.try_recv() {
            debug!("Scroll event: {:?}", event);
            match event {
                ScrollEvent::MoveFinished => {
                    self.status_message = Some(format!("Page {}", self.page_label()));
                }
                ScrollEvent::IndexChanged(None) => {
                    self.status_message = Some("Between pages".to_string());
                }
                _ => {}
            }
        }
    }

    /// The host reports every scroll position change, as a browser would
    fn forward_scroll(&mut self) {
        if self.engine.host_mut().take_scrolled() {
            self.engine.handle_scroll();
        }
    }

    /// Use the animation frame rate for the next poll
    pub fn needs_fast_update(&self) -> bool {
        self.engine.needs_tick()
    }

    /// "2/5", or "-/5" outside of every page
    pub fn page_label(&self) -> String {
        let count = self.engine.page_count();
        match self.engine.index() {
            Some(index) => format!("{}/{}", index + 1, count),
            None => format!("-/{}", count),
        }
    }

    pub fn shutdown(&mut self) -> Result<()> {
        if self.engine.initialized() {
            self.engine.destroy()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagescroll_core::PagingThreshold;

    /// Three pages of ten lines each
    fn document() -> String {
        (0..3)
            .map(|page| {
                (0..10)
                    .map(|line| format!("page {} line {}", page, line))
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .collect::<Vec<_>>()
            .join("\n---\n")
    }

    fn app() -> App {
        let mut config = AppConfig::default();
        config.scroll.animation.duration_ms = 0;
        let mut app = App::new(&document(), config).unwrap();
        // one row goes to the status bar
        app.start(80, 11, None).unwrap();
        app
    }

    #[test]
    fn test_start() {
        let app = app();
        assert_eq!(app.engine.page_count(), 3);
        assert_eq!(app.engine.host().height(), 10);
        assert_eq!(app.engine.paging_on(), Some(true));
        assert_eq!(app.page_label(), "1/3");
    }

    #[test]
    fn test_invalid_separator() {
        let mut config = AppConfig::default();
        config.ui.page_separator = "(".to_string();
        assert!(App::new("text", config).is_err());
    }

    #[test]
    fn test_keys_and_wheel_page() {
        let mut app = app();
        app.handle_action(Action::Key(KeyInput::new(Key::PageDown)));
        assert_eq!(app.engine.index(), Some(1));
        assert_eq!(app.engine.offset(), 10.0);

        app.handle_action(Action::Wheel(WheelInput::lines(1.0)));
        assert_eq!(app.engine.index(), Some(2));

        app.handle_action(Action::JumpToFirst);
        assert_eq!(app.engine.offset(), 0.0);
        app.handle_action(Action::GoTo(7));
        assert!(app.status_message.is_some());
    }

    #[test]
    fn test_native_scroll_when_keyboard_off() {
        let mut app = app();
        app.handle_action(Action::ToggleKeyboard);
        assert!(!app.engine.keyboard_active());

        app.handle_action(Action::Key(KeyInput::new(Key::ArrowDown)));
        assert_eq!(app.engine.offset(), 1.0);
        app.handle_action(Action::ToggleOverflow);
        app.handle_action(Action::Key(KeyInput::new(Key::ArrowDown)));
        assert_eq!(app.engine.offset(), 1.0);
    }

    #[test]
    fn test_small_terminal_turns_paging_off() {
        let mut app = app();
        app.resize(80, 6);
        assert_eq!(app.engine.paging_on(), Some(false));
        assert!(!app.engine.host().is_listening(NativeEvent::KeyDown));

        app.handle_action(Action::Key(KeyInput::new(Key::PageDown)));
        assert_eq!(app.engine.offset(), 5.0);
    }

    #[test]
    fn test_swipe_on_page() {
        let mut app = app();
        app.handle_action(Action::Swipe {
            row: 2,
            direction: SwipeDirection::Down,
        });
        assert_eq!(app.engine.index(), Some(0));

        app.handle_action(Action::Swipe {
            row: 2,
            direction: SwipeDirection::Up,
        });
        assert_eq!(app.engine.index(), Some(1));
    }

    #[test]
    fn test_pause_toggle() {
        let mut app = app();
        app.handle_action(Action::TogglePause(false));
        assert!(app.engine.interactions_paused());
        app.handle_action(Action::Key(KeyInput::new(Key::PageDown)));
        // paging is off, the key scrolls natively
        assert_eq!(app.engine.offset(), 10.0);
        assert_eq!(app.engine.paging_threshold(), PagingThreshold::Disabled);

        app.handle_action(Action::TogglePause(false));
        assert!(!app.engine.interactions_paused());
        assert_eq!(app.engine.paging_threshold(), PagingThreshold::Auto);
    }

    #[test]
    fn test_reload_keeps_engine() {
        let mut app = app();
        app.reload("only page");
        assert_eq!(app.engine.page_count(), 1);
        assert_eq!(app.engine.index(), Some(0));
        assert!(app.engine.initialized());
    }

    #[test]
    fn test_shutdown() {
        let mut app = app();
        app.shutdown().unwrap();
        assert!(!app.engine.initialized());
        assert!(!app.engine.host().is_listening(NativeEvent::Scroll));
        // a second shutdown is a no-op
        app.shutdown().unwrap();
    }
}
