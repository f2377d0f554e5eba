use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use pagescroll_core::scroll::{Key, KeyInput, Modifiers, SwipeDirection, WheelInput};

/// Rows the pointer has to travel between press and release to count as a swipe
const SWIPE_MIN_ROWS: u16 = 2;

/// Input action that can be performed
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    /// A scroll key, delivered to the engine as a native keydown
    Key(KeyInput),
    Wheel(WheelInput),
    /// Vertical drag that started on viewport row `row`
    Swipe { row: u16, direction: SwipeDirection },
    JumpToFirst,
    JumpToLast,
    GoTo(usize),
    ToggleKeyboard,
    ToggleMouse,
    ToggleSwipe,
    ToggleOverflow,
    /// Pause paging; `true` also swallows native scrolling
    TogglePause(bool),
    Reload,
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        // Quit
        (KeyCode::Char('q'), KeyModifiers::NONE) => Action::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,

        // Paging keys
        (KeyCode::PageDown, _) => Action::Key(KeyInput::new(Key::PageDown)),
        (KeyCode::PageUp, _) => Action::Key(KeyInput::new(Key::PageUp)),
        (KeyCode::Down, KeyModifiers::NONE) => Action::Key(KeyInput::new(Key::ArrowDown)),
        (KeyCode::Up, KeyModifiers::NONE) => Action::Key(KeyInput::new(Key::ArrowUp)),
        (KeyCode::Char('j'), KeyModifiers::NONE) => Action::Key(KeyInput::new(Key::ArrowDown)),
        (KeyCode::Char('k'), KeyModifiers::NONE) => Action::Key(KeyInput::new(Key::ArrowUp)),

        // Jumps
        (KeyCode::Char('g'), KeyModifiers::NONE) | (KeyCode::Home, _) => Action::JumpToFirst,
        (KeyCode::Char('G'), KeyModifiers::SHIFT) | (KeyCode::End, _) => Action::JumpToLast,
        (KeyCode::Char(c @ '1'..='9'), KeyModifiers::NONE) => {
            Action::GoTo(c as usize - '1' as usize)
        }

        // Interaction toggles
        (KeyCode::Char('k'), KeyModifiers::CONTROL) => Action::ToggleKeyboard,
        (KeyCode::Char('w'), KeyModifiers::CONTROL) => Action::ToggleMouse,
        (KeyCode::Char('s'), KeyModifiers::CONTROL) => Action::ToggleSwipe,
        (KeyCode::Char('o'), KeyModifiers::NONE) => Action::ToggleOverflow,
        (KeyCode::Char('p'), KeyModifiers::NONE) => Action::TogglePause(false),
        (KeyCode::Char('P'), KeyModifiers::SHIFT) => Action::TogglePause(true),

        (KeyCode::Char('R'), KeyModifiers::SHIFT) => Action::Reload,

        _ => Action::None,
    }
}

/// Turns left-button press/release pairs into swipes
#[derive(Debug, Default)]
pub struct SwipeTracker {
    start: Option<u16>,
}

impl SwipeTracker {
    pub fn press(&mut self, row: u16) {
        self.start = Some(row);
    }

    /// Returns the start row and direction when the drag was long enough.
    /// Dragging the content up is a swipe up.
    pub fn release(&mut self, row: u16) -> Option<(u16, SwipeDirection)> {
        let start = self.start.take()?;
        if start.abs_diff(row) < SWIPE_MIN_ROWS {
            return None;
        }
        let direction = if row < start {
            SwipeDirection::Up
        } else {
            SwipeDirection::Down
        };
        Some((start, direction))
    }
}

/// Handle a mouse event and return the corresponding action
pub fn handle_mouse_event(mouse: MouseEvent, swipe: &mut SwipeTracker) -> Action {
    let modifiers = modifiers(mouse.modifiers);
    match mouse.kind {
        MouseEventKind::ScrollDown => Action::Wheel(WheelInput::lines(1.0).with_modifiers(modifiers)),
        MouseEventKind::ScrollUp => Action::Wheel(WheelInput::lines(-1.0).with_modifiers(modifiers)),
        MouseEventKind::Down(MouseButton::Left) => {
            swipe.press(mouse.row);
            Action::None
        }
        MouseEventKind::Up(MouseButton::Left) => match swipe.release(mouse.row) {
            Some((row, direction)) => Action::Swipe { row, direction },
            None => Action::None,
        },
        _ => Action::None,
    }
}

fn modifiers(m: KeyModifiers) -> Modifiers {
    Modifiers {
        ctrl: m.contains(KeyModifiers::CONTROL),
        alt: m.contains(KeyModifiers::ALT),
        meta: m.contains(KeyModifiers::SUPER) || m.contains(KeyModifiers::META),
        shift: m.contains(KeyModifiers::SHIFT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    fn mouse(kind: MouseEventKind, row: u16, modifiers: KeyModifiers) -> MouseEvent {
        MouseEvent {
            kind,
            column: 0,
            row,
            modifiers,
        }
    }

    #[test]
    fn test_scroll_keys() {
        assert_eq!(
            handle_key_event(key(KeyCode::PageDown, KeyModifiers::NONE)),
            Action::Key(KeyInput::new(Key::PageDown))
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Char('k'), KeyModifiers::NONE)),
            Action::Key(KeyInput::new(Key::ArrowUp))
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Char('k'), KeyModifiers::CONTROL)),
            Action::ToggleKeyboard
        );
        assert_eq!(handle_key_event(key(KeyCode::Char('3'), KeyModifiers::NONE)), Action::GoTo(2));
        assert_eq!(handle_key_event(key(KeyCode::Char('x'), KeyModifiers::NONE)), Action::None);
    }

    #[test]
    fn test_wheel_keeps_modifiers() {
        let mut swipe = SwipeTracker::default();
        let action = handle_mouse_event(
            mouse(MouseEventKind::ScrollDown, 0, KeyModifiers::CONTROL),
            &mut swipe,
        );
        let Action::Wheel(input) = action else {
            panic!("expected a wheel action, got {:?}", action);
        };
        assert!(input.modifiers.ctrl);
        assert_eq!(input.delta_y, Some(1.0));
    }

    #[test]
    fn test_drag_becomes_swipe() {
        let mut swipe = SwipeTracker::default();
        let none = KeyModifiers::NONE;
        handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 10, none), &mut swipe);
        assert_eq!(
            handle_mouse_event(mouse(MouseEventKind::Up(MouseButton::Left), 4, none), &mut swipe),
            Action::Swipe {
                row: 10,
                direction: SwipeDirection::Up
            }
        );

        // a click is not a swipe
        handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 5, none), &mut swipe);
        assert_eq!(
            handle_mouse_event(mouse(MouseEventKind::Up(MouseButton::Left), 6, none), &mut swipe),
            Action::None
        );
        // release without a press
        assert_eq!(swipe.release(9), None);
    }
}
