//! Raw user input as the engine sees it
//!
//! Hosts translate their native keyboard, wheel and swipe events into these
//! types and hand them to the engine, which answers with a [`Disposition`].

use std::fmt;

/// The three user interaction adapters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interaction {
    Keyboard,
    Mouse,
    Swipe,
}

impl Interaction {
    pub const ALL: [Interaction; 3] = [Interaction::Keyboard, Interaction::Mouse, Interaction::Swipe];

    pub fn as_str(&self) -> &'static str {
        match self {
            Interaction::Keyboard => "keyboard",
            Interaction::Mouse => "mouse",
            Interaction::Swipe => "swipe",
        }
    }
}

impl fmt::Display for Interaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    PageUp,
    PageDown,
    ArrowUp,
    ArrowDown,
    Other,
}

impl Key {
    /// Keys that scroll natively
    pub const SCROLL_KEYS: [Key; 4] = [Key::PageDown, Key::PageUp, Key::ArrowDown, Key::ArrowUp];

    pub fn is_scroll_key(&self) -> bool {
        Self::SCROLL_KEYS.contains(self)
    }

    /// Map a DOM `KeyboardEvent.key` name
    pub fn from_name(name: &str) -> Self {
        match name {
            "PageUp" => Key::PageUp,
            "PageDown" => Key::PageDown,
            "ArrowUp" => Key::ArrowUp,
            "ArrowDown" => Key::ArrowDown,
            _ => Key::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    /// Another handler already cancelled the default action
    pub default_prevented: bool,
}

impl KeyInput {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            default_prevented: false,
        }
    }
}

/// Unit of `delta_y`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeltaMode {
    #[default]
    Pixel,
    Line,
    Page,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelAxis {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
    pub shift: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.ctrl || self.alt || self.meta || self.shift
    }
}

/// A wheel event with every legacy delta convention a host may report.
/// Fields a host does not know stay `None`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelInput {
    /// Legacy `detail` (lines, positive down)
    pub detail: Option<f64>,
    /// Legacy `wheelDelta` (multiples of 120, positive up)
    pub wheel_delta: Option<f64>,
    pub wheel_delta_y: Option<f64>,
    pub axis: Option<WheelAxis>,
    pub delta_y: Option<f64>,
    pub delta_mode: DeltaMode,
    pub modifiers: Modifiers,
    pub default_prevented: bool,
}

impl WheelInput {
    /// Wheel moved by `delta` lines (positive down)
    pub fn lines(delta: f64) -> Self {
        Self {
            delta_y: Some(delta),
            delta_mode: DeltaMode::Line,
            ..Default::default()
        }
    }

    /// Wheel moved by `delta` pixels (positive down)
    pub fn pixels(delta: f64) -> Self {
        Self {
            delta_y: Some(delta),
            ..Default::default()
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

const PIXEL_STEP: f64 = 10.0;
const LINE_HEIGHT: f64 = 40.0;
const PAGE_HEIGHT: f64 = 800.0;

/// Collapse the legacy wheel delta conventions into one signed spin.
///
/// Positive spin scrolls down. Returns 0 when the event carries no
/// vertical movement.
pub fn normalize_wheel(input: &WheelInput) -> f64 {
    let mut spin = 0.0;

    if let Some(detail) = input.detail {
        spin = detail;
    }
    if let Some(delta) = input.wheel_delta {
        spin = -delta / 120.0;
    }
    if let Some(delta) = input.wheel_delta_y {
        spin = -delta / 120.0;
    }
    if input.axis == Some(WheelAxis::Horizontal) {
        spin = 0.0;
    }

    let mut pixels = spin * PIXEL_STEP;
    if let Some(delta) = input.delta_y {
        pixels = delta;
    }

    if pixels != 0.0 {
        match input.delta_mode {
            DeltaMode::Pixel => {}
            DeltaMode::Line => pixels *= LINE_HEIGHT,
            DeltaMode::Page => pixels *= PAGE_HEIGHT,
        }
    }

    // no spin reported, derive it from the pixel delta
    if pixels != 0.0 && spin == 0.0 {
        spin = pixels.signum();
    }

    spin
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    Up,
    Down,
}

/// What the host should do with the native event after the engine saw it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Let the event continue untouched
    Ignored,
    /// Cancel the default action
    PreventDefault,
    /// Cancel the default action and stop propagation
    Consume,
}

impl Disposition {
    pub fn prevents_default(&self) -> bool {
        !matches!(self, Disposition::Ignored)
    }

    pub fn stops_propagation(&self) -> bool {
        matches!(self, Disposition::Consume)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_keys() {
        // every scroll key counts, including the first one
        for key in Key::SCROLL_KEYS {
            assert!(key.is_scroll_key());
        }
        assert!(!Key::Other.is_scroll_key());
        assert_eq!(Key::from_name("PageDown"), Key::PageDown);
        assert_eq!(Key::from_name("Enter"), Key::Other);
    }

    #[test]
    fn test_normalize_delta_y() {
        assert_eq!(normalize_wheel(&WheelInput::pixels(53.0)), 1.0);
        assert_eq!(normalize_wheel(&WheelInput::pixels(-4.0)), -1.0);
        assert_eq!(normalize_wheel(&WheelInput::lines(3.0)), 1.0);
        assert_eq!(normalize_wheel(&WheelInput::pixels(0.0)), 0.0);
    }

    #[test]
    fn test_normalize_legacy_fields() {
        let input = WheelInput {
            wheel_delta: Some(-240.0),
            ..Default::default()
        };
        assert_eq!(normalize_wheel(&input), 2.0);

        let input = WheelInput {
            detail: Some(-3.0),
            ..Default::default()
        };
        assert_eq!(normalize_wheel(&input), -3.0);

        // wheelDeltaY wins over wheelDelta
        let input = WheelInput {
            wheel_delta: Some(120.0),
            wheel_delta_y: Some(-120.0),
            delta_y: Some(100.0),
            ..Default::default()
        };
        assert_eq!(normalize_wheel(&input), 1.0);
    }

    #[test]
    fn test_normalize_horizontal_axis() {
        let input = WheelInput {
            detail: Some(3.0),
            axis: Some(WheelAxis::Horizontal),
            ..Default::default()
        };
        assert_eq!(normalize_wheel(&input), 0.0);
    }

    #[test]
    fn test_disposition_flags() {
        assert!(!Disposition::Ignored.prevents_default());
        assert!(Disposition::PreventDefault.prevents_default());
        assert!(!Disposition::PreventDefault.stops_propagation());
        assert!(Disposition::Consume.stops_propagation());
    }
}
