//! The contract between the engine and whatever renders the pages

use std::fmt;

/// Where the scrolled content lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    /// An arbitrary element with its own scroll position
    Element,
    /// The document body. Overflow is suppressed by pinning the body and
    /// shifting it with a negative top margin.
    Body,
}

/// Style properties the engine reads and writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleProperty {
    OverflowY,
    Position,
    Width,
    MarginTop,
}

/// Native events the engine subscribes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeEvent {
    KeyDown,
    Wheel,
    Scroll,
    Resize,
    SwipeUp,
    SwipeDown,
}

/// What a listener is attached to
#[derive(Debug, Clone, Copy)]
pub enum ListenTarget<'a, P> {
    Window,
    Document,
    Container,
    Page { index: usize, page: &'a P },
}

/// Handle for one registered native listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Capability set the engine needs from its host.
///
/// All vertical positions are in the same unit (pixels, or lines for a
/// terminal). `content_top` and `page_top` are measured in the same
/// coordinate frame, so `page_top - content_top` is the page's distance
/// from the start of the scrolled content whatever the current offset is.
///
/// Hosts forward the native events they were asked to listen for to the
/// matching `ScrollEngine::handle_*` method.
pub trait HostAdapter {
    /// Page handle. Equality is element identity.
    type Page: Clone + PartialEq + fmt::Debug;

    /// False in headless contexts; the engine then refuses to initialize.
    fn has_surface(&self) -> bool {
        true
    }

    fn container_kind(&self) -> ContainerKind;

    /// Current page list, in document order
    fn pages(&self, selector: &str) -> Vec<Self::Page>;

    /// Visible height of the container
    fn viewport_height(&self) -> f64;

    /// Total height of the scrolled content
    fn scroll_height(&self) -> f64;

    /// Position of the start of the scrolled content
    fn content_top(&self) -> f64;

    fn page_top(&self, page: &Self::Page) -> f64;

    fn page_height(&self, page: &Self::Page) -> f64;

    /// Native scroll position
    fn scroll_position(&self) -> f64;

    fn set_scroll_position(&mut self, y: f64);

    /// Inline style value, empty when unset
    fn style(&self, property: StyleProperty) -> String;

    fn set_style(&mut self, property: StyleProperty, value: &str);

    fn listen(&mut self, target: ListenTarget<'_, Self::Page>, event: NativeEvent) -> ListenerId;

    fn unlisten(&mut self, id: ListenerId);
}

/// A group of native listeners released together
#[derive(Debug, Default)]
pub struct Subscription {
    ids: Vec<ListenerId>,
}

impl Subscription {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: ListenerId) {
        self.ids.push(id);
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Unregister every listener of this subscription
    pub fn release<H: HostAdapter + ?Sized>(self, host: &mut H) {
        for id in self.ids {
            host.unlisten(id);
        }
    }
}

/// Parse a CSS pixel length such as `-120px`. Anything else is 0.
pub(crate) fn parse_px(value: &str) -> f64 {
    value
        .trim()
        .trim_end_matches("px")
        .trim()
        .parse()
        .unwrap_or(0.0)
}
