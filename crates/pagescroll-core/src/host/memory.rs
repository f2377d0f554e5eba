//! In-memory host
//!
//! Pages are stacked boxes of a given height inside a container. Models
//! both container kinds: a scrollable element (overflow switched with
//! `overflow-y`) and the document body (pinned with `position: fixed` and
//! shifted with a negative `margin-top`).

use std::collections::{BTreeMap, HashMap};

use crate::scroll::host::parse_px;
use crate::scroll::{
    ContainerKind, HostAdapter, ListenTarget, ListenerId, NativeEvent, StyleProperty,
};

const DEFAULT_TAG: &str = "section";

/// Identity of a page in a [`MemoryHost`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId(u64);

/// Owned form of [`ListenTarget`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerTarget {
    Window,
    Document,
    Container,
    Page(PageId),
}

#[derive(Debug, Clone)]
struct MemoryPage {
    id: PageId,
    tag: String,
    height: f64,
}

#[derive(Debug, Clone)]
pub struct MemoryHost {
    kind: ContainerKind,
    surface: bool,
    viewport: f64,
    container_top: f64,
    pages: Vec<MemoryPage>,
    next_page: u64,
    scroll: f64,
    styles: HashMap<StyleProperty, String>,
    listeners: BTreeMap<ListenerId, (ListenerTarget, NativeEvent)>,
    next_listener: u64,
    scrolled: bool,
}

impl MemoryHost {
    fn new(kind: ContainerKind, viewport: f64) -> Self {
        let styles = HashMap::from([
            (StyleProperty::OverflowY, "auto".to_string()),
            (StyleProperty::Position, "static".to_string()),
            (StyleProperty::Width, String::new()),
            (StyleProperty::MarginTop, "0".to_string()),
        ]);

        Self {
            kind,
            surface: true,
            viewport,
            container_top: 0.0,
            pages: Vec::new(),
            next_page: 0,
            scroll: 0.0,
            styles,
            listeners: BTreeMap::new(),
            next_listener: 0,
            scrolled: false,
        }
    }

    /// A scrollable element `viewport` high
    pub fn element(viewport: f64) -> Self {
        Self::new(ContainerKind::Element, viewport)
    }

    /// The document body in a window `viewport` high
    pub fn body(viewport: f64) -> Self {
        Self::new(ContainerKind::Body, viewport)
    }

    /// No rendering surface at all
    pub fn headless() -> Self {
        Self {
            surface: false,
            ..Self::element(0.0)
        }
    }

    /// Place the container below other content of the document
    pub fn with_container_top(mut self, top: f64) -> Self {
        self.container_top = top;
        self
    }

    pub fn with_pages(mut self, heights: &[f64]) -> Self {
        for &height in heights {
            self.push_page(height);
        }
        self
    }

    pub fn push_page(&mut self, height: f64) -> PageId {
        self.push_tagged(DEFAULT_TAG, height)
    }

    /// Add a page only selected by `tag`
    pub fn push_tagged(&mut self, tag: &str, height: f64) -> PageId {
        let id = PageId(self.next_page);
        self.next_page += 1;
        self.pages.push(MemoryPage {
            id,
            tag: tag.to_string(),
            height,
        });
        id
    }

    pub fn set_page_height(&mut self, id: PageId, height: f64) {
        if let Some(page) = self.pages.iter_mut().find(|p| p.id == id) {
            page.height = height;
        }
        self.clamp_scroll();
    }

    pub fn remove_page(&mut self, id: PageId) {
        self.pages.retain(|p| p.id != id);
        self.clamp_scroll();
    }

    pub fn page_ids(&self) -> Vec<PageId> {
        self.pages.iter().map(|p| p.id).collect()
    }

    /// Resize the viewport. The host still has to be told through
    /// `ScrollEngine::handle_resize`.
    pub fn set_viewport_height(&mut self, viewport: f64) {
        self.viewport = viewport;
        self.clamp_scroll();
    }

    pub fn is_listening(&self, event: NativeEvent) -> bool {
        self.listener_count(event) > 0
    }

    pub fn listener_count(&self, event: NativeEvent) -> usize {
        self.listeners.values().filter(|(_, e)| *e == event).count()
    }

    pub fn total_listeners(&self) -> usize {
        self.listeners.len()
    }

    /// Targets listening for `event`
    pub fn listeners_for(&self, event: NativeEvent) -> Vec<ListenerTarget> {
        self.listeners
            .values()
            .filter(|(_, e)| *e == event)
            .map(|(target, _)| *target)
            .collect()
    }

    /// True once after the native scroll position changed
    pub fn take_scrolled(&mut self) -> bool {
        std::mem::take(&mut self.scrolled)
    }

    fn content_height(&self) -> f64 {
        self.pages.iter().map(|p| p.height).sum()
    }

    fn max_scroll(&self) -> f64 {
        (self.content_height() - self.viewport).max(0.0)
    }

    fn is_pinned(&self) -> bool {
        self.kind == ContainerKind::Body && self.style(StyleProperty::Position) == "fixed"
    }

    fn margin_top(&self) -> f64 {
        parse_px(&self.style(StyleProperty::MarginTop))
    }

    fn clamp_scroll(&mut self) {
        let clamped = self.scroll.clamp(0.0, self.max_scroll());
        if clamped != self.scroll {
            self.scroll = clamped;
            self.scrolled = true;
        }
    }
}

impl HostAdapter for MemoryHost {
    type Page = PageId;

    fn has_surface(&self) -> bool {
        self.surface
    }

    fn container_kind(&self) -> ContainerKind {
        self.kind
    }

    fn pages(&self, selector: &str) -> Vec<PageId> {
        self.pages
            .iter()
            .filter(|p| p.tag == selector)
            .map(|p| p.id)
            .collect()
    }

    fn viewport_height(&self) -> f64 {
        self.viewport
    }

    fn scroll_height(&self) -> f64 {
        self.content_height().max(self.viewport)
    }

    fn content_top(&self) -> f64 {
        match self.kind {
            ContainerKind::Element => self.container_top - self.scroll_position(),
            ContainerKind::Body if self.is_pinned() => self.margin_top(),
            ContainerKind::Body => -self.scroll_position(),
        }
    }

    fn page_top(&self, page: &PageId) -> f64 {
        let above: f64 = self
            .pages
            .iter()
            .take_while(|p| p.id != *page)
            .map(|p| p.height)
            .sum();
        self.content_top() + above
    }

    fn page_height(&self, page: &PageId) -> f64 {
        self.pages
            .iter()
            .find(|p| p.id == *page)
            .map(|p| p.height)
            .unwrap_or(0.0)
    }

    fn scroll_position(&self) -> f64 {
        if self.is_pinned() {
            0.0
        } else {
            self.scroll
        }
    }

    fn set_scroll_position(&mut self, y: f64) {
        if self.is_pinned() {
            return;
        }
        let clamped = y.clamp(0.0, self.max_scroll());
        if clamped != self.scroll {
            self.scroll = clamped;
            self.scrolled = true;
        }
    }

    fn style(&self, property: StyleProperty) -> String {
        self.styles.get(&property).cloned().unwrap_or_default()
    }

    fn set_style(&mut self, property: StyleProperty, value: &str) {
        self.styles.insert(property, value.to_string());
        if property == StyleProperty::Position && value == "fixed" {
            // a pinned body no longer scrolls the window
            self.scroll = 0.0;
        }
    }

    fn listen(&mut self, target: ListenTarget<'_, PageId>, event: NativeEvent) -> ListenerId {
        let target = match target {
            ListenTarget::Window => ListenerTarget::Window,
            ListenTarget::Document => ListenerTarget::Document,
            ListenTarget::Container => ListenerTarget::Container,
            ListenTarget::Page { page, .. } => ListenerTarget::Page(*page),
        };
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.insert(id, (target, event));
        id
    }

    fn unlisten(&mut self, id: ListenerId) {
        self.listeners.remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_are_stacked() {
        let host = MemoryHost::element(600.0)
            .with_container_top(40.0)
            .with_pages(&[500.0, 300.0]);
        let pages = host.pages("section");
        assert_eq!(pages.len(), 2);
        assert_eq!(host.page_top(&pages[0]) - host.content_top(), 0.0);
        assert_eq!(host.page_top(&pages[1]) - host.content_top(), 500.0);
        assert_eq!(host.page_top(&pages[1]), 540.0);
        assert_eq!(host.scroll_height(), 800.0);
    }

    #[test]
    fn test_selector_filters_pages() {
        let mut host = MemoryHost::element(100.0);
        host.push_page(50.0);
        host.push_tagged("aside", 20.0);
        host.push_page(50.0);
        assert_eq!(host.pages("section").len(), 2);
        assert_eq!(host.pages("aside").len(), 1);
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut host = MemoryHost::element(600.0).with_pages(&[500.0, 300.0]);
        host.set_scroll_position(1000.0);
        assert_eq!(host.scroll_position(), 200.0);
        assert!(host.take_scrolled());
        assert!(!host.take_scrolled());

        host.set_viewport_height(700.0);
        assert_eq!(host.scroll_position(), 100.0);
    }

    #[test]
    fn test_pinned_body_does_not_scroll() {
        let mut host = MemoryHost::body(300.0).with_pages(&[500.0, 500.0]);
        host.set_scroll_position(200.0);
        host.set_style(StyleProperty::Position, "fixed");
        host.set_style(StyleProperty::MarginTop, "-200px");

        assert_eq!(host.scroll_position(), 0.0);
        host.set_scroll_position(100.0);
        assert_eq!(host.scroll_position(), 0.0);
        assert_eq!(host.content_top(), -200.0);
    }

    #[test]
    fn test_listener_registry() {
        let mut host = MemoryHost::element(100.0).with_pages(&[50.0]);
        let page = host.page_ids()[0];
        let a = host.listen(ListenTarget::Container, NativeEvent::KeyDown);
        host.listen(ListenTarget::Page { index: 0, page: &page }, NativeEvent::SwipeUp);

        assert!(host.is_listening(NativeEvent::KeyDown));
        assert_eq!(host.listeners_for(NativeEvent::SwipeUp), vec![ListenerTarget::Page(page)]);

        host.unlisten(a);
        assert!(!host.is_listening(NativeEvent::KeyDown));
        assert_eq!(host.total_listeners(), 1);
    }
}
