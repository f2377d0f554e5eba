//! The scroll engine state machine

use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use super::animation::{Animation, FrameStep, Transition};
use super::debounce::DebounceLeading;
use super::events::{EventBroadcaster, ScrollEvent};
use super::frame::{CoalescingScheduler, FrameScheduler};
use super::host::{
    parse_px, ContainerKind, HostAdapter, ListenTarget, NativeEvent, StyleProperty, Subscription,
};
use super::input::{
    normalize_wheel, Disposition, Interaction, Key, KeyInput, SwipeDirection, WheelInput,
};
use super::layout::{LayoutSnapshot, PageExtent};
use super::timing::{Clock, SystemClock};
use crate::config::{IndexRecognition, PagingThreshold, ScrollOptions};
use crate::error::{Error, Result};

/// A scroll followed by a resize within this window is a zoom, not a scroll
pub const RESIZE_AFTER_SCROLL_BUFFER: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    Initialized,
    Destroyed,
}

/// Native scroll/resize plumbing, alive between `init` and `destroy`
#[derive(Debug)]
struct Streams {
    listeners: Subscription,
    scroll: DebounceLeading<()>,
    resize: DebounceLeading<()>,
    /// Scroll events still waiting to see whether a resize follows
    pending_scrolls: VecDeque<Instant>,
}

/// Paged scrolling over the pages of one container.
///
/// The engine owns its host. Hosts forward native events to the
/// `handle_*` methods and call [`ScrollEngine::tick`] once per display
/// refresh while [`ScrollEngine::needs_tick`] is true.
pub struct ScrollEngine<H: HostAdapter> {
    host: H,
    options: ScrollOptions,
    animation: Animation,
    clock: Rc<dyn Clock>,
    frames: Box<dyn FrameScheduler>,
    events: EventBroadcaster,
    lifecycle: Lifecycle,

    pages: Vec<H::Page>,
    layout: LayoutSnapshot,
    index: Option<usize>,
    exact_index: Option<usize>,

    overflow_on: Option<bool>,
    paging_on: Option<bool>,
    paging_threshold: PagingThreshold,
    prepaused_threshold: Option<PagingThreshold>,
    pause_system: bool,
    registrations: HashMap<Interaction, Subscription>,

    transition: Option<Transition>,
    streams: Option<Streams>,

    // body style to restore when overflow is enabled again
    saved_position: String,
    saved_width: String,
}

impl<H: HostAdapter> ScrollEngine<H> {
    pub fn new(host: H, options: ScrollOptions) -> Self {
        Self {
            animation: Animation::from(&options.animation),
            paging_threshold: options.paging_threshold_px,
            host,
            options,
            clock: Rc::new(SystemClock),
            frames: Box::new(CoalescingScheduler::default()),
            events: EventBroadcaster::new(),
            lifecycle: Lifecycle::Uninitialized,
            pages: Vec::new(),
            layout: LayoutSnapshot::default(),
            index: None,
            exact_index: None,
            overflow_on: None,
            paging_on: None,
            prepaused_threshold: None,
            pause_system: false,
            registrations: HashMap::new(),
            transition: None,
            streams: None,
            saved_position: String::new(),
            saved_width: String::new(),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Rc::new(clock);
        self
    }

    pub fn with_scheduler(mut self, frames: impl FrameScheduler + 'static) -> Self {
        self.frames = Box::new(frames);
        self
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Receive every event emitted from now on
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<ScrollEvent> {
        self.events.subscribe()
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Measure the pages, attach listeners and optionally jump to
    /// `start_index`.
    ///
    /// Without a rendering surface this does nothing and the engine stays
    /// uninitialized.
    pub fn init(&mut self, start_index: Option<usize>) -> Result<()> {
        if !self.host.has_surface() {
            debug!("No rendering surface, scroll engine stays uninitialized");
            return Ok(());
        }
        if self.lifecycle == Lifecycle::Initialized {
            return Err(Error::InvalidState("scroll engine is already initialized".into()));
        }
        if let Some(index) = start_index {
            let len = self.host.pages(&self.options.page_selector).len();
            if index >= len {
                return Err(Error::IndexOutOfRange { index, len });
            }
        }

        match self.host.container_kind() {
            ContainerKind::Body => {
                let pinned = self.host.style(StyleProperty::Position) == "fixed";
                self.overflow_on = Some(!pinned);
                if pinned {
                    self.saved_position = "static".to_string();
                    self.saved_width = self.host.style(StyleProperty::Width);
                }
            }
            ContainerKind::Element => {
                self.overflow_on = Some(self.host.style(StyleProperty::OverflowY) != "hidden");
            }
        }
        self.paging_threshold = self.options.paging_threshold_px;

        if !self.refresh_pages() {
            self.refresh_offsets();
        }
        // extents may match the last snapshot while paging_on was cleared
        self.refresh_paging();

        let scroll_target = match self.host.container_kind() {
            ContainerKind::Body => ListenTarget::Window,
            ContainerKind::Element => ListenTarget::Container,
        };
        let mut listeners = Subscription::new();
        listeners.push(self.host.listen(scroll_target, NativeEvent::Scroll));
        listeners.push(self.host.listen(ListenTarget::Window, NativeEvent::Resize));
        self.streams = Some(Streams {
            listeners,
            scroll: DebounceLeading::new(Duration::from_millis(self.options.scroll_debounce_ms)),
            resize: DebounceLeading::new(Duration::from_millis(self.options.resize_debounce_ms)),
            pending_scrolls: VecDeque::new(),
        });

        self.lifecycle = Lifecycle::Initialized;
        self.refresh_interactions();

        info!(
            "Scroll engine initialized: {} pages, paging {}",
            self.layout.len(),
            if self.paging_on == Some(true) { "on" } else { "off" }
        );
        self.events.emit(ScrollEvent::Initialized);

        match start_index {
            Some(index) => self.scroll_to(index, None),
            None => {
                self.refresh_index();
                Ok(())
            }
        }
    }

    /// Detach every listener and stop any move in flight.
    ///
    /// Interaction preferences survive, so a later `init` restores the same
    /// adapters.
    pub fn destroy(&mut self) -> Result<()> {
        if self.lifecycle != Lifecycle::Initialized {
            return Err(Error::InvalidState(
                "destroy called on a scroll engine that is not initialized".into(),
            ));
        }

        self.lifecycle = Lifecycle::Destroyed;
        if self.transition.take().is_some() {
            debug!("Cancelled animation in flight");
        }
        self.frames.cancel();

        self.index = None;
        self.exact_index = None;
        self.pause_system = false;
        self.prepaused_threshold = None;

        self.refresh_interactions();
        if let Some(streams) = self.streams.take() {
            streams.listeners.release(&mut self.host);
        }
        self.paging_on = None;

        info!("Scroll engine destroyed");
        self.events.emit(ScrollEvent::Destroyed);
        Ok(())
    }

    fn ensure_initialized(&self) -> Result<()> {
        match self.lifecycle {
            Lifecycle::Initialized => Ok(()),
            Lifecycle::Uninitialized => Err(Error::InvalidState(
                "scroll engine is not initialized".into(),
            )),
            Lifecycle::Destroyed => Err(Error::InvalidState("scroll engine was destroyed".into())),
        }
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Move to the page at `index`.
    ///
    /// Does nothing while another move is in flight.
    pub fn scroll_to(&mut self, index: usize, animation: Option<&Animation>) -> Result<()> {
        self.ensure_initialized()?;
        let len = self.layout.len();
        let Some(extent) = self.layout.get(index).copied() else {
            return Err(Error::IndexOutOfRange { index, len });
        };
        if self.transition.is_some() {
            debug!("Move to page {} ignored, animation in flight", index);
            return Ok(());
        }

        debug!("Scrolling to page {} (offset {})", index, extent.top);
        self.animate_offset(extent.top, animation);
        Ok(())
    }

    /// Move to the next page. Returns whether there was one.
    ///
    /// Above the first page, the first page is the next one once the
    /// bottom of the viewport reached it.
    pub fn scroll_next(&mut self, animation: Option<&Animation>) -> Result<bool> {
        self.ensure_initialized()?;
        let Some(last) = self.layout.len().checked_sub(1) else {
            return Ok(false);
        };

        match self.index {
            None => {
                let first = self.layout.extents[0];
                let bottom = self.offset() + self.host.viewport_height();
                if first.contains(bottom) {
                    self.scroll_to(0, animation)?;
                    return Ok(true);
                }
                Ok(false)
            }
            Some(index) if index < last => {
                self.scroll_to(index + 1, animation)?;
                Ok(true)
            }
            Some(_) => Ok(false),
        }
    }

    /// Move to the previous page. Returns whether there was one.
    ///
    /// On the last page but not aligned with it, this first aligns with
    /// the last page. Below the last page, the last page is the previous
    /// one while the top of the viewport is inside it.
    pub fn scroll_previous(&mut self, animation: Option<&Animation>) -> Result<bool> {
        self.ensure_initialized()?;
        let Some(last) = self.layout.len().checked_sub(1) else {
            return Ok(false);
        };

        match self.index {
            Some(index) if index == last && !self.is_exact_index() => {
                self.scroll_to(last, animation)?;
                Ok(true)
            }
            Some(index) if index > 0 => {
                self.scroll_to(index - 1, animation)?;
                Ok(true)
            }
            Some(_) => Ok(false),
            None => {
                let top = self.offset();
                if self.layout.extents[last].contains(top) {
                    self.scroll_to(last, animation)?;
                    return Ok(true);
                }
                Ok(false)
            }
        }
    }

    fn animate_offset(&mut self, target: f64, animation: Option<&Animation>) {
        let from = self.offset();
        if target == from {
            return;
        }

        match Transition::new(from, target, animation.unwrap_or(&self.animation)) {
            None => {
                self.set_offset(target);
                self.events.emit(ScrollEvent::MoveFinished);
                self.refresh_index();
            }
            Some(transition) => {
                trace!("Starting {:?}", transition);
                self.transition = Some(transition);
                self.frames.request_frame(self.clock.now());
            }
        }
    }

    /// Drive time: deliver due scroll/resize events and run the animation
    /// frame if one is due.
    pub fn tick(&mut self) {
        let now = self.clock.now();
        self.pump_streams(now);
        self.step_frame(now);
    }

    /// Whether `tick` has work to do now or later
    pub fn needs_tick(&self) -> bool {
        let streams_busy = self.streams.as_ref().is_some_and(|s| {
            !s.pending_scrolls.is_empty()
                || s.scroll.next_deadline().is_some()
                || s.resize.next_deadline().is_some()
        });
        self.transition.is_some() || self.frames.is_pending() || streams_busy
    }

    fn step_frame(&mut self, now: Instant) {
        let Some(timestamp) = self.frames.poll_frame(now) else {
            return;
        };
        let current = self.offset();
        let step = match self.transition.as_mut() {
            Some(transition) => transition.advance(timestamp, current),
            None => return,
        };

        match step {
            FrameStep::Continue(y) => {
                trace!("Animation frame: offset {:.1}", y);
                self.set_offset(y);
                self.frames.request_frame(now);
            }
            FrameStep::Finish(target) => {
                self.transition = None;
                self.set_offset(target);
                debug!("Move finished at offset {}", target);
                self.events.emit(ScrollEvent::MoveFinished);
                self.refresh_index();
            }
        }
    }

    // ------------------------------------------------------------------
    // Offset and index
    // ------------------------------------------------------------------

    /// Scroll distance from the container top, whichever way the content
    /// is currently shifted
    pub fn offset(&self) -> f64 {
        match self.host.container_kind() {
            ContainerKind::Body if self.overflow_on == Some(false) => {
                -parse_px(&self.host.style(StyleProperty::MarginTop))
            }
            _ => self.host.scroll_position(),
        }
    }

    fn set_offset(&mut self, y: f64) {
        match self.host.container_kind() {
            ContainerKind::Body if self.overflow_on == Some(false) => {
                self.host
                    .set_style(StyleProperty::MarginTop, &format!("{}px", -y));
            }
            _ => self.host.set_scroll_position(y),
        }
    }

    /// Current page, `None` outside of every page
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Current page when the offset is aligned with its top
    pub fn exact_index(&self) -> Option<usize> {
        self.exact_index
    }

    pub fn is_exact_index(&self) -> bool {
        let offset = self.offset();
        self.index
            .and_then(|index| self.layout.get(index))
            .is_some_and(|extent| (offset - extent.top).abs() < 1.0)
    }

    fn index_from_offset(&self) -> Option<usize> {
        let recognition = match self.options.index_recognition_offset_px {
            IndexRecognition::FromTop(px) => px,
            IndexRecognition::ViewportCenter => self.host.viewport_height() / 2.0,
        };
        self.layout.index_at(self.offset() + recognition)
    }

    /// Recompute index and exact index, emitting an event for each that
    /// changed
    pub fn refresh_index(&mut self) {
        let index = self.index_from_offset();
        if index != self.index {
            debug!("Page index changed: {:?} -> {:?}", self.index, index);
            self.index = index;
            self.events.emit(ScrollEvent::IndexChanged(index));
        }

        let exact = if self.is_exact_index() { self.index } else { None };
        if exact != self.exact_index {
            self.exact_index = exact;
            self.events.emit(ScrollEvent::ExactIndexChanged(exact));
        }
    }

    // ------------------------------------------------------------------
    // Layout
    // ------------------------------------------------------------------

    /// Re-read the page list. Returns false when it is unchanged.
    pub fn refresh_pages(&mut self) -> bool {
        let pages = self.host.pages(&self.options.page_selector);
        if pages == self.pages {
            return false;
        }
        debug!("Page list changed: {} -> {} pages", self.pages.len(), pages.len());
        self.pages = pages;

        let paging_before = self.paging_on;
        self.refresh_offsets();

        // swipe listeners are bound to page handles
        if paging_before == self.paging_on && self.registrations.contains_key(&Interaction::Swipe) {
            self.detach(Interaction::Swipe);
            self.attach(Interaction::Swipe);
        }
        true
    }

    /// Re-measure every page. Returns false when nothing moved.
    pub fn refresh_offsets(&mut self) -> bool {
        let layout = LayoutSnapshot::probe(&self.host, &self.pages);
        if layout.same_extents(&self.layout) {
            return false;
        }
        trace!("Page extents: {:?}", layout.extents);
        self.layout = layout;
        self.refresh_paging();
        true
    }

    fn refresh_paging(&mut self) {
        let viewport = self.host.viewport_height();
        let on = match self.paging_threshold {
            PagingThreshold::Auto => viewport >= self.layout.max_page_height,
            PagingThreshold::Disabled => false,
            PagingThreshold::AboveViewport(px) => viewport > px,
        };
        if self.paging_on != Some(on) {
            debug!("Paging {}", if on { "enabled" } else { "disabled" });
            self.paging_on = Some(on);
            self.refresh_interactions();
        }
    }

    pub fn extents(&self) -> &[PageExtent] {
        &self.layout.extents
    }

    pub fn page_count(&self) -> usize {
        self.layout.len()
    }

    // ------------------------------------------------------------------
    // Native scroll and resize
    // ------------------------------------------------------------------

    /// The container (or window) scrolled
    pub fn handle_scroll(&mut self) {
        let now = self.clock.now();
        if let Some(streams) = self.streams.as_mut() {
            streams.pending_scrolls.push_back(now);
        }
        self.pump_streams(now);
    }

    /// The window was resized
    pub fn handle_resize(&mut self) {
        let now = self.clock.now();
        self.pump_streams(now);

        let Some(streams) = self.streams.as_mut() else {
            return;
        };
        if !streams.pending_scrolls.is_empty() {
            trace!("Dropping {} scroll event(s) caused by zoom", streams.pending_scrolls.len());
            streams.pending_scrolls.clear();
        }
        if streams.resize.push((), now).is_some() {
            self.on_resize();
        }
    }

    fn pump_streams(&mut self, now: Instant) {
        let mut refresh_index = false;
        let mut resized = false;

        if let Some(streams) = self.streams.as_mut() {
            while let Some(&at) = streams.pending_scrolls.front() {
                let due = at + RESIZE_AFTER_SCROLL_BUFFER;
                if due > now {
                    break;
                }
                streams.pending_scrolls.pop_front();
                refresh_index |= streams.scroll.poll(due).is_some();
                refresh_index |= streams.scroll.push((), due).is_some();
            }
            refresh_index |= streams.scroll.poll(now).is_some();
            resized = streams.resize.poll(now).is_some();
        }

        if resized {
            self.on_resize();
        }
        if refresh_index {
            self.refresh_index();
        }
    }

    fn on_resize(&mut self) {
        if !self.refresh_offsets() {
            self.refresh_paging();
        }

        let resnap = match self.index {
            Some(index) if self.options.resize_keeps_current_page && !self.is_exact_index() => Some(index),
            _ => None,
        };
        match resnap {
            Some(index) => {
                debug!("Resized, staying on page {}", index);
                if let Err(e) = self.scroll_to(index, Some(&Animation::none())) {
                    warn!("Failed to stay on page after resize: {}", e);
                }
            }
            None => self.refresh_index(),
        }
    }

    // ------------------------------------------------------------------
    // Interactions
    // ------------------------------------------------------------------

    /// A key went down on the container (or document, for the body)
    pub fn handle_key(&mut self, input: &KeyInput) -> Disposition {
        if !self.is_active(Interaction::Keyboard) || input.default_prevented {
            return Disposition::Ignored;
        }
        if self.pause_system && input.key.is_scroll_key() {
            return Disposition::Consume;
        }

        let moved = match input.key {
            Key::PageDown | Key::ArrowDown => self.scroll_next(None),
            Key::PageUp | Key::ArrowUp => self.scroll_previous(None),
            Key::Other => return Disposition::Ignored,
        };
        self.disposition(moved, Disposition::Consume)
    }

    pub fn handle_wheel(&mut self, input: &WheelInput) -> Disposition {
        if !self.is_active(Interaction::Mouse) || input.default_prevented {
            return Disposition::Ignored;
        }
        if input.modifiers.any() {
            return Disposition::Ignored;
        }
        if self.pause_system {
            return Disposition::Consume;
        }

        let spin = normalize_wheel(input);
        let moved = if spin > 0.0 {
            self.scroll_next(None)
        } else if spin < 0.0 {
            self.scroll_previous(None)
        } else {
            return Disposition::Ignored;
        };
        self.disposition(moved, Disposition::Consume)
    }

    /// A swipe gesture was recognized on page `page`
    pub fn handle_swipe(&mut self, page: usize, direction: SwipeDirection) -> Disposition {
        if !self.is_active(Interaction::Swipe) {
            return Disposition::Ignored;
        }
        let last = self.pages.len().saturating_sub(1);
        let registered = match direction {
            SwipeDirection::Down => page > 0 && page <= last,
            SwipeDirection::Up => page < last,
        };
        if !registered {
            return Disposition::Ignored;
        }
        if self.pause_system {
            return Disposition::PreventDefault;
        }

        let moved = match direction {
            SwipeDirection::Up => self.scroll_next(None),
            SwipeDirection::Down => self.scroll_previous(None),
        };
        self.disposition(moved, Disposition::PreventDefault)
    }

    fn disposition(&self, moved: Result<bool>, on_move: Disposition) -> Disposition {
        match moved {
            Ok(true) => on_move,
            Ok(false) => Disposition::Ignored,
            Err(e) => {
                warn!("Interaction ignored: {}", e);
                Disposition::Ignored
            }
        }
    }

    /// Flip an interaction preference, or force it with `state`
    pub fn toggle(&mut self, interaction: Interaction, state: Option<bool>) {
        let preference = self.preference_mut(interaction);
        *preference = state.unwrap_or(!*preference);
        self.refresh_interaction(interaction);
    }

    pub fn enable(&mut self, interaction: Interaction) {
        self.toggle(interaction, Some(true));
    }

    pub fn disable(&mut self, interaction: Interaction) {
        self.toggle(interaction, Some(false));
    }

    /// The user preference for an interaction
    pub fn is_on(&self, interaction: Interaction) -> bool {
        match interaction {
            Interaction::Keyboard => self.options.keyboard_enabled,
            Interaction::Mouse => self.options.mouse_enabled,
            Interaction::Swipe => self.options.swipe_enabled,
        }
    }

    /// Whether the interaction's listeners are attached
    pub fn is_active(&self, interaction: Interaction) -> bool {
        self.registrations.contains_key(&interaction)
    }

    pub fn toggle_keyboard(&mut self, state: Option<bool>) {
        self.toggle(Interaction::Keyboard, state);
    }

    pub fn enable_keyboard(&mut self) {
        self.enable(Interaction::Keyboard);
    }

    pub fn disable_keyboard(&mut self) {
        self.disable(Interaction::Keyboard);
    }

    pub fn keyboard_on(&self) -> bool {
        self.is_on(Interaction::Keyboard)
    }

    pub fn keyboard_active(&self) -> bool {
        self.is_active(Interaction::Keyboard)
    }

    pub fn toggle_mouse(&mut self, state: Option<bool>) {
        self.toggle(Interaction::Mouse, state);
    }

    pub fn enable_mouse(&mut self) {
        self.enable(Interaction::Mouse);
    }

    pub fn disable_mouse(&mut self) {
        self.disable(Interaction::Mouse);
    }

    pub fn mouse_on(&self) -> bool {
        self.is_on(Interaction::Mouse)
    }

    pub fn mouse_active(&self) -> bool {
        self.is_active(Interaction::Mouse)
    }

    pub fn toggle_swipe(&mut self, state: Option<bool>) {
        self.toggle(Interaction::Swipe, state);
    }

    pub fn enable_swipe(&mut self) {
        self.enable(Interaction::Swipe);
    }

    pub fn disable_swipe(&mut self) {
        self.disable(Interaction::Swipe);
    }

    pub fn swipe_on(&self) -> bool {
        self.is_on(Interaction::Swipe)
    }

    pub fn swipe_active(&self) -> bool {
        self.is_active(Interaction::Swipe)
    }

    fn preference_mut(&mut self, interaction: Interaction) -> &mut bool {
        match interaction {
            Interaction::Keyboard => &mut self.options.keyboard_enabled,
            Interaction::Mouse => &mut self.options.mouse_enabled,
            Interaction::Swipe => &mut self.options.swipe_enabled,
        }
    }

    fn refresh_interactions(&mut self) {
        for interaction in Interaction::ALL {
            self.refresh_interaction(interaction);
        }
    }

    fn refresh_interaction(&mut self, interaction: Interaction) {
        let attached = self.registrations.contains_key(&interaction);
        let wanted = self.lifecycle == Lifecycle::Initialized
            && ((self.is_on(interaction) && self.paging_on == Some(true)) || self.pause_system);

        if attached == wanted {
            return;
        }
        if wanted {
            self.attach(interaction);
        } else {
            self.detach(interaction);
        }
    }

    fn attach(&mut self, interaction: Interaction) {
        let target = match self.host.container_kind() {
            ContainerKind::Body => ListenTarget::Document,
            ContainerKind::Element => ListenTarget::Container,
        };

        let mut subscription = Subscription::new();
        match interaction {
            Interaction::Keyboard => subscription.push(self.host.listen(target, NativeEvent::KeyDown)),
            Interaction::Mouse => subscription.push(self.host.listen(target, NativeEvent::Wheel)),
            Interaction::Swipe => {
                let count = self.pages.len();
                for (index, page) in self.pages.iter().enumerate() {
                    if index > 0 {
                        let target = ListenTarget::Page { index, page };
                        subscription.push(self.host.listen(target, NativeEvent::SwipeDown));
                    }
                    if index + 1 < count {
                        let target = ListenTarget::Page { index, page };
                        subscription.push(self.host.listen(target, NativeEvent::SwipeUp));
                    }
                }
            }
        }

        debug!("Attached {} listener(s) for {}", subscription.len(), interaction);
        self.registrations.insert(interaction, subscription);
    }

    fn detach(&mut self, interaction: Interaction) {
        if let Some(subscription) = self.registrations.remove(&interaction) {
            debug!("Detached {} listener(s) for {}", subscription.len(), interaction);
            subscription.release(&mut self.host);
        }
    }

    /// Stop user interactions from paging, keeping every preference.
    ///
    /// With `include_system`, all three adapters stay attached and swallow
    /// the events that would scroll natively.
    pub fn pause_interactions(&mut self, include_system: bool) {
        self.pause_system = include_system;
        if self.prepaused_threshold.is_none() {
            self.prepaused_threshold = Some(self.paging_threshold);
        }
        self.paging_threshold = PagingThreshold::Disabled;
        debug!("Interactions paused (system: {})", include_system);
        self.apply_threshold();
    }

    pub fn unpause_interactions(&mut self) {
        self.pause_system = false;
        if let Some(threshold) = self.prepaused_threshold.take() {
            self.paging_threshold = threshold;
        }
        debug!("Interactions resumed");
        self.apply_threshold();
    }

    pub fn interactions_paused(&self) -> bool {
        self.prepaused_threshold.is_some()
    }

    /// Kept in the options, so the threshold survives `destroy` and `init`
    pub fn set_paging_threshold(&mut self, threshold: PagingThreshold) {
        self.options.paging_threshold_px = threshold;
        self.paging_threshold = threshold;
        self.apply_threshold();
    }

    /// Set the threshold from its numeric form (-1, 0 or a positive pixel value)
    pub fn set_paging_threshold_px(&mut self, px: f64) -> Result<()> {
        let threshold = PagingThreshold::try_from(px)?;
        self.set_paging_threshold(threshold);
        Ok(())
    }

    pub fn paging_threshold(&self) -> PagingThreshold {
        self.paging_threshold
    }

    fn apply_threshold(&mut self) {
        if self.lifecycle == Lifecycle::Initialized {
            self.refresh_paging();
        }
        self.refresh_interactions();
    }

    /// Whether user interactions are allowed to page. `None` before `init`.
    pub fn paging_on(&self) -> Option<bool> {
        self.paging_on
    }

    // ------------------------------------------------------------------
    // Overflow
    // ------------------------------------------------------------------

    pub fn toggle_overflow(&mut self, state: Option<bool>) {
        let enable = state.unwrap_or(self.overflow_on != Some(true));
        if enable {
            self.enable_overflow();
        } else {
            self.disable_overflow();
        }
    }

    /// Suppress native scrolling. A body is pinned in place and shifted
    /// with its top margin so the offset is kept.
    pub fn disable_overflow(&mut self) {
        if self.overflow_on == Some(false) {
            return;
        }
        match self.host.container_kind() {
            ContainerKind::Body => {
                let offset = self.offset();
                self.saved_position = self.host.style(StyleProperty::Position);
                self.saved_width = self.host.style(StyleProperty::Width);
                self.host
                    .set_style(StyleProperty::MarginTop, &format!("{}px", -offset));
                self.host.set_style(StyleProperty::Position, "fixed");
                self.host.set_style(StyleProperty::Width, "100%");
            }
            ContainerKind::Element => {
                self.host.set_style(StyleProperty::OverflowY, "hidden");
            }
        }
        self.overflow_on = Some(false);
        debug!("Overflow disabled");
    }

    /// Restore native scrolling at the same offset
    pub fn enable_overflow(&mut self) {
        if self.overflow_on == Some(true) {
            return;
        }
        match self.host.container_kind() {
            ContainerKind::Body => {
                let offset = self.offset();
                let position = std::mem::take(&mut self.saved_position);
                let width = std::mem::take(&mut self.saved_width);
                self.host.set_style(StyleProperty::Position, &position);
                self.host.set_style(StyleProperty::MarginTop, "0");
                self.host.set_style(StyleProperty::Width, &width);
                self.overflow_on = Some(true);
                self.animate_offset(offset, Some(&Animation::none()));
            }
            ContainerKind::Element => {
                self.host.set_style(StyleProperty::OverflowY, "auto");
            }
        }
        self.overflow_on = Some(true);
        debug!("Overflow enabled");
    }

    /// `None` before `init` on a container whose state was never read
    pub fn overflow_on(&self) -> Option<bool> {
        self.overflow_on
    }

    /// Whether the content is taller than the viewport
    pub fn has_overflow(&self) -> bool {
        self.host.scroll_height() > self.host.viewport_height()
    }

    // ------------------------------------------------------------------
    // State
    // ------------------------------------------------------------------

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn initialized(&self) -> bool {
        self.lifecycle == Lifecycle::Initialized
    }

    /// A move is in flight
    pub fn animating(&self) -> bool {
        self.transition.is_some()
    }

    /// Offset the move in flight is heading to
    pub fn target_offset(&self) -> Option<f64> {
        self.transition.as_ref().map(|t| t.target())
    }

    pub fn options(&self) -> &ScrollOptions {
        &self.options
    }

    pub fn animation(&self) -> &Animation {
        &self.animation
    }

    /// Replace the animation used when a call does not pass its own
    pub fn set_animation(&mut self, animation: Animation) {
        self.animation = animation;
    }
}

impl<H: HostAdapter + std::fmt::Debug> std::fmt::Debug for ScrollEngine<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollEngine")
            .field("host", &self.host)
            .field("lifecycle", &self.lifecycle)
            .field("index", &self.index)
            .field("exact_index", &self.exact_index)
            .field("paging_on", &self.paging_on)
            .field("overflow_on", &self.overflow_on)
            .field("transition", &self.transition)
            .finish()
    }
}
