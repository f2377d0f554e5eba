//! Paged scrolling engine
//!
//! Tracks which page of a container is visible, navigates between pages with
//! animated transitions and keeps its page offset cache in sync with layout
//! changes. Everything platform specific goes through [`HostAdapter`].
//!
//! # Architecture
//!
//! ## Leaf layer
//! - `easing` - Pure easing curves mapping time fraction to progress
//! - `timing` - Clocks and time calculation utilities
//! - `frame` - Frame schedulers ("run on the next display frame")
//! - `layout` - Page extents measured against the container
//! - `debounce` - Leading-edge debounce for scroll/resize floods
//! - `events` - Event broadcast to consumers
//! - `input` - Raw keyboard/wheel/swipe input and its normalization
//! - `host` - The host adapter contract
//!
//! ## Engine layer
//! - `animation` - Animation strategies and the per-frame step
//! - `engine` - The scroll engine state machine
//!
//! # Usage
//!
//! ```ignore
//! use pagescroll_core::{MemoryHost, ScrollEngine, ScrollOptions};
//!
//! let host = MemoryHost::element(600.0).with_pages(&[500.0, 300.0, 400.0]);
//! let mut engine = ScrollEngine::new(host, ScrollOptions::default());
//! let mut events = engine.subscribe();
//!
//! engine.init(None)?;
//! engine.scroll_next(None)?;
//!
//! // Once per display refresh
//! engine.tick();
//! ```

pub mod easing;
pub mod events;
pub mod frame;
pub mod host;
pub mod input;
pub mod layout;
pub mod timing;

pub mod animation;
pub mod debounce;
pub mod engine;

pub use animation::{Animation, StepFn};
pub use debounce::{debounce_leading, DebounceLeading};
pub use easing::Easing;
pub use engine::{Lifecycle, ScrollEngine, RESIZE_AFTER_SCROLL_BUFFER};
pub use events::{EventBroadcaster, ScrollEvent};
pub use frame::{CoalescingScheduler, FrameHub, FrameScheduler, HubScheduler, NextFrame, FRAME_WAIT};
pub use host::{
    ContainerKind, HostAdapter, ListenTarget, ListenerId, NativeEvent, StyleProperty, Subscription,
};
pub use input::{
    normalize_wheel, DeltaMode, Disposition, Interaction, Key, KeyInput, Modifiers, SwipeDirection,
    WheelAxis, WheelInput,
};
pub use layout::{LayoutSnapshot, PageExtent};
pub use timing::{Clock, ManualClock, SystemClock};
