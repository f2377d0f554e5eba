//! Frame schedulers
//!
//! The engine never sleeps. While animating it asks its scheduler for the
//! next display frame and the host drives [`crate::ScrollEngine::tick`]; the
//! scheduler decides whether a requested frame is due yet and which
//! timestamp the frame carries.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Leading delay before a batch of frame requests is flushed
pub const FRAME_WAIT: Duration = Duration::from_millis(10);

/// "Run my step on the next display frame"
pub trait FrameScheduler: fmt::Debug {
    /// Request a frame. Repeated requests before the frame fires are coalesced.
    fn request_frame(&mut self, now: Instant);

    /// Returns the frame timestamp if a requested frame is due at `now`.
    fn poll_frame(&mut self, now: Instant) -> Option<Instant>;

    /// Drop any requested frame
    fn cancel(&mut self);

    fn is_pending(&self) -> bool;
}

/// Serves every request on the very next poll, like a bare
/// animation-frame request.
#[derive(Debug, Default)]
pub struct NextFrame {
    requested: bool,
}

impl FrameScheduler for NextFrame {
    fn request_frame(&mut self, _now: Instant) {
        self.requested = true;
    }

    fn poll_frame(&mut self, now: Instant) -> Option<Instant> {
        if std::mem::take(&mut self.requested) {
            Some(now)
        } else {
            None
        }
    }

    fn cancel(&mut self) {
        self.requested = false;
    }

    fn is_pending(&self) -> bool {
        self.requested
    }
}

/// Default scheduler: the first request arms a short timer, every request
/// arriving before it fires joins the same frame.
#[derive(Debug)]
pub struct CoalescingScheduler {
    wait: Duration,
    armed_at: Option<Instant>,
}

impl Default for CoalescingScheduler {
    fn default() -> Self {
        Self::new(FRAME_WAIT)
    }
}

impl CoalescingScheduler {
    pub fn new(wait: Duration) -> Self {
        Self {
            wait,
            armed_at: None,
        }
    }

    pub fn due_at(&self) -> Option<Instant> {
        self.armed_at.map(|at| at + self.wait)
    }
}

impl FrameScheduler for CoalescingScheduler {
    fn request_frame(&mut self, now: Instant) {
        self.armed_at.get_or_insert(now);
    }

    fn poll_frame(&mut self, now: Instant) -> Option<Instant> {
        match self.due_at() {
            Some(due) if now >= due => {
                self.armed_at = None;
                Some(now)
            }
            _ => None,
        }
    }

    fn cancel(&mut self) {
        self.armed_at = None;
    }

    fn is_pending(&self) -> bool {
        self.armed_at.is_some()
    }
}

#[derive(Debug)]
struct HubState {
    wait: Duration,
    armed_at: Option<Instant>,
    queued: BTreeSet<usize>,
    delivered: HashMap<usize, Instant>,
    next_id: usize,
}

impl HubState {
    fn flush_if_due(&mut self, now: Instant) {
        let Some(armed_at) = self.armed_at else {
            return;
        };
        if now < armed_at + self.wait {
            return;
        }
        self.armed_at = None;
        for id in std::mem::take(&mut self.queued) {
            self.delivered.insert(id, now);
        }
    }
}

/// A coalescing queue shared explicitly between several engines.
///
/// All requests queued before the batch fires receive the same frame
/// timestamp, whichever engine polls first.
#[derive(Debug, Clone)]
pub struct FrameHub {
    state: Rc<RefCell<HubState>>,
}

impl Default for FrameHub {
    fn default() -> Self {
        Self::new(FRAME_WAIT)
    }
}

impl FrameHub {
    pub fn new(wait: Duration) -> Self {
        Self {
            state: Rc::new(RefCell::new(HubState {
                wait,
                armed_at: None,
                queued: BTreeSet::new(),
                delivered: HashMap::new(),
                next_id: 0,
            })),
        }
    }

    /// A scheduler handle for one engine
    pub fn scheduler(&self) -> HubScheduler {
        let mut state = self.state.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        HubScheduler {
            state: Rc::clone(&self.state),
            id,
        }
    }

    /// Number of handles waiting for the next batch
    pub fn queued(&self) -> usize {
        self.state.borrow().queued.len()
    }
}

/// One engine's view of a [`FrameHub`]
#[derive(Debug)]
pub struct HubScheduler {
    state: Rc<RefCell<HubState>>,
    id: usize,
}

impl FrameScheduler for HubScheduler {
    fn request_frame(&mut self, now: Instant) {
        let mut state = self.state.borrow_mut();
        state.queued.insert(self.id);
        state.armed_at.get_or_insert(now);
    }

    fn poll_frame(&mut self, now: Instant) -> Option<Instant> {
        let mut state = self.state.borrow_mut();
        state.flush_if_due(now);
        state.delivered.remove(&self.id)
    }

    fn cancel(&mut self) {
        let mut state = self.state.borrow_mut();
        state.queued.remove(&self.id);
        state.delivered.remove(&self.id);
        if state.queued.is_empty() {
            state.armed_at = None;
        }
    }

    fn is_pending(&self) -> bool {
        let state = self.state.borrow();
        state.queued.contains(&self.id) || state.delivered.contains_key(&self.id)
    }
}

impl Drop for HubScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_frame_serves_next_poll() {
        let start = Instant::now();
        let mut frames = NextFrame::default();
        assert_eq!(frames.poll_frame(start), None);

        frames.request_frame(start);
        frames.request_frame(start);
        assert!(frames.is_pending());
        assert_eq!(frames.poll_frame(start), Some(start));
        assert_eq!(frames.poll_frame(start), None);
    }

    #[test]
    fn test_coalescing_waits_then_fires_once() {
        let start = Instant::now();
        let mut frames = CoalescingScheduler::default();

        frames.request_frame(start);
        frames.request_frame(start + Duration::from_millis(4));
        assert_eq!(frames.poll_frame(start + Duration::from_millis(9)), None);

        let at = start + Duration::from_millis(12);
        assert_eq!(frames.poll_frame(at), Some(at));
        assert_eq!(frames.poll_frame(at + Duration::from_millis(20)), None);
        assert!(!frames.is_pending());
    }

    #[test]
    fn test_coalescing_cancel() {
        let start = Instant::now();
        let mut frames = CoalescingScheduler::default();
        frames.request_frame(start);
        frames.cancel();
        assert_eq!(frames.poll_frame(start + Duration::from_millis(50)), None);
    }

    #[test]
    fn test_hub_delivers_same_timestamp_to_all() {
        let start = Instant::now();
        let hub = FrameHub::default();
        let mut a = hub.scheduler();
        let mut b = hub.scheduler();

        a.request_frame(start);
        b.request_frame(start + Duration::from_millis(3));
        assert_eq!(hub.queued(), 2);

        let first = start + Duration::from_millis(11);
        let later = start + Duration::from_millis(15);
        assert_eq!(a.poll_frame(first), Some(first));
        // b was queued in the same batch, so it gets the batch timestamp
        assert_eq!(b.poll_frame(later), Some(first));
        assert_eq!(b.poll_frame(later), None);
    }

    #[test]
    fn test_hub_drop_releases_queue() {
        let start = Instant::now();
        let hub = FrameHub::default();
        {
            let mut a = hub.scheduler();
            a.request_frame(start);
            assert_eq!(hub.queued(), 1);
        }
        assert_eq!(hub.queued(), 0);
    }
}
