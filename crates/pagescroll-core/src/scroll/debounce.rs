//! Leading-edge debounce
//!
//! The first value of a burst passes through immediately. Values arriving
//! while the window is open are held back; when the stream has been quiet
//! for a whole window the latest held value is emitted and the window opens
//! again. A window that closes with nothing held ends the burst.

use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::time::sleep_until;

#[derive(Debug)]
pub struct DebounceLeading<T> {
    window: Duration,
    deadline: Option<Instant>,
    pending: Option<T>,
}

impl<T> DebounceLeading<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
            pending: None,
        }
    }

    /// Feed a value. Returns whatever should be emitted right away.
    ///
    /// A value held past its deadline is returned first and `value` takes
    /// its place; when `value` starts a new burst it is due immediately, so
    /// the next `poll` at `now` emits it.
    pub fn push(&mut self, value: T, now: Instant) -> Option<T> {
        if let Some(deadline) = self.deadline.filter(|deadline| now >= *deadline) {
            match self.pending.take() {
                Some(held) => {
                    // the held value re-armed the window at `deadline`
                    let burst_over = now >= deadline + self.window;
                    self.deadline = Some(if burst_over { now } else { now + self.window });
                    self.pending = Some(value);
                    return Some(held);
                }
                None => self.deadline = None,
            }
        }

        let idle = self.deadline.is_none();
        self.deadline = Some(now + self.window);
        if idle {
            return Some(value);
        }
        self.pending = Some(value);
        None
    }

    /// Emit the held value if the quiet window has passed
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let deadline = self.deadline?;
        if now < deadline {
            return None;
        }
        match self.pending.take() {
            Some(value) => {
                self.deadline = Some(now + self.window);
                Some(value)
            }
            None => {
                self.deadline = None;
                None
            }
        }
    }

    /// When `poll` next needs to run
    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Take the held value without waiting for the window
    pub fn flush(&mut self) -> Option<T> {
        self.deadline = None;
        self.pending.take()
    }
}

/// Debounce an async channel with leading-edge emission.
///
/// Spawns a task on the current tokio runtime. When the source closes, a
/// held value is flushed before the output closes.
pub fn debounce_leading<T>(mut source: mpsc::UnboundedReceiver<T>, window: Duration) -> mpsc::UnboundedReceiver<T>
where
    T: Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let mut state = DebounceLeading::new(window);
        loop {
            let deadline = state.next_deadline();
            tokio::select! {
                biased;

                _ = wait_until(deadline) => {
                    if let Some(value) = state.poll(now()) {
                        if tx.send(value).is_err() {
                            break;
                        }
                    }
                }
                item = source.recv() => match item {
                    Some(value) => {
                        if let Some(value) = state.push(value, now()) {
                            if tx.send(value).is_err() {
                                break;
                            }
                        }
                    }
                    None => {
                        if let Some(value) = state.flush() {
                            let _ = tx.send(value);
                        }
                        break;
                    }
                },
            }
        }
    });

    rx
}

fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(tokio::time::Instant::from_std(deadline)).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_leading_then_trailing() {
        let t0 = Instant::now();
        let mut debounce = DebounceLeading::new(ms(50));

        assert_eq!(debounce.push("A", t0), Some("A"));
        assert_eq!(debounce.push("B", t0 + ms(10)), None);
        assert_eq!(debounce.push("C", t0 + ms(20)), None);

        assert_eq!(debounce.poll(t0 + ms(69)), None);
        assert_eq!(debounce.next_deadline(), Some(t0 + ms(70)));
        assert_eq!(debounce.poll(t0 + ms(70)), Some("C"));

        // window re-armed, then closes with nothing held
        assert_eq!(debounce.poll(t0 + ms(120)), None);
        assert_eq!(debounce.next_deadline(), None);
    }

    #[test]
    fn test_new_burst_after_quiet_window() {
        let t0 = Instant::now();
        let mut debounce = DebounceLeading::new(ms(50));

        assert_eq!(debounce.push(1, t0), Some(1));
        // nobody polled, but the window is long gone
        assert_eq!(debounce.push(2, t0 + ms(200)), Some(2));
    }

    #[test]
    fn test_unpolled_trailing_value_is_not_lost() {
        let t0 = Instant::now();
        let mut debounce = DebounceLeading::new(ms(50));

        assert_eq!(debounce.push("A", t0), Some("A"));
        assert_eq!(debounce.push("B", t0 + ms(10)), None);
        // B was due at 60 and its re-armed window closed at 110
        assert_eq!(debounce.push("D", t0 + ms(200)), Some("B"));
        assert_eq!(debounce.next_deadline(), Some(t0 + ms(200)));
        assert_eq!(debounce.poll(t0 + ms(200)), Some("D"));
        assert_eq!(debounce.next_deadline(), Some(t0 + ms(250)));
    }

    #[test]
    fn test_unpolled_value_inside_rearmed_window() {
        let t0 = Instant::now();
        let mut debounce = DebounceLeading::new(ms(50));

        debounce.push("A", t0);
        debounce.push("B", t0 + ms(10));
        // still inside the window B re-armed at 60
        assert_eq!(debounce.push("C", t0 + ms(80)), Some("B"));
        assert_eq!(debounce.poll(t0 + ms(129)), None);
        assert_eq!(debounce.poll(t0 + ms(130)), Some("C"));
    }

    #[test]
    fn test_flush() {
        let t0 = Instant::now();
        let mut debounce = DebounceLeading::new(ms(50));
        debounce.push(1, t0);
        debounce.push(2, t0 + ms(5));
        assert_eq!(debounce.flush(), Some(2));
        assert_eq!(debounce.flush(), None);
        assert_eq!(debounce.next_deadline(), None);

        // flushing closes the window
        assert_eq!(debounce.push(3, t0 + ms(6)), Some(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_async_debounce_leading() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut out = debounce_leading(rx, ms(50));
        let start = tokio::time::Instant::now();

        tx.send("A").unwrap();
        assert_eq!(out.recv().await, Some("A"));
        assert_eq!(start.elapsed(), Duration::ZERO);

        tokio::time::sleep(ms(10)).await;
        tx.send("B").unwrap();
        tokio::time::sleep(ms(10)).await;
        tx.send("C").unwrap();

        assert_eq!(out.recv().await, Some("C"));
        assert_eq!(start.elapsed(), ms(70));

        drop(tx);
        assert_eq!(out.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_async_flushes_on_close() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut out = debounce_leading(rx, ms(50));

        tx.send(1).unwrap();
        tx.send(2).unwrap();
        drop(tx);

        assert_eq!(out.recv().await, Some(1));
        assert_eq!(out.recv().await, Some(2));
        assert_eq!(out.recv().await, None);
    }
}
