//! Animation strategies and the per-frame step
//!
//! Two strategies exist and they are mutually exclusive: an easing curve
//! over a fixed duration, or a step function turning the time between two
//! frames into a pixel distance. An animation with neither is an
//! instantaneous jump.

use std::fmt;
use std::rc::Rc;
use std::time::{Duration, Instant};

use super::easing::Easing;
use super::timing::{lerp, progress};
use crate::config::AnimationConfig;

/// Maps the time elapsed since the previous frame to a pixel step
pub type StepFn = Rc<dyn Fn(Duration) -> f64>;

/// How a navigation move reaches its target
#[derive(Clone, Default)]
pub struct Animation {
    pub duration: Duration,
    pub easing: Option<Easing>,
    pub step: Option<StepFn>,
}

impl Animation {
    /// Jump straight to the target
    pub fn none() -> Self {
        Self::default()
    }

    pub fn eased(duration: Duration, easing: impl Into<Easing>) -> Self {
        Self {
            duration,
            easing: Some(easing.into()),
            step: None,
        }
    }

    pub fn stepped(step: impl Fn(Duration) -> f64 + 'static) -> Self {
        Self {
            duration: Duration::ZERO,
            easing: None,
            step: Some(Rc::new(step)),
        }
    }

    /// True when no frame loop is needed
    pub fn is_instant(&self) -> bool {
        let eased = !self.duration.is_zero() && self.easing.is_some();
        !(eased || self.step.is_some())
    }
}

impl From<&AnimationConfig> for Animation {
    fn from(config: &AnimationConfig) -> Self {
        Self {
            duration: Duration::from_millis(config.duration_ms),
            easing: config.easing.map(Easing::from),
            step: None,
        }
    }
}

impl fmt::Debug for Animation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animation")
            .field("duration", &self.duration)
            .field("easing", &self.easing)
            .field("step", &self.step.as_ref().map(|_| ".."))
            .finish()
    }
}

#[derive(Clone)]
enum Motion {
    Eased { duration: Duration, easing: Easing },
    Stepped { step: StepFn },
}

/// Outcome of one animation frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum FrameStep {
    /// Write this offset and request another frame
    Continue(f64),
    /// Snap to the target, the move is over
    Finish(f64),
}

/// One move in flight
pub(crate) struct Transition {
    from: f64,
    to: f64,
    motion: Motion,
    started: Option<Instant>,
    prev: Option<Instant>,
    last_written: Option<f64>,
}

impl Transition {
    /// `None` when the animation is instantaneous
    pub(crate) fn new(from: f64, to: f64, animation: &Animation) -> Option<Self> {
        let motion = match (&animation.easing, &animation.step) {
            (Some(easing), _) if !animation.duration.is_zero() => Motion::Eased {
                duration: animation.duration,
                easing: easing.clone(),
            },
            (_, Some(step)) => Motion::Stepped { step: Rc::clone(step) },
            _ => return None,
        };

        Some(Self {
            from,
            to,
            motion,
            started: None,
            prev: None,
            last_written: None,
        })
    }

    pub(crate) fn target(&self) -> f64 {
        self.to
    }

    /// Compute the offset for the frame at `timestamp`. `current` is the
    /// offset the host reports right now.
    pub(crate) fn advance(&mut self, timestamp: Instant, current: f64) -> FrameStep {
        let started = *self.started.get_or_insert(timestamp);

        let step = match &self.motion {
            Motion::Eased { duration, easing } => {
                let elapsed = timestamp.saturating_duration_since(started);
                if elapsed >= *duration {
                    FrameStep::Finish(self.to)
                } else {
                    let fraction = easing.apply(progress(elapsed, *duration));
                    FrameStep::Continue(lerp(self.from, self.to, fraction))
                }
            }
            Motion::Stepped { step } => {
                // the host did not take the last offset (clamped), stop here
                if self
                    .last_written
                    .is_some_and(|written| (written - current).abs() >= 1.0)
                {
                    return FrameStep::Finish(self.to);
                }

                let direction = (self.to - self.from).signum();
                let px = match self.prev {
                    None => {
                        self.prev = Some(timestamp);
                        0.0
                    }
                    Some(prev) => {
                        let px = step(timestamp.saturating_duration_since(prev)).round().max(0.0);
                        if px > 0.0 {
                            self.prev = Some(timestamp);
                        }
                        px
                    }
                };

                let next = current + direction * px;
                let before_target = if direction > 0.0 { next < self.to } else { next > self.to };
                if before_target {
                    FrameStep::Continue(next)
                } else {
                    FrameStep::Finish(self.to)
                }
            }
        };

        if let FrameStep::Continue(y) = step {
            self.last_written = Some(y);
        }
        step
    }
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let strategy = match self.motion {
            Motion::Eased { .. } => "eased",
            Motion::Stepped { .. } => "stepped",
        };
        f.debug_struct("Transition")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("strategy", &strategy)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EasingKind;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_instant_animations() {
        assert!(Animation::none().is_instant());
        assert!(Animation::eased(Duration::ZERO, EasingKind::Linear).is_instant());
        assert!(!Animation::eased(ms(100), EasingKind::Linear).is_instant());
        assert!(!Animation::stepped(|_| 10.0).is_instant());
        assert!(Transition::new(0.0, 100.0, &Animation::none()).is_none());
    }

    #[test]
    fn test_from_config() {
        let animation = Animation::from(&AnimationConfig::default());
        assert_eq!(animation.duration, ms(1000));
        assert!(!animation.is_instant());

        let config = AnimationConfig {
            duration_ms: 300,
            easing: None,
        };
        assert!(Animation::from(&config).is_instant());
    }

    #[test]
    fn test_eased_transition() {
        let t0 = Instant::now();
        let animation = Animation::eased(ms(100), EasingKind::Linear);
        let mut transition = Transition::new(0.0, 200.0, &animation).unwrap();

        assert_eq!(transition.advance(t0, 0.0), FrameStep::Continue(0.0));
        assert_eq!(transition.advance(t0 + ms(50), 0.0), FrameStep::Continue(100.0));
        assert_eq!(transition.advance(t0 + ms(100), 100.0), FrameStep::Finish(200.0));
    }

    #[test]
    fn test_eased_snaps_custom_curve_to_target() {
        let t0 = Instant::now();
        // never reaches 1.0 on its own
        let animation = Animation::eased(ms(100), Easing::custom(|t| t * 0.5));
        let mut transition = Transition::new(100.0, 0.0, &animation).unwrap();

        assert_eq!(transition.advance(t0, 100.0), FrameStep::Continue(100.0));
        assert_eq!(transition.advance(t0 + ms(150), 80.0), FrameStep::Finish(0.0));
    }

    #[test]
    fn test_stepped_transition_until_overshoot() {
        let t0 = Instant::now();
        let animation = Animation::stepped(|dt| dt.as_millis() as f64 * 2.0);
        let mut transition = Transition::new(0.0, 100.0, &animation).unwrap();

        // first frame only records the timestamp
        assert_eq!(transition.advance(t0, 0.0), FrameStep::Continue(0.0));
        assert_eq!(transition.advance(t0 + ms(16), 0.0), FrameStep::Continue(32.0));
        assert_eq!(transition.advance(t0 + ms(32), 32.0), FrameStep::Continue(64.0));
        assert_eq!(transition.advance(t0 + ms(48), 64.0), FrameStep::Continue(96.0));
        assert_eq!(transition.advance(t0 + ms(64), 96.0), FrameStep::Finish(100.0));
    }

    #[test]
    fn test_stepped_upwards() {
        let t0 = Instant::now();
        let animation = Animation::stepped(|_| 30.0);
        let mut transition = Transition::new(100.0, 40.0, &animation).unwrap();

        assert_eq!(transition.advance(t0, 100.0), FrameStep::Continue(100.0));
        assert_eq!(transition.advance(t0 + ms(10), 100.0), FrameStep::Continue(70.0));
        assert_eq!(transition.advance(t0 + ms(20), 70.0), FrameStep::Finish(40.0));
    }

    #[test]
    fn test_stepped_stops_when_host_clamps() {
        let t0 = Instant::now();
        let animation = Animation::stepped(|_| 50.0);
        let mut transition = Transition::new(0.0, 1000.0, &animation).unwrap();

        assert_eq!(transition.advance(t0, 0.0), FrameStep::Continue(0.0));
        assert_eq!(transition.advance(t0 + ms(10), 0.0), FrameStep::Continue(50.0));
        // host could only scroll to 20
        assert_eq!(transition.advance(t0 + ms(20), 20.0), FrameStep::Finish(1000.0));
    }
}
