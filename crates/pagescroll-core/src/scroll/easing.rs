//! Pure easing functions for page transitions
//!
//! An easing function maps the elapsed fraction of an animation's duration
//! ([0, 1]) to the fraction of the distance covered ([0, 1]).

use std::fmt;
use std::rc::Rc;

pub use crate::config::EasingKind;

impl EasingKind {
    /// Every built-in curve, in declaration order
    pub const ALL: [EasingKind; 13] = [
        EasingKind::Linear,
        EasingKind::InQuad,
        EasingKind::OutQuad,
        EasingKind::InOutQuad,
        EasingKind::InCubic,
        EasingKind::OutCubic,
        EasingKind::InOutCubic,
        EasingKind::InQuart,
        EasingKind::OutQuart,
        EasingKind::InOutQuart,
        EasingKind::InQuint,
        EasingKind::OutQuint,
        EasingKind::InOutQuint,
    ];

    /// Apply the easing curve to a progress value
    ///
    /// # Arguments
    /// * `t` - Progress value in range [0, 1]
    ///
    /// # Returns
    /// Eased value in range [0, 1]
    #[inline]
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            EasingKind::Linear => t,
            EasingKind::InQuad => t * t,
            EasingKind::OutQuad => t * (2.0 - t),
            EasingKind::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            EasingKind::InCubic => t * t * t,
            EasingKind::OutCubic => {
                let u = t - 1.0;
                u * u * u + 1.0
            }
            EasingKind::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    (t - 1.0) * (2.0 * t - 2.0) * (2.0 * t - 2.0) + 1.0
                }
            }
            EasingKind::InQuart => t * t * t * t,
            EasingKind::OutQuart => {
                let u = t - 1.0;
                1.0 - u * u * u * u
            }
            EasingKind::InOutQuart => {
                if t < 0.5 {
                    8.0 * t * t * t * t
                } else {
                    let u = t - 1.0;
                    1.0 - 8.0 * u * u * u * u
                }
            }
            EasingKind::InQuint => t * t * t * t * t,
            EasingKind::OutQuint => {
                let u = t - 1.0;
                1.0 + u * u * u * u * u
            }
            EasingKind::InOutQuint => {
                if t < 0.5 {
                    16.0 * t * t * t * t * t
                } else {
                    let u = t - 1.0;
                    1.0 + 16.0 * u * u * u * u * u
                }
            }
        }
    }
}

/// An easing curve: one of the built-ins or a caller supplied function.
#[derive(Clone)]
pub enum Easing {
    Builtin(EasingKind),
    Custom(Rc<dyn Fn(f64) -> f64>),
}

impl Easing {
    pub fn custom(f: impl Fn(f64) -> f64 + 'static) -> Self {
        Easing::Custom(Rc::new(f))
    }

    #[inline]
    pub fn apply(&self, t: f64) -> f64 {
        match self {
            Easing::Builtin(kind) => kind.apply(t),
            Easing::Custom(f) => f(t),
        }
    }
}

impl From<EasingKind> for Easing {
    fn from(kind: EasingKind) -> Self {
        Easing::Builtin(kind)
    }
}

impl fmt::Debug for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Easing::Builtin(kind) => f.debug_tuple("Builtin").field(kind).finish(),
            Easing::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_easing_boundaries() {
        for easing in EasingKind::ALL {
            assert!((easing.apply(0.0) - 0.0).abs() < 1e-9, "{:?} at t=0", easing);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-9, "{:?} at t=1", easing);
        }
    }

    #[test]
    fn test_quad_exact_values() {
        assert_eq!(EasingKind::InOutQuad.apply(0.5), 0.5);
        assert_eq!(EasingKind::InQuad.apply(0.0), 0.0);
        assert_eq!(EasingKind::InQuad.apply(1.0), 1.0);
        assert_eq!(EasingKind::InQuad.apply(0.5), 0.25);
        assert_eq!(EasingKind::OutQuad.apply(0.5), 0.75);
    }

    #[test]
    fn test_polynomial_forms() {
        let t = 0.25;
        assert!((EasingKind::InCubic.apply(t) - 0.015625).abs() < 1e-12);
        assert!((EasingKind::OutCubic.apply(t) - (1.0 - 0.75f64.powi(3))).abs() < 1e-12);
        assert!((EasingKind::InOutCubic.apply(t) - 4.0 * t.powi(3)).abs() < 1e-12);
        assert!((EasingKind::InOutQuart.apply(0.75) - (1.0 - 8.0 * 0.25f64.powi(4))).abs() < 1e-12);
        assert!((EasingKind::InOutQuint.apply(0.75) - (1.0 - 16.0 * 0.25f64.powi(5))).abs() < 1e-12);
        assert!((EasingKind::OutQuint.apply(0.5) - (1.0 - 0.5f64.powi(5))).abs() < 1e-12);
    }

    #[test]
    fn test_easing_monotonic() {
        for easing in EasingKind::ALL {
            let mut prev = 0.0;
            for i in 0..=20 {
                let t = i as f64 / 20.0;
                let v = easing.apply(t);
                assert!(v >= prev - 1e-12, "{:?} not monotonic at t={}", easing, t);
                prev = v;
            }
        }
    }

    #[test]
    fn test_in_out_symmetry() {
        for easing in [EasingKind::InOutQuad, EasingKind::InOutCubic, EasingKind::InOutQuart, EasingKind::InOutQuint] {
            for i in 0..=10 {
                let t = i as f64 / 10.0;
                let sum = easing.apply(t) + easing.apply(1.0 - t);
                assert!((sum - 1.0).abs() < 1e-9, "{:?} not symmetric at t={}", easing, t);
            }
        }
    }

    #[test]
    fn test_custom_easing() {
        let easing = Easing::custom(|t| t.sqrt());
        assert!((easing.apply(0.25) - 0.5).abs() < 1e-12);
        assert_eq!(format!("{:?}", easing), "Custom(..)");
    }
}
