//! Cosine easing between two values.

use std::f32::consts::PI;

/// Ease from `start` to `end` along a half cosine wave.
///
/// `progress` is normally in `[0, 1]`; it is not clamped, so values outside that range
/// keep following the cosine curve. Zero velocity at both ends.
///
/// ```
/// use beachside::ease;
///
/// assert_eq!(ease(0.0, 3.0, 7.0), 3.0);
/// assert!((ease(0.5, 3.0, 7.0) - 5.0).abs() < 1e-6);
/// ```
pub fn ease(progress: f32, start: f32, end: f32) -> f32 {
    end + (start - end) * ((PI * progress).cos() + 1.0) / 2.0
}

/// Easing helper handed to animation poses.
///
/// Holds the normalized progress through the current window so the pose can ease any
/// number of channels with [`Ease::between`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ease {
    progress: f32,
}

impl Ease {
    /// Always yields the start value. Used while holding before a window.
    pub const START: Ease = Ease { progress: 0.0 };
    /// Always yields the end value. Used while holding after a window.
    pub const END: Ease = Ease { progress: 1.0 };

    pub fn new(progress: f32) -> Self {
        Self { progress }
    }

    /// Normalized progress through the window.
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Ease between `start` and `end` at this progress.
    pub fn between(&self, start: f32, end: f32) -> f32 {
        // Holds must land exactly on the endpoints; `end + (start - end)` can round.
        if self.progress == 0.0 {
            start
        } else if self.progress == 1.0 {
            end
        } else {
            ease(self.progress, start, end)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_exact() {
        for (s, e) in [(0.0, 10.0), (-3.5, 2.25), (180.0, 90.0), (1e6, -1e6)] {
            assert_eq!(ease(0.0, s, e), s);
            assert_eq!(Ease::START.between(s, e), s);
            assert_eq!(Ease::END.between(s, e), e);
        }
    }

    #[test]
    fn midpoint() {
        assert!((ease(0.5, 0.0, 10.0) - 5.0).abs() < 1e-5);
        assert!((Ease::new(0.5).between(0.0, 10.0) - 5.0).abs() < 1e-5);
    }

    #[test]
    fn end_value_within_tolerance() {
        assert!((ease(1.0, 20.0, -5.0) - -5.0).abs() < 1e-5);
    }

    #[test]
    fn curve_is_symmetric() {
        let a = ease(0.2, 0.0, 1.0);
        let b = ease(0.8, 0.0, 1.0);
        assert!((a + b - 1.0).abs() < 1e-5);
    }

    #[test]
    fn out_of_range_progress_extrapolates_on_cosine() {
        // Past the end the cosine turns back toward the start value.
        let v = ease(1.5, 0.0, 10.0);
        assert!((v - 5.0).abs() < 1e-4);
    }
}
