//! Time-windowed keyframe animation.
//!
//! A [`Timeline`] is an ordered list of [`AnimationWindow`]s, each pairing a time
//! interval with a pose callback. Evaluating the timeline at a time decides, per window,
//! whether it is active, holding its first pose before it starts, or holding its last pose
//! after it ends, and calls the pose with the local time and an [`Ease`] helper.
//!
//! Timelines are generic over the context the poses mutate: the camera track poses a
//! camera rig, limb timelines pose a [`Painter`](crate::Painter).
//!
//! # Example
//!
//! ```
//! use beachside::{Timeline, TimelineError};
//!
//! # fn main() -> Result<(), TimelineError> {
//! let elbow = Timeline::<f32>::builder()
//!     .show_before(true)
//!     .window(0.0, 2.0, |angle, _, ease| *angle = ease.between(80.0, 100.0))
//!     .window(2.0, 3.0, |angle, _, ease| *angle = ease.between(100.0, 70.0))
//!     .build()?;
//!
//! let mut angle = 0.0;
//! elbow.evaluate(10.0, &mut angle);
//! assert_eq!(angle, 70.0);
//! # Ok(())
//! # }
//! ```
//!
//! # Hold rules
//!
//! For window `i` at time `t`:
//!
//! - **before**: `i == 0`, `show_before`, and `t < start`. Local time is 0 and the ease
//!   helper returns start values.
//! - **during**: `start <= t <= end`. Local time is `t - start` and progress is
//!   `(t - start) / (end - start)`.
//! - **after**: `t > end` and either this is the last window with `show_after`, or there is
//!   more than one window and `t` has not reached the next window's start. Local time is
//!   the full duration and the ease helper returns end values.
//!
//! The second "after" case holds a finished pose through the gap until the next window
//! takes over.

use std::fmt;

use thiserror::Error;

use crate::easing::Ease;

/// Pose callback: context, local time, easing helper.
pub type Pose<C> = Box<dyn Fn(&mut C, f32, Ease)>;

/// Reasons a window list is rejected.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum TimelineError {
    #[error("window {index} has a non-finite bound")]
    NonFinite { index: usize },

    #[error("window {index} is empty or reversed ({start}..{end})")]
    EmptyWindow { index: usize, start: f32, end: f32 },

    #[error("window {index} starts at {start} before the previous window ends at {previous_end}")]
    Overlap {
        index: usize,
        start: f32,
        previous_end: f32,
    },
}

/// One phase of a timeline.
pub struct AnimationWindow<C> {
    start: f32,
    end: f32,
    pose: Pose<C>,
}

impl<C> AnimationWindow<C> {
    pub fn new(start: f32, end: f32, pose: impl Fn(&mut C, f32, Ease) + 'static) -> Self {
        Self {
            start,
            end,
            pose: Box::new(pose),
        }
    }

    pub fn start(&self) -> f32 {
        self.start
    }

    pub fn end(&self) -> f32 {
        self.end
    }

    pub fn duration(&self) -> f32 {
        self.end - self.start
    }
}

impl<C> fmt::Debug for AnimationWindow<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationWindow")
            .field("start", &self.start)
            .field("end", &self.end)
            .finish_non_exhaustive()
    }
}

/// Whether the first and last poses are held outside their windows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimelineOptions {
    /// Hold the first window's start pose before it begins.
    pub show_before: bool,
    /// Hold the last window's end pose after it ends.
    pub show_after: bool,
}

impl Default for TimelineOptions {
    fn default() -> Self {
        Self {
            show_before: false,
            show_after: true,
        }
    }
}

/// How a window matched the evaluation time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Before,
    During,
    After,
}

/// A window that fires at a given time, with the arguments its pose receives.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub window: usize,
    pub phase: Phase,
    pub local_time: f32,
    pub ease: Ease,
}

/// An ordered, validated list of animation windows.
pub struct Timeline<C> {
    windows: Vec<AnimationWindow<C>>,
    options: TimelineOptions,
}

impl<C> fmt::Debug for Timeline<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timeline")
            .field("windows", &self.windows)
            .field("options", &self.options)
            .finish()
    }
}

impl<C> Timeline<C> {
    /// Build a timeline, rejecting windows that are non-finite, empty, unordered or
    /// overlapping. Windows may touch (`end == next.start`).
    pub fn new(
        windows: Vec<AnimationWindow<C>>,
        options: TimelineOptions,
    ) -> Result<Self, TimelineError> {
        let mut previous_end = f32::NEG_INFINITY;
        for (index, window) in windows.iter().enumerate() {
            if !window.start.is_finite() || !window.end.is_finite() {
                return Err(TimelineError::NonFinite { index });
            }
            if window.end <= window.start {
                return Err(TimelineError::EmptyWindow {
                    index,
                    start: window.start,
                    end: window.end,
                });
            }
            if window.start < previous_end {
                return Err(TimelineError::Overlap {
                    index,
                    start: window.start,
                    previous_end,
                });
            }
            previous_end = window.end;
        }

        Ok(Self { windows, options })
    }

    /// Start a declarative timeline.
    pub fn builder() -> TimelineBuilder<C> {
        TimelineBuilder::default()
    }

    /// A single window running from `start` for `duration`, with no holds.
    ///
    /// The pose only receives local time.
    pub fn once(
        start: f32,
        duration: f32,
        pose: impl Fn(&mut C, f32) + 'static,
    ) -> Result<Self, TimelineError>
    where
        C: 'static,
    {
        Self::new(
            vec![AnimationWindow::new(
                start,
                start + duration,
                move |ctx, local_time, _| pose(ctx, local_time),
            )],
            TimelineOptions {
                show_before: false,
                show_after: false,
            },
        )
    }

    pub fn windows(&self) -> &[AnimationWindow<C>] {
        &self.windows
    }

    pub fn options(&self) -> TimelineOptions {
        self.options
    }

    /// Windows that fire at `time`, in window order.
    pub fn sample(&self, time: f32) -> impl Iterator<Item = Sample> + '_ {
        (0..self.windows.len()).filter_map(move |index| self.sample_window(index, time))
    }

    /// Run every pose that fires at `time` against `ctx`. Returns how many fired.
    pub fn evaluate(&self, time: f32, ctx: &mut C) -> usize {
        let mut fired = 0;
        for sample in self.sample(time) {
            (self.windows[sample.window].pose)(ctx, sample.local_time, sample.ease);
            fired += 1;
        }
        fired
    }

    fn sample_window(&self, index: usize, time: f32) -> Option<Sample> {
        let window = &self.windows[index];
        let is_last = index + 1 == self.windows.len();

        let before = index == 0 && self.options.show_before && time < window.start;
        let during = time >= window.start && time <= window.end;
        let holds_through_gap = self.windows.len() > 1
            && self
                .windows
                .get(index + 1)
                .is_some_and(|next| time < next.start);
        let after = ((is_last && self.options.show_after) || holds_through_gap) && time > window.end;

        let (phase, local_time, ease) = if before {
            (Phase::Before, 0.0, Ease::START)
        } else if during {
            let local_time = time - window.start;
            (
                Phase::During,
                local_time,
                Ease::new(local_time / window.duration()),
            )
        } else if after {
            (Phase::After, window.duration(), Ease::END)
        } else {
            return None;
        };

        Some(Sample {
            window: index,
            phase,
            local_time,
            ease,
        })
    }
}

/// Declarative builder for [`Timeline`].
pub struct TimelineBuilder<C> {
    windows: Vec<AnimationWindow<C>>,
    options: TimelineOptions,
}

impl<C> Default for TimelineBuilder<C> {
    fn default() -> Self {
        Self {
            windows: Vec::new(),
            options: TimelineOptions::default(),
        }
    }
}

impl<C> TimelineBuilder<C> {
    pub fn show_before(mut self, show: bool) -> Self {
        self.options.show_before = show;
        self
    }

    pub fn show_after(mut self, show: bool) -> Self {
        self.options.show_after = show;
        self
    }

    /// Append a window. Windows must be added in time order.
    pub fn window(
        mut self,
        start: f32,
        end: f32,
        pose: impl Fn(&mut C, f32, Ease) + 'static,
    ) -> Self {
        self.windows.push(AnimationWindow::new(start, end, pose));
        self
    }

    pub fn build(self) -> Result<Timeline<C>, TimelineError> {
        Timeline::new(self.windows, self.options)
    }
}
