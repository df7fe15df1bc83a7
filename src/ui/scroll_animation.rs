//! Eased scroll offsets for smooth navigation.

use std::time::{Duration, Instant};

/// Default length of a smooth scroll.
pub const SMOOTH_SCROLL_DURATION: Duration = Duration::from_millis(220);

/// Scroll from one offset to another with an ease-out quad curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollAnimation {
    from: f32,
    to: f32,
    start: Instant,
    duration: Duration,
}

impl ScrollAnimation {
    pub fn new(from: f32, to: f32, start: Instant) -> Self {
        Self {
            from,
            to,
            start,
            duration: SMOOTH_SCROLL_DURATION,
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn target(&self) -> f32 {
        self.to
    }

    /// Offset at `now`, and whether the animation has finished.
    pub fn sample(&self, now: Instant) -> (f32, bool) {
        let elapsed = now.saturating_duration_since(self.start).as_secs_f32();
        let total = self.duration.as_secs_f32();
        let progress = if total > 0.0 {
            (elapsed / total).min(1.0)
        } else {
            1.0
        };
        let eased = 1.0 - (1.0 - progress).powi(2);
        (self.from + (self.to - self.from) * eased, progress >= 1.0)
    }
}

/// A scroll request waiting to be applied to a scroll area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PendingScroll {
    Jump(f32),
    Animate(ScrollAnimation),
}

impl PendingScroll {
    pub fn new(from: f32, to: f32, smooth: bool, now: Instant) -> Self {
        if smooth {
            PendingScroll::Animate(ScrollAnimation::new(from, to, now))
        } else {
            PendingScroll::Jump(to)
        }
    }

    /// Offset to apply this frame. `None` in the second slot means done.
    pub fn step(self, now: Instant) -> (f32, Option<Self>) {
        match self {
            PendingScroll::Jump(to) => (to, None),
            PendingScroll::Animate(anim) => {
                let (offset, done) = anim.sample(now);
                (offset, (!done).then_some(self))
            }
        }
    }
}
