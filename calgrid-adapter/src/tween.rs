/// A time-based animation of the horizontal scroll offset.
///
/// The adapter samples it from its frame loop; nothing here reads a clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tween {
    pub from_left: u64,
    pub to_left: u64,
    pub start_ms: u64,
    pub duration_ms: u64,
    pub easing: Easing,
}

impl Tween {
    pub fn new(from_left: u64, to_left: u64, start_ms: u64, duration_ms: u64, easing: Easing) -> Self {
        Self {
            from_left,
            to_left,
            start_ms,
            duration_ms: duration_ms.max(1),
            easing,
        }
    }

    fn progress(&self, now_ms: u64) -> f64 {
        let elapsed = now_ms.saturating_sub(self.start_ms);
        (elapsed as f64 / self.duration_ms as f64).clamp(0.0, 1.0)
    }

    pub fn is_done(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.start_ms) >= self.duration_ms
    }

    /// Offset at `now_ms`. Lands exactly on `to_left` once the tween is done.
    pub fn sample(&self, now_ms: u64) -> u64 {
        if self.is_done(now_ms) {
            return self.to_left;
        }
        let eased = self.easing.apply(self.progress(now_ms));
        let from = self.from_left as f64;
        let to = self.to_left as f64;
        (from + (to - from) * eased).round().max(0.0) as u64
    }

    /// Restarts from the current sample toward `to_left`, keeping the easing.
    pub fn retarget(&mut self, now_ms: u64, to_left: u64, duration_ms: u64) {
        let from_left = self.sample(now_ms);
        *self = Self::new(from_left, to_left, now_ms, duration_ms, self.easing);
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Easing {
    Linear,
    #[default]
    SmoothStep,
    /// Fast start, gentle landing on the target column.
    EaseOutCubic,
}

impl Easing {
    /// Maps linear progress `t` in `[0, 1]` to eased progress.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::SmoothStep => t * t * (3.0 - 2.0 * t),
            Self::EaseOutCubic => {
                let u = 1.0 - t;
                1.0 - u * u * u
            }
        }
    }
}
