use std::time::Duration;

/// Identifies one requested frame. Only the most recently requested handle is live.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

impl FrameHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

/// The host's "draw me another frame" primitive.
///
/// When a requested frame comes due the host hands its handle back to
/// [`Engine::on_frame`](super::Engine::on_frame).
pub trait FrameScheduler {
    /// Asks for one more frame, optionally no sooner than `delay` from now.
    fn request_frame(&mut self, delay: Option<Duration>) -> FrameHandle;

    fn cancel(&mut self, handle: FrameHandle);
}

/// Cooperative rate limiter: a frame arriving before `interval` has passed since the
/// last accepted one is skipped rather than slept on.
#[derive(Clone, Debug)]
pub struct FramePacer {
    interval: f64,
    last_accepted: Option<f64>,
}

impl FramePacer {
    const TOLERANCE_SECS: f64 = 0.001;

    pub fn new(target_fps: f32) -> Self {
        let interval = if target_fps > 0.0 {
            1.0 / f64::from(target_fps)
        } else {
            0.0
        };

        Self {
            interval,
            last_accepted: None,
        }
    }

    /// Returns whether a frame at `now` (seconds) should run, and records it if so.
    pub fn ready(&mut self, now: f64) -> bool {
        match self.last_accepted {
            Some(last) if now - last + Self::TOLERANCE_SECS < self.interval => false,
            _ => {
                self.last_accepted = Some(now);
                true
            }
        }
    }

    /// Time left until the next frame would be accepted.
    pub fn remaining(&self, now: f64) -> Duration {
        let Some(last) = self.last_accepted else {
            return Duration::ZERO;
        };
        Duration::from_secs_f64((self.interval - (now - last)).max(0.0))
    }

    pub fn reset(&mut self) {
        self.last_accepted = None;
    }
}
