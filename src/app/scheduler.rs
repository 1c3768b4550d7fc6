use std::time::Duration;

use eframe::egui::Context;

use crate::network::{FrameHandle, FrameScheduler};

/// Frame scheduling on top of egui's repaint requests.
///
/// egui repaints the whole window on every pass, so a "frame" here is simply the next
/// pass that finds a pending handle.
pub(super) struct EguiScheduler {
    ctx: Context,
    next_id: u64,
    pending: Option<FrameHandle>,
}

impl EguiScheduler {
    pub(super) fn new(ctx: Context) -> Self {
        Self {
            ctx,
            next_id: 0,
            pending: None,
        }
    }

    /// Hands out the pending frame, if any. Called once per egui pass.
    pub(super) fn take_due(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }
}

impl FrameScheduler for EguiScheduler {
    fn request_frame(&mut self, delay: Option<Duration>) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle::new(self.next_id);

        match delay {
            Some(delay) if !delay.is_zero() => self.ctx.request_repaint_after(delay),
            _ => self.ctx.request_repaint(),
        }

        self.pending = Some(handle);
        handle
    }

    fn cancel(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }
}
