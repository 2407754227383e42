use std::collections::HashMap;

use crate::sync::state::ResState;
use crate::types::{Buffer, Handle, Image};

/// Registry of each resource's most recent declared access.
///
/// The tracker is mutated during link extraction, so at any point it reflects
/// the state established by the most recently *created* node touching a
/// resource, not the most recently submitted one. Barriers are computed from
/// the previous state returned by the `record_*` methods.
///
/// One tracker is owned by one render graph; it is not internally
/// synchronized (see the crate docs on the single-threaded recording model).
#[derive(Default)]
pub struct ResourceStateTracker {
    buffers: HashMap<Handle<Buffer>, ResState>,
    images: HashMap<Handle<Image>, ResState>,
}

impl ResourceStateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a buffer access, returning the previous state.
    ///
    /// The first access to a buffer returns the default sentinel state.
    pub fn record_buffer(&mut self, buffer: Handle<Buffer>, next: ResState) -> ResState {
        self.buffers.insert(buffer, next).unwrap_or_default()
    }

    /// Record an image access, returning the previous state.
    ///
    /// The first access to an image returns the default sentinel state, whose
    /// undefined layout makes the first real use a layout transition.
    pub fn record_image(&mut self, image: Handle<Image>, next: ResState) -> ResState {
        self.images.insert(image, next).unwrap_or_default()
    }

    /// Non-mutating query used for diagnostics.
    pub fn buffer_state(&self, buffer: Handle<Buffer>) -> Option<ResState> {
        self.buffers.get(&buffer).copied()
    }

    /// Non-mutating query used for diagnostics.
    pub fn image_state(&self, image: Handle<Image>) -> Option<ResState> {
        self.images.get(&image).copied()
    }

    /// Forget all access history. Called when the owning graph is reset for
    /// reuse; entries are never removed individually.
    pub fn reset(&mut self) {
        self.buffers.clear();
        self.images.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::state::{Access, ImageLayout, Stage};

    #[test]
    fn first_access_returns_sentinel() {
        let mut tracker = ResourceStateTracker::new();
        let buf = Handle::<Buffer>::new(1, 0);
        let prev = tracker.record_buffer(buf, ResState::new(Stage::TRANSFER, Access::TRANSFER_WRITE));
        assert_eq!(prev, ResState::default());
    }

    #[test]
    fn last_writer_wins() {
        let mut tracker = ResourceStateTracker::new();
        let buf = Handle::<Buffer>::new(1, 0);
        let first = ResState::new(Stage::TRANSFER, Access::TRANSFER_WRITE);
        let second = ResState::new(Stage::COMPUTE_SHADER, Access::SHADER_READ);
        tracker.record_buffer(buf, first);
        let prev = tracker.record_buffer(buf, second);
        assert_eq!(prev, first);
        assert_eq!(tracker.buffer_state(buf), Some(second));
    }

    #[test]
    fn image_state_keeps_layout() {
        let mut tracker = ResourceStateTracker::new();
        let img = Handle::<Image>::new(3, 0);
        let state = ResState::with_layout(
            Stage::TRANSFER,
            Access::TRANSFER_WRITE,
            ImageLayout::TRANSFER_DST_OPTIMAL,
        );
        tracker.record_image(img, state);
        assert_eq!(tracker.image_state(img), Some(state));
    }

    #[test]
    fn reset_forgets_history() {
        let mut tracker = ResourceStateTracker::new();
        let buf = Handle::<Buffer>::new(1, 0);
        tracker.record_buffer(buf, ResState::new(Stage::TRANSFER, Access::TRANSFER_WRITE));
        tracker.reset();
        assert_eq!(tracker.buffer_state(buf), None);
        let prev = tracker.record_buffer(buf, ResState::new(Stage::TRANSFER, Access::TRANSFER_READ));
        assert_eq!(prev, ResState::default());
    }
}
