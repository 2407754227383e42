use smallvec::SmallVec;

use crate::cmd::{BufferBarrier, CommandBuffer, ImageBarrier, SubresourceRange};
use crate::sync::state::ResState;
use crate::types::{Buffer, Handle, Image};

/// Collects the barriers a single node needs and flushes them as one
/// `pipeline_barrier` call before that node's commands are emitted.
#[derive(Default)]
pub struct BarrierBatch {
    buffers: SmallVec<[BufferBarrier; 4]>,
    images: SmallVec<[ImageBarrier; 4]>,
}

impl BarrierBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty() && self.images.is_empty()
    }

    pub fn buffer(&mut self, buffer: Handle<Buffer>, src: ResState, dst: ResState) {
        self.buffers.push(BufferBarrier { buffer, src, dst });
    }

    pub fn image(&mut self, image: Handle<Image>, src: ResState, dst: ResState, range: SubresourceRange) {
        self.images.push(ImageBarrier { image, src, dst, range });
    }

    pub fn flush(&mut self, cmd: &mut dyn CommandBuffer) {
        if self.is_empty() {
            return;
        }
        cmd.pipeline_barrier(&self.buffers, &self.images);
        self.buffers.clear();
        self.images.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::recorder::{CommandRecorder, TraceCmd};
    use crate::cmd::ImageAspect;
    use crate::sync::state::{Access, Stage};

    #[test]
    fn identical_states_are_kept() {
        // Write-after-write hazards have equal src and dst states; filtering
        // is the link's job, not the batch's.
        let mut batch = BarrierBatch::new();
        let state = ResState::new(Stage::TRANSFER, Access::TRANSFER_WRITE);
        batch.buffer(Handle::<Buffer>::new(1, 0), state, state);
        assert!(!batch.is_empty());
    }

    #[test]
    fn flush_emits_one_barrier_command() {
        let mut batch = BarrierBatch::new();
        let src = ResState::new(Stage::TRANSFER, Access::TRANSFER_WRITE);
        let dst = ResState::new(Stage::COMPUTE_SHADER, Access::SHADER_READ);
        batch.buffer(Handle::<Buffer>::new(1, 0), src, dst);
        batch.image(
            Handle::<Image>::new(2, 0),
            src,
            dst,
            SubresourceRange::full(ImageAspect::COLOR),
        );

        let mut recorder = CommandRecorder::new();
        batch.flush(&mut recorder);
        batch.flush(&mut recorder);

        assert_eq!(recorder.trace().len(), 1);
        match &recorder.trace()[0] {
            TraceCmd::PipelineBarrier { buffers, images } => {
                assert_eq!(buffers.len(), 1);
                assert_eq!(images.len(), 1);
            }
            other => panic!("unexpected trace entry: {other:?}"),
        }
    }
}
