use crate::cmd::{
    BufferBarrier, BufferCopyRegion, BufferImageCopyRegion, ClearAttachment, ClearDepthStencilValue,
    ClearRect, CommandBuffer, Filter, ImageBarrier, ImageBlitRegion, ImageCopyRegion, RenderingInfo,
    SubresourceRange,
};
use crate::sync::state::ImageLayout;
use crate::types::{Buffer, Handle, Image, IndexType, Pipeline, QueryPool};

/// One recorded command, mirroring a [`CommandBuffer`] method call with owned
/// arguments. Traces are comparable with `==`, which is what makes command
/// emission testable without a device.
#[derive(Debug, Clone, PartialEq)]
pub enum TraceCmd {
    BeginRendering(RenderingInfo),
    EndRendering,
    BindGraphicsPipeline(Handle<Pipeline>),
    BindComputePipeline(Handle<Pipeline>),
    BindVertexBuffer { buffer: Handle<Buffer>, offset: u64 },
    BindIndexBuffer { buffer: Handle<Buffer>, offset: u64, index_type: IndexType },
    Draw { vertex_count: u32, instance_count: u32, first_vertex: u32, first_instance: u32 },
    DrawIndexed {
        index_count: u32,
        instance_count: u32,
        first_index: u32,
        vertex_offset: i32,
        first_instance: u32,
    },
    DrawIndirect { buffer: Handle<Buffer>, offset: u64, draw_count: u32, stride: u32 },
    DrawIndexedIndirect { buffer: Handle<Buffer>, offset: u64, draw_count: u32, stride: u32 },
    Dispatch { x: u32, y: u32, z: u32 },
    DispatchIndirect { buffer: Handle<Buffer>, offset: u64 },
    CopyBuffer { src: Handle<Buffer>, dst: Handle<Buffer>, regions: Vec<BufferCopyRegion> },
    CopyImage { src: Handle<Image>, dst: Handle<Image>, regions: Vec<ImageCopyRegion> },
    CopyBufferToImage { src: Handle<Buffer>, dst: Handle<Image>, regions: Vec<BufferImageCopyRegion> },
    CopyImageToBuffer { src: Handle<Image>, dst: Handle<Buffer>, regions: Vec<BufferImageCopyRegion> },
    BlitImage {
        src: Handle<Image>,
        src_layout: ImageLayout,
        dst: Handle<Image>,
        dst_layout: ImageLayout,
        regions: Vec<ImageBlitRegion>,
        filter: Filter,
    },
    ClearAttachments { attachments: Vec<ClearAttachment>, rects: Vec<ClearRect> },
    ClearColorImage {
        image: Handle<Image>,
        layout: ImageLayout,
        color: [f32; 4],
        ranges: Vec<SubresourceRange>,
    },
    ClearDepthStencilImage {
        image: Handle<Image>,
        layout: ImageLayout,
        value: ClearDepthStencilValue,
        ranges: Vec<SubresourceRange>,
    },
    FillBuffer { buffer: Handle<Buffer>, offset: u64, size: u64, data: u32 },
    UpdateBuffer { buffer: Handle<Buffer>, offset: u64, data: Vec<u8> },
    BeginQuery { pool: Handle<QueryPool>, query: u32 },
    EndQuery { pool: Handle<QueryPool>, query: u32 },
    ResetQueryPool { pool: Handle<QueryPool>, first_query: u32, query_count: u32 },
    PipelineBarrier { buffers: Vec<BufferBarrier>, images: Vec<ImageBarrier> },
}

/// Recording [`CommandBuffer`] implementation.
///
/// Appends one [`TraceCmd`] per call. Used by the test suite to assert exact
/// command sequences, and usable alongside the real backend in the same
/// binary to capture traces from production graphs.
#[derive(Default)]
pub struct CommandRecorder {
    trace: Vec<TraceCmd>,
}

impl CommandRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trace(&self) -> &[TraceCmd] {
        &self.trace
    }

    pub fn clear(&mut self) {
        self.trace.clear();
    }

    /// Render the trace one line per command, for logs and failure messages.
    pub fn lines(&self) -> Vec<String> {
        self.trace.iter().map(|cmd| format!("{cmd:?}")).collect()
    }
}

impl CommandBuffer for CommandRecorder {
    fn begin_rendering(&mut self, info: &RenderingInfo) {
        self.trace.push(TraceCmd::BeginRendering(info.clone()));
    }

    fn end_rendering(&mut self) {
        self.trace.push(TraceCmd::EndRendering);
    }

    fn bind_graphics_pipeline(&mut self, pipeline: Handle<Pipeline>) {
        self.trace.push(TraceCmd::BindGraphicsPipeline(pipeline));
    }

    fn bind_compute_pipeline(&mut self, pipeline: Handle<Pipeline>) {
        self.trace.push(TraceCmd::BindComputePipeline(pipeline));
    }

    fn bind_vertex_buffer(&mut self, buffer: Handle<Buffer>, offset: u64) {
        self.trace.push(TraceCmd::BindVertexBuffer { buffer, offset });
    }

    fn bind_index_buffer(&mut self, buffer: Handle<Buffer>, offset: u64, index_type: IndexType) {
        self.trace.push(TraceCmd::BindIndexBuffer { buffer, offset, index_type });
    }

    fn draw(&mut self, vertex_count: u32, instance_count: u32, first_vertex: u32, first_instance: u32) {
        self.trace.push(TraceCmd::Draw { vertex_count, instance_count, first_vertex, first_instance });
    }

    fn draw_indexed(
        &mut self,
        index_count: u32,
        instance_count: u32,
        first_index: u32,
        vertex_offset: i32,
        first_instance: u32,
    ) {
        self.trace.push(TraceCmd::DrawIndexed {
            index_count,
            instance_count,
            first_index,
            vertex_offset,
            first_instance,
        });
    }

    fn draw_indirect(&mut self, buffer: Handle<Buffer>, offset: u64, draw_count: u32, stride: u32) {
        self.trace.push(TraceCmd::DrawIndirect { buffer, offset, draw_count, stride });
    }

    fn draw_indexed_indirect(&mut self, buffer: Handle<Buffer>, offset: u64, draw_count: u32, stride: u32) {
        self.trace.push(TraceCmd::DrawIndexedIndirect { buffer, offset, draw_count, stride });
    }

    fn dispatch(&mut self, x: u32, y: u32, z: u32) {
        self.trace.push(TraceCmd::Dispatch { x, y, z });
    }

    fn dispatch_indirect(&mut self, buffer: Handle<Buffer>, offset: u64) {
        self.trace.push(TraceCmd::DispatchIndirect { buffer, offset });
    }

    fn copy_buffer(&mut self, src: Handle<Buffer>, dst: Handle<Buffer>, regions: &[BufferCopyRegion]) {
        self.trace.push(TraceCmd::CopyBuffer { src, dst, regions: regions.to_vec() });
    }

    fn copy_image(&mut self, src: Handle<Image>, dst: Handle<Image>, regions: &[ImageCopyRegion]) {
        self.trace.push(TraceCmd::CopyImage { src, dst, regions: regions.to_vec() });
    }

    fn copy_buffer_to_image(&mut self, src: Handle<Buffer>, dst: Handle<Image>, regions: &[BufferImageCopyRegion]) {
        self.trace.push(TraceCmd::CopyBufferToImage { src, dst, regions: regions.to_vec() });
    }

    fn copy_image_to_buffer(&mut self, src: Handle<Image>, dst: Handle<Buffer>, regions: &[BufferImageCopyRegion]) {
        self.trace.push(TraceCmd::CopyImageToBuffer { src, dst, regions: regions.to_vec() });
    }

    fn blit_image(
        &mut self,
        src: Handle<Image>,
        src_layout: ImageLayout,
        dst: Handle<Image>,
        dst_layout: ImageLayout,
        regions: &[ImageBlitRegion],
        filter: Filter,
    ) {
        self.trace.push(TraceCmd::BlitImage {
            src,
            src_layout,
            dst,
            dst_layout,
            regions: regions.to_vec(),
            filter,
        });
    }

    fn clear_attachments(&mut self, attachments: &[ClearAttachment], rects: &[ClearRect]) {
        self.trace.push(TraceCmd::ClearAttachments {
            attachments: attachments.to_vec(),
            rects: rects.to_vec(),
        });
    }

    fn clear_color_image(
        &mut self,
        image: Handle<Image>,
        layout: ImageLayout,
        color: [f32; 4],
        ranges: &[SubresourceRange],
    ) {
        self.trace.push(TraceCmd::ClearColorImage { image, layout, color, ranges: ranges.to_vec() });
    }

    fn clear_depth_stencil_image(
        &mut self,
        image: Handle<Image>,
        layout: ImageLayout,
        value: ClearDepthStencilValue,
        ranges: &[SubresourceRange],
    ) {
        self.trace.push(TraceCmd::ClearDepthStencilImage {
            image,
            layout,
            value,
            ranges: ranges.to_vec(),
        });
    }

    fn fill_buffer(&mut self, buffer: Handle<Buffer>, offset: u64, size: u64, data: u32) {
        self.trace.push(TraceCmd::FillBuffer { buffer, offset, size, data });
    }

    fn update_buffer(&mut self, buffer: Handle<Buffer>, offset: u64, data: &[u8]) {
        self.trace.push(TraceCmd::UpdateBuffer { buffer, offset, data: data.to_vec() });
    }

    fn begin_query(&mut self, pool: Handle<QueryPool>, query: u32) {
        self.trace.push(TraceCmd::BeginQuery { pool, query });
    }

    fn end_query(&mut self, pool: Handle<QueryPool>, query: u32) {
        self.trace.push(TraceCmd::EndQuery { pool, query });
    }

    fn reset_query_pool(&mut self, pool: Handle<QueryPool>, first_query: u32, query_count: u32) {
        self.trace.push(TraceCmd::ResetQueryPool { pool, first_query, query_count });
    }

    fn pipeline_barrier(&mut self, buffers: &[BufferBarrier], images: &[ImageBarrier]) {
        self.trace.push(TraceCmd::PipelineBarrier {
            buffers: buffers.to_vec(),
            images: images.to_vec(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calls_are_recorded_in_order() {
        let mut recorder = CommandRecorder::new();
        recorder.dispatch(1, 2, 3);
        recorder.fill_buffer(Handle::<Buffer>::new(4, 0), 0, 64, 0xff);
        assert_eq!(
            recorder.trace(),
            &[
                TraceCmd::Dispatch { x: 1, y: 2, z: 3 },
                TraceCmd::FillBuffer { buffer: Handle::new(4, 0), offset: 0, size: 64, data: 0xff },
            ]
        );
        recorder.clear();
        assert!(recorder.trace().is_empty());
    }
}
