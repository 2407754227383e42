use std::fmt;

use ash::vk;
use smallvec::SmallVec;

use crate::cmd::{
    BufferBarrier, BufferCopyRegion, BufferImageCopyRegion, ClearAttachment, ClearDepthStencilValue,
    ClearRect, CommandBuffer, Filter, ImageBarrier, ImageBlitRegion, ImageCopyRegion, LoadOp,
    RenderingInfo, StoreOp, SubresourceLayers, SubresourceRange,
};
use crate::sync::state::ImageLayout;
use crate::types::{Buffer, Handle, Image, IndexType, Pipeline, QueryPool};

/// Resolves opaque handles to raw Vulkan objects.
///
/// Implemented by whatever resource registry owns the actual buffers and
/// images; the graph itself never creates or destroys them.
pub trait ResourceLookup {
    fn buffer_raw(&self, buffer: Handle<Buffer>) -> vk::Buffer;
    fn image_raw(&self, image: Handle<Image>) -> vk::Image;
    fn image_view_raw(&self, image: Handle<Image>) -> vk::ImageView;
    fn pipeline_raw(&self, pipeline: Handle<Pipeline>) -> vk::Pipeline;
    fn query_pool_raw(&self, pool: Handle<QueryPool>) -> vk::QueryPool;
}

#[derive(Debug)]
pub enum RecordError {
    Vulkan(vk::Result),
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordError::Vulkan(res) => write!(f, "vulkan error: {res}"),
        }
    }
}

impl From<vk::Result> for RecordError {
    fn from(res: vk::Result) -> Self {
        RecordError::Vulkan(res)
    }
}

/// Passthrough [`CommandBuffer`] implementation issuing `vkCmd*` calls.
///
/// Requires a device with synchronization2 and dynamic rendering enabled.
/// Command recording itself cannot fail; the begin/finish boundary is the
/// only fallible surface.
pub struct VkCommandBuffer<'a, R: ResourceLookup> {
    device: &'a ash::Device,
    cmd: vk::CommandBuffer,
    lookup: &'a R,
}

impl<'a, R: ResourceLookup> VkCommandBuffer<'a, R> {
    pub fn new(device: &'a ash::Device, cmd: vk::CommandBuffer, lookup: &'a R) -> Self {
        Self { device, cmd, lookup }
    }

    pub fn begin(&self) -> Result<(), RecordError> {
        let info = vk::CommandBufferBeginInfo {
            flags: vk::CommandBufferUsageFlags::ONE_TIME_SUBMIT,
            ..Default::default()
        };
        unsafe { self.device.begin_command_buffer(self.cmd, &info)? };
        Ok(())
    }

    pub fn finish(&self) -> Result<(), RecordError> {
        unsafe { self.device.end_command_buffer(self.cmd)? };
        Ok(())
    }

    pub fn raw(&self) -> vk::CommandBuffer {
        self.cmd
    }
}

fn vk_subresource_range(range: SubresourceRange) -> vk::ImageSubresourceRange {
    vk::ImageSubresourceRange {
        aspect_mask: vk::ImageAspectFlags::from_raw(range.aspect.bits()),
        base_mip_level: range.base_mip,
        level_count: if range.level_count == u32::MAX { vk::REMAINING_MIP_LEVELS } else { range.level_count },
        base_array_layer: range.base_layer,
        layer_count: if range.layer_count == u32::MAX { vk::REMAINING_ARRAY_LAYERS } else { range.layer_count },
    }
}

fn vk_subresource_layers(layers: SubresourceLayers) -> vk::ImageSubresourceLayers {
    vk::ImageSubresourceLayers {
        aspect_mask: vk::ImageAspectFlags::from_raw(layers.aspect.bits()),
        mip_level: layers.mip_level,
        base_array_layer: layers.base_layer,
        layer_count: layers.layer_count,
    }
}

fn vk_offset(offset: crate::cmd::Offset3d) -> vk::Offset3D {
    vk::Offset3D { x: offset.x, y: offset.y, z: offset.z }
}

fn vk_extent(extent: crate::cmd::Extent3d) -> vk::Extent3D {
    vk::Extent3D { width: extent.width, height: extent.height, depth: extent.depth }
}

fn vk_rect(rect: crate::cmd::Rect2d) -> vk::Rect2D {
    vk::Rect2D {
        offset: vk::Offset2D { x: rect.offset.x, y: rect.offset.y },
        extent: vk::Extent2D { width: rect.extent.width, height: rect.extent.height },
    }
}

fn vk_load_op(load: LoadOp) -> vk::AttachmentLoadOp {
    match load {
        LoadOp::Load => vk::AttachmentLoadOp::LOAD,
        LoadOp::Clear => vk::AttachmentLoadOp::CLEAR,
        LoadOp::DontCare => vk::AttachmentLoadOp::DONT_CARE,
    }
}

fn vk_store_op(store: StoreOp) -> vk::AttachmentStoreOp {
    match store {
        StoreOp::Store => vk::AttachmentStoreOp::STORE,
        StoreOp::DontCare => vk::AttachmentStoreOp::DONT_CARE,
    }
}

impl<'a, R: ResourceLookup> CommandBuffer for VkCommandBuffer<'a, R> {
    fn begin_rendering(&mut self, info: &RenderingInfo) {
        let colors: SmallVec<[vk::RenderingAttachmentInfo; 4]> = info
            .colors
            .iter()
            .map(|att| vk::RenderingAttachmentInfo {
                image_view: self.lookup.image_view_raw(att.image),
                image_layout: vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL,
                load_op: vk_load_op(att.load),
                store_op: vk_store_op(att.store),
                clear_value: vk::ClearValue { color: vk::ClearColorValue { float32: att.clear } },
                ..Default::default()
            })
            .collect();

        let depth = info.depth.as_ref().map(|att| vk::RenderingAttachmentInfo {
            image_view: self.lookup.image_view_raw(att.image),
            image_layout: vk::ImageLayout::DEPTH_STENCIL_ATTACHMENT_OPTIMAL,
            load_op: vk_load_op(att.load),
            store_op: vk_store_op(att.store),
            clear_value: vk::ClearValue {
                depth_stencil: vk::ClearDepthStencilValue {
                    depth: att.clear.depth,
                    stencil: att.clear.stencil,
                },
            },
            ..Default::default()
        });

        let mut rendering = vk::RenderingInfo {
            render_area: vk_rect(info.area),
            layer_count: 1,
            color_attachment_count: colors.len() as u32,
            p_color_attachments: colors.as_ptr(),
            ..Default::default()
        };
        if let Some(depth) = depth.as_ref() {
            rendering.p_depth_attachment = depth;
        }
        unsafe { self.device.cmd_begin_rendering(self.cmd, &rendering) };
    }

    fn end_rendering(&mut self) {
        unsafe { self.device.cmd_end_rendering(self.cmd) };
    }

    fn bind_graphics_pipeline(&mut self, pipeline: Handle<Pipeline>) {
        unsafe {
            self.device.cmd_bind_pipeline(
                self.cmd,
                vk::PipelineBindPoint::GRAPHICS,
                self.lookup.pipeline_raw(pipeline),
            )
        };
    }

    fn bind_compute_pipeline(&mut self, pipeline: Handle<Pipeline>) {
        unsafe {
            self.device.cmd_bind_pipeline(
                self.cmd,
                vk::PipelineBindPoint::COMPUTE,
                self.lookup.pipeline_raw(pipeline),
            )
        };
    }

    fn bind_vertex_buffer(&mut self, buffer: Handle<Buffer>, offset: u64) {
        unsafe {
            self.device.cmd_bind_vertex_buffers(
                self.cmd,
                0,
                &[self.lookup.buffer_raw(buffer)],
                &[offset],
            )
        };
    }

    fn bind_index_buffer(&mut self, buffer: Handle<Buffer>, offset: u64, index_type: IndexType) {
        let ty = match index_type {
            IndexType::U16 => vk::IndexType::UINT16,
            IndexType::U32 => vk::IndexType::UINT32,
        };
        unsafe {
            self.device.cmd_bind_index_buffer(self.cmd, self.lookup.buffer_raw(buffer), offset, ty)
        };
    }

    fn draw(&mut self, vertex_count: u32, instance_count: u32, first_vertex: u32, first_instance: u32) {
        unsafe {
            self.device.cmd_draw(self.cmd, vertex_count, instance_count, first_vertex, first_instance)
        };
    }

    fn draw_indexed(
        &mut self,
        index_count: u32,
        instance_count: u32,
        first_index: u32,
        vertex_offset: i32,
        first_instance: u32,
    ) {
        unsafe {
            self.device.cmd_draw_indexed(
                self.cmd,
                index_count,
                instance_count,
                first_index,
                vertex_offset,
                first_instance,
            )
        };
    }

    fn draw_indirect(&mut self, buffer: Handle<Buffer>, offset: u64, draw_count: u32, stride: u32) {
        unsafe {
            self.device.cmd_draw_indirect(
                self.cmd,
                self.lookup.buffer_raw(buffer),
                offset,
                draw_count,
                stride,
            )
        };
    }

    fn draw_indexed_indirect(&mut self, buffer: Handle<Buffer>, offset: u64, draw_count: u32, stride: u32) {
        unsafe {
            self.device.cmd_draw_indexed_indirect(
                self.cmd,
                self.lookup.buffer_raw(buffer),
                offset,
                draw_count,
                stride,
            )
        };
    }

    fn dispatch(&mut self, x: u32, y: u32, z: u32) {
        unsafe { self.device.cmd_dispatch(self.cmd, x, y, z) };
    }

    fn dispatch_indirect(&mut self, buffer: Handle<Buffer>, offset: u64) {
        unsafe {
            self.device.cmd_dispatch_indirect(self.cmd, self.lookup.buffer_raw(buffer), offset)
        };
    }

    fn copy_buffer(&mut self, src: Handle<Buffer>, dst: Handle<Buffer>, regions: &[BufferCopyRegion]) {
        let regions: SmallVec<[vk::BufferCopy; 4]> = regions
            .iter()
            .map(|r| vk::BufferCopy { src_offset: r.src_offset, dst_offset: r.dst_offset, size: r.size })
            .collect();
        unsafe {
            self.device.cmd_copy_buffer(
                self.cmd,
                self.lookup.buffer_raw(src),
                self.lookup.buffer_raw(dst),
                &regions,
            )
        };
    }

    fn copy_image(&mut self, src: Handle<Image>, dst: Handle<Image>, regions: &[ImageCopyRegion]) {
        let regions: SmallVec<[vk::ImageCopy; 4]> = regions
            .iter()
            .map(|r| vk::ImageCopy {
                src_subresource: vk_subresource_layers(r.src_subresource),
                src_offset: vk_offset(r.src_offset),
                dst_subresource: vk_subresource_layers(r.dst_subresource),
                dst_offset: vk_offset(r.dst_offset),
                extent: vk_extent(r.extent),
            })
            .collect();
        unsafe {
            self.device.cmd_copy_image(
                self.cmd,
                self.lookup.image_raw(src),
                vk::ImageLayout::TRANSFER_SRC_OPTIMAL,
                self.lookup.image_raw(dst),
                vk::ImageLayout::TRANSFER_DST_OPTIMAL,
                &regions,
            )
        };
    }

    fn copy_buffer_to_image(&mut self, src: Handle<Buffer>, dst: Handle<Image>, regions: &[BufferImageCopyRegion]) {
        let regions: SmallVec<[vk::BufferImageCopy; 4]> =
            regions.iter().map(vk_buffer_image_copy).collect();
        unsafe {
            self.device.cmd_copy_buffer_to_image(
                self.cmd,
                self.lookup.buffer_raw(src),
                self.lookup.image_raw(dst),
                vk::ImageLayout::TRANSFER_DST_OPTIMAL,
                &regions,
            )
        };
    }

    fn copy_image_to_buffer(&mut self, src: Handle<Image>, dst: Handle<Buffer>, regions: &[BufferImageCopyRegion]) {
        let regions: SmallVec<[vk::BufferImageCopy; 4]> =
            regions.iter().map(vk_buffer_image_copy).collect();
        unsafe {
            self.device.cmd_copy_image_to_buffer(
                self.cmd,
                self.lookup.image_raw(src),
                vk::ImageLayout::TRANSFER_SRC_OPTIMAL,
                self.lookup.buffer_raw(dst),
                &regions,
            )
        };
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
        let regions: SmallVec<[vk::ImageBlit; 4]> = regions
            .iter()
            .map(|r| vk::ImageBlit {
                src_subresource: vk_subresource_layers(r.src_subresource),
                src_offsets: [vk_offset(r.src_offsets[0]), vk_offset(r.src_offsets[1])],
                dst_subresource: vk_subresource_layers(r.dst_subresource),
                dst_offsets: [vk_offset(r.dst_offsets[0]), vk_offset(r.dst_offsets[1])],
            })
            .collect();
        let filter = match filter {
            Filter::Nearest => vk::Filter::NEAREST,
            Filter::Linear => vk::Filter::LINEAR,
        };
        unsafe {
            self.device.cmd_blit_image(
                self.cmd,
                self.lookup.image_raw(src),
                src_layout.into(),
                self.lookup.image_raw(dst),
                dst_layout.into(),
                &regions,
                filter,
            )
        };
    }

    fn clear_attachments(&mut self, attachments: &[ClearAttachment], rects: &[ClearRect]) {
        let attachments: SmallVec<[vk::ClearAttachment; 4]> = attachments
            .iter()
            .map(|att| {
                let aspect = vk::ImageAspectFlags::from_raw(att.aspect.bits());
                let clear_value = if aspect.contains(vk::ImageAspectFlags::COLOR) {
                    vk::ClearValue { color: vk::ClearColorValue { float32: att.color } }
                } else {
                    vk::ClearValue {
                        depth_stencil: vk::ClearDepthStencilValue {
                            depth: att.depth_stencil.depth,
                            stencil: att.depth_stencil.stencil,
                        },
                    }
                };
                vk::ClearAttachment {
                    aspect_mask: aspect,
                    color_attachment: att.color_attachment,
                    clear_value,
                }
            })
            .collect();
        let rects: SmallVec<[vk::ClearRect; 4]> = rects
            .iter()
            .map(|r| vk::ClearRect {
                rect: vk_rect(r.rect),
                base_array_layer: r.base_layer,
                layer_count: r.layer_count,
            })
            .collect();
        unsafe { self.device.cmd_clear_attachments(self.cmd, &attachments, &rects) };
    }

    fn clear_color_image(
        &mut self,
        image: Handle<Image>,
        layout: ImageLayout,
        color: [f32; 4],
        ranges: &[SubresourceRange],
    ) {
        let ranges: SmallVec<[vk::ImageSubresourceRange; 4]> =
            ranges.iter().copied().map(vk_subresource_range).collect();
        unsafe {
            self.device.cmd_clear_color_image(
                self.cmd,
                self.lookup.image_raw(image),
                layout.into(),
                &vk::ClearColorValue { float32: color },
                &ranges,
            )
        };
    }

    fn clear_depth_stencil_image(
        &mut self,
        image: Handle<Image>,
        layout: ImageLayout,
        value: ClearDepthStencilValue,
        ranges: &[SubresourceRange],
    ) {
        let ranges: SmallVec<[vk::ImageSubresourceRange; 4]> =
            ranges.iter().copied().map(vk_subresource_range).collect();
        unsafe {
            self.device.cmd_clear_depth_stencil_image(
                self.cmd,
                self.lookup.image_raw(image),
                layout.into(),
                &vk::ClearDepthStencilValue { depth: value.depth, stencil: value.stencil },
                &ranges,
            )
        };
    }

    fn fill_buffer(&mut self, buffer: Handle<Buffer>, offset: u64, size: u64, data: u32) {
        unsafe {
            self.device.cmd_fill_buffer(self.cmd, self.lookup.buffer_raw(buffer), offset, size, data)
        };
    }

    fn update_buffer(&mut self, buffer: Handle<Buffer>, offset: u64, data: &[u8]) {
        unsafe {
            self.device.cmd_update_buffer(self.cmd, self.lookup.buffer_raw(buffer), offset, data)
        };
    }

    fn begin_query(&mut self, pool: Handle<QueryPool>, query: u32) {
        unsafe {
            self.device.cmd_begin_query(
                self.cmd,
                self.lookup.query_pool_raw(pool),
                query,
                vk::QueryControlFlags::empty(),
            )
        };
    }

    fn end_query(&mut self, pool: Handle<QueryPool>, query: u32) {
        unsafe { self.device.cmd_end_query(self.cmd, self.lookup.query_pool_raw(pool), query) };
    }

    fn reset_query_pool(&mut self, pool: Handle<QueryPool>, first_query: u32, query_count: u32) {
        unsafe {
            self.device.cmd_reset_query_pool(
                self.cmd,
                self.lookup.query_pool_raw(pool),
                first_query,
                query_count,
            )
        };
    }

    fn pipeline_barrier(&mut self, buffers: &[BufferBarrier], images: &[ImageBarrier]) {
        let buffers: SmallVec<[vk::BufferMemoryBarrier2; 4]> = buffers
            .iter()
            .map(|bar| vk::BufferMemoryBarrier2 {
                src_stage_mask: bar.src.stages.into(),
                src_access_mask: bar.src.access.into(),
                dst_stage_mask: bar.dst.stages.into(),
                dst_access_mask: bar.dst.access.into(),
                src_queue_family_index: vk::QUEUE_FAMILY_IGNORED,
                dst_queue_family_index: vk::QUEUE_FAMILY_IGNORED,
                buffer: self.lookup.buffer_raw(bar.buffer),
                offset: 0,
                size: vk::WHOLE_SIZE,
                ..Default::default()
            })
            .collect();
        let images: SmallVec<[vk::ImageMemoryBarrier2; 4]> = images
            .iter()
            .map(|bar| vk::ImageMemoryBarrier2 {
                src_stage_mask: bar.src.stages.into(),
                src_access_mask: bar.src.access.into(),
                dst_stage_mask: bar.dst.stages.into(),
                dst_access_mask: bar.dst.access.into(),
                old_layout: bar.src.layout.into(),
                new_layout: bar.dst.layout.into(),
                src_queue_family_index: vk::QUEUE_FAMILY_IGNORED,
                dst_queue_family_index: vk::QUEUE_FAMILY_IGNORED,
                image: self.lookup.image_raw(bar.image),
                subresource_range: vk_subresource_range(bar.range),
                ..Default::default()
            })
            .collect();
        let deps = vk::DependencyInfo {
            buffer_memory_barrier_count: buffers.len() as u32,
            p_buffer_memory_barriers: buffers.as_ptr(),
            image_memory_barrier_count: images.len() as u32,
            p_image_memory_barriers: images.as_ptr(),
            ..Default::default()
        };
        unsafe { self.device.cmd_pipeline_barrier2(self.cmd, &deps) };
    }
}

fn vk_buffer_image_copy(region: &BufferImageCopyRegion) -> vk::BufferImageCopy {
    vk::BufferImageCopy {
        buffer_offset: region.buffer_offset,
        buffer_row_length: region.buffer_row_length,
        buffer_image_height: region.buffer_image_height,
        image_subresource: vk_subresource_layers(region.subresource),
        image_offset: vk_offset(region.offset),
        image_extent: vk_extent(region.extent),
    }
}
