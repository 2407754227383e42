//! Command-buffer abstraction consumed by node command emission.
//!
//! Every node type emits into the [`CommandBuffer`] trait rather than a
//! concrete API object, so the same emission code drives the real Vulkan
//! backend ([`vk::VkCommandBuffer`]) and the recording backend
//! ([`recorder::CommandRecorder`]) used by tests. All parameters are fully
//! resolved; implementations perform no further lookups beyond raw-handle
//! resolution.

use bitflags::bitflags;
use bytemuck::{Pod, Zeroable};
use smallvec::SmallVec;

use crate::sync::state::{ImageLayout, ResState};
use crate::types::{Buffer, Handle, Image, IndexType, Pipeline, QueryPool};

pub mod recorder;
pub mod vk;

bitflags! {
    /// Image aspect bits. Values match `VkImageAspectFlagBits`.
    #[repr(transparent)]
    #[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ImageAspect: u32 {
        const COLOR   = 0x1;
        const DEPTH   = 0x2;
        const STENCIL = 0x4;
    }
}
unsafe impl Zeroable for ImageAspect {}
unsafe impl Pod for ImageAspect {}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Pod, Zeroable, Default)]
pub struct Offset2d {
    pub x: i32,
    pub y: i32,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Pod, Zeroable, Default)]
pub struct Extent2d {
    pub width: u32,
    pub height: u32,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Pod, Zeroable, Default)]
pub struct Rect2d {
    pub offset: Offset2d,
    pub extent: Extent2d,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Pod, Zeroable, Default)]
pub struct Offset3d {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Pod, Zeroable, Default)]
pub struct Extent3d {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Pod, Zeroable, Default)]
pub struct SubresourceRange {
    pub aspect: ImageAspect,
    pub base_mip: u32,
    pub level_count: u32,
    pub base_layer: u32,
    pub layer_count: u32,
}

impl SubresourceRange {
    pub fn new(aspect: ImageAspect, base_mip: u32, level_count: u32, base_layer: u32, layer_count: u32) -> Self {
        Self { aspect, base_mip, level_count, base_layer, layer_count }
    }

    /// All mips and layers of the given aspect.
    pub fn full(aspect: ImageAspect) -> Self {
        Self::new(aspect, 0, u32::MAX, 0, u32::MAX)
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Pod, Zeroable, Default)]
pub struct SubresourceLayers {
    pub aspect: ImageAspect,
    pub mip_level: u32,
    pub base_layer: u32,
    pub layer_count: u32,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Pod, Zeroable, Default)]
pub struct BufferCopyRegion {
    pub src_offset: u64,
    pub dst_offset: u64,
    pub size: u64,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Pod, Zeroable, Default)]
pub struct ImageCopyRegion {
    pub src_subresource: SubresourceLayers,
    pub src_offset: Offset3d,
    pub dst_subresource: SubresourceLayers,
    pub dst_offset: Offset3d,
    pub extent: Extent3d,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Pod, Zeroable, Default)]
pub struct BufferImageCopyRegion {
    pub buffer_offset: u64,
    pub buffer_row_length: u32,
    pub buffer_image_height: u32,
    pub subresource: SubresourceLayers,
    pub offset: Offset3d,
    pub extent: Extent3d,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Pod, Zeroable, Default)]
pub struct ImageBlitRegion {
    pub src_subresource: SubresourceLayers,
    pub src_offsets: [Offset3d; 2],
    pub dst_subresource: SubresourceLayers,
    pub dst_offsets: [Offset3d; 2],
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Filter {
    Nearest,
    Linear,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum LoadOp {
    Load,
    Clear,
    DontCare,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum StoreOp {
    Store,
    DontCare,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable, Default)]
pub struct ClearDepthStencilValue {
    pub depth: f32,
    pub stencil: u32,
}

/// One attachment clear inside an active rendering scope. The aspect selects
/// whether the color or the depth/stencil value applies.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ClearAttachment {
    pub aspect: ImageAspect,
    pub color_attachment: u32,
    pub color: [f32; 4],
    pub depth_stencil: ClearDepthStencilValue,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Pod, Zeroable, Default)]
pub struct ClearRect {
    pub rect: Rect2d,
    pub base_layer: u32,
    pub layer_count: u32,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ColorAttachment {
    pub image: Handle<Image>,
    pub load: LoadOp,
    pub store: StoreOp,
    pub clear: [f32; 4],
}

/// `aspect` names the aspects the attached image actually has, `DEPTH` or
/// `DEPTH | STENCIL` depending on its format; barriers for the attachment
/// transition exactly these aspects.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DepthAttachment {
    pub image: Handle<Image>,
    pub load: LoadOp,
    pub store: StoreOp,
    pub clear: ClearDepthStencilValue,
    pub aspect: ImageAspect,
}

/// Fully resolved parameters for a rendering scope.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderingInfo {
    pub area: Rect2d,
    pub colors: SmallVec<[ColorAttachment; 4]>,
    pub depth: Option<DepthAttachment>,
}

/// Buffer memory barrier at the handle level. Backends convert this to their
/// native representation; the recording backend stores it verbatim.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BufferBarrier {
    pub buffer: Handle<Buffer>,
    pub src: ResState,
    pub dst: ResState,
}

/// Image memory barrier at the handle level, including the layout transition
/// carried by the src/dst states.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ImageBarrier {
    pub image: Handle<Image>,
    pub src: ResState,
    pub dst: ResState,
    pub range: SubresourceRange,
}

/// Abstract sink for recorded GPU commands.
///
/// One method per command family; the method set is exactly the union of
/// command shapes needed across all node types. Adding a node type that emits
/// a new command shape extends this trait.
pub trait CommandBuffer {
    fn begin_rendering(&mut self, info: &RenderingInfo);
    fn end_rendering(&mut self);

    fn bind_graphics_pipeline(&mut self, pipeline: Handle<Pipeline>);
    fn bind_compute_pipeline(&mut self, pipeline: Handle<Pipeline>);
    fn bind_vertex_buffer(&mut self, buffer: Handle<Buffer>, offset: u64);
    fn bind_index_buffer(&mut self, buffer: Handle<Buffer>, offset: u64, index_type: IndexType);

    fn draw(&mut self, vertex_count: u32, instance_count: u32, first_vertex: u32, first_instance: u32);
    fn draw_indexed(
        &mut self,
        index_count: u32,
        instance_count: u32,
        first_index: u32,
        vertex_offset: i32,
        first_instance: u32,
    );
    fn draw_indirect(&mut self, buffer: Handle<Buffer>, offset: u64, draw_count: u32, stride: u32);
    fn draw_indexed_indirect(&mut self, buffer: Handle<Buffer>, offset: u64, draw_count: u32, stride: u32);

    fn dispatch(&mut self, x: u32, y: u32, z: u32);
    fn dispatch_indirect(&mut self, buffer: Handle<Buffer>, offset: u64);

    fn copy_buffer(&mut self, src: Handle<Buffer>, dst: Handle<Buffer>, regions: &[BufferCopyRegion]);
    fn copy_image(&mut self, src: Handle<Image>, dst: Handle<Image>, regions: &[ImageCopyRegion]);
    fn copy_buffer_to_image(&mut self, src: Handle<Buffer>, dst: Handle<Image>, regions: &[BufferImageCopyRegion]);
    fn copy_image_to_buffer(&mut self, src: Handle<Image>, dst: Handle<Buffer>, regions: &[BufferImageCopyRegion]);
    fn blit_image(
        &mut self,
        src: Handle<Image>,
        src_layout: ImageLayout,
        dst: Handle<Image>,
        dst_layout: ImageLayout,
        regions: &[ImageBlitRegion],
        filter: Filter,
    );

    fn clear_attachments(&mut self, attachments: &[ClearAttachment], rects: &[ClearRect]);
    fn clear_color_image(
        &mut self,
        image: Handle<Image>,
        layout: ImageLayout,
        color: [f32; 4],
        ranges: &[SubresourceRange],
    );
    fn clear_depth_stencil_image(
        &mut self,
        image: Handle<Image>,
        layout: ImageLayout,
        value: ClearDepthStencilValue,
        ranges: &[SubresourceRange],
    );

    fn fill_buffer(&mut self, buffer: Handle<Buffer>, offset: u64, size: u64, data: u32);
    fn update_buffer(&mut self, buffer: Handle<Buffer>, offset: u64, data: &[u8]);

    fn begin_query(&mut self, pool: Handle<QueryPool>, query: u32);
    fn end_query(&mut self, pool: Handle<QueryPool>, query: u32);
    fn reset_query_pool(&mut self, pool: Handle<QueryPool>, first_query: u32, query_count: u32);

    fn pipeline_barrier(&mut self, buffers: &[BufferBarrier], images: &[ImageBarrier]);
}
