//! Per-node-type descriptors.
//!
//! Each node type is described once by a [`NodeInfo`] implementation binding
//! the type tag, the caller-facing create-info shape, the stored node-data
//! shape, the pipeline stage the command runs on and the resource categories
//! it may touch. The descriptors are selected through the `NodeData` tagged
//! variant, keeping the emission path a single branch-predictable match.

use smallvec::SmallVec;

use crate::cmd::{CommandBuffer, ImageAspect};
use crate::graph::links::NodeLinks;
use crate::graph::node::{BoundPipelines, NodeData};
use crate::graph::node_type::NodeType;
use crate::sync::state::{Access, ImageLayout, Stage};
use crate::sync::tracker::ResourceStateTracker;
use crate::types::{Buffer, Handle, Image, IndexType, ResourceKind};

pub mod begin_rendering;
pub mod blit_image;
pub mod clear_attachments;
pub mod clear_color_image;
pub mod clear_depth_stencil_image;
pub mod copy_buffer;
pub mod copy_buffer_to_image;
pub mod copy_image;
pub mod copy_image_to_buffer;
pub mod dispatch;
pub mod dispatch_indirect;
pub mod draw;
pub mod draw_indexed;
pub mod draw_indexed_indirect;
pub mod draw_indirect;
pub mod end_rendering;
pub mod fill_buffer;
pub mod query;
pub mod synchronization;
pub mod update_buffer;
pub mod update_mipmaps;

/// Descriptor for one node type.
///
/// `populate` derives the stored payload from the create-info; it is a pure
/// transform and must stay deterministic. `build_links` enumerates every
/// resource the emitted command will touch, recording each access in the
/// state tracker; under-reporting here is a correctness bug (missing
/// barrier), over-reporting only a spurious one. `build_commands` replays the
/// stored payload into a command buffer and must not consult the tracker;
/// every hazard decision is already resolved by then.
pub trait NodeInfo {
    const NODE_TYPE: NodeType;

    /// Pipeline stage(s) the command executes on, used when declaring links.
    const PIPELINE_STAGE: Stage;

    /// Resource categories this node may reference. Link extraction for
    /// other categories can be skipped entirely.
    const RESOURCE_USAGES: ResourceKind;

    type CreateInfo;
    type Data: Into<NodeData>;

    fn populate(create_info: &Self::CreateInfo) -> Self::Data;

    fn build_links(
        resources: &mut ResourceStateTracker,
        links: &mut NodeLinks,
        create_info: &Self::CreateInfo,
    );

    fn build_commands(cmd: &mut dyn CommandBuffer, data: &Self::Data, bound: &mut BoundPipelines);
}

/// Declared shader resource accesses of a draw or dispatch node.
///
/// Descriptor-set contents are opaque to the graph, so the caller declares
/// which buffers and images the bound pipeline will actually touch. The
/// stage comes from the node type, not the declaration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShaderResources {
    pub buffers: SmallVec<[BufferUse; 4]>,
    pub images: SmallVec<[ImageUse; 4]>,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BufferUse {
    pub buffer: Handle<Buffer>,
    pub access: Access,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ImageUse {
    pub image: Handle<Image>,
    pub access: Access,
    pub layout: ImageLayout,
    pub aspect: ImageAspect,
}

impl ShaderResources {
    pub(crate) fn build_links(
        &self,
        resources: &mut ResourceStateTracker,
        links: &mut NodeLinks,
        stages: Stage,
    ) {
        for buffer_use in &self.buffers {
            links.add_buffer(resources, buffer_use.buffer, stages, buffer_use.access);
        }
        for image_use in &self.images {
            links.add_image(
                resources,
                image_use.image,
                stages,
                image_use.access,
                image_use.layout,
                image_use.aspect,
            );
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct VertexBufferBinding {
    pub buffer: Handle<Buffer>,
    pub offset: u64,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct IndexBufferBinding {
    pub buffer: Handle<Buffer>,
    pub offset: u64,
    pub index_type: IndexType,
}

#[cfg(test)]
mod tests {
    use smallvec::smallvec;

    use super::begin_rendering::BeginRenderingNode;
    use super::blit_image::{BlitImageInfo, BlitImageNode};
    use super::clear_attachments::{ClearAttachmentsInfo, ClearAttachmentsNode};
    use super::clear_color_image::{ClearColorImageInfo, ClearColorImageNode};
    use super::clear_depth_stencil_image::{ClearDepthStencilImageInfo, ClearDepthStencilImageNode};
    use super::copy_buffer::{CopyBufferInfo, CopyBufferNode};
    use super::copy_buffer_to_image::{CopyBufferToImageInfo, CopyBufferToImageNode};
    use super::copy_image::{CopyImageInfo, CopyImageNode};
    use super::copy_image_to_buffer::{CopyImageToBufferInfo, CopyImageToBufferNode};
    use super::dispatch::{DispatchInfo, DispatchNode};
    use super::dispatch_indirect::{DispatchIndirectInfo, DispatchIndirectNode};
    use super::draw::{DrawInfo, DrawNode};
    use super::draw_indexed::{DrawIndexedInfo, DrawIndexedNode};
    use super::draw_indexed_indirect::{DrawIndexedIndirectInfo, DrawIndexedIndirectNode};
    use super::draw_indirect::{DrawIndirectInfo, DrawIndirectNode};
    use super::end_rendering::{EndRenderingInfo, EndRenderingNode};
    use super::fill_buffer::{FillBufferInfo, FillBufferNode};
    use super::query::{
        BeginQueryInfo, BeginQueryNode, EndQueryInfo, EndQueryNode, ResetQueryPoolInfo,
        ResetQueryPoolNode,
    };
    use super::synchronization::{SynchronizationInfo, SynchronizationNode};
    use super::update_buffer::{UpdateBufferInfo, UpdateBufferNode};
    use super::update_mipmaps::{UpdateMipmapsInfo, UpdateMipmapsNode};
    use super::*;
    use crate::cmd::{
        BufferCopyRegion, BufferImageCopyRegion, ClearDepthStencilValue, ClearRect,
        ColorAttachment, DepthAttachment, Extent3d, Filter, ImageBlitRegion, ImageCopyRegion,
        LoadOp, Rect2d, RenderingInfo, StoreOp, SubresourceRange,
    };
    use crate::types::{Pipeline, QueryPool};

    #[test]
    fn populate_is_idempotent_for_every_descriptor() {
        macro_rules! check {
            ($($node:ty => $info:expr),* $(,)?) => {
                $({
                    let info = $info;
                    assert_eq!(<$node>::populate(&info), <$node>::populate(&info));
                })*
            };
        }

        let buffer = Handle::<Buffer>::new(1, 0);
        let image = Handle::<Image>::new(2, 0);
        let pipeline = Handle::<Pipeline>::new(3, 0);
        let pool = Handle::<QueryPool>::new(4, 0);

        check! {
            BeginQueryNode => BeginQueryInfo { pool, query: 0 },
            BeginRenderingNode => RenderingInfo {
                area: Rect2d::default(),
                colors: smallvec![ColorAttachment {
                    image,
                    load: LoadOp::Clear,
                    store: StoreOp::Store,
                    clear: [0.0; 4],
                }],
                depth: Some(DepthAttachment {
                    image,
                    load: LoadOp::Clear,
                    store: StoreOp::Store,
                    clear: ClearDepthStencilValue { depth: 1.0, stencil: 0 },
                    aspect: ImageAspect::DEPTH,
                }),
            },
            BlitImageNode => BlitImageInfo {
                src: image,
                dst: image,
                regions: smallvec![ImageBlitRegion::default()],
                filter: Filter::Linear,
            },
            ClearAttachmentsNode => ClearAttachmentsInfo {
                attachments: smallvec![],
                rects: smallvec![ClearRect::default()],
            },
            ClearColorImageNode => ClearColorImageInfo {
                image,
                color: [1.0; 4],
                ranges: smallvec![SubresourceRange::full(ImageAspect::COLOR)],
            },
            ClearDepthStencilImageNode => ClearDepthStencilImageInfo {
                image,
                value: ClearDepthStencilValue { depth: 0.0, stencil: 0 },
                ranges: smallvec![SubresourceRange::full(ImageAspect::DEPTH)],
            },
            CopyBufferNode => CopyBufferInfo {
                src: buffer,
                dst: buffer,
                regions: smallvec![BufferCopyRegion { src_offset: 0, dst_offset: 0, size: 16 }],
            },
            CopyImageNode => CopyImageInfo {
                src: image,
                dst: image,
                regions: smallvec![ImageCopyRegion::default()],
            },
            CopyBufferToImageNode => CopyBufferToImageInfo {
                src: buffer,
                dst: image,
                regions: smallvec![BufferImageCopyRegion::default()],
            },
            CopyImageToBufferNode => CopyImageToBufferInfo {
                src: image,
                dst: buffer,
                regions: smallvec![BufferImageCopyRegion::default()],
            },
            DispatchNode => DispatchInfo {
                pipeline,
                group_count: [4, 2, 1],
                resources: ShaderResources::default(),
            },
            DispatchIndirectNode => DispatchIndirectInfo {
                pipeline,
                indirect_buffer: buffer,
                offset: 0,
                resources: ShaderResources::default(),
            },
            DrawNode => DrawInfo {
                pipeline,
                vertex_buffer: Some(VertexBufferBinding { buffer, offset: 0 }),
                vertex_count: 3,
                instance_count: 1,
                first_vertex: 0,
                first_instance: 0,
                resources: ShaderResources::default(),
            },
            DrawIndexedNode => DrawIndexedInfo {
                pipeline,
                vertex_buffer: None,
                index_buffer: IndexBufferBinding { buffer, offset: 0, index_type: IndexType::U32 },
                index_count: 6,
                instance_count: 1,
                first_index: 0,
                vertex_offset: 0,
                first_instance: 0,
                resources: ShaderResources::default(),
            },
            DrawIndirectNode => DrawIndirectInfo {
                pipeline,
                vertex_buffer: None,
                indirect_buffer: buffer,
                offset: 0,
                draw_count: 1,
                stride: 16,
                resources: ShaderResources::default(),
            },
            DrawIndexedIndirectNode => DrawIndexedIndirectInfo {
                pipeline,
                vertex_buffer: None,
                index_buffer: IndexBufferBinding { buffer, offset: 0, index_type: IndexType::U16 },
                indirect_buffer: buffer,
                offset: 0,
                draw_count: 1,
                stride: 20,
                resources: ShaderResources::default(),
            },
            EndQueryNode => EndQueryInfo { pool, query: 0 },
            EndRenderingNode => EndRenderingInfo,
            FillBufferNode => FillBufferInfo { buffer, offset: 0, size: 64, data: 0xdead_beef },
            ResetQueryPoolNode => ResetQueryPoolInfo { pool, first_query: 0, query_count: 8 },
            SynchronizationNode => SynchronizationInfo {
                image,
                stages: Stage::BOTTOM_OF_PIPE,
                access: Access::NONE,
                layout: ImageLayout::PRESENT_SRC,
                aspect: ImageAspect::COLOR,
            },
            UpdateBufferNode => UpdateBufferInfo { buffer, offset: 0, data: vec![1, 2, 3, 4] },
            UpdateMipmapsNode => UpdateMipmapsInfo {
                image,
                mip_levels: 4,
                layer_count: 1,
                extent: Extent3d { width: 16, height: 16, depth: 1 },
            },
        }
    }
}
