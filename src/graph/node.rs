use crate::cmd::{CommandBuffer, RenderingInfo};
use crate::graph::links::NodeLinks;
use crate::graph::node_type::NodeType;
use crate::graph::nodes::{
    begin_rendering::BeginRenderingNode,
    blit_image::{BlitImageInfo, BlitImageNode},
    clear_attachments::{ClearAttachmentsInfo, ClearAttachmentsNode},
    clear_color_image::{ClearColorImageInfo, ClearColorImageNode},
    clear_depth_stencil_image::{ClearDepthStencilImageInfo, ClearDepthStencilImageNode},
    copy_buffer::{CopyBufferInfo, CopyBufferNode},
    copy_buffer_to_image::{CopyBufferToImageInfo, CopyBufferToImageNode},
    copy_image::{CopyImageInfo, CopyImageNode},
    copy_image_to_buffer::{CopyImageToBufferInfo, CopyImageToBufferNode},
    dispatch::{DispatchData, DispatchNode},
    dispatch_indirect::{DispatchIndirectData, DispatchIndirectNode},
    draw::{DrawData, DrawNode},
    draw_indexed::{DrawIndexedData, DrawIndexedNode},
    draw_indexed_indirect::{DrawIndexedIndirectData, DrawIndexedIndirectNode},
    draw_indirect::{DrawIndirectData, DrawIndirectNode},
    end_rendering::{EndRenderingInfo, EndRenderingNode},
    fill_buffer::{FillBufferInfo, FillBufferNode},
    query::{
        BeginQueryInfo, BeginQueryNode, EndQueryInfo, EndQueryNode, ResetQueryPoolInfo,
        ResetQueryPoolNode,
    },
    synchronization::{SynchronizationInfo, SynchronizationNode},
    update_buffer::{UpdateBufferInfo, UpdateBufferNode},
    update_mipmaps::{UpdateMipmapsInfo, UpdateMipmapsNode},
    NodeInfo,
};
use crate::types::{Handle, Pipeline};

/// Pipelines currently bound on the command buffer being recorded.
///
/// Threaded through command emission so consecutive nodes using the same
/// pipeline skip the redundant bind.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct BoundPipelines {
    pub graphics: Option<Handle<Pipeline>>,
    pub compute: Option<Handle<Pipeline>>,
}

impl BoundPipelines {
    pub(crate) fn bind_graphics(&mut self, cmd: &mut dyn CommandBuffer, pipeline: Handle<Pipeline>) {
        if self.graphics != Some(pipeline) {
            cmd.bind_graphics_pipeline(pipeline);
            self.graphics = Some(pipeline);
        }
    }

    pub(crate) fn bind_compute(&mut self, cmd: &mut dyn CommandBuffer, pipeline: Handle<Pipeline>) {
        if self.compute != Some(pipeline) {
            cmd.bind_compute_pipeline(pipeline);
            self.compute = Some(pipeline);
        }
    }
}

/// Stored payload of a node, one variant per node type.
///
/// The tagged variant replaces virtual dispatch: command emission is a single
/// match keyed by the node type.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    Unused,
    BeginQuery(BeginQueryInfo),
    BeginRendering(RenderingInfo),
    BlitImage(BlitImageInfo),
    ClearAttachments(ClearAttachmentsInfo),
    ClearColorImage(ClearColorImageInfo),
    ClearDepthStencilImage(ClearDepthStencilImageInfo),
    CopyBuffer(CopyBufferInfo),
    CopyImage(CopyImageInfo),
    CopyImageToBuffer(CopyImageToBufferInfo),
    CopyBufferToImage(CopyBufferToImageInfo),
    Dispatch(DispatchData),
    DispatchIndirect(DispatchIndirectData),
    Draw(DrawData),
    DrawIndexed(DrawIndexedData),
    DrawIndexedIndirect(DrawIndexedIndirectData),
    DrawIndirect(DrawIndirectData),
    EndQuery(EndQueryInfo),
    EndRendering(EndRenderingInfo),
    FillBuffer(FillBufferInfo),
    ResetQueryPool(ResetQueryPoolInfo),
    Synchronization(SynchronizationInfo),
    UpdateBuffer(UpdateBufferInfo),
    UpdateMipmaps(UpdateMipmapsInfo),
}

macro_rules! impl_from_data {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(impl From<$ty> for NodeData {
            fn from(data: $ty) -> Self {
                NodeData::$variant(data)
            }
        })*
    };
}

impl_from_data! {
    BeginQueryInfo => BeginQuery,
    RenderingInfo => BeginRendering,
    BlitImageInfo => BlitImage,
    ClearAttachmentsInfo => ClearAttachments,
    ClearColorImageInfo => ClearColorImage,
    ClearDepthStencilImageInfo => ClearDepthStencilImage,
    CopyBufferInfo => CopyBuffer,
    CopyImageInfo => CopyImage,
    CopyImageToBufferInfo => CopyImageToBuffer,
    CopyBufferToImageInfo => CopyBufferToImage,
    DispatchData => Dispatch,
    DispatchIndirectData => DispatchIndirect,
    DrawData => Draw,
    DrawIndexedData => DrawIndexed,
    DrawIndexedIndirectData => DrawIndexedIndirect,
    DrawIndirectData => DrawIndirect,
    EndQueryInfo => EndQuery,
    EndRenderingInfo => EndRendering,
    FillBufferInfo => FillBuffer,
    ResetQueryPoolInfo => ResetQueryPool,
    SynchronizationInfo => Synchronization,
    UpdateBufferInfo => UpdateBuffer,
    UpdateMipmapsInfo => UpdateMipmaps,
}

/// One recorded unit of GPU work plus its declared resource dependencies.
///
/// Owned exclusively by the render graph. The type tag and payload are
/// immutable after creation; links are extracted once at creation time.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub node_type: NodeType,
    pub data: NodeData,
    pub links: NodeLinks,
}

impl Node {
    /// Emit this node's commands into the command buffer.
    ///
    /// Barriers for this node are the graph's responsibility and have
    /// already been emitted when this runs.
    pub fn build_commands(&self, cmd: &mut dyn CommandBuffer, bound: &mut BoundPipelines) {
        match &self.data {
            NodeData::Unused => unreachable!("unused node reached command emission"),
            NodeData::BeginQuery(data) => BeginQueryNode::build_commands(cmd, data, bound),
            NodeData::BeginRendering(data) => BeginRenderingNode::build_commands(cmd, data, bound),
            NodeData::BlitImage(data) => BlitImageNode::build_commands(cmd, data, bound),
            NodeData::ClearAttachments(data) => ClearAttachmentsNode::build_commands(cmd, data, bound),
            NodeData::ClearColorImage(data) => ClearColorImageNode::build_commands(cmd, data, bound),
            NodeData::ClearDepthStencilImage(data) => {
                ClearDepthStencilImageNode::build_commands(cmd, data, bound)
            }
            NodeData::CopyBuffer(data) => CopyBufferNode::build_commands(cmd, data, bound),
            NodeData::CopyImage(data) => CopyImageNode::build_commands(cmd, data, bound),
            NodeData::CopyImageToBuffer(data) => CopyImageToBufferNode::build_commands(cmd, data, bound),
            NodeData::CopyBufferToImage(data) => CopyBufferToImageNode::build_commands(cmd, data, bound),
            NodeData::Dispatch(data) => DispatchNode::build_commands(cmd, data, bound),
            NodeData::DispatchIndirect(data) => DispatchIndirectNode::build_commands(cmd, data, bound),
            NodeData::Draw(data) => DrawNode::build_commands(cmd, data, bound),
            NodeData::DrawIndexed(data) => DrawIndexedNode::build_commands(cmd, data, bound),
            NodeData::DrawIndexedIndirect(data) => {
                DrawIndexedIndirectNode::build_commands(cmd, data, bound)
            }
            NodeData::DrawIndirect(data) => DrawIndirectNode::build_commands(cmd, data, bound),
            NodeData::EndQuery(data) => EndQueryNode::build_commands(cmd, data, bound),
            NodeData::EndRendering(data) => EndRenderingNode::build_commands(cmd, data, bound),
            NodeData::FillBuffer(data) => FillBufferNode::build_commands(cmd, data, bound),
            NodeData::ResetQueryPool(data) => ResetQueryPoolNode::build_commands(cmd, data, bound),
            NodeData::Synchronization(data) => SynchronizationNode::build_commands(cmd, data, bound),
            NodeData::UpdateBuffer(data) => UpdateBufferNode::build_commands(cmd, data, bound),
            NodeData::UpdateMipmaps(data) => UpdateMipmapsNode::build_commands(cmd, data, bound),
        }
    }
}
