use crate::cmd::CommandBuffer;
use crate::graph::links::NodeLinks;
use crate::graph::node::BoundPipelines;
use crate::graph::node_type::NodeType;
use crate::graph::nodes::{IndexBufferBinding, NodeInfo, ShaderResources, VertexBufferBinding};
use crate::sync::state::{Access, Stage};
use crate::sync::tracker::ResourceStateTracker;
use crate::types::{Buffer, Handle, Pipeline, ResourceKind};

#[derive(Debug, Clone, PartialEq)]
pub struct DrawIndexedIndirectInfo {
    pub pipeline: Handle<Pipeline>,
    pub vertex_buffer: Option<VertexBufferBinding>,
    pub index_buffer: IndexBufferBinding,
    pub indirect_buffer: Handle<Buffer>,
    pub offset: u64,
    pub draw_count: u32,
    pub stride: u32,
    pub resources: ShaderResources,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DrawIndexedIndirectData {
    pub pipeline: Handle<Pipeline>,
    pub vertex_buffer: Option<VertexBufferBinding>,
    pub index_buffer: IndexBufferBinding,
    pub indirect_buffer: Handle<Buffer>,
    pub offset: u64,
    pub draw_count: u32,
    pub stride: u32,
}

pub struct DrawIndexedIndirectNode;

impl NodeInfo for DrawIndexedIndirectNode {
    const NODE_TYPE: NodeType = NodeType::DrawIndexedIndirect;
    const PIPELINE_STAGE: Stage = Stage::VERTEX_SHADER.union(Stage::FRAGMENT_SHADER);
    const RESOURCE_USAGES: ResourceKind = ResourceKind::BUFFER.union(ResourceKind::IMAGE);

    type CreateInfo = DrawIndexedIndirectInfo;
    type Data = DrawIndexedIndirectData;

    fn populate(create_info: &Self::CreateInfo) -> Self::Data {
        DrawIndexedIndirectData {
            pipeline: create_info.pipeline,
            vertex_buffer: create_info.vertex_buffer,
            index_buffer: create_info.index_buffer,
            indirect_buffer: create_info.indirect_buffer,
            offset: create_info.offset,
            draw_count: create_info.draw_count,
            stride: create_info.stride,
        }
    }

    fn build_links(
        resources: &mut ResourceStateTracker,
        links: &mut NodeLinks,
        create_info: &Self::CreateInfo,
    ) {
        links.add_buffer(
            resources,
            create_info.indirect_buffer,
            Stage::DRAW_INDIRECT,
            Access::INDIRECT_COMMAND_READ,
        );
        if let Some(binding) = &create_info.vertex_buffer {
            links.add_buffer(resources, binding.buffer, Stage::VERTEX_INPUT, Access::VERTEX_ATTRIBUTE_READ);
        }
        links.add_buffer(
            resources,
            create_info.index_buffer.buffer,
            Stage::VERTEX_INPUT,
            Access::INDEX_READ,
        );
        create_info.resources.build_links(resources, links, Self::PIPELINE_STAGE);
    }

    fn build_commands(cmd: &mut dyn CommandBuffer, data: &Self::Data, bound: &mut BoundPipelines) {
        bound.bind_graphics(cmd, data.pipeline);
        if let Some(binding) = &data.vertex_buffer {
            cmd.bind_vertex_buffer(binding.buffer, binding.offset);
        }
        cmd.bind_index_buffer(data.index_buffer.buffer, data.index_buffer.offset, data.index_buffer.index_type);
        cmd.draw_indexed_indirect(data.indirect_buffer, data.offset, data.draw_count, data.stride);
    }
}
