use crate::cmd::CommandBuffer;
use crate::graph::links::NodeLinks;
use crate::graph::node::BoundPipelines;
use crate::graph::node_type::NodeType;
use crate::graph::nodes::{IndexBufferBinding, NodeInfo, ShaderResources, VertexBufferBinding};
use crate::sync::state::{Access, Stage};
use crate::sync::tracker::ResourceStateTracker;
use crate::types::{Handle, Pipeline, ResourceKind};

#[derive(Debug, Clone, PartialEq)]
pub struct DrawIndexedInfo {
    pub pipeline: Handle<Pipeline>,
    pub vertex_buffer: Option<VertexBufferBinding>,
    pub index_buffer: IndexBufferBinding,
    pub index_count: u32,
    pub instance_count: u32,
    pub first_index: u32,
    pub vertex_offset: i32,
    pub first_instance: u32,
    pub resources: ShaderResources,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DrawIndexedData {
    pub pipeline: Handle<Pipeline>,
    pub vertex_buffer: Option<VertexBufferBinding>,
    pub index_buffer: IndexBufferBinding,
    pub index_count: u32,
    pub instance_count: u32,
    pub first_index: u32,
    pub vertex_offset: i32,
    pub first_instance: u32,
}

pub struct DrawIndexedNode;

impl NodeInfo for DrawIndexedNode {
    const NODE_TYPE: NodeType = NodeType::DrawIndexed;
    const PIPELINE_STAGE: Stage = Stage::VERTEX_SHADER.union(Stage::FRAGMENT_SHADER);
    const RESOURCE_USAGES: ResourceKind = ResourceKind::BUFFER.union(ResourceKind::IMAGE);

    type CreateInfo = DrawIndexedInfo;
    type Data = DrawIndexedData;

    fn populate(create_info: &Self::CreateInfo) -> Self::Data {
        DrawIndexedData {
            pipeline: create_info.pipeline,
            vertex_buffer: create_info.vertex_buffer,
            index_buffer: create_info.index_buffer,
            index_count: create_info.index_count,
            instance_count: create_info.instance_count,
            first_index: create_info.first_index,
            vertex_offset: create_info.vertex_offset,
            first_instance: create_info.first_instance,
        }
    }

    fn build_links(
        resources: &mut ResourceStateTracker,
        links: &mut NodeLinks,
        create_info: &Self::CreateInfo,
    ) {
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
        cmd.draw_indexed(
            data.index_count,
            data.instance_count,
            data.first_index,
            data.vertex_offset,
            data.first_instance,
        );
    }
}
