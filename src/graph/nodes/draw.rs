use crate::cmd::CommandBuffer;
use crate::graph::links::NodeLinks;
use crate::graph::node::BoundPipelines;
use crate::graph::node_type::NodeType;
use crate::graph::nodes::{NodeInfo, ShaderResources, VertexBufferBinding};
use crate::sync::state::{Access, Stage};
use crate::sync::tracker::ResourceStateTracker;
use crate::types::{Handle, Pipeline, ResourceKind};

/// Non-indexed draw. `resources` declares what the bound pipeline's shaders
/// touch; it only feeds link extraction and is not stored on the node.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawInfo {
    pub pipeline: Handle<Pipeline>,
    pub vertex_buffer: Option<VertexBufferBinding>,
    pub vertex_count: u32,
    pub instance_count: u32,
    pub first_vertex: u32,
    pub first_instance: u32,
    pub resources: ShaderResources,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DrawData {
    pub pipeline: Handle<Pipeline>,
    pub vertex_buffer: Option<VertexBufferBinding>,
    pub vertex_count: u32,
    pub instance_count: u32,
    pub first_vertex: u32,
    pub first_instance: u32,
}

pub struct DrawNode;

impl NodeInfo for DrawNode {
    const NODE_TYPE: NodeType = NodeType::Draw;
    const PIPELINE_STAGE: Stage = Stage::VERTEX_SHADER.union(Stage::FRAGMENT_SHADER);
    const RESOURCE_USAGES: ResourceKind = ResourceKind::BUFFER.union(ResourceKind::IMAGE);

    type CreateInfo = DrawInfo;
    type Data = DrawData;

    fn populate(create_info: &Self::CreateInfo) -> Self::Data {
        DrawData {
            pipeline: create_info.pipeline,
            vertex_buffer: create_info.vertex_buffer,
            vertex_count: create_info.vertex_count,
            instance_count: create_info.instance_count,
            first_vertex: create_info.first_vertex,
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
        create_info.resources.build_links(resources, links, Self::PIPELINE_STAGE);
    }

    fn build_commands(cmd: &mut dyn CommandBuffer, data: &Self::Data, bound: &mut BoundPipelines) {
        bound.bind_graphics(cmd, data.pipeline);
        if let Some(binding) = &data.vertex_buffer {
            cmd.bind_vertex_buffer(binding.buffer, binding.offset);
        }
        cmd.draw(data.vertex_count, data.instance_count, data.first_vertex, data.first_instance);
    }
}
