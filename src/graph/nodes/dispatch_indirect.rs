use crate::cmd::CommandBuffer;
use crate::graph::links::NodeLinks;
use crate::graph::node::BoundPipelines;
use crate::graph::node_type::NodeType;
use crate::graph::nodes::{NodeInfo, ShaderResources};
use crate::sync::state::{Access, Stage};
use crate::sync::tracker::ResourceStateTracker;
use crate::types::{Buffer, Handle, Pipeline, ResourceKind};

#[derive(Debug, Clone, PartialEq)]
pub struct DispatchIndirectInfo {
    pub pipeline: Handle<Pipeline>,
    pub indirect_buffer: Handle<Buffer>,
    pub offset: u64,
    pub resources: ShaderResources,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DispatchIndirectData {
    pub pipeline: Handle<Pipeline>,
    pub indirect_buffer: Handle<Buffer>,
    pub offset: u64,
}

pub struct DispatchIndirectNode;

impl NodeInfo for DispatchIndirectNode {
    const NODE_TYPE: NodeType = NodeType::DispatchIndirect;
    const PIPELINE_STAGE: Stage = Stage::COMPUTE_SHADER;
    const RESOURCE_USAGES: ResourceKind = ResourceKind::BUFFER.union(ResourceKind::IMAGE);

    type CreateInfo = DispatchIndirectInfo;
    type Data = DispatchIndirectData;

    fn populate(create_info: &Self::CreateInfo) -> Self::Data {
        DispatchIndirectData {
            pipeline: create_info.pipeline,
            indirect_buffer: create_info.indirect_buffer,
            offset: create_info.offset,
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
        create_info.resources.build_links(resources, links, Self::PIPELINE_STAGE);
    }

    fn build_commands(cmd: &mut dyn CommandBuffer, data: &Self::Data, bound: &mut BoundPipelines) {
        bound.bind_compute(cmd, data.pipeline);
        cmd.dispatch_indirect(data.indirect_buffer, data.offset);
    }
}
