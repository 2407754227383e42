use crate::cmd::CommandBuffer;
use crate::graph::links::NodeLinks;
use crate::graph::node::BoundPipelines;
use crate::graph::node_type::NodeType;
use crate::graph::nodes::{NodeInfo, ShaderResources};
use crate::sync::state::Stage;
use crate::sync::tracker::ResourceStateTracker;
use crate::types::{Handle, Pipeline, ResourceKind};

#[derive(Debug, Clone, PartialEq)]
pub struct DispatchInfo {
    pub pipeline: Handle<Pipeline>,
    pub group_count: [u32; 3],
    pub resources: ShaderResources,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DispatchData {
    pub pipeline: Handle<Pipeline>,
    pub group_count: [u32; 3],
}

pub struct DispatchNode;

impl NodeInfo for DispatchNode {
    const NODE_TYPE: NodeType = NodeType::Dispatch;
    const PIPELINE_STAGE: Stage = Stage::COMPUTE_SHADER;
    const RESOURCE_USAGES: ResourceKind = ResourceKind::BUFFER.union(ResourceKind::IMAGE);

    type CreateInfo = DispatchInfo;
    type Data = DispatchData;

    fn populate(create_info: &Self::CreateInfo) -> Self::Data {
        DispatchData { pipeline: create_info.pipeline, group_count: create_info.group_count }
    }

    fn build_links(
        resources: &mut ResourceStateTracker,
        links: &mut NodeLinks,
        create_info: &Self::CreateInfo,
    ) {
        create_info.resources.build_links(resources, links, Self::PIPELINE_STAGE);
    }

    fn build_commands(cmd: &mut dyn CommandBuffer, data: &Self::Data, bound: &mut BoundPipelines) {
        bound.bind_compute(cmd, data.pipeline);
        let [x, y, z] = data.group_count;
        cmd.dispatch(x, y, z);
    }
}
