use crate::cmd::CommandBuffer;
use crate::graph::links::NodeLinks;
use crate::graph::node::BoundPipelines;
use crate::graph::node_type::NodeType;
use crate::graph::nodes::NodeInfo;
use crate::sync::state::Stage;
use crate::sync::tracker::ResourceStateTracker;
use crate::types::ResourceKind;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct EndRenderingInfo;

pub struct EndRenderingNode;

impl NodeInfo for EndRenderingNode {
    const NODE_TYPE: NodeType = NodeType::EndRendering;
    const PIPELINE_STAGE: Stage = Stage::COLOR_ATTACHMENT_OUTPUT;
    const RESOURCE_USAGES: ResourceKind = ResourceKind::NONE;

    type CreateInfo = EndRenderingInfo;
    type Data = EndRenderingInfo;

    fn populate(create_info: &Self::CreateInfo) -> Self::Data {
        *create_info
    }

    fn build_links(
        _resources: &mut ResourceStateTracker,
        _links: &mut NodeLinks,
        _create_info: &Self::CreateInfo,
    ) {
    }

    fn build_commands(cmd: &mut dyn CommandBuffer, _data: &Self::Data, _bound: &mut BoundPipelines) {
        cmd.end_rendering();
    }
}
