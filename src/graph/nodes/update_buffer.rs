use crate::cmd::CommandBuffer;
use crate::graph::links::NodeLinks;
use crate::graph::node::BoundPipelines;
use crate::graph::node_type::NodeType;
use crate::graph::nodes::NodeInfo;
use crate::sync::state::{Access, Stage};
use crate::sync::tracker::ResourceStateTracker;
use crate::types::{Buffer, Handle, ResourceKind};

/// Inline buffer update. The payload is owned by the node since the command
/// is replayed at commit time, after the caller's data may be gone.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateBufferInfo {
    pub buffer: Handle<Buffer>,
    pub offset: u64,
    pub data: Vec<u8>,
}

pub struct UpdateBufferNode;

impl NodeInfo for UpdateBufferNode {
    const NODE_TYPE: NodeType = NodeType::UpdateBuffer;
    const PIPELINE_STAGE: Stage = Stage::TRANSFER;
    const RESOURCE_USAGES: ResourceKind = ResourceKind::BUFFER;

    type CreateInfo = UpdateBufferInfo;
    type Data = UpdateBufferInfo;

    fn populate(create_info: &Self::CreateInfo) -> Self::Data {
        create_info.clone()
    }

    fn build_links(
        resources: &mut ResourceStateTracker,
        links: &mut NodeLinks,
        create_info: &Self::CreateInfo,
    ) {
        links.add_buffer(resources, create_info.buffer, Self::PIPELINE_STAGE, Access::TRANSFER_WRITE);
    }

    fn build_commands(cmd: &mut dyn CommandBuffer, data: &Self::Data, _bound: &mut BoundPipelines) {
        cmd.update_buffer(data.buffer, data.offset, &data.data);
    }
}
