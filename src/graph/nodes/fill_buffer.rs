use crate::cmd::CommandBuffer;
use crate::graph::links::NodeLinks;
use crate::graph::node::BoundPipelines;
use crate::graph::node_type::NodeType;
use crate::graph::nodes::NodeInfo;
use crate::sync::state::{Access, Stage};
use crate::sync::tracker::ResourceStateTracker;
use crate::types::{Buffer, Handle, ResourceKind};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FillBufferInfo {
    pub buffer: Handle<Buffer>,
    pub offset: u64,
    pub size: u64,
    pub data: u32,
}

pub struct FillBufferNode;

impl NodeInfo for FillBufferNode {
    const NODE_TYPE: NodeType = NodeType::FillBuffer;
    const PIPELINE_STAGE: Stage = Stage::TRANSFER;
    const RESOURCE_USAGES: ResourceKind = ResourceKind::BUFFER;

    type CreateInfo = FillBufferInfo;
    type Data = FillBufferInfo;

    fn populate(create_info: &Self::CreateInfo) -> Self::Data {
        *create_info
    }

    fn build_links(
        resources: &mut ResourceStateTracker,
        links: &mut NodeLinks,
        create_info: &Self::CreateInfo,
    ) {
        links.add_buffer(resources, create_info.buffer, Self::PIPELINE_STAGE, Access::TRANSFER_WRITE);
    }

    fn build_commands(cmd: &mut dyn CommandBuffer, data: &Self::Data, _bound: &mut BoundPipelines) {
        cmd.fill_buffer(data.buffer, data.offset, data.size, data.data);
    }
}
