use smallvec::SmallVec;

use crate::cmd::{ClearAttachment, ClearRect, CommandBuffer};
use crate::graph::links::NodeLinks;
use crate::graph::node::BoundPipelines;
use crate::graph::node_type::NodeType;
use crate::graph::nodes::NodeInfo;
use crate::sync::state::Stage;
use crate::sync::tracker::ResourceStateTracker;
use crate::types::ResourceKind;

/// Clears regions of attachments already bound by the enclosing rendering
/// scope. The attachments were linked when the scope began, so this node
/// carries no links of its own.
#[derive(Debug, Clone, PartialEq)]
pub struct ClearAttachmentsInfo {
    pub attachments: SmallVec<[ClearAttachment; 4]>,
    pub rects: SmallVec<[ClearRect; 1]>,
}

pub struct ClearAttachmentsNode;

impl NodeInfo for ClearAttachmentsNode {
    const NODE_TYPE: NodeType = NodeType::ClearAttachments;
    const PIPELINE_STAGE: Stage = Stage::COLOR_ATTACHMENT_OUTPUT;
    const RESOURCE_USAGES: ResourceKind = ResourceKind::NONE;

    type CreateInfo = ClearAttachmentsInfo;
    type Data = ClearAttachmentsInfo;

    fn populate(create_info: &Self::CreateInfo) -> Self::Data {
        create_info.clone()
    }

    fn build_links(
        _resources: &mut ResourceStateTracker,
        _links: &mut NodeLinks,
        _create_info: &Self::CreateInfo,
    ) {
    }

    fn build_commands(cmd: &mut dyn CommandBuffer, data: &Self::Data, _bound: &mut BoundPipelines) {
        cmd.clear_attachments(&data.attachments, &data.rects);
    }
}
