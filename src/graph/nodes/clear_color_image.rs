use smallvec::SmallVec;

use crate::cmd::{CommandBuffer, ImageAspect, SubresourceRange};
use crate::graph::links::NodeLinks;
use crate::graph::node::BoundPipelines;
use crate::graph::node_type::NodeType;
use crate::graph::nodes::NodeInfo;
use crate::sync::state::{Access, ImageLayout, Stage};
use crate::sync::tracker::ResourceStateTracker;
use crate::types::{Handle, Image, ResourceKind};

#[derive(Debug, Clone, PartialEq)]
pub struct ClearColorImageInfo {
    pub image: Handle<Image>,
    pub color: [f32; 4],
    pub ranges: SmallVec<[SubresourceRange; 1]>,
}

pub struct ClearColorImageNode;

impl NodeInfo for ClearColorImageNode {
    const NODE_TYPE: NodeType = NodeType::ClearColorImage;
    const PIPELINE_STAGE: Stage = Stage::TRANSFER;
    const RESOURCE_USAGES: ResourceKind = ResourceKind::IMAGE;

    type CreateInfo = ClearColorImageInfo;
    type Data = ClearColorImageInfo;

    fn populate(create_info: &Self::CreateInfo) -> Self::Data {
        create_info.clone()
    }

    fn build_links(
        resources: &mut ResourceStateTracker,
        links: &mut NodeLinks,
        create_info: &Self::CreateInfo,
    ) {
        links.add_image(
            resources,
            create_info.image,
            Self::PIPELINE_STAGE,
            Access::TRANSFER_WRITE,
            ImageLayout::TRANSFER_DST_OPTIMAL,
            ImageAspect::COLOR,
        );
    }

    fn build_commands(cmd: &mut dyn CommandBuffer, data: &Self::Data, _bound: &mut BoundPipelines) {
        cmd.clear_color_image(data.image, ImageLayout::TRANSFER_DST_OPTIMAL, data.color, &data.ranges);
    }
}
