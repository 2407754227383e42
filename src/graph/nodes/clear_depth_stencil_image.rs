use smallvec::SmallVec;

use crate::cmd::{ClearDepthStencilValue, CommandBuffer, ImageAspect, SubresourceRange};
use crate::graph::links::NodeLinks;
use crate::graph::node::BoundPipelines;
use crate::graph::node_type::NodeType;
use crate::graph::nodes::NodeInfo;
use crate::sync::state::{Access, ImageLayout, Stage};
use crate::sync::tracker::ResourceStateTracker;
use crate::types::{Handle, Image, ResourceKind};

#[derive(Debug, Clone, PartialEq)]
pub struct ClearDepthStencilImageInfo {
    pub image: Handle<Image>,
    pub value: ClearDepthStencilValue,
    pub ranges: SmallVec<[SubresourceRange; 1]>,
}

pub struct ClearDepthStencilImageNode;

impl NodeInfo for ClearDepthStencilImageNode {
    const NODE_TYPE: NodeType = NodeType::ClearDepthStencilImage;
    const PIPELINE_STAGE: Stage = Stage::TRANSFER;
    const RESOURCE_USAGES: ResourceKind = ResourceKind::IMAGE;

    type CreateInfo = ClearDepthStencilImageInfo;
    type Data = ClearDepthStencilImageInfo;

    fn populate(create_info: &Self::CreateInfo) -> Self::Data {
        create_info.clone()
    }

    fn build_links(
        resources: &mut ResourceStateTracker,
        links: &mut NodeLinks,
        create_info: &Self::CreateInfo,
    ) {
        let aspect = create_info
            .ranges
            .iter()
            .fold(ImageAspect::empty(), |a, r| a | r.aspect);
        links.add_image(
            resources,
            create_info.image,
            Self::PIPELINE_STAGE,
            Access::TRANSFER_WRITE,
            ImageLayout::TRANSFER_DST_OPTIMAL,
            aspect,
        );
    }

    fn build_commands(cmd: &mut dyn CommandBuffer, data: &Self::Data, _bound: &mut BoundPipelines) {
        cmd.clear_depth_stencil_image(
            data.image,
            ImageLayout::TRANSFER_DST_OPTIMAL,
            data.value,
            &data.ranges,
        );
    }
}
