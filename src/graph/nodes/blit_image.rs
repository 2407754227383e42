use smallvec::SmallVec;

use crate::cmd::{CommandBuffer, Filter, ImageAspect, ImageBlitRegion};
use crate::graph::links::NodeLinks;
use crate::graph::node::BoundPipelines;
use crate::graph::node_type::NodeType;
use crate::graph::nodes::NodeInfo;
use crate::sync::state::{Access, ImageLayout, Stage};
use crate::sync::tracker::ResourceStateTracker;
use crate::types::{Handle, Image, ResourceKind};

#[derive(Debug, Clone, PartialEq)]
pub struct BlitImageInfo {
    pub src: Handle<Image>,
    pub dst: Handle<Image>,
    pub regions: SmallVec<[ImageBlitRegion; 1]>,
    pub filter: Filter,
}

pub struct BlitImageNode;

impl NodeInfo for BlitImageNode {
    const NODE_TYPE: NodeType = NodeType::BlitImage;
    const PIPELINE_STAGE: Stage = Stage::TRANSFER;
    const RESOURCE_USAGES: ResourceKind = ResourceKind::IMAGE;

    type CreateInfo = BlitImageInfo;
    type Data = BlitImageInfo;

    fn populate(create_info: &Self::CreateInfo) -> Self::Data {
        create_info.clone()
    }

    fn build_links(
        resources: &mut ResourceStateTracker,
        links: &mut NodeLinks,
        create_info: &Self::CreateInfo,
    ) {
        let src_aspect = create_info
            .regions
            .iter()
            .fold(ImageAspect::empty(), |a, r| a | r.src_subresource.aspect);
        let dst_aspect = create_info
            .regions
            .iter()
            .fold(ImageAspect::empty(), |a, r| a | r.dst_subresource.aspect);
        links.add_image(
            resources,
            create_info.src,
            Self::PIPELINE_STAGE,
            Access::TRANSFER_READ,
            ImageLayout::TRANSFER_SRC_OPTIMAL,
            src_aspect,
        );
        links.add_image(
            resources,
            create_info.dst,
            Self::PIPELINE_STAGE,
            Access::TRANSFER_WRITE,
            ImageLayout::TRANSFER_DST_OPTIMAL,
            dst_aspect,
        );
    }

    fn build_commands(cmd: &mut dyn CommandBuffer, data: &Self::Data, _bound: &mut BoundPipelines) {
        cmd.blit_image(
            data.src,
            ImageLayout::TRANSFER_SRC_OPTIMAL,
            data.dst,
            ImageLayout::TRANSFER_DST_OPTIMAL,
            &data.regions,
            data.filter,
        );
    }
}
