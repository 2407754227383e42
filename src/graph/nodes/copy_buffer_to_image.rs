use smallvec::SmallVec;

use crate::cmd::{BufferImageCopyRegion, CommandBuffer, ImageAspect};
use crate::graph::links::NodeLinks;
use crate::graph::node::BoundPipelines;
use crate::graph::node_type::NodeType;
use crate::graph::nodes::NodeInfo;
use crate::sync::state::{Access, ImageLayout, Stage};
use crate::sync::tracker::ResourceStateTracker;
use crate::types::{Buffer, Handle, Image, ResourceKind};

#[derive(Debug, Clone, PartialEq)]
pub struct CopyBufferToImageInfo {
    pub src: Handle<Buffer>,
    pub dst: Handle<Image>,
    pub regions: SmallVec<[BufferImageCopyRegion; 1]>,
}

pub struct CopyBufferToImageNode;

impl NodeInfo for CopyBufferToImageNode {
    const NODE_TYPE: NodeType = NodeType::CopyBufferToImage;
    const PIPELINE_STAGE: Stage = Stage::TRANSFER;
    const RESOURCE_USAGES: ResourceKind = ResourceKind::BUFFER.union(ResourceKind::IMAGE);

    type CreateInfo = CopyBufferToImageInfo;
    type Data = CopyBufferToImageInfo;

    fn populate(create_info: &Self::CreateInfo) -> Self::Data {
        create_info.clone()
    }

    fn build_links(
        resources: &mut ResourceStateTracker,
        links: &mut NodeLinks,
        create_info: &Self::CreateInfo,
    ) {
        links.add_buffer(resources, create_info.src, Self::PIPELINE_STAGE, Access::TRANSFER_READ);
        let aspect = create_info
            .regions
            .iter()
            .fold(ImageAspect::empty(), |a, r| a | r.subresource.aspect);
        links.add_image(
            resources,
            create_info.dst,
            Self::PIPELINE_STAGE,
            Access::TRANSFER_WRITE,
            ImageLayout::TRANSFER_DST_OPTIMAL,
            aspect,
        );
    }

    fn build_commands(cmd: &mut dyn CommandBuffer, data: &Self::Data, _bound: &mut BoundPipelines) {
        cmd.copy_buffer_to_image(data.src, data.dst, &data.regions);
    }
}
