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
pub struct CopyImageToBufferInfo {
    pub src: Handle<Image>,
    pub dst: Handle<Buffer>,
    pub regions: SmallVec<[BufferImageCopyRegion; 1]>,
}

pub struct CopyImageToBufferNode;

impl NodeInfo for CopyImageToBufferNode {
    const NODE_TYPE: NodeType = NodeType::CopyImageToBuffer;
    const PIPELINE_STAGE: Stage = Stage::TRANSFER;
    const RESOURCE_USAGES: ResourceKind = ResourceKind::BUFFER.union(ResourceKind::IMAGE);

    type CreateInfo = CopyImageToBufferInfo;
    type Data = CopyImageToBufferInfo;

    fn populate(create_info: &Self::CreateInfo) -> Self::Data {
        create_info.clone()
    }

    fn build_links(
        resources: &mut ResourceStateTracker,
        links: &mut NodeLinks,
        create_info: &Self::CreateInfo,
    ) {
        let aspect = create_info
            .regions
            .iter()
            .fold(ImageAspect::empty(), |a, r| a | r.subresource.aspect);
        links.add_image(
            resources,
            create_info.src,
            Self::PIPELINE_STAGE,
            Access::TRANSFER_READ,
            ImageLayout::TRANSFER_SRC_OPTIMAL,
            aspect,
        );
        links.add_buffer(resources, create_info.dst, Self::PIPELINE_STAGE, Access::TRANSFER_WRITE);
    }

    fn build_commands(cmd: &mut dyn CommandBuffer, data: &Self::Data, _bound: &mut BoundPipelines) {
        cmd.copy_image_to_buffer(data.src, data.dst, &data.regions);
    }
}
