use crate::cmd::{CommandBuffer, ImageAspect};
use crate::graph::links::NodeLinks;
use crate::graph::node::BoundPipelines;
use crate::graph::node_type::NodeType;
use crate::graph::nodes::NodeInfo;
use crate::sync::state::{Access, ImageLayout, Stage};
use crate::sync::tracker::ResourceStateTracker;
use crate::types::{Handle, Image, ResourceKind};

/// Forces an image into a specific state without emitting a command of its
/// own. Used to hand resources over to consumers outside the graph, for
/// example transitioning a swapchain image for present. The barrier itself is
/// produced by the graph from this node's link.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SynchronizationInfo {
    pub image: Handle<Image>,
    pub stages: Stage,
    pub access: Access,
    pub layout: ImageLayout,
    pub aspect: ImageAspect,
}

pub struct SynchronizationNode;

impl NodeInfo for SynchronizationNode {
    const NODE_TYPE: NodeType = NodeType::Synchronization;
    const PIPELINE_STAGE: Stage = Stage::BOTTOM_OF_PIPE;
    const RESOURCE_USAGES: ResourceKind = ResourceKind::IMAGE;

    type CreateInfo = SynchronizationInfo;
    type Data = SynchronizationInfo;

    fn populate(create_info: &Self::CreateInfo) -> Self::Data {
        *create_info
    }

    fn build_links(
        resources: &mut ResourceStateTracker,
        links: &mut NodeLinks,
        create_info: &Self::CreateInfo,
    ) {
        links.add_image(
            resources,
            create_info.image,
            create_info.stages,
            create_info.access,
            create_info.layout,
            create_info.aspect,
        );
    }

    fn build_commands(_cmd: &mut dyn CommandBuffer, _data: &Self::Data, _bound: &mut BoundPipelines) {}
}
