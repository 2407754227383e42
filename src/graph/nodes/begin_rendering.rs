use crate::cmd::{CommandBuffer, ImageAspect, LoadOp, RenderingInfo};
use crate::graph::links::NodeLinks;
use crate::graph::node::BoundPipelines;
use crate::graph::node_type::NodeType;
use crate::graph::nodes::NodeInfo;
use crate::sync::state::{Access, ImageLayout, Stage};
use crate::sync::tracker::ResourceStateTracker;
use crate::types::ResourceKind;

/// Opens a rendering scope over the declared attachments.
///
/// Attachment accesses are linked here, once, for the whole scope; nodes
/// inside the scope do not re-declare them.
pub struct BeginRenderingNode;

impl NodeInfo for BeginRenderingNode {
    const NODE_TYPE: NodeType = NodeType::BeginRendering;
    const PIPELINE_STAGE: Stage = Stage::COLOR_ATTACHMENT_OUTPUT;
    const RESOURCE_USAGES: ResourceKind = ResourceKind::IMAGE;

    type CreateInfo = RenderingInfo;
    type Data = RenderingInfo;

    fn populate(create_info: &Self::CreateInfo) -> Self::Data {
        create_info.clone()
    }

    fn build_links(
        resources: &mut ResourceStateTracker,
        links: &mut NodeLinks,
        create_info: &Self::CreateInfo,
    ) {
        for color in &create_info.colors {
            let mut access = Access::COLOR_ATTACHMENT_WRITE;
            if color.load == LoadOp::Load {
                access |= Access::COLOR_ATTACHMENT_READ;
            }
            links.add_image(
                resources,
                color.image,
                Stage::COLOR_ATTACHMENT_OUTPUT,
                access,
                ImageLayout::COLOR_ATTACHMENT_OPTIMAL,
                ImageAspect::COLOR,
            );
        }
        if let Some(depth) = &create_info.depth {
            let mut access = Access::DEPTH_STENCIL_ATTACHMENT_WRITE;
            if depth.load == LoadOp::Load {
                access |= Access::DEPTH_STENCIL_ATTACHMENT_READ;
            }
            links.add_image(
                resources,
                depth.image,
                Stage::EARLY_FRAGMENT_TESTS.union(Stage::LATE_FRAGMENT_TESTS),
                access,
                ImageLayout::DEPTH_STENCIL_ATTACHMENT_OPTIMAL,
                depth.aspect,
            );
        }
    }

    fn build_commands(cmd: &mut dyn CommandBuffer, data: &Self::Data, _bound: &mut BoundPipelines) {
        cmd.begin_rendering(data);
    }
}
