use crate::cmd::{
    CommandBuffer, Extent3d, Filter, ImageAspect, ImageBarrier, ImageBlitRegion, Offset3d,
    SubresourceLayers, SubresourceRange,
};
use crate::graph::links::NodeLinks;
use crate::graph::node::BoundPipelines;
use crate::graph::node_type::NodeType;
use crate::graph::nodes::NodeInfo;
use crate::sync::state::{Access, ImageLayout, ResState, Stage};
use crate::sync::tracker::ResourceStateTracker;
use crate::types::{Handle, Image, ResourceKind};

/// Regenerates the full mip chain of an image by blitting each level from the
/// one above it. The image stays in `GENERAL` layout throughout; the
/// per-level write-to-read transitions between blits are internal to this
/// node and emitted by it directly, since they fall between commands of a
/// single node and the graph only places barriers between nodes.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct UpdateMipmapsInfo {
    pub image: Handle<Image>,
    pub mip_levels: u32,
    pub layer_count: u32,
    pub extent: Extent3d,
}

pub struct UpdateMipmapsNode;

impl NodeInfo for UpdateMipmapsNode {
    const NODE_TYPE: NodeType = NodeType::UpdateMipmaps;
    const PIPELINE_STAGE: Stage = Stage::TRANSFER;
    const RESOURCE_USAGES: ResourceKind = ResourceKind::IMAGE;

    type CreateInfo = UpdateMipmapsInfo;
    type Data = UpdateMipmapsInfo;

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
            Self::PIPELINE_STAGE,
            Access::TRANSFER_READ | Access::TRANSFER_WRITE,
            ImageLayout::GENERAL,
            ImageAspect::COLOR,
        );
    }

    fn build_commands(cmd: &mut dyn CommandBuffer, data: &Self::Data, _bound: &mut BoundPipelines) {
        let mut src_extent = data.extent;
        for level in 1..data.mip_levels {
            let barrier = ImageBarrier {
                image: data.image,
                src: ResState::with_layout(
                    Stage::TRANSFER,
                    Access::TRANSFER_WRITE,
                    ImageLayout::GENERAL,
                ),
                dst: ResState::with_layout(
                    Stage::TRANSFER,
                    Access::TRANSFER_READ,
                    ImageLayout::GENERAL,
                ),
                range: SubresourceRange::new(ImageAspect::COLOR, level - 1, 1, 0, data.layer_count),
            };
            cmd.pipeline_barrier(&[], &[barrier]);

            let dst_extent = half_extent(src_extent);
            let region = ImageBlitRegion {
                src_subresource: SubresourceLayers {
                    aspect: ImageAspect::COLOR,
                    mip_level: level - 1,
                    base_layer: 0,
                    layer_count: data.layer_count,
                },
                src_offsets: [Offset3d::default(), extent_offset(src_extent)],
                dst_subresource: SubresourceLayers {
                    aspect: ImageAspect::COLOR,
                    mip_level: level,
                    base_layer: 0,
                    layer_count: data.layer_count,
                },
                dst_offsets: [Offset3d::default(), extent_offset(dst_extent)],
            };
            cmd.blit_image(
                data.image,
                ImageLayout::GENERAL,
                data.image,
                ImageLayout::GENERAL,
                &[region],
                Filter::Linear,
            );
            src_extent = dst_extent;
        }
    }
}

fn half_extent(extent: Extent3d) -> Extent3d {
    Extent3d {
        width: (extent.width / 2).max(1),
        height: (extent.height / 2).max(1),
        depth: (extent.depth / 2).max(1),
    }
}

fn extent_offset(extent: Extent3d) -> Offset3d {
    Offset3d { x: extent.width as i32, y: extent.height as i32, z: extent.depth as i32 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::recorder::{CommandRecorder, TraceCmd};
    use crate::graph::node::BoundPipelines;

    #[test]
    fn blits_one_level_per_mip() {
        let info = UpdateMipmapsInfo {
            image: Handle::new(0, 0),
            mip_levels: 3,
            layer_count: 1,
            extent: Extent3d { width: 8, height: 8, depth: 1 },
        };
        let mut recorder = CommandRecorder::default();
        let mut bound = BoundPipelines::default();
        UpdateMipmapsNode::build_commands(&mut recorder, &info, &mut bound);

        let blits: Vec<_> = recorder
            .trace()
            .iter()
            .filter(|c| matches!(c, TraceCmd::BlitImage { .. }))
            .collect();
        assert_eq!(blits.len(), 2);
        // 8x8 -> 4x4 -> 2x2, one barrier before each blit
        let barriers = recorder
            .trace()
            .iter()
            .filter(|c| matches!(c, TraceCmd::PipelineBarrier { .. }))
            .count();
        assert_eq!(barriers, 2);
    }

    #[test]
    fn extent_clamps_at_one() {
        let e = half_extent(Extent3d { width: 1, height: 4, depth: 1 });
        assert_eq!(e, Extent3d { width: 1, height: 2, depth: 1 });
    }
}
