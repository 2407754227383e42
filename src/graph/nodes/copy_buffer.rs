use smallvec::SmallVec;

use crate::cmd::{BufferCopyRegion, CommandBuffer};
use crate::graph::links::NodeLinks;
use crate::graph::node::BoundPipelines;
use crate::graph::node_type::NodeType;
use crate::graph::nodes::NodeInfo;
use crate::sync::state::{Access, Stage};
use crate::sync::tracker::ResourceStateTracker;
use crate::types::{Buffer, Handle, ResourceKind};

#[derive(Debug, Clone, PartialEq)]
pub struct CopyBufferInfo {
    pub src: Handle<Buffer>,
    pub dst: Handle<Buffer>,
    pub regions: SmallVec<[BufferCopyRegion; 1]>,
}

pub struct CopyBufferNode;

impl NodeInfo for CopyBufferNode {
    const NODE_TYPE: NodeType = NodeType::CopyBuffer;
    const PIPELINE_STAGE: Stage = Stage::TRANSFER;
    const RESOURCE_USAGES: ResourceKind = ResourceKind::BUFFER;

    type CreateInfo = CopyBufferInfo;
    type Data = CopyBufferInfo;

    fn populate(create_info: &Self::CreateInfo) -> Self::Data {
        create_info.clone()
    }

    fn build_links(
        resources: &mut ResourceStateTracker,
        links: &mut NodeLinks,
        create_info: &Self::CreateInfo,
    ) {
        links.add_buffer(resources, create_info.src, Self::PIPELINE_STAGE, Access::TRANSFER_READ);
        links.add_buffer(resources, create_info.dst, Self::PIPELINE_STAGE, Access::TRANSFER_WRITE);
    }

    fn build_commands(cmd: &mut dyn CommandBuffer, data: &Self::Data, _bound: &mut BoundPipelines) {
        cmd.copy_buffer(data.src, data.dst, &data.regions);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::links::{ResourceRef, UsageKind};
    use crate::sync::state::ResState;

    #[test]
    fn links_are_read_src_write_dst() {
        let mut tracker = ResourceStateTracker::new();
        let mut links = NodeLinks::new();
        let src = Handle::<Buffer>::new(1, 0);
        let dst = Handle::<Buffer>::new(2, 0);
        let info = CopyBufferInfo {
            src,
            dst,
            regions: SmallVec::from_slice(&[BufferCopyRegion { src_offset: 0, dst_offset: 0, size: 256 }]),
        };

        CopyBufferNode::build_links(&mut tracker, &mut links, &info);

        let all: Vec<_> = links.iter().collect();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].resource, ResourceRef::Buffer(src));
        assert_eq!(all[0].usage, UsageKind::Read);
        assert_eq!(all[0].kind, ResourceKind::BUFFER);
        assert_eq!(all[1].resource, ResourceRef::Buffer(dst));
        assert_eq!(all[1].usage, UsageKind::Write);
        assert_eq!(all[1].kind, ResourceKind::BUFFER);
        assert_eq!(
            tracker.buffer_state(dst),
            Some(ResState::new(Stage::TRANSFER, Access::TRANSFER_WRITE))
        );
    }

    #[test]
    fn populate_is_idempotent() {
        let info = CopyBufferInfo {
            src: Handle::new(1, 0),
            dst: Handle::new(2, 0),
            regions: SmallVec::from_slice(&[BufferCopyRegion { src_offset: 8, dst_offset: 0, size: 64 }]),
        };
        let first = CopyBufferNode::populate(&info);
        let second = CopyBufferNode::populate(&info);
        assert_eq!(first, second);
    }
}
