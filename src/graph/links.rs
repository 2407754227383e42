use smallvec::SmallVec;

use crate::cmd::ImageAspect;
use crate::sync::state::{Access, ImageLayout, ResState, Stage};
use crate::sync::tracker::ResourceStateTracker;
use crate::types::{Buffer, Handle, Image, ResourceKind};

/// Whether a declared access reads or writes the resource. A combined
/// read-write access counts as a write for hazard purposes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum UsageKind {
    Read,
    Write,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ResourceRef {
    Buffer(Handle<Buffer>),
    Image(Handle<Image>),
}

/// One declared resource dependency of a node.
///
/// The src/dst state pair is captured at link-extraction time: `src` is what
/// the state tracker returned as the previous access, `dst` is this node's
/// access. The commit pass turns hazardous pairs into barriers without
/// consulting the tracker again.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Link {
    pub resource: ResourceRef,
    pub usage: UsageKind,
    pub kind: ResourceKind,
    /// Image aspects the access touches, taken from the declaration. Empty
    /// for buffers.
    pub aspect: ImageAspect,
    pub src: ResState,
    pub dst: ResState,
}

impl Link {
    /// A barrier is required when the previous access was a write, when this
    /// access writes over an earlier access, or when the image layout
    /// changes. Read-after-read churn and the very first buffer write are not
    /// hazards.
    pub fn requires_barrier(&self) -> bool {
        self.src.is_write()
            || (self.dst.is_write() && self.src != ResState::default())
            || self.src.layout != self.dst.layout
    }
}

/// Append-only collection of a node's declared accesses.
///
/// Duplicate links are harmless (just redundant barriers), so no
/// deduplication happens here.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct NodeLinks {
    links: SmallVec<[Link; 4]>,
}

impl NodeLinks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a buffer access, updating the tracker to this node's state.
    pub fn add_buffer(
        &mut self,
        resources: &mut ResourceStateTracker,
        buffer: Handle<Buffer>,
        stages: Stage,
        access: Access,
    ) {
        let dst = ResState::new(stages, access);
        let src = resources.record_buffer(buffer, dst);
        self.links.push(Link {
            resource: ResourceRef::Buffer(buffer),
            usage: usage_kind(access),
            kind: ResourceKind::BUFFER,
            aspect: ImageAspect::empty(),
            src,
            dst,
        });
    }

    /// Declare an image access, updating the tracker to this node's state.
    pub fn add_image(
        &mut self,
        resources: &mut ResourceStateTracker,
        image: Handle<Image>,
        stages: Stage,
        access: Access,
        layout: ImageLayout,
        aspect: ImageAspect,
    ) {
        let dst = ResState::with_layout(stages, access, layout);
        let src = resources.record_image(image, dst);
        self.links.push(Link {
            resource: ResourceRef::Image(image),
            usage: usage_kind(access),
            kind: ResourceKind::IMAGE,
            aspect,
            src,
            dst,
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &Link> {
        self.links.iter()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

fn usage_kind(access: Access) -> UsageKind {
    if access.is_write() {
        UsageKind::Write
    } else {
        UsageKind::Read
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn links_capture_previous_state() {
        let mut tracker = ResourceStateTracker::new();
        let mut links = NodeLinks::new();
        let buf = Handle::<Buffer>::new(1, 0);

        links.add_buffer(&mut tracker, buf, Stage::TRANSFER, Access::TRANSFER_WRITE);
        links.add_buffer(&mut tracker, buf, Stage::COMPUTE_SHADER, Access::SHADER_READ);

        let all: Vec<_> = links.iter().collect();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].usage, UsageKind::Write);
        assert_eq!(all[0].src, ResState::default());
        assert_eq!(all[1].usage, UsageKind::Read);
        assert_eq!(all[1].src, all[0].dst);
        assert!(all[1].requires_barrier());
    }

    #[test]
    fn read_after_read_needs_no_barrier() {
        let mut tracker = ResourceStateTracker::new();
        let mut links = NodeLinks::new();
        let buf = Handle::<Buffer>::new(1, 0);

        links.add_buffer(&mut tracker, buf, Stage::TRANSFER, Access::TRANSFER_READ);
        links.add_buffer(&mut tracker, buf, Stage::COMPUTE_SHADER, Access::SHADER_READ);

        let all: Vec<_> = links.iter().collect();
        assert!(!all[0].requires_barrier());
        assert!(!all[1].requires_barrier());
    }

    #[test]
    fn image_layout_change_alone_forces_barrier() {
        let mut tracker = ResourceStateTracker::new();
        let mut links = NodeLinks::new();
        let img = Handle::<Image>::new(2, 0);

        links.add_image(
            &mut tracker,
            img,
            Stage::FRAGMENT_SHADER,
            Access::SHADER_READ,
            ImageLayout::SHADER_READ_ONLY_OPTIMAL,
            ImageAspect::COLOR,
        );
        links.add_image(
            &mut tracker,
            img,
            Stage::TRANSFER,
            Access::TRANSFER_READ,
            ImageLayout::TRANSFER_SRC_OPTIMAL,
            ImageAspect::COLOR,
        );

        let all: Vec<_> = links.iter().collect();
        // First use transitions out of the undefined layout.
        assert!(all[0].requires_barrier());
        assert!(all[1].requires_barrier());
    }
}
