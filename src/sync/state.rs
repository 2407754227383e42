use ash::vk;
use bitflags::bitflags;
use bytemuck::{Pod, Zeroable};

bitflags! {
    #[repr(transparent)]
    #[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Access: u64 {
        const NONE = 0;
        const INDIRECT_COMMAND_READ = vk::AccessFlags2::INDIRECT_COMMAND_READ.as_raw();
        const INDEX_READ = vk::AccessFlags2::INDEX_READ.as_raw();
        const VERTEX_ATTRIBUTE_READ = vk::AccessFlags2::VERTEX_ATTRIBUTE_READ.as_raw();
        const UNIFORM_READ = vk::AccessFlags2::UNIFORM_READ.as_raw();
        const INPUT_ATTACHMENT_READ = vk::AccessFlags2::INPUT_ATTACHMENT_READ.as_raw();
        const SHADER_READ = vk::AccessFlags2::SHADER_READ.as_raw();
        const SHADER_WRITE = vk::AccessFlags2::SHADER_WRITE.as_raw();
        const COLOR_ATTACHMENT_READ = vk::AccessFlags2::COLOR_ATTACHMENT_READ.as_raw();
        const COLOR_ATTACHMENT_WRITE = vk::AccessFlags2::COLOR_ATTACHMENT_WRITE.as_raw();
        const DEPTH_STENCIL_ATTACHMENT_READ = vk::AccessFlags2::DEPTH_STENCIL_ATTACHMENT_READ.as_raw();
        const DEPTH_STENCIL_ATTACHMENT_WRITE = vk::AccessFlags2::DEPTH_STENCIL_ATTACHMENT_WRITE.as_raw();
        const TRANSFER_READ = vk::AccessFlags2::TRANSFER_READ.as_raw();
        const TRANSFER_WRITE = vk::AccessFlags2::TRANSFER_WRITE.as_raw();
        const HOST_READ = vk::AccessFlags2::HOST_READ.as_raw();
        const HOST_WRITE = vk::AccessFlags2::HOST_WRITE.as_raw();
    }
}
unsafe impl Zeroable for Access {}
unsafe impl Pod for Access {}

impl Access {
    /// All access bits that modify memory.
    pub const WRITE_MASK: Self = Self::SHADER_WRITE
        .union(Self::COLOR_ATTACHMENT_WRITE)
        .union(Self::DEPTH_STENCIL_ATTACHMENT_WRITE)
        .union(Self::TRANSFER_WRITE)
        .union(Self::HOST_WRITE);

    pub fn is_write(self) -> bool {
        self.intersects(Self::WRITE_MASK)
    }
}

bitflags! {
    #[repr(transparent)]
    #[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Stage: u64 {
        const TOP_OF_PIPE = vk::PipelineStageFlags2::TOP_OF_PIPE.as_raw();
        const DRAW_INDIRECT = vk::PipelineStageFlags2::DRAW_INDIRECT.as_raw();
        const VERTEX_INPUT = vk::PipelineStageFlags2::VERTEX_INPUT.as_raw();
        const VERTEX_SHADER = vk::PipelineStageFlags2::VERTEX_SHADER.as_raw();
        const FRAGMENT_SHADER = vk::PipelineStageFlags2::FRAGMENT_SHADER.as_raw();
        const COMPUTE_SHADER = vk::PipelineStageFlags2::COMPUTE_SHADER.as_raw();
        const EARLY_FRAGMENT_TESTS = vk::PipelineStageFlags2::EARLY_FRAGMENT_TESTS.as_raw();
        const LATE_FRAGMENT_TESTS = vk::PipelineStageFlags2::LATE_FRAGMENT_TESTS.as_raw();
        const COLOR_ATTACHMENT_OUTPUT = vk::PipelineStageFlags2::COLOR_ATTACHMENT_OUTPUT.as_raw();
        const TRANSFER = vk::PipelineStageFlags2::TRANSFER.as_raw();
        const BOTTOM_OF_PIPE = vk::PipelineStageFlags2::BOTTOM_OF_PIPE.as_raw();
    }
}
unsafe impl Zeroable for Stage {}
unsafe impl Pod for Stage {}

/// Raw image layout, convertible to and from [`vk::ImageLayout`].
#[repr(transparent)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Pod, Zeroable, Default)]
pub struct ImageLayout(pub i32);

impl ImageLayout {
    pub const UNDEFINED: Self = Self(0);
    pub const GENERAL: Self = Self(1);
    pub const COLOR_ATTACHMENT_OPTIMAL: Self = Self(2);
    pub const DEPTH_STENCIL_ATTACHMENT_OPTIMAL: Self = Self(3);
    pub const SHADER_READ_ONLY_OPTIMAL: Self = Self(5);
    pub const TRANSFER_SRC_OPTIMAL: Self = Self(6);
    pub const TRANSFER_DST_OPTIMAL: Self = Self(7);
    pub const PRESENT_SRC: Self = Self(1000001002);
}

impl From<ImageLayout> for vk::ImageLayout {
    fn from(layout: ImageLayout) -> Self {
        vk::ImageLayout::from_raw(layout.0)
    }
}

impl From<vk::ImageLayout> for ImageLayout {
    fn from(layout: vk::ImageLayout) -> Self {
        Self(layout.as_raw())
    }
}

impl From<Access> for vk::AccessFlags2 {
    fn from(access: Access) -> Self {
        vk::AccessFlags2::from_raw(access.bits())
    }
}

impl From<Stage> for vk::PipelineStageFlags2 {
    fn from(stage: Stage) -> Self {
        vk::PipelineStageFlags2::from_raw(stage.bits())
    }
}

/// Last known access of a tracked resource.
///
/// A default value is the "never touched" sentinel: no stages, no access,
/// undefined layout.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct ResState {
    pub access: Access,
    pub stages: Stage,
    pub layout: ImageLayout,
}

impl ResState {
    pub fn new(stages: Stage, access: Access) -> Self {
        Self { access, stages, layout: ImageLayout::UNDEFINED }
    }

    pub fn with_layout(stages: Stage, access: Access, layout: ImageLayout) -> Self {
        Self { access, stages, layout }
    }

    pub fn is_write(&self) -> bool {
        self.access.is_write()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_mask_classification() {
        assert!(Access::TRANSFER_WRITE.is_write());
        assert!((Access::SHADER_READ | Access::SHADER_WRITE).is_write());
        assert!(!Access::TRANSFER_READ.is_write());
        assert!(!Access::NONE.is_write());
    }

    #[test]
    fn layout_round_trips_through_vk() {
        let layout = ImageLayout::TRANSFER_DST_OPTIMAL;
        let vk_layout: vk::ImageLayout = layout.into();
        assert_eq!(vk_layout, vk::ImageLayout::TRANSFER_DST_OPTIMAL);
        assert_eq!(ImageLayout::from(vk_layout), layout);
    }
}
