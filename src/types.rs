use bitflags::bitflags;

pub use crate::utils::handle::Handle;

/// Marker type for buffer handles.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Buffer;

/// Marker type for image handles.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Image;

/// Marker type for pipeline handles.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Pipeline;

/// Marker type for query pool handles.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct QueryPool;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum IndexType {
    U16,
    U32,
}

bitflags! {
    /// Resource categories a node can reference.
    ///
    /// Each node type declares up front which categories it may touch so the
    /// link-extraction pass can skip bookkeeping for the others.
    #[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ResourceKind: u32 {
        const BUFFER = 0x1;
        const IMAGE  = 0x2;
    }
}

impl ResourceKind {
    pub const NONE: Self = Self::empty();
}
