use std::fmt;

/// Type of nodes of the render graph.
///
/// `Unused` is the sentinel for uninitialized or recycled slots and never
/// appears in a live, submitted node.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum NodeType {
    Unused,
    BeginQuery,
    BeginRendering,
    BlitImage,
    ClearAttachments,
    ClearColorImage,
    ClearDepthStencilImage,
    CopyBuffer,
    CopyImage,
    CopyImageToBuffer,
    CopyBufferToImage,
    Dispatch,
    DispatchIndirect,
    Draw,
    DrawIndexed,
    DrawIndexedIndirect,
    DrawIndirect,
    EndQuery,
    EndRendering,
    FillBuffer,
    ResetQueryPool,
    Synchronization,
    UpdateBuffer,
    UpdateMipmaps,
}

impl NodeType {
    /// Node types only valid between a begin-rendering and end-rendering
    /// node.
    pub fn is_within_rendering(self) -> bool {
        matches!(
            self,
            NodeType::ClearAttachments
                | NodeType::Draw
                | NodeType::DrawIndexed
                | NodeType::DrawIndexedIndirect
                | NodeType::DrawIndirect
        )
    }

    /// Node types that are a rendering-scope boundary or live within one.
    pub fn is_rendering(self) -> bool {
        matches!(self, NodeType::BeginRendering | NodeType::EndRendering)
            || self.is_within_rendering()
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeType::Unused => "UNUSED",
            NodeType::BeginQuery => "BEGIN_QUERY",
            NodeType::BeginRendering => "BEGIN_RENDERING",
            NodeType::BlitImage => "BLIT_IMAGE",
            NodeType::ClearAttachments => "CLEAR_ATTACHMENTS",
            NodeType::ClearColorImage => "CLEAR_COLOR_IMAGE",
            NodeType::ClearDepthStencilImage => "CLEAR_DEPTH_STENCIL_IMAGE",
            NodeType::CopyBuffer => "COPY_BUFFER",
            NodeType::CopyImage => "COPY_IMAGE",
            NodeType::CopyImageToBuffer => "COPY_IMAGE_TO_BUFFER",
            NodeType::CopyBufferToImage => "COPY_BUFFER_TO_IMAGE",
            NodeType::Dispatch => "DISPATCH",
            NodeType::DispatchIndirect => "DISPATCH_INDIRECT",
            NodeType::Draw => "DRAW",
            NodeType::DrawIndexed => "DRAW_INDEXED",
            NodeType::DrawIndexedIndirect => "DRAW_INDEXED_INDIRECT",
            NodeType::DrawIndirect => "DRAW_INDIRECT",
            NodeType::EndQuery => "END_QUERY",
            NodeType::EndRendering => "END_RENDERING",
            NodeType::FillBuffer => "FILL_BUFFER",
            NodeType::ResetQueryPool => "RESET_QUERY_POOL",
            NodeType::Synchronization => "SYNCHRONIZATION",
            NodeType::UpdateBuffer => "UPDATE_BUFFER",
            NodeType::UpdateMipmaps => "UPDATE_MIPMAPS",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_predicates() {
        assert!(NodeType::Draw.is_within_rendering());
        assert!(NodeType::ClearAttachments.is_within_rendering());
        assert!(!NodeType::BeginRendering.is_within_rendering());
        assert!(NodeType::BeginRendering.is_rendering());
        assert!(NodeType::EndRendering.is_rendering());
        assert!(NodeType::DrawIndexedIndirect.is_rendering());
        assert!(!NodeType::CopyBuffer.is_rendering());
        assert!(!NodeType::Dispatch.is_rendering());
    }

    #[test]
    fn display_names_are_stable() {
        assert_eq!(NodeType::CopyBuffer.to_string(), "COPY_BUFFER");
        assert_eq!(NodeType::DrawIndexedIndirect.to_string(), "DRAW_INDEXED_INDIRECT");
        assert_eq!(NodeType::UpdateMipmaps.to_string(), "UPDATE_MIPMAPS");
        assert_eq!(NodeType::Unused.to_string(), "UNUSED");
    }
}
