//! Render graph recording and command emission.
//!
//! Nodes are recorded through the typed `add_*` methods. Creation extracts
//! dependency links against the shared resource state tracker; [`RenderGraph::commit`]
//! replays the nodes in creation order into a [`CommandBuffer`], emitting the
//! barriers the links call for in front of each node.

use log::{debug, trace};

use crate::cmd::{CommandBuffer, RenderingInfo, SubresourceRange};
use crate::sync::barrier::BarrierBatch;
use crate::sync::tracker::ResourceStateTracker;

pub mod links;
pub mod node;
pub mod node_type;
pub mod nodes;

use links::ResourceRef;
use node::{BoundPipelines, Node};
use node_type::NodeType;
use nodes::{
    begin_rendering::BeginRenderingNode,
    blit_image::{BlitImageInfo, BlitImageNode},
    clear_attachments::{ClearAttachmentsInfo, ClearAttachmentsNode},
    clear_color_image::{ClearColorImageInfo, ClearColorImageNode},
    clear_depth_stencil_image::{ClearDepthStencilImageInfo, ClearDepthStencilImageNode},
    copy_buffer::{CopyBufferInfo, CopyBufferNode},
    copy_buffer_to_image::{CopyBufferToImageInfo, CopyBufferToImageNode},
    copy_image::{CopyImageInfo, CopyImageNode},
    copy_image_to_buffer::{CopyImageToBufferInfo, CopyImageToBufferNode},
    dispatch::{DispatchInfo, DispatchNode},
    dispatch_indirect::{DispatchIndirectInfo, DispatchIndirectNode},
    draw::{DrawInfo, DrawNode},
    draw_indexed::{DrawIndexedInfo, DrawIndexedNode},
    draw_indexed_indirect::{DrawIndexedIndirectInfo, DrawIndexedIndirectNode},
    draw_indirect::{DrawIndirectInfo, DrawIndirectNode},
    end_rendering::{EndRenderingInfo, EndRenderingNode},
    fill_buffer::{FillBufferInfo, FillBufferNode},
    query::{
        BeginQueryInfo, BeginQueryNode, EndQueryInfo, EndQueryNode, ResetQueryPoolInfo,
        ResetQueryPoolNode,
    },
    synchronization::{SynchronizationInfo, SynchronizationNode},
    update_buffer::{UpdateBufferInfo, UpdateBufferNode},
    update_mipmaps::{UpdateMipmapsInfo, UpdateMipmapsNode},
    NodeInfo,
};

/// Ordered collection of recorded nodes plus the resource state tracker they
/// were linked against.
///
/// Recording and committing are strictly single-threaded; the graph hands out
/// no interior mutability.
#[derive(Default)]
pub struct RenderGraph {
    resources: ResourceStateTracker,
    nodes: Vec<Node>,
}

impl RenderGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn push<N: NodeInfo>(&mut self, create_info: &N::CreateInfo) {
        let mut links = links::NodeLinks::new();
        N::build_links(&mut self.resources, &mut links, create_info);
        debug_assert!(
            links.iter().all(|link| N::RESOURCE_USAGES.contains(link.kind)),
            "{} declared a link outside its resource categories",
            N::NODE_TYPE
        );
        let data = N::populate(create_info);
        trace!("add node {} ({} links)", N::NODE_TYPE, links.len());
        self.nodes.push(Node { node_type: N::NODE_TYPE, data: data.into(), links });
    }

    pub fn add_begin_rendering(&mut self, info: RenderingInfo) {
        self.push::<BeginRenderingNode>(&info);
    }

    pub fn add_end_rendering(&mut self) {
        self.push::<EndRenderingNode>(&EndRenderingInfo);
    }

    pub fn add_clear_attachments(&mut self, info: ClearAttachmentsInfo) {
        self.push::<ClearAttachmentsNode>(&info);
    }

    pub fn add_clear_color_image(&mut self, info: ClearColorImageInfo) {
        self.push::<ClearColorImageNode>(&info);
    }

    pub fn add_clear_depth_stencil_image(&mut self, info: ClearDepthStencilImageInfo) {
        self.push::<ClearDepthStencilImageNode>(&info);
    }

    pub fn add_copy_buffer(&mut self, info: CopyBufferInfo) {
        self.push::<CopyBufferNode>(&info);
    }

    pub fn add_copy_image(&mut self, info: CopyImageInfo) {
        self.push::<CopyImageNode>(&info);
    }

    pub fn add_copy_buffer_to_image(&mut self, info: CopyBufferToImageInfo) {
        self.push::<CopyBufferToImageNode>(&info);
    }

    pub fn add_copy_image_to_buffer(&mut self, info: CopyImageToBufferInfo) {
        self.push::<CopyImageToBufferNode>(&info);
    }

    pub fn add_blit_image(&mut self, info: BlitImageInfo) {
        self.push::<BlitImageNode>(&info);
    }

    pub fn add_fill_buffer(&mut self, info: FillBufferInfo) {
        self.push::<FillBufferNode>(&info);
    }

    pub fn add_update_buffer(&mut self, info: UpdateBufferInfo) {
        self.push::<UpdateBufferNode>(&info);
    }

    pub fn add_draw(&mut self, info: DrawInfo) {
        self.push::<DrawNode>(&info);
    }

    pub fn add_draw_indexed(&mut self, info: DrawIndexedInfo) {
        self.push::<DrawIndexedNode>(&info);
    }

    pub fn add_draw_indirect(&mut self, info: DrawIndirectInfo) {
        self.push::<DrawIndirectNode>(&info);
    }

    pub fn add_draw_indexed_indirect(&mut self, info: DrawIndexedIndirectInfo) {
        self.push::<DrawIndexedIndirectNode>(&info);
    }

    pub fn add_dispatch(&mut self, info: DispatchInfo) {
        self.push::<DispatchNode>(&info);
    }

    pub fn add_dispatch_indirect(&mut self, info: DispatchIndirectInfo) {
        self.push::<DispatchIndirectNode>(&info);
    }

    pub fn add_begin_query(&mut self, info: BeginQueryInfo) {
        self.push::<BeginQueryNode>(&info);
    }

    pub fn add_end_query(&mut self, info: EndQueryInfo) {
        self.push::<EndQueryNode>(&info);
    }

    pub fn add_reset_query_pool(&mut self, info: ResetQueryPoolInfo) {
        self.push::<ResetQueryPoolNode>(&info);
    }

    pub fn add_synchronization(&mut self, info: SynchronizationInfo) {
        self.push::<SynchronizationNode>(&info);
    }

    pub fn add_update_mipmaps(&mut self, info: UpdateMipmapsInfo) {
        self.push::<UpdateMipmapsNode>(&info);
    }

    /// Replay all recorded nodes into the command buffer in creation order.
    ///
    /// Every hazard was resolved at creation time, so committing does not
    /// touch the tracker and the same graph can be committed repeatedly with
    /// identical results. Barriers cannot be recorded inside a rendering
    /// instance, so the barriers of every node within a begin/end pair are
    /// hoisted into one flush in front of the begin.
    ///
    /// Panics if the node order violates rendering scoping: a within-scope
    /// node outside a scope, a begin inside a scope, an end without one, or a
    /// scope left open at the end.
    pub fn commit(&self, cmd: &mut dyn CommandBuffer) {
        let mut scope = RenderingScope::default();
        let mut bound = BoundPipelines::default();
        let mut batch = BarrierBatch::new();

        debug!("commit {} nodes", self.nodes.len());
        for (index, node) in self.nodes.iter().enumerate() {
            let was_inside = scope.inside;
            scope.transition(node.node_type);
            if node.node_type == NodeType::BeginRendering {
                for scoped in &self.nodes[index..] {
                    batch_node_barriers(&mut batch, scoped);
                    if scoped.node_type == NodeType::EndRendering {
                        break;
                    }
                }
                batch.flush(cmd);
            } else if !was_inside {
                batch_node_barriers(&mut batch, node);
                batch.flush(cmd);
            }
            node.build_commands(cmd, &mut bound);
        }
        scope.finish();
    }

    /// Clear all nodes and access history so the graph can be re-recorded.
    pub fn reset(&mut self) {
        debug!("reset graph, dropping {} nodes", self.nodes.len());
        self.nodes.clear();
        self.resources.reset();
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Whole-resource barrier granularity; the aspect comes from the link's
/// declaration.
fn batch_node_barriers(batch: &mut BarrierBatch, node: &Node) {
    for link in node.links.iter() {
        if !link.requires_barrier() {
            continue;
        }
        match link.resource {
            ResourceRef::Buffer(buffer) => batch.buffer(buffer, link.src, link.dst),
            ResourceRef::Image(image) => {
                batch.image(image, link.src, link.dst, SubresourceRange::full(link.aspect))
            }
        }
    }
}

/// Tracks whether command emission is inside a begin/end rendering pair.
/// Ordering violations are programming errors and abort.
#[derive(Default)]
struct RenderingScope {
    inside: bool,
}

impl RenderingScope {
    fn transition(&mut self, node_type: NodeType) {
        match node_type {
            NodeType::BeginRendering => {
                assert!(!self.inside, "BEGIN_RENDERING inside an open rendering scope");
                self.inside = true;
            }
            NodeType::EndRendering => {
                assert!(self.inside, "END_RENDERING without an open rendering scope");
                self.inside = false;
            }
            other if other.is_within_rendering() => {
                assert!(self.inside, "{other} outside a rendering scope");
            }
            _ => {}
        }
    }

    fn finish(self) {
        assert!(!self.inside, "rendering scope left open at end of graph");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::recorder::{CommandRecorder, TraceCmd};
    use crate::sync::state::{Access, Stage};
    use crate::types::{Buffer, Handle};

    #[test]
    fn push_extracts_links_in_creation_order() {
        let mut graph = RenderGraph::new();
        let buf = Handle::<Buffer>::new(1, 0);
        graph.add_fill_buffer(FillBufferInfo { buffer: buf, offset: 0, size: 256, data: 0 });
        graph.add_fill_buffer(FillBufferInfo { buffer: buf, offset: 0, size: 256, data: 1 });

        assert_eq!(graph.len(), 2);
        let second_links: Vec<_> = graph.nodes()[1].links.iter().collect();
        assert_eq!(
            second_links[0].src,
            crate::sync::state::ResState::new(Stage::TRANSFER, Access::TRANSFER_WRITE)
        );
    }

    #[test]
    fn reset_allows_rerecording_from_scratch() {
        let mut graph = RenderGraph::new();
        let buf = Handle::<Buffer>::new(1, 0);
        graph.add_fill_buffer(FillBufferInfo { buffer: buf, offset: 0, size: 64, data: 7 });
        graph.reset();
        assert!(graph.is_empty());

        graph.add_fill_buffer(FillBufferInfo { buffer: buf, offset: 0, size: 64, data: 7 });
        let mut recorder = CommandRecorder::new();
        graph.commit(&mut recorder);
        // No stale history, so the first write needs no barrier.
        assert!(matches!(recorder.trace()[0], TraceCmd::FillBuffer { .. }));
    }

    #[test]
    #[should_panic(expected = "END_RENDERING without an open rendering scope")]
    fn unbalanced_end_rendering_panics() {
        let mut graph = RenderGraph::new();
        graph.add_end_rendering();
        let mut recorder = CommandRecorder::new();
        graph.commit(&mut recorder);
    }

    #[test]
    #[should_panic(expected = "rendering scope left open")]
    fn open_scope_at_end_panics() {
        let mut graph = RenderGraph::new();
        graph.add_begin_rendering(RenderingInfo {
            area: Default::default(),
            colors: Default::default(),
            depth: None,
        });
        let mut recorder = CommandRecorder::new();
        graph.commit(&mut recorder);
    }
}
