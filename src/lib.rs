//! Render graph node kernel over Vulkan.
//!
//! Work is recorded as typed nodes on a [`graph::RenderGraph`]. Creating a
//! node extracts its resource dependencies against a state tracker, so
//! hazards are resolved once, up front; committing the graph replays the
//! nodes into any [`cmd::CommandBuffer`] backend, interleaving the pipeline
//! barriers those dependencies call for.
//!
//! Two backends ship with the crate: [`cmd::vk::VkCommandBuffer`] records
//! into a real `ash` command buffer, [`cmd::recorder::CommandRecorder`]
//! captures a comparable command trace and needs no device, which is how the
//! test suite asserts exact command sequences.
//!
//! Recording and committing a graph is single-threaded by construction:
//! nothing here is `Sync`, and one graph owns its tracker outright. Run one
//! graph per thread if parallel recording is needed.

pub mod cmd;
pub mod graph;
pub mod sync;
pub mod types;
pub mod utils;

pub use cmd::{recorder::CommandRecorder, vk::VkCommandBuffer, CommandBuffer};
pub use graph::{node::NodeData, node_type::NodeType, RenderGraph};
pub use sync::state::{Access, ImageLayout, ResState, Stage};
pub use types::{Buffer, Handle, Image, IndexType, Pipeline, QueryPool, ResourceKind};
