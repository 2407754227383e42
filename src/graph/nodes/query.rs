//! Query nodes. Query pools sit outside hazard tracking, so none of these
//! declare links; they exist as nodes so query commands keep their place in
//! the recorded order.

use crate::cmd::CommandBuffer;
use crate::graph::links::NodeLinks;
use crate::graph::node::BoundPipelines;
use crate::graph::node_type::NodeType;
use crate::graph::nodes::NodeInfo;
use crate::sync::state::Stage;
use crate::sync::tracker::ResourceStateTracker;
use crate::types::{Handle, QueryPool, ResourceKind};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BeginQueryInfo {
    pub pool: Handle<QueryPool>,
    pub query: u32,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EndQueryInfo {
    pub pool: Handle<QueryPool>,
    pub query: u32,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ResetQueryPoolInfo {
    pub pool: Handle<QueryPool>,
    pub first_query: u32,
    pub query_count: u32,
}

pub struct BeginQueryNode;

impl NodeInfo for BeginQueryNode {
    const NODE_TYPE: NodeType = NodeType::BeginQuery;
    const PIPELINE_STAGE: Stage = Stage::TOP_OF_PIPE;
    const RESOURCE_USAGES: ResourceKind = ResourceKind::NONE;

    type CreateInfo = BeginQueryInfo;
    type Data = BeginQueryInfo;

    fn populate(create_info: &Self::CreateInfo) -> Self::Data {
        *create_info
    }

    fn build_links(
        _resources: &mut ResourceStateTracker,
        _links: &mut NodeLinks,
        _create_info: &Self::CreateInfo,
    ) {
    }

    fn build_commands(cmd: &mut dyn CommandBuffer, data: &Self::Data, _bound: &mut BoundPipelines) {
        cmd.begin_query(data.pool, data.query);
    }
}

pub struct EndQueryNode;

impl NodeInfo for EndQueryNode {
    const NODE_TYPE: NodeType = NodeType::EndQuery;
    const PIPELINE_STAGE: Stage = Stage::BOTTOM_OF_PIPE;
    const RESOURCE_USAGES: ResourceKind = ResourceKind::NONE;

    type CreateInfo = EndQueryInfo;
    type Data = EndQueryInfo;

    fn populate(create_info: &Self::CreateInfo) -> Self::Data {
        *create_info
    }

    fn build_links(
        _resources: &mut ResourceStateTracker,
        _links: &mut NodeLinks,
        _create_info: &Self::CreateInfo,
    ) {
    }

    fn build_commands(cmd: &mut dyn CommandBuffer, data: &Self::Data, _bound: &mut BoundPipelines) {
        cmd.end_query(data.pool, data.query);
    }
}

pub struct ResetQueryPoolNode;

impl NodeInfo for ResetQueryPoolNode {
    const NODE_TYPE: NodeType = NodeType::ResetQueryPool;
    const PIPELINE_STAGE: Stage = Stage::TOP_OF_PIPE;
    const RESOURCE_USAGES: ResourceKind = ResourceKind::NONE;

    type CreateInfo = ResetQueryPoolInfo;
    type Data = ResetQueryPoolInfo;

    fn populate(create_info: &Self::CreateInfo) -> Self::Data {
        *create_info
    }

    fn build_links(
        _resources: &mut ResourceStateTracker,
        _links: &mut NodeLinks,
        _create_info: &Self::CreateInfo,
    ) {
    }

    fn build_commands(cmd: &mut dyn CommandBuffer, data: &Self::Data, _bound: &mut BoundPipelines) {
        cmd.reset_query_pool(data.pool, data.first_query, data.query_count);
    }
}
