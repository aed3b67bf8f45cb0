//! 图算法模块
//!
//! 遍历、最短路径、最小生成树、最大流和结构分析。每个算法在调用时
//! 对图取一次快照，返回结果和对应的步骤轨迹。

mod bridges;
mod eulerian;
mod max_flow;
mod mst;
mod shortest_path;
mod topological;
mod traversal;
pub mod trace;

use std::cmp::Ordering;

pub use bridges::Bridges;
pub use eulerian::EulerianCircuit;
pub use max_flow::{EdmondsKarp, MaxFlow};
pub use mst::{SpanningTree, SpanningTreeResult};
pub use shortest_path::{PathResult, ShortestPath};
pub use topological::TopologicalSort;
pub use trace::{
    EdgeRole, NodeRole, Payload, Step, Target, Trace, TraceRecorder, Traced, Value, Verdict,
};
pub use traversal::Traversal;

/// 可全序比较的代价，用于优先队列
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Cost(pub(crate) f64);

impl Eq for Cost {}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}
