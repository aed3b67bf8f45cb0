//! 图遍历
//!
//! 广度优先与深度优先遍历，边按无向解释

use super::trace::{EdgeRole, NodeRole, Payload, TraceRecorder, Traced};
use crate::error::{Error, Result};
use crate::graph::{Adjacency, AttrSelector, Direction, Graph, VertexId};
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use tracing::debug;

/// 遍历器
pub struct Traversal {
    graph: Arc<Graph>,
}

impl Traversal {
    pub fn new(graph: Arc<Graph>) -> Self {
        Self { graph }
    }

    /// 广度优先遍历
    ///
    /// 顶点入队时即标记为已访问，平行边不会导致重复入队。
    /// 返回从 `start` 可达的顶点，按出队顺序。
    #[tracing::instrument(skip(self), fields(start = %start))]
    pub fn bfs(&self, start: VertexId) -> Result<Traced<Vec<VertexId>>> {
        let snapshot = self.graph.snapshot();
        if !snapshot.contains(start) {
            return Err(Error::UnknownStart(start));
        }
        let adj = Adjacency::build(&snapshot, Direction::Undirected, AttrSelector::Unit);

        let mut rec = TraceRecorder::new();
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        let mut order = Vec::new();

        visited.insert(start);
        queue.push_back(start);
        rec.visit(start, NodeRole::Tentative);

        while let Some(u) = queue.pop_front() {
            order.push(u);
            rec.visit(u, NodeRole::Confirmed);

            for n in adj.neighbors(u) {
                if visited.insert(n.vertex) {
                    rec.select(n.edge, EdgeRole::Accepted);
                    rec.visit(n.vertex, NodeRole::Tentative);
                    queue.push_back(n.vertex);
                }
            }
        }

        debug!(visited = order.len(), "bfs finished");
        let trace = rec.finish(Payload::Order(order.clone()));
        Ok(Traced::new(order, trace))
    }

    /// 深度优先遍历（先序）
    ///
    /// 用显式栈模拟递归，访问顺序与递归版本一致。
    #[tracing::instrument(skip(self), fields(start = %start))]
    pub fn dfs(&self, start: VertexId) -> Result<Traced<Vec<VertexId>>> {
        let snapshot = self.graph.snapshot();
        if !snapshot.contains(start) {
            return Err(Error::UnknownStart(start));
        }
        let adj = Adjacency::build(&snapshot, Direction::Undirected, AttrSelector::Unit);

        let mut rec = TraceRecorder::new();
        let mut visited = HashSet::new();
        let mut order = Vec::new();
        // (顶点, 下一个待检查的邻居下标)
        let mut stack: Vec<(VertexId, usize)> = vec![(start, 0)];

        visited.insert(start);
        order.push(start);
        rec.visit(start, NodeRole::Confirmed);

        while let Some(frame) = stack.last_mut() {
            let (u, idx) = *frame;
            let neighbors = adj.neighbors(u);
            if idx >= neighbors.len() {
                stack.pop();
                continue;
            }
            frame.1 += 1;

            let n = neighbors[idx];
            if visited.insert(n.vertex) {
                rec.select(n.edge, EdgeRole::Accepted);
                rec.visit(n.vertex, NodeRole::Confirmed);
                order.push(n.vertex);
                stack.push((n.vertex, 0));
            }
        }

        debug!(visited = order.len(), "dfs finished");
        let trace = rec.finish(Payload::Order(order.clone()));
        Ok(Traced::new(order, trace))
    }
}
