//! 拓扑排序
//!
//! 三色 DFS（未访问 / 进行中 / 已完成），显式栈实现。
//! 仅对有向模式定义；遇到进行中的顶点即判定有环。

use super::trace::{NodeRole, Payload, Target, TraceRecorder, Traced, Value, Verdict};
use crate::error::Result;
use crate::graph::{Adjacency, AttrSelector, Direction, Graph, VertexId};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    /// 进行中
    Gray,
    /// 已完成
    Black,
}

/// 拓扑排序器
pub struct TopologicalSort {
    graph: Arc<Graph>,
}

impl TopologicalSort {
    pub fn new(graph: Arc<Graph>) -> Self {
        Self { graph }
    }

    /// 计算拓扑序
    ///
    /// 成功时返回 DFS 完成顺序的逆序；有环时返回 `None`，不给出部分顺序。
    /// 无向图返回 [`crate::Error::ModeMismatch`]。
    #[tracing::instrument(skip(self))]
    pub fn sort(&self) -> Result<Traced<Option<Vec<VertexId>>>> {
        let snapshot = self.graph.snapshot();
        snapshot.require_directed("directed")?;
        let adj = Adjacency::build(&snapshot, Direction::Directed, AttrSelector::Unit);

        let mut rec = TraceRecorder::new();
        let mut color: HashMap<VertexId, Color> = HashMap::with_capacity(adj.len());
        let mut finished: Vec<VertexId> = Vec::with_capacity(adj.len());

        for root in adj.vertices() {
            if color.contains_key(&root) {
                continue;
            }

            color.insert(root, Color::Gray);
            rec.visit(root, NodeRole::Tentative);
            // (顶点, 下一个待检查的出边下标)
            let mut stack: Vec<(VertexId, usize)> = vec![(root, 0)];

            while let Some((u, next)) = stack.last_mut() {
                let u = *u;
                let Some(n) = adj.neighbors(u).get(*next) else {
                    stack.pop();
                    color.insert(u, Color::Black);
                    rec.visit(u, NodeRole::Confirmed);
                    finished.push(u);
                    continue;
                };
                *next += 1;

                match color.get(&n.vertex) {
                    Some(Color::Gray) => {
                        debug!(at = %u, back_to = %n.vertex, "cycle detected");
                        let trace = rec.finish(Payload::Negative(Verdict::CyclicGraph));
                        return Ok(Traced::new(None, trace));
                    }
                    Some(Color::Black) => {}
                    None => {
                        color.insert(n.vertex, Color::Gray);
                        rec.visit(n.vertex, NodeRole::Tentative);
                        stack.push((n.vertex, 0));
                    }
                }
            }
        }

        finished.reverse();
        for (i, &v) in finished.iter().enumerate() {
            rec.update(Target::Node(v), Value::Rank(i + 1));
        }

        debug!(vertices = finished.len(), "topological sort finished");
        let trace = rec.finish(Payload::Order(finished.clone()));
        Ok(Traced::new(Some(finished), trace))
    }
}
