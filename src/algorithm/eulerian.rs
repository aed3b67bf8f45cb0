//! 欧拉回路
//!
//! 连通且所有顶点度为偶数时存在，用 Hierholzer 算法（显式栈）构造

use super::trace::{EdgeRole, Payload, TraceRecorder, Traced, Verdict};
use crate::error::Result;
use crate::graph::{Adjacency, AttrSelector, Direction, EdgeId, Graph, VertexId};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

/// 欧拉回路查找器
pub struct EulerianCircuit {
    graph: Arc<Graph>,
}

impl EulerianCircuit {
    pub fn new(graph: Arc<Graph>) -> Self {
        Self { graph }
    }

    /// 查找欧拉回路，返回按回路顺序排列的边
    ///
    /// 边按无向解释，每条平行边单独消耗。图不连通（含空图）或存在奇度
    /// 顶点时返回 `None`。
    #[tracing::instrument(skip(self))]
    pub fn find(&self) -> Result<Traced<Option<Vec<EdgeId>>>> {
        let snapshot = self.graph.snapshot();
        let adj = Adjacency::build(&snapshot, Direction::Undirected, AttrSelector::Unit);
        let mut rec = TraceRecorder::new();

        if !Self::is_connected(&adj) {
            debug!("graph is disconnected");
            let trace = rec.finish(Payload::Negative(Verdict::Disconnected));
            return Ok(Traced::new(None, trace));
        }
        if let Some(odd) = adj.vertices().find(|&v| adj.degree(v) % 2 == 1) {
            debug!(vertex = %odd, "odd degree vertex");
            let trace = rec.finish(Payload::Negative(Verdict::OddDegree(odd)));
            return Ok(Traced::new(None, trace));
        }

        let Some(start) = adj.vertices().next() else {
            let trace = rec.finish(Payload::Negative(Verdict::Disconnected));
            return Ok(Traced::new(None, trace));
        };
        let circuit = Self::hierholzer(&adj, start, snapshot.edge_count());

        for &edge in &circuit {
            rec.select(edge, EdgeRole::Accepted);
        }

        debug!(edges = circuit.len(), "eulerian circuit found");
        let trace = rec.finish(Payload::Edges(circuit.clone()));
        Ok(Traced::new(Some(circuit), trace))
    }

    /// 连通性检查（显式栈 DFS）；空图视为不连通
    fn is_connected(adj: &Adjacency) -> bool {
        let Some(start) = adj.vertices().next() else {
            return false;
        };

        let mut visited = HashSet::new();
        let mut stack = vec![start];
        while let Some(v) = stack.pop() {
            if !visited.insert(v) {
                continue;
            }
            for n in adj.neighbors(v) {
                if !visited.contains(&n.vertex) {
                    stack.push(n.vertex);
                }
            }
        }

        visited.len() == adj.len()
    }

    /// Hierholzer：沿未用的边前进，走不动时把来时的边写入回路
    fn hierholzer(adj: &Adjacency, start: VertexId, edge_count: usize) -> Vec<EdgeId> {
        let mut used: HashSet<EdgeId> = HashSet::with_capacity(edge_count);
        // 每个顶点邻接表中下一个待检查的位置
        let mut cursor: HashMap<VertexId, usize> = HashMap::new();
        let mut stack: Vec<(VertexId, Option<EdgeId>)> = vec![(start, None)];
        let mut circuit = Vec::with_capacity(edge_count);

        while let Some(&(v, via)) = stack.last() {
            let neighbors = adj.neighbors(v);
            let pos = cursor.entry(v).or_insert(0);
            while *pos < neighbors.len() && used.contains(&neighbors[*pos].edge) {
                *pos += 1;
            }

            if let Some(n) = neighbors.get(*pos) {
                used.insert(n.edge);
                stack.push((n.vertex, Some(n.edge)));
            } else {
                stack.pop();
                if let Some(edge) = via {
                    circuit.push(edge);
                }
            }
        }

        circuit.reverse();
        circuit
    }
}
