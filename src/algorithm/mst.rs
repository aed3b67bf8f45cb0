//! 最小生成树
//!
//! Prim（从起点生长）与 Kruskal（全局排序 + 并查集），边按无向解释

use super::trace::{EdgeRole, NodeRole, Payload, TraceRecorder, Traced, Verdict};
use super::Cost;
use crate::error::{Error, Result};
use crate::graph::{Adjacency, AttrSelector, Direction, EdgeId, Graph, VertexId};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

/// 生成树结果
///
/// 边的接受顺序记录在轨迹中，结果的身份只由边集合决定。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpanningTreeResult {
    /// 按接受顺序排列的树边
    pub edges: Vec<EdgeId>,
    /// 总权重
    pub total_weight: f64,
}

/// 并查集（路径减半 + 按秩合并）
#[derive(Debug, Clone)]
pub(crate) struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
    components: usize,
}

impl DisjointSet {
    pub(crate) fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
            components: n,
        }
    }

    pub(crate) fn find(&mut self, mut u: usize) -> usize {
        while self.parent[u] != u {
            self.parent[u] = self.parent[self.parent[u]];
            u = self.parent[u];
        }
        u
    }

    /// 合并两个集合；已在同一集合时返回 false
    pub(crate) fn union(&mut self, u: usize, v: usize) -> bool {
        let (ru, rv) = (self.find(u), self.find(v));
        if ru == rv {
            return false;
        }
        match self.rank[ru].cmp(&self.rank[rv]) {
            std::cmp::Ordering::Less => self.parent[ru] = rv,
            std::cmp::Ordering::Greater => self.parent[rv] = ru,
            std::cmp::Ordering::Equal => {
                self.parent[rv] = ru;
                self.rank[ru] += 1;
            }
        }
        self.components -= 1;
        true
    }

    pub(crate) fn components(&self) -> usize {
        self.components
    }
}

/// 最小生成树构建器
pub struct SpanningTree {
    graph: Arc<Graph>,
}

impl SpanningTree {
    pub fn new(graph: Arc<Graph>) -> Self {
        Self { graph }
    }

    /// Prim 算法
    ///
    /// 优先队列保存前沿边，按 (权重, 边 ID) 出队；远端已访问的过期条目
    /// 出队时直接丢弃。不能覆盖所有顶点时返回 `None`。
    #[tracing::instrument(skip(self), fields(start = %start))]
    pub fn prim(&self, start: VertexId) -> Result<Traced<Option<SpanningTreeResult>>> {
        let snapshot = self.graph.snapshot();
        if !snapshot.contains(start) {
            return Err(Error::UnknownStart(start));
        }
        let adj = Adjacency::build(&snapshot, Direction::Undirected, AttrSelector::Weight);
        let total = snapshot.vertex_count();

        let mut rec = TraceRecorder::new();
        let mut visited: HashSet<VertexId> = HashSet::new();
        let mut heap: BinaryHeap<Reverse<(Cost, EdgeId, VertexId)>> = BinaryHeap::new();
        let mut tree = SpanningTreeResult {
            edges: Vec::new(),
            total_weight: 0.0,
        };

        visited.insert(start);
        rec.visit(start, NodeRole::Confirmed);
        for n in adj.neighbors(start) {
            heap.push(Reverse((Cost(n.value), n.edge, n.vertex)));
            rec.select(n.edge, EdgeRole::Candidate);
        }

        while visited.len() < total {
            let Some(Reverse((Cost(weight), edge, v))) = heap.pop() else {
                break;
            };
            if visited.contains(&v) {
                rec.select(edge, EdgeRole::Rejected);
                continue;
            }

            visited.insert(v);
            tree.edges.push(edge);
            tree.total_weight += weight;
            rec.select(edge, EdgeRole::Accepted);
            rec.visit(v, NodeRole::Confirmed);

            for n in adj.neighbors(v) {
                if !visited.contains(&n.vertex) {
                    heap.push(Reverse((Cost(n.value), n.edge, n.vertex)));
                    rec.select(n.edge, EdgeRole::Candidate);
                }
            }
        }

        if visited.len() < total {
            debug!(reached = visited.len(), total, "graph is disconnected");
            let trace = rec.finish(Payload::Negative(Verdict::Disconnected));
            return Ok(Traced::new(None, trace));
        }

        debug!(edges = tree.edges.len(), total_weight = tree.total_weight, "prim finished");
        let trace = rec.finish(Payload::Edges(tree.edges.clone()));
        Ok(Traced::new(Some(tree), trace))
    }

    /// Kruskal 算法
    ///
    /// 所有边按权重稳定排序（同权按边 ID），端点不在同一集合时接受。
    /// 最终不能合并为一个连通分量时返回 `None`。
    #[tracing::instrument(skip(self))]
    pub fn kruskal(&self) -> Result<Traced<Option<SpanningTreeResult>>> {
        let snapshot = self.graph.snapshot();
        let index: HashMap<VertexId, usize> = snapshot
            .vertex_ids()
            .enumerate()
            .map(|(i, v)| (v, i))
            .collect();

        let mut edges: Vec<_> = snapshot.edges().collect();
        edges.sort_by(|a, b| a.weight().total_cmp(&b.weight()));

        let mut rec = TraceRecorder::new();
        let mut sets = DisjointSet::new(index.len());
        let mut tree = SpanningTreeResult {
            edges: Vec::new(),
            total_weight: 0.0,
        };

        for edge in edges {
            if sets.union(index[&edge.a()], index[&edge.b()]) {
                tree.edges.push(edge.id());
                tree.total_weight += edge.weight();
                rec.select(edge.id(), EdgeRole::Accepted);
            } else {
                rec.select(edge.id(), EdgeRole::Rejected);
            }
        }

        if sets.components() != 1 {
            debug!(components = sets.components(), "graph is disconnected");
            let trace = rec.finish(Payload::Negative(Verdict::Disconnected));
            return Ok(Traced::new(None, trace));
        }

        debug!(edges = tree.edges.len(), total_weight = tree.total_weight, "kruskal finished");
        let trace = rec.finish(Payload::Edges(tree.edges.clone()));
        Ok(Traced::new(Some(tree), trace))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::trace::Step;
    use crate::types::GraphMode;

    #[test]
    fn test_disjoint_set() {
        let mut sets = DisjointSet::new(4);
        assert!(sets.union(0, 1));
        assert!(sets.union(2, 3));
        assert!(!sets.union(1, 0));
        assert_eq!(sets.components(), 2);
        assert!(sets.union(1, 3));
        assert_eq!(sets.find(0), sets.find(2));
        assert_eq!(sets.components(), 1);
    }

    #[test]
    fn test_kruskal_triangle() {
        let graph = Graph::new(GraphMode::Weighted);
        let v1 = graph.add_node();
        let v2 = graph.add_node();
        let v3 = graph.add_node();
        let e12 = graph.add_edge(v1, v2, Some(1.0)).unwrap();
        let e23 = graph.add_edge(v2, v3, Some(1.0)).unwrap();
        let e13 = graph.add_edge(v1, v3, Some(5.0)).unwrap();

        let run = SpanningTree::new(graph).kruskal().unwrap();
        let tree = run.result.unwrap();
        assert_eq!(tree.edges, vec![e12, e23]);
        assert!((tree.total_weight - 2.0).abs() < 1e-9);
        assert!(run.trace.steps().contains(&Step::SelectEdge {
            edge: e13,
            role: EdgeRole::Rejected
        }));
    }

    #[test]
    fn test_prim_matches_kruskal_weight() {
        let graph = Graph::new(GraphMode::Weighted);
        let v: Vec<VertexId> = (0..5).map(|_| graph.add_node()).collect();
        graph.add_edge(v[0], v[1], Some(2.0)).unwrap();
        graph.add_edge(v[0], v[3], Some(6.0)).unwrap();
        graph.add_edge(v[1], v[2], Some(3.0)).unwrap();
        graph.add_edge(v[1], v[3], Some(8.0)).unwrap();
        graph.add_edge(v[1], v[4], Some(5.0)).unwrap();
        graph.add_edge(v[2], v[4], Some(7.0)).unwrap();
        graph.add_edge(v[3], v[4], Some(9.0)).unwrap();

        let mst = SpanningTree::new(graph);
        let prim = mst.prim(v[2]).unwrap().result.unwrap();
        let kruskal = mst.kruskal().unwrap().result.unwrap();

        assert!((prim.total_weight - 16.0).abs() < 1e-9);
        assert!((kruskal.total_weight - 16.0).abs() < 1e-9);
        let mut a = prim.edges.clone();
        let mut b = kruskal.edges.clone();
        a.sort();
        b.sort();
        assert_eq!(a, b);
    }

    #[test]
    fn test_disconnected() {
        let graph = Graph::new(GraphMode::Weighted);
        let v1 = graph.add_node();
        let v2 = graph.add_node();
        graph.add_node();
        graph.add_edge(v1, v2, Some(1.0)).unwrap();

        let mst = SpanningTree::new(graph);
        let prim = mst.prim(v1).unwrap();
        assert!(prim.result.is_none());
        assert_eq!(
            prim.trace.payload(),
            Some(&Payload::Negative(Verdict::Disconnected))
        );
        assert!(mst.kruskal().unwrap().result.is_none());
    }

    #[test]
    fn test_single_vertex_and_empty() {
        let graph = Graph::new(GraphMode::Weighted);
        let mst = SpanningTree::new(graph.clone());
        assert!(mst.kruskal().unwrap().result.is_none());

        let v = graph.add_node();
        assert_eq!(mst.prim(v).unwrap().result.unwrap().edges, vec![]);
        assert_eq!(mst.kruskal().unwrap().result.unwrap().edges, vec![]);
    }

    #[test]
    fn test_prim_discards_stale_entries() {
        // 三角形：从 1 出发，1-3 在 2 加入后变为过期条目
        let graph = Graph::new(GraphMode::Weighted);
        let v1 = graph.add_node();
        let v2 = graph.add_node();
        let v3 = graph.add_node();
        graph.add_edge(v1, v2, Some(1.0)).unwrap();
        let e13 = graph.add_edge(v1, v3, Some(4.0)).unwrap();
        graph.add_edge(v2, v3, Some(2.0)).unwrap();
        graph.add_node();

        // 第四个孤立点让循环把队列耗尽
        let run = SpanningTree::new(graph).prim(v1).unwrap();
        assert!(run.trace.steps().contains(&Step::SelectEdge {
            edge: e13,
            role: EdgeRole::Rejected
        }));
        assert!(run.result.is_none());
    }

    #[test]
    fn test_prim_unknown_start() {
        let graph = Graph::new(GraphMode::Weighted);
        assert!(matches!(
            SpanningTree::new(graph).prim(VertexId::new(3)),
            Err(Error::UnknownStart(_))
        ));
    }
}
