//! 最短路径算法
//!
//! Dijkstra（单源）与 Floyd-Warshall（全源），边按无向解释。
//! 前提：权重非负，负权行为未定义。

use super::Cost;
use super::trace::{EdgeRole, NodeRole, Payload, Target, TraceRecorder, Traced, Value, Verdict};
use crate::error::{Error, Result};
use crate::graph::{Adjacency, AttrSelector, Direction, EdgeId, Graph, GraphSnapshot, VertexId};
use priority_queue::PriorityQueue;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

/// 路径结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathResult {
    /// 路径上的顶点序列
    pub vertices: Vec<VertexId>,
    /// 路径上的边序列
    pub edges: Vec<EdgeId>,
    /// 路径长度（边数）
    pub length: usize,
    /// 路径总权重
    pub total_weight: f64,
}

impl PathResult {
    fn with_start(start: VertexId) -> Self {
        Self {
            vertices: vec![start],
            edges: Vec::new(),
            length: 0,
            total_weight: 0.0,
        }
    }
}

/// 最短路径查找器
pub struct ShortestPath {
    graph: Arc<Graph>,
}

impl ShortestPath {
    pub fn new(graph: Arc<Graph>) -> Self {
        Self { graph }
    }

    fn check_endpoints(snapshot: &GraphSnapshot, start: VertexId, end: VertexId) -> Result<()> {
        if !snapshot.contains(start) {
            return Err(Error::UnknownStart(start));
        }
        if !snapshot.contains(end) {
            return Err(Error::UnknownEnd(end));
        }
        Ok(())
    }

    /// Dijkstra 最短路径
    ///
    /// 距离相等时先弹出 ID 较小的顶点，结果可复现。平行边各自参与松弛。
    /// 终点不可达时返回 `None`。
    #[tracing::instrument(skip(self), fields(start = %start, end = %end))]
    pub fn dijkstra(&self, start: VertexId, end: VertexId) -> Result<Traced<Option<PathResult>>> {
        let snapshot = self.graph.snapshot();
        Self::check_endpoints(&snapshot, start, end)?;
        let adj = Adjacency::build(&snapshot, Direction::Undirected, AttrSelector::Weight);

        let mut rec = TraceRecorder::new();
        let mut dist: HashMap<VertexId, f64> = HashMap::new();
        let mut prev: HashMap<VertexId, (VertexId, EdgeId)> = HashMap::new();
        let mut settled: HashSet<VertexId> = HashSet::new();
        let mut queue: PriorityQueue<VertexId, Reverse<(Cost, VertexId)>> = PriorityQueue::new();

        dist.insert(start, 0.0);
        queue.push(start, Reverse((Cost(0.0), start)));
        rec.update(Target::Node(start), Value::Distance(0.0));

        while let Some((u, Reverse((Cost(d), _)))) = queue.pop() {
            settled.insert(u);
            rec.visit(u, NodeRole::Confirmed);
            if u == end {
                break;
            }

            for n in adj.neighbors(u) {
                if settled.contains(&n.vertex) {
                    continue;
                }
                let alt = d + n.value;
                let better = dist.get(&n.vertex).map_or(true, |&cur| alt < cur);
                if better {
                    dist.insert(n.vertex, alt);
                    prev.insert(n.vertex, (u, n.edge));
                    queue.push(n.vertex, Reverse((Cost(alt), n.vertex)));
                    rec.select(n.edge, EdgeRole::Candidate);
                    rec.update(Target::Node(n.vertex), Value::Distance(alt));
                }
            }
        }

        if !dist.contains_key(&end) {
            debug!("no path found");
            let trace = rec.finish(Payload::Negative(Verdict::NoPathFound));
            return Ok(Traced::new(None, trace));
        }

        let path = self.reconstruct_path(&snapshot, start, end, &prev);
        for &edge in &path.edges {
            rec.select(edge, EdgeRole::Accepted);
        }
        debug!(length = path.length, total_weight = path.total_weight, "dijkstra finished");

        let trace = rec.finish(Payload::Path {
            vertices: path.vertices.clone(),
            cost: path.total_weight,
        });
        Ok(Traced::new(Some(path), trace))
    }

    /// 重构路径
    fn reconstruct_path(
        &self,
        snapshot: &GraphSnapshot,
        start: VertexId,
        end: VertexId,
        prev: &HashMap<VertexId, (VertexId, EdgeId)>,
    ) -> PathResult {
        let mut path = PathResult::with_start(start);
        let mut vertices = vec![end];
        let mut edges = Vec::new();
        let mut current = end;

        while current != start {
            match prev.get(&current) {
                Some(&(p, edge)) => {
                    vertices.push(p);
                    edges.push(edge);
                    current = p;
                }
                None => break,
            }
        }

        vertices.reverse();
        edges.reverse();

        path.total_weight = edges
            .iter()
            .filter_map(|&e| snapshot.edge(e))
            .map(|e| e.weight())
            .sum();
        path.length = edges.len();
        path.vertices = vertices;
        path.edges = edges;
        path
    }

    /// Floyd-Warshall 最短路径
    ///
    /// 同一对顶点间有多条平行边时只取权重最小的一条初始化距离矩阵，
    /// 再按后继矩阵从 `start` 走到 `end`。
    #[tracing::instrument(skip(self), fields(start = %start, end = %end))]
    pub fn floyd_warshall(
        &self,
        start: VertexId,
        end: VertexId,
    ) -> Result<Traced<Option<PathResult>>> {
        let snapshot = self.graph.snapshot();
        Self::check_endpoints(&snapshot, start, end)?;

        let ids: Vec<VertexId> = snapshot.vertex_ids().collect();
        let index: HashMap<VertexId, usize> =
            ids.iter().enumerate().map(|(i, &v)| (v, i)).collect();
        let n = ids.len();

        let mut dist = vec![vec![f64::INFINITY; n]; n];
        let mut next: Vec<Vec<Option<usize>>> = vec![vec![None; n]; n];
        // 每对相邻顶点之间权重最小的边
        let mut via: Vec<Vec<Option<EdgeId>>> = vec![vec![None; n]; n];

        for (i, row) in dist.iter_mut().enumerate() {
            row[i] = 0.0;
        }

        for edge in snapshot.edges() {
            let (u, v) = (index[&edge.a()], index[&edge.b()]);
            let w = edge.weight();
            if w < dist[u][v] {
                dist[u][v] = w;
                dist[v][u] = w;
                next[u][v] = Some(v);
                next[v][u] = Some(u);
                via[u][v] = Some(edge.id());
                via[v][u] = Some(edge.id());
            }
        }

        for k in 0..n {
            for i in 0..n {
                if dist[i][k].is_infinite() {
                    continue;
                }
                for j in 0..n {
                    let through = dist[i][k] + dist[k][j];
                    if dist[i][j] > through {
                        dist[i][j] = through;
                        next[i][j] = next[i][k];
                    }
                }
            }
        }

        let (s, t) = (index[&start], index[&end]);
        let mut rec = TraceRecorder::new();

        if s != t && next[s][t].is_none() {
            debug!("no path found");
            let trace = rec.finish(Payload::Negative(Verdict::NoPathFound));
            return Ok(Traced::new(None, trace));
        }

        let mut path = PathResult::with_start(start);
        rec.visit(start, NodeRole::Confirmed);

        let mut current = s;
        while current != t {
            let Some(step) = next[current][t] else {
                break;
            };
            if let Some(edge) = via[current][step] {
                path.edges.push(edge);
                path.total_weight += snapshot.edge(edge).map(|e| e.weight()).unwrap_or(0.0);
                rec.select(edge, EdgeRole::Accepted);
            }
            path.vertices.push(ids[step]);
            rec.visit(ids[step], NodeRole::Confirmed);
            current = step;
        }
        path.length = path.edges.len();

        debug!(length = path.length, total_weight = path.total_weight, "floyd-warshall finished");
        let trace = rec.finish(Payload::Path {
            vertices: path.vertices.clone(),
            cost: path.total_weight,
        });
        Ok(Traced::new(Some(path), trace))
    }
}
