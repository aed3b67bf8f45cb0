//! 最大流算法
//!
//! 实现 Edmonds-Karp 算法（基于 BFS 的 Ford-Fulkerson），
//! 在有向容量图上计算源点到汇点的最大流

use super::trace::{Payload, Target, TraceRecorder, Traced, Value};
use crate::error::{Error, Result};
use crate::graph::{Adjacency, AttrSelector, Direction, EdgeId, Graph, GraphSnapshot, VertexId};
use crate::types::GraphMode;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::sync::Arc;
use tracing::debug;

/// 最大流结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaxFlow {
    /// 最大流量值
    pub value: u64,
    /// 流量分配（边 -> 流量），包含所有容量边
    pub flows: BTreeMap<EdgeId, u64>,
    /// 增广次数
    pub augmenting_paths: usize,
    /// 最小割的源侧顶点集
    pub source_side: BTreeSet<VertexId>,
    /// 割边（源侧指向汇侧的边）
    cut: Vec<EdgeId>,
}

impl MaxFlow {
    /// 最小割上的边，容量之和等于最大流值
    pub fn cut_edges(&self) -> &[EdgeId] {
        &self.cut
    }

    /// 某条边的最终流量
    pub fn flow_of(&self, edge: EdgeId) -> u64 {
        self.flows.get(&edge).copied().unwrap_or(0)
    }
}

/// 残余网络中一条边的状态
#[derive(Debug, Clone, Copy)]
struct EdgeState {
    from: VertexId,
    to: VertexId,
    capacity: u64,
    flow: u64,
}

impl EdgeState {
    /// 从 `at` 出发沿这条边的残余容量：正向为 capacity - flow，反向为 flow
    fn residual_from(&self, at: VertexId) -> u64 {
        if at == self.from {
            self.capacity - self.flow
        } else {
            self.flow
        }
    }
}

/// BFS 找到的增广路径上的一步
#[derive(Debug, Clone, Copy)]
struct PathStep {
    edge: EdgeId,
    /// 是否沿边的方向
    forward: bool,
}

/// Edmonds-Karp 最大流算法
pub struct EdmondsKarp {
    graph: Arc<Graph>,
}

impl EdmondsKarp {
    /// 创建算法实例
    pub fn new(graph: Arc<Graph>) -> Self {
        Self { graph }
    }

    /// 计算从 source 到 sink 的最大流
    ///
    /// 每轮在残余网络上 BFS 出最短增广路径，按瓶颈容量增广。
    /// 流量总是从 0 开始计算，图中已有的流量标签不参与。
    #[tracing::instrument(skip(self), fields(source = %source, sink = %sink))]
    pub fn max_flow(&self, source: VertexId, sink: VertexId) -> Result<Traced<MaxFlow>> {
        let snapshot = self.graph.snapshot();
        snapshot.require_mode(GraphMode::Capacitated, "capacitated")?;
        Self::check_terminals(&snapshot, source, sink)?;
        Self::check_source_capacity(&snapshot, source)?;

        // 无向视图让每个顶点同时看到出边（正向残余）和入边（反向残余）
        let adj = Adjacency::build(&snapshot, Direction::Undirected, AttrSelector::Capacity);
        let mut states: HashMap<EdgeId, EdgeState> = snapshot
            .edges()
            .map(|e| {
                (
                    e.id(),
                    EdgeState {
                        from: e.a(),
                        to: e.b(),
                        capacity: e.capacity().unwrap_or(0),
                        flow: 0,
                    },
                )
            })
            .collect();

        let mut rec = TraceRecorder::new();
        let mut max_flow_value = 0u64;
        let mut augmenting_paths = 0usize;

        // Edmonds-Karp: 重复 BFS 找增广路径
        while let Some(path) = self.bfs_find_path(source, sink, &adj, &states) {
            let bottleneck = path
                .iter()
                .map(|step| {
                    let s = &states[&step.edge];
                    if step.forward {
                        s.capacity - s.flow
                    } else {
                        s.flow
                    }
                })
                .min()
                .unwrap_or(0);
            if bottleneck == 0 {
                break;
            }

            rec.select_path(path.iter().map(|s| s.edge).collect(), bottleneck);

            // 沿路径增广
            for step in &path {
                if let Some(state) = states.get_mut(&step.edge) {
                    if step.forward {
                        state.flow += bottleneck;
                    } else {
                        state.flow -= bottleneck;
                    }
                    rec.update(
                        Target::Edge(step.edge),
                        Value::Flow {
                            flow: state.flow,
                            capacity: state.capacity,
                        },
                    );
                }
            }

            max_flow_value = max_flow_value
                .checked_add(bottleneck)
                .ok_or_else(|| Error::InvalidAttribute("最大流超出 u64 范围".to_string()))?;
            augmenting_paths += 1;
            debug!(bottleneck, length = path.len(), "augmented along path");
        }

        // 找最小割（残余网络中从源点可达的顶点属于源侧）
        let source_side = Self::find_source_side(source, &adj, &states);
        let mut cut: Vec<EdgeId> = states
            .iter()
            .filter(|(_, s)| source_side.contains(&s.from) && !source_side.contains(&s.to))
            .map(|(&id, _)| id)
            .collect();
        cut.sort();

        let flows: BTreeMap<EdgeId, u64> = states.iter().map(|(&id, s)| (id, s.flow)).collect();

        debug!(value = max_flow_value, augmenting_paths, "max flow finished");
        let trace = rec.finish(Payload::Flow(max_flow_value));
        Ok(Traced::new(
            MaxFlow {
                value: max_flow_value,
                flows,
                augmenting_paths,
                source_side,
                cut,
            },
            trace,
        ))
    }

    fn check_terminals(snapshot: &GraphSnapshot, source: VertexId, sink: VertexId) -> Result<()> {
        if source == sink {
            return Err(Error::InvalidTerminal(format!("源点与汇点相同: {}", source)));
        }
        for v in [source, sink] {
            if !snapshot.contains(v) {
                return Err(Error::InvalidTerminal(format!("顶点 {} 不存在", v)));
            }
        }
        Ok(())
    }

    /// 流值不超过源点出边容量之和，要求该和能用 u64 表示
    fn check_source_capacity(snapshot: &GraphSnapshot, source: VertexId) -> Result<()> {
        snapshot
            .edges()
            .filter(|e| e.a() == source)
            .try_fold(0u64, |sum, e| sum.checked_add(e.capacity().unwrap_or(0)))
            .map(|_| ())
            .ok_or_else(|| {
                Error::InvalidAttribute(format!("源点 {} 的出边容量之和超出 u64 范围", source))
            })
    }

    /// BFS 找增广路径，返回从源点到汇点的边序列
    fn bfs_find_path(
        &self,
        source: VertexId,
        sink: VertexId,
        adj: &Adjacency,
        states: &HashMap<EdgeId, EdgeState>,
    ) -> Option<Vec<PathStep>> {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        let mut parent: HashMap<VertexId, (VertexId, PathStep)> = HashMap::new();

        visited.insert(source);
        queue.push_back(source);

        'search: while let Some(u) = queue.pop_front() {
            for n in adj.neighbors(u) {
                let state = &states[&n.edge];
                if visited.contains(&n.vertex) || state.residual_from(u) == 0 {
                    continue;
                }
                visited.insert(n.vertex);
                parent.insert(
                    n.vertex,
                    (
                        u,
                        PathStep {
                            edge: n.edge,
                            forward: state.from == u,
                        },
                    ),
                );
                if n.vertex == sink {
                    break 'search;
                }
                queue.push_back(n.vertex);
            }
        }

        // 重构路径
        if !parent.contains_key(&sink) {
            return None;
        }

        let mut path = Vec::new();
        let mut current = sink;
        while current != source {
            let &(prev, step) = parent.get(&current)?;
            path.push(step);
            current = prev;
        }
        path.reverse();

        Some(path)
    }

    /// 找最小割的源侧顶点
    fn find_source_side(
        source: VertexId,
        adj: &Adjacency,
        states: &HashMap<EdgeId, EdgeState>,
    ) -> BTreeSet<VertexId> {
        let mut visited = BTreeSet::new();
        let mut queue = VecDeque::new();

        visited.insert(source);
        queue.push_back(source);

        while let Some(u) = queue.pop_front() {
            for n in adj.neighbors(u) {
                if !visited.contains(&n.vertex) && states[&n.edge].residual_from(u) > 0 {
                    visited.insert(n.vertex);
                    queue.push_back(n.vertex);
                }
            }
        }

        visited
    }
}
