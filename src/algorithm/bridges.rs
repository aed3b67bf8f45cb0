//! 桥查找
//!
//! Tarjan 低链算法，边按无向解释，每个连通分量各跑一次 DFS

use super::trace::{EdgeRole, NodeRole, Payload, TraceRecorder, Traced};
use crate::error::Result;
use crate::graph::{Adjacency, AttrSelector, Direction, EdgeId, Graph, VertexId};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// DFS 栈帧
struct Frame {
    vertex: VertexId,
    /// 到达该顶点所用的树边
    via: Option<EdgeId>,
    /// 下一个待检查的邻居下标
    next: usize,
}

#[derive(Clone, Copy)]
struct NodeInfo {
    discovery: usize,
    low: usize,
}

/// 桥查找器
pub struct Bridges {
    graph: Arc<Graph>,
}

impl Bridges {
    pub fn new(graph: Arc<Graph>) -> Self {
        Self { graph }
    }

    /// 找出所有桥
    ///
    /// 树边 (u, v) 是桥当且仅当 `low[v] > disc[u]`。回边判断跳过的是来时的
    /// 那条边而不是父顶点，因此平行边不会被误报为桥。
    #[tracing::instrument(skip(self))]
    pub fn find(&self) -> Result<Traced<Vec<EdgeId>>> {
        let snapshot = self.graph.snapshot();
        let adj = Adjacency::build(&snapshot, Direction::Undirected, AttrSelector::Unit);

        let mut rec = TraceRecorder::new();
        let mut info: HashMap<VertexId, NodeInfo> = HashMap::new();
        let mut bridges = Vec::new();
        let mut time = 0usize;

        for root in adj.vertices() {
            if info.contains_key(&root) {
                continue;
            }

            info.insert(
                root,
                NodeInfo {
                    discovery: time,
                    low: time,
                },
            );
            time += 1;
            rec.visit(root, NodeRole::Confirmed);
            let mut stack = vec![Frame {
                vertex: root,
                via: None,
                next: 0,
            }];

            while let Some(frame) = stack.last_mut() {
                let u = frame.vertex;
                let neighbors = adj.neighbors(u);

                if frame.next < neighbors.len() {
                    let n = neighbors[frame.next];
                    frame.next += 1;
                    if Some(n.edge) == frame.via {
                        continue;
                    }

                    if let Some(seen) = info.get(&n.vertex).copied() {
                        // 回边
                        if let Some(iu) = info.get_mut(&u) {
                            iu.low = iu.low.min(seen.discovery);
                        }
                    } else {
                        info.insert(
                            n.vertex,
                            NodeInfo {
                                discovery: time,
                                low: time,
                            },
                        );
                        time += 1;
                        rec.visit(n.vertex, NodeRole::Confirmed);
                        stack.push(Frame {
                            vertex: n.vertex,
                            via: Some(n.edge),
                            next: 0,
                        });
                    }
                    continue;
                }

                // u 的子树已处理完，回溯到父顶点
                let done = stack.pop();
                let (Some(done), Some(parent)) = (done, stack.last()) else {
                    continue;
                };
                let child = info[&done.vertex];
                let Some(pinfo) = info.get_mut(&parent.vertex) else {
                    continue;
                };
                pinfo.low = pinfo.low.min(child.low);
                if child.low > pinfo.discovery {
                    if let Some(edge) = done.via {
                        bridges.push(edge);
                        rec.select(edge, EdgeRole::Accepted);
                    }
                }
            }
        }

        debug!(bridges = bridges.len(), "bridge search finished");
        let trace = rec.finish(Payload::Edges(bridges.clone()));
        Ok(Traced::new(bridges, trace))
    }
}
