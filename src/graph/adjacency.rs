//! 邻接视图
//!
//! 每次算法调用时从快照重新构建，不跨修改缓存

use super::edge::EdgeId;
use super::graph::GraphSnapshot;
use super::vertex::VertexId;
use indexmap::IndexMap;
use smallvec::SmallVec;

/// 边的方向解释
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// 每条边贡献 a→b 与 b→a 两个条目
    Undirected,
    /// 每条边只贡献 a→b
    Directed,
}

/// 邻接条目上携带的数值
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrSelector {
    /// 恒为 1.0
    Unit,
    /// 边权重
    Weight,
    /// 边容量
    Capacity,
}

/// 邻接条目
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub vertex: VertexId,
    pub edge: EdgeId,
    pub value: f64,
}

/// 邻接表：顶点 -> 有序邻居序列
#[derive(Debug, Clone, Default)]
pub struct Adjacency {
    lists: IndexMap<VertexId, SmallVec<[Neighbor; 4]>>,
}

impl Adjacency {
    /// 从快照构建
    ///
    /// 顶点按 ID 升序，每个顶点的邻居按边 ID 升序。
    pub fn build(graph: &GraphSnapshot, direction: Direction, selector: AttrSelector) -> Self {
        let mut lists: IndexMap<VertexId, SmallVec<[Neighbor; 4]>> = graph
            .vertex_ids()
            .map(|v| (v, SmallVec::new()))
            .collect();

        for edge in graph.edges() {
            let value = match selector {
                AttrSelector::Unit => 1.0,
                AttrSelector::Weight => edge.weight(),
                AttrSelector::Capacity => edge.capacity().unwrap_or(0) as f64,
            };
            let (a, b) = edge.endpoints();

            if let Some(list) = lists.get_mut(&a) {
                list.push(Neighbor {
                    vertex: b,
                    edge: edge.id(),
                    value,
                });
            }
            if direction == Direction::Undirected {
                if let Some(list) = lists.get_mut(&b) {
                    list.push(Neighbor {
                        vertex: a,
                        edge: edge.id(),
                        value,
                    });
                }
            }
        }

        Self { lists }
    }

    /// 顶点的邻居；未知顶点返回空切片
    pub fn neighbors(&self, v: VertexId) -> &[Neighbor] {
        self.lists.get(&v).map(|l| l.as_slice()).unwrap_or(&[])
    }

    /// 顶点（按 ID 升序）
    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.lists.keys().copied()
    }

    pub fn contains(&self, v: VertexId) -> bool {
        self.lists.contains_key(&v)
    }

    /// 出度（无向时为度）
    pub fn degree(&self, v: VertexId) -> usize {
        self.neighbors(v).len()
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }
}
