//! 边定义
//!
//! 边连接两个顶点，携带方向标记和可选的权重或容量

use crate::graph::vertex::VertexId;
use crate::types::EdgeAttr;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 边 ID（会话内唯一，删除后不复用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeId(pub u64);

impl EdgeId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl From<u64> for EdgeId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// 边
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// 边 ID
    id: EdgeId,
    /// 端点 a（有向时为起点）
    a: VertexId,
    /// 端点 b（有向时为终点）
    b: VertexId,
    /// 是否有向，由图模式决定
    directed: bool,
    /// 数值属性
    attr: EdgeAttr,
}

impl Edge {
    /// 创建新边
    pub fn new(id: EdgeId, a: VertexId, b: VertexId, directed: bool, attr: EdgeAttr) -> Self {
        Self {
            id,
            a,
            b,
            directed,
            attr,
        }
    }

    pub fn id(&self) -> EdgeId {
        self.id
    }

    pub fn a(&self) -> VertexId {
        self.a
    }

    pub fn b(&self) -> VertexId {
        self.b
    }

    pub fn endpoints(&self) -> (VertexId, VertexId) {
        (self.a, self.b)
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn attr(&self) -> &EdgeAttr {
        &self.attr
    }

    /// 是否与顶点相连
    pub fn touches(&self, v: VertexId) -> bool {
        self.a == v || self.b == v
    }

    /// 给定一个端点，返回另一个端点
    pub fn other(&self, v: VertexId) -> Option<VertexId> {
        if self.a == v {
            Some(self.b)
        } else if self.b == v {
            Some(self.a)
        } else {
            None
        }
    }

    /// 权重；无属性的边按 1.0 计
    pub fn weight(&self) -> f64 {
        self.attr.value()
    }

    /// 容量，非容量边为 None
    pub fn capacity(&self) -> Option<u64> {
        match self.attr {
            EdgeAttr::Capacity { capacity, .. } => Some(capacity),
            _ => None,
        }
    }

    /// 当前流量，非容量边为 None
    pub fn flow(&self) -> Option<u64> {
        match self.attr {
            EdgeAttr::Capacity { flow, .. } => Some(flow),
            _ => None,
        }
    }

    /// 写入流量（仅容量边生效），返回是否写入
    pub(crate) fn set_flow(&mut self, new_flow: u64) -> bool {
        match &mut self.attr {
            EdgeAttr::Capacity { flow, .. } => {
                *flow = new_flow;
                true
            }
            _ => false,
        }
    }
}
