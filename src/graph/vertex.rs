//! 顶点定义
//!
//! 顶点只携带创建时分配的显示编号，位置等绘制信息属于外部界面

use serde::{Deserialize, Serialize};
use std::fmt;

/// 顶点 ID（会话内唯一，删除后不复用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VertexId(pub u64);

impl VertexId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl From<u64> for VertexId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// 顶点
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vertex {
    /// 顶点 ID
    id: VertexId,
}

impl Vertex {
    /// 创建新顶点
    pub fn new(id: VertexId) -> Self {
        Self { id }
    }

    pub fn id(&self) -> VertexId {
        self.id
    }

    /// 显示编号，即 ID 的数值（按创建顺序单调递增）
    pub fn label(&self) -> u64 {
        self.id.as_u64()
    }
}
