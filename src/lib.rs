//! GraphLab - 可回放的经典图算法引擎
//!
//! 在交互式编辑的图上运行经典图算法，并为每次调用生成确定、可回放的
//! 步骤轨迹，支持：
//! - 广度/深度优先遍历
//! - Dijkstra 与 Floyd-Warshall 最短路径
//! - Prim 与 Kruskal 最小生成树
//! - Edmonds-Karp 最大流与最小割
//! - 桥、欧拉回路与拓扑排序

pub mod algorithm;
pub mod cli;
pub mod config;
pub mod error;
pub mod graph;
pub mod types;

// 重导出常用类型
pub use algorithm::{Step, Trace, Traced};
pub use config::ReplayConfig;
pub use error::{Error, Result};
pub use graph::{Edge, EdgeId, Graph, GraphSnapshot, Vertex, VertexId};
pub use types::{EdgeAttr, GraphMode};

/// 库版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
