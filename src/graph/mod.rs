//! 图核心模块
//!
//! 定义顶点、边、图存储与邻接视图

mod adjacency;
mod edge;
mod graph;
mod vertex;

pub use adjacency::{Adjacency, AttrSelector, Direction, Neighbor};
pub use edge::{Edge, EdgeId};
pub use graph::{Graph, GraphSnapshot};
pub use vertex::{Vertex, VertexId};
