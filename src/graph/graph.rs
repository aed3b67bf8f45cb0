//! 图数据结构
//!
//! 顶点与边的所有者。外部界面在两次算法调用之间通过这里修改图，
//! 算法只读取 [`GraphSnapshot`]。

use super::edge::{Edge, EdgeId};
use super::vertex::{Vertex, VertexId};
use crate::error::{Error, Result};
use crate::types::{EdgeAttr, GraphMode};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

/// 锁内存储
#[derive(Default)]
struct Store {
    /// 顶点表（按 ID 有序，即创建顺序）
    vertices: BTreeMap<VertexId, Vertex>,
    /// 边表（按 ID 有序）
    edges: BTreeMap<EdgeId, Edge>,
    /// 顶点到关联边的映射
    incidence: HashMap<VertexId, Vec<EdgeId>>,
}

impl Store {
    fn unlink(&mut self, edge: &Edge) {
        for v in [edge.a(), edge.b()] {
            if let Some(list) = self.incidence.get_mut(&v) {
                list.retain(|&e| e != edge.id());
            }
        }
    }
}

/// 图
///
/// 一张图对应一把读写锁，修改与算法快照互斥。
pub struct Graph {
    /// 图模式（创建后不可变）
    mode: GraphMode,
    /// 存储
    store: RwLock<Store>,
    /// 下一个顶点 ID
    next_vertex_id: AtomicU64,
    /// 下一个边 ID
    next_edge_id: AtomicU64,
}

impl Graph {
    /// 创建空图
    pub fn new(mode: GraphMode) -> Arc<Self> {
        Arc::new(Self {
            mode,
            store: RwLock::new(Store::default()),
            next_vertex_id: AtomicU64::new(1),
            next_edge_id: AtomicU64::new(1),
        })
    }

    /// 图模式
    pub fn mode(&self) -> GraphMode {
        self.mode
    }

    // ==================== 顶点操作 ====================

    /// 添加顶点
    pub fn add_node(&self) -> VertexId {
        let id = VertexId::new(self.next_vertex_id.fetch_add(1, Ordering::SeqCst));

        let mut store = self.store.write();
        store.vertices.insert(id, Vertex::new(id));
        store.incidence.insert(id, Vec::new());

        trace!(vertex = %id, "added vertex");
        id
    }

    /// 删除顶点及其所有关联边；顶点不存在时什么也不做
    pub fn delete_node(&self, id: VertexId) {
        let mut store = self.store.write();
        if store.vertices.remove(&id).is_none() {
            return;
        }

        let incident = store.incidence.remove(&id).unwrap_or_default();
        let mut removed = 0usize;
        for edge_id in incident {
            if let Some(edge) = store.edges.remove(&edge_id) {
                store.unlink(&edge);
                removed += 1;
            }
        }

        debug!(vertex = %id, cascaded_edges = removed, "deleted vertex");
    }

    /// 获取顶点
    pub fn get_vertex(&self, id: VertexId) -> Option<Vertex> {
        self.store.read().vertices.get(&id).cloned()
    }

    /// 顶点是否存在
    pub fn contains_node(&self, id: VertexId) -> bool {
        self.store.read().vertices.contains_key(&id)
    }

    /// 按显示编号查找顶点
    pub fn find_by_label(&self, label: u64) -> Option<VertexId> {
        let id = VertexId::new(label);
        self.contains_node(id).then_some(id)
    }

    /// 所有顶点 ID（按创建顺序）
    pub fn nodes(&self) -> Vec<VertexId> {
        self.store.read().vertices.keys().copied().collect()
    }

    /// 获取顶点数量
    pub fn vertex_count(&self) -> usize {
        self.store.read().vertices.len()
    }

    /// 顶点的度（关联边数，平行边分别计数）
    pub fn degree(&self, id: VertexId) -> usize {
        self.store
            .read()
            .incidence
            .get(&id)
            .map(|list| list.len())
            .unwrap_or(0)
    }

    // ==================== 边操作 ====================

    /// 添加边
    ///
    /// `value` 是界面收集到的权重或容量，按图模式校验。自环与不存在的端点
    /// 返回 `InvalidEndpoint`。平行边不会去重。
    pub fn add_edge(&self, a: VertexId, b: VertexId, value: Option<f64>) -> Result<EdgeId> {
        if a == b {
            return Err(Error::InvalidEndpoint(format!("不允许自环: {}", a)));
        }
        let attr = EdgeAttr::from_input(self.mode, value)?;

        let mut store = self.store.write();
        if !store.vertices.contains_key(&a) {
            return Err(Error::InvalidEndpoint(format!("顶点 {} 不存在", a)));
        }
        if !store.vertices.contains_key(&b) {
            return Err(Error::InvalidEndpoint(format!("顶点 {} 不存在", b)));
        }

        let id = EdgeId::new(self.next_edge_id.fetch_add(1, Ordering::SeqCst));
        store
            .edges
            .insert(id, Edge::new(id, a, b, self.mode.is_directed(), attr));
        store.incidence.entry(a).or_default().push(id);
        store.incidence.entry(b).or_default().push(id);

        trace!(edge = %id, %a, %b, %attr, "added edge");
        Ok(id)
    }

    /// 删除边，返回边是否存在
    pub fn delete_edge(&self, id: EdgeId) -> bool {
        let mut store = self.store.write();
        match store.edges.remove(&id) {
            Some(edge) => {
                store.unlink(&edge);
                trace!(edge = %id, "deleted edge");
                true
            }
            None => false,
        }
    }

    /// 获取边
    pub fn get_edge(&self, id: EdgeId) -> Option<Edge> {
        self.store.read().edges.get(&id).cloned()
    }

    /// 所有边
    pub fn edges(&self) -> BTreeMap<EdgeId, Edge> {
        self.store.read().edges.clone()
    }

    /// 两点之间的所有边（无向模式下不区分方向）
    pub fn edges_between(&self, a: VertexId, b: VertexId) -> Vec<Edge> {
        let directed = self.mode.is_directed();
        self.store
            .read()
            .edges
            .values()
            .filter(|e| {
                (e.a() == a && e.b() == b) || (!directed && e.a() == b && e.b() == a)
            })
            .cloned()
            .collect()
    }

    /// 获取边数量
    pub fn edge_count(&self) -> usize {
        self.store.read().edges.len()
    }

    // ==================== 流量 ====================

    /// 写入一条容量边的流量（界面回放最大流时使用）
    pub fn set_flow(&self, id: EdgeId, flow: u64) -> Result<()> {
        let mut store = self.store.write();
        let edge = store
            .edges
            .get_mut(&id)
            .ok_or_else(|| Error::InvalidEndpoint(format!("边 {} 不存在", id)))?;

        match edge.capacity() {
            Some(capacity) if flow <= capacity => {
                edge.set_flow(flow);
                Ok(())
            }
            Some(capacity) => Err(Error::InvalidAttribute(format!(
                "流量 {} 超过容量 {}",
                flow, capacity
            ))),
            None => Err(Error::ModeMismatch {
                expected: "capacitated",
                actual: self.mode,
            }),
        }
    }

    /// 所有流量清零
    pub fn reset_flows(&self) {
        let mut store = self.store.write();
        for edge in store.edges.values_mut() {
            edge.set_flow(0);
        }
    }

    // ==================== 整体 ====================

    /// 清空图；ID 计数器不回退
    pub fn clear(&self) {
        let mut store = self.store.write();
        store.vertices.clear();
        store.edges.clear();
        store.incidence.clear();
        debug!("cleared graph");
    }

    /// 在一次读锁内拷贝出只读快照
    pub fn snapshot(&self) -> GraphSnapshot {
        let store = self.store.read();
        GraphSnapshot {
            mode: self.mode,
            vertices: store.vertices.clone(),
            edges: store.edges.clone(),
        }
    }
}

/// 只读快照，算法调用的输入
#[derive(Debug, Clone)]
pub struct GraphSnapshot {
    mode: GraphMode,
    vertices: BTreeMap<VertexId, Vertex>,
    edges: BTreeMap<EdgeId, Edge>,
}

impl GraphSnapshot {
    pub fn mode(&self) -> GraphMode {
        self.mode
    }

    pub fn contains(&self, id: VertexId) -> bool {
        self.vertices.contains_key(&id)
    }

    /// 顶点 ID（升序）
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices.keys().copied()
    }

    /// 边（按 ID 升序）
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.values()
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(&id)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// 要求图处于给定的方向性，否则返回模式不匹配错误
    pub(crate) fn require_directed(&self, expected: &'static str) -> Result<()> {
        if self.mode.is_directed() {
            Ok(())
        } else {
            Err(Error::ModeMismatch {
                expected,
                actual: self.mode,
            })
        }
    }

    /// 要求图处于给定模式
    pub(crate) fn require_mode(&self, mode: GraphMode, expected: &'static str) -> Result<()> {
        if self.mode == mode {
            Ok(())
        } else {
            Err(Error::ModeMismatch {
                expected,
                actual: self.mode,
            })
        }
    }
}
