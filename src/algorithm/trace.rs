//! 步骤轨迹
//!
//! 每次算法调用生成一份完整的、可回放的步骤序列。一个步骤对应外部
//! 界面的一次可视更新，最后一步总是 [`Step::Result`]。

use crate::graph::{EdgeId, VertexId};
use serde::{Deserialize, Serialize};

/// 顶点访问状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    Tentative,
    Confirmed,
}

/// 边选择状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeRole {
    Candidate,
    Accepted,
    Rejected,
}

/// 数值更新的对象
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    Node(VertexId),
    Edge(EdgeId),
}

/// 更新后的数值
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// 边上的流量标签 flow/capacity
    Flow { flow: u64, capacity: u64 },
    /// 拓扑序号（从 1 开始）
    Rank(usize),
    /// 暂定最短距离
    Distance(f64),
}

/// 算法的否定结论（不是错误）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// 终点不可达
    NoPathFound,
    /// 图不连通
    Disconnected,
    /// 有向图含环
    CyclicGraph,
    /// 存在奇度顶点
    OddDegree(VertexId),
}

/// 终止步骤的内容
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Payload {
    /// 遍历或拓扑顺序
    Order(Vec<VertexId>),
    /// 最短路径
    Path { vertices: Vec<VertexId>, cost: f64 },
    /// 边集合（生成树、桥、欧拉回路）
    Edges(Vec<EdgeId>),
    /// 最大流值
    Flow(u64),
    /// 否定结论
    Negative(Verdict),
}

/// 单个步骤
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Step {
    VisitNode { node: VertexId, role: NodeRole },
    SelectEdge { edge: EdgeId, role: EdgeRole },
    /// 一条增广路径整体高亮
    SelectPath { edges: Vec<EdgeId>, amount: u64 },
    UpdateValue { target: Target, value: Value },
    Result(Payload),
}

impl Step {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Step::Result(_))
    }
}

/// 完整轨迹
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    steps: Vec<Step>,
}

impl Trace {
    /// 只读查看所有步骤
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// 终止步骤的内容
    pub fn payload(&self) -> Option<&Payload> {
        match self.steps.last() {
            Some(Step::Result(payload)) => Some(payload),
            _ => None,
        }
    }

    /// 导出为 JSON
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl IntoIterator for Trace {
    type Item = Step;
    type IntoIter = std::vec::IntoIter<Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.into_iter()
    }
}

/// 轨迹记录器
#[derive(Debug, Default)]
pub struct TraceRecorder {
    steps: Vec<Step>,
}

impl TraceRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visit(&mut self, node: VertexId, role: NodeRole) {
        self.steps.push(Step::VisitNode { node, role });
    }

    pub fn select(&mut self, edge: EdgeId, role: EdgeRole) {
        self.steps.push(Step::SelectEdge { edge, role });
    }

    pub fn select_path(&mut self, edges: Vec<EdgeId>, amount: u64) {
        self.steps.push(Step::SelectPath { edges, amount });
    }

    pub fn update(&mut self, target: Target, value: Value) {
        self.steps.push(Step::UpdateValue { target, value });
    }

    /// 追加终止步骤并交出轨迹
    pub fn finish(mut self, payload: Payload) -> Trace {
        self.steps.push(Step::Result(payload));
        Trace { steps: self.steps }
    }
}

/// 算法结果与其轨迹
#[derive(Debug, Clone)]
pub struct Traced<T> {
    pub result: T,
    pub trace: Trace,
}

impl<T> Traced<T> {
    pub fn new(result: T, trace: Trace) -> Self {
        Self { result, trace }
    }

    pub fn into_parts(self) -> (T, Trace) {
        (self.result, self.trace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorder_appends_terminal_step() {
        let mut rec = TraceRecorder::new();
        rec.visit(VertexId::new(1), NodeRole::Confirmed);
        rec.select(EdgeId::new(1), EdgeRole::Accepted);
        let trace = rec.finish(Payload::Flow(3));

        assert_eq!(trace.len(), 3);
        assert!(trace.steps()[2].is_terminal());
        assert_eq!(trace.payload(), Some(&Payload::Flow(3)));
        assert_eq!(trace.steps().iter().filter(|s| s.is_terminal()).count(), 1);
    }

    #[test]
    fn test_trace_json() {
        let mut rec = TraceRecorder::new();
        rec.update(Target::Node(VertexId::new(2)), Value::Rank(1));
        let trace = rec.finish(Payload::Negative(Verdict::CyclicGraph));

        let json = trace.to_json().unwrap();
        let back: Trace = serde_json::from_str(&json).unwrap();
        assert_eq!(back, trace);
    }

    #[test]
    fn test_trace_consumed_in_order() {
        let mut rec = TraceRecorder::new();
        rec.visit(VertexId::new(1), NodeRole::Tentative);
        rec.visit(VertexId::new(1), NodeRole::Confirmed);
        let steps: Vec<Step> = rec.finish(Payload::Order(vec![VertexId::new(1)])).into_iter().collect();

        assert_eq!(
            steps[0],
            Step::VisitNode {
                node: VertexId::new(1),
                role: NodeRole::Tentative
            }
        );
        assert!(steps[2].is_terminal());
    }
}
