//! 结果打印器
//!
//! 算法结果以表格输出，轨迹步骤逐行着色输出

use colored::Colorize;
use prettytable::{format, row, Table};

use super::commands::{Outcome, Run};
use crate::algorithm::{EdgeRole, MaxFlow, NodeRole, Payload, Step, Target, Value, Verdict};
use crate::graph::{EdgeId, Graph, VertexId};
use crate::types::EdgeAttr;

/// 结果打印器
#[derive(Debug, Clone, Default)]
pub struct Printer;

impl Printer {
    pub fn new() -> Self {
        Self
    }

    fn table() -> Table {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BOX_CHARS);
        table
    }

    /// 顶点的显示编号；顶点已被删除时退回到 ID
    pub fn vertex_label(&self, graph: &Graph, id: VertexId) -> String {
        match graph.get_vertex(id) {
            Some(v) => v.label().to_string(),
            None => id.to_string(),
        }
    }

    /// 边的显示形式，如 `e3 (1-2)`
    pub fn edge_label(&self, graph: &Graph, id: EdgeId) -> String {
        match graph.get_edge(id) {
            Some(e) => {
                let sep = if e.is_directed() { "->" } else { "-" };
                format!(
                    "{} ({}{}{})",
                    id,
                    self.vertex_label(graph, e.a()),
                    sep,
                    self.vertex_label(graph, e.b())
                )
            }
            None => id.to_string(),
        }
    }

    fn vertex_list(&self, graph: &Graph, vertices: &[VertexId]) -> String {
        vertices
            .iter()
            .map(|&v| self.vertex_label(graph, v))
            .collect::<Vec<_>>()
            .join(" → ")
    }

    /// 单个步骤的一行描述
    pub fn format_step(&self, graph: &Graph, step: &Step) -> String {
        match step {
            Step::VisitNode { node, role } => {
                let text = format!("访问顶点 {}", self.vertex_label(graph, *node));
                match role {
                    NodeRole::Tentative => format!("{} {}", text, "(暂定)".yellow()),
                    NodeRole::Confirmed => text.green().to_string(),
                }
            }
            Step::SelectEdge { edge, role } => {
                let text = self.edge_label(graph, *edge);
                match role {
                    EdgeRole::Candidate => format!("候选边 {}", text).cyan().to_string(),
                    EdgeRole::Accepted => format!("选中边 {}", text).green().bold().to_string(),
                    EdgeRole::Rejected => format!("放弃边 {}", text).red().to_string(),
                }
            }
            Step::SelectPath { edges, amount } => {
                let path: Vec<String> = edges.iter().map(|&e| self.edge_label(graph, e)).collect();
                format!("增广路径 [{}] 增量 {}", path.join(", "), amount)
                    .magenta()
                    .bold()
                    .to_string()
            }
            Step::UpdateValue { target, value } => {
                let what = match target {
                    Target::Node(v) => format!("顶点 {}", self.vertex_label(graph, *v)),
                    Target::Edge(e) => format!("边 {}", self.edge_label(graph, *e)),
                };
                match value {
                    Value::Flow { flow, capacity } => format!("{} 流量 {}/{}", what, flow, capacity),
                    Value::Rank(rank) => format!("{} 序号 {}", what, rank),
                    Value::Distance(d) => format!("{} 距离 {}", what, d),
                }
            }
            Step::Result(payload) => self.format_payload(graph, payload).bold().to_string(),
        }
    }

    fn format_payload(&self, graph: &Graph, payload: &Payload) -> String {
        match payload {
            Payload::Order(order) => format!("结果: {}", self.vertex_list(graph, order)),
            Payload::Path { vertices, cost } => {
                format!("结果: {} (代价 {})", self.vertex_list(graph, vertices), cost)
            }
            Payload::Edges(edges) => format!("结果: {} 条边", edges.len()),
            Payload::Flow(value) => format!("结果: 最大流 {}", value),
            Payload::Negative(verdict) => format!("结果: {}", self.describe(graph, verdict)),
        }
    }

    /// 否定结论的文字说明
    pub fn describe(&self, graph: &Graph, verdict: &Verdict) -> String {
        match verdict {
            Verdict::NoPathFound => "未找到路径".to_string(),
            Verdict::Disconnected => "图不连通".to_string(),
            Verdict::CyclicGraph => "图中有环，不存在拓扑序".to_string(),
            Verdict::OddDegree(v) => {
                format!("顶点 {} 的度为奇数，不存在欧拉回路", self.vertex_label(graph, *v))
            }
        }
    }

    fn verdict_of(&self, graph: &Graph, run: &Run) -> String {
        match run.trace.payload() {
            Some(Payload::Negative(verdict)) => self.describe(graph, verdict),
            _ => "无结果".to_string(),
        }
    }

    /// 打印一次算法运行的结果
    pub fn print_run(&self, graph: &Graph, run: &Run) -> String {
        let mut table = Self::table();

        match &run.outcome {
            Outcome::Order(order) => {
                table.set_titles(row!["#", "顶点"]);
                for (i, &v) in order.iter().enumerate() {
                    table.add_row(row![i + 1, self.vertex_label(graph, v)]);
                }
            }
            Outcome::Topological(Some(order)) => {
                table.set_titles(row!["序号", "顶点"]);
                for (i, &v) in order.iter().enumerate() {
                    table.add_row(row![i + 1, self.vertex_label(graph, v)]);
                }
            }
            Outcome::Path(Some(path)) => {
                table.set_titles(row!["Property", "Value"]);
                table.add_row(row!["路径", self.vertex_list(graph, &path.vertices)]);
                table.add_row(row!["边数", path.length]);
                table.add_row(row!["总权重", path.total_weight]);
            }
            Outcome::Tree(Some(tree)) => {
                table.set_titles(row!["边", "权重"]);
                for &e in &tree.edges {
                    let weight = graph.get_edge(e).map(|e| e.weight()).unwrap_or_default();
                    table.add_row(row![self.edge_label(graph, e), weight]);
                }
                table.add_row(row!["合计", tree.total_weight]);
            }
            Outcome::Flow(flow) => return self.print_flow(graph, flow),
            Outcome::Bridges(edges) | Outcome::Circuit(Some(edges)) => {
                if edges.is_empty() {
                    return format!("{}: 空\n", run.algorithm);
                }
                table.set_titles(row!["#", "边"]);
                for (i, &e) in edges.iter().enumerate() {
                    table.add_row(row![i + 1, self.edge_label(graph, e)]);
                }
            }
            Outcome::Path(None)
            | Outcome::Tree(None)
            | Outcome::Circuit(None)
            | Outcome::Topological(None) => {
                return format!("{}: {}\n", run.algorithm, self.verdict_of(graph, run));
            }
        }

        format!("{}\n{} 步\n", table, run.trace.len())
    }

    fn print_flow(&self, graph: &Graph, flow: &MaxFlow) -> String {
        let mut table = Self::table();
        table.set_titles(row!["边", "流量", "最小割"]);
        for (&e, &f) in &flow.flows {
            let capacity = graph.get_edge(e).and_then(|e| e.capacity()).unwrap_or(0);
            let cut = if flow.cut_edges().contains(&e) { "✓" } else { "" };
            table.add_row(row![self.edge_label(graph, e), format!("{}/{}", f, capacity), cut]);
        }

        let source_side: Vec<VertexId> = flow.source_side.iter().copied().collect();
        format!(
            "{}\n最大流: {}  增广次数: {}\n源侧顶点: {}\n",
            table,
            flow.value,
            flow.augmenting_paths,
            self.vertex_list(graph, &source_side)
        )
    }

    /// 打印顶点和边
    pub fn print_graph(&self, graph: &Graph) -> String {
        let edges = graph.edges();
        if graph.vertex_count() == 0 {
            return "空图\n".to_string();
        }

        let mut table = Self::table();
        table.set_titles(row!["边", "属性"]);
        for (&id, edge) in &edges {
            let attr = match edge.attr() {
                EdgeAttr::None => String::new(),
                attr => attr.to_string(),
            };
            table.add_row(row![self.edge_label(graph, id), attr]);
        }

        let vertices: Vec<String> = graph
            .nodes()
            .into_iter()
            .map(|v| format!("{}(度 {})", self.vertex_label(graph, v), graph.degree(v)))
            .collect();
        format!("顶点: {}\n{}", vertices.join(", "), table)
    }

    /// 打印统计信息
    pub fn print_stats(&self, graph: &Graph) -> String {
        let mut table = Self::table();
        table.set_titles(row!["Property", "Value"]);
        table.add_row(row!["Mode", graph.mode()]);
        table.add_row(row!["Vertex Count", graph.vertex_count()]);
        table.add_row(row!["Edge Count", graph.edge_count()]);
        table.to_string()
    }

    /// 打印帮助信息
    pub fn print_help() -> String {
        r#"
═══════════════════════════════════════════════════════════════
                   GraphLab CLI 命令帮助
═══════════════════════════════════════════════════════════════

基础命令:
  help, h, ?             显示帮助
  quit, exit, q          退出程序
  stats, info            显示图统计信息
  show, ls               列出顶点和边

编辑图 (顶点用显示编号引用):
  node, n [数量]         添加顶点
  edge, e <a> <b> [值]   添加边，值为权重 (weighted) 或容量 (capacitated)
  del-node, rm <顶点>    删除顶点及其关联边
  del-edge, rme <边 ID>  删除边，例: del-edge e3
  clear                  清空图
  reset                  把所有流量归零

算法:
  bfs <起点>             广度优先遍历
  dfs <起点>             深度优先遍历
  dijkstra <起点> <终点> Dijkstra 最短路径
  floyd <起点> <终点>    Floyd-Warshall 最短路径
  prim <起点>            Prim 最小生成树
  kruskal                Kruskal 最小生成树
  maxflow <源点> <汇点>  Edmonds-Karp 最大流 (capacitated)
  bridges                查找桥
  euler                  欧拉回路
  topo                   拓扑排序 (directed / capacitated)

以 # 开头的行为注释
═══════════════════════════════════════════════════════════════
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::Traversal;
    use crate::cli::commands::{Command, CommandResult, Session};
    use crate::types::GraphMode;

    #[test]
    fn test_labels() {
        let graph = Graph::new(GraphMode::Directed);
        let a = graph.add_node();
        let b = graph.add_node();
        let e = graph.add_edge(a, b, None).unwrap();

        let printer = Printer::new();
        assert_eq!(printer.vertex_label(&graph, a), "1");
        assert_eq!(printer.edge_label(&graph, e), format!("{} (1->2)", e));
    }

    #[test]
    fn test_format_steps() {
        colored::control::set_override(false);
        let graph = Graph::new(GraphMode::Plain);
        let a = graph.add_node();
        let b = graph.add_node();
        graph.add_edge(a, b, None).unwrap();

        let printer = Printer::new();
        let trace = Traversal::new(graph.clone()).bfs(a).unwrap().trace;
        let lines: Vec<String> = trace
            .steps()
            .iter()
            .map(|s| printer.format_step(&graph, s))
            .collect();
        assert_eq!(lines.first().map(String::as_str), Some("访问顶点 1 (暂定)"));
        assert_eq!(lines.last().map(String::as_str), Some("结果: 1 → 2"));
    }

    #[test]
    fn test_print_negative_run() {
        let mut session = Session::new(Graph::new(GraphMode::Directed));
        for line in ["node 2", "edge 1 2", "edge 2 1"] {
            session.execute(&Command::parse(line).unwrap()).unwrap();
        }
        let CommandResult::Run(run) = session.execute(&Command::Topo).unwrap() else {
            panic!("expected a run");
        };
        let text = session.printer().print_run(session.graph(), &run);
        assert!(text.contains("图中有环"));
    }

    #[test]
    fn test_print_stats() {
        let graph = Graph::new(GraphMode::Weighted);
        graph.add_node();
        let text = Printer::new().print_stats(&graph);
        assert!(text.contains("weighted"));
        assert!(text.contains("Vertex Count"));
    }
}
