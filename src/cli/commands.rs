//! 命令解析与执行
//!
//! 每行一条命令，顶点用显示编号引用

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use super::printer::Printer;
use crate::algorithm::{
    Bridges, EdmondsKarp, EulerianCircuit, MaxFlow, PathResult, ShortestPath, SpanningTree,
    SpanningTreeResult, TopologicalSort, Trace, Traversal,
};
use crate::error::{Error, Result};
use crate::graph::{EdgeId, Graph, VertexId};

/// 控制台命令
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Quit,
    Stats,
    /// 列出顶点和边
    Show,
    /// 添加若干顶点
    AddNode(usize),
    AddEdge { a: u64, b: u64, value: Option<f64> },
    DeleteNode(u64),
    DeleteEdge(u64),
    Clear,
    ResetFlows,
    Bfs(u64),
    Dfs(u64),
    Dijkstra(u64, u64),
    Floyd(u64, u64),
    Prim(u64),
    Kruskal,
    MaxFlow(u64, u64),
    Bridges,
    Euler,
    Topo,
}

impl Command {
    /// 解析一行输入
    pub fn parse(input: &str) -> Result<Self> {
        let mut parts = input.split_whitespace();
        let cmd = parts
            .next()
            .ok_or_else(|| Error::ParseError("空命令".to_string()))?
            .to_lowercase();
        let args: Vec<&str> = parts.collect();

        let command = match cmd.as_str() {
            "help" | "h" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            "stats" | "info" => Command::Stats,
            "show" | "ls" => Command::Show,
            "node" | "n" => match args.first() {
                Some(count) => Command::AddNode(parse_number(count, "顶点数量")?),
                None => Command::AddNode(1),
            },
            "edge" | "e" => {
                expect_args(&args, 2, 3, "edge <a> <b> [权重/容量]")?;
                let value = match args.get(2) {
                    Some(v) => Some(
                        v.parse::<f64>()
                            .map_err(|_| Error::ParseError(format!("无效的数值: {}", v)))?,
                    ),
                    None => None,
                };
                Command::AddEdge {
                    a: parse_label(args[0])?,
                    b: parse_label(args[1])?,
                    value,
                }
            }
            "del-node" | "rm" => {
                expect_args(&args, 1, 1, "del-node <顶点>")?;
                Command::DeleteNode(parse_label(args[0])?)
            }
            "del-edge" | "rme" => {
                expect_args(&args, 1, 1, "del-edge <边 ID>")?;
                Command::DeleteEdge(parse_number(args[0].trim_start_matches('e'), "边 ID")?)
            }
            "clear" => Command::Clear,
            "reset" => Command::ResetFlows,
            "bfs" => {
                expect_args(&args, 1, 1, "bfs <起点>")?;
                Command::Bfs(parse_label(args[0])?)
            }
            "dfs" => {
                expect_args(&args, 1, 1, "dfs <起点>")?;
                Command::Dfs(parse_label(args[0])?)
            }
            "dijkstra" | "path" => {
                expect_args(&args, 2, 2, "dijkstra <起点> <终点>")?;
                Command::Dijkstra(parse_label(args[0])?, parse_label(args[1])?)
            }
            "floyd" => {
                expect_args(&args, 2, 2, "floyd <起点> <终点>")?;
                Command::Floyd(parse_label(args[0])?, parse_label(args[1])?)
            }
            "prim" => {
                expect_args(&args, 1, 1, "prim <起点>")?;
                Command::Prim(parse_label(args[0])?)
            }
            "kruskal" => Command::Kruskal,
            "maxflow" | "flow" => {
                expect_args(&args, 2, 2, "maxflow <源点> <汇点>")?;
                Command::MaxFlow(parse_label(args[0])?, parse_label(args[1])?)
            }
            "bridges" => Command::Bridges,
            "euler" | "eulerian" => Command::Euler,
            "topo" | "toposort" => Command::Topo,
            _ => {
                return Err(Error::ParseError(format!(
                    "未知命令: {}。输入 'help' 查看帮助。",
                    cmd
                )))
            }
        };

        Ok(command)
    }
}

fn expect_args(args: &[&str], min: usize, max: usize, usage: &str) -> Result<()> {
    if args.len() < min || args.len() > max {
        return Err(Error::ParseError(format!("用法: {}", usage)));
    }
    Ok(())
}

fn parse_number<T: std::str::FromStr>(s: &str, what: &str) -> Result<T> {
    s.parse()
        .map_err(|_| Error::ParseError(format!("无效的{}: {}", what, s)))
}

fn parse_label(s: &str) -> Result<u64> {
    parse_number(s, "顶点编号")
}

/// 单次算法运行的结果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// 遍历顺序
    Order(Vec<VertexId>),
    Path(Option<PathResult>),
    Tree(Option<SpanningTreeResult>),
    Flow(MaxFlow),
    /// 桥
    Bridges(Vec<EdgeId>),
    Circuit(Option<Vec<EdgeId>>),
    Topological(Option<Vec<VertexId>>),
}

/// 一次算法运行：名称、结果和待回放的轨迹
#[derive(Debug, Clone, Serialize)]
pub struct Run {
    pub algorithm: &'static str,
    pub outcome: Outcome,
    pub trace: Trace,
}

impl Run {
    fn new(algorithm: &'static str, outcome: Outcome, trace: Trace) -> Self {
        Self {
            algorithm,
            outcome,
            trace,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// 命令执行结果
#[derive(Debug)]
pub enum CommandResult {
    /// 继续运行
    Continue,
    /// 退出程序
    Exit,
    /// 显示消息
    Message(String),
    /// 算法运行完成
    Run(Run),
}

/// 控制台会话：当前图和打印器
pub struct Session {
    graph: Arc<Graph>,
    printer: Printer,
}

impl Session {
    pub fn new(graph: Arc<Graph>) -> Self {
        Self {
            graph,
            printer: Printer::default(),
        }
    }

    pub fn graph(&self) -> &Arc<Graph> {
        &self.graph
    }

    pub fn printer(&self) -> &Printer {
        &self.printer
    }

    /// 显示编号对应的顶点
    ///
    /// 显示编号就是 ID 的数值；不存在的编号原样交给算法，由算法报告
    /// 起点/终点不存在。
    fn vertex(&self, label: u64) -> VertexId {
        VertexId::new(label)
    }

    /// 执行命令
    pub fn execute(&mut self, command: &Command) -> Result<CommandResult> {
        debug!(?command, "executing command");
        let graph = self.graph.clone();

        let result = match *command {
            Command::Help => CommandResult::Message(Printer::print_help()),
            Command::Quit => CommandResult::Exit,
            Command::Stats => CommandResult::Message(self.printer.print_stats(&graph)),
            Command::Show => CommandResult::Message(self.printer.print_graph(&graph)),
            Command::AddNode(count) => {
                let labels: Vec<String> = (0..count)
                    .map(|_| self.printer.vertex_label(&graph, graph.add_node()))
                    .collect();
                CommandResult::Message(format!("已添加顶点: {}", labels.join(", ")))
            }
            Command::AddEdge { a, b, value } => {
                let id = graph.add_edge(self.vertex(a), self.vertex(b), value)?;
                CommandResult::Message(format!("已添加边 {}", id))
            }
            Command::DeleteNode(label) => {
                graph.delete_node(self.vertex(label));
                CommandResult::Continue
            }
            Command::DeleteEdge(id) => {
                if graph.delete_edge(EdgeId::new(id)) {
                    CommandResult::Continue
                } else {
                    CommandResult::Message(format!("边 {} 不存在", EdgeId::new(id)))
                }
            }
            Command::Clear => {
                graph.clear();
                CommandResult::Message("图已清空".to_string())
            }
            Command::ResetFlows => {
                graph.reset_flows();
                CommandResult::Continue
            }
            Command::Bfs(start) => {
                let (order, trace) = Traversal::new(graph).bfs(self.vertex(start))?.into_parts();
                CommandResult::Run(Run::new("bfs", Outcome::Order(order), trace))
            }
            Command::Dfs(start) => {
                let (order, trace) = Traversal::new(graph).dfs(self.vertex(start))?.into_parts();
                CommandResult::Run(Run::new("dfs", Outcome::Order(order), trace))
            }
            Command::Dijkstra(start, end) => {
                let (path, trace) = ShortestPath::new(graph)
                    .dijkstra(self.vertex(start), self.vertex(end))?
                    .into_parts();
                CommandResult::Run(Run::new("dijkstra", Outcome::Path(path), trace))
            }
            Command::Floyd(start, end) => {
                let (path, trace) = ShortestPath::new(graph)
                    .floyd_warshall(self.vertex(start), self.vertex(end))?
                    .into_parts();
                CommandResult::Run(Run::new("floyd", Outcome::Path(path), trace))
            }
            Command::Prim(start) => {
                let (tree, trace) = SpanningTree::new(graph).prim(self.vertex(start))?.into_parts();
                CommandResult::Run(Run::new("prim", Outcome::Tree(tree), trace))
            }
            Command::Kruskal => {
                let (tree, trace) = SpanningTree::new(graph).kruskal()?.into_parts();
                CommandResult::Run(Run::new("kruskal", Outcome::Tree(tree), trace))
            }
            Command::MaxFlow(source, sink) => {
                let (flow, trace) = EdmondsKarp::new(graph)
                    .max_flow(self.vertex(source), self.vertex(sink))?
                    .into_parts();
                CommandResult::Run(Run::new("maxflow", Outcome::Flow(flow), trace))
            }
            Command::Bridges => {
                let (bridges, trace) = Bridges::new(graph).find()?.into_parts();
                CommandResult::Run(Run::new("bridges", Outcome::Bridges(bridges), trace))
            }
            Command::Euler => {
                let (circuit, trace) = EulerianCircuit::new(graph).find()?.into_parts();
                CommandResult::Run(Run::new("euler", Outcome::Circuit(circuit), trace))
            }
            Command::Topo => {
                let (order, trace) = TopologicalSort::new(graph).sort()?.into_parts();
                CommandResult::Run(Run::new("topo", Outcome::Topological(order), trace))
            }
        };

        Ok(result)
    }
}
