//! 轨迹回放
//!
//! 按 [`ReplayConfig`] 的节奏逐步输出步骤。最大流的流量更新同时写回
//! 图上的边，回放结束后 `show` 能看到最终流量。

use std::io::Write;
use std::thread;

use tracing::{debug, warn};

use super::printer::Printer;
use crate::algorithm::{Payload, Step, Target, Trace, Value};
use crate::config::ReplayConfig;
use crate::error::Result;
use crate::graph::Graph;

/// 轨迹回放器
pub struct Replayer {
    config: ReplayConfig,
}

impl Replayer {
    pub fn new(config: ReplayConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReplayConfig {
        &self.config
    }

    /// 逐步回放，返回输出的步骤数
    pub fn play<W: Write>(
        &self,
        graph: &Graph,
        printer: &Printer,
        trace: &Trace,
        out: &mut W,
    ) -> Result<usize> {
        if matches!(trace.payload(), Some(Payload::Flow(_))) {
            graph.reset_flows();
        }

        for (i, step) in trace.steps().iter().enumerate() {
            self.apply(graph, step);
            writeln!(out, "{:>4}  {}", i + 1, printer.format_step(graph, step))?;
            out.flush()?;

            let delay = self.config.delay_for(step);
            if !delay.is_zero() {
                thread::sleep(delay);
            }
        }

        debug!(steps = trace.len(), "replay finished");
        Ok(trace.len())
    }

    /// 把流量更新写回图
    fn apply(&self, graph: &Graph, step: &Step) {
        if let Step::UpdateValue {
            target: Target::Edge(edge),
            value: Value::Flow { flow, .. },
        } = step
        {
            if let Err(e) = graph.set_flow(*edge, *flow) {
                warn!(edge = %edge, error = %e, "cannot apply flow update");
            }
        }
    }
}

impl Default for Replayer {
    fn default() -> Self {
        Self::new(ReplayConfig::default())
    }
}
