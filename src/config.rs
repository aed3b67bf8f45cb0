//! 回放配置
//!
//! 外部界面逐步显示轨迹时每一步停留的时长。引擎本身不读取这些值。

use crate::algorithm::Step;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 轨迹回放节奏
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayConfig {
    /// 普通步骤（遍历、生成树、拓扑等）
    pub step_delay: Duration,
    /// 最大流增广路径高亮
    pub path_delay: Duration,
    /// 最大流流量标签更新
    pub flow_update_delay: Duration,
    /// 不等待，直接输出全部步骤
    pub instant: bool,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            step_delay: Duration::from_millis(500),
            path_delay: Duration::from_millis(1500),
            flow_update_delay: Duration::from_millis(500),
            instant: false,
        }
    }
}

impl ReplayConfig {
    /// 不带延迟的配置
    pub fn instant() -> Self {
        Self {
            instant: true,
            ..Self::default()
        }
    }

    /// 设置普通步骤时长
    pub fn with_step_delay(mut self, delay: Duration) -> Self {
        self.step_delay = delay;
        self
    }

    /// 设置增广路径时长
    pub fn with_path_delay(mut self, delay: Duration) -> Self {
        self.path_delay = delay;
        self
    }

    /// 步骤显示后应停留的时长
    ///
    /// 终止步骤不停留。
    pub fn delay_for(&self, step: &Step) -> Duration {
        if self.instant {
            return Duration::ZERO;
        }
        match step {
            Step::Result(_) => Duration::ZERO,
            Step::SelectPath { .. } => self.path_delay,
            Step::UpdateValue {
                value: crate::algorithm::Value::Flow { .. },
                ..
            } => self.flow_update_delay,
            _ => self.step_delay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::{NodeRole, Payload, Target, Value};
    use crate::graph::{EdgeId, VertexId};

    #[test]
    fn test_default_cadence() {
        let config = ReplayConfig::default();
        let visit = Step::VisitNode {
            node: VertexId::new(1),
            role: NodeRole::Confirmed,
        };
        let path = Step::SelectPath {
            edges: vec![EdgeId::new(1)],
            amount: 3,
        };
        let flow = Step::UpdateValue {
            target: Target::Edge(EdgeId::new(1)),
            value: Value::Flow {
                flow: 3,
                capacity: 5,
            },
        };

        assert_eq!(config.delay_for(&visit), Duration::from_millis(500));
        assert_eq!(config.delay_for(&path), Duration::from_millis(1500));
        assert_eq!(config.delay_for(&flow), Duration::from_millis(500));
        assert_eq!(config.delay_for(&Step::Result(Payload::Flow(3))), Duration::ZERO);
    }

    #[test]
    fn test_instant() {
        let config = ReplayConfig::instant();
        let rank = Step::UpdateValue {
            target: Target::Node(VertexId::new(1)),
            value: Value::Rank(1),
        };
        assert_eq!(config.delay_for(&rank), Duration::ZERO);
    }

    #[test]
    fn test_builder() {
        let config = ReplayConfig::default()
            .with_step_delay(Duration::from_millis(10))
            .with_path_delay(Duration::from_millis(30));
        assert_eq!(config.step_delay, Duration::from_millis(10));
        assert_eq!(config.path_delay, Duration::from_millis(30));
        assert!(!config.instant);
    }

    #[test]
    fn test_serde() {
        let json = serde_json::to_string(&ReplayConfig::default()).unwrap();
        let back: ReplayConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ReplayConfig::default());
    }
}
