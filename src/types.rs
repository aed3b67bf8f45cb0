//! 通用类型定义
//!
//! 图模式与边属性

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 图模式
///
/// 决定边的方向性以及边上携带的数值属性。同一张图只能处于一种模式，
/// 带权边和带容量边不会同时出现。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphMode {
    /// 无向、无属性（BFS/DFS、桥、欧拉回路）
    Plain,
    /// 无向、带非负权重（最短路、最小生成树）
    Weighted,
    /// 有向、无属性（拓扑排序）
    Directed,
    /// 有向、带整数容量与流量（最大流）
    Capacitated,
}

impl GraphMode {
    /// 边是否有向
    pub fn is_directed(&self) -> bool {
        matches!(self, GraphMode::Directed | GraphMode::Capacitated)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GraphMode::Plain => "plain",
            GraphMode::Weighted => "weighted",
            GraphMode::Directed => "directed",
            GraphMode::Capacitated => "capacitated",
        }
    }
}

impl fmt::Display for GraphMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GraphMode {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "plain" | "p" => Ok(GraphMode::Plain),
            "weighted" | "w" => Ok(GraphMode::Weighted),
            "directed" | "d" => Ok(GraphMode::Directed),
            "capacitated" | "flow" | "c" => Ok(GraphMode::Capacitated),
            other => Err(crate::Error::ParseError(format!("未知的图模式: {}", other))),
        }
    }
}

/// 边属性
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EdgeAttr {
    /// 无属性
    None,
    /// 权重
    Weight(f64),
    /// 容量与当前流量
    Capacity { capacity: u64, flow: u64 },
}

impl EdgeAttr {
    /// 按图模式校验调用方给出的数值并生成属性
    ///
    /// 带权模式下缺省权重为 1.0；容量必须是非负整数。
    pub fn from_input(mode: GraphMode, value: Option<f64>) -> crate::Result<Self> {
        use crate::Error::InvalidAttribute;

        match (mode, value) {
            (GraphMode::Plain | GraphMode::Directed, None) => Ok(EdgeAttr::None),
            (GraphMode::Plain | GraphMode::Directed, Some(v)) => Err(InvalidAttribute(format!(
                "{} 模式的边不携带数值, 收到 {}",
                mode, v
            ))),
            (GraphMode::Weighted, None) => Ok(EdgeAttr::Weight(1.0)),
            (GraphMode::Weighted, Some(w)) => {
                if !w.is_finite() || w < 0.0 {
                    return Err(InvalidAttribute(format!("权重必须是非负有限数, 收到 {}", w)));
                }
                Ok(EdgeAttr::Weight(w))
            }
            (GraphMode::Capacitated, None) => {
                Err(InvalidAttribute("容量模式的边必须给出容量".to_string()))
            }
            (GraphMode::Capacitated, Some(c)) => {
                if !c.is_finite() || c < 0.0 || c.fract() != 0.0 || c >= u64::MAX as f64 {
                    return Err(InvalidAttribute(format!(
                        "容量必须是非负整数, 收到 {}",
                        c
                    )));
                }
                Ok(EdgeAttr::Capacity {
                    capacity: c as u64,
                    flow: 0,
                })
            }
        }
    }

    /// 数值视图：权重、容量，无属性时为 1.0
    pub fn value(&self) -> f64 {
        match self {
            EdgeAttr::None => 1.0,
            EdgeAttr::Weight(w) => *w,
            EdgeAttr::Capacity { capacity, .. } => *capacity as f64,
        }
    }
}

impl fmt::Display for EdgeAttr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeAttr::None => f.write_str("-"),
            EdgeAttr::Weight(w) => write!(f, "{}", w),
            EdgeAttr::Capacity { capacity, flow } => write!(f, "{}/{}", flow, capacity),
        }
    }
}
