//! 错误类型定义

use crate::graph::VertexId;
use crate::types::GraphMode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("起点不存在: {0}")]
    UnknownStart(VertexId),

    #[error("终点不存在: {0}")]
    UnknownEnd(VertexId),

    #[error("无效的边端点: {0}")]
    InvalidEndpoint(String),

    #[error("无效的源点/汇点: {0}")]
    InvalidTerminal(String),

    #[error("无效的边属性: {0}")]
    InvalidAttribute(String),

    #[error("图模式不匹配: 需要 {expected}, 实际为 {actual}")]
    ModeMismatch {
        expected: &'static str,
        actual: GraphMode,
    },

    #[error("解析错误: {0}")]
    ParseError(String),

    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),

    #[error("序列化错误: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::SerializationError(e.to_string())
    }
}
