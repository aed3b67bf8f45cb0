//! 终端交互界面
//!
//! 文本命令编辑图、运行算法，并按回放节奏逐步打印轨迹

pub mod commands;
pub mod printer;
pub mod replay;

pub use commands::{Command, CommandResult, Outcome, Run, Session};
pub use printer::Printer;
pub use replay::Replayer;
