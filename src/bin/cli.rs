//! GraphLab CLI 工具
//!
//! 交互式命令行界面：编辑图、运行算法并回放轨迹

use anyhow::Context;
use clap::Parser;
use graphlab::cli::{Command, CommandResult, Replayer, Run, Session};
use graphlab::{Graph, GraphMode, ReplayConfig};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "graphlab-cli")]
#[command(about = "GraphLab 图算法命令行工具", version)]
struct Args {
    /// 图模式: plain, weighted, directed, capacitated
    #[arg(short, long, default_value = "plain")]
    mode: GraphMode,

    /// 普通步骤的回放间隔（毫秒）
    #[arg(long, default_value_t = 500)]
    step_ms: u64,

    /// 增广路径的回放间隔（毫秒）
    #[arg(long, default_value_t = 1500)]
    path_ms: u64,

    /// 不等待，立即输出全部步骤
    #[arg(long)]
    instant: bool,

    /// 以 JSON 输出结果和轨迹
    #[arg(long)]
    json: bool,

    /// 从文件读取命令
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// 执行命令后退出（多条命令用 ; 分隔）
    #[arg(short = 'e', long)]
    execute: Option<String>,

    /// 日志级别 (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

/// 初始化日志，输出到 stderr；GRAPHLAB_LOG / RUST_LOG 优先于命令行
fn init_tracing(level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_env("GRAPHLAB_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| {
            EnvFilter::new(if level.contains('=') {
                level.to_string()
            } else {
                format!("graphlab={}", level)
            })
        });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("初始化日志失败: {}", e))
}

struct Shell {
    session: Session,
    replayer: Replayer,
    json: bool,
}

impl Shell {
    /// 处理一行输入，返回是否退出
    fn handle_line(&mut self, line: &str) -> anyhow::Result<bool> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(false);
        }

        let command = Command::parse(line)?;
        match self.session.execute(&command)? {
            CommandResult::Continue => {}
            CommandResult::Exit => return Ok(true),
            CommandResult::Message(msg) => println!("{}", msg),
            CommandResult::Run(run) => self.show_run(&run)?,
        }
        Ok(false)
    }

    fn show_run(&self, run: &Run) -> anyhow::Result<()> {
        if self.json {
            println!("{}", run.to_json()?);
            return Ok(());
        }

        let stdout = io::stdout();
        let mut out = stdout.lock();
        writeln!(out, "── {} ──", run.algorithm)?;
        self.replayer.play(
            self.session.graph(),
            self.session.printer(),
            &run.trace,
            &mut out,
        )?;
        write!(
            out,
            "{}",
            self.session.printer().print_run(self.session.graph(), run)
        )?;
        Ok(())
    }

    /// 逐行执行，出错时打印后继续
    fn run_lines<I: IntoIterator<Item = String>>(&mut self, lines: I) -> bool {
        for line in lines {
            match self.handle_line(&line) {
                Ok(true) => return true,
                Ok(false) => {}
                Err(e) => eprintln!("错误: {}", e),
            }
        }
        false
    }

    fn interactive(&mut self) -> anyhow::Result<()> {
        println!("\n输入 'help' 查看命令列表，'quit' 退出\n");

        let stdin = io::stdin();
        loop {
            print!("graphlab> ");
            io::stdout().flush()?;

            let mut line = String::new();
            if stdin.lock().read_line(&mut line)? == 0 {
                break;
            }

            match self.handle_line(&line) {
                Ok(true) => break,
                Ok(false) => {}
                Err(e) => println!("错误: {}", e),
            }
        }

        println!("再见！");
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level)?;

    let replay = ReplayConfig {
        step_delay: Duration::from_millis(args.step_ms),
        path_delay: Duration::from_millis(args.path_ms),
        instant: args.instant || args.json,
        ..ReplayConfig::default()
    };

    let mut shell = Shell {
        session: Session::new(Graph::new(args.mode)),
        replayer: Replayer::new(replay),
        json: args.json,
    };

    if let Some(path) = &args.script {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("无法读取脚本 {}", path.display()))?;
        if shell.run_lines(text.lines().map(str::to_string)) {
            return Ok(());
        }
    }

    if let Some(commands) = &args.execute {
        shell.run_lines(commands.split(';').map(str::to_string));
        return Ok(());
    }

    if args.script.is_some() {
        return Ok(());
    }

    println!("GraphLab CLI v{} - 图算法轨迹回放", graphlab::VERSION);
    println!("=============================================");
    println!("图模式: {}", args.mode);
    shell.interactive()
}
