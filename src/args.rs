use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// xo-locator - 在一次请求作用域内解析并查看服务
#[derive(Parser, Debug)]
#[command(name = "xo-locator")]
#[command(about = "Resolve XO Web services from a request-scoped container")]
pub struct Args {
    /// 子命令
    #[command(subcommand)]
    pub command: Command,

    /// 配置文件路径
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// 会话令牌（覆盖 XO_SESSION_TOKEN）
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// 会话用户名，与 --token 一起使用
    #[arg(long, global = true, requires = "token")]
    pub user: Option<String>,

    /// 输出调试日志
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// 解析一个或多个标识符并打印结果
    Resolve {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// 匹配请求路径并解析对应的控制器
    Route { path: String },
    /// 打印配置项，例如 log.email
    Config { key: String },
}
