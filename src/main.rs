//! ghn CLI
//!
//! 启动顺序：参数 → 配置 → 日志 → 凭据 → 客户端 → 交互界面

use anyhow::{Context, Result};
use clap::Parser;
use ghn::{credential, logging, tui};
use ghn::{ActionExecutor, Args, Config, Desktop, GitHubClient, NotificationApi, SyncEngine};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // --help / --version 正常退出，其余参数错误退出码 1
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Exiting with error");
            eprintln!("ghn: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let config = Config::from_args(&args)?;

    if let Err(e) = logging::init(&config.log_path) {
        eprintln!("ghn: logging disabled: {:#}", e);
    }
    info!(
        api_url = %config.api_url,
        interval_secs = config.interval.as_secs_f64(),
        include_read = config.include_read,
        "Starting ghn"
    );

    let token = credential::load_token()?;
    let client = GitHubClient::new(token, &config.api_url, config.request_timeout)
        .context("failed to build GitHub client")?;
    let api: Arc<dyn NotificationApi> = Arc::new(client);

    let executor = ActionExecutor::new(api.clone(), Arc::new(Desktop::new()));
    let engine = SyncEngine::new(api, config.include_read, config.interval);

    tui::run(&config, engine, executor).await
}
