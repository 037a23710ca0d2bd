/// CLI Interface Module
///
/// This module provides command-line interface functionality for the
/// transfer engine. It serves as the primary entry point for the
/// application when run as a standalone service.
///
/// ## Responsibilities
/// - Parse command-line arguments
/// - Initialize logging and load persisted state
/// - Wire the chain provider, service loop, network server and
///   observability server together
/// - Handle graceful shutdown

use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::application::services::transfer_service::{EngineCommand, TransferService};
use crate::application::use_cases::execute_transfer::{ExecuteTransferUseCase, TransferConfig};
use crate::application::use_cases::periodic_transfer::PeriodicTransferUseCase;
use crate::domain::nonce::NonceTracker;
use crate::domain::subscription::DEFAULT_TRANSFER_INTERVAL_SECONDS;
use crate::infrastructure::chain::HttpChainProvider;
use crate::infrastructure::network;
use crate::infrastructure::observability::ObservabilityServer;
use crate::infrastructure::storage::StateStore;
use crate::shared::protocol::{CallResult, Method};

/// 转账引擎命令行配置
#[derive(Parser, Debug, Clone)]
#[command(name = "transfer-engine")]
#[command(author = "Transfer Engine Team")]
#[command(version = "0.1.0")]
#[command(about = "周期性USDC转账引擎", long_about = None)]
pub struct CliConfig {
    /// 服务器监听地址
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// 服务器监听端口
    #[arg(short, long, default_value_t = 8080)]
    pub port: u16,

    /// 可观测性HTTP端口（metrics与健康检查）
    #[arg(long, default_value_t = 9090)]
    pub metrics_port: u16,

    /// 链上 JSON-RPC 端点（可被环境变量 ETH_RPC_URL 覆盖）
    #[arg(
        short = 'r',
        long,
        default_value = "https://ethereum-sepolia-rpc.publicnode.com"
    )]
    pub rpc_url: String,

    /// ERC-20 合约地址
    #[arg(long, default_value = "0x1c7d4b196cb0c7b01d743fbc6116a902379c7238")]
    pub token_address: String,

    /// 出资方地址（transferFrom 的 from）
    #[arg(long, default_value = "0x63A0bfd6a5cdCF446ae12135E2CD86b908659563")]
    pub funding_address: String,

    /// 服务账户地址（不配置时向节点查询第一个托管账户）
    #[arg(long)]
    pub sender: Option<String>,

    /// 转账金额（代币最小单位）
    #[arg(short = 'a', long, default_value_t = 1)]
    pub amount: u128,

    /// 转账间隔（秒）
    #[arg(short = 'i', long, default_value_t = DEFAULT_TRANSFER_INTERVAL_SECONDS)]
    pub interval: u64,

    /// 链 ID
    #[arg(long, default_value_t = 11_155_111)]
    pub chain_id: u64,

    /// 状态文件路径
    #[arg(long, default_value = "transfer_engine_state.json")]
    pub state_file: PathBuf,

    /// 禁用状态持久化
    #[arg(long, default_value_t = false)]
    pub no_persist: bool,

    /// 启用内部定时触发（无需外部调用方）
    #[arg(long, default_value_t = false)]
    pub self_trigger: bool,

    /// 日志级别
    #[arg(short = 'l', long, default_value = "info", value_parser = ["trace", "debug", "info", "warn", "error"])]
    pub log_level: String,

    /// 仅显示配置不启动服务器（用于调试）
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

/// Runs the CLI application
///
/// This is the main entry point for the CLI interface.
/// Parses command-line arguments and wires up the transfer engine.
pub async fn run() {
    // 解析命令行参数
    let config = CliConfig::parse();

    // 初始化日志系统
    init_logging(&config.log_level);

    // RPC 端点允许用环境变量覆盖，便于不把私有端点写进启动脚本
    let rpc_url = std::env::var("ETH_RPC_URL").unwrap_or_else(|_| config.rpc_url.clone());

    tracing::info!("转账引擎启动");
    tracing::info!("配置: {:?}", config);

    // 显示配置信息
    println!("========================================");
    println!("  周期性USDC转账引擎 v0.1.0");
    println!("========================================");
    println!("监听地址:     {}:{}", config.host, config.port);
    println!("RPC端点:      {}", rpc_url);
    println!("合约地址:     {}", config.token_address);
    println!("出资方:       {}", config.funding_address);
    println!("转账金额:     {}", config.amount);
    println!("转账间隔:     {} 秒", config.interval);
    println!("链 ID:        {}", config.chain_id);
    println!("定时触发:     {}", if config.self_trigger { "启用" } else { "禁用" });
    println!("日志级别:     {}", config.log_level);
    println!("========================================");

    // 如果是dry-run模式，仅显示配置
    if config.dry_run {
        println!("\nDry-run 模式 - 不启动服务器");
        return;
    }

    // 加载持久化状态
    let store = if config.no_persist {
        None
    } else {
        Some(StateStore::new(&config.state_file))
    };
    let saved = match store.as_ref().map(|s| s.load()).transpose() {
        Ok(saved) => saved.unwrap_or_default(),
        Err(e) => {
            warn!("状态文件读取失败，使用全新状态: {}", e);
            Default::default()
        }
    };
    info!(
        last_transfer_time = saved.subscription.last_transfer_time,
        last_nonce = ?saved.last_nonce,
        "订阅状态已加载"
    );

    // 组装链访问与用例
    let provider = Arc::new(HttpChainProvider::new(rpc_url));
    let transfer_config = TransferConfig {
        token_address: config.token_address.clone(),
        funding_address: config.funding_address.clone(),
        sender: config.sender.clone(),
        amount: config.amount,
        chain_id: config.chain_id,
    };
    let executor = ExecuteTransferUseCase::new(
        provider,
        NonceTracker::from_saved(saved.last_nonce),
        transfer_config,
    );
    let periodic = PeriodicTransferUseCase::new(executor, saved.subscription, config.interval);

    // 命令通道与服务事件循环
    let (command_sender, command_receiver) = mpsc::unbounded_channel();
    let mut service = TransferService::new(periodic, store, command_receiver);
    tokio::spawn(async move {
        service.run().await;
    });

    // 可观测性服务器
    let observability = ObservabilityServer::new(config.metrics_port);
    tokio::spawn(async move {
        if let Err(e) = observability.run().await {
            warn!("可观测性服务器退出: {}", e);
        }
    });

    // 内部定时触发
    if config.self_trigger {
        spawn_self_trigger(command_sender.clone(), config.interval);
    }

    // 网络服务器与优雅关闭
    let addr = SocketAddr::new(config.host, config.port);
    tokio::select! {
        result = network::run_server(addr, command_sender) => {
            if let Err(e) = result {
                tracing::error!("网络服务器退出: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("收到关闭信号，正在退出");
        }
    }
}

/// 定时触发任务：按配置的间隔发起一次周期性转账
fn spawn_self_trigger(
    command_sender: mpsc::UnboundedSender<EngineCommand>,
    interval_seconds: u64,
) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(interval_seconds.max(1)));
        loop {
            ticker.tick().await;
            let (command, reply) = EngineCommand::for_method(Method::TransferUsdcPeriodically);
            if command_sender.send(command).is_err() {
                break;
            }
            match reply.await {
                Ok(CallResult::Ok(_)) => info!("定时触发转账成功"),
                Ok(CallResult::Err(e)) if e == "Transfer not yet due." => {
                    debug!("定时触发: 转账未到期");
                }
                Ok(CallResult::Err(e)) => warn!("定时触发转账失败: {}", e),
                Err(_) => break,
            }
        }
    });
}

/// 初始化日志系统
fn init_logging(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
