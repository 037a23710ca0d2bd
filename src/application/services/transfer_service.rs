/// Transfer Service - Engine Event Loop
///
/// This service coordinates the transfer use cases behind a single command
/// channel. It handles one command at a time, which makes the
/// due-check / transfer / record sequence atomic with respect to concurrent
/// callers without any locking.
///
/// ## Architecture
/// - Receives commands via MPSC channel, one per published method
/// - Each command carries a oneshot reply channel with the `CallResult`
/// - Persists the subscription snapshot after every successful transfer
/// - **Generic over the ChainProvider implementation** for dependency
///   injection (tests run against an in-memory mock)
///
/// ## Usage
/// ```rust,ignore
/// use tokio::sync::mpsc;
///
/// let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
/// let mut service = TransferService::new(periodic, Some(store), cmd_rx);
/// tokio::spawn(async move { service.run().await });
///
/// let (command, reply) = EngineCommand::for_method(Method::TransferUsdcPeriodically);
/// cmd_tx.send(command)?;
/// let result = reply.await?;
/// ```

use crate::application::use_cases::periodic_transfer::PeriodicTransferUseCase;
use crate::infrastructure::chain::ChainProvider;
use crate::infrastructure::storage::{PersistedState, StateStore};
use crate::shared::protocol::{CallResult, Method};
use crate::shared::timestamp::unix_timestamp_secs;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::oneshot;
use tracing::{error, info};

/// Commands that the transfer engine can receive
#[derive(Debug)]
pub enum EngineCommand {
    TransferUsdcPeriodically { reply: oneshot::Sender<CallResult> },
    TransferUsdc { reply: oneshot::Sender<CallResult> },
    GetAddress { reply: oneshot::Sender<CallResult> },
}

impl EngineCommand {
    /// 为一个已校验的方法构造命令和对应的应答通道
    pub fn for_method(method: Method) -> (Self, oneshot::Receiver<CallResult>) {
        let (reply, receiver) = oneshot::channel();
        let command = match method {
            Method::TransferUsdcPeriodically => EngineCommand::TransferUsdcPeriodically { reply },
            Method::TransferUsdc => EngineCommand::TransferUsdc { reply },
            Method::GetAddress => EngineCommand::GetAddress { reply },
        };
        (command, receiver)
    }
}

/// Transfer Service
///
/// Processes commands sequentially against a single subscription.
///
/// # Type Parameters
/// * `P` - Chain provider implementation (must implement `ChainProvider`)
pub struct TransferService<P: ChainProvider> {
    periodic: PeriodicTransferUseCase<P>,
    store: Option<StateStore>,
    command_receiver: UnboundedReceiver<EngineCommand>,
}

impl<P: ChainProvider> TransferService<P> {
    /// Creates a new transfer service
    ///
    /// # Arguments
    /// * `periodic` - The gated transfer use case (owns the executor)
    /// * `store` - Optional state store; `None` disables persistence
    /// * `command_receiver` - Channel to receive commands
    pub fn new(
        periodic: PeriodicTransferUseCase<P>,
        store: Option<StateStore>,
        command_receiver: UnboundedReceiver<EngineCommand>,
    ) -> Self {
        Self {
            periodic,
            store,
            command_receiver,
        }
    }

    /// Runs the main event loop
    ///
    /// Processes commands until the channel is closed. This is the primary
    /// entry point for the service; spawn it on the runtime.
    pub async fn run(&mut self) {
        info!("转账引擎启动...");
        while let Some(command) = self.command_receiver.recv().await {
            match command {
                EngineCommand::TransferUsdcPeriodically { reply } => {
                    let now = unix_timestamp_secs();
                    let result = self.periodic.execute(now).await;
                    if result.is_ok() {
                        self.persist();
                    }
                    // 调用方提前断开时应答会失败，这是正常现象
                    let _ = reply.send(result.into());
                }
                EngineCommand::TransferUsdc { reply } => {
                    let result = self.periodic.executor_mut().execute().await;
                    if result.is_ok() {
                        self.persist();
                    }
                    let _ = reply.send(result.into());
                }
                EngineCommand::GetAddress { reply } => {
                    let result = self.periodic.executor().sender_address().await;
                    let _ = reply.send(result.into());
                }
            }
        }
        info!("转账引擎关闭。");
    }

    /// 当前订阅快照
    pub fn snapshot(&self) -> PersistedState {
        PersistedState {
            subscription: *self.periodic.state(),
            last_nonce: self.periodic.executor().nonce().last_consumed(),
        }
    }

    fn persist(&self) {
        if let Some(store) = &self.store {
            if let Err(e) = store.save(&self.snapshot()) {
                error!("状态持久化失败: {}", e);
            }
        }
    }
}
