// 周期性转账的间隔门控与 nonce 语义测试
//
// 用内存中的 MockChain 替代真实链，逐条验证：
// - 未到期的调用返回 "Transfer not yet due." 且不触链
// - 只有成功的转账才推进订阅时钟
// - nonce 首次向链上查询，之后使用缓存 + 1
// - 服务事件循环的命令分发与状态落盘

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use transfer_engine::application::services::transfer_service::{EngineCommand, TransferService};
use transfer_engine::application::use_cases::execute_transfer::{
    ExecuteTransferUseCase, TransferConfig,
};
use transfer_engine::application::use_cases::periodic_transfer::PeriodicTransferUseCase;
use transfer_engine::domain::nonce::NonceTracker;
use transfer_engine::domain::subscription::SubscriptionState;
use transfer_engine::infrastructure::chain::{
    ChainError, ChainProvider, Transaction, TransactionRequest,
};
use transfer_engine::infrastructure::storage::StateStore;
use transfer_engine::shared::metrics::METRICS;
use transfer_engine::shared::protocol::{CallResult, Method};

const SERVICE_ACCOUNT: &str = "0x00000000000000000000000000000000000000aa";
const FUNDING_ACCOUNT: &str = "0x63A0bfd6a5cdCF446ae12135E2CD86b908659563";

#[derive(Default)]
struct MockState {
    transaction_count: u64,
    count_calls: u64,
    account_calls: u64,
    fail_send: bool,
    fail_count_lookup: bool,
    missing_transaction: bool,
    send_delay_ms: u64,
    sent: Vec<TransactionRequest>,
}

#[derive(Default)]
struct MockChain {
    state: Mutex<MockState>,
}

impl MockChain {
    fn sent(&self) -> Vec<TransactionRequest> {
        self.state.lock().sent.clone()
    }
}

#[async_trait]
impl ChainProvider for MockChain {
    async fn transaction_count(&self, _address: &str) -> Result<u64, ChainError> {
        let mut state = self.state.lock();
        state.count_calls += 1;
        if state.fail_count_lookup {
            return Err(ChainError::Rpc {
                code: -32000,
                message: "node unavailable".to_string(),
            });
        }
        Ok(state.transaction_count)
    }

    async fn send_transaction(&self, tx: &TransactionRequest) -> Result<String, ChainError> {
        // 锁在 sleep 前释放（parking_lot 的 guard 不能跨 await）
        let (delay_ms, hash) = {
            let mut state = self.state.lock();
            if state.fail_send {
                return Err(ChainError::Rpc {
                    code: -32000,
                    message: "insufficient funds".to_string(),
                });
            }
            state.sent.push(tx.clone());
            (state.send_delay_ms, format!("0xhash{:02x}", state.sent.len()))
        };
        if delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }
        Ok(hash)
    }

    async fn transaction_by_hash(&self, hash: &str) -> Result<Option<Transaction>, ChainError> {
        let state = self.state.lock();
        if state.missing_transaction {
            return Ok(None);
        }
        let last = match state.sent.last() {
            Some(last) => last,
            None => return Ok(None),
        };
        Ok(Some(Transaction {
            hash: hash.to_string(),
            nonce: last.nonce,
            from: last.from.clone(),
            to: Some(last.to.clone()),
            block_number: Some("0x10".to_string()),
            input: Some(last.data.clone()),
        }))
    }

    async fn accounts(&self) -> Result<Vec<String>, ChainError> {
        let mut state = self.state.lock();
        state.account_calls += 1;
        Ok(vec![SERVICE_ACCOUNT.to_string()])
    }
}

fn test_config() -> TransferConfig {
    TransferConfig {
        funding_address: FUNDING_ACCOUNT.to_string(),
        ..TransferConfig::default()
    }
}

fn periodic(
    chain: &Arc<MockChain>,
    interval: u64,
) -> PeriodicTransferUseCase<MockChain> {
    let executor = ExecuteTransferUseCase::new(
        Arc::clone(chain),
        NonceTracker::new(),
        test_config(),
    );
    PeriodicTransferUseCase::new(executor, SubscriptionState::new(), interval)
}

#[tokio::test]
async fn fresh_subscription_transfers_immediately() {
    let chain = Arc::new(MockChain::default());
    let mut use_case = periodic(&chain, 86_400);

    let result = use_case.execute(1_000).await;
    assert!(result.is_ok());
    assert_eq!(use_case.state().last_transfer_time, 1_000);

    let sent = chain.sent();
    assert_eq!(sent.len(), 1);
    // transferFrom(funding, service, amount) 的调用数据
    assert!(sent[0].data.starts_with("0x23b872dd"));
    assert!(sent[0]
        .data
        .contains("63a0bfd6a5cdcf446ae12135e2cd86b908659563"));
    assert_eq!(sent[0].to, test_config().token_address);
    assert_eq!(sent[0].from, SERVICE_ACCOUNT);
}

#[tokio::test]
async fn call_before_interval_is_rejected_without_chain_access() {
    let chain = Arc::new(MockChain::default());
    let mut use_case = periodic(&chain, 86_400);

    assert!(use_case.execute(1_000).await.is_ok());

    // 到期前 1 秒仍被拒绝
    let result = use_case.execute(1_000 + 86_399).await;
    assert_eq!(result, Err("Transfer not yet due.".to_string()));
    assert_eq!(chain.sent().len(), 1);

    // 到期整点放行
    assert!(use_case.execute(1_000 + 86_400).await.is_ok());
    assert_eq!(chain.sent().len(), 2);
}

#[tokio::test]
async fn failed_transfer_leaves_schedule_untouched() {
    let chain = Arc::new(MockChain::default());
    chain.state.lock().fail_send = true;
    let mut use_case = periodic(&chain, 86_400);

    let result = use_case.execute(1_000).await;
    assert!(result.is_err());
    assert_eq!(use_case.state().last_transfer_time, 0);

    // 失败后下一次调用立即重试，无需等待间隔
    chain.state.lock().fail_send = false;
    assert!(use_case.execute(1_001).await.is_ok());
    assert_eq!(use_case.state().last_transfer_time, 1_001);
}

#[tokio::test]
async fn missing_transaction_yields_exact_error() {
    let chain = Arc::new(MockChain::default());
    chain.state.lock().missing_transaction = true;
    let mut use_case = periodic(&chain, 86_400);

    let result = use_case.execute(1_000).await;
    assert_eq!(result, Err("Could not get transaction.".to_string()));
    // 提交失败的尝试不推进时钟
    assert_eq!(use_case.state().last_transfer_time, 0);
}

#[tokio::test]
async fn nonce_is_fetched_once_then_cached() {
    let chain = Arc::new(MockChain::default());
    chain.state.lock().transaction_count = 7;
    let mut use_case = periodic(&chain, 100);

    assert!(use_case.execute(1_000).await.is_ok());
    assert!(use_case.execute(2_000).await.is_ok());
    assert!(use_case.execute(3_000).await.is_ok());

    let sent = chain.sent();
    assert_eq!(
        sent.iter().map(|tx| tx.nonce).collect::<Vec<_>>(),
        vec![7, 8, 9]
    );
    // 只有第一笔查询了链上 nonce
    assert_eq!(chain.state.lock().count_calls, 1);
}

#[tokio::test]
async fn nonce_lookup_failure_falls_back_to_zero() {
    let chain = Arc::new(MockChain::default());
    chain.state.lock().fail_count_lookup = true;
    let mut use_case = periodic(&chain, 100);

    assert!(use_case.execute(1_000).await.is_ok());
    assert_eq!(chain.sent()[0].nonce, 0);
}

#[tokio::test]
async fn configured_sender_skips_account_lookup() {
    let chain = Arc::new(MockChain::default());
    let executor = ExecuteTransferUseCase::new(
        Arc::clone(&chain),
        NonceTracker::new(),
        TransferConfig {
            sender: Some(SERVICE_ACCOUNT.to_string()),
            funding_address: FUNDING_ACCOUNT.to_string(),
            ..TransferConfig::default()
        },
    );
    let mut use_case = PeriodicTransferUseCase::new(executor, SubscriptionState::new(), 100);

    assert!(use_case.execute(1_000).await.is_ok());
    assert_eq!(chain.state.lock().account_calls, 0);
    assert_eq!(chain.sent()[0].from, SERVICE_ACCOUNT);
}

#[tokio::test]
async fn transfer_duration_is_recorded_in_milliseconds() {
    let chain = Arc::new(MockChain::default());
    chain.state.lock().send_delay_ms = 50;
    let mut use_case = periodic(&chain, 100);

    let histogram = METRICS.transfer_duration.with_label_values(&["transfer_usdc"]);
    let sum_before = histogram.get_sample_sum();

    assert!(use_case.execute(1_000).await.is_ok());

    // 直方图名为 milliseconds：50ms 的提交延迟应观测出几十的量级，
    // 若按秒口径记录则只会增加约 0.05
    let elapsed = histogram.get_sample_sum() - sum_before;
    assert!(
        elapsed >= 40.0,
        "observed {} is not in millisecond scale",
        elapsed
    );
}

#[tokio::test]
async fn service_loop_dispatches_and_persists() {
    let dir = tempfile::tempdir().unwrap();
    let store = StateStore::new(dir.path().join("state.json"));
    let chain = Arc::new(MockChain::default());
    let use_case = periodic(&chain, 86_400);

    let (command_sender, command_receiver) = mpsc::unbounded_channel();
    let mut service = TransferService::new(use_case, Some(store), command_receiver);
    let handle = tokio::spawn(async move { service.run().await });

    // get_address 查询服务账户
    let (command, reply) = EngineCommand::for_method(Method::GetAddress);
    command_sender.send(command).unwrap();
    assert_eq!(
        reply.await.unwrap(),
        CallResult::Ok(SERVICE_ACCOUNT.to_string())
    );

    // 周期性转账：第一次成功
    let (command, reply) = EngineCommand::for_method(Method::TransferUsdcPeriodically);
    command_sender.send(command).unwrap();
    assert!(reply.await.unwrap().is_ok());

    // 第二次立即调用被门控拒绝
    let (command, reply) = EngineCommand::for_method(Method::TransferUsdcPeriodically);
    command_sender.send(command).unwrap();
    assert_eq!(
        reply.await.unwrap(),
        CallResult::Err("Transfer not yet due.".to_string())
    );

    // 成功转账后的状态已经落盘
    let saved = StateStore::new(dir.path().join("state.json")).load().unwrap();
    assert!(saved.subscription.last_transfer_time > 0);
    assert_eq!(saved.last_nonce, Some(0));

    drop(command_sender);
    handle.await.unwrap();
}
