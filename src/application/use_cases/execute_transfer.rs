/// Execute Transfer Use Case
///
/// This use case performs one on-chain USDC transfer. It is the ungated
/// counterpart of the periodic transfer: every invocation attempts a real
/// transaction.
///
/// ## Workflow
/// 1. Resolve the service account (configured sender, or the node's first
///    managed account)
/// 2. Resolve the nonce: cached last-consumed + 1, otherwise ask the
///    provider (falling back to 0 on provider error)
/// 3. Build `transferFrom(funding, service, amount)` calldata and submit
/// 4. Fetch the mined transaction by hash; record its nonce in the cache
///
/// ## Result mapping
/// The wire contract carries text in both branches, so success is the
/// Debug rendering of the mined transaction and every failure is rendered
/// into the error text. A submission that yields a hash without a visible
/// transaction answers `Err("Could not get transaction.")`.

use crate::domain::nonce::NonceTracker;
use crate::infrastructure::chain::erc20;
use crate::infrastructure::chain::{ChainProvider, TransactionRequest};
use crate::shared::metrics::METRICS;
use crate::shared::timestamp::unix_timestamp_millis;
use std::sync::Arc;
use tracing::{info, warn};

/// 转账参数（默认值对应 Sepolia 测试网上的 USDC 订阅）
#[derive(Debug, Clone)]
pub struct TransferConfig {
    /// ERC-20 合约地址
    pub token_address: String,
    /// 出资方地址（transferFrom 的 from）
    pub funding_address: String,
    /// 服务账户地址；不配置时向节点查询
    pub sender: Option<String>,
    /// 转账金额（代币最小单位）
    pub amount: u128,
    /// 链 ID
    pub chain_id: u64,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            token_address: "0x1c7d4b196cb0c7b01d743fbc6116a902379c7238".to_string(),
            funding_address: "0x63A0bfd6a5cdCF446ae12135E2CD86b908659563".to_string(),
            sender: None,
            amount: 1,
            chain_id: 11_155_111,
        }
    }
}

/// Execute Transfer Use Case
///
/// Generic over the chain provider to support dependency injection.
pub struct ExecuteTransferUseCase<P: ChainProvider> {
    provider: Arc<P>,
    nonce: NonceTracker,
    config: TransferConfig,
}

impl<P: ChainProvider> ExecuteTransferUseCase<P> {
    /// Creates a new use case with a provided chain provider
    pub fn new(provider: Arc<P>, nonce: NonceTracker, config: TransferConfig) -> Self {
        Self {
            provider,
            nonce,
            config,
        }
    }

    /// Nonce 缓存（用于持久化快照）
    pub fn nonce(&self) -> &NonceTracker {
        &self.nonce
    }

    pub fn config(&self) -> &TransferConfig {
        &self.config
    }

    /// 服务账户地址
    pub async fn sender_address(&self) -> Result<String, String> {
        if let Some(sender) = &self.config.sender {
            return Ok(sender.clone());
        }
        match self.provider.accounts().await {
            Ok(accounts) => accounts
                .into_iter()
                .next()
                .ok_or_else(|| "No service account available.".to_string()),
            Err(e) => Err(format!("{:?}", e)),
        }
    }

    /// 执行一次转账
    pub async fn execute(&mut self) -> Result<String, String> {
        let sender = self.sender_address().await?;

        // 有缓存时下一个 nonce 是缓存值 + 1，否则向链上查询
        let nonce = match self.nonce.next_hint() {
            Some(nonce) => nonce,
            None => self
                .provider
                .transaction_count(&sender)
                .await
                .unwrap_or(0),
        };

        let data = erc20::transfer_from_calldata(
            &self.config.funding_address,
            &sender,
            self.config.amount,
        )
        .map_err(|e| format!("{:?}", e))?;

        let request = TransactionRequest {
            from: sender.clone(),
            to: self.config.token_address.clone(),
            data,
            nonce,
            chain_id: self.config.chain_id,
        };

        // 直方图口径是毫秒，显式观测；start_timer() 观测的是秒
        let started_ms = unix_timestamp_millis();

        let outcome = match self.provider.send_transaction(&request).await {
            Ok(hash) => match self.provider.transaction_by_hash(&hash).await {
                Ok(Some(tx)) => {
                    // 交易已上链，nonce 已被消耗；记下来，下一笔用 +1
                    self.nonce.record_consumed(tx.nonce);
                    info!(hash = %tx.hash, nonce = tx.nonce, "转账已上链");
                    Ok(format!("{:?}", tx))
                }
                Ok(None) => Err("Could not get transaction.".to_string()),
                Err(e) => Err(format!("{:?}", e)),
            },
            Err(e) => Err(format!("{:?}", e)),
        };

        METRICS
            .transfer_duration
            .with_label_values(&["transfer_usdc"])
            .observe(unix_timestamp_millis().saturating_sub(started_ms) as f64);

        match &outcome {
            Ok(_) => METRICS
                .transfers_total
                .with_label_values(&["success"])
                .inc(),
            Err(e) => {
                warn!("转账失败: {}", e);
                METRICS
                    .transfers_total
                    .with_label_values(&["failure"])
                    .inc();
            }
        }

        outcome
    }
}
