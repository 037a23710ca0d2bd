/// Chain Provider - JSON-RPC 2.0 Client
///
/// `ChainProvider` is the seam between the application layer and the chain:
/// the engine only ever sees this trait, so tests run against an in-memory
/// mock and production runs against `HttpChainProvider` (reqwest over an
/// Ethereum JSON-RPC endpoint, Sepolia by default).
///
/// ## RPC methods used
/// - `eth_getTransactionCount` - nonce lookup when the cache is cold
/// - `eth_sendTransaction` - submit via the node-managed account
/// - `eth_getTransactionByHash` - confirm the mined transaction
/// - `eth_accounts` - discover the service account address

use crate::shared::metrics::METRICS;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tracing::debug;

/// 链访问错误
#[derive(Debug, Error)]
pub enum ChainError {
    /// HTTP 层错误（连接失败、超时等）
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// 节点返回的 JSON-RPC 错误对象
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// 响应格式不符合 JSON-RPC 2.0
    #[error("malformed response: {0}")]
    Malformed(String),
}

fn hex_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    u64::from_str_radix(text.trim_start_matches("0x"), 16).map_err(serde::de::Error::custom)
}

/// 链上已确认的交易（eth_getTransactionByHash 的子集）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub hash: String,
    #[serde(deserialize_with = "hex_u64", serialize_with = "as_hex")]
    pub nonce: u64,
    pub from: String,
    pub to: Option<String>,
    #[serde(rename = "blockNumber")]
    pub block_number: Option<String>,
    pub input: Option<String>,
}

fn as_hex<S>(value: &u64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&format!("{:#x}", value))
}

/// 待提交的交易（eth_sendTransaction 的参数对象）
#[derive(Debug, Clone, Serialize)]
pub struct TransactionRequest {
    pub from: String,
    pub to: String,
    /// ABI 编码的调用数据，0x 前缀十六进制
    pub data: String,
    #[serde(serialize_with = "as_hex")]
    pub nonce: u64,
    #[serde(rename = "chainId", serialize_with = "as_hex")]
    pub chain_id: u64,
}

/// 链访问接口
#[async_trait]
pub trait ChainProvider: Send + Sync {
    /// 账户已发出的交易数（即下一个可用 nonce）
    async fn transaction_count(&self, address: &str) -> Result<u64, ChainError>;

    /// 提交交易，返回交易哈希
    async fn send_transaction(&self, tx: &TransactionRequest) -> Result<String, ChainError>;

    /// 按哈希查询交易，未找到时返回 None
    async fn transaction_by_hash(&self, hash: &str) -> Result<Option<Transaction>, ChainError>;

    /// 节点托管的账户列表
    async fn accounts(&self) -> Result<Vec<String>, ChainError>;
}

// --- JSON-RPC 2.0 信封 ---

#[derive(Serialize)]
struct RpcRequest<'a, P: Serialize> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: P,
}

#[derive(Deserialize)]
struct RpcResponse {
    #[allow(dead_code)]
    jsonrpc: Option<String>,
    // 注意 "result": null 是合法结果（例如查询未知哈希），
    // 不能用 Option<Value> 表示，否则与字段缺失无法区分
    #[serde(default)]
    result: serde_json::Value,
    error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// 基于 reqwest 的 JSON-RPC provider
pub struct HttpChainProvider {
    client: reqwest::Client,
    endpoint: String,
    next_id: AtomicU64,
}

impl HttpChainProvider {
    /// 创建指向给定 RPC 端点的 provider
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            next_id: AtomicU64::new(1),
        }
    }

    /// 发送一次 JSON-RPC 调用并反序列化 result
    async fn rpc_call<P, R>(&self, method: &str, params: P) -> Result<R, ChainError>
    where
        P: Serialize + Send,
        R: DeserializeOwned,
    {
        METRICS.rpc_requests_total.with_label_values(&[method]).inc();

        let request = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        debug!(method, endpoint = %self.endpoint, "链上 RPC 请求");

        let response: RpcResponse = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?
            .json()
            .await?;

        if let Some(error) = response.error {
            return Err(ChainError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        serde_json::from_value(response.result).map_err(|e| ChainError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl ChainProvider for HttpChainProvider {
    async fn transaction_count(&self, address: &str) -> Result<u64, ChainError> {
        let count: String = self
            .rpc_call("eth_getTransactionCount", (address, "latest"))
            .await?;
        u64::from_str_radix(count.trim_start_matches("0x"), 16)
            .map_err(|e| ChainError::Malformed(format!("bad transaction count: {}", e)))
    }

    async fn send_transaction(&self, tx: &TransactionRequest) -> Result<String, ChainError> {
        self.rpc_call("eth_sendTransaction", (tx,)).await
    }

    async fn transaction_by_hash(&self, hash: &str) -> Result<Option<Transaction>, ChainError> {
        // eth_getTransactionByHash 对未知哈希返回 null
        self.rpc_call("eth_getTransactionByHash", (hash,)).await
    }

    async fn accounts(&self) -> Result<Vec<String>, ChainError> {
        // params 必须是数组，() 会被序列化成 null
        self.rpc_call("eth_accounts", Vec::<String>::new()).await
    }
}
