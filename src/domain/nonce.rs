/// Nonce Tracker - Transaction Sequence Cache
///
/// Keeps the nonce of the last transaction known to have been mined for the
/// service account. While a cached value exists, the next transaction uses
/// `cached + 1` without a provider round-trip; only the very first transfer
/// (or a restart without persisted state) consults the provider.
///
/// The cache is advanced from the mined transaction's own nonce, not from
/// the value we attempted to use, so a rejected submission never burns a
/// sequence number.

/// 交易 nonce 缓存
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NonceTracker {
    last_consumed: Option<u64>,
}

impl NonceTracker {
    /// 无缓存的新跟踪器
    pub fn new() -> Self {
        Self::default()
    }

    /// 从持久化状态恢复
    pub fn from_saved(last_consumed: Option<u64>) -> Self {
        Self { last_consumed }
    }

    /// 下一个应使用的 nonce；无缓存时返回 None，由调用方向链上查询
    pub fn next_hint(&self) -> Option<u64> {
        self.last_consumed.map(|nonce| nonce + 1)
    }

    /// 记录已上链交易消耗的 nonce
    pub fn record_consumed(&mut self, nonce: u64) {
        self.last_consumed = Some(nonce);
    }

    /// 上次消耗的 nonce（用于持久化）
    pub fn last_consumed(&self) -> Option<u64> {
        self.last_consumed
    }
}
