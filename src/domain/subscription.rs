/// Subscription State - Interval Gating
///
/// Tracks when the recurring transfer last succeeded and decides whether a
/// new transfer is due. The gate is deliberately caller-driven: invoking
/// `transfer_usdc_periodically` before the interval has elapsed is answered
/// with an error, it never blocks or queues.
///
/// ## Rules
/// - A transfer is due when `now >= last_transfer_time + interval`
/// - `last_transfer_time` moves forward ONLY after a successful transfer;
///   failed attempts leave the schedule untouched so the next call retries

use serde::{Deserialize, Serialize};

/// 默认转账间隔：1 天
pub const DEFAULT_TRANSFER_INTERVAL_SECONDS: u64 = 86_400;

/// 订阅状态：上次成功转账的时间（UNIX 秒）
///
/// 默认值（0）表示从未转账过，首次调用总是到期的。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionState {
    pub last_transfer_time: u64,
}

impl SubscriptionState {
    /// 从未转账过的新状态
    pub fn new() -> Self {
        Self::default()
    }

    /// 间隔是否已到期
    pub fn is_due(&self, now: u64, interval_seconds: u64) -> bool {
        now >= self.last_transfer_time.saturating_add(interval_seconds)
    }

    /// 记录一次成功转账
    pub fn record_transfer(&mut self, now: u64) {
        self.last_transfer_time = now;
    }

    /// 距离下次到期还差多少秒（已到期时为 0）
    pub fn seconds_until_due(&self, now: u64, interval_seconds: u64) -> u64 {
        self.last_transfer_time
            .saturating_add(interval_seconds)
            .saturating_sub(now)
    }
}
