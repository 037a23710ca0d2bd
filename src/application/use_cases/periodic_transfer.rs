/// Periodic Transfer Use Case
///
/// The interval gate around `ExecuteTransferUseCase`. This is the behavior
/// behind the published `transfer_usdc_periodically` method: the gate is
/// checked first, and the subscription clock only advances after a
/// successful transfer, so a failed attempt is retried by the next call.

use crate::application::use_cases::execute_transfer::ExecuteTransferUseCase;
use crate::domain::subscription::SubscriptionState;
use crate::infrastructure::chain::ChainProvider;
use crate::shared::metrics::METRICS;
use tracing::debug;

/// Periodic Transfer Use Case
pub struct PeriodicTransferUseCase<P: ChainProvider> {
    executor: ExecuteTransferUseCase<P>,
    state: SubscriptionState,
    interval_seconds: u64,
}

impl<P: ChainProvider> PeriodicTransferUseCase<P> {
    pub fn new(
        executor: ExecuteTransferUseCase<P>,
        state: SubscriptionState,
        interval_seconds: u64,
    ) -> Self {
        Self {
            executor,
            state,
            interval_seconds,
        }
    }

    /// 订阅状态（用于持久化快照）
    pub fn state(&self) -> &SubscriptionState {
        &self.state
    }

    pub fn interval_seconds(&self) -> u64 {
        self.interval_seconds
    }

    pub fn executor(&self) -> &ExecuteTransferUseCase<P> {
        &self.executor
    }

    pub fn executor_mut(&mut self) -> &mut ExecuteTransferUseCase<P> {
        &mut self.executor
    }

    /// 执行一次受间隔约束的转账
    ///
    /// `now` 由调用方传入（统一取自 shared::timestamp），
    /// 测试里可以直接控制时间。
    pub async fn execute(&mut self, now: u64) -> Result<String, String> {
        if !self.state.is_due(now, self.interval_seconds) {
            debug!(
                seconds_until_due = self.state.seconds_until_due(now, self.interval_seconds),
                "转账未到期"
            );
            METRICS
                .transfers_total
                .with_label_values(&["not_due"])
                .inc();
            return Err("Transfer not yet due.".to_string());
        }

        let result = self.executor.execute().await;

        // 仅在成功时推进订阅时钟
        if result.is_ok() {
            self.state.record_transfer(now);
            METRICS
                .last_transfer_timestamp
                .with_label_values(&["usdc"])
                .set(now as f64);
        }

        result
    }
}
