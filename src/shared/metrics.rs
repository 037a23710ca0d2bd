//! Prometheus Metrics Module
//!
//! 提供转账引擎的核心运行指标监控
//!
//! ## 指标类型
//! - **Counter**: 调用总数、转账总数、链上请求数、错误数
//! - **Histogram**: 转账执行延迟、RPC 延迟
//! - **Gauge**: 活跃连接数、上次成功转账时间
//!
//! ## 使用示例
//! ```rust,ignore
//! use transfer_engine::shared::metrics::METRICS;
//!
//! // 记录一次调用
//! METRICS.calls_total.with_label_values(&["transfer_usdc_periodically"]).inc();
//!
//! // 记录转账延迟（毫秒口径，显式观测；start_timer() 观测的是秒）
//! let started_ms = unix_timestamp_millis();
//! // ... 执行转账 ...
//! METRICS.transfer_duration
//!     .with_label_values(&["transfer_usdc"])
//!     .observe(unix_timestamp_millis().saturating_sub(started_ms) as f64);
//! ```

use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec, register_gauge_vec, register_histogram_vec, CounterVec, Encoder,
    GaugeVec, HistogramVec, TextEncoder,
};

lazy_static! {
    /// 全局Metrics实例
    pub static ref METRICS: Metrics = Metrics::new();
}

/// 转账引擎核心指标
pub struct Metrics {
    /// 远程调用总数 (按方法名)
    pub calls_total: CounterVec,

    /// 转账结果总数 (按结果: success/failure/not_due)
    pub transfers_total: CounterVec,

    /// 链上 JSON-RPC 请求总数 (按 RPC 方法)
    pub rpc_requests_total: CounterVec,

    /// 转账执行延迟分布 (毫秒)
    pub transfer_duration: HistogramVec,

    /// 活跃连接数
    pub active_connections: GaugeVec,

    /// 上次成功转账的 UNIX 时间戳（秒）
    pub last_transfer_timestamp: GaugeVec,

    /// 错误总数 (按类型)
    pub errors_total: CounterVec,
}

impl Metrics {
    /// 创建新的Metrics实例
    pub fn new() -> Self {
        Self {
            calls_total: register_counter_vec!(
                "transfer_engine_calls_total",
                "Total number of remote calls received",
                &["method"]
            )
            .unwrap(),

            transfers_total: register_counter_vec!(
                "transfer_engine_transfers_total",
                "Total number of transfer attempts",
                &["result"]
            )
            .unwrap(),

            rpc_requests_total: register_counter_vec!(
                "transfer_engine_rpc_requests_total",
                "Total number of chain JSON-RPC requests",
                &["rpc_method"]
            )
            .unwrap(),

            transfer_duration: register_histogram_vec!(
                "transfer_engine_transfer_duration_milliseconds",
                "Transfer execution duration in milliseconds",
                &["method"],
                vec![10.0, 50.0, 100.0, 500.0, 1000.0, 5000.0, 15000.0, 60000.0]
            )
            .unwrap(),

            active_connections: register_gauge_vec!(
                "transfer_engine_active_connections",
                "Number of active client connections",
                &["status"]
            )
            .unwrap(),

            last_transfer_timestamp: register_gauge_vec!(
                "transfer_engine_last_transfer_timestamp_seconds",
                "Unix timestamp of the last successful transfer",
                &["token"]
            )
            .unwrap(),

            errors_total: register_counter_vec!(
                "transfer_engine_errors_total",
                "Total number of errors",
                &["error_type"]
            )
            .unwrap(),
        }
    }

    /// 导出Prometheus格式的指标
    pub fn export(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = prometheus::gather();
        let mut buffer = vec![];
        encoder.encode(&metric_families, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    /// 重置所有指标（仅用于测试）
    #[cfg(test)]
    pub fn reset(&self) {
        self.calls_total.reset();
        self.transfers_total.reset();
        self.rpc_requests_total.reset();
        self.active_connections.reset();
        self.last_transfer_timestamp.reset();
        self.errors_total.reset();
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_global() {
        // 使用全局METRICS实例而不是创建新的
        METRICS
            .calls_total
            .with_label_values(&["transfer_usdc_periodically"])
            .inc();

        // 测试导出
        let output = METRICS.export();
        assert!(output.contains("transfer_engine_calls_total"));
    }

    #[test]
    fn test_histogram_global() {
        METRICS
            .transfer_duration
            .with_label_values(&["transfer_usdc"])
            .observe(125.5);

        let output = METRICS.export();
        assert!(output.contains("transfer_engine_transfer_duration_milliseconds"));
    }

    #[test]
    fn test_gauge_global() {
        METRICS
            .active_connections
            .with_label_values(&["open"])
            .set(3.0);

        let output = METRICS.export();
        assert!(output.contains("transfer_engine_active_connections"));
    }
}
