//! HTTP Observability Server
//!
//! 提供Prometheus metrics和健康检查端点
//!
//! ## 端点
//! - `GET /metrics` - Prometheus格式的指标
//! - `GET /health` - 健康检查
//! - `GET /health/ready` - 就绪检查
//! - `GET /health/live` - 存活检查
//!
//! ## 使用示例
//! ```rust,ignore
//! let server = ObservabilityServer::new(9090);
//! server.run().await?;
//! ```

use super::health::{HealthChecker, HealthDetails};
use crate::shared::metrics::METRICS;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

/// 可观测性服务器
pub struct ObservabilityServer {
    addr: SocketAddr,
    health_checker: Arc<HealthChecker>,
}

impl ObservabilityServer {
    /// 创建新的可观测性服务器
    pub fn new(port: u16) -> Self {
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        Self {
            addr,
            health_checker: Arc::new(HealthChecker::new(env!("CARGO_PKG_VERSION"))),
        }
    }

    /// 获取健康检查器
    pub fn health_checker(&self) -> Arc<HealthChecker> {
        self.health_checker.clone()
    }

    /// 启动HTTP服务器
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let app = Router::new()
            .route("/metrics", get(metrics_handler))
            .route("/health", get(health_handler))
            .route("/health/ready", get(readiness_handler))
            .route("/health/live", get(liveness_handler))
            .with_state(self.health_checker.clone());

        info!("可观测性服务器启动于 {}", self.addr);
        info!("Metrics端点: http://{}/metrics", self.addr);
        info!("健康检查端点: http://{}/health", self.addr);

        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}

/// Prometheus metrics端点
async fn metrics_handler() -> Response {
    let metrics = METRICS.export();
    (StatusCode::OK, metrics).into_response()
}

/// 健康检查端点
async fn health_handler(State(checker): State<Arc<HealthChecker>>) -> Response {
    // 从全局指标收集详细健康信息
    let details = HealthDetails {
        last_transfer_time: METRICS
            .last_transfer_timestamp
            .with_label_values(&["usdc"])
            .get() as u64,
        transfers_succeeded: METRICS
            .transfers_total
            .with_label_values(&["success"])
            .get() as u64,
        transfers_failed: METRICS
            .transfers_total
            .with_label_values(&["failure"])
            .get() as u64,
        active_connections: METRICS
            .active_connections
            .with_label_values(&["open"])
            .get() as u64,
    };

    let response = checker.check_health_detailed(details);

    let status_code = match response.status {
        super::health::HealthStatus::Healthy => StatusCode::OK,
        super::health::HealthStatus::Degraded => StatusCode::OK,
        super::health::HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(response)).into_response()
}

/// 就绪检查端点（用于Kubernetes readiness probe）
async fn readiness_handler(State(checker): State<Arc<HealthChecker>>) -> Response {
    if checker.check_readiness() {
        StatusCode::OK.into_response()
    } else {
        StatusCode::SERVICE_UNAVAILABLE.into_response()
    }
}

/// 存活检查端点（用于Kubernetes liveness probe）
async fn liveness_handler(State(checker): State<Arc<HealthChecker>>) -> Response {
    if checker.check_liveness() {
        StatusCode::OK.into_response()
    } else {
        StatusCode::SERVICE_UNAVAILABLE.into_response()
    }
}
