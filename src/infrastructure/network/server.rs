// 启动网络服务器：接受 TCP 连接，按帧处理远程调用请求

use crate::application::services::transfer_service::EngineCommand;
use crate::domain::validation::CallValidator;
use crate::infrastructure::network::codec::{JsonCodec, WireCodec};
use crate::shared::metrics::METRICS;
use crate::shared::protocol::{CallRequest, CallResult};
use futures::stream::StreamExt;
use futures::SinkExt;
use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_util::codec::{Framed, LengthDelimitedCodec};
use tracing::{error, info, warn};

/// 接受循环：每个连接一个任务
pub async fn run_server(
    addr: SocketAddr,
    command_sender: mpsc::UnboundedSender<EngineCommand>,
) -> std::io::Result<()> {
    let listener = TcpListener::bind(&addr).await?;
    info!("服务器正在监听: {}", addr);

    loop {
        let (stream, peer) = listener.accept().await?;
        info!("接受新连接: {}", peer);
        let command_sender_clone = command_sender.clone();

        tokio::spawn(async move {
            METRICS
                .active_connections
                .with_label_values(&["open"])
                .inc();
            handle_connection(stream, command_sender_clone).await;
            METRICS
                .active_connections
                .with_label_values(&["open"])
                .dec();
            info!("连接 {} 已关闭", peer);
        });
    }
}

// 处理单个客户端连接：一问一答，顺序处理
async fn handle_connection(
    stream: TcpStream,
    command_sender: mpsc::UnboundedSender<EngineCommand>,
) {
    let mut framed = Framed::new(stream, LengthDelimitedCodec::new());
    let mut request_codec = JsonCodec::<CallRequest>::new();
    let mut result_codec = JsonCodec::<CallResult>::new();
    let validator = CallValidator::new();

    while let Some(frame) = framed.next().await {
        let frame = match frame {
            Ok(frame) => frame,
            Err(e) => {
                warn!("处理连接时出错: {}", e);
                break;
            }
        };

        let result = dispatch(&frame, &validator, &mut request_codec, &command_sender).await;

        let encoded = match result_codec.encode(&result) {
            Ok(encoded) => encoded,
            Err(e) => {
                error!("编码响应失败: {}", e);
                break;
            }
        };

        if framed.send(encoded.into()).await.is_err() {
            warn!("发送数据到客户端失败");
            break;
        }
    }
}

/// 解码、校验并把调用转发给引擎，任何失败都以 Err 分支回应
async fn dispatch(
    frame: &[u8],
    validator: &CallValidator,
    request_codec: &mut JsonCodec<CallRequest>,
    command_sender: &mpsc::UnboundedSender<EngineCommand>,
) -> CallResult {
    let request = match request_codec.decode(frame) {
        Ok(request) => request,
        Err(e) => {
            METRICS.errors_total.with_label_values(&["decode"]).inc();
            return CallResult::Err(format!("Malformed request: {}", e));
        }
    };

    let method = match validator.validate(&request) {
        Ok(method) => method,
        Err(e) => {
            METRICS
                .errors_total
                .with_label_values(&["validation"])
                .inc();
            return CallResult::Err(e.to_string());
        }
    };

    METRICS
        .calls_total
        .with_label_values(&[method.name()])
        .inc();

    let (command, reply) = EngineCommand::for_method(method);
    if command_sender.send(command).is_err() {
        // 引擎已经退出，命令通道关闭
        return CallResult::Err("Engine is shutting down.".to_string());
    }

    match reply.await {
        Ok(result) => result,
        Err(_) => CallResult::Err("Engine dropped the call.".to_string()),
    }
}
