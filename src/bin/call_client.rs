// 调用客户端：连接运行中的引擎，发起一次远程调用并打印结果
//
// 用法: call_client [方法名] [服务器地址]
// 方法名默认为 transfer_usdc_periodically

use futures::{SinkExt, StreamExt};
use std::time::Instant;
use tokio::net::TcpStream;
use tokio_util::codec::{Framed, LengthDelimitedCodec};
use transfer_engine::shared::protocol::{CallRequest, CallResult, Method};

const DEFAULT_SERVER_ADDR: &str = "127.0.0.1:8080";

#[tokio::main]
async fn main() {
    let mut args = std::env::args().skip(1);
    let method_name = args
        .next()
        .unwrap_or_else(|| Method::TransferUsdcPeriodically.name().to_string());
    let addr = args.next().unwrap_or_else(|| DEFAULT_SERVER_ADDR.to_string());

    let stream = match TcpStream::connect(&addr).await {
        Ok(stream) => stream,
        Err(e) => {
            eprintln!("连接失败 {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    let mut framed = Framed::new(stream, LengthDelimitedCodec::new());

    let request = CallRequest {
        method: method_name.clone(),
        args: Vec::new(),
    };
    let encoded = serde_json::to_vec(&request).expect("请求编码失败");

    println!("调用 {} @ {}", method_name, addr);
    let start = Instant::now();

    if let Err(e) = framed.send(encoded.into()).await {
        eprintln!("发送请求失败: {}", e);
        std::process::exit(1);
    }

    match framed.next().await {
        Some(Ok(frame)) => {
            let elapsed = start.elapsed();
            match serde_json::from_slice::<CallResult>(&frame) {
                Ok(CallResult::Ok(text)) => {
                    println!("Ok ({:?}):", elapsed);
                    println!("{}", text);
                }
                Ok(CallResult::Err(text)) => {
                    println!("Err ({:?}):", elapsed);
                    println!("{}", text);
                    std::process::exit(2);
                }
                Err(e) => {
                    eprintln!("无法解析的响应: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Err(e)) => {
            eprintln!("读取响应失败: {}", e);
            std::process::exit(1);
        }
        None => {
            eprintln!("服务器关闭了连接");
            std::process::exit(1);
        }
    }
}
