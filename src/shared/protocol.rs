use serde::{Deserialize, Serialize};

/// 远程调用的方法名集合
///
/// 方法名是线上兼容性的一部分，改名会破坏与现有客户端的兼容。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// 周期性转账：仅当间隔已到期时才真正执行转账
    TransferUsdcPeriodically,
    /// 直接转账（不做间隔检查）
    TransferUsdc,
    /// 查询服务账户地址
    GetAddress,
}

impl Method {
    /// 从线上方法名解析，未知方法返回 None
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "transfer_usdc_periodically" => Some(Method::TransferUsdcPeriodically),
            "transfer_usdc" => Some(Method::TransferUsdc),
            "get_address" => Some(Method::GetAddress),
            _ => None,
        }
    }

    /// 线上方法名
    pub fn name(&self) -> &'static str {
        match self {
            Method::TransferUsdcPeriodically => "transfer_usdc_periodically",
            Method::TransferUsdc => "transfer_usdc",
            Method::GetAddress => "get_address",
        }
    }
}

/// 客户端发起的远程调用请求
///
/// 所有方法都是零参数的，args 只是为了在编码层面显式地表达
/// "空参数列表"；非空的 args 会在校验层被拒绝。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallRequest {
    pub method: String,
    #[serde(default)]
    pub args: Vec<serde_json::Value>,
}

impl CallRequest {
    /// 构造一个零参数调用
    pub fn new(method: Method) -> Self {
        CallRequest {
            method: method.name().to_string(),
            args: Vec::new(),
        }
    }
}

/// 远程调用结果，两个互斥的分支各携带一段文本
///
/// 序列化为恰好含一个键（"Ok" 或 "Err"）的 JSON 对象；
/// 零个键、两个键或非文本负载在解码时都会失败。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallResult {
    Ok(String),
    Err(String),
}

impl CallResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, CallResult::Ok(_))
    }

    /// 结果中的文本负载（不区分分支）
    pub fn payload(&self) -> &str {
        match self {
            CallResult::Ok(text) | CallResult::Err(text) => text,
        }
    }
}

impl From<Result<String, String>> for CallResult {
    fn from(result: Result<String, String>) -> Self {
        match result {
            Ok(text) => CallResult::Ok(text),
            Err(text) => CallResult::Err(text),
        }
    }
}
