/// 编解码器实现
///
/// 帧内负载统一为 JSON；帧本身的 4 字节长度前缀由传输层的
/// tokio-util LengthDelimitedCodec 处理，这里只关心负载。

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use thiserror::Error;

/// 编解码器trait
pub trait WireCodec: Send {
    type Item: Send;
    type Error: std::error::Error + Send;

    /// 从一个完整帧的负载解码
    fn decode(&mut self, buf: &[u8]) -> Result<Self::Item, Self::Error>;

    /// 编码为帧负载
    fn encode(&mut self, item: &Self::Item) -> Result<Vec<u8>, Self::Error>;
}

/// 编解码错误
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("json codec error: {0}")]
    Json(#[from] serde_json::Error),
}

/// JSON编解码器
///
/// 线上契约要求结果对象恰好携带 "Ok" 或 "Err" 之一；
/// serde 的外部标签枚举表示天然满足：零键、双键、非文本负载
/// 都会在这里解码失败。
pub struct JsonCodec<T> {
    _phantom: PhantomData<T>,
}

impl<T> JsonCodec<T> {
    pub fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<T> Default for JsonCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> WireCodec for JsonCodec<T>
where
    T: Serialize + DeserializeOwned + Send,
{
    type Item = T;
    type Error = CodecError;

    fn decode(&mut self, buf: &[u8]) -> Result<Self::Item, Self::Error> {
        Ok(serde_json::from_slice(buf)?)
    }

    fn encode(&mut self, item: &Self::Item) -> Result<Vec<u8>, Self::Error> {
        Ok(serde_json::to_vec(item)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::protocol::{CallRequest, CallResult, Method};

    #[test]
    fn result_round_trip() {
        let mut codec = JsonCodec::<CallResult>::new();

        for original in [
            CallResult::Ok("x".to_string()),
            CallResult::Err("y".to_string()),
        ] {
            let encoded = codec.encode(&original).unwrap();
            let decoded = codec.decode(&encoded).unwrap();
            assert_eq!(decoded, original);
        }
    }

    #[test]
    fn result_rejects_zero_and_two_keys() {
        let mut codec = JsonCodec::<CallResult>::new();

        assert!(codec.decode(b"{}").is_err());
        assert!(codec.decode(br#"{"Ok":"a","Err":"b"}"#).is_err());
    }

    #[test]
    fn result_rejects_non_text_payload() {
        let mut codec = JsonCodec::<CallResult>::new();

        assert!(codec.decode(br#"{"Ok":42}"#).is_err());
        assert!(codec.decode(br#"{"Err":{"nested":true}}"#).is_err());
        assert!(codec.decode(br#"{"Ok":null}"#).is_err());
    }

    #[test]
    fn request_round_trip() {
        let mut codec = JsonCodec::<CallRequest>::new();

        let original = CallRequest::new(Method::TransferUsdcPeriodically);
        let encoded = codec.encode(&original).unwrap();
        let decoded = codec.decode(&encoded).unwrap();
        assert_eq!(decoded.method, "transfer_usdc_periodically");
        assert!(decoded.args.is_empty());
    }
}
