/// 时间戳工具模块
///
/// 到期判断只需要秒级精度，所有与订阅状态比较的时间
/// 都统一走这里，避免各层各自取时间造成口径不一致。

use std::time::{SystemTime, UNIX_EPOCH};

/// 获取当前 UNIX 时间戳（秒）
///
/// 系统时钟早于 UNIX_EPOCH 时返回 0，而不是 panic。
#[inline]
pub fn unix_timestamp_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// 获取当前 UNIX 时间戳（毫秒），用于延迟指标
#[inline]
pub fn unix_timestamp_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
