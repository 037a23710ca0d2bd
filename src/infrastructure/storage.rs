/// State Persistence - Subscription Snapshot
///
/// The engine survives restarts by writing a small JSON snapshot after every
/// successful transfer: the subscription clock and the last consumed nonce.
/// A missing file is not an error, it simply means a fresh engine.

use crate::domain::subscription::SubscriptionState;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 落盘的引擎状态
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    pub subscription: SubscriptionState,
    pub last_nonce: Option<u64>,
}

/// 持久化错误
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("state file is not valid json: {0}")]
    Serde(#[from] serde_json::Error),
}

/// 基于单个 JSON 文件的状态存储
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 读取状态；文件不存在时返回默认值（全新引擎）
    pub fn load(&self) -> Result<PersistedState, StorageError> {
        if !self.path.exists() {
            return Ok(PersistedState::default());
        }
        let raw = std::fs::read(&self.path)?;
        Ok(serde_json::from_slice(&raw)?)
    }

    /// 写入状态快照
    pub fn save(&self, state: &PersistedState) -> Result<(), StorageError> {
        let raw = serde_json::to_vec_pretty(state)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }
}
