//! 作业保存与恢复
//!
//! 在键值存储之上读写 `{formData, results}` 快照

use tracing::{info, warn};

use crate::error::StorageError;
use crate::infrastructure::KeyValueStore;
use crate::models::SavedSession;

/// 存储键
pub const STORAGE_KEY: &str = "aiCommentGeneratorSaveData";

pub struct SessionStore<S> {
    store: S,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// 保存快照，覆盖上一次的内容
    pub fn save(&self, session: &SavedSession) -> Result<(), StorageError> {
        let bytes =
            serde_json::to_vec(session).map_err(|source| StorageError::Serialize { source })?;
        self.store.set(STORAGE_KEY, &bytes)?;
        info!("💾 已保存作业 (评语 {} 条)", session.results.len());
        Ok(())
    }

    /// 读取快照
    ///
    /// 没有保存过时返回 `Ok(None)`。内容损坏时删除该键并返回 `Corrupt`，
    /// 之后再读取得到 `Ok(None)`。
    pub fn load(&self) -> Result<Option<SavedSession>, StorageError> {
        let Some(bytes) = self.store.get(STORAGE_KEY)? else {
            return Ok(None);
        };

        match serde_json::from_slice::<SavedSession>(&bytes) {
            Ok(session) => {
                info!("📂 已读取保存的作业 (评语 {} 条)", session.results.len());
                Ok(Some(session))
            }
            Err(source) => {
                warn!("保存的数据已损坏，删除: {}", source);
                if let Err(e) = self.store.remove(STORAGE_KEY) {
                    warn!("删除损坏数据失败: {}", e);
                }
                Err(StorageError::Corrupt { source })
            }
        }
    }

    /// 是否有保存的作业；读取失败时记日志并按"没有"处理
    pub fn has_saved_data(&self) -> bool {
        match self.store.get(STORAGE_KEY) {
            Ok(value) => value.is_some(),
            Err(e) => {
                warn!("检查保存数据失败: {}", e);
                false
            }
        }
    }
}
