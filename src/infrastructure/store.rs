//! 键值存储 - 基础设施层
//!
//! 只暴露"按键读写字节"的能力，不认识表单或评语

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use crate::error::StorageError;

/// 本地键值存储
pub trait KeyValueStore {
    /// 读取键；键不存在时返回 `None`
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// 写入键，覆盖旧值
    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError>;

    /// 删除键；键不存在也算成功
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// 基于目录的存储，每个键一个文件
///
/// 写入先落到临时文件再重命名，写入失败时旧值保持不变。
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.path_for(key);
        match fs::read(&path) {
            Ok(bytes) => {
                debug!("读取 {} ({} 字节)", path.display(), bytes.len());
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::ReadFailed {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        let write_failed = |source: std::io::Error| StorageError::WriteFailed {
            key: key.to_string(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(write_failed)?;

        let path = self.path_for(key);
        let tmp_path = self.dir.join(format!("{key}.json.tmp"));
        {
            let mut file = fs::File::create(&tmp_path).map_err(write_failed)?;
            file.write_all(value).map_err(write_failed)?;
            file.sync_all().map_err(write_failed)?;
        }
        fs::rename(&tmp_path, &path).map_err(|source| {
            let _ = fs::remove_file(&tmp_path);
            write_failed(source)
        })?;

        debug!("写入 {} ({} 字节)", path.display(), value.len());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!("删除 {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::RemoveFailed {
                key: key.to_string(),
                source,
            }),
        }
    }
}

/// 内存存储（测试和不需要落盘的场景）
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>> {
        // 持锁期间不会 panic，中毒时直接取回数据
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        self.lock().insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.lock().remove(key);
        Ok(())
    }
}
