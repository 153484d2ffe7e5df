// crates/fd_store/src/store.rs

//! 存储后端模块
//!
//! 提供视图文档持久化存储的抽象和实现。
//!
//! 文档以 JSON blob 为单位读写：load 返回上一版文档或"不存在"，
//! save 做整体覆写。读-改-写在基线设计中不保证原子性，但写入
//! 本身必须整体替换文档，崩溃不得留下半写状态。

use crate::key::DocKey;
use fd_foundation::error::FdError;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 存储错误
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 序列化错误
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// 其他错误
    #[error("{0}")]
    Other(String),
}

impl From<StoreError> for FdError {
    fn from(err: StoreError) -> Self {
        FdError::store(err.to_string())
    }
}

/// 视图文档存储后端trait
///
/// 任何满足"按键读取上一版、整体覆写"契约的后端（文件、对象
/// 存储、内嵌 KV）都可以实现本 trait；测试用 [`MemoryStore`] 替身。
pub trait DocumentStore: Send + Sync {
    /// 读取文档，不存在时返回 `None`
    fn load(&self, key: &DocKey) -> Result<Option<Value>, StoreError>;

    /// 整体覆写文档
    fn save(&self, key: &DocKey, doc: &Value) -> Result<(), StoreError>;

    /// 删除文档
    fn delete(&self, key: &DocKey) -> Result<(), StoreError>;

    /// 检查文档是否存在
    fn exists(&self, key: &DocKey) -> Result<bool, StoreError> {
        Ok(self.load(key)?.is_some())
    }
}

// ============================================================
// 内存存储
// ============================================================

/// 内存存储
///
/// 以文件名为键的内存映射，用于测试替身与一次性批处理。
#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
    /// 创建新的内存存储
    pub fn new() -> Self {
        Self {
            docs: RwLock::new(HashMap::new()),
        }
    }

    /// 当前文档数量
    pub fn len(&self) -> usize {
        self.docs.read().len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.docs.read().is_empty()
    }
}

impl DocumentStore for MemoryStore {
    fn load(&self, key: &DocKey) -> Result<Option<Value>, StoreError> {
        Ok(self.docs.read().get(&key.filename()).cloned())
    }

    fn save(&self, key: &DocKey, doc: &Value) -> Result<(), StoreError> {
        self.docs.write().insert(key.filename(), doc.clone());
        Ok(())
    }

    fn delete(&self, key: &DocKey) -> Result<(), StoreError> {
        self.docs.write().remove(&key.filename());
        Ok(())
    }
}

// ============================================================
// 文件存储
// ============================================================

/// 文件存储
///
/// 每个文档键对应目录下一个 JSON 文件。写入先落到同目录
/// 临时文件再改名，崩溃时旧文档保持完整。
#[derive(Debug)]
pub struct FileStore {
    /// 存储目录
    dir: PathBuf,
}

impl FileStore {
    /// 创建新的文件存储，目录不存在时自动创建
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// 获取文档文件路径
    fn doc_path(&self, key: &DocKey) -> PathBuf {
        self.dir.join(key.filename())
    }

    /// 获取存储目录
    pub fn directory(&self) -> &Path {
        &self.dir
    }
}

impl DocumentStore for FileStore {
    fn load(&self, key: &DocKey) -> Result<Option<Value>, StoreError> {
        let path = self.doc_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let json = std::fs::read_to_string(&path)?;
        let doc =
            serde_json::from_str(&json).map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(Some(doc))
    }

    fn save(&self, key: &DocKey, doc: &Value) -> Result<(), StoreError> {
        let path = self.doc_path(key);
        let json = serde_json::to_string_pretty(doc)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        // 先写临时文件再改名，保证不会出现半写文档
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn delete(&self, key: &DocKey) -> Result<(), StoreError> {
        let path = self.doc_path(key);
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    fn exists(&self, key: &DocKey) -> Result<bool, StoreError> {
        Ok(self.doc_path(key).exists())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_key() -> DocKey {
        DocKey::Timeseries {
            usr_id: "n0572".into(),
        }
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        let key = sample_key();

        assert!(store.load(&key).unwrap().is_none());
        assert!(!store.exists(&key).unwrap());

        let doc = json!({"mld": [12.5]});
        store.save(&key, &doc).unwrap();
        assert_eq!(store.load(&key).unwrap().unwrap(), doc);
        assert!(store.exists(&key).unwrap());

        store.delete(&key).unwrap();
        assert!(store.load(&key).unwrap().is_none());
    }

    #[test]
    fn test_memory_store_overwrite() {
        let store = MemoryStore::new();
        let key = sample_key();

        store.save(&key, &json!({"v": 1})).unwrap();
        store.save(&key, &json!({"v": 2})).unwrap();
        // 整体覆写，不合并
        assert_eq!(store.load(&key).unwrap().unwrap(), json!({"v": 2}));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();
        let key = sample_key();

        assert!(store.load(&key).unwrap().is_none());

        let doc = json!({"dt": ["2016-03-10T16:40:35Z"], "mld": [null, 12.5]});
        store.save(&key, &doc).unwrap();
        assert!(dir.path().join("n0572.timeseries.json").exists());
        assert_eq!(store.load(&key).unwrap().unwrap(), doc);

        store.delete(&key).unwrap();
        assert!(!store.exists(&key).unwrap());
    }

    #[test]
    fn test_file_store_no_tmp_leftover() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();
        store.save(&sample_key(), &json!({})).unwrap();

        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_file_store_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("dashboard").join("json");
        let store = FileStore::new(&nested).unwrap();
        assert_eq!(store.directory(), nested.as_path());
        assert!(nested.is_dir());
    }
}
