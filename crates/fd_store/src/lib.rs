// crates/fd_store/src/lib.rs

//! FloatDash 视图文档存储
//!
//! 每个 (用户标识, 视图种类) 对应一个 JSON blob。本 crate 把原始
//! 实现"每次调用 load-mutate-dump 一个 JSON 文件"的隐式全局状态
//! 收口为 [`DocumentStore`] 抽象：
//!
//! - [`MemoryStore`]: 内存替身，供测试与一次性批处理
//! - [`FileStore`]: 目录下每键一个 JSON 文件，临时文件加改名覆写
//!
//! 重置（reset）不经过存储删除：构建器直接忽略上一版文档，
//! 随后的 save 整体覆写。

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod key;
pub mod store;

pub use key::DocKey;
pub use store::{DocumentStore, FileStore, MemoryStore, StoreError};
