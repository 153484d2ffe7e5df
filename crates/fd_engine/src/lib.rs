// crates/fd_engine/src/lib.rs

//! FloatDash 增量聚合引擎
//!
//! 摄取自主浮标的离散垂直剖面观测，维护监控仪表盘渲染所需的
//! 四类持续更新视图：
//!
//! - [`snapshot`]: 单剖面快照（每剖面一个文档）
//! - [`timeseries`]: 混合层时序（中位数与 5/95 百分位）
//! - [`contour`]: 深度-时间等值图（规范压力轴上的最近邻重采样）
//! - [`track`]: 地理轨迹（GeoJSON Point + LineString）
//!
//! 核心契约：给定一条新剖面消息与先前持久化的视图文档，
//! 产出替换文档；每次更新后（含冷启动与强制重置）文档都
//! 保持良构。
//!
//! # 更新流程
//!
//! 一条消息经 [`engine::DashboardEngine::process_message`] 独立
//! 流经四个构建器；构建器各自读-改-写自己的文档，彼此除共享
//! 输入消息外无依赖，单个失败不阻塞其余。
//!
//! # 已知限制
//!
//! 核心不做质量控制，不按时间去重或重排剖面，也不管理同一
//! 文档的并发写入者（假定外部保证同一 (用户, 视图) 至多一个
//! 更新者）。

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod contour;
pub mod engine;
pub mod message;
pub mod mixed_layer;
pub mod snapshot;
pub mod status;
pub mod timeseries;
pub mod track;

#[cfg(test)]
pub(crate) mod test_support;

pub use contour::{append_contour_column, ContourDoc};
pub use engine::{DashboardEngine, UpdateReport};
pub use message::{EngineeringData, ProfileMessage};
pub use mixed_layer::select_above_mld;
pub use snapshot::{build_snapshot, SnapshotDoc};
pub use status::{update_float_status, FloatState, FloatStatus, StatusDoc, StatusUpdate};
pub use timeseries::{append_timeseries, TimeseriesDoc, TsSeries};
pub use track::{append_position, Feature, Geometry, TrackDoc, TrackProperties};
