// crates/fd_engine/src/engine.rs

//! 更新编排
//!
//! 一条剖面消息独立流经四个构建器：各自读取自己的上一版文档、
//! 应用消息、整体覆写替换文档。构建器之间除共享同一条输入消息
//! 外无更新期依赖，单个构建器失败不阻塞其余构建器。
//!
//! # 持久化纪律
//!
//! 失败的更新绝不落盘：构建器先完成全部计算，save 是最后一步。
//! reset 标志使构建器无视上一版文档从冷启动开始，随后的整体
//! 覆写即完成丢弃（不做合并）。

use crate::contour::append_contour_column;
use crate::message::ProfileMessage;
use crate::mixed_layer::select_above_mld;
use crate::snapshot::build_snapshot;
use crate::status::{update_float_status, StatusDoc, StatusUpdate};
use crate::timeseries::{append_timeseries, TimeseriesDoc};
use crate::track::{append_position, TrackDoc};
use chrono::{DateTime, Utc};
use fd_foundation::error::{FdError, FdResult};
use fd_registry::{CONTOUR_FIELDS, CONTOUR_FIELDS_MANDATORY};
use fd_store::{DocKey, DocumentStore};
use log::{debug, error, info};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// 一次消息处理中各构建器的完成信号
///
/// 负向完成信号以错误值形式保留在报告里，由调用方决定是否
/// 重投该消息（核心不做自动重试）。
#[derive(Debug)]
pub struct UpdateReport {
    /// 剖面快照构建结果
    pub snapshot: FdResult<()>,
    /// 时序聚合结果
    pub timeseries: FdResult<()>,
    /// 等值图更新结果
    pub contour: FdResult<()>,
    /// 轨迹更新结果
    pub track: FdResult<()>,
}

impl UpdateReport {
    /// 四个构建器是否全部成功
    pub fn all_ok(&self) -> bool {
        self.snapshot.is_ok()
            && self.timeseries.is_ok()
            && self.contour.is_ok()
            && self.track.is_ok()
    }

    /// 失败的构建器及其错误
    pub fn failures(&self) -> Vec<(&'static str, &FdError)> {
        [
            ("snapshot", &self.snapshot),
            ("timeseries", &self.timeseries),
            ("contour", &self.contour),
            ("track", &self.track),
        ]
        .into_iter()
        .filter_map(|(name, outcome)| outcome.as_ref().err().map(|e| (name, e)))
        .collect()
    }
}

/// 增量聚合引擎
///
/// 持有文档存储后端，对每条消息执行四个视图的读-改-写。
/// 并发纪律由外部保证：同一 (用户, 视图) 文档同时至多一个更新者。
pub struct DashboardEngine<S: DocumentStore> {
    store: S,
}

impl<S: DocumentStore> DashboardEngine<S> {
    /// 创建引擎
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// 存储后端
    pub fn store(&self) -> &S {
        &self.store
    }

    /// 处理一条剖面消息
    ///
    /// 消息整体无效（缺压力序列、长度不对齐、经纬度越界）时
    /// 直接返回错误，四个构建器都不运行。否则四个构建器独立
    /// 运行，每个的结果记录在 [`UpdateReport`] 中。
    pub fn process_message(
        &self,
        usr_id: &str,
        msg: &ProfileMessage,
        reset: bool,
    ) -> FdResult<UpdateReport> {
        msg.validate()?;
        info!("处理 {usr_id} 剖面 {:03} (reset={reset})", msg.profile_id);

        let report = UpdateReport {
            snapshot: self.run_snapshot(usr_id, msg),
            timeseries: self.run_timeseries(usr_id, msg, reset),
            contour: self.run_contour(usr_id, msg, reset),
            track: self.run_track(usr_id, msg, reset),
        };
        for (builder, err) in report.failures() {
            error!("{usr_id} 剖面 {:03} 的 {builder} 更新失败: {err}", msg.profile_id);
        }
        Ok(report)
    }

    /// 更新浮标状态总表
    ///
    /// `now` 由调用方注入，保证可测试与可复现。
    pub fn update_status(
        &self,
        float_id: &str,
        update: &StatusUpdate,
        reset: bool,
        now: DateTime<Utc>,
    ) -> FdResult<()> {
        let key = DocKey::Status;
        let prev: Option<StatusDoc> = if reset { None } else { self.load_doc(&key)? };
        let doc = update_float_status(prev, float_id, update, now)?;
        self.save_doc(&key, &doc)
    }

    // ========================================================
    // 四个构建器
    // ========================================================

    fn run_snapshot(&self, usr_id: &str, msg: &ProfileMessage) -> FdResult<()> {
        let key = DocKey::Profile {
            usr_id: usr_id.to_string(),
            profile_id: msg.profile_id,
        };
        let doc = build_snapshot(msg)?;
        self.save_doc(&key, &doc)
    }

    fn run_timeseries(&self, usr_id: &str, msg: &ProfileMessage, reset: bool) -> FdResult<()> {
        let key = DocKey::Timeseries {
            usr_id: usr_id.to_string(),
        };
        let mask = select_above_mld(msg.pressure()?, msg.mld);
        let prev: Option<TimeseriesDoc> = if reset { None } else { self.load_doc(&key)? };
        let doc = append_timeseries(prev, msg, &mask)?;
        self.save_doc(&key, &doc)
    }

    fn run_contour(&self, usr_id: &str, msg: &ProfileMessage, reset: bool) -> FdResult<()> {
        // 强制字段先行检查：缺失时整条消息的等值图更新失败，
        // 任何字段的文档都不落盘
        for &field in CONTOUR_FIELDS_MANDATORY {
            if msg.series(field).is_none() {
                return Err(FdError::missing_field(field.as_str(), "msg.obs"));
            }
        }
        for &field in CONTOUR_FIELDS {
            if msg.series(field).is_none() {
                // 可选字段本次未测量：不为该字段插列
                debug!("{usr_id} 剖面 {:03} 无 {field} 观测，跳过", msg.profile_id);
                continue;
            }
            let key = DocKey::Contour {
                usr_id: usr_id.to_string(),
                field,
            };
            let prev = if reset { None } else { self.load_doc(&key)? };
            let doc = append_contour_column(prev, msg, field)?;
            self.save_doc(&key, &doc)?;
        }
        Ok(())
    }

    fn run_track(&self, usr_id: &str, msg: &ProfileMessage, reset: bool) -> FdResult<()> {
        let key = DocKey::Track {
            usr_id: usr_id.to_string(),
        };
        let prev: Option<TrackDoc> = if reset { None } else { self.load_doc(&key)? };
        let doc = append_position(prev, msg, usr_id);
        self.save_doc(&key, &doc)
    }

    // ========================================================
    // 存储适配
    // ========================================================

    /// 读取并反序列化文档，不存在时返回 `None`
    fn load_doc<T: DeserializeOwned>(&self, key: &DocKey) -> FdResult<Option<T>> {
        match self.store.load(key)? {
            Some(value) => {
                let doc = serde_json::from_value(value).map_err(|e| {
                    FdError::serialization(format!("文档 {key} 反序列化失败: {e}"))
                })?;
                Ok(Some(doc))
            }
            None => Ok(None),
        }
    }

    /// 序列化并整体覆写文档
    fn save_doc<T: Serialize>(&self, key: &DocKey, doc: &T) -> FdResult<()> {
        let value = serde_json::to_value(doc)
            .map_err(|e| FdError::serialization(format!("文档 {key} 序列化失败: {e}")))?;
        self.store.save(key, &value)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contour::ContourDoc;
    use crate::snapshot::SnapshotDoc;
    use crate::test_support::{sample_message, sample_message_at};
    use fd_registry::FieldId;
    use fd_store::MemoryStore;

    fn engine() -> DashboardEngine<MemoryStore> {
        DashboardEngine::new(MemoryStore::new())
    }

    fn timeseries_key() -> DocKey {
        DocKey::Timeseries {
            usr_id: "n0572".into(),
        }
    }

    #[test]
    fn test_all_builders_succeed() {
        let engine = engine();
        let report = engine
            .process_message("n0572", &sample_message(), false)
            .unwrap();
        assert!(report.all_ok());
        assert!(report.failures().is_empty());

        let snapshot: SnapshotDoc = engine
            .load_doc(&DocKey::Profile {
                usr_id: "n0572".into(),
                profile_id: 0,
            })
            .unwrap()
            .unwrap();
        assert!(!snapshot.fields.is_empty());

        let ts: TimeseriesDoc = engine.load_doc(&timeseries_key()).unwrap().unwrap();
        assert_eq!(ts.len(), 1);

        // 消息含 t/s/chla_adj → 三个等值图文档；bbp 等未测量 → 无文档
        for field in [FieldId::T, FieldId::S, FieldId::ChlaAdj] {
            let key = DocKey::Contour {
                usr_id: "n0572".into(),
                field,
            };
            let doc: ContourDoc = engine.load_doc(&key).unwrap().unwrap();
            assert_eq!(doc.n_columns(), 1);
        }
        let bbp_key = DocKey::Contour {
            usr_id: "n0572".into(),
            field: FieldId::Bbp,
        };
        assert!(engine.store().load(&bbp_key).unwrap().is_none());

        let track: TrackDoc = engine
            .load_doc(&DocKey::Track {
                usr_id: "n0572".into(),
            })
            .unwrap()
            .unwrap();
        assert_eq!(track.point_count("n0572"), 1);
    }

    #[test]
    fn test_incremental_two_messages() {
        let engine = engine();
        engine
            .process_message("n0572", &sample_message_at(0), false)
            .unwrap();
        engine
            .process_message("n0572", &sample_message_at(1), false)
            .unwrap();

        let ts: TimeseriesDoc = engine.load_doc(&timeseries_key()).unwrap().unwrap();
        assert_eq!(ts.len(), 2);

        let track: TrackDoc = engine
            .load_doc(&DocKey::Track {
                usr_id: "n0572".into(),
            })
            .unwrap()
            .unwrap();
        assert_eq!(track.point_count("n0572"), 1);
        assert_eq!(track.line("n0572").unwrap().len(), 2);
    }

    #[test]
    fn test_reset_discards_history() {
        let engine = engine();
        for i in 0..10 {
            let report = engine
                .process_message("n0572", &sample_message_at(i), false)
                .unwrap();
            assert!(report.all_ok());
        }
        let ts: TimeseriesDoc = engine.load_doc(&timeseries_key()).unwrap().unwrap();
        assert_eq!(ts.len(), 10);

        // reset: 10 条历史被丢弃而不是合并
        let report = engine
            .process_message("n0572", &sample_message_at(10), true)
            .unwrap();
        assert!(report.all_ok());

        let ts: TimeseriesDoc = engine.load_doc(&timeseries_key()).unwrap().unwrap();
        assert_eq!(ts.len(), 1);
        assert_eq!(ts.profile_id, vec![10]);

        let t_key = DocKey::Contour {
            usr_id: "n0572".into(),
            field: FieldId::T,
        };
        let contour: ContourDoc = engine.load_doc(&t_key).unwrap().unwrap();
        assert_eq!(contour.n_columns(), 1);

        let track: TrackDoc = engine
            .load_doc(&DocKey::Track {
                usr_id: "n0572".into(),
            })
            .unwrap()
            .unwrap();
        assert!(track.line("n0572").is_none());
    }

    #[test]
    fn test_builder_independence() {
        let engine = engine();
        // chla_adj 对快照/时序/等值图都是强制字段，轨迹不受影响
        let mut msg = sample_message();
        msg.obs.remove(&FieldId::ChlaAdj);
        let report = engine.process_message("n0572", &msg, false).unwrap();

        assert!(report.snapshot.is_err());
        assert!(report.timeseries.is_err());
        assert!(report.contour.is_err());
        assert!(report.track.is_ok());
        assert_eq!(report.failures().len(), 3);

        // 失败的构建器不落盘
        assert!(engine.store().load(&timeseries_key()).unwrap().is_none());
        let track: TrackDoc = engine
            .load_doc(&DocKey::Track {
                usr_id: "n0572".into(),
            })
            .unwrap()
            .unwrap();
        assert_eq!(track.point_count("n0572"), 1);
    }

    #[test]
    fn test_failed_update_leaves_prior_document_untouched() {
        let engine = engine();
        engine
            .process_message("n0572", &sample_message_at(0), false)
            .unwrap();

        let mut bad = sample_message_at(1);
        bad.obs.remove(&FieldId::T);
        let report = engine.process_message("n0572", &bad, false).unwrap();
        assert!(report.timeseries.is_err());

        // 上一版文档原样保留
        let ts: TimeseriesDoc = engine.load_doc(&timeseries_key()).unwrap().unwrap();
        assert_eq!(ts.len(), 1);
        assert_eq!(ts.profile_id, vec![0]);
    }

    #[test]
    fn test_invalid_message_runs_no_builder() {
        let engine = engine();
        let mut msg = sample_message();
        msg.obs.remove(&FieldId::P);
        assert!(engine.process_message("n0572", &msg, false).is_err());
        assert!(engine.store().load(&timeseries_key()).unwrap().is_none());
    }

    #[test]
    fn test_status_update_through_engine() {
        let engine = engine();
        let msg = sample_message();
        engine
            .update_status("n0572", &StatusUpdate::from_message(&msg), false, msg.dt)
            .unwrap();

        let doc: StatusDoc = engine.load_doc(&DocKey::Status).unwrap().unwrap();
        assert_eq!(doc["n0572"].profile_n, Some(0));
        assert_eq!(doc["n0572"].days_last, Some(0));
    }
}
