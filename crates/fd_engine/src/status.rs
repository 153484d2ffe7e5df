// crates/fd_engine/src/status.rs

//! 浮标状态生命周期记录
//!
//! 维护全部浮标共用的状态总表：最近/首次上报时刻、距今天数、
//! 活跃状态。有状态但无算法，逐字段条件更新。

use chrono::{DateTime, Utc};
use fd_foundation::error::{FdError, FdResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 超过该天数未上报即判定为不活跃
pub const INACTIVE_AFTER_DAYS: i64 = 15;

/// 浮标活跃状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FloatState {
    /// 正常上报中
    Active,
    /// 连续缺报
    Inactive,
}

/// 单个浮标的状态记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloatStatus {
    /// 浮标标识
    pub float_id: String,
    /// 本记录的更新时刻
    pub dt_update: DateTime<Utc>,
    /// WMO 编号
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wmo: Option<String>,
    /// 最近剖面编号
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_n: Option<u32>,
    /// 所属机构
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    /// 所属项目
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    /// 最近上报时刻
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dt_last: Option<DateTime<Utc>>,
    /// 距最近上报的天数
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_last: Option<i64>,
    /// 首次上报时刻
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dt_first: Option<DateTime<Utc>>,
    /// 距首次上报的天数
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_first: Option<i64>,
    /// 活跃状态
    pub status: FloatState,
}

/// 状态总表：浮标标识到状态记录
pub type StatusDoc = BTreeMap<String, FloatStatus>;

/// 一次状态更新的输入
///
/// 未提供的字段保持既有值不变。
#[derive(Debug, Clone, Default)]
pub struct StatusUpdate {
    /// WMO 编号
    pub wmo: Option<String>,
    /// 最近剖面编号
    pub profile_n: Option<u32>,
    /// 最近上报时刻
    pub dt_last: Option<DateTime<Utc>>,
    /// 首次上报时刻
    pub dt_first: Option<DateTime<Utc>>,
    /// 强制指定状态（不提供时按缺报天数判定）
    pub status: Option<FloatState>,
    /// 所属机构
    pub institution: Option<String>,
    /// 所属项目
    pub project: Option<String>,
}

impl StatusUpdate {
    /// 从剖面消息构造：剖面号与上报时刻
    pub fn from_message(msg: &crate::message::ProfileMessage) -> Self {
        Self {
            profile_n: Some(msg.profile_id),
            dt_last: Some(msg.dt),
            ..Default::default()
        }
    }
}

/// 更新浮标状态总表
///
/// `dt_last` 未提供且记录中也没有时返回 [`FdError::InvalidInput`]。
/// `dt_first` 在剖面 0 上报时从 `dt_last` 回填。
pub fn update_float_status(
    prev: Option<StatusDoc>,
    float_id: &str,
    update: &StatusUpdate,
    now: DateTime<Utc>,
) -> FdResult<StatusDoc> {
    let mut doc = prev.unwrap_or_default();
    let entry = doc.entry(float_id.to_string()).or_insert_with(|| FloatStatus {
        float_id: float_id.to_string(),
        dt_update: now,
        wmo: None,
        profile_n: None,
        institution: None,
        project: None,
        dt_last: None,
        days_last: None,
        dt_first: None,
        days_first: None,
        status: FloatState::Active,
    });

    entry.dt_update = now;
    if let Some(wmo) = &update.wmo {
        entry.wmo = Some(wmo.clone());
    }
    if let Some(profile_n) = update.profile_n {
        entry.profile_n = Some(profile_n);
    }
    if let Some(institution) = &update.institution {
        entry.institution = Some(institution.clone());
    }
    if let Some(project) = &update.project {
        entry.project = Some(project.clone());
    }

    // 最近上报：输入优先，否则沿用既有记录
    let dt_last = match update.dt_last.or(entry.dt_last) {
        Some(dt) => dt,
        None => {
            return Err(FdError::invalid_input(format!(
                "浮标 {float_id} 无最近上报时刻可用"
            )))
        }
    };
    entry.dt_last = Some(dt_last);
    let days_last = (now - dt_last).num_days();
    entry.days_last = Some(days_last);

    // 首次上报：输入优先；剖面 0 上报且尚未记录时从 dt_last 回填
    if let Some(dt_first) = update.dt_first {
        entry.dt_first = Some(dt_first);
    } else if entry.dt_first.is_none() && update.profile_n == Some(0) {
        entry.dt_first = Some(dt_last);
    }
    if let Some(dt_first) = entry.dt_first {
        entry.days_first = Some((now - dt_first).num_days());
    }

    entry.status = match update.status {
        Some(state) => state,
        None if days_last > INACTIVE_AFTER_DAYS => FloatState::Inactive,
        None => FloatState::Active,
    };

    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2016, 3, 20, 12, 0, 0).unwrap()
    }

    fn first_report() -> StatusUpdate {
        StatusUpdate {
            wmo: Some("5902462".into()),
            profile_n: Some(0),
            dt_last: Some(now() - Duration::days(1)),
            ..Default::default()
        }
    }

    #[test]
    fn test_new_float_entry() {
        let doc = update_float_status(None, "n0572", &first_report(), now()).unwrap();
        let entry = &doc["n0572"];
        assert_eq!(entry.float_id, "n0572");
        assert_eq!(entry.wmo.as_deref(), Some("5902462"));
        assert_eq!(entry.days_last, Some(1));
        assert_eq!(entry.status, FloatState::Active);
    }

    #[test]
    fn test_dt_first_backfilled_on_profile_zero() {
        let doc = update_float_status(None, "n0572", &first_report(), now()).unwrap();
        let entry = &doc["n0572"];
        assert_eq!(entry.dt_first, entry.dt_last);
        assert_eq!(entry.days_first, Some(1));
    }

    #[test]
    fn test_dt_first_not_backfilled_on_later_profile() {
        let update = StatusUpdate {
            profile_n: Some(3),
            dt_last: Some(now()),
            ..Default::default()
        };
        let doc = update_float_status(None, "n0572", &update, now()).unwrap();
        assert!(doc["n0572"].dt_first.is_none());
        assert!(doc["n0572"].days_first.is_none());
    }

    #[test]
    fn test_inactive_after_fifteen_days() {
        let update = StatusUpdate {
            profile_n: Some(5),
            dt_last: Some(now() - Duration::days(16)),
            ..Default::default()
        };
        let doc = update_float_status(None, "n0572", &update, now()).unwrap();
        assert_eq!(doc["n0572"].status, FloatState::Inactive);
    }

    #[test]
    fn test_forced_status_wins() {
        let update = StatusUpdate {
            dt_last: Some(now() - Duration::days(100)),
            status: Some(FloatState::Active),
            ..Default::default()
        };
        let doc = update_float_status(None, "n0572", &update, now()).unwrap();
        assert_eq!(doc["n0572"].status, FloatState::Active);
    }

    #[test]
    fn test_existing_dt_last_reused() {
        let doc = update_float_status(None, "n0572", &first_report(), now()).unwrap();
        // 第二次更新不带 dt_last → 沿用既有值
        let later = now() + Duration::days(20);
        let doc =
            update_float_status(Some(doc), "n0572", &StatusUpdate::default(), later).unwrap();
        let entry = &doc["n0572"];
        assert_eq!(entry.days_last, Some(21));
        assert_eq!(entry.status, FloatState::Inactive);
    }

    #[test]
    fn test_missing_dt_last_everywhere_fails() {
        let result = update_float_status(None, "n0572", &StatusUpdate::default(), now());
        assert!(matches!(result, Err(FdError::InvalidInput { .. })));
    }

    #[test]
    fn test_multiple_floats_coexist() {
        let doc = update_float_status(None, "n0572", &first_report(), now()).unwrap();
        let doc = update_float_status(Some(doc), "n0573", &first_report(), now()).unwrap();
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_json_roundtrip() {
        let doc = update_float_status(None, "n0572", &first_report(), now()).unwrap();
        let json = serde_json::to_string(&doc).unwrap();
        let back: StatusDoc = serde_json::from_str(&json).unwrap();
        assert_eq!(back["n0572"].wmo.as_deref(), Some("5902462"));
        assert_eq!(back["n0572"].status, FloatState::Active);
    }
}
