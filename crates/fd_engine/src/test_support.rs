// crates/fd_engine/src/test_support.rs

//! 测试共用的样例消息

use crate::message::ProfileMessage;
use chrono::{TimeZone, Utc};
use fd_foundation::gap::{GapSeries, GAP};
use fd_registry::FieldId;
use std::collections::BTreeMap;

/// 规格场景样例：`p=[0,10,20,30]`, `t=[20.0,19.5,19.0,NaN]`, `mld=15`
///
/// 附带满足三个视图强制字段的 `s` 与 `chla_adj` 序列。
pub fn sample_message() -> ProfileMessage {
    let mut obs = BTreeMap::new();
    obs.insert(FieldId::P, GapSeries::from(vec![0.0, 10.0, 20.0, 30.0]));
    obs.insert(FieldId::T, GapSeries::from(vec![20.0, 19.5, 19.0, GAP]));
    obs.insert(FieldId::S, GapSeries::from(vec![35.0, 35.1, 35.2, 35.3]));
    obs.insert(
        FieldId::ChlaAdj,
        GapSeries::from(vec![0.5, 0.4, 0.3, 0.2]),
    );

    ProfileMessage {
        profile_id: 0,
        dt: Utc.with_ymd_and_hms(2016, 3, 10, 16, 40, 35).unwrap(),
        lat: 36.7,
        lon: -122.2,
        mld: 15.0,
        obs,
        engineering: None,
    }
}

/// 在样例消息上换剖面号与时刻
pub fn sample_message_at(profile_id: u32) -> ProfileMessage {
    let mut msg = sample_message();
    msg.profile_id = profile_id;
    msg.dt = msg.dt + chrono::Duration::days(profile_id as i64 * 5);
    msg.lat += 0.1 * profile_id as f64;
    msg.lon += 0.1 * profile_id as f64;
    msg
}
