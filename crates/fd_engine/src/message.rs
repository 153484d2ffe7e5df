// crates/fd_engine/src/message.rs

//! 剖面消息模型
//!
//! 一条消息对应一个浮标的一次垂直剖面观测。所有深度序列与
//! 压力序列 `p` 按样本对齐（同长度），缺测值在 JSON 中为 `null`。
//!
//! # 约定
//!
//! - `profile_id` 按浮标严格递增（上游保证，核心不校验）
//! - `obs` 必含 `p`；字段整体缺失表示"本次未测量"，与序列内的
//!   缺测值（已测量但无效）是两种状态
//! - 工程遥测通道原样透传给外部协作方，核心不消费

use chrono::{DateTime, Utc};
use fd_foundation::error::{FdError, FdResult};
use fd_foundation::gap::GapSeries;
use fd_registry::FieldId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// 剖面消息：一个浮标的一次垂直剖面
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileMessage {
    /// 剖面编号（每浮标严格递增）
    pub profile_id: u32,
    /// 观测时刻
    pub dt: DateTime<Utc>,
    /// 观测纬度
    pub lat: f64,
    /// 观测经度
    pub lon: f64,
    /// 混合层深度（与压力同单位）
    pub mld: f64,
    /// 深度序列观测，按共享压力序列 `p` 对齐
    pub obs: BTreeMap<FieldId, GapSeries>,
    /// 工程遥测通道（透传给外部协作方）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engineering: Option<EngineeringData>,
}

impl ProfileMessage {
    /// 校验消息内部一致性
    ///
    /// - `obs` 必含 `p`
    /// - 所有深度序列与 `p` 等长
    /// - 经纬度在合法范围内
    pub fn validate(&self) -> FdResult<()> {
        let p = self.pressure()?;
        for (field, series) in &self.obs {
            FdError::check_size(field.as_str(), p.len(), series.len())?;
        }
        FdError::check_range("lat", self.lat, -90.0, 90.0)?;
        FdError::check_range("lon", self.lon, -180.0, 180.0)?;
        Ok(())
    }

    /// 共享压力序列
    pub fn pressure(&self) -> FdResult<&GapSeries> {
        self.obs
            .get(&FieldId::P)
            .ok_or_else(|| FdError::missing_field("p", "msg.obs"))
    }

    /// 指定字段的观测序列，未测量时返回 `None`
    pub fn series(&self, field: FieldId) -> Option<&GapSeries> {
        self.obs.get(&field)
    }

    /// 从 JSON 文件加载消息
    pub fn from_json_file(path: impl AsRef<Path>) -> FdResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(FdError::file_not_found(path));
        }
        let json = std::fs::read_to_string(path)
            .map_err(|e| FdError::io_with_source(format!("读取消息文件 {}", path.display()), e))?;
        serde_json::from_str(&json).map_err(|e| FdError::serialization(e.to_string()))
    }
}

/// 工程遥测数据
///
/// 十二个泵/传感器的电流电压通道，键名沿用上游解码器的拼写。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineeringData {
    /// 气泵电流
    #[serde(rename = "AirPumpAmps")]
    pub air_pump_amps: f64,
    /// 气泵电压
    #[serde(rename = "AirPumpVolts")]
    pub air_pump_volts: f64,
    /// 浮力泵电流
    #[serde(rename = "BuoyancyPumpAmps")]
    pub buoyancy_pump_amps: f64,
    /// 浮力泵电压
    #[serde(rename = "BuoyancyPumpVolts")]
    pub buoyancy_pump_volts: f64,
    /// 静息电流
    #[serde(rename = "QuiescentAmps")]
    pub quiescent_amps: f64,
    /// 静息电压
    #[serde(rename = "QuiescentVolts")]
    pub quiescent_volts: f64,
    /// SBE41cp 电流
    #[serde(rename = "Sbe41cpAmps")]
    pub sbe41cp_amps: f64,
    /// SBE41cp 电压
    #[serde(rename = "Sbe41cpVolts")]
    pub sbe41cp_volts: f64,
    /// MCOMS 电流
    #[serde(rename = "McomsAmps")]
    pub mcoms_amps: f64,
    /// MCOMS 电压
    #[serde(rename = "McomsVolts")]
    pub mcoms_volts: f64,
    /// SBE63 电流
    #[serde(rename = "Sbe63Amps")]
    pub sbe63_amps: f64,
    /// SBE63 电压
    #[serde(rename = "Sbe63Volts")]
    pub sbe63_volts: f64,
}
