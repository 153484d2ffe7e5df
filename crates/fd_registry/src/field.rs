// crates/fd_registry/src/field.rs

//! 字段与视图标识
//!
//! 以封闭枚举取代开放的字符串键，字段拼写错误与视图越界引用
//! 在编译期或查表时即可暴露。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 物理变量 / 消息标量的封闭标识
///
/// 字符串形式与上游消息及持久化文档中的键名一致。
/// 枚举声明顺序决定 `BTreeMap` 键序，与剖面视图的字段顺序一致。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FieldId {
    /// 剖面编号（整条剖面一个值）
    ProfileId,
    /// 观测时刻（整条剖面一个值）
    Dt,
    /// 混合层深度（整条剖面一个值）
    Mld,
    /// 压力
    P,
    /// 光合有效辐射
    Par,
    /// 温度
    T,
    /// 盐度
    S,
    /// 叶绿素 a（校正值）
    ChlaAdj,
    /// 后向散射系数
    Bbp,
    /// 有色溶解有机物荧光
    Fdom,
    /// 溶解氧
    #[serde(rename = "o2_c")]
    O2C,
}

impl FieldId {
    /// 字段键名（消息与文档中的字符串形式）
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProfileId => "profile_id",
            Self::Dt => "dt",
            Self::Mld => "mld",
            Self::P => "p",
            Self::Par => "par",
            Self::T => "t",
            Self::S => "s",
            Self::ChlaAdj => "chla_adj",
            Self::Bbp => "bbp",
            Self::Fdom => "fdom",
            Self::O2C => "o2_c",
        }
    }

    /// 是否为整条剖面一个值的消息标量（非深度序列）
    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::ProfileId | Self::Dt | Self::Mld)
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "profile_id" => Ok(Self::ProfileId),
            "dt" => Ok(Self::Dt),
            "mld" => Ok(Self::Mld),
            "p" => Ok(Self::P),
            "par" => Ok(Self::Par),
            "t" => Ok(Self::T),
            "s" => Ok(Self::S),
            "chla_adj" => Ok(Self::ChlaAdj),
            "bbp" => Ok(Self::Bbp),
            "fdom" => Ok(Self::Fdom),
            "o2_c" => Ok(Self::O2C),
            _ => Err(()),
        }
    }
}

/// 聚合视图种类
///
/// 轨迹视图无按字段的成员关系，不在注册表视图之列。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    /// 单剖面快照
    Profile,
    /// 混合层时序
    Timeseries,
    /// 深度-时间等值图
    Contour,
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Profile => "profile",
            Self::Timeseries => "timeseries",
            Self::Contour => "contour",
        };
        f.write_str(name)
    }
}
