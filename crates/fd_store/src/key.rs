// crates/fd_store/src/key.rs

//! 文档键
//!
//! 每个视图文档由 (用户标识, 视图种类) 唯一拥有，
//! 键到文件名的映射沿用原始仪表盘的命名约定。

use fd_registry::FieldId;
use std::fmt;

/// 视图文档键
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DocKey {
    /// 单剖面快照（每条剖面一个文档，剖面号补零到三位）
    Profile {
        /// 浮标用户标识
        usr_id: String,
        /// 剖面编号
        profile_id: u32,
    },
    /// 混合层时序（每浮标一个累积文档）
    Timeseries {
        /// 浮标用户标识
        usr_id: String,
    },
    /// 深度-时间等值图（每浮标每字段一个累积文档）
    Contour {
        /// 浮标用户标识
        usr_id: String,
        /// 等值图字段
        field: FieldId,
    },
    /// 地理轨迹（每浮标一个文档）
    Track {
        /// 浮标用户标识
        usr_id: String,
    },
    /// 浮标状态总表（全部浮标共用一个文档）
    Status,
}

impl DocKey {
    /// 键对应的文件名
    pub fn filename(&self) -> String {
        match self {
            Self::Profile { usr_id, profile_id } => {
                format!("{usr_id}.{profile_id:03}.profile.json")
            }
            Self::Timeseries { usr_id } => format!("{usr_id}.timeseries.json"),
            Self::Contour { usr_id, field } => format!("{usr_id}.{field}.contour.json"),
            Self::Track { usr_id } => format!("{usr_id}.geo.json"),
            Self::Status => "float_status.json".to_string(),
        }
    }
}

impl fmt::Display for DocKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.filename())
    }
}
